
use bstgroovy::error::{AnalysisError, CompileError, ContractViolation};
use bstgroovy::{compile_file, compile_string, CompileOptions};

fn compile(input: &str) -> String {
    match compile_string(input, &CompileOptions::default()) {
        Ok(script) => script,
        Err(err) => panic!("Style should compile, but got:\n{err}"),
    }
}

#[test]
fn end_to_end() {
    let script = compile("STRINGS{s} FUNCTION{init.state}{\"\" 's :=} EXECUTE{init.state}");

    let expected = "\
// Generated by bstgroovy from <input>

class Style {
    def bibDB
    def bibWriter
    def bibProcessor

    String s = ''

    Style(bibDB, bibWriter, bibProcessor) {
        this.bibDB = bibDB
        this.bibWriter = bibWriter
        this.bibProcessor = bibProcessor
    }

    void initState() {
        s = ''
    }

    void run() {
        initState()
    }
}

new Style(bibDB, bibWriter, bibProcessor).run()
";

    assert_eq!(script, expected);
}

#[test]
fn dispatch_is_sorted() {
    let script = compile("ENTRY {title} {} {} FUNCTION {b.fn} { title write$ } FUNCTION {a.fn} { title write$ }");

    let a = script.find("'a.fn'").expect("a.fn is dispatched");
    let b = script.find("'b.fn'").expect("b.fn is dispatched");
    assert!(a < b);
}

#[test]
fn output_is_deterministic() {
    let input = r#"
        ENTRY {author} {} {}
        STRINGS {s}
        FUNCTION {f} { author duplicate$ empty$ { pop$ "anon" } { "by " swap$ * } if$ 's := }
        ITERATE {f}
    "#;

    assert_eq!(compile(input), compile(input));
}

#[test]
fn optimizer_can_be_disabled() {
    let options = CompileOptions { optimize: false, ..CompileOptions::default() };
    let script = compile_string("FUNCTION {answer} { #40 #2 + }", &options).expect("Style compiles");

    assert!(script.contains("    int answer() {\n        return 40 + 2\n    }\n"));
    assert!(compile("FUNCTION {answer} { #40 #2 + }").contains("    int answer() {\n        return 42\n    }\n"));
}

#[test]
fn contract_errors_name_the_command() {
    let err = compile_string("FUNCTION {foo} { #1 } ITERATE {foo}", &CompileOptions::default())
        .expect_err("ITERATE of a function with a result fails");

    match &err {
        CompileError::AnalysisError(AnalysisError::CommandContract { function, violation, .. }) => {
            assert_eq!(function, "foo");
            assert_eq!(*violation, ContractViolation::ReturnValue);
        }
        other => panic!("Expected a contract violation, got {other:?}"),
    }
    assert!(err.to_string().contains("ITERATE {foo}: the function must not leave a value on the stack"));
}

#[test]
fn unreadable_files_are_direct_errors() {
    let err = compile_file("samples/does/not/exist.bst", &CompileOptions::default()).expect_err("Missing file fails");

    assert!(matches!(err, CompileError::Direct(_)));
    assert!(err.to_string().contains("samples/does/not/exist.bst"));
}

#[test]
fn token_errors_carry_spans() {
    let err = compile_string("FUNCTION {f} { \"open", &CompileOptions::default()).expect_err("Unterminated string fails");

    assert!(matches!(err, CompileError::TokenError(_)));
    assert!(err.to_string().contains("<input>:1:"));
}
