use crate::ast::CommandKind;
use crate::error::{AnalysisError, CompileError, ContractViolation};
use crate::{CompilationEnvironment, CompileOptions};

fn compile(source: &str, optimize: bool) -> Result<CompilationEnvironment, CompileError> {
    let options = CompileOptions { optimize, ..CompileOptions::default() };
    let mut env = CompilationEnvironment::new("<test>", &options);
    env.import(source)?;
    Ok(env)
}

/// The printed Groovy method for the BST function `name`.
fn function_text(env: &CompilationEnvironment, name: &str) -> String {
    let function = env.functions.iter().find(|function| function.name == name).expect("Function exists");

    let mut out: Vec<u8> = vec![];
    function.print(&mut out, "").expect("Printing to memory succeeds");
    String::from_utf8(out).expect("Good Conversion")
}

fn analyze(source: &str) -> String {
    let env = compile(source, true).expect("Style compiles");
    function_text(&env, "f")
}

fn analysis_error(source: &str) -> AnalysisError {
    match compile(source, true) {
        Err(CompileError::AnalysisError(err)) => err,
        Err(err) => panic!("Expected an analysis error, got {err:?}"),
        Ok(_) => panic!("Expected an analysis error, but the style compiled"),
    }
}

#[test]
fn pure_arithmetic_folds() {
    assert_eq!(analyze("FUNCTION {f} { #2 #3 + }"), "int f() {\n    return 5\n}\n");

    let env = compile("FUNCTION {f} { #2 #3 + }", false).expect("Style compiles");
    assert_eq!(function_text(&env, "f"), "int f() {\n    return 2 + 3\n}\n");
}

#[test]
fn int_overflow_is_left_to_groovy() {
    assert_eq!(analyze("FUNCTION {f} { #2147483647 #1 + }"), "int f() {\n    return 2147483647 + 1\n}\n");
    assert_eq!(analyze("FUNCTION {f} { #2147483646 #1 + }"), "int f() {\n    return 2147483647\n}\n");
}

#[test]
fn empty_stack_draws_parameters() {
    assert_eq!(
        analyze(r#"FUNCTION {f} { "{\em " swap$ * }"#),
        "String f(String p1) {\n    return '{\\\\em ' + p1\n}\n"
    );

    // The deepest value is the first parameter.
    assert_eq!(analyze("FUNCTION {f} { - }"), "int f(int p1, int p2) {\n    return p1 - p2\n}\n");
}

#[test]
fn leftover_values_are_complex() {
    assert_eq!(
        analysis_error("FUNCTION {f} { #1 #2 }"),
        AnalysisError::ComplexFunction { function: "f".to_string(), stack: "[1, 2]".to_string() }
    );
}

#[test]
fn leftover_procedure_is_unsupported() {
    assert!(matches!(analysis_error("FUNCTION {f} { { #1 } }"), AnalysisError::Unsupported(_)));
}

#[test]
fn if_reconstructs_branches() {
    assert_eq!(
        analyze(r#"FUNCTION {f} { duplicate$ empty$ { pop$ "x" } { "y" * } if$ }"#),
        "String f(String p1) {\n    String v1\n    if (isEmpty(p1) > 0) {\n        v1 = 'x'\n    } else {\n        v1 = p1 + 'y'\n    }\n    return v1\n}\n"
    );
}

#[test]
fn missing_checks_fields_at_run_time() {
    let env = compile("ENTRY {author} {} {} FUNCTION {is.missing} { missing$ } FUNCTION {f} { author is.missing }", true)
        .expect("Style compiles");

    assert_eq!(function_text(&env, "is.missing"), "int isMissing2(def p1) {\n    return isMissing(p1)\n}\n");
    assert!(function_text(&env, "f").contains("isMissing2(entry.field('author'))"));
    assert!(env.links.has_helper("isMissing"));

    let merged = analyze("ENTRY {author editor} {} {} FUNCTION {f} { { author } { editor } if$ missing$ }");
    assert!(merged.contains("v1 = entry.field('author')"));
    assert!(merged.contains("return isMissing(v1)"));
}

#[test]
fn missing_is_constant_for_non_fields() {
    assert_eq!(
        analyze("ENTRY {author} {} {} FUNCTION {f} { author missing$ }"),
        "int f(def entry) {\n    return entry.isMissing('author')\n}\n"
    );
    assert_eq!(analyze(r#"FUNCTION {f} { "x" missing$ }"#), "int f() {\n    return 0\n}\n");
    assert_eq!(analyze("FUNCTION {f} { #1 + missing$ }"), "int f(int p1) {\n    return 0\n}\n");
}

#[test]
fn if_branches_must_balance() {
    assert_eq!(
        analysis_error(r#"FUNCTION {f} { duplicate$ empty$ { pop$ "x" } { "y" } if$ }"#),
        AnalysisError::UnbalancedBranches { primitive: "if$".to_string() }
    );
}

#[test]
fn if_branches_must_agree_on_types() {
    assert!(matches!(
        analysis_error(r#"FUNCTION {f} { #1 { "x" } { #2 } if$ }"#),
        AnalysisError::TypeMismatch { primitive, .. } if primitive == "if$"
    ));
}

#[test]
fn if_branches_share_parameters() {
    let text = analyze("FUNCTION {f} { #1 > { write$ } { pop$ } if$ }");

    assert_eq!(text, "void f(String p1, int p2) {\n    if (p2 > 1) {\n        bibWriter.print(p1)\n    }\n}\n");
}

#[test]
fn while_updates_loop_variables() {
    assert_eq!(
        analyze("INTEGERS {n} FUNCTION {f} { #0 { n #0 > } { #1 + n #1 - 'n := } while$ }"),
        "int f() {\n    int v1 = 0\n    while (n > 0) {\n        n = n - 1\n        v1 = v1 + 1\n    }\n    return v1\n}\n"
    );
}

#[test]
fn unused_loop_counters_disappear() {
    let text = analyze("INTEGERS {g} FUNCTION {f} { #0 { g #0 > } { #1 + g #1 - 'g := } while$ pop$ }");

    assert!(!text.contains("v1"), "Counter should be gone:\n{text}");
    assert!(text.contains("g = g - 1"));
}

#[test]
fn while_may_not_draw_parameters() {
    assert!(matches!(
        analysis_error("FUNCTION {f} { { #1 } { pop$ } while$ }"),
        AnalysisError::Unsupported(_)
    ));
}

#[test]
fn assignment_spills_readers() {
    assert_eq!(
        analyze("INTEGERS {n} FUNCTION {f} { n #5 'n := }"),
        "int f() {\n    int v1 = n\n    n = 5\n    return v1\n}\n"
    );
}

#[test]
fn calls_spill_state_and_store_results() {
    let env = compile("INTEGERS {n} FUNCTION {set} { #1 'n := } FUNCTION {f} { n set }", true).expect("Style compiles");
    assert_eq!(function_text(&env, "f"), "int f() {\n    int v1 = n\n    set()\n    return v1\n}\n");

    assert_eq!(
        analyze(r#"FUNCTION {emph} { "{\em " swap$ * } FUNCTION {f} { "x" emph }"#),
        "String f() {\n    String v1 = emph('x')\n    return v1\n}\n"
    );
}

#[test]
fn entry_access_adds_entry_parameter() {
    assert_eq!(
        analyze("ENTRY {title} {} {label} FUNCTION {f} { title 'label := }"),
        "void f(def entry) {\n    entry.setLocal('label', entry.field('title'))\n}\n"
    );
}

#[test]
fn naming_is_idempotent() {
    let source = r#"FUNCTION {f} { duplicate$ empty$ { pop$ "x" } { "y" * } if$ }"#;

    assert_eq!(analyze(source), analyze(source));

    let env = compile(&format!("{source} FUNCTION {{g}} {{ #1 }} {}", source.replace("{f}", "{h}")), true)
        .expect("Style compiles");
    assert_eq!(function_text(&env, "f"), function_text(&env, "h").replace(" h(", " f("));
}

#[test]
fn type_mismatch_names_primitive() {
    assert_eq!(
        analysis_error(r#"FUNCTION {f} { "a" #1 + }"#),
        AnalysisError::TypeMismatch { primitive: "+".to_string(), expected: "INT".to_string(), found: "STRING".to_string() }
    );
}

#[test]
fn unknown_names_are_unresolved() {
    assert_eq!(analysis_error("FUNCTION {f} { nothing }"), AnalysisError::UnresolvedReference("nothing".to_string()));
    assert_eq!(analysis_error("FUNCTION {f} { #1 'nothing := }"), AnalysisError::UnresolvedReference("nothing".to_string()));
}

#[test]
fn names_are_declared_once() {
    assert_eq!(analysis_error("INTEGERS {x} STRINGS {x}"), AnalysisError::Redefinition("x".to_string()));
    assert_eq!(analysis_error("FUNCTION {f} {} FUNCTION {f} {}"), AnalysisError::Redefinition("f".to_string()));
    assert_eq!(analysis_error("FUNCTION {write$} {}"), AnalysisError::Redefinition("write$".to_string()));
}

#[test]
fn execute_contracts() {
    let contract = |command, violation| AnalysisError::CommandContract { command, function: "foo".to_string(), violation };

    assert_eq!(
        analysis_error("FUNCTION {foo} { #1 } EXECUTE {foo}"),
        contract(CommandKind::Execute, ContractViolation::ReturnValue)
    );
    assert_eq!(
        analysis_error("FUNCTION {foo} { #1 } ITERATE {foo}"),
        contract(CommandKind::Iterate, ContractViolation::ReturnValue)
    );
    assert_eq!(
        analysis_error("FUNCTION {foo} { write$ } EXECUTE {foo}"),
        contract(CommandKind::Execute, ContractViolation::Arguments)
    );
    assert_eq!(
        analysis_error("ENTRY {title} {} {} FUNCTION {foo} { title write$ } EXECUTE {foo}"),
        contract(CommandKind::Execute, ContractViolation::EntryUsage)
    );
}

#[test]
fn iterate_runs_per_entry() {
    let env = compile("ENTRY {title} {} {} FUNCTION {foo} { title write$ } ITERATE {foo} REVERSE {foo}", true)
        .expect("Style compiles");

    let mut out: Vec<u8> = vec![];
    env.run.print(&mut out, "", &crate::gcode::VarTable::default()).expect("Printing to memory succeeds");
    assert_eq!(
        String::from_utf8(out).expect("Good Conversion"),
        "bibDB.each { entry ->\n    foo(entry)\n}\nbibDB.reverseEach { entry ->\n    foo(entry)\n}\n"
    );
    assert_eq!(env.types.get("foo").map(String::as_str), Some("foo"));
}
