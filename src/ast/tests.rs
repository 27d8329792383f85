use test_generator::test_resources;

use std::io::Read;

use super::*;

use crate::error::AnalysisError;

fn read_file(resource: &str) -> String {
    let mut file = std::fs::File::open(resource).expect("File opens");
    let mut input = String::new();
    file.read_to_string(&mut input).expect("Read successful");
    input
}

fn build(input: &str) -> ProgramAST {
    let tokens = crate::token::tokenize(input, "<test-input>").unwrap();
    build_ast(&tokens).unwrap()
}

fn validate_spans(list: &TokenListAST) {
    assert!(list.span.pseudo_path() == "<test-input>");
    assert!(list.span.start_line <= list.span.end_line);

    for token in &list.tokens {
        let span = token.span();
        assert!(span.start_line >= list.span.start_line);
        assert!(span.end_line <= list.span.end_line);

        if let TokenAST::Block(inner) = token {
            validate_spans(inner);
        }
    }
}

#[test_resources("samples/successful/**/*.bst")]
fn ast_has_spans(resource: &str) {
    let ast = build(&read_file(resource));

    for command in &ast.commands {
        assert!(command.span().start_line <= command.span().end_line);

        if let CommandAST::Function { body, .. } = command {
            validate_spans(body);
        }
    }
}

#[test]
fn builds_every_command() {
    let ast = build(
        "ENTRY { author title } { nameptr } { label }
         INTEGERS { len }
         STRINGS { s t }
         MACRO {jan} {\"January\"}
         FUNCTION {f} { #1 { \"a\" write$ } 'skip$ if$ }
         READ
         EXECUTE {f}
         ITERATE {f}
         REVERSE {f}
         SORT",
    );

    assert_eq!(ast.commands.len(), 10);

    let CommandAST::Entry { fields, integers, strings, .. } = &ast.commands[0] else {
        panic!("Expected ENTRY");
    };
    assert!(matches!(&fields.tokens[..], [TokenAST::Field(a, _), TokenAST::Field(t, _)] if a == "author" && t == "title"));
    assert!(matches!(&integers.tokens[..], [TokenAST::LocalInteger(n, _)] if n == "nameptr"));
    assert!(matches!(&strings.tokens[..], [TokenAST::LocalString(l, _)] if l == "label"));

    assert!(matches!(&ast.commands[3], CommandAST::Macro { name, value, .. } if name == "jan" && value == "January"));

    let CommandAST::Function { name, body, .. } = &ast.commands[4] else {
        panic!("Expected FUNCTION");
    };
    assert_eq!(name, "f");
    assert_eq!(body.tokens.len(), 4);
    assert!(matches!(&body.tokens[0], TokenAST::Integer(1, _)));
    assert!(matches!(&body.tokens[1], TokenAST::Block(inner) if inner.tokens.len() == 2));
    assert!(matches!(&body.tokens[2], TokenAST::QuotedLiteral(name, _) if name == "skip$"));
    assert!(matches!(&body.tokens[3], TokenAST::Literal(name, _) if name == "if$"));

    assert!(matches!(&ast.commands[5], CommandAST::Read { .. }));
    assert!(matches!(&ast.commands[6], CommandAST::Run { kind: CommandKind::Execute, function, .. } if function == "f"));
    assert!(matches!(&ast.commands[7], CommandAST::Run { kind: CommandKind::Iterate, .. }));
    assert!(matches!(&ast.commands[8], CommandAST::Run { kind: CommandKind::Reverse, .. }));
    assert!(matches!(&ast.commands[9], CommandAST::Sort { .. }));
}

#[test]
fn command_keywords_are_case_insensitive() {
    let ast = build("Execute {Begin.Bib}");

    assert!(matches!(&ast.commands[0], CommandAST::Run { function, .. } if function == "begin.bib"));
}

#[test]
fn rejects_malformed_commands() {
    let bad = ["FUNCTION {f}", "FUNCTION {f} { #1", "EXECUTE {a b}", "MACRO {m} {x}", "BOGUS", "{ }", "INTEGERS { #1 }"];

    for input in bad {
        let tokens = crate::token::tokenize(input, "<test-input>").unwrap();
        assert!(build_ast(&tokens).is_err(), "{input} should not build");
    }
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl CommandHandler for Recorder {
    fn add_entry(&mut self, fields: &TokenListAST, _: &TokenListAST, _: &TokenListAST) -> Result<(), AnalysisError> {
        self.events.push(format!("entry {}", fields.tokens.len()));
        Ok(())
    }

    fn add_function(&mut self, name: &str, _: &TokenListAST) -> Result<(), AnalysisError> {
        self.events.push(format!("function {name}"));
        Ok(())
    }

    fn add_integers(&mut self, names: &TokenListAST) -> Result<(), AnalysisError> {
        self.events.push(format!("integers {}", names.tokens.len()));
        Ok(())
    }

    fn add_strings(&mut self, names: &TokenListAST) -> Result<(), AnalysisError> {
        self.events.push(format!("strings {}", names.tokens.len()));
        Ok(())
    }

    fn add_macro(&mut self, name: &str, value: &str) -> Result<(), AnalysisError> {
        self.events.push(format!("macro {name}={value}"));
        Ok(())
    }

    fn add_command(&mut self, kind: CommandKind, function: &str, _: &crate::token::Span) -> Result<(), AnalysisError> {
        self.events.push(format!("{kind} {function}"));
        Ok(())
    }

    fn add_read(&mut self) -> Result<(), AnalysisError> {
        self.events.push("read".to_string());
        Ok(())
    }

    fn add_sort(&mut self) -> Result<(), AnalysisError> {
        self.events.push("sort".to_string());
        Ok(())
    }
}

#[test]
fn parse_replays_commands_in_order() {
    let ast = build("STRINGS {s} FUNCTION {f} {} MACRO {m} {\"v\"} READ ITERATE {f} SORT ENTRY {a}{}{} INTEGERS {i j}");
    let mut recorder = Recorder::default();

    ast.parse(&mut recorder).unwrap();

    assert_eq!(
        recorder.events,
        vec!["strings 1", "function f", "macro m=v", "read", "ITERATE f", "sort", "entry 1", "integers 2"]
    );
}
