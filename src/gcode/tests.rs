use super::*;

fn named_vars(names: &[(&str, ReturnType)]) -> (VarTable, Vec<VarId>) {
    let mut vars = VarTable::default();
    let ids = names
        .iter()
        .map(|(name, ty)| {
            let id = vars.push(VarKind::Local, *ty);
            vars.get_mut(id).name = Some(name.to_string());
            id
        })
        .collect();
    (vars, ids)
}

fn print(statement: &Statement, vars: &VarTable) -> String {
    let mut out: Vec<u8> = vec![];
    statement.print(&mut out, "", vars).unwrap();
    String::from_utf8(out).unwrap()
}

fn int(value: i32) -> Box<GCode> {
    Box::new(GCode::Int(value))
}

#[test]
fn strings_are_escaped() {
    assert_eq!(quote_string("it's"), r"'it\'s'");
    assert_eq!(quote_string(r"{\em x}"), r"'{\\em x}'");
    assert_eq!(quote_string("$x"), "'$x'");
}

#[test]
fn subtraction_parenthesizes_right_operand() {
    let vars = VarTable::default();

    let left_nested = GCode::Binary(BinaryOp::Subtract, Box::new(GCode::Binary(BinaryOp::Subtract, int(1), int(2))), int(3));
    assert_eq!(left_nested.render(&vars), "1 - 2 - 3");

    let right_nested = GCode::Binary(BinaryOp::Subtract, int(1), Box::new(GCode::Binary(BinaryOp::Add, int(2), int(3))));
    assert_eq!(right_nested.render(&vars), "1 - (2 + 3)");

    let added = GCode::Binary(BinaryOp::Add, int(1), Box::new(GCode::Binary(BinaryOp::Subtract, int(2), int(3))));
    assert_eq!(added.render(&vars), "1 + 2 - 3");
}

#[test]
fn comparisons_are_ints_in_value_position() {
    let (vars, ids) = named_vars(&[("v1", ReturnType::Int)]);
    let less = GCode::Compare(CompareOp::Less, Box::new(GCode::Local(ids[0])), int(5));

    assert_eq!(less.render(&vars), "(v1 < 5 ? 1 : 0)");
    assert_eq!(render_condition(&less, &vars, false), "v1 < 5");
    assert_eq!(render_condition(&less, &vars, true), "v1 >= 5");
    assert_eq!(render_condition(&GCode::Local(ids[0]), &vars, false), "v1 > 0");
    assert_eq!(render_condition(&GCode::Local(ids[0]), &vars, true), "v1 <= 0");

    let sum = GCode::Binary(BinaryOp::Add, less.clone().into(), int(1));
    assert_eq!(sum.render(&vars), "(v1 < 5 ? 1 : 0) + 1");
}

#[test]
fn entry_access_renders_runtime_calls() {
    let vars = VarTable::default();

    assert_eq!(GCode::Field("title".into()).render(&vars), "entry.field('title')");
    assert_eq!(GCode::EntryLocal { name: "label".into(), ty: ReturnType::String }.render(&vars), "entry.localString('label')");

    let assign = Statement::Assign(Target::EntryLocal("nameptr".into()), GCode::Int(1));
    assert_eq!(print(&assign, &vars), "entry.setLocal('nameptr', 1)\n");
}

#[test]
fn if_with_empty_then_negates() {
    let (vars, ids) = named_vars(&[("p1", ReturnType::Int)]);
    let write = Statement::Expression(GCode::effect("bibWriter.print", vec![GCode::Str("x".into())]));

    let statement = Statement::If {
        condition: GCode::Local(ids[0]),
        then: CodeBlock::new(),
        otherwise: vec![write].into(),
    };

    assert_eq!(print(&statement, &vars), "if (p1 <= 0) {\n    bibWriter.print('x')\n}\n");
}

#[test]
fn else_if_chains() {
    let (vars, ids) = named_vars(&[("p1", ReturnType::Int), ("p2", ReturnType::Int)]);
    let comment = |text: &str| CodeBlock::from(vec![Statement::Comment(text.to_string())]);

    let statement = Statement::If {
        condition: GCode::Local(ids[0]),
        then: comment("a"),
        otherwise: vec![Statement::If { condition: GCode::Local(ids[1]), then: comment("b"), otherwise: comment("c") }]
            .into(),
    };

    assert_eq!(
        print(&statement, &vars),
        "if (p1 > 0) {\n    // a\n} else if (p2 > 0) {\n    // b\n} else {\n    // c\n}\n"
    );
}

#[test]
fn while_with_condition_code_breaks() {
    let (vars, ids) = named_vars(&[("v1", ReturnType::Int), ("v2", ReturnType::Int)]);

    let statement = Statement::While {
        condition_code: vec![Statement::Declare(ids[1], Some(GCode::Local(ids[0])))].into(),
        condition: GCode::Local(ids[1]),
        body: vec![Statement::Assign(
            Target::Local(ids[0]),
            GCode::Binary(BinaryOp::Subtract, Box::new(GCode::Local(ids[0])), int(1)),
        )]
        .into(),
    };

    assert_eq!(
        print(&statement, &vars),
        "while (true) {\n    int v2 = v1\n    if (v2 <= 0) {\n        break\n    }\n    v1 = v1 - 1\n}\n"
    );
}

#[test]
fn purity_and_reads() {
    let (_, ids) = named_vars(&[("v1", ReturnType::Int)]);
    let global = GCode::Global { name: "count".into(), ty: ReturnType::Int };
    let sum = GCode::Binary(BinaryOp::Add, Box::new(global.clone()), Box::new(GCode::Local(ids[0])));

    assert!(sum.is_pure());
    assert!(sum.reads(&Target::Global("count".into())));
    assert!(sum.reads(&Target::Local(ids[0])));
    assert!(!sum.reads(&Target::EntryLocal("count".into())));
    assert!(sum.reads_state());
    assert!(!GCode::Local(ids[0]).reads_state());
    assert!(!GCode::effect("bibWriter.println", vec![]).is_pure());
}

#[test]
fn functions_print_signature_and_return() {
    let mut vars = VarTable::default();
    let param = vars.push(VarKind::Parameter { depth: 0 }, ReturnType::String);
    vars.get_mut(param).name = Some("p1".into());

    let function = GFunction {
        name: "emphasize".into(),
        groovy_name: "emphasize".into(),
        params: vec![param],
        uses_entry: true,
        body: CodeBlock::new(),
        result: Some(GCode::Binary(BinaryOp::Concat, Box::new(GCode::Str("{\\em ".into())), Box::new(GCode::Local(param)))),
        vars,
    };

    let mut out: Vec<u8> = vec![];
    function.print(&mut out, "").unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "String emphasize(def entry, String p1) {\n    return '{\\\\em ' + p1\n}\n"
    );
    assert!(!function.signature().is_type_handler());
}
