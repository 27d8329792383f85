use super::*;

use crate::gcode::{CallTarget, ReturnType};

fn int(value: i32) -> Box<GCode> {
    Box::new(GCode::Int(value))
}

fn string(value: &str) -> Box<GCode> {
    Box::new(GCode::Str(value.to_string()))
}

fn function(vars: VarTable, body: Vec<Statement>, result: Option<GCode>) -> GFunction {
    GFunction {
        name: "f".into(),
        groovy_name: "f".into(),
        params: vec![],
        uses_entry: false,
        body: body.into(),
        result,
        vars,
    }
}

#[test]
fn folds_constants() {
    let mut sum = GCode::Binary(BinaryOp::Add, int(2), Box::new(GCode::Binary(BinaryOp::Subtract, int(10), int(3))));
    fold(&mut sum);
    assert_eq!(sum, GCode::Int(9));

    let mut joined = GCode::Binary(BinaryOp::Concat, string("a"), string("b"));
    fold(&mut joined);
    assert_eq!(joined, GCode::Str("ab".into()));

    let mut less = GCode::Compare(CompareOp::Less, int(1), int(2));
    fold(&mut less);
    assert_eq!(less, GCode::Int(1));

    let mut equal = GCode::Compare(CompareOp::Equal, string("a"), string("b"));
    fold(&mut equal);
    assert_eq!(equal, GCode::Int(0));
}

#[test]
fn folds_trailing_concatenation() {
    let mut vars = VarTable::default();
    let param = vars.push(VarKind::Parameter { depth: 0 }, ReturnType::String);

    let mut code = GCode::Binary(
        BinaryOp::Concat,
        Box::new(GCode::Binary(BinaryOp::Concat, Box::new(GCode::Local(param)), string("a"))),
        string("b"),
    );
    fold(&mut code);

    assert_eq!(code, GCode::Binary(BinaryOp::Concat, Box::new(GCode::Local(param)), string("ab")));
}

#[test]
fn overflow_is_not_folded() {
    let mut sum = GCode::Binary(BinaryOp::Add, int(i32::MAX), int(1));
    let before = sum.clone();
    fold(&mut sum);

    assert_eq!(sum, before);
}

#[test]
fn folds_inside_calls() {
    let mut call = GCode::call("intToStr", vec![GCode::Binary(BinaryOp::Add, int(1), int(1))], ReturnType::String);
    fold(&mut call);

    assert_eq!(call, GCode::call("intToStr", vec![GCode::Int(2)], ReturnType::String));
}

#[test]
fn removes_dead_stores() {
    let mut vars = VarTable::default();
    let dead = vars.push(VarKind::Local, ReturnType::Int);
    let live = vars.push(VarKind::Local, ReturnType::Int);
    let effect = vars.push(VarKind::Local, ReturnType::Int);
    let call = GCode::Call { target: CallTarget::Function("count".into()), args: vec![], ty: ReturnType::Int, effect: true };

    let mut f = function(
        vars,
        vec![
            Statement::Declare(dead, Some(GCode::Int(1))),
            Statement::Declare(live, Some(GCode::Int(2))),
            Statement::Declare(effect, Some(call.clone())),
            Statement::Assign(Target::Local(dead), GCode::Int(3)),
        ],
        Some(GCode::Local(live)),
    );
    optimize(&mut f);

    assert_eq!(
        f.body.statements,
        vec![Statement::Declare(live, Some(GCode::Int(2))), Statement::Expression(call)]
    );
}

#[test]
fn keeps_parameters_and_globals() {
    let mut vars = VarTable::default();
    let param = vars.push(VarKind::Parameter { depth: 0 }, ReturnType::Int);

    let body = vec![
        Statement::Assign(Target::Global("count".into()), GCode::Int(1)),
        Statement::Assign(Target::Local(param), GCode::Int(2)),
    ];
    let mut f = function(vars, body.clone(), None);
    optimize(&mut f);

    assert_eq!(f.body.statements, body);
}

#[test]
fn chains_of_dead_stores_disappear() {
    let mut vars = VarTable::default();
    let first = vars.push(VarKind::Local, ReturnType::Int);
    let second = vars.push(VarKind::Local, ReturnType::Int);

    let mut f = function(
        vars,
        vec![
            Statement::Declare(first, Some(GCode::Int(1))),
            Statement::Declare(second, Some(GCode::Binary(BinaryOp::Add, Box::new(GCode::Local(first)), int(1)))),
        ],
        None,
    );
    optimize(&mut f);

    assert!(f.body.is_empty());
}

#[test]
fn self_updates_do_not_keep_locals_alive() {
    let mut vars = VarTable::default();
    let counter = vars.push(VarKind::Local, ReturnType::Int);
    let bump = GCode::Binary(BinaryOp::Add, Box::new(GCode::Local(counter)), int(1));
    let condition = GCode::Compare(CompareOp::Greater, Box::new(GCode::Global { name: "g".into(), ty: ReturnType::Int }), int(0));
    let countdown = Statement::Assign(
        Target::Global("g".into()),
        GCode::Binary(BinaryOp::Subtract, Box::new(GCode::Global { name: "g".into(), ty: ReturnType::Int }), int(1)),
    );

    let mut f = function(
        vars,
        vec![
            Statement::Declare(counter, Some(GCode::Int(0))),
            Statement::While {
                condition_code: CodeBlock::new(),
                condition: condition.clone(),
                body: vec![Statement::Assign(Target::Local(counter), bump), countdown.clone()].into(),
            },
        ],
        None,
    );
    optimize(&mut f);

    assert_eq!(
        f.body.statements,
        vec![Statement::While { condition_code: CodeBlock::new(), condition, body: vec![countdown].into() }]
    );
}

#[test]
fn impure_self_updates_stay() {
    let mut vars = VarTable::default();
    let total = vars.push(VarKind::Local, ReturnType::Int);
    let update = Statement::Assign(
        Target::Local(total),
        GCode::Call {
            target: CallTarget::Function("add".into()),
            args: vec![GCode::Local(total)],
            ty: ReturnType::Int,
            effect: true,
        },
    );

    let body = vec![Statement::Declare(total, Some(GCode::Int(0))), update];
    let mut f = function(vars, body.clone(), None);
    optimize(&mut f);

    assert_eq!(f.body.statements, body);
}

#[test]
fn constant_branches_are_taken() {
    let write = |text: &str| Statement::Expression(GCode::effect("bibWriter.print", vec![GCode::Str(text.into())]));

    let mut block = CodeBlock::from(vec![
        Statement::If { condition: GCode::Int(1), then: vec![write("yes")].into(), otherwise: vec![write("no")].into() },
        Statement::If { condition: GCode::Int(0), then: vec![write("yes")].into(), otherwise: vec![write("no")].into() },
    ]);

    assert!(simplify_branches(&mut block));
    assert_eq!(block.statements, vec![write("yes"), write("no")]);
    assert!(!simplify_branches(&mut block));
}

#[test]
fn empty_branches_and_dead_loops_disappear() {
    let mut vars = VarTable::default();
    let param = vars.push(VarKind::Parameter { depth: 0 }, ReturnType::Int);

    let mut block = CodeBlock::from(vec![
        Statement::If { condition: GCode::Local(param), then: CodeBlock::new(), otherwise: CodeBlock::new() },
        Statement::While { condition_code: CodeBlock::new(), condition: GCode::Int(0), body: CodeBlock::new() },
    ]);

    assert!(simplify_branches(&mut block));
    assert!(block.is_empty());
}

#[test]
fn impure_conditions_stay() {
    let condition = GCode::Call { target: CallTarget::Function("check".into()), args: vec![], ty: ReturnType::Int, effect: true };
    let statement = Statement::If { condition, then: CodeBlock::new(), otherwise: CodeBlock::new() };

    let mut block = CodeBlock::from(vec![statement.clone()]);

    assert!(!simplify_branches(&mut block));
    assert_eq!(block.statements, vec![statement]);
}
