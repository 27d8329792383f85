//! Simplifies analyzed functions.
//!
//! Three passes, repeated until none of them changes anything:
//!  - constant folding of arithmetic, concatenation, and comparisons,
//!  - removal of branches whose outcome is known,
//!  - removal of stores to locals that are never read.

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use crate::gcode::{BinaryOp, CodeBlock, CompareOp, GCode, GFunction, Statement, Target, VarId, VarKind, VarTable};

pub fn optimize(function: &mut GFunction) {
    for_each_expression_mut(&mut function.body, &mut fold);
    if let Some(result) = &mut function.result {
        fold(result);
    }

    loop {
        let mut changed = simplify_branches(&mut function.body);

        let reads = count_reads(&function.body, function.result.as_ref());
        changed |= eliminate_dead_stores(&mut function.body, &reads, &function.vars);

        if !changed {
            break;
        }
    }
}

/* Constant Folding */

/// Folds an expression bottom up.
pub fn fold(code: &mut GCode) {
    match code {
        GCode::Call { args, .. } => args.iter_mut().for_each(fold),
        GCode::Binary(_, left, right) | GCode::Compare(_, left, right) => {
            fold(left);
            fold(right);
        }
        _ => return,
    }

    if let Some(folded) = fold_node(code) {
        *code = folded;
    }
}

/// Folds one node whose children are already folded.
fn fold_node(code: &GCode) -> Option<GCode> {
    use GCode::{Binary, Compare, Int, Str};

    match code {
        Binary(BinaryOp::Add, left, right) => match (&**left, &**right) {
            (Int(a), Int(b)) => a.checked_add(*b).map(Int),
            _ => None,
        },
        Binary(BinaryOp::Subtract, left, right) => match (&**left, &**right) {
            (Int(a), Int(b)) => a.checked_sub(*b).map(Int),
            _ => None,
        },
        Binary(BinaryOp::Concat, left, right) => match (&**left, &**right) {
            (Str(a), Str(b)) => Some(Str(format!("{a}{b}"))),
            // (x + 'a') + 'b' is x + 'ab'
            (Binary(BinaryOp::Concat, inner, middle), Str(b)) => match &**middle {
                Str(a) => Some(Binary(BinaryOp::Concat, inner.clone(), Box::new(Str(format!("{a}{b}"))))),
                _ => None,
            },
            _ => None,
        },
        Compare(op, left, right) => {
            let result = match (op, &**left, &**right) {
                (CompareOp::Less, Int(a), Int(b)) => a < b,
                (CompareOp::Greater, Int(a), Int(b)) => a > b,
                (CompareOp::Equal, Int(a), Int(b)) => a == b,
                (CompareOp::Equal, Str(a), Str(b)) => a == b,
                _ => return None,
            };
            Some(Int(i32::from(result)))
        }
        _ => None,
    }
}

fn for_each_expression_mut(block: &mut CodeBlock, visit: &mut impl FnMut(&mut GCode)) {
    for statement in &mut block.statements {
        match statement {
            Statement::Expression(code) | Statement::Assign(_, code) | Statement::Declare(_, Some(code)) => visit(code),
            Statement::Declare(_, None) | Statement::Comment(_) => (),
            Statement::If { condition, then, otherwise } => {
                visit(condition);
                for_each_expression_mut(then, visit);
                for_each_expression_mut(otherwise, visit);
            }
            Statement::While { condition_code, condition, body } => {
                for_each_expression_mut(condition_code, visit);
                visit(condition);
                for_each_expression_mut(body, visit);
            }
            Statement::ForEntries { body, .. } => for_each_expression_mut(body, visit),
        }
    }
}

/* Trivial Branches */

/// Replaces `if`s with a constant condition by the branch taken, and drops `if`s and
/// `while`s that can never do anything. Returns whether anything changed.
pub fn simplify_branches(block: &mut CodeBlock) -> bool {
    let mut changed = false;

    for statement in std::mem::take(&mut block.statements) {
        match statement {
            Statement::If { condition: GCode::Int(value), then, otherwise } => {
                let mut taken = if value > 0 { then } else { otherwise };
                simplify_branches(&mut taken);
                block.statements.extend(taken.statements);
                changed = true;
            }
            Statement::If { condition, then, otherwise }
                if then.is_empty() && otherwise.is_empty() && condition.is_pure() =>
            {
                changed = true;
            }
            Statement::If { condition, mut then, mut otherwise } => {
                changed |= simplify_branches(&mut then);
                changed |= simplify_branches(&mut otherwise);
                block.push(Statement::If { condition, then, otherwise });
            }
            Statement::While { condition_code, condition: GCode::Int(value), .. }
                if condition_code.is_empty() && value <= 0 =>
            {
                changed = true;
            }
            Statement::While { mut condition_code, condition, mut body } => {
                changed |= simplify_branches(&mut condition_code);
                changed |= simplify_branches(&mut body);
                block.push(Statement::While { condition_code, condition, body });
            }
            Statement::ForEntries { reverse, mut body } => {
                changed |= simplify_branches(&mut body);
                block.push(Statement::ForEntries { reverse, body });
            }
            other => block.push(other),
        }
    }

    changed
}

/* Dead Stores */

/// Counts the reads of each local. A pure value stored into a local does not count as a
/// read of that same local, so `v1 = v1 + 1` alone keeps nothing alive.
fn count_reads(body: &CodeBlock, result: Option<&GCode>) -> HashMap<VarId, usize> {
    let mut reads = HashMap::new();

    count_block_reads(body, &mut reads);
    if let Some(result) = result {
        count_code_reads(result, None, &mut reads);
    }

    reads
}

fn count_block_reads(block: &CodeBlock, reads: &mut HashMap<VarId, usize>) {
    for statement in &block.statements {
        match statement {
            Statement::Expression(code) | Statement::Assign(Target::Global(_) | Target::EntryLocal(_), code) => {
                count_code_reads(code, None, reads);
            }
            Statement::Declare(id, Some(code)) | Statement::Assign(Target::Local(id), code) => {
                let own = code.is_pure().then_some(*id);
                count_code_reads(code, own, reads);
            }
            Statement::Declare(_, None) | Statement::Comment(_) => (),
            Statement::If { condition, then, otherwise } => {
                count_code_reads(condition, None, reads);
                count_block_reads(then, reads);
                count_block_reads(otherwise, reads);
            }
            Statement::While { condition_code, condition, body } => {
                count_block_reads(condition_code, reads);
                count_code_reads(condition, None, reads);
                count_block_reads(body, reads);
            }
            Statement::ForEntries { body, .. } => count_block_reads(body, reads),
        }
    }
}

fn count_code_reads(code: &GCode, skip: Option<VarId>, reads: &mut HashMap<VarId, usize>) {
    code.walk(&mut |node| {
        if let GCode::Local(id) = node {
            if Some(*id) != skip {
                *reads.entry(*id).or_insert(0) += 1;
            }
        }
    });
}

/// Drops declarations of and assignments to locals that are never read. A value with
/// an effect stays behind as an expression statement. Returns whether anything changed.
fn eliminate_dead_stores(block: &mut CodeBlock, reads: &HashMap<VarId, usize>, vars: &VarTable) -> bool {
    let is_dead = |id: &VarId| vars.get(*id).kind == VarKind::Local && !reads.contains_key(id);
    let mut changed = false;

    for statement in std::mem::take(&mut block.statements) {
        match statement {
            Statement::Declare(id, value) if is_dead(&id) => {
                changed = true;
                if let Some(value) = value.filter(|value| !value.is_pure()) {
                    block.push(Statement::Expression(value));
                }
            }
            Statement::Assign(Target::Local(id), value) if is_dead(&id) => {
                changed = true;
                if !value.is_pure() {
                    block.push(Statement::Expression(value));
                }
            }
            Statement::If { condition, mut then, mut otherwise } => {
                changed |= eliminate_dead_stores(&mut then, reads, vars);
                changed |= eliminate_dead_stores(&mut otherwise, reads, vars);
                block.push(Statement::If { condition, then, otherwise });
            }
            Statement::While { mut condition_code, condition, mut body } => {
                changed |= eliminate_dead_stores(&mut condition_code, reads, vars);
                changed |= eliminate_dead_stores(&mut body, reads, vars);
                block.push(Statement::While { condition_code, condition, body });
            }
            Statement::ForEntries { reverse, mut body } => {
                changed |= eliminate_dead_stores(&mut body, reads, vars);
                block.push(Statement::ForEntries { reverse, body });
            }
            other => block.push(other),
        }
    }

    changed
}
