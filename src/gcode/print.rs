//! Renders the code tree as Groovy.
//!
//! Expressions render to strings, parenthesized only where Groovy's precedence needs
//! it. Statements print line by line through a [`CodeWriter`], each line starting with
//! the indentation prefix the caller passes in.

use super::{BinaryOp, CallTarget, CodeBlock, CompareOp, GCode, GFunction, ReturnType, Statement, Target, VarTable};

use crate::error::GenerateError;
use crate::generate::CodeWriter;

pub(crate) const INDENT: &str = "    ";

/* Precedence levels, loosest binding first. */

const EQUALITY: u8 = 30;
const RELATIONAL: u8 = 40;
const ADDITIVE: u8 = 50;
const UNARY: u8 = 90;
const ATOM: u8 = 100;

/// Writes `value` as a single quoted Groovy string.
pub fn quote_string(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\'' => quoted.push_str("\\'"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            ch => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/* Expressions */

impl GCode {
    /// Renders the expression in value position.
    pub fn render(&self, vars: &VarTable) -> String {
        self.render_with_precedence(vars).0
    }

    fn render_with_precedence(&self, vars: &VarTable) -> (String, u8) {
        match self {
            GCode::Int(value) if *value < 0 => (value.to_string(), UNARY),
            GCode::Int(value) => (value.to_string(), ATOM),
            GCode::Str(value) | GCode::Quote(value) => (quote_string(value), ATOM),
            GCode::Local(id) => (vars.name(*id).to_string(), ATOM),
            GCode::Global { name, .. } => (name.clone(), ATOM),
            GCode::Field(name) => (format!("entry.field({})", quote_string(name)), ATOM),
            GCode::EntryLocal { name, ty } => {
                let getter = match ty {
                    ReturnType::Int => "localInt",
                    ReturnType::String => "localString",
                    ReturnType::Void | ReturnType::Generic => "local",
                };
                (format!("entry.{getter}({})", quote_string(name)), ATOM)
            }
            GCode::Entry => ("entry".to_string(), ATOM),
            GCode::Call { target, args, .. } => {
                let name = match target {
                    CallTarget::Function(name) => name.as_str(),
                    CallTarget::Runtime(name) => name,
                };
                let args = args.iter().map(|arg| arg.render(vars)).collect::<Vec<_>>().join(", ");
                (format!("{name}({args})"), ATOM)
            }
            GCode::Binary(op, left, right) => {
                let left = operand(left, vars, ADDITIVE, false);
                let right = operand(right, vars, ADDITIVE, *op == BinaryOp::Subtract);
                let symbol = match op {
                    BinaryOp::Add | BinaryOp::Concat => "+",
                    BinaryOp::Subtract => "-",
                };
                (format!("{left} {symbol} {right}"), ADDITIVE)
            }
            GCode::Compare(..) => (format!("({} ? 1 : 0)", render_condition(self, vars, false)), ATOM),
            GCode::Text(text, _) => (text.clone(), ATOM),
            GCode::Procedure(list) => (format!("null /* {} */", crate::ast::TokenAST::Block(list.clone())), ATOM),
        }
    }
}

/// Renders a child expression, parenthesized if it binds looser than `level`. With
/// `strict`, equal binding is parenthesized too.
fn operand(code: &GCode, vars: &VarTable, level: u8, strict: bool) -> String {
    let (text, precedence) = code.render_with_precedence(vars);

    if precedence < level || (strict && precedence == level) {
        format!("({text})")
    } else {
        text
    }
}

/// Renders an integer valued expression as a Groovy boolean: comparisons directly,
/// anything else as `> 0`. With `negate`, renders the opposite condition.
pub fn render_condition(code: &GCode, vars: &VarTable, negate: bool) -> String {
    match code {
        GCode::Compare(op, left, right) => {
            let symbol = match (op, negate) {
                (CompareOp::Less, false) => "<",
                (CompareOp::Less, true) => ">=",
                (CompareOp::Greater, false) => ">",
                (CompareOp::Greater, true) => "<=",
                (CompareOp::Equal, false) => "==",
                (CompareOp::Equal, true) => "!=",
            };
            let level = if *op == CompareOp::Equal { EQUALITY } else { RELATIONAL };
            let left = operand(left, vars, level + 1, false);
            let right = operand(right, vars, level + 1, false);
            format!("{left} {symbol} {right}")
        }
        code => {
            let value = operand(code, vars, RELATIONAL + 1, false);
            format!("{value} {} 0", if negate { "<=" } else { ">" })
        }
    }
}

/* Statements */

impl Statement {
    pub fn print(&self, out: &mut dyn CodeWriter, prefix: &str, vars: &VarTable) -> Result<(), GenerateError> {
        let inner = format!("{prefix}{INDENT}");

        match self {
            Statement::Expression(code) => out.write(&[prefix, &code.render(vars), "\n"]),
            Statement::Declare(id, init) => {
                out.write(&[prefix, vars.ty(*id).groovy(), " ", vars.name(*id)])?;
                match init {
                    Some(init) => out.write(&[" = ", &init.render(vars), "\n"]),
                    None => out.write(&["\n"]),
                }
            }
            Statement::Assign(Target::Local(id), value) => out.write(&[prefix, vars.name(*id), " = ", &value.render(vars), "\n"]),
            Statement::Assign(Target::Global(name), value) => out.write(&[prefix, name, " = ", &value.render(vars), "\n"]),
            Statement::Assign(Target::EntryLocal(name), value) => {
                out.write(&[prefix, "entry.setLocal(", &quote_string(name), ", ", &value.render(vars), ")\n"])
            }
            Statement::If { condition, then, otherwise } => {
                out.write(&[prefix])?;
                print_if(out, prefix, vars, condition, then, otherwise)
            }
            Statement::While { condition_code, condition, body } if condition_code.is_empty() => {
                out.write(&[prefix, "while (", &render_condition(condition, vars, false), ") {\n"])?;
                body.print(out, &inner, vars)?;
                out.write(&[prefix, "}\n"])
            }
            Statement::While { condition_code, condition, body } => {
                let innermost = format!("{inner}{INDENT}");

                out.write(&[prefix, "while (true) {\n"])?;
                condition_code.print(out, &inner, vars)?;
                out.write(&[&inner, "if (", &render_condition(condition, vars, true), ") {\n"])?;
                out.write(&[&innermost, "break\n"])?;
                out.write(&[&inner, "}\n"])?;
                body.print(out, &inner, vars)?;
                out.write(&[prefix, "}\n"])
            }
            Statement::ForEntries { reverse, body } => {
                let method = if *reverse { "reverseEach" } else { "each" };
                out.write(&[prefix, "bibDB.", method, " { entry ->\n"])?;
                body.print(out, &inner, vars)?;
                out.write(&[prefix, "}\n"])
            }
            Statement::Comment(text) => out.write(&[prefix, "// ", text, "\n"]),
        }
    }
}

/// Prints an `if` whose first line has already been indented, chaining `else if`.
fn print_if(
    out: &mut dyn CodeWriter,
    prefix: &str,
    vars: &VarTable,
    condition: &GCode,
    then: &CodeBlock,
    otherwise: &CodeBlock,
) -> Result<(), GenerateError> {
    let inner = format!("{prefix}{INDENT}");

    // An empty then branch reads better as the negated condition.
    if then.is_empty() && !otherwise.is_empty() {
        out.write(&["if (", &render_condition(condition, vars, true), ") {\n"])?;
        otherwise.print(out, &inner, vars)?;
        return out.write(&[prefix, "}\n"]);
    }

    out.write(&["if (", &render_condition(condition, vars, false), ") {\n"])?;
    then.print(out, &inner, vars)?;

    match &otherwise.statements[..] {
        [] => out.write(&[prefix, "}\n"]),
        [Statement::If { condition, then, otherwise }] if !then.is_empty() => {
            out.write(&[prefix, "} else "])?;
            print_if(out, prefix, vars, condition, then, otherwise)
        }
        _ => {
            out.write(&[prefix, "} else {\n"])?;
            otherwise.print(out, &inner, vars)?;
            out.write(&[prefix, "}\n"])
        }
    }
}

impl CodeBlock {
    pub fn print(&self, out: &mut dyn CodeWriter, prefix: &str, vars: &VarTable) -> Result<(), GenerateError> {
        for statement in &self.statements {
            statement.print(out, prefix, vars)?;
        }

        Ok(())
    }
}

/* Functions */

impl GFunction {
    pub fn print(&self, out: &mut dyn CodeWriter, prefix: &str) -> Result<(), GenerateError> {
        let mut params = vec![];
        if self.uses_entry {
            params.push("def entry".to_string());
        }
        for param in &self.params {
            params.push(format!("{} {}", self.vars.ty(*param).groovy(), self.vars.name(*param)));
        }

        out.write(&[prefix, self.return_type().groovy(), " ", &self.groovy_name, "(", &params.join(", "), ") {\n"])?;

        let inner = format!("{prefix}{INDENT}");
        self.body.print(out, &inner, &self.vars)?;
        if let Some(result) = &self.result {
            out.write(&[&inner, "return ", &result.render(&self.vars), "\n"])?;
        }

        out.write(&[prefix, "}\n"])
    }
}
