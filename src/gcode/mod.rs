//! The intermediate code tree that function bodies are partially evaluated into.
//!
//! [`GCode`] nodes are expressions. They are immutable values once built, and every
//! one that ever sits on the evaluation stack is free of side effects. Side effects
//! are [`Statements`](Statement), collected in order into [`CodeBlocks`](CodeBlock).
//! The whole tree renders itself as Groovy source (see `print.rs`).

mod print;

#[cfg(test)]
mod tests;

pub use print::{quote_string, render_condition};
pub(crate) use print::INDENT;

use std::fmt::Display;

use crate::ast::TokenListAST;

/* Types */

/// The static type of a value, as far as the generated code is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnType {
    /// No value at all. Only functions have this type.
    Void,
    Int,
    String,
    /// Not yet known. Groovy's `def`.
    Generic,
}

impl ReturnType {
    /// The Groovy type used to declare something of this type.
    pub fn groovy(self) -> &'static str {
        match self {
            ReturnType::Void => "void",
            ReturnType::Int => "int",
            ReturnType::String => "String",
            ReturnType::Generic => "def",
        }
    }

    /// Whether a value of type `self` may be used where `other` is expected.
    pub fn fits(self, other: ReturnType) -> bool {
        self == other || self == ReturnType::Generic || other == ReturnType::Generic
    }

    /// The more precise of two compatible types.
    pub fn unify(self, other: ReturnType) -> Option<ReturnType> {
        match (self, other) {
            (a, b) if a == b => Some(a),
            (ReturnType::Generic, other) | (other, ReturnType::Generic) => Some(other),
            _ => None,
        }
    }
}

impl Display for ReturnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ReturnType::Void => "VOID",
            ReturnType::Int => "INT",
            ReturnType::String => "STRING",
            ReturnType::Generic => "GENERIC",
        })
    }
}

/* Variables */

/// Identifies a parameter or local of the function being built. Indexes a [`VarTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// A value taken from the caller's stack. Depth 0 was the top of the caller's stack.
    Parameter { depth: usize },
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub kind: VarKind,
    pub ty: ReturnType,
    /// Unset until the variables of the function are named.
    pub name: Option<String>,
}

/// All the variables of one function, in allocation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarTable {
    vars: Vec<Variable>,
}

impl VarTable {
    pub fn push(&mut self, kind: VarKind, ty: ReturnType) -> VarId {
        self.vars.push(Variable { kind, ty, name: None });
        VarId(self.vars.len() - 1)
    }

    pub fn get(&self, id: VarId) -> &Variable {
        &self.vars[id.0]
    }

    pub fn get_mut(&mut self, id: VarId) -> &mut Variable {
        &mut self.vars[id.0]
    }

    pub fn name(&self, id: VarId) -> &str {
        self.get(id).name.as_deref().unwrap_or("_")
    }

    pub fn ty(&self, id: VarId) -> ReturnType {
        self.get(id).ty
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (VarId, &mut Variable)> {
        self.vars.iter_mut().enumerate().map(|(index, var)| (VarId(index), var))
    }
}

/* Expressions */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    /// String concatenation. Also `+` in Groovy.
    Concat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Less,
    Greater,
    Equal,
}

/// What a [`GCode::Call`] invokes.
#[derive(Debug, Clone, PartialEq)]
pub enum CallTarget {
    /// A function of the style, by its Groovy name.
    Function(String),
    /// A fixed method of the runtime or a helper, e.g. `bibWriter.print`.
    Runtime(&'static str),
}

/// An expression of the generated program.
#[derive(Debug, Clone, PartialEq)]
pub enum GCode {
    Int(i32),
    Str(String),
    /// `'name`. Only ever a primitive operand, never printed as a value.
    Quote(String),
    Local(VarId),
    /// A field of the style class, by Groovy name.
    Global { name: String, ty: ReturnType },
    /// A database field of the current entry, by BST name.
    Field(String),
    /// A per entry variable of the current entry, by BST name.
    EntryLocal { name: String, ty: ReturnType },
    /// The current entry itself.
    Entry,
    Call { target: CallTarget, args: Vec<GCode>, ty: ReturnType, effect: bool },
    Binary(BinaryOp, Box<GCode>, Box<GCode>),
    /// A comparison. Its value is 1 or 0.
    Compare(CompareOp, Box<GCode>, Box<GCode>),
    /// Groovy text that is printed as is.
    Text(String, ReturnType),
    /// A brace list that has not been evaluated yet.
    Procedure(TokenListAST),
}

impl GCode {
    pub fn call(target: &'static str, args: Vec<GCode>, ty: ReturnType) -> GCode {
        GCode::Call { target: CallTarget::Runtime(target), args, ty, effect: false }
    }

    pub fn effect(target: &'static str, args: Vec<GCode>) -> GCode {
        GCode::Call { target: CallTarget::Runtime(target), args, ty: ReturnType::Void, effect: true }
    }

    pub fn ty(&self, vars: &VarTable) -> ReturnType {
        match self {
            GCode::Int(_) | GCode::Compare(..) => ReturnType::Int,
            GCode::Str(_) | GCode::Field(_) => ReturnType::String,
            GCode::Local(id) => vars.ty(*id),
            GCode::Global { ty, .. } | GCode::EntryLocal { ty, .. } | GCode::Call { ty, .. } | GCode::Text(_, ty) => *ty,
            GCode::Binary(BinaryOp::Concat, ..) => ReturnType::String,
            GCode::Binary(..) => ReturnType::Int,
            GCode::Quote(_) | GCode::Entry | GCode::Procedure(_) => ReturnType::Generic,
        }
    }

    /// Procedures and quotes only exist on the stack. They are never values of the output.
    pub fn is_value(&self) -> bool {
        !matches!(self, GCode::Procedure(_) | GCode::Quote(_))
    }

    /// False if evaluating the expression could change anything.
    pub fn is_pure(&self) -> bool {
        match self {
            GCode::Call { effect: true, .. } => false,
            GCode::Call { args, .. } => args.iter().all(GCode::is_pure),
            GCode::Binary(_, left, right) | GCode::Compare(_, left, right) => left.is_pure() && right.is_pure(),
            _ => true,
        }
    }

    /// Calls `visit` on this node and every node below it.
    pub fn walk(&self, visit: &mut impl FnMut(&GCode)) {
        visit(self);
        match self {
            GCode::Call { args, .. } => args.iter().for_each(|arg| arg.walk(visit)),
            GCode::Binary(_, left, right) | GCode::Compare(_, left, right) => {
                left.walk(visit);
                right.walk(visit);
            }
            _ => (),
        }
    }

    fn any(&self, mut predicate: impl FnMut(&GCode) -> bool) -> bool {
        let mut found = false;
        self.walk(&mut |node| found |= predicate(node));
        found
    }

    /// Whether the value could change if `target` were assigned.
    pub fn reads(&self, target: &Target) -> bool {
        self.any(|node| match (node, target) {
            (GCode::Local(id), Target::Local(other)) => id == other,
            (GCode::Global { name, .. }, Target::Global(other)) => name == other,
            (GCode::EntryLocal { name, .. }, Target::EntryLocal(other)) => name == other,
            _ => false,
        })
    }

    /// Whether the value could change if a style function ran.
    pub fn reads_state(&self) -> bool {
        self.any(|node| matches!(node, GCode::Global { .. } | GCode::EntryLocal { .. }))
    }
}

/* Statements */

/// Something that can be assigned to.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Local(VarId),
    /// A field of the style class, by Groovy name.
    Global(String),
    /// A per entry variable, by BST name.
    EntryLocal(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression evaluated for its effect.
    Expression(GCode),
    /// Declares a local, optionally with an initial value.
    Declare(VarId, Option<GCode>),
    Assign(Target, GCode),
    If { condition: GCode, then: CodeBlock, otherwise: CodeBlock },
    /// `condition_code` runs before every test of `condition`.
    While { condition_code: CodeBlock, condition: GCode, body: CodeBlock },
    /// Runs the body once per entry, with `entry` bound.
    ForEntries { reverse: bool, body: CodeBlock },
    Comment(String),
}

/// A list of statements, run in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeBlock {
    pub statements: Vec<Statement>,
}

impl CodeBlock {
    pub fn new() -> Self {
        CodeBlock { statements: vec![] }
    }

    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl From<Vec<Statement>> for CodeBlock {
    fn from(statements: Vec<Statement>) -> Self {
        CodeBlock { statements }
    }
}

/* Functions */

/// A fully analyzed BST function.
#[derive(Debug, Clone, PartialEq)]
pub struct GFunction {
    /// The BST name.
    pub name: String,
    pub groovy_name: String,
    /// In signature order, i.e. the deepest stack value first.
    pub params: Vec<VarId>,
    /// Whether the function takes the current entry as its first argument.
    pub uses_entry: bool,
    pub body: CodeBlock,
    pub result: Option<GCode>,
    pub vars: VarTable,
}

impl GFunction {
    pub fn return_type(&self) -> ReturnType {
        self.result.as_ref().map_or(ReturnType::Void, |result| result.ty(&self.vars))
    }

    pub fn signature(&self) -> FunctionSignature {
        FunctionSignature {
            groovy_name: self.groovy_name.clone(),
            params: self.params.iter().map(|param| self.vars.ty(*param)).collect(),
            uses_entry: self.uses_entry,
            result: self.return_type(),
        }
    }
}

/// What callers need to know about a [`GFunction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub groovy_name: String,
    pub params: Vec<ReturnType>,
    pub uses_entry: bool,
    pub result: ReturnType,
}

impl FunctionSignature {
    /// Functions that can be called through `call.type$` for an entry type.
    pub fn is_type_handler(&self) -> bool {
        self.result == ReturnType::Void && self.uses_entry && self.params.is_empty()
    }
}
