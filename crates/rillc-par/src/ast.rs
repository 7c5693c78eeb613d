//! rillc-par - AST Node Definitions
//!
//! This module contains all AST node definitions used by the parser and
//! every later pipeline stage. Two disjoint families (expressions and
//! statements) plus top-level declarations and the `Program` root. Every
//! node is owned by its parent; passes consume a tree and return a
//! replacement root.

use rillc_util::Symbol;

/// AST root - an ordered sequence of top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub decls: Vec<Decl>,
}

/// Top-level declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// Function definition
    Function(FunctionDecl),

    /// External function declaration (host-supplied runtime)
    Extern(ExternDecl),

    /// Top-level variable declaration
    Var(VarDecl),
}

/// Function definition
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub body: Block,
}

/// External function declaration
///
/// Only the signature; the body is supplied by the host runtime at link
/// time.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternDecl {
    pub name: Symbol,
    pub params: Vec<Symbol>,
}

/// Variable declaration (`let NAME = expr;`)
///
/// Valid both as a statement and at top level.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Symbol,
    pub init: Expr,
}

/// Statement block - a possibly-empty, ordered list of statements
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Variable declaration
    Var(VarDecl),

    /// `return expr;`
    Return(Expr),

    /// Bare expression followed by `;`
    Expr(Expr),

    /// `if (cond) { … } else { … }`
    If(IfStmt),

    /// `while (cond) { … }`
    While(WhileStmt),

    /// `repeat (count) { … }` - removed by the desugarer
    Repeat(RepeatStmt),
}

/// If statement
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Block,
    pub else_branch: Option<Block>,
}

/// While loop
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
}

/// Counted repeat loop
///
/// Surface syntax only; the desugarer rewrites it into a counter
/// declaration plus a while loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    pub count: Expr,
    pub body: Block,
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal
    Literal(i64),

    /// Variable reference
    Variable(Symbol),

    /// Binary operation
    Binary(BinaryExpr),

    /// Unary operation (prefix `-` or `!`)
    Unary(UnaryExpr),

    /// Pipe composition - removed by the desugarer
    Pipe(PipeExpr),

    /// Assignment to a simple identifier
    Assign(AssignExpr),

    /// Function call; the callee is always a bare identifier
    Call(CallExpr),

    /// Anonymous function - removed by the desugarer
    Lambda(LambdaExpr),
}

/// Binary expression
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: BinOp,
    pub right: Box<Expr>,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinOp {
    /// True for `+ - * /`, the operators the constant folder evaluates
    pub fn is_arithmetic(self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div)
    }

    /// True for the six relational operators
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge
        )
    }
}

/// Unary expression
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnOp,
    pub operand: Box<Expr>,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

/// Pipe expression
///
/// Right-associative: `a |> b |> c` parses as `Pipe(a, Pipe(b, c))`.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeExpr {
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// Assignment expression
///
/// The left side is always a simple identifier; the expression's value is
/// the assigned value.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub name: Symbol,
    pub value: Box<Expr>,
}

/// Function call expression
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Symbol,
    pub args: Vec<Expr>,
}

/// Lambda expression
///
/// Lambdas capture nothing; the desugarer hoists each one to a top-level
/// function and replaces the site with a reference to the fresh name.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub params: Vec<Symbol>,
    pub body: Box<Expr>,
}
