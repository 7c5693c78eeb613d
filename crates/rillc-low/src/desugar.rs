//! Desugaring - pipe rewriting, repeat-to-while, lambda lifting.
//!
//! One traversal performs all three rewrites, bottom-up over expression
//! children so that nested constructs are already in primitive form when
//! their parent is rewritten:
//!
//! - `Pipe(L, Call(f, args))` becomes `Call(f, [L, …args])`; `Pipe(L,
//!   Variable(f))` becomes `Call(f, [L])`; any other right-hand shape is
//!   an error.
//! - `Repeat(count, body)` becomes a fresh counter declaration plus a
//!   while loop whose condition embeds the visited count expression, so
//!   the count is re-evaluated on every iteration exactly as written.
//! - Each `Lambda(params, body)` is hoisted to a fresh top-level function
//!   returning its body, and the site becomes a reference to the fresh
//!   name.
//!
//! A single monotonic counter feeds both name families, so
//! `__repeat_counter_N` and `__lambda_N` never collide within one
//! compilation unit.

use rillc_par::{
    AssignExpr, BinOp, BinaryExpr, Block, CallExpr, Decl, Expr, FunctionDecl, IfStmt,
    Program, Stmt, UnaryExpr, VarDecl, WhileStmt,
};
use rillc_util::Symbol;
use thiserror::Error;

/// Error raised when a pipe has a right-hand side that cannot become a
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesugarError {
    #[error("invalid right-hand side of '|>': expected a function or call, found {found}")]
    InvalidPipeTarget { found: &'static str },
}

/// Rewrites a program into its primitive form.
///
/// After this pass the tree contains no `Pipe`, `Repeat`, or `Lambda`
/// node. Hoisted lambda functions are appended to the declaration list in
/// the order their sites were visited.
pub fn desugar_program(program: Program) -> Result<Program, DesugarError> {
    Desugarer::new().run(program)
}

struct Desugarer {
    /// Shared fresh-name counter for repeat counters and lambda names
    counter: u32,

    /// Functions hoisted out of lambda sites, in visit order
    lifted: Vec<FunctionDecl>,
}

impl Desugarer {
    fn new() -> Self {
        Self {
            counter: 0,
            lifted: Vec::new(),
        }
    }

    fn run(mut self, program: Program) -> Result<Program, DesugarError> {
        let mut decls = Vec::with_capacity(program.decls.len());
        for decl in program.decls {
            let decl = match decl {
                Decl::Function(func) => Decl::Function(FunctionDecl {
                    name: func.name,
                    params: func.params,
                    body: self.desugar_block(func.body)?,
                }),
                Decl::Extern(ext) => Decl::Extern(ext),
                Decl::Var(var) => Decl::Var(VarDecl {
                    name: var.name,
                    init: self.desugar_expr(var.init)?,
                }),
            };
            decls.push(decl);
        }
        decls.extend(std::mem::take(&mut self.lifted).into_iter().map(Decl::Function));
        Ok(Program { decls })
    }

    fn fresh_name(&mut self, prefix: &str) -> Symbol {
        let name = Symbol::intern(&format!("{}{}", prefix, self.counter));
        self.counter += 1;
        name
    }

    /// Rewrites a block, splicing list-valued statement results.
    ///
    /// Repeat produces two statements in place of one, so statement
    /// results are vectors that get spliced into the enclosing list.
    fn desugar_block(&mut self, block: Block) -> Result<Block, DesugarError> {
        let mut stmts = Vec::with_capacity(block.stmts.len());
        for stmt in block.stmts {
            stmts.extend(self.desugar_stmt(stmt)?);
        }
        Ok(Block { stmts })
    }

    fn desugar_stmt(&mut self, stmt: Stmt) -> Result<Vec<Stmt>, DesugarError> {
        match stmt {
            Stmt::Var(var) => Ok(vec![Stmt::Var(VarDecl {
                name: var.name,
                init: self.desugar_expr(var.init)?,
            })]),

            Stmt::Return(value) => Ok(vec![Stmt::Return(self.desugar_expr(value)?)]),

            Stmt::Expr(expr) => Ok(vec![Stmt::Expr(self.desugar_expr(expr)?)]),

            Stmt::If(stmt) => Ok(vec![Stmt::If(IfStmt {
                cond: self.desugar_expr(stmt.cond)?,
                then_branch: self.desugar_block(stmt.then_branch)?,
                else_branch: stmt
                    .else_branch
                    .map(|block| self.desugar_block(block))
                    .transpose()?,
            })]),

            Stmt::While(stmt) => Ok(vec![Stmt::While(WhileStmt {
                cond: self.desugar_expr(stmt.cond)?,
                body: self.desugar_block(stmt.body)?,
            })]),

            Stmt::Repeat(stmt) => {
                let counter = self.fresh_name("__repeat_counter_");

                // let __repeat_counter_N = 0;
                let init = Stmt::Var(VarDecl {
                    name: counter,
                    init: Expr::Literal(0),
                });

                // The visited count sits directly in the condition, so it
                // is re-evaluated on every iteration
                let cond = Expr::Binary(BinaryExpr {
                    left: Box::new(Expr::Variable(counter)),
                    op: BinOp::Lt,
                    right: Box::new(self.desugar_expr(stmt.count)?),
                });

                // __repeat_counter_N = __repeat_counter_N + 1;
                let increment = Stmt::Expr(Expr::Assign(AssignExpr {
                    name: counter,
                    value: Box::new(Expr::Binary(BinaryExpr {
                        left: Box::new(Expr::Variable(counter)),
                        op: BinOp::Add,
                        right: Box::new(Expr::Literal(1)),
                    })),
                }));

                let mut body = self.desugar_block(stmt.body)?;
                body.stmts.push(increment);

                Ok(vec![init, Stmt::While(WhileStmt { cond, body })])
            }
        }
    }

    fn desugar_expr(&mut self, expr: Expr) -> Result<Expr, DesugarError> {
        match expr {
            Expr::Literal(_) | Expr::Variable(_) => Ok(expr),

            Expr::Binary(binary) => Ok(Expr::Binary(BinaryExpr {
                left: Box::new(self.desugar_expr(*binary.left)?),
                op: binary.op,
                right: Box::new(self.desugar_expr(*binary.right)?),
            })),

            Expr::Unary(unary) => Ok(Expr::Unary(UnaryExpr {
                op: unary.op,
                operand: Box::new(self.desugar_expr(*unary.operand)?),
            })),

            Expr::Assign(assign) => Ok(Expr::Assign(AssignExpr {
                name: assign.name,
                value: Box::new(self.desugar_expr(*assign.value)?),
            })),

            Expr::Call(call) => Ok(Expr::Call(CallExpr {
                callee: call.callee,
                args: call
                    .args
                    .into_iter()
                    .map(|arg| self.desugar_expr(arg))
                    .collect::<Result<_, _>>()?,
            })),

            Expr::Pipe(pipe) => {
                // Children first: a lambda or nested pipe on the right is
                // already a call or variable by the time we look at it
                let left = self.desugar_expr(*pipe.left)?;
                let right = self.desugar_expr(*pipe.right)?;

                match right {
                    Expr::Call(mut call) => {
                        call.args.insert(0, left);
                        Ok(Expr::Call(call))
                    }
                    Expr::Variable(name) => Ok(Expr::Call(CallExpr {
                        callee: name,
                        args: vec![left],
                    })),
                    other => Err(DesugarError::InvalidPipeTarget {
                        found: expr_kind(&other),
                    }),
                }
            }

            Expr::Lambda(lambda) => {
                // Name first, then the body: nested lambdas inside the
                // body get later numbers but are appended earlier
                let name = self.fresh_name("__lambda_");
                let body = self.desugar_expr(*lambda.body)?;
                self.lifted.push(FunctionDecl {
                    name,
                    params: lambda.params,
                    body: Block {
                        stmts: vec![Stmt::Return(body)],
                    },
                });
                Ok(Expr::Variable(name))
            }
        }
    }
}

/// Human-readable node kind for pipe diagnostics.
fn expr_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Literal(_) => "a literal",
        Expr::Variable(_) => "a variable",
        Expr::Binary(_) => "a binary expression",
        Expr::Unary(_) => "a unary expression",
        Expr::Pipe(_) => "a pipe expression",
        Expr::Assign(_) => "an assignment",
        Expr::Call(_) => "a call",
        Expr::Lambda(_) => "a lambda",
    }
}
