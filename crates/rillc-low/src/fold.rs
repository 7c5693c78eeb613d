//! Constant folding - literal arithmetic reduction.
//!
//! A post-order rewrite: children fold first, then any `Binary` whose two
//! operands are literals collapses for the four arithmetic operators,
//! with two's-complement 64-bit wraparound mirroring LLVM's `add`/`sub`/
//! `mul`, and signed division truncating toward zero. A zero divisor is a
//! fold-time error.
//!
//! Comparison and logical operators are not folded: constant Booleans are
//! rare and folding them would complicate the value representation for no
//! measurable benefit. `Unary(NOT, …)` is left alone for the same reason;
//! `Unary(MINUS, Literal)` folds to the negated literal.

use rillc_par::{
    AssignExpr, BinOp, BinaryExpr, Block, CallExpr, Decl, Expr, FunctionDecl, IfStmt,
    LambdaExpr, PipeExpr, Program, RepeatStmt, Stmt, UnOp, UnaryExpr, VarDecl, WhileStmt,
};
use thiserror::Error;

/// Error raised when folding hits a constant division by zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FoldError {
    #[error("division by zero detected during constant folding")]
    DivisionByZero,
}

/// Folds every constant arithmetic expression in the program.
pub fn fold_program(program: Program) -> Result<Program, FoldError> {
    let decls = program
        .decls
        .into_iter()
        .map(|decl| match decl {
            Decl::Function(func) => Ok(Decl::Function(FunctionDecl {
                name: func.name,
                params: func.params,
                body: fold_block(func.body)?,
            })),
            Decl::Extern(ext) => Ok(Decl::Extern(ext)),
            Decl::Var(var) => Ok(Decl::Var(VarDecl {
                name: var.name,
                init: fold_expr(var.init)?,
            })),
        })
        .collect::<Result<_, _>>()?;
    Ok(Program { decls })
}

fn fold_block(block: Block) -> Result<Block, FoldError> {
    let stmts = block
        .stmts
        .into_iter()
        .map(fold_stmt)
        .collect::<Result<_, _>>()?;
    Ok(Block { stmts })
}

fn fold_stmt(stmt: Stmt) -> Result<Stmt, FoldError> {
    match stmt {
        Stmt::Var(var) => Ok(Stmt::Var(VarDecl {
            name: var.name,
            init: fold_expr(var.init)?,
        })),
        Stmt::Return(value) => Ok(Stmt::Return(fold_expr(value)?)),
        Stmt::Expr(expr) => Ok(Stmt::Expr(fold_expr(expr)?)),
        Stmt::If(stmt) => Ok(Stmt::If(IfStmt {
            cond: fold_expr(stmt.cond)?,
            then_branch: fold_block(stmt.then_branch)?,
            else_branch: stmt.else_branch.map(fold_block).transpose()?,
        })),
        Stmt::While(stmt) => Ok(Stmt::While(WhileStmt {
            cond: fold_expr(stmt.cond)?,
            body: fold_block(stmt.body)?,
        })),
        Stmt::Repeat(stmt) => Ok(Stmt::Repeat(RepeatStmt {
            count: fold_expr(stmt.count)?,
            body: fold_block(stmt.body)?,
        })),
    }
}

fn fold_expr(expr: Expr) -> Result<Expr, FoldError> {
    match expr {
        Expr::Literal(_) | Expr::Variable(_) => Ok(expr),

        Expr::Binary(binary) => {
            let left = fold_expr(*binary.left)?;
            let right = fold_expr(*binary.right)?;

            if let (Expr::Literal(a), Expr::Literal(b)) = (&left, &right) {
                if binary.op.is_arithmetic() {
                    return fold_arithmetic(*a, binary.op, *b).map(Expr::Literal);
                }
            }

            Ok(Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op: binary.op,
                right: Box::new(right),
            }))
        }

        Expr::Unary(unary) => {
            let operand = fold_expr(*unary.operand)?;
            if unary.op == UnOp::Neg {
                if let Expr::Literal(value) = operand {
                    return Ok(Expr::Literal(value.wrapping_neg()));
                }
            }
            Ok(Expr::Unary(UnaryExpr {
                op: unary.op,
                operand: Box::new(operand),
            }))
        }

        Expr::Assign(assign) => Ok(Expr::Assign(AssignExpr {
            name: assign.name,
            value: Box::new(fold_expr(*assign.value)?),
        })),

        Expr::Call(call) => Ok(Expr::Call(CallExpr {
            callee: call.callee,
            args: call
                .args
                .into_iter()
                .map(fold_expr)
                .collect::<Result<_, _>>()?,
        })),

        // The folder normally runs after desugaring, but stays total over
        // the full node set so it can also run standalone
        Expr::Pipe(pipe) => Ok(Expr::Pipe(PipeExpr {
            left: Box::new(fold_expr(*pipe.left)?),
            right: Box::new(fold_expr(*pipe.right)?),
        })),

        Expr::Lambda(lambda) => Ok(Expr::Lambda(LambdaExpr {
            params: lambda.params,
            body: Box::new(fold_expr(*lambda.body)?),
        })),
    }
}

fn fold_arithmetic(a: i64, op: BinOp, b: i64) -> Result<i64, FoldError> {
    match op {
        BinOp::Add => Ok(a.wrapping_add(b)),
        BinOp::Sub => Ok(a.wrapping_sub(b)),
        BinOp::Mul => Ok(a.wrapping_mul(b)),
        BinOp::Div => {
            if b == 0 {
                Err(FoldError::DivisionByZero)
            } else {
                Ok(a.wrapping_div(b))
            }
        }
        _ => unreachable!("fold_arithmetic called with non-arithmetic operator"),
    }
}
