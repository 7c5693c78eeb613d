//! The AST-to-IR walker.
//!
//! Module assembly: externs become `declare` lines in source order, every
//! function signature is registered before any body is emitted (mutual
//! recursion needs no forward references in textual IR, but call sites do
//! need the arity table), then each function body is emitted in source
//! order with hoisted lambdas trailing, as the desugarer left them.

use indexmap::IndexMap;
use rillc_par::{
    BinOp, Block, CallExpr, Decl, Expr, FunctionDecl, Program, Stmt, UnOp,
};
use rillc_util::{FxHashMap, Symbol};

use crate::builder::{FunctionBuilder, Value};
use crate::error::{CodeGenError, Result};

/// Module name stamped into the IR header.
const MODULE_NAME: &str = "main_module";

/// Target triple for the emitted module.
const TARGET_TRIPLE: &str = "x86_64-pc-linux-gnu";

/// The IR code generator.
///
/// Holds the module-wide function table and, while a body is being
/// emitted, the per-function symbol table mapping each variable to its
/// stack slot.
pub struct CodeGen {
    /// `name → arity` for every declared function, in declaration order
    functions: IndexMap<Symbol, usize>,

    /// Allocation slot for each variable of the current function
    symtab: FxHashMap<Symbol, Value>,
}

impl CodeGen {
    pub fn new() -> Self {
        Self {
            functions: IndexMap::new(),
            symtab: FxHashMap::default(),
        }
    }

    /// Emits the whole module as IR text.
    pub fn generate(&mut self, program: &Program) -> Result<String> {
        // Register every signature up front: bodies may call forward
        for decl in &program.decls {
            match decl {
                Decl::Function(func) => {
                    self.functions.insert(func.name, func.params.len());
                }
                Decl::Extern(ext) => {
                    self.functions.insert(ext.name, ext.params.len());
                }
                Decl::Var(var) => {
                    return Err(CodeGenError::Internal(format!(
                        "top-level variable '{}' reached code generation",
                        var.name
                    )))
                }
            }
        }

        let mut out = String::new();
        out.push_str(&format!("; ModuleID = \"{}\"\n", MODULE_NAME));
        out.push_str(&format!("target triple = \"{}\"\n", TARGET_TRIPLE));

        for decl in &program.decls {
            if let Decl::Extern(ext) = decl {
                out.push('\n');
                out.push_str(&declare_extern(ext.name, ext.params.len()));
            }
        }

        for decl in &program.decls {
            if let Decl::Function(func) = decl {
                out.push('\n');
                out.push_str(&self.gen_function(func)?);
            }
        }

        Ok(out)
    }

    /// Emits one function definition.
    fn gen_function(&mut self, func: &FunctionDecl) -> Result<String> {
        let params: Vec<&str> = func.params.iter().map(|p| p.as_str()).collect();
        let mut b = FunctionBuilder::new(func.name.as_str(), &params);

        let entry = b.append_block("entry");
        b.position_at_end(entry);

        // One stack slot per parameter, storing the incoming argument
        self.symtab.clear();
        let args = b.param_values();
        for (&param, arg) in func.params.iter().zip(&args) {
            let slot = b.alloca(param.as_str());
            b.store(arg, &slot);
            self.symtab.insert(param, slot);
        }

        self.gen_block(&mut b, &func.body)?;

        // Implicit return for functions that fall off the end
        if !b.is_terminated() {
            b.ret(&Value::Const(0));
        }

        Ok(b.finish())
    }

    /// Emits a statement list, stopping once the block is terminated.
    fn gen_block(&mut self, b: &mut FunctionBuilder, block: &Block) -> Result<()> {
        for stmt in &block.stmts {
            self.gen_stmt(b, stmt)?;
            if b.is_terminated() {
                break;
            }
        }
        Ok(())
    }

    fn gen_stmt(&mut self, b: &mut FunctionBuilder, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Var(var) => {
                let value = self.gen_expr(b, &var.init)?;
                let slot = b.alloca(var.name.as_str());
                b.store(&value, &slot);
                self.symtab.insert(var.name, slot);
                Ok(())
            }

            Stmt::Return(value) => {
                let value = self.gen_expr(b, value)?;
                b.ret(&value);
                Ok(())
            }

            Stmt::Expr(expr) => {
                self.gen_expr(b, expr)?;
                Ok(())
            }

            Stmt::If(stmt) => {
                let cond = self.gen_expr(b, &stmt.cond)?;
                let cond_bool = b.icmp("ne", &cond, &Value::Const(0), "cond");

                // Block layout: then, optional else, if_cont
                let then_block = b.append_block("then");
                let else_block = stmt.else_branch.as_ref().map(|_| b.append_block("else"));
                let merge_block = b.append_block("if_cont");

                b.cond_branch(&cond_bool, then_block, else_block.unwrap_or(merge_block));

                b.position_at_end(then_block);
                self.gen_block(b, &stmt.then_branch)?;
                if !b.is_terminated() {
                    b.branch(merge_block);
                }

                if let (Some(else_block), Some(else_branch)) =
                    (else_block, &stmt.else_branch)
                {
                    b.position_at_end(else_block);
                    self.gen_block(b, else_branch)?;
                    if !b.is_terminated() {
                        b.branch(merge_block);
                    }
                }

                b.position_at_end(merge_block);
                Ok(())
            }

            Stmt::While(stmt) => {
                let cond_block = b.append_block("while_cond");
                let body_block = b.append_block("while_body");
                let after_block = b.append_block("while_after");

                // Fall through into the condition check
                b.branch(cond_block);

                b.position_at_end(cond_block);
                let cond = self.gen_expr(b, &stmt.cond)?;
                let cond_bool = b.icmp("ne", &cond, &Value::Const(0), "cond");
                b.cond_branch(&cond_bool, body_block, after_block);

                b.position_at_end(body_block);
                self.gen_block(b, &stmt.body)?;
                if !b.is_terminated() {
                    b.branch(cond_block);
                }

                b.position_at_end(after_block);
                Ok(())
            }

            Stmt::Repeat(_) => Err(CodeGenError::Internal(
                "repeat statement survived desugaring".to_string(),
            )),
        }
    }

    fn gen_expr(&mut self, b: &mut FunctionBuilder, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(value) => Ok(Value::Const(*value)),

            Expr::Variable(name) => {
                let slot = self
                    .symtab
                    .get(name)
                    .cloned()
                    .ok_or_else(|| CodeGenError::UnknownVariable(name.to_string()))?;
                Ok(b.load(&slot, name.as_str()))
            }

            Expr::Assign(assign) => {
                let value = self.gen_expr(b, &assign.value)?;
                let slot = self
                    .symtab
                    .get(&assign.name)
                    .cloned()
                    .ok_or_else(|| CodeGenError::UnknownVariable(assign.name.to_string()))?;
                b.store(&value, &slot);
                // The assignment's value is the stored value
                Ok(value)
            }

            Expr::Binary(binary) => {
                let lhs = self.gen_expr(b, &binary.left)?;
                let rhs = self.gen_expr(b, &binary.right)?;
                Ok(self.gen_binary_op(b, binary.op, &lhs, &rhs))
            }

            Expr::Unary(unary) => {
                let operand = self.gen_expr(b, &unary.operand)?;
                match unary.op {
                    // 0 - e
                    UnOp::Neg => Ok(b.binary("sub", &Value::Const(0), &operand, "negtmp")),
                    // (e == 0) zero-extended
                    UnOp::Not => {
                        let is_zero = b.icmp("eq", &operand, &Value::Const(0), "cmptmp");
                        Ok(b.zext(&is_zero, "nottmp"))
                    }
                }
            }

            Expr::Call(call) => self.gen_call(b, call),

            Expr::Pipe(_) => Err(CodeGenError::Internal(
                "pipe expression survived desugaring".to_string(),
            )),

            Expr::Lambda(_) => Err(CodeGenError::Internal(
                "lambda expression survived desugaring".to_string(),
            )),
        }
    }

    fn gen_binary_op(
        &mut self,
        b: &mut FunctionBuilder,
        op: BinOp,
        lhs: &Value,
        rhs: &Value,
    ) -> Value {
        match op {
            BinOp::Add => b.binary("add", lhs, rhs, "addtmp"),
            BinOp::Sub => b.binary("sub", lhs, rhs, "subtmp"),
            BinOp::Mul => b.binary("mul", lhs, rhs, "multmp"),
            BinOp::Div => b.binary("sdiv", lhs, rhs, "divtmp"),

            // Signed comparison, zero-extended so the i1 stores like any
            // other value
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                let cond = match op {
                    BinOp::Eq => "eq",
                    BinOp::Ne => "ne",
                    BinOp::Lt => "slt",
                    BinOp::Gt => "sgt",
                    BinOp::Le => "sle",
                    BinOp::Ge => "sge",
                    _ => unreachable!(),
                };
                let cmp = b.icmp(cond, lhs, rhs, "cmptmp");
                b.zext(&cmp, "bool_cast")
            }

            // Bitwise over i64, not short-circuit: both operands are
            // always evaluated
            BinOp::And => b.binary("and", lhs, rhs, "andtmp"),
            BinOp::Or => b.binary("or", lhs, rhs, "ortmp"),
        }
    }

    fn gen_call(&mut self, b: &mut FunctionBuilder, call: &CallExpr) -> Result<Value> {
        if !self.functions.contains_key(&call.callee) {
            return Err(CodeGenError::UnknownFunction(call.callee.to_string()));
        }

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.gen_expr(b, arg)?);
        }
        Ok(b.call(call.callee.as_str(), &args, "calltmp"))
    }
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

/// `declare i64 @"name"(i64 %".1", i64 %".2", …)`
fn declare_extern(name: Symbol, arity: usize) -> String {
    let params: Vec<String> = (1..=arity).map(|i| format!("i64 %\".{}\"", i)).collect();
    format!("declare i64 @\"{}\"({})\n", name, params.join(", "))
}

/// Emits IR text for a program with a fresh generator.
pub fn generate_ir(program: &Program) -> Result<String> {
    CodeGen::new().generate(program)
}
