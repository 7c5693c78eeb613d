//! rillc-sem - Semantic Analysis
//!
//! Name resolution and call-arity checking over the AST. The analysis is
//! deliberately simple: one flat name set per function (blocks introduce
//! no scopes), and a program-wide `name → arity` table built in a first
//! pass so functions can call forward and mutually recurse.
//!
//! The driver runs the analysis twice. The first run happens before
//! desugaring, so it treats lambda bodies as opaque and checks pipe
//! right-hand sides with the piped argument counted. The second run sees
//! the desugared tree - no `Pipe`, `Repeat`, or `Lambda` nodes - and
//! applies the plain rules; that is where a free variable inside a former
//! lambda body surfaces, since the hoisted function's flat scope contains
//! only the lambda's own parameters.

mod edge_cases;

use indexmap::IndexMap;
use rillc_par::{
    Block, CallExpr, Decl, Expr, FunctionDecl, PipeExpr, Program, Stmt,
};
use rillc_util::{FxHashSet, Symbol};
use thiserror::Error;

/// Error raised when a program fails name or arity checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// Two functions (or externs) share a name.
    #[error("duplicate declaration of function '{name}'")]
    DuplicateFunction { name: String },

    /// A parameter name repeats in one parameter list.
    #[error("duplicate parameter '{param}' in function '{func}'")]
    DuplicateParam { param: String, func: String },

    /// A variable is referenced before any declaration reaches it.
    #[error("undefined variable: '{name}'")]
    UndefinedVariable { name: String },

    /// The target of an assignment was never declared.
    #[error("cannot assign to undefined variable: '{name}'")]
    AssignToUndefined { name: String },

    /// A call (or pipe) targets a name with no function declaration.
    #[error("undefined function: '{name}'")]
    UndefinedFunction { name: String },

    /// A call supplies the wrong number of arguments.
    #[error("arity mismatch for '{name}': expected {expected} arguments, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    /// A function name appears where a value is required.
    ///
    /// Every Rill value is an i64; there are no function values.
    #[error("function '{name}' used as a value")]
    FunctionAsValue { name: String },

    /// `let` at top level parses but has no runtime representation.
    #[error("global variables are not supported: '{name}'")]
    GlobalVariable { name: String },
}

/// The semantic analyzer.
///
/// Holds the program-wide arity table and the flat name set of the
/// function currently being checked. One instance checks one program;
/// the driver constructs a fresh instance for each run.
pub struct SemanticAnalyzer {
    /// `name → arity` for every function and extern, in declaration order
    functions: IndexMap<Symbol, usize>,

    /// Names visible in the function being checked (flat scope)
    scope: FxHashSet<Symbol>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            functions: IndexMap::new(),
            scope: FxHashSet::default(),
        }
    }

    /// Checks a whole program.
    ///
    /// Pass 1 collects every function and extern into the arity table
    /// (rejecting duplicates); pass 2 walks each function body.
    pub fn analyze(&mut self, program: &Program) -> Result<(), SemanticError> {
        for decl in &program.decls {
            match decl {
                Decl::Function(func) => self.declare(func.name, func.params.len())?,
                Decl::Extern(ext) => self.declare(ext.name, ext.params.len())?,
                Decl::Var(var) => {
                    return Err(SemanticError::GlobalVariable {
                        name: var.name.to_string(),
                    })
                }
            }
        }

        for decl in &program.decls {
            if let Decl::Function(func) = decl {
                self.check_function(func)?;
            }
        }
        Ok(())
    }

    fn declare(&mut self, name: Symbol, arity: usize) -> Result<(), SemanticError> {
        if self.functions.insert(name, arity).is_some() {
            return Err(SemanticError::DuplicateFunction {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn check_function(&mut self, func: &FunctionDecl) -> Result<(), SemanticError> {
        self.scope.clear();
        for &param in &func.params {
            if !self.scope.insert(param) {
                return Err(SemanticError::DuplicateParam {
                    param: param.to_string(),
                    func: func.name.to_string(),
                });
            }
        }
        self.check_block(&func.body)
    }

    fn check_block(&mut self, block: &Block) -> Result<(), SemanticError> {
        for stmt in &block.stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), SemanticError> {
        match stmt {
            Stmt::Var(var) => {
                // The initializer runs before the name becomes visible
                self.check_expr(&var.init)?;
                self.scope.insert(var.name);
                Ok(())
            }
            Stmt::Return(value) => self.check_expr(value),
            Stmt::Expr(expr) => self.check_expr(expr),
            Stmt::If(stmt) => {
                self.check_expr(&stmt.cond)?;
                self.check_block(&stmt.then_branch)?;
                if let Some(else_branch) = &stmt.else_branch {
                    self.check_block(else_branch)?;
                }
                Ok(())
            }
            Stmt::While(stmt) => {
                self.check_expr(&stmt.cond)?;
                self.check_block(&stmt.body)
            }
            Stmt::Repeat(stmt) => {
                self.check_expr(&stmt.count)?;
                self.check_block(&stmt.body)
            }
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<(), SemanticError> {
        match expr {
            Expr::Literal(_) => Ok(()),

            Expr::Variable(name) => {
                if self.scope.contains(name) {
                    Ok(())
                } else if self.functions.contains_key(name) {
                    Err(SemanticError::FunctionAsValue {
                        name: name.to_string(),
                    })
                } else {
                    Err(SemanticError::UndefinedVariable {
                        name: name.to_string(),
                    })
                }
            }

            Expr::Binary(binary) => {
                self.check_expr(&binary.left)?;
                self.check_expr(&binary.right)
            }

            Expr::Unary(unary) => self.check_expr(&unary.operand),

            Expr::Assign(assign) => {
                if !self.scope.contains(&assign.name) {
                    return Err(SemanticError::AssignToUndefined {
                        name: assign.name.to_string(),
                    });
                }
                self.check_expr(&assign.value)
            }

            Expr::Call(call) => self.check_call(call, 0),

            Expr::Pipe(pipe) => self.check_pipe(pipe, 0),

            // Opaque before desugaring; the hoisted function is checked
            // on the post-desugar run
            Expr::Lambda(_) => Ok(()),
        }
    }

    /// Checks a call, with `extra` arguments a surrounding pipe will
    /// prepend during desugaring.
    fn check_call(&mut self, call: &CallExpr, extra: usize) -> Result<(), SemanticError> {
        let Some(&expected) = self.functions.get(&call.callee) else {
            return Err(SemanticError::UndefinedFunction {
                name: call.callee.to_string(),
            });
        };

        let found = call.args.len() + extra;
        if found != expected {
            return Err(SemanticError::ArityMismatch {
                name: call.callee.to_string(),
                expected,
                found,
            });
        }

        for arg in &call.args {
            self.check_expr(arg)?;
        }
        Ok(())
    }

    /// Checks a pipe as the desugarer will rewrite it.
    ///
    /// `extra` counts arguments that outer pipes will prepend to the call
    /// this pipe ultimately becomes.
    fn check_pipe(&mut self, pipe: &PipeExpr, extra: usize) -> Result<(), SemanticError> {
        self.check_expr(&pipe.left)?;

        match pipe.right.as_ref() {
            Expr::Call(call) => self.check_call(call, extra + 1),

            Expr::Variable(name) => match self.functions.get(name) {
                Some(&expected) if expected == extra + 1 => Ok(()),
                Some(&expected) => Err(SemanticError::ArityMismatch {
                    name: name.to_string(),
                    expected,
                    found: extra + 1,
                }),
                None => Err(SemanticError::UndefinedFunction {
                    name: name.to_string(),
                }),
            },

            // A nested pipe becomes a call the outer pipe prepends into
            Expr::Pipe(inner) => self.check_pipe(inner, extra + 1),

            // Hoisted and re-checked after desugaring
            Expr::Lambda(_) => Ok(()),

            // Any other shape is the desugarer's error to report
            other => self.check_expr(other),
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a program with a fresh analyzer.
pub fn analyze(program: &Program) -> Result<(), SemanticError> {
    SemanticAnalyzer::new().analyze(program)
}
