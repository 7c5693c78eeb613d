//! rillc-drv - Compiler Driver
//!
//! Composes the pipeline stages into the one-directional data flow:
//!
//! ```text
//! source → Lexer → tokens → Parser → AST → SemanticAnalyzer
//!        → Desugarer → SemanticAnalyzer (re-run) → ConstantFolder
//!        → CodeGen → IR text
//! ```
//!
//! The semantic analyzer runs twice. The first run checks the surface
//! program (with pipe-aware arity counting and opaque lambda bodies); the
//! second runs over the desugared tree, where hoisted lambdas are
//! ordinary functions, and catches free-variable references that were
//! invisible before lifting.
//!
//! Compilation either yields the complete IR text or a [`CompileError`]
//! tagged with the stage that rejected the program; no partial IR is ever
//! produced.
//!
//! # Example
//!
//! ```
//! let ir = rillc_drv::compile("func main() { return 0; }").unwrap();
//! assert!(ir.contains("define i64 @\"main\"()"));
//! ```

use thiserror::Error;

use rillc_gen::CodeGenError;
use rillc_lex::LexError;
use rillc_low::{DesugarError, FoldError};
use rillc_par::ParseError;
use rillc_sem::SemanticError;

/// Pipeline stage identifiers, as reported alongside errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Semantic,
    Desugar,
    Fold,
    CodeGen,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Lex => "Lex",
            Stage::Parse => "Parse",
            Stage::Semantic => "Semantic",
            Stage::Desugar => "Desugar",
            Stage::Fold => "Fold",
            Stage::CodeGen => "CodeGen",
        };
        f.write_str(name)
    }
}

/// Any stage's failure, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),

    #[error("semantic error: {0}")]
    Semantic(#[from] SemanticError),

    #[error("desugaring error: {0}")]
    Desugar(#[from] DesugarError),

    #[error("constant folding error: {0}")]
    Fold(#[from] FoldError),

    #[error("code generation error: {0}")]
    CodeGen(#[from] CodeGenError),
}

impl CompileError {
    /// The pipeline stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            CompileError::Lex(_) => Stage::Lex,
            CompileError::Parse(_) => Stage::Parse,
            CompileError::Semantic(_) => Stage::Semantic,
            CompileError::Desugar(_) => Stage::Desugar,
            CompileError::Fold(_) => Stage::Fold,
            CompileError::CodeGen(_) => Stage::CodeGen,
        }
    }
}

/// Compiles Rill source text to LLVM IR text.
///
/// Each invocation constructs fresh state; nothing is shared between
/// compilations.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = rillc_lex::tokenize(source)?;
    let program = rillc_par::Parser::new(tokens).parse()?;

    rillc_sem::analyze(&program)?;
    let program = rillc_low::desugar_program(program)?;
    // Re-run over the rewritten tree: hoisted lambdas are plain functions
    // now, so their bodies get the ordinary checks
    rillc_sem::analyze(&program)?;

    let program = rillc_low::fold_program(program)?;
    let ir = rillc_gen::generate_ir(&program)?;
    Ok(ir)
}
