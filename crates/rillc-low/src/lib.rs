//! rillc-low - AST Lowering Passes
//!
//! The two AST-to-AST rewrites that run between semantic analysis and
//! code generation:
//!
//! - [`desugar::desugar_program`] eliminates pipe expressions, counted
//!   repeat loops, and anonymous functions in a single traversal.
//! - [`fold::fold_program`] collapses arithmetic over integer literals.
//!
//! Both passes consume the tree and return a replacement root; no node is
//! shared between the input and the output.

pub mod desugar;
pub mod fold;

pub use desugar::{desugar_program, DesugarError};
pub use fold::{fold_program, FoldError};
