//! Error types for LLVM IR code generation
//!
//! This module defines error types for the rillc-gen crate, providing
//! proper error handling instead of panics.

use thiserror::Error;

/// Error type for IR code generation
///
/// Name errors here indicate a bug in an earlier stage (semantic analysis
/// guarantees every name is resolvable); `Internal` covers nodes the
/// desugarer is contracted to have removed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeGenError {
    /// Variable with no allocation slot
    #[error("unknown variable in code generation: '{0}'")]
    UnknownVariable(String),

    /// Call target with no declaration
    #[error("unknown function in code generation: '{0}'")]
    UnknownFunction(String),

    /// Internal error - indicates a bug
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for code generation operations
pub type Result<T> = std::result::Result<T, CodeGenError>;
