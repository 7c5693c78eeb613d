//! rillc-gen - LLVM IR Code Generator
//!
//! Emits textual LLVM IR for a single module (target triple
//! `x86_64-pc-linux-gnu`), to be handed to an external `llc`/`opt` for
//! assembly and linking. Every value in the language is an `i64`;
//! comparison results are zero-extended back to `i64` so Booleans store
//! and compare like any other value.
//!
//! Mutable variables become `alloca` slots written with `store` and read
//! with `load`; LLVM's `mem2reg` pass can promote them to SSA registers
//! later. Structured control flow is linearised into labelled basic
//! blocks, each ending in exactly one terminator.

pub mod builder;
pub mod error;
pub mod llvm;


pub use builder::{BlockId, FunctionBuilder, Value};
pub use error::{CodeGenError, Result};
pub use llvm::{generate_ir, CodeGen};
