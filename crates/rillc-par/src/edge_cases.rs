//! Edge case tests for rillc-par
