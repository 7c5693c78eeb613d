//! Edge case tests for rillc-sem
