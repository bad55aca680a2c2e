//! Runtime evaluator for generated xorwow jump tables.
//!
//! Applies packed table entries to a state the same way generator code
//! consuming the emitted arrays does.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod apply;
mod runner;

pub use apply::{apply_matrix, apply_poly};
pub use runner::{JumpRuntime, RuntimeError, TableRunner};
