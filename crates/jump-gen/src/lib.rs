//! Jump-ahead constants for the xorwow generator.
//!
//! This crate builds the GF(2) transition matrix `T` of the xorwow
//! recurrence and derives two interchangeable jump representations for a
//! geometric sequence of distances `d`:
//! - packed matrix powers `T^d`;
//! - jump polynomials `z^d mod p(z)`, where `p` is the characteristic
//!   polynomial of `T`.
//!
//! Both are rendered as C array initializers for embedding in generator code.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod artifact;
mod charpoly;
mod emit;
mod error;
mod generator;
mod jump;
mod matrix;
mod packed;
mod poly;
mod transition;

pub use artifact::{JumpArtifact, JumpEntries, JumpTable, ARTIFACT_VERSION};
pub use charpoly::{characteristic_polynomial, check_invertible, hessenberg};
pub use emit::{render_artifact, render_table, write_artifact};
pub use error::JumpError;
pub use generator::{
    Generator, GeneratorConfig, NamedSequence, DEFAULT_EXP, DEFAULT_SIZE, SUBSEQUENCE_LOG2,
};
pub use jump::{
    jump_matrices, jump_matrix, jump_poly, jump_polys, JumpKind, JumpMethod, MatrixJumps,
    PolyJumps, SequenceSpec,
};
pub use matrix::BitMatrix;
pub use packed::{PackedMatrix, PackedPoly};
pub use poly::BitPoly;
pub use transition::{
    row_to_state, shift_left_matrix, shift_right_matrix, state_to_row, stepped_matrix, Transition,
};
