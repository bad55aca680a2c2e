//! Error type for jump-constant generation.

use thiserror::Error;
use xorwow_core::ParamsError;

/// Errors raised while building transition matrices or jump tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JumpError {
    /// Recurrence parameters are invalid.
    #[error(transparent)]
    Params(#[from] ParamsError),
    /// The characteristic polynomial does not describe an invertible `n × n`
    /// transition matrix.
    #[error(
        "degenerate transition matrix: characteristic polynomial degree {degree:?} \
         (expected {expected}), constant term {constant_term}"
    )]
    Degenerate {
        /// Degree found (`None` for the zero polynomial).
        degree: Option<usize>,
        /// Degree required, i.e. the state size.
        expected: usize,
        /// Whether the constant term is 1.
        constant_term: bool,
    },
    /// A polynomial does not fit the packed word layout.
    #[error("polynomial of degree {degree} does not fit in {bits} packed bits")]
    WidthMismatch {
        /// Degree of the polynomial.
        degree: usize,
        /// Bits available in the packed layout.
        bits: usize,
    },
    /// The jump sequence settings are unusable.
    #[error("invalid jump sequence: {0}")]
    InvalidSequence(String),
}
