//! Reference model of the linear part of the xorwow recurrence.
//!
//! This crate provides:
//! - Generator parameters (word width, word count, shift triple).
//! - A packed state type shared across the workspace.
//! - The single linear state step that the jump-ahead constants encode.
//!
//! The Weyl counter and the output function of xorwow are affine additions
//! on top of this step and are intentionally not modelled here.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod params;
mod state;
mod step;

pub use crate::params::{ParamsError, Shifts, XorwowParams};
pub use crate::state::{State, StateError};
pub use crate::step::{advance, step};
