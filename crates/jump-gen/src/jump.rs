//! Jump-ahead sequences by matrix powers and by jump polynomials.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use xorwow_core::XorwowParams;

use crate::charpoly::check_invertible;
use crate::error::JumpError;
use crate::matrix::BitMatrix;
use crate::packed::{PackedMatrix, PackedPoly};
use crate::poly::BitPoly;
use crate::transition::Transition;

/// Representation used for jump entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpKind {
    /// Precomputed `T^d` matrices.
    Matrix,
    /// Jump polynomials `z^d mod p(z)`.
    #[default]
    Poly,
}

impl fmt::Display for JumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JumpKind::Matrix => f.write_str("matrix"),
            JumpKind::Poly => f.write_str("poly"),
        }
    }
}

impl FromStr for JumpKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matrix" => Ok(JumpKind::Matrix),
            "poly" => Ok(JumpKind::Poly),
            other => Err(format!("unknown jump type `{other}` (expected matrix or poly)")),
        }
    }
}

/// Geometric sequence of jump distances `start * exp^i` for `i in 0..size`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSpec {
    /// Number of entries.
    pub size: usize,
    /// First jump distance.
    pub start: BigUint,
    /// Ratio between consecutive distances.
    pub exp: u32,
}

impl SequenceSpec {
    /// Constructs a sequence description.
    pub fn new(size: usize, start: impl Into<BigUint>, exp: u32) -> Self {
        Self {
            size,
            start: start.into(),
            exp,
        }
    }

    /// Rejects empty sequences.
    pub fn validate(&self) -> Result<(), JumpError> {
        if self.size == 0 {
            return Err(JumpError::InvalidSequence(
                "sequence must contain at least one entry".into(),
            ));
        }
        Ok(())
    }

    /// Distance of entry `index`.
    pub fn distance(&self, index: usize) -> BigUint {
        let index = u32::try_from(index).expect("sequence index fits in u32");
        &self.start * BigUint::from(self.exp).pow(index)
    }

    /// All distances, in order.
    pub fn distances(&self) -> Vec<BigUint> {
        let mut out = Vec::with_capacity(self.size);
        let mut current = self.start.clone();
        for _ in 0..self.size {
            out.push(current.clone());
            current *= self.exp;
        }
        out
    }
}

/// A way of turning jump distances into table entries.
pub trait JumpMethod {
    /// Entry type stored in a table.
    type Entry;

    /// Entry for a single jump distance.
    fn entry(&self, distance: &BigUint) -> Result<Self::Entry, JumpError>;

    /// Entries for every distance of `spec`, in order.
    fn sequence(&self, spec: &SequenceSpec) -> Result<Vec<Self::Entry>, JumpError> {
        spec.validate()?;
        spec.distances().iter().map(|d| self.entry(d)).collect()
    }
}

/// Returns `T^distance`.
pub fn jump_matrix(transition: &BitMatrix, distance: &BigUint) -> BitMatrix {
    transition.pow(distance)
}

/// Returns `T^(start * exp^i)` for every entry of `spec`.
///
/// Only the first entry is a full exponentiation; each following entry is the
/// previous one raised to `exp`.
pub fn jump_matrices(transition: &BitMatrix, spec: &SequenceSpec) -> Vec<BitMatrix> {
    let exp = BigUint::from(spec.exp);
    let mut out = Vec::with_capacity(spec.size);
    let mut current = jump_matrix(transition, &spec.start);
    for i in 0..spec.size {
        if i + 1 < spec.size {
            let next = current.pow(&exp);
            out.push(current);
            current = next;
        } else {
            out.push(current.clone());
        }
    }
    out
}

/// Computes `z^distance mod charpoly`.
///
/// Distances below the degree of `charpoly` need no reduction and return the
/// monomial directly. Larger distances use left-to-right square-and-multiply,
/// reducing after every squaring and every multiplication by `z`.
///
/// Panics if `charpoly` is constant.
pub fn jump_poly(charpoly: &BitPoly, distance: &BigUint) -> BitPoly {
    let degree = charpoly.degree().unwrap_or(0);
    assert!(degree >= 1, "modulus must have degree at least 1");
    if let Ok(small) = usize::try_from(distance) {
        if small < degree {
            return BitPoly::monomial(small);
        }
    }

    let mut jp = BitPoly::z().reduce_modulo(charpoly);
    let bits = distance.bits();
    for i in (0..bits - 1).rev() {
        jp = jp.square_mod(charpoly);
        if distance.bit(i) {
            jp = jp.mul_z_mod(charpoly);
        }
    }
    jp
}

/// Computes `z^d mod charpoly` for every distance of `spec`, each entry
/// independently and in parallel.
pub fn jump_polys(charpoly: &BitPoly, spec: &SequenceSpec) -> Vec<BitPoly> {
    spec.distances()
        .par_iter()
        .map(|d| jump_poly(charpoly, d))
        .collect()
}

/// Jump entries as packed matrix powers.
pub struct MatrixJumps<'a> {
    transition: &'a Transition,
}

impl<'a> MatrixJumps<'a> {
    /// Uses the given transition matrix.
    pub fn new(transition: &'a Transition) -> Self {
        Self { transition }
    }
}

impl JumpMethod for MatrixJumps<'_> {
    type Entry = PackedMatrix;

    fn entry(&self, distance: &BigUint) -> Result<PackedMatrix, JumpError> {
        let matrix = jump_matrix(self.transition.matrix(), distance);
        Ok(PackedMatrix::from_matrix(self.transition.params(), &matrix))
    }

    fn sequence(&self, spec: &SequenceSpec) -> Result<Vec<PackedMatrix>, JumpError> {
        spec.validate()?;
        debug!(size = spec.size, start = %spec.start, exp = spec.exp, "computing jump matrices");
        let params = self.transition.params();
        Ok(jump_matrices(self.transition.matrix(), spec)
            .iter()
            .map(|m| PackedMatrix::from_matrix(params, m))
            .collect())
    }
}

/// Jump entries as packed jump polynomials.
pub struct PolyJumps {
    params: XorwowParams,
    charpoly: BitPoly,
}

impl PolyJumps {
    /// Uses `charpoly`, which must be the characteristic polynomial of the
    /// transition matrix for `params`.
    pub fn new(params: XorwowParams, charpoly: BitPoly) -> Result<Self, JumpError> {
        check_invertible(&charpoly, params.state_bits())?;
        Ok(Self { params, charpoly })
    }

    /// Derives the characteristic polynomial from `transition`.
    pub fn from_transition(transition: &Transition) -> Result<Self, JumpError> {
        let charpoly = transition.characteristic_polynomial()?;
        Self::new(*transition.params(), charpoly)
    }

    /// The modulus.
    pub fn charpoly(&self) -> &BitPoly {
        &self.charpoly
    }
}

impl JumpMethod for PolyJumps {
    type Entry = PackedPoly;

    fn entry(&self, distance: &BigUint) -> Result<PackedPoly, JumpError> {
        PackedPoly::from_poly(&self.params, &jump_poly(&self.charpoly, distance))
    }

    fn sequence(&self, spec: &SequenceSpec) -> Result<Vec<PackedPoly>, JumpError> {
        spec.validate()?;
        debug!(size = spec.size, start = %spec.start, exp = spec.exp, "computing jump polynomials");
        jump_polys(&self.charpoly, spec)
            .iter()
            .map(|p| PackedPoly::from_poly(&self.params, p))
            .collect()
    }
}
