//! Word-packed jump entries in the layout consumed by generator code.

use serde::{Deserialize, Serialize};
use xorwow_core::{State, XorwowParams};

use crate::error::JumpError;
use crate::matrix::BitMatrix;
use crate::poly::BitPoly;
use crate::transition::row_to_state;

/// Jump matrix as a `words × word_bits × words` array of words.
///
/// `word(block, row, col)` holds columns `col * word_bits ..` of matrix row
/// `block * word_bits + row`, most significant bit first, i.e. each matrix
/// row is stored as the state whose bit vector it is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedMatrix {
    word_bits: u32,
    words: usize,
    data: Vec<u32>,
}

impl PackedMatrix {
    /// Packs an `n × n` matrix built for `params`.
    pub fn from_matrix(params: &XorwowParams, matrix: &BitMatrix) -> Self {
        let n = params.state_bits();
        assert_eq!(
            (matrix.rows(), matrix.cols()),
            (n, n),
            "matrix does not match state size"
        );
        let mut data = Vec::with_capacity(n * params.words);
        for row in 0..n {
            data.extend_from_slice(row_to_state(params, matrix.row(row)).words());
        }
        Self {
            word_bits: params.word_bits,
            words: params.words,
            data,
        }
    }

    /// Bits per word.
    pub fn word_bits(&self) -> u32 {
        self.word_bits
    }

    /// Number of state words (blocks per side).
    pub fn words(&self) -> usize {
        self.words
    }

    /// Word `col` of row `row` in block `block`.
    #[inline]
    pub fn word(&self, block: usize, row: usize, col: usize) -> u32 {
        self.row(block, row)[col]
    }

    /// All words of row `row` in block `block`.
    #[inline]
    pub fn row(&self, block: usize, row: usize) -> &[u32] {
        let start = (block * self.word_bits as usize + row) * self.words;
        &self.data[start..start + self.words]
    }

    /// Row `index` of the full matrix as a state.
    pub fn row_state(&self, params: &XorwowParams, index: usize) -> State {
        let nb = self.word_bits as usize;
        State::from_words(params, self.row(index / nb, index % nb))
            .expect("packed rows are built from valid states")
    }
}

/// Jump polynomial as `words` words, least significant word first.
///
/// Word `k` bit `j` is the coefficient of `z^(k * word_bits + j)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedPoly {
    word_bits: u32,
    words: Vec<u32>,
}

impl PackedPoly {
    /// Packs a polynomial of degree below the state size.
    pub fn from_poly(params: &XorwowParams, poly: &BitPoly) -> Result<Self, JumpError> {
        let words = poly
            .to_words(params.word_bits, params.words)
            .ok_or(JumpError::WidthMismatch {
                degree: poly.degree().unwrap_or(0),
                bits: params.state_bits(),
            })?;
        Ok(Self {
            word_bits: params.word_bits,
            words,
        })
    }

    /// Bits per word.
    pub fn word_bits(&self) -> u32 {
        self.word_bits
    }

    /// The packed words.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Coefficient of `z^index`.
    #[inline]
    pub fn coeff(&self, index: usize) -> bool {
        let nb = self.word_bits as usize;
        self.words
            .get(index / nb)
            .map_or(false, |w| (w >> (index % nb)) & 1 == 1)
    }

    /// Number of coefficients the layout holds.
    pub fn capacity(&self) -> usize {
        self.word_bits as usize * self.words.len()
    }

    /// Unpacks into a polynomial.
    pub fn to_poly(&self) -> BitPoly {
        let mut poly = BitPoly::zero();
        for index in 0..self.capacity() {
            if self.coeff(index) {
                poly.set_coeff(index, true);
            }
        }
        poly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::Transition;

    #[test]
    fn packed_transition_rows() {
        let t = Transition::production();
        let packed = PackedMatrix::from_matrix(t.params(), t.matrix());
        assert_eq!(packed.row(0, 0), &[0, 0, 0, 0, 3758096384]);
        assert_eq!(packed.row(1, 0), &[2147483648, 0, 0, 0, 0]);
        assert_eq!(packed.word(4, 31, 4), 0x11);
        assert_eq!(packed.row_state(t.params(), 32).words(), &[0x8000_0000, 0, 0, 0, 0]);
    }

    #[test]
    fn poly_packing() {
        let params = XorwowParams::production();
        let packed = PackedPoly::from_poly(&params, &BitPoly::monomial(159)).unwrap();
        assert_eq!(packed.words(), &[0, 0, 0, 0, 0x8000_0000]);
        assert!(packed.coeff(159));
        assert_eq!(packed.to_poly(), BitPoly::monomial(159));
        assert_eq!(
            PackedPoly::from_poly(&params, &BitPoly::monomial(160)),
            Err(JumpError::WidthMismatch {
                degree: 160,
                bits: 160
            })
        );
    }
}
