//! Transition matrix of the xorwow recurrence.
//!
//! For `w` state words the matrix is a companion matrix in block form
//! (shown for `w = 5`):
//!
//! ```text
//!     | 0 0 0 0 A |
//!     | I 0 0 0 0 |
//! T = | 0 I 0 0 0 |
//!     | 0 0 I 0 0 |
//!     | 0 0 0 I B |
//! ```
//!
//! with `A = (I + L^a)(I + R^b)` and `B = I + R^c`. `L` has ones on the
//! principal super-diagonal and `R` on the principal sub-diagonal. States are
//! row vectors and one step is `s' = s * T`.

use num_bigint::BigUint;
use tracing::debug;
use xorwow_core::{step, State, XorwowParams};

use crate::charpoly::{characteristic_polynomial, check_invertible};
use crate::error::JumpError;
use crate::matrix::BitMatrix;
use crate::poly::BitPoly;

/// `word_bits × word_bits` matrix with ones on the super-diagonal.
pub fn shift_left_matrix(word_bits: usize) -> BitMatrix {
    let mut mat = BitMatrix::zero(word_bits, word_bits);
    for i in 0..word_bits.saturating_sub(1) {
        mat.set(i, i + 1, true);
    }
    mat
}

/// `word_bits × word_bits` matrix with ones on the sub-diagonal.
pub fn shift_right_matrix(word_bits: usize) -> BitMatrix {
    let mut mat = BitMatrix::zero(word_bits, word_bits);
    for i in 0..word_bits.saturating_sub(1) {
        mat.set(i + 1, i, true);
    }
    mat
}

/// Packs a state into a row vector of `u64` limbs.
pub fn state_to_row(params: &XorwowParams, state: &State) -> Vec<u64> {
    let n = params.state_bits();
    let mut row = vec![0u64; n.div_ceil(64)];
    for index in 0..n {
        if state.bit(params, index) {
            row[index / 64] |= 1u64 << (index % 64);
        }
    }
    row
}

/// Unpacks a row vector of `u64` limbs into a state.
pub fn row_to_state(params: &XorwowParams, row: &[u64]) -> State {
    let mut state = State::zero(params);
    for index in 0..params.state_bits() {
        if (row[index / 64] >> (index % 64)) & 1 == 1 {
            state.set_bit(params, index, true);
        }
    }
    state
}

/// Transition matrix `T` together with the parameters it was built from.
#[derive(Clone, Debug)]
pub struct Transition {
    params: XorwowParams,
    matrix: BitMatrix,
}

impl Transition {
    /// Builds `T` from validated parameters.
    pub fn new(params: XorwowParams) -> Result<Self, JumpError> {
        params.validate()?;
        let nb = params.word_bits as usize;
        let nw = params.words;
        let shifts = params.shifts;

        let id = BitMatrix::identity(nb);
        let l = shift_left_matrix(nb);
        let r = shift_right_matrix(nb);
        let a = id
            .add(&l.pow(&BigUint::from(shifts.a)))
            .mul(&id.add(&r.pow(&BigUint::from(shifts.b))));
        let b = id.add(&r.pow(&BigUint::from(shifts.c)));

        let mut matrix = BitMatrix::zero(nb * nw, nb * nw);
        matrix.set_block(0, nw - 1, &a);
        for block in 1..nw {
            matrix.set_block(block, block - 1, &id);
        }
        let corner = matrix.block(nw - 1, nw - 1, nb).add(&b);
        matrix.set_block(nw - 1, nw - 1, &corner);

        debug!(
            word_bits = nb,
            words = nw,
            a = shifts.a,
            b = shifts.b,
            c = shifts.c,
            "built transition matrix"
        );
        Ok(Self { params, matrix })
    }

    /// Production xorwow transition matrix.
    pub fn production() -> Self {
        Self::new(XorwowParams::production()).expect("production parameters are valid")
    }

    /// Parameters of the recurrence.
    pub fn params(&self) -> &XorwowParams {
        &self.params
    }

    /// The `n × n` matrix.
    pub fn matrix(&self) -> &BitMatrix {
        &self.matrix
    }

    /// State dimension `n`.
    pub fn size(&self) -> usize {
        self.matrix.rows()
    }

    /// Characteristic polynomial of `T`, checked to have degree `n` and a
    /// nonzero constant term.
    pub fn characteristic_polynomial(&self) -> Result<BitPoly, JumpError> {
        let poly = characteristic_polynomial(&self.matrix);
        check_invertible(&poly, self.size())?;
        Ok(poly)
    }

    /// Applies `T` once to `state`.
    pub fn apply(&self, state: &State) -> State {
        let row = state_to_row(&self.params, state);
        row_to_state(&self.params, &self.matrix.apply_row(&row))
    }
}

/// Builds the transition matrix by stepping every basis state once.
pub fn stepped_matrix(params: &XorwowParams) -> BitMatrix {
    BitMatrix::from_linear_map(params.state_bits(), |index| {
        let mut state = State::unit(params, index);
        step(params, &mut state);
        state_to_row(params, &state)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use xorwow_core::Shifts;

    fn toy() -> XorwowParams {
        XorwowParams::new(4, 2, Shifts::new(1, 1, 1)).unwrap()
    }

    #[test]
    fn shift_matrices_shift_words() {
        // With position 0 as the MSB, x * L is a right shift and x * R a left shift.
        let params = XorwowParams::new(8, 2, Shifts::new(1, 1, 1)).unwrap();
        let l = shift_left_matrix(8);
        let r = shift_right_matrix(8);
        let x = State::from_words(&params, &[0b1001_0110, 0]).unwrap();
        let mut row = state_to_row(&params, &x);
        row[0] &= 0xff;
        let shifted = l.apply_row(&row);
        assert_eq!(shifted, vec![0b0100_1011u64.reverse_bits() >> 56]);
        let shifted = r.apply_row(&row);
        assert_eq!(shifted, vec![(0b0010_1100u64).reverse_bits() >> 56]);
    }

    #[test]
    fn block_construction_matches_stepped_basis() {
        for params in [XorwowParams::production(), toy()] {
            let t = Transition::new(params).unwrap();
            assert_eq!(t.matrix(), &stepped_matrix(&params));
        }
    }

    #[test]
    fn first_rows_of_production_matrix() {
        let t = Transition::production();
        let params = *t.params();
        let row0 = row_to_state(&params, t.matrix().row(0));
        assert_eq!(row0.words(), &[0, 0, 0, 0, 0xe000_0000]);
        let row32 = row_to_state(&params, t.matrix().row(32));
        assert_eq!(row32.words(), &[0x8000_0000, 0, 0, 0, 0]);
    }

    #[test]
    fn apply_matches_step() {
        let params = XorwowParams::production();
        let t = Transition::new(params).unwrap();
        let mut rng = ChaCha20Rng::from_seed([40u8; 32]);
        for _ in 0..16 {
            let words: Vec<u32> = (0..5).map(|_| rng.gen()).collect();
            let state = State::from_words(&params, &words).unwrap();
            let mut expected = state.clone();
            step(&params, &mut expected);
            assert_eq!(t.apply(&state), expected);
        }
    }

    #[test]
    fn transition_is_invertible() {
        let t = Transition::production();
        let inv = t.matrix().invert().expect("xorwow step is a bijection");
        let params = *t.params();
        let state = State::from_words(&params, &[1, 2, 3, 4, 5]).unwrap();
        let next = t.apply(&state);
        let back = inv.apply_row(&state_to_row(&params, &next));
        assert_eq!(row_to_state(&params, &back), state);
    }

    #[test]
    fn rejects_invalid_params() {
        let params = XorwowParams {
            word_bits: 4,
            words: 2,
            shifts: Shifts::new(1, 1, 5),
        };
        assert!(matches!(Transition::new(params), Err(JumpError::Params(_))));
    }

    #[test]
    fn row_state_roundtrip() {
        let params = XorwowParams::production();
        let state = State::from_words(&params, &[0xdead_beef, 1, 0x8000_0000, 7, 42]).unwrap();
        assert_eq!(row_to_state(&params, &state_to_row(&params, &state)), state);
    }
}
