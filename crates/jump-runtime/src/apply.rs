//! Application of single packed entries.

use jump_gen::{PackedMatrix, PackedPoly};
use xorwow_core::{step, State, XorwowParams};

/// Returns `state * J` for a packed jump matrix `J`.
///
/// Each set state bit selects one packed row; the selected rows are XORed.
pub fn apply_matrix(params: &XorwowParams, matrix: &PackedMatrix, state: &State) -> State {
    assert_eq!(matrix.words(), params.words, "matrix built for other params");
    let nb = params.word_bits as usize;
    let mut out = vec![0u32; params.words];
    for (block, word) in state.words().iter().enumerate() {
        for row in 0..nb {
            if (word >> (nb - 1 - row)) & 1 == 1 {
                for (acc, w) in out.iter_mut().zip(matrix.row(block, row)) {
                    *acc ^= *w;
                }
            }
        }
    }
    State::from_words(params, &out).expect("packed rows fit the word width")
}

/// Returns `sum_k c_k * state * T^k` for a packed jump polynomial with
/// coefficients `c_k`, stepping a copy of the state once per coefficient.
pub fn apply_poly(params: &XorwowParams, poly: &PackedPoly, state: &State) -> State {
    let mut out = State::zero(params);
    let mut current = state.clone();
    for k in 0..poly.capacity() {
        if poly.coeff(k) {
            out.xor_assign(&current);
        }
        step(params, &mut current);
    }
    out
}
