//! Linear state step.

use crate::params::XorwowParams;
use crate::state::State;

/// Advances `state` by one step of the linear recurrence, in place.
///
/// With words `(x, y, ..., v)` this computes `t = x ^ (x >> a)`,
/// `t ^= t << b`, `v' = (v ^ (v << c)) ^ t` and rotates to `(y, ..., v, v')`.
pub fn step(params: &XorwowParams, state: &mut State) {
    let mask = params.word_mask();
    let shifts = params.shifts;
    let words = state.words_mut();
    debug_assert_eq!(words.len(), params.words);

    let x = words[0];
    let v = words[words.len() - 1];
    let mut t = x ^ (x >> shifts.a);
    t = (t ^ (t << shifts.b)) & mask;
    let next = ((v ^ (v << shifts.c)) & mask) ^ t;

    words.rotate_left(1);
    let last = words.len() - 1;
    words[last] = next;
}

/// Returns `state` advanced by `steps` single steps.
pub fn advance(params: &XorwowParams, state: &State, steps: u64) -> State {
    let mut out = state.clone();
    for _ in 0..steps {
        step(params, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Shifts;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    // Marsaglia's default xorwow seed words.
    const SEED: [u32; 5] = [123456789, 362436069, 521288629, 88675123, 5783321];

    #[test]
    fn step_matches_reference_seed() {
        let params = XorwowParams::production();
        let mut state = State::from_words(&params, &SEED).unwrap();
        step(&params, &mut state);
        assert_eq!(
            state.words(),
            &[362436069, 521288629, 88675123, 5783321, 239897721]
        );
    }

    #[test]
    fn step_is_linear() {
        let params = XorwowParams::production();
        let mut rng = ChaCha20Rng::from_seed([30u8; 32]);
        for _ in 0..32 {
            let a: Vec<u32> = (0..5).map(|_| rng.gen()).collect();
            let b: Vec<u32> = (0..5).map(|_| rng.gen()).collect();
            let a = State::from_words(&params, &a).unwrap();
            let b = State::from_words(&params, &b).unwrap();
            let mut sum = a.clone();
            sum.xor_assign(&b);

            let mut expected = advance(&params, &a, 1);
            expected.xor_assign(&advance(&params, &b, 1));
            assert_eq!(advance(&params, &sum, 1), expected);
        }
    }

    #[test]
    fn toy_step_stays_in_word_width() {
        let params = XorwowParams::new(4, 2, Shifts::new(1, 1, 1)).unwrap();
        let mut state = State::from_words(&params, &[0xf, 0xf]).unwrap();
        for _ in 0..64 {
            step(&params, &mut state);
            assert!(state.words().iter().all(|w| *w <= 0xf));
        }
    }

    #[test]
    fn zero_steps_is_identity() {
        let params = XorwowParams::production();
        let state = State::from_words(&params, &SEED).unwrap();
        assert_eq!(advance(&params, &state, 0), state);
    }
}
