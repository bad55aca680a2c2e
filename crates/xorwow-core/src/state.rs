//! Packed generator state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::params::XorwowParams;

/// Error returned when raw words do not form a state for the given parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Wrong number of words.
    #[error("expected {expected} state words, got {actual}")]
    Length {
        /// Words required by the parameters.
        expected: usize,
        /// Words supplied.
        actual: usize,
    },
    /// A word has bits set above the word width.
    #[error("state word {index} = {value:#x} does not fit in {word_bits} bits")]
    Overflow {
        /// Index of the offending word.
        index: usize,
        /// Offending value.
        value: u32,
        /// Word width.
        word_bits: u32,
    },
}

/// Generator state as `words` unsigned words, oldest word first.
///
/// As a GF(2) row vector, bit index `k * word_bits + p` is bit
/// `word_bits - 1 - p` of word `k`: position 0 inside a word is its most
/// significant bit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State(Vec<u32>);

impl State {
    /// Returns the all-zero state.
    pub fn zero(params: &XorwowParams) -> Self {
        Self(vec![0u32; params.words])
    }

    /// Wraps raw words after checking them against `params`.
    pub fn from_words(params: &XorwowParams, words: &[u32]) -> Result<Self, StateError> {
        if words.len() != params.words {
            return Err(StateError::Length {
                expected: params.words,
                actual: words.len(),
            });
        }
        let mask = params.word_mask();
        if let Some((index, &value)) = words.iter().enumerate().find(|(_, w)| **w & !mask != 0) {
            return Err(StateError::Overflow {
                index,
                value,
                word_bits: params.word_bits,
            });
        }
        Ok(Self(words.to_vec()))
    }

    /// Returns the unit state with only vector bit `index` set.
    pub fn unit(params: &XorwowParams, index: usize) -> Self {
        let mut state = Self::zero(params);
        state.set_bit(params, index, true);
        state
    }

    /// Exposes the underlying words.
    pub fn words(&self) -> &[u32] {
        &self.0
    }

    /// Returns true if every word is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    /// Reads vector bit `index`.
    pub fn bit(&self, params: &XorwowParams, index: usize) -> bool {
        let (word, shift) = locate(params, index);
        (self.0[word] >> shift) & 1 == 1
    }

    /// Writes vector bit `index`.
    pub fn set_bit(&mut self, params: &XorwowParams, index: usize, value: bool) {
        let (word, shift) = locate(params, index);
        if value {
            self.0[word] |= 1u32 << shift;
        } else {
            self.0[word] &= !(1u32 << shift);
        }
    }

    /// XORs `other` into `self` (GF(2) vector addition).
    pub fn xor_assign(&mut self, other: &Self) {
        assert_eq!(self.0.len(), other.0.len(), "state length mismatch");
        for (d, s) in self.0.iter_mut().zip(other.0.iter()) {
            *d ^= *s;
        }
    }

    pub(crate) fn words_mut(&mut self) -> &mut Vec<u32> {
        &mut self.0
    }
}

#[inline]
fn locate(params: &XorwowParams, index: usize) -> (usize, u32) {
    let word_bits = params.word_bits as usize;
    assert!(index < params.state_bits(), "state bit index out of range");
    let word = index / word_bits;
    let pos = index % word_bits;
    (word, (word_bits - 1 - pos) as u32)
}
