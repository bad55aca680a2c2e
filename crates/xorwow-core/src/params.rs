//! Recurrence parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Widest supported state word, in bits.
pub const MAX_WORD_BITS: u32 = 32;

/// Errors raised while validating [`XorwowParams`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// Word width outside `1..=32`.
    #[error("word width must be between 1 and {max} bits, got {0}", max = MAX_WORD_BITS)]
    WordBits(u32),
    /// Fewer than two state words.
    #[error("state needs at least two words, got {0}")]
    Words(usize),
    /// A shift amount outside `1..word_bits`.
    #[error("shift {name} = {value} must be in 1..{word_bits}")]
    Shift {
        /// Shift name (`a`, `b` or `c`).
        name: char,
        /// Offending value.
        value: u32,
        /// Word width the shift applies to.
        word_bits: u32,
    },
}

/// Shift triple `(a, b, c)` of the xorshift core.
///
/// One step computes `t = x ^ (x >> a)`, `t ^= t << b` and
/// `v' = (v ^ (v << c)) ^ t`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shifts {
    /// Right shift applied to the oldest word.
    pub a: u32,
    /// Left shift applied to the intermediate value.
    pub b: u32,
    /// Left shift applied to the newest word.
    pub c: u32,
}

impl Shifts {
    /// Constructs a shift triple.
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }
}

/// Static description of an xorwow-style recurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XorwowParams {
    /// Bits per state word.
    pub word_bits: u32,
    /// Number of state words.
    pub words: usize,
    /// Shift triple.
    pub shifts: Shifts,
}

impl XorwowParams {
    /// Production xorwow: five 32-bit words, shifts `(2, 1, 4)`.
    pub const fn production() -> Self {
        Self {
            word_bits: 32,
            words: 5,
            shifts: Shifts::new(2, 1, 4),
        }
    }

    /// Constructs and validates a parameter set.
    pub fn new(word_bits: u32, words: usize, shifts: Shifts) -> Result<Self, ParamsError> {
        let params = Self {
            word_bits,
            words,
            shifts,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks that the parameters describe a well-formed recurrence.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.word_bits == 0 || self.word_bits > MAX_WORD_BITS {
            return Err(ParamsError::WordBits(self.word_bits));
        }
        if self.words < 2 {
            return Err(ParamsError::Words(self.words));
        }
        for (name, value) in [
            ('a', self.shifts.a),
            ('b', self.shifts.b),
            ('c', self.shifts.c),
        ] {
            if value == 0 || value >= self.word_bits {
                return Err(ParamsError::Shift {
                    name,
                    value,
                    word_bits: self.word_bits,
                });
            }
        }
        Ok(())
    }

    /// Total number of state bits (`word_bits * words`).
    #[inline]
    pub const fn state_bits(&self) -> usize {
        self.word_bits as usize * self.words
    }

    /// Mask selecting the low `word_bits` bits of a word.
    #[inline]
    pub const fn word_mask(&self) -> u32 {
        if self.word_bits >= 32 {
            u32::MAX
        } else {
            (1u32 << self.word_bits) - 1
        }
    }
}

impl Default for XorwowParams {
    fn default() -> Self {
        Self::production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_is_valid() {
        let params = XorwowParams::production();
        assert!(params.validate().is_ok());
        assert_eq!(params.state_bits(), 160);
        assert_eq!(params.word_mask(), u32::MAX);
    }

    #[test]
    fn toy_params_mask() {
        let params = XorwowParams::new(4, 2, Shifts::new(1, 1, 1)).expect("valid toy params");
        assert_eq!(params.state_bits(), 8);
        assert_eq!(params.word_mask(), 0xf);
    }

    #[test]
    fn rejects_bad_params() {
        assert_eq!(
            XorwowParams::new(0, 5, Shifts::new(2, 1, 4)),
            Err(ParamsError::WordBits(0))
        );
        assert_eq!(
            XorwowParams::new(33, 5, Shifts::new(2, 1, 4)),
            Err(ParamsError::WordBits(33))
        );
        assert_eq!(
            XorwowParams::new(32, 1, Shifts::new(2, 1, 4)),
            Err(ParamsError::Words(1))
        );
        assert!(matches!(
            XorwowParams::new(4, 2, Shifts::new(1, 4, 1)),
            Err(ParamsError::Shift { name: 'b', .. })
        ));
        assert!(matches!(
            XorwowParams::new(32, 5, Shifts::new(2, 1, 0)),
            Err(ParamsError::Shift { name: 'c', .. })
        ));
    }
}
