//! Polynomials over GF(2).
//!
//! Bit `i` of the packed representation is the coefficient of `z^i`.
//! Addition is XOR and multiplication is carry-less.

use serde::{Deserialize, Serialize};

const LIMB_BITS: usize = 64;

/// Polynomial over GF(2) with coefficients packed into little-endian `u64` limbs.
///
/// The representation is kept normalized (no zero high limbs), so derived
/// equality is polynomial equality.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitPoly {
    limbs: Vec<u64>,
}

impl BitPoly {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { limbs: Vec::new() }
    }

    /// The constant polynomial `1`.
    pub fn one() -> Self {
        Self::monomial(0)
    }

    /// The polynomial `z`.
    pub fn z() -> Self {
        Self::monomial(1)
    }

    /// The monomial `z^degree`.
    pub fn monomial(degree: usize) -> Self {
        let mut limbs = vec![0u64; degree / LIMB_BITS + 1];
        limbs[degree / LIMB_BITS] = 1u64 << (degree % LIMB_BITS);
        Self { limbs }
    }

    /// Builds a polynomial from little-endian limbs.
    pub fn from_limbs(limbs: Vec<u64>) -> Self {
        let mut poly = Self { limbs };
        poly.normalize();
        poly
    }

    /// Builds a polynomial from coefficients listed from the highest degree down
    /// to the constant term.
    pub fn from_coeffs_desc(coeffs: &[bool]) -> Self {
        let mut poly = Self::zero();
        for (idx, coeff) in coeffs.iter().rev().enumerate() {
            if *coeff {
                poly.set_coeff(idx, true);
            }
        }
        poly
    }

    /// Little-endian limbs.
    pub fn limbs(&self) -> &[u64] {
        &self.limbs
    }

    fn normalize(&mut self) {
        while self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
    }

    /// Returns true for the zero polynomial.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Degree, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        let top = self.limbs.last()?;
        Some((self.limbs.len() - 1) * LIMB_BITS + (LIMB_BITS - 1 - top.leading_zeros() as usize))
    }

    /// Coefficient of `z^index`.
    #[inline]
    pub fn coeff(&self, index: usize) -> bool {
        self.limbs
            .get(index / LIMB_BITS)
            .map_or(false, |limb| (limb >> (index % LIMB_BITS)) & 1 == 1)
    }

    /// Sets the coefficient of `z^index`.
    pub fn set_coeff(&mut self, index: usize, value: bool) {
        let limb = index / LIMB_BITS;
        if limb >= self.limbs.len() {
            if !value {
                return;
            }
            self.limbs.resize(limb + 1, 0);
        }
        let mask = 1u64 << (index % LIMB_BITS);
        if value {
            self.limbs[limb] |= mask;
        } else {
            self.limbs[limb] &= !mask;
            self.normalize();
        }
    }

    /// Coefficients from the leading term down to the constant term.
    pub fn all_coeffs(&self) -> Vec<bool> {
        match self.degree() {
            Some(degree) => (0..=degree).rev().map(|i| self.coeff(i)).collect(),
            None => vec![false],
        }
    }

    /// Sum of two polynomials.
    pub fn add(&self, rhs: &Self) -> Self {
        let mut out = self.clone();
        out.add_assign(rhs);
        out
    }

    /// Adds `rhs` into `self`.
    pub fn add_assign(&mut self, rhs: &Self) {
        if rhs.limbs.len() > self.limbs.len() {
            self.limbs.resize(rhs.limbs.len(), 0);
        }
        for (d, s) in self.limbs.iter_mut().zip(rhs.limbs.iter()) {
            *d ^= *s;
        }
        self.normalize();
    }

    /// Multiplies by `z`.
    pub fn shl1_assign(&mut self) {
        let mut carry = 0u64;
        for limb in self.limbs.iter_mut() {
            let next = *limb >> (LIMB_BITS - 1);
            *limb = (*limb << 1) | carry;
            carry = next;
        }
        if carry != 0 {
            self.limbs.push(carry);
        }
    }

    /// Multiplies by `z^shift`.
    pub fn shl(&self, shift: usize) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let limb_shift = shift / LIMB_BITS;
        let bit_shift = shift % LIMB_BITS;
        let mut limbs = vec![0u64; self.limbs.len() + limb_shift + 1];
        for (idx, limb) in self.limbs.iter().enumerate() {
            limbs[idx + limb_shift] |= limb << bit_shift;
            if bit_shift != 0 {
                limbs[idx + limb_shift + 1] |= limb >> (LIMB_BITS - bit_shift);
            }
        }
        Self::from_limbs(limbs)
    }

    /// Carry-less product.
    pub fn multiply(&self, rhs: &Self) -> Self {
        let Some(degree) = self.degree() else {
            return Self::zero();
        };
        let mut out = Self::zero();
        for i in 0..=degree {
            if self.coeff(i) {
                out.add_assign(&rhs.shl(i));
            }
        }
        out
    }

    /// Remainder of long division by `modulus`.
    ///
    /// Panics if `modulus` is zero.
    pub fn reduce_modulo(&self, modulus: &Self) -> Self {
        let m_degree = modulus.degree().expect("modulus must be nonzero");
        let mut rem = self.clone();
        while let Some(degree) = rem.degree() {
            if degree < m_degree {
                break;
            }
            rem.add_assign(&modulus.shl(degree - m_degree));
        }
        rem
    }

    /// Multiplies by `z` modulo `modulus`.
    ///
    /// `self` must already be reduced. Shifts by one and clears the vacated
    /// leading term by adding `modulus`.
    pub fn mul_z_mod(&self, modulus: &Self) -> Self {
        let top = modulus.degree().expect("modulus must be nonzero") - 1;
        debug_assert!(self.degree().map_or(true, |d| d <= top));
        let lead = self.coeff(top);
        let mut out = self.clone();
        out.shl1_assign();
        if lead {
            out.add_assign(modulus);
        }
        out
    }

    /// Squares `self` modulo `modulus`.
    ///
    /// Bit-serial Horner evaluation of `self * self`: for each coefficient of
    /// `self` from the top down, the accumulator is multiplied by `z` and
    /// reduced immediately, then `self` is added if that coefficient is set.
    pub fn square_mod(&self, modulus: &Self) -> Self {
        let degree = modulus.degree().expect("modulus must be nonzero");
        let top = degree - 1;
        debug_assert!(self.degree().map_or(true, |d| d <= top));
        let mut acc = Self::zero();
        for j in (0..degree).rev() {
            let lead = acc.coeff(top);
            acc.shl1_assign();
            if lead {
                acc.add_assign(modulus);
            }
            if self.coeff(j) {
                acc.add_assign(self);
            }
        }
        acc
    }

    /// Splits the polynomial into `count` words of `word_bits` bits each,
    /// least significant word first (word `k` bit `j` is the coefficient of
    /// `z^(k * word_bits + j)`).
    ///
    /// Returns `None` if the polynomial does not fit.
    pub fn to_words(&self, word_bits: u32, count: usize) -> Option<Vec<u32>> {
        let word_bits = word_bits as usize;
        if let Some(degree) = self.degree() {
            if degree >= word_bits * count {
                return None;
            }
        }
        let mut words = vec![0u32; count];
        for (k, word) in words.iter_mut().enumerate() {
            for j in 0..word_bits {
                if self.coeff(k * word_bits + j) {
                    *word |= 1u32 << j;
                }
            }
        }
        Some(words)
    }

    /// Big-endian byte encoding of the coefficients, without leading zero bytes.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let bytes: Vec<u8> = self
            .limbs
            .iter()
            .rev()
            .flat_map(|limb| limb.to_be_bytes())
            .skip_while(|b| *b == 0)
            .collect();
        if bytes.is_empty() {
            vec![0]
        } else {
            bytes
        }
    }
}
