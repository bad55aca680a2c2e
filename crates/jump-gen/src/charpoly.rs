//! Exact characteristic polynomial over GF(2).
//!
//! The matrix is first brought to upper Hessenberg form by similarity
//! transforms (each row addition is paired with the inverse column addition),
//! then `det(zI - H)` is expanded with the Hessenberg recurrence. Every step
//! is XOR arithmetic, so the result is exact.

use tracing::debug;

use crate::error::JumpError;
use crate::matrix::BitMatrix;
use crate::poly::BitPoly;

/// Reduces a square matrix to a similar upper Hessenberg matrix.
pub fn hessenberg(matrix: &BitMatrix) -> BitMatrix {
    assert!(matrix.is_square(), "hessenberg form needs a square matrix");
    let n = matrix.rows();
    let mut h = matrix.clone();
    for m in 1..n.saturating_sub(1) {
        let Some(pivot) = (m..n).find(|&i| h.get(i, m - 1)) else {
            continue;
        };
        if pivot != m {
            h.swap_rows(pivot, m);
            h.swap_cols(pivot, m);
        }
        for i in (m + 1)..n {
            if h.get(i, m - 1) {
                h.xor_row(m, i);
                h.xor_col(i, m);
            }
        }
    }
    h
}

/// Computes `det(zI - M)` over GF(2) for a square matrix `M`.
pub fn characteristic_polynomial(matrix: &BitMatrix) -> BitPoly {
    let h = hessenberg(matrix);
    let n = h.rows();
    let mut p: Vec<BitPoly> = Vec::with_capacity(n + 1);
    p.push(BitPoly::one());
    for m in 1..=n {
        // (z + h[m-1][m-1]) * p[m-1]
        let mut next = p[m - 1].shl(1);
        if h.get(m - 1, m - 1) {
            next.add_assign(&p[m - 1]);
        }
        for i in 1..m {
            // Product of the sub-diagonal entries h[m-1][m-2] .. h[m-i][m-i-1].
            if !h.get(m - i, m - i - 1) {
                break;
            }
            if h.get(m - i - 1, m - 1) {
                next.add_assign(&p[m - i - 1]);
            }
        }
        p.push(next);
    }
    let poly = p.pop().unwrap_or_else(BitPoly::one);
    debug!(degree = ?poly.degree(), "derived characteristic polynomial");
    poly
}

/// Checks that `poly` is a valid characteristic polynomial of an invertible
/// `n × n` matrix: degree exactly `n` and constant term 1.
pub fn check_invertible(poly: &BitPoly, n: usize) -> Result<(), JumpError> {
    let degree = poly.degree();
    let constant_term = poly.coeff(0);
    if degree != Some(n) || !constant_term {
        return Err(JumpError::Degenerate {
            degree,
            expected: n,
            constant_term,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::Transition;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use xorwow_core::{Shifts, XorwowParams};

    /// Production characteristic polynomial, bit i = coefficient of z^i.
    const XORWOW_CHARPOLY_HEX: &str = "100000f0e0f3c0035000621210861003000060001";

    fn from_hex(hex_str: &str) -> BitPoly {
        let mut poly = BitPoly::zero();
        for (idx, ch) in hex_str.chars().rev().enumerate() {
            let nibble = ch.to_digit(16).expect("hex digit");
            for bit in 0..4 {
                if (nibble >> bit) & 1 == 1 {
                    poly.set_coeff(idx * 4 + bit, true);
                }
            }
        }
        poly
    }

    fn evaluate_at(poly: &BitPoly, matrix: &BitMatrix) -> BitMatrix {
        let n = matrix.rows();
        let mut acc = BitMatrix::zero(n, n);
        for coeff in poly.all_coeffs() {
            acc = acc.mul(matrix);
            if coeff {
                acc = acc.add(&BitMatrix::identity(n));
            }
        }
        acc
    }

    #[test]
    fn hessenberg_is_similar_and_banded() {
        let mut rng = ChaCha20Rng::from_seed([50u8; 32]);
        let m = BitMatrix::from_linear_map(40, |_| vec![rng.next_u64()]);
        let h = hessenberg(&m);
        for i in 0..40usize {
            for j in 0..i.saturating_sub(1) {
                assert!(!h.get(i, j), "entry ({i}, {j}) below sub-diagonal");
            }
        }
        assert_eq!(characteristic_polynomial(&m), characteristic_polynomial(&h));
    }

    #[test]
    fn small_matrices() {
        // [[1, 1], [1, 0]] -> z^2 + z + 1
        let mut m = BitMatrix::zero(2, 2);
        m.set(0, 0, true);
        m.set(0, 1, true);
        m.set(1, 0, true);
        assert_eq!(characteristic_polynomial(&m), from_hex("7"));
        assert_eq!(characteristic_polynomial(&BitMatrix::identity(3)), from_hex("f"));
        assert_eq!(characteristic_polynomial(&BitMatrix::zero(3, 3)), from_hex("8"));
    }

    #[test]
    fn cayley_hamilton_on_random_matrices() {
        let mut rng = ChaCha20Rng::from_seed([51u8; 32]);
        for n in [5usize, 33, 64, 100] {
            let m = BitMatrix::from_linear_map(n, |_| {
                (0..n.div_ceil(64)).map(|_| rng.next_u64()).collect()
            });
            let p = characteristic_polynomial(&m);
            assert_eq!(p.degree(), Some(n));
            assert_eq!(evaluate_at(&p, &m), BitMatrix::zero(n, n));
        }
    }

    #[test]
    fn production_charpoly() {
        let t = Transition::production();
        let p = t.characteristic_polynomial().expect("xorwow is invertible");
        assert_eq!(p, from_hex(XORWOW_CHARPOLY_HEX));
        assert_eq!(p.all_coeffs().len(), 161);
        assert!(p.all_coeffs()[0]);
        assert!(p.coeff(0));
        assert_eq!(evaluate_at(&p, t.matrix()), BitMatrix::zero(160, 160));
    }

    #[test]
    fn toy_charpoly() {
        let params = XorwowParams::new(4, 2, Shifts::new(1, 1, 1)).unwrap();
        let t = Transition::new(params).unwrap();
        assert_eq!(t.characteristic_polynomial().unwrap(), from_hex("151"));
    }

    #[test]
    fn degenerate_polynomials_are_rejected() {
        let singular = characteristic_polynomial(&BitMatrix::zero(4, 4));
        assert!(matches!(
            check_invertible(&singular, 4),
            Err(JumpError::Degenerate {
                constant_term: false,
                ..
            })
        ));
        assert!(matches!(
            check_invertible(&BitPoly::one(), 4),
            Err(JumpError::Degenerate {
                degree: Some(0),
                expected: 4,
                ..
            })
        ));
        let t = Transition::production();
        let p = t.characteristic_polynomial().unwrap();
        assert!(check_invertible(&p, 160).is_ok());
    }
}
