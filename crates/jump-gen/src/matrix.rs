//! GF(2) matrices with rows packed into `u64` limbs.

use num_bigint::BigUint;

const LIMB_BITS: usize = 64;

#[inline]
fn limbs_for(bits: usize) -> usize {
    bits.div_ceil(LIMB_BITS)
}

/// Dense `rows × cols` binary matrix over GF(2), stored row-major.
///
/// Each row occupies `stride` little-endian `u64` limbs; column `c` of a row
/// lives in limb `c / 64` at bit `c % 64`. Dimensions never change after
/// construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitMatrix {
    rows: usize,
    cols: usize,
    stride: usize,
    data: Vec<u64>,
}

impl BitMatrix {
    /// Returns the `rows × cols` zero matrix.
    pub fn zero(rows: usize, cols: usize) -> Self {
        let stride = limbs_for(cols);
        Self {
            rows,
            cols,
            stride,
            data: vec![0u64; rows * stride],
        }
    }

    /// Returns the `n × n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut mat = Self::zero(n, n);
        for i in 0..n {
            mat.set(i, i, true);
        }
        mat
    }

    /// Builds an `n × n` matrix whose row `i` is `image(i)`, the packed image
    /// of the `i`-th basis row vector under a linear map.
    pub fn from_linear_map<F>(n: usize, mut image: F) -> Self
    where
        F: FnMut(usize) -> Vec<u64>,
    {
        let mut mat = Self::zero(n, n);
        for i in 0..n {
            let row = image(i);
            assert_eq!(row.len(), mat.stride, "image row has wrong limb count");
            mat.row_mut(i).copy_from_slice(&row);
        }
        mat.mask_tail();
        mat
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true for square matrices.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Reads the bit at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        debug_assert!(row < self.rows && col < self.cols);
        (self.data[row * self.stride + col / LIMB_BITS] >> (col % LIMB_BITS)) & 1 == 1
    }

    /// Writes the bit at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        debug_assert!(row < self.rows && col < self.cols);
        let limb = &mut self.data[row * self.stride + col / LIMB_BITS];
        let mask = 1u64 << (col % LIMB_BITS);
        if value {
            *limb |= mask;
        } else {
            *limb &= !mask;
        }
    }

    /// Packed limbs of `row`.
    #[inline]
    pub fn row(&self, row: usize) -> &[u64] {
        &self.data[row * self.stride..(row + 1) * self.stride]
    }

    #[inline]
    fn row_mut(&mut self, row: usize) -> &mut [u64] {
        &mut self.data[row * self.stride..(row + 1) * self.stride]
    }

    fn mask_tail(&mut self) {
        let tail = self.cols % LIMB_BITS;
        if tail == 0 || self.stride == 0 {
            return;
        }
        let mask = (1u64 << tail) - 1;
        for row in 0..self.rows {
            let idx = row * self.stride + self.stride - 1;
            self.data[idx] &= mask;
        }
    }

    /// Returns the `size × size` block at `(row_block, col_block)`.
    pub fn block(&self, row_block: usize, col_block: usize, size: usize) -> Self {
        let mut out = Self::zero(size, size);
        for row in 0..size {
            for col in 0..size {
                if self.get(row_block * size + row, col_block * size + col) {
                    out.set(row, col, true);
                }
            }
        }
        out
    }

    /// Overwrites the square block at `(row_block, col_block)` with `block`.
    pub fn set_block(&mut self, row_block: usize, col_block: usize, block: &Self) {
        assert!(block.is_square(), "blocks must be square");
        let size = block.rows;
        for row in 0..size {
            for col in 0..size {
                self.set(
                    row_block * size + row,
                    col_block * size + col,
                    block.get(row, col),
                );
            }
        }
    }

    /// Entry-wise sum (`self + rhs`, i.e. XOR).
    pub fn add(&self, rhs: &Self) -> Self {
        assert_eq!(
            (self.rows, self.cols),
            (rhs.rows, rhs.cols),
            "matrix dimensions must match for addition"
        );
        let mut out = self.clone();
        for (d, s) in out.data.iter_mut().zip(rhs.data.iter()) {
            *d ^= *s;
        }
        out
    }

    /// Multiplies two matrices (`self * rhs`).
    ///
    /// Row `i` of the product is the XOR of the rows `j` of `rhs` for which
    /// bit `(i, j)` of `self` is set.
    pub fn mul(&self, rhs: &Self) -> Self {
        assert_eq!(self.cols, rhs.rows, "inner dimensions must match");
        let mut result = Self::zero(self.rows, rhs.cols);
        let stride = rhs.stride;
        for row_idx in 0..self.rows {
            let mut accum = vec![0u64; stride];
            for (limb_idx, limb) in self.row(row_idx).iter().enumerate() {
                let mut bits = *limb;
                while bits != 0 {
                    let bit = bits.trailing_zeros() as usize;
                    let source = rhs.row(limb_idx * LIMB_BITS + bit);
                    for (acc, src) in accum.iter_mut().zip(source.iter()) {
                        *acc ^= *src;
                    }
                    bits &= bits - 1;
                }
            }
            result.row_mut(row_idx).copy_from_slice(&accum);
        }
        result
    }

    /// Raises a square matrix to `exp` by repeated squaring.
    ///
    /// The exponent is unbounded; `pow(0)` is the identity.
    pub fn pow(&self, exp: &BigUint) -> Self {
        assert!(self.is_square(), "only square matrices have powers");
        let mut result = Self::identity(self.rows);
        let mut base = self.clone();
        let bits = exp.bits();
        for i in 0..bits {
            if exp.bit(i) {
                result = result.mul(&base);
            }
            if i + 1 < bits {
                base = base.mul(&base);
            }
        }
        result
    }

    /// Applies the matrix to a packed row vector from the left (`v * self`).
    pub fn apply_row(&self, vector: &[u64]) -> Vec<u64> {
        assert_eq!(vector.len(), limbs_for(self.rows), "vector limb count");
        let mut accum = vec![0u64; self.stride];
        for (limb_idx, limb) in vector.iter().enumerate() {
            let mut bits = *limb;
            while bits != 0 {
                let bit = bits.trailing_zeros() as usize;
                let row = limb_idx * LIMB_BITS + bit;
                if row >= self.rows {
                    break;
                }
                for (acc, src) in accum.iter_mut().zip(self.row(row).iter()) {
                    *acc ^= *src;
                }
                bits &= bits - 1;
            }
        }
        accum
    }

    /// Attempts to invert the matrix via Gauss–Jordan elimination on packed rows.
    pub fn invert(&self) -> Option<Self> {
        if !self.is_square() {
            return None;
        }
        let n = self.rows;
        let mut left = self.clone();
        let mut right = Self::identity(n);

        for col in 0..n {
            let pivot = (col..n).find(|&row| left.get(row, col))?;
            if pivot != col {
                left.swap_rows(pivot, col);
                right.swap_rows(pivot, col);
            }
            for row in 0..n {
                if row != col && left.get(row, col) {
                    left.xor_row(col, row);
                    right.xor_row(col, row);
                }
            }
        }

        Some(right)
    }

    /// Returns true if the matrix is invertible.
    pub fn is_invertible(&self) -> bool {
        self.invert().is_some()
    }

    /// Swaps rows `a` and `b`.
    pub(crate) fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for limb in 0..self.stride {
            self.data.swap(a * self.stride + limb, b * self.stride + limb);
        }
    }

    /// Swaps columns `a` and `b`.
    pub(crate) fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for row in 0..self.rows {
            let (va, vb) = (self.get(row, a), self.get(row, b));
            if va != vb {
                self.set(row, a, vb);
                self.set(row, b, va);
            }
        }
    }

    /// Adds row `src` into row `dst`.
    pub(crate) fn xor_row(&mut self, src: usize, dst: usize) {
        debug_assert_ne!(src, dst);
        for limb in 0..self.stride {
            let value = self.data[src * self.stride + limb];
            self.data[dst * self.stride + limb] ^= value;
        }
    }

    /// Adds column `src` into column `dst`.
    pub(crate) fn xor_col(&mut self, src: usize, dst: usize) {
        debug_assert_ne!(src, dst);
        for row in 0..self.rows {
            if self.get(row, src) {
                let value = self.get(row, dst);
                self.set(row, dst, !value);
            }
        }
    }
}
