//! Matrix operation helpers
//!
//! Provides block-matrix utilities used by the star product, chains and the
//! global system assembler, so the callers don't carry nested index loops.

use ndarray::{s, Array2};
use num_complex::Complex64;

/// Identity matrix of given size
#[inline]
pub fn identity(n: usize) -> Array2<Complex64> {
    Array2::<Complex64>::eye(n)
}

/// Copy the `size x size` block whose top-left corner is `(row, col)`
#[inline]
pub fn block(m: &Array2<Complex64>, row: usize, col: usize, size: usize) -> Array2<Complex64> {
    m.slice(s![row..row + size, col..col + size]).to_owned()
}

/// Write `value` into `m` with its top-left corner at `(row, col)`
#[inline]
pub fn set_block(m: &mut Array2<Complex64>, row: usize, col: usize, value: &Array2<Complex64>) {
    let (r, c) = value.dim();
    m.slice_mut(s![row..row + r, col..col + c]).assign(value);
}

/// Split a `2k x 2k` matrix into its four `k x k` quadrants (11, 12, 21, 22)
pub fn quadrants(
    m: &Array2<Complex64>,
) -> (
    Array2<Complex64>,
    Array2<Complex64>,
    Array2<Complex64>,
    Array2<Complex64>,
) {
    let k = m.nrows() / 2;
    (
        block(m, 0, 0, k),
        block(m, 0, k, k),
        block(m, k, 0, k),
        block(m, k, k, k),
    )
}

/// Assemble a `2k x 2k` matrix from four `k x k` quadrants
pub fn from_quadrants(
    m11: &Array2<Complex64>,
    m12: &Array2<Complex64>,
    m21: &Array2<Complex64>,
    m22: &Array2<Complex64>,
) -> Array2<Complex64> {
    let k = m11.nrows();
    let mut m = Array2::<Complex64>::zeros((2 * k, 2 * k));
    set_block(&mut m, 0, 0, m11);
    set_block(&mut m, 0, k, m12);
    set_block(&mut m, k, 0, m21);
    set_block(&mut m, k, k, m22);
    m
}

/// Block-diagonal concatenation of square matrices
pub fn block_diag(blocks: &[Array2<Complex64>]) -> Array2<Complex64> {
    let n: usize = blocks.iter().map(|b| b.nrows()).sum();
    let mut m = Array2::<Complex64>::zeros((n, n));
    let mut offset = 0;
    for b in blocks {
        set_block(&mut m, offset, offset, b);
        offset += b.nrows();
    }
    m
}

/// Largest elementwise distance `max |a_ij - b_ij|`, or infinity on shape mismatch
pub fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    if a.dim() != b.dim() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_quadrants_round_trip() {
        let m = Array2::from_shape_fn((4, 4), |(i, j)| c((4 * i + j) as f64));
        let (a, b, cc, d) = quadrants(&m);
        assert_eq!(a[[1, 1]], c(5.0));
        assert_eq!(b[[0, 0]], c(2.0));
        assert_eq!(cc[[0, 1]], c(9.0));
        assert_eq!(d[[1, 1]], c(15.0));
        assert_eq!(from_quadrants(&a, &b, &cc, &d), m);
    }

    #[test]
    fn test_block_diag() {
        let a = Array2::from_elem((2, 2), c(1.0));
        let b = Array2::from_elem((4, 4), c(2.0));
        let m = block_diag(&[a, b]);
        assert_eq!(m.dim(), (6, 6));
        assert_eq!(m[[1, 1]], c(1.0));
        assert_eq!(m[[5, 2]], c(2.0));
        assert_eq!(m[[0, 2]], c(0.0));
        assert_eq!(m[[3, 1]], c(0.0));
    }
}
