//! Linear algebra operations
//!
//! This module provides a unified interface for the dense matrix operations
//! the solver needs. It uses nalgebra as the backend; all ndarray<->nalgebra
//! conversions are contained here so callers only ever see ndarray types.

use nalgebra::DMatrix;
use ndarray::Array2;
use num_complex::Complex64;

use crate::constants::NEAR_ZERO;

// ============================================================================
// Conversion helpers (internal)
// ============================================================================

/// Convert ndarray Array2<Complex64> to nalgebra DMatrix<Complex<f64>>
#[inline]
fn to_na_complex(a: &Array2<Complex64>) -> DMatrix<nalgebra::Complex<f64>> {
    let (m, n) = a.dim();
    DMatrix::from_fn(m, n, |i, j| {
        nalgebra::Complex::new(a[[i, j]].re, a[[i, j]].im)
    })
}

/// Convert nalgebra DMatrix<Complex<f64>> to ndarray Array2<Complex64>
#[inline]
fn from_na_complex(m: &DMatrix<nalgebra::Complex<f64>>) -> Array2<Complex64> {
    let rows = m.nrows();
    let cols = m.ncols();
    Array2::from_shape_fn((rows, cols), |(i, j)| {
        Complex64::new(m[(i, j)].re, m[(i, j)].im)
    })
}

// ============================================================================
// Inversion and solves
// ============================================================================

/// Invert a complex matrix
///
/// Returns None if matrix is singular or non-square.
pub fn inv_complex(a: &Array2<Complex64>) -> Option<Array2<Complex64>> {
    let (m, n) = a.dim();
    if m != n || m == 0 {
        return None;
    }

    let mat = to_na_complex(a);
    mat.try_inverse().map(|inv| from_na_complex(&inv))
}

/// Solve `A X = B` for a matrix right-hand side with one dense LU
/// factorization of `A`
///
/// Returns None if `A` is singular, non-square, or `B` has the wrong number
/// of rows.
pub fn solve_complex_multi(
    a: &Array2<Complex64>,
    b: &Array2<Complex64>,
) -> Option<Array2<Complex64>> {
    let (m, n) = a.dim();
    if m != n || b.nrows() != m {
        return None;
    }
    if m == 0 {
        return Some(Array2::zeros((0, b.ncols())));
    }

    let lu = to_na_complex(a).lu();
    let x = lu.solve(&to_na_complex(b))?;
    Some(from_na_complex(&x))
}

// ============================================================================
// Singular Value Decomposition
// ============================================================================

/// Compute singular values of a complex matrix (descending order)
pub fn singular_values(a: &Array2<Complex64>) -> Vec<f64> {
    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let mat = to_na_complex(a);
    let svd = mat.svd(false, false);
    let mut sv: Vec<f64> = svd.singular_values.iter().cloned().collect();
    sv.sort_by(|x, y| y.total_cmp(x));
    sv
}

/// 2-norm condition number `sigma_max / sigma_min`
///
/// Returns infinity when the smallest singular value vanishes. An empty
/// matrix is perfectly conditioned.
pub fn condition_number(a: &Array2<Complex64>) -> f64 {
    let sv = singular_values(a);
    let (Some(&max), Some(&min)) = (sv.first(), sv.last()) else {
        return 1.0;
    };
    if min <= NEAR_ZERO * max.max(1.0) {
        f64::INFINITY
    } else {
        max / min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_inv_complex() {
        let a = Array2::from_shape_vec(
            (2, 2),
            vec![c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0), c(4.0, 0.0)],
        )
        .unwrap();

        let inv = inv_complex(&a).unwrap();

        // A * A^(-1) should be identity
        let product = a.dot(&inv);
        assert_relative_eq!(product[[0, 0]].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(product[[1, 1]].re, 1.0, epsilon = 1e-10);
        assert_relative_eq!(product[[0, 1]].norm(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(product[[1, 0]].norm(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_inv_complex_rejects_non_square() {
        let a = Array2::<Complex64>::zeros((2, 3));
        assert!(inv_complex(&a).is_none());
    }

    #[test]
    fn test_solve_complex_multi() {
        // [1 i; 0 2] X = [[1+i, 0], [4, 2]]  ->  X = [[1 - i, -i], [2, 1]]
        let a = Array2::from_shape_vec(
            (2, 2),
            vec![c(1.0, 0.0), c(0.0, 1.0), c(0.0, 0.0), c(2.0, 0.0)],
        )
        .unwrap();
        let b = Array2::from_shape_vec(
            (2, 2),
            vec![c(1.0, 1.0), c(0.0, 0.0), c(4.0, 0.0), c(2.0, 0.0)],
        )
        .unwrap();

        let x = solve_complex_multi(&a, &b).unwrap();
        assert_relative_eq!(x[[0, 0]].re, 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[[0, 0]].im, -1.0, epsilon = 1e-12);
        assert_relative_eq!(x[[1, 0]].re, 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[[0, 1]].im, -1.0, epsilon = 1e-12);
        assert_relative_eq!(x[[1, 1]].re, 1.0, epsilon = 1e-12);

        let residual = a.dot(&x) - &b;
        assert!(residual.iter().all(|z| z.norm() < 1e-12));
    }

    #[test]
    fn test_solve_complex_multi_rejects_bad_shapes() {
        let a = Array2::<Complex64>::eye(3);
        assert!(solve_complex_multi(&a, &Array2::zeros((2, 1))).is_none());
        assert!(solve_complex_multi(&Array2::zeros((2, 3)), &Array2::zeros((2, 1))).is_none());
        assert!(solve_complex_multi(&Array2::<Complex64>::zeros((2, 2)), &Array2::zeros((2, 1))).is_none());
    }

    #[test]
    fn test_singular_values() {
        let mut a = Array2::<Complex64>::zeros((2, 2));
        a[[0, 0]] = c(3.0, 0.0);
        a[[1, 1]] = c(0.0, 4.0);

        let sv = singular_values(&a);
        assert_eq!(sv.len(), 2);
        assert_relative_eq!(sv[0], 4.0, epsilon = 1e-10);
        assert_relative_eq!(sv[1], 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_condition_number() {
        let eye = Array2::<Complex64>::eye(4);
        assert_relative_eq!(condition_number(&eye), 1.0, epsilon = 1e-12);

        let zero = Array2::<Complex64>::zeros((2, 2));
        assert!(condition_number(&zero).is_infinite());

        let mut d = Array2::<Complex64>::eye(2);
        d[[1, 1]] = c(0.01, 0.0);
        assert_relative_eq!(condition_number(&d), 100.0, epsilon = 1e-8);
    }
}
