//! Component property checks
//!
//! Tests on an evaluated modified scattering matrix: reciprocity,
//! passivity and losslessness.

use ndarray::Array2;
use num_complex::Complex64;

use crate::constants::PROPERTY_TOL;
use crate::math::linalg::singular_values;
use crate::math::matrix_ops::{identity, max_abs_diff};

/// Test if the matrix is reciprocal
///
/// A component is reciprocal if S = S^T (transpose).
pub fn is_reciprocal(s: &Array2<Complex64>, tol: Option<f64>) -> bool {
    let tol = tol.unwrap_or(PROPERTY_TOL);
    s.is_square() && max_abs_diff(s, &s.t().to_owned()) <= tol
}

/// Test if the matrix is passive
///
/// Passive means no input state gains power: all singular values of S are
/// at most 1.
pub fn is_passive(s: &Array2<Complex64>, tol: Option<f64>) -> bool {
    let tol = tol.unwrap_or(PROPERTY_TOL);
    singular_values(s).first().map_or(true, |&max| max <= 1.0 + tol)
}

/// Test if the matrix is lossless
///
/// A component is lossless if S is unitary: S^H * S = I
pub fn is_lossless(s: &Array2<Complex64>, tol: Option<f64>) -> bool {
    let tol = tol.unwrap_or(PROPERTY_TOL);
    if !s.is_square() {
        return false;
    }
    let gram = s.t().mapv(|z| z.conj()).dot(s);
    max_abs_diff(&gram, &identity(s.nrows())) <= tol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_reciprocal() {
        let mut s = Array2::<Complex64>::zeros((2, 2));
        s[[0, 1]] = Complex64::new(0.5, 0.1);
        s[[1, 0]] = Complex64::new(0.5, 0.1);
        assert!(is_reciprocal(&s, None));

        s[[1, 0]] = Complex64::new(0.5, -0.1);
        assert!(!is_reciprocal(&s, None));
        assert!(is_reciprocal(&s, Some(0.25)));
        assert!(!is_reciprocal(&Array2::<Complex64>::zeros((2, 3)), None));
    }

    #[test]
    fn test_is_passive() {
        let mut s = Array2::<Complex64>::zeros((2, 2));
        s[[0, 0]] = Complex64::new(0.5, 0.0);
        assert!(is_passive(&s, None));

        // Column norms are fine but the coherent sum of both inputs gains power
        let g = Complex64::new(0.6, 0.0);
        let s = Array2::from_elem((2, 2), g);
        assert!(!is_passive(&s, None));
    }

    #[test]
    fn test_is_lossless() {
        let s = Array2::<Complex64>::eye(2);
        assert!(is_lossless(&s, None));

        let mut s = Array2::<Complex64>::eye(2);
        s[[1, 1]] = Complex64::new(0.5, 0.0);
        assert!(!is_lossless(&s, None));

        // 90 degree rotation with a phase is unitary
        let i = Complex64::new(0.0, 1.0);
        let mut r = Array2::<Complex64>::zeros((2, 2));
        r[[0, 1]] = i;
        r[[1, 0]] = i;
        assert!(is_lossless(&r, None));
        assert!(!is_lossless(&Array2::<Complex64>::zeros((2, 3)), None));
    }
}
