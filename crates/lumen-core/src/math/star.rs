//! Redheffer star product for cascaded scattering matrices
//!
//! A two-port modified scattering matrix is split into four polarization
//! blocks, `[[S11, S12], [S21, S22]]`, where `Sij` maps the field entering
//! port `j` to the field leaving port `i`. Connecting port 1 of `A` to port 0
//! of `B` yields a new two-port whose blocks are
//!
//! ```text
//! S11 = A11 + A12 (I - B11 A22)^-1 B11 A21
//! S12 = A12 (I - B11 A22)^-1 B12
//! S21 = B21 (I - A22 B11)^-1 A21
//! S22 = B22 + B21 (I - A22 B11)^-1 A22 B12
//! ```
//!
//! The product is associative but not commutative.

use ndarray::Array2;
use num_complex::Complex64;

use super::linalg::inv_complex;
use super::matrix_ops::{from_quadrants, identity, quadrants};

/// Star product `A ⋆ B`: port 1 of `a` feeds port 0 of `b`
///
/// Both matrices must be square, share the same even size and describe a
/// two-port (each half of the rows belongs to one port). Returns None if the
/// shapes disagree or if a round-trip term `I - A22 B11` is exactly
/// singular, which happens for a lossless resonance between the two
/// elements. Near-singular round trips are inverted as they are; callers
/// judge conditioning against their own limit.
pub fn redheffer_star(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Option<Array2<Complex64>> {
    let (n, m) = a.dim();
    if n != m || n % 2 != 0 || n == 0 || a.dim() != b.dim() {
        return None;
    }
    let k = n / 2;

    let (a11, a12, a21, a22) = quadrants(a);
    let (b11, b12, b21, b22) = quadrants(b);
    let eye = identity(k);

    // Round trips between A's port 1 and B's port 0, seen from each side
    let d_a = inv_complex(&(&eye - &b11.dot(&a22)))?;
    let d_b = inv_complex(&(&eye - &a22.dot(&b11)))?;

    let a12_da = a12.dot(&d_a);
    let b21_db = b21.dot(&d_b);

    let s11 = &a11 + &a12_da.dot(&b11).dot(&a21);
    let s12 = a12_da.dot(&b12);
    let s21 = b21_db.dot(&a21);
    let s22 = &b22 + &b21_db.dot(&a22).dot(&b12);

    Some(from_quadrants(&s11, &s12, &s21, &s22))
}

/// Swap the two ports of a two-port matrix
///
/// `flipped[i, j] = m[i', j']` where the port halves are exchanged.
pub fn flipped(m: &Array2<Complex64>) -> Array2<Complex64> {
    let (m11, m12, m21, m22) = quadrants(m);
    from_quadrants(&m22, &m21, &m12, &m11)
}
