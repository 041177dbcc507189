//! Jones vectors
//!
//! A Jones vector holds the complex field amplitudes of the horizontal and
//! vertical polarization components of a fully coherent wave. It is the
//! quantity propagated through the scattering matrices.

use std::iter::Sum;
use std::ops::{Add, Mul};

use num_complex::Complex64;

use super::stokes::Stokes;
use crate::error::{LumenError, Result};

/// Complex amplitude pair `(h, v)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JonesVector {
    /// Horizontal component
    pub h: Complex64,
    /// Vertical component
    pub v: Complex64,
}

impl JonesVector {
    /// Create from the complex components directly
    pub fn new(h: Complex64, v: Complex64) -> Self {
        Self { h, v }
    }

    /// Create from amplitude and phase (radians) of each component
    ///
    /// Fails with `InvalidLightState` if an amplitude is negative or any
    /// argument is not finite.
    pub fn from_polar(amp_h: f64, phase_h: f64, amp_v: f64, phase_v: f64) -> Result<Self> {
        for (label, amp) in [("horizontal", amp_h), ("vertical", amp_v)] {
            if !amp.is_finite() || amp < 0.0 {
                return Err(LumenError::InvalidLightState(format!(
                    "{} amplitude must be finite and non-negative, got {}",
                    label, amp
                )));
            }
        }
        if !phase_h.is_finite() || !phase_v.is_finite() {
            return Err(LumenError::InvalidLightState(format!(
                "phases must be finite, got ({}, {})",
                phase_h, phase_v
            )));
        }
        Ok(Self {
            h: Complex64::from_polar(amp_h, phase_h),
            v: Complex64::from_polar(amp_v, phase_v),
        })
    }

    /// The null field
    pub fn zero() -> Self {
        Self::default()
    }

    /// Multiply both components by a complex factor
    pub fn scale(&self, factor: Complex64) -> Self {
        Self {
            h: self.h * factor,
            v: self.v * factor,
        }
    }

    /// True if both components are finite
    pub fn is_finite(&self) -> bool {
        self.h.is_finite() && self.v.is_finite()
    }

    /// Total intensity `|h|^2 + |v|^2`
    pub fn intensity(&self) -> f64 {
        self.h.norm_sqr() + self.v.norm_sqr()
    }

    pub fn intensity_h(&self) -> f64 {
        self.h.norm_sqr()
    }

    pub fn intensity_v(&self) -> f64 {
        self.v.norm_sqr()
    }

    /// Phase of the vertical component relative to the horizontal one, in (-pi, pi]
    pub fn relative_phase(&self) -> f64 {
        (self.h.conj() * self.v).arg()
    }

    pub fn to_stokes(&self) -> Stokes {
        Stokes::from_jones(self)
    }
}

impl Add for JonesVector {
    type Output = JonesVector;

    fn add(self, rhs: JonesVector) -> JonesVector {
        JonesVector {
            h: self.h + rhs.h,
            v: self.v + rhs.v,
        }
    }
}

impl Mul<Complex64> for JonesVector {
    type Output = JonesVector;

    fn mul(self, rhs: Complex64) -> JonesVector {
        self.scale(rhs)
    }
}

impl Sum for JonesVector {
    fn sum<I: Iterator<Item = JonesVector>>(iter: I) -> Self {
        iter.fold(JonesVector::zero(), |acc, j| acc + j)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_from_polar() {
        let j = JonesVector::from_polar(1.0, 0.0, 2.0, FRAC_PI_2).unwrap();
        assert_relative_eq!(j.h.re, 1.0, epsilon = 1e-15);
        assert_relative_eq!(j.v.im, 2.0, epsilon = 1e-15);
        assert_relative_eq!(j.intensity(), 5.0, epsilon = 1e-14);
        assert_relative_eq!(j.relative_phase(), FRAC_PI_2, epsilon = 1e-15);
    }

    #[test]
    fn test_from_polar_rejects_negative_amplitude() {
        let err = JonesVector::from_polar(-1.0, 0.0, 1.0, 0.0).unwrap_err();
        assert!(matches!(err, LumenError::InvalidLightState(_)));
        assert!(JonesVector::from_polar(1.0, f64::NAN, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_superposition() {
        let a = JonesVector::new(Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0));
        let b = JonesVector::new(Complex64::new(-1.0, 0.0), Complex64::new(0.0, 1.0));
        let sum: JonesVector = [a, b].into_iter().sum();
        assert_relative_eq!(sum.h.norm(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(sum.v.im, 2.0, epsilon = 1e-15);

        let scaled = a * Complex64::new(0.0, 2.0);
        assert_eq!(scaled, a.scale(Complex64::new(0.0, 2.0)));
        assert_relative_eq!(scaled.h.im, 2.0, epsilon = 1e-15);
    }
}
