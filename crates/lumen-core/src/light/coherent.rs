//! Coherent light

use std::fmt;

use num_complex::Complex64;

use super::jones::JonesVector;
use super::stokes::{Stokes, StokesParameter};
use crate::error::{LumenError, Result};
use crate::math::conversions::wavelength_2_frequency;

/// A single Jones vector at a vacuum wavelength (metres)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoherentLight {
    jones: JonesVector,
    wavelength: f64,
}

fn check_wavelength(wavelength: f64) -> Result<()> {
    if wavelength.is_finite() && wavelength > 0.0 {
        Ok(())
    } else {
        Err(LumenError::InvalidLightState(format!(
            "wavelength must be finite and positive, got {}",
            wavelength
        )))
    }
}

impl CoherentLight {
    /// Create from a Jones vector
    ///
    /// Fails with `InvalidLightState` if the wavelength is not finite and
    /// positive or the field has non-finite components.
    pub fn new(jones: JonesVector, wavelength: f64) -> Result<Self> {
        check_wavelength(wavelength)?;
        if !jones.is_finite() {
            return Err(LumenError::InvalidLightState(format!(
                "field components must be finite, got {:?}",
                jones
            )));
        }
        Ok(Self { jones, wavelength })
    }

    /// Create from the complex horizontal and vertical components
    pub fn from_jones(h: Complex64, v: Complex64, wavelength: f64) -> Result<Self> {
        Self::new(JonesVector::new(h, v), wavelength)
    }

    /// Create from amplitude and phase of each component
    pub fn from_polar(
        amp_h: f64,
        phase_h: f64,
        amp_v: f64,
        phase_v: f64,
        wavelength: f64,
    ) -> Result<Self> {
        Self::new(JonesVector::from_polar(amp_h, phase_h, amp_v, phase_v)?, wavelength)
    }

    /// Fully polarized light matching a Stokes vector
    ///
    /// Uses the IEEE convention: for right-hand circular light the vertical
    /// component leads the horizontal one. Only the polarized part of the
    /// Stokes vector is honoured; `s0` must be non-negative and not smaller
    /// than the polarized intensity.
    pub fn from_stokes(stokes: Stokes, wavelength: f64, global_phase: f64) -> Result<Self> {
        let p = stokes.polarized_intensity();
        if !stokes.s0.is_finite() || !p.is_finite() || stokes.s0 < 0.0 {
            return Err(LumenError::InvalidLightState(format!(
                "invalid Stokes vector {:?}",
                stokes
            )));
        }
        if p > stokes.s0 * (1.0 + 1e-12) + 1e-15 {
            return Err(LumenError::InvalidLightState(format!(
                "degree of polarization exceeds 1 for {:?}",
                stokes
            )));
        }

        let amp_h = (0.5 * (stokes.s0 + stokes.s1)).max(0.0).sqrt();
        let amp_v = (0.5 * (stokes.s0 - stokes.s1)).max(0.0).sqrt();
        let delta = stokes.s3.atan2(stokes.s2);
        Self::from_polar(amp_h, global_phase, amp_v, global_phase + delta, wavelength)
    }

    pub fn jones(&self) -> JonesVector {
        self.jones
    }

    pub fn h(&self) -> Complex64 {
        self.jones.h
    }

    pub fn v(&self) -> Complex64 {
        self.jones.v
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    /// Optical frequency `c / lambda` in Hz
    pub fn frequency(&self) -> f64 {
        wavelength_2_frequency(self.wavelength)
    }

    pub fn intensity(&self) -> f64 {
        self.jones.intensity()
    }

    pub fn intensity_h(&self) -> f64 {
        self.jones.intensity_h()
    }

    pub fn intensity_v(&self) -> f64 {
        self.jones.intensity_v()
    }

    pub fn stokes(&self) -> Stokes {
        self.jones.to_stokes()
    }

    pub fn stokes_parameter(&self, parameter: StokesParameter) -> f64 {
        self.stokes().get(parameter)
    }

    pub fn orientation_angle(&self) -> f64 {
        self.stokes().orientation_angle()
    }

    pub fn ellipticity_angle(&self) -> f64 {
        self.stokes().ellipticity_angle()
    }
}

impl fmt::Display for CoherentLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stokes();
        write!(
            f,
            "CoherentLight {{ wavelength: {:.1} nm, intensity: {:.4e}, jones: [{:.3}, {:.3}], stokes: ({:.3}, {:.3}, {:.3}, {:.3}) }}",
            self.wavelength * 1e9,
            self.intensity(),
            self.jones.h,
            self.jones.v,
            s.s0,
            s.s1,
            s.s2,
            s.s3
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_bad_wavelength() {
        let j = JonesVector::new(Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0));
        assert!(CoherentLight::new(j, 0.0).is_err());
        assert!(CoherentLight::new(j, -1550e-9).is_err());
        assert!(CoherentLight::new(j, f64::INFINITY).is_err());
        assert!(CoherentLight::new(j, 1550e-9).is_ok());
    }

    #[test]
    fn test_rejects_non_finite_field() {
        let err = CoherentLight::from_jones(Complex64::new(f64::NAN, 0.0), Complex64::new(0.0, 0.0), 1e-6)
            .unwrap_err();
        assert!(matches!(err, LumenError::InvalidLightState(_)));
    }

    #[test]
    fn test_from_stokes_round_trip() {
        let target = Stokes::new(2.0, 0.4, -1.2, 1.5);
        // Scale s0 so the state is fully polarized
        let target = Stokes::new(target.polarized_intensity(), target.s1, target.s2, target.s3);
        let light = CoherentLight::from_stokes(target, 1310e-9, 0.3).unwrap();
        let s = light.stokes();
        assert_relative_eq!(s.s0, target.s0, epsilon = 1e-12);
        assert_relative_eq!(s.s1, target.s1, epsilon = 1e-12);
        assert_relative_eq!(s.s2, target.s2, epsilon = 1e-12);
        assert_relative_eq!(s.s3, target.s3, epsilon = 1e-12);
        assert_relative_eq!(light.h().arg(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_from_stokes_right_circular_has_vertical_leading() {
        let light = CoherentLight::from_stokes(Stokes::new(1.0, 0.0, 0.0, 1.0), 1550e-9, 0.0).unwrap();
        assert_relative_eq!(light.jones().relative_phase(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_from_stokes_rejects_overpolarized() {
        assert!(CoherentLight::from_stokes(Stokes::new(1.0, 1.0, 1.0, 0.0), 1550e-9, 0.0).is_err());
        assert!(CoherentLight::from_stokes(Stokes::new(-1.0, 0.0, 0.0, 0.0), 1550e-9, 0.0).is_err());
    }

    #[test]
    fn test_frequency() {
        let light = CoherentLight::from_polar(1.0, 0.0, 0.0, 0.0, 1550e-9).unwrap();
        assert_relative_eq!(light.frequency(), 1.934_144_890_322_580_6e14, max_relative = 1e-12);
    }
}
