//! Incoherent light
//!
//! A set of mutually incoherent coherent states. Intensities and Stokes
//! vectors add; fields never do.

use std::fmt;

use super::coherent::CoherentLight;
use super::stokes::{Stokes, StokesParameter};
use crate::error::Result;

/// Ordered collection of mutually incoherent states
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncoherentLight {
    components: Vec<CoherentLight>,
}

impl IncoherentLight {
    pub fn new(components: Vec<CoherentLight>) -> Self {
        Self { components }
    }

    /// Light with no components (dark)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Decompose a (possibly partially polarized) Stokes vector
    ///
    /// The polarized part becomes one fully polarized state; the remaining
    /// unpolarized power is split evenly into an H and a V state.
    pub fn from_stokes(stokes: Stokes, wavelength: f64) -> Result<Self> {
        let p = stokes.polarized_intensity();
        let mut components = Vec::with_capacity(3);

        if p > 0.0 {
            let polarized = Stokes::new(p, stokes.s1, stokes.s2, stokes.s3);
            components.push(CoherentLight::from_stokes(polarized, wavelength, 0.0)?);
        }

        let unpolarized = stokes.s0 - p;
        if unpolarized > 0.0 {
            let amp = (0.5 * unpolarized).sqrt();
            components.push(CoherentLight::from_polar(amp, 0.0, 0.0, 0.0, wavelength)?);
            components.push(CoherentLight::from_polar(0.0, 0.0, amp, 0.0, wavelength)?);
        }

        Ok(Self { components })
    }

    pub fn components(&self) -> &[CoherentLight] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn push(&mut self, light: CoherentLight) {
        self.components.push(light);
    }

    /// Sum of the component Stokes vectors
    pub fn stokes(&self) -> Stokes {
        self.components.iter().map(CoherentLight::stokes).sum()
    }

    pub fn stokes_parameter(&self, parameter: StokesParameter) -> f64 {
        self.stokes().get(parameter)
    }

    pub fn intensity(&self) -> f64 {
        self.components.iter().map(CoherentLight::intensity).sum()
    }

    pub fn intensity_h(&self) -> f64 {
        self.components.iter().map(CoherentLight::intensity_h).sum()
    }

    pub fn intensity_v(&self) -> f64 {
        self.components.iter().map(CoherentLight::intensity_v).sum()
    }

    pub fn degree_of_polarization(&self) -> f64 {
        self.stokes().degree_of_polarization()
    }

    pub fn orientation_angle(&self) -> f64 {
        self.stokes().orientation_angle()
    }

    pub fn ellipticity_angle(&self) -> f64 {
        self.stokes().ellipticity_angle()
    }
}

impl From<CoherentLight> for IncoherentLight {
    fn from(light: CoherentLight) -> Self {
        Self::new(vec![light])
    }
}

impl FromIterator<CoherentLight> for IncoherentLight {
    fn from_iter<I: IntoIterator<Item = CoherentLight>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for IncoherentLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stokes();
        write!(
            f,
            "IncoherentLight {{ states: {}, intensity: {:.4e}, dop: {:.3}, stokes: ({:.3}, {:.3}, {:.3}, {:.3}) }}",
            self.components.len(),
            self.intensity(),
            self.degree_of_polarization(),
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

    const WL: f64 = 1550e-9;

    #[test]
    fn test_from_stokes_partially_polarized() {
        let target = Stokes::new(3.0, 0.5, 0.5, -1.0);
        let light = IncoherentLight::from_stokes(target, WL).unwrap();
        assert_eq!(light.len(), 3);

        let s = light.stokes();
        assert_relative_eq!(s.s0, 3.0, epsilon = 1e-12);
        assert_relative_eq!(s.s1, 0.5, epsilon = 1e-12);
        assert_relative_eq!(s.s2, 0.5, epsilon = 1e-12);
        assert_relative_eq!(s.s3, -1.0, epsilon = 1e-12);
        assert_relative_eq!(light.degree_of_polarization(), target.degree_of_polarization(), epsilon = 1e-12);
    }

    #[test]
    fn test_from_stokes_unpolarized() {
        let light = IncoherentLight::from_stokes(Stokes::new(2.0, 0.0, 0.0, 0.0), WL).unwrap();
        assert_eq!(light.len(), 2);
        assert_relative_eq!(light.intensity_h(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(light.intensity_v(), 1.0, epsilon = 1e-14);
        assert_relative_eq!(light.degree_of_polarization(), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_empty() {
        let light = IncoherentLight::empty();
        assert!(light.is_empty());
        assert_eq!(light.intensity(), 0.0);
        assert_eq!(light.stokes(), Stokes::default());
    }

    #[test]
    fn test_intensities_add() {
        let a = CoherentLight::from_polar(1.0, 0.0, 0.0, 0.0, WL).unwrap();
        let b = CoherentLight::from_polar(1.0, std::f64::consts::PI, 0.0, 0.0, WL).unwrap();
        let light: IncoherentLight = [a, b].into_iter().collect();
        // Opposite phases would cancel coherently; incoherently they add
        assert_relative_eq!(light.intensity(), 2.0, epsilon = 1e-14);
        assert_relative_eq!(light.stokes_parameter(StokesParameter::S1), 2.0, epsilon = 1e-14);
    }
}
