//! Stokes parameters
//!
//! Intensity-based description of a polarization state. Stokes vectors are
//! derived from Jones vectors for reporting and are never propagated through
//! the solver.
//!
//! Convention: `s0 = |h|^2 + |v|^2`, `s1 = |h|^2 - |v|^2`,
//! `s2 = 2 Re(h* v)`, `s3 = 2 Im(h* v)`.

use std::iter::Sum;
use std::ops::Add;

use super::jones::JonesVector;

/// Selector for a single Stokes parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StokesParameter {
    S0,
    S1,
    S2,
    S3,
}

/// Four-component Stokes vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stokes {
    pub s0: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
}

impl Stokes {
    pub fn new(s0: f64, s1: f64, s2: f64, s3: f64) -> Self {
        Self { s0, s1, s2, s3 }
    }

    pub fn from_jones(j: &JonesVector) -> Self {
        let cross = j.h.conj() * j.v;
        Self {
            s0: j.intensity_h() + j.intensity_v(),
            s1: j.intensity_h() - j.intensity_v(),
            s2: 2.0 * cross.re,
            s3: 2.0 * cross.im,
        }
    }

    pub fn get(&self, parameter: StokesParameter) -> f64 {
        match parameter {
            StokesParameter::S0 => self.s0,
            StokesParameter::S1 => self.s1,
            StokesParameter::S2 => self.s2,
            StokesParameter::S3 => self.s3,
        }
    }

    /// Intensity of the polarized part, `sqrt(s1^2 + s2^2 + s3^2)`
    pub fn polarized_intensity(&self) -> f64 {
        (self.s1 * self.s1 + self.s2 * self.s2 + self.s3 * self.s3).sqrt()
    }

    /// Degree of polarization, 0 for a dark state
    pub fn degree_of_polarization(&self) -> f64 {
        if self.s0 <= 0.0 {
            0.0
        } else {
            self.polarized_intensity() / self.s0
        }
    }

    /// Orientation of the polarization ellipse, `0.5 atan2(s2, s1)`
    pub fn orientation_angle(&self) -> f64 {
        0.5 * self.s2.atan2(self.s1)
    }

    /// Ellipticity angle, `0.5 asin(s3 / |s_pol|)`; 0 when unpolarized
    pub fn ellipticity_angle(&self) -> f64 {
        let p = self.polarized_intensity();
        if p <= 0.0 {
            return 0.0;
        }
        0.5 * (self.s3 / p).clamp(-1.0, 1.0).asin()
    }

    /// Parameters as an array `[s0, s1, s2, s3]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.s0, self.s1, self.s2, self.s3]
    }
}

impl Add for Stokes {
    type Output = Stokes;

    fn add(self, rhs: Stokes) -> Stokes {
        Stokes {
            s0: self.s0 + rhs.s0,
            s1: self.s1 + rhs.s1,
            s2: self.s2 + rhs.s2,
            s3: self.s3 + rhs.s3,
        }
    }
}

impl Sum for Stokes {
    fn sum<I: Iterator<Item = Stokes>>(iter: I) -> Self {
        iter.fold(Stokes::default(), |acc, s| acc + s)
    }
}
