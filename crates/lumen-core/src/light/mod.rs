//! Light representation
//!
//! Jones vectors are what the solver propagates. Stokes vectors, coherent
//! light and incoherent light wrap them for reporting.

pub mod coherent;
pub mod incoherent;
pub mod jones;
pub mod stokes;

pub use coherent::CoherentLight;
pub use incoherent::IncoherentLight;
pub use jones::JonesVector;
pub use stokes::{Stokes, StokesParameter};

use std::fmt;

/// Whether sources superpose in field (coherent) or in intensity (incoherent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coherence {
    #[default]
    Coherent,
    Incoherent,
}

impl fmt::Display for Coherence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coherence::Coherent => write!(f, "coherent"),
            Coherence::Incoherent => write!(f, "incoherent"),
        }
    }
}

/// Light observed at a port for one time sample
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Coherent(CoherentLight),
    Incoherent(IncoherentLight),
}

impl Light {
    pub fn coherence(&self) -> Coherence {
        match self {
            Light::Coherent(_) => Coherence::Coherent,
            Light::Incoherent(_) => Coherence::Incoherent,
        }
    }

    pub fn as_coherent(&self) -> Option<&CoherentLight> {
        match self {
            Light::Coherent(l) => Some(l),
            Light::Incoherent(_) => None,
        }
    }

    pub fn as_incoherent(&self) -> Option<&IncoherentLight> {
        match self {
            Light::Coherent(_) => None,
            Light::Incoherent(l) => Some(l),
        }
    }

    pub fn stokes(&self) -> Stokes {
        match self {
            Light::Coherent(l) => l.stokes(),
            Light::Incoherent(l) => l.stokes(),
        }
    }

    pub fn intensity(&self) -> f64 {
        match self {
            Light::Coherent(l) => l.intensity(),
            Light::Incoherent(l) => l.intensity(),
        }
    }

    pub fn intensity_h(&self) -> f64 {
        match self {
            Light::Coherent(l) => l.intensity_h(),
            Light::Incoherent(l) => l.intensity_h(),
        }
    }

    pub fn intensity_v(&self) -> f64 {
        match self {
            Light::Coherent(l) => l.intensity_v(),
            Light::Incoherent(l) => l.intensity_v(),
        }
    }
}

impl From<CoherentLight> for Light {
    fn from(light: CoherentLight) -> Self {
        Light::Coherent(light)
    }
}

impl From<IncoherentLight> for Light {
    fn from(light: IncoherentLight) -> Self {
        Light::Incoherent(light)
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Light::Coherent(l) => l.fmt(f),
            Light::Incoherent(l) => l.fmt(f),
        }
    }
}
