//! Light sources bound to circuit inputs

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::light::{CoherentLight, Coherence};

type SourceFn = dyn Fn(f64) -> Result<CoherentLight> + Send + Sync;

/// A time-dependent light source
///
/// The closure maps a time sample (s) to the emitted coherent state. The
/// coherence tag decides how the source superposes with the others:
/// coherent sources interfere, incoherent ones add in intensity.
#[derive(Clone)]
pub struct Laser {
    coherence: Coherence,
    source: Arc<SourceFn>,
}

impl Laser {
    pub fn coherent<F>(f: F) -> Self
    where
        F: Fn(f64) -> Result<CoherentLight> + Send + Sync + 'static,
    {
        Self {
            coherence: Coherence::Coherent,
            source: Arc::new(f),
        }
    }

    pub fn incoherent<F>(f: F) -> Self
    where
        F: Fn(f64) -> Result<CoherentLight> + Send + Sync + 'static,
    {
        Self {
            coherence: Coherence::Incoherent,
            source: Arc::new(f),
        }
    }

    /// A source emitting the same state at every time sample
    pub fn constant(light: CoherentLight, coherence: Coherence) -> Self {
        Self {
            coherence,
            source: Arc::new(move |_: f64| -> Result<CoherentLight> { Ok(light) }),
        }
    }

    pub fn coherence(&self) -> Coherence {
        self.coherence
    }

    pub fn is_coherent(&self) -> bool {
        self.coherence == Coherence::Coherent
    }

    /// Emitted light at time `t`
    pub fn emit(&self, time: f64) -> Result<CoherentLight> {
        (self.source)(time)
    }
}

impl fmt::Debug for Laser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Laser")
            .field("coherence", &self.coherence)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_dependent_source() {
        let laser = Laser::incoherent(|t| CoherentLight::from_polar(t, 0.0, 0.0, 0.0, 1550e-9));
        assert!(!laser.is_coherent());
        assert_eq!(laser.emit(2.0).unwrap().intensity(), 4.0);
        assert!(laser.emit(-1.0).is_err());
    }

    #[test]
    fn test_constant() {
        let light = CoherentLight::from_polar(1.0, 0.0, 1.0, 0.5, 1310e-9).unwrap();
        let laser = Laser::constant(light, Coherence::Coherent);
        assert!(laser.is_coherent());
        assert_eq!(laser.emit(0.0).unwrap(), light);
        assert_eq!(laser.emit(99.0).unwrap(), light);
    }
}
