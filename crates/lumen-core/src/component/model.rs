//! Scattering model contract
//!
//! Every component, whether from the built-in library, a condensed chain or
//! an external crate, exposes a port count `N` and a function
//! `matrix(t, wavelength)` returning its `2N x 2N` modified scattering
//! matrix. Entry `S[2i+p, 2j+q]` couples polarization `q` entering port `j`
//! to polarization `p` leaving port `i`, with `0 = H` and `1 = V`.

use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex64;

use super::chain::Chain;
use super::library::{
    BeamSplitter, DirectionalCoupler, FaradayRotator, HalfWavePlate, MachZehnderInterferometer,
    PhaseShifter, PolarizationBeamSplitter, PolarizationRotator, Polarizer, QuarterWavePlate,
};
use crate::error::{LumenError, Result};

/// Matrix contract implemented by every component kind
pub trait ScatteringModel: Send + Sync + fmt::Debug {
    /// Number of physical ports `N`
    fn port_count(&self) -> usize;

    /// The `2N x 2N` modified scattering matrix at time `t` (s) and vacuum
    /// wavelength (m)
    fn matrix(&self, time: f64, wavelength: f64) -> Result<Array2<Complex64>>;
}

/// Check that `matrix` is `2N x 2N` for an `N`-port component
pub fn check_dimensions(ports: usize, matrix: &Array2<Complex64>) -> Result<()> {
    let (rows, cols) = matrix.dim();
    let expected = 2 * ports;
    if rows != expected || cols != expected {
        return Err(LumenError::DimensionMismatch {
            ports,
            expected,
            rows,
            cols,
        });
    }
    Ok(())
}

// ============================================================================
// Fixed matrix
// ============================================================================

/// A component whose matrix does not depend on time or wavelength
#[derive(Debug, Clone, PartialEq)]
pub struct FixedMatrix {
    ports: usize,
    matrix: Array2<Complex64>,
}

impl FixedMatrix {
    /// Wrap an explicit MSM for an `ports`-port device
    ///
    /// Fails with `DimensionMismatch` unless the matrix is `2N x 2N` with
    /// `N = ports >= 1`.
    pub fn new(ports: usize, matrix: Array2<Complex64>) -> Result<Self> {
        if ports == 0 {
            let (rows, cols) = matrix.dim();
            return Err(LumenError::DimensionMismatch {
                ports,
                expected: 0,
                rows,
                cols,
            });
        }
        check_dimensions(ports, &matrix)?;
        Ok(Self { ports, matrix })
    }

    pub fn as_matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }
}

impl ScatteringModel for FixedMatrix {
    fn port_count(&self) -> usize {
        self.ports
    }

    fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
        Ok(self.matrix.clone())
    }
}

// ============================================================================
// Component kinds
// ============================================================================

/// Closed set of component kinds known to the simulator
///
/// `Custom` admits any external [`ScatteringModel`].
#[derive(Debug, Clone)]
pub enum ComponentKind {
    Fixed(FixedMatrix),
    PhaseShifter(PhaseShifter),
    BeamSplitter(BeamSplitter),
    DirectionalCoupler(DirectionalCoupler),
    Polarizer(Polarizer),
    HalfWavePlate(HalfWavePlate),
    QuarterWavePlate(QuarterWavePlate),
    PolarizationRotator(PolarizationRotator),
    FaradayRotator(FaradayRotator),
    PolarizationBeamSplitter(PolarizationBeamSplitter),
    MachZehnderInterferometer(MachZehnderInterferometer),
    Chain(Chain),
    Custom(Arc<dyn ScatteringModel>),
}

impl ComponentKind {
    fn model(&self) -> &dyn ScatteringModel {
        match self {
            ComponentKind::Fixed(m) => m,
            ComponentKind::PhaseShifter(m) => m,
            ComponentKind::BeamSplitter(m) => m,
            ComponentKind::DirectionalCoupler(m) => m,
            ComponentKind::Polarizer(m) => m,
            ComponentKind::HalfWavePlate(m) => m,
            ComponentKind::QuarterWavePlate(m) => m,
            ComponentKind::PolarizationRotator(m) => m,
            ComponentKind::FaradayRotator(m) => m,
            ComponentKind::PolarizationBeamSplitter(m) => m,
            ComponentKind::MachZehnderInterferometer(m) => m,
            ComponentKind::Chain(m) => m,
            ComponentKind::Custom(m) => m.as_ref(),
        }
    }

    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::Fixed(_) => "fixed",
            ComponentKind::PhaseShifter(_) => "phase-shifter",
            ComponentKind::BeamSplitter(_) => "beam-splitter",
            ComponentKind::DirectionalCoupler(_) => "directional-coupler",
            ComponentKind::Polarizer(_) => "polarizer",
            ComponentKind::HalfWavePlate(_) => "half-wave-plate",
            ComponentKind::QuarterWavePlate(_) => "quarter-wave-plate",
            ComponentKind::PolarizationRotator(_) => "polarization-rotator",
            ComponentKind::FaradayRotator(_) => "faraday-rotator",
            ComponentKind::PolarizationBeamSplitter(_) => "polarization-beam-splitter",
            ComponentKind::MachZehnderInterferometer(_) => "mach-zehnder",
            ComponentKind::Chain(_) => "chain",
            ComponentKind::Custom(_) => "custom",
        }
    }
}

impl ScatteringModel for ComponentKind {
    fn port_count(&self) -> usize {
        self.model().port_count()
    }

    fn matrix(&self, time: f64, wavelength: f64) -> Result<Array2<Complex64>> {
        self.model().matrix(time, wavelength)
    }
}

macro_rules! impl_from_model {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for ComponentKind {
                fn from(model: $variant) -> Self {
                    ComponentKind::$variant(model)
                }
            }
        )*
    };
}

impl_from_model!(
    PhaseShifter,
    BeamSplitter,
    DirectionalCoupler,
    Polarizer,
    HalfWavePlate,
    QuarterWavePlate,
    PolarizationRotator,
    FaradayRotator,
    PolarizationBeamSplitter,
    MachZehnderInterferometer,
    Chain,
);

impl From<FixedMatrix> for ComponentKind {
    fn from(model: FixedMatrix) -> Self {
        ComponentKind::Fixed(model)
    }
}

impl From<Arc<dyn ScatteringModel>> for ComponentKind {
    fn from(model: Arc<dyn ScatteringModel>) -> Self {
        ComponentKind::Custom(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_rejects_odd_dimensions() {
        let err = FixedMatrix::new(1, Array2::zeros((3, 3))).unwrap_err();
        assert!(matches!(
            err,
            LumenError::DimensionMismatch {
                ports: 1,
                expected: 2,
                rows: 3,
                cols: 3
            }
        ));
    }

    #[test]
    fn test_fixed_rejects_wrong_port_count() {
        assert!(FixedMatrix::new(2, Array2::zeros((2, 2))).is_err());
        assert!(FixedMatrix::new(1, Array2::zeros((2, 4))).is_err());
        assert!(FixedMatrix::new(0, Array2::zeros((0, 0))).is_err());
        assert!(FixedMatrix::new(3, Array2::zeros((6, 6))).is_ok());
    }

    #[derive(Debug)]
    struct Mirror;

    impl ScatteringModel for Mirror {
        fn port_count(&self) -> usize {
            1
        }

        fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
            Ok(-Array2::<Complex64>::eye(2))
        }
    }

    #[test]
    fn test_custom_model_dispatch() {
        let kind = ComponentKind::from(Arc::new(Mirror) as Arc<dyn ScatteringModel>);
        assert_eq!(kind.port_count(), 1);
        assert_eq!(kind.label(), "custom");
        let m = kind.matrix(0.0, 1550e-9).unwrap();
        assert_eq!(m[[1, 1]], Complex64::new(-1.0, 0.0));
    }
}
