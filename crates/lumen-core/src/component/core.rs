//! Named circuit components

use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;

use super::model::{check_dimensions, ComponentKind, FixedMatrix, ScatteringModel};
use crate::error::Result;

/// A named instance of a component kind
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    kind: ComponentKind,
}

impl Component {
    /// Create a component from any kind or library model
    ///
    /// # Example
    /// ```
    /// use lumen_core::component::{BeamSplitter, Component};
    /// let bs = Component::new("bs1", BeamSplitter);
    /// assert_eq!(bs.port_count(), 4);
    /// ```
    pub fn new(name: impl Into<String>, kind: impl Into<ComponentKind>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }

    /// Component with an explicit, constant `2N x 2N` matrix
    pub fn fixed(name: impl Into<String>, ports: usize, matrix: Array2<Complex64>) -> Result<Self> {
        Ok(Self::new(name, FixedMatrix::new(ports, matrix)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ComponentKind {
        &self.kind
    }

    pub fn port_count(&self) -> usize {
        self.kind.port_count()
    }

    /// Evaluate the matrix at time `t` and `wavelength`
    ///
    /// Fails with `DimensionMismatch` if the model returns a matrix that is
    /// not `2N x 2N`.
    pub fn matrix(&self, time: f64, wavelength: f64) -> Result<Array2<Complex64>> {
        let m = self.kind.matrix(time, wavelength)?;
        check_dimensions(self.port_count(), &m)?;
        Ok(m)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {} ports)", self.name, self.kind.label(), self.port_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LumenError;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Liar;

    impl ScatteringModel for Liar {
        fn port_count(&self) -> usize {
            2
        }

        fn matrix(&self, _time: f64, _wavelength: f64) -> Result<Array2<Complex64>> {
            Ok(Array2::zeros((2, 2)))
        }
    }

    #[test]
    fn test_matrix_revalidates_model_output() {
        let c = Component::new("liar", Arc::new(Liar) as Arc<dyn ScatteringModel>);
        let err = c.matrix(0.0, 1550e-9).unwrap_err();
        assert!(matches!(
            err,
            LumenError::DimensionMismatch {
                ports: 2,
                expected: 4,
                rows: 2,
                cols: 2
            }
        ));
    }

    #[test]
    fn test_fixed() {
        let c = Component::fixed("m", 1, -Array2::<Complex64>::eye(2)).unwrap();
        assert_eq!(c.port_count(), 1);
        assert_eq!(c.name(), "m");
        assert_eq!(c.to_string(), "m (fixed, 1 ports)");
        assert!(Component::fixed("bad", 2, Array2::zeros((2, 2))).is_err());
    }
}
