//! Error types shared by every stage of the simulation pipeline

use thiserror::Error;

use crate::circuit::{PortRef, PortUsage};

/// Errors raised while building, reducing, assembling or solving a circuit
#[derive(Error, Debug, Clone)]
pub enum LumenError {
    #[error("invalid light state: {0}")]
    InvalidLightState(String),

    #[error("matrix is {rows}x{cols}, expected {expected}x{expected} for a {ports}-port component")]
    DimensionMismatch {
        ports: usize,
        expected: usize,
        rows: usize,
        cols: usize,
    },

    #[error("unresolved port reference {0}")]
    UnresolvedPortReference(PortRef),

    #[error("ambiguous binding on {port}: port is already {existing}")]
    AmbiguousBinding { port: PortRef, existing: PortUsage },

    #[error("singular system at t = {time}: condition number {condition:e}")]
    SingularSystem { time: f64, condition: f64 },

    #[error("component '{0}' already exists in the circuit")]
    DuplicateComponent(String),

    #[error("port {0} cannot be connected to itself")]
    SelfConnection(PortRef),

    #[error("coherent sources disagree on wavelength at t = {time}: {first} m vs {second} m")]
    WavelengthMismatch { time: f64, first: f64, second: f64 },

    #[error("simulation cancelled before t = {time}")]
    Cancelled { time: f64 },
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, LumenError>;
