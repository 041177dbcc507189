//! Numerical constants for photonic circuit simulation
//!
//! Provides standardized tolerance values and physical constants
//! used throughout the library.

/// Tolerance for detecting near-zero values in division and singularity checks.
pub const NEAR_ZERO: f64 = 1e-15;

/// Default tolerance for component property checks (passivity, reciprocity, losslessness).
pub const PROPERTY_TOL: f64 = 1e-12;

/// Default upper bound on the 2-norm condition number of (I - S·C).
/// Systems above this bound are reported as singular.
pub const DEFAULT_CONDITION_LIMIT: f64 = 1e12;

/// Two wavelengths closer than this (in metres) are treated as equal.
pub const WAVELENGTH_TOLERANCE: f64 = 1e-12;

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;
