//! Component model and built-in component library

pub mod chain;
pub mod core;
pub mod library;
pub mod model;
pub mod properties;

pub use self::core::Component;
pub use chain::{Chain, ChainLink};
pub use library::{
    BeamSplitter, DirectionalCoupler, FaradayRotator, FastAxis, HalfWavePlate,
    MachZehnderInterferometer, PhaseShifter, PolarizationBeamSplitter, PolarizationRotator,
    Polarizer, QuarterWavePlate,
};
pub use model::{ComponentKind, FixedMatrix, ScatteringModel};
pub use properties::{is_lossless, is_passive, is_reciprocal};
