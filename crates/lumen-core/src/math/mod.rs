//! Mathematical helpers module
//!
//! Unit conversions, block-matrix helpers, the Redheffer star product and
//! the dense linear-algebra backend.

pub mod conversions;
pub mod linalg;
pub mod matrix_ops;
pub mod star;

pub use conversions::*;
pub use star::{flipped, redheffer_star};
