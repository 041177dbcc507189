//! lumen-core: polarization-aware photonic circuit simulation
//!
//! Components are described by modified scattering matrices (MSMs) that
//! couple the horizontal and vertical field at each port. A circuit wires
//! components together, binds light sources to free ports and marks other
//! ports as outputs. The simulator reduces sequential chains with the
//! Redheffer star product, assembles the global system
//! `(I - S C) y = S a_ext` and solves it per time sample.
//!
//! ## Modules
//!
//! - `light` - Jones vectors, Stokes vectors, coherent and incoherent light
//! - `component` - Scattering model contract and component library
//! - `circuit` - Circuit graph, port references and light sources
//! - `reduction` - Chain reducer
//! - `system` - Global S, C and a_ext assembly
//! - `solver` - Per-sample coherent/incoherent solves
//! - `simulation` - Simulation driver and options
//! - `math` - Linear algebra, star product and unit conversions
//!
//! ## Example
//!
//! ```
//! use lumen_core::prelude::*;
//!
//! let mut circuit = Circuit::new("splitter");
//! circuit.add(Component::new("bs", BeamSplitter)).unwrap();
//! let light = CoherentLight::from_polar(1.0, 0.0, 0.0, 0.0, 1550e-9).unwrap();
//! circuit.set_input(("bs", 0), Laser::constant(light, Coherence::Coherent)).unwrap();
//! circuit.set_output(("bs", 2)).unwrap();
//!
//! let result = Simulation::new(&circuit).simulate(&[0.0]).unwrap();
//! let power = result.power(&PortRef::new("bs", 2)).unwrap();
//! assert!((power[0] - 0.5).abs() < 1e-12);
//! ```

pub mod circuit;
pub mod component;
pub mod constants;
pub mod error;
pub mod light;
pub mod math;
pub mod reduction;
pub mod result;
pub mod simulation;
pub mod solver;
pub mod system;

pub use circuit::{Circuit, Laser, PortRef};
pub use component::{Component, ComponentKind, ScatteringModel};
pub use error::{LumenError, Result};
pub use light::{CoherentLight, Coherence, IncoherentLight, JonesVector, Light, Stokes};
pub use result::{CircuitResponse, Polarization, SimulationResult};
pub use simulation::{Simulation, SimulationOptions};

/// Common imports for building and simulating circuits
pub mod prelude {
    pub use crate::circuit::{Circuit, Laser, PortRef};
    pub use crate::component::library::*;
    pub use crate::component::{Component, ComponentKind, FixedMatrix, ScatteringModel};
    pub use crate::error::LumenError;
    pub use crate::light::{CoherentLight, Coherence, IncoherentLight, JonesVector, Light, Stokes};
    pub use crate::result::{CircuitResponse, Polarization, SimulationResult};
    pub use crate::simulation::{Simulation, SimulationOptions};
}
