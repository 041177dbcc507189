//! Circuit graph: components, connections and external bindings

pub mod graph;
pub mod laser;
pub mod port;

pub use graph::{Circuit, Connection, InputBinding};
pub use laser::Laser;
pub use port::{PortRef, PortUsage};
