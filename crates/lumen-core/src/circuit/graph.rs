//! Circuit graph
//!
//! Components are stored in insertion order; connections, input bindings
//! and outputs refer to them by `PortRef`. Every mutation is validated
//! eagerly so a circuit handed to the solver is always well formed: each
//! port is unused, connected once, bound to one source, or observed as one
//! output.

use std::collections::HashMap;

use super::laser::Laser;
use super::port::{PortRef, PortUsage};
use crate::component::Component;
use crate::error::{LumenError, Result};

/// An internal link between two distinct ports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source: PortRef,
    pub destination: PortRef,
}

impl Connection {
    pub fn involves(&self, port: &PortRef) -> bool {
        &self.source == port || &self.destination == port
    }

    /// The other end of the connection, if `port` is one of its ends
    pub fn peer(&self, port: &PortRef) -> Option<&PortRef> {
        if &self.source == port {
            Some(&self.destination)
        } else if &self.destination == port {
            Some(&self.source)
        } else {
            None
        }
    }
}

/// A light source bound to an otherwise unconnected port
#[derive(Debug, Clone)]
pub struct InputBinding {
    pub port: PortRef,
    pub laser: Laser,
}

/// A photonic circuit
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    name: String,
    components: Vec<Component>,
    index: HashMap<String, usize>,
    connections: Vec<Connection>,
    inputs: Vec<InputBinding>,
    outputs: Vec<PortRef>,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ========================================================================
    // Components
    // ========================================================================

    /// Add a component; names must be unique
    pub fn add(&mut self, component: Component) -> Result<()> {
        if self.index.contains_key(component.name()) {
            return Err(LumenError::DuplicateComponent(component.name().to_string()));
        }
        self.index.insert(component.name().to_string(), self.components.len());
        self.components.push(component);
        Ok(())
    }

    /// Remove a component together with every connection and binding on it
    pub fn remove(&mut self, name: &str) -> Option<Component> {
        let position = self.index.remove(name)?;
        let component = self.components.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        self.connections
            .retain(|c| c.source.component != name && c.destination.component != name);
        self.inputs.retain(|b| b.port.component != name);
        self.outputs.retain(|p| p.component != name);
        Some(component)
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.index.get(name).map(|&i| &self.components[i])
    }

    /// Position of a component in insertion order
    pub fn component_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn inputs(&self) -> &[InputBinding] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PortRef] {
        &self.outputs
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    // ========================================================================
    // Ports
    // ========================================================================

    /// Check that `port` names an existing component and a valid port index
    ///
    /// Returns the component's position.
    pub fn resolve(&self, port: &PortRef) -> Result<usize> {
        let idx = self
            .component_index(&port.component)
            .ok_or_else(|| LumenError::UnresolvedPortReference(port.clone()))?;
        if port.port >= self.components[idx].port_count() {
            return Err(LumenError::UnresolvedPortReference(port.clone()));
        }
        Ok(idx)
    }

    /// Current role of a port
    pub fn port_usage(&self, port: &PortRef) -> Result<PortUsage> {
        self.resolve(port)?;
        Ok(self.usage_unchecked(port))
    }

    fn usage_unchecked(&self, port: &PortRef) -> PortUsage {
        if let Some(peer) = self.connections.iter().find_map(|c| c.peer(port)) {
            return PortUsage::Connected(peer.clone());
        }
        if self.inputs.iter().any(|b| &b.port == port) {
            return PortUsage::Input;
        }
        if self.outputs.contains(port) {
            return PortUsage::Output;
        }
        PortUsage::Unused
    }

    fn claim(&self, port: &PortRef) -> Result<()> {
        self.resolve(port)?;
        match self.usage_unchecked(port) {
            PortUsage::Unused => Ok(()),
            existing => Err(LumenError::AmbiguousBinding {
                port: port.clone(),
                existing,
            }),
        }
    }

    // ========================================================================
    // Connections and bindings
    // ========================================================================

    /// Connect two unused ports
    pub fn connect(&mut self, source: impl Into<PortRef>, destination: impl Into<PortRef>) -> Result<()> {
        let source = source.into();
        let destination = destination.into();
        if source == destination {
            self.resolve(&source)?;
            return Err(LumenError::SelfConnection(source));
        }
        self.claim(&source)?;
        self.claim(&destination)?;
        self.connections.push(Connection {
            source,
            destination,
        });
        Ok(())
    }

    /// Remove the connection on `port`; returns false if there was none
    pub fn disconnect(&mut self, port: &PortRef) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| !c.involves(port));
        self.connections.len() != before
    }

    /// Bind a light source to an unused port
    pub fn set_input(&mut self, port: impl Into<PortRef>, laser: Laser) -> Result<()> {
        let port = port.into();
        self.claim(&port)?;
        self.inputs.push(InputBinding { port, laser });
        Ok(())
    }

    /// Remove the light source on `port`; returns false if there was none
    pub fn clear_input(&mut self, port: &PortRef) -> bool {
        let before = self.inputs.len();
        self.inputs.retain(|b| &b.port != port);
        self.inputs.len() != before
    }

    /// Mark an unused port as a circuit output
    pub fn set_output(&mut self, port: impl Into<PortRef>) -> Result<()> {
        let port = port.into();
        self.claim(&port)?;
        self.outputs.push(port);
        Ok(())
    }

    /// Re-check every structural invariant
    ///
    /// All references resolve and no port plays more than one role.
    pub fn validate(&self) -> Result<()> {
        for c in &self.connections {
            if c.source == c.destination {
                return Err(LumenError::SelfConnection(c.source.clone()));
            }
        }

        let roles = self
            .connections
            .iter()
            .flat_map(|c| {
                [
                    (&c.source, PortUsage::Connected(c.destination.clone())),
                    (&c.destination, PortUsage::Connected(c.source.clone())),
                ]
            })
            .chain(self.inputs.iter().map(|b| (&b.port, PortUsage::Input)))
            .chain(self.outputs.iter().map(|p| (p, PortUsage::Output)));

        let mut seen: HashMap<&PortRef, PortUsage> = HashMap::new();
        for (port, usage) in roles {
            self.resolve(port)?;
            if let Some(existing) = seen.get(port) {
                return Err(LumenError::AmbiguousBinding {
                    port: port.clone(),
                    existing: existing.clone(),
                });
            }
            seen.insert(port, usage);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{BeamSplitter, PhaseShifter};
    use crate::light::{CoherentLight, Coherence};

    fn laser() -> Laser {
        let light = CoherentLight::from_polar(1.0, 0.0, 0.0, 0.0, 1550e-9).unwrap();
        Laser::constant(light, Coherence::Coherent)
    }

    fn circuit() -> Circuit {
        let mut c = Circuit::new("test");
        c.add(Component::new("bs", BeamSplitter)).unwrap();
        c.add(Component::new("ps", PhaseShifter::ideal(0.0))).unwrap();
        c
    }

    #[test]
    fn test_duplicate_component() {
        let mut c = circuit();
        let err = c.add(Component::new("bs", BeamSplitter)).unwrap_err();
        assert!(matches!(err, LumenError::DuplicateComponent(name) if name == "bs"));
    }

    #[test]
    fn test_connect_and_usage() {
        let mut c = circuit();
        c.connect(("bs", 2), ("ps", 0)).unwrap();
        assert_eq!(
            c.port_usage(&PortRef::new("ps", 0)).unwrap(),
            PortUsage::Connected(PortRef::new("bs", 2))
        );
        assert_eq!(c.port_usage(&PortRef::new("bs", 3)).unwrap(), PortUsage::Unused);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_unresolved_references() {
        let mut c = circuit();
        let err = c.connect(("bs", 4), ("ps", 0)).unwrap_err();
        assert!(matches!(err, LumenError::UnresolvedPortReference(p) if p == PortRef::new("bs", 4)));
        assert!(c.set_output(("nope", 0)).is_err());
        assert!(c.port_usage(&PortRef::new("ps", 2)).is_err());
    }

    #[test]
    fn test_port_used_twice() {
        let mut c = circuit();
        c.connect(("bs", 2), ("ps", 0)).unwrap();
        let err = c.connect(("bs", 3), ("ps", 0)).unwrap_err();
        assert!(matches!(err, LumenError::AmbiguousBinding { .. }));

        let err = c.set_input(("ps", 0), laser()).unwrap_err();
        assert!(matches!(
            err,
            LumenError::AmbiguousBinding {
                existing: PortUsage::Connected(_),
                ..
            }
        ));

        c.set_input(("bs", 0), laser()).unwrap();
        let err = c.set_output(("bs", 0)).unwrap_err();
        assert!(matches!(
            err,
            LumenError::AmbiguousBinding {
                existing: PortUsage::Input,
                ..
            }
        ));
    }

    #[test]
    fn test_self_connection() {
        let mut c = circuit();
        let err = c.connect(("ps", 1), ("ps", 1)).unwrap_err();
        assert!(matches!(err, LumenError::SelfConnection(_)));
        // Two different ports of one component may be joined
        assert!(c.connect(("ps", 1), ("ps", 0)).is_ok());
    }

    #[test]
    fn test_disconnect_frees_ports() {
        let mut c = circuit();
        c.connect(("bs", 2), ("ps", 0)).unwrap();
        assert!(c.disconnect(&PortRef::new("ps", 0)));
        assert!(!c.disconnect(&PortRef::new("ps", 0)));
        c.set_output(("ps", 0)).unwrap();
        c.set_input(("bs", 2), laser()).unwrap();
        assert!(c.clear_input(&PortRef::new("bs", 2)));
        assert_eq!(c.port_usage(&PortRef::new("bs", 2)).unwrap(), PortUsage::Unused);
    }

    #[test]
    fn test_remove_drops_references() {
        let mut c = circuit();
        c.add(Component::new("tail", PhaseShifter::ideal(1.0))).unwrap();
        c.connect(("bs", 2), ("ps", 0)).unwrap();
        c.connect(("ps", 1), ("tail", 0)).unwrap();
        c.set_output(("ps", 1)).unwrap_err();
        c.set_output(("tail", 1)).unwrap();

        let removed = c.remove("ps").unwrap();
        assert_eq!(removed.name(), "ps");
        assert!(c.connections().is_empty());
        assert_eq!(c.component_index("tail"), Some(1));
        assert_eq!(c.component("tail").unwrap().name(), "tail");
        assert_eq!(c.outputs().len(), 1);
        assert!(c.remove("ps").is_none());
        assert!(c.validate().is_ok());
    }
}
