//! Port references

use std::fmt;

/// A `(component name, port index)` pair; ports are 0-based
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortRef {
    pub component: String,
    pub port: usize,
}

impl PortRef {
    pub fn new(component: impl Into<String>, port: usize) -> Self {
        Self {
            component: component.into(),
            port,
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component, self.port)
    }
}

impl<S: Into<String>> From<(S, usize)> for PortRef {
    fn from((component, port): (S, usize)) -> Self {
        Self::new(component, port)
    }
}

/// The single role a port plays in a circuit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortUsage {
    Unused,
    /// Internally connected to the given peer
    Connected(PortRef),
    /// Bound to a light source
    Input,
    /// Observed as a circuit output
    Output,
}

impl fmt::Display for PortUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortUsage::Unused => write!(f, "unused"),
            PortUsage::Connected(peer) => write!(f, "connected to {}", peer),
            PortUsage::Input => write!(f, "a circuit input"),
            PortUsage::Output => write!(f, "a circuit output"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let p = PortRef::new("bs1", 2);
        assert_eq!(p.to_string(), "bs1:2");
        assert_eq!(PortUsage::Connected(p.clone()).to_string(), "connected to bs1:2");
        assert_eq!(PortRef::from(("bs1", 2)), p);
    }
}
