//! Global system assembly
//!
//! Every component port gets a global index in a fixed order: components
//! in circuit order, then each component's own ports. With `N` global
//! ports the assembler builds
//!
//! - `S` (2N x 2N): block diagonal, one MSM per component;
//! - `C` (2N x 2N): a 2x2 identity at blocks (i, j) and (j, i) for every
//!   connection between ports i and j;
//! - `a_ext` (2N): the Jones vector of each active source at its port.
//!
//! The outgoing waves `y` then satisfy `(I - S C) y = S a_ext`.

use std::collections::HashMap;

use ndarray::{s, Array1, Array2};
use num_complex::Complex64;
use tracing::debug;

use crate::circuit::{Circuit, PortRef};
use crate::error::{LumenError, Result};
use crate::light::JonesVector;
use crate::math::matrix_ops::{block_diag, identity, set_block};

/// Global port numbering for one circuit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortOrdering {
    positions: HashMap<String, usize>,
    offsets: Vec<usize>,
    counts: Vec<usize>,
    total: usize,
}

impl PortOrdering {
    pub fn new(circuit: &Circuit) -> Self {
        let mut positions = HashMap::new();
        let mut offsets = Vec::with_capacity(circuit.components().len());
        let mut counts = Vec::with_capacity(circuit.components().len());
        let mut total = 0;
        for (i, component) in circuit.components().iter().enumerate() {
            positions.insert(component.name().to_string(), i);
            offsets.push(total);
            counts.push(component.port_count());
            total += component.port_count();
        }
        Self {
            positions,
            offsets,
            counts,
            total,
        }
    }

    /// Total number of ports `N`
    pub fn total_ports(&self) -> usize {
        self.total
    }

    /// Size of the global vectors, `2N`
    pub fn dimension(&self) -> usize {
        2 * self.total
    }

    /// First global port index of the component at `position`
    pub fn offset(&self, position: usize) -> Option<usize> {
        self.offsets.get(position).copied()
    }

    /// Global index of a port
    pub fn index(&self, port: &PortRef) -> Result<usize> {
        let position = *self
            .positions
            .get(&port.component)
            .ok_or_else(|| LumenError::UnresolvedPortReference(port.clone()))?;
        if port.port >= self.counts[position] {
            return Err(LumenError::UnresolvedPortReference(port.clone()));
        }
        Ok(self.offsets[position] + port.port)
    }
}

/// Index-consistent S, C and a_ext builder for one circuit
#[derive(Debug, Clone)]
pub struct GlobalSystem<'a> {
    circuit: &'a Circuit,
    ordering: PortOrdering,
    connectivity: Array2<Complex64>,
}

impl<'a> GlobalSystem<'a> {
    /// Validate the circuit, fix the port ordering and build C
    pub fn assemble(circuit: &'a Circuit) -> Result<Self> {
        circuit.validate()?;
        let ordering = PortOrdering::new(circuit);
        let dim = ordering.dimension();

        let eye = identity(2);
        let mut connectivity = Array2::<Complex64>::zeros((dim, dim));
        for c in circuit.connections() {
            let i = ordering.index(&c.source)?;
            let j = ordering.index(&c.destination)?;
            set_block(&mut connectivity, 2 * i, 2 * j, &eye);
            set_block(&mut connectivity, 2 * j, 2 * i, &eye);
        }

        debug!(
            circuit = circuit.name(),
            components = circuit.components().len(),
            ports = ordering.total_ports(),
            connections = circuit.connections().len(),
            "assembled global system"
        );

        Ok(Self {
            circuit,
            ordering,
            connectivity,
        })
    }

    pub fn circuit(&self) -> &Circuit {
        self.circuit
    }

    pub fn ordering(&self) -> &PortOrdering {
        &self.ordering
    }

    /// Connectivity matrix C
    pub fn connectivity(&self) -> &Array2<Complex64> {
        &self.connectivity
    }

    /// Block-diagonal global scattering matrix S at `(t, wavelength)`
    ///
    /// Blocks follow circuit order, which is the order of the port offsets.
    pub fn scattering_matrix(&self, time: f64, wavelength: f64) -> Result<Array2<Complex64>> {
        let blocks = self
            .circuit
            .components()
            .iter()
            .map(|component| component.matrix(time, wavelength))
            .collect::<Result<Vec<_>>>()?;
        Ok(block_diag(&blocks))
    }

    /// Excitation vector with the given Jones vectors injected at their ports
    ///
    /// Two sources on the same port superpose.
    pub fn excitation<'p, I>(&self, sources: I) -> Result<Array1<Complex64>>
    where
        I: IntoIterator<Item = (&'p PortRef, JonesVector)>,
    {
        let mut a = Array1::<Complex64>::zeros(self.ordering.dimension());
        for (port, jones) in sources {
            let i = self.ordering.index(port)?;
            a[2 * i] += jones.h;
            a[2 * i + 1] += jones.v;
        }
        Ok(a)
    }

    /// System matrix `I - S C`
    pub fn system_matrix(&self, scattering: &Array2<Complex64>) -> Array2<Complex64> {
        identity(self.ordering.dimension()) - scattering.dot(&self.connectivity)
    }

    /// Outgoing Jones vector at `port` from a solution vector
    pub fn extract(&self, solution: &Array1<Complex64>, port: &PortRef) -> Result<JonesVector> {
        let i = self.ordering.index(port)?;
        let block = solution.slice(s![2 * i..2 * i + 2]);
        Ok(JonesVector::new(block[0], block[1]))
    }
}
