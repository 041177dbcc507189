//! Condensed sequential chains
//!
//! A chain of 2-port components connected end to end behaves as a single
//! 2-port whose matrix is the left-to-right Redheffer star product of its
//! members. Members may be mounted backwards, in which case their ports are
//! swapped before composition.
//!
//! Before composing, the chain checks the condition number of its own
//! internal system `I - S C` (members block-diagonal, only the links inside
//! the chain connected). This is the same test the global solve applies to
//! the uncollapsed members, so a cavity inside a chain is judged singular
//! against the same limit whether or not it was collapsed.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::warn;

use super::model::{check_dimensions, ComponentKind, ScatteringModel};
use crate::constants::DEFAULT_CONDITION_LIMIT;
use crate::error::{LumenError, Result};
use crate::math::linalg::condition_number;
use crate::math::matrix_ops::{block_diag, from_quadrants, identity, set_block};
use crate::math::star::{flipped, redheffer_star};

/// One member of a chain
#[derive(Debug, Clone)]
pub struct ChainLink {
    /// Name of the original component
    pub name: String,
    pub kind: ComponentKind,
    /// True if the member's port 1 faces the chain input
    pub flipped: bool,
}

/// Ordered 2-port chain; port 0 of the first link is the chain input,
/// the far port of the last link the chain output
#[derive(Debug, Clone)]
pub struct Chain {
    links: Vec<ChainLink>,
    condition_limit: f64,
}

impl Default for Chain {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Chain {
    pub fn new(links: Vec<ChainLink>) -> Self {
        Self {
            links,
            condition_limit: DEFAULT_CONDITION_LIMIT,
        }
    }

    /// Largest accepted condition number of the chain's internal system
    pub fn with_condition_limit(mut self, limit: f64) -> Self {
        self.condition_limit = limit;
        self
    }

    pub fn condition_limit(&self) -> f64 {
        self.condition_limit
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Member names in chain order
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(|l| l.name.as_str())
    }
}

/// Transparent 2-port, the neutral element of the star product
fn thru() -> Array2<Complex64> {
    let zero = Array2::<Complex64>::zeros((2, 2));
    let eye = identity(2);
    from_quadrants(&zero, &eye, &eye, &zero)
}

/// `I - S C` of oriented members with only consecutive members connected
///
/// Member `k` owns local ports `2k` and `2k + 1`; port 1 of member `k`
/// meets port 0 of member `k + 1`.
fn internal_system(members: &[Array2<Complex64>]) -> Array2<Complex64> {
    let s = block_diag(members);
    let dim = s.nrows();
    let eye = identity(2);
    let mut c = Array2::<Complex64>::zeros((dim, dim));
    for k in 1..members.len() {
        let out = 2 * (2 * k - 1);
        let inp = 2 * (2 * k);
        set_block(&mut c, out, inp, &eye);
        set_block(&mut c, inp, out, &eye);
    }
    identity(dim) - s.dot(&c)
}

impl ScatteringModel for Chain {
    fn port_count(&self) -> usize {
        2
    }

    /// Star product of the member matrices in chain order
    ///
    /// Fails with `SingularSystem` if the internal system is worse
    /// conditioned than the chain's limit at this time and wavelength.
    fn matrix(&self, time: f64, wavelength: f64) -> Result<Array2<Complex64>> {
        let members = self
            .links
            .iter()
            .map(|link| {
                let m = link.kind.matrix(time, wavelength)?;
                check_dimensions(2, &m)?;
                Ok(if link.flipped { flipped(&m) } else { m })
            })
            .collect::<Result<Vec<_>>>()?;

        if members.len() > 1 {
            let condition = condition_number(&internal_system(&members));
            if !(condition <= self.condition_limit) {
                warn!(
                    time,
                    wavelength,
                    condition,
                    limit = self.condition_limit,
                    members = members.len(),
                    "singular chain"
                );
                return Err(LumenError::SingularSystem { time, condition });
            }
        }

        let mut members = members.into_iter();
        let Some(first) = members.next() else {
            return Ok(thru());
        };
        members.try_fold(first, |acc, m| {
            redheffer_star(&acc, &m).ok_or(LumenError::SingularSystem {
                time,
                condition: f64::INFINITY,
            })
        })
    }
}
