//! Chain reduction
//!
//! Collapses maximal runs of 2-port components joined end to end into one
//! condensed [`Chain`] component. Only the two boundary ports of each run
//! survive; internal connections are folded into the chain's star product.
//!
//! The link graph only has 2-port components as nodes, so every node has
//! degree at most two and its connected pieces are simple paths or cycles.
//! Paths of two or more members are collapsed starting from their
//! lower-index end. Cycles are left alone; the global solve handles them.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::circuit::{Circuit, PortRef};
use crate::component::{Chain, ChainLink, Component};
use crate::constants::DEFAULT_CONDITION_LIMIT;
use crate::error::Result;

/// Circuit after pruning and chain reduction
#[derive(Debug, Clone)]
pub struct ReducedCircuit {
    circuit: Circuit,
    port_map: HashMap<PortRef, PortRef>,
    chains: usize,
    pruned: usize,
}

impl ReducedCircuit {
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Where an original port lives in the reduced circuit
    ///
    /// Ports of untouched components map to themselves.
    pub fn map_port(&self, port: &PortRef) -> PortRef {
        self.port_map.get(port).cloned().unwrap_or_else(|| port.clone())
    }

    /// Number of chains collapsed
    pub fn chain_count(&self) -> usize {
        self.chains
    }

    /// Number of isolated components dropped
    pub fn pruned_count(&self) -> usize {
        self.pruned
    }
}

/// Circuit simplification pass run before assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainReducer {
    /// Drop components with no connection and no binding
    pub prune_isolated: bool,
    /// Collapse sequential 2-port runs
    pub collapse_chains: bool,
    /// Condition limit handed to every condensed chain
    pub condition_limit: f64,
}

impl Default for ChainReducer {
    fn default() -> Self {
        Self {
            prune_isolated: true,
            collapse_chains: true,
            condition_limit: DEFAULT_CONDITION_LIMIT,
        }
    }
}

/// Neighbour across one port of a 2-port component in the link graph
#[derive(Debug, Clone, Copy)]
struct Link {
    component: usize,
    port: usize,
    connection: usize,
}

/// A path found in the link graph, in chain order
struct Run {
    /// (component, entered through port 1)
    members: Vec<(usize, bool)>,
    /// Connections internal to the run
    internal: Vec<usize>,
    /// Boundary port of the first member
    head: usize,
    /// Boundary port of the last member
    tail: usize,
}

impl ChainReducer {
    pub fn new(prune_isolated: bool, collapse_chains: bool) -> Self {
        Self {
            prune_isolated,
            collapse_chains,
            ..Self::default()
        }
    }

    pub fn with_condition_limit(mut self, limit: f64) -> Self {
        self.condition_limit = limit;
        self
    }

    pub fn reduce(&self, circuit: &Circuit) -> Result<ReducedCircuit> {
        let components = circuit.components();
        let n = components.len();

        // Components that touch something
        let mut used = vec![false; n];
        let connected = circuit
            .connections()
            .iter()
            .flat_map(|c| [&c.source, &c.destination]);
        let bound = circuit
            .inputs()
            .iter()
            .map(|b| &b.port)
            .chain(circuit.outputs().iter());
        for port in connected.chain(bound) {
            used[circuit.resolve(port)?] = true;
        }
        let keep: Vec<bool> = used.iter().map(|&u| u || !self.prune_isolated).collect();
        let pruned = keep.iter().filter(|&&k| !k).count();

        let runs = if self.collapse_chains {
            find_runs(circuit, &keep)?
        } else {
            Vec::new()
        };

        // Which run each component belongs to, and the run's insertion slot
        let mut run_of: HashMap<usize, usize> = HashMap::new();
        let mut internal: HashSet<usize> = HashSet::new();
        let mut port_map: HashMap<PortRef, PortRef> = HashMap::new();
        let mut condensed: Vec<(usize, Option<Component>)> = Vec::with_capacity(runs.len());
        let mut taken: HashSet<String> = components.iter().map(|c| c.name().to_string()).collect();

        for (r, run) in runs.iter().enumerate() {
            let links: Vec<ChainLink> = run
                .members
                .iter()
                .map(|&(c, flipped)| ChainLink {
                    name: components[c].name().to_string(),
                    kind: components[c].kind().clone(),
                    flipped,
                })
                .collect();
            let chain = Chain::new(links).with_condition_limit(self.condition_limit);
            let name = unique_name(
                format!("chain[{}]", chain.member_names().collect::<Vec<_>>().join("->")),
                &mut taken,
            );

            let first = run.members[0].0;
            let last = run.members[run.members.len() - 1].0;
            port_map.insert(
                PortRef::new(components[first].name(), run.head),
                PortRef::new(name.as_str(), 0),
            );
            port_map.insert(
                PortRef::new(components[last].name(), run.tail),
                PortRef::new(name.as_str(), 1),
            );

            for &(c, _) in &run.members {
                run_of.insert(c, r);
            }
            internal.extend(run.internal.iter().copied());

            let slot = run.members.iter().map(|&(c, _)| c).min().unwrap_or(first);
            condensed.push((slot, Some(Component::new(name, chain))));
        }

        // Rebuild, keeping the original component order
        let mut reduced = Circuit::new(circuit.name());
        for (i, component) in components.iter().enumerate() {
            if !keep[i] {
                continue;
            }
            match run_of.get(&i) {
                None => reduced.add(component.clone())?,
                Some(&r) if condensed[r].0 == i => {
                    if let Some(chain) = condensed[r].1.take() {
                        reduced.add(chain)?;
                    }
                }
                Some(_) => {}
            }
        }

        let map = |port: &PortRef| port_map.get(port).cloned().unwrap_or_else(|| port.clone());
        for (idx, connection) in circuit.connections().iter().enumerate() {
            if internal.contains(&idx) {
                continue;
            }
            reduced.connect(map(&connection.source), map(&connection.destination))?;
        }
        for binding in circuit.inputs() {
            reduced.set_input(map(&binding.port), binding.laser.clone())?;
        }
        for port in circuit.outputs() {
            reduced.set_output(map(port))?;
        }

        debug!(
            circuit = circuit.name(),
            chains = runs.len(),
            pruned,
            before = n,
            after = reduced.components().len(),
            "reduced circuit"
        );

        Ok(ReducedCircuit {
            circuit: reduced,
            port_map,
            chains: runs.len(),
            pruned,
        })
    }
}

/// `base`, or `base#k` with the smallest `k` not in `taken`
fn unique_name(base: String, taken: &mut HashSet<String>) -> String {
    let mut name = base.clone();
    let mut k = 1;
    while taken.contains(&name) {
        name = format!("{}#{}", base, k);
        k += 1;
    }
    taken.insert(name.clone());
    name
}

/// Find every open path of two or more 2-port components
fn find_runs(circuit: &Circuit, keep: &[bool]) -> Result<Vec<Run>> {
    let components = circuit.components();
    let n = components.len();
    let mut eligible: Vec<bool> = (0..n)
        .map(|i| keep[i] && components[i].port_count() == 2)
        .collect();

    // Per component, the neighbour across port 0 and port 1
    let mut links: Vec<[Option<Link>; 2]> = vec![[None, None]; n];
    let mut excluded = vec![false; n];
    for (idx, c) in circuit.connections().iter().enumerate() {
        let a = circuit.resolve(&c.source)?;
        let b = circuit.resolve(&c.destination)?;
        if a == b {
            // A component looped onto itself is a resonator, not a link
            excluded[a] = true;
            continue;
        }
        if !eligible[a] || !eligible[b] {
            continue;
        }
        links[a][c.source.port] = Some(Link {
            component: b,
            port: c.destination.port,
            connection: idx,
        });
        links[b][c.destination.port] = Some(Link {
            component: a,
            port: c.source.port,
            connection: idx,
        });
    }
    for i in 0..n {
        if excluded[i] {
            eligible[i] = false;
        }
    }
    // Drop links that touch an excluded component
    for i in 0..n {
        for p in 0..2 {
            if let Some(l) = links[i][p] {
                if !eligible[i] || !eligible[l.component] {
                    links[i][p] = None;
                }
            }
        }
    }

    let degree = |i: usize| links[i].iter().filter(|l| l.is_some()).count();

    let mut visited = vec![false; n];
    let mut runs = Vec::new();
    for start in 0..n {
        if !eligible[start] || visited[start] || degree(start) != 1 {
            continue;
        }

        // Enter through the free port
        let head = if links[start][0].is_none() { 0 } else { 1 };
        let mut members = vec![(start, head == 1)];
        let mut internal = Vec::new();
        visited[start] = true;

        let mut current = start;
        let mut exit = 1 - head;
        while let Some(next) = links[current][exit] {
            visited[next.component] = true;
            internal.push(next.connection);
            members.push((next.component, next.port == 1));
            current = next.component;
            exit = 1 - next.port;
        }

        if members.len() >= 2 {
            runs.push(Run {
                members,
                internal,
                head,
                tail: exit,
            });
        }
    }
    Ok(runs)
}
