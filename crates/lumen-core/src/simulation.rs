//! Simulation driver
//!
//! Runs the full pipeline on a circuit: validation, pruning and chain
//! reduction, global assembly, then one independent solve per time sample.
//! Samples are dispatched to the rayon pool when the `parallel` feature is
//! enabled; results are always returned in sample order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::circuit::{Circuit, PortRef};
use crate::constants::DEFAULT_CONDITION_LIMIT;
use crate::error::{LumenError, Result};
use crate::reduction::ChainReducer;
use crate::result::{CircuitResponse, SimulationResult};
use crate::solver::Solver;
use crate::system::GlobalSystem;

/// Knobs for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    /// Largest accepted 2-norm condition number of `I - S C`
    pub condition_limit: f64,
    /// Collapse sequential 2-port runs before assembly
    pub reduce_chains: bool,
    /// Drop components with no connection and no binding
    pub prune_isolated: bool,
    /// Solve samples concurrently (needs the `parallel` feature)
    pub parallel: bool,
    /// Checked before every sample; setting it aborts the run
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            condition_limit: DEFAULT_CONDITION_LIMIT,
            reduce_chains: true,
            prune_isolated: true,
            parallel: true,
            cancel: None,
        }
    }
}

impl SimulationOptions {
    pub fn with_condition_limit(mut self, limit: f64) -> Self {
        self.condition_limit = limit;
        self
    }

    pub fn with_reduce_chains(mut self, reduce: bool) -> Self {
        self.reduce_chains = reduce;
        self
    }

    pub fn with_prune_isolated(mut self, prune: bool) -> Self {
        self.prune_isolated = prune;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}

/// A circuit ready to be simulated
///
/// The circuit is borrowed immutably for the lifetime of the simulation and
/// may be simulated any number of times.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    circuit: &'a Circuit,
    options: SimulationOptions,
}

impl<'a> Simulation<'a> {
    pub fn new(circuit: &'a Circuit) -> Self {
        Self::with_options(circuit, SimulationOptions::default())
    }

    pub fn with_options(circuit: &'a Circuit, options: SimulationOptions) -> Self {
        Self { circuit, options }
    }

    pub fn circuit(&self) -> &Circuit {
        self.circuit
    }

    pub fn options(&self) -> &SimulationOptions {
        &self.options
    }

    fn reducer(&self) -> ChainReducer {
        ChainReducer::new(self.options.prune_isolated, self.options.reduce_chains)
            .with_condition_limit(self.options.condition_limit)
    }

    /// Simulate every time sample in `times` (seconds)
    ///
    /// Structural errors abort before any solve. A singular sample aborts
    /// the run with `SingularSystem` carrying that sample's time; with
    /// several failing samples the first one in `times` order is reported.
    pub fn simulate(&self, times: &[f64]) -> Result<SimulationResult> {
        self.circuit.validate()?;
        let reduced = self.reducer().reduce(self.circuit)?;
        let system = GlobalSystem::assemble(reduced.circuit())?;
        let outputs: Vec<PortRef> = self
            .circuit
            .outputs()
            .iter()
            .map(|p| reduced.map_port(p))
            .collect();
        let solver = Solver::new(system, outputs, self.options.condition_limit)?;
        let coherence = solver.coherence();

        debug!(
            circuit = self.circuit.name(),
            samples = times.len(),
            sources = self.circuit.inputs().len(),
            outputs = self.circuit.outputs().len(),
            %coherence,
            "simulating"
        );

        let samples = map_samples(times, self.options.parallel, |time| {
            if self.options.is_cancelled() {
                return Err(LumenError::Cancelled { time });
            }
            solver.solve_sample(time, coherence)
        })?;

        // Transpose sample-major results into one series per output
        let n_outputs = self.circuit.outputs().len();
        let mut lights = vec![Vec::with_capacity(times.len()); n_outputs];
        for sample in samples {
            for (k, light) in sample.into_iter().enumerate() {
                lights[k].push(light);
            }
        }

        Ok(SimulationResult::new(
            coherence,
            times.to_vec(),
            self.circuit.outputs().to_vec(),
            lights,
        ))
    }

    /// Circuit-level scattering parameters at `t = 0`
    ///
    /// Entry `(output, input)` is the steady-state field leaving `output`
    /// per unit field injected at `input`, including every multiple
    /// reflection: the corresponding block of `(I - S C)^-1 S`.
    pub fn s_parameters(&self, wavelengths: &[f64]) -> Result<CircuitResponse> {
        self.circuit.validate()?;
        let reduced = self.reducer().reduce(self.circuit)?;
        let system = GlobalSystem::assemble(reduced.circuit())?;
        let outputs: Vec<PortRef> = self
            .circuit
            .outputs()
            .iter()
            .map(|p| reduced.map_port(p))
            .collect();
        let solver = Solver::new(system, outputs, self.options.condition_limit)?;
        let s = solver.transfer(0.0, wavelengths)?;

        Ok(CircuitResponse {
            inputs: self.circuit.inputs().iter().map(|b| b.port.clone()).collect(),
            outputs: self.circuit.outputs().to_vec(),
            wavelengths: wavelengths.to_vec(),
            s,
        })
    }
}

/// Apply `f` to every sample, keeping sample order
///
/// On failure the error of the first failing sample in `times` order is
/// returned, whichever thread finished first.
#[cfg(feature = "parallel")]
fn map_samples<T, F>(times: &[f64], parallel: bool, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(f64) -> Result<T> + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        let results: Vec<Result<T>> = times.par_iter().map(|&t| f(t)).collect();
        results.into_iter().collect()
    } else {
        times.iter().map(|&t| f(t)).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn map_samples<T, F>(times: &[f64], _parallel: bool, f: F) -> Result<Vec<T>>
where
    F: Fn(f64) -> Result<T>,
{
    times.iter().map(|&t| f(t)).collect()
}
