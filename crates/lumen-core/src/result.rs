//! Simulation results
//!
//! One time series of [`Light`] per requested output port, keyed by the
//! port references the caller used when building the circuit.

use ndarray::Array3;
use num_complex::Complex64;

use crate::circuit::PortRef;
use crate::light::{Coherence, Light, Stokes};

/// Field component selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarization {
    H,
    V,
}

/// Output light of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    coherence: Coherence,
    times: Vec<f64>,
    outputs: Vec<PortRef>,
    /// `lights[k][n]`: output `k` at sample `n`
    lights: Vec<Vec<Light>>,
}

impl SimulationResult {
    pub(crate) fn new(coherence: Coherence, times: Vec<f64>, outputs: Vec<PortRef>, lights: Vec<Vec<Light>>) -> Self {
        Self {
            coherence,
            times,
            outputs,
            lights,
        }
    }

    pub fn coherence(&self) -> Coherence {
        self.coherence
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn outputs(&self) -> &[PortRef] {
        &self.outputs
    }

    /// Light series at an output port
    pub fn lights(&self, port: &PortRef) -> Option<&[Light]> {
        let k = self.outputs.iter().position(|p| p == port)?;
        Some(&self.lights[k])
    }

    fn map<T>(&self, port: &PortRef, f: impl Fn(&Light) -> T) -> Option<Vec<T>> {
        self.lights(port).map(|series| series.iter().map(f).collect())
    }

    /// Total power per sample
    pub fn power(&self, port: &PortRef) -> Option<Vec<f64>> {
        self.map(port, Light::intensity)
    }

    pub fn power_h(&self, port: &PortRef) -> Option<Vec<f64>> {
        self.map(port, Light::intensity_h)
    }

    pub fn power_v(&self, port: &PortRef) -> Option<Vec<f64>> {
        self.map(port, Light::intensity_v)
    }

    /// Mean power over all samples; 0 for an empty run
    pub fn average_power(&self, port: &PortRef) -> Option<f64> {
        let power = self.power(port)?;
        if power.is_empty() {
            return Some(0.0);
        }
        Some(power.iter().sum::<f64>() / power.len() as f64)
    }

    pub fn stokes(&self, port: &PortRef) -> Option<Vec<Stokes>> {
        self.map(port, Light::stokes)
    }

    /// Wavelength per sample; coherent runs only
    pub fn wavelengths(&self, port: &PortRef) -> Option<Vec<f64>> {
        self.coherent_map(port, |l| l.as_coherent().map(|c| c.wavelength()))
    }

    /// Absolute phase of one field component; coherent runs only
    pub fn phase(&self, port: &PortRef, polarization: Polarization) -> Option<Vec<f64>> {
        self.coherent_map(port, |l| {
            l.as_coherent().map(|c| match polarization {
                Polarization::H => c.h().arg(),
                Polarization::V => c.v().arg(),
            })
        })
    }

    /// Phase of V relative to H; coherent runs only
    pub fn relative_phase(&self, port: &PortRef) -> Option<Vec<f64>> {
        self.coherent_map(port, |l| l.as_coherent().map(|c| c.jones().relative_phase()))
    }

    fn coherent_map(&self, port: &PortRef, f: impl Fn(&Light) -> Option<f64>) -> Option<Vec<f64>> {
        if self.coherence != Coherence::Coherent {
            return None;
        }
        self.lights(port)?.iter().map(f).collect()
    }
}

/// Circuit-level scattering parameters
///
/// `s[[w, 2*o + p, 2*i + q]]` couples polarization `q` injected at input
/// `i` to polarization `p` leaving output `o`, at `wavelengths[w]`.
#[derive(Debug, Clone)]
pub struct CircuitResponse {
    pub inputs: Vec<PortRef>,
    pub outputs: Vec<PortRef>,
    pub wavelengths: Vec<f64>,
    pub s: Array3<Complex64>,
}

impl CircuitResponse {
    /// 2x2 Jones transfer block from `input` to `output` at wavelength index `w`
    pub fn block(&self, w: usize, output: &PortRef, input: &PortRef) -> Option<[[Complex64; 2]; 2]> {
        let o = self.outputs.iter().position(|p| p == output)?;
        let i = self.inputs.iter().position(|p| p == input)?;
        if w >= self.wavelengths.len() {
            return None;
        }
        let at = |p: usize, q: usize| self.s[[w, 2 * o + p, 2 * i + q]];
        Some([[at(0, 0), at(0, 1)], [at(1, 0), at(1, 1)]])
    }

    /// Power transmission `|t|^2` summed over both output polarizations,
    /// for input polarization `q`
    pub fn transmission(&self, w: usize, output: &PortRef, input: &PortRef, q: Polarization) -> Option<f64> {
        let b = self.block(w, output, input)?;
        let col = match q {
            Polarization::H => 0,
            Polarization::V => 1,
        };
        Some(b[0][col].norm_sqr() + b[1][col].norm_sqr())
    }
}
