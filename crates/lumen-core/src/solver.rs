//! Per-sample solver
//!
//! For one time sample the solver evaluates every light source, groups the
//! sources into independent excitations and solves
//! `(I - S C) y = S a_ext` once per excitation:
//!
//! - all coherent sources form a single excitation and interfere;
//! - every incoherent source is an excitation of its own, solved with all
//!   other sources dark, and the results add in intensity.
//!
//! Within a sample S and `I - S C` are built and factorized once per
//! distinct wavelength; every excitation at that wavelength is a column of
//! the same multi right-hand-side solve.

use ndarray::{s, Array2, Array3};
use num_complex::Complex64;
use tracing::{trace, warn};

use crate::circuit::PortRef;
use crate::constants::WAVELENGTH_TOLERANCE;
use crate::error::{LumenError, Result};
use crate::light::{CoherentLight, Coherence, IncoherentLight, JonesVector, Light};
use crate::math::linalg::{condition_number, solve_complex_multi};
use crate::system::GlobalSystem;

/// Sources that are solved together
#[derive(Debug, Clone)]
pub struct Excitation<'c> {
    pub wavelength: f64,
    pub sources: Vec<(&'c PortRef, JonesVector)>,
}

/// Matrices shared by all excitations at one wavelength
struct Operator {
    scattering: Array2<Complex64>,
    system: Array2<Complex64>,
}

fn same_wavelength(a: f64, b: f64) -> bool {
    (a - b).abs() <= WAVELENGTH_TOLERANCE
}

/// Solves the assembled system at individual time samples
#[derive(Debug)]
pub struct Solver<'a> {
    system: GlobalSystem<'a>,
    outputs: Vec<PortRef>,
    condition_limit: f64,
}

impl<'a> Solver<'a> {
    /// `outputs` are ports of the assembled circuit, in result order
    pub fn new(system: GlobalSystem<'a>, outputs: Vec<PortRef>, condition_limit: f64) -> Result<Self> {
        for port in &outputs {
            system.ordering().index(port)?;
        }
        Ok(Self {
            system,
            outputs,
            condition_limit,
        })
    }

    pub fn system(&self) -> &GlobalSystem<'a> {
        &self.system
    }

    /// Coherent iff there is at least one source and every source is coherent
    pub fn coherence(&self) -> Coherence {
        let inputs = self.system.circuit().inputs();
        if !inputs.is_empty() && inputs.iter().all(|b| b.laser.is_coherent()) {
            Coherence::Coherent
        } else {
            Coherence::Incoherent
        }
    }

    /// Evaluate the sources at `time` and group them into excitations
    ///
    /// The coherent group, if any, comes first; incoherent sources follow in
    /// binding order. Coherent sources must share one wavelength.
    pub fn excitations(&self, time: f64) -> Result<Vec<Excitation<'_>>> {
        let mut coherent: Option<Excitation<'_>> = None;
        let mut incoherent = Vec::new();

        for binding in self.system.circuit().inputs() {
            let light = binding.laser.emit(time)?;
            if binding.laser.is_coherent() {
                match coherent.as_mut() {
                    None => {
                        coherent = Some(Excitation {
                            wavelength: light.wavelength(),
                            sources: vec![(&binding.port, light.jones())],
                        })
                    }
                    Some(group) => {
                        if !same_wavelength(group.wavelength, light.wavelength()) {
                            return Err(LumenError::WavelengthMismatch {
                                time,
                                first: group.wavelength,
                                second: light.wavelength(),
                            });
                        }
                        group.sources.push((&binding.port, light.jones()));
                    }
                }
            } else {
                incoherent.push(Excitation {
                    wavelength: light.wavelength(),
                    sources: vec![(&binding.port, light.jones())],
                });
            }
        }

        Ok(coherent.into_iter().chain(incoherent).collect())
    }

    /// Build S and `I - S C` and reject ill-conditioned systems
    fn operator(&self, time: f64, wavelength: f64) -> Result<Operator> {
        let scattering = self.system.scattering_matrix(time, wavelength)?;
        let system = self.system.system_matrix(&scattering);
        let condition = condition_number(&system);
        trace!(time, wavelength, condition, "system matrix");
        if !(condition <= self.condition_limit) {
            warn!(time, wavelength, condition, limit = self.condition_limit, "singular system");
            return Err(LumenError::SingularSystem { time, condition });
        }
        Ok(Operator { scattering, system })
    }

    /// Outgoing Jones vectors at every output, one list per excitation
    ///
    /// All excitations share `op` and are solved as the columns of a single
    /// right-hand side, so `I - S C` is factorized once.
    fn solve_group(
        &self,
        time: f64,
        op: &Operator,
        group: &[&Excitation<'_>],
    ) -> Result<Vec<Vec<JonesVector>>> {
        let mut a = Array2::<Complex64>::zeros((self.system.ordering().dimension(), group.len()));
        for (col, excitation) in group.iter().enumerate() {
            let column = self.system.excitation(excitation.sources.iter().copied())?;
            a.column_mut(col).assign(&column);
        }
        let rhs = op.scattering.dot(&a);
        let y = solve_complex_multi(&op.system, &rhs).ok_or(LumenError::SingularSystem {
            time,
            condition: f64::INFINITY,
        })?;

        (0..group.len())
            .map(|col| -> Result<Vec<JonesVector>> {
                let column = y.column(col).to_owned();
                self.outputs
                    .iter()
                    .map(|port| self.system.extract(&column, port))
                    .collect()
            })
            .collect()
    }

    /// Light at every output for one time sample
    pub fn solve_sample(&self, time: f64, coherence: Coherence) -> Result<Vec<Light>> {
        let excitations = self.excitations(time)?;

        // Excitation indices per distinct wavelength, in first-seen order
        let mut groups: Vec<(f64, Vec<usize>)> = Vec::new();
        for (e, excitation) in excitations.iter().enumerate() {
            match groups
                .iter_mut()
                .find(|(wavelength, _)| same_wavelength(*wavelength, excitation.wavelength))
            {
                Some((_, members)) => members.push(e),
                None => groups.push((excitation.wavelength, vec![e])),
            }
        }

        let mut fields: Vec<Vec<JonesVector>> = vec![Vec::new(); excitations.len()];
        for (wavelength, members) in &groups {
            let op = self.operator(time, *wavelength)?;
            let group: Vec<&Excitation<'_>> = members.iter().map(|&e| &excitations[e]).collect();
            let solved = self.solve_group(time, &op, &group)?;
            for (&e, outputs) in members.iter().zip(solved) {
                fields[e] = outputs;
            }
        }
        let per_excitation: Vec<(f64, Vec<JonesVector>)> = excitations
            .iter()
            .map(|e| e.wavelength)
            .zip(fields)
            .collect();

        let mut lights = Vec::with_capacity(self.outputs.len());
        for k in 0..self.outputs.len() {
            let light = match (coherence, per_excitation.as_slice()) {
                (Coherence::Coherent, [(wavelength, fields)]) => {
                    Light::Coherent(CoherentLight::new(fields[k], *wavelength)?)
                }
                _ => {
                    let states = per_excitation
                        .iter()
                        .map(|(wavelength, fields)| CoherentLight::new(fields[k], *wavelength))
                        .collect::<Result<Vec<_>>>()?;
                    Light::Incoherent(IncoherentLight::new(states))
                }
            };
            lights.push(light);
        }
        Ok(lights)
    }

    /// Circuit response from every input to every output at `time`
    pub fn transfer(&self, time: f64, wavelengths: &[f64]) -> Result<Array3<Complex64>> {
        let ordering = self.system.ordering();
        let inputs: Vec<usize> = self
            .system
            .circuit()
            .inputs()
            .iter()
            .map(|b| ordering.index(&b.port))
            .collect::<Result<_>>()?;
        let outputs: Vec<usize> = self
            .outputs
            .iter()
            .map(|p| ordering.index(p))
            .collect::<Result<_>>()?;

        let mut response = Array3::<Complex64>::zeros((wavelengths.len(), 2 * outputs.len(), 2 * inputs.len()));
        for (w, &wavelength) in wavelengths.iter().enumerate() {
            if !(wavelength.is_finite() && wavelength > 0.0) {
                return Err(LumenError::InvalidLightState(format!(
                    "wavelength must be finite and positive, got {}",
                    wavelength
                )));
            }
            let op = self.operator(time, wavelength)?;
            let x = solve_complex_multi(&op.system, &op.scattering).ok_or(LumenError::SingularSystem {
                time,
                condition: f64::INFINITY,
            })?;
            for (o, &out) in outputs.iter().enumerate() {
                for (i, &inp) in inputs.iter().enumerate() {
                    response
                        .slice_mut(s![w, 2 * o..2 * o + 2, 2 * i..2 * i + 2])
                        .assign(&x.slice(s![2 * out..2 * out + 2, 2 * inp..2 * inp + 2]));
                }
            }
        }
        Ok(response)
    }
}
