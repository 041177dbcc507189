//! WASM bindings for Circuit construction and simulation

use lumen_core::prelude::*;
use ndarray::Array2;
use num_complex::Complex64;
use wasm_bindgen::prelude::*;

use crate::js_error;
use crate::result::{WasmCircuitResponse, WasmSimulationResult};

/// Photonic circuit for WASM
#[wasm_bindgen]
pub struct WasmCircuit {
    inner: Circuit,
    condition_limit: Option<f64>,
}

#[wasm_bindgen]
impl WasmCircuit {
    #[wasm_bindgen(constructor)]
    pub fn new(name: &str) -> WasmCircuit {
        WasmCircuit {
            inner: Circuit::new(name),
            condition_limit: None,
        }
    }

    /// Circuit name
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.inner.name().to_string()
    }

    /// Number of components
    #[wasm_bindgen(getter, js_name = componentCount)]
    pub fn component_count(&self) -> usize {
        self.inner.components().len()
    }

    /// Override the singularity threshold on the condition number
    #[wasm_bindgen(js_name = setConditionLimit)]
    pub fn set_condition_limit(&mut self, limit: f64) {
        self.condition_limit = Some(limit);
    }

    // ------------------------------------------------------------------
    // Component library
    // ------------------------------------------------------------------

    /// Waveguide section
    ///
    /// @param n_h, n_v - Effective indices
    /// @param length - Length in metres
    /// @param loss_h, loss_v - Optional propagation loss in dB/m
    #[wasm_bindgen(js_name = addWaveguide)]
    pub fn add_waveguide(
        &mut self,
        name: &str,
        n_h: f64,
        n_v: f64,
        length: f64,
        loss_h: Option<f64>,
        loss_v: Option<f64>,
    ) -> Result<(), JsValue> {
        let model = PhaseShifter::waveguide(n_h, n_v, length)
            .with_loss(loss_h.unwrap_or(0.0), loss_v.unwrap_or(0.0));
        self.add(Component::new(name, model))
    }

    /// Wavelength-independent phase shifter
    ///
    /// @param phase - Static phase (rad)
    /// @param rate - Optional phase ramp (rad/s) added at each time sample
    #[wasm_bindgen(js_name = addPhaseShifter)]
    pub fn add_phase_shifter(&mut self, name: &str, phase: f64, rate: Option<f64>) -> Result<(), JsValue> {
        let mut model = PhaseShifter::ideal(phase);
        if let Some(rate) = rate {
            model = model.with_modulation(move |t| rate * t);
        }
        self.add(Component::new(name, model))
    }

    #[wasm_bindgen(js_name = addBeamSplitter)]
    pub fn add_beam_splitter(&mut self, name: &str) -> Result<(), JsValue> {
        self.add(Component::new(name, BeamSplitter))
    }

    /// Directional coupler with coupling coefficients in 1/m
    #[wasm_bindgen(js_name = addDirectionalCoupler)]
    pub fn add_directional_coupler(
        &mut self,
        name: &str,
        coupling_h: f64,
        coupling_v: f64,
        length: f64,
    ) -> Result<(), JsValue> {
        self.add(Component::new(
            name,
            DirectionalCoupler::new(coupling_h, coupling_v, length),
        ))
    }

    /// Polarization beam splitter; ideal when no extinction ratio is given
    #[wasm_bindgen(js_name = addPolarizationBeamSplitter)]
    pub fn add_polarization_beam_splitter(
        &mut self,
        name: &str,
        extinction_ratio_db: Option<f64>,
        insertion_loss_db: Option<f64>,
    ) -> Result<(), JsValue> {
        let model = match extinction_ratio_db {
            Some(er) => PolarizationBeamSplitter::new(er),
            None => PolarizationBeamSplitter::ideal(),
        };
        self.add(Component::new(
            name,
            model.with_insertion_loss(insertion_loss_db.unwrap_or(0.0)),
        ))
    }

    #[wasm_bindgen(js_name = addPolarizer)]
    pub fn add_polarizer(&mut self, name: &str, angle: f64) -> Result<(), JsValue> {
        self.add(Component::new(name, Polarizer::new(angle)))
    }

    #[wasm_bindgen(js_name = addHalfWavePlate)]
    pub fn add_half_wave_plate(&mut self, name: &str, angle: f64) -> Result<(), JsValue> {
        self.add(Component::new(name, HalfWavePlate::new(angle)))
    }

    /// @param fast_axis - 'horizontal' (default) or 'vertical'
    #[wasm_bindgen(js_name = addQuarterWavePlate)]
    pub fn add_quarter_wave_plate(&mut self, name: &str, fast_axis: Option<String>) -> Result<(), JsValue> {
        let axis = match fast_axis.as_deref().unwrap_or("horizontal").to_lowercase().as_str() {
            "horizontal" | "h" => FastAxis::Horizontal,
            "vertical" | "v" => FastAxis::Vertical,
            a => return Err(JsValue::from_str(&format!("Invalid fast axis: {}", a))),
        };
        self.add(Component::new(name, QuarterWavePlate::new(axis)))
    }

    #[wasm_bindgen(js_name = addPolarizationRotator)]
    pub fn add_polarization_rotator(&mut self, name: &str) -> Result<(), JsValue> {
        self.add(Component::new(name, PolarizationRotator))
    }

    #[wasm_bindgen(js_name = addFaradayRotator)]
    pub fn add_faraday_rotator(&mut self, name: &str, angle: f64) -> Result<(), JsValue> {
        self.add(Component::new(name, FaradayRotator::new(angle)))
    }

    #[wasm_bindgen(js_name = addMachZehnder)]
    pub fn add_mach_zehnder(&mut self, name: &str, n_h: f64, n_v: f64, arm_length: f64) -> Result<(), JsValue> {
        self.add(Component::new(
            name,
            MachZehnderInterferometer::new(n_h, n_v, arm_length),
        ))
    }

    /// Component with an explicit scattering matrix
    ///
    /// @param ports - Number of ports N
    /// @param re, im - Row-major 2N x 2N matrix parts
    #[wasm_bindgen(js_name = addFixed)]
    pub fn add_fixed(&mut self, name: &str, ports: usize, re: &[f64], im: &[f64]) -> Result<(), JsValue> {
        let n = 2 * ports;
        if re.len() != n * n || im.len() != n * n {
            return Err(JsValue::from_str(&format!(
                "Expected {} matrix entries for {} ports, got {} real and {} imaginary",
                n * n,
                ports,
                re.len(),
                im.len()
            )));
        }
        let matrix = Array2::from_shape_fn((n, n), |(i, j)| Complex64::new(re[i * n + j], im[i * n + j]));
        let component = Component::fixed(name, ports, matrix).map_err(|e| js_error("Invalid matrix", e))?;
        self.add(component)
    }

    /// Remove a component with its connections and bindings
    pub fn remove(&mut self, name: &str) -> bool {
        self.inner.remove(name).is_some()
    }

    // ------------------------------------------------------------------
    // Wiring
    // ------------------------------------------------------------------

    pub fn connect(&mut self, source: &str, source_port: usize, destination: &str, destination_port: usize) -> Result<(), JsValue> {
        self.inner
            .connect((source, source_port), (destination, destination_port))
            .map_err(|e| js_error("Cannot connect", e))
    }

    /// Bind a constant light source to a free port
    ///
    /// @param amp_h, phase_h, amp_v, phase_v - Jones vector in polar form
    /// @param wavelength - Vacuum wavelength in metres
    /// @param coherent - Interfere with other coherent sources (default true)
    #[wasm_bindgen(js_name = setInput)]
    #[allow(clippy::too_many_arguments)]
    pub fn set_input(
        &mut self,
        component: &str,
        port: usize,
        amp_h: f64,
        phase_h: f64,
        amp_v: f64,
        phase_v: f64,
        wavelength: f64,
        coherent: Option<bool>,
    ) -> Result<(), JsValue> {
        let light = CoherentLight::from_polar(amp_h, phase_h, amp_v, phase_v, wavelength)
            .map_err(|e| js_error("Invalid light", e))?;
        let coherence = if coherent.unwrap_or(true) {
            Coherence::Coherent
        } else {
            Coherence::Incoherent
        };
        self.inner
            .set_input((component, port), Laser::constant(light, coherence))
            .map_err(|e| js_error("Cannot bind input", e))
    }

    #[wasm_bindgen(js_name = setOutput)]
    pub fn set_output(&mut self, component: &str, port: usize) -> Result<(), JsValue> {
        self.inner
            .set_output((component, port))
            .map_err(|e| js_error("Cannot bind output", e))
    }

    // ------------------------------------------------------------------
    // Simulation
    // ------------------------------------------------------------------

    /// Simulate the circuit at each time sample (s)
    pub fn simulate(&self, times: &[f64]) -> Result<WasmSimulationResult, JsValue> {
        let result = Simulation::with_options(&self.inner, self.options())
            .simulate(times)
            .map_err(|e| js_error("Simulation failed", e))?;
        Ok(WasmSimulationResult::from_result(result))
    }

    /// Circuit-level S-parameters at each wavelength (m)
    #[wasm_bindgen(js_name = sParameters)]
    pub fn s_parameters(&self, wavelengths: &[f64]) -> Result<WasmCircuitResponse, JsValue> {
        let response = Simulation::with_options(&self.inner, self.options())
            .s_parameters(wavelengths)
            .map_err(|e| js_error("S-parameter extraction failed", e))?;
        Ok(WasmCircuitResponse::from_response(response))
    }
}

impl WasmCircuit {
    /// Get the inner Circuit reference
    pub fn inner(&self) -> &Circuit {
        &self.inner
    }

    /// Create from existing Circuit
    pub fn from_circuit(circuit: Circuit) -> Self {
        Self {
            inner: circuit,
            condition_limit: None,
        }
    }

    fn add(&mut self, component: Component) -> Result<(), JsValue> {
        self.inner
            .add(component)
            .map_err(|e| js_error("Cannot add component", e))
    }

    fn options(&self) -> SimulationOptions {
        let options = SimulationOptions::default().with_parallel(false);
        match self.condition_limit {
            Some(limit) => options.with_condition_limit(limit),
            None => options,
        }
    }
}
