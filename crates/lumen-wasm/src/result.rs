//! WASM bindings for simulation results

use js_sys::Float64Array;
use lumen_core::prelude::*;
use wasm_bindgen::prelude::*;

fn polarization(vertical: Option<bool>) -> Polarization {
    if vertical.unwrap_or(false) {
        Polarization::V
    } else {
        Polarization::H
    }
}

fn unknown_output(component: &str, port: usize) -> JsValue {
    JsValue::from_str(&format!("Not an output: {}:{}", component, port))
}

/// Output light series of a simulation run
#[wasm_bindgen]
pub struct WasmSimulationResult {
    inner: SimulationResult,
}

#[wasm_bindgen]
impl WasmSimulationResult {
    /// Time samples in seconds
    #[wasm_bindgen(getter)]
    pub fn times(&self) -> Float64Array {
        Float64Array::from(self.inner.times())
    }

    /// True when every source was coherent and fields were superposed
    #[wasm_bindgen(getter)]
    pub fn coherent(&self) -> bool {
        self.inner.coherence() == Coherence::Coherent
    }

    /// Output ports as "component:port" strings
    #[wasm_bindgen(getter)]
    pub fn outputs(&self) -> Vec<String> {
        self.inner.outputs().iter().map(|p| p.to_string()).collect()
    }

    /// Total power at an output for each sample
    pub fn power(&self, component: &str, port: usize) -> Result<Float64Array, JsValue> {
        let power = self
            .inner
            .power(&PortRef::new(component, port))
            .ok_or_else(|| unknown_output(component, port))?;
        Ok(Float64Array::from(power.as_slice()))
    }

    /// Power in one polarization (H unless `vertical`)
    #[wasm_bindgen(js_name = powerPolarized)]
    pub fn power_polarized(&self, component: &str, port: usize, vertical: Option<bool>) -> Result<Float64Array, JsValue> {
        let port_ref = PortRef::new(component, port);
        let power = match polarization(vertical) {
            Polarization::H => self.inner.power_h(&port_ref),
            Polarization::V => self.inner.power_v(&port_ref),
        }
        .ok_or_else(|| unknown_output(component, port))?;
        Ok(Float64Array::from(power.as_slice()))
    }

    /// Stokes vectors as a flattened Float64Array
    /// Shape: [nsamples * 4] as (s0, s1, s2, s3) per sample
    pub fn stokes(&self, component: &str, port: usize) -> Result<Float64Array, JsValue> {
        let stokes = self
            .inner
            .stokes(&PortRef::new(component, port))
            .ok_or_else(|| unknown_output(component, port))?;
        let flat: Vec<f64> = stokes.iter().flat_map(|s| s.to_array()).collect();
        Ok(Float64Array::from(flat.as_slice()))
    }

    /// Field phase (rad) of one polarization; coherent runs only
    pub fn phase(&self, component: &str, port: usize, vertical: Option<bool>) -> Result<Float64Array, JsValue> {
        let phase = self
            .inner
            .phase(&PortRef::new(component, port), polarization(vertical))
            .ok_or_else(|| JsValue::from_str("Phase is only defined for coherent outputs"))?;
        Ok(Float64Array::from(phase.as_slice()))
    }

    /// Phase of V relative to H (rad); coherent runs only
    #[wasm_bindgen(js_name = relativePhase)]
    pub fn relative_phase(&self, component: &str, port: usize) -> Result<Float64Array, JsValue> {
        let phase = self
            .inner
            .relative_phase(&PortRef::new(component, port))
            .ok_or_else(|| JsValue::from_str("Phase is only defined for coherent outputs"))?;
        Ok(Float64Array::from(phase.as_slice()))
    }
}

impl WasmSimulationResult {
    pub fn inner(&self) -> &SimulationResult {
        &self.inner
    }

    pub fn from_result(result: SimulationResult) -> Self {
        Self { inner: result }
    }
}

/// Circuit-level S-parameters for WASM
#[wasm_bindgen]
pub struct WasmCircuitResponse {
    inner: CircuitResponse,
}

#[wasm_bindgen]
impl WasmCircuitResponse {
    #[wasm_bindgen(getter)]
    pub fn wavelengths(&self) -> Float64Array {
        Float64Array::from(self.inner.wavelengths.as_slice())
    }

    /// Real part as flattened Float64Array
    /// Shape: [nwavelengths * 2 noutputs * 2 ninputs] in row-major order
    #[wasm_bindgen(js_name = getSRe)]
    pub fn get_s_re(&self) -> Float64Array {
        let flat: Vec<f64> = self.inner.s.iter().map(|z| z.re).collect();
        Float64Array::from(flat.as_slice())
    }

    /// Imaginary part as flattened Float64Array
    #[wasm_bindgen(js_name = getSIm)]
    pub fn get_s_im(&self) -> Float64Array {
        let flat: Vec<f64> = self.inner.s.iter().map(|z| z.im).collect();
        Float64Array::from(flat.as_slice())
    }

    /// Power transmission from an input to an output, per wavelength
    ///
    /// @param vertical - Input polarization is V (default H)
    pub fn transmission(
        &self,
        output: &str,
        output_port: usize,
        input: &str,
        input_port: usize,
        vertical: Option<bool>,
    ) -> Result<Float64Array, JsValue> {
        let out = PortRef::new(output, output_port);
        let inp = PortRef::new(input, input_port);
        let q = polarization(vertical);
        let values = (0..self.inner.wavelengths.len())
            .map(|w| {
                self.inner
                    .transmission(w, &out, &inp, q)
                    .ok_or_else(|| JsValue::from_str(&format!("No response from {} to {}", inp, out)))
            })
            .collect::<Result<Vec<f64>, JsValue>>()?;
        Ok(Float64Array::from(values.as_slice()))
    }
}

impl WasmCircuitResponse {
    pub fn inner(&self) -> &CircuitResponse {
        &self.inner
    }

    pub fn from_response(response: CircuitResponse) -> Self {
        Self { inner: response }
    }
}
