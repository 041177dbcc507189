//! WASM bindings for lumen-core
//!
//! This module exposes circuit construction and simulation to
//! JavaScript/WASM. Samples are always solved sequentially here.

use wasm_bindgen::prelude::*;

mod circuit;
mod result;

pub use circuit::WasmCircuit;
pub use result::{WasmCircuitResponse, WasmSimulationResult};

/// Get the library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn js_error(context: &str, err: lumen_core::LumenError) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}
