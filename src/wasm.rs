//! WebAssembly bindings for the Booth simulator.
//!
//! JavaScript-friendly wrappers around [`BoothEngine`]. 128-bit products do
//! not cross the boundary as numbers, so they are returned as strings.

use wasm_bindgen::prelude::*;
use crate::booth::{BoothEngine, StepOutcome};
use crate::booth::trace::{format_step, to_binary};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly engine wrapper.
#[wasm_bindgen]
pub struct WasmBooth {
    engine: BoothEngine,
}

#[wasm_bindgen]
impl WasmBooth {
    /// Create a simulator; fails for widths outside 4-64.
    #[wasm_bindgen(constructor)]
    pub fn new(multiplicand: i64, multiplier: i64, bits: u32) -> Result<WasmBooth, JsError> {
        let engine = BoothEngine::new(multiplicand, multiplier, bits)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { engine })
    }

    /// Step once. Returns the log line, or an empty string when done.
    #[wasm_bindgen]
    pub fn step(&mut self) -> String {
        match self.engine.step() {
            StepOutcome::Stepped(snap) => format_step(&snap),
            StepOutcome::Finished => String::new(),
        }
    }

    /// Run to completion. Returns the signed product.
    #[wasm_bindgen]
    pub fn run(&mut self) -> String {
        self.engine.run().product_signed.to_string()
    }

    /// Reset; `undefined` arguments keep their current values.
    #[wasm_bindgen]
    pub fn reset(
        &mut self,
        multiplicand: Option<i64>,
        multiplier: Option<i64>,
        bits: Option<u32>,
    ) -> Result<(), JsError> {
        self.engine
            .reset(multiplicand, multiplier, bits)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn is_done(&self) -> bool {
        self.engine.is_done()
    }

    #[wasm_bindgen]
    pub fn step_count(&self) -> u32 {
        self.engine.step_count()
    }

    #[wasm_bindgen]
    pub fn bits(&self) -> u32 {
        self.engine.bits()
    }

    /// Register A as a binary string.
    #[wasm_bindgen]
    pub fn a_binary(&self) -> String {
        to_binary(self.engine.a() as u128, self.engine.bits())
    }

    /// Register Q as a binary string.
    #[wasm_bindgen]
    pub fn q_binary(&self) -> String {
        to_binary(self.engine.q() as u128, self.engine.bits())
    }

    /// Register M as a binary string.
    #[wasm_bindgen]
    pub fn m_binary(&self) -> String {
        to_binary(self.engine.m() as u128, self.engine.bits())
    }

    #[wasm_bindgen]
    pub fn q1(&self) -> u8 {
        self.engine.q1()
    }

    /// Current signed A:Q product.
    #[wasm_bindgen]
    pub fn product(&self) -> String {
        self.engine.product_signed().to_string()
    }

    /// The step log as an array of formatted lines, oldest first.
    #[wasm_bindgen]
    pub fn log_lines(&self) -> js_sys::Array {
        self.engine
            .log()
            .iter()
            .map(|snap| JsValue::from_str(&format_step(snap)))
            .collect()
    }

    /// The step log as a JSON array.
    #[wasm_bindgen]
    pub fn log_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.engine.log()).map_err(|e| JsError::new(&e.to_string()))
    }

    /// The whole engine state as JSON.
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.engine).map_err(|e| JsError::new(&e.to_string()))
    }
}
