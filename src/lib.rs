//! # Booth Multiplier Simulator
//!
//! An educational, bit-exact simulator of Booth's signed multiplication
//! algorithm.
//!
//! Registers are n-bit two's-complement patterns. Each step inspects the
//! low bit of Q together with Q₋₁, conditionally adds or subtracts the
//! multiplicand into A, then shifts A:Q:Q₋₁ right arithmetically. After n
//! steps A:Q holds the 2n-bit product.

pub mod bits;
pub mod booth;
pub mod config;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use booth::{Action, BitWidth, BoothEngine, BoothError, EngineState, RunResult, StepOutcome, StepSnapshot};
pub use config::{SimConfig, ConfigError};

#[cfg(feature = "tui")]
pub use tui::run_visualizer;
