//! Booth's multiplication algorithm as a step-wise register machine.
//!
//! - [`registers`] - the A, Q, Q₋₁, M group and the validated width
//! - [`engine`] - the simulator: step, run, reset and the step log
//! - [`trace`] - text rendering of registers and steps

pub mod registers;
pub mod engine;
pub mod trace;

pub use registers::{BitWidth, BoothError, Registers, MIN_BITS, MAX_BITS};
pub use engine::{Action, BoothEngine, EngineState, RunResult, StepOutcome, StepSnapshot};
