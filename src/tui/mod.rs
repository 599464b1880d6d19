//! Interactive terminal visualizer for the Booth engine.
//!
//! Provides:
//! - Register cards for A, Q, Q₋₁ and M in unsigned, signed and binary form
//! - A live A:Q product preview
//! - An operation log with the latest step on top
//! - Step, auto-run and reset controls with editable inputs

mod app;
mod ui;

pub use app::{BoothApp, Field, InputField, run_visualizer};
