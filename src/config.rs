//! Simulator configuration.
//!
//! Front ends read their defaults from a [`SimConfig`], optionally loaded
//! from a JSON file:
//!
//! ```json
//! { "multiplicand": 7, "multiplier": -3, "bits": 8, "widths": [8, 16, 32], "run_delay_ms": 450 }
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use crate::booth::{BitWidth, BoothError};
use serde::{Serialize, Deserialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Defaults and limits shared by the front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Default multiplicand (M).
    pub multiplicand: i64,
    /// Default multiplier (Q).
    pub multiplier: i64,
    /// Default register width.
    pub bits: BitWidth,
    /// Widths offered by the interactive width selector.
    pub widths: Vec<BitWidth>,
    /// Delay between steps while auto-running.
    pub run_delay_ms: u64,
}

impl SimConfig {
    /// Load and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(text)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the width selector is usable and contains the default width.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.widths.is_empty() {
            return Err(ConfigError::NoWidths);
        }
        if !self.widths.contains(&self.bits) {
            return Err(ConfigError::UnselectableWidth(self.bits.get()));
        }
        Ok(())
    }

    /// Override the default width, e.g. from a command-line flag.
    ///
    /// A width missing from the selector is added to it.
    pub fn with_bits(mut self, bits: u32) -> Result<Self, ConfigError> {
        let width = BitWidth::new(bits)?;
        if !self.widths.contains(&width) {
            self.widths.push(width);
            self.widths.sort();
        }
        self.bits = width;
        Ok(self)
    }

    pub fn run_delay(&self) -> Duration {
        Duration::from_millis(self.run_delay_ms)
    }

    /// Position of the default width in the selector.
    pub fn default_width_index(&self) -> usize {
        self.widths.iter().position(|w| *w == self.bits).unwrap_or(0)
    }
}

const DEFAULT_WIDTHS: [BitWidth; 3] = [
    BitWidth::from_const(8),
    BitWidth::from_const(16),
    BitWidth::from_const(32),
];

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            multiplicand: 7,
            multiplier: -3,
            bits: DEFAULT_WIDTHS[0],
            widths: DEFAULT_WIDTHS.to_vec(),
            run_delay_ms: 450,
        }
    }
}

/// Errors that can occur while loading a configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error(transparent)]
    Booth(#[from] BoothError),

    #[error("width selector must offer at least one width")]
    NoWidths,

    #[error("default width {0} is not among the selectable widths")]
    UnselectableWidth(u32),
}
