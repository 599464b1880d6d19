//! Booth register group.
//!
//! The simulator works on four registers of a common width n:
//! - M: multiplicand (read-only during a run)
//! - A: accumulator, starts at zero
//! - Q: multiplier, consumed one bit per step
//! - Q₋₁: single history bit holding the last bit shifted out of Q

use crate::bits::{self, MAX_WORD_BITS};
use serde::{Serialize, Deserialize};
use std::fmt;
use thiserror::Error;

/// Smallest width a simulation may use.
pub const MIN_BITS: u32 = 4;

/// Largest width a simulation may use.
pub const MAX_BITS: u32 = MAX_WORD_BITS;

/// A validated register width in `MIN_BITS..=MAX_BITS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BitWidth(u32);

impl BitWidth {
    /// Validate a width.
    pub fn new(bits: u32) -> Result<Self, BoothError> {
        if bits < MIN_BITS {
            return Err(BoothError::InvalidConfiguration {
                bits,
                reason: format!("at least {} bits are required", MIN_BITS),
            });
        }
        if bits > MAX_BITS {
            return Err(BoothError::InvalidConfiguration {
                bits,
                reason: format!("registers are limited to {} bits", MAX_BITS),
            });
        }
        Ok(Self(bits))
    }

    /// A width fixed at compile time; panics in const evaluation if out of range.
    pub const fn from_const(bits: u32) -> Self {
        assert!(bits >= MIN_BITS && bits <= MAX_BITS, "width out of range");
        Self(bits)
    }

    /// Width in bits.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Width of the combined A:Q product.
    #[inline]
    pub const fn product_bits(self) -> u32 {
        self.0 * 2
    }
}

impl TryFrom<u32> for BitWidth {
    type Error = BoothError;

    fn try_from(bits: u32) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl From<BitWidth> for u32 {
    fn from(width: BitWidth) -> u32 {
        width.0
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bits", self.0)
    }
}

/// The A, Q, Q₋₁ and M registers as unsigned bit patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// Accumulator.
    pub a: u64,
    /// Multiplier.
    pub q: u64,
    /// History bit, 0 or 1.
    pub q1: u8,
    /// Multiplicand.
    pub m: u64,
}

impl Registers {
    /// Load the registers for a fresh run.
    pub fn load(multiplicand: i64, multiplier: i64, width: BitWidth) -> Self {
        Self {
            a: 0,
            q: bits::to_twos_complement(multiplier, width.get()),
            q1: 0,
            m: bits::to_twos_complement(multiplicand, width.get()),
        }
    }

    /// The pair (Q₀, Q₋₁) that drives the Booth decision.
    #[inline]
    pub fn decision_pair(&self) -> (u8, u8) {
        ((self.q & 1) as u8, self.q1)
    }

    /// A ← A + M.
    pub fn add_multiplicand(&mut self, width: BitWidth) {
        self.a = bits::masked_add(self.a, self.m, width.get());
    }

    /// A ← A − M.
    pub fn subtract_multiplicand(&mut self, width: BitWidth) {
        self.a = bits::masked_sub(self.a, self.m, width.get());
    }

    /// Shift A:Q:Q₋₁ right by one, sign-extending A.
    pub fn shift(&mut self, width: BitWidth) {
        let (a, q, q1) = bits::shift_right_arithmetic_aq(self.a, self.q, self.q1, width.get());
        self.a = a;
        self.q = q;
        self.q1 = q1;
    }

    /// The 2n-bit pattern A:Q.
    #[inline]
    pub fn product_unsigned(&self, width: BitWidth) -> u128 {
        bits::combine(self.a, self.q, width.get())
    }

    /// A:Q interpreted as a signed 2n-bit integer.
    #[inline]
    pub fn product_signed(&self, width: BitWidth) -> i128 {
        bits::from_twos_complement_wide(self.product_unsigned(width), width.product_bits())
    }
}

/// Errors raised when configuring a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoothError {
    #[error("invalid configuration: {bits}-bit width rejected, {reason}")]
    InvalidConfiguration { bits: u32, reason: String },
}
