//! Two's-complement bit primitives.
//!
//! Every register in the simulator is an unsigned bit pattern of a fixed
//! width. This module provides the pure functions that operate on them:
//! - [`twos`] - conversion between signed integers and n-bit patterns
//! - [`arith`] - masked add/subtract and the coupled A:Q:Q₋₁ shift
//!
//! None of these functions hold state; widths are passed explicitly.

pub mod twos;
pub mod arith;

pub use twos::{mask, to_twos_complement, from_twos_complement, from_twos_complement_wide};
pub use arith::{masked_add, masked_sub, shift_right_arithmetic_aq, combine};

/// Widest register the primitives support.
pub const MAX_WORD_BITS: u32 = 64;
