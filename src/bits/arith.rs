//! Masked register arithmetic.
//!
//! All operations are closed over `bits`-wide patterns: inputs are assumed
//! to fit the width and every output is masked back into it, so nothing here
//! can overflow or fail.

use crate::bits::twos::mask;

/// `(a + b) mod 2ⁿ`.
#[inline]
pub fn masked_add(a: u64, b: u64, bits: u32) -> u64 {
    a.wrapping_add(b) & mask(bits)
}

/// `(a - b) mod 2ⁿ`, computed as `a + (~b + 1)`.
///
/// The negation is formed on the masked pattern, so the result never depends
/// on how the host represents negative numbers.
#[inline]
pub fn masked_sub(a: u64, b: u64, bits: u32) -> u64 {
    let m = mask(bits);
    let neg_b = (!b).wrapping_add(1) & m;
    masked_add(a, neg_b, bits)
}

/// One arithmetic right shift of the A:Q:Q₋₁ register group.
///
/// Returns `(a, q, q1)` where
/// - `q1` takes the bit shifted out of Q (the old Q₋₁ is discarded),
/// - `q` takes the bit shifted out of A into its top position,
/// - `a` is shifted right with its sign bit replicated.
pub fn shift_right_arithmetic_aq(a: u64, q: u64, _q1: u8, bits: u32) -> (u64, u64, u8) {
    let m = mask(bits);
    let top = 1u64 << (bits - 1);

    let new_q1 = (q & 1) as u8;
    let new_q = ((q >> 1) | ((a & 1) << (bits - 1))) & m;
    let new_a = if a & top != 0 {
        ((a >> 1) | top) & m
    } else {
        (a >> 1) & m
    };

    (new_a, new_q, new_q1)
}

/// Concatenate A and Q into the 2n-bit product pattern `A:Q`.
#[inline]
pub fn combine(a: u64, q: u64, bits: u32) -> u128 {
    let wide = 2 * bits;
    let m = u128::MAX >> (128 - wide);
    (((a as u128) << bits) | (q & mask(bits)) as u128) & m
}
