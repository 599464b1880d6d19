//! Conversion between signed integers and n-bit two's-complement patterns.

/// All-ones mask of `bits` width, `(1 << bits) - 1`.
///
/// Valid for widths 1 through 64.
#[inline]
pub fn mask(bits: u32) -> u64 {
    debug_assert!((1..=64).contains(&bits), "width {} out of range (1-64)", bits);
    u64::MAX >> (64 - bits)
}

/// All-ones mask for patterns up to 128 bits wide.
#[inline]
fn wide_mask(bits: u32) -> u128 {
    debug_assert!((1..=128).contains(&bits), "width {} out of range (1-128)", bits);
    u128::MAX >> (128 - bits)
}

/// Encode a signed integer as an unsigned `bits`-wide pattern.
///
/// Magnitudes that do not fit wrap silently (reduction mod 2ⁿ).
#[inline]
pub fn to_twos_complement(value: i64, bits: u32) -> u64 {
    (value as u64) & mask(bits)
}

/// Interpret a `bits`-wide pattern as a signed integer.
///
/// If the top bit is set the result is `pattern - 2ⁿ`, otherwise `pattern`.
pub fn from_twos_complement(pattern: u64, bits: u32) -> i64 {
    let m = mask(bits);
    let pattern = pattern & m;
    let sign_bit = 1u64 << (bits - 1);

    if pattern & sign_bit != 0 {
        // Filling the bits above the width subtracts 2ⁿ in 64-bit two's complement.
        (pattern | !m) as i64
    } else {
        pattern as i64
    }
}

/// Interpret a pattern of up to 128 bits as a signed integer.
///
/// Used for the 2n-bit combined A:Q product.
pub fn from_twos_complement_wide(pattern: u128, bits: u32) -> i128 {
    let m = wide_mask(bits);
    let pattern = pattern & m;
    let sign_bit = 1u128 << (bits - 1);

    if pattern & sign_bit != 0 {
        (pattern | !m) as i128
    } else {
        pattern as i128
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Reference reduction of `v` into the signed range of `bits`.
    fn signed_reduce(v: i64, bits: u32) -> i128 {
        let modulus = 1i128 << bits;
        let r = (v as i128).rem_euclid(modulus);
        if r >= modulus / 2 { r - modulus } else { r }
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask(1), 0b1);
        assert_eq!(mask(4), 0b1111);
        assert_eq!(mask(8), 0xFF);
        assert_eq!(mask(64), u64::MAX);
    }

    #[test]
    fn test_to_twos_complement() {
        assert_eq!(to_twos_complement(3, 4), 0b0011);
        assert_eq!(to_twos_complement(-4, 4), 0b1100);
        assert_eq!(to_twos_complement(-1, 8), 0xFF);
        assert_eq!(to_twos_complement(-3, 8), 0b1111_1101);
        // Wraps out-of-range magnitudes
        assert_eq!(to_twos_complement(17, 4), 0b0001);
        assert_eq!(to_twos_complement(i64::MIN, 64), 1u64 << 63);
    }

    #[test]
    fn test_from_twos_complement() {
        assert_eq!(from_twos_complement(0b0111, 4), 7);
        assert_eq!(from_twos_complement(0b1000, 4), -8);
        assert_eq!(from_twos_complement(0b1111, 4), -1);
        assert_eq!(from_twos_complement(0, 4), 0);
        assert_eq!(from_twos_complement(u64::MAX, 64), -1);
        assert_eq!(from_twos_complement(1u64 << 63, 64), i64::MIN);
    }

    #[test]
    fn test_from_twos_complement_wide() {
        assert_eq!(from_twos_complement_wide(0xFFEB, 16), -21);
        assert_eq!(from_twos_complement_wide(0xF4, 8), -12);
        assert_eq!(from_twos_complement_wide(0x7F, 8), 127);
        assert_eq!(from_twos_complement_wide(u128::MAX, 128), -1);
    }

    #[test]
    fn test_width_one() {
        assert_eq!(to_twos_complement(-1, 1), 1);
        assert_eq!(from_twos_complement(1, 1), -1);
        assert_eq!(from_twos_complement(0, 1), 0);
    }

    proptest! {
        #[test]
        fn prop_round_trip(v in any::<i64>(), bits in 1u32..=64) {
            let pattern = to_twos_complement(v, bits);
            prop_assert!(pattern <= mask(bits));
            prop_assert_eq!(from_twos_complement(pattern, bits) as i128, signed_reduce(v, bits));
        }

        #[test]
        fn prop_wide_agrees_with_narrow(v in any::<i64>(), bits in 1u32..=64) {
            let pattern = to_twos_complement(v, bits);
            prop_assert_eq!(
                from_twos_complement_wide(pattern as u128, bits),
                from_twos_complement(pattern, bits) as i128
            );
        }
    }
}
