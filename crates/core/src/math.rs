//! U256 fixed-point arithmetic for liquidation calculations.
//!
//! All monetary quantities are unsigned integers scaled by 10^18 (WAD).
//! Scale divisions are exact integer divisions truncating toward zero, and
//! multiplications are overflow-checked so an inconsistent scale constant
//! can never wrap silently.

use alloy::primitives::U256;

/// WAD constant: 1e18 for 18-decimal fixed-point arithmetic
pub const WAD: U256 = U256::from_limbs([1_000_000_000_000_000_000u64, 0, 0, 0]);

/// Multiply two WAD values with overflow detection: (a * b) / WAD.
///
/// Returns `None` if the intermediate product overflows 256 bits.
#[inline]
pub fn checked_wad_mul(a: U256, b: U256) -> Option<U256> {
    a.checked_mul(b).map(|product| product / WAD)
}

/// Convert WAD (18 decimals) to f64.
/// Use only for display/logging, not for computation.
#[inline]
pub fn wad_to_f64(wad: U256) -> f64 {
    // For values that fit in u128, use direct conversion
    if wad <= U256::from(u128::MAX) {
        let value: u128 = wad.to();
        value as f64 / 1e18
    } else {
        // For larger values, use limbs
        let limbs = wad.as_limbs();
        let high = limbs[1] as f64 * (u64::MAX as f64 + 1.0);
        let low = limbs[0] as f64;
        (high + low) / 1e18
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_wad_mul_exact() {
        // 2.0 * 100.0 = 200.0
        let price = U256::from(2u64) * WAD;
        let debt = U256::from(100u64) * WAD;
        assert_eq!(checked_wad_mul(price, debt), Some(U256::from(200u64) * WAD));
    }

    #[test]
    fn test_checked_wad_mul_truncates_toward_zero() {
        // (1 wei) * (1 wei) / 1e18 truncates to zero
        let one_wei = U256::from(1u64);
        assert_eq!(checked_wad_mul(one_wei, one_wei), Some(U256::ZERO));

        // 1.5 * 1 wei = 1 wei (the half is truncated)
        let one_and_half = WAD + WAD / U256::from(2u64);
        assert_eq!(checked_wad_mul(one_and_half, one_wei), Some(one_wei));
    }

    #[test]
    fn test_checked_wad_mul_overflow() {
        assert_eq!(checked_wad_mul(U256::MAX, U256::from(2u64)), None);
        assert_eq!(checked_wad_mul(U256::MAX, U256::MAX), None);

        // Multiplying by zero never overflows
        assert_eq!(checked_wad_mul(U256::MAX, U256::ZERO), Some(U256::ZERO));
    }

    #[test]
    fn test_wad_to_f64() {
        let wad = U256::from(1000u64) * WAD;
        let f64_val = wad_to_f64(wad);
        assert!((f64_val - 1000.0).abs() < 0.001);
    }
}
