//! Big integer operations for high-precision math
//!
//! 256-bit intermediates (`ethnum::U256`) and the `mul_div` primitive used by
//! liquidity and growth calculations.

use crate::errors::{ClmmCoreError, CoreResult};

pub use ethnum::U256;

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

impl Rounding {
    pub fn from_round_up(round_up: bool) -> Self {
        if round_up {
            Rounding::Up
        } else {
            Rounding::Down
        }
    }
}

/// Multiply two values and divide by a third with specified rounding
/// result = (a * b) / denominator
pub fn mul_div(a: U256, b: U256, denominator: U256, rounding: Rounding) -> CoreResult<U256> {
    if denominator == U256::ZERO {
        return Err(ClmmCoreError::DivisionByZero);
    }

    let product = a.checked_mul(b).ok_or(ClmmCoreError::MathOverflow)?;
    let quotient = product / denominator;

    if rounding == Rounding::Up && product % denominator != U256::ZERO {
        return quotient
            .checked_add(U256::ONE)
            .ok_or(ClmmCoreError::MathOverflow);
    }

    Ok(quotient)
}

/// Multiply two u128 values and divide by a third, result must fit in u128
pub fn mul_div_u128(a: u128, b: u128, denominator: u128, rounding: Rounding) -> CoreResult<u128> {
    let result = mul_div(U256::from(a), U256::from(b), U256::from(denominator), rounding)?;
    u256_to_u128(result)
}

/// Narrow a U256 to u128
pub fn u256_to_u128(value: U256) -> CoreResult<u128> {
    if value > U256::from(u128::MAX) {
        return Err(ClmmCoreError::MathOverflow);
    }
    Ok(value.as_u128())
}

/// Narrow a U256 to u64
pub fn u256_to_u64(value: U256) -> CoreResult<u64> {
    if value > U256::from(u64::MAX) {
        return Err(ClmmCoreError::MathOverflow);
    }
    Ok(value.as_u64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_rounding() {
        let a = U256::from(10u64);
        let b = U256::from(10u64);
        let d = U256::from(3u64);

        assert_eq!(mul_div(a, b, d, Rounding::Down).unwrap(), U256::from(33u64));
        assert_eq!(mul_div(a, b, d, Rounding::Up).unwrap(), U256::from(34u64));

        // Exact division does not round up
        let d = U256::from(4u64);
        assert_eq!(mul_div(a, b, d, Rounding::Up).unwrap(), U256::from(25u64));
    }

    #[test]
    fn test_mul_div_large_numbers() {
        let result = mul_div_u128(u128::MAX, u128::MAX, u128::MAX, Rounding::Down).unwrap();
        assert_eq!(result, u128::MAX);

        assert_eq!(
            mul_div_u128(u128::MAX, 2, 1, Rounding::Down),
            Err(ClmmCoreError::MathOverflow)
        );
    }

    #[test]
    fn test_mul_div_by_zero() {
        assert_eq!(
            mul_div(U256::ONE, U256::ONE, U256::ZERO, Rounding::Down),
            Err(ClmmCoreError::DivisionByZero)
        );
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(u256_to_u64(U256::from(u64::MAX)).unwrap(), u64::MAX);
        assert!(u256_to_u64(U256::from(u64::MAX) + U256::ONE).is_err());
    }
}
