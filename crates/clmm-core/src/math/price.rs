//! # Price Conversions
//!
//! Human prices (token B per token A, decimal adjusted) against Q64.64 sqrt
//! prices and ticks. Decimal arithmetic is checked throughout.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use rust_decimal::prelude::*;

use crate::constants::{MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK, Q64};
use crate::errors::{ClmmCoreError, CoreResult};
use crate::math::big_int::U256;
use crate::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price, snap_to_spacing};
use crate::state::PoolInfo;

/// Tick snapped to the pool's spacing and the exact price at that tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PriceAndTick {
    pub tick: i32,
    pub price: Decimal,
}

/// Largest mantissa and scale a Decimal can carry
const DECIMAL_MAX_MANTISSA: u128 = (1u128 << 96) - 1;
const DECIMAL_MAX_SCALE: u32 = 28;

/// Powers of ten above this do not fit in a U256
const U256_MAX_POW10: u32 = 77;

fn two_pow_64() -> Decimal {
    Decimal::from(u64::MAX) + Decimal::ONE
}

/// 10^exp as a Decimal, exp may be negative
fn pow10(exp: i32) -> CoreResult<Decimal> {
    if exp.unsigned_abs() > 28 {
        return Err(ClmmCoreError::InvalidDecimals(exp.unsigned_abs().min(255) as u8));
    }
    let scale = Decimal::from_i128_with_scale(10i128.pow(exp.unsigned_abs()), 0);
    if exp >= 0 {
        Ok(scale)
    } else {
        Decimal::ONE
            .checked_div(scale)
            .ok_or(ClmmCoreError::MathOverflow)
    }
}

/// floor(value * 10^exp / 2^128); `None` when the product leaves U256
fn scaled_q128(value: U256, exp: i32) -> Option<U256> {
    let pow = exp.unsigned_abs();
    if exp >= 0 {
        if pow > U256_MAX_POW10 {
            return None;
        }
        value
            .checked_mul(U256::from(10u8).pow(pow))
            .map(|product| product >> 128)
    } else if pow > U256_MAX_POW10 {
        Some(U256::ZERO)
    } else {
        Some((value / U256::from(10u8).pow(pow)) >> 128)
    }
}

/// Human price from a Q64.64 sqrt price.
///
/// Computed exactly from sqrt_price^2 / 2^128 and floored to the finest
/// scale the Decimal mantissa can hold. Prices outside Decimal's range are
/// errors, never zero: use [`sqrt_price_x64_to_ui_price`] for display.
pub fn sqrt_price_x64_to_price(
    sqrt_price_x64: u128,
    decimals_a: u8,
    decimals_b: u8,
) -> CoreResult<Decimal> {
    let squared = U256::from(sqrt_price_x64) * U256::from(sqrt_price_x64);
    let shift = i32::from(decimals_a) - i32::from(decimals_b);

    for scale in (0..=DECIMAL_MAX_SCALE).rev() {
        let Some(mantissa) = scaled_q128(squared, shift + scale as i32) else {
            continue;
        };
        if mantissa > U256::from(DECIMAL_MAX_MANTISSA) {
            continue;
        }
        if mantissa == U256::ZERO {
            return Err(ClmmCoreError::PriceOutOfRange(sqrt_price_x64));
        }
        return Ok(Decimal::from_i128_with_scale(mantissa.as_i128(), scale).normalize());
    }

    Err(ClmmCoreError::PriceOutOfRange(sqrt_price_x64))
}

/// Display price from a Q64.64 sqrt price, defined for every valid sqrt
/// price and any pair of mint decimals
pub fn sqrt_price_x64_to_ui_price(sqrt_price_x64: u128, decimals_a: u8, decimals_b: u8) -> f64 {
    let sqrt_price = sqrt_price_x64 as f64 / Q64 as f64;
    sqrt_price * sqrt_price * 10f64.powi(i32::from(decimals_a) - i32::from(decimals_b))
}

/// Display price at `tick`; `base_in = false` quotes token A per token B
pub fn tick_to_ui_price(tick: i32, pool_info: &PoolInfo, base_in: bool) -> CoreResult<f64> {
    let price = sqrt_price_x64_to_ui_price(
        get_sqrt_price_at_tick(tick)?,
        pool_info.mint_a.decimals,
        pool_info.mint_b.decimals,
    );
    Ok(if base_in { price } else { price.recip() })
}

/// Q64.64 sqrt price from a human price, floored
pub fn price_to_sqrt_price_x64(price: Decimal, decimals_a: u8, decimals_b: u8) -> CoreResult<u128> {
    if price <= Decimal::ZERO {
        return Err(ClmmCoreError::InvalidPrice(price.to_string()));
    }

    let raw_price = price
        .checked_mul(pow10(i32::from(decimals_b) - i32::from(decimals_a))?)
        .ok_or(ClmmCoreError::MathOverflow)?;
    let sqrt_price = raw_price
        .sqrt()
        .ok_or_else(|| ClmmCoreError::InvalidPrice(price.to_string()))?;

    sqrt_price
        .checked_mul(two_pow_64())
        .and_then(|scaled| scaled.floor().to_u128())
        .ok_or(ClmmCoreError::MathOverflow)
}

/// Price at `tick`; `base_in = false` quotes token A per token B
pub fn tick_to_price(tick: i32, pool_info: &PoolInfo, base_in: bool) -> CoreResult<Decimal> {
    let sqrt_price_x64 = get_sqrt_price_at_tick(tick)?;
    let price = sqrt_price_x64_to_price(
        sqrt_price_x64,
        pool_info.mint_a.decimals,
        pool_info.mint_b.decimals,
    )?;

    if base_in {
        Ok(price)
    } else {
        Decimal::ONE
            .checked_div(price)
            .ok_or(ClmmCoreError::DivisionByZero)
    }
}

/// Nearest usable tick for `price`, clamped to the valid range
pub fn price_to_tick(price: Decimal, pool_info: &PoolInfo, base_in: bool) -> CoreResult<PriceAndTick> {
    let price = if base_in {
        price
    } else {
        if price <= Decimal::ZERO {
            return Err(ClmmCoreError::InvalidPrice(price.to_string()));
        }
        Decimal::ONE
            .checked_div(price)
            .ok_or(ClmmCoreError::DivisionByZero)?
    };

    // Prices beyond the representable range land on the bounds
    let sqrt_price_x64 = match price_to_sqrt_price_x64(
        price,
        pool_info.mint_a.decimals,
        pool_info.mint_b.decimals,
    ) {
        Ok(value) => value,
        Err(ClmmCoreError::MathOverflow) => MAX_SQRT_PRICE_X64,
        Err(err) => return Err(err),
    };

    let raw_tick = if sqrt_price_x64 < MIN_SQRT_PRICE_X64 {
        log::debug!("price {} below range, clamping to min tick", price);
        MIN_TICK
    } else if sqrt_price_x64 >= MAX_SQRT_PRICE_X64 {
        log::debug!("price {} above range, clamping to max tick", price);
        MAX_TICK
    } else {
        get_tick_at_sqrt_price(sqrt_price_x64)?
    };

    let tick = snap_to_spacing(raw_tick, pool_info.tick_spacing)?;
    let price = tick_to_price(tick, pool_info, base_in)?;

    Ok(PriceAndTick { tick, price })
}
