//! # Liquidity Math
//!
//! Token amounts backing a position's liquidity at the pool's current price,
//! with Token-2022 transfer fees and optional slippage bounds.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use rust_decimal::prelude::*;

use crate::constants::Q64;
use crate::errors::{ClmmCoreError, CoreResult};
use crate::math::big_int::{mul_div, u256_to_u64, Rounding, U256};
use crate::math::tick_math::get_sqrt_price_at_tick;
use crate::math::transfer_fee::{transfer_amount_with_fee, TransferAmount};
use crate::state::{PersonalPosition, PoolInfo, PoolState};

/// Calculate the token A amount for liquidity between two sqrt prices
///
/// amount_a = L * (sqrt_b - sqrt_a) / (sqrt_a * sqrt_b), with L shifted to Q64
pub fn get_amount_a_from_liquidity(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> CoreResult<u64> {
    if sqrt_price_a_x64 > sqrt_price_b_x64 {
        return get_amount_a_from_liquidity(sqrt_price_b_x64, sqrt_price_a_x64, liquidity, round_up);
    }
    if sqrt_price_a_x64 == 0 {
        return Err(ClmmCoreError::DivisionByZero);
    }

    let numerator_1 = U256::from(liquidity) << 64;
    let numerator_2 = U256::from(sqrt_price_b_x64 - sqrt_price_a_x64);
    let rounding = Rounding::from_round_up(round_up);

    // Two divisions, each rounded the same way as the program
    let scaled = mul_div(numerator_1, numerator_2, U256::from(sqrt_price_b_x64), rounding)?;
    let amount = mul_div(scaled, U256::ONE, U256::from(sqrt_price_a_x64), rounding)?;

    u256_to_u64(amount)
}

/// Calculate the token B amount for liquidity between two sqrt prices
///
/// amount_b = L * (sqrt_b - sqrt_a) / 2^64
pub fn get_amount_b_from_liquidity(
    sqrt_price_a_x64: u128,
    sqrt_price_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> CoreResult<u64> {
    if sqrt_price_a_x64 > sqrt_price_b_x64 {
        return get_amount_b_from_liquidity(sqrt_price_b_x64, sqrt_price_a_x64, liquidity, round_up);
    }

    let amount = mul_div(
        U256::from(liquidity),
        U256::from(sqrt_price_b_x64 - sqrt_price_a_x64),
        U256::from(Q64),
        Rounding::from_round_up(round_up),
    )?;

    u256_to_u64(amount)
}

/// Amounts backing a position, each after transfer fees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct LiquidityAmounts {
    pub liquidity: u128,
    pub amount_a: TransferAmount,
    pub amount_b: TransferAmount,
    /// `amount_a` widened or narrowed by the slippage fraction
    pub amount_slippage_a: TransferAmount,
    pub amount_slippage_b: TransferAmount,
}

/// Token amounts for `liquidity` over the position's range at the pool's
/// current price.
///
/// The region is decided by the pool's current tick: below the range the
/// position holds only token A, at or above the upper tick only token B.
/// `add` rounds up and grosses up transfer fees (deposits); otherwise amounts
/// round down and fees are deducted (withdrawals and valuation).
pub fn amounts_from_liquidity(
    pool_info: &PoolInfo,
    pool_state: &PoolState,
    position: &PersonalPosition,
    liquidity: u128,
    slippage: Decimal,
    add: bool,
    epoch: u64,
) -> CoreResult<LiquidityAmounts> {
    let tick_lower = position.tick_lower_index;
    let tick_upper = position.tick_upper_index;
    if tick_lower >= tick_upper {
        return Err(ClmmCoreError::InvalidTickRange {
            lower: tick_lower,
            upper: tick_upper,
        });
    }
    if slippage < Decimal::ZERO || slippage > Decimal::ONE {
        return Err(ClmmCoreError::InvalidSlippage(slippage.to_string()));
    }

    let sqrt_price_lower_x64 = get_sqrt_price_at_tick(tick_lower)?;
    let sqrt_price_upper_x64 = get_sqrt_price_at_tick(tick_upper)?;

    let (amount_a, amount_b) = if liquidity == 0 {
        (0, 0)
    } else if pool_state.tick_current < tick_lower {
        (
            get_amount_a_from_liquidity(sqrt_price_lower_x64, sqrt_price_upper_x64, liquidity, add)?,
            0,
        )
    } else if pool_state.tick_current >= tick_upper {
        (
            0,
            get_amount_b_from_liquidity(sqrt_price_lower_x64, sqrt_price_upper_x64, liquidity, add)?,
        )
    } else {
        let sqrt_price_current_x64 = pool_state.sqrt_price_x64;
        (
            get_amount_a_from_liquidity(sqrt_price_current_x64, sqrt_price_upper_x64, liquidity, add)?,
            get_amount_b_from_liquidity(sqrt_price_lower_x64, sqrt_price_current_x64, liquidity, add)?,
        )
    };

    let factor = if add {
        Decimal::ONE + slippage
    } else {
        Decimal::ONE - slippage
    };
    let slippage_a = apply_slippage(amount_a, factor)?;
    let slippage_b = apply_slippage(amount_b, factor)?;

    let fee_a = pool_info.mint_a.transfer_fee_config.as_ref();
    let fee_b = pool_info.mint_b.transfer_fee_config.as_ref();

    Ok(LiquidityAmounts {
        liquidity,
        amount_a: transfer_amount_with_fee(amount_a, fee_a, epoch, add)?,
        amount_b: transfer_amount_with_fee(amount_b, fee_b, epoch, add)?,
        amount_slippage_a: transfer_amount_with_fee(slippage_a, fee_a, epoch, add)?,
        amount_slippage_b: transfer_amount_with_fee(slippage_b, fee_b, epoch, add)?,
    })
}

/// amount * factor, rounded half away from zero
fn apply_slippage(amount: u64, factor: Decimal) -> CoreResult<u64> {
    Decimal::from(amount)
        .checked_mul(factor)
        .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|value| value.to_u64())
        .ok_or(ClmmCoreError::MathOverflow)
}
