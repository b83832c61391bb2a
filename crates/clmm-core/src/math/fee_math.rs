//! # Fee Math
//!
//! Growth accumulator arithmetic shared by fee and reward accounting. Growth
//! values are Q64.64 per unit of liquidity and wrap modulo 2^128.

use crate::constants::Q64;
use crate::errors::CoreResult;
use crate::math::big_int::{mul_div, Rounding, U256};

/// Growth accumulated strictly inside `[tick_lower, tick_upper)`
///
/// `outside_lower` / `outside_upper` are the boundary ticks' "outside"
/// accumulators, interpreted relative to `tick_current`.
pub fn get_growth_inside(
    tick_current: i32,
    tick_lower: i32,
    tick_upper: i32,
    growth_global: u128,
    outside_lower: u128,
    outside_upper: u128,
) -> u128 {
    let growth_below = if tick_current >= tick_lower {
        outside_lower
    } else {
        growth_global.wrapping_sub(outside_lower)
    };

    let growth_above = if tick_current < tick_upper {
        outside_upper
    } else {
        growth_global.wrapping_sub(outside_upper)
    };

    growth_global
        .wrapping_sub(growth_below)
        .wrapping_sub(growth_above)
}

/// Amount earned by `liquidity` since the `growth_inside_last` checkpoint,
/// floor((inside - last) * liquidity / 2^64), computed in 256 bits
pub fn get_growth_delta_amount(
    growth_inside: u128,
    growth_inside_last: u128,
    liquidity: u128,
) -> CoreResult<U256> {
    mul_div(
        U256::from(growth_inside.wrapping_sub(growth_inside_last)),
        U256::from(liquidity),
        U256::from(Q64),
        Rounding::Down,
    )
}
