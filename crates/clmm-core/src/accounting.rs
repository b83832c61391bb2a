//! # Fee and Reward Accounting
//!
//! Uncollected fees and rewards of a position, from the pool's global growth
//! accumulators, the boundary ticks' outside accumulators and the position's
//! checkpoints.
//!
//! An owed amount at or above [`U64_IGNORE_RANGE`] is the program's marker for
//! a value that cannot be computed (typically a wrapped negative growth
//! delta). Such amounts are reported as zero.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::{REWARD_NUM, U64_IGNORE_RANGE};
use crate::errors::{ClmmCoreError, CoreResult};
use crate::math::big_int::U256;
use crate::math::fee_math::{get_growth_delta_amount, get_growth_inside};
use crate::state::{PersonalPosition, PoolState, TickState};

/// Uncollected trading fees, raw units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TokenFees {
    pub token_fee_amount_a: u64,
    pub token_fee_amount_b: u64,
}

/// Uncollected trading fees of `position`
pub fn compute_position_fees(
    pool_state: &PoolState,
    position: &PersonalPosition,
    tick_lower_state: &TickState,
    tick_upper_state: &TickState,
) -> CoreResult<TokenFees> {
    check_boundary_ticks(position, tick_lower_state, tick_upper_state)?;

    let fee_growth_inside_0 = get_growth_inside(
        pool_state.tick_current,
        position.tick_lower_index,
        position.tick_upper_index,
        pool_state.fee_growth_global_0_x64,
        tick_lower_state.fee_growth_outside_0_x64,
        tick_upper_state.fee_growth_outside_0_x64,
    );
    let fee_growth_inside_1 = get_growth_inside(
        pool_state.tick_current,
        position.tick_lower_index,
        position.tick_upper_index,
        pool_state.fee_growth_global_1_x64,
        tick_lower_state.fee_growth_outside_1_x64,
        tick_upper_state.fee_growth_outside_1_x64,
    );

    let token_fee_amount_a = owed_amount(
        "fee A",
        position.token_fees_owed_0,
        get_growth_delta_amount(
            fee_growth_inside_0,
            position.fee_growth_inside_0_last_x64,
            position.liquidity,
        )?,
    );
    let token_fee_amount_b = owed_amount(
        "fee B",
        position.token_fees_owed_1,
        get_growth_delta_amount(
            fee_growth_inside_1,
            position.fee_growth_inside_1_last_x64,
            position.liquidity,
        )?,
    );

    Ok(TokenFees {
        token_fee_amount_a,
        token_fee_amount_b,
    })
}

/// Uncollected reward amounts of `position`, one per pool reward slot
pub fn compute_position_rewards(
    pool_state: &PoolState,
    position: &PersonalPosition,
    tick_lower_state: &TickState,
    tick_upper_state: &TickState,
) -> CoreResult<[u64; REWARD_NUM]> {
    check_boundary_ticks(position, tick_lower_state, tick_upper_state)?;

    let mut rewards = [0u64; REWARD_NUM];
    for (i, reward) in rewards.iter_mut().enumerate() {
        let growth_inside = get_growth_inside(
            pool_state.tick_current,
            position.tick_lower_index,
            position.tick_upper_index,
            pool_state.reward_infos[i].reward_growth_global_x64,
            tick_lower_state.reward_growths_outside_x64[i],
            tick_upper_state.reward_growths_outside_x64[i],
        );

        let checkpoint = &position.reward_infos[i];
        *reward = owed_amount(
            "reward",
            checkpoint.reward_amount_owed,
            get_growth_delta_amount(
                growth_inside,
                checkpoint.growth_inside_last_x64,
                position.liquidity,
            )?,
        );
    }

    Ok(rewards)
}

fn check_boundary_ticks(
    position: &PersonalPosition,
    tick_lower_state: &TickState,
    tick_upper_state: &TickState,
) -> CoreResult<()> {
    if position.tick_lower_index >= position.tick_upper_index {
        return Err(ClmmCoreError::InvalidTickRange {
            lower: position.tick_lower_index,
            upper: position.tick_upper_index,
        });
    }
    for (expected, state) in [
        (position.tick_lower_index, tick_lower_state),
        (position.tick_upper_index, tick_upper_state),
    ] {
        if state.tick != expected {
            return Err(ClmmCoreError::BoundaryTickMismatch {
                expected,
                actual: state.tick,
            });
        }
    }
    Ok(())
}

/// already_owed + delta, or zero when the total is in the ignore range
fn owed_amount(label: &str, already_owed: u64, delta: U256) -> u64 {
    let total = U256::from(already_owed).saturating_add(delta);
    if total >= U256::from(U64_IGNORE_RANGE) {
        log::warn!("{} amount {} is in the ignore range, reporting zero", label, total);
        return 0;
    }
    total.as_u64()
}
