//! Fixtures shared by unit tests

use solana_program::pubkey::Pubkey;

use crate::constants::{CLMM_PROGRAM_ID, REWARD_NUM};
use crate::math::tick_math::get_sqrt_price_at_tick;
use crate::state::{
    PersonalPosition, PoolInfo, PoolState, PositionRewardInfo, RewardInfo, TickState, TokenInfo,
};

pub const LIQUIDITY: u128 = 1_000_000_000_000;

pub fn token(symbol: &str, decimals: u8) -> TokenInfo {
    TokenInfo {
        address: Pubkey::new_unique(),
        decimals,
        symbol: symbol.to_string(),
        name: format!("{} Token", symbol),
        transfer_fee_config: None,
    }
}

pub fn pool_info(decimals_a: u8, decimals_b: u8, tick_spacing: u16) -> PoolInfo {
    PoolInfo {
        id: Pubkey::new_unique(),
        program_id: CLMM_PROGRAM_ID,
        tick_spacing,
        mint_a: token("AAA", decimals_a),
        mint_b: token("BBB", decimals_b),
        reward_mints: vec![],
    }
}

pub fn pool_state(tick_current: i32, tick_spacing: u16) -> PoolState {
    PoolState {
        bump: 255,
        amm_config: Pubkey::default(),
        owner: Pubkey::default(),
        token_mint_0: Pubkey::default(),
        token_mint_1: Pubkey::default(),
        token_vault_0: Pubkey::default(),
        token_vault_1: Pubkey::default(),
        observation_key: Pubkey::default(),
        mint_decimals_0: 6,
        mint_decimals_1: 6,
        tick_spacing,
        liquidity: LIQUIDITY,
        sqrt_price_x64: get_sqrt_price_at_tick(tick_current).unwrap(),
        tick_current,
        fee_growth_global_0_x64: 0,
        fee_growth_global_1_x64: 0,
        protocol_fees_token_0: 0,
        protocol_fees_token_1: 0,
        status: 0,
        reward_infos: [RewardInfo::default(); REWARD_NUM],
        open_time: 0,
        recent_epoch: 0,
    }
}

pub fn position(tick_lower: i32, tick_upper: i32) -> PersonalPosition {
    PersonalPosition {
        bump: 255,
        nft_mint: Pubkey::new_unique(),
        pool_id: Pubkey::new_unique(),
        tick_lower_index: tick_lower,
        tick_upper_index: tick_upper,
        liquidity: LIQUIDITY,
        fee_growth_inside_0_last_x64: 0,
        fee_growth_inside_1_last_x64: 0,
        token_fees_owed_0: 0,
        token_fees_owed_1: 0,
        reward_infos: [PositionRewardInfo::default(); REWARD_NUM],
        recent_epoch: 0,
    }
}

pub fn tick(index: i32) -> TickState {
    TickState {
        tick: index,
        liquidity_gross: LIQUIDITY,
        ..Default::default()
    }
}
