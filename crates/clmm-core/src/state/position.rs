//! Personal position account (one per position NFT)

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::constants::REWARD_NUM;
use crate::errors::CoreResult;
use crate::state::layout::{position, PERSONAL_POSITION};

/// Reward checkpoint of a position for one reward slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PositionRewardInfo {
    pub growth_inside_last_x64: u128,
    pub reward_amount_owed: u64,
}

/// Decoded `PersonalPositionState`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PersonalPosition {
    pub bump: u8,
    pub nft_mint: Pubkey,
    pub pool_id: Pubkey,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    pub liquidity: u128,
    pub fee_growth_inside_0_last_x64: u128,
    pub fee_growth_inside_1_last_x64: u128,
    pub token_fees_owed_0: u64,
    pub token_fees_owed_1: u64,
    pub reward_infos: [PositionRewardInfo; REWARD_NUM],
    pub recent_epoch: u64,
}

impl PersonalPosition {
    pub const LEN: usize = PERSONAL_POSITION.len;

    /// Decode a raw account buffer
    pub fn decode(data: &[u8]) -> CoreResult<Self> {
        let reader = PERSONAL_POSITION.validate(data)?;

        let mut reward_infos = [PositionRewardInfo::default(); REWARD_NUM];
        for (i, info) in reward_infos.iter_mut().enumerate() {
            let base = position::REWARD_INFOS + i * position::REWARD_INFO_LEN;
            *info = PositionRewardInfo {
                growth_inside_last_x64: reader.u128(base)?,
                reward_amount_owed: reader.u64(base + 16)?,
            };
        }

        Ok(Self {
            bump: reader.u8(position::BUMP)?,
            nft_mint: reader.pubkey(position::NFT_MINT)?,
            pool_id: reader.pubkey(position::POOL_ID)?,
            tick_lower_index: reader.i32(position::TICK_LOWER_INDEX)?,
            tick_upper_index: reader.i32(position::TICK_UPPER_INDEX)?,
            liquidity: reader.u128(position::LIQUIDITY)?,
            fee_growth_inside_0_last_x64: reader.u128(position::FEE_GROWTH_INSIDE_0_LAST_X64)?,
            fee_growth_inside_1_last_x64: reader.u128(position::FEE_GROWTH_INSIDE_1_LAST_X64)?,
            token_fees_owed_0: reader.u64(position::TOKEN_FEES_OWED_0)?,
            token_fees_owed_1: reader.u64(position::TOKEN_FEES_OWED_1)?,
            reward_infos,
            recent_epoch: reader.u64(position::RECENT_EPOCH)?,
        })
    }
}
