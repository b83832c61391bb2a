//! Pool account and the pool/token descriptors built around it

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::constants::REWARD_NUM;
use crate::errors::{ClmmCoreError, CoreResult};
use crate::math::transfer_fee::TransferFeeConfig;
use crate::state::layout::{pool, LayoutReader, POOL};

/// One reward emission slot of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct RewardInfo {
    pub reward_state: u8,
    pub open_time: u64,
    pub end_time: u64,
    pub last_update_time: u64,
    pub emissions_per_second_x64: u128,
    pub reward_total_emissioned: u64,
    pub reward_claimed: u64,
    pub token_mint: Pubkey,
    pub token_vault: Pubkey,
    pub authority: Pubkey,
    pub reward_growth_global_x64: u128,
}

impl RewardInfo {
    /// A slot is in use once a reward mint has been assigned
    pub fn initialized(&self) -> bool {
        self.token_mint != Pubkey::default()
    }

    fn read(reader: &LayoutReader<'_>, base: usize) -> CoreResult<Self> {
        use pool::reward;

        Ok(Self {
            reward_state: reader.u8(base + reward::REWARD_STATE)?,
            open_time: reader.u64(base + reward::OPEN_TIME)?,
            end_time: reader.u64(base + reward::END_TIME)?,
            last_update_time: reader.u64(base + reward::LAST_UPDATE_TIME)?,
            emissions_per_second_x64: reader.u128(base + reward::EMISSIONS_PER_SECOND_X64)?,
            reward_total_emissioned: reader.u64(base + reward::REWARD_TOTAL_EMISSIONED)?,
            reward_claimed: reader.u64(base + reward::REWARD_CLAIMED)?,
            token_mint: reader.pubkey(base + reward::TOKEN_MINT)?,
            token_vault: reader.pubkey(base + reward::TOKEN_VAULT)?,
            authority: reader.pubkey(base + reward::AUTHORITY)?,
            reward_growth_global_x64: reader.u128(base + reward::REWARD_GROWTH_GLOBAL_X64)?,
        })
    }
}

/// Decoded `PoolState`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PoolState {
    pub bump: u8,
    pub amm_config: Pubkey,
    pub owner: Pubkey,
    pub token_mint_0: Pubkey,
    pub token_mint_1: Pubkey,
    pub token_vault_0: Pubkey,
    pub token_vault_1: Pubkey,
    pub observation_key: Pubkey,
    pub mint_decimals_0: u8,
    pub mint_decimals_1: u8,
    pub tick_spacing: u16,
    pub liquidity: u128,
    pub sqrt_price_x64: u128,
    pub tick_current: i32,
    pub fee_growth_global_0_x64: u128,
    pub fee_growth_global_1_x64: u128,
    pub protocol_fees_token_0: u64,
    pub protocol_fees_token_1: u64,
    pub status: u8,
    pub reward_infos: [RewardInfo; REWARD_NUM],
    pub open_time: u64,
    pub recent_epoch: u64,
}

impl PoolState {
    pub const LEN: usize = POOL.len;

    /// Decode a raw account buffer
    pub fn decode(data: &[u8]) -> CoreResult<Self> {
        let reader = POOL.validate(data)?;

        let mut reward_infos = [RewardInfo::default(); REWARD_NUM];
        for (i, info) in reward_infos.iter_mut().enumerate() {
            *info = RewardInfo::read(&reader, pool::REWARD_INFOS + i * pool::REWARD_INFO_LEN)?;
        }

        let state = Self {
            bump: reader.u8(pool::BUMP)?,
            amm_config: reader.pubkey(pool::AMM_CONFIG)?,
            owner: reader.pubkey(pool::OWNER)?,
            token_mint_0: reader.pubkey(pool::TOKEN_MINT_0)?,
            token_mint_1: reader.pubkey(pool::TOKEN_MINT_1)?,
            token_vault_0: reader.pubkey(pool::TOKEN_VAULT_0)?,
            token_vault_1: reader.pubkey(pool::TOKEN_VAULT_1)?,
            observation_key: reader.pubkey(pool::OBSERVATION_KEY)?,
            mint_decimals_0: reader.u8(pool::MINT_DECIMALS_0)?,
            mint_decimals_1: reader.u8(pool::MINT_DECIMALS_1)?,
            tick_spacing: reader.u16(pool::TICK_SPACING)?,
            liquidity: reader.u128(pool::LIQUIDITY)?,
            sqrt_price_x64: reader.u128(pool::SQRT_PRICE_X64)?,
            tick_current: reader.i32(pool::TICK_CURRENT)?,
            fee_growth_global_0_x64: reader.u128(pool::FEE_GROWTH_GLOBAL_0_X64)?,
            fee_growth_global_1_x64: reader.u128(pool::FEE_GROWTH_GLOBAL_1_X64)?,
            protocol_fees_token_0: reader.u64(pool::PROTOCOL_FEES_TOKEN_0)?,
            protocol_fees_token_1: reader.u64(pool::PROTOCOL_FEES_TOKEN_1)?,
            status: reader.u8(pool::STATUS)?,
            reward_infos,
            open_time: reader.u64(pool::OPEN_TIME)?,
            recent_epoch: reader.u64(pool::RECENT_EPOCH)?,
        };

        if state.tick_spacing == 0 {
            return Err(ClmmCoreError::InvalidTickSpacing(0));
        }
        Ok(state)
    }

    /// Mints of reward slots that are in use, in slot order
    pub fn reward_mints(&self) -> Vec<Pubkey> {
        self.reward_infos
            .iter()
            .filter(|info| info.initialized())
            .map(|info| info.token_mint)
            .collect()
    }
}

/// Mint descriptor: on-chain decimals plus display metadata
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TokenInfo {
    pub address: Pubkey,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
    /// Token-2022 transfer fee extension, if the mint carries one
    pub transfer_fee_config: Option<TransferFeeConfig>,
}

impl TokenInfo {
    /// Descriptor with no metadata beyond decimals; symbol and name fall
    /// back to the address
    pub fn unlabeled(address: Pubkey, decimals: u8) -> Self {
        let label = address.to_string();
        Self {
            address,
            decimals,
            symbol: label.clone(),
            name: label,
            transfer_fee_config: None,
        }
    }
}

/// Pool descriptor resolved by the caller from the pool account and mint
/// metadata
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PoolInfo {
    pub id: Pubkey,
    pub program_id: Pubkey,
    pub tick_spacing: u16,
    pub mint_a: TokenInfo,
    pub mint_b: TokenInfo,
    /// Reward mints configured on the pool
    pub reward_mints: Vec<TokenInfo>,
}

impl PoolInfo {
    /// Look up a configured reward mint
    pub fn reward_mint(&self, mint: &Pubkey) -> Option<&TokenInfo> {
        self.reward_mints.iter().find(|token| token.address == *mint)
    }
}
