//! Position loading: resolves every account a valuation needs, then hands
//! the decoded state to the core summary

use clmm_core::{
    personal_position_address, summarize_position, tick_array_address, PersonalPosition,
    PoolInfo, PoolState, PositionInputs, PositionSummary, TickArrayState, TickState, TokenInfo,
};
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};
use crate::source::AccountSource;
use crate::tokens::token_info;

/// Decoded state behind one position, ready for valuation
#[derive(Debug, Clone)]
pub struct LoadedPosition {
    pub pool_info: PoolInfo,
    pub pool_state: PoolState,
    pub position: PersonalPosition,
    pub tick_lower_state: TickState,
    pub tick_upper_state: TickState,
    pub epoch: u64,
}

impl LoadedPosition {
    pub fn inputs(&self) -> PositionInputs<'_> {
        PositionInputs {
            pool_info: &self.pool_info,
            pool_state: &self.pool_state,
            position: &self.position,
            tick_lower_state: &self.tick_lower_state,
            tick_upper_state: &self.tick_upper_state,
            epoch: self.epoch,
        }
    }
}

/// Reads positions through an [`AccountSource`]
pub struct PositionReader<S: AccountSource> {
    source: S,
    config: ViewerConfig,
}

impl<S: AccountSource> PositionReader<S> {
    pub fn new(source: S, config: ViewerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Load and decode everything behind the position owned by `nft_mint`
    pub async fn load_position(&self, nft_mint: &Pubkey) -> ViewerResult<LoadedPosition> {
        let program_id = self.config.program_id;

        let (position_address, _) = personal_position_address(&program_id, nft_mint);
        log::debug!("position {} for nft {}", position_address, nft_mint);
        let position_account = self
            .source
            .get_account(&position_address)
            .await?
            .ok_or_else(|| ViewerError::not_found("position", position_address))?;
        let position = PersonalPosition::decode(&position_account.data)?;

        let pool_account = self
            .source
            .get_account(&position.pool_id)
            .await?
            .ok_or_else(|| ViewerError::not_found("pool", position.pool_id))?;
        let pool_state = PoolState::decode(&pool_account.data)?;
        let tick_spacing = pool_state.tick_spacing;

        let (lower_address, _) = tick_array_address(
            &program_id,
            &position.pool_id,
            position.tick_lower_index,
            tick_spacing,
        )?;
        let (upper_address, _) = tick_array_address(
            &program_id,
            &position.pool_id,
            position.tick_upper_index,
            tick_spacing,
        )?;

        let reward_mints = pool_state.reward_mints();
        let mut mint_addresses = vec![pool_state.token_mint_0, pool_state.token_mint_1];
        mint_addresses.extend(reward_mints.iter().copied());

        let tick_array_addresses = [lower_address, upper_address];
        let (tick_array_accounts, epoch, mint_accounts) = tokio::try_join!(
            self.source.get_multiple_accounts(&tick_array_addresses),
            self.source.get_epoch(),
            self.source.get_multiple_accounts(&mint_addresses),
        )?;

        let lower_array = decode_tick_array(lower_address, tick_array_accounts.first())?;
        let upper_array = decode_tick_array(upper_address, tick_array_accounts.get(1))?;
        for array in [&lower_array, &upper_array] {
            if array.pool_id != position.pool_id {
                return Err(ViewerError::PoolMismatch {
                    expected: position.pool_id,
                    actual: array.pool_id,
                });
            }
        }

        let tick_lower_state = lower_array
            .tick_state(position.tick_lower_index, tick_spacing)?
            .clone();
        let tick_upper_state = upper_array
            .tick_state(position.tick_upper_index, tick_spacing)?
            .clone();

        let mut tokens = mint_addresses
            .iter()
            .enumerate()
            .map(|(i, address)| {
                let account = mint_accounts
                    .get(i)
                    .and_then(Option::as_ref)
                    .ok_or_else(|| ViewerError::not_found("mint", *address))?;
                token_info(*address, account, &self.config)
            })
            .collect::<ViewerResult<Vec<TokenInfo>>>()?
            .into_iter();

        let (Some(mint_a), Some(mint_b)) = (tokens.next(), tokens.next()) else {
            return Err(ViewerError::not_found("mint", pool_state.token_mint_0));
        };

        let pool_info = PoolInfo {
            id: position.pool_id,
            program_id,
            tick_spacing,
            mint_a,
            mint_b,
            reward_mints: tokens.collect(),
        };

        log::debug!(
            "loaded position {} in pool {} at epoch {}",
            position_address,
            pool_info.id,
            epoch
        );

        Ok(LoadedPosition {
            pool_info,
            pool_state,
            position,
            tick_lower_state,
            tick_upper_state,
            epoch,
        })
    }

    /// Load and value the position owned by `nft_mint`
    pub async fn read_position(&self, nft_mint: &Pubkey) -> ViewerResult<PositionSummary> {
        let loaded = self.load_position(nft_mint).await?;
        Ok(summarize_position(loaded.inputs())?)
    }
}

fn decode_tick_array(address: Pubkey, account: Option<&Option<Account>>) -> ViewerResult<TickArrayState> {
    let account = account
        .and_then(Option::as_ref)
        .ok_or_else(|| ViewerError::not_found("tick array", address))?;
    Ok(TickArrayState::decode(&account.data)?)
}
