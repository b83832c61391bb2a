//! # Position Summary
//!
//! Turns raw per-token amounts into the display structure: rewards and fees
//! merged per mint, scaled by mint decimals, with display symbols
//! normalized.

use ahash::AHashMap;
use rust_decimal::Decimal;
#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::accounting::{compute_position_fees, compute_position_rewards};
use crate::constants::{NATIVE_SYMBOL, WRAPPED_NATIVE_SYMBOL};
use crate::errors::{ClmmCoreError, CoreResult};
use crate::math::liquidity_math::amounts_from_liquidity;
use crate::math::price::{sqrt_price_x64_to_ui_price, tick_to_ui_price};
use crate::state::{PersonalPosition, PoolInfo, PoolState, TickState, TokenInfo};

/// Claimable amount of one mint, in human units
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardEntry {
    pub mint: TokenInfo,
    pub address: Pubkey,
    pub amount: Decimal,
}

/// Claimable amounts keyed by mint, in first-credit order
#[derive(Debug, Default)]
pub struct RewardLedger {
    index: AHashMap<Pubkey, usize>,
    entries: Vec<RewardEntry>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the entry for `token`, creating it if needed
    pub fn credit(&mut self, token: &TokenInfo, amount: Decimal) -> CoreResult<()> {
        match self.index.get(&token.address) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.amount = entry
                    .amount
                    .checked_add(amount)
                    .ok_or(ClmmCoreError::MathOverflow)?;
            }
            None => {
                self.index.insert(token.address, self.entries.len());
                self.entries.push(RewardEntry {
                    mint: token.clone(),
                    address: token.address,
                    amount,
                });
            }
        }
        Ok(())
    }

    /// Credit a raw amount, scaled by the token's decimals
    pub fn credit_raw(&mut self, token: &TokenInfo, raw_amount: u64) -> CoreResult<()> {
        self.credit(token, to_ui_amount(raw_amount, token.decimals)?)
    }

    pub fn entries(&self) -> &[RewardEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RewardEntry> {
        self.entries
    }
}

/// raw * 10^-decimals, exact
pub fn to_ui_amount(raw_amount: u64, decimals: u8) -> CoreResult<Decimal> {
    Decimal::try_from_i128_with_scale(i128::from(raw_amount), u32::from(decimals))
        .map(|amount| amount.normalize())
        .map_err(|_| ClmmCoreError::InvalidDecimals(decimals))
}

/// Symbol shown to users: wrapped SOL is shown as SOL
pub fn display_symbol(symbol: &str) -> &str {
    if symbol.eq_ignore_ascii_case(WRAPPED_NATIVE_SYMBOL) {
        NATIVE_SYMBOL
    } else {
        symbol
    }
}

/// Everything needed to value one position
#[derive(Debug, Clone, Copy)]
pub struct PositionInputs<'a> {
    pub pool_info: &'a PoolInfo,
    pub pool_state: &'a PoolState,
    pub position: &'a PersonalPosition,
    pub tick_lower_state: &'a TickState,
    pub tick_upper_state: &'a TickState,
    /// Current epoch, selects the transfer fee schedule
    pub epoch: u64,
}

/// One line of the claimable list
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct RewardLine {
    /// Display symbol
    pub mint: String,
    pub address: String,
    pub amount: Decimal,
}

/// Human-readable view of a position.
///
/// Prices are display values. Full-range positions span 1e-38 to 1e38 before
/// decimal adjustment, beyond what a Decimal holds, so they are kept as `f64`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct PositionSummary {
    pub pool: String,
    pub nft: String,
    pub price_lower: f64,
    pub price_upper: f64,
    pub current_price: f64,
    pub pooled_amount_a: Decimal,
    pub pooled_amount_b: Decimal,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub current_tick: i32,
    pub reward_infos: Vec<RewardLine>,
}

/// Value a position: holdings, price range and everything claimable
pub fn summarize_position(inputs: PositionInputs<'_>) -> CoreResult<PositionSummary> {
    let PositionInputs {
        pool_info,
        pool_state,
        position,
        tick_lower_state,
        tick_upper_state,
        epoch,
    } = inputs;

    let price_lower = tick_to_ui_price(position.tick_lower_index, pool_info, true)?;
    let price_upper = tick_to_ui_price(position.tick_upper_index, pool_info, true)?;
    let current_price = sqrt_price_x64_to_ui_price(
        pool_state.sqrt_price_x64,
        pool_info.mint_a.decimals,
        pool_info.mint_b.decimals,
    );

    let amounts = amounts_from_liquidity(
        pool_info,
        pool_state,
        position,
        position.liquidity,
        Decimal::ZERO,
        false,
        epoch,
    )?;

    let fees = compute_position_fees(pool_state, position, tick_lower_state, tick_upper_state)?;
    let rewards = compute_position_rewards(pool_state, position, tick_lower_state, tick_upper_state)?;

    let mut ledger = RewardLedger::new();
    for (slot, amount) in rewards.iter().enumerate() {
        if *amount == 0 {
            continue;
        }
        let reward_mint = &pool_state.reward_infos[slot].token_mint;
        match pool_info.reward_mint(reward_mint) {
            Some(token) => ledger.credit_raw(token, *amount)?,
            None => log::debug!(
                "reward slot {} mint {} not configured on pool, skipping",
                slot,
                reward_mint
            ),
        }
    }
    ledger.credit_raw(&pool_info.mint_a, fees.token_fee_amount_a)?;
    ledger.credit_raw(&pool_info.mint_b, fees.token_fee_amount_b)?;

    let reward_infos = ledger
        .into_entries()
        .into_iter()
        .map(|entry| RewardLine {
            mint: display_symbol(&entry.mint.symbol).to_string(),
            address: entry.address.to_string(),
            amount: entry.amount,
        })
        .collect();

    Ok(PositionSummary {
        pool: format!("{} - {}", pool_info.mint_a.name, pool_info.mint_b.name),
        nft: position.nft_mint.to_string(),
        price_lower,
        price_upper,
        current_price,
        pooled_amount_a: to_ui_amount(amounts.amount_a.amount, pool_info.mint_a.decimals)?,
        pooled_amount_b: to_ui_amount(amounts.amount_b.amount, pool_info.mint_b.decimals)?,
        tick_lower: position.tick_lower_index,
        tick_upper: position.tick_upper_index,
        current_tick: pool_state.tick_current,
        reward_infos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Q64;
    use crate::test_utils::{pool_info, pool_state, position, tick, token, LIQUIDITY};

    #[test]
    fn test_ledger_merges_by_mint() {
        let mint_a = token("AAA", 0);
        let mint_b = token("BBB", 0);

        let mut ledger = RewardLedger::new();
        ledger.credit(&mint_a, Decimal::from(5)).unwrap();
        ledger.credit(&mint_a, Decimal::from(3)).unwrap();
        ledger.credit(&mint_b, Decimal::from(3)).unwrap();

        let entries = ledger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].address, mint_a.address);
        assert_eq!(entries[0].amount, Decimal::from(8));
        assert_eq!(entries[1].address, mint_b.address);
        assert_eq!(entries[1].amount, Decimal::from(3));
    }

    #[test]
    fn test_default_ledger_is_empty() {
        let mut ledger = RewardLedger::default();
        assert!(ledger.entries().is_empty());

        ledger.credit_raw(&token("CCC", 2), 250).unwrap();
        assert_eq!(ledger.into_entries()[0].amount, Decimal::new(25, 1));
    }

    #[test]
    fn test_to_ui_amount() {
        assert_eq!(to_ui_amount(1_500_000, 6).unwrap(), Decimal::new(15, 1));
        assert_eq!(to_ui_amount(1_500_000, 6).unwrap().to_string(), "1.5");
        assert_eq!(to_ui_amount(42, 0).unwrap(), Decimal::from(42));
        assert_eq!(to_ui_amount(0, 9).unwrap().to_string(), "0");
        assert_eq!(to_ui_amount(1, 29), Err(ClmmCoreError::InvalidDecimals(29)));
    }

    #[test]
    fn test_display_symbol() {
        assert_eq!(display_symbol("WSOL"), "SOL");
        assert_eq!(display_symbol("wsol"), "SOL");
        assert_eq!(display_symbol("USDC"), "USDC");
        assert_eq!(display_symbol("WSOLX"), "WSOLX");
    }

    #[test]
    fn test_summary_merges_rewards_and_fees() {
        let mut info = pool_info(0, 0, 10);
        info.mint_a.symbol = "WSOL".to_string();
        info.mint_a.name = "Wrapped SOL".to_string();
        info.mint_b.name = "USD Coin".to_string();
        // Mint A doubles as reward slot 0
        info.reward_mints = vec![info.mint_a.clone()];

        let mut state = pool_state(0, 10);
        state.reward_infos[0].token_mint = info.mint_a.address;
        state.reward_infos[0].reward_growth_global_x64 = 5 * Q64 / LIQUIDITY + 1;
        state.fee_growth_global_0_x64 = 3 * Q64 / LIQUIDITY + 1;
        // Slot 1 pays out but its mint is unknown to the pool descriptor
        state.reward_infos[1].token_mint = Pubkey::new_unique();
        state.reward_infos[1].reward_growth_global_x64 = Q64;

        let pos = position(-100, 100);
        let summary = summarize_position(PositionInputs {
            pool_info: &info,
            pool_state: &state,
            position: &pos,
            tick_lower_state: &tick(-100),
            tick_upper_state: &tick(100),
            epoch: 0,
        })
        .unwrap();

        assert_eq!(summary.pool, "Wrapped SOL - USD Coin");
        assert_eq!(summary.nft, pos.nft_mint.to_string());
        assert_eq!(summary.tick_lower, -100);
        assert_eq!(summary.tick_upper, 100);
        assert_eq!(summary.current_tick, 0);
        assert_eq!(summary.current_price, 1.0);
        assert_eq!(summary.pooled_amount_a, Decimal::from(4_987_272_070u64));
        assert_eq!(summary.pooled_amount_b, Decimal::from(4_987_272_070u64));
        assert!(summary.price_lower < 1.0 && summary.price_upper > 1.0);

        assert_eq!(summary.reward_infos.len(), 2);
        assert_eq!(summary.reward_infos[0].mint, "SOL");
        assert_eq!(summary.reward_infos[0].address, info.mint_a.address.to_string());
        assert_eq!(summary.reward_infos[0].amount, Decimal::from(8));
        assert_eq!(summary.reward_infos[1].mint, "BBB");
        assert_eq!(summary.reward_infos[1].amount, Decimal::ZERO);
    }

    fn full_range_summary(decimals_a: u8, decimals_b: u8) -> PositionSummary {
        let info = pool_info(decimals_a, decimals_b, 60);
        let state = pool_state(0, 60);
        let pos = position(-443_580, 443_580);
        summarize_position(PositionInputs {
            pool_info: &info,
            pool_state: &state,
            position: &pos,
            tick_lower_state: &tick(-443_580),
            tick_upper_state: &tick(443_580),
            epoch: 0,
        })
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(actual.is_finite() && actual > 0.0, "price {} not positive", actual);
        let error = ((actual - expected) / expected).abs();
        assert!(error < 1e-6, "price {} expected {}", actual, expected);
    }

    #[test]
    fn test_full_range_prices() {
        // 1.0001^443580 and its inverse
        let upper = 1.834_304_665_775_208_6e19;
        let lower = 5.451_657_070_159_514e-20;

        for (decimals_a, decimals_b) in [(18, 6), (6, 18), (0, 9), (6, 6)] {
            let summary = full_range_summary(decimals_a, decimals_b);
            let scale = 10f64.powi(i32::from(decimals_a) - i32::from(decimals_b));
            assert_close(summary.price_lower, lower * scale);
            assert_close(summary.price_upper, upper * scale);
            assert_close(summary.current_price, scale);
        }
    }
}
