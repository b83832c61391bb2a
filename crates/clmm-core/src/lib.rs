//! # CLMM Core - Off-chain Position Valuation
//!
//! Pure, synchronous logic for reading Raydium CLMM positions from raw
//! account data. It provides:
//!
//! - Account decoding for positions, tick arrays and pools
//! - Tick and sqrt-price math, bit-exact with the on-chain program
//! - Token amounts behind a position's liquidity, with Token-2022 transfer fees
//! - Uncollected fee and reward accounting
//! - A display summary merging rewards and fees per mint
//!
//! No I/O happens here: callers fetch account bytes and mint metadata and
//! hand them in.
//!
//! ## Feature Flags
//!
//! - `client`: Enables serde derives for off-chain serialization

pub mod accounting;
pub mod constants;
pub mod errors;
pub mod math;
pub mod pda;
pub mod state;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used items
pub use accounting::{compute_position_fees, compute_position_rewards, TokenFees};
pub use constants::*;
pub use errors::{ClmmCoreError, CoreResult};
pub use pda::{personal_position_address, tick_array_address};
pub use state::{
    PersonalPosition, PoolInfo, PoolState, RewardInfo, TickArrayState, TickState, TokenInfo,
};
pub use summary::{
    display_symbol, summarize_position, to_ui_amount, PositionInputs, PositionSummary,
    RewardEntry, RewardLedger, RewardLine,
};
