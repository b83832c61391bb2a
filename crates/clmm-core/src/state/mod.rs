//! # Account State
//!
//! Typed views of the CLMM program accounts, decoded from raw account data
//! through an explicit layout table.

pub mod layout;
pub mod pool;
pub mod position;
pub mod tick_array;

pub use layout::{account_discriminator, AccountLayout};
pub use pool::{PoolInfo, PoolState, RewardInfo, TokenInfo};
pub use position::{PersonalPosition, PositionRewardInfo};
pub use tick_array::{TickArrayState, TickState};
