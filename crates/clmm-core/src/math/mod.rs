//! # Mathematical Functions
//!
//! Pure fixed-point math matching the CLMM program's on-chain arithmetic.

pub mod big_int;
pub mod fee_math;
pub mod liquidity_math;
pub mod price;
pub mod tick_math;
pub mod transfer_fee;

// Re-export commonly used functions
pub use big_int::{mul_div, Rounding, U256};
pub use fee_math::*;
pub use liquidity_math::*;
pub use price::*;
pub use tick_math::*;
pub use transfer_fee::*;
