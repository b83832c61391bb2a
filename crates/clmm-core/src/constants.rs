//! # Protocol Constants
//!
//! Values fixed by the Raydium CLMM program:
//! - Q64.64 fixed-point scale
//! - Tick and sqrt-price bounds
//! - Tick array geometry and PDA seeds
//! - Reward slot count and the "ignore range" sentinel

use solana_program::pubkey::Pubkey;

// ============================================================================
// Mathematical Constants
// ============================================================================

/// Q64 fixed-point scale factor: 2^64
pub const Q64: u128 = 1u128 << 64;

/// Transfer fee basis points denominator (10,000 = 100%)
pub const FEE_BASIS_POINTS_DENOMINATOR: u64 = 10_000;

// ============================================================================
// Tick Bounds
// ============================================================================

/// Minimum tick supported by the program
pub const MIN_TICK: i32 = -443_636;

/// Maximum tick supported by the program
pub const MAX_TICK: i32 = -MIN_TICK;

/// Sqrt price at MIN_TICK (Q64.64)
pub const MIN_SQRT_PRICE_X64: u128 = 4_295_048_016;

/// Sqrt price at MAX_TICK (Q64.64)
pub const MAX_SQRT_PRICE_X64: u128 = 79_226_673_521_066_979_257_578_248_091;

// ============================================================================
// Account Geometry
// ============================================================================

/// Tick records per tick array account
pub const TICK_ARRAY_SIZE: i32 = 60;
pub const TICK_ARRAY_SIZE_USIZE: usize = 60;

/// Reward slots per pool and per position
pub const REWARD_NUM: usize = 3;

/// Amounts at or above this value are the program's "not computable" marker
/// and must be treated as zero.
pub const U64_IGNORE_RANGE: u64 = 18_446_744_073_700_000_000;

/// PDA seeds
pub mod seeds {
    pub const TICK_ARRAY: &[u8] = b"tick_array";
    pub const POSITION: &[u8] = b"position";
}

// ============================================================================
// Program IDs and Symbols
// ============================================================================

/// Raydium CLMM program on mainnet-beta
pub const CLMM_PROGRAM_ID: Pubkey = solana_program::pubkey!("CAMMCzo5YL8w4VFF8KVHrK22GGUsp5VTaW7grrKgrWqK");

/// Raydium CLMM program on devnet
pub const DEVNET_CLMM_PROGRAM_ID: Pubkey = solana_program::pubkey!("devi51mZmdwUJGU9hjN27vEz64Gps7uUefqxg27EAtH");

/// Symbol the token list uses for wrapped SOL
pub const WRAPPED_NATIVE_SYMBOL: &str = "WSOL";

/// Symbol shown to users in place of the wrapped one
pub const NATIVE_SYMBOL: &str = "SOL";
