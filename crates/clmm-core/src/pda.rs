//! # Program Derived Addresses
//!
//! Deterministic addresses of the CLMM accounts a position read touches.

use solana_program::pubkey::Pubkey;

use crate::constants::seeds;
use crate::errors::CoreResult;
use crate::math::tick_math::tick_array_start_index;

/// Address of the tick array holding `tick`
///
/// The start index is encoded big-endian in the seed, unlike account data.
pub fn tick_array_address(
    program_id: &Pubkey,
    pool_id: &Pubkey,
    tick: i32,
    tick_spacing: u16,
) -> CoreResult<(Pubkey, u8)> {
    let start_index = tick_array_start_index(tick, tick_spacing)?;
    Ok(Pubkey::find_program_address(
        &[
            seeds::TICK_ARRAY,
            pool_id.as_ref(),
            &start_index.to_be_bytes(),
        ],
        program_id,
    ))
}

/// Address of the personal position account owned by a position NFT
pub fn personal_position_address(program_id: &Pubkey, nft_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[seeds::POSITION, nft_mint.as_ref()], program_id)
}
