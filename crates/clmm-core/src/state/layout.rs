//! # Account Layouts
//!
//! Byte offsets of every field the reader needs, per account kind, and a
//! bounds-checked little-endian reader over a validated buffer.
//!
//! All accounts start with the 8-byte Anchor discriminator
//! `sha256("account:<Name>")[..8]`.

use solana_program::hash::hashv;
use solana_program::pubkey::Pubkey;

use crate::errors::{ClmmCoreError, CoreResult};

/// Length of the Anchor account discriminator
pub const DISCRIMINATOR_LEN: usize = 8;

/// Compute the Anchor discriminator for an account type name
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let hash = hashv(&[b"account:", name.as_bytes()]);
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&hash.to_bytes()[..DISCRIMINATOR_LEN]);
    discriminator
}

/// Fixed shape of one account kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountLayout {
    /// Anchor type name, also used in error messages
    pub name: &'static str,
    /// Exact account data length in bytes
    pub len: usize,
}

impl AccountLayout {
    pub const fn new(name: &'static str, len: usize) -> Self {
        Self { name, len }
    }

    pub fn discriminator(&self) -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator(self.name)
    }

    /// Check length and discriminator, returning a reader on success
    pub fn validate<'a>(&self, data: &'a [u8]) -> CoreResult<LayoutReader<'a>> {
        if data.len() != self.len {
            return Err(ClmmCoreError::invalid_length(self.name, self.len, data.len()));
        }
        if data[..DISCRIMINATOR_LEN] != self.discriminator() {
            return Err(ClmmCoreError::DiscriminatorMismatch { account: self.name });
        }
        Ok(LayoutReader {
            data,
            account: self.name,
        })
    }
}

pub const PERSONAL_POSITION: AccountLayout = AccountLayout::new("PersonalPositionState", 281);
pub const TICK_ARRAY: AccountLayout = AccountLayout::new("TickArrayState", 10_240);
pub const POOL: AccountLayout = AccountLayout::new("PoolState", 1_544);

/// PersonalPositionState offsets
pub mod position {
    pub const BUMP: usize = 8;
    pub const NFT_MINT: usize = 9;
    pub const POOL_ID: usize = 41;
    pub const TICK_LOWER_INDEX: usize = 73;
    pub const TICK_UPPER_INDEX: usize = 77;
    pub const LIQUIDITY: usize = 81;
    pub const FEE_GROWTH_INSIDE_0_LAST_X64: usize = 97;
    pub const FEE_GROWTH_INSIDE_1_LAST_X64: usize = 113;
    pub const TOKEN_FEES_OWED_0: usize = 129;
    pub const TOKEN_FEES_OWED_1: usize = 137;
    pub const REWARD_INFOS: usize = 145;
    /// growth_inside_last_x64 (u128) + reward_amount_owed (u64)
    pub const REWARD_INFO_LEN: usize = 24;
    pub const RECENT_EPOCH: usize = 217;
}

/// TickArrayState and TickState offsets
pub mod tick_array {
    pub const POOL_ID: usize = 8;
    pub const START_TICK_INDEX: usize = 40;
    pub const TICKS: usize = 44;
    pub const TICK_LEN: usize = 168;
    pub const INITIALIZED_TICK_COUNT: usize = 10_124;
    pub const RECENT_EPOCH: usize = 10_125;

    /// Offsets inside one tick record
    pub mod tick {
        pub const TICK: usize = 0;
        pub const LIQUIDITY_NET: usize = 4;
        pub const LIQUIDITY_GROSS: usize = 20;
        pub const FEE_GROWTH_OUTSIDE_0_X64: usize = 36;
        pub const FEE_GROWTH_OUTSIDE_1_X64: usize = 52;
        pub const REWARD_GROWTHS_OUTSIDE_X64: usize = 68;
    }
}

/// PoolState and RewardInfo offsets
pub mod pool {
    pub const BUMP: usize = 8;
    pub const AMM_CONFIG: usize = 9;
    pub const OWNER: usize = 41;
    pub const TOKEN_MINT_0: usize = 73;
    pub const TOKEN_MINT_1: usize = 105;
    pub const TOKEN_VAULT_0: usize = 137;
    pub const TOKEN_VAULT_1: usize = 169;
    pub const OBSERVATION_KEY: usize = 201;
    pub const MINT_DECIMALS_0: usize = 233;
    pub const MINT_DECIMALS_1: usize = 234;
    pub const TICK_SPACING: usize = 235;
    pub const LIQUIDITY: usize = 237;
    pub const SQRT_PRICE_X64: usize = 253;
    pub const TICK_CURRENT: usize = 269;
    pub const FEE_GROWTH_GLOBAL_0_X64: usize = 277;
    pub const FEE_GROWTH_GLOBAL_1_X64: usize = 293;
    pub const PROTOCOL_FEES_TOKEN_0: usize = 309;
    pub const PROTOCOL_FEES_TOKEN_1: usize = 317;
    pub const STATUS: usize = 389;
    pub const REWARD_INFOS: usize = 397;
    pub const REWARD_INFO_LEN: usize = 169;
    pub const TICK_ARRAY_BITMAP: usize = 904;
    pub const OPEN_TIME: usize = 1_080;
    pub const RECENT_EPOCH: usize = 1_088;

    /// Offsets inside one reward slot
    pub mod reward {
        pub const REWARD_STATE: usize = 0;
        pub const OPEN_TIME: usize = 1;
        pub const END_TIME: usize = 9;
        pub const LAST_UPDATE_TIME: usize = 17;
        pub const EMISSIONS_PER_SECOND_X64: usize = 25;
        pub const REWARD_TOTAL_EMISSIONED: usize = 41;
        pub const REWARD_CLAIMED: usize = 49;
        pub const TOKEN_MINT: usize = 57;
        pub const TOKEN_VAULT: usize = 89;
        pub const AUTHORITY: usize = 121;
        pub const REWARD_GROWTH_GLOBAL_X64: usize = 153;
    }
}

/// Little-endian field reader over a buffer already checked by
/// [`AccountLayout::validate`]
#[derive(Debug, Clone, Copy)]
pub struct LayoutReader<'a> {
    data: &'a [u8],
    account: &'static str,
}

impl<'a> LayoutReader<'a> {
    fn array<const N: usize>(&self, offset: usize) -> CoreResult<[u8; N]> {
        self.data
            .get(offset..offset + N)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| ClmmCoreError::invalid_length(self.account, offset + N, self.data.len()))
    }

    pub fn u8(&self, offset: usize) -> CoreResult<u8> {
        Ok(self.array::<1>(offset)?[0])
    }

    pub fn u16(&self, offset: usize) -> CoreResult<u16> {
        Ok(u16::from_le_bytes(self.array(offset)?))
    }

    pub fn i32(&self, offset: usize) -> CoreResult<i32> {
        Ok(i32::from_le_bytes(self.array(offset)?))
    }

    pub fn u64(&self, offset: usize) -> CoreResult<u64> {
        Ok(u64::from_le_bytes(self.array(offset)?))
    }

    pub fn u128(&self, offset: usize) -> CoreResult<u128> {
        Ok(u128::from_le_bytes(self.array(offset)?))
    }

    pub fn i128(&self, offset: usize) -> CoreResult<i128> {
        Ok(i128::from_le_bytes(self.array(offset)?))
    }

    pub fn pubkey(&self, offset: usize) -> CoreResult<Pubkey> {
        Ok(Pubkey::new_from_array(self.array(offset)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discriminator_is_stable() {
        let a = account_discriminator("PoolState");
        let b = account_discriminator("PoolState");
        assert_eq!(a, b);
        assert_ne!(a, account_discriminator("TickArrayState"));
        assert_eq!(POOL.discriminator(), a);
    }

    #[test]
    fn test_validate_rejects_bad_buffers() {
        let short = vec![0u8; 100];
        assert_eq!(
            PERSONAL_POSITION.validate(&short).unwrap_err(),
            ClmmCoreError::invalid_length("PersonalPositionState", 281, 100)
        );

        // Right length, wrong discriminator
        let mut data = vec![0u8; PERSONAL_POSITION.len];
        data[..8].copy_from_slice(&TICK_ARRAY.discriminator());
        assert_eq!(
            PERSONAL_POSITION.validate(&data).unwrap_err(),
            ClmmCoreError::DiscriminatorMismatch {
                account: "PersonalPositionState"
            }
        );
    }

    #[test]
    fn test_reader_little_endian() {
        let mut data = vec![0u8; PERSONAL_POSITION.len];
        data[..8].copy_from_slice(&PERSONAL_POSITION.discriminator());
        data[position::TICK_LOWER_INDEX..position::TICK_LOWER_INDEX + 4]
            .copy_from_slice(&(-120i32).to_le_bytes());
        data[position::LIQUIDITY..position::LIQUIDITY + 16]
            .copy_from_slice(&(u128::MAX - 7).to_le_bytes());

        let reader = PERSONAL_POSITION.validate(&data).unwrap();
        assert_eq!(reader.i32(position::TICK_LOWER_INDEX).unwrap(), -120);
        assert_eq!(reader.u128(position::LIQUIDITY).unwrap(), u128::MAX - 7);
        assert!(reader.u64(PERSONAL_POSITION.len - 4).is_err());
    }

    #[test]
    fn test_offsets_fit_in_accounts() {
        assert!(position::RECENT_EPOCH + 8 <= PERSONAL_POSITION.len);
        assert_eq!(
            tick_array::TICKS + tick_array::TICK_LEN * crate::constants::TICK_ARRAY_SIZE_USIZE,
            tick_array::INITIALIZED_TICK_COUNT
        );
        assert_eq!(
            pool::REWARD_INFOS + pool::REWARD_INFO_LEN * crate::constants::REWARD_NUM,
            pool::TICK_ARRAY_BITMAP
        );
        assert!(pool::RECENT_EPOCH + 8 <= POOL.len);
    }
}
