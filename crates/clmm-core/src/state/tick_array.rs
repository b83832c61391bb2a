//! Tick array account: 60 consecutive spacing-aligned tick records

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::constants::{REWARD_NUM, TICK_ARRAY_SIZE_USIZE};
use crate::errors::{ClmmCoreError, CoreResult};
use crate::math::tick_math::{tick_array_start_index, tick_offset_in_array};
use crate::state::layout::{tick_array, LayoutReader, TICK_ARRAY};

/// Decoded tick record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TickState {
    pub tick: i32,
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_0_x64: u128,
    pub fee_growth_outside_1_x64: u128,
    pub reward_growths_outside_x64: [u128; REWARD_NUM],
}

impl TickState {
    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    fn read(reader: &LayoutReader<'_>, base: usize) -> CoreResult<Self> {
        use tick_array::tick;

        let mut reward_growths_outside_x64 = [0u128; REWARD_NUM];
        for (i, growth) in reward_growths_outside_x64.iter_mut().enumerate() {
            *growth = reader.u128(base + tick::REWARD_GROWTHS_OUTSIDE_X64 + i * 16)?;
        }

        Ok(Self {
            tick: reader.i32(base + tick::TICK)?,
            liquidity_net: reader.i128(base + tick::LIQUIDITY_NET)?,
            liquidity_gross: reader.u128(base + tick::LIQUIDITY_GROSS)?,
            fee_growth_outside_0_x64: reader.u128(base + tick::FEE_GROWTH_OUTSIDE_0_X64)?,
            fee_growth_outside_1_x64: reader.u128(base + tick::FEE_GROWTH_OUTSIDE_1_X64)?,
            reward_growths_outside_x64,
        })
    }
}

/// Decoded `TickArrayState`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TickArrayState {
    pub pool_id: Pubkey,
    pub start_tick_index: i32,
    pub ticks: Vec<TickState>,
    pub initialized_tick_count: u8,
    pub recent_epoch: u64,
}

impl TickArrayState {
    pub const LEN: usize = TICK_ARRAY.len;

    /// Decode a raw account buffer
    pub fn decode(data: &[u8]) -> CoreResult<Self> {
        let reader = TICK_ARRAY.validate(data)?;

        let ticks = (0..TICK_ARRAY_SIZE_USIZE)
            .map(|i| TickState::read(&reader, tick_array::TICKS + i * tick_array::TICK_LEN))
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self {
            pool_id: reader.pubkey(tick_array::POOL_ID)?,
            start_tick_index: reader.i32(tick_array::START_TICK_INDEX)?,
            ticks,
            initialized_tick_count: reader.u8(tick_array::INITIALIZED_TICK_COUNT)?,
            recent_epoch: reader.u64(tick_array::RECENT_EPOCH)?,
        })
    }

    /// Tick record for `tick`, which must belong to this array
    pub fn tick_state(&self, tick: i32, tick_spacing: u16) -> CoreResult<&TickState> {
        let expected = tick_array_start_index(tick, tick_spacing)?;
        if expected != self.start_tick_index {
            return Err(ClmmCoreError::TickArrayMismatch {
                expected,
                actual: self.start_tick_index,
            });
        }

        let offset = tick_offset_in_array(tick, tick_spacing)?;
        log::debug!(
            "tick {} at offset {} of array starting at {}",
            tick,
            offset,
            self.start_tick_index
        );
        self.ticks
            .get(offset)
            .ok_or(ClmmCoreError::InvalidTick(tick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(data: &mut [u8], offset: usize, bytes: &[u8]) {
        data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn tick_array_bytes(start: i32, spacing: i32) -> Vec<u8> {
        use tick_array::tick;

        let mut data = vec![0u8; TickArrayState::LEN];
        put(&mut data, 0, &TICK_ARRAY.discriminator());
        put(&mut data, tick_array::START_TICK_INDEX, &start.to_le_bytes());
        for i in 0..TICK_ARRAY_SIZE_USIZE {
            let base = tick_array::TICKS + i * tick_array::TICK_LEN;
            let index = start + i as i32 * spacing;
            put(&mut data, base + tick::TICK, &index.to_le_bytes());
            // Mark odd slots initialized with distinguishable growth
            if i % 2 == 1 {
                put(&mut data, base + tick::LIQUIDITY_GROSS, &(i as u128).to_le_bytes());
                put(&mut data, base + tick::LIQUIDITY_NET, &(-(i as i128)).to_le_bytes());
                put(&mut data, base + tick::FEE_GROWTH_OUTSIDE_0_X64, &((i as u128) << 64).to_le_bytes());
                put(
                    &mut data,
                    base + tick::REWARD_GROWTHS_OUTSIDE_X64 + 32,
                    &(i as u128 * 3).to_le_bytes(),
                );
            }
        }
        data[tick_array::INITIALIZED_TICK_COUNT] = 30;
        put(&mut data, tick_array::RECENT_EPOCH, &700u64.to_le_bytes());
        data
    }

    #[test]
    fn test_decode_tick_array() {
        let decoded = TickArrayState::decode(&tick_array_bytes(-600, 10)).unwrap();
        assert_eq!(decoded.start_tick_index, -600);
        assert_eq!(decoded.ticks.len(), 60);
        assert_eq!(decoded.initialized_tick_count, 30);
        assert_eq!(decoded.recent_epoch, 700);

        let last = decoded.ticks[59];
        assert_eq!(last.tick, -10);
        assert!(last.is_initialized());
        assert_eq!(last.liquidity_net, -59);
        assert_eq!(last.fee_growth_outside_0_x64, 59u128 << 64);
        assert_eq!(last.reward_growths_outside_x64, [0, 0, 177]);
        assert!(!decoded.ticks[0].is_initialized());
    }

    #[test]
    fn test_tick_state_lookup() {
        let decoded = TickArrayState::decode(&tick_array_bytes(-600, 10)).unwrap();
        assert_eq!(decoded.tick_state(-590, 10).unwrap().tick, -590);
        assert_eq!(decoded.tick_state(-10, 10).unwrap().tick, -10);

        assert_eq!(
            decoded.tick_state(0, 10).unwrap_err(),
            ClmmCoreError::TickArrayMismatch {
                expected: 0,
                actual: -600
            }
        );
    }

    #[test]
    fn test_decode_rejects_wrong_discriminator() {
        let mut data = tick_array_bytes(0, 1);
        data[0] ^= 0xff;
        assert_eq!(
            TickArrayState::decode(&data).unwrap_err(),
            ClmmCoreError::DiscriminatorMismatch {
                account: "TickArrayState"
            }
        );
    }
}
