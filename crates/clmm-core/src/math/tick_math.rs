//! # Tick Math
//!
//! Conversions between ticks and Q64.64 sqrt prices, bit-exact with the
//! on-chain program, plus tick array geometry.

use crate::constants::{
    MAX_SQRT_PRICE_X64, MAX_TICK, MIN_SQRT_PRICE_X64, MIN_TICK, Q64, TICK_ARRAY_SIZE,
};
use crate::errors::{ClmmCoreError, CoreResult};

/// sqrt(1.0001)^(-2^i) in Q64.64, low 16 bits dropped as on-chain
const MAGIC_SQRT_1_0001_NEG_POW_2: [u128; 19] = [
    0xfffcb933bd6fb800, // 2^0
    0xfff97272373d4000, // 2^1
    0xfff2e50f5f657000, // 2^2
    0xffe5caca7e10f000, // 2^3
    0xffcb9843d60f7000, // 2^4
    0xff973b41fa98e800, // 2^5
    0xff2ea16466c9b000, // 2^6
    0xfe5dee046a9a3800, // 2^7
    0xfcbe86c7900bb000, // 2^8
    0xf987a7253ac65800, // 2^9
    0xf3392b0822bb6000, // 2^10
    0xe7159475a2caf000, // 2^11
    0xd097f3bdfd2f2000, // 2^12
    0xa9f746462d9f8000, // 2^13
    0x70d869a156f31c00, // 2^14
    0x31be135f97ed3200, // 2^15
    0x9aa508b5b85a500,  // 2^16
    0x5d6af8dedc582c,   // 2^17
    0x2216e584f5fa,     // 2^18
];

/// Fractional bits computed by the log2 approximation
const BIT_PRECISION: u32 = 16;

/// log_sqrt(1.0001)(2) in Q32.32
const LOG_B_2_X32: i128 = 59_543_866_431_248;

/// Error margins of the log approximation, Q64.64
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184_467_440_737_095_516;
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15_793_534_762_490_258_745;

/// Get sqrt price from tick using Q64 precision
pub fn get_sqrt_price_at_tick(tick: i32) -> CoreResult<u128> {
    if !is_tick_valid(tick) {
        return Err(ClmmCoreError::InvalidTick(tick));
    }

    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        MAGIC_SQRT_1_0001_NEG_POW_2[0]
    } else {
        Q64
    };

    // Binary decomposition of the tick; every factor is below 2^64 so the
    // product never leaves u128
    for (i, magic) in MAGIC_SQRT_1_0001_NEG_POW_2.iter().enumerate().skip(1) {
        if abs_tick & (1 << i) != 0 {
            ratio = (ratio * magic) >> 64;
        }
    }

    if tick > 0 {
        ratio = u128::MAX / ratio;
    }

    Ok(ratio)
}

/// Get the greatest tick whose sqrt price is <= `sqrt_price_x64`
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> CoreResult<i32> {
    if !(MIN_SQRT_PRICE_X64..MAX_SQRT_PRICE_X64).contains(&sqrt_price_x64) {
        return Err(ClmmCoreError::InvalidSqrtPrice(sqrt_price_x64));
    }

    // Integer part of log2, relative to the Q64 point
    let msb = 127 - sqrt_price_x64.leading_zeros();
    let log2p_integer_x32 = (msb as i128 - 64) << 32;

    // Fractional part by repeated squaring of the normalized mantissa
    let mut bit: i128 = 0x8000_0000_0000_0000;
    let mut precision = 0;
    let mut log2p_fraction_x64: i128 = 0;

    let mut r = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };

    while bit > 0 && precision < BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = (r >> 127) as u32;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * is_r_more_than_two as i128;
        bit >>= 1;
        precision += 1;
    }

    let log2p_fraction_x32 = log2p_fraction_x64 >> 32;
    let log2p_x32 = log2p_integer_x32 + log2p_fraction_x32;

    // Change of base to log_sqrt(1.0001)
    let log_sqrt_10001_x64 = log2p_x32 * LOG_B_2_X32;

    let tick_low = ((log_sqrt_10001_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high = ((log_sqrt_10001_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    if tick_low == tick_high {
        Ok(tick_low)
    } else if get_sqrt_price_at_tick(tick_high)? <= sqrt_price_x64 {
        Ok(tick_high)
    } else {
        Ok(tick_low)
    }
}

/// Check if a tick is within the supported range
pub fn is_tick_valid(tick: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// Number of tick indices covered by one tick array
pub fn tick_count(tick_spacing: u16) -> i32 {
    TICK_ARRAY_SIZE * i32::from(tick_spacing)
}

/// Start index of the tick array containing `tick` (floor, not truncation)
pub fn tick_array_start_index(tick: i32, tick_spacing: u16) -> CoreResult<i32> {
    if tick_spacing == 0 {
        return Err(ClmmCoreError::InvalidTickSpacing(tick_spacing));
    }
    let ticks_in_array = tick_count(tick_spacing);
    Ok(tick.div_euclid(ticks_in_array) * ticks_in_array)
}

/// Slot of `tick` within its tick array
pub fn tick_offset_in_array(tick: i32, tick_spacing: u16) -> CoreResult<usize> {
    let start = tick_array_start_index(tick, tick_spacing)?;
    Ok(((tick - start) / i32::from(tick_spacing)) as usize)
}

/// Round `tick` to the nearest multiple of `tick_spacing`, staying in range
pub fn snap_to_spacing(tick: i32, tick_spacing: u16) -> CoreResult<i32> {
    if tick_spacing == 0 {
        return Err(ClmmCoreError::InvalidTickSpacing(tick_spacing));
    }
    let spacing = i32::from(tick_spacing);
    let remainder = tick.rem_euclid(spacing);
    let floor = tick - remainder;
    let nearest = if remainder * 2 >= spacing {
        floor + spacing
    } else {
        floor
    };

    // Bounds are not spacing-aligned in general; step back inside
    Ok(if nearest > MAX_TICK {
        nearest - spacing
    } else if nearest < MIN_TICK {
        nearest + spacing
    } else {
        nearest
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tick_to_sqrt_price_conversion() {
        assert_eq!(get_sqrt_price_at_tick(0).unwrap(), Q64);

        assert_eq!(get_sqrt_price_at_tick(MIN_TICK).unwrap(), MIN_SQRT_PRICE_X64);
        assert_eq!(get_sqrt_price_at_tick(MAX_TICK).unwrap(), MAX_SQRT_PRICE_X64);

        assert_eq!(get_sqrt_price_at_tick(-1).unwrap(), 18_445_821_805_675_395_072);
        assert_eq!(get_sqrt_price_at_tick(1).unwrap(), 18_447_666_387_855_957_090);
        assert_eq!(get_sqrt_price_at_tick(-100).unwrap(), 18_354_745_142_194_513_203);
        assert_eq!(get_sqrt_price_at_tick(100).unwrap(), 18_539_204_128_674_375_874);
    }

    #[test]
    fn test_tick_out_of_range() {
        assert_eq!(
            get_sqrt_price_at_tick(MAX_TICK + 1),
            Err(ClmmCoreError::InvalidTick(MAX_TICK + 1))
        );
        assert!(get_sqrt_price_at_tick(MIN_TICK - 1).is_err());
        assert!(get_tick_at_sqrt_price(MIN_SQRT_PRICE_X64 - 1).is_err());
        assert!(get_tick_at_sqrt_price(MAX_SQRT_PRICE_X64).is_err());
    }

    #[test]
    fn test_sqrt_price_to_tick_conversion() {
        for tick in [MIN_TICK, -100_000, -1000, -100, -1, 0, 1, 100, 1000, 100_000, MAX_TICK - 1] {
            let sqrt_price = get_sqrt_price_at_tick(tick).unwrap();
            assert_eq!(get_tick_at_sqrt_price(sqrt_price).unwrap(), tick);
            // One below the boundary belongs to the previous tick
            if tick > MIN_TICK {
                assert_eq!(get_tick_at_sqrt_price(sqrt_price - 1).unwrap(), tick - 1);
            }
        }
    }

    #[test]
    fn test_tick_array_start_index() {
        assert_eq!(tick_array_start_index(0, 10).unwrap(), 0);
        assert_eq!(tick_array_start_index(599, 10).unwrap(), 0);
        assert_eq!(tick_array_start_index(600, 10).unwrap(), 600);
        assert_eq!(tick_array_start_index(-1, 10).unwrap(), -600);
        assert_eq!(tick_array_start_index(-600, 10).unwrap(), -600);
        assert_eq!(tick_array_start_index(-601, 10).unwrap(), -1200);
        assert_eq!(tick_array_start_index(-100, 1).unwrap(), -120);
        assert!(tick_array_start_index(5, 0).is_err());
    }

    #[test]
    fn test_tick_offset_in_array() {
        assert_eq!(tick_offset_in_array(0, 10).unwrap(), 0);
        assert_eq!(tick_offset_in_array(590, 10).unwrap(), 59);
        assert_eq!(tick_offset_in_array(-10, 10).unwrap(), 59);
        assert_eq!(tick_offset_in_array(-600, 10).unwrap(), 0);
        assert_eq!(tick_offset_in_array(-100, 1).unwrap(), 20);
    }

    #[test]
    fn test_snap_to_spacing() {
        assert_eq!(snap_to_spacing(14, 10).unwrap(), 10);
        assert_eq!(snap_to_spacing(15, 10).unwrap(), 20);
        assert_eq!(snap_to_spacing(-14, 10).unwrap(), -10);
        assert_eq!(snap_to_spacing(-16, 10).unwrap(), -20);
        assert_eq!(snap_to_spacing(MAX_TICK, 60).unwrap(), 443_580);
        assert_eq!(snap_to_spacing(MIN_TICK, 60).unwrap(), -443_580);
    }

    proptest! {
        #[test]
        fn prop_start_and_offset_rebuild_tick(
            compressed in -7_000i32..7_000i32,
            spacing in prop::sample::select(vec![1u16, 10, 60, 120]),
        ) {
            let tick = compressed * i32::from(spacing);
            prop_assume!(is_tick_valid(tick));
            let start = tick_array_start_index(tick, spacing).unwrap();
            let offset = tick_offset_in_array(tick, spacing).unwrap();
            prop_assert!(offset < TICK_ARRAY_SIZE as usize);
            prop_assert_eq!(start + offset as i32 * i32::from(spacing), tick);
        }

        #[test]
        fn prop_tick_round_trip(tick in MIN_TICK..MAX_TICK) {
            let sqrt_price = get_sqrt_price_at_tick(tick).unwrap();
            prop_assert_eq!(get_tick_at_sqrt_price(sqrt_price).unwrap(), tick);
        }
    }
}
