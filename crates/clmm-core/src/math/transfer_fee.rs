//! # Transfer Fee Math
//!
//! Token-2022 transfer fee adjustment. A mint may carry two fee schedules:
//! the older one stays in force until the newer one's activation epoch.

#[cfg(feature = "client")]
use serde::{Deserialize, Serialize};

use crate::constants::FEE_BASIS_POINTS_DENOMINATOR;
use crate::errors::{ClmmCoreError, CoreResult};
use crate::math::big_int::{mul_div, u256_to_u64, Rounding, U256};

/// One fee schedule of a Token-2022 mint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TransferFee {
    /// First epoch where this schedule is in force
    pub epoch: u64,
    /// Cap on the fee for a single transfer, in raw units
    pub maximum_fee: u64,
    pub transfer_fee_basis_points: u16,
}

/// Older and newer fee schedules as stored in the mint extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TransferFeeConfig {
    pub older_transfer_fee: TransferFee,
    pub newer_transfer_fee: TransferFee,
}

impl TransferFeeConfig {
    /// Schedule in force at `epoch`
    pub fn epoch_fee(&self, epoch: u64) -> &TransferFee {
        if epoch >= self.newer_transfer_fee.epoch {
            &self.newer_transfer_fee
        } else {
            &self.older_transfer_fee
        }
    }
}

/// Amount after the transfer fee adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "client", derive(Serialize, Deserialize))]
pub struct TransferAmount {
    pub amount: u64,
    pub fee: u64,
    /// Epoch at which the current schedule gets replaced, if pending
    pub expiration_epoch: Option<u64>,
}

/// Adjust `amount` by the mint's transfer fee at `epoch`.
///
/// With `add_fee`, returns the gross amount a sender must transfer so that
/// `amount` arrives. Otherwise returns what is left of `amount` after the fee.
pub fn transfer_amount_with_fee(
    amount: u64,
    fee_config: Option<&TransferFeeConfig>,
    epoch: u64,
    add_fee: bool,
) -> CoreResult<TransferAmount> {
    let Some(config) = fee_config else {
        return Ok(TransferAmount {
            amount,
            ..Default::default()
        });
    };

    let fee = config.epoch_fee(epoch);
    let expiration_epoch = if epoch < config.newer_transfer_fee.epoch {
        Some(config.newer_transfer_fee.epoch)
    } else {
        None
    };

    let bps = u64::from(fee.transfer_fee_basis_points);
    if bps > FEE_BASIS_POINTS_DENOMINATOR {
        return Err(ClmmCoreError::MathOverflow);
    }
    let max_fee = fee.maximum_fee;

    if add_fee {
        if bps == FEE_BASIS_POINTS_DENOMINATOR {
            let gross = amount
                .checked_add(max_fee)
                .ok_or(ClmmCoreError::MathOverflow)?;
            return Ok(TransferAmount {
                amount: gross,
                fee: max_fee,
                expiration_epoch,
            });
        }

        let pre_fee = div_ceil(
            amount,
            FEE_BASIS_POINTS_DENOMINATOR,
            FEE_BASIS_POINTS_DENOMINATOR - bps,
        )?;
        let gross = if pre_fee - amount > max_fee {
            amount
                .checked_add(max_fee)
                .ok_or(ClmmCoreError::MathOverflow)?
        } else {
            pre_fee
        };
        let fee = div_ceil(gross, bps, FEE_BASIS_POINTS_DENOMINATOR)?.min(max_fee);

        Ok(TransferAmount {
            amount: gross,
            fee,
            expiration_epoch,
        })
    } else {
        let fee = div_ceil(amount, bps, FEE_BASIS_POINTS_DENOMINATOR)?.min(max_fee);
        Ok(TransferAmount {
            amount: amount - fee,
            fee,
            expiration_epoch,
        })
    }
}

/// ceil(a * b / d) as u64
fn div_ceil(a: u64, b: u64, d: u64) -> CoreResult<u64> {
    let result = mul_div(U256::from(a), U256::from(b), U256::from(d), Rounding::Up)?;
    u256_to_u64(result)
}
