//! Mint metadata: decimals and Token-2022 transfer fees from mint accounts,
//! display labels from configuration

use clmm_core::math::{TransferFee, TransferFeeConfig};
use clmm_core::TokenInfo;
use solana_sdk::account::Account;
use solana_sdk::pubkey::Pubkey;
use spl_token_2022::extension::transfer_fee;
use spl_token_2022::extension::{BaseStateWithExtensions, StateWithExtensions};
use spl_token_2022::state::Mint;

use crate::config::ViewerConfig;
use crate::error::{ViewerError, ViewerResult};

/// Build a [`TokenInfo`] from a fetched mint account
pub fn token_info(address: Pubkey, account: &Account, config: &ViewerConfig) -> ViewerResult<TokenInfo> {
    let invalid = |reason: String| ViewerError::InvalidMint { address, reason };

    let is_token_2022 = account.owner == spl_token_2022::ID;
    if account.owner != spl_token::ID && !is_token_2022 {
        return Err(invalid(format!("owned by {}, not a token program", account.owner)));
    }

    let mint = StateWithExtensions::<Mint>::unpack(&account.data).map_err(|e| invalid(e.to_string()))?;

    let transfer_fee_config = if is_token_2022 {
        mint.get_extension::<transfer_fee::TransferFeeConfig>()
            .ok()
            .map(|extension| TransferFeeConfig {
                older_transfer_fee: convert_fee(&extension.older_transfer_fee),
                newer_transfer_fee: convert_fee(&extension.newer_transfer_fee),
            })
    } else {
        None
    };

    let mut info = TokenInfo::unlabeled(address, mint.base.decimals);
    info.transfer_fee_config = transfer_fee_config;
    if let Some(label) = config.token(&address) {
        info.symbol = label.symbol.clone();
        info.name = label.name.clone();
    } else {
        log::debug!("no label configured for mint {}", address);
    }

    Ok(info)
}

fn convert_fee(fee: &transfer_fee::TransferFee) -> TransferFee {
    TransferFee {
        epoch: u64::from(fee.epoch),
        maximum_fee: u64::from(fee.maximum_fee),
        transfer_fee_basis_points: u16::from(fee.transfer_fee_basis_points),
    }
}
