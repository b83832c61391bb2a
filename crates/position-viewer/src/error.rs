//! Error types for the position viewer

use clmm_core::ClmmCoreError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("{kind} account {address} not found")]
    AccountNotFound { kind: &'static str, address: Pubkey },

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid mint {address}: {reason}")]
    InvalidMint { address: Pubkey, reason: String },

    #[error("Position belongs to pool {expected}, pool account is {actual}")]
    PoolMismatch { expected: Pubkey, actual: Pubkey },

    #[error(transparent)]
    Core(#[from] ClmmCoreError),
}

pub type ViewerResult<T> = Result<T, ViewerError>;

impl ViewerError {
    pub fn not_found(kind: &'static str, address: Pubkey) -> Self {
        ViewerError::AccountNotFound { kind, address }
    }
}

impl From<solana_client::client_error::ClientError> for ViewerError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        ViewerError::Rpc(err.to_string())
    }
}

impl From<toml::de::Error> for ViewerError {
    fn from(err: toml::de::Error) -> Self {
        ViewerError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        ViewerError::Config(err.to_string())
    }
}
