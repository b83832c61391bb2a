//! # CLMM Position Viewer
//!
//! Fetches the accounts behind a Raydium CLMM position NFT over JSON RPC
//! and values the position with `clmm-core`.

pub mod config;
pub mod error;
pub mod reader;
pub mod source;
pub mod tokens;

pub use config::{TokenConfig, ViewerConfig};
pub use error::{ViewerError, ViewerResult};
pub use reader::{LoadedPosition, PositionReader};
pub use source::{AccountSource, RpcAccountSource};
pub use tokens::token_info;
