use std::fs;
use std::str::FromStr;

use clmm_core::CLMM_PROGRAM_ID;
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

use crate::error::{ViewerError, ViewerResult};

/// Viewer configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewerConfig {
    /// JSON RPC endpoint
    pub rpc_url: String,

    /// Commitment level for account reads
    pub commitment: String,

    /// CLMM program ID
    #[serde(with = "pubkey_serde")]
    pub program_id: Pubkey,

    /// Display labels for known mints
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

/// Display label for one mint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    #[serde(with = "pubkey_serde")]
    pub address: Pubkey,
    pub symbol: String,
    pub name: String,
}

impl ViewerConfig {
    /// Load configuration from TOML file
    pub fn load(path: &str) -> ViewerResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ViewerError::Config(format!("Failed to read config file {}: {}", path, e)))?;

        let config = Self::from_toml(&content)
            .map_err(|e| ViewerError::Config(format!("Failed to load config file {}: {}", path, e)))?;

        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> ViewerResult<Self> {
        let config: ViewerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> ViewerResult<()> {
        if self.rpc_url.is_empty() {
            return Err(ViewerError::Config("rpc_url must not be empty".to_string()));
        }

        self.commitment_config()?;

        for token in &self.tokens {
            if token.symbol.is_empty() {
                return Err(ViewerError::Config(format!(
                    "token {} has an empty symbol",
                    token.address
                )));
            }
        }

        let mut addresses: Vec<_> = self.tokens.iter().map(|t| t.address).collect();
        addresses.sort();
        if addresses.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(ViewerError::Config("duplicate token address".to_string()));
        }

        Ok(())
    }

    /// Commitment level parsed from the config string
    pub fn commitment_config(&self) -> ViewerResult<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(ViewerError::Config(format!(
                "commitment must be processed, confirmed or finalized, got {}",
                other
            ))),
        }
    }

    /// Display label for `mint`, if configured
    pub fn token(&self, mint: &Pubkey) -> Option<&TokenConfig> {
        self.tokens.iter().find(|t| t.address == *mint)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            program_id: CLMM_PROGRAM_ID,
            tokens: vec![
                TokenConfig {
                    address: spl_token::native_mint::ID,
                    symbol: "WSOL".to_string(),
                    name: "Wrapped SOL".to_string(),
                },
                TokenConfig {
                    address: solana_sdk::pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
                    symbol: "USDC".to_string(),
                    name: "USD Coin".to_string(),
                },
            ],
        }
    }
}

// Custom serde module for Pubkey
mod pubkey_serde {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&pubkey.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.program_id, CLMM_PROGRAM_ID);
        assert_eq!(config.token(&spl_token::native_mint::ID).unwrap().symbol, "WSOL");
    }

    #[test]
    fn test_parse_toml() {
        let config = ViewerConfig::from_toml(
            r#"
            rpc_url = "https://api.devnet.solana.com"
            commitment = "finalized"
            program_id = "devi51mZmdwUJGU9hjN27vEz64Gps7uUefqxg27EAtH"

            [[tokens]]
            address = "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R"
            symbol = "RAY"
            name = "Raydium"
            "#,
        )
        .unwrap();

        assert_eq!(config.program_id, clmm_core::DEVNET_CLMM_PROGRAM_ID);
        assert_eq!(config.commitment_config().unwrap(), CommitmentConfig::finalized());
        assert_eq!(config.tokens.len(), 1);
        assert_eq!(config.tokens[0].symbol, "RAY");
    }

    #[test]
    fn test_config_validation() {
        let mut config = ViewerConfig::default();
        config.commitment = "eventually".to_string();
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        let duplicate = config.tokens[0].clone();
        config.tokens.push(duplicate);
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.rpc_url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_pubkey() {
        let result = ViewerConfig::from_toml(
            r#"
            rpc_url = "http://localhost:8899"
            commitment = "confirmed"
            program_id = "not-a-key"
            "#,
        );
        assert!(matches!(result, Err(ViewerError::Config(_))));
    }
}
