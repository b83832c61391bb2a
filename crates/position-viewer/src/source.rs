//! Account access used by the position reader

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

use crate::error::ViewerResult;

/// Read-only view of chain state
#[async_trait::async_trait]
pub trait AccountSource: Send + Sync {
    /// Fetch one account; `None` when it does not exist
    async fn get_account(&self, address: &Pubkey) -> ViewerResult<Option<Account>>;

    /// Fetch several accounts in one round trip, in request order
    async fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> ViewerResult<Vec<Option<Account>>>;

    /// Current epoch
    async fn get_epoch(&self) -> ViewerResult<u64>;
}

/// [`AccountSource`] over the nonblocking JSON RPC client
pub struct RpcAccountSource {
    client: RpcClient,
    commitment: CommitmentConfig,
}

impl RpcAccountSource {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url, commitment),
            commitment,
        }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait::async_trait]
impl AccountSource for RpcAccountSource {
    async fn get_account(&self, address: &Pubkey) -> ViewerResult<Option<Account>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.commitment)
            .await?;
        log::debug!(
            "fetched {} at slot {}: {}",
            address,
            response.context.slot,
            if response.value.is_some() { "found" } else { "missing" }
        );
        Ok(response.value)
    }

    async fn get_multiple_accounts(&self, addresses: &[Pubkey]) -> ViewerResult<Vec<Option<Account>>> {
        let response = self
            .client
            .get_multiple_accounts_with_commitment(addresses, self.commitment)
            .await?;
        log::debug!(
            "fetched {} accounts at slot {}",
            addresses.len(),
            response.context.slot
        );
        Ok(response.value)
    }

    async fn get_epoch(&self) -> ViewerResult<u64> {
        let epoch_info = self
            .client
            .get_epoch_info_with_commitment(self.commitment)
            .await?;
        Ok(epoch_info.epoch)
    }
}
