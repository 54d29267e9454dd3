// File: testing-framework/src/api.rs
//
// Chain API client
//
// Thin client over a NodeApi implementation: signs and submits extrinsics,
// runs dry runs and reads balances. The contract proxies are built on it.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{debug, info};
use showgame_common::{
    config::Balance,
    crypto::{AccountId, Hash, KeyPair},
    time::TimestampMillis,
};
use showgame_daemon::{
    core::Block,
    rpc::{CallRequest, ContractExecResult, ContractInstantiateResult, InstantiateRequest},
    BlockchainError, Extrinsic, ExtrinsicCall, ExtrinsicReceipt, NodeApi,
};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors raised by the client itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// `disconnect` was called on this client
    #[error("API client is disconnected")]
    Disconnected,

    /// The node refused the request
    #[error(transparent)]
    Node(#[from] BlockchainError),
}

/// Connection to a chain node.
///
/// Cloning is cheap and every clone shares the connection state, so
/// disconnecting one disconnects them all.
#[derive(Clone)]
pub struct ApiClient {
    node: Arc<dyn NodeApi>,
    genesis_hash: Hash,
    chain_name: String,
    connected: Arc<AtomicBool>,
    // Nonce lookup and submission must not interleave between clones
    submit_lock: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Connect to `node`, reading its chain info
    pub async fn create(node: Arc<dyn NodeApi>) -> Result<Self, ApiError> {
        let info = node.chain_info().await?;
        info!(
            "Connected to {} v{} at block #{}",
            info.chain_name, info.version, info.best_number
        );

        Ok(Self {
            node,
            genesis_hash: info.genesis_hash,
            chain_name: info.chain_name,
            connected: Arc::new(AtomicBool::new(true)),
            submit_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Close the connection, any later request fails with `Disconnected`
    pub async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            debug!("Disconnected from {}", self.chain_name);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn genesis_hash(&self) -> &Hash {
        &self.genesis_hash
    }

    pub fn chain_name(&self) -> &str {
        &self.chain_name
    }

    fn node(&self) -> Result<&Arc<dyn NodeApi>, ApiError> {
        if !self.is_connected() {
            return Err(ApiError::Disconnected);
        }
        Ok(&self.node)
    }

    pub async fn best_block(&self) -> Result<Block, ApiError> {
        Ok(self.node()?.best_block().await?)
    }

    pub async fn block_timestamp(&self) -> Result<TimestampMillis, ApiError> {
        Ok(self.node()?.block_timestamp().await?)
    }

    pub async fn free_balance(&self, account: &AccountId) -> Result<Balance, ApiError> {
        Ok(self.node()?.free_balance(account).await?)
    }

    pub async fn dry_run_call(&self, request: CallRequest) -> Result<ContractExecResult, ApiError> {
        Ok(self.node()?.dry_run_call(request).await?)
    }

    pub async fn dry_run_instantiate(
        &self,
        request: InstantiateRequest,
    ) -> Result<ContractInstantiateResult, ApiError> {
        Ok(self.node()?.dry_run_instantiate(request).await?)
    }

    /// Sign `call` with the next nonce of `signer` and wait for its block
    pub async fn sign_and_submit(
        &self,
        signer: &KeyPair,
        call: ExtrinsicCall,
    ) -> Result<ExtrinsicReceipt, ApiError> {
        let node = self.node()?;
        let _guard = self.submit_lock.lock().await;

        let nonce = node.nonce(&signer.address()).await?;
        let extrinsic = Extrinsic::sign(signer, &self.genesis_hash, nonce, call);
        debug!(
            "{} submits {} (nonce {})",
            signer.name(),
            extrinsic.call.kind(),
            nonce
        );

        Ok(node.submit_extrinsic(extrinsic).await?)
    }

    /// Native balance transfer
    pub async fn transfer(
        &self,
        signer: &KeyPair,
        dest: AccountId,
        value: Balance,
    ) -> Result<ExtrinsicReceipt, ApiError> {
        self.sign_and_submit(signer, ExtrinsicCall::Transfer { dest, value })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showgame_common::time::PausedClock;
    use showgame_daemon::LocalNode;

    #[tokio::test]
    async fn test_disconnect_rejects_requests() {
        let node = Arc::new(
            LocalNode::builder()
                .with_clock(Arc::new(PausedClock::new(0)))
                .build(),
        );
        let api = ApiClient::create(node).await.unwrap();
        let clone = api.clone();
        let alice = KeyPair::from_seed("//Alice");

        assert!(clone.free_balance(&alice.address()).await.unwrap() > 0);
        api.disconnect().await;
        assert!(!clone.is_connected());
        assert_eq!(
            clone.free_balance(&alice.address()).await,
            Err(ApiError::Disconnected)
        );
    }
}
