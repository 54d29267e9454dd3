use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use showgame_common::{
    config::{Balance, VERSION},
    crypto::{AccountId, Hash},
    time::{Clock, SystemClock, TimestampMillis},
};
use showgame_contracts::{all_codes, ContractCode};
use tokio::sync::RwLock;

use crate::{
    config::NodeConfig,
    core::{
        Block, Blockchain, BlockchainError, CodeRegistry, ContractInfo, Extrinsic,
        ExtrinsicReceipt,
    },
};

use super::{
    CallRequest, ChainInfo, ContractExecResult, ContractInstantiateResult, ContractResult,
    InstantiateRequest, InstantiateReturnValue, NodeApi,
};

/// In process node serving `NodeApi`.
///
/// Extrinsics take the write lock and are applied one at a time, dry runs
/// and reads share the read lock.
pub struct LocalNode {
    chain: RwLock<Blockchain>,
    registry: Arc<CodeRegistry>,
}

impl LocalNode {
    pub fn new(config: NodeConfig, clock: Arc<dyn Clock>) -> Self {
        Self::builder().with_config(config).with_clock(clock).build()
    }

    pub fn builder() -> LocalNodeBuilder {
        LocalNodeBuilder::default()
    }

    pub fn registry(&self) -> &Arc<CodeRegistry> {
        &self.registry
    }

    /// Seal a block without extrinsics so that queries see the current time
    pub async fn seal_empty_block(&self) -> Block {
        let mut chain = self.chain.write().await;
        chain.seal_empty_block().clone()
    }

    pub async fn receipt(&self, extrinsic_hash: &Hash) -> Option<ExtrinsicReceipt> {
        self.chain.read().await.receipt(extrinsic_hash).cloned()
    }

    pub async fn block_by_number(&self, number: u64) -> Result<Block, BlockchainError> {
        self.chain.read().await.block_by_number(number).cloned()
    }

    pub async fn contract_info(&self, account: &AccountId) -> Option<ContractInfo> {
        self.chain.read().await.contract_info(account).copied()
    }
}

#[async_trait]
impl NodeApi for LocalNode {
    async fn chain_info(&self) -> Result<ChainInfo, BlockchainError> {
        let chain = self.chain.read().await;
        let best = chain.best_block();
        Ok(ChainInfo {
            chain_name: chain.config().chain_name.clone(),
            genesis_hash: *chain.genesis_hash(),
            best_number: best.number,
            best_hash: best.hash,
            version: VERSION.to_string(),
        })
    }

    async fn best_block(&self) -> Result<Block, BlockchainError> {
        Ok(self.chain.read().await.best_block().clone())
    }

    async fn block_timestamp(&self) -> Result<TimestampMillis, BlockchainError> {
        Ok(self.chain.read().await.best_block().timestamp)
    }

    async fn free_balance(&self, account: &AccountId) -> Result<Balance, BlockchainError> {
        Ok(self.chain.read().await.free_balance(account))
    }

    async fn nonce(&self, account: &AccountId) -> Result<u64, BlockchainError> {
        Ok(self.chain.read().await.nonce(account))
    }

    async fn dry_run_instantiate(
        &self,
        request: InstantiateRequest,
    ) -> Result<ContractInstantiateResult, BlockchainError> {
        let chain = self.chain.read().await;
        let (output, events) = chain.dry_run_instantiate(
            request.origin,
            request.code_hash,
            request.value,
            request.gas_limit,
            &request.data,
            &request.salt,
        );

        Ok(ContractResult::from_output(output, events).map(|(account_id, result)| {
            InstantiateReturnValue { account_id, result }
        }))
    }

    async fn dry_run_call(
        &self,
        request: CallRequest,
    ) -> Result<ContractExecResult, BlockchainError> {
        let chain = self.chain.read().await;
        let (output, events) = chain.dry_run_call(
            request.origin,
            request.dest,
            request.value,
            request.gas_limit,
            &request.input_data,
        );
        Ok(ContractResult::from_output(output, events))
    }

    async fn submit_extrinsic(
        &self,
        extrinsic: Extrinsic,
    ) -> Result<ExtrinsicReceipt, BlockchainError> {
        self.chain.write().await.apply_extrinsic(extrinsic)
    }
}

/// Configure a `LocalNode` before starting it
pub struct LocalNodeBuilder {
    config: NodeConfig,
    clock: Option<Arc<dyn Clock>>,
    codes: Vec<Arc<dyn ContractCode>>,
    endowments: Vec<(AccountId, Balance)>,
}

impl Default for LocalNodeBuilder {
    fn default() -> Self {
        Self {
            config: NodeConfig::default(),
            clock: None,
            codes: Vec::new(),
            endowments: Vec::new(),
        }
    }
}

impl LocalNodeBuilder {
    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Make a code runnable. Without any, every bundled contract is.
    pub fn with_code(mut self, code: Arc<dyn ContractCode>) -> Self {
        self.codes.push(code);
        self
    }

    pub fn with_endowment(mut self, account: AccountId, amount: Balance) -> Self {
        self.endowments.push((account, amount));
        self
    }

    pub fn build(self) -> LocalNode {
        let codes = if self.codes.is_empty() {
            all_codes()
        } else {
            self.codes
        };
        let registry = Arc::new(CodeRegistry::with_codes(codes));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

        let chain =
            Blockchain::new(self.config, registry.clone(), clock).with_endowments(self.endowments);
        info!("Local node ready at block #{}", chain.best_block().number);

        LocalNode {
            chain: RwLock::new(chain),
            registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DispatchError, ExtrinsicCall};
    use showgame_common::{
        config::DEV_ENDOWMENT,
        contract::Selector,
        crypto::KeyPair,
        time::PausedClock,
    };
    use showgame_contracts::{psp34, MyPsp34};

    fn node() -> (LocalNode, Arc<PausedClock>) {
        let clock = Arc::new(PausedClock::new(1_000));
        let node = LocalNode::builder().with_clock(clock.clone()).build();
        (node, clock)
    }

    #[tokio::test]
    async fn test_chain_info() {
        let (node, _) = node();
        let info = node.chain_info().await.unwrap();
        assert_eq!(info.best_number, 0);
        assert_eq!(info.genesis_hash, NodeConfig::default().genesis_hash());
        assert_eq!(node.block_timestamp().await.unwrap(), 1_000);
    }

    #[tokio::test]
    async fn test_dry_run_instantiate_before_upload() {
        let (node, _) = node();
        let alice = KeyPair::from_seed("//Alice");
        let result = node
            .dry_run_instantiate(InstantiateRequest {
                origin: alice.address(),
                value: 0,
                gas_limit: None,
                code_hash: MyPsp34.code_hash(),
                data: Selector::from_label(psp34::CONSTRUCTOR_NEW).to_vec(),
                salt: Vec::new(),
            })
            .await
            .unwrap();
        assert!(result.result.is_ok());
        assert_eq!(result.gas_consumed, result.gas_required);

        // Nothing was written
        let info = node.chain_info().await.unwrap();
        assert_eq!(info.best_number, 0);
    }

    #[tokio::test]
    async fn test_submit_and_seal() {
        let (node, clock) = node();
        let alice = KeyPair::from_seed("//Alice");
        let genesis = node.chain_info().await.unwrap().genesis_hash;
        let dest = KeyPair::generate().address();

        let extrinsic =
            Extrinsic::sign(&alice, &genesis, 0, ExtrinsicCall::Transfer { dest, value: 7 });
        let receipt = node.submit_extrinsic(extrinsic).await.unwrap();
        assert!(receipt.is_success());
        assert_eq!(node.free_balance(&dest).await.unwrap(), 7);
        assert_eq!(node.free_balance(&alice.address()).await.unwrap(), DEV_ENDOWMENT - 7);
        assert_eq!(node.nonce(&alice.address()).await.unwrap(), 1);
        assert_eq!(node.receipt(&receipt.extrinsic_hash).await, Some(receipt));

        clock.advance_millis(5_000);
        let block = node.seal_empty_block().await;
        assert_eq!(block.timestamp, 6_000);
        assert_eq!(node.block_timestamp().await.unwrap(), 6_000);
    }

    #[tokio::test]
    async fn test_transfer_insufficient_balance_is_included() {
        let (node, _) = node();
        let stranger = KeyPair::generate();
        let alice = KeyPair::from_seed("//Alice");
        let genesis = node.chain_info().await.unwrap().genesis_hash;

        let extrinsic = Extrinsic::sign(
            &stranger,
            &genesis,
            0,
            ExtrinsicCall::Transfer {
                dest: alice.address(),
                value: 1,
            },
        );
        let receipt = node.submit_extrinsic(extrinsic).await.unwrap();
        assert!(matches!(
            receipt.result,
            Err(DispatchError::Blockchain(BlockchainError::InsufficientBalance { .. }))
        ));
        assert_eq!(node.nonce(&stranger.address()).await.unwrap(), 1);
    }
}
