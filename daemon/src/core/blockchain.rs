use std::{collections::HashMap, sync::Arc};

use log::{debug, info};
use showgame_common::{
    config::{Balance, DEV_SEEDS},
    contract::{EventRecord, ExecReturnValue},
    crypto::{AccountId, Hash, KeyPair},
    serializer::Serializer,
    time::{Clock, TimestampMillis},
};

use crate::config::{NodeConfig, MAX_EXTRINSIC_SIZE};

use super::{
    block::{Block, DispatchOutcome, Extrinsic, ExtrinsicCall, ExtrinsicReceipt},
    error::BlockchainError,
    executor::{BlockContext, ExecContext, ExecOutput},
    registry::CodeRegistry,
    state::{ChainState, ContractInfo},
};

/// Single node, instant seal chain.
///
/// Every accepted extrinsic is executed and sealed in its own block right
/// away. Dry runs execute against the best block and never touch state.
pub struct Blockchain {
    config: NodeConfig,
    genesis_hash: Hash,
    state: ChainState,
    blocks: Vec<Block>,
    receipts: HashMap<Hash, ExtrinsicReceipt>,
    registry: Arc<CodeRegistry>,
    clock: Arc<dyn Clock>,
}

impl Blockchain {
    pub fn new(config: NodeConfig, registry: Arc<CodeRegistry>, clock: Arc<dyn Clock>) -> Self {
        let genesis_hash = config.genesis_hash();
        let mut state = ChainState::new();
        if config.endow_dev_accounts {
            for seed in DEV_SEEDS {
                let account = KeyPair::from_seed(seed).address();
                state.endow(account, config.dev_endowment);
            }
        }

        let genesis = Block::genesis(genesis_hash, clock.now_millis());
        info!(
            "Starting chain {} (genesis {}, {} codes available)",
            config.chain_name,
            genesis_hash,
            registry.len()
        );

        Self {
            config,
            genesis_hash,
            state,
            blocks: vec![genesis],
            receipts: HashMap::new(),
            registry,
            clock,
        }
    }

    /// Extra genesis balances on top of the dev accounts
    pub fn with_endowments<I>(mut self, endowments: I) -> Self
    where
        I: IntoIterator<Item = (AccountId, Balance)>,
    {
        for (account, amount) in endowments {
            self.state.endow(account, amount);
        }
        self
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn genesis_hash(&self) -> &Hash {
        &self.genesis_hash
    }

    pub fn registry(&self) -> &Arc<CodeRegistry> {
        &self.registry
    }

    pub fn best_block(&self) -> &Block {
        // The genesis block is always present
        &self.blocks[self.blocks.len() - 1]
    }

    pub fn block_by_number(&self, number: u64) -> Result<&Block, BlockchainError> {
        self.blocks
            .get(number as usize)
            .ok_or(BlockchainError::BlockNotFound(number))
    }

    pub fn receipt(&self, extrinsic_hash: &Hash) -> Option<&ExtrinsicReceipt> {
        self.receipts.get(extrinsic_hash)
    }

    pub fn free_balance(&self, account: &AccountId) -> Balance {
        self.state.balance(account)
    }

    pub fn nonce(&self, account: &AccountId) -> u64 {
        self.state.nonce(account)
    }

    pub fn contract_info(&self, account: &AccountId) -> Option<&ContractInfo> {
        self.state.contract(account)
    }

    pub fn contracts_count(&self) -> usize {
        self.state.contracts_count()
    }

    /// Context of the block being built: timestamps always move forward
    /// by at least the configured block time
    fn next_block_context(&self) -> BlockContext {
        let best = self.best_block();
        let min_timestamp = best.timestamp.saturating_add(self.config.block_time_ms.max(1));
        BlockContext {
            number: best.number + 1,
            timestamp: self.clock.now_millis().max(min_timestamp),
        }
    }

    // Dry runs see the state and the time of the best block
    fn best_block_context(&self) -> BlockContext {
        let best = self.best_block();
        BlockContext {
            number: best.number,
            timestamp: best.timestamp,
        }
    }

    fn seal(&mut self, context: BlockContext, extrinsics: Vec<Hash>) -> &Block {
        let parent_hash = self.best_block().hash;
        let block = Block::new(context.number, parent_hash, context.timestamp, extrinsics);
        debug!(
            "Sealed block #{} {} at {} with {} extrinsic(s)",
            block.number,
            block.hash,
            block.timestamp,
            block.extrinsics.len()
        );
        self.blocks.push(block);
        self.best_block()
    }

    /// Seal a block without extrinsics, used to let time pass on chain
    pub fn seal_empty_block(&mut self) -> &Block {
        let context = self.next_block_context();
        self.seal(context, Vec::new())
    }

    /// Execute a constructor against the best block, discarding every change
    pub fn dry_run_instantiate(
        &self,
        origin: AccountId,
        code_hash: Hash,
        value: Balance,
        gas_limit: Option<u64>,
        data: &[u8],
        salt: &[u8],
    ) -> (ExecOutput<(AccountId, ExecReturnValue)>, Vec<EventRecord>) {
        let gas_limit = gas_limit.unwrap_or(self.config.default_gas_limit);
        let mut ctx =
            ExecContext::new(&self.state, self.registry.clone(), self.best_block_context());
        // Clients dry run before uploading, pretend the code is on chain
        if !ctx.cache().is_code_stored(&code_hash) && self.registry.contains(&code_hash) {
            ctx.cache_mut().store_code(code_hash);
        }
        let output = ctx.instantiate(origin, code_hash, value, gas_limit, data, salt);
        let (_, events) = ctx.into_parts();
        (output, events)
    }

    /// Execute a message against the best block, discarding every change
    pub fn dry_run_call(
        &self,
        origin: AccountId,
        dest: AccountId,
        value: Balance,
        gas_limit: Option<u64>,
        data: &[u8],
    ) -> (ExecOutput<ExecReturnValue>, Vec<EventRecord>) {
        let gas_limit = gas_limit.unwrap_or(self.config.default_gas_limit);
        let mut ctx =
            ExecContext::new(&self.state, self.registry.clone(), self.best_block_context());
        let output = ctx.call(origin, dest, value, gas_limit, data);
        let (_, events) = ctx.into_parts();
        (output, events)
    }

    /// Check an extrinsic, execute it and seal it in a new block.
    ///
    /// A rejected extrinsic (bad signature, bad nonce, oversized) returns an
    /// error and is not included. A failing dispatch is included: its nonce
    /// is consumed and its receipt carries the error.
    pub fn apply_extrinsic(
        &mut self,
        extrinsic: Extrinsic,
    ) -> Result<ExtrinsicReceipt, BlockchainError> {
        let size = extrinsic.size();
        if size > MAX_EXTRINSIC_SIZE {
            return Err(BlockchainError::ExtrinsicTooLarge {
                size,
                max: MAX_EXTRINSIC_SIZE,
            });
        }

        extrinsic
            .verify(&self.genesis_hash)
            .map_err(|error| BlockchainError::InvalidSignature {
                account: extrinsic.signer,
                error,
            })?;

        let expected = self.state.nonce(&extrinsic.signer);
        if extrinsic.nonce != expected {
            return Err(BlockchainError::InvalidNonce {
                account: extrinsic.signer,
                expected,
                got: extrinsic.nonce,
            });
        }

        let extrinsic_hash = extrinsic.hash();
        let context = self.next_block_context();
        debug!(
            "Applying {} extrinsic {} from {} (nonce {})",
            extrinsic.call.kind(),
            extrinsic_hash,
            extrinsic.signer,
            extrinsic.nonce
        );

        let (result, gas_consumed, changes, events) = {
            let mut ctx = ExecContext::new(&self.state, self.registry.clone(), context);
            ctx.cache_mut().set_nonce(extrinsic.signer, expected + 1);

            let signer = extrinsic.signer;
            let (result, gas_consumed) = match &extrinsic.call {
                ExtrinsicCall::UploadCode { code_hash } => (
                    ctx.upload_code(*code_hash).map(|_| DispatchOutcome::CodeStored {
                        code_hash: *code_hash,
                    }),
                    0,
                ),
                ExtrinsicCall::Instantiate {
                    code_hash,
                    value,
                    gas_limit,
                    data,
                    salt,
                } => {
                    let output =
                        ctx.instantiate(signer, *code_hash, *value, *gas_limit, data, salt);
                    (
                        output.result.map(|(contract, result)| {
                            DispatchOutcome::Instantiated { contract, result }
                        }),
                        output.gas_consumed,
                    )
                }
                ExtrinsicCall::Call {
                    dest,
                    value,
                    gas_limit,
                    data,
                } => {
                    let output = ctx.call(signer, *dest, *value, *gas_limit, data);
                    (
                        output.result.map(|result| DispatchOutcome::Called { result }),
                        output.gas_consumed,
                    )
                }
                ExtrinsicCall::Transfer { dest, value } => (
                    ctx.transfer(&signer, dest, *value)
                        .map(|_| DispatchOutcome::Transferred),
                    0,
                ),
            };

            let (changes, events) = ctx.into_parts();
            (result, gas_consumed, changes, events)
        };

        if let Err(e) = &result {
            debug!("Extrinsic {} failed: {}", extrinsic_hash, e);
        }

        // Failed frames already rolled back, only the nonce bump is left of them
        self.state.apply(changes);
        let block_hash = self.seal(context, vec![extrinsic_hash]).hash;

        let receipt = ExtrinsicReceipt {
            extrinsic_hash,
            block_number: context.number,
            block_hash,
            signer: extrinsic.signer,
            events: if result.is_ok() { events } else { Vec::new() },
            result,
            gas_consumed,
        };
        self.receipts.insert(extrinsic_hash, receipt.clone());
        Ok(receipt)
    }

    pub fn now(&self) -> TimestampMillis {
        self.clock.now_millis()
    }
}
