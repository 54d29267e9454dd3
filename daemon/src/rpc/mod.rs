// Node API as seen by clients.
//
// The e2e suites only talk to the chain through NodeApi, so another
// transport can be plugged in without touching them. LocalNode serves it
// in process.

mod local;

pub use local::{LocalNode, LocalNodeBuilder};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use showgame_common::{
    config::Balance,
    contract::{EventRecord, ExecReturnValue},
    crypto::{AccountId, Hash},
    time::TimestampMillis,
};

use crate::core::{Block, BlockchainError, DispatchError, ExecOutput, Extrinsic, ExtrinsicReceipt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub chain_name: String,
    pub genesis_hash: Hash,
    pub best_number: u64,
    pub best_hash: Hash,
    pub version: String,
}

/// Dry run of a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRequest {
    pub origin: AccountId,
    pub dest: AccountId,
    #[serde(default)]
    pub value: Balance,
    // None uses the node default
    #[serde(default)]
    pub gas_limit: Option<u64>,
    #[serde(with = "hex")]
    pub input_data: Vec<u8>,
}

/// Dry run of a constructor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateRequest {
    pub origin: AccountId,
    #[serde(default)]
    pub value: Balance,
    #[serde(default)]
    pub gas_limit: Option<u64>,
    pub code_hash: Hash,
    #[serde(with = "hex")]
    pub data: Vec<u8>,
    #[serde(with = "hex")]
    pub salt: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantiateReturnValue {
    pub account_id: AccountId,
    pub result: ExecReturnValue,
}

/// Outcome of a dry run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractResult<T> {
    pub gas_consumed: u64,
    // Nothing is refunded, so this always equals gas_consumed
    pub gas_required: u64,
    pub result: Result<T, DispatchError>,
    pub events: Vec<EventRecord>,
}

pub type ContractExecResult = ContractResult<ExecReturnValue>;
pub type ContractInstantiateResult = ContractResult<InstantiateReturnValue>;

impl<T> ContractResult<T> {
    pub(crate) fn from_output(output: ExecOutput<T>, events: Vec<EventRecord>) -> Self {
        Self {
            gas_consumed: output.gas_consumed,
            gas_required: output.gas_consumed,
            result: output.result,
            events,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ContractResult<U> {
        ContractResult {
            gas_consumed: self.gas_consumed,
            gas_required: self.gas_required,
            result: self.result.map(f),
            events: self.events,
        }
    }
}

#[async_trait]
pub trait NodeApi: Send + Sync {
    async fn chain_info(&self) -> Result<ChainInfo, BlockchainError>;

    async fn best_block(&self) -> Result<Block, BlockchainError>;

    /// Timestamp of the best block, the time queries execute at
    async fn block_timestamp(&self) -> Result<TimestampMillis, BlockchainError>;

    async fn free_balance(&self, account: &AccountId) -> Result<Balance, BlockchainError>;

    /// Next nonce expected from `account`
    async fn nonce(&self, account: &AccountId) -> Result<u64, BlockchainError>;

    async fn dry_run_instantiate(
        &self,
        request: InstantiateRequest,
    ) -> Result<ContractInstantiateResult, BlockchainError>;

    async fn dry_run_call(
        &self,
        request: CallRequest,
    ) -> Result<ContractExecResult, BlockchainError>;

    /// Submit an extrinsic and wait until it is sealed
    async fn submit_extrinsic(
        &self,
        extrinsic: Extrinsic,
    ) -> Result<ExtrinsicReceipt, BlockchainError>;
}
