use showgame_common::{
    config::Balance,
    contract::{ContractEvent, ExecReturnValue, Selector},
    crypto::{AccountId, Hash},
    time::TimestampMillis,
};

use crate::error::EnvError;

/// Parameters of a cross contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallParams {
    pub callee: AccountId,
    pub selector: Selector,
    pub input: Vec<u8>,
    pub value: Balance,
    /// Zero forwards all of the remaining gas
    pub gas_limit: u64,
}

/// Host functions available to a running contract.
///
/// Every call frame gets its own environment: `caller`, `account_id` and
/// `transferred_value` describe the current frame, storage is scoped to
/// `account_id`.
pub trait Environment {
    fn caller(&self) -> AccountId;

    fn account_id(&self) -> AccountId;

    fn transferred_value(&self) -> Balance;

    fn block_number(&self) -> u64;

    fn block_timestamp(&self) -> TimestampMillis;

    /// Free balance of the current contract
    fn balance(&self) -> Balance;

    fn gas_left(&self) -> u64;

    fn get_storage(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, EnvError>;

    fn set_storage(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), EnvError>;

    fn clear_storage(&mut self, key: &[u8]) -> Result<(), EnvError>;

    /// Call another contract (or this one) in a nested frame.
    ///
    /// A callee that reverts is returned as `Ok` with `reverted` set and its
    /// changes discarded. A callee that traps is returned as
    /// `EnvError::CalleeTrapped`, its changes discarded as well.
    fn invoke_contract(&mut self, params: CallParams) -> Result<ExecReturnValue, EnvError>;

    fn emit_event(&mut self, name: &str, topics: Vec<Hash>, data: Vec<u8>) -> Result<(), EnvError>;
}

/// Typed helpers on top of the raw host functions
pub trait EnvExt: Environment {
    fn emit<E: ContractEvent>(&mut self, event: &E) -> Result<(), EnvError> {
        self.emit_event(event.name(), event.topics(), event.to_bytes())
    }
}

impl<T: Environment + ?Sized> EnvExt for T {}
