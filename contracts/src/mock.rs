// In-memory host used by the contract unit tests.
//
// Nested calls run against the same storage; a frame that reverts or traps
// restores the snapshot taken when it started.

use std::{collections::HashMap, sync::Arc};

use showgame_common::{
    config::{Balance, MAX_CALL_DEPTH},
    contract::{EventRecord, ExecReturnValue, Selector},
    crypto::{AccountId, Hash},
    time::TimestampMillis,
};

use crate::{
    code::ContractCode,
    env::{CallParams, Environment},
    error::{EnvError, ExecError},
};

type StorageKey = (AccountId, Vec<u8>);

struct Frame {
    caller: AccountId,
    account_id: AccountId,
    value: Balance,
}

pub struct MockEnvironment {
    storage: HashMap<StorageKey, Vec<u8>>,
    contracts: HashMap<AccountId, Arc<dyn ContractCode>>,
    frames: Vec<Frame>,
    pub timestamp: TimestampMillis,
    pub block_number: u64,
    pub events: Vec<EventRecord>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            storage: HashMap::new(),
            contracts: HashMap::new(),
            frames: Vec::new(),
            timestamp: 1_000,
            block_number: 1,
            events: Vec::new(),
        }
    }

    pub fn deploy(
        &mut self,
        code: Arc<dyn ContractCode>,
        deployer: AccountId,
        address: AccountId,
        constructor: &str,
        input: &[u8],
    ) -> Result<ExecReturnValue, ExecError> {
        self.contracts.insert(address, code.clone());
        let selector = Selector::from_label(constructor);
        let result = self.run(deployer, address, 0, |env| code.deploy(env, selector, input));
        if !matches!(result, Ok(ref value) if !value.reverted) {
            self.contracts.remove(&address);
        }
        result
    }

    /// Call `message` on `callee` as `caller`
    pub fn call(
        &mut self,
        caller: AccountId,
        callee: AccountId,
        message: &str,
        input: &[u8],
    ) -> Result<ExecReturnValue, ExecError> {
        self.call_selector(caller, callee, Selector::from_label(message), input, 0)
    }

    fn call_selector(
        &mut self,
        caller: AccountId,
        callee: AccountId,
        selector: Selector,
        input: &[u8],
        value: Balance,
    ) -> Result<ExecReturnValue, ExecError> {
        let code = self
            .contracts
            .get(&callee)
            .cloned()
            .ok_or(EnvError::ContractNotFound(callee))?;
        self.run(caller, callee, value, |env| code.call(env, selector, input))
    }

    fn run<F>(
        &mut self,
        caller: AccountId,
        account_id: AccountId,
        value: Balance,
        f: F,
    ) -> Result<ExecReturnValue, ExecError>
    where
        F: FnOnce(&mut dyn Environment) -> Result<ExecReturnValue, ExecError>,
    {
        if self.frames.len() >= MAX_CALL_DEPTH {
            return Err(EnvError::CallDepthExceeded {
                depth: self.frames.len() + 1,
                max_depth: MAX_CALL_DEPTH,
            }
            .into());
        }

        let snapshot = self.storage.clone();
        let events = self.events.len();
        self.frames.push(Frame {
            caller,
            account_id,
            value,
        });
        let result = f(self);
        self.frames.pop();

        if !matches!(result, Ok(ref value) if !value.reverted) {
            self.storage = snapshot;
            self.events.truncate(events);
        }
        result
    }

    fn frame(&self) -> &Frame {
        // Host functions are only reachable from inside `run`
        &self.frames[self.frames.len() - 1]
    }

    pub fn events_named(&self, name: &str) -> Vec<&EventRecord> {
        self.events.iter().filter(|e| e.name == name).collect()
    }
}

impl Environment for MockEnvironment {
    fn caller(&self) -> AccountId {
        self.frame().caller
    }

    fn account_id(&self) -> AccountId {
        self.frame().account_id
    }

    fn transferred_value(&self) -> Balance {
        self.frame().value
    }

    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn block_timestamp(&self) -> TimestampMillis {
        self.timestamp
    }

    fn balance(&self) -> Balance {
        0
    }

    fn gas_left(&self) -> u64 {
        u64::MAX
    }

    fn get_storage(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, EnvError> {
        let account = self.account_id();
        Ok(self.storage.get(&(account, key.to_vec())).cloned())
    }

    fn set_storage(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), EnvError> {
        let account = self.account_id();
        self.storage.insert((account, key.to_vec()), value);
        Ok(())
    }

    fn clear_storage(&mut self, key: &[u8]) -> Result<(), EnvError> {
        let account = self.account_id();
        self.storage.remove(&(account, key.to_vec()));
        Ok(())
    }

    fn invoke_contract(&mut self, params: CallParams) -> Result<ExecReturnValue, EnvError> {
        let caller = self.account_id();
        self.call_selector(
            caller,
            params.callee,
            params.selector,
            &params.input,
            params.value,
        )
        .map_err(|e| EnvError::CalleeTrapped(e.to_string()))
    }

    fn emit_event(&mut self, name: &str, topics: Vec<Hash>, data: Vec<u8>) -> Result<(), EnvError> {
        let emitter = self.account_id();
        self.events.push(EventRecord {
            emitter,
            name: name.to_string(),
            topics,
            data,
        });
        Ok(())
    }
}
