// Contract execution on top of a StateCache.
//
// Every call frame, the top level one included, opens a cache checkpoint
// before running. A frame that returns normally commits it, a frame that
// reverts or traps rolls it back together with the events it emitted, so
// a failing nested call never leaks state into its caller.

use std::sync::Arc;

use log::{debug, log_enabled, trace, Level};
use showgame_common::{
    config::{
        Balance, GAS_BASE_CALL, GAS_BASE_INSTANTIATE, GAS_EVENT, GAS_PER_BYTE, GAS_STORAGE_READ,
        GAS_STORAGE_WRITE, MAX_CALL_DEPTH, MAX_CALL_INPUT_SIZE, MAX_STORAGE_VALUE_SIZE,
    },
    contract::{split_call_data, EventRecord, ExecReturnValue, Selector},
    crypto::{hash_parts, AccountId, Hash},
    time::TimestampMillis,
};
use showgame_contracts::{CallParams, ContractCode, EnvError, Environment, ExecError};

use crate::config::{CONTRACT_ADDRESS_DOMAIN, MAX_SALT_SIZE};

use super::{
    cache::{StateCache, StateChanges},
    error::{BlockchainError, DispatchError},
    gas::GasMeter,
    registry::CodeRegistry,
    state::{ChainState, ContractInfo},
};

/// Block the execution happens in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext {
    pub number: u64,
    pub timestamp: TimestampMillis,
}

/// Result of a top level execution with the gas it used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput<T> {
    pub result: Result<T, DispatchError>,
    pub gas_consumed: u64,
}

/// Address of a contract instantiated by `deployer` from `code_hash`
pub fn contract_address(deployer: &AccountId, code_hash: &Hash, salt: &[u8]) -> AccountId {
    hash_parts(&[
        CONTRACT_ADDRESS_DOMAIN,
        deployer.as_bytes(),
        code_hash.as_bytes(),
        salt,
    ])
    .into()
}

enum Entry {
    Deploy { code_hash: Hash, deployer: AccountId },
    Call,
}

pub struct ExecContext<'a> {
    cache: StateCache<'a>,
    registry: Arc<CodeRegistry>,
    block: BlockContext,
    events: Vec<EventRecord>,
}

impl<'a> ExecContext<'a> {
    pub fn new(state: &'a ChainState, registry: Arc<CodeRegistry>, block: BlockContext) -> Self {
        Self {
            cache: StateCache::new(state),
            registry,
            block,
            events: Vec::new(),
        }
    }

    pub fn cache(&self) -> &StateCache<'a> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut StateCache<'a> {
        &mut self.cache
    }

    pub fn block(&self) -> &BlockContext {
        &self.block
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Final state changes and the events emitted by successful frames
    pub fn into_parts(self) -> (StateChanges, Vec<EventRecord>) {
        (self.cache.into_changes(), self.events)
    }

    pub fn upload_code(&mut self, code_hash: Hash) -> Result<(), DispatchError> {
        if !self.registry.contains(&code_hash) {
            return Err(BlockchainError::CodeNotAvailable(code_hash).into());
        }
        self.cache.store_code(code_hash);
        Ok(())
    }

    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        value: Balance,
    ) -> Result<(), DispatchError> {
        self.cache.transfer(from, to, value).map_err(|available| {
            BlockchainError::InsufficientBalance {
                account: *from,
                required: value,
                available,
            }
            .into()
        })
    }

    /// Create a contract from an uploaded code and run its constructor
    pub fn instantiate(
        &mut self,
        deployer: AccountId,
        code_hash: Hash,
        value: Balance,
        gas_limit: u64,
        data: &[u8],
        salt: &[u8],
    ) -> ExecOutput<(AccountId, ExecReturnValue)> {
        let mut gas_consumed = 0;
        let result = self.try_instantiate(
            deployer,
            code_hash,
            value,
            gas_limit,
            data,
            salt,
            &mut gas_consumed,
        );
        ExecOutput {
            result,
            gas_consumed,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn try_instantiate(
        &mut self,
        deployer: AccountId,
        code_hash: Hash,
        value: Balance,
        gas_limit: u64,
        data: &[u8],
        salt: &[u8],
        gas_consumed: &mut u64,
    ) -> Result<(AccountId, ExecReturnValue), DispatchError> {
        if salt.len() > MAX_SALT_SIZE {
            return Err(BlockchainError::SaltTooLarge {
                size: salt.len(),
                max: MAX_SALT_SIZE,
            }
            .into());
        }

        if !self.cache.is_code_stored(&code_hash) {
            return Err(BlockchainError::CodeNotUploaded(code_hash).into());
        }

        let code = self
            .registry
            .get(&code_hash)
            .ok_or(BlockchainError::CodeNotAvailable(code_hash))?;

        let address = contract_address(&deployer, &code_hash, salt);
        if self.cache.contract(&address).is_some() {
            return Err(BlockchainError::ContractAlreadyExists(address).into());
        }

        let (selector, input) = split_call_data(data).map_err(ExecError::InvalidInput)?;
        debug!(
            "Instantiating {} at {} from {}",
            code.abi().name,
            address,
            deployer
        );

        let (result, used) = self.execute(
            Entry::Deploy {
                code_hash,
                deployer,
            },
            code,
            deployer,
            address,
            value,
            selector,
            input,
            GasMeter::new(gas_limit),
            0,
        );
        *gas_consumed = used;

        let value = into_dispatch(result)?;
        Ok((address, value))
    }

    /// Call a message of an existing contract
    pub fn call(
        &mut self,
        origin: AccountId,
        dest: AccountId,
        value: Balance,
        gas_limit: u64,
        data: &[u8],
    ) -> ExecOutput<ExecReturnValue> {
        let mut gas_consumed = 0;
        let result = self.try_call(origin, dest, value, gas_limit, data, &mut gas_consumed);
        ExecOutput {
            result,
            gas_consumed,
        }
    }

    fn try_call(
        &mut self,
        origin: AccountId,
        dest: AccountId,
        value: Balance,
        gas_limit: u64,
        data: &[u8],
        gas_consumed: &mut u64,
    ) -> Result<ExecReturnValue, DispatchError> {
        let info = self
            .cache
            .contract(&dest)
            .ok_or(BlockchainError::ContractNotFound(dest))?;
        let code = self
            .registry
            .get(&info.code_hash)
            .ok_or(BlockchainError::CodeNotAvailable(info.code_hash))?;

        let (selector, input) = split_call_data(data).map_err(ExecError::InvalidInput)?;
        if log_enabled!(Level::Debug) {
            let label = code
                .abi()
                .find_message_by_selector(&selector)
                .map(|m| m.label.clone())
                .unwrap_or_else(|| selector.to_string());
            debug!("Calling {} on {} from {}", label, dest, origin);
        }

        let (result, used) = self.execute(
            Entry::Call,
            code,
            origin,
            dest,
            value,
            selector,
            input,
            GasMeter::new(gas_limit),
            0,
        );
        *gas_consumed = used;

        into_dispatch(result)
    }

    // Run one frame inside its own checkpoint, returns the gas it used
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &mut self,
        entry: Entry,
        code: Arc<dyn ContractCode>,
        caller: AccountId,
        callee: AccountId,
        value: Balance,
        selector: Selector,
        input: &[u8],
        gas: GasMeter,
        depth: usize,
    ) -> (Result<ExecReturnValue, ExecError>, u64) {
        let events_len = self.events.len();
        self.cache.checkpoint();

        let mut frame = CallFrame {
            ctx: self,
            caller,
            account_id: callee,
            value,
            gas,
            depth,
        };
        let result = frame.run(&entry, code.as_ref(), selector, input);
        let used = frame.gas.used();

        match &result {
            Ok(value) if !value.reverted => self.cache.commit(),
            _ => {
                self.cache.rollback();
                self.events.truncate(events_len);
            }
        }

        if log_enabled!(Level::Trace) {
            let outcome = match &result {
                Ok(value) if value.reverted => "reverted".to_string(),
                Ok(_) => "ok".to_string(),
                Err(e) => format!("trapped: {}", e),
            };
            trace!(
                "frame {} at depth {} used {} gas: {}",
                callee,
                depth,
                used,
                outcome
            );
        }

        (result, used)
    }
}

fn into_dispatch(
    result: Result<ExecReturnValue, ExecError>,
) -> Result<ExecReturnValue, DispatchError> {
    match result {
        Ok(value) if value.reverted => Err(DispatchError::ContractReverted { data: value.data }),
        Ok(value) => Ok(value),
        Err(err) => Err(DispatchError::ContractTrapped(err)),
    }
}

/// Host view of one running contract
struct CallFrame<'c, 'a> {
    ctx: &'c mut ExecContext<'a>,
    caller: AccountId,
    account_id: AccountId,
    value: Balance,
    gas: GasMeter,
    depth: usize,
}

impl<'c, 'a> CallFrame<'c, 'a> {
    fn run(
        &mut self,
        entry: &Entry,
        code: &dyn ContractCode,
        selector: Selector,
        input: &[u8],
    ) -> Result<ExecReturnValue, ExecError> {
        if input.len() > MAX_CALL_INPUT_SIZE {
            return Err(EnvError::ValueTooLarge {
                size: input.len(),
                max: MAX_CALL_INPUT_SIZE,
            }
            .into());
        }

        let abi = code.abi();
        let (base_cost, spec) = match entry {
            Entry::Deploy { .. } => (
                GAS_BASE_INSTANTIATE,
                abi.find_constructor_by_selector(&selector),
            ),
            Entry::Call => (GAS_BASE_CALL, abi.find_message_by_selector(&selector)),
        };
        self.gas
            .charge(base_cost + input.len() as u64 * GAS_PER_BYTE)?;

        let spec = spec.ok_or(ExecError::UnknownSelector(selector))?;
        if self.value > 0 && !spec.payable {
            return Err(EnvError::NotPayable(selector).into());
        }

        if let Entry::Deploy {
            code_hash,
            deployer,
        } = entry
        {
            self.ctx.cache.set_contract(
                self.account_id,
                ContractInfo {
                    code_hash: *code_hash,
                    deployer: *deployer,
                },
            );
        }

        self.ctx
            .cache
            .transfer(&self.caller, &self.account_id, self.value)
            .map_err(|available| EnvError::InsufficientBalance {
                required: self.value,
                available,
            })?;

        match entry {
            Entry::Deploy { .. } => code.deploy(self, selector, input),
            Entry::Call => code.call(self, selector, input),
        }
    }
}

impl<'c, 'a> Environment for CallFrame<'c, 'a> {
    fn caller(&self) -> AccountId {
        self.caller
    }

    fn account_id(&self) -> AccountId {
        self.account_id
    }

    fn transferred_value(&self) -> Balance {
        self.value
    }

    fn block_number(&self) -> u64 {
        self.ctx.block.number
    }

    fn block_timestamp(&self) -> TimestampMillis {
        self.ctx.block.timestamp
    }

    fn balance(&self) -> Balance {
        self.ctx.cache.balance(&self.account_id)
    }

    fn gas_left(&self) -> u64 {
        self.gas.left()
    }

    fn get_storage(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, EnvError> {
        self.gas.charge(GAS_STORAGE_READ)?;
        let value = self.ctx.cache.storage(&self.account_id, key);
        if let Some(value) = &value {
            self.gas.charge(value.len() as u64 * GAS_PER_BYTE)?;
        }
        Ok(value)
    }

    fn set_storage(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), EnvError> {
        if value.len() > MAX_STORAGE_VALUE_SIZE {
            return Err(EnvError::ValueTooLarge {
                size: value.len(),
                max: MAX_STORAGE_VALUE_SIZE,
            });
        }
        self.gas
            .charge(GAS_STORAGE_WRITE + (key.len() + value.len()) as u64 * GAS_PER_BYTE)?;
        self.ctx.cache.set_storage(self.account_id, key, Some(value));
        Ok(())
    }

    fn clear_storage(&mut self, key: &[u8]) -> Result<(), EnvError> {
        self.gas.charge(GAS_STORAGE_WRITE)?;
        self.ctx.cache.set_storage(self.account_id, key, None);
        Ok(())
    }

    fn invoke_contract(&mut self, params: CallParams) -> Result<ExecReturnValue, EnvError> {
        let depth = self.depth + 1;
        if depth > MAX_CALL_DEPTH {
            return Err(EnvError::CallDepthExceeded {
                depth,
                max_depth: MAX_CALL_DEPTH,
            });
        }

        let info = self
            .ctx
            .cache
            .contract(&params.callee)
            .ok_or(EnvError::ContractNotFound(params.callee))?;
        let code = self
            .ctx
            .registry
            .get(&info.code_hash)
            .ok_or(EnvError::ContractNotFound(params.callee))?;

        let gas = self.gas.nested(params.gas_limit)?;
        let (result, used) = self.ctx.execute(
            Entry::Call,
            code,
            self.account_id,
            params.callee,
            params.value,
            params.selector,
            &params.input,
            gas,
            depth,
        );
        self.gas.charge(used)?;

        result.map_err(|err| EnvError::CalleeTrapped(err.to_string()))
    }

    fn emit_event(&mut self, name: &str, topics: Vec<Hash>, data: Vec<u8>) -> Result<(), EnvError> {
        self.gas
            .charge(GAS_EVENT + data.len() as u64 * GAS_PER_BYTE)?;
        self.ctx.events.push(EventRecord {
            emitter: self.account_id,
            name: name.to_string(),
            topics,
            data,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showgame_common::{
        config::DEFAULT_GAS_LIMIT,
        crypto::KeyPair,
        psp34::{Id, Psp34Error},
        serializer::Serializer,
    };
    use showgame_contracts::{all_codes, psp34, MyPsp34};

    fn call_data(label: &str, args: &[u8]) -> Vec<u8> {
        let mut data = Selector::from_label(label).to_vec();
        data.extend_from_slice(args);
        data
    }

    fn setup() -> (ChainState, Arc<CodeRegistry>, AccountId) {
        let alice = KeyPair::from_seed("//Alice").address();
        let mut state = ChainState::new();
        state.endow(alice, 1_000);
        (state, Arc::new(CodeRegistry::with_codes(all_codes())), alice)
    }

    fn block() -> BlockContext {
        BlockContext {
            number: 1,
            timestamp: 1_000,
        }
    }

    #[test]
    fn test_instantiate_requires_upload() {
        let (state, registry, alice) = setup();
        let mut ctx = ExecContext::new(&state, registry, block());
        let code_hash = MyPsp34.code_hash();
        let constructor = call_data(psp34::CONSTRUCTOR_NEW, &[]);

        let output = ctx.instantiate(alice, code_hash, 0, DEFAULT_GAS_LIMIT, &constructor, &[]);
        assert_eq!(
            output.result,
            Err(BlockchainError::CodeNotUploaded(code_hash).into())
        );

        ctx.upload_code(code_hash).unwrap();
        let output = ctx.instantiate(alice, code_hash, 0, DEFAULT_GAS_LIMIT, &constructor, &[]);
        let (address, _) = output.result.unwrap();
        assert_eq!(address, contract_address(&alice, &code_hash, &[]));
        assert!(output.gas_consumed >= GAS_BASE_INSTANTIATE);

        let again = ctx.instantiate(alice, code_hash, 0, DEFAULT_GAS_LIMIT, &constructor, &[]);
        assert_eq!(
            again.result,
            Err(BlockchainError::ContractAlreadyExists(address).into())
        );
    }

    #[test]
    fn test_revert_discards_frame() {
        let (state, registry, alice) = setup();
        let mut ctx = ExecContext::new(&state, registry, block());
        let code_hash = MyPsp34.code_hash();
        ctx.upload_code(code_hash).unwrap();
        let constructor = call_data(psp34::CONSTRUCTOR_NEW, &[]);
        let (address, _) = ctx
            .instantiate(alice, code_hash, 0, DEFAULT_GAS_LIMIT, &constructor, &[])
            .result
            .unwrap();

        let mint = call_data(psp34::MINT, &Id::U8(1).to_bytes());
        assert!(ctx.call(alice, address, 0, DEFAULT_GAS_LIMIT, &mint).result.is_ok());
        let events = ctx.events().len();

        let output = ctx.call(alice, address, 0, DEFAULT_GAS_LIMIT, &mint);
        let expected = Err::<(), _>(Psp34Error::TokenExists).to_bytes();
        assert_eq!(
            output.result,
            Err(DispatchError::ContractReverted { data: expected })
        );
        assert_eq!(ctx.events().len(), events);

        let supply = ctx
            .call(alice, address, 0, DEFAULT_GAS_LIMIT, &call_data(psp34::TOTAL_SUPPLY, &[]))
            .result
            .unwrap();
        assert_eq!(supply.decode::<Balance>().unwrap(), 1);
    }

    #[test]
    fn test_not_payable_and_out_of_gas() {
        let (state, registry, alice) = setup();
        let mut ctx = ExecContext::new(&state, registry, block());
        let code_hash = MyPsp34.code_hash();
        ctx.upload_code(code_hash).unwrap();
        let constructor = call_data(psp34::CONSTRUCTOR_NEW, &[]);
        let (address, _) = ctx
            .instantiate(alice, code_hash, 0, DEFAULT_GAS_LIMIT, &constructor, &[])
            .result
            .unwrap();

        let mint = call_data(psp34::MINT_TOKEN, &[]);
        let output = ctx.call(alice, address, 10, DEFAULT_GAS_LIMIT, &mint);
        assert!(matches!(
            output.result,
            Err(DispatchError::ContractTrapped(ExecError::Env(EnvError::NotPayable(_))))
        ));
        assert_eq!(ctx.cache().balance(&alice), 1_000);

        let output = ctx.call(alice, address, 0, GAS_BASE_CALL, &mint);
        assert!(matches!(
            output.result,
            Err(DispatchError::ContractTrapped(ExecError::Env(EnvError::OutOfGas { .. })))
        ));
    }

    #[test]
    fn test_unknown_contract() {
        let (state, registry, alice) = setup();
        let mut ctx = ExecContext::new(&state, registry, block());
        let missing = AccountId::new([9; 32]);
        let total_supply = call_data(psp34::TOTAL_SUPPLY, &[]);
        let output = ctx.call(alice, missing, 0, DEFAULT_GAS_LIMIT, &total_supply);
        assert_eq!(
            output.result,
            Err(BlockchainError::ContractNotFound(missing).into())
        );
    }
}
