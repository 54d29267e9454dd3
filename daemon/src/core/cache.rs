// Layered state cache used while executing an extrinsic or a dry run.
//
// The bottom layer holds the changes of the whole execution, every call
// frame pushes a checkpoint on top of it. Reads walk the layers from the
// top down to the committed ChainState. A frame that fails drops its layer,
// a frame that succeeds merges it into the one below.

use indexmap::IndexMap;
use log::trace;
use showgame_common::{
    config::Balance,
    crypto::{AccountId, Hash},
};

use super::state::{ChainState, ContractInfo};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateKey {
    Balance(AccountId),
    Nonce(AccountId),
    Contract(AccountId),
    Storage(AccountId, Vec<u8>),
    Code(Hash),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateValue {
    Balance(Balance),
    Nonce(u64),
    Contract(ContractInfo),
    Storage(Vec<u8>),
    Code,
}

// None marks a removed entry
pub type StateChanges = IndexMap<StateKey, Option<StateValue>>;

pub struct StateCache<'a> {
    base: &'a ChainState,
    layers: Vec<StateChanges>,
}

impl<'a> StateCache<'a> {
    pub fn new(base: &'a ChainState) -> Self {
        Self {
            base,
            layers: vec![StateChanges::new()],
        }
    }

    fn get(&self, key: &StateKey) -> Option<StateValue> {
        for layer in self.layers.iter().rev() {
            if let Some(value) = layer.get(key) {
                return value.clone();
            }
        }
        self.base.get(key)
    }

    fn set(&mut self, key: StateKey, value: Option<StateValue>) {
        // There is always at least the bottom layer
        if let Some(layer) = self.layers.last_mut() {
            layer.insert(key, value);
        }
    }

    pub fn balance(&self, account: &AccountId) -> Balance {
        match self.get(&StateKey::Balance(*account)) {
            Some(StateValue::Balance(balance)) => balance,
            _ => 0,
        }
    }

    pub fn set_balance(&mut self, account: AccountId, balance: Balance) {
        self.set(StateKey::Balance(account), Some(StateValue::Balance(balance)));
    }

    pub fn nonce(&self, account: &AccountId) -> u64 {
        match self.get(&StateKey::Nonce(*account)) {
            Some(StateValue::Nonce(nonce)) => nonce,
            _ => 0,
        }
    }

    pub fn set_nonce(&mut self, account: AccountId, nonce: u64) {
        self.set(StateKey::Nonce(account), Some(StateValue::Nonce(nonce)));
    }

    pub fn contract(&self, account: &AccountId) -> Option<ContractInfo> {
        match self.get(&StateKey::Contract(*account)) {
            Some(StateValue::Contract(info)) => Some(info),
            _ => None,
        }
    }

    pub fn set_contract(&mut self, account: AccountId, info: ContractInfo) {
        self.set(StateKey::Contract(account), Some(StateValue::Contract(info)));
    }

    pub fn storage(&self, account: &AccountId, key: &[u8]) -> Option<Vec<u8>> {
        match self.get(&StateKey::Storage(*account, key.to_vec())) {
            Some(StateValue::Storage(value)) => Some(value),
            _ => None,
        }
    }

    pub fn set_storage(&mut self, account: AccountId, key: &[u8], value: Option<Vec<u8>>) {
        self.set(
            StateKey::Storage(account, key.to_vec()),
            value.map(StateValue::Storage),
        );
    }

    pub fn is_code_stored(&self, code_hash: &Hash) -> bool {
        self.get(&StateKey::Code(*code_hash)).is_some()
    }

    pub fn store_code(&mut self, code_hash: Hash) {
        self.set(StateKey::Code(code_hash), Some(StateValue::Code));
    }

    /// Move `value` from `from` to `to`.
    ///
    /// Returns the available balance of `from` as error when it is too low.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        value: Balance,
    ) -> Result<(), Balance> {
        if value == 0 || from == to {
            let available = self.balance(from);
            return if available >= value { Ok(()) } else { Err(available) };
        }

        let available = self.balance(from);
        let remaining = available.checked_sub(value).ok_or(available)?;
        let credited = self.balance(to).saturating_add(value);
        self.set_balance(*from, remaining);
        self.set_balance(*to, credited);
        Ok(())
    }

    /// Number of open layers, the bottom one included
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Open a new layer for a call frame
    pub fn checkpoint(&mut self) {
        self.layers.push(StateChanges::new());
        trace!("cache checkpoint, depth {}", self.layers.len());
    }

    /// Merge the top layer into the one below
    pub fn commit(&mut self) {
        if self.layers.len() < 2 {
            return;
        }

        if let Some(top) = self.layers.pop() {
            if let Some(below) = self.layers.last_mut() {
                below.extend(top);
            }
        }
        trace!("cache commit, depth {}", self.layers.len());
    }

    /// Drop the top layer and everything written in it
    pub fn rollback(&mut self) {
        if self.layers.len() < 2 {
            if let Some(bottom) = self.layers.last_mut() {
                bottom.clear();
            }
        } else {
            self.layers.pop();
        }
        trace!("cache rollback, depth {}", self.layers.len());
    }

    /// Collapse every layer into the final set of changes
    pub fn into_changes(mut self) -> StateChanges {
        while self.layers.len() > 1 {
            self.commit();
        }
        self.layers.pop().unwrap_or_default()
    }
}
