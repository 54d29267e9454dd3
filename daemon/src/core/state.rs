use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use showgame_common::{
    config::Balance,
    crypto::{AccountId, Hash},
};

use super::cache::{StateChanges, StateKey, StateValue};

/// What the chain knows about an instantiated contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub code_hash: Hash,
    pub deployer: AccountId,
}

/// Committed state of the chain, as of the best block
#[derive(Debug, Default, Clone)]
pub struct ChainState {
    balances: HashMap<AccountId, Balance>,
    nonces: HashMap<AccountId, u64>,
    contracts: HashMap<AccountId, ContractInfo>,
    storage: HashMap<(AccountId, Vec<u8>), Vec<u8>>,
    codes: HashSet<Hash>,
}

impl ChainState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, account: &AccountId) -> Balance {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn nonce(&self, account: &AccountId) -> u64 {
        self.nonces.get(account).copied().unwrap_or_default()
    }

    pub fn contract(&self, account: &AccountId) -> Option<&ContractInfo> {
        self.contracts.get(account)
    }

    pub fn storage(&self, account: &AccountId, key: &[u8]) -> Option<&Vec<u8>> {
        self.storage.get(&(*account, key.to_vec()))
    }

    pub fn is_code_stored(&self, code_hash: &Hash) -> bool {
        self.codes.contains(code_hash)
    }

    pub fn contracts_count(&self) -> usize {
        self.contracts.len()
    }

    /// Genesis endowment
    pub fn endow(&mut self, account: AccountId, amount: Balance) {
        let balance = self.balances.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub(super) fn get(&self, key: &StateKey) -> Option<StateValue> {
        match key {
            StateKey::Balance(account) => {
                self.balances.get(account).copied().map(StateValue::Balance)
            }
            StateKey::Nonce(account) => self.nonces.get(account).copied().map(StateValue::Nonce),
            StateKey::Contract(account) => {
                self.contracts.get(account).copied().map(StateValue::Contract)
            }
            StateKey::Storage(account, key) => self
                .storage
                .get(&(*account, key.clone()))
                .cloned()
                .map(StateValue::Storage),
            StateKey::Code(code_hash) => self.codes.contains(code_hash).then_some(StateValue::Code),
        }
    }

    /// Write back the changes collected by a cache.
    ///
    /// A `None` value removes the entry.
    pub fn apply(&mut self, changes: StateChanges) {
        for (key, value) in changes {
            match (key, value) {
                (StateKey::Balance(account), Some(StateValue::Balance(balance))) => {
                    self.balances.insert(account, balance);
                }
                (StateKey::Balance(account), _) => {
                    self.balances.remove(&account);
                }
                (StateKey::Nonce(account), Some(StateValue::Nonce(nonce))) => {
                    self.nonces.insert(account, nonce);
                }
                (StateKey::Nonce(account), _) => {
                    self.nonces.remove(&account);
                }
                (StateKey::Contract(account), Some(StateValue::Contract(info))) => {
                    self.contracts.insert(account, info);
                }
                (StateKey::Contract(account), _) => {
                    self.contracts.remove(&account);
                }
                (StateKey::Storage(account, key), Some(StateValue::Storage(value))) => {
                    self.storage.insert((account, key), value);
                }
                (StateKey::Storage(account, key), _) => {
                    self.storage.remove(&(account, key));
                }
                (StateKey::Code(code_hash), Some(_)) => {
                    self.codes.insert(code_hash);
                }
                (StateKey::Code(code_hash), None) => {
                    self.codes.remove(&code_hash);
                }
            }
        }
    }
}
