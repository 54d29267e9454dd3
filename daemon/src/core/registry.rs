use std::{collections::HashMap, sync::Arc};

use log::debug;
use parking_lot::RwLock;
use showgame_common::crypto::Hash;
use showgame_contracts::ContractCode;

/// Contract codes this node is able to run, by code hash.
///
/// Knowing a code is not enough to instantiate it: it must first be
/// uploaded on chain with an `UploadCode` extrinsic.
#[derive(Default)]
pub struct CodeRegistry {
    codes: RwLock<HashMap<Hash, Arc<dyn ContractCode>>>,
}

impl CodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codes<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ContractCode>>,
    {
        let registry = Self::new();
        for code in codes {
            registry.register(code);
        }
        registry
    }

    /// Make a code runnable, returns its hash
    pub fn register(&self, code: Arc<dyn ContractCode>) -> Hash {
        let code_hash = code.code_hash();
        debug!("Registering code {} ({})", code.abi().name, code_hash);
        self.codes.write().insert(code_hash, code);
        code_hash
    }

    pub fn get(&self, code_hash: &Hash) -> Option<Arc<dyn ContractCode>> {
        self.codes.read().get(code_hash).cloned()
    }

    pub fn contains(&self, code_hash: &Hash) -> bool {
        self.codes.read().contains_key(code_hash)
    }

    /// Find a code by its contract name
    pub fn find_by_name(&self, name: &str) -> Option<Hash> {
        self.codes
            .read()
            .iter()
            .find(|(_, code)| code.abi().name == name)
            .map(|(code_hash, _)| *code_hash)
    }

    pub fn len(&self) -> usize {
        self.codes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.read().is_empty()
    }
}
