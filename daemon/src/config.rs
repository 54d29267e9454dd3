use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use showgame_common::{
    config::{Balance, DEFAULT_BLOCK_TIME_MILLIS, DEFAULT_GAS_LIMIT, DEV_ENDOWMENT},
    crypto::hash,
    logger::LogLevel,
};
use std::env;

// Name reported by chain_info, also mixed into the genesis hash so
// extrinsics signed for another chain are rejected
pub const DEFAULT_CHAIN_NAME: &str = "showgame-dev";

// Domain separator for contract address derivation
pub const CONTRACT_ADDRESS_DOMAIN: &[u8] = b"showgame/contract";

// Domain separator for the extrinsic signing payload
pub const EXTRINSIC_SIGNING_DOMAIN: &[u8] = b"showgame/extrinsic";

// Max encoded size of a single extrinsic
pub const MAX_EXTRINSIC_SIZE: usize = 64 * 1024;

// Max salt length accepted by instantiate
pub const MAX_SALT_SIZE: usize = 64;

// -----------------------------------------------------------------------------
// Runtime overrides
// -----------------------------------------------------------------------------
//
// Environment variables:
//   - SHOWGAME_BLOCK_TIME_MS
//       minimum timestamp step between two blocks, in milliseconds
//   - SHOWGAME_LOG_LEVEL
//       off | error | warn | info | debug | trace
lazy_static! {
    static ref BLOCK_TIME_MS_OVERRIDE: Option<u64> = {
        match env::var("SHOWGAME_BLOCK_TIME_MS") {
            Ok(v) => v.trim().parse().ok().filter(|ms| *ms > 0),
            Err(_) => None,
        }
    };

    static ref LOG_LEVEL_OVERRIDE: Option<LogLevel> = {
        match env::var("SHOWGAME_LOG_LEVEL") {
            Ok(v) => v.trim().parse().ok(),
            Err(_) => None,
        }
    };
}

/// Block time step, honoring `SHOWGAME_BLOCK_TIME_MS` when set
pub fn block_time_millis() -> u64 {
    BLOCK_TIME_MS_OVERRIDE.unwrap_or(DEFAULT_BLOCK_TIME_MILLIS)
}

/// Log level, honoring `SHOWGAME_LOG_LEVEL` when set
pub fn log_level() -> LogLevel {
    LOG_LEVEL_OVERRIDE.unwrap_or_default()
}

/// Settings of a local node instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub chain_name: String,
    // Minimum step between two block timestamps
    pub block_time_ms: u64,
    pub log_level: LogLevel,
    // Endow the well known dev accounts at genesis
    pub endow_dev_accounts: bool,
    pub dev_endowment: Balance,
    // Used by dry runs that do not specify a gas limit
    pub default_gas_limit: u64,
}

impl NodeConfig {
    /// Hash identifying the chain this config describes
    pub fn genesis_hash(&self) -> showgame_common::crypto::Hash {
        hash(self.chain_name.as_bytes())
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chain_name: DEFAULT_CHAIN_NAME.to_string(),
            block_time_ms: block_time_millis(),
            log_level: log_level(),
            endow_dev_accounts: true,
            dev_endowment: DEV_ENDOWMENT,
            default_gas_limit: DEFAULT_GAS_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_partial_json() {
        let config: NodeConfig =
            serde_json::from_str(r#"{ "chain_name": "other", "endow_dev_accounts": false }"#)
                .unwrap();
        assert_eq!(config.chain_name, "other");
        assert!(!config.endow_dev_accounts);
        assert_eq!(config.default_gas_limit, DEFAULT_GAS_LIMIT);
        assert_ne!(config.genesis_hash(), NodeConfig::default().genesis_hash());
    }
}
