// File: testing-framework/src/utilities/mod.rs
//
// Testing Utilities

/// Deployment and transaction building shortcuts
pub mod contract_helpers;

pub use contract_helpers::{
    deploy_psp34, deploy_timelock, message_selector, message_transaction, noop_transaction, salt,
};

/// Install `env_logger` for a test binary, reading `RUST_LOG`.
///
/// Safe to call from every test: only the first call installs the logger.
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
