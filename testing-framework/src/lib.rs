//! # Showgame Testing Framework
//!
//! Client side of the showgame e2e suites: a chain API client, the dev
//! signers, a generic contract proxy and typed bindings for `my_psp34` and
//! `my_timelock_controller`, all running against an in-process local node.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use showgame_testing_framework::prelude::*;
//!
//! #[tokio::test]
//! async fn test_mint() -> anyhow::Result<()> {
//!     let env = TestEnv::new().await?;
//!     let psp34 = deploy_psp34(&env.api, env.charlie()).await?;
//!
//!     psp34.tx().mint_token().await?;
//!     assert_eq!(psp34.query().total_supply().await?.value, 1);
//!
//!     env.teardown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Transactions
//!
//! Every transaction is dry run first. A revert is reported as
//! `TxError::Reverted` with the decoded contract error and no block is
//! sealed; otherwise the extrinsic is signed, submitted and sealed in its
//! own block.

#![warn(clippy::all)]

/// Chain API client
pub mod api;

/// Typed contract bindings
pub mod bindings;

/// Generic contract proxy, query and transaction results
pub mod contract;

/// Local node, paused clock and client wired together
pub mod orchestrator;

/// Dev signers
pub mod signers;

/// Shared helpers for the suites
pub mod utilities;

// Convenient re-exports for common usage
pub mod prelude;

pub use api::{ApiClient, ApiError};
pub use orchestrator::{TestEnv, TestEnvBuilder};
pub use signers::{get_signer, get_signers};
