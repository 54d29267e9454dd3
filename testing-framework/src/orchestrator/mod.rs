// File: testing-framework/src/orchestrator/mod.rs
//
// Test orchestration
//
// A TestEnv wires a local node to a paused clock and an API client, so a
// suite controls block time explicitly and every run is reproducible.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use log::debug;
use showgame_common::{
    config::Balance,
    crypto::{AccountId, KeyPair},
    time::{Clock, PausedClock, TimestampMillis},
};
use showgame_daemon::{config::NodeConfig, core::Block, LocalNode};

use crate::{api::ApiClient, signers::get_signers};

// Genesis time of every test chain unless overridden
const DEFAULT_START_TIME_MILLIS: TimestampMillis = 1_700_000_000_000;

/// Local chain, paused clock and connected client.
///
/// ```rust,ignore
/// use showgame_testing_framework::prelude::*;
///
/// #[tokio::test]
/// async fn test_delay_elapses() -> anyhow::Result<()> {
///     let env = TestEnv::new().await?;
///     let before = env.now().await?;
///     env.advance_time(Duration::from_secs(15)).await?;
///     assert!(env.now().await? >= before + 15_000);
///     env.teardown().await;
///     Ok(())
/// }
/// ```
pub struct TestEnv {
    /// Time source of the node, only moves on `advance_time`
    pub clock: Arc<PausedClock>,
    /// Node serving the client
    pub node: Arc<LocalNode>,
    /// Client connected to `node`
    pub api: ApiClient,
    signers: Vec<KeyPair>,
}

impl TestEnv {
    /// Environment with the default node configuration
    pub async fn new() -> Result<Self> {
        TestEnvBuilder::default().build().await
    }

    pub fn builder() -> TestEnvBuilder {
        TestEnvBuilder::default()
    }

    /// Dev signers: Alice, Bob, Charlie, Dave, Eve, Ferdie
    pub fn signers(&self) -> &[KeyPair] {
        &self.signers
    }

    pub fn alice(&self) -> &KeyPair {
        &self.signers[0]
    }

    pub fn bob(&self) -> &KeyPair {
        &self.signers[1]
    }

    pub fn charlie(&self) -> &KeyPair {
        &self.signers[2]
    }

    /// Timestamp of the best block, the time contracts observe
    pub async fn now(&self) -> Result<TimestampMillis> {
        self.api
            .block_timestamp()
            .await
            .context("Cannot read the best block timestamp")
    }

    /// Seal a block at least `duration` after the best block, so queries
    /// observe the new time.
    ///
    /// The block lands at `best + duration` when the clock has not run ahead
    /// of the best block and `duration` is at least the node block time.
    /// Otherwise the node moves it later: never before `best + block_time_ms`.
    pub async fn advance_time(&self, duration: Duration) -> Result<Block> {
        let best = self.now().await?;
        let target = best.max(self.clock.now_millis()) + duration.as_millis() as u64;
        self.clock.set(target);

        let block = self.node.seal_empty_block().await;
        debug!(
            "Advanced time by {:?}, block #{} at {}",
            duration, block.number, block.timestamp
        );
        Ok(block)
    }

    /// Disconnect the client
    pub async fn teardown(self) {
        self.api.disconnect().await;
    }
}

/// Configures a TestEnv
pub struct TestEnvBuilder {
    config: NodeConfig,
    start_time: TimestampMillis,
    endowments: Vec<(AccountId, Balance)>,
}

impl Default for TestEnvBuilder {
    fn default() -> Self {
        Self {
            config: NodeConfig::default(),
            start_time: DEFAULT_START_TIME_MILLIS,
            endowments: Vec::new(),
        }
    }
}

impl TestEnvBuilder {
    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    /// Clock value at genesis
    pub fn with_start_time(mut self, start_time: TimestampMillis) -> Self {
        self.start_time = start_time;
        self
    }

    /// Endow an extra account at genesis
    pub fn with_endowment(mut self, account: AccountId, amount: Balance) -> Self {
        self.endowments.push((account, amount));
        self
    }

    pub async fn build(self) -> Result<TestEnv> {
        let clock = Arc::new(PausedClock::new(self.start_time));
        let mut builder = LocalNode::builder()
            .with_config(self.config)
            .with_clock(clock.clone() as Arc<dyn Clock>);
        for (account, amount) in self.endowments {
            builder = builder.with_endowment(account, amount);
        }

        let node = Arc::new(builder.build());
        let api = ApiClient::create(node.clone())
            .await
            .context("Cannot connect to the local node")?;

        Ok(TestEnv {
            clock,
            node,
            api,
            signers: get_signers(),
        })
    }
}
