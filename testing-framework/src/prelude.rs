// File: testing-framework/src/prelude.rs
//
// Everything a suite usually needs in one import

pub use std::{sync::Arc, time::Duration};

pub use showgame_common::{
    access_control::{
        AccessControlError, RoleType, DEFAULT_ADMIN_ROLE, EXECUTOR_ROLE, PROPOSER_ROLE,
        TIMELOCK_ADMIN_ROLE,
    },
    config::Balance,
    crypto::{AccountId, Hash, KeyPair},
    psp34::{Id, Psp34Error},
    timelock::{
        hash_operation, OperationId, Salt, TimelockControllerError, Transaction,
    },
};

pub use crate::{
    api::{ApiClient, ApiError},
    bindings::{
        ConstructorsMyPsp34, ConstructorsMyTimelockController, ContractMyPsp34,
        ContractMyTimelockController,
    },
    contract::{Contract, DeployResult, QueryError, QueryReturnType, TxError, TxOptions, TxResult},
    orchestrator::{TestEnv, TestEnvBuilder},
    signers::{get_signer, get_signers},
    utilities::{
        deploy_psp34, deploy_timelock, init_test_logger, message_selector, message_transaction,
        noop_transaction, salt,
    },
};
