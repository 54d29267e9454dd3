// File: testing-framework/src/bindings/my_timelock_controller.rs
//
// Bindings for the `my_timelock_controller` contract, including the
// `AccessControl::*` messages it embeds.

use std::sync::Arc;

use showgame_common::{
    access_control::{AccessControlError, RoleType},
    config::Balance,
    contract::ContractAbi,
    crypto::{AccountId, KeyPair},
    serializer::{write_sequence, Serializer, Writer},
    timelock::{OperationId, Salt, TimelockControllerError, Transaction},
};
use showgame_contracts::{access_control, timelock_controller, ContractCode, MyTimelockController};

use crate::{
    api::ApiClient,
    contract::{
        deploy, Contract, DeployResult, QueryError, QueryReturnType, TxError, TxOptions, TxResult,
    },
};

type QueryResult<T> = Result<QueryReturnType<T>, QueryError>;
type TimelockTxResult = Result<TxResult, TxError<TimelockControllerError>>;
type AccessControlTxResult = Result<TxResult, TxError<AccessControlError>>;

fn constructor_args(min_delay: u64, proposers: &[AccountId], executors: &[AccountId]) -> Vec<u8> {
    let mut writer = Writer::new();
    writer.write_u64(min_delay);
    write_sequence(&mut writer, proposers);
    write_sequence(&mut writer, executors);
    writer.bytes()
}

fn operation_args(
    transaction: &Transaction,
    predecessor: &Option<OperationId>,
    salt: &Salt,
    delay: Option<u64>,
) -> Vec<u8> {
    let mut writer = Writer::new();
    transaction.write(&mut writer);
    predecessor.write(&mut writer);
    salt.write(&mut writer);
    if let Some(delay) = delay {
        writer.write_u64(delay);
    }
    writer.bytes()
}

fn batch_args(
    transactions: &[Transaction],
    predecessor: &Option<OperationId>,
    salt: &Salt,
    delay: Option<u64>,
) -> Vec<u8> {
    let mut writer = Writer::new();
    write_sequence(&mut writer, transactions);
    predecessor.write(&mut writer);
    salt.write(&mut writer);
    if let Some(delay) = delay {
        writer.write_u64(delay);
    }
    writer.bytes()
}

/// Deploys `my_timelock_controller` instances
pub struct ConstructorsMyTimelockController {
    api: ApiClient,
    signer: KeyPair,
}

impl ConstructorsMyTimelockController {
    pub fn new(api: &ApiClient, signer: &KeyPair) -> Self {
        Self {
            api: api.clone(),
            signer: signer.clone(),
        }
    }

    /// Instantiate with the `new` constructor. The signer becomes admin.
    pub async fn deploy_new(
        &self,
        min_delay: u64,
        proposers: &[AccountId],
        executors: &[AccountId],
    ) -> Result<DeployResult, TxError<()>> {
        deploy(
            &self.api,
            &self.signer,
            &MyTimelockController,
            timelock_controller::CONSTRUCTOR_NEW,
            &constructor_args(min_delay, proposers, executors),
        )
        .await
    }
}

/// Handle to a deployed `my_timelock_controller` instance
#[derive(Clone)]
pub struct ContractMyTimelockController {
    contract: Contract,
}

impl ContractMyTimelockController {
    pub fn new(address: AccountId, signer: &KeyPair, api: &ApiClient) -> Self {
        let abi = Arc::new(MyTimelockController.abi().clone());
        Self {
            contract: Contract::new(address, signer, api, abi),
        }
    }

    pub fn address(&self) -> AccountId {
        self.contract.address()
    }

    pub fn abi(&self) -> &ContractAbi {
        self.contract.abi()
    }

    pub fn signer(&self) -> &KeyPair {
        self.contract.signer()
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn with_signer(&self, signer: &KeyPair) -> Self {
        Self {
            contract: self.contract.with_signer(signer),
        }
    }

    pub fn query(&self) -> TimelockQuery<'_> {
        TimelockQuery {
            contract: &self.contract,
        }
    }

    pub fn tx(&self) -> TimelockTx<'_> {
        TimelockTx {
            contract: &self.contract,
        }
    }
}

/// Dry run view of `my_timelock_controller`
pub struct TimelockQuery<'a> {
    contract: &'a Contract,
}

impl TimelockQuery<'_> {
    pub async fn get_min_delay(&self) -> QueryResult<u64> {
        self.contract
            .query(timelock_controller::GET_MIN_DELAY, &[])
            .await
    }

    async fn operation_query<T: Serializer>(
        &self,
        label: &str,
        id: &OperationId,
    ) -> QueryResult<T> {
        self.contract.query(label, &Serializer::to_bytes(id)).await
    }

    pub async fn is_operation(&self, id: &OperationId) -> QueryResult<bool> {
        self.operation_query(timelock_controller::IS_OPERATION, id)
            .await
    }

    pub async fn is_operation_pending(&self, id: &OperationId) -> QueryResult<bool> {
        self.operation_query(timelock_controller::IS_OPERATION_PENDING, id)
            .await
    }

    pub async fn is_operation_ready(&self, id: &OperationId) -> QueryResult<bool> {
        self.operation_query(timelock_controller::IS_OPERATION_READY, id)
            .await
    }

    pub async fn is_operation_done(&self, id: &OperationId) -> QueryResult<bool> {
        self.operation_query(timelock_controller::IS_OPERATION_DONE, id)
            .await
    }

    /// Ready timestamp of `id`, 0 when unset and 1 once done
    pub async fn get_timestamp(&self, id: &OperationId) -> QueryResult<u64> {
        self.operation_query(timelock_controller::GET_TIMESTAMP, id)
            .await
    }

    pub async fn hash_operation(
        &self,
        transaction: &Transaction,
        predecessor: Option<OperationId>,
        salt: Salt,
    ) -> QueryResult<OperationId> {
        self.contract
            .query(
                timelock_controller::HASH_OPERATION,
                &operation_args(transaction, &predecessor, &salt, None),
            )
            .await
    }

    pub async fn hash_operation_batch(
        &self,
        transactions: &[Transaction],
        predecessor: Option<OperationId>,
        salt: Salt,
    ) -> QueryResult<OperationId> {
        self.contract
            .query(
                timelock_controller::HASH_OPERATION_BATCH,
                &batch_args(transactions, &predecessor, &salt, None),
            )
            .await
    }

    pub async fn has_role(&self, role: RoleType, address: AccountId) -> QueryResult<bool> {
        self.contract
            .query(access_control::HAS_ROLE, &(role, address).to_bytes())
            .await
    }

    pub async fn get_role_admin(&self, role: RoleType) -> QueryResult<RoleType> {
        self.contract
            .query(access_control::GET_ROLE_ADMIN, &role.to_bytes())
            .await
    }

    /// Dry run `schedule`, returning the contract's verdict
    pub async fn schedule(
        &self,
        transaction: &Transaction,
        predecessor: Option<OperationId>,
        salt: Salt,
        delay: u64,
    ) -> QueryResult<Result<(), TimelockControllerError>> {
        self.contract
            .query(
                timelock_controller::SCHEDULE,
                &operation_args(transaction, &predecessor, &salt, Some(delay)),
            )
            .await
    }

    /// Dry run `execute`, returning the contract's verdict
    pub async fn execute(
        &self,
        transaction: &Transaction,
        predecessor: Option<OperationId>,
        salt: Salt,
    ) -> QueryResult<Result<(), TimelockControllerError>> {
        self.contract
            .query(
                timelock_controller::EXECUTE,
                &operation_args(transaction, &predecessor, &salt, None),
            )
            .await
    }
}

/// Transaction view of `my_timelock_controller`
pub struct TimelockTx<'a> {
    contract: &'a Contract,
}

impl TimelockTx<'_> {
    pub async fn schedule(
        &self,
        transaction: &Transaction,
        predecessor: Option<OperationId>,
        salt: Salt,
        delay: u64,
    ) -> TimelockTxResult {
        self.contract
            .tx(
                timelock_controller::SCHEDULE,
                &operation_args(transaction, &predecessor, &salt, Some(delay)),
            )
            .await
    }

    pub async fn schedule_batch(
        &self,
        transactions: &[Transaction],
        predecessor: Option<OperationId>,
        salt: Salt,
        delay: u64,
    ) -> TimelockTxResult {
        self.contract
            .tx(
                timelock_controller::SCHEDULE_BATCH,
                &batch_args(transactions, &predecessor, &salt, Some(delay)),
            )
            .await
    }

    pub async fn cancel(&self, id: &OperationId) -> TimelockTxResult {
        self.contract
            .tx(timelock_controller::CANCEL, &Serializer::to_bytes(id))
            .await
    }

    pub async fn execute(
        &self,
        transaction: &Transaction,
        predecessor: Option<OperationId>,
        salt: Salt,
    ) -> TimelockTxResult {
        self.execute_with_value(transaction, predecessor, salt, 0)
            .await
    }

    /// Execute, forwarding `value` to fund the underlying call
    pub async fn execute_with_value(
        &self,
        transaction: &Transaction,
        predecessor: Option<OperationId>,
        salt: Salt,
        value: Balance,
    ) -> TimelockTxResult {
        self.contract
            .tx_with_options(
                timelock_controller::EXECUTE,
                &operation_args(transaction, &predecessor, &salt, None),
                TxOptions::with_value(value),
            )
            .await
    }

    pub async fn execute_batch(
        &self,
        transactions: &[Transaction],
        predecessor: Option<OperationId>,
        salt: Salt,
    ) -> TimelockTxResult {
        self.contract
            .tx(
                timelock_controller::EXECUTE_BATCH,
                &batch_args(transactions, &predecessor, &salt, None),
            )
            .await
    }

    /// Only succeeds when the timelock calls itself
    pub async fn update_delay(&self, new_delay: u64) -> TimelockTxResult {
        self.contract
            .tx(timelock_controller::UPDATE_DELAY, &new_delay.to_bytes())
            .await
    }

    pub async fn grant_role(&self, role: RoleType, account: AccountId) -> AccessControlTxResult {
        self.contract
            .tx(access_control::GRANT_ROLE, &(role, account).to_bytes())
            .await
    }

    pub async fn revoke_role(&self, role: RoleType, account: AccountId) -> AccessControlTxResult {
        self.contract
            .tx(access_control::REVOKE_ROLE, &(role, account).to_bytes())
            .await
    }

    pub async fn renounce_role(&self, role: RoleType, account: AccountId) -> AccessControlTxResult {
        self.contract
            .tx(access_control::RENOUNCE_ROLE, &(role, account).to_bytes())
            .await
    }
}
