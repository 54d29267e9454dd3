//! TimelockController contract.
//!
//! Proposers schedule calls that executors may only run once a delay has
//! elapsed. The contract administers itself: changing the minimum delay is
//! only possible through a scheduled call to its own `update_delay`.
//!
//! # Operation States
//!
//! ```text
//! Unset -> Pending -> Ready -> Done
//!    ^         |         |
//!    |_________|_________|
//!         (cancelled)
//! ```
//!
//! # Storage Layout
//!
//! - `tl:ts:<operation id>` -> u64 (ready timestamp, `DONE_TIMESTAMP` once executed)
//! - `tl:min_delay` -> u64
//! - role membership, see `access_control`
//!
//! # Roles
//!
//! - `TIMELOCK_ADMIN_ROLE`: admin of every role, held by the deployer and the contract
//! - `PROPOSER_ROLE`: may schedule and cancel
//! - `EXECUTOR_ROLE`: may execute, open to anyone when granted to the zero account

use lazy_static::lazy_static;
use log::{debug, trace, warn};
use showgame_common::{
    access_control::{RoleType, EXECUTOR_ROLE, PROPOSER_ROLE, TIMELOCK_ADMIN_ROLE},
    contract::{ContractAbi, ExecReturnValue, MessageSpec, Selector},
    crypto::AccountId,
    serializer::{read_sequence, Serializer},
    timelock::{
        decode_batch, hash_operation, hash_operation_batch, prefixes, CallExecuted,
        CallScheduled, Cancelled, MinDelayChange, OperationId, OperationState, Salt,
        TimelockControllerError, Transaction, DONE_TIMESTAMP,
    },
};

use crate::{
    access_control,
    code::{decode_input, decode_with, reply, respond, ContractCode},
    env::{CallParams, EnvExt, Environment},
    error::{ExecError, MessageResult},
    storage::{Lazy, Mapping},
};

pub const CONTRACT_NAME: &str = "my_timelock_controller";

pub const CONSTRUCTOR_NEW: &str = "new";
pub const GET_MIN_DELAY: &str = "TimelockController::get_min_delay";
pub const IS_OPERATION: &str = "TimelockController::is_operation";
pub const IS_OPERATION_PENDING: &str = "TimelockController::is_operation_pending";
pub const IS_OPERATION_READY: &str = "TimelockController::is_operation_ready";
pub const IS_OPERATION_DONE: &str = "TimelockController::is_operation_done";
pub const GET_TIMESTAMP: &str = "TimelockController::get_timestamp";
pub const HASH_OPERATION: &str = "TimelockController::hash_operation";
pub const HASH_OPERATION_BATCH: &str = "TimelockController::hash_operation_batch";
pub const SCHEDULE: &str = "TimelockController::schedule";
pub const SCHEDULE_BATCH: &str = "TimelockController::schedule_batch";
pub const CANCEL: &str = "TimelockController::cancel";
pub const EXECUTE: &str = "TimelockController::execute";
pub const EXECUTE_BATCH: &str = "TimelockController::execute_batch";
pub const UPDATE_DELAY: &str = "TimelockController::update_delay";

const TIMESTAMPS: Mapping<OperationId, u64> = Mapping::new(prefixes::TIMESTAMPS);
const MIN_DELAY: Lazy<u64> = Lazy::new(prefixes::MIN_DELAY);

type TimelockResult<T> = MessageResult<T, TimelockControllerError>;

lazy_static! {
    static ref ABI: ContractAbi = build_abi();
}

fn build_abi() -> ContractAbi {
    let op_query = |label: &str, returns: &str| {
        MessageSpec::query(label).arg("id", "OperationId").returns(returns)
    };

    let mut abi = ContractAbi::new(CONTRACT_NAME, env!("CARGO_PKG_VERSION"))
        .with_constructor(
            MessageSpec::tx(CONSTRUCTOR_NEW)
                .arg("min_delay", "Timestamp")
                .arg("proposers", "Vec<AccountId>")
                .arg("executors", "Vec<AccountId>"),
        )
        .with_message(MessageSpec::query(GET_MIN_DELAY).returns("Timestamp"))
        .with_message(op_query(IS_OPERATION, "bool"))
        .with_message(op_query(IS_OPERATION_PENDING, "bool"))
        .with_message(op_query(IS_OPERATION_READY, "bool"))
        .with_message(op_query(IS_OPERATION_DONE, "bool"))
        .with_message(op_query(GET_TIMESTAMP, "Timestamp"))
        .with_message(
            MessageSpec::query(HASH_OPERATION)
                .arg("transaction", "Transaction")
                .arg("predecessor", "Option<OperationId>")
                .arg("salt", "[u8; 32]")
                .returns("OperationId"),
        )
        .with_message(
            MessageSpec::query(HASH_OPERATION_BATCH)
                .arg("transactions", "Vec<Transaction>")
                .arg("predecessor", "Option<OperationId>")
                .arg("salt", "[u8; 32]")
                .returns("OperationId"),
        )
        .with_message(
            MessageSpec::tx(SCHEDULE)
                .arg("transaction", "Transaction")
                .arg("predecessor", "Option<OperationId>")
                .arg("salt", "[u8; 32]")
                .arg("delay", "Timestamp")
                .returns("Result<(), TimelockControllerError>"),
        )
        .with_message(
            MessageSpec::tx(SCHEDULE_BATCH)
                .arg("transactions", "Vec<Transaction>")
                .arg("predecessor", "Option<OperationId>")
                .arg("salt", "[u8; 32]")
                .arg("delay", "Timestamp")
                .returns("Result<(), TimelockControllerError>"),
        )
        .with_message(
            MessageSpec::tx(CANCEL)
                .arg("id", "OperationId")
                .returns("Result<(), TimelockControllerError>"),
        )
        .with_message(
            MessageSpec::tx(EXECUTE)
                .payable()
                .arg("transaction", "Transaction")
                .arg("predecessor", "Option<OperationId>")
                .arg("salt", "[u8; 32]")
                .returns("Result<(), TimelockControllerError>"),
        )
        .with_message(
            MessageSpec::tx(EXECUTE_BATCH)
                .payable()
                .arg("transactions", "Vec<Transaction>")
                .arg("predecessor", "Option<OperationId>")
                .arg("salt", "[u8; 32]")
                .returns("Result<(), TimelockControllerError>"),
        )
        .with_message(
            MessageSpec::tx(UPDATE_DELAY)
                .arg("new_delay", "Timestamp")
                .returns("Result<(), TimelockControllerError>"),
        );

    for message in access_control::messages() {
        abi = abi.with_message(message);
    }
    abi
}

/// The `my_timelock_controller` contract code
#[derive(Debug, Default, Clone, Copy)]
pub struct MyTimelockController;

impl ContractCode for MyTimelockController {
    fn abi(&self) -> &ContractAbi {
        &ABI
    }

    fn deploy(
        &self,
        env: &mut dyn Environment,
        selector: Selector,
        input: &[u8],
    ) -> Result<ExecReturnValue, ExecError> {
        let constructor = ABI
            .find_constructor_by_selector(&selector)
            .ok_or(ExecError::UnknownSelector(selector))?;
        match constructor.label.as_str() {
            CONSTRUCTOR_NEW => {
                let (min_delay, proposers, executors) = decode_with(input, |reader| {
                    let min_delay = reader.read_u64()?;
                    let proposers: Vec<AccountId> = read_sequence(reader)?;
                    let executors: Vec<AccountId> = read_sequence(reader)?;
                    Ok((min_delay, proposers, executors))
                })?;
                let admin = env.caller();
                reply(init_with_admin(env, admin, min_delay, proposers, executors))
            }
            _ => Err(ExecError::UnknownSelector(selector)),
        }
    }

    fn call(
        &self,
        env: &mut dyn Environment,
        selector: Selector,
        input: &[u8],
    ) -> Result<ExecReturnValue, ExecError> {
        let message = ABI
            .find_message_by_selector(&selector)
            .ok_or(ExecError::UnknownSelector(selector))?;
        trace!("TimelockController: {} called by {}", message.label, env.caller());

        if let Some(result) = access_control::dispatch(env, &message.label, input) {
            return result;
        }

        match message.label.as_str() {
            GET_MIN_DELAY => {
                decode_input::<()>(input)?;
                reply(get_min_delay(env))
            }
            IS_OPERATION => {
                let id: OperationId = decode_input(input)?;
                reply(operation_state(env, &id).map(|state| state != OperationState::Unset))
            }
            IS_OPERATION_PENDING => {
                let id: OperationId = decode_input(input)?;
                reply(operation_state(env, &id).map(|state| state.is_pending()))
            }
            IS_OPERATION_READY => {
                let id: OperationId = decode_input(input)?;
                reply(operation_state(env, &id).map(|state| state == OperationState::Ready))
            }
            IS_OPERATION_DONE => {
                let id: OperationId = decode_input(input)?;
                reply(operation_state(env, &id).map(|state| state == OperationState::Done))
            }
            GET_TIMESTAMP => {
                let id: OperationId = decode_input(input)?;
                reply(TIMESTAMPS.get_or_default(env, &id))
            }
            HASH_OPERATION => {
                let (transaction, predecessor, salt): (Transaction, Option<OperationId>, Salt) =
                    decode_input(input)?;
                reply(Ok(hash_operation(&transaction, &predecessor, &salt)))
            }
            HASH_OPERATION_BATCH => {
                let (transactions, predecessor, salt) = decode_batch_args(input)?;
                reply(Ok(hash_operation_batch(&transactions, &predecessor, &salt)))
            }
            SCHEDULE => {
                let (transaction, predecessor, salt, delay): (
                    Transaction,
                    Option<OperationId>,
                    Salt,
                    u64,
                ) = decode_input(input)?;
                respond(schedule(env, transaction, predecessor, salt, delay))
            }
            SCHEDULE_BATCH => {
                let (transactions, predecessor, salt, delay) = decode_with(input, |reader| {
                    Ok((
                        decode_batch(reader)?,
                        Option::<OperationId>::read(reader)?,
                        Salt::read(reader)?,
                        reader.read_u64()?,
                    ))
                })?;
                respond(schedule_batch(env, transactions, predecessor, salt, delay))
            }
            CANCEL => {
                let id: OperationId = decode_input(input)?;
                respond(cancel(env, id))
            }
            EXECUTE => {
                let (transaction, predecessor, salt): (Transaction, Option<OperationId>, Salt) =
                    decode_input(input)?;
                respond(execute(env, transaction, predecessor, salt))
            }
            EXECUTE_BATCH => {
                let (transactions, predecessor, salt) = decode_batch_args(input)?;
                respond(execute_batch(env, transactions, predecessor, salt))
            }
            UPDATE_DELAY => {
                let new_delay: u64 = decode_input(input)?;
                respond(update_delay(env, new_delay))
            }
            _ => Err(ExecError::UnknownSelector(selector)),
        }
    }
}

fn decode_batch_args(
    input: &[u8],
) -> Result<(Vec<Transaction>, Option<OperationId>, Salt), ExecError> {
    decode_with(input, |reader| {
        Ok((
            decode_batch(reader)?,
            Option::<OperationId>::read(reader)?,
            Salt::read(reader)?,
        ))
    })
}

/// Set up roles and the minimum delay
pub fn init_with_admin(
    env: &mut dyn Environment,
    admin: AccountId,
    min_delay: u64,
    proposers: Vec<AccountId>,
    executors: Vec<AccountId>,
) -> Result<(), ExecError> {
    let admin_role = *TIMELOCK_ADMIN_ROLE;
    access_control::set_role_admin(env, admin_role, admin_role)?;
    access_control::set_role_admin(env, *PROPOSER_ROLE, admin_role)?;
    access_control::set_role_admin(env, *EXECUTOR_ROLE, admin_role)?;

    access_control::setup_role(env, admin_role, admin)?;
    let this = env.account_id();
    access_control::setup_role(env, admin_role, this)?;

    for proposer in proposers {
        access_control::setup_role(env, *PROPOSER_ROLE, proposer)?;
    }
    for executor in executors {
        access_control::setup_role(env, *EXECUTOR_ROLE, executor)?;
    }

    MIN_DELAY.set(env, &min_delay)?;
    env.emit(&MinDelayChange {
        old_delay: 0,
        new_delay: min_delay,
    })?;
    debug!("TimelockController: Initialize {} with min delay {}", this, min_delay);
    Ok(())
}

pub fn get_min_delay(env: &mut dyn Environment) -> Result<u64, ExecError> {
    MIN_DELAY.get_or_default(env)
}

pub fn operation_state(
    env: &mut dyn Environment,
    id: &OperationId,
) -> Result<OperationState, ExecError> {
    let timestamp = TIMESTAMPS.get_or_default(env, id)?;
    Ok(OperationState::from_timestamp(timestamp, env.block_timestamp()))
}

fn check_role(env: &mut dyn Environment, role: RoleType) -> TimelockResult<()> {
    let caller = env.caller();
    access_control::check_role(env, role, &caller)?;
    Ok(())
}

/// The executor role is open to anyone once granted to the zero account
fn check_executor(env: &mut dyn Environment) -> TimelockResult<()> {
    if access_control::has_role(env, *EXECUTOR_ROLE, &AccountId::zero())? {
        return Ok(());
    }
    check_role(env, *EXECUTOR_ROLE)
}

pub fn schedule(
    env: &mut dyn Environment,
    transaction: Transaction,
    predecessor: Option<OperationId>,
    salt: Salt,
    delay: u64,
) -> TimelockResult<()> {
    check_role(env, *PROPOSER_ROLE)?;

    let id = hash_operation(&transaction, &predecessor, &salt);
    schedule_operation(env, id, delay)?;
    env.emit(&CallScheduled {
        id,
        index: 0,
        transaction,
        predecessor,
        delay,
    })?;
    Ok(())
}

pub fn schedule_batch(
    env: &mut dyn Environment,
    transactions: Vec<Transaction>,
    predecessor: Option<OperationId>,
    salt: Salt,
    delay: u64,
) -> TimelockResult<()> {
    check_role(env, *PROPOSER_ROLE)?;

    let id = hash_operation_batch(&transactions, &predecessor, &salt);
    schedule_operation(env, id, delay)?;
    for (index, transaction) in transactions.into_iter().enumerate() {
        env.emit(&CallScheduled {
            id,
            index: index as u32,
            transaction,
            predecessor,
            delay,
        })?;
    }
    Ok(())
}

fn schedule_operation(
    env: &mut dyn Environment,
    id: OperationId,
    delay: u64,
) -> TimelockResult<()> {
    if operation_state(env, &id)? != OperationState::Unset {
        return Err(TimelockControllerError::OperationAlreadyScheduled.into());
    }

    // A delay below the minimum is raised to it
    let delay = delay.max(get_min_delay(env)?);
    let ready_at = env
        .block_timestamp()
        .saturating_add(delay)
        .max(DONE_TIMESTAMP + 1);
    TIMESTAMPS.insert(env, &id, &ready_at)?;
    debug!("TimelockController: Schedule {} ready at {}", id, ready_at);
    Ok(())
}

pub fn cancel(env: &mut dyn Environment, id: OperationId) -> TimelockResult<()> {
    check_role(env, *PROPOSER_ROLE)?;

    if !operation_state(env, &id)?.is_pending() {
        return Err(TimelockControllerError::OperationCannotBeCanceled.into());
    }
    TIMESTAMPS.remove(env, &id)?;
    env.emit(&Cancelled { id })?;
    debug!("TimelockController: Cancel {}", id);
    Ok(())
}

pub fn execute(
    env: &mut dyn Environment,
    transaction: Transaction,
    predecessor: Option<OperationId>,
    salt: Salt,
) -> TimelockResult<()> {
    check_executor(env)?;

    let id = hash_operation(&transaction, &predecessor, &salt);
    before_call(env, &id, &predecessor)?;
    call(env, id, 0, transaction)?;
    after_call(env, &id)
}

pub fn execute_batch(
    env: &mut dyn Environment,
    transactions: Vec<Transaction>,
    predecessor: Option<OperationId>,
    salt: Salt,
) -> TimelockResult<()> {
    check_executor(env)?;

    let id = hash_operation_batch(&transactions, &predecessor, &salt);
    before_call(env, &id, &predecessor)?;
    for (index, transaction) in transactions.into_iter().enumerate() {
        call(env, id, index as u32, transaction)?;
    }
    after_call(env, &id)
}

fn before_call(
    env: &mut dyn Environment,
    id: &OperationId,
    predecessor: &Option<OperationId>,
) -> TimelockResult<()> {
    if operation_state(env, id)? != OperationState::Ready {
        return Err(TimelockControllerError::OperationIsNotReady.into());
    }
    if let Some(predecessor) = predecessor {
        if operation_state(env, predecessor)? != OperationState::Done {
            return Err(TimelockControllerError::MissingDependency.into());
        }
    }
    Ok(())
}

fn after_call(env: &mut dyn Environment, id: &OperationId) -> TimelockResult<()> {
    // The call may have touched the operation, e.g. by cancelling it
    if operation_state(env, id)? != OperationState::Ready {
        return Err(TimelockControllerError::OperationIsNotReady.into());
    }
    TIMESTAMPS.insert(env, id, &DONE_TIMESTAMP)?;
    debug!("TimelockController: Execute {} done", id);
    Ok(())
}

fn call(
    env: &mut dyn Environment,
    id: OperationId,
    index: u32,
    transaction: Transaction,
) -> TimelockResult<()> {
    if let Some(callee) = transaction.callee {
        let params = CallParams {
            callee,
            selector: transaction.selector,
            input: transaction.input.clone(),
            value: transaction.transferred_value,
            gas_limit: transaction.gas_limit,
        };
        match env.invoke_contract(params) {
            Ok(value) if !value.reverted => {}
            Ok(_) => {
                debug!("TimelockController: call {} of {} reverted", index, id);
                return Err(TimelockControllerError::UnderlyingTransactionReverted.into());
            }
            Err(e) => {
                warn!("TimelockController: call {} of {} failed: {}", index, id, e);
                return Err(TimelockControllerError::UnderlyingTransactionReverted.into());
            }
        }
    }

    env.emit(&CallExecuted {
        id,
        index,
        transaction,
    })?;
    Ok(())
}

/// Only reachable through a scheduled call from the timelock to itself
pub fn update_delay(env: &mut dyn Environment, new_delay: u64) -> TimelockResult<()> {
    if env.caller() != env.account_id() {
        return Err(TimelockControllerError::CallerMustBeTimeLock.into());
    }

    let old_delay = get_min_delay(env)?;
    MIN_DELAY.set(env, &new_delay)?;
    env.emit(&MinDelayChange {
        old_delay,
        new_delay,
    })?;
    debug!("TimelockController: min delay {} -> {}", old_delay, new_delay);
    Ok(())
}
