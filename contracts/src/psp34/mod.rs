//! PSP34 non-fungible token with the mintable extension.
//!
//! Any account may mint: `PSP34Mintable::mint` takes an explicit id while
//! `mint_token` mints `Id::U8(n)` with an internal counter starting at zero.
//!
//! # Storage Layout
//!
//! - `psp34:own:<id>` -> AccountId (token owner)
//! - `psp34:cnt:<account>` -> u32 (number of owned tokens)
//! - `psp34:opr:<owner><operator><option id>` -> () (operator approval)
//! - `psp34:supply` -> u128
//! - `psp34:next` -> u16 (next id used by `mint_token`, 256 once exhausted)
//!
//! # Authorization
//!
//! A transfer is allowed when the caller is the owner, or holds an approval
//! from the owner either for every token (`None`) or for that id. Granting a
//! per token approval on behalf of the owner needs an approval for every
//! token: a per token approval cannot be handed on.
//!
//! # Transfer Hooks
//!
//! Mints and transfers run through [`TransferHooks`] before and after the
//! ownership change. An `Err` from either hook reverts the whole message.

use lazy_static::lazy_static;
use log::{debug, trace};
use showgame_common::{
    config::Balance,
    contract::{ContractAbi, ExecReturnValue, MessageSpec, Selector},
    crypto::AccountId,
    psp34::{prefixes, Approval, Id, Psp34Error, Transfer},
};

use crate::{
    code::{decode_input, reply, respond, ContractCode},
    env::{EnvExt, Environment},
    error::{ExecError, MessageResult},
    storage::{Lazy, Mapping},
};

mod hooked;

pub use hooked::{
    MyPsp34Hooked, AFTER_TRANSFER_ERROR, BEFORE_TRANSFER_ERROR, CHANGE_STATE_ERR_ON_AFTER,
    CHANGE_STATE_ERR_ON_BEFORE,
};

pub const CONTRACT_NAME: &str = "my_psp34";

pub const CONSTRUCTOR_NEW: &str = "new";
pub const BALANCE_OF: &str = "PSP34::balance_of";
pub const OWNER_OF: &str = "PSP34::owner_of";
pub const ALLOWANCE: &str = "PSP34::allowance";
pub const APPROVE: &str = "PSP34::approve";
pub const TRANSFER: &str = "PSP34::transfer";
pub const TOTAL_SUPPLY: &str = "PSP34::total_supply";
pub const COLLECTION_ID: &str = "PSP34::collection_id";
pub const MINT: &str = "PSP34Mintable::mint";
pub const MINT_TOKEN: &str = "mint_token";

type ApprovalKey = (AccountId, AccountId, Option<Id>);

const TOKEN_OWNER: Mapping<Id, AccountId> = Mapping::new(prefixes::TOKEN_OWNER);
const OWNED_TOKENS_COUNT: Mapping<AccountId, u32> = Mapping::new(prefixes::OWNED_TOKENS_COUNT);
const OPERATOR_APPROVALS: Mapping<ApprovalKey, ()> = Mapping::new(prefixes::OPERATOR_APPROVALS);
const TOTAL_SUPPLY_CELL: Lazy<Balance> = Lazy::new(prefixes::TOTAL_SUPPLY);
const NEXT_ID: Lazy<u16> = Lazy::new(prefixes::NEXT_ID);

lazy_static! {
    static ref ABI: ContractAbi = ContractAbi::new(CONTRACT_NAME, env!("CARGO_PKG_VERSION"))
        .with_constructor(MessageSpec::tx(CONSTRUCTOR_NEW))
        .with_message(
            MessageSpec::query(BALANCE_OF)
                .arg("owner", "AccountId")
                .returns("u32")
        )
        .with_message(
            MessageSpec::query(OWNER_OF)
                .arg("id", "Id")
                .returns("Option<AccountId>")
        )
        .with_message(
            MessageSpec::query(ALLOWANCE)
                .arg("owner", "AccountId")
                .arg("operator", "AccountId")
                .arg("id", "Option<Id>")
                .returns("bool")
        )
        .with_message(
            MessageSpec::tx(APPROVE)
                .arg("operator", "AccountId")
                .arg("id", "Option<Id>")
                .arg("approved", "bool")
                .returns("Result<(), PSP34Error>")
        )
        .with_message(
            MessageSpec::tx(TRANSFER)
                .arg("to", "AccountId")
                .arg("id", "Id")
                .arg("data", "Vec<u8>")
                .returns("Result<(), PSP34Error>")
        )
        .with_message(MessageSpec::query(TOTAL_SUPPLY).returns("Balance"))
        .with_message(MessageSpec::query(COLLECTION_ID).returns("Id"))
        .with_message(
            MessageSpec::tx(MINT)
                .arg("id", "Id")
                .returns("Result<(), PSP34Error>")
        )
        .with_message(MessageSpec::tx(MINT_TOKEN).returns("Result<(), PSP34Error>"));
}

/// Extension points around every ownership change.
///
/// `from` is None on mint. Both default to accepting the transfer.
pub trait TransferHooks {
    fn before_token_transfer(
        &self,
        _env: &mut dyn Environment,
        _from: Option<&AccountId>,
        _to: Option<&AccountId>,
        _id: &Id,
    ) -> MessageResult<(), Psp34Error> {
        Ok(())
    }

    fn after_token_transfer(
        &self,
        _env: &mut dyn Environment,
        _from: Option<&AccountId>,
        _to: Option<&AccountId>,
        _id: &Id,
    ) -> MessageResult<(), Psp34Error> {
        Ok(())
    }
}

/// The `my_psp34` contract code
#[derive(Debug, Default, Clone, Copy)]
pub struct MyPsp34;

impl TransferHooks for MyPsp34 {}

impl ContractCode for MyPsp34 {
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
                decode_input::<()>(input)?;
                debug!("PSP34: new collection {}", env.account_id());
                reply(Ok(()))
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
        dispatch(env, self, &message.label, selector, input)
    }
}

/// Serve the PSP34 message `label` with `hooks` around ownership changes.
/// Shared by every code built on this token.
pub(crate) fn dispatch(
    env: &mut dyn Environment,
    hooks: &dyn TransferHooks,
    label: &str,
    selector: Selector,
    input: &[u8],
) -> Result<ExecReturnValue, ExecError> {
    trace!("PSP34: {} called by {}", label, env.caller());

    match label {
        BALANCE_OF => {
            let owner: AccountId = decode_input(input)?;
            reply(balance_of(env, &owner))
        }
        OWNER_OF => {
            let id: Id = decode_input(input)?;
            reply(owner_of(env, &id))
        }
        ALLOWANCE => {
            let (owner, operator, id): ApprovalKey = decode_input(input)?;
            reply(allowance(env, &owner, &operator, id.as_ref()))
        }
        APPROVE => {
            let (operator, id, approved): (AccountId, Option<Id>, bool) = decode_input(input)?;
            respond(approve(env, operator, id, approved))
        }
        TRANSFER => {
            let (to, id, data): (AccountId, Id, Vec<u8>) = decode_input(input)?;
            respond(transfer(env, hooks, to, id, data))
        }
        TOTAL_SUPPLY => {
            decode_input::<()>(input)?;
            reply(TOTAL_SUPPLY_CELL.get_or_default(env))
        }
        COLLECTION_ID => {
            decode_input::<()>(input)?;
            reply(Ok(collection_id(env)))
        }
        MINT => {
            let id: Id = decode_input(input)?;
            let caller = env.caller();
            respond(mint_to(env, hooks, caller, id))
        }
        MINT_TOKEN => {
            decode_input::<()>(input)?;
            respond(mint_token(env, hooks))
        }
        _ => Err(ExecError::UnknownSelector(selector)),
    }
}

/// The collection is identified by the contract address
pub fn collection_id(env: &dyn Environment) -> Id {
    Id::Bytes(env.account_id().to_bytes().to_vec())
}

pub fn balance_of(env: &mut dyn Environment, owner: &AccountId) -> Result<u32, ExecError> {
    OWNED_TOKENS_COUNT.get_or_default(env, owner)
}

pub fn owner_of(env: &mut dyn Environment, id: &Id) -> Result<Option<AccountId>, ExecError> {
    TOKEN_OWNER.get(env, id)
}

/// True when `operator` may move every token of `owner`, or `id` in particular
pub fn allowance(
    env: &mut dyn Environment,
    owner: &AccountId,
    operator: &AccountId,
    id: Option<&Id>,
) -> Result<bool, ExecError> {
    if OPERATOR_APPROVALS.contains(env, &(*owner, *operator, None))? {
        return Ok(true);
    }
    match id {
        Some(id) => OPERATOR_APPROVALS.contains(env, &(*owner, *operator, Some(id.clone()))),
        None => Ok(false),
    }
}

pub fn approve(
    env: &mut dyn Environment,
    operator: AccountId,
    id: Option<Id>,
    approved: bool,
) -> MessageResult<(), Psp34Error> {
    let mut caller = env.caller();

    // Approving a single token acts on behalf of its owner
    if let Some(id) = &id {
        let owner = owner_of(env, id)?.ok_or(Psp34Error::TokenNotExists)?;
        if approved && owner == operator {
            return Err(Psp34Error::SelfApprove.into());
        }
        if owner != caller && !allowance(env, &owner, &caller, None)? {
            return Err(Psp34Error::NotApproved.into());
        }
        caller = owner;
    } else if approved && caller == operator {
        return Err(Psp34Error::SelfApprove.into());
    }

    let key = (caller, operator, id.clone());
    if approved {
        OPERATOR_APPROVALS.insert(env, &key, &())?;
    } else {
        OPERATOR_APPROVALS.remove(env, &key)?;
    }

    env.emit(&Approval {
        owner: caller,
        operator,
        id,
        approved,
    })?;
    Ok(())
}

pub fn transfer(
    env: &mut dyn Environment,
    hooks: &dyn TransferHooks,
    to: AccountId,
    id: Id,
    _data: Vec<u8>,
) -> MessageResult<(), Psp34Error> {
    let caller = env.caller();

    // Step 1: the token must exist
    let owner = owner_of(env, &id)?.ok_or(Psp34Error::TokenNotExists)?;

    // Step 2: the caller must be the owner or an approved operator
    if owner != caller && !allowance(env, &owner, &caller, Some(&id))? {
        return Err(Psp34Error::NotApproved.into());
    }

    hooks.before_token_transfer(env, Some(&owner), Some(&to), &id)?;

    // Step 3: a per token approval is consumed by the transfer
    OPERATOR_APPROVALS.remove(env, &(owner, caller, Some(id.clone())))?;

    // Step 4: move ownership
    let from_count = balance_of(env, &owner)?;
    OWNED_TOKENS_COUNT.insert(env, &owner, &from_count.saturating_sub(1))?;
    let to_count = balance_of(env, &to)?;
    OWNED_TOKENS_COUNT.insert(env, &to, &to_count.saturating_add(1))?;
    TOKEN_OWNER.insert(env, &id, &to)?;

    hooks.after_token_transfer(env, Some(&owner), Some(&to), &id)?;
    env.emit(&Transfer {
        from: Some(owner),
        to: Some(to),
        id: id.clone(),
    })?;
    debug!("PSP34: {} transferred from {} to {}", id, owner, to);
    Ok(())
}

pub fn mint_to(
    env: &mut dyn Environment,
    hooks: &dyn TransferHooks,
    to: AccountId,
    id: Id,
) -> MessageResult<(), Psp34Error> {
    if TOKEN_OWNER.contains(env, &id)? {
        return Err(Psp34Error::TokenExists.into());
    }
    hooks.before_token_transfer(env, None, Some(&to), &id)?;

    let count = balance_of(env, &to)?;
    OWNED_TOKENS_COUNT.insert(env, &to, &count.saturating_add(1))?;
    TOKEN_OWNER.insert(env, &id, &to)?;
    let supply = TOTAL_SUPPLY_CELL.get_or_default(env)?;
    TOTAL_SUPPLY_CELL.set(env, &supply.saturating_add(1))?;

    hooks.after_token_transfer(env, None, Some(&to), &id)?;
    env.emit(&Transfer {
        from: None,
        to: Some(to),
        id: id.clone(),
    })?;
    debug!("PSP34: {} minted to {}", id, to);
    Ok(())
}

/// Mint `Id::U8(next_id)` to the caller and bump the counter.
///
/// Every id from `U8(0)` to `U8(255)` can be minted this way, the call after
/// that fails.
pub fn mint_token(
    env: &mut dyn Environment,
    hooks: &dyn TransferHooks,
) -> MessageResult<(), Psp34Error> {
    let next_id = NEXT_ID.get_or_default(env)?;
    let id = u8::try_from(next_id)
        .map_err(|_| Psp34Error::Custom("No U8 id left to mint".to_string()))?;

    let caller = env.caller();
    mint_to(env, hooks, caller, Id::U8(id))?;
    NEXT_ID.set(env, &(next_id + 1))?;
    Ok(())
}

#[cfg(test)]
mod tests;
