// Role membership shared by role gated contracts.
//
// Storage:
// - ac:mem:<role><account> -> ()     (present when the account holds the role)
// - ac:adm:<role>          -> role   (admin of the role, DEFAULT_ADMIN_ROLE when unset)

use log::debug;
use showgame_common::{
    access_control::{
        prefixes, AccessControlError, RoleAdminChanged, RoleGranted, RoleRevoked, RoleType,
        DEFAULT_ADMIN_ROLE,
    },
    contract::{ExecReturnValue, MessageSpec},
    crypto::AccountId,
};

use crate::{
    code::{decode_input, reply, respond},
    env::{EnvExt, Environment},
    error::{ExecError, MessageResult},
    storage::Mapping,
};

const MEMBERS: Mapping<(RoleType, AccountId), ()> = Mapping::new(prefixes::MEMBERS);
const ADMIN_ROLES: Mapping<RoleType, RoleType> = Mapping::new(prefixes::ADMIN_ROLES);

pub const HAS_ROLE: &str = "AccessControl::has_role";
pub const GET_ROLE_ADMIN: &str = "AccessControl::get_role_admin";
pub const GRANT_ROLE: &str = "AccessControl::grant_role";
pub const REVOKE_ROLE: &str = "AccessControl::revoke_role";
pub const RENOUNCE_ROLE: &str = "AccessControl::renounce_role";

/// Message specs to merge into the ABI of a role gated contract
pub fn messages() -> Vec<MessageSpec> {
    vec![
        MessageSpec::query(HAS_ROLE)
            .arg("role", "RoleType")
            .arg("address", "AccountId")
            .returns("bool"),
        MessageSpec::query(GET_ROLE_ADMIN)
            .arg("role", "RoleType")
            .returns("RoleType"),
        MessageSpec::tx(GRANT_ROLE)
            .arg("role", "RoleType")
            .arg("account", "AccountId")
            .returns("Result<(), AccessControlError>"),
        MessageSpec::tx(REVOKE_ROLE)
            .arg("role", "RoleType")
            .arg("account", "AccountId")
            .returns("Result<(), AccessControlError>"),
        MessageSpec::tx(RENOUNCE_ROLE)
            .arg("role", "RoleType")
            .arg("account", "AccountId")
            .returns("Result<(), AccessControlError>"),
    ]
}

/// Serve an `AccessControl::*` message, None when the label is not one
pub fn dispatch(
    env: &mut dyn Environment,
    label: &str,
    input: &[u8],
) -> Option<Result<ExecReturnValue, ExecError>> {
    let result = match label {
        HAS_ROLE => decode_input::<(RoleType, AccountId)>(input)
            .and_then(|(role, account)| reply(has_role(env, role, &account))),
        GET_ROLE_ADMIN => {
            decode_input::<RoleType>(input).and_then(|role| reply(get_role_admin(env, role)))
        }
        GRANT_ROLE => decode_input::<(RoleType, AccountId)>(input)
            .and_then(|(role, account)| respond(grant_role(env, role, account))),
        REVOKE_ROLE => decode_input::<(RoleType, AccountId)>(input)
            .and_then(|(role, account)| respond(revoke_role(env, role, account))),
        RENOUNCE_ROLE => decode_input::<(RoleType, AccountId)>(input)
            .and_then(|(role, account)| respond(renounce_role(env, role, account))),
        _ => return None,
    };
    Some(result)
}

pub fn has_role(
    env: &mut dyn Environment,
    role: RoleType,
    account: &AccountId,
) -> Result<bool, ExecError> {
    MEMBERS.contains(env, &(role, *account))
}

pub fn get_role_admin(env: &mut dyn Environment, role: RoleType) -> Result<RoleType, ExecError> {
    Ok(ADMIN_ROLES.get(env, &role)?.unwrap_or(DEFAULT_ADMIN_ROLE))
}

/// Fails with MissingRole unless `account` holds `role`
pub fn check_role(
    env: &mut dyn Environment,
    role: RoleType,
    account: &AccountId,
) -> MessageResult<(), AccessControlError> {
    if !has_role(env, role, account)? {
        return Err(AccessControlError::MissingRole.into());
    }
    Ok(())
}

pub fn grant_role(
    env: &mut dyn Environment,
    role: RoleType,
    account: AccountId,
) -> MessageResult<(), AccessControlError> {
    let caller = env.caller();
    let admin = get_role_admin(env, role)?;
    check_role(env, admin, &caller)?;
    if has_role(env, role, &account)? {
        return Err(AccessControlError::RoleRedundant.into());
    }

    MEMBERS.insert(env, &(role, account), &())?;
    env.emit(&RoleGranted {
        role,
        grantee: account,
        grantor: Some(caller),
    })?;
    debug!("AccessControl: role {} granted to {} by {}", role, account, caller);
    Ok(())
}

pub fn revoke_role(
    env: &mut dyn Environment,
    role: RoleType,
    account: AccountId,
) -> MessageResult<(), AccessControlError> {
    let caller = env.caller();
    let admin = get_role_admin(env, role)?;
    check_role(env, admin, &caller)?;
    check_role(env, role, &account)?;

    remove_role(env, role, account, caller)?;
    Ok(())
}

/// An account may only renounce roles for itself
pub fn renounce_role(
    env: &mut dyn Environment,
    role: RoleType,
    account: AccountId,
) -> MessageResult<(), AccessControlError> {
    let caller = env.caller();
    if caller != account {
        return Err(AccessControlError::InvalidCaller.into());
    }
    check_role(env, role, &caller)?;

    remove_role(env, role, account, caller)?;
    Ok(())
}

/// Grant without any admin check, used by constructors
pub fn setup_role(
    env: &mut dyn Environment,
    role: RoleType,
    account: AccountId,
) -> Result<(), ExecError> {
    if MEMBERS.contains(env, &(role, account))? {
        return Ok(());
    }
    MEMBERS.insert(env, &(role, account), &())?;
    env.emit(&RoleGranted {
        role,
        grantee: account,
        grantor: None,
    })?;
    Ok(())
}

pub fn set_role_admin(
    env: &mut dyn Environment,
    role: RoleType,
    new_admin: RoleType,
) -> Result<(), ExecError> {
    let previous_admin_role = get_role_admin(env, role)?;
    ADMIN_ROLES.insert(env, &role, &new_admin)?;
    env.emit(&RoleAdminChanged {
        role,
        previous_admin_role,
        new_admin_role: new_admin,
    })?;
    Ok(())
}

fn remove_role(
    env: &mut dyn Environment,
    role: RoleType,
    account: AccountId,
    admin: AccountId,
) -> Result<(), ExecError> {
    MEMBERS.remove(env, &(role, account))?;
    env.emit(&RoleRevoked {
        role,
        account,
        admin,
    })?;
    debug!("AccessControl: role {} revoked from {}", role, account);
    Ok(())
}
