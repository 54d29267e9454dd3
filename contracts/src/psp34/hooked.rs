//! PSP34 whose transfer hooks can be switched to fail.
//!
//! Serves every `my_psp34` message plus two toggles. While a toggle is on,
//! the matching hook rejects every mint and transfer with a `Custom` error.

use lazy_static::lazy_static;
use log::debug;
use showgame_common::{
    contract::{ContractAbi, ExecReturnValue, MessageSpec, Selector},
    crypto::AccountId,
    psp34::{Id, Psp34Error},
};

use super::{dispatch, TransferHooks, ABI as PSP34_ABI, CONSTRUCTOR_NEW};
use crate::{
    code::{decode_input, reply, ContractCode},
    env::Environment,
    error::{ExecError, MessageResult},
    storage::Lazy,
};

pub const HOOKED_CONTRACT_NAME: &str = "my_psp34_hooked";

pub const CHANGE_STATE_ERR_ON_BEFORE: &str = "change_state_err_on_before";
pub const CHANGE_STATE_ERR_ON_AFTER: &str = "change_state_err_on_after";

pub const BEFORE_TRANSFER_ERROR: &str = "Error on before_token_transfer";
pub const AFTER_TRANSFER_ERROR: &str = "Error on after_token_transfer";

const ERR_ON_BEFORE: Lazy<bool> = Lazy::new(b"psp34:hook:before");
const ERR_ON_AFTER: Lazy<bool> = Lazy::new(b"psp34:hook:after");

lazy_static! {
    static ref ABI: ContractAbi = {
        let mut abi = PSP34_ABI.clone();
        abi.name = HOOKED_CONTRACT_NAME.to_string();
        abi.with_message(MessageSpec::tx(CHANGE_STATE_ERR_ON_BEFORE))
            .with_message(MessageSpec::tx(CHANGE_STATE_ERR_ON_AFTER))
    };
}

/// The `my_psp34_hooked` contract code
#[derive(Debug, Default, Clone, Copy)]
pub struct MyPsp34Hooked;

fn toggle(env: &mut dyn Environment, flag: &Lazy<bool>) -> Result<(), ExecError> {
    let value = !flag.get_or_default(env)?;
    flag.set(env, &value)?;
    debug!("PSP34: hook failure switched {}", if value { "on" } else { "off" });
    Ok(())
}

impl TransferHooks for MyPsp34Hooked {
    fn before_token_transfer(
        &self,
        env: &mut dyn Environment,
        _from: Option<&AccountId>,
        _to: Option<&AccountId>,
        _id: &Id,
    ) -> MessageResult<(), Psp34Error> {
        if ERR_ON_BEFORE.get_or_default(env)? {
            return Err(Psp34Error::Custom(BEFORE_TRANSFER_ERROR.to_string()).into());
        }
        Ok(())
    }

    fn after_token_transfer(
        &self,
        env: &mut dyn Environment,
        _from: Option<&AccountId>,
        _to: Option<&AccountId>,
        _id: &Id,
    ) -> MessageResult<(), Psp34Error> {
        if ERR_ON_AFTER.get_or_default(env)? {
            return Err(Psp34Error::Custom(AFTER_TRANSFER_ERROR.to_string()).into());
        }
        Ok(())
    }
}

impl ContractCode for MyPsp34Hooked {
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
        if constructor.label != CONSTRUCTOR_NEW {
            return Err(ExecError::UnknownSelector(selector));
        }
        decode_input::<()>(input)?;
        debug!("PSP34: new hooked collection {}", env.account_id());
        reply(Ok(()))
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

        match message.label.as_str() {
            CHANGE_STATE_ERR_ON_BEFORE => {
                decode_input::<()>(input)?;
                reply(toggle(env, &ERR_ON_BEFORE))
            }
            CHANGE_STATE_ERR_ON_AFTER => {
                decode_input::<()>(input)?;
                reply(toggle(env, &ERR_ON_AFTER))
            }
            label => dispatch(env, self, label, selector, input),
        }
    }
}
