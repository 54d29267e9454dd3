use showgame_common::{
    access_control::AccessControlError,
    contract::Selector,
    crypto::AccountId,
    psp34::Psp34Error,
    serializer::ReaderError,
    timelock::TimelockControllerError,
};
use thiserror::Error;

/// Failures raised by the host while serving a contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("Call depth {depth} exceeds maximum {max_depth}")]
    CallDepthExceeded { depth: usize, max_depth: usize },

    #[error("Out of gas: {required} required, {left} left")]
    OutOfGas { required: u64, left: u64 },

    #[error("Insufficient balance: {required} required, {available} available")]
    InsufficientBalance { required: u128, available: u128 },

    #[error("Contract {0} not found")]
    ContractNotFound(AccountId),

    #[error("Message {0} is not payable")]
    NotPayable(Selector),

    #[error("Value of {size} bytes exceeds maximum {max}")]
    ValueTooLarge { size: usize, max: usize },

    #[error("Callee trapped: {0}")]
    CalleeTrapped(String),
}

/// A contract call that could not produce a return value at all.
///
/// Unlike a revert, which carries an encoded error back to the caller,
/// these abort the call frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("Unknown selector {0}")]
    UnknownSelector(Selector),

    #[error("Cannot decode call input: {0}")]
    InvalidInput(ReaderError),

    #[error("Cannot decode storage value: {0}")]
    CorruptedStorage(ReaderError),
}

/// Error of a message body: either the contract's own error, which reverts
/// with an encoded value, or an execution failure that traps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageError<E> {
    Contract(E),
    Exec(ExecError),
}

pub type MessageResult<T, E> = Result<T, MessageError<E>>;

impl<E> From<ExecError> for MessageError<E> {
    fn from(err: ExecError) -> Self {
        Self::Exec(err)
    }
}

impl<E> From<EnvError> for MessageError<E> {
    fn from(err: EnvError) -> Self {
        Self::Exec(ExecError::Env(err))
    }
}

macro_rules! impl_contract_error {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for MessageError<$err> {
                fn from(err: $err) -> Self {
                    Self::Contract(err)
                }
            }
        )+
    };
}

impl_contract_error!(Psp34Error, AccessControlError, TimelockControllerError);

impl From<AccessControlError> for MessageError<TimelockControllerError> {
    fn from(err: AccessControlError) -> Self {
        Self::Contract(err.into())
    }
}

impl From<MessageError<AccessControlError>> for MessageError<TimelockControllerError> {
    fn from(err: MessageError<AccessControlError>) -> Self {
        match err {
            MessageError::Contract(err) => Self::Contract(err.into()),
            MessageError::Exec(err) => Self::Exec(err),
        }
    }
}
