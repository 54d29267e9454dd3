use showgame_common::{
    config::Balance,
    crypto::{AccountId, CryptoError, Hash},
    serializer::ReaderError,
};
use showgame_contracts::ExecError;
use thiserror::Error;

/// Errors raised by the node itself, as opposed to the contracts it hosts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockchainError {
    #[error("Invalid signature on extrinsic from {account}: {error}")]
    InvalidSignature {
        account: AccountId,
        error: CryptoError,
    },

    #[error("Invalid nonce for {account}: expected {expected}, got {got}")]
    InvalidNonce {
        account: AccountId,
        expected: u64,
        got: u64,
    },

    #[error("Insufficient balance for {account}: {required} required, {available} available")]
    InsufficientBalance {
        account: AccountId,
        required: Balance,
        available: Balance,
    },

    #[error("Code {0} is not known by this node")]
    CodeNotAvailable(Hash),

    #[error("Code {0} has not been uploaded")]
    CodeNotUploaded(Hash),

    #[error("Contract {0} already exists")]
    ContractAlreadyExists(AccountId),

    #[error("Contract {0} not found")]
    ContractNotFound(AccountId),

    #[error("Salt of {size} bytes exceeds maximum {max}")]
    SaltTooLarge { size: usize, max: usize },

    #[error("Extrinsic of {size} bytes exceeds maximum {max}")]
    ExtrinsicTooLarge { size: usize, max: usize },

    #[error("Block {0} not found")]
    BlockNotFound(u64),

    #[error("Node is disconnected")]
    Disconnected,

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("Cannot decode: {0}")]
    Decode(#[from] ReaderError),
}

/// Why a dispatched call did not succeed.
///
/// The extrinsic is still included in a block (its nonce is consumed) but
/// every state change it made is discarded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The contract returned an encoded error
    #[error("Contract reverted")]
    ContractReverted { data: Vec<u8> },

    /// The contract could not produce a return value
    #[error("Contract trapped: {0}")]
    ContractTrapped(ExecError),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

impl From<ExecError> for DispatchError {
    fn from(err: ExecError) -> Self {
        Self::ContractTrapped(err)
    }
}
