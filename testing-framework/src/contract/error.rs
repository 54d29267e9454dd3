use showgame_common::serializer::{Reader, ReaderError, Serializer};
use showgame_contracts::ExecError;
use showgame_daemon::{BlockchainError, DispatchError};
use thiserror::Error;

use crate::api::ApiError;

/// Why a query could not return a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Message {0} is not in the contract metadata")]
    UnknownMessage(String),

    #[error("Contract trapped: {0}")]
    Trapped(ExecError),

    #[error(transparent)]
    Node(#[from] BlockchainError),

    #[error("Cannot decode the returned value: {0}")]
    Decode(#[from] ReaderError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Why a transaction was rejected.
///
/// `E` is the error type of the contract message, a revert is decoded into
/// it so tests can match on the exact failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError<E> {
    #[error("Transaction reverted: {error:?}")]
    Reverted { error: E, data: Vec<u8> },

    #[error("Transaction reverted with undecodable data 0x{}", hex_data(.data))]
    Undecodable { data: Vec<u8> },

    #[error("Contract trapped: {0}")]
    Trapped(ExecError),

    #[error("Message {0} is not in the contract metadata")]
    UnknownMessage(String),

    #[error(transparent)]
    Node(#[from] BlockchainError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn hex_data(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

impl<E> TxError<E> {
    /// The decoded contract error, if the contract reverted
    pub fn contract_error(&self) -> Option<&E> {
        match self {
            Self::Reverted { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_reverted(&self) -> bool {
        matches!(self, Self::Reverted { .. } | Self::Undecodable { .. })
    }
}

impl<E: Serializer> TxError<E> {
    /// Decode the `Err` of an encoded `Result<_, E>` returned by a revert
    pub fn from_revert(data: Vec<u8>) -> Self {
        let mut reader = Reader::new(&data);
        let decoded = match reader.read_u8() {
            Ok(1) => E::read(&mut reader).ok().filter(|_| reader.size() == 0),
            _ => None,
        };
        match decoded {
            Some(error) => Self::Reverted { error, data },
            None => Self::Undecodable { data },
        }
    }

    pub(crate) fn from_dispatch(err: DispatchError) -> Self {
        match err {
            DispatchError::ContractReverted { data } => Self::from_revert(data),
            DispatchError::ContractTrapped(err) => Self::Trapped(err),
            DispatchError::Blockchain(err) => Self::Node(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showgame_common::psp34::Psp34Error;

    #[test]
    fn test_decode_revert() {
        let data = Err::<(), _>(Psp34Error::NotApproved).to_bytes();
        let err = TxError::<Psp34Error>::from_revert(data);
        assert_eq!(err.contract_error(), Some(&Psp34Error::NotApproved));
        assert!(err.is_reverted());

        let err = TxError::<Psp34Error>::from_revert(vec![0xff]);
        assert!(matches!(err, TxError::Undecodable { .. }));
    }
}
