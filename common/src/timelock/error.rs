use thiserror::Error;

use crate::{
    access_control::AccessControlError,
    serializer::{Reader, ReaderError, Serializer, Writer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimelockControllerError {
    #[error(transparent)]
    AccessControlError(#[from] AccessControlError),
    #[error("Delay is lower than the minimum delay")]
    InsufficientDelay,
    #[error("Operation is already scheduled")]
    OperationAlreadyScheduled,
    #[error("Operation cannot be canceled")]
    OperationCannotBeCanceled,
    #[error("Operation is not ready")]
    OperationIsNotReady,
    #[error("Predecessor operation is not done")]
    MissingDependency,
    #[error("Underlying transaction reverted")]
    UnderlyingTransactionReverted,
    #[error("Caller must be the timelock itself")]
    CallerMustBeTimeLock,
}

impl Serializer for TimelockControllerError {
    fn write(&self, writer: &mut Writer) {
        match self {
            Self::AccessControlError(err) => {
                writer.write_u8(0);
                err.write(writer);
            }
            Self::InsufficientDelay => writer.write_u8(1),
            Self::OperationAlreadyScheduled => writer.write_u8(2),
            Self::OperationCannotBeCanceled => writer.write_u8(3),
            Self::OperationIsNotReady => writer.write_u8(4),
            Self::MissingDependency => writer.write_u8(5),
            Self::UnderlyingTransactionReverted => writer.write_u8(6),
            Self::CallerMustBeTimeLock => writer.write_u8(7),
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => Self::AccessControlError(AccessControlError::read(reader)?),
            1 => Self::InsufficientDelay,
            2 => Self::OperationAlreadyScheduled,
            3 => Self::OperationCannotBeCanceled,
            4 => Self::OperationIsNotReady,
            5 => Self::MissingDependency,
            6 => Self::UnderlyingTransactionReverted,
            7 => Self::CallerMustBeTimeLock,
            _ => return Err(ReaderError::InvalidValue),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_access_control_error() {
        let err: TimelockControllerError = AccessControlError::MissingRole.into();
        let bytes = err.to_bytes();
        assert_eq!(bytes, vec![0, 1]);
        assert_eq!(TimelockControllerError::from_bytes(&bytes).unwrap(), err);
    }
}
