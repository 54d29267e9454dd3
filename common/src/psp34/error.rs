use thiserror::Error;

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Errors returned by PSP34 messages.
///
/// The discriminant is the tag used on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Psp34Error {
    #[error("{0}")]
    Custom(String),
    #[error("Cannot approve yourself")]
    SelfApprove,
    #[error("Caller is not the owner nor an approved operator")]
    NotApproved,
    #[error("Token already exists")]
    TokenExists,
    #[error("Token does not exist")]
    TokenNotExists,
    #[error("Safe transfer check failed: {0}")]
    SafeTransferCheckFailed(String),
}

impl Serializer for Psp34Error {
    fn write(&self, writer: &mut Writer) {
        match self {
            Self::Custom(msg) => {
                writer.write_u8(0);
                writer.write_string(msg);
            }
            Self::SelfApprove => writer.write_u8(1),
            Self::NotApproved => writer.write_u8(2),
            Self::TokenExists => writer.write_u8(3),
            Self::TokenNotExists => writer.write_u8(4),
            Self::SafeTransferCheckFailed(msg) => {
                writer.write_u8(5);
                writer.write_string(msg);
            }
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => Self::Custom(reader.read_string()?),
            1 => Self::SelfApprove,
            2 => Self::NotApproved,
            3 => Self::TokenExists,
            4 => Self::TokenNotExists,
            5 => Self::SafeTransferCheckFailed(reader.read_string()?),
            _ => return Err(ReaderError::InvalidValue),
        })
    }
}
