use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

use super::DONE_TIMESTAMP;

/// Lifecycle of a timelock operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum OperationState {
    Unset,
    Pending,
    Ready,
    Done,
}

impl OperationState {
    /// Derive the state from the stored ready timestamp
    pub fn from_timestamp(timestamp: u64, now: u64) -> Self {
        match timestamp {
            0 => Self::Unset,
            DONE_TIMESTAMP => Self::Done,
            ts if ts > now => Self::Pending,
            _ => Self::Ready,
        }
    }

    /// Pending holds for both waiting and ready operations
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending | Self::Ready)
    }

    pub fn id(&self) -> u8 {
        match self {
            Self::Unset => 0,
            Self::Pending => 1,
            Self::Ready => 2,
            Self::Done => 3,
        }
    }
}

impl Serializer for OperationState {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.id());
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => Self::Unset,
            1 => Self::Pending,
            2 => Self::Ready,
            3 => Self::Done,
            _ => return Err(ReaderError::InvalidValue),
        })
    }

    fn size(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_timestamp() {
        assert_eq!(OperationState::from_timestamp(0, 100), OperationState::Unset);
        assert_eq!(OperationState::from_timestamp(1, 100), OperationState::Done);
        assert_eq!(OperationState::from_timestamp(150, 100), OperationState::Pending);
        assert_eq!(OperationState::from_timestamp(100, 100), OperationState::Ready);
        assert!(OperationState::Ready.is_pending());
        assert!(!OperationState::Done.is_pending());
    }

    #[test]
    fn test_strum_names() {
        assert_eq!(OperationState::Ready.to_string(), "Ready");
        assert_eq!(OperationState::from_str("Done").unwrap(), OperationState::Done);
    }
}
