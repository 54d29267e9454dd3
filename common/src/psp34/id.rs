use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoStaticStr;

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Token identifier.
///
/// Variants are distinct from each other even when they carry the same
/// numeric value: `Id::U8(1)` and `Id::U16(1)` are two different tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, IntoStaticStr)]
pub enum Id {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Bytes(Vec<u8>),
}

impl Id {
    fn tag(&self) -> u8 {
        match self {
            Self::U8(_) => 0,
            Self::U16(_) => 1,
            Self::U32(_) => 2,
            Self::U64(_) => 3,
            Self::U128(_) => 4,
            Self::Bytes(_) => 5,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::U8(0)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U8(v) => write!(f, "{}({})", self.kind(), v),
            Self::U16(v) => write!(f, "{}({})", self.kind(), v),
            Self::U32(v) => write!(f, "{}({})", self.kind(), v),
            Self::U64(v) => write!(f, "{}({})", self.kind(), v),
            Self::U128(v) => write!(f, "{}({})", self.kind(), v),
            Self::Bytes(v) => write!(f, "{}(0x{})", self.kind(), hex::encode(v)),
        }
    }
}

impl Serializer for Id {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(self.tag());
        match self {
            Self::U8(v) => writer.write_u8(*v),
            Self::U16(v) => writer.write_u16(*v),
            Self::U32(v) => writer.write_u32(*v),
            Self::U64(v) => writer.write_u64(*v),
            Self::U128(v) => writer.write_u128(*v),
            Self::Bytes(v) => writer.write_blob(v),
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => Self::U8(reader.read_u8()?),
            1 => Self::U16(reader.read_u16()?),
            2 => Self::U32(reader.read_u32()?),
            3 => Self::U64(reader.read_u64()?),
            4 => Self::U128(reader.read_u128()?),
            5 => Self::Bytes(reader.read_blob()?),
            _ => return Err(ReaderError::InvalidValue),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_are_distinct() {
        assert_ne!(Id::U8(1).to_bytes(), Id::U16(1).to_bytes());
        assert_ne!(Id::U8(1), Id::U16(1));
    }

    #[test]
    fn test_encoding() {
        assert_eq!(Id::U8(7).to_bytes(), vec![0, 7]);
        assert_eq!(Id::U16(1).to_bytes(), vec![1, 1, 0]);
        assert_eq!(Id::Bytes(vec![0xaa]).to_bytes(), vec![5, 1, 0, 0, 0, 0xaa]);
        assert_eq!(Id::from_bytes(&[4; 17]).unwrap(), Id::U128(u128::from_le_bytes([4; 16])));
        assert_eq!(Id::from_bytes(&[6, 0]), Err(ReaderError::InvalidValue));
    }

    #[test]
    fn test_display() {
        assert_eq!(Id::U128(123).to_string(), "U128(123)");
        assert_eq!(Id::Bytes(vec![1, 2]).to_string(), "Bytes(0x0102)");
    }
}
