use std::convert::TryInto;

use thiserror::Error;

use crate::crypto::{AccountId, Hash, ACCOUNT_ID_SIZE, HASH_SIZE};

use super::{MAX_ARRAY_SIZE, MAX_BYTES_SIZE};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Invalid size")]
    InvalidSize,
    #[error("Invalid value")]
    InvalidValue,
    #[error("Invalid hex")]
    InvalidHex,
    #[error("Exceeds max bytes size")]
    ExceedsMaxBytesSize,
    #[error("Exceeds max array size")]
    ExceedsMaxArraySize,
}

/// Cursor over a borrowed byte slice
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, total: 0 }
    }

    pub fn read_bool(&mut self) -> Result<bool, ReaderError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    pub fn read_bytes<T>(&mut self, n: usize) -> Result<T, ReaderError>
    where
        T: for<'b> TryFrom<&'b [u8]>,
    {
        let bytes = self.read_bytes_ref(n)?;
        bytes.try_into().map_err(|_| ReaderError::InvalidValue)
    }

    pub fn read_bytes_ref(&mut self, n: usize) -> Result<&'a [u8], ReaderError> {
        if n > self.size() {
            return Err(ReaderError::InvalidSize);
        }

        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        self.total += n;
        Ok(head)
    }

    pub fn read_bytes_32(&mut self) -> Result<[u8; 32], ReaderError> {
        self.read_bytes(32)
    }

    pub fn read_hash(&mut self) -> Result<Hash, ReaderError> {
        self.read_bytes(HASH_SIZE).map(Hash::new)
    }

    pub fn read_account_id(&mut self) -> Result<AccountId, ReaderError> {
        self.read_bytes(ACCOUNT_ID_SIZE).map(AccountId::new)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReaderError> {
        let bytes: [u8; 1] = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ReaderError> {
        Ok(u16::from_le_bytes(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReaderError> {
        Ok(u32::from_le_bytes(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReaderError> {
        Ok(u64::from_le_bytes(self.read_bytes(8)?))
    }

    pub fn read_u128(&mut self) -> Result<u128, ReaderError> {
        Ok(u128::from_le_bytes(self.read_bytes(16)?))
    }

    /// Read a u32 length prefix followed by that many bytes
    pub fn read_blob(&mut self) -> Result<Vec<u8>, ReaderError> {
        let len = self.read_u32()? as usize;
        if len > MAX_BYTES_SIZE {
            return Err(ReaderError::ExceedsMaxBytesSize);
        }
        Ok(self.read_bytes_ref(len)?.to_vec())
    }

    pub fn read_string_with_size(&mut self, size: usize) -> Result<String, ReaderError> {
        let bytes = self.read_bytes_ref(size)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReaderError::InvalidValue)
    }

    pub fn read_string(&mut self) -> Result<String, ReaderError> {
        let len = self.read_u32()? as usize;
        if len > MAX_BYTES_SIZE {
            return Err(ReaderError::ExceedsMaxBytesSize);
        }
        self.read_string_with_size(len)
    }

    /// Read a sequence length and validate it against the array limit
    pub fn read_len(&mut self) -> Result<usize, ReaderError> {
        let len = self.read_u32()? as usize;
        if len > MAX_ARRAY_SIZE {
            return Err(ReaderError::ExceedsMaxArraySize);
        }
        Ok(len)
    }

    /// Bytes left to read
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Bytes consumed so far
    pub fn total_read(&self) -> usize {
        self.total
    }
}
