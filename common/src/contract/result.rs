use serde::{Deserialize, Serialize};

use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Output of a contract constructor or message.
///
/// `reverted` tells the host to discard every state change made by the
/// call. `data` holds the encoded return value in both cases, so a
/// reverted message still carries its encoded error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecReturnValue {
    pub reverted: bool,
    #[serde(with = "hex")]
    pub data: Vec<u8>,
}

impl ExecReturnValue {
    pub fn success<T: Serializer>(value: &T) -> Self {
        Self {
            reverted: false,
            data: value.to_bytes(),
        }
    }

    pub fn revert<T: Serializer>(value: &T) -> Self {
        Self {
            reverted: true,
            data: value.to_bytes(),
        }
    }

    /// Encode a message result, reverting when it is an error
    pub fn from_result<T: Serializer, E: Serializer>(result: &Result<T, E>) -> Self {
        Self {
            reverted: result.is_err(),
            data: result.to_bytes(),
        }
    }

    pub fn did_revert(&self) -> bool {
        self.reverted
    }

    pub fn decode<T: Serializer>(&self) -> Result<T, ReaderError> {
        T::from_bytes(&self.data)
    }
}

impl Serializer for ExecReturnValue {
    fn write(&self, writer: &mut Writer) {
        writer.write_bool(self.reverted);
        writer.write_blob(&self.data);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            reverted: reader.read_bool()?,
            data: reader.read_blob()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        let ok: Result<u64, u8> = Ok(15);
        let value = ExecReturnValue::from_result(&ok);
        assert!(!value.did_revert());
        assert_eq!(value.decode::<Result<u64, u8>>().unwrap(), Ok(15));

        let err: Result<u64, u8> = Err(3);
        let value = ExecReturnValue::from_result(&err);
        assert!(value.did_revert());
        assert_eq!(value.data, vec![1, 3]);
    }
}
