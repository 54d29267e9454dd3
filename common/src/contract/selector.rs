use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    crypto::hash,
    serializer::{Reader, ReaderError, Serializer, Writer},
};

pub const SELECTOR_SIZE: usize = 4;

/// Four byte identifier of a contract message or constructor.
///
/// Computed as the first four bytes of `blake3(label)` where the label is the
/// fully qualified message name, e.g. `TimelockController::update_delay`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Selector([u8; SELECTOR_SIZE]);

impl Selector {
    pub const fn new(bytes: [u8; SELECTOR_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_label(label: &str) -> Self {
        let digest = hash(label.as_bytes());
        let mut bytes = [0u8; SELECTOR_SIZE];
        bytes.copy_from_slice(&digest.as_bytes()[..SELECTOR_SIZE]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SELECTOR_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; SELECTOR_SIZE] {
        self.0
    }

    pub fn to_vec(self) -> Vec<u8> {
        self.0.to_vec()
    }
}

impl From<[u8; SELECTOR_SIZE]> for Selector {
    fn from(bytes: [u8; SELECTOR_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({})", self)
    }
}

impl Serializer for Selector {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bytes(SELECTOR_SIZE).map(Self)
    }

    fn size(&self) -> usize {
        SELECTOR_SIZE
    }
}

impl Serialize for Selector {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'a> Deserialize<'a> for Selector {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let value = String::deserialize(deserializer)?;
        let bytes = hex::decode(value.trim_start_matches("0x")).map_err(SerdeError::custom)?;
        let bytes: [u8; SELECTOR_SIZE] = bytes
            .try_into()
            .map_err(|_| SerdeError::custom("Selector must be 4 bytes"))?;
        Ok(Self(bytes))
    }
}

/// Split raw call data into its selector and the encoded arguments
pub fn split_call_data(data: &[u8]) -> Result<(Selector, &[u8]), ReaderError> {
    if data.len() < SELECTOR_SIZE {
        return Err(ReaderError::InvalidSize);
    }
    let (head, tail) = data.split_at(SELECTOR_SIZE);
    let mut bytes = [0u8; SELECTOR_SIZE];
    bytes.copy_from_slice(head);
    Ok((Selector(bytes), tail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_selectors_differ() {
        let a = Selector::from_label("TimelockController::update_delay");
        let b = Selector::from_label("TimelockController::get_min_delay");
        assert_ne!(a, b);
        assert_eq!(a, Selector::from_label("TimelockController::update_delay"));
    }

    #[test]
    fn test_split_call_data() {
        let data = [1, 2, 3, 4, 9, 9];
        let (selector, rest) = split_call_data(&data).unwrap();
        assert_eq!(selector, Selector::new([1, 2, 3, 4]));
        assert_eq!(rest, &[9, 9]);
        assert!(split_call_data(&[1, 2]).is_err());
    }

    #[test]
    fn test_serde_hex() {
        let selector = Selector::new([0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_string(&selector).unwrap();
        assert_eq!(json, "\"0xdeadbeef\"");
        assert_eq!(serde_json::from_str::<Selector>(&json).unwrap(), selector);
    }
}
