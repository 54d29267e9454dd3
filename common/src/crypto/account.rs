use crate::serializer::{Reader, ReaderError, Serializer, Writer};
use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryInto,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use super::Hash;

pub const ACCOUNT_ID_SIZE: usize = 32;

/// On-chain identity of a signer or of a contract instance.
///
/// For signers this is the ed25519 public key, for contracts it is derived
/// from the deployer, the code hash and the instantiation salt.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct AccountId([u8; ACCOUNT_ID_SIZE]);

impl AccountId {
    pub const fn new(bytes: [u8; ACCOUNT_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// The all-zero account. Granting a role to it opens the role to anyone.
    pub const fn zero() -> Self {
        Self([0; ACCOUNT_ID_SIZE])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; ACCOUNT_ID_SIZE] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<Hash> for AccountId {
    fn from(hash: Hash) -> Self {
        Self(hash.to_bytes())
    }
}

impl FromStr for AccountId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(|_| "Invalid hex string")?;
        let bytes: [u8; ACCOUNT_ID_SIZE] = bytes.try_into().map_err(|_| "Invalid account id")?;
        Ok(Self(bytes))
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

// Short form keeps test failure output readable
impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId(0x{}..)", &self.to_hex()[..8])
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serializer for AccountId {
    fn write(&self, writer: &mut Writer) {
        writer.write_account_id(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_account_id()
    }

    fn size(&self) -> usize {
        ACCOUNT_ID_SIZE
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'a> Deserialize<'a> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let value = String::deserialize(deserializer)?;
        AccountId::from_str(&value).map_err(SerdeError::custom)
    }
}
