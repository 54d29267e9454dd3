use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{hash_parts, AccountId, CryptoError};
use crate::serializer::{Reader, ReaderError, Serializer, Writer};

pub const SIGNATURE_SIZE: usize = 64;

/// Domain separator for dev account derivation
const DEV_SEED_DOMAIN: &[u8] = b"showgame/dev-seed";

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_SIZE]);

impl Signature {
    pub const fn new(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }

    /// Check this signature over `message` against the public key in `signer`
    pub fn verify(&self, message: &[u8], signer: &AccountId) -> Result<(), CryptoError> {
        let key = VerifyingKey::from_bytes(signer.as_bytes())
            .map_err(|_| CryptoError::InvalidPublicKey)?;
        let signature = ed25519_dalek::Signature::from_bytes(&self.0);
        key.verify(message, &signature)
            .map_err(|_| CryptoError::InvalidSignature)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(0x{}..)", hex::encode(&self.0[..8]))
    }
}

impl Serializer for Signature {
    fn write(&self, writer: &mut Writer) {
        writer.write_bytes(&self.0);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bytes(SIGNATURE_SIZE).map(Self)
    }

    fn size(&self) -> usize {
        SIGNATURE_SIZE
    }
}

/// A signing identity used to authorize extrinsics.
///
/// Dev keypairs are derived from a well-known seed such as `//Alice` so
/// every node and client agrees on their account ids.
#[derive(Clone)]
pub struct KeyPair {
    name: Option<String>,
    signing_key: SigningKey,
}

impl KeyPair {
    /// Random keypair, used for throwaway third parties in tests
    pub fn generate() -> Self {
        Self {
            name: None,
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic keypair from a dev seed (`//Alice`, `//Bob`, ...)
    pub fn from_seed(seed: &str) -> Self {
        let secret = hash_parts(&[DEV_SEED_DOMAIN, seed.as_bytes()]);
        Self {
            name: Some(seed.trim_start_matches("//").to_string()),
            signing_key: SigningKey::from_bytes(secret.as_bytes()),
        }
    }

    pub fn address(&self) -> AccountId {
        AccountId::new(self.signing_key.verifying_key().to_bytes())
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("name", &self.name())
            .field("address", &self.address())
            .finish()
    }
}

/// Public view of a keypair, what the node and the logs get to see
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignerInfo {
    pub name: String,
    pub address: AccountId,
}

impl From<&KeyPair> for SignerInfo {
    fn from(keypair: &KeyPair) -> Self {
        Self {
            name: keypair.name().to_string(),
            address: keypair.address(),
        }
    }
}
