use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use showgame_common::{
    config::Balance,
    contract::{EventRecord, ExecReturnValue},
    crypto::{hash, hash_parts, AccountId, CryptoError, Hash, KeyPair, Signature},
    serializer::{write_sequence, Reader, ReaderError, Serializer, Writer},
    time::TimestampMillis,
};

use crate::config::EXTRINSIC_SIGNING_DOMAIN;

use super::error::DispatchError;

/// What an extrinsic asks the node to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExtrinsicCall {
    /// Put a code known by the node on chain so it can be instantiated
    UploadCode { code_hash: Hash },
    Instantiate {
        code_hash: Hash,
        value: Balance,
        gas_limit: u64,
        #[serde(with = "hex")]
        data: Vec<u8>,
        #[serde(with = "hex")]
        salt: Vec<u8>,
    },
    Call {
        dest: AccountId,
        value: Balance,
        gas_limit: u64,
        #[serde(with = "hex")]
        data: Vec<u8>,
    },
    Transfer { dest: AccountId, value: Balance },
}

impl ExtrinsicCall {
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl Serializer for ExtrinsicCall {
    fn write(&self, writer: &mut Writer) {
        match self {
            Self::UploadCode { code_hash } => {
                writer.write_u8(0);
                code_hash.write(writer);
            }
            Self::Instantiate {
                code_hash,
                value,
                gas_limit,
                data,
                salt,
            } => {
                writer.write_u8(1);
                code_hash.write(writer);
                writer.write_u128(*value);
                writer.write_u64(*gas_limit);
                writer.write_blob(data);
                writer.write_blob(salt);
            }
            Self::Call {
                dest,
                value,
                gas_limit,
                data,
            } => {
                writer.write_u8(2);
                dest.write(writer);
                writer.write_u128(*value);
                writer.write_u64(*gas_limit);
                writer.write_blob(data);
            }
            Self::Transfer { dest, value } => {
                writer.write_u8(3);
                dest.write(writer);
                writer.write_u128(*value);
            }
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(match reader.read_u8()? {
            0 => Self::UploadCode {
                code_hash: Hash::read(reader)?,
            },
            1 => Self::Instantiate {
                code_hash: Hash::read(reader)?,
                value: reader.read_u128()?,
                gas_limit: reader.read_u64()?,
                data: reader.read_blob()?,
                salt: reader.read_blob()?,
            },
            2 => Self::Call {
                dest: AccountId::read(reader)?,
                value: reader.read_u128()?,
                gas_limit: reader.read_u64()?,
                data: reader.read_blob()?,
            },
            3 => Self::Transfer {
                dest: AccountId::read(reader)?,
                value: reader.read_u128()?,
            },
            _ => return Err(ReaderError::InvalidValue),
        })
    }
}

/// A signed request submitted to the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extrinsic {
    pub signer: AccountId,
    pub nonce: u64,
    pub call: ExtrinsicCall,
    pub signature: Signature,
}

impl Extrinsic {
    /// Bytes covered by the signature. The genesis hash binds the
    /// extrinsic to one chain.
    pub fn signing_payload(
        genesis_hash: &Hash,
        signer: &AccountId,
        nonce: u64,
        call: &ExtrinsicCall,
    ) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_bytes(EXTRINSIC_SIGNING_DOMAIN);
        genesis_hash.write(&mut writer);
        signer.write(&mut writer);
        writer.write_u64(nonce);
        call.write(&mut writer);
        writer.bytes()
    }

    pub fn sign(keypair: &KeyPair, genesis_hash: &Hash, nonce: u64, call: ExtrinsicCall) -> Self {
        let signer = keypair.address();
        let payload = Self::signing_payload(genesis_hash, &signer, nonce, &call);
        Self {
            signer,
            nonce,
            signature: keypair.sign(&payload),
            call,
        }
    }

    pub fn verify(&self, genesis_hash: &Hash) -> Result<(), CryptoError> {
        let payload = Self::signing_payload(genesis_hash, &self.signer, self.nonce, &self.call);
        self.signature.verify(&payload, &self.signer)
    }

    pub fn hash(&self) -> Hash {
        hash(&self.to_bytes())
    }
}

impl Serializer for Extrinsic {
    fn write(&self, writer: &mut Writer) {
        self.signer.write(writer);
        writer.write_u64(self.nonce);
        self.call.write(writer);
        self.signature.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            signer: AccountId::read(reader)?,
            nonce: reader.read_u64()?,
            call: ExtrinsicCall::read(reader)?,
            signature: Signature::read(reader)?,
        })
    }
}

/// A sealed block. Blocks only reference the extrinsics they include,
/// their outcome lives in the receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub hash: Hash,
    pub parent_hash: Hash,
    pub timestamp: TimestampMillis,
    pub extrinsics: Vec<Hash>,
}

impl Block {
    pub fn new(
        number: u64,
        parent_hash: Hash,
        timestamp: TimestampMillis,
        extrinsics: Vec<Hash>,
    ) -> Self {
        let hash = Self::compute_hash(number, &parent_hash, timestamp, &extrinsics);
        Self {
            number,
            hash,
            parent_hash,
            timestamp,
            extrinsics,
        }
    }

    /// Genesis block of the chain identified by `genesis_hash`
    pub fn genesis(genesis_hash: Hash, timestamp: TimestampMillis) -> Self {
        Self {
            number: 0,
            hash: genesis_hash,
            parent_hash: Hash::zero(),
            timestamp,
            extrinsics: Vec::new(),
        }
    }

    fn compute_hash(
        number: u64,
        parent_hash: &Hash,
        timestamp: TimestampMillis,
        extrinsics: &[Hash],
    ) -> Hash {
        let mut writer = Writer::new();
        writer.write_u64(number);
        parent_hash.write(&mut writer);
        writer.write_u64(timestamp);
        write_sequence(&mut writer, extrinsics);
        hash_parts(&[b"showgame/block", writer.as_bytes()])
    }
}

/// Successful result of a dispatched extrinsic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    CodeStored {
        code_hash: Hash,
    },
    Instantiated {
        contract: AccountId,
        result: ExecReturnValue,
    },
    Called {
        result: ExecReturnValue,
    },
    Transferred,
}

impl DispatchOutcome {
    /// Return value of the contract, if a contract ran
    pub fn return_value(&self) -> Option<&ExecReturnValue> {
        match self {
            Self::Instantiated { result, .. } | Self::Called { result } => Some(result),
            _ => None,
        }
    }
}

/// Outcome of an extrinsic included in a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrinsicReceipt {
    pub extrinsic_hash: Hash,
    pub block_number: u64,
    pub block_hash: Hash,
    pub signer: AccountId,
    pub result: Result<DispatchOutcome, DispatchError>,
    // Empty when the dispatch failed
    pub events: Vec<EventRecord>,
    pub gas_consumed: u64,
}

impl ExtrinsicReceipt {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_bound_to_chain() {
        let alice = KeyPair::from_seed("//Alice");
        let genesis = hash(b"chain-a");
        let call = ExtrinsicCall::Transfer {
            dest: KeyPair::from_seed("//Bob").address(),
            value: 10,
        };
        let extrinsic = Extrinsic::sign(&alice, &genesis, 0, call);

        assert!(extrinsic.verify(&genesis).is_ok());
        assert!(extrinsic.verify(&hash(b"chain-b")).is_err());

        let mut tampered = extrinsic.clone();
        tampered.nonce = 1;
        assert!(tampered.verify(&genesis).is_err());
    }

    #[test]
    fn test_extrinsic_codec() {
        let alice = KeyPair::from_seed("//Alice");
        let call = ExtrinsicCall::Instantiate {
            code_hash: hash(b"code"),
            value: 0,
            gas_limit: 1_000,
            data: vec![1, 2, 3, 4],
            salt: vec![9],
        };
        let extrinsic = Extrinsic::sign(&alice, &Hash::zero(), 3, call);
        let decoded = Extrinsic::from_bytes(&extrinsic.to_bytes()).unwrap();
        assert_eq!(decoded, extrinsic);
        assert_eq!(decoded.hash(), extrinsic.hash());
        assert_eq!(decoded.call.kind(), "instantiate");
    }

    #[test]
    fn test_block_hash_depends_on_content() {
        let a = Block::new(1, Hash::zero(), 10, vec![]);
        let b = Block::new(1, Hash::zero(), 11, vec![]);
        assert_ne!(a.hash, b.hash);
    }
}
