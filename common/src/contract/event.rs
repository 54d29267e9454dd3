use serde::{Deserialize, Serialize};

use crate::{
    crypto::{AccountId, Hash},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

/// A typed contract event that can be emitted through the host
pub trait ContractEvent: Serializer {
    /// Event name as it appears in receipts
    fn name(&self) -> &'static str;

    /// Indexed topics, used to filter events without decoding them
    fn topics(&self) -> Vec<Hash> {
        Vec::new()
    }
}

/// An emitted event as recorded by the node in a receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub emitter: AccountId,
    pub name: String,
    pub topics: Vec<Hash>,
    #[serde(with = "hex")]
    pub data: Vec<u8>,
}

impl EventRecord {
    pub fn new<E: ContractEvent + ?Sized>(emitter: AccountId, event: &E) -> Self {
        Self {
            emitter,
            name: event.name().to_string(),
            topics: event.topics(),
            data: event.to_bytes(),
        }
    }

    /// Decode the payload back into its typed form
    pub fn decode<E: ContractEvent>(&self) -> Result<E, ReaderError> {
        E::from_bytes(&self.data)
    }
}

impl Serializer for EventRecord {
    fn write(&self, writer: &mut Writer) {
        self.emitter.write(writer);
        writer.write_string(&self.name);
        writer.write_u32(self.topics.len() as u32);
        for topic in &self.topics {
            topic.write(writer);
        }
        writer.write_blob(&self.data);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let emitter = AccountId::read(reader)?;
        let name = reader.read_string()?;
        let len = reader.read_len()?;
        let mut topics = Vec::with_capacity(len);
        for _ in 0..len {
            topics.push(Hash::read(reader)?);
        }
        let data = reader.read_blob()?;
        Ok(Self {
            emitter,
            name,
            topics,
            data,
        })
    }
}
