use crate::{
    contract::ContractEvent,
    crypto::{hash, AccountId, Hash},
    serializer::{Reader, ReaderError, Serializer, Writer},
};

use super::Id;

/// Emitted on mint (`from` is None), burn (`to` is None) and transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from: Option<AccountId>,
    pub to: Option<AccountId>,
    pub id: Id,
}

impl Serializer for Transfer {
    fn write(&self, writer: &mut Writer) {
        self.from.write(writer);
        self.to.write(writer);
        self.id.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            from: Option::read(reader)?,
            to: Option::read(reader)?,
            id: Id::read(reader)?,
        })
    }
}

impl ContractEvent for Transfer {
    fn name(&self) -> &'static str {
        "Transfer"
    }

    fn topics(&self) -> Vec<Hash> {
        let mut topics = Vec::with_capacity(2);
        if let Some(from) = &self.from {
            topics.push(Hash::new((*from).to_bytes()));
        }
        if let Some(to) = &self.to {
            topics.push(Hash::new((*to).to_bytes()));
        }
        topics
    }
}

/// Emitted when an operator approval is set or unset.
/// `id` is None for an approval over every token of the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub owner: AccountId,
    pub operator: AccountId,
    pub id: Option<Id>,
    pub approved: bool,
}

impl Serializer for Approval {
    fn write(&self, writer: &mut Writer) {
        self.owner.write(writer);
        self.operator.write(writer);
        self.id.write(writer);
        writer.write_bool(self.approved);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            owner: AccountId::read(reader)?,
            operator: AccountId::read(reader)?,
            id: Option::read(reader)?,
            approved: reader.read_bool()?,
        })
    }
}

impl ContractEvent for Approval {
    fn name(&self) -> &'static str {
        "Approval"
    }

    fn topics(&self) -> Vec<Hash> {
        let mut topics = vec![
            Hash::new(self.owner.to_bytes()),
            Hash::new(self.operator.to_bytes()),
        ];
        if let Some(id) = &self.id {
            topics.push(hash(&id.to_bytes()));
        }
        topics
    }
}
