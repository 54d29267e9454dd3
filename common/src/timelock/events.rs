use crate::{
    contract::ContractEvent,
    crypto::Hash,
    serializer::{Reader, ReaderError, Serializer, Writer},
};

use super::{OperationId, Transaction};

/// Emitted once per transaction of a scheduled operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallScheduled {
    pub id: OperationId,
    pub index: u32,
    pub transaction: Transaction,
    pub predecessor: Option<OperationId>,
    pub delay: u64,
}

impl Serializer for CallScheduled {
    fn write(&self, writer: &mut Writer) {
        self.id.write(writer);
        writer.write_u32(self.index);
        self.transaction.write(writer);
        self.predecessor.write(writer);
        writer.write_u64(self.delay);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            id: Hash::read(reader)?,
            index: reader.read_u32()?,
            transaction: Transaction::read(reader)?,
            predecessor: Option::read(reader)?,
            delay: reader.read_u64()?,
        })
    }
}

impl ContractEvent for CallScheduled {
    fn name(&self) -> &'static str {
        "CallScheduled"
    }

    fn topics(&self) -> Vec<Hash> {
        vec![self.id]
    }
}

/// Emitted once per transaction of an executed operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallExecuted {
    pub id: OperationId,
    pub index: u32,
    pub transaction: Transaction,
}

impl Serializer for CallExecuted {
    fn write(&self, writer: &mut Writer) {
        self.id.write(writer);
        writer.write_u32(self.index);
        self.transaction.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            id: Hash::read(reader)?,
            index: reader.read_u32()?,
            transaction: Transaction::read(reader)?,
        })
    }
}

impl ContractEvent for CallExecuted {
    fn name(&self) -> &'static str {
        "CallExecuted"
    }

    fn topics(&self) -> Vec<Hash> {
        vec![self.id]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancelled {
    pub id: OperationId,
}

impl Serializer for Cancelled {
    fn write(&self, writer: &mut Writer) {
        self.id.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            id: Hash::read(reader)?,
        })
    }
}

impl ContractEvent for Cancelled {
    fn name(&self) -> &'static str {
        "Cancelled"
    }

    fn topics(&self) -> Vec<Hash> {
        vec![self.id]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinDelayChange {
    pub old_delay: u64,
    pub new_delay: u64,
}

impl Serializer for MinDelayChange {
    fn write(&self, writer: &mut Writer) {
        writer.write_u64(self.old_delay);
        writer.write_u64(self.new_delay);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            old_delay: reader.read_u64()?,
            new_delay: reader.read_u64()?,
        })
    }

    fn size(&self) -> usize {
        16
    }
}

impl ContractEvent for MinDelayChange {
    fn name(&self) -> &'static str {
        "MinDelayChange"
    }
}
