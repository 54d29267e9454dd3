use showgame_common::{
    contract::{ContractEvent, EventRecord, ExecReturnValue},
    crypto::{AccountId, Hash},
    serializer::ReaderError,
};
use showgame_daemon::ExtrinsicReceipt;

/// Value returned by a query together with its gas figures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReturnType<T> {
    pub value: T,
    pub gas_consumed: u64,
    pub gas_required: u64,
}

impl<T> QueryReturnType<T> {
    pub fn into_value(self) -> T {
        self.value
    }
}

/// A transaction included in a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxResult {
    pub block_hash: Hash,
    pub block_number: u64,
    pub extrinsic_hash: Hash,
    pub gas_consumed: u64,
    pub return_value: Option<ExecReturnValue>,
    pub events: Vec<EventRecord>,
}

impl TxResult {
    pub(crate) fn from_receipt(receipt: ExtrinsicReceipt) -> Self {
        let return_value = receipt
            .result
            .as_ref()
            .ok()
            .and_then(|outcome| outcome.return_value().cloned());
        Self {
            block_hash: receipt.block_hash,
            block_number: receipt.block_number,
            extrinsic_hash: receipt.extrinsic_hash,
            gas_consumed: receipt.gas_consumed,
            return_value,
            events: receipt.events,
        }
    }

    pub fn events_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a EventRecord> + 'a {
        self.events.iter().filter(move |event| event.name == name)
    }

    /// Decode every event of type `E`
    pub fn decode_events<E: ContractEvent>(&self, name: &str) -> Result<Vec<E>, ReaderError> {
        self.events_named(name).map(|event| event.decode()).collect()
    }
}

/// A contract instantiated by a constructor transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResult {
    pub address: AccountId,
    pub result: TxResult,
}
