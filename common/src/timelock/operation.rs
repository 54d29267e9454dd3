use serde::{Deserialize, Serialize};

use crate::{
    contract::Selector,
    crypto::{hash, AccountId, Hash},
    serializer::{read_sequence, write_sequence, Reader, ReaderError, Serializer, Writer},
};

pub type OperationId = Hash;

pub type Salt = [u8; 32];

/// A call the timelock performs once its operation is ready
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Transaction {
    /// Contract to call. None is a no-op call that always succeeds.
    pub callee: Option<AccountId>,
    pub selector: Selector,
    #[serde(with = "hex")]
    pub input: Vec<u8>,
    pub transferred_value: u128,
    /// Zero forwards all of the remaining gas
    pub gas_limit: u64,
}

impl Transaction {
    pub fn new(callee: AccountId, selector: Selector, input: Vec<u8>) -> Self {
        Self {
            callee: Some(callee),
            selector,
            input,
            transferred_value: 0,
            gas_limit: 0,
        }
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.transferred_value = value;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }
}

impl Serializer for Transaction {
    fn write(&self, writer: &mut Writer) {
        self.callee.write(writer);
        self.selector.write(writer);
        writer.write_blob(&self.input);
        writer.write_u128(self.transferred_value);
        writer.write_u64(self.gas_limit);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(Self {
            callee: Option::read(reader)?,
            selector: Selector::read(reader)?,
            input: reader.read_blob()?,
            transferred_value: reader.read_u128()?,
            gas_limit: reader.read_u64()?,
        })
    }
}

/// Operation id of a single transaction.
///
/// Identical `(transaction, predecessor, salt)` always give the same id.
pub fn hash_operation(
    transaction: &Transaction,
    predecessor: &Option<OperationId>,
    salt: &Salt,
) -> OperationId {
    let mut writer = Writer::new();
    transaction.write(&mut writer);
    predecessor.write(&mut writer);
    salt.write(&mut writer);
    hash(writer.as_bytes())
}

/// Operation id of a batch of transactions
pub fn hash_operation_batch(
    transactions: &[Transaction],
    predecessor: &Option<OperationId>,
    salt: &Salt,
) -> OperationId {
    let mut writer = Writer::new();
    write_sequence(&mut writer, transactions);
    predecessor.write(&mut writer);
    salt.write(&mut writer);
    hash(writer.as_bytes())
}

/// Encode the arguments of a batch message
pub fn encode_batch(transactions: &[Transaction]) -> Vec<u8> {
    let mut writer = Writer::new();
    write_sequence(&mut writer, transactions);
    writer.bytes()
}

pub fn decode_batch(reader: &mut Reader) -> Result<Vec<Transaction>, ReaderError> {
    read_sequence(reader)
}

/// Salt from a small number, the way test suites usually build one
pub fn salt_from_u64(value: u64) -> Salt {
    let mut salt = [0u8; 32];
    salt[..8].copy_from_slice(&value.to_le_bytes());
    salt
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Transaction {
        Transaction::new(
            AccountId::new([7; 32]),
            Selector::from_label("TimelockController::get_min_delay"),
            Vec::new(),
        )
    }

    #[test]
    fn test_salt_changes_id() {
        let tx = sample();
        let a = hash_operation(&tx, &None, &salt_from_u64(0));
        let b = hash_operation(&tx, &None, &salt_from_u64(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_predecessor_changes_id() {
        let tx = sample();
        let a = hash_operation(&tx, &None, &[0; 32]);
        let b = hash_operation(&tx, &Some(a), &[0; 32]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_batch_of_one_differs_from_single() {
        let tx = sample();
        let single = hash_operation(&tx, &None, &[0; 32]);
        let batch = hash_operation_batch(std::slice::from_ref(&tx), &None, &[0; 32]);
        assert_ne!(single, batch);
    }

    proptest! {
        #[test]
        fn prop_hash_operation_is_deterministic(
            input in proptest::collection::vec(any::<u8>(), 0..64),
            value in any::<u128>(),
            gas in any::<u64>(),
            salt in any::<u64>(),
        ) {
            let tx = sample().with_value(value).with_gas_limit(gas);
            let tx = Transaction { input, ..tx };
            let salt = salt_from_u64(salt);
            prop_assert_eq!(
                hash_operation(&tx, &None, &salt),
                hash_operation(&tx.clone(), &None, &salt)
            );
            prop_assert_eq!(Transaction::from_bytes(&tx.to_bytes()).unwrap(), tx);
        }
    }
}
