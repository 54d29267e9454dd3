use showgame_common::{
    contract::{ContractAbi, ExecReturnValue, Selector},
    crypto::{hash_parts, Hash},
    serializer::{Reader, ReaderError, Serializer},
};

use crate::{
    env::Environment,
    error::{ExecError, MessageError, MessageResult},
};

/// Native contract code hosted by a node.
///
/// A code is stateless: everything it keeps lives in the storage of the
/// account it runs for, reached through the `Environment`.
pub trait ContractCode: Send + Sync {
    fn abi(&self) -> &ContractAbi;

    /// Identifies the code on chain
    fn code_hash(&self) -> Hash {
        let abi = self.abi();
        hash_parts(&[abi.name.as_bytes(), b":", abi.version.as_bytes()])
    }

    /// Run a constructor for a freshly created account
    fn deploy(
        &self,
        env: &mut dyn Environment,
        selector: Selector,
        input: &[u8],
    ) -> Result<ExecReturnValue, ExecError>;

    /// Run a message
    fn call(
        &self,
        env: &mut dyn Environment,
        selector: Selector,
        input: &[u8],
    ) -> Result<ExecReturnValue, ExecError>;
}

/// Decode the full call input as `T`, usually a tuple of the arguments
pub fn decode_input<T: Serializer>(input: &[u8]) -> Result<T, ExecError> {
    T::from_bytes(input).map_err(ExecError::InvalidInput)
}

/// Decode call input with a custom reader, for arguments that are not a
/// plain tuple. Every byte must be consumed.
pub fn decode_with<T, F>(input: &[u8], f: F) -> Result<T, ExecError>
where
    F: FnOnce(&mut Reader) -> Result<T, ReaderError>,
{
    let mut reader = Reader::new(input);
    let value = f(&mut reader).map_err(ExecError::InvalidInput)?;
    if reader.size() != 0 {
        return Err(ExecError::InvalidInput(ReaderError::InvalidSize));
    }
    Ok(value)
}

/// Turn the result of a fallible message into its return value.
///
/// A contract error reverts with the encoded `Err`, an execution error traps.
pub fn respond<T: Serializer, E: Serializer>(
    result: MessageResult<T, E>,
) -> Result<ExecReturnValue, ExecError> {
    match result {
        Ok(value) => Ok(ExecReturnValue::from_result(&Ok::<T, E>(value))),
        Err(MessageError::Contract(err)) => Ok(ExecReturnValue::from_result(&Err::<T, E>(err))),
        Err(MessageError::Exec(err)) => Err(err),
    }
}

/// Return value of an infallible message
pub fn reply<T: Serializer>(value: Result<T, ExecError>) -> Result<ExecReturnValue, ExecError> {
    value.map(|v| ExecReturnValue::success(&v))
}
