// File: testing-framework/src/contract/mod.rs
//
// Generic contract proxy
//
// A Contract pairs an instance address with its metadata, a signer and an
// API client. Queries are dry runs against the best block. Transactions
// are dry run first so a revert is reported without sealing a block, then
// signed and submitted with the estimated gas.

mod error;
mod result;

pub use error::{QueryError, TxError};
pub use result::{DeployResult, QueryReturnType, TxResult};

use std::sync::Arc;

use log::debug;
use showgame_common::{
    config::Balance,
    contract::ContractAbi,
    crypto::{AccountId, KeyPair},
    serializer::Serializer,
};
use showgame_contracts::ContractCode;
use showgame_daemon::{
    core::contract_address,
    rpc::{CallRequest, InstantiateRequest},
    DispatchError, ExtrinsicCall,
};

use crate::api::ApiClient;

// Gas limit sent with a transaction, relative to the dry run estimate
const GAS_HEADROOM_FACTOR: u64 = 2;

/// Options of a single transaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOptions {
    /// Native value forwarded to a payable message
    pub value: Balance,
    /// Fixed gas limit, estimated with a dry run when unset
    pub gas_limit: Option<u64>,
}

impl TxOptions {
    pub fn with_value(value: Balance) -> Self {
        Self {
            value,
            gas_limit: None,
        }
    }
}

/// Untyped proxy to a deployed contract
#[derive(Clone)]
pub struct Contract {
    address: AccountId,
    signer: KeyPair,
    api: ApiClient,
    abi: Arc<ContractAbi>,
}

impl Contract {
    pub fn new(
        address: AccountId,
        signer: &KeyPair,
        api: &ApiClient,
        abi: Arc<ContractAbi>,
    ) -> Self {
        Self {
            address,
            signer: signer.clone(),
            api: api.clone(),
            abi,
        }
    }

    pub fn address(&self) -> AccountId {
        self.address
    }

    pub fn signer(&self) -> &KeyPair {
        &self.signer
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn abi(&self) -> &ContractAbi {
        &self.abi
    }

    /// Same contract, calls signed by `signer`
    pub fn with_signer(&self, signer: &KeyPair) -> Self {
        Self {
            signer: signer.clone(),
            ..self.clone()
        }
    }

    /// Selector of `label` followed by the encoded arguments
    pub fn call_data(&self, label: &str, args: &[u8]) -> Option<Vec<u8>> {
        let message = self.abi.find_message(label)?;
        let mut data = message.selector.to_vec();
        data.extend_from_slice(args);
        Some(data)
    }

    /// Dry run `label` and decode what it returns.
    ///
    /// For a fallible message `T` is the whole `Result`: a revert is not an
    /// error here, its encoded `Err` is decoded like any other value.
    pub async fn query<T: Serializer>(
        &self,
        label: &str,
        args: &[u8],
    ) -> Result<QueryReturnType<T>, QueryError> {
        let input_data = self
            .call_data(label, args)
            .ok_or_else(|| QueryError::UnknownMessage(label.to_string()))?;

        let output = self
            .api
            .dry_run_call(CallRequest {
                origin: self.signer.address(),
                dest: self.address,
                value: 0,
                gas_limit: None,
                input_data,
            })
            .await?;

        let data = match output.result {
            Ok(value) => value.data,
            Err(DispatchError::ContractReverted { data }) => data,
            Err(DispatchError::ContractTrapped(err)) => return Err(QueryError::Trapped(err)),
            Err(DispatchError::Blockchain(err)) => return Err(err.into()),
        };

        Ok(QueryReturnType {
            value: T::from_bytes(&data)?,
            gas_consumed: output.gas_consumed,
            gas_required: output.gas_required,
        })
    }

    pub async fn tx<E: Serializer>(
        &self,
        label: &str,
        args: &[u8],
    ) -> Result<TxResult, TxError<E>> {
        self.tx_with_options(label, args, TxOptions::default()).await
    }

    pub async fn tx_with_options<E: Serializer>(
        &self,
        label: &str,
        args: &[u8],
        options: TxOptions,
    ) -> Result<TxResult, TxError<E>> {
        let data = self
            .call_data(label, args)
            .ok_or_else(|| TxError::UnknownMessage(label.to_string()))?;

        let dry_run = self
            .api
            .dry_run_call(CallRequest {
                origin: self.signer.address(),
                dest: self.address,
                value: options.value,
                gas_limit: options.gas_limit,
                input_data: data.clone(),
            })
            .await?;
        let gas_required = match dry_run.result {
            Ok(_) => dry_run.gas_required,
            Err(err) => {
                debug!("{} rejected by dry run: {}", label, err);
                return Err(TxError::from_dispatch(err));
            }
        };

        let gas_limit = options
            .gas_limit
            .unwrap_or_else(|| gas_required.saturating_mul(GAS_HEADROOM_FACTOR));
        let receipt = self
            .api
            .sign_and_submit(
                &self.signer,
                ExtrinsicCall::Call {
                    dest: self.address,
                    value: options.value,
                    gas_limit,
                    data,
                },
            )
            .await?;

        if let Err(err) = receipt.result {
            return Err(TxError::from_dispatch(err));
        }
        Ok(TxResult::from_receipt(receipt))
    }
}

/// Upload `code` if needed and instantiate it with `constructor`.
///
/// Every deployment uses a random salt so the same signer can deploy the
/// same code many times.
pub async fn deploy<E: Serializer>(
    api: &ApiClient,
    signer: &KeyPair,
    code: &dyn ContractCode,
    constructor: &str,
    args: &[u8],
) -> Result<DeployResult, TxError<E>> {
    let spec = code
        .abi()
        .find_constructor(constructor)
        .ok_or_else(|| TxError::UnknownMessage(constructor.to_string()))?;
    let mut data = spec.selector.to_vec();
    data.extend_from_slice(args);

    let code_hash = code.code_hash();
    let salt = rand::random::<[u8; 32]>().to_vec();

    let dry_run = api
        .dry_run_instantiate(InstantiateRequest {
            origin: signer.address(),
            value: 0,
            gas_limit: None,
            code_hash,
            data: data.clone(),
            salt: salt.clone(),
        })
        .await?;
    let gas_required = match dry_run.result {
        Ok(_) => dry_run.gas_required,
        Err(err) => return Err(TxError::from_dispatch(err)),
    };

    let upload = api
        .sign_and_submit(signer, ExtrinsicCall::UploadCode { code_hash })
        .await?;
    if let Err(err) = upload.result {
        return Err(TxError::from_dispatch(err));
    }

    let address = contract_address(&signer.address(), &code_hash, &salt);
    let receipt = api
        .sign_and_submit(
            signer,
            ExtrinsicCall::Instantiate {
                code_hash,
                value: 0,
                gas_limit: gas_required.saturating_mul(GAS_HEADROOM_FACTOR),
                data,
                salt,
            },
        )
        .await?;
    if let Err(err) = receipt.result {
        return Err(TxError::from_dispatch(err));
    }

    debug!(
        "{} deployed {} at {}",
        signer.name(),
        code.abi().name,
        address
    );
    Ok(DeployResult {
        address,
        result: TxResult::from_receipt(receipt),
    })
}
