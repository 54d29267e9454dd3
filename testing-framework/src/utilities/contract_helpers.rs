// File: testing-framework/src/utilities/contract_helpers.rs
//
// Contract helpers
//
// Shortcuts used by the suites: deploy a contract and get its typed handle
// in one step, and build timelock transactions that target a message by
// label.

use anyhow::{anyhow, Context, Result};
use showgame_common::{
    contract::{ContractAbi, Selector},
    crypto::{AccountId, KeyPair},
    serializer::Serializer,
    timelock::{salt_from_u64, Salt, Transaction},
};

use crate::{
    api::ApiClient,
    bindings::{
        ConstructorsMyPsp34, ConstructorsMyTimelockController, ContractMyPsp34,
        ContractMyTimelockController,
    },
};

/// Deploy a `my_psp34` instance owned by `signer`
pub async fn deploy_psp34(api: &ApiClient, signer: &KeyPair) -> Result<ContractMyPsp34> {
    let deployed = ConstructorsMyPsp34::new(api, signer)
        .deploy_new()
        .await
        .context("Cannot deploy my_psp34")?;
    Ok(ContractMyPsp34::new(deployed.address, signer, api))
}

/// Deploy a `my_timelock_controller` instance administered by `signer`
pub async fn deploy_timelock(
    api: &ApiClient,
    signer: &KeyPair,
    min_delay: u64,
    proposers: &[AccountId],
    executors: &[AccountId],
) -> Result<ContractMyTimelockController> {
    let deployed = ConstructorsMyTimelockController::new(api, signer)
        .deploy_new(min_delay, proposers, executors)
        .await
        .context("Cannot deploy my_timelock_controller")?;
    Ok(ContractMyTimelockController::new(deployed.address, signer, api))
}

/// Selector of `label` in `abi`
pub fn message_selector(abi: &ContractAbi, label: &str) -> Result<Selector> {
    abi.find_message(label)
        .map(|message| message.selector)
        .ok_or_else(|| anyhow!("Message {} not found in {}", label, abi.name))
}

/// Transaction calling `label` on `callee` with the encoded `args`
pub fn message_transaction<A: Serializer>(
    abi: &ContractAbi,
    callee: AccountId,
    label: &str,
    args: &A,
) -> Result<Transaction> {
    let selector = message_selector(abi, label)?;
    Ok(Transaction::new(callee, selector, args.to_bytes()))
}

/// Transaction with a zero selector and no input, it is never executed
pub fn noop_transaction(callee: AccountId) -> Transaction {
    Transaction::new(callee, Selector::new([0; 4]), Vec::new())
}

/// Salt built from a small number
pub fn salt(value: u64) -> Salt {
    salt_from_u64(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use showgame_contracts::{timelock_controller, ContractCode, MyTimelockController};

    #[test]
    fn test_message_transaction() {
        let abi = MyTimelockController.abi();
        let callee = AccountId::new([3; 32]);
        let tx = message_transaction(abi, callee, timelock_controller::UPDATE_DELAY, &15u64)
            .unwrap();
        assert_eq!(tx.callee, Some(callee));
        assert_eq!(tx.selector, Selector::from_label(timelock_controller::UPDATE_DELAY));
        assert_eq!(tx.input, 15u64.to_le_bytes().to_vec());
        assert_eq!(tx.gas_limit, 0);

        assert!(message_selector(abi, "Nope::nope").is_err());
        assert_ne!(salt(0), salt(1));
    }
}
