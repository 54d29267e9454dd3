// File: testing-framework/tests/access_control_test.rs
//
// Role management of my_timelock_controller

use anyhow::Result;
use showgame_common::access_control::RoleGranted;
use showgame_testing_framework::prelude::*;

struct Setup {
    env: TestEnv,
    contract: ContractMyTimelockController,
    alice: KeyPair,
    bob: KeyPair,
    charlie: KeyPair,
}

async fn setup() -> Result<Setup> {
    init_test_logger();
    let env = TestEnv::new().await?;
    let alice = env.alice().clone();
    let bob = env.bob().clone();
    let charlie = env.charlie().clone();

    let contract =
        deploy_timelock(&env.api, &alice, 0, &[bob.address()], &[bob.address()]).await?;

    Ok(Setup {
        env,
        contract,
        alice,
        bob,
        charlie,
    })
}

async fn has_role(
    contract: &ContractMyTimelockController,
    role: RoleType,
    account: &KeyPair,
) -> Result<bool> {
    Ok(contract.query().has_role(role, account.address()).await?.value)
}

#[tokio::test]
async fn test_constructor_roles() -> Result<()> {
    let Setup {
        env,
        contract,
        alice,
        bob,
        charlie,
    } = setup().await?;

    assert!(has_role(&contract, *TIMELOCK_ADMIN_ROLE, &alice).await?);
    assert!(
        contract
            .query()
            .has_role(*TIMELOCK_ADMIN_ROLE, contract.address())
            .await?
            .value
    );
    assert!(has_role(&contract, *PROPOSER_ROLE, &bob).await?);
    assert!(has_role(&contract, *EXECUTOR_ROLE, &bob).await?);
    assert!(!has_role(&contract, *PROPOSER_ROLE, &alice).await?);
    assert!(!has_role(&contract, *EXECUTOR_ROLE, &charlie).await?);

    for role in [*TIMELOCK_ADMIN_ROLE, *PROPOSER_ROLE, *EXECUTOR_ROLE] {
        assert_eq!(
            contract.query().get_role_admin(role).await?.value,
            *TIMELOCK_ADMIN_ROLE
        );
    }

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_admin_grants_proposer() -> Result<()> {
    let Setup {
        env,
        contract,
        charlie,
        ..
    } = setup().await?;

    let result = contract
        .tx()
        .grant_role(*PROPOSER_ROLE, charlie.address())
        .await?;
    let granted = result.decode_events::<RoleGranted>("RoleGranted")?;
    assert_eq!(granted.len(), 1);
    assert_eq!(granted[0].grantee, charlie.address());
    assert!(has_role(&contract, *PROPOSER_ROLE, &charlie).await?);

    // Charlie can now schedule
    contract
        .with_signer(&charlie)
        .tx()
        .schedule(&noop_transaction(contract.address()), None, salt(0), 0)
        .await?;

    let err = contract
        .tx()
        .grant_role(*PROPOSER_ROLE, charlie.address())
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&AccessControlError::RoleRedundant));

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_non_admin_cannot_grant() -> Result<()> {
    let Setup {
        env,
        contract,
        bob,
        charlie,
        ..
    } = setup().await?;

    let err = contract
        .with_signer(&bob)
        .tx()
        .grant_role(*EXECUTOR_ROLE, charlie.address())
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&AccessControlError::MissingRole));
    assert!(!has_role(&contract, *EXECUTOR_ROLE, &charlie).await?);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_revoke_and_renounce() -> Result<()> {
    let Setup {
        env,
        contract,
        alice,
        bob,
        ..
    } = setup().await?;

    // Nobody renounces on behalf of someone else
    let err = contract
        .tx()
        .renounce_role(*EXECUTOR_ROLE, bob.address())
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&AccessControlError::InvalidCaller));

    contract
        .with_signer(&bob)
        .tx()
        .renounce_role(*EXECUTOR_ROLE, bob.address())
        .await?;
    assert!(!has_role(&contract, *EXECUTOR_ROLE, &bob).await?);

    contract
        .tx()
        .revoke_role(*PROPOSER_ROLE, bob.address())
        .await?;
    assert!(!has_role(&contract, *PROPOSER_ROLE, &bob).await?);

    let err = contract
        .with_signer(&bob)
        .tx()
        .schedule(&noop_transaction(contract.address()), None, salt(0), 0)
        .await
        .unwrap_err();
    assert_eq!(
        err.contract_error(),
        Some(&TimelockControllerError::AccessControlError(
            AccessControlError::MissingRole
        ))
    );
    assert!(has_role(&contract, *TIMELOCK_ADMIN_ROLE, &alice).await?);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_open_executor_role() -> Result<()> {
    init_test_logger();
    let env = TestEnv::new().await?;
    let alice = env.alice().clone();
    let outsider = KeyPair::generate();
    env.api
        .transfer(&alice, outsider.address(), 1_000_000)
        .await?;

    // Granting the executor role to the zero account opens it to everyone
    let contract = deploy_timelock(
        &env.api,
        &alice,
        0,
        &[alice.address()],
        &[AccountId::zero()],
    )
    .await?;

    let transaction = message_transaction(
        contract.abi(),
        contract.address(),
        showgame_contracts::timelock_controller::GET_MIN_DELAY,
        &(),
    )?;
    contract.tx().schedule(&transaction, None, salt(3), 0).await?;
    contract
        .with_signer(&outsider)
        .tx()
        .execute(&transaction, None, salt(3))
        .await?;

    let id = hash_operation(&transaction, &None, &salt(3));
    assert!(contract.query().is_operation_done(&id).await?.value);

    env.teardown().await;
    Ok(())
}
