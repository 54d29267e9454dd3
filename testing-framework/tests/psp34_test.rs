// File: testing-framework/tests/psp34_test.rs
//
// my_psp34 e2e tests
//
// Charlie deploys and mints, Alice and Bob receive or operate tokens.

use anyhow::Result;
use showgame_common::psp34::Transfer;
use showgame_testing_framework::prelude::*;

struct Setup {
    env: TestEnv,
    contract: ContractMyPsp34,
    sender: KeyPair,
    alice: KeyPair,
    bob: KeyPair,
}

async fn setup() -> Result<Setup> {
    init_test_logger();
    let env = TestEnv::new().await?;
    let sender = env.charlie().clone();
    let alice = env.alice().clone();
    let bob = env.bob().clone();

    let deployed = ConstructorsMyPsp34::new(&env.api, &sender).deploy_new().await?;
    let contract = ContractMyPsp34::new(deployed.address, &sender, &env.api);

    Ok(Setup {
        env,
        contract,
        sender,
        alice,
        bob,
    })
}

async fn balance(contract: &ContractMyPsp34, owner: &KeyPair) -> Result<u32> {
    Ok(contract.query().balance_of(owner.address()).await?.value)
}

#[tokio::test]
async fn test_collection_id_is_contract_address() -> Result<()> {
    let Setup { env, contract, .. } = setup().await?;

    let expected = Id::Bytes(contract.address().as_bytes().to_vec());
    assert_eq!(contract.query().collection_id().await?.value, expected);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_total_supply() -> Result<()> {
    let Setup { env, contract, .. } = setup().await?;

    assert_eq!(contract.query().total_supply().await?.value, 0);
    contract.tx().mint_token().await?;
    contract.tx().mint_token().await?;
    contract.tx().mint_token().await?;
    assert_eq!(contract.query().total_supply().await?.value, 3);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_transfer_works() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        alice,
        ..
    } = setup().await?;

    contract.tx().mint_token().await?;
    assert_eq!(balance(&contract, &sender).await?, 1);
    assert_eq!(balance(&contract, &alice).await?, 0);

    let result = contract
        .tx()
        .transfer(alice.address(), Id::U8(0), Vec::new())
        .await?;
    assert_eq!(
        result.decode_events::<Transfer>("Transfer")?,
        vec![Transfer {
            from: Some(sender.address()),
            to: Some(alice.address()),
            id: Id::U8(0),
        }]
    );

    assert_eq!(balance(&contract, &sender).await?, 0);
    assert_eq!(balance(&contract, &alice).await?, 1);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_approved_transfer_works() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        alice,
        ..
    } = setup().await?;

    contract.tx().mint_token().await?;
    assert_eq!(balance(&contract, &sender).await?, 1);
    assert_eq!(balance(&contract, &alice).await?, 0);

    // Approve the transfer of this token only
    let token_id = Id::U8(0);
    contract
        .tx()
        .approve(alice.address(), Some(token_id.clone()), true)
        .await?;
    assert!(
        contract
            .query()
            .allowance(sender.address(), alice.address(), Some(token_id.clone()))
            .await?
            .value
    );

    contract
        .with_signer(&alice)
        .tx()
        .transfer(alice.address(), token_id.clone(), Vec::new())
        .await?;

    assert_eq!(balance(&contract, &sender).await?, 0);
    assert_eq!(balance(&contract, &alice).await?, 1);
    // The token approval is consumed by the transfer
    assert!(
        !contract
            .query()
            .allowance(sender.address(), alice.address(), Some(token_id))
            .await?
            .value
    );

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_approved_operator_transfer_works() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        alice,
        ..
    } = setup().await?;

    contract.tx().mint_token().await?;
    assert_eq!(balance(&contract, &sender).await?, 1);
    assert_eq!(balance(&contract, &alice).await?, 0);

    // Approve the transfer of any token
    contract.tx().approve(alice.address(), None, true).await?;

    contract
        .with_signer(&alice)
        .tx()
        .transfer(alice.address(), Id::U8(0), Vec::new())
        .await?;

    assert_eq!(balance(&contract, &sender).await?, 0);
    assert_eq!(balance(&contract, &alice).await?, 1);

    // Tokens minted after the approval are covered too
    contract.tx().mint_token().await?;
    contract
        .with_signer(&alice)
        .tx()
        .transfer(alice.address(), Id::U8(1), Vec::new())
        .await?;
    assert_eq!(balance(&contract, &alice).await?, 2);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_owner_of_after_transfer() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        bob,
        ..
    } = setup().await?;

    contract.tx().mint_token().await?;
    assert_eq!(
        contract.query().owner_of(Id::U8(0)).await?.value,
        Some(sender.address())
    );

    contract
        .tx()
        .transfer(bob.address(), Id::U8(0), b"data".to_vec())
        .await?;
    assert_eq!(
        contract.query().owner_of(Id::U8(0)).await?.value,
        Some(bob.address())
    );

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_cannot_transfer_non_existing_token() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        alice,
        ..
    } = setup().await?;

    assert_eq!(balance(&contract, &sender).await?, 0);
    let best = env.api.best_block().await?.number;

    let err = contract
        .tx()
        .transfer(alice.address(), Id::U8(0), Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&Psp34Error::TokenNotExists));

    assert_eq!(balance(&contract, &sender).await?, 0);
    // Rejected by the dry run, nothing was sealed
    assert_eq!(env.api.best_block().await?.number, best);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_cannot_transfer_without_allowance() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        alice,
        ..
    } = setup().await?;

    contract.tx().mint_token().await?;
    assert_eq!(balance(&contract, &sender).await?, 1);

    let err = contract
        .with_signer(&alice)
        .tx()
        .transfer(alice.address(), Id::U8(0), Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&Psp34Error::NotApproved));

    assert_eq!(balance(&contract, &sender).await?, 1);
    assert_eq!(balance(&contract, &alice).await?, 0);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_token_approval_does_not_cover_other_tokens() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        bob,
        ..
    } = setup().await?;

    contract.tx().mint_token().await?;
    contract.tx().mint_token().await?;
    contract
        .tx()
        .approve(bob.address(), Some(Id::U8(0)), true)
        .await?;

    let as_bob = contract.with_signer(&bob);
    as_bob
        .tx()
        .transfer(bob.address(), Id::U8(0), Vec::new())
        .await?;
    assert_eq!(balance(&contract, &sender).await?, 1);
    assert_eq!(balance(&contract, &bob).await?, 1);

    let err = as_bob
        .tx()
        .transfer(bob.address(), Id::U8(1), Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&Psp34Error::NotApproved));
    assert_eq!(
        contract.query().owner_of(Id::U8(1)).await?.value,
        Some(sender.address())
    );

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_can_mint_any_id() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        ..
    } = setup().await?;

    let ids = [
        Id::U8(123),
        Id::U16(123),
        Id::U32(123),
        Id::U64(123),
        Id::U128(123),
        Id::Bytes(b"123".to_vec()),
    ];

    for (index, id) in ids.iter().enumerate() {
        assert_eq!(balance(&contract, &sender).await?, index as u32);
        assert_eq!(contract.query().owner_of(id.clone()).await?.value, None);
        contract.tx().mint(id.clone()).await?;
        assert_eq!(
            contract.query().owner_of(id.clone()).await?.value,
            Some(sender.address())
        );
    }

    assert_eq!(balance(&contract, &sender).await?, 6);
    assert_eq!(contract.query().total_supply().await?.value, 6);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_cannot_mint_twice() -> Result<()> {
    let Setup {
        env, contract, alice, ..
    } = setup().await?;

    contract.tx().mint(Id::U32(7)).await?;

    // Dry run shows the verdict without a transaction
    assert_eq!(
        contract.with_signer(&alice).query().mint(Id::U32(7)).await?.value,
        Err(Psp34Error::TokenExists)
    );
    let err = contract
        .with_signer(&alice)
        .tx()
        .mint(Id::U32(7))
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&Psp34Error::TokenExists));
    assert_eq!(balance(&contract, &alice).await?, 0);
    assert_eq!(contract.query().total_supply().await?.value, 1);

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_cannot_approve_self() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        ..
    } = setup().await?;

    let err = contract
        .tx()
        .approve(sender.address(), None, true)
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&Psp34Error::SelfApprove));

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_revoked_operator_cannot_transfer() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        alice,
        ..
    } = setup().await?;

    contract.tx().mint_token().await?;
    contract.tx().approve(alice.address(), None, true).await?;
    contract.tx().approve(alice.address(), None, false).await?;
    assert!(
        !contract
            .query()
            .allowance(sender.address(), alice.address(), None)
            .await?
            .value
    );

    let err = contract
        .with_signer(&alice)
        .tx()
        .transfer(alice.address(), Id::U8(0), Vec::new())
        .await
        .unwrap_err();
    assert!(err.is_reverted());

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_token_approvee_cannot_approve_others() -> Result<()> {
    let Setup {
        env,
        contract,
        sender,
        alice,
        bob,
    } = setup().await?;

    contract.tx().mint_token().await?;
    contract
        .tx()
        .approve(alice.address(), Some(Id::U8(0)), true)
        .await?;

    let as_alice = contract.with_signer(&alice);
    let err = as_alice
        .tx()
        .approve(bob.address(), Some(Id::U8(0)), true)
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&Psp34Error::NotApproved));
    assert!(
        !contract
            .query()
            .allowance(sender.address(), bob.address(), Some(Id::U8(0)))
            .await?
            .value
    );

    let err = contract
        .with_signer(&bob)
        .tx()
        .transfer(bob.address(), Id::U8(0), Vec::new())
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&Psp34Error::NotApproved));
    assert_eq!(
        contract.query().owner_of(Id::U8(0)).await?.value,
        Some(sender.address())
    );

    // Alice can still use her own approval
    as_alice
        .tx()
        .transfer(alice.address(), Id::U8(0), Vec::new())
        .await?;
    assert_eq!(balance(&contract, &alice).await?, 1);

    env.teardown().await;
    Ok(())
}
