// File: testing-framework/tests/psp34_hooks_test.rs
//
// my_psp34_hooked e2e tests
//
// The hooked collection is driven through the generic contract proxy: its
// extra toggles switch the before / after transfer hooks to failing.

use anyhow::Result;
use showgame_common::serializer::Serializer;
use showgame_contracts::{
    psp34::{
        AFTER_TRANSFER_ERROR, BEFORE_TRANSFER_ERROR, CHANGE_STATE_ERR_ON_AFTER,
        CHANGE_STATE_ERR_ON_BEFORE, CONSTRUCTOR_NEW, MINT, OWNER_OF, TOTAL_SUPPLY, TRANSFER,
    },
    ContractCode, MyPsp34Hooked,
};
use showgame_testing_framework::{contract::deploy, prelude::*};

async fn setup() -> Result<(TestEnv, Contract)> {
    init_test_logger();
    let env = TestEnv::new().await?;
    let alice = env.alice().clone();

    let deployed = deploy::<()>(&env.api, &alice, &MyPsp34Hooked, CONSTRUCTOR_NEW, &[]).await?;
    let abi = Arc::new(MyPsp34Hooked.abi().clone());
    let contract = Contract::new(deployed.address, &alice, &env.api, abi);
    Ok((env, contract))
}

async fn mint(contract: &Contract, id: Id) -> Result<TxResult, TxError<Psp34Error>> {
    contract.tx(MINT, &id.to_bytes()).await
}

async fn owner_of(contract: &Contract, id: Id) -> Result<Option<AccountId>> {
    Ok(contract.query(OWNER_OF, &id.to_bytes()).await?.value)
}

#[tokio::test]
async fn test_before_hook_fails_mint() -> Result<()> {
    let (env, contract) = setup().await?;

    mint(&contract, Id::U8(1)).await?;
    contract.tx::<()>(CHANGE_STATE_ERR_ON_BEFORE, &[]).await?;

    let err = mint(&contract, Id::U8(4)).await.unwrap_err();
    assert_eq!(
        err.contract_error(),
        Some(&Psp34Error::Custom(BEFORE_TRANSFER_ERROR.to_string()))
    );
    assert_eq!(owner_of(&contract, Id::U8(4)).await?, None);

    contract.tx::<()>(CHANGE_STATE_ERR_ON_BEFORE, &[]).await?;
    mint(&contract, Id::U8(4)).await?;
    assert_eq!(
        owner_of(&contract, Id::U8(4)).await?,
        Some(env.alice().address())
    );

    env.teardown().await;
    Ok(())
}

#[tokio::test]
async fn test_after_hook_fails_mint_and_transfer() -> Result<()> {
    let (env, contract) = setup().await?;
    let bob = env.bob().clone();

    mint(&contract, Id::U8(1)).await?;
    contract.tx::<()>(CHANGE_STATE_ERR_ON_AFTER, &[]).await?;

    let expected = Psp34Error::Custom(AFTER_TRANSFER_ERROR.to_string());
    let err = mint(&contract, Id::U8(4)).await.unwrap_err();
    assert_eq!(err.contract_error(), Some(&expected));

    let err = contract
        .tx::<Psp34Error>(TRANSFER, &(bob.address(), Id::U8(1), Vec::<u8>::new()).to_bytes())
        .await
        .unwrap_err();
    assert_eq!(err.contract_error(), Some(&expected));

    assert_eq!(
        owner_of(&contract, Id::U8(1)).await?,
        Some(env.alice().address())
    );
    let supply: Balance = contract.query(TOTAL_SUPPLY, &[]).await?.value;
    assert_eq!(supply, 1);

    env.teardown().await;
    Ok(())
}
