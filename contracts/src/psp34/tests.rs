use std::sync::Arc;

use showgame_common::{
    crypto::AccountId,
    psp34::{Id, Psp34Error, Transfer},
    serializer::Serializer,
};

use super::*;
use crate::mock::MockEnvironment;

const CONTRACT: AccountId = AccountId::new([0xc0; 32]);
const DEPLOYER: AccountId = AccountId::new([2; 32]);
const ALICE: AccountId = AccountId::new([0xa1; 32]);
const BOB: AccountId = AccountId::new([0xb0; 32]);

fn setup() -> MockEnvironment {
    let mut env = MockEnvironment::new();
    let result = env
        .deploy(Arc::new(MyPsp34), DEPLOYER, CONTRACT, CONSTRUCTOR_NEW, &[])
        .unwrap();
    assert!(!result.reverted);
    env
}

fn tx(
    env: &mut MockEnvironment,
    caller: AccountId,
    message: &str,
    input: Vec<u8>,
) -> Result<(), Psp34Error> {
    let value = env.call(caller, CONTRACT, message, &input).unwrap();
    let result: Result<(), Psp34Error> = value.decode().unwrap();
    assert_eq!(value.reverted, result.is_err());
    result
}

fn balance(env: &mut MockEnvironment, owner: AccountId) -> u32 {
    env.call(ALICE, CONTRACT, BALANCE_OF, &owner.to_bytes())
        .unwrap()
        .decode()
        .unwrap()
}

fn owner(env: &mut MockEnvironment, id: &Id) -> Option<AccountId> {
    env.call(ALICE, CONTRACT, OWNER_OF, &id.to_bytes())
        .unwrap()
        .decode()
        .unwrap()
}

fn transfer_input(to: AccountId, id: Id) -> Vec<u8> {
    (to, id, Vec::<u8>::new()).to_bytes()
}

#[test]
fn test_collection_id_is_contract_address() {
    let mut env = setup();
    let id: Id = env
        .call(ALICE, CONTRACT, COLLECTION_ID, &[])
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(id, Id::Bytes(CONTRACT.to_bytes().to_vec()));
}

#[test]
fn test_mint_token_uses_counter() {
    let mut env = setup();
    for _ in 0..3 {
        tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    }
    let supply: u128 = env.call(ALICE, CONTRACT, TOTAL_SUPPLY, &[]).unwrap().decode().unwrap();
    assert_eq!(supply, 3);
    assert_eq!(owner(&mut env, &Id::U8(2)), Some(DEPLOYER));
    assert_eq!(owner(&mut env, &Id::U8(3)), None);
    assert_eq!(balance(&mut env, DEPLOYER), 3);
}

#[test]
fn test_mint_token_covers_every_u8() {
    let mut env = setup();
    for _ in 0..=u8::MAX {
        tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    }
    assert_eq!(owner(&mut env, &Id::U8(255)), Some(DEPLOYER));
    assert_eq!(balance(&mut env, DEPLOYER), 256);

    assert_eq!(
        tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()),
        Err(Psp34Error::Custom("No U8 id left to mint".to_string()))
    );
    assert_eq!(balance(&mut env, DEPLOYER), 256);
}

#[test]
fn test_mint_existing_id_fails() {
    let mut env = setup();
    tx(&mut env, DEPLOYER, MINT, Id::U16(7).to_bytes()).unwrap();
    assert_eq!(
        tx(&mut env, ALICE, MINT, Id::U16(7).to_bytes()),
        Err(Psp34Error::TokenExists)
    );
    // Same value in another variant is a different token
    tx(&mut env, ALICE, MINT, Id::U8(7).to_bytes()).unwrap();
    assert_eq!(balance(&mut env, ALICE), 1);
}

#[test]
fn test_transfer_by_owner() {
    let mut env = setup();
    tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    tx(&mut env, DEPLOYER, TRANSFER, transfer_input(ALICE, Id::U8(0))).unwrap();

    assert_eq!(balance(&mut env, DEPLOYER), 0);
    assert_eq!(balance(&mut env, ALICE), 1);
    assert_eq!(owner(&mut env, &Id::U8(0)), Some(ALICE));

    let transfers = env.events_named("Transfer");
    let last: Transfer = transfers.last().unwrap().decode().unwrap();
    assert_eq!(last.from, Some(DEPLOYER));
    assert_eq!(last.to, Some(ALICE));
}

#[test]
fn test_transfer_missing_token_reverts() {
    let mut env = setup();
    assert_eq!(
        tx(&mut env, DEPLOYER, TRANSFER, transfer_input(ALICE, Id::U8(0))),
        Err(Psp34Error::TokenNotExists)
    );
}

#[test]
fn test_transfer_without_allowance_reverts() {
    let mut env = setup();
    tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    assert_eq!(
        tx(&mut env, ALICE, TRANSFER, transfer_input(ALICE, Id::U8(0))),
        Err(Psp34Error::NotApproved)
    );
    assert_eq!(balance(&mut env, DEPLOYER), 1);
}

#[test]
fn test_token_approval_is_scoped_and_consumed() {
    let mut env = setup();
    tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    tx(&mut env, DEPLOYER, APPROVE, (ALICE, Some(Id::U8(0)), true).to_bytes()).unwrap();

    // Approval for U8(0) does not cover U8(1)
    assert_eq!(
        tx(&mut env, ALICE, TRANSFER, transfer_input(ALICE, Id::U8(1))),
        Err(Psp34Error::NotApproved)
    );
    tx(&mut env, ALICE, TRANSFER, transfer_input(BOB, Id::U8(0))).unwrap();
    assert_eq!(owner(&mut env, &Id::U8(0)), Some(BOB));

    let allowed: bool = env
        .call(ALICE, CONTRACT, ALLOWANCE, &(DEPLOYER, ALICE, Some(Id::U8(0))).to_bytes())
        .unwrap()
        .decode()
        .unwrap();
    assert!(!allowed);
}

#[test]
fn test_token_approval_cannot_be_handed_on() {
    let mut env = setup();
    tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    tx(&mut env, DEPLOYER, APPROVE, (ALICE, Some(Id::U8(0)), true).to_bytes()).unwrap();

    assert_eq!(
        tx(&mut env, ALICE, APPROVE, (BOB, Some(Id::U8(0)), true).to_bytes()),
        Err(Psp34Error::NotApproved)
    );
    assert_eq!(
        tx(&mut env, BOB, TRANSFER, transfer_input(BOB, Id::U8(0))),
        Err(Psp34Error::NotApproved)
    );
    assert_eq!(owner(&mut env, &Id::U8(0)), Some(DEPLOYER));

    // An operator for every token may approve on the owner's behalf
    tx(&mut env, DEPLOYER, APPROVE, (ALICE, None::<Id>, true).to_bytes()).unwrap();
    tx(&mut env, ALICE, APPROVE, (BOB, Some(Id::U8(0)), true).to_bytes()).unwrap();
    tx(&mut env, BOB, TRANSFER, transfer_input(BOB, Id::U8(0))).unwrap();
    assert_eq!(owner(&mut env, &Id::U8(0)), Some(BOB));
}

#[test]
fn test_operator_approval_covers_all_tokens() {
    let mut env = setup();
    tx(&mut env, DEPLOYER, APPROVE, (ALICE, None::<Id>, true).to_bytes()).unwrap();
    tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();

    tx(&mut env, ALICE, TRANSFER, transfer_input(ALICE, Id::U8(0))).unwrap();
    tx(&mut env, ALICE, TRANSFER, transfer_input(ALICE, Id::U8(1))).unwrap();
    assert_eq!(balance(&mut env, ALICE), 2);

    tx(&mut env, DEPLOYER, APPROVE, (ALICE, None::<Id>, false).to_bytes()).unwrap();
    tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    assert_eq!(
        tx(&mut env, ALICE, TRANSFER, transfer_input(ALICE, Id::U8(2))),
        Err(Psp34Error::NotApproved)
    );
}

#[test]
fn test_self_approve_fails() {
    let mut env = setup();
    tx(&mut env, DEPLOYER, MINT_TOKEN, Vec::new()).unwrap();
    assert_eq!(
        tx(&mut env, DEPLOYER, APPROVE, (DEPLOYER, Some(Id::U8(0)), true).to_bytes()),
        Err(Psp34Error::SelfApprove)
    );
    assert_eq!(
        tx(&mut env, DEPLOYER, APPROVE, (BOB, Some(Id::U8(9)), true).to_bytes()),
        Err(Psp34Error::TokenNotExists)
    );
}

#[test]
fn test_revert_discards_changes() {
    let mut env = setup();
    tx(&mut env, DEPLOYER, MINT, Id::U32(1).to_bytes()).unwrap();
    let events = env.events.len();
    assert!(tx(&mut env, BOB, MINT, Id::U32(1).to_bytes()).is_err());
    assert_eq!(env.events.len(), events);
    assert_eq!(balance(&mut env, BOB), 0);
}

#[test]
fn test_unknown_selector_traps() {
    let mut env = setup();
    let err = env.call(ALICE, CONTRACT, "PSP34::burn", &[]).unwrap_err();
    assert!(matches!(err, ExecError::UnknownSelector(_)));
}

#[test]
fn test_bad_input_traps() {
    let mut env = setup();
    let err = env.call(ALICE, CONTRACT, BALANCE_OF, &[1, 2, 3]).unwrap_err();
    assert!(matches!(err, ExecError::InvalidInput(_)));
}
