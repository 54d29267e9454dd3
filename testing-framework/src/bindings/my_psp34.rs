// File: testing-framework/src/bindings/my_psp34.rs
//
// Bindings for the `my_psp34` contract

use std::sync::Arc;

use showgame_common::{
    config::Balance,
    crypto::{AccountId, KeyPair},
    psp34::{Id, Psp34Error},
    serializer::Serializer,
};
use showgame_contracts::{psp34, ContractCode, MyPsp34};

use crate::{
    api::ApiClient,
    contract::{deploy, Contract, DeployResult, QueryError, QueryReturnType, TxError, TxResult},
};

type QueryResult<T> = Result<QueryReturnType<T>, QueryError>;
type Psp34TxResult = Result<TxResult, TxError<Psp34Error>>;

/// Deploys `my_psp34` instances
pub struct ConstructorsMyPsp34 {
    api: ApiClient,
    signer: KeyPair,
}

impl ConstructorsMyPsp34 {
    pub fn new(api: &ApiClient, signer: &KeyPair) -> Self {
        Self {
            api: api.clone(),
            signer: signer.clone(),
        }
    }

    /// Instantiate with the `new` constructor
    pub async fn deploy_new(&self) -> Result<DeployResult, TxError<()>> {
        deploy(&self.api, &self.signer, &MyPsp34, psp34::CONSTRUCTOR_NEW, &[]).await
    }
}

/// Handle to a deployed `my_psp34` instance
#[derive(Clone)]
pub struct ContractMyPsp34 {
    contract: Contract,
}

impl ContractMyPsp34 {
    pub fn new(address: AccountId, signer: &KeyPair, api: &ApiClient) -> Self {
        let abi = Arc::new(MyPsp34.abi().clone());
        Self {
            contract: Contract::new(address, signer, api, abi),
        }
    }

    pub fn address(&self) -> AccountId {
        self.contract.address()
    }

    pub fn abi(&self) -> &showgame_common::contract::ContractAbi {
        self.contract.abi()
    }

    pub fn signer(&self) -> &KeyPair {
        self.contract.signer()
    }

    /// The untyped proxy underneath
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn with_signer(&self, signer: &KeyPair) -> Self {
        Self {
            contract: self.contract.with_signer(signer),
        }
    }

    pub fn query(&self) -> Psp34Query<'_> {
        Psp34Query {
            contract: &self.contract,
        }
    }

    pub fn tx(&self) -> Psp34Tx<'_> {
        Psp34Tx {
            contract: &self.contract,
        }
    }
}

/// Dry run view of `my_psp34`
pub struct Psp34Query<'a> {
    contract: &'a Contract,
}

impl Psp34Query<'_> {
    pub async fn balance_of(&self, owner: AccountId) -> QueryResult<u32> {
        self.contract
            .query(psp34::BALANCE_OF, &Serializer::to_bytes(&owner))
            .await
    }

    pub async fn owner_of(&self, id: Id) -> QueryResult<Option<AccountId>> {
        self.contract.query(psp34::OWNER_OF, &id.to_bytes()).await
    }

    pub async fn allowance(
        &self,
        owner: AccountId,
        operator: AccountId,
        id: Option<Id>,
    ) -> QueryResult<bool> {
        self.contract
            .query(psp34::ALLOWANCE, &(owner, operator, id).to_bytes())
            .await
    }

    pub async fn total_supply(&self) -> QueryResult<Balance> {
        self.contract.query(psp34::TOTAL_SUPPLY, &[]).await
    }

    pub async fn collection_id(&self) -> QueryResult<Id> {
        self.contract.query(psp34::COLLECTION_ID, &[]).await
    }

    // Fallible messages dry run as queries return the whole `Result`

    pub async fn approve(
        &self,
        operator: AccountId,
        id: Option<Id>,
        approved: bool,
    ) -> QueryResult<Result<(), Psp34Error>> {
        self.contract
            .query(psp34::APPROVE, &(operator, id, approved).to_bytes())
            .await
    }

    pub async fn transfer(
        &self,
        to: AccountId,
        id: Id,
        data: Vec<u8>,
    ) -> QueryResult<Result<(), Psp34Error>> {
        self.contract
            .query(psp34::TRANSFER, &(to, id, data).to_bytes())
            .await
    }

    pub async fn mint(&self, id: Id) -> QueryResult<Result<(), Psp34Error>> {
        self.contract.query(psp34::MINT, &id.to_bytes()).await
    }

    pub async fn mint_token(&self) -> QueryResult<Result<(), Psp34Error>> {
        self.contract.query(psp34::MINT_TOKEN, &[]).await
    }
}

/// Transaction view of `my_psp34`
pub struct Psp34Tx<'a> {
    contract: &'a Contract,
}

impl Psp34Tx<'_> {
    pub async fn approve(
        &self,
        operator: AccountId,
        id: Option<Id>,
        approved: bool,
    ) -> Psp34TxResult {
        self.contract
            .tx(psp34::APPROVE, &(operator, id, approved).to_bytes())
            .await
    }

    pub async fn transfer(&self, to: AccountId, id: Id, data: Vec<u8>) -> Psp34TxResult {
        self.contract
            .tx(psp34::TRANSFER, &(to, id, data).to_bytes())
            .await
    }

    /// Mint `id` to the signer
    pub async fn mint(&self, id: Id) -> Psp34TxResult {
        self.contract.tx(psp34::MINT, &id.to_bytes()).await
    }

    /// Mint the next `Id::U8` to the signer
    pub async fn mint_token(&self) -> Psp34TxResult {
        self.contract.tx(psp34::MINT_TOKEN, &[]).await
    }
}
