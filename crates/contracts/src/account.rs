//! Simple account (ECDSA owned smart account) and its factory

pub use super::gen::SimpleAccountFactoryAPI;
use super::gen::{
    simple_account_api::{ExecuteBatchCall, ExecuteCall},
    simple_account_factory_api::CreateAccountCall,
};
use crate::error::ContractCallError;
use aa_wallet_primitives::Call;
use ethers::{
    abi::AbiEncode,
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use std::sync::Arc;

/// Account factory deploying one account per (owner, salt)
#[derive(Clone)]
pub struct SimpleAccountFactory<M: Middleware + 'static> {
    api: SimpleAccountFactoryAPI<M>,
}

impl<M: Middleware + 'static> SimpleAccountFactory<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        Self { api: SimpleAccountFactoryAPI::new(address, eth_client) }
    }

    pub fn address(&self) -> Address {
        self.api.address()
    }

    /// Counterfactual address of the account of `owner`
    pub async fn get_address(&self, owner: Address, salt: U256) -> Result<Address, ContractCallError> {
        self.api.get_address(owner, salt).call().await.map_err(ContractCallError::from_contract_error)
    }
}

/// Factory data deploying the account of `owner`
pub fn create_account_call_data(owner: Address, salt: U256) -> Bytes {
    CreateAccountCall { owner, salt }.encode().into()
}

/// Account call data executing `calls`; a single call uses `execute`, more use `executeBatch`
pub fn execute_call_data(calls: &[Call]) -> Bytes {
    match calls {
        [call] => ExecuteCall { dest: call.to, value: call.value, func: call.data.clone() }
            .encode()
            .into(),
        calls => ExecuteBatchCall {
            dest: calls.iter().map(|c| c.to).collect(),
            value: calls.iter().map(|c| c.value).collect(),
            func: calls.iter().map(|c| c.data.clone()).collect(),
        }
        .encode()
        .into(),
    }
}
