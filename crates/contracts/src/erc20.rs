pub use super::gen::ERC20API;
use super::gen::erc20api::{ApproveCall, TransferCall};
use crate::error::ContractCallError;
use ethers::{
    abi::AbiEncode,
    providers::Middleware,
    types::{Address, Bytes, U256},
};
use std::sync::Arc;

/// Read-only view of an ERC-20 token
#[derive(Clone)]
pub struct ERC20<M: Middleware + 'static> {
    api: ERC20API<M>,
}

impl<M: Middleware + 'static> ERC20<M> {
    pub fn new(eth_client: Arc<M>, address: Address) -> Self {
        Self { api: ERC20API::new(address, eth_client) }
    }

    pub fn address(&self) -> Address {
        self.api.address()
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, ContractCallError> {
        self.api.balance_of(account).call().await.map_err(ContractCallError::from_contract_error)
    }

    pub async fn allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ContractCallError> {
        self.api
            .allowance(owner, spender)
            .call()
            .await
            .map_err(ContractCallError::from_contract_error)
    }
}

/// Calldata of `transfer(to, amount)`
pub fn transfer_call_data(to: Address, amount: U256) -> Bytes {
    TransferCall { to, amount }.encode().into()
}

/// Calldata of `approve(spender, amount)`
pub fn approve_call_data(spender: Address, amount: U256) -> Bytes {
    ApproveCall { spender, amount }.encode().into()
}
