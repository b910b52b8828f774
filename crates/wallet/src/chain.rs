//! Read access to the chain, independent of any account

use crate::WalletError;
use aa_wallet_contracts::ERC20;
use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, BlockNumber, TransactionReceipt, H256, U256},
};
use std::sync::Arc;

/// Execution client reads used by the wallet
#[async_trait]
pub trait ChainReader: Send + Sync + 'static {
    /// Native balance of `account`
    async fn native_balance(&self, account: Address) -> Result<U256, WalletError>;

    /// ERC-20 balance of `account`
    async fn token_balance(&self, token: Address, account: Address) -> Result<U256, WalletError>;

    /// ERC-20 allowance granted by `owner` to `spender`
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, WalletError>;

    /// Receipt of a transaction, `None` while pending or unknown
    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, WalletError>;

    /// Base fee of the latest block
    async fn base_fee(&self) -> Result<U256, WalletError>;
}

/// [ChainReader] over any ethers middleware
#[derive(Clone, Debug)]
pub struct EthersChain<M: Middleware + 'static> {
    eth_client: Arc<M>,
}

impl<M: Middleware + 'static> EthersChain<M> {
    pub fn new(eth_client: Arc<M>) -> Self {
        Self { eth_client }
    }

    pub fn eth_client(&self) -> Arc<M> {
        self.eth_client.clone()
    }
}

impl EthersChain<Provider<Http>> {
    /// Connects to an execution client over HTTP
    pub fn connect(url: &str) -> Result<Self, WalletError> {
        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| WalletError::Config { inner: format!("invalid provider {url}: {e}") })?;
        Ok(Self::new(Arc::new(provider)))
    }
}

fn chain_error<E: ToString>(err: E) -> WalletError {
    WalletError::Chain { inner: err.to_string() }
}

#[async_trait]
impl<M: Middleware + 'static> ChainReader for EthersChain<M> {
    async fn native_balance(&self, account: Address) -> Result<U256, WalletError> {
        self.eth_client.get_balance(account, None).await.map_err(chain_error)
    }

    async fn token_balance(&self, token: Address, account: Address) -> Result<U256, WalletError> {
        ERC20::new(self.eth_client.clone(), token).balance_of(account).await.map_err(chain_error)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, WalletError> {
        ERC20::new(self.eth_client.clone(), token)
            .allowance(owner, spender)
            .await
            .map_err(chain_error)
    }

    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, WalletError> {
        self.eth_client.get_transaction_receipt(hash).await.map_err(chain_error)
    }

    async fn base_fee(&self) -> Result<U256, WalletError> {
        self.eth_client
            .get_block(BlockNumber::Latest)
            .await
            .map_err(chain_error)?
            .and_then(|block| block.base_fee_per_gas)
            .ok_or_else(|| WalletError::Chain { inner: "latest block has no base fee".into() })
    }
}
