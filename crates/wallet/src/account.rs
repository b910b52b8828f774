//! Read-only smart account: balances, receipts and fee quotes

use crate::{metrics, pricing, ChainReader, TokenTransfer, WalletError};
use aa_wallet_pack::{
    AccountPack, AssembleOptions, PackBuilder, PackTarget, UserOperationReceipt,
};
use aa_wallet_primitives::{Call, Quote, TransactionConfig, UserOperationHash, WalletConfig};
use ethers::types::{Address, TransactionReceipt, H256, U256};
use std::{fmt, sync::Arc};
use tokio::sync::OnceCell;
use tracing::{debug, trace};

/// Smart account handle without key material. Every operation is free of side effects on chain.
///
/// The account pack and the account address are resolved on first use and at most once per
/// handle, also under concurrent first use.
pub struct SmartAccount {
    config: Arc<WalletConfig>,
    target: PackTarget,
    chain: Option<Arc<dyn ChainReader>>,
    pack_builder: Arc<dyn PackBuilder>,
    pack: OnceCell<Arc<dyn AccountPack>>,
    address: OnceCell<Address>,
}

impl SmartAccount {
    /// Handle of the account owned by `owner`; the address is resolved through the pack
    pub fn new(
        config: Arc<WalletConfig>,
        owner: Address,
        chain: Option<Arc<dyn ChainReader>>,
        pack_builder: Arc<dyn PackBuilder>,
    ) -> Self {
        Self {
            config,
            target: PackTarget::Owner(owner),
            chain,
            pack_builder,
            pack: OnceCell::new(),
            address: OnceCell::new(),
        }
    }

    /// Handle of an account the caller does not control
    pub fn read_only(
        address: Address,
        config: Arc<WalletConfig>,
        chain: Option<Arc<dyn ChainReader>>,
        pack_builder: Arc<dyn PackBuilder>,
    ) -> Self {
        Self {
            config,
            target: PackTarget::Account(address),
            chain,
            pack_builder,
            pack: OnceCell::new(),
            address: OnceCell::new_with(Some(address)),
        }
    }

    /// Read-only handle sharing an already built pack
    pub(crate) fn with_pack(&self, address: Address, pack: Arc<dyn AccountPack>) -> Self {
        Self {
            config: self.config.clone(),
            target: PackTarget::Account(address),
            chain: self.chain.clone(),
            pack_builder: self.pack_builder.clone(),
            pack: OnceCell::new_with(Some(pack)),
            address: OnceCell::new_with(Some(address)),
        }
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.chain.is_some()
    }

    pub(crate) fn chain(&self) -> Result<&Arc<dyn ChainReader>, WalletError> {
        self.chain.as_ref().ok_or(WalletError::NotConnected)
    }

    /// The account pack, built on first use
    pub async fn pack(&self) -> Result<&Arc<dyn AccountPack>, WalletError> {
        self.chain()?;
        self.pack
            .get_or_try_init(|| async {
                debug!("Building account pack for {:?}", self.target);
                self.pack_builder.build(self.target).await.map_err(WalletError::Pack)
            })
            .await
    }

    /// Checksummed address of the smart account
    pub async fn address(&self) -> Result<Address, WalletError> {
        self.address
            .get_or_try_init(|| async {
                let address = self.pack().await?.sender_address().await?;
                trace!("Resolved smart account address {address:?}");
                Ok::<_, WalletError>(address)
            })
            .await
            .copied()
    }

    /// Native balance of the smart account
    pub async fn get_balance(&self) -> Result<U256, WalletError> {
        let chain = self.chain()?;
        chain.native_balance(self.address().await?).await
    }

    /// Balance of `token` held by the smart account
    pub async fn get_token_balance(&self, token: Address) -> Result<U256, WalletError> {
        let chain = self.chain()?;
        chain.token_balance(token, self.address().await?).await
    }

    /// Balance of the configured paymaster token held by the smart account
    pub async fn get_paymaster_token_balance(&self) -> Result<U256, WalletError> {
        self.get_token_balance(self.config.paymaster_token.address).await
    }

    /// Allowance of `token` the smart account granted to `spender`
    pub async fn get_allowance(&self, token: Address, spender: Address) -> Result<U256, WalletError> {
        let chain = self.chain()?;
        chain.allowance(token, self.address().await?, spender).await
    }

    pub async fn get_transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, WalletError> {
        self.chain()?.transaction_receipt(hash).await
    }

    /// Bundler receipt of a user operation, `None` until it is included
    pub async fn get_user_operation_receipt(
        &self,
        hash: UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, WalletError> {
        Ok(self.pack().await?.user_operation_receipt(hash).await?)
    }

    /// Hash of the transaction that included a user operation, `None` until it is included
    pub async fn get_user_operation_transaction_hash(
        &self,
        hash: UserOperationHash,
    ) -> Result<Option<H256>, WalletError> {
        Ok(self.pack().await?.resolve_transaction_hash(hash).await?)
    }

    /// Fee (in paymaster token base units) of executing `calls` as one batch
    pub async fn quote_send_transaction(
        &self,
        calls: &[Call],
        overrides: Option<&TransactionConfig>,
    ) -> Result<Quote, WalletError> {
        self.quote_calls(calls, self.config.paymaster_token_for(overrides)).await
    }

    /// Fee (in paymaster token base units) of a token transfer
    pub async fn quote_transfer(
        &self,
        transfer: &TokenTransfer,
        overrides: Option<&TransactionConfig>,
    ) -> Result<Quote, WalletError> {
        self.quote_send_transaction(&[transfer.to_call()], overrides).await
    }

    /// Fee quoting shared by quotes and sends
    pub(crate) async fn quote_calls(
        &self,
        calls: &[Call],
        paymaster_token: Address,
    ) -> Result<Quote, WalletError> {
        let pack = self.pack().await?;
        let options =
            AssembleOptions { paymaster_token, amount_to_approve: U256::MAX, valid_until: None };
        let uo = pack.assemble_operation(calls, options).await.map_err(WalletError::at_quote)?;
        let native = pricing::native_cost(&uo)?;
        let rate =
            pack.token_exchange_rate(paymaster_token).await.map_err(WalletError::at_quote)?;
        let fee = pricing::token_amount(native, rate)?;

        trace!("Quoted {fee} (native cost {native}, exchange rate {rate}) for {} call(s)", calls.len());
        metrics::record_quote();
        Ok(Quote { fee })
    }
}

impl fmt::Debug for SmartAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmartAccount")
            .field("target", &self.target)
            .field("address", &self.address.get())
            .field("connected", &self.is_connected())
            .finish()
    }
}
