use crate::{
    AccountPack, AssembleOptions, FeeEstimator, IncludedTransaction, PackBuilder, PackError,
    PackTarget, ProviderFeeEstimator, SponsorContext, SponsorResult, TokenQuoteRequest,
    TokenQuotes, UserOperationReceipt,
};
use aa_wallet_contracts::{
    account::{create_account_call_data, execute_call_data},
    erc20::approve_call_data,
    utils::account_function_name,
    EntryPoint, SimpleAccountFactory,
};
use aa_wallet_primitives::{
    constants::{account_modules::AccountModule, entry_point::NONCE_KEY, user_operation},
    Call, ConfigError, KeyedAccount, UserOperation, UserOperationHash, WalletConfig,
};
use async_trait::async_trait;
use ethers::{
    providers::Middleware,
    types::{Address, Bytes, H256, U256},
};
use jsonrpsee::{
    core::client::ClientT,
    http_client::{HttpClient, HttpClientBuilder},
    rpc_params,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Account pack backed by the entry point, a bundler and a token paymaster
#[derive(Clone)]
pub struct BundlerPack<M: Middleware + 'static> {
    config: Arc<WalletConfig>,
    owner: Option<Address>,
    sender: Address,
    module: &'static AccountModule,
    entry_point: EntryPoint<M>,
    eth_client: Arc<M>,
    bundler: HttpClient,
    paymaster: HttpClient,
    fee_estimator: Arc<dyn FeeEstimator>,
}

impl<M: Middleware + 'static> BundlerPack<M> {
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point.address()
    }

    /// Factory fields of the next user operation (only if the account has no code yet)
    async fn factory_fields(&self) -> Result<Option<(Address, Bytes)>, PackError> {
        let code = self
            .eth_client
            .get_code(self.sender, None)
            .await
            .map_err(|e| PackError::Provider { inner: e.to_string() })?;
        factory_fields(&code, self.sender, self.owner, self.module)
    }

    /// Calls executed by the account, with the paymaster allowance prepended
    fn account_calls(&self, calls: &[Call], options: &AssembleOptions) -> Vec<Call> {
        let mut account_calls = Vec::with_capacity(calls.len() + 1);
        if !options.amount_to_approve.is_zero() {
            account_calls.push(Call::new(
                options.paymaster_token,
                U256::zero(),
                approve_call_data(self.config.paymaster_address, options.amount_to_approve),
            ));
        }
        account_calls.extend_from_slice(calls);
        account_calls
    }

    async fn sponsor(
        &self,
        uo: &UserOperation,
        context: SponsorContext,
    ) -> Result<SponsorResult, PackError> {
        self.paymaster
            .request(
                "pm_sponsorUserOperation",
                rpc_params![uo.clone(), self.entry_point(), context],
            )
            .await
            .map_err(|e| PackError::Paymaster { inner: e.to_string() })
    }
}

/// `factory` and `factoryData` for an account with the given code; an account without code can
/// only be deployed when its owner is known
pub fn factory_fields(
    code: &Bytes,
    sender: Address,
    owner: Option<Address>,
    module: &AccountModule,
) -> Result<Option<(Address, Bytes)>, PackError> {
    if !code.is_empty() {
        return Ok(None);
    }
    let owner = owner.ok_or_else(|| PackError::Undeployed { inner: format!("{sender:?}") })?;
    let factory = module
        .factory
        .parse::<Address>()
        .map_err(|e| PackError::Other { inner: format!("invalid factory address: {e}") })?;
    Ok(Some((factory, create_account_call_data(owner, U256::from(module.salt)))))
}

#[async_trait]
impl<M: Middleware + 'static> AccountPack for BundlerPack<M> {
    async fn sender_address(&self) -> Result<Address, PackError> {
        Ok(self.sender)
    }

    async fn assemble_operation(
        &self,
        calls: &[Call],
        options: AssembleOptions,
    ) -> Result<UserOperation, PackError> {
        let nonce = self.entry_point.get_nonce(&self.sender, U256::from(NONCE_KEY)).await?;
        let factory = self.factory_fields().await?;
        let fees = self.fee_estimator.estimate_fees().await?;

        let call_data = execute_call_data(&self.account_calls(calls, &options));
        trace!(
            "Assembling {} with {} call(s) for {:?}",
            account_function_name(&call_data).unwrap_or("unknown"),
            calls.len(),
            self.sender
        );

        let mut uo = UserOperation::default()
            .sender(self.sender)
            .nonce(nonce)
            .call_data(call_data)
            .max_fee_per_gas(fees.max_fee_per_gas)
            .max_priority_fee_per_gas(fees.max_priority_fee_per_gas)
            .signature(
                user_operation::DUMMY_SIGNATURE
                    .parse()
                    .map_err(|e| PackError::Other { inner: format!("{e:?}") })?,
            );
        if let Some((factory, factory_data)) = factory {
            debug!("Account {:?} is not deployed, adding factory {factory:?}", self.sender);
            uo = uo.factory(factory, factory_data);
        }

        let context =
            SponsorContext { token: options.paymaster_token, valid_until: options.valid_until };
        let sponsored = self.sponsor(&uo, context).await?.apply(uo);
        trace!("Sponsored user operation {sponsored:?}");

        Ok(sponsored)
    }

    async fn sign_operation(
        &self,
        uo: UserOperation,
        owner: &KeyedAccount,
    ) -> Result<UserOperation, PackError> {
        let hash = uo.hash(&self.entry_point(), self.chain_id());
        let signature = owner.sign_user_operation_hash(hash.0)?;
        Ok(uo.signature(signature))
    }

    async fn submit_operation(&self, uo: UserOperation) -> Result<UserOperationHash, PackError> {
        let hash: UserOperationHash = self
            .bundler
            .request("eth_sendUserOperation", rpc_params![uo, self.entry_point()])
            .await
            .map_err(|e| PackError::Bundler { inner: e.to_string() })?;
        debug!("Submitted user operation {hash}");
        Ok(hash)
    }

    async fn token_exchange_rate(&self, token: Address) -> Result<U256, PackError> {
        let quotes: TokenQuotes = self
            .paymaster
            .request(
                "pimlico_getTokenQuotes",
                rpc_params![
                    TokenQuoteRequest { tokens: vec![token] },
                    self.entry_point(),
                    format!("{:#x}", self.chain_id())
                ],
            )
            .await
            .map_err(|e| PackError::Paymaster { inner: e.to_string() })?;

        quotes
            .quotes
            .into_iter()
            .find(|quote| quote.token == token)
            .map(|quote| quote.exchange_rate)
            .ok_or_else(|| PackError::Paymaster { inner: format!("no quote for token {token:?}") })
    }

    async fn resolve_transaction_hash(
        &self,
        uo_hash: UserOperationHash,
    ) -> Result<Option<H256>, PackError> {
        Ok(self
            .user_operation_receipt(uo_hash)
            .await?
            .map(|receipt| receipt.receipt)
            .map(|IncludedTransaction { transaction_hash, .. }| transaction_hash))
    }

    async fn user_operation_receipt(
        &self,
        uo_hash: UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, PackError> {
        self.bundler
            .request("eth_getUserOperationReceipt", rpc_params![uo_hash])
            .await
            .map_err(|e| PackError::Bundler { inner: e.to_string() })
    }
}

/// Builds [BundlerPack]s from the wallet configuration
#[derive(Clone)]
pub struct BundlerPackBuilder<M: Middleware + 'static> {
    config: Arc<WalletConfig>,
    eth_client: Option<Arc<M>>,
    fee_estimator: Option<Arc<dyn FeeEstimator>>,
}

impl<M: Middleware + 'static> BundlerPackBuilder<M> {
    /// Creates a builder; without an execution client every build fails
    pub fn new(config: Arc<WalletConfig>, eth_client: Option<Arc<M>>) -> Self {
        Self { config, eth_client, fee_estimator: None }
    }

    /// Replaces the default (execution client based) gas price estimation
    pub fn with_fee_estimator(mut self, fee_estimator: Arc<dyn FeeEstimator>) -> Self {
        self.fee_estimator = Some(fee_estimator);
        self
    }

    fn http_client(url: &str) -> Result<HttpClient, PackError> {
        HttpClientBuilder::default()
            .build(url)
            .map_err(|e| PackError::Other { inner: format!("invalid endpoint {url}: {e}") })
    }
}

#[async_trait]
impl<M: Middleware + 'static> PackBuilder for BundlerPackBuilder<M> {
    async fn build(&self, target: PackTarget) -> Result<Arc<dyn AccountPack>, PackError> {
        let eth_client = self
            .eth_client
            .clone()
            .ok_or_else(|| PackError::Provider { inner: "no execution client configured".into() })?;
        let module = self
            .config
            .account_module()
            .map_err(|e: ConfigError| PackError::Other { inner: e.to_string() })?;

        let (owner, sender) = match target {
            PackTarget::Owner(owner) => {
                let factory_address = module
                    .factory
                    .parse::<Address>()
                    .map_err(|e| PackError::Other { inner: format!("invalid factory address: {e}") })?;
                let factory = SimpleAccountFactory::new(eth_client.clone(), factory_address);
                let sender = factory.get_address(owner, U256::from(module.salt)).await?;
                (Some(owner), sender)
            }
            PackTarget::Account(sender) => (None, sender),
        };
        debug!("Building pack for account {sender:?} (owner {owner:?})");

        let fee_estimator = match &self.fee_estimator {
            Some(fee_estimator) => fee_estimator.clone(),
            None => Arc::new(ProviderFeeEstimator::new(eth_client.clone())),
        };

        Ok(Arc::new(BundlerPack {
            config: self.config.clone(),
            owner,
            sender,
            module,
            entry_point: EntryPoint::new(eth_client.clone(), self.config.entry_point_address),
            eth_client,
            bundler: Self::http_client(&self.config.bundler_url)?,
            paymaster: Self::http_client(&self.config.paymaster_url)?,
            fee_estimator,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aa_wallet_primitives::constants::account_modules::SIMPLE_ACCOUNT_V0_7;

    #[test]
    fn deployed_account_has_no_factory() -> eyre::Result<()> {
        let fields = factory_fields(
            &"0x6080".parse()?,
            Address::repeat_byte(1),
            None,
            &SIMPLE_ACCOUNT_V0_7,
        )?;
        assert_eq!(fields, None);
        Ok(())
    }

    #[test]
    fn undeployed_account_is_created_by_its_owner() -> eyre::Result<()> {
        let owner = Address::repeat_byte(2);
        let (factory, data) =
            factory_fields(&Bytes::default(), Address::repeat_byte(1), Some(owner), &SIMPLE_ACCOUNT_V0_7)?
                .ok_or_else(|| eyre::eyre!("factory expected"))?;
        assert_eq!(factory, SIMPLE_ACCOUNT_V0_7.factory.parse::<Address>()?);
        assert_eq!(data, create_account_call_data(owner, U256::zero()));
        Ok(())
    }

    #[test]
    fn undeployed_account_without_owner_fails() {
        let err = factory_fields(
            &Bytes::default(),
            Address::repeat_byte(1),
            None,
            &SIMPLE_ACCOUNT_V0_7,
        )
        .unwrap_err();
        assert!(matches!(err, PackError::Undeployed { .. }));
    }
}
