//! Seed phrase backed directory of owned smart accounts

use crate::{pricing, ChainReader, EthersChain, OwnedSmartAccount, WalletError};
use aa_wallet_pack::{BundlerPackBuilder, PackBuilder};
use aa_wallet_primitives::{
    constants::derivation::DEFAULT_ACCOUNT_PREFIX, FeeRates, KeyedAccount, WalletConfig,
};
use ethers::providers::{Http, Provider};
use expanded_pathbuf::ExpandedPathBuf;
use parking_lot::{Mutex, RwLock};
use std::{collections::HashMap, fmt, fs, sync::Arc};
use tracing::{debug, info};

/// Deterministic, memoized mapping from derivation paths to owned smart accounts
pub struct AccountDirectory {
    phrase: RwLock<Option<String>>,
    config: Arc<WalletConfig>,
    chain: Option<Arc<dyn ChainReader>>,
    pack_builder: Arc<dyn PackBuilder>,
    accounts: Mutex<HashMap<String, Arc<OwnedSmartAccount>>>,
}

impl AccountDirectory {
    /// Creates a directory connected to the configured execution client, bundler and paymaster
    ///
    /// # Arguments
    /// * `phrase` - BIP-39 mnemonic phrase
    /// * `config` - Wallet configuration; without `provider` only key operations are available
    pub fn new(phrase: impl Into<String>, config: WalletConfig) -> Result<Self, WalletError> {
        config.validate()?;
        let config = Arc::new(config);

        let eth_client = match &config.provider {
            Some(url) => Some(EthersChain::connect(url)?.eth_client()),
            None => None,
        };
        let chain = eth_client
            .clone()
            .map(|eth_client| Arc::new(EthersChain::new(eth_client)) as Arc<dyn ChainReader>);
        let pack_builder =
            Arc::new(BundlerPackBuilder::<Provider<Http>>::new(config.clone(), eth_client));

        Ok(Self::with_components(phrase, config, chain, pack_builder))
    }

    /// Creates a directory from a file containing the mnemonic phrase
    pub fn from_mnemonic_file(
        path: ExpandedPathBuf,
        config: WalletConfig,
    ) -> Result<Self, WalletError> {
        let phrase = fs::read_to_string(&path).map_err(|e| WalletError::Config {
            inner: format!("failed to read mnemonic file {:?}: {e}", path.to_path_buf()),
        })?;
        Self::new(phrase.trim(), config)
    }

    /// Creates a directory with an injected chain reader and pack builder
    pub fn with_components(
        phrase: impl Into<String>,
        config: Arc<WalletConfig>,
        chain: Option<Arc<dyn ChainReader>>,
        pack_builder: Arc<dyn PackBuilder>,
    ) -> Self {
        Self {
            phrase: RwLock::new(Some(phrase.into())),
            config,
            chain,
            pack_builder,
            accounts: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.chain.is_some()
    }

    /// Account at `0'/0/{index}`
    pub fn get_account(&self, index: u32) -> Result<Arc<OwnedSmartAccount>, WalletError> {
        self.get_account_by_path(&format!("{DEFAULT_ACCOUNT_PREFIX}/{index}"))
    }

    /// Account at `m/44'/60'/{path}`; repeated calls with the same path return the same instance
    pub fn get_account_by_path(&self, path: &str) -> Result<Arc<OwnedSmartAccount>, WalletError> {
        if let Some(account) = self.accounts.lock().get(path) {
            return Ok(account.clone());
        }

        // seed derivation is slow, so it runs without holding the cache lock
        let phrase = self.phrase.read().clone().ok_or(WalletError::Disposed)?;
        let keyed = KeyedAccount::from_phrase(&phrase, path)?;
        debug!("Derived owner {:?} at path {path}", keyed.address());

        let account = Arc::new(OwnedSmartAccount::new(
            keyed,
            self.config.clone(),
            self.chain.clone(),
            self.pack_builder.clone(),
        ));

        let mut accounts = self.accounts.lock();
        // a directory disposed during derivation hands out no new accounts
        if self.phrase.read().is_none() {
            account.dispose();
            return Err(WalletError::Disposed);
        }
        // a concurrent derivation of the same path may have won
        Ok(accounts.entry(path.to_string()).or_insert(account).clone())
    }

    /// Normal and fast fee rates derived from the latest base fee
    pub async fn get_fee_rates(&self) -> Result<FeeRates, WalletError> {
        let chain = self.chain.as_ref().ok_or(WalletError::NotConnected)?;
        pricing::fee_rates(chain.base_fee().await?)
    }

    /// Scrubs the key material of every derived account and forgets the seed phrase
    pub fn dispose(&self) {
        let accounts = {
            let mut accounts = self.accounts.lock();
            self.phrase.write().take();
            std::mem::take(&mut *accounts)
        };
        for account in accounts.values() {
            account.dispose();
        }
        info!("Disposed account directory ({} account(s))", accounts.len());
    }
}

impl fmt::Debug for AccountDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountDirectory")
            .field("chain_id", &self.config.chain_id)
            .field("connected", &self.is_connected())
            .field("accounts", &self.accounts.lock().len())
            .finish()
    }
}
