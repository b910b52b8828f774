use crate::utils::{parse_address, parse_u256, unwrap_path_or_home};
use aa_wallet::{AccountDirectory, OwnedSmartAccount};
use aa_wallet_primitives::{TransactionConfig, WalletConfig};
use clap::Parser;
use ethers::types::{Address, U256};
use expanded_pathbuf::ExpandedPathBuf;
use std::sync::Arc;
use tracing::info;

/// Default file names under `~/.aa-wallet`
const CONFIG_FILE: &str = "config.json";
const MNEMONIC_FILE: &str = "mnemonic";

/// Wallet CLI args shared by every command
#[derive(Debug, Clone, Parser)]
pub struct WalletArgs {
    /// Path to the JSON wallet configuration.
    ///
    /// By default, `~/.aa-wallet/config.json` is used.
    #[clap(long, global = true)]
    pub config: Option<ExpandedPathBuf>,

    /// Path to the mnemonic file.
    ///
    /// By default, `~/.aa-wallet/mnemonic` is used.
    #[clap(long, global = true)]
    pub mnemonic_file: Option<ExpandedPathBuf>,

    /// Execution client RPC endpoint, overriding the one of the configuration.
    #[clap(long, global = true)]
    pub provider: Option<String>,

    /// Address index of the account (`m/44'/60'/0'/0/{index}`).
    #[clap(long, global = true, default_value_t = 0)]
    pub index: u32,

    /// Derivation path relative to `m/44'/60'` (e.g. `1'/0/3`). Takes precedence over `--index`.
    #[clap(long, global = true)]
    pub path: Option<String>,
}

impl WalletArgs {
    /// Loads the configuration and applies the command line overrides
    pub fn load_config(&self) -> eyre::Result<WalletConfig> {
        let path = unwrap_path_or_home(self.config.clone(), CONFIG_FILE)?;
        let mut config = WalletConfig::from_file(&path)?;
        if let Some(provider) = &self.provider {
            config.provider = Some(provider.clone());
        }
        Ok(config)
    }

    pub fn directory(&self) -> eyre::Result<AccountDirectory> {
        let config = self.load_config()?;
        let mnemonic = unwrap_path_or_home(self.mnemonic_file.clone(), MNEMONIC_FILE)?;
        info!("Opening wallet for chain {} with mnemonic {:?}", config.chain_id, mnemonic);
        Ok(AccountDirectory::from_mnemonic_file(mnemonic, config)?)
    }

    /// The selected account of `directory`
    pub fn account(&self, directory: &AccountDirectory) -> eyre::Result<Arc<OwnedSmartAccount>> {
        Ok(match &self.path {
            Some(path) => directory.get_account_by_path(path)?,
            None => directory.get_account(self.index)?,
        })
    }
}

/// Per-operation overrides
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct TransactionArgs {
    /// Token used to pay for this operation, instead of the configured paymaster token.
    #[clap(long, value_parser=parse_address)]
    pub paymaster_token: Option<Address>,

    /// Maximum fee of this transfer (in paymaster token base units).
    #[clap(long, value_parser=parse_u256)]
    pub max_fee: Option<U256>,
}

impl TransactionArgs {
    pub fn to_config(&self) -> Option<TransactionConfig> {
        if self.paymaster_token.is_none() && self.max_fee.is_none() {
            return None;
        }
        let mut config = TransactionConfig::default();
        if let Some(token) = self.paymaster_token {
            config = config.with_paymaster_token(token);
        }
        if let Some(max_fee) = self.max_fee {
            config = config.with_transfer_max_fee(max_fee);
        }
        Some(config)
    }
}

/// Token amount args
#[derive(Debug, Clone, Parser, PartialEq)]
pub struct TokenAmountArgs {
    /// The token address.
    #[clap(long, value_parser=parse_address)]
    pub token: Address,

    /// Recipient (transfers) or spender (approvals).
    #[clap(long, value_parser=parse_address)]
    pub to: Address,

    /// The amount in token base units.
    #[clap(long, value_parser=parse_u256)]
    pub amount: U256,
}
