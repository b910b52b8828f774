//! Wallet configuration

use crate::{
    constants::account_modules::{self, AccountModule},
    utils::{as_checksum_addr, deserialize_u256_opt},
};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read configuration: {inner}")]
    Io {
        /// The inner error message
        inner: String,
    },

    /// Configuration could not be parsed
    #[error("failed to parse configuration: {inner}")]
    Parse {
        /// The inner error message
        inner: String,
    },

    /// Configuration is parsed but invalid
    #[error("invalid configuration: {inner}")]
    Invalid {
        /// The inner error message
        inner: String,
    },
}

/// ERC-20 token the smart account pays its gas with
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymasterToken {
    #[serde(serialize_with = "as_checksum_addr")]
    pub address: Address,
}

impl From<Address> for PaymasterToken {
    fn from(address: Address) -> Self {
        Self { address }
    }
}

/// Configuration shared by every account derived from one directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfig {
    /// Chain id of the network
    pub chain_id: u64,

    /// Ethereum execution client RPC endpoint (required for any state reading operation)
    #[serde(default)]
    pub provider: Option<String>,

    /// Bundler RPC endpoint
    pub bundler_url: String,

    /// Paymaster RPC endpoint
    pub paymaster_url: String,

    /// Paymaster contract address
    #[serde(serialize_with = "as_checksum_addr")]
    pub paymaster_address: Address,

    /// Entry point contract address
    #[serde(serialize_with = "as_checksum_addr")]
    pub entry_point_address: Address,

    /// Version tag of the smart account implementation
    #[serde(alias = "safeModulesVersion")]
    pub account_module_version: String,

    /// Token used to pay for gas
    pub paymaster_token: PaymasterToken,

    /// Maximum fee (in paymaster token base units) a transfer may cost
    #[serde(default, deserialize_with = "deserialize_u256_opt")]
    pub transfer_max_fee: Option<U256>,
}

impl WalletConfig {
    /// Loads and validates a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io { inner: format!("{:?}: {e}", path.as_ref()) })?;
        Self::from_json(&content)
    }

    /// Parses and validates a JSON configuration
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse { inner: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every required option is present and well formed
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |inner: &str| Err(ConfigError::Invalid { inner: inner.into() });

        if self.chain_id == 0 {
            return invalid("chainId must be non-zero");
        }
        if self.bundler_url.trim().is_empty() {
            return invalid("bundlerUrl is required");
        }
        if self.paymaster_url.trim().is_empty() {
            return invalid("paymasterUrl is required");
        }
        if self.paymaster_address.is_zero() {
            return invalid("paymasterAddress is required");
        }
        if self.entry_point_address.is_zero() {
            return invalid("entryPointAddress is required");
        }
        if self.paymaster_token.address.is_zero() {
            return invalid("paymasterToken.address is required");
        }
        if matches!(&self.provider, Some(provider) if provider.trim().is_empty()) {
            return invalid("provider must not be empty when set");
        }
        self.account_module()?;

        Ok(())
    }

    /// Smart account deployment selected by `account_module_version`
    pub fn account_module(&self) -> Result<&'static AccountModule, ConfigError> {
        account_modules::lookup(&self.account_module_version).ok_or_else(|| {
            ConfigError::Invalid {
                inner: format!(
                    "unsupported account module version {}",
                    self.account_module_version
                ),
            }
        })
    }

    /// Paymaster token for one operation (the override wins)
    pub fn paymaster_token_for(&self, overrides: Option<&TransactionConfig>) -> Address {
        overrides
            .and_then(|o| o.paymaster_token)
            .map(|token| token.address)
            .unwrap_or(self.paymaster_token.address)
    }

    /// Transfer fee ceiling for one operation (the override wins)
    pub fn transfer_max_fee_for(&self, overrides: Option<&TransactionConfig>) -> Option<U256> {
        overrides.and_then(|o| o.transfer_max_fee).or(self.transfer_max_fee)
    }
}

/// Per-operation configuration overrides
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionConfig {
    /// Token used to pay for this operation
    #[serde(default)]
    pub paymaster_token: Option<PaymasterToken>,

    /// Fee ceiling for this transfer
    #[serde(default, deserialize_with = "deserialize_u256_opt")]
    pub transfer_max_fee: Option<U256>,
}

impl TransactionConfig {
    pub fn with_paymaster_token(mut self, token: Address) -> Self {
        self.paymaster_token = Some(token.into());
        self
    }

    pub fn with_transfer_max_fee(mut self, max_fee: U256) -> Self {
        self.transfer_max_fee = Some(max_fee);
        self
    }
}
