use aa_wallet_contracts::ContractCallError;
use aa_wallet_primitives::{constants::sponsor::INSUFFICIENCY_MARKERS, KeyedAccountError};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// Standalone `AAxx` codes only, never hex digits inside an address or revert data
    static ref INSUFFICIENCY_MARKER: Regex =
        Regex::new(&format!(r"(?i)\b({})\b", INSUFFICIENCY_MARKERS.join("|")))
            .expect("Regex rules valid");
}

/// Errors raised while assembling, signing or submitting user operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackError {
    /// Bundler RPC failed or rejected the user operation
    #[error("bundler error: {inner}")]
    Bundler {
        /// The inner error message
        inner: String,
    },

    /// Paymaster RPC failed or refused to sponsor the user operation
    #[error("paymaster error: {inner}")]
    Paymaster {
        /// The inner error message
        inner: String,
    },

    /// Execution client error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// Smart contract call error
    #[error("contract error: {inner}")]
    Contract {
        /// The inner error message
        inner: String,
    },

    /// The owner key could not sign the user operation
    #[error("signer error: {inner}")]
    Signer {
        /// The inner error message
        inner: String,
    },

    /// The account has no code and the pack does not know its owner
    #[error("account {inner} is not deployed")]
    Undeployed {
        /// The inner error message
        inner: String,
    },

    /// Any other error
    #[error("other error: {inner}")]
    Other {
        /// The inner error message
        inner: String,
    },
}

impl PackError {
    /// Whether the failure reports a smart account unable to cover the paymaster charge
    pub fn is_sponsor_insufficiency(&self) -> bool {
        INSUFFICIENCY_MARKER.is_match(&self.to_string())
    }
}

impl From<ContractCallError> for PackError {
    fn from(err: ContractCallError) -> Self {
        match err {
            ContractCallError::Provider { inner } => Self::Provider { inner },
            err => Self::Contract { inner: err.to_string() },
        }
    }
}

impl From<KeyedAccountError> for PackError {
    fn from(err: KeyedAccountError) -> Self {
        Self::Signer { inner: err.to_string() }
    }
}
