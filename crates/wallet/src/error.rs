use aa_wallet_pack::PackError;
use aa_wallet_primitives::{ConfigError, KeyedAccountError};
use ethers::types::{Address, U256};
use thiserror::Error;

/// Wallet errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The operation needs an execution client and none is configured
    #[error("no execution client configured: the operation requires a provider")]
    NotConnected,

    /// Invalid configuration
    #[error("configuration error: {inner}")]
    Config {
        /// The inner error message
        inner: String,
    },

    /// Fee quoting detected that the account cannot cover the paymaster charge
    #[error(
        "simulation failed: not enough funds in the smart account to repay the paymaster ({inner})"
    )]
    SponsorSimulationFailed {
        /// The inner error message
        inner: String,
    },

    /// Sending detected that the account cannot cover the paymaster charge
    #[error("not enough funds to repay the sponsor ({inner})")]
    InsufficientSponsorFunds {
        /// The inner error message
        inner: String,
    },

    /// The quoted fee meets or exceeds the configured ceiling
    #[error("fee {fee} reaches the maximum transfer fee {max}")]
    FeeCeilingExceeded {
        /// Quoted fee
        fee: U256,
        /// Configured ceiling
        max: U256,
    },

    /// The token requires its allowance to be reset to zero before setting a new one
    #[error(
        "allowance of {spender:?} for token {token:?} is {current}, reset it to zero before approving a new amount"
    )]
    AllowanceResetRequired {
        /// Token
        token: Address,
        /// Spender
        spender: Address,
        /// Current allowance
        current: U256,
    },

    /// The key material of the account was scrubbed
    #[error("the account has been disposed")]
    Disposed,

    /// Signing failed
    #[error("signer error: {inner}")]
    Signer {
        /// The inner error message
        inner: String,
    },

    /// Failure reported by the account pack (bundler, paymaster, execution client)
    #[error(transparent)]
    Pack(#[from] PackError),

    /// Execution client read failed
    #[error("chain error: {inner}")]
    Chain {
        /// The inner error message
        inner: String,
    },

    /// Fee arithmetic overflowed
    #[error("arithmetic error: {inner}")]
    Arithmetic {
        /// The inner error message
        inner: String,
    },
}

impl WalletError {
    /// Classifies a pack failure raised while quoting
    pub fn at_quote(err: PackError) -> Self {
        if err.is_sponsor_insufficiency() {
            Self::SponsorSimulationFailed { inner: err.to_string() }
        } else {
            Self::Pack(err)
        }
    }

    /// Classifies a pack failure raised while assembling, signing or submitting the operation
    /// that is actually sent
    pub fn at_send(err: PackError) -> Self {
        if err.is_sponsor_insufficiency() {
            Self::InsufficientSponsorFunds { inner: err.to_string() }
        } else {
            Self::Pack(err)
        }
    }

    /// Short label used in metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotConnected => "not_connected",
            Self::Config { .. } => "config",
            Self::SponsorSimulationFailed { .. } => "sponsor_simulation_failed",
            Self::InsufficientSponsorFunds { .. } => "insufficient_sponsor_funds",
            Self::FeeCeilingExceeded { .. } => "fee_ceiling_exceeded",
            Self::AllowanceResetRequired { .. } => "allowance_reset_required",
            Self::Disposed => "disposed",
            Self::Signer { .. } => "signer",
            Self::Pack(_) => "pack",
            Self::Chain { .. } => "chain",
            Self::Arithmetic { .. } => "arithmetic",
        }
    }
}

impl From<ConfigError> for WalletError {
    fn from(err: ConfigError) -> Self {
        Self::Config { inner: err.to_string() }
    }
}

impl From<KeyedAccountError> for WalletError {
    fn from(err: KeyedAccountError) -> Self {
        match err {
            KeyedAccountError::Disposed => Self::Disposed,
            err => Self::Signer { inner: err.to_string() },
        }
    }
}
