//! Account abstraction (ERC-4337) wallet constants

/// Entry point smart contract
pub mod entry_point {
    /// Address of the entry point smart contract
    pub const ADDRESS: &str = "0x0000000071727De22E5E9d8BAf0edAc6f37da032";
    /// Nonce key used for all user operations sent by the wallet
    pub const NONCE_KEY: u64 = 0;
}

/// Smart account deployments, selected by the configured account module version
pub mod account_modules {
    /// A smart account implementation deployed through a factory
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AccountModule {
        /// Version tag as it appears in the wallet configuration
        pub version: &'static str,
        /// Address of the account factory
        pub factory: &'static str,
        /// Fixed salt passed to the factory, so the same owner always maps to the same account
        pub salt: u64,
    }

    pub const SIMPLE_ACCOUNT_V0_7: AccountModule = AccountModule {
        version: "0.7.0",
        factory: "0x91E60e0613810449d098b0b5Ec8b51A0FE8c8985",
        salt: 0,
    };

    pub const SUPPORTED: [AccountModule; 1] = [SIMPLE_ACCOUNT_V0_7];

    /// Looks up a supported account module by its version tag
    pub fn lookup(version: &str) -> Option<&'static AccountModule> {
        SUPPORTED.iter().find(|module| module.version == version)
    }
}

/// BIP-44 derivation
pub mod derivation {
    /// Purpose and coin type prefix (Ethereum)
    pub const BIP44_PREFIX: &str = "m/44'/60'";
    /// Account and change tiers used by index based lookups
    pub const DEFAULT_ACCOUNT_PREFIX: &str = "0'/0";
}

/// Fee quoting and fee rates
pub mod fees {
    /// Paymaster approval is sized at this percentage of the quoted fee
    pub const APPROVAL_TOLERANCE_PERCENT: u64 = 120;
    /// Denominator for every percentage in this module
    pub const PERCENT_DENOMINATOR: u64 = 100;
    /// Normal fee rate, as a percentage of the current base fee
    pub const FEE_RATE_NORMAL_PERCENT: u64 = 110;
    /// Fast fee rate, as a percentage of the current base fee
    pub const FEE_RATE_FAST_PERCENT: u64 = 200;
    /// Exchange rates returned by the paymaster are 18-decimal fixed point
    pub const EXCHANGE_RATE_DECIMALS: usize = 18;
    /// Validity window of a submitted user operation (in seconds)
    pub const VALIDITY_WINDOW_SECS: u64 = 120;
}

/// Sponsor (paymaster) failure classification
pub mod sponsor {
    /// Markers that identify a smart account unable to cover the paymaster charge
    ///
    /// AA33 - paymaster validation reverted (token pull failed)
    /// AA50 - paymaster post-op reverted (token settlement failed)
    pub const INSUFFICIENCY_MARKERS: [&str; 2] = ["AA33", "AA50"];
}

/// Well-known tokens
pub mod tokens {
    use alloy_chains::NamedChain;

    /// Tether USD on Ethereum mainnet
    pub const USDT_MAINNET: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    /// (chain id, token) pairs whose allowance must be reset to zero before it can be changed
    pub const ALLOWANCE_RESET_REQUIRED: [(u64, &str); 1] =
        [(NamedChain::Mainnet as u64, USDT_MAINNET)];
}

/// User operation placeholders
pub mod user_operation {
    /// Placeholder ECDSA signature used while the operation is being estimated
    pub const DUMMY_SIGNATURE: &str = "0xffffffffffffffffffffffffffffffff000000000000000000000000000000007aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1c";
}

/// Paymaster / bundler JSON-RPC error codes (ERC-7769)
pub mod rpc_error_codes {
    /// Validation of the user operation (including paymaster validation) failed
    pub const VALIDATION: i32 = -32500;
}
