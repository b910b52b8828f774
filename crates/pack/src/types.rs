//! Request and response types of the bundler and paymaster JSON-RPC APIs

use aa_wallet_primitives::{
    utils::{as_checksum_addr, as_checksum_addr_opt},
    UserOperation, UserOperationHash,
};
use ethers::types::{Address, Bytes, H256, U256, U64};
use serde::{Deserialize, Serialize};

/// Whose account a pack is built for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackTarget {
    /// The account owned by this key; the address is derived through the account factory and
    /// the account is deployed on first use
    Owner(Address),
    /// An existing account at a known address (read-only handles)
    Account(Address),
}

/// Parameters of one user operation assembly
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Token the paymaster is paid with
    pub paymaster_token: Address,
    /// Allowance granted to the paymaster by a call prepended to the batch (none if zero)
    pub amount_to_approve: U256,
    /// Unix timestamp after which the paymaster refuses the operation
    pub valid_until: Option<u64>,
}

/// Sponsorship context sent along with `pm_sponsorUserOperation`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorContext {
    #[serde(serialize_with = "as_checksum_addr")]
    pub token: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<u64>,
}

/// Gas limits and paymaster fields returned by the paymaster
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorResult {
    #[serde(serialize_with = "as_checksum_addr")]
    pub paymaster: Address,
    #[serde(default)]
    pub paymaster_data: Bytes,
    pub paymaster_verification_gas_limit: U256,
    pub paymaster_post_op_gas_limit: U256,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
}

impl SponsorResult {
    /// Applies the sponsorship to the user operation
    pub fn apply(self, uo: UserOperation) -> UserOperation {
        uo.call_gas_limit(self.call_gas_limit)
            .verification_gas_limit(self.verification_gas_limit)
            .pre_verification_gas(self.pre_verification_gas)
            .paymaster(
                self.paymaster,
                self.paymaster_verification_gas_limit,
                self.paymaster_post_op_gas_limit,
                self.paymaster_data,
            )
    }
}

/// Tokens to quote with `pimlico_getTokenQuotes`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenQuoteRequest {
    pub tokens: Vec<Address>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenQuotes {
    pub quotes: Vec<TokenQuote>,
}

/// Price of gas in one token
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenQuote {
    #[serde(serialize_with = "as_checksum_addr")]
    pub token: Address,
    #[serde(default, serialize_with = "as_checksum_addr_opt")]
    pub paymaster: Option<Address>,
    /// Token base units per 10^18 wei
    pub exchange_rate: U256,
    #[serde(default)]
    pub post_op_gas: U256,
}

/// Transaction that included a user operation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludedTransaction {
    pub transaction_hash: H256,
    #[serde(default)]
    pub block_number: Option<U64>,
}

/// Receipt of an included user operation (`eth_getUserOperationReceipt`)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    pub user_op_hash: UserOperationHash,
    #[serde(default, serialize_with = "as_checksum_addr")]
    pub sender: Address,
    #[serde(default)]
    pub nonce: U256,
    pub success: bool,
    pub actual_gas_cost: U256,
    pub actual_gas_used: U256,
    #[serde(default)]
    pub reason: String,
    pub receipt: IncludedTransaction,
}
