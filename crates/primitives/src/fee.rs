//! Fee related value types

use crate::UserOperationHash;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// EIP-1559 gas prices used when assembling a user operation
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasFees {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

/// Fee rates derived from the current base fee
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRates {
    pub normal: U256,
    pub fast: U256,
}

/// Fee of an operation, in paymaster token base units. Quoting never changes chain state.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub fee: U256,
}

/// Result of a submitted user operation
///
/// `fee` is the quote computed right before submission, not a measurement of what was charged.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    pub hash: UserOperationHash,
    pub fee: U256,
}
