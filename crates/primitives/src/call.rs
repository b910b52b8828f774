//! A single call executed by the smart account

use crate::utils::as_checksum_addr;
use ethers::types::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// A call executed by the smart account. A list of calls is executed as one atomic batch.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Target address
    #[serde(serialize_with = "as_checksum_addr")]
    pub to: Address,
    /// Native value sent with the call
    #[serde(default)]
    pub value: U256,
    /// Calldata
    #[serde(default)]
    pub data: Bytes,
}

impl Call {
    pub fn new(to: Address, value: U256, data: Bytes) -> Self {
        Self { to, value, data }
    }

    /// Plain native asset transfer
    pub fn native_transfer(to: Address, value: U256) -> Self {
        Self { to, value, data: Bytes::default() }
    }
}
