use crate::gen::entry_point_api::EntryPointAPIErrors;
use ethers::{
    abi::AbiDecode,
    prelude::ContractError,
    providers::{JsonRpcError, Middleware, MiddlewareError, ProviderError},
    types::Bytes,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;
use thiserror::Error;

lazy_static! {
    static ref HEX_DATA: Regex = Regex::new(r"0x[0-9a-fA-F]+").expect("Regex rules valid");
}

/// Contract interaction errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractCallError {
    /// The call reverted with a (decoded) reason
    #[error("execution reverted: {reason}")]
    Reverted {
        /// Decoded revert reason (`FailedOp` reasons start with an `AAxx` code)
        reason: String,
    },

    /// Provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// ABI error
    #[error("abi error: {inner}")]
    ABI {
        /// The inner error message
        inner: String,
    },

    /// Data decoding error
    #[error("decode error: {inner}")]
    Decode {
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

impl ContractCallError {
    pub fn from_contract_error<M: Middleware>(err: ContractError<M>) -> Self {
        match err {
            ContractError::DecodingError(e) => Self::Decode { inner: e.to_string() },
            ContractError::AbiError(e) => Self::ABI { inner: e.to_string() },
            ContractError::MiddlewareError { e } => Self::from_middleware_error::<M>(e),
            ContractError::ProviderError { e } => Self::from_provider_error(&e),
            ContractError::Revert(data) => Self::from_revert_data(data),
            _ => Self::Other { inner: err.to_string() },
        }
    }

    pub fn from_middleware_error<M: Middleware>(err: M::Error) -> Self {
        if let Some(err) = err.as_error_response() {
            return Self::from_json_rpc_error(err);
        }

        if let Some(err) = err.as_provider_error() {
            return Self::from_provider_error(err);
        }

        Self::Provider { inner: format!("middleware error: {err:?}") }
    }

    pub fn from_provider_error(err: &ProviderError) -> Self {
        match err {
            ProviderError::JsonRpcClientError(err) => err
                .as_error_response()
                .map(Self::from_json_rpc_error)
                .unwrap_or(Self::Provider { inner: format!("json-rpc client error: {err:?}") }),
            ProviderError::HTTPError(err) => Self::Provider { inner: format!("HTTP error: {err:?}") },
            _ => Self::Provider { inner: format!("provider error: {err:?}") },
        }
    }

    /// Extracts the revert data out of a JSON-RPC error, falling back to its message
    pub fn from_json_rpc_error(err: &JsonRpcError) -> Self {
        if let Some(serde_json::Value::String(data)) = &err.data {
            if let Some(bytes) =
                HEX_DATA.find(data).and_then(|hex| Bytes::from_str(hex.as_str()).ok())
            {
                return Self::from_revert_data(bytes);
            }
        }

        Self::Provider { inner: err.message.clone() }
    }

    pub fn from_revert_data(data: Bytes) -> Self {
        match decode_revert_reason(data.clone()) {
            Some(reason) => Self::Reverted { reason },
            None => Self::Decode { inner: format!("unknown revert data {data}") },
        }
    }
}

/// Decodes a solidity `Error(string)` revert
pub fn decode_revert_string(data: Bytes) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let (error_sig, reason) = data.split_at(4);
    if error_sig == [0x08, 0xc3, 0x79, 0xa0] {
        <String as AbiDecode>::decode(reason).ok()
    } else {
        None
    }
}

/// Decodes entry point errors (`FailedOp`, `FailedOpWithRevert`) and plain revert strings
pub fn decode_revert_reason(data: Bytes) -> Option<String> {
    match EntryPointAPIErrors::decode(data.as_ref()) {
        Ok(EntryPointAPIErrors::FailedOp(op)) => Some(op.reason),
        Ok(EntryPointAPIErrors::FailedOpWithRevert(op)) => Some(op.reason),
        Ok(EntryPointAPIErrors::RevertString(reason)) => Some(reason),
        _ => decode_revert_string(data),
    }
}
