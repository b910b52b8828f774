//! Account abstraction (ERC-4337) wallet primitive types
//!
//! This crate contains the value types shared by the pack and wallet crates: user operations,
//! calls, fees, configuration and seed-phrase derived keys.

pub mod call;
pub mod config;
pub mod constants;
pub mod fee;
mod user_operation;
pub mod utils;
mod wallet;

pub use call::Call;
pub use config::{ConfigError, PaymasterToken, TransactionConfig, WalletConfig};
pub use fee::{FeeRates, GasFees, Quote, SendResult};
pub use user_operation::{UserOperation, UserOperationHash};
pub use wallet::{KeyPair, KeyedAccount, KeyedAccountError};
