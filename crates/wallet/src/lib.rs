//! Account abstraction (ERC-4337) smart-account wallet
//!
//! Accounts are derived from one seed phrase, each owning an ERC-4337 smart account that pays
//! its gas in an ERC-20 token through a paymaster. Read-only handles ([SmartAccount]) query
//! balances and quote fees; owned handles ([OwnedSmartAccount]) additionally sign and send.

mod account;
pub mod chain;
mod directory;
mod error;
pub mod metrics;
mod owned;
pub mod pricing;
pub mod transfer;

pub use account::SmartAccount;
pub use chain::{ChainReader, EthersChain};
pub use directory::AccountDirectory;
pub use error::WalletError;
pub use owned::OwnedSmartAccount;
pub use transfer::{TokenApproval, TokenTransfer};

pub use aa_wallet_pack as pack;
pub use aa_wallet_primitives as primitives;
