//! Smart contract interfaces used by the wallet: entry point v0.7, simple account and its
//! factory, ERC-20

pub mod account;
pub mod entry_point;
pub mod erc20;
mod error;
mod gen;
pub mod utils;

pub use account::{SimpleAccountFactory, SimpleAccountFactoryAPI};
pub use entry_point::EntryPoint;
pub use erc20::{ERC20API, ERC20};
pub use error::{decode_revert_reason, decode_revert_string, ContractCallError};
