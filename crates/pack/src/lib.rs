//! User operation assembly, sponsorship, signing and submission for one smart account

mod bundler;
mod error;
mod fee;
mod pack;
mod types;

pub use bundler::{factory_fields, BundlerPack, BundlerPackBuilder};
pub use error::PackError;
pub use fee::{FeeEstimator, FixedFeeEstimator, ProviderFeeEstimator};
pub use pack::{AccountPack, PackBuilder};
pub use types::{
    AssembleOptions, IncludedTransaction, PackTarget, SponsorContext, SponsorResult, TokenQuote,
    TokenQuoteRequest, TokenQuotes, UserOperationReceipt,
};
