//! Gas price estimation

use crate::PackError;
use aa_wallet_primitives::GasFees;
use async_trait::async_trait;
use ethers::providers::Middleware;
use std::sync::Arc;
use tracing::trace;

/// Provides the EIP-1559 gas prices a user operation is assembled with
#[async_trait]
pub trait FeeEstimator: Send + Sync + 'static {
    /// Current gas prices
    ///
    /// # Returns
    /// * `GasFees` - Max fee per gas and max priority fee per gas
    async fn estimate_fees(&self) -> Result<GasFees, PackError>;
}

/// Estimates gas prices with the execution client (`eth_feeHistory` based EIP-1559 estimation)
#[derive(Clone, Debug)]
pub struct ProviderFeeEstimator<M: Middleware + 'static> {
    eth_client: Arc<M>,
}

impl<M: Middleware + 'static> ProviderFeeEstimator<M> {
    pub fn new(eth_client: Arc<M>) -> Self {
        Self { eth_client }
    }
}

#[async_trait]
impl<M: Middleware + 'static> FeeEstimator for ProviderFeeEstimator<M> {
    async fn estimate_fees(&self) -> Result<GasFees, PackError> {
        let (max_fee_per_gas, max_priority_fee_per_gas) = self
            .eth_client
            .estimate_eip1559_fees(None)
            .await
            .map_err(|e| PackError::Provider { inner: e.to_string() })?;
        trace!("Estimated max fee {max_fee_per_gas} and max priority fee {max_priority_fee_per_gas}");
        Ok(GasFees { max_fee_per_gas, max_priority_fee_per_gas })
    }
}

/// Always returns the same gas prices
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedFeeEstimator(pub GasFees);

#[async_trait]
impl FeeEstimator for FixedFeeEstimator {
    async fn estimate_fees(&self) -> Result<GasFees, PackError> {
        Ok(self.0)
    }
}
