use crate::{AssembleOptions, PackError, PackTarget, UserOperationReceipt};
use aa_wallet_primitives::{Call, KeyedAccount, UserOperation, UserOperationHash};
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::sync::Arc;

/// Capabilities of the engine that turns calls into submitted user operations for one smart
/// account
#[async_trait]
pub trait AccountPack: Send + Sync + 'static {
    /// Address of the smart account
    async fn sender_address(&self) -> Result<Address, PackError>;

    /// Builds a sponsored, unsigned user operation executing `calls` as one atomic batch
    ///
    /// # Arguments
    /// * `calls` - Calls executed by the smart account, in order
    /// * `options` - Paymaster token, allowance granted to the paymaster and validity deadline
    ///
    /// # Returns
    /// * `UserOperation` - The user operation with gas limits and paymaster fields set
    async fn assemble_operation(
        &self,
        calls: &[Call],
        options: AssembleOptions,
    ) -> Result<UserOperation, PackError>;

    /// Signs the user operation with the owner key
    async fn sign_operation(
        &self,
        uo: UserOperation,
        owner: &KeyedAccount,
    ) -> Result<UserOperation, PackError>;

    /// Submits the signed user operation to the bundler
    async fn submit_operation(&self, uo: UserOperation) -> Result<UserOperationHash, PackError>;

    /// Token base units per 10^18 wei of gas cost
    async fn token_exchange_rate(&self, token: Address) -> Result<U256, PackError>;

    /// Hash of the transaction that included the user operation, `None` while pending
    async fn resolve_transaction_hash(
        &self,
        uo_hash: UserOperationHash,
    ) -> Result<Option<H256>, PackError>;

    /// Receipt of the user operation, `None` while pending
    async fn user_operation_receipt(
        &self,
        uo_hash: UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, PackError>;
}

/// Builds account packs
#[async_trait]
pub trait PackBuilder: Send + Sync + 'static {
    async fn build(&self, target: PackTarget) -> Result<Arc<dyn AccountPack>, PackError>;
}
