//! Smart account owned by a seed-derived key

use crate::{
    metrics, pricing,
    transfer::{requires_allowance_reset, TokenApproval, TokenTransfer},
    ChainReader, SmartAccount, WalletError,
};
use aa_wallet_pack::{AssembleOptions, PackBuilder};
use aa_wallet_primitives::{
    constants::{derivation::DEFAULT_ACCOUNT_PREFIX, fees::VALIDITY_WINDOW_SECS},
    Call, KeyPair, KeyedAccount, Quote, SendResult, TransactionConfig, WalletConfig,
};
use ethers::types::{Signature, U256};
use std::{
    ops::Deref,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, info, warn};

/// Smart account together with the key that owns it
///
/// Dereferences to the [SmartAccount] of the owner, so every read-only operation is available
/// as well.
#[derive(Debug)]
pub struct OwnedSmartAccount {
    account: SmartAccount,
    keyed: KeyedAccount,
}

impl OwnedSmartAccount {
    pub fn new(
        keyed: KeyedAccount,
        config: Arc<WalletConfig>,
        chain: Option<Arc<dyn ChainReader>>,
        pack_builder: Arc<dyn PackBuilder>,
    ) -> Self {
        let account = SmartAccount::new(config, keyed.address(), chain, pack_builder);
        Self { account, keyed }
    }

    /// Derivation path relative to `m/44'/60'`
    pub fn path(&self) -> &str {
        self.keyed.path()
    }

    /// Address index, if the account was derived with the default account and change tiers
    pub fn index(&self) -> Option<u32> {
        self.path()
            .strip_prefix(DEFAULT_ACCOUNT_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|index| index.parse().ok())
    }

    pub fn key_pair(&self) -> KeyPair {
        self.keyed.key_pair()
    }

    /// Signs an arbitrary message with the owner key (EIP-191)
    pub fn sign(&self, message: &[u8]) -> Result<Signature, WalletError> {
        Ok(self.keyed.sign_message(message)?)
    }

    /// Whether `signature` over `message` was made by the owner key
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        self.keyed.verify(message, signature)
    }

    /// Executes `calls` as one atomic batch, paying gas in the paymaster token
    ///
    /// Concurrent sends on the same account are not serialized; callers that need strict nonce
    /// ordering must wait for one send to return before starting the next.
    pub async fn send_transaction(
        &self,
        calls: &[Call],
        overrides: Option<&TransactionConfig>,
    ) -> Result<SendResult, WalletError> {
        self.send_calls(calls, overrides, None).await
    }

    /// Transfers tokens, enforcing the configured fee ceiling
    ///
    /// The same caller obligation as for [send_transaction](Self::send_transaction) applies.
    pub async fn transfer(
        &self,
        transfer: &TokenTransfer,
        overrides: Option<&TransactionConfig>,
    ) -> Result<SendResult, WalletError> {
        let max_fee = self.config().transfer_max_fee_for(overrides);
        self.send_calls(&[transfer.to_call()], overrides, max_fee).await
    }

    /// Approves `spender` to spend tokens of the smart account
    pub async fn approve(&self, approval: &TokenApproval) -> Result<SendResult, WalletError> {
        if !approval.amount.is_zero() &&
            requires_allowance_reset(self.config().chain_id, approval.token)
        {
            let current = self.get_allowance(approval.token, approval.spender).await?;
            if !current.is_zero() {
                return Err(WalletError::AllowanceResetRequired {
                    token: approval.token,
                    spender: approval.spender,
                    current,
                });
            }
        }
        self.send_transaction(&[approval.to_call()], None).await
    }

    /// Read-only handle of the same smart account, sharing the already built pack
    pub async fn to_read_only_account(&self) -> Result<SmartAccount, WalletError> {
        let address = self.account.address().await?;
        let pack = self.account.pack().await?.clone();
        Ok(self.account.with_pack(address, pack))
    }

    /// Scrubs the owner key. Safe to call repeatedly; signing afterwards fails with
    /// [WalletError::Disposed].
    pub fn dispose(&self) {
        self.keyed.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.keyed.is_disposed()
    }

    async fn send_calls(
        &self,
        calls: &[Call],
        overrides: Option<&TransactionConfig>,
        max_fee: Option<U256>,
    ) -> Result<SendResult, WalletError> {
        let res = self.quote_and_submit(calls, overrides, max_fee).await;
        match &res {
            Ok(SendResult { hash, fee }) => {
                info!("User operation {hash} sent with fee {fee}");
                metrics::record_sent();
            }
            Err(err) => {
                warn!("Sending {} call(s) failed: {err}", calls.len());
                metrics::record_send_failure(err.kind());
            }
        }
        res
    }

    async fn quote_and_submit(
        &self,
        calls: &[Call],
        overrides: Option<&TransactionConfig>,
        max_fee: Option<U256>,
    ) -> Result<SendResult, WalletError> {
        if self.keyed.is_disposed() {
            return Err(WalletError::Disposed);
        }
        let paymaster_token = self.config().paymaster_token_for(overrides);

        let Quote { fee } = self.account.quote_calls(calls, paymaster_token).await?;
        if let Some(max) = max_fee {
            if fee >= max {
                return Err(WalletError::FeeCeilingExceeded { fee, max });
            }
        }

        let options = AssembleOptions {
            paymaster_token,
            amount_to_approve: pricing::approval_amount(fee)?,
            valid_until: Some(valid_until()?),
        };
        debug!("Assembling user operation with {options:?}");

        let pack = self.account.pack().await?;
        let uo = pack.assemble_operation(calls, options).await.map_err(WalletError::at_send)?;
        let uo = pack.sign_operation(uo, &self.keyed).await.map_err(|err| {
            if self.keyed.is_disposed() {
                WalletError::Disposed
            } else {
                WalletError::at_send(err)
            }
        })?;
        let hash = pack.submit_operation(uo).await.map_err(WalletError::at_send)?;

        Ok(SendResult { hash, fee })
    }
}

impl Deref for OwnedSmartAccount {
    type Target = SmartAccount;

    fn deref(&self) -> &Self::Target {
        &self.account
    }
}

/// End of the validity window of an operation sent now
fn valid_until() -> Result<u64, WalletError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| WalletError::Arithmetic { inner: e.to_string() })?;
    Ok(now.as_secs() + VALIDITY_WINDOW_SECS)
}
