use super::args::{TokenAmountArgs, TransactionArgs, WalletArgs};
use crate::utils::{parse_address, parse_call, print_json};
use aa_wallet::{TokenApproval, TokenTransfer};
use aa_wallet_primitives::{Call, UserOperationHash};
use clap::Parser;
use ethers::{
    types::{Address, H256},
    utils::to_checksum,
};
use serde_json::json;
use std::str::FromStr;
use tracing::info;

/// Print the smart account address of the selected key
#[derive(Debug, Parser)]
pub struct AddressCommand {}

impl AddressCommand {
    /// Execute the command
    pub async fn execute(self, wallet: WalletArgs) -> eyre::Result<()> {
        let directory = wallet.directory()?;
        let account = wallet.account(&directory)?;
        print_json(&json!({
            "path": account.path(),
            "publicKey": account.key_pair().public_key,
            "address": to_checksum(&account.address().await?, None),
        }))
    }
}

/// Print the native or token balance of the smart account
#[derive(Debug, Parser)]
pub struct BalanceCommand {
    /// Token to query instead of the native balance.
    #[clap(long, value_parser=parse_address)]
    token: Option<Address>,

    /// Query the configured paymaster token.
    #[clap(long, conflicts_with = "token")]
    paymaster_token: bool,
}

impl BalanceCommand {
    /// Execute the command
    pub async fn execute(self, wallet: WalletArgs) -> eyre::Result<()> {
        let directory = wallet.directory()?;
        let account = wallet.account(&directory)?;
        let balance = match (self.token, self.paymaster_token) {
            (Some(token), _) => account.get_token_balance(token).await?,
            (None, true) => account.get_paymaster_token_balance().await?,
            (None, false) => account.get_balance().await?,
        };
        print_json(&json!({
            "address": to_checksum(&account.address().await?, None),
            "balance": balance,
        }))
    }
}

/// Quote or send a batch of calls
#[derive(Debug, Parser)]
pub struct SendCommand {
    /// Calls executed as one batch, each given as `to[,value[,data]]`.
    #[clap(long = "call", required = true, value_parser=parse_call)]
    calls: Vec<Call>,

    #[clap(flatten)]
    overrides: TransactionArgs,
}

impl SendCommand {
    /// Execute the command, only quoting when `quote` is set
    pub async fn execute(self, wallet: WalletArgs, quote: bool) -> eyre::Result<()> {
        let directory = wallet.directory()?;
        let account = wallet.account(&directory)?;
        let overrides = self.overrides.to_config();

        if quote {
            let quote = account.quote_send_transaction(&self.calls, overrides.as_ref()).await?;
            return print_json(&quote);
        }

        info!("Sending {} call(s) from {:?}", self.calls.len(), account.address().await?);
        let res = account.send_transaction(&self.calls, overrides.as_ref()).await?;
        directory.dispose();
        print_json(&res)
    }
}

/// Quote or send a token transfer
#[derive(Debug, Parser)]
pub struct TransferCommand {
    #[clap(flatten)]
    transfer: TokenAmountArgs,

    #[clap(flatten)]
    overrides: TransactionArgs,
}

impl TransferCommand {
    /// Execute the command, only quoting when `quote` is set
    pub async fn execute(self, wallet: WalletArgs, quote: bool) -> eyre::Result<()> {
        let directory = wallet.directory()?;
        let account = wallet.account(&directory)?;
        let overrides = self.overrides.to_config();
        let transfer =
            TokenTransfer::new(self.transfer.token, self.transfer.to, self.transfer.amount);

        if quote {
            let quote = account.quote_transfer(&transfer, overrides.as_ref()).await?;
            return print_json(&quote);
        }

        info!(
            "Transferring {} of {:?} to {:?}",
            transfer.amount, transfer.token, transfer.recipient
        );
        let res = account.transfer(&transfer, overrides.as_ref()).await?;
        directory.dispose();
        print_json(&res)
    }
}

/// Approve a spender
#[derive(Debug, Parser)]
pub struct ApproveCommand {
    #[clap(flatten)]
    approval: TokenAmountArgs,
}

impl ApproveCommand {
    /// Execute the command
    pub async fn execute(self, wallet: WalletArgs) -> eyre::Result<()> {
        let directory = wallet.directory()?;
        let account = wallet.account(&directory)?;
        let approval =
            TokenApproval::new(self.approval.token, self.approval.to, self.approval.amount);

        info!("Approving {} of {:?} for {:?}", approval.amount, approval.token, approval.spender);
        let res = account.approve(&approval).await?;
        directory.dispose();
        print_json(&res)
    }
}

/// Print the current normal and fast fee rates
#[derive(Debug, Parser)]
pub struct FeeRatesCommand {}

impl FeeRatesCommand {
    /// Execute the command
    pub async fn execute(self, wallet: WalletArgs) -> eyre::Result<()> {
        let directory = wallet.directory()?;
        print_json(&directory.get_fee_rates().await?)
    }
}

/// Look up a user operation (or transaction) receipt
#[derive(Debug, Parser)]
pub struct ReceiptCommand {
    /// User operation hash.
    hash: String,

    /// Treat the hash as a transaction hash.
    #[clap(long)]
    transaction: bool,
}

impl ReceiptCommand {
    /// Execute the command
    pub async fn execute(self, wallet: WalletArgs) -> eyre::Result<()> {
        let directory = wallet.directory()?;
        let account = wallet.account(&directory)?;
        let hash = H256::from_str(&self.hash)
            .map_err(|_| eyre::eyre!("String {} is not a valid hash", self.hash))?;

        if self.transaction {
            return print_json(&account.get_transaction_receipt(hash).await?);
        }
        print_json(&account.get_user_operation_receipt(UserOperationHash(hash)).await?)
    }
}
