use crate::utils::run_until_ctrl_c;
use clap::{value_parser, Parser, Subcommand};

pub mod args;
pub mod commands;

/// The main wallet CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "Account abstraction (ERC-4337) wallet", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// Wallet args shared by every command
    #[clap(flatten)]
    wallet: args::WalletArgs,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 1, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the smart account address
    #[command(name = "address")]
    Address(commands::AddressCommand),

    /// Print the native or token balance of the smart account
    #[command(name = "balance")]
    Balance(commands::BalanceCommand),

    /// Quote the fee of a batch of calls
    #[command(name = "quote-send")]
    QuoteSend(commands::SendCommand),

    /// Send a batch of calls
    #[command(name = "send")]
    Send(commands::SendCommand),

    /// Quote the fee of a token transfer
    #[command(name = "quote-transfer")]
    QuoteTransfer(commands::TransferCommand),

    /// Transfer tokens
    #[command(name = "transfer")]
    Transfer(commands::TransferCommand),

    /// Approve a spender
    #[command(name = "approve")]
    Approve(commands::ApproveCommand),

    /// Print the current fee rates
    #[command(name = "fee-rates")]
    FeeRates(commands::FeeRatesCommand),

    /// Look up a receipt
    #[command(name = "receipt")]
    Receipt(commands::ReceiptCommand),
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    let rust_log = match std::env::var("RUST_LOG") {
        Ok(val) => format!("{val},aa_wallet={}", cli.get_log_level()),
        Err(_) => format!("aa_wallet={}", cli.get_log_level()),
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(rust_log))
        .with_writer(std::io::stderr)
        .init();
    aa_wallet::metrics::describe_wallet_metrics();

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    let wallet = cli.wallet;
    let task = async move {
        match cli.command {
            Commands::Address(command) => command.execute(wallet).await,
            Commands::Balance(command) => command.execute(wallet).await,
            Commands::QuoteSend(command) => command.execute(wallet, true).await,
            Commands::Send(command) => command.execute(wallet, false).await,
            Commands::QuoteTransfer(command) => command.execute(wallet, true).await,
            Commands::Transfer(command) => command.execute(wallet, false).await,
            Commands::Approve(command) => command.execute(wallet).await,
            Commands::FeeRates(command) => command.execute(wallet).await,
            Commands::Receipt(command) => command.execute(wallet).await,
        }
    };

    rt.block_on(run_until_ctrl_c(task))
}
