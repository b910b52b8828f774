use aa_wallet_primitives::Call;
use dirs::home_dir;
use ethers::types::{Address, Bytes, U256};
use expanded_pathbuf::ExpandedPathBuf;
use pin_utils::pin_mut;
use serde::Serialize;
use std::{future::Future, str::FromStr};
use tracing::info;

/// Unwrap path or returns `~/.aa-wallet/{file}`
pub fn unwrap_path_or_home(
    path: Option<ExpandedPathBuf>,
    file: &str,
) -> eyre::Result<ExpandedPathBuf> {
    if let Some(path) = path {
        Ok(path)
    } else {
        home_dir()
            .map(|h| h.join(".aa-wallet").join(file))
            .ok_or_else(|| eyre::eyre!("Get Home directory error"))
            .map(ExpandedPathBuf)
    }
}

/// Parses address from string
pub fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s).map_err(|_| format!("String {s} is not a valid address"))
}

/// Parses U256 from string
pub fn parse_u256(s: &str) -> Result<U256, String> {
    U256::from_str_radix(s, 10).map_err(|_| format!("String {s} is not a valid U256"))
}

/// Parses a call given as `to[,value[,data]]`
pub fn parse_call(s: &str) -> Result<Call, String> {
    let mut split = s.split(',');
    let to = split
        .next()
        .filter(|to| !to.is_empty())
        .ok_or_else(|| format!("Call {s} is not a valid to,value,data"))
        .and_then(parse_address)?;
    let value = split.next().map(parse_u256).transpose()?.unwrap_or_default();
    let data = split
        .next()
        .map(|data| Bytes::from_str(data).map_err(|_| format!("Data {data} is not valid hex")))
        .transpose()?
        .unwrap_or_default();
    if split.next().is_some() {
        return Err(format!("Call {s} is not a valid to,value,data"));
    }
    Ok(Call::new(to, value, data))
}

/// Prints a command result as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Runs the future to completion or until:
/// - `ctrl-c` is received.
/// - `SIGTERM` is received (unix only).
pub async fn run_until_ctrl_c<F, E>(fut: F) -> Result<(), E>
where
    F: Future<Output = Result<(), E>>,
    E: Send + Sync + 'static + From<std::io::Error>,
{
    let ctrl_c = tokio::signal::ctrl_c();

    let mut stream = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let sigterm = stream.recv();
    pin_mut!(sigterm, ctrl_c, fut);

    tokio::select! {
        _ = ctrl_c => {
            info!("Received ctrl-c signal.");
        },
        _ = sigterm => {
            info!("Received SIGTERM signal.");
        },
        res = fut => res?,
    }

    Ok(())
}
