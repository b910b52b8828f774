mod common;

use aa_wallet::{AccountDirectory, WalletError};
use aa_wallet_primitives::{FeeRates, WalletConfig};
use common::{setup, setup_with, wallet_config, MockChain, KEY_PHRASE};
use ethers::types::{Address, U256};
use expanded_pathbuf::ExpandedPathBuf;
use std::{io::Write, sync::Arc};

#[tokio::test]
async fn accounts_are_memoized_per_path() -> eyre::Result<()> {
    let ctx = setup();

    let a = ctx.directory.get_account(0)?;
    let b = ctx.directory.get_account_by_path("0'/0/0")?;
    let c = ctx.directory.get_account(1)?;

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(a.index(), Some(0));
    assert_eq!(c.index(), Some(1));
    assert_eq!(c.path(), "0'/0/1");
    Ok(())
}

#[test]
fn concurrent_lookups_share_one_account() -> eyre::Result<()> {
    let ctx = setup();
    let directory = &ctx.directory;

    let (a, b) = std::thread::scope(|s| {
        let a = s.spawn(|| directory.get_account(4));
        let b = s.spawn(|| directory.get_account_by_path("0'/0/4"));
        (a.join(), b.join())
    });
    let a = a.map_err(|_| eyre::eyre!("lookup panicked"))??;
    let b = b.map_err(|_| eyre::eyre!("lookup panicked"))??;

    assert!(Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a, &directory.get_account(4)?));
    Ok(())
}

#[tokio::test]
async fn derivation_is_deterministic_across_directories() -> eyre::Result<()> {
    let first = setup();
    let second = setup();

    let a = first.directory.get_account(7)?;
    let b = second.directory.get_account(7)?;
    assert_eq!(a.key_pair(), b.key_pair());
    assert!(a.key_pair().private_key.is_some());

    let signature = a.sign(b"same key")?;
    assert!(b.verify(b"same key", &signature));
    Ok(())
}

#[tokio::test]
async fn custom_paths_have_no_index() -> eyre::Result<()> {
    let ctx = setup();
    let account = ctx.directory.get_account_by_path("1'/0/0")?;
    assert_eq!(account.path(), "1'/0/0");
    assert_eq!(account.index(), None);
    assert_ne!(account.key_pair(), ctx.directory.get_account(0)?.key_pair());
    Ok(())
}

#[tokio::test]
async fn fee_rates_follow_base_fee() -> eyre::Result<()> {
    let ctx = setup();
    assert_eq!(
        ctx.directory.get_fee_rates().await?,
        FeeRates { normal: U256::from(1_100), fast: U256::from(2_000) }
    );
    Ok(())
}

#[tokio::test]
async fn fee_rates_round_up() -> eyre::Result<()> {
    let chain = MockChain { base_fee: U256::from(7), ..Default::default() };
    let ctx = setup_with(wallet_config(), chain, true);
    // 7 * 1.1 = 7.7
    assert_eq!(
        ctx.directory.get_fee_rates().await?,
        FeeRates { normal: U256::from(8), fast: U256::from(14) }
    );
    Ok(())
}

#[tokio::test]
async fn dispose_scrubs_every_account() -> eyre::Result<()> {
    let ctx = setup();
    let a = ctx.directory.get_account(0)?;
    let b = ctx.directory.get_account(1)?;

    ctx.directory.dispose();
    ctx.directory.dispose();

    assert!(a.is_disposed());
    assert!(b.is_disposed());
    assert_eq!(a.sign(b"after").unwrap_err(), WalletError::Disposed);
    assert_eq!(ctx.directory.get_account(0).unwrap_err(), WalletError::Disposed);
    assert_eq!(ctx.directory.get_account(2).unwrap_err(), WalletError::Disposed);
    Ok(())
}

#[tokio::test]
async fn directory_without_provider_only_signs() -> eyre::Result<()> {
    let config = WalletConfig { provider: None, ..wallet_config() };
    let directory = AccountDirectory::new(KEY_PHRASE, config)?;
    assert!(!directory.is_connected());

    let account = directory.get_account(0)?;
    let signature = account.sign(b"offline")?;
    assert!(account.verify(b"offline", &signature));

    let transfer = aa_wallet::TokenTransfer::new(Address::repeat_byte(1), Address::repeat_byte(2), 1.into());
    assert_eq!(account.quote_transfer(&transfer, None).await.unwrap_err(), WalletError::NotConnected);
    assert_eq!(account.get_balance().await.unwrap_err(), WalletError::NotConnected);
    assert_eq!(directory.get_fee_rates().await.unwrap_err(), WalletError::NotConnected);
    Ok(())
}

#[tokio::test]
async fn directory_from_mnemonic_file() -> eyre::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "{KEY_PHRASE}")?;

    let config = WalletConfig { provider: None, ..wallet_config() };
    let directory =
        AccountDirectory::from_mnemonic_file(ExpandedPathBuf::from(file.path().to_path_buf()), config)?;
    let expected = AccountDirectory::new(KEY_PHRASE, WalletConfig { provider: None, ..wallet_config() })?;

    assert_eq!(directory.get_account(0)?.key_pair(), expected.get_account(0)?.key_pair());
    Ok(())
}

#[tokio::test]
async fn invalid_config_is_rejected() {
    let config = WalletConfig { chain_id: 0, ..wallet_config() };
    assert!(matches!(
        AccountDirectory::new(KEY_PHRASE, config).unwrap_err(),
        WalletError::Config { .. }
    ));

    let err = AccountDirectory::from_mnemonic_file(
        ExpandedPathBuf::from(std::path::PathBuf::from("/nonexistent/mnemonic")),
        wallet_config(),
    )
    .unwrap_err();
    assert!(matches!(err, WalletError::Config { .. }));
}
