#![allow(dead_code)]

use aa_wallet::{AccountDirectory, ChainReader, WalletError};
use aa_wallet_pack::{
    AccountPack, AssembleOptions, IncludedTransaction, PackBuilder, PackError, PackTarget,
    UserOperationReceipt,
};
use aa_wallet_primitives::{
    Call, KeyedAccount, PaymasterToken, UserOperation, UserOperationHash, WalletConfig,
};
use async_trait::async_trait;
use ethers::types::{Address, TransactionReceipt, H256, U256};
use parking_lot::Mutex;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

pub const KEY_PHRASE: &str = "test test test test test test test test test test test junk";
pub const PAYMASTER: &str = "0x0000000000000039cd5e8aE05257CE51C473ddd1";
pub const TOKEN: &str = "0xd077a400968890eacc75cdc901f0356c943e4fdb";
pub const SMART_ACCOUNT: &str = "0x9c5754De1443984659E1b3a8d1931D83475ba29C";

pub fn wallet_config() -> WalletConfig {
    WalletConfig {
        chain_id: 11155111,
        provider: Some("http://127.0.0.1:8545".into()),
        bundler_url: "http://127.0.0.1:3000".into(),
        paymaster_url: "http://127.0.0.1:3001".into(),
        paymaster_address: PAYMASTER.parse().unwrap(),
        entry_point_address: aa_wallet_primitives::constants::entry_point::ADDRESS
            .parse()
            .unwrap(),
        account_module_version: "0.7.0".into(),
        paymaster_token: PaymasterToken::from(TOKEN.parse::<Address>().unwrap()),
        transfer_max_fee: None,
    }
}

/// When the mock paymaster refuses to sponsor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePhase {
    /// Assemblies with the maximum approval (quotes)
    Quote,
    /// Assemblies with a sized approval (sends)
    Send,
}

/// Account pack returning a fixed sponsorship: 100 000 gas in total at 10 wei per gas, and an
/// exchange rate of 2 token units per native unit
pub struct MockPack {
    pub config: WalletConfig,
    pub sender: Address,
    pub exchange_rate: U256,
    pub assemble_failure: Mutex<Option<(FailurePhase, PackError)>>,
    pub submit_failure: Mutex<Option<PackError>>,
    pub assembled: Mutex<Vec<(Vec<Call>, AssembleOptions)>>,
    pub signed: AtomicUsize,
    pub submitted: Mutex<Vec<UserOperation>>,
}

impl MockPack {
    pub fn new(config: WalletConfig) -> Self {
        Self {
            config,
            sender: SMART_ACCOUNT.parse().unwrap(),
            exchange_rate: U256::from(2) * U256::exp10(18),
            assemble_failure: Mutex::new(None),
            submit_failure: Mutex::new(None),
            assembled: Mutex::new(vec![]),
            signed: AtomicUsize::new(0),
            submitted: Mutex::new(vec![]),
        }
    }

    pub fn fail_assembly(&self, phase: FailurePhase, err: PackError) {
        *self.assemble_failure.lock() = Some((phase, err));
    }

    pub fn fail_submission(&self, err: PackError) {
        *self.submit_failure.lock() = Some(err);
    }

    pub fn assembled(&self) -> Vec<(Vec<Call>, AssembleOptions)> {
        self.assembled.lock().clone()
    }

    pub fn submissions(&self) -> usize {
        self.submitted.lock().len()
    }
}

#[async_trait]
impl AccountPack for MockPack {
    async fn sender_address(&self) -> Result<Address, PackError> {
        Ok(self.sender)
    }

    async fn assemble_operation(
        &self,
        calls: &[Call],
        options: AssembleOptions,
    ) -> Result<UserOperation, PackError> {
        self.assembled.lock().push((calls.to_vec(), options));

        if let Some((phase, err)) = self.assemble_failure.lock().clone() {
            let quoting = options.amount_to_approve == U256::MAX;
            if quoting == (phase == FailurePhase::Quote) {
                return Err(err);
            }
        }

        Ok(UserOperation::default()
            .sender(self.sender)
            .call_gas_limit(50_000.into())
            .verification_gas_limit(20_000.into())
            .pre_verification_gas(20_000.into())
            .max_fee_per_gas(10.into())
            .max_priority_fee_per_gas(1.into())
            .paymaster(self.config.paymaster_address, 6_000.into(), 4_000.into(), Default::default()))
    }

    async fn sign_operation(
        &self,
        uo: UserOperation,
        owner: &KeyedAccount,
    ) -> Result<UserOperation, PackError> {
        let hash = uo.hash(&self.config.entry_point_address, self.config.chain_id);
        let signature = owner.sign_user_operation_hash(hash.0)?;
        self.signed.fetch_add(1, Ordering::SeqCst);
        Ok(uo.signature(signature))
    }

    async fn submit_operation(&self, uo: UserOperation) -> Result<UserOperationHash, PackError> {
        if let Some(err) = self.submit_failure.lock().clone() {
            return Err(err);
        }
        let hash = uo.hash(&self.config.entry_point_address, self.config.chain_id);
        self.submitted.lock().push(uo);
        Ok(hash)
    }

    async fn token_exchange_rate(&self, _token: Address) -> Result<U256, PackError> {
        Ok(self.exchange_rate)
    }

    async fn resolve_transaction_hash(
        &self,
        uo_hash: UserOperationHash,
    ) -> Result<Option<H256>, PackError> {
        Ok(self.user_operation_receipt(uo_hash).await?.map(|r| r.receipt.transaction_hash))
    }

    async fn user_operation_receipt(
        &self,
        uo_hash: UserOperationHash,
    ) -> Result<Option<UserOperationReceipt>, PackError> {
        let submitted = self.submitted.lock();
        let included = submitted
            .iter()
            .any(|uo| uo.hash(&self.config.entry_point_address, self.config.chain_id) == uo_hash);
        Ok(included.then(|| UserOperationReceipt {
            user_op_hash: uo_hash,
            sender: self.sender,
            success: true,
            receipt: IncludedTransaction {
                transaction_hash: H256::repeat_byte(0xbb),
                block_number: None,
            },
            ..Default::default()
        }))
    }
}

/// Hands out the same [MockPack] and counts how often a pack was built
pub struct MockPackBuilder {
    pub pack: Arc<MockPack>,
    pub builds: AtomicUsize,
    pub targets: Mutex<Vec<PackTarget>>,
}

impl MockPackBuilder {
    pub fn new(pack: Arc<MockPack>) -> Self {
        Self { pack, builds: AtomicUsize::new(0), targets: Mutex::new(vec![]) }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PackBuilder for MockPackBuilder {
    async fn build(&self, target: PackTarget) -> Result<Arc<dyn AccountPack>, PackError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.targets.lock().push(target);
        // widen the window for concurrent first use
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(self.pack.clone())
    }
}

/// Chain with fixed balances, a settable allowance and a fixed base fee
pub struct MockChain {
    pub native_balance: U256,
    pub token_balance: U256,
    pub allowance: Mutex<U256>,
    pub base_fee: U256,
    pub allowance_reads: AtomicUsize,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            native_balance: U256::exp10(18),
            token_balance: U256::from(5_000_000),
            allowance: Mutex::new(U256::zero()),
            base_fee: U256::from(1_000),
            allowance_reads: AtomicUsize::new(0),
        }
    }
}

impl MockChain {
    pub fn with_allowance(allowance: U256) -> Self {
        Self { allowance: Mutex::new(allowance), ..Default::default() }
    }
}

#[async_trait]
impl ChainReader for MockChain {
    async fn native_balance(&self, _account: Address) -> Result<U256, WalletError> {
        Ok(self.native_balance)
    }

    async fn token_balance(&self, _token: Address, _account: Address) -> Result<U256, WalletError> {
        Ok(self.token_balance)
    }

    async fn allowance(
        &self,
        _token: Address,
        _owner: Address,
        _spender: Address,
    ) -> Result<U256, WalletError> {
        self.allowance_reads.fetch_add(1, Ordering::SeqCst);
        Ok(*self.allowance.lock())
    }

    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, WalletError> {
        Ok(Some(TransactionReceipt { transaction_hash: hash, ..Default::default() }))
    }

    async fn base_fee(&self) -> Result<U256, WalletError> {
        Ok(self.base_fee)
    }
}

pub struct TestContext {
    pub directory: AccountDirectory,
    pub pack: Arc<MockPack>,
    pub builder: Arc<MockPackBuilder>,
    pub chain: Arc<MockChain>,
}

pub fn setup_with(config: WalletConfig, chain: MockChain, connected: bool) -> TestContext {
    let pack = Arc::new(MockPack::new(config.clone()));
    let builder = Arc::new(MockPackBuilder::new(pack.clone()));
    let chain = Arc::new(chain);
    let reader = connected.then(|| chain.clone() as Arc<dyn ChainReader>);
    let directory =
        AccountDirectory::with_components(KEY_PHRASE, Arc::new(config), reader, builder.clone());
    TestContext { directory, pack, builder, chain }
}

pub fn setup() -> TestContext {
    setup_with(wallet_config(), MockChain::default(), true)
}
