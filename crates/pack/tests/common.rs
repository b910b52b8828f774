use aa_wallet_pack::{
    SponsorContext, SponsorResult, TokenQuote, TokenQuoteRequest, TokenQuotes,
    UserOperationReceipt,
};
use aa_wallet_primitives::{
    constants::rpc_error_codes::VALIDATION, PaymasterToken, UserOperation, UserOperationHash,
    WalletConfig,
};
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use jsonrpsee::{
    core::RpcResult,
    proc_macros::rpc,
    server::{ServerBuilder, ServerHandle},
    types::ErrorObject,
};
use parking_lot::Mutex;
use std::{net::SocketAddr, sync::Arc};

pub const PAYMASTER: &str = "0x0000000000000039cd5e8aE05257CE51C473ddd1";
pub const TOKEN: &str = "0xd077a400968890eacc75cdc901f0356c943e4fdb";
pub const ACCOUNT: &str = "0x9c5754De1443984659E1b3a8d1931D83475ba29C";

/// Bundler and paymaster endpoints served by one mock server
#[rpc(server)]
pub trait MockAccountAbstraction {
    #[method(name = "pm_sponsorUserOperation")]
    async fn sponsor_user_operation(
        &self,
        user_operation: UserOperation,
        entry_point: Address,
        sponsor_context: SponsorContext,
    ) -> RpcResult<SponsorResult>;

    #[method(name = "pimlico_getTokenQuotes")]
    async fn get_token_quotes(
        &self,
        quote_request: TokenQuoteRequest,
        entry_point: Address,
        chain_id: String,
    ) -> RpcResult<TokenQuotes>;

    #[method(name = "eth_sendUserOperation")]
    async fn send_user_operation(
        &self,
        user_operation: UserOperation,
        entry_point: Address,
    ) -> RpcResult<UserOperationHash>;

    #[method(name = "eth_getUserOperationReceipt")]
    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>>;
}

#[derive(Clone, Default)]
pub struct MockAccountAbstractionServerImpl {
    /// Paymaster fails every sponsorship with this message
    pub sponsor_failure: Option<String>,
    pub sponsored: Arc<Mutex<Vec<(UserOperation, SponsorContext)>>>,
    pub submitted: Arc<Mutex<Vec<UserOperation>>>,
    pub chain_ids: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl MockAccountAbstractionServer for MockAccountAbstractionServerImpl {
    async fn sponsor_user_operation(
        &self,
        user_operation: UserOperation,
        _entry_point: Address,
        sponsor_context: SponsorContext,
    ) -> RpcResult<SponsorResult> {
        if let Some(message) = &self.sponsor_failure {
            return Err(ErrorObject::owned(VALIDATION, message.clone(), None::<bool>));
        }
        self.sponsored.lock().push((user_operation, sponsor_context));

        Ok(SponsorResult {
            paymaster: PAYMASTER.parse().unwrap(),
            paymaster_data: "0xdeadbeef".parse().unwrap(),
            paymaster_verification_gas_limit: 6_000.into(),
            paymaster_post_op_gas_limit: 4_000.into(),
            call_gas_limit: 50_000.into(),
            verification_gas_limit: 20_000.into(),
            pre_verification_gas: 20_000.into(),
        })
    }

    async fn get_token_quotes(
        &self,
        quote_request: TokenQuoteRequest,
        _entry_point: Address,
        chain_id: String,
    ) -> RpcResult<TokenQuotes> {
        self.chain_ids.lock().push(chain_id);
        Ok(TokenQuotes {
            quotes: quote_request
                .tokens
                .into_iter()
                .map(|token| TokenQuote {
                    token,
                    paymaster: Some(PAYMASTER.parse().unwrap()),
                    exchange_rate: U256::from(2) * U256::exp10(18),
                    post_op_gas: 4_000.into(),
                })
                .collect(),
        })
    }

    async fn send_user_operation(
        &self,
        user_operation: UserOperation,
        _entry_point: Address,
    ) -> RpcResult<UserOperationHash> {
        self.submitted.lock().push(user_operation);
        Ok(H256::repeat_byte(0xaa).into())
    }

    async fn get_user_operation_receipt(
        &self,
        user_operation_hash: UserOperationHash,
    ) -> RpcResult<Option<UserOperationReceipt>> {
        if user_operation_hash != H256::repeat_byte(0xaa).into() {
            return Ok(None);
        }
        let mut receipt = UserOperationReceipt {
            user_op_hash: user_operation_hash,
            success: true,
            actual_gas_cost: 1_000_000.into(),
            actual_gas_used: 100_000.into(),
            ..Default::default()
        };
        receipt.receipt.transaction_hash = H256::repeat_byte(0xbb);
        Ok(Some(receipt))
    }
}

/// Starts the mock on a random local port
pub async fn start_mock_server(
    mock: MockAccountAbstractionServerImpl,
) -> eyre::Result<(ServerHandle, SocketAddr)> {
    let server = ServerBuilder::default().build("127.0.0.1:0").await?;
    let addr = server.local_addr()?;
    let handle = server.start(mock.into_rpc());
    Ok((handle, addr))
}

pub fn wallet_config(addr: SocketAddr) -> WalletConfig {
    WalletConfig {
        chain_id: 11155111,
        provider: None,
        bundler_url: format!("http://{addr}"),
        paymaster_url: format!("http://{addr}"),
        paymaster_address: PAYMASTER.parse().unwrap(),
        entry_point_address: aa_wallet_primitives::constants::entry_point::ADDRESS
            .parse()
            .unwrap(),
        account_module_version: "0.7.0".into(),
        paymaster_token: PaymasterToken::from(TOKEN.parse::<Address>().unwrap()),
        transfer_max_fee: None,
    }
}
