use ethers::{
    contract::{abigen, EthCall},
    types::Selector,
};
use lazy_static::lazy_static;
use std::collections::HashMap;

abigen!(
    EntryPointAPI,
    r#"[
        function getNonce(address sender, uint192 key) public view returns (uint256 nonce)
        error FailedOp(uint256 opIndex, string reason)
        error FailedOpWithRevert(uint256 opIndex, string reason, bytes inner)
    ]"#
);

abigen!(
    ERC20API,
    r#"[
        function balanceOf(address account) external view returns (uint256)
        function allowance(address owner, address spender) external view returns (uint256)
        function transfer(address to, uint256 amount) external returns (bool)
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);

abigen!(
    SimpleAccountAPI,
    r#"[
        function execute(address dest, uint256 value, bytes calldata func) external
        function executeBatch(address[] calldata dest, uint256[] calldata value, bytes[] calldata func) external
    ]"#
);

abigen!(
    SimpleAccountFactoryAPI,
    r#"[
        function createAccount(address owner, uint256 salt) public returns (address ret)
        function getAddress(address owner, uint256 salt) public view returns (address)
    ]"#
);

lazy_static! {
    /// Names of the account calls a user operation's call data may start with
    pub static ref ACCOUNT_SELECTORS: HashMap<Selector, String> = {
        let mut map = HashMap::new();
        map.insert(simple_account_api::ExecuteCall::selector(), simple_account_api::ExecuteCall::function_name().into());
        map.insert(simple_account_api::ExecuteBatchCall::selector(), simple_account_api::ExecuteBatchCall::function_name().into());
        map
    };
}
