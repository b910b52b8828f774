use crate::gen::ACCOUNT_SELECTORS;
use ethers::types::Bytes;

/// Name of the account function the call data invokes, if it is a known one
pub fn account_function_name(call_data: &Bytes) -> Option<&'static str> {
    if call_data.len() < 4 {
        return None;
    }
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&call_data[..4]);
    ACCOUNT_SELECTORS.get(&selector).map(String::as_str)
}
