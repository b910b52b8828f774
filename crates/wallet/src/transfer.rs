//! Token transfer and approval call construction

use aa_wallet_contracts::erc20::{approve_call_data, transfer_call_data};
use aa_wallet_primitives::{constants::tokens::ALLOWANCE_RESET_REQUIRED, Call};
use ethers::types::{Address, U256};

/// ERC-20 transfer of `amount` base units of `token` to `recipient`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenTransfer {
    pub token: Address,
    pub recipient: Address,
    pub amount: U256,
}

impl TokenTransfer {
    pub fn new(token: Address, recipient: Address, amount: U256) -> Self {
        Self { token, recipient, amount }
    }

    pub fn to_call(&self) -> Call {
        Call::new(self.token, U256::zero(), transfer_call_data(self.recipient, self.amount))
    }
}

/// ERC-20 approval of `amount` base units of `token` for `spender`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenApproval {
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
}

impl TokenApproval {
    pub fn new(token: Address, spender: Address, amount: U256) -> Self {
        Self { token, spender, amount }
    }

    pub fn to_call(&self) -> Call {
        Call::new(self.token, U256::zero(), approve_call_data(self.spender, self.amount))
    }
}

/// Whether `token` on `chain_id` refuses to change a nonzero allowance to another nonzero value
pub fn requires_allowance_reset(chain_id: u64, token: Address) -> bool {
    ALLOWANCE_RESET_REQUIRED.iter().any(|(chain, address)| {
        *chain == chain_id && address.parse::<Address>().map(|a| a == token).unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aa_wallet_primitives::constants::tokens::USDT_MAINNET;

    #[test]
    fn transfer_is_a_single_token_call() {
        let token = Address::repeat_byte(0x10);
        let call = TokenTransfer::new(token, Address::repeat_byte(0x20), 5.into()).to_call();
        assert_eq!(call.to, token);
        assert!(call.value.is_zero());
        assert_eq!(call.data, transfer_call_data(Address::repeat_byte(0x20), 5.into()));
    }

    #[test]
    fn only_mainnet_usdt_requires_reset() {
        let usdt: Address = USDT_MAINNET.parse().unwrap();
        assert!(requires_allowance_reset(1, usdt));
        assert!(!requires_allowance_reset(11155111, usdt));
        assert!(!requires_allowance_reset(1, Address::repeat_byte(1)));
    }
}
