//! Fee arithmetic. Every rounding is upwards and every overflow is an error.

use crate::WalletError;
use aa_wallet_primitives::{
    constants::fees::{
        APPROVAL_TOLERANCE_PERCENT, EXCHANGE_RATE_DECIMALS, FEE_RATE_FAST_PERCENT,
        FEE_RATE_NORMAL_PERCENT, PERCENT_DENOMINATOR,
    },
    FeeRates, UserOperation,
};
use ethers::types::U256;

fn overflow(what: &str) -> WalletError {
    WalletError::Arithmetic { inner: format!("{what} overflows uint256") }
}

/// `ceil(a / b)` for a non-zero `b`
pub fn div_ceil(a: U256, b: U256) -> U256 {
    let (quotient, remainder) = a.div_mod(b);
    if remainder.is_zero() {
        quotient
    } else {
        quotient + 1
    }
}

/// Worst-case cost of the user operation in the native asset (sum of the five gas limits times
/// the max fee per gas)
pub fn native_cost(uo: &UserOperation) -> Result<U256, WalletError> {
    uo.max_gas_cost().ok_or_else(|| overflow("native gas cost"))
}

/// Converts a native amount to paymaster token base units with an 18-decimal fixed point
/// exchange rate
pub fn token_amount(native: U256, exchange_rate: U256) -> Result<U256, WalletError> {
    let scaled = native.checked_mul(exchange_rate).ok_or_else(|| overflow("token fee"))?;
    Ok(div_ceil(scaled, U256::exp10(EXCHANGE_RATE_DECIMALS)))
}

/// Allowance granted to the paymaster when sending: the quoted fee plus tolerance headroom
pub fn approval_amount(fee: U256) -> Result<U256, WalletError> {
    scale_percent(fee, APPROVAL_TOLERANCE_PERCENT)
}

/// Normal and fast fee rates for the given base fee
pub fn fee_rates(base_fee: U256) -> Result<FeeRates, WalletError> {
    Ok(FeeRates {
        normal: scale_percent(base_fee, FEE_RATE_NORMAL_PERCENT)?,
        fast: scale_percent(base_fee, FEE_RATE_FAST_PERCENT)?,
    })
}

fn scale_percent(value: U256, percent: u64) -> Result<U256, WalletError> {
    let scaled = value.checked_mul(U256::from(percent)).ok_or_else(|| overflow("percentage"))?;
    Ok(div_ceil(scaled, U256::from(PERCENT_DENOMINATOR)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_and_approval_for_reference_operation() -> Result<(), WalletError> {
        // 100 000 gas at 10 wei, 1 native unit = 2 token units
        let rate = U256::from(2) * U256::exp10(18);
        let fee = token_amount(U256::from(1_000_000), rate)?;
        assert_eq!(fee, U256::from(2_000_000));
        assert_eq!(approval_amount(fee)?, U256::from(2_400_000));
        Ok(())
    }

    #[test]
    fn never_rounds_down() -> Result<(), WalletError> {
        assert_eq!(token_amount(U256::one(), U256::one())?, U256::one());
        assert_eq!(token_amount(U256::zero(), U256::exp10(18))?, U256::zero());
        assert_eq!(approval_amount(U256::one())?, U256::from(2));
        assert_eq!(approval_amount(U256::from(5))?, U256::from(6));
        Ok(())
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(matches!(token_amount(U256::MAX, U256::from(2)), Err(WalletError::Arithmetic { .. })));
        assert!(matches!(approval_amount(U256::MAX), Err(WalletError::Arithmetic { .. })));
    }

    #[test]
    fn fee_rates_scale_base_fee() -> Result<(), WalletError> {
        let rates = fee_rates(U256::from(1_000))?;
        assert_eq!(rates.normal, U256::from(1_100));
        assert_eq!(rates.fast, U256::from(2_000));
        // ceil(7 * 1.1) = 8
        assert_eq!(fee_rates(U256::from(7))?.normal, U256::from(8));
        Ok(())
    }
}
