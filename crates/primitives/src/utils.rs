//! Misc utils

use ethers::types::{Address, Bytes, U128, U256};
use ethers::utils::to_checksum;
use serde::{Deserialize, Deserializer};

/// Converts address to checksum address
pub fn as_checksum_addr<S>(val: &Address, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&to_checksum(val, None))
}

/// Converts Option address to checksum
pub fn as_checksum_addr_opt<S>(val: &Option<Address>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if let Some(addr) = val {
        s.serialize_str(&to_checksum(addr, None))
    } else {
        s.serialize_none()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

/// Parses a U256 from a decimal string or a `0x`-prefixed hex string
pub fn parse_u256(s: &str) -> Option<U256> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16).ok(),
        None => U256::from_dec_str(s).ok(),
    }
}

/// Deserializes an optional U256 given either as a JSON number or as a decimal/hex string
pub fn deserialize_u256_opt<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(U256::from(n))),
        Some(NumberOrString::String(s)) => parse_u256(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("{s} is not a valid U256"))),
    }
}

/// Packs two uint128 (`a` in the high half, `b` in the low half)
pub fn pack_uint128(a: U256, b: U256) -> [u8; 32] {
    let mut res = [0u8; 32];
    let a: U128 = {
        let mut tem = [0; 32];
        a.to_big_endian(&mut tem);
        U128::from_big_endian(&tem[16..32])
    };
    let b: U128 = {
        let mut tem = [0; 32];
        b.to_big_endian(&mut tem);
        U128::from_big_endian(&tem[16..32])
    };
    a.to_big_endian(&mut res[0..16]);
    b.to_big_endian(&mut res[16..32]);
    res
}

/// Packs `paymasterAndData` as the v0.7 entry point expects it
pub fn pack_paymaster_data(
    paymaster: Option<Address>,
    paymaster_verification_gas_limit: U256,
    paymaster_post_op_gas_limit: U256,
    paymaster_data: &Bytes,
) -> Vec<u8> {
    match paymaster {
        Some(addr) if !addr.is_zero() => {
            let gas_data =
                pack_uint128(paymaster_verification_gas_limit, paymaster_post_op_gas_limit);
            [addr.0.to_vec(), gas_data.to_vec(), paymaster_data.to_vec()].concat()
        }
        _ => vec![],
    }
}

/// Packs `initCode` from factory and factory data
pub fn pack_factory_data(factory: Option<Address>, factory_data: &Bytes) -> Vec<u8> {
    match factory {
        Some(addr) if !addr.is_zero() => [addr.0.to_vec(), factory_data.to_vec()].concat(),
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpack_uint128(buf: &[u8]) -> (U256, U256) {
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        a.copy_from_slice(&buf[0..16]);
        b.copy_from_slice(&buf[16..32]);
        (U256::from_big_endian(&a), U256::from_big_endian(&b))
    }

    #[test]
    fn pack_unpack_u128() {
        let a: U256 = 100.into();
        let b: U256 = 200.into();
        let packed = pack_uint128(a, b);
        let (new_a, new_b) = unpack_uint128(&packed);
        assert_eq!(a, new_a, "unpack a worked");
        assert_eq!(b, new_b, "unpack b worked");
    }

    #[test]
    fn paymaster_data_layout() {
        let addr: Address = "0x95222290DD7278Aa3Ddd389Cc1E1d165CC4BAfe5".parse().unwrap();
        let data: Bytes = "0x12345678".parse().unwrap();
        let packed = pack_paymaster_data(Some(addr), 7.into(), 9.into(), &data);
        assert_eq!(packed.len(), 20 + 32 + 4);
        assert_eq!(&packed[0..20], addr.as_bytes());
        assert_eq!(unpack_uint128(&packed[20..52]), (7.into(), 9.into()));
        assert_eq!(&packed[52..], data.as_ref());

        assert!(pack_paymaster_data(None, 7.into(), 9.into(), &data).is_empty());
    }

    #[test]
    fn factory_data_is_empty_without_factory() {
        let data: Bytes = "0x12345678".parse().unwrap();
        assert!(pack_factory_data(None, &data).is_empty());
        assert!(pack_factory_data(Some(Address::zero()), &data).is_empty());
    }

    #[test]
    fn parse_u256_accepts_decimal_and_hex() {
        assert_eq!(parse_u256("2400000"), Some(U256::from(2_400_000u64)));
        assert_eq!(parse_u256("0x10"), Some(U256::from(16u64)));
        assert_eq!(parse_u256("ten"), None);
    }
}
