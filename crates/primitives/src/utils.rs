//! Misc utils

use ethers::{
    types::{Address, Bytes, H256, U128, U256},
    utils::{hex, to_checksum},
};

/// Converts address to checksum address
pub fn as_checksum_addr<S>(val: &Address, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(&to_checksum(val, None))
}

/// Serializes init code as checksum factory address followed by the hex factory data
///
/// Without a factory the init code is rendered as `0x`.
pub fn as_checksum_init_code<S>(val: &Bytes, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let (factory, factory_data) = split_address_prefix(val);
    if factory.is_zero() {
        s.serialize_str("0x")
    } else {
        s.serialize_str(&format!("{}{}", to_checksum(&factory, None), hex::encode(factory_data)))
    }
}

/// If possible, parses address from the first 20 bytes
pub fn get_address(buf: &[u8]) -> Option<Address> {
    if buf.len() >= 20 {
        Some(Address::from_slice(&buf[0..20]))
    } else {
        None
    }
}

/// Splits `buf` into the leading address and the remaining data
///
/// Buffers shorter than an address yield the zero address and empty data.
pub fn split_address_prefix(buf: &[u8]) -> (Address, Bytes) {
    match get_address(buf) {
        Some(addr) => (addr, Bytes::from(buf[20..].to_vec())),
        None => (Address::zero(), Bytes::default()),
    }
}

/// Packs two uint128 into a single word (`a` in the high half, `b` in the low half)
///
/// Only the low 128 bits of each value are kept.
pub fn pack_uint128(a: U256, b: U256) -> H256 {
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
    H256(res)
}

/// Unpacks two uint128 (high half, low half) from a word
pub fn unpack_uint128(word: &H256) -> (U256, U256) {
    let buf = word.as_bytes();
    (U256::from_big_endian(&buf[0..16]), U256::from_big_endian(&buf[16..32]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_u128() {
        let a: U256 = 100.into();
        let b: U256 = 200.into();
        let packed = pack_uint128(a, b);
        let mut expected = [0u8; 32];
        expected[15] = 100;
        expected[31] = 200;
        assert_eq!(packed, H256(expected), "a is in the high half");
        let (new_a, new_b) = unpack_uint128(&packed);
        assert_eq!(a, new_a, "unpack a worked");
        assert_eq!(b, new_b, "unpack b worked");
    }

    #[test]
    fn pack_u128_truncates_high_bits() {
        let a = (U256::one() << 128) + U256::from(7);
        let (new_a, new_b) = unpack_uint128(&pack_uint128(a, U256::zero()));
        assert_eq!(new_a, 7.into());
        assert_eq!(new_b, U256::zero());
    }

    #[test]
    fn address_prefix_split() {
        let addr: Address = "0x95222290DD7278Aa3Ddd389Cc1E1d165CC4BAfe5".parse().unwrap();
        let data: Bytes = "0x12345678".parse().unwrap();
        let buf = [addr.as_bytes(), data.as_ref()].concat();

        let (new_addr, new_data) = split_address_prefix(&buf);
        assert_eq!(addr, new_addr);
        assert_eq!(data, new_data);

        let (new_addr, new_data) = split_address_prefix(addr.as_bytes());
        assert_eq!(addr, new_addr);
        assert!(new_data.is_empty());

        let (new_addr, new_data) = split_address_prefix(&buf[..19]);
        assert!(new_addr.is_zero());
        assert!(new_data.is_empty());
    }
}
