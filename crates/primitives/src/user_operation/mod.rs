//! Basic transaction type for account abstraction (ERC-4337)
//!
//! Two entry point versions are supported and each has its own on-chain layout of the gas and
//! fee fields. [UserOperation] is the closed set of both; every packing, hashing and gas
//! accounting operation is defined per variant.

mod hash;
mod v0_6;
mod v0_7;

use crate::{
    constants::{
        entry_point::{VERSION_V0_6, VERSION_V0_7},
        gas::{PAYMASTER_VERIFICATION_GAS_MULTIPLIER, VERIFICATION_GAS_MULTIPLIER},
    },
    UserOperationError,
};
use ethers::{
    abi::{encode, ParamType, Token},
    types::{Address, Bytes, U256},
    utils::keccak256,
};
pub use hash::UserOperationHash;
use serde::{Deserialize, Serialize};
pub use v0_6::UserOperationV0_6;
pub use v0_7::UserOperationV0_7;

/// Unique identifier for a user operation from a given sender
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UserOperationId {
    /// Sender of the user operation
    pub sender: Address,
    /// Nonce of the user operation
    pub nonce: U256,
}

/// User operation of any supported entry point version
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserOperation {
    /// User operation of entry point v0.6
    V0_6(UserOperationV0_6),
    /// Packed user operation of entry point v0.7
    V0_7(UserOperationV0_7),
}

impl From<UserOperationV0_6> for UserOperation {
    fn from(uo: UserOperationV0_6) -> Self {
        Self::V0_6(uo)
    }
}

impl From<UserOperationV0_7> for UserOperation {
    fn from(uo: UserOperationV0_7) -> Self {
        Self::V0_7(uo)
    }
}

macro_rules! dispatch {
    ($self:ident, $uo:ident => $body:expr) => {
        match $self {
            UserOperation::V0_6($uo) => $body,
            UserOperation::V0_7($uo) => $body,
        }
    };
}

impl UserOperation {
    /// Version token of the entry point this user operation targets
    pub fn version(&self) -> &'static str {
        match self {
            UserOperation::V0_6(_) => VERSION_V0_6,
            UserOperation::V0_7(_) => VERSION_V0_7,
        }
    }

    pub fn sender(&self) -> Address {
        dispatch!(self, uo => uo.sender)
    }

    pub fn nonce(&self) -> U256 {
        dispatch!(self, uo => uo.nonce)
    }

    pub fn init_code(&self) -> &Bytes {
        dispatch!(self, uo => &uo.init_code)
    }

    pub fn call_data(&self) -> &Bytes {
        dispatch!(self, uo => &uo.call_data)
    }

    pub fn paymaster_and_data(&self) -> &Bytes {
        dispatch!(self, uo => &uo.paymaster_and_data)
    }

    pub fn signature(&self) -> &Bytes {
        dispatch!(self, uo => &uo.signature)
    }

    pub fn call_gas_limit(&self) -> U256 {
        match self {
            UserOperation::V0_6(uo) => uo.call_gas_limit,
            UserOperation::V0_7(uo) => uo.call_gas_limit(),
        }
    }

    pub fn verification_gas_limit(&self) -> U256 {
        match self {
            UserOperation::V0_6(uo) => uo.verification_gas_limit,
            UserOperation::V0_7(uo) => uo.verification_gas_limit(),
        }
    }

    pub fn pre_verification_gas(&self) -> U256 {
        dispatch!(self, uo => uo.pre_verification_gas)
    }

    pub fn max_fee_per_gas(&self) -> U256 {
        match self {
            UserOperation::V0_6(uo) => uo.max_fee_per_gas,
            UserOperation::V0_7(uo) => uo.max_fee_per_gas(),
        }
    }

    pub fn max_priority_fee_per_gas(&self) -> U256 {
        match self {
            UserOperation::V0_6(uo) => uo.max_priority_fee_per_gas,
            UserOperation::V0_7(uo) => uo.max_priority_fee_per_gas(),
        }
    }

    /// Sender and nonce of the user operation
    pub fn id(&self) -> UserOperationId {
        UserOperationId { sender: self.sender(), nonce: self.nonce() }
    }

    /// Address of the paymaster, or the zero address if there is none
    pub fn paymaster(&self) -> Address {
        dispatch!(self, uo => uo.paymaster())
    }

    /// Address of the factory, or the zero address if there is none
    pub fn factory(&self) -> Address {
        dispatch!(self, uo => uo.factory())
    }

    /// Data passed to the factory, empty if there is no factory
    pub fn factory_data(&self) -> Bytes {
        dispatch!(self, uo => uo.factory_data())
    }

    /// Packs the user operation into bytes (cannot be used to calculate the hash)
    pub fn pack(&self) -> Result<Bytes, UserOperationError> {
        dispatch!(self, uo => uo.pack())
    }

    /// Packs the user operation without signature and with the dynamic fields hashed
    pub fn pack_for_signature(&self) -> Result<Bytes, UserOperationError> {
        dispatch!(self, uo => uo.pack_for_signature())
    }

    /// Calculates the hash of the user operation for the given entry point and chain
    pub fn hash(
        &self,
        entry_point: &Address,
        chain_id: u64,
    ) -> Result<UserOperationHash, UserOperationError> {
        dispatch!(self, uo => uo.hash(entry_point, chain_id))
    }

    /// Maximum amount of gas that can be consumed by the user operation
    pub fn max_gas_available(&self) -> U256 {
        dispatch!(self, uo => uo.max_gas_available())
    }

    /// Maximum amount of wei the sender or paymaster has to prefund
    pub fn max_prefund(&self) -> U256 {
        dispatch!(self, uo => uo.max_prefund())
    }

    /// Effective gas price paid given the base fee (assumed 0 if unknown)
    pub fn dynamic_gas_price(&self, base_fee: Option<U256>) -> U256 {
        dispatch!(self, uo => uo.dynamic_gas_price(base_fee))
    }

    /// JSON object view of the user operation
    pub fn to_map(&self) -> Result<serde_json::Map<String, serde_json::Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(serde::ser::Error::custom(format!(
                "user operation serialized to a non-object value: {other}"
            ))),
        }
    }
}

/// ABI-encodes `tokens` as one tuple argument and strips the leading offset word
fn encode_tuple(tokens: Vec<Token>, params: &[ParamType]) -> Result<Bytes, UserOperationError> {
    if !Token::types_check(&tokens, params) {
        return Err(UserOperationError::Encoding {
            inner: format!("tokens {tokens:?} do not match {params:?}"),
        });
    }
    let encoded = encode(&[Token::Tuple(tokens)]);
    // the tuple holds dynamic members, so the encoding starts with a 32 bytes offset
    Ok(Bytes::from(encoded[32..].to_vec()))
}

/// ABI-encodes `tokens` as separate arguments
fn encode_params(tokens: Vec<Token>, params: &[ParamType]) -> Result<Bytes, UserOperationError> {
    if !Token::types_check(&tokens, params) {
        return Err(UserOperationError::Encoding {
            inner: format!("tokens {tokens:?} do not match {params:?}"),
        });
    }
    Ok(encode(&tokens).into())
}

/// `keccak256(keccak256(packed) || entry_point || chain_id)`
fn hash_packed(packed: &[u8], entry_point: &Address, chain_id: u64) -> UserOperationHash {
    keccak256(encode(&[
        Token::FixedBytes(keccak256(packed).to_vec()),
        Token::Address(*entry_point),
        Token::Uint(chain_id.into()),
    ]))
    .into()
}

fn hash_bytes(data: &Bytes) -> Token {
    Token::FixedBytes(keccak256(data).to_vec())
}

fn max_gas_available(
    paymaster: Address,
    verification_gas_limit: U256,
    pre_verification_gas: U256,
    call_gas_limit: U256,
) -> U256 {
    let mul = if paymaster.is_zero() {
        VERIFICATION_GAS_MULTIPLIER
    } else {
        PAYMASTER_VERIFICATION_GAS_MULTIPLIER
    };
    verification_gas_limit
        .saturating_mul(mul.into())
        .saturating_add(pre_verification_gas)
        .saturating_add(call_gas_limit)
}

fn dynamic_gas_price(
    max_fee_per_gas: U256,
    max_priority_fee_per_gas: U256,
    base_fee: Option<U256>,
) -> U256 {
    base_fee.unwrap_or_default().saturating_add(max_priority_fee_per_gas).min(max_fee_per_gas)
}
