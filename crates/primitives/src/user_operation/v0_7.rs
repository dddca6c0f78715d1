use super::{
    dynamic_gas_price, encode_params, encode_tuple, hash_bytes, hash_packed, max_gas_available,
    UserOperationHash,
};
use crate::{
    utils::{
        as_checksum_addr, as_checksum_init_code, pack_uint128, split_address_prefix,
        unpack_uint128,
    },
    UserOperationError,
};
use ethers::{
    abi::{ParamType, Token},
    types::{Address, Bytes, H256, U256},
};
use serde::{Deserialize, Serialize};

/// `PackedUserOperation` tuple of the v0.7 entry point
const PACKED_USER_OPERATION_PARAMS: [ParamType; 9] = [
    ParamType::Address,
    ParamType::Uint(256),
    ParamType::Bytes,
    ParamType::Bytes,
    ParamType::FixedBytes(32),
    ParamType::Uint(256),
    ParamType::FixedBytes(32),
    ParamType::Bytes,
    ParamType::Bytes,
];

/// `UserOperationLib.encode` of the v0.7 entry point
const PACKED_USER_OPERATION_HASH_PARAMS: [ParamType; 8] = [
    ParamType::Address,
    ParamType::Uint(256),
    ParamType::FixedBytes(32),
    ParamType::FixedBytes(32),
    ParamType::FixedBytes(32),
    ParamType::Uint(256),
    ParamType::FixedBytes(32),
    ParamType::FixedBytes(32),
];

/// Packed user operation of entry point v0.7
///
/// Gas limits and fees are stored the way the entry point receives them: two uint128 values per
/// 32 bytes word.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationV0_7 {
    /// Sender of the user operation
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,

    /// Nonce (anti replay protection)
    pub nonce: U256,

    /// Factory address followed by the factory data (empty if the account is deployed)
    #[serde(serialize_with = "as_checksum_init_code")]
    pub init_code: Bytes,

    /// The data that is passed to the sender during the main execution call
    pub call_data: Bytes,

    /// Verification gas limit (high 128 bits) and call gas limit (low 128 bits)
    pub account_gas_limits: H256,

    /// The amount of gas to pay bundler to compensate for the pre-verification execution and
    /// calldata
    pub pre_verification_gas: U256,

    /// Max priority fee per gas (high 128 bits) and max fee per gas (low 128 bits)
    pub gas_fees: H256,

    /// Paymaster address followed by the paymaster gas limits and data (can be empty)
    pub paymaster_and_data: Bytes,

    /// Data passed to the account along with the nonce during the verification step
    pub signature: Bytes,
}

impl UserOperationV0_7 {
    pub fn verification_gas_limit(&self) -> U256 {
        unpack_uint128(&self.account_gas_limits).0
    }

    pub fn call_gas_limit(&self) -> U256 {
        unpack_uint128(&self.account_gas_limits).1
    }

    pub fn max_priority_fee_per_gas(&self) -> U256 {
        unpack_uint128(&self.gas_fees).0
    }

    pub fn max_fee_per_gas(&self) -> U256 {
        unpack_uint128(&self.gas_fees).1
    }

    pub fn paymaster(&self) -> Address {
        split_address_prefix(&self.paymaster_and_data).0
    }

    pub fn factory(&self) -> Address {
        split_address_prefix(&self.init_code).0
    }

    pub fn factory_data(&self) -> Bytes {
        split_address_prefix(&self.init_code).1
    }

    /// Packs the user operation into bytes
    pub fn pack(&self) -> Result<Bytes, UserOperationError> {
        encode_tuple(
            vec![
                Token::Address(self.sender),
                Token::Uint(self.nonce),
                Token::Bytes(self.init_code.to_vec()),
                Token::Bytes(self.call_data.to_vec()),
                Token::FixedBytes(self.account_gas_limits.as_bytes().to_vec()),
                Token::Uint(self.pre_verification_gas),
                Token::FixedBytes(self.gas_fees.as_bytes().to_vec()),
                Token::Bytes(self.paymaster_and_data.to_vec()),
                Token::Bytes(self.signature.to_vec()),
            ],
            &PACKED_USER_OPERATION_PARAMS,
        )
    }

    /// Packs the user operation without signature to bytes (used for calculating the hash)
    pub fn pack_for_signature(&self) -> Result<Bytes, UserOperationError> {
        encode_params(
            vec![
                Token::Address(self.sender),
                Token::Uint(self.nonce),
                hash_bytes(&self.init_code),
                hash_bytes(&self.call_data),
                Token::FixedBytes(self.account_gas_limits.as_bytes().to_vec()),
                Token::Uint(self.pre_verification_gas),
                Token::FixedBytes(self.gas_fees.as_bytes().to_vec()),
                hash_bytes(&self.paymaster_and_data),
            ],
            &PACKED_USER_OPERATION_HASH_PARAMS,
        )
    }

    /// Calculates the hash of the user operation
    pub fn hash(
        &self,
        entry_point: &Address,
        chain_id: u64,
    ) -> Result<UserOperationHash, UserOperationError> {
        Ok(hash_packed(&self.pack_for_signature()?, entry_point, chain_id))
    }

    pub fn max_gas_available(&self) -> U256 {
        max_gas_available(
            self.paymaster(),
            self.verification_gas_limit(),
            self.pre_verification_gas,
            self.call_gas_limit(),
        )
    }

    pub fn max_prefund(&self) -> U256 {
        self.max_gas_available().saturating_mul(self.max_fee_per_gas())
    }

    pub fn dynamic_gas_price(&self, base_fee: Option<U256>) -> U256 {
        dynamic_gas_price(self.max_fee_per_gas(), self.max_priority_fee_per_gas(), base_fee)
    }

    // Builder pattern helpers

    /// Sets the sender of the user operation
    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = sender;
        self
    }

    /// Sets the nonce of the user operation
    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = nonce;
        self
    }

    /// Sets the init code of the user operation
    pub fn init_code(mut self, init_code: Bytes) -> Self {
        self.init_code = init_code;
        self
    }

    /// Sets the call data of the user operation
    pub fn call_data(mut self, call_data: Bytes) -> Self {
        self.call_data = call_data;
        self
    }

    /// Packs and sets the verification and call gas limits of the user operation
    pub fn gas_limits(mut self, verification_gas_limit: U256, call_gas_limit: U256) -> Self {
        self.account_gas_limits = pack_uint128(verification_gas_limit, call_gas_limit);
        self
    }

    /// Sets the pre-verification gas of the user operation
    pub fn pre_verification_gas(mut self, pre_verification_gas: U256) -> Self {
        self.pre_verification_gas = pre_verification_gas;
        self
    }

    /// Packs and sets the max priority fee and the max fee per gas of the user operation
    pub fn fees(mut self, max_priority_fee_per_gas: U256, max_fee_per_gas: U256) -> Self {
        self.gas_fees = pack_uint128(max_priority_fee_per_gas, max_fee_per_gas);
        self
    }

    /// Sets the paymaster and data of the user operation
    pub fn paymaster_and_data(mut self, paymaster_and_data: Bytes) -> Self {
        self.paymaster_and_data = paymaster_and_data;
        self
    }

    /// Sets the signature of the user operation
    pub fn signature(mut self, signature: Bytes) -> Self {
        self.signature = signature;
        self
    }

    /// Creates random user operation (for testing purposes)
    #[cfg(feature = "test-utils")]
    pub fn random() -> Self {
        UserOperationV0_7::default()
            .sender(Address::random())
            .gas_limits(100_000.into(), U256::zero())
            .pre_verification_gas(21_000.into())
            .fees(1_000_000_000.into(), U256::zero())
    }
}
