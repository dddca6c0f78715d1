use super::{
    dynamic_gas_price, encode_params, encode_tuple, hash_bytes, hash_packed, max_gas_available,
    UserOperationHash,
};
use crate::{
    utils::{as_checksum_addr, as_checksum_init_code, split_address_prefix},
    UserOperationError,
};
use ethers::{
    abi::{ParamType, Token},
    types::{Address, Bytes, U256},
};
use serde::{Deserialize, Serialize};

/// `UserOperation` tuple of the v0.6 entry point
const USER_OPERATION_PARAMS: [ParamType; 11] = [
    ParamType::Address,
    ParamType::Uint(256),
    ParamType::Bytes,
    ParamType::Bytes,
    ParamType::Uint(256),
    ParamType::Uint(256),
    ParamType::Uint(256),
    ParamType::Uint(256),
    ParamType::Uint(256),
    ParamType::Bytes,
    ParamType::Bytes,
];

/// `UserOperationLib.pack` of the v0.6 entry point
const USER_OPERATION_HASH_PARAMS: [ParamType; 10] = [
    ParamType::Address,
    ParamType::Uint(256),
    ParamType::FixedBytes(32),
    ParamType::FixedBytes(32),
    ParamType::Uint(256),
    ParamType::Uint(256),
    ParamType::Uint(256),
    ParamType::Uint(256),
    ParamType::Uint(256),
    ParamType::FixedBytes(32),
];

/// User operation of entry point v0.6
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationV0_6 {
    /// Sender of the user operation
    #[serde(serialize_with = "as_checksum_addr")]
    pub sender: Address,

    /// Nonce (anti replay protection)
    pub nonce: U256,

    /// Init code for the account (needed if account not yet deployed and needs to be created)
    #[serde(serialize_with = "as_checksum_init_code")]
    pub init_code: Bytes,

    /// The data that is passed to the sender during the main execution call
    pub call_data: Bytes,

    /// The amount of gas to allocate for the main execution call
    pub call_gas_limit: U256,

    /// The amount of gas to allocate for the verification step
    pub verification_gas_limit: U256,

    /// The amount of gas to pay bundler to compensate for the pre-verification execution and
    /// calldata
    pub pre_verification_gas: U256,

    /// Maximum fee per gas (similar to EIP-1559)
    pub max_fee_per_gas: U256,

    /// Maximum priority fee per gas (similar to EIP-1559)
    pub max_priority_fee_per_gas: U256,

    /// Address of paymaster sponsoring the user operation, followed by extra data to send to the
    /// paymaster (can be empty)
    pub paymaster_and_data: Bytes,

    /// Data passed to the account along with the nonce during the verification step
    pub signature: Bytes,
}

impl UserOperationV0_6 {
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
                Token::Uint(self.call_gas_limit),
                Token::Uint(self.verification_gas_limit),
                Token::Uint(self.pre_verification_gas),
                Token::Uint(self.max_fee_per_gas),
                Token::Uint(self.max_priority_fee_per_gas),
                Token::Bytes(self.paymaster_and_data.to_vec()),
                Token::Bytes(self.signature.to_vec()),
            ],
            &USER_OPERATION_PARAMS,
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
                Token::Uint(self.call_gas_limit),
                Token::Uint(self.verification_gas_limit),
                Token::Uint(self.pre_verification_gas),
                Token::Uint(self.max_fee_per_gas),
                Token::Uint(self.max_priority_fee_per_gas),
                hash_bytes(&self.paymaster_and_data),
            ],
            &USER_OPERATION_HASH_PARAMS,
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
            self.verification_gas_limit,
            self.pre_verification_gas,
            self.call_gas_limit,
        )
    }

    pub fn max_prefund(&self) -> U256 {
        self.max_gas_available().saturating_mul(self.max_fee_per_gas)
    }

    pub fn dynamic_gas_price(&self, base_fee: Option<U256>) -> U256 {
        dynamic_gas_price(self.max_fee_per_gas, self.max_priority_fee_per_gas, base_fee)
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

    /// Sets the call gas limit of the user operation
    pub fn call_gas_limit(mut self, call_gas_limit: U256) -> Self {
        self.call_gas_limit = call_gas_limit;
        self
    }

    /// Sets the verification gas limit of the user operation
    pub fn verification_gas_limit(mut self, verification_gas_limit: U256) -> Self {
        self.verification_gas_limit = verification_gas_limit;
        self
    }

    /// Sets the pre-verification gas of the user operation
    pub fn pre_verification_gas(mut self, pre_verification_gas: U256) -> Self {
        self.pre_verification_gas = pre_verification_gas;
        self
    }

    /// Sets the max fee per gas of the user operation
    pub fn max_fee_per_gas(mut self, max_fee_per_gas: U256) -> Self {
        self.max_fee_per_gas = max_fee_per_gas;
        self
    }

    /// Sets the max priority fee per gas of the user operation
    pub fn max_priority_fee_per_gas(mut self, max_priority_fee_per_gas: U256) -> Self {
        self.max_priority_fee_per_gas = max_priority_fee_per_gas;
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
        UserOperationV0_6::default()
            .sender(Address::random())
            .verification_gas_limit(100_000.into())
            .pre_verification_gas(21_000.into())
            .max_priority_fee_per_gas(1_000_000_000.into())
    }
}
