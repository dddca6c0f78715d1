//! Entry point capabilities shared by every supported version

mod v0_6;
mod v0_7;

use crate::error::EntryPointError;
use ethers::types::{Address, Bytes, U256};
use kestrel_primitives::{DepositInfo, UserOperation, UserOperationHash};
use std::fmt::Debug;
pub use v0_6::{EntryPointV0_6, StakeManagerV0_6};
pub use v0_7::{EntryPointV0_7, StakeManagerV0_7};

/// Entry point smart contract of a single version
#[async_trait::async_trait]
pub trait EntryPoint: Debug + Send + Sync {
    /// Version token the entry point was registered under
    fn version(&self) -> &'static str;

    /// Address of the deployed entry point
    fn address(&self) -> Address;

    async fn get_nonce(&self, sender: &Address, key: U256) -> Result<U256, EntryPointError>;

    async fn balance_of(&self, addr: &Address) -> Result<U256, EntryPointError>;

    async fn get_deposit_info(&self, addr: &Address) -> Result<DepositInfo, EntryPointError>;

    /// Hash of the user operation as computed by the entry point contract
    async fn get_user_op_hash(
        &self,
        uo: &UserOperation,
    ) -> Result<UserOperationHash, EntryPointError>;

    /// Calldata of `handleOps(ops, beneficiary)`
    ///
    /// Every user operation has to be of the entry point's version.
    fn handle_ops_calldata(
        &self,
        uos: &[UserOperation],
        beneficiary: Address,
    ) -> Result<Bytes, EntryPointError>;
}

/// Stake manager ABI of a single entry point version
///
/// The stake manager is part of the entry point contract, so it only knows how to build and read
/// `getDepositInfo` calls; the call itself is sent by the caller.
pub trait StakeManager: Debug + Send + Sync {
    fn version(&self) -> &'static str;

    /// Calldata of `getDepositInfo(addr)`
    fn encode_get_deposit_info(&self, addr: Address) -> Bytes;

    /// Decodes the return data of `getDepositInfo`
    fn decode_deposit_info(&self, data: &[u8]) -> Result<DepositInfo, EntryPointError>;
}

fn version_mismatch(expected: &str, uo: &UserOperation) -> EntryPointError {
    EntryPointError::VersionMismatch { expected: expected.into(), found: uo.version().into() }
}

fn check_address(address: Address) -> Result<Address, EntryPointError> {
    if address.is_zero() {
        return Err(EntryPointError::Other { inner: "entry point address is zero".into() });
    }
    Ok(address)
}
