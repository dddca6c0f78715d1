//! Account abstraction (ERC-4337) primitive types
//!
//! This crate contains the user operation types of the supported entry point versions, their
//! canonical ABI packing and hashing, and the gas/fee quantities derived from them.

pub mod constants;
pub mod entry_point;
mod error;
mod user_operation;
mod utils;

pub use entry_point::DepositInfo;
pub use error::UserOperationError;
pub use user_operation::{
    UserOperation, UserOperationHash, UserOperationId, UserOperationV0_6, UserOperationV0_7,
};
pub use utils::{
    as_checksum_addr, as_checksum_init_code, get_address, pack_uint128, split_address_prefix,
    unpack_uint128,
};
