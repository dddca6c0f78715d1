use crate::gen::{v0_6::FailedOp, v0_7::FailedOpWithRevert};
use ethers::{
    abi::AbiDecode,
    contract::{ContractError, EthError},
    providers::Middleware,
    types::{Bytes, U256},
};
use thiserror::Error;

/// Entry point errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryPointError {
    /// No constructor is registered for the version token
    #[error("unsupported entry point version {version}")]
    UnsupportedVersion {
        /// The requested version token
        version: String,
    },

    /// User operation does not belong to the entry point version
    #[error("entry point {expected} can't handle user operation of {found}")]
    VersionMismatch {
        /// Version of the entry point
        expected: String,
        /// Version of the user operation
        found: String,
    },

    /// Failed user operation error
    #[error("failed op {op_index}: {reason}")]
    FailedOp {
        /// Index of the user operation in the bundle
        op_index: U256,
        /// Revert reason (`AAxx` code)
        reason: String,
    },

    /// execution reverted
    #[error("execution reverted: {0}")]
    ExecutionReverted(String),

    /// Provider error
    #[error("provider error: {inner}")]
    Provider {
        /// The inner error message
        inner: String,
    },

    /// ABI error
    #[error("abi error: {inner}")]
    ABI {
        /// The inner error message
        inner: String,
    },

    /// Data decoding error
    #[error("decode error: {inner}")]
    Decode {
        /// The inner error message
        inner: String,
    },

    /// Any other error
    #[error("other error: {inner}")]
    Other {
        /// The inner error message
        inner: String,
    },
}

impl EntryPointError {
    pub fn from_contract_error<M: Middleware>(err: ContractError<M>) -> Self {
        match err {
            ContractError::DecodingError(e) => Self::Decode { inner: e.to_string() },
            ContractError::AbiError(e) => Self::ABI { inner: e.to_string() },
            ContractError::MiddlewareError { e } => {
                Self::Provider { inner: format!("middleware error: {e:?}") }
            }
            ContractError::ProviderError { e } => Self::Provider { inner: e.to_string() },
            ContractError::Revert(data) => decode_revert_error(data),
            _ => Self::Other { inner: err.to_string() },
        }
    }
}

// ethers-rs can't decode `require(false, "reason")` through the generated error enums, the
// reason comes back under the `Error(string)` selector `0x08c379a0`
pub fn decode_revert_string(data: &Bytes) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let (error_sig, reason) = data.split_at(4);
    if error_sig == [0x08, 0xc3, 0x79, 0xa0] {
        <String as AbiDecode>::decode(reason).ok()
    } else {
        None
    }
}

/// Converts entry point revert data into an error
///
/// `FailedOp(uint256,string)` has the same selector in every supported version. The v0.7
/// `FailedOpWithRevert` keeps the inner revert data after the reason.
pub fn decode_revert_error(data: Bytes) -> EntryPointError {
    if let Some(failed_op) = <FailedOp as EthError>::decode_with_selector(&data) {
        return EntryPointError::FailedOp {
            op_index: failed_op.op_index,
            reason: failed_op.reason,
        };
    }

    if let Some(failed_op) = <FailedOpWithRevert as EthError>::decode_with_selector(&data) {
        return EntryPointError::FailedOp {
            op_index: failed_op.op_index,
            reason: format!("{} {}", failed_op.reason, failed_op.inner),
        };
    }

    if let Some(reason) = decode_revert_string(&data) {
        return EntryPointError::ExecutionReverted(reason);
    }

    EntryPointError::Decode { inner: format!("revert data {data:?} can't be decoded") }
}
