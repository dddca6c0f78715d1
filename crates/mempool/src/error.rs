use ethers::types::{Address, U256};
use kestrel_primitives::{UserOperationError, UserOperationHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type MempoolResult<T> = Result<T, MempoolError>;

/// Mempool error
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct MempoolError {
    /// The user operation hash that caused the error
    pub hash: UserOperationHash,
    /// The error kind
    pub kind: MempoolErrorKind,
}

/// Mempool error kind
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum MempoolErrorKind {
    /// User operation rejected because validation failed
    #[error(transparent)]
    InvalidUserOperation(#[from] InvalidMempoolUserOperationError),
    /// Any other error
    #[error("other error: {inner}")]
    Other {
        /// The inner error message
        inner: String,
    },
}

impl From<SanityError> for MempoolErrorKind {
    fn from(err: SanityError) -> Self {
        MempoolErrorKind::InvalidUserOperation(InvalidMempoolUserOperationError::Sanity(err))
    }
}

impl From<UserOperationError> for MempoolErrorKind {
    fn from(err: UserOperationError) -> Self {
        MempoolErrorKind::Other { inner: err.to_string() }
    }
}

/// Error when validating user operation failed
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum InvalidMempoolUserOperationError {
    /// User operation rejected because sanity check failed
    #[error(transparent)]
    Sanity(#[from] SanityError),
}

/// Error when sanity check fails
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum SanityError {
    /// Same-nonce replacement doesn't bump both fees enough
    #[error("replacement underpriced for {sender:?} nonce {nonce}: maxFeePerGas {max_fee_per_gas} (expected at least {max_fee_per_gas_expected}), maxPriorityFeePerGas {max_priority_fee_per_gas} (expected at least {max_priority_fee_per_gas_expected})")]
    ReplacementUnderpriced {
        sender: Address,
        nonce: U256,
        max_fee_per_gas: U256,
        max_fee_per_gas_expected: U256,
        max_priority_fee_per_gas: U256,
        max_priority_fee_per_gas_expected: U256,
    },
}
