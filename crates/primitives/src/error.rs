use thiserror::Error;

/// Errors raised while packing a user operation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UserOperationError {
    /// The ABI tokens do not match the static parameter table of the version
    #[error("abi encoding error: {inner}")]
    Encoding {
        /// The inner error message
        inner: String,
    },
}
