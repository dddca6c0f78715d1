//! Admission control of the user operation mempool: a user operation replacing a pending one of
//! the same sender and nonce has to bump its fees (replace-by-fee).

pub mod error;
mod utils;
pub mod validate;

pub use error::{
    InvalidMempoolUserOperationError, MempoolError, MempoolErrorKind, MempoolResult, SanityError,
};
pub use utils::calculate_valid_gas;
pub use validate::{validate_pending_ops, SanityCheck, Validator};
