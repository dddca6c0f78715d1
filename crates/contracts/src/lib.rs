//! Account abstraction (ERC-4337) entry point interfaces
//!
//! Every supported entry point version has its own bindings and an implementation of the
//! [EntryPoint] and [StakeManager] capabilities; [VersionRegistry] picks them by version token.

pub mod entry_point;
mod error;
mod gen;
pub mod registry;

pub use entry_point::{EntryPoint, StakeManager};
pub use error::{decode_revert_error, decode_revert_string, EntryPointError};
pub use registry::{
    EntryPointConstructor, StakeManagerConstructor, VersionRegistry, VersionRegistryBuilder,
};
