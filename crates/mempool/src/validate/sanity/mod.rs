//! Sanity module performs the replace-by-fee check of the sender's pending user operations
mod sender;

pub use sender::Sender;
