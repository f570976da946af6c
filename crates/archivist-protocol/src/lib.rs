//! Wire types for the chat archive backend.
//!
//! Shared between the client library and its test fixtures.

pub mod messages;
pub mod types;

pub use messages::*;
pub use types::*;
