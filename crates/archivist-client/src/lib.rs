//! Archivist client library
//!
//! Session engine for browsing and searching an exported chat archive:
//! channel history pagination, thread loading, structured search, and the
//! egui desktop shell on top of them.

pub mod chat;
pub mod config;
pub mod error;
pub mod network;
pub mod search;
pub mod state;
pub mod ui;
pub mod workspace;

#[cfg(test)]
mod test_support;

pub use config::ClientConfig;
pub use error::{ClientError, ErrorKind, Result};
pub use workspace::Workspace;
