//! # ZeroPush Domain
//!
//! Domain types and models for the ZeroPush client SDK.
//!
//! This crate contains:
//! - The closed error taxonomy ([`PushError`]) and `Result` alias
//! - Notification payloads for every supported platform
//! - Quota snapshots, fan-out result sets and server response DTOs
//! - Client configuration and wire constants
//!
//! ## Architecture
//! - No dependencies on other ZeroPush crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
