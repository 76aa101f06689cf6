//! # ZeroPush Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The `reqwest`-backed [`Transport`](zeropush_core::Transport)
//! - Configuration loading from environment variables and files
//! - Tracing subscriber setup
//! - [`ZeroPushBuilder`], which wires all of the above into a
//!   [`PushClient`](zeropush_core::PushClient)
//!
//! ## Architecture
//! - Implements traits defined in `zeropush-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod builder;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use builder::ZeroPushBuilder;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, init_tracing_with, LogFormat};
