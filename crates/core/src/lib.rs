//! # ZeroPush Core
//!
//! Client logic for the ZeroPush service, free of any HTTP stack.
//!
//! This crate contains:
//! - [`PushClient`], exposing every endpoint operation
//! - The credential gate, quota tracking, fan-out and pagination engines
//! - The [`Transport`] port that infrastructure adapters implement
//!
//! ## Architecture Principles
//! - Depends on `zeropush-domain` and `zeropush-common` only
//! - All network I/O goes through [`Transport`]
//! - Arguments are validated before any request is sent

pub mod auth;
pub mod client;
pub mod encoder;
pub mod executor;
pub mod fanout;
pub mod pagination;
pub mod ports;
pub mod quota;

pub use auth::{AuthToken, CredentialGate};
pub use client::{PushClient, RegisterOptions};
pub use executor::{classify, ApiResponse, RequestExecutor};
pub use pagination::{PageCursor, PageRequest};
pub use ports::{
    HttpMethod, HttpRequest, HttpResponse, ResponseHeaders, Transport, TransportError,
};
pub use quota::QuotaTracker;
