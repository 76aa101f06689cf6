//! HTTP transport for the ZeroPush service

mod client;

pub use client::{HttpClient, HttpClientBuilder};
