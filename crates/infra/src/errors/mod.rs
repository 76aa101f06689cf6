//! Infrastructure error conversions

mod conversions;

pub use conversions::{transport_error, InfraError};
