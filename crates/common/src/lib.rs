//! Schema validation shared by the ZeroPush client crates.
//!
//! # Safety and Quality
//!
//! This crate enforces strict safety and quality standards. It performs no
//! I/O: every check is a pure function of the value being validated.
//!
//! The [`validation::SchemaValidator`] compiles each named schema once and
//! reports field-level violations as a [`validation::ValidationError`].

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod validation;

pub use validation::{
    FieldError, FieldValidator, SchemaName, SchemaValidator, ValidationError, ValidationResult,
    Validator, ValueRule,
};
