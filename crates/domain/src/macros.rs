//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Platform keys and similar closed vocabularies travel as lowercase strings.
//! This macro maps each variant to its wire name and parses case-insensitively.
//!
//! # Example
//!
//! ```rust
//! use zeropush_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Relation {
//!     Next,
//!     Last,
//! }
//!
//! impl_wire_name_conversions!(Relation {
//!     Next => "next",
//!     Last => "last",
//! });
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// This macro generates:
/// - Display trait: writes the wire name of the variant
/// - FromStr trait: parses case-insensitive (and surrounding-whitespace
///   tolerant) strings to enum variants
///
/// The `FromStr` error is the rejected input, so callers can wrap it in the
/// error kind that fits their context.
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(s.to_string()),
                }
            }
        }
    };
}
