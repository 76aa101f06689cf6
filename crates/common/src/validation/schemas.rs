// Named payload schemas
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::rules::{
    AnyOf, BoolRule, FieldSpec, IntegerRule, ObjectRule, OneOfStrings, StringArrayRule,
    StringRule, ValueRule,
};
use super::validators::{CollectionValidator, StringValidator};
use super::{ValidationError, Validator};

/// Absolute or relative badge value such as `"5"`, `"+1"` or `"-2"`
static BADGE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("BADGE_REGEX pattern is valid and well-formed"));

/// Identity of a schema known to [`SchemaValidator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaName {
    DeviceTokens,
    Channels,
    Channel,
    String,
    Integer,
    Badge,
    Platform,
    AndroidNotification,
    IosMacosNotification,
    SafariNotification,
    Notification,
}

impl SchemaName {
    pub const ALL: [SchemaName; 11] = [
        SchemaName::DeviceTokens,
        SchemaName::Channels,
        SchemaName::Channel,
        SchemaName::String,
        SchemaName::Integer,
        SchemaName::Badge,
        SchemaName::Platform,
        SchemaName::AndroidNotification,
        SchemaName::IosMacosNotification,
        SchemaName::SafariNotification,
        SchemaName::Notification,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeviceTokens => "device_tokens",
            Self::Channels => "channels",
            Self::Channel => "channel",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Badge => "badge",
            Self::Platform => "platform",
            Self::AndroidNotification => "android_notification",
            Self::IosMacosNotification => "ios_macos_notification",
            Self::SafariNotification => "safari_notification",
            Self::Notification => "notification",
        }
    }

    /// Field name reported for violations at the root of the value
    fn root_field(&self) -> &'static str {
        match self {
            Self::String | Self::Integer => "value",
            Self::AndroidNotification
            | Self::IosMacosNotification
            | Self::SafariNotification
            | Self::Notification => "notification",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn android_notification() -> ObjectRule {
    ObjectRule::new()
        .field(FieldSpec::required("data", ObjectRule::new()))
        .field(FieldSpec::optional("collapse_key", StringRule::default()))
        .field(FieldSpec::optional("delay_while_idle", BoolRule))
        .field(FieldSpec::optional("time_to_live", IntegerRule::non_negative()))
}

fn badge_rule() -> StringRule {
    StringRule::new(StringValidator::new().regex(BADGE_REGEX.clone()).no_padding())
}

fn ios_macos_notification() -> ObjectRule {
    ObjectRule::new()
        .field(FieldSpec::optional(
            "alert",
            AnyOf::new().or(StringRule::default()).or(ObjectRule::new()),
        ))
        .field(FieldSpec::optional(
            "badge",
            AnyOf::new()
                .or(badge_rule())
                .or(IntegerRule::non_negative()),
        ))
        .field(FieldSpec::optional("sound", StringRule::default()))
        .field(FieldSpec::any("info"))
        .field(FieldSpec::optional("expiry", IntegerRule::non_negative()))
        .field(FieldSpec::optional("content_available", BoolRule))
        .field(FieldSpec::optional("category", StringRule::default()))
        .require_any_of(["alert", "badge", "sound", "info", "content_available"])
}

fn safari_notification() -> ObjectRule {
    ObjectRule::new()
        .field(FieldSpec::required("title", StringRule::not_empty()))
        .field(FieldSpec::required("body", StringRule::not_empty()))
        .field(FieldSpec::optional("label", StringRule::default()))
        .field(FieldSpec::optional("url_args", StringArrayRule::new(CollectionValidator::new())))
}

fn build(name: SchemaName) -> Box<dyn ValueRule> {
    match name {
        SchemaName::DeviceTokens | SchemaName::Channels => {
            Box::new(StringArrayRule::non_empty_unique())
        }
        SchemaName::Channel | SchemaName::String => Box::new(StringRule::identifier()),
        SchemaName::Integer => Box::new(IntegerRule::non_negative()),
        SchemaName::Badge => Box::new(badge_rule()),
        SchemaName::Platform => {
            Box::new(OneOfStrings::new(["android", "ios_macos", "safari"]).case_insensitive())
        }
        SchemaName::AndroidNotification => Box::new(android_notification()),
        SchemaName::IosMacosNotification => Box::new(ios_macos_notification()),
        SchemaName::SafariNotification => Box::new(safari_notification()),
        SchemaName::Notification => Box::new(
            AnyOf::new()
                .or(android_notification())
                .or(ios_macos_notification())
                .or(safari_notification()),
        ),
    }
}

/// Validates JSON values against the named schemas.
///
/// Every schema is compiled once in [`SchemaValidator::new`]; the validator
/// is immutable afterwards and can be shared behind an `Arc`.
#[derive(Debug)]
pub struct SchemaValidator {
    schemas: HashMap<SchemaName, Box<dyn ValueRule>>,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator {
    pub fn new() -> Self {
        let schemas = SchemaName::ALL.iter().map(|name| (*name, build(*name))).collect();
        Self { schemas }
    }

    /// Validate `value` against `schema`. `None` means the value is valid.
    pub fn validate(&self, value: &Value, schema: SchemaName) -> Option<ValidationError> {
        let rule = self.schemas.get(&schema)?;
        let mut validator = Validator::new();
        rule.check(schema.root_field(), value, &mut validator);
        validator.finalize().err()
    }

    /// Convenience for `validate(..).is_none()`
    pub fn is_valid(&self, value: &Value, schema: SchemaName) -> bool {
        self.validate(value, schema).is_none()
    }
}
