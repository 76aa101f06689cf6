// Validation Module - named payload schemas and field-level error reporting
use std::fmt;

mod rules;
mod schemas;
mod validators;

pub use rules::{
    AnyOf, BoolRule, FieldSpec, IntegerRule, ObjectRule, OneOfStrings, StringArrayRule,
    StringRule, ValueRule,
};
pub use schemas::{SchemaName, SchemaValidator};
pub use validators::{CollectionValidator, FieldValidator, RangeValidator, StringValidator};

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with detailed field-level errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    /// Add a field-level error
    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Check if there are any errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get errors for a specific field
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Merge another validation error into this one
    pub fn merge(&mut self, other: ValidationError) {
        self.errors.extend(other.errors);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "Validation error with no specific field errors")?;
        } else if self.errors.len() == 1 {
            write!(f, "Validation failed: {}: {}", self.errors[0].field, self.errors[0].message)?;
        } else {
            write!(f, "Validation failed with {} errors: ", self.errors.len())?;
            for (i, error) in self.errors.iter().enumerate() {
                if i > 0 {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", error.field, error.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Collects field errors while walking a value.
///
/// Tracks a path of nested field names so that errors raised inside objects
/// and arrays are reported as `parent.child` / `parent[2]`.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationError,
    path: Vec<String>,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    fn qualify(&self, field: &str) -> String {
        let mut full = self.path.join(".");
        if !field.is_empty() {
            if !full.is_empty() && !field.starts_with('[') {
                full.push('.');
            }
            full.push_str(field);
        }
        full
    }

    /// Add an error for `field`, relative to the current path
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        let field = self.qualify(field);
        self.errors.add_field_error(field, message);
    }

    /// Validate a field with a specific validator
    pub fn validate_field<T, V>(&mut self, field: &str, value: &T, validator: &V)
    where
        V: FieldValidator<T> + ?Sized,
    {
        if let Err(msg) = validator.validate(value) {
            self.add_error(field, msg);
        }
    }

    /// Validate minimum value
    pub fn validate_min<T>(&mut self, field: &str, value: T, min: T)
    where
        T: PartialOrd + fmt::Display,
    {
        if value < min {
            self.add_error(field, format!("must be at least {}", min));
        }
    }

    /// Validate string is not empty
    pub fn validate_not_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add_error(field, "cannot be empty");
        }
    }

    /// Run `f` with `field` pushed onto the path
    pub fn validate_nested<F>(&mut self, field: &str, f: F)
    where
        F: FnOnce(&mut Validator),
    {
        let pushed = !field.is_empty();
        if pushed {
            let segment = self.qualify(field);
            let previous = std::mem::replace(&mut self.path, vec![segment]);
            f(self);
            self.path = previous;
        } else {
            f(self);
        }
    }

    /// Check if validation has errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get error count
    pub fn error_count(&self) -> usize {
        self.errors.error_count()
    }

    /// Get errors without consuming validator
    pub fn errors(&self) -> &ValidationError {
        &self.errors
    }

    /// Finalize and return result
    pub fn finalize(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
