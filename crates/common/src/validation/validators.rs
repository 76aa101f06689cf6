// Field Validators - Reusable validation components
use std::fmt::Display;
use std::marker::PhantomData;

use regex::Regex;

/// Type alias for a boxed, shareable field validator (clippy::type_complexity)
type BoxedFieldValidator<T> = Box<dyn FieldValidator<T> + Send + Sync>;

/// Trait for field validators
pub trait FieldValidator<T> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Range validator for numeric types
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
    _phantom: PhantomData<T>,
}

impl<T> Default for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    /// Create a new range validator with no constraints
    pub fn empty() -> Self {
        Self { min: None, max: None, _phantom: PhantomData }
    }

    /// Create a new range validator with min and max values
    pub fn new(min: T, max: T) -> Self {
        Self { min: Some(min), max: Some(max), _phantom: PhantomData }
    }

    /// Set minimum value
    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self
    }

    /// Set maximum value
    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }
}

impl<T> FieldValidator<T> for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn validate(&self, value: &T) -> Result<(), String> {
        if let Some(ref min) = self.min {
            if value < min {
                return Err(format!("Value must be at least {}", min));
            }
        }

        if let Some(ref max) = self.max {
            if value > max {
                return Err(format!("Value must not exceed {}", max));
            }
        }

        Ok(())
    }
}

/// String validator with various constraints
#[derive(Debug, Clone)]
pub struct StringValidator {
    min_length: Option<usize>,
    max_length: Option<usize>,
    pattern: Option<Regex>,
    not_empty: bool,
    trim: bool,
    reject_padding: bool,
}

impl Default for StringValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StringValidator {
    /// Create a new string validator
    pub fn new() -> Self {
        Self {
            min_length: None,
            max_length: None,
            pattern: None,
            not_empty: false,
            trim: true,
            reject_padding: false,
        }
    }

    /// Require non-empty string
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Set minimum length
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set maximum length
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Set pattern to match
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Use an already compiled pattern
    pub fn regex(mut self, regex: Regex) -> Self {
        self.pattern = Some(regex);
        self
    }

    /// Set whether to trim before validation
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Reject values with leading or trailing whitespace
    pub fn no_padding(mut self) -> Self {
        self.reject_padding = true;
        self
    }
}

impl FieldValidator<String> for StringValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        <Self as FieldValidator<&str>>::validate(self, &value.as_str())
    }
}

impl FieldValidator<&str> for StringValidator {
    fn validate(&self, value: &&str) -> Result<(), String> {
        let val = if self.trim { value.trim() } else { value };

        if self.not_empty && val.is_empty() {
            return Err("Value cannot be empty".to_string());
        }

        if self.reject_padding && value.trim() != *value {
            return Err("Value must not start or end with whitespace".to_string());
        }

        if let Some(min) = self.min_length {
            if val.chars().count() < min {
                return Err(format!("Length must be at least {} characters", min));
            }
        }

        if let Some(max) = self.max_length {
            if val.chars().count() > max {
                return Err(format!("Length must not exceed {} characters", max));
            }
        }

        if let Some(ref pattern) = self.pattern {
            if !pattern.is_match(val) {
                return Err(format!("Value must match pattern: {}", pattern.as_str()));
            }
        }

        Ok(())
    }
}

/// Collection validator for vectors
pub struct CollectionValidator<T> {
    min_size: Option<usize>,
    max_size: Option<usize>,
    unique_items: bool,
    item_validator: Option<BoxedFieldValidator<T>>,
}

impl<T> std::fmt::Debug for CollectionValidator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionValidator")
            .field("min_size", &self.min_size)
            .field("max_size", &self.max_size)
            .field("unique_items", &self.unique_items)
            .field("item_validator", &self.item_validator.as_ref().map(|_| "<dyn FieldValidator>"))
            .finish()
    }
}

impl<T> Default for CollectionValidator<T>
where
    T: PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectionValidator<T>
where
    T: PartialEq,
{
    /// Create a new collection validator
    pub fn new() -> Self {
        Self { min_size: None, max_size: None, unique_items: false, item_validator: None }
    }

    /// Set minimum size
    pub fn min_size(mut self, min: usize) -> Self {
        self.min_size = Some(min);
        self
    }

    /// Set maximum size
    pub fn max_size(mut self, max: usize) -> Self {
        self.max_size = Some(max);
        self
    }

    /// Require unique items
    pub fn unique_items(mut self) -> Self {
        self.unique_items = true;
        self
    }

    /// Set a validator for individual items in the collection
    ///
    /// If an item fails validation, the error message includes the index of
    /// the failing item.
    ///
    /// # Example
    ///
    /// ```
    /// use zeropush_common::validation::{CollectionValidator, StringValidator};
    ///
    /// let validator: CollectionValidator<String> =
    ///     CollectionValidator::new().min_size(1).item_validator(StringValidator::new().not_empty());
    /// ```
    pub fn item_validator<V>(mut self, validator: V) -> Self
    where
        V: FieldValidator<T> + Send + Sync + 'static,
    {
        self.item_validator = Some(Box::new(validator));
        self
    }
}

impl<T> FieldValidator<Vec<T>> for CollectionValidator<T>
where
    T: PartialEq,
{
    fn validate(&self, value: &Vec<T>) -> Result<(), String> {
        let size = value.len();

        if let Some(min) = self.min_size {
            if size < min {
                return Err(format!("Collection must contain at least {} items", min));
            }
        }

        if let Some(max) = self.max_size {
            if size > max {
                return Err(format!("Collection must not exceed {} items", max));
            }
        }

        if self.unique_items {
            for (index, item) in value.iter().enumerate() {
                if value[..index].contains(item) {
                    return Err(format!(
                        "Collection must contain unique items (duplicate at index {})",
                        index
                    ));
                }
            }
        }

        if let Some(ref validator) = self.item_validator {
            for (index, item) in value.iter().enumerate() {
                if let Err(e) = validator.validate(item) {
                    return Err(format!("Item at index {} failed validation: {}", index, e));
                }
            }
        }

        Ok(())
    }
}
