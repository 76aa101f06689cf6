// Validation Rules - Composable rules over JSON values
use std::fmt::Debug;

use serde_json::Value;

use super::validators::{CollectionValidator, FieldValidator, RangeValidator, StringValidator};
use super::Validator;

/// A rule that checks one JSON value and reports violations into a
/// [`Validator`] under `field`.
pub trait ValueRule: Send + Sync + Debug {
    /// Check `value`, recording any violation against `field`
    fn check(&self, field: &str, value: &Value, validator: &mut Validator);

    /// Short human readable description
    fn description(&self) -> String;
}

/// Any string accepted by a [`StringValidator`]
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    validator: StringValidator,
}

impl StringRule {
    pub fn new(validator: StringValidator) -> Self {
        Self { validator }
    }

    /// Non-blank string
    pub fn not_empty() -> Self {
        Self::new(StringValidator::new().not_empty())
    }

    /// Non-blank string without surrounding whitespace, for tokens and
    /// channel names
    pub fn identifier() -> Self {
        Self::new(StringValidator::new().not_empty().no_padding())
    }
}

impl ValueRule for StringRule {
    fn check(&self, field: &str, value: &Value, validator: &mut Validator) {
        match value.as_str() {
            Some(text) => validator.validate_field(field, &text, &self.validator),
            None => validator.add_error(field, "must be a string"),
        }
    }

    fn description(&self) -> String {
        "string".to_string()
    }
}

/// Integer within an optional range
#[derive(Debug, Clone, Default)]
pub struct IntegerRule {
    range: RangeValidator<i64>,
}

impl IntegerRule {
    pub fn new(range: RangeValidator<i64>) -> Self {
        Self { range }
    }

    /// Integer greater than or equal to zero
    pub fn non_negative() -> Self {
        Self::new(RangeValidator::empty().min(0))
    }
}

impl ValueRule for IntegerRule {
    fn check(&self, field: &str, value: &Value, validator: &mut Validator) {
        match value.as_i64() {
            Some(number) => validator.validate_field(field, &number, &self.range),
            None => validator.add_error(field, "must be an integer"),
        }
    }

    fn description(&self) -> String {
        "integer".to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolRule;

impl ValueRule for BoolRule {
    fn check(&self, field: &str, value: &Value, validator: &mut Validator) {
        if !value.is_boolean() {
            validator.add_error(field, "must be a boolean");
        }
    }

    fn description(&self) -> String {
        "boolean".to_string()
    }
}

/// String restricted to a fixed set of values
#[derive(Debug, Clone)]
pub struct OneOfStrings {
    allowed: Vec<String>,
    case_insensitive: bool,
}

impl OneOfStrings {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { allowed: allowed.into_iter().map(Into::into).collect(), case_insensitive: false }
    }

    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    fn accepts(&self, candidate: &str) -> bool {
        self.allowed.iter().any(|allowed| {
            if self.case_insensitive {
                allowed.eq_ignore_ascii_case(candidate)
            } else {
                allowed == candidate
            }
        })
    }
}

impl ValueRule for OneOfStrings {
    fn check(&self, field: &str, value: &Value, validator: &mut Validator) {
        match value.as_str() {
            Some(candidate) if self.accepts(candidate) => {}
            Some(_) => {
                validator.add_error(field, format!("must be one of: {}", self.allowed.join(", ")))
            }
            None => validator.add_error(field, "must be a string"),
        }
    }

    fn description(&self) -> String {
        format!("one of [{}]", self.allowed.join(", "))
    }
}

/// Array whose items are all strings, with collection constraints
#[derive(Debug, Default)]
pub struct StringArrayRule {
    collection: CollectionValidator<String>,
}

impl StringArrayRule {
    pub fn new(collection: CollectionValidator<String>) -> Self {
        Self { collection }
    }

    /// At least one item, unique, none blank or padded
    pub fn non_empty_unique() -> Self {
        Self::new(
            CollectionValidator::new()
                .min_size(1)
                .unique_items()
                .item_validator(StringValidator::new().not_empty().no_padding()),
        )
    }
}

impl ValueRule for StringArrayRule {
    fn check(&self, field: &str, value: &Value, validator: &mut Validator) {
        let Some(items) = value.as_array() else {
            validator.add_error(field, "must be an array");
            return;
        };

        let before = validator.error_count();
        validator.validate_nested(field, |v| {
            for (index, item) in items.iter().enumerate() {
                if !item.is_string() {
                    v.add_error(&format!("[{index}]"), "must be a string");
                }
            }
        });
        if validator.error_count() > before {
            return;
        }

        let strings: Vec<String> =
            items.iter().filter_map(|item| item.as_str().map(str::to_owned)).collect();
        validator.validate_field(field, &strings, &self.collection);
    }

    fn description(&self) -> String {
        "array of strings".to_string()
    }
}

/// A named property of an [`ObjectRule`]
#[derive(Debug)]
pub struct FieldSpec {
    name: String,
    required: bool,
    rule: Option<Box<dyn ValueRule>>,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, rule: impl ValueRule + 'static) -> Self {
        Self { name: name.into(), required: true, rule: Some(Box::new(rule)) }
    }

    pub fn optional(name: impl Into<String>, rule: impl ValueRule + 'static) -> Self {
        Self { name: name.into(), required: false, rule: Some(Box::new(rule)) }
    }

    /// Optional property whose value is not constrained
    pub fn any(name: impl Into<String>) -> Self {
        Self { name: name.into(), required: false, rule: None }
    }
}

/// JSON object with typed properties. Unknown properties are allowed.
#[derive(Debug, Default)]
pub struct ObjectRule {
    fields: Vec<FieldSpec>,
    require_any: Vec<String>,
}

impl ObjectRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Require at least one of `names` to be present
    pub fn require_any_of<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require_any = names.into_iter().map(Into::into).collect();
        self
    }
}

impl ValueRule for ObjectRule {
    fn check(&self, field: &str, value: &Value, validator: &mut Validator) {
        let Some(object) = value.as_object() else {
            validator.add_error(field, "must be an object");
            return;
        };

        validator.validate_nested(field, |v| {
            for spec in &self.fields {
                match (object.get(&spec.name), &spec.rule) {
                    (None, _) if spec.required => v.add_error(&spec.name, "is required"),
                    (Some(child), Some(rule)) => rule.check(&spec.name, child, v),
                    _ => {}
                }
            }

            if !self.require_any.is_empty()
                && !self.require_any.iter().any(|name| object.contains_key(name))
            {
                v.add_error(
                    "",
                    format!("must contain at least one of: {}", self.require_any.join(", ")),
                );
            }
        });
    }

    fn description(&self) -> String {
        "object".to_string()
    }
}

/// Passes when at least one inner rule passes.
///
/// When every rule fails, the violations of all of them are reported.
#[derive(Debug, Default)]
pub struct AnyOf {
    rules: Vec<Box<dyn ValueRule>>,
}

impl AnyOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn or(mut self, rule: impl ValueRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl ValueRule for AnyOf {
    fn check(&self, field: &str, value: &Value, validator: &mut Validator) {
        let mut collected = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let mut scratch = Validator::new();
            rule.check(field, value, &mut scratch);
            match scratch.finalize() {
                Ok(()) => return,
                Err(errors) => collected.push(errors),
            }
        }

        for error in collected.into_iter().flat_map(|errors| errors.errors) {
            validator.add_error(&error.field, error.message);
        }
    }

    fn description(&self) -> String {
        let names: Vec<String> = self.rules.iter().map(|rule| rule.description()).collect();
        format!("any of [{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn run(rule: &dyn ValueRule, value: Value) -> Vec<(String, String)> {
        let mut validator = Validator::new();
        rule.check("value", &value, &mut validator);
        match validator.finalize() {
            Ok(()) => Vec::new(),
            Err(errors) => errors.errors.into_iter().map(|e| (e.field, e.message)).collect(),
        }
    }

    #[test]
    fn test_string_rule() {
        assert!(run(&StringRule::not_empty(), json!("abc")).is_empty());
        assert_eq!(run(&StringRule::not_empty(), json!(3))[0].1, "must be a string");
        assert_eq!(run(&StringRule::not_empty(), json!(""))[0].1, "Value cannot be empty");
    }

    #[test]
    fn test_integer_rule() {
        assert!(run(&IntegerRule::non_negative(), json!(0)).is_empty());
        assert_eq!(run(&IntegerRule::non_negative(), json!(1.5))[0].1, "must be an integer");
        assert_eq!(run(&IntegerRule::non_negative(), json!(-1))[0].1, "Value must be at least 0");
    }

    #[test]
    fn test_one_of_strings_case_insensitive() {
        let rule = OneOfStrings::new(["android", "safari"]).case_insensitive();
        assert!(run(&rule, json!("Android")).is_empty());
        assert!(!run(&rule, json!("windows")).is_empty());
        assert!(!run(&OneOfStrings::new(["android"]), json!("ANDROID")).is_empty());
    }

    #[test]
    fn test_string_array_reports_item_paths() {
        let rule = StringArrayRule::non_empty_unique();
        assert!(run(&rule, json!(["a", "b"])).is_empty());

        let errors = run(&rule, json!(["a", 2]));
        assert_eq!(errors, vec![("value[1]".to_string(), "must be a string".to_string())]);

        assert_eq!(run(&rule, json!([])).len(), 1);
        assert_eq!(run(&rule, json!(["a", "a"])).len(), 1);
        assert_eq!(run(&rule, json!("a"))[0].1, "must be an array");
    }

    #[test]
    fn test_object_rule_required_and_nested() {
        let rule = ObjectRule::new()
            .field(FieldSpec::required("title", StringRule::not_empty()))
            .field(FieldSpec::optional("ttl", IntegerRule::non_negative()))
            .field(FieldSpec::any("extra"));

        assert!(run(&rule, json!({ "title": "t", "extra": [1, 2] })).is_empty());

        let errors = run(&rule, json!({ "ttl": -5 }));
        let fields: Vec<_> = errors.iter().map(|(f, _)| f.as_str()).collect();
        assert_eq!(fields, vec!["value.title", "value.ttl"]);
    }

    #[test]
    fn test_object_rule_require_any() {
        let rule = ObjectRule::new().require_any_of(["alert", "badge"]);
        assert!(run(&rule, json!({ "badge": "+1" })).is_empty());
        let errors = run(&rule, json!({ "other": 1 }));
        assert_eq!(errors[0].0, "value");
    }

    #[test]
    fn test_any_of() {
        let rule = AnyOf::new().or(StringRule::not_empty()).or(IntegerRule::non_negative());
        assert!(run(&rule, json!("+1")).is_empty());
        assert!(run(&rule, json!(4)).is_empty());
        assert_eq!(run(&rule, json!(true)).len(), 2);
        assert_eq!(rule.description(), "any of [string, integer]");
    }
}
