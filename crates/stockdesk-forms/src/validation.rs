//! Field validators and per-field rule sets.
//!
//! A [`FieldRules`] holds at most one validator per built-in constraint and
//! evaluates them in a fixed order, stopping at the first failure:
//! `required`, `min_length`, `max_length`, `email`, `pattern`, `min`, `max`,
//! then any custom validators in insertion order. Every constraint except
//! `required` is skipped while the value is empty.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::ValidationErrors;
use crate::value::{FieldValue, Values};

/// Rule sets keyed by field name.
pub type RuleSet = BTreeMap<String, FieldRules>;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &FieldValue) -> Result<(), String>;

    /// Returns the error message for this validator.
    fn message(&self) -> &str;
}

/// Validator that requires a non-blank value.
///
/// Numeric zero counts as missing unless `treat_zero_as_present` is set.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
    zero_is_present: bool,
}

impl RequiredValidator {
    /// Creates a new RequiredValidator with default message.
    pub fn new() -> Self {
        Self::with_message("This field is required.")
    }

    /// Creates a new RequiredValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            zero_is_present: false,
        }
    }

    /// Accepts numeric zero as a present value.
    #[must_use]
    pub fn treat_zero_as_present(mut self, enabled: bool) -> Self {
        self.zero_is_present = enabled;
        self
    }
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        if value.is_blank(self.zero_is_present) {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a maximum length.
#[derive(Debug, Clone)]
pub struct MaxLengthValidator {
    max_length: usize,
    message: String,
}

impl MaxLengthValidator {
    /// Creates a new MaxLengthValidator.
    pub fn new(max_length: usize) -> Self {
        Self {
            max_length,
            message: format!("Ensure this value has at most {max_length} characters."),
        }
    }

    /// Creates a new MaxLengthValidator with custom message.
    pub fn with_message(max_length: usize, message: impl Into<String>) -> Self {
        Self {
            max_length,
            message: message.into(),
        }
    }
}

impl Validator for MaxLengthValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match value.length() {
            Some(len) if len > self.max_length => Err(self.message.clone()),
            _ => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that enforces a minimum length.
#[derive(Debug, Clone)]
pub struct MinLengthValidator {
    min_length: usize,
    message: String,
}

impl MinLengthValidator {
    /// Creates a new MinLengthValidator.
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            message: format!("Ensure this value has at least {min_length} characters."),
        }
    }

    /// Creates a new MinLengthValidator with custom message.
    pub fn with_message(min_length: usize, message: impl Into<String>) -> Self {
        Self {
            min_length,
            message: message.into(),
        }
    }
}

impl Validator for MinLengthValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match value.length() {
            Some(len) if len < self.min_length => Err(self.message.clone()),
            _ => Ok(()),
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for email addresses.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

impl EmailValidator {
    /// Creates a new EmailValidator with default message.
    pub fn new() -> Self {
        Self::with_message("Enter a valid email address.")
    }

    /// Creates a new EmailValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        if EMAIL_PATTERN.is_match(&value.to_text()) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator using a custom regex pattern.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    pattern: Regex,
    message: String,
}

impl RegexValidator {
    /// Creates a new RegexValidator.
    pub fn new(pattern: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    /// Returns the source pattern.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Validator for RegexValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        if self.pattern.is_match(&value.to_text()) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for a numeric lower bound.
///
/// Values without a numeric reading pass.
#[derive(Debug, Clone)]
pub struct MinValueValidator {
    min: f64,
    message: String,
}

impl MinValueValidator {
    /// Creates a new MinValueValidator.
    pub fn new(min: f64) -> Self {
        Self {
            min,
            message: format!(
                "Ensure this value is greater than or equal to {}.",
                FieldValue::Number(min)
            ),
        }
    }

    /// Creates a new MinValueValidator with custom message.
    pub fn with_message(min: f64, message: impl Into<String>) -> Self {
        Self {
            min,
            message: message.into(),
        }
    }
}

impl Validator for MinValueValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        if value.to_number() < self.min {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for a numeric upper bound.
///
/// Values without a numeric reading pass.
#[derive(Debug, Clone)]
pub struct MaxValueValidator {
    max: f64,
    message: String,
}

impl MaxValueValidator {
    /// Creates a new MaxValueValidator.
    pub fn new(max: f64) -> Self {
        Self {
            max,
            message: format!(
                "Ensure this value is less than or equal to {}.",
                FieldValue::Number(max)
            ),
        }
    }

    /// Creates a new MaxValueValidator with custom message.
    pub fn with_message(max: f64, message: impl Into<String>) -> Self {
        Self {
            max,
            message: message.into(),
        }
    }
}

impl Validator for MaxValueValidator {
    fn validate(&self, value: &FieldValue) -> Result<(), String> {
        if value.to_number() > self.max {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Declared constraints for one field.
#[derive(Clone, Default)]
pub struct FieldRules {
    required: Option<RequiredValidator>,
    min_length: Option<MinLengthValidator>,
    max_length: Option<MaxLengthValidator>,
    email: Option<EmailValidator>,
    pattern: Option<RegexValidator>,
    min: Option<MinValueValidator>,
    max: Option<MaxValueValidator>,
    custom: Vec<Arc<dyn Validator>>,
    zero_is_present: bool,
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("required", &self.required)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("email", &self.email)
            .field("pattern", &self.pattern)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("zero_is_present", &self.zero_is_present)
            .finish_non_exhaustive()
    }
}

impl FieldRules {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a value, with the default message.
    #[must_use]
    pub fn required(self) -> Self {
        self.required_with(RequiredValidator::new())
    }

    /// Requires a value, using the given validator's message.
    #[must_use]
    pub fn required_with(mut self, validator: RequiredValidator) -> Self {
        self.required = Some(validator.treat_zero_as_present(self.zero_is_present));
        self
    }

    /// Sets the minimum length.
    #[must_use]
    pub fn min_length(mut self, validator: impl Into<MinLengthValidator>) -> Self {
        self.min_length = Some(validator.into());
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub fn max_length(mut self, validator: impl Into<MaxLengthValidator>) -> Self {
        self.max_length = Some(validator.into());
        self
    }

    /// Requires an email address, with the default message.
    #[must_use]
    pub fn email(self) -> Self {
        self.email_with(EmailValidator::new())
    }

    /// Requires an email address, using the given validator's message.
    #[must_use]
    pub fn email_with(mut self, validator: EmailValidator) -> Self {
        self.email = Some(validator);
        self
    }

    /// Requires the value to match a pattern.
    #[must_use]
    pub fn pattern(mut self, validator: RegexValidator) -> Self {
        self.pattern = Some(validator);
        self
    }

    /// Sets the numeric lower bound.
    #[must_use]
    pub fn min(mut self, validator: impl Into<MinValueValidator>) -> Self {
        self.min = Some(validator.into());
        self
    }

    /// Sets the numeric upper bound.
    #[must_use]
    pub fn max(mut self, validator: impl Into<MaxValueValidator>) -> Self {
        self.max = Some(validator.into());
        self
    }

    /// Adds a custom validator, evaluated after the built-in constraints.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.custom.push(Arc::new(validator));
        self
    }

    /// Counts numeric zero as a value instead of as missing.
    #[must_use]
    pub fn treat_zero_as_present(mut self) -> Self {
        self.zero_is_present = true;
        if let Some(required) = self.required.take() {
            self.required = Some(required.treat_zero_as_present(true));
        }
        self
    }

    /// Returns whether a `required` constraint is declared.
    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// Validates a value, returning the first failing constraint's message.
    pub fn validate(&self, value: &FieldValue) -> Option<String> {
        if let Some(required) = &self.required {
            if let Err(message) = required.validate(value) {
                return Some(message);
            }
        }

        if value.is_empty(self.zero_is_present) {
            return None;
        }

        let constraints: [Option<&dyn Validator>; 6] = [
            self.min_length.as_ref().map(|v| v as &dyn Validator),
            self.max_length.as_ref().map(|v| v as &dyn Validator),
            self.email.as_ref().map(|v| v as &dyn Validator),
            self.pattern.as_ref().map(|v| v as &dyn Validator),
            self.min.as_ref().map(|v| v as &dyn Validator),
            self.max.as_ref().map(|v| v as &dyn Validator),
        ];

        constraints
            .into_iter()
            .flatten()
            .find_map(|v| v.validate(value).err())
            .or_else(|| {
                self.custom
                    .iter()
                    .find_map(|v| v.validate(value).err())
            })
    }
}

impl From<usize> for MinLengthValidator {
    fn from(min_length: usize) -> Self {
        Self::new(min_length)
    }
}

impl From<usize> for MaxLengthValidator {
    fn from(max_length: usize) -> Self {
        Self::new(max_length)
    }
}

impl From<f64> for MinValueValidator {
    fn from(min: f64) -> Self {
        Self::new(min)
    }
}

impl From<f64> for MaxValueValidator {
    fn from(max: f64) -> Self {
        Self::new(max)
    }
}

/// Validates one value against its rules.
pub fn validate_field(rules: &FieldRules, value: &FieldValue) -> Option<String> {
    rules.validate(value)
}

/// Validates every field that has rules and returns the complete error map.
///
/// Fields missing from `values` are validated as null.
pub fn validate_form(rules: &RuleSet, values: &Values) -> ValidationErrors {
    rules
        .iter()
        .filter_map(|(name, field_rules)| {
            let value = values.get(name).unwrap_or(&FieldValue::Null);
            field_rules
                .validate(value)
                .map(|message| (name.as_str(), message))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validator() {
        let v = RequiredValidator::new();
        assert!(v.validate(&"hello".into()).is_ok());
        assert!(v.validate(&"".into()).is_err());
        assert!(v.validate(&"   ".into()).is_err());
        assert!(v.validate(&FieldValue::Null).is_err());
    }

    #[test]
    fn test_required_rejects_zero_by_default() {
        let rules = FieldRules::new().required();
        assert!(validate_field(&rules, &"".into()).is_some());
        assert!(validate_field(&rules, &"   ".into()).is_some());
        assert!(validate_field(&rules, &0.into()).is_some());
    }

    #[test]
    fn test_treat_zero_as_present_either_order() {
        let before = FieldRules::new().treat_zero_as_present().required();
        let after = FieldRules::new().required().treat_zero_as_present();
        assert_eq!(validate_field(&before, &0.into()), None);
        assert_eq!(validate_field(&after, &0.into()), None);
        assert!(validate_field(&after, &"".into()).is_some());
    }

    #[test]
    fn test_zero_reaches_bounds_when_present() {
        let rules = FieldRules::new().treat_zero_as_present().min(1.0);
        assert!(validate_field(&rules, &0.into()).is_some());

        let quirk = FieldRules::new().min(1.0);
        assert_eq!(validate_field(&quirk, &0.into()), None);
    }

    #[test]
    fn test_max_length_validator() {
        let v = MaxLengthValidator::new(5);
        assert!(v.validate(&"hello".into()).is_ok());
        assert!(v.validate(&"hi".into()).is_ok());
        assert!(v.validate(&"hello world".into()).is_err());
    }

    #[test]
    fn test_min_length_boundary() {
        let rules = FieldRules::new().min_length(3);
        assert!(validate_field(&rules, &"ab".into()).is_some());
        assert_eq!(validate_field(&rules, &"abc".into()), None);
    }

    #[test]
    fn test_length_skipped_when_empty() {
        let rules = FieldRules::new().min_length(3);
        assert_eq!(validate_field(&rules, &"".into()), None);
        assert_eq!(validate_field(&rules, &FieldValue::Null), None);
    }

    #[test]
    fn test_email_rule() {
        let rules = FieldRules::new().email();
        assert_eq!(validate_field(&rules, &"a@b.co".into()), None);
        assert!(validate_field(&rules, &"a@b".into()).is_some());
        assert!(validate_field(&rules, &"a".into()).is_some());
        assert!(validate_field(&rules, &"a b@c.de".into()).is_some());
    }

    #[test]
    fn test_regex_validator() {
        let v = RegexValidator::new(r"^\d{4}-\d{2}-\d{2}$", "Enter a valid date.").unwrap();
        assert!(v.validate(&"2024-01-15".into()).is_ok());
        assert!(v.validate(&"not a date".into()).is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        let rules = FieldRules::new().min(0.0).max(100.0);
        assert_eq!(validate_field(&rules, &"50".into()), None);
        assert_eq!(validate_field(&rules, &100.into()), None);
        assert!(validate_field(&rules, &"-1".into()).is_some());
        assert!(validate_field(&rules, &101.into()).is_some());
        assert_eq!(
            validate_field(&rules, &"abc".into()),
            None,
            "non-numeric text has no numeric reading and passes"
        );
    }

    #[test]
    fn test_first_failure_wins() {
        let rules = FieldRules::new()
            .required_with(RequiredValidator::with_message("Name is required"))
            .min_length(MinLengthValidator::with_message(5, "Too short"))
            .email_with(EmailValidator::with_message("Bad email"));
        assert_eq!(
            validate_field(&rules, &"".into()).as_deref(),
            Some("Name is required")
        );
        assert_eq!(validate_field(&rules, &"ab".into()).as_deref(), Some("Too short"));
        assert_eq!(
            validate_field(&rules, &"abcdef".into()).as_deref(),
            Some("Bad email")
        );
    }

    #[test]
    fn test_custom_validator_runs_last() {
        struct NoAdmin;

        impl Validator for NoAdmin {
            fn validate(&self, value: &FieldValue) -> Result<(), String> {
                if value.to_text() == "admin" {
                    Err(self.message().to_string())
                } else {
                    Ok(())
                }
            }

            fn message(&self) -> &str {
                "Reserved name."
            }
        }

        let rules = FieldRules::new().max_length(3).validator(NoAdmin);
        assert_eq!(
            validate_field(&rules, &"admin".into()).as_deref(),
            Some("Ensure this value has at most 3 characters.")
        );
        let rules = FieldRules::new().validator(NoAdmin);
        assert_eq!(
            validate_field(&rules, &"admin".into()).as_deref(),
            Some("Reserved name.")
        );
    }

    #[test]
    fn test_validate_form_replaces_whole_map() {
        let rules: RuleSet = [
            ("name".to_string(), FieldRules::new().required()),
            ("email".to_string(), FieldRules::new().email()),
        ]
        .into_iter()
        .collect();

        let mut values = Values::new();
        values.insert("email".into(), "a@b.co".into());

        let errors = validate_form(&rules, &values);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("This field is required."));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn test_default_bound_messages() {
        assert_eq!(
            MinValueValidator::new(1.0).message(),
            "Ensure this value is greater than or equal to 1."
        );
        assert_eq!(
            MaxValueValidator::new(2.5).message(),
            "Ensure this value is less than or equal to 2.5."
        );
    }
}
