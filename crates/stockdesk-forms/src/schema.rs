//! Declarative form schemas.
//!
//! A schema describes every field of a screen in one JSON document:
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "email", "type": "email", "label": "Email",
//!       "rules": { "required": "Email is required", "email": true } },
//!     { "name": "stock", "type": "number", "label": "Stock", "initial": 0,
//!       "rules": { "min": { "value": 0, "message": "Cannot be negative" },
//!                  "treatZeroAsPresent": true } }
//!   ]
//! }
//! ```
//!
//! Each rule is either a flag/threshold or carries its own message.

use std::collections::HashSet;

use serde::Deserialize;

use crate::binding::FieldMeta;
use crate::engine::FormConfig;
use crate::error::{FormError, Result};
use crate::validation::{
    EmailValidator, FieldRules, MaxLengthValidator, MaxValueValidator, MinLengthValidator,
    MinValueValidator, RegexValidator, RequiredValidator,
};
use crate::value::FieldValue;

const DEFAULT_PATTERN_MESSAGE: &str = "Enter a valid value.";

/// A `required`/`email` rule: a flag, or a custom message (which enables it).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FlagRule {
    Enabled(bool),
    Message(String),
}

impl FlagRule {
    fn message(&self) -> Option<Option<&str>> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) => Some(None),
            Self::Message(message) => Some(Some(message)),
        }
    }
}

/// A threshold rule, with or without a custom message.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LimitRule<T> {
    Value(T),
    WithMessage { value: T, message: String },
}

/// A pattern rule: the regex alone, or with a custom message.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PatternRule {
    Pattern(String),
    WithMessage { value: String, message: String },
}

/// Validation rules of one schema field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSpec {
    #[serde(default)]
    required: Option<FlagRule>,
    #[serde(default)]
    min_length: Option<LimitRule<usize>>,
    #[serde(default)]
    max_length: Option<LimitRule<usize>>,
    #[serde(default)]
    email: Option<FlagRule>,
    #[serde(default)]
    pattern: Option<PatternRule>,
    #[serde(default)]
    min: Option<LimitRule<f64>>,
    #[serde(default)]
    max: Option<LimitRule<f64>>,
    #[serde(default)]
    treat_zero_as_present: bool,
}

impl RuleSpec {
    /// Returns whether no constraint is declared.
    pub fn is_empty(&self) -> bool {
        self.required.as_ref().and_then(FlagRule::message).is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
            && self.email.as_ref().and_then(FlagRule::message).is_none()
            && self.pattern.is_none()
            && self.min.is_none()
            && self.max.is_none()
    }

    /// Compiles the declared rules into field rules.
    pub fn to_rules(&self, field: &str) -> Result<FieldRules> {
        let mut rules = FieldRules::new();
        if self.treat_zero_as_present {
            rules = rules.treat_zero_as_present();
        }

        if let Some(message) = self.required.as_ref().and_then(FlagRule::message) {
            rules = rules.required_with(message.map_or_else(
                RequiredValidator::new,
                RequiredValidator::with_message,
            ));
        }
        if let Some(rule) = &self.min_length {
            rules = rules.min_length(match rule {
                LimitRule::Value(n) => MinLengthValidator::new(*n),
                LimitRule::WithMessage { value, message } => {
                    MinLengthValidator::with_message(*value, message)
                }
            });
        }
        if let Some(rule) = &self.max_length {
            rules = rules.max_length(match rule {
                LimitRule::Value(n) => MaxLengthValidator::new(*n),
                LimitRule::WithMessage { value, message } => {
                    MaxLengthValidator::with_message(*value, message)
                }
            });
        }
        if let Some(message) = self.email.as_ref().and_then(FlagRule::message) {
            rules = rules.email_with(
                message.map_or_else(EmailValidator::new, EmailValidator::with_message),
            );
        }
        if let Some(rule) = &self.pattern {
            let (pattern, message) = match rule {
                PatternRule::Pattern(pattern) => (pattern.as_str(), DEFAULT_PATTERN_MESSAGE),
                PatternRule::WithMessage { value, message } => (value.as_str(), message.as_str()),
            };
            let validator =
                RegexValidator::new(pattern, message).map_err(|source| FormError::InvalidPattern {
                    field: field.to_string(),
                    source,
                })?;
            rules = rules.pattern(validator);
        }
        if let Some(rule) = &self.min {
            rules = rules.min(match rule {
                LimitRule::Value(n) => MinValueValidator::new(*n),
                LimitRule::WithMessage { value, message } => {
                    MinValueValidator::with_message(*value, message)
                }
            });
        }
        if let Some(rule) = &self.max {
            rules = rules.max(match rule {
                LimitRule::Value(n) => MaxValueValidator::new(*n),
                LimitRule::WithMessage { value, message } => {
                    MaxValueValidator::with_message(*value, message)
                }
            });
        }

        Ok(rules)
    }
}

/// One field of a schema: presentation metadata, initial value and rules.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldSchema {
    /// Presentation metadata.
    #[serde(flatten)]
    pub meta: FieldMeta,
    /// Initial value; the kind's empty value when absent.
    #[serde(default)]
    pub initial: Option<FieldValue>,
    /// Validation rules.
    #[serde(default)]
    pub rules: RuleSpec,
}

/// A whole form: fields in display order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormSchema {
    /// Fields in display order.
    pub fields: Vec<FieldSchema>,
}

impl FormSchema {
    /// Parses and checks a JSON schema.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: Self = serde_json::from_str(json)?;
        schema.check()?;
        Ok(schema)
    }

    fn check(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            let meta = &field.meta;
            if !seen.insert(meta.name.as_str()) {
                return Err(FormError::DuplicateField(meta.name.clone()));
            }
            if meta.kind.needs_options() && meta.options.is_empty() {
                return Err(FormError::MissingOptions(meta.name.clone()));
            }
        }
        Ok(())
    }

    /// Returns the presentation metadata of every field.
    pub fn metas(&self) -> Vec<FieldMeta> {
        self.fields.iter().map(|f| f.meta.clone()).collect()
    }

    /// Builds the engine configuration: initial values and rules.
    ///
    /// Loader, submit callback and entity id are added by the caller.
    pub fn config(&self) -> Result<FormConfig> {
        let mut config = FormConfig::new();
        for field in &self.fields {
            let name = field.meta.name.as_str();
            let initial = field
                .initial
                .clone()
                .unwrap_or_else(|| field.meta.kind.empty_value());
            config = config.initial(name, initial);
            if !field.rules.is_empty() {
                config = config.rules(name, field.rules.to_rules(name)?);
            }
        }
        Ok(config)
    }
}
