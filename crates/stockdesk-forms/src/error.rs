//! Error types for forms.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status the remote side uses to signal field-level validation failure.
pub const UNPROCESSABLE_ENTITY: u16 = 422;

/// Configuration errors raised while building a form.
#[derive(Debug, Error)]
pub enum FormError {
    /// A `pattern` rule does not compile.
    #[error("invalid pattern for field {field}: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// The same field name is declared twice in a schema.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    /// A choice field was declared without options.
    #[error("field {0} requires options")]
    MissingOptions(String),

    /// The schema document could not be parsed.
    #[error("failed to parse form schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Failures reported by loader and submit callbacks.
///
/// Callbacks return these instead of throwing; the engine converts them into
/// field errors (the 422 case) or leaves the error map alone.
#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    /// The remote side answered with an error status.
    #[error("remote rejected the request with status {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Field-scoped messages, when the remote side sent any.
        errors: Option<BTreeMap<String, String>>,
    },

    /// The request never produced a usable answer.
    #[error("transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    /// Builds the 422 rejection carrying field messages.
    pub fn unprocessable<I, K, V>(errors: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Rejected {
            status: UNPROCESSABLE_ENTITY,
            errors: Some(
                errors
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Returns the field messages if this is a 422 rejection with a payload.
    pub fn field_errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Rejected {
                status: UNPROCESSABLE_ENTITY,
                errors: Some(errors),
            } => Some(errors),
            _ => None,
        }
    }
}

/// Error messages keyed by field name, at most one per field.
///
/// Empty messages are never stored: setting one removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the error for a field, replacing any previous one.
    pub fn set(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        if message.is_empty() {
            self.errors.remove(field);
        } else {
            self.errors.insert(field.to_string(), message);
        }
    }

    /// Removes the error for a field, returning it.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.errors.remove(field)
    }

    /// Removes every error.
    pub fn clear(&mut self) {
        self.errors.clear();
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns the error for a specific field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Returns whether a field has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationErrors {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            let field: String = field.into();
            errors.set(&field, message);
        }
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, message) in &self.errors {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
