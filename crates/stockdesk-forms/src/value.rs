//! Field values held by a form.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Field name to value mapping.
pub type Values = BTreeMap<String, FieldValue>;

/// A file picked through a file input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// File name as reported by the browser.
    pub name: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// MIME type, when known.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl FileHandle {
    /// Creates a handle with no MIME type.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            mime: None,
        }
    }

    /// Sets the MIME type.
    #[must_use]
    pub fn mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }
}

/// A single field value.
///
/// Deserializes from plain JSON: `null`, booleans, numbers, strings, arrays of
/// scalars (kept as text), and arrays of `{name, size, type}` objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(#[serde(deserialize_with = "scalar_list")] Vec<String>),
    Files(Vec<FileHandle>),
}

impl FieldValue {
    /// Returns whether the value counts as "nothing entered".
    ///
    /// Null, `false`, `NaN`, the empty string and empty lists are empty.
    /// Numeric zero is empty unless `zero_is_present` is set.
    pub fn is_empty(&self, zero_is_present: bool) -> bool {
        match self {
            Self::Null => true,
            Self::Bool(b) => !b,
            Self::Number(n) => n.is_nan() || (*n == 0.0 && !zero_is_present),
            Self::Text(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Files(files) => files.is_empty(),
        }
    }

    /// Like [`is_empty`](Self::is_empty), but whitespace-only text is blank too.
    pub fn is_blank(&self, zero_is_present: bool) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            other => other.is_empty(zero_is_present),
        }
    }

    /// Length used by length constraints: characters for scalars, items for lists.
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::Null | Self::Bool(_) => None,
            Self::Number(_) => Some(self.to_text().chars().count()),
            Self::Text(s) => Some(s.chars().count()),
            Self::List(items) => Some(items.len()),
            Self::Files(files) => Some(files.len()),
        }
    }

    /// String coercion.
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => format_number(*n),
            Self::Text(s) => s.clone(),
            Self::List(items) => items.join(","),
            Self::Files(files) => files
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Numeric coercion; `NaN` when the value has no numeric reading.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::Text(s) => parse_number(s),
            Self::List(items) => match items.as_slice() {
                [] => 0.0,
                [single] => parse_number(single),
                _ => f64::NAN,
            },
            Self::Files(_) => f64::NAN,
        }
    }

    /// Returns the text if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the items if this is a list value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the files if this is a file list.
    pub fn as_files(&self) -> Option<&[FileHandle]> {
        match self {
            Self::Files(files) => Some(files),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<FileHandle>> for FieldValue {
    fn from(value: Vec<FileHandle>) -> Self {
        Self::Files(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One item of a list value; any JSON scalar.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListItem {
    Text(String),
    Number(f64),
    Bool(bool),
}

fn scalar_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Vec::<ListItem>::deserialize(deserializer)?;
    Ok(items
        .into_iter()
        .map(|item| match item {
            ListItem::Text(text) => text,
            ListItem::Number(n) => format_number(n),
            ListItem::Bool(b) => b.to_string(),
        })
        .collect())
}

/// Parses user text as a number; blank text reads as zero.
fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

/// Formats a number without a trailing `.0` for whole values.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
