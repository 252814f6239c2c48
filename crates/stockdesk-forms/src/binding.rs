//! Field metadata and the binding between a form field and its renderer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::FormEngine;
use crate::value::FieldValue;

/// Input type of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Url,
    Tel,
    Password,
    Textarea,
    Number,
    Range,
    Date,
    DatetimeLocal,
    Time,
    Select,
    Multiselect,
    Checkbox,
    Radio,
    Switch,
    File,
    Chips,
    Color,
    Rating,
    Autocomplete,
}

impl FieldKind {
    /// Every field kind, in declaration order.
    pub const ALL: [Self; 21] = [
        Self::Text,
        Self::Email,
        Self::Url,
        Self::Tel,
        Self::Password,
        Self::Textarea,
        Self::Number,
        Self::Range,
        Self::Date,
        Self::DatetimeLocal,
        Self::Time,
        Self::Select,
        Self::Multiselect,
        Self::Checkbox,
        Self::Radio,
        Self::Switch,
        Self::File,
        Self::Chips,
        Self::Color,
        Self::Rating,
        Self::Autocomplete,
    ];

    /// Returns the discriminant as written in schemas and HTML.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Url => "url",
            Self::Tel => "tel",
            Self::Password => "password",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Range => "range",
            Self::Date => "date",
            Self::DatetimeLocal => "datetime-local",
            Self::Time => "time",
            Self::Select => "select",
            Self::Multiselect => "multiselect",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Switch => "switch",
            Self::File => "file",
            Self::Chips => "chips",
            Self::Color => "color",
            Self::Rating => "rating",
            Self::Autocomplete => "autocomplete",
        }
    }

    /// Returns whether the kind picks from a list of options.
    pub fn needs_options(self) -> bool {
        matches!(
            self,
            Self::Select | Self::Multiselect | Self::Radio | Self::Autocomplete
        )
    }

    /// Value a field of this kind starts with when none is configured.
    pub fn empty_value(self) -> FieldValue {
        match self {
            Self::Text
            | Self::Email
            | Self::Url
            | Self::Tel
            | Self::Password
            | Self::Textarea
            | Self::Date
            | Self::DatetimeLocal
            | Self::Time
            | Self::Select
            | Self::Radio
            | Self::Color
            | Self::Autocomplete => FieldValue::Text(String::new()),
            Self::Multiselect | Self::Chips => FieldValue::List(Vec::new()),
            Self::Checkbox | Self::Switch => FieldValue::Bool(false),
            Self::Number | Self::Range | Self::File | Self::Rating => FieldValue::Null,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `{value, label}` choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Value committed to the form.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl FieldOption {
    /// Creates an option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Static presentation metadata of a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    /// Field name.
    pub name: String,
    /// Input type.
    #[serde(rename = "type", default)]
    pub kind: FieldKind,
    /// Field label.
    #[serde(default)]
    pub label: String,
    /// Placeholder text.
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Help text shown below the input.
    #[serde(default)]
    pub helper_text: Option<String>,
    /// Icon name shown before the input.
    #[serde(default)]
    pub icon: Option<String>,
    /// Marks the field as required even without a `required` rule.
    #[serde(default)]
    pub required: bool,
    /// Whether the field is disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Choices for option-based kinds.
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

impl FieldMeta {
    /// Creates metadata for a field.
    pub fn new(name: impl Into<String>, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets the placeholder.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Sets help text.
    #[must_use]
    pub fn helper_text(mut self, text: impl Into<String>) -> Self {
        self.helper_text = Some(text.into());
        self
    }

    /// Sets the icon.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Makes the field required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Disables the field.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Adds a choice.
    #[must_use]
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(FieldOption::new(value, label));
        self
    }

    /// Replaces the choices.
    #[must_use]
    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }
}

/// One named field of a form.
///
/// Renderers reach the engine only through [`on_change`](Self::on_change)
/// and [`on_blur`](Self::on_blur).
#[derive(Debug, Clone)]
pub struct FieldBinding {
    engine: FormEngine,
    name: String,
}

impl FieldBinding {
    pub(crate) fn new(engine: FormEngine, name: String) -> Self {
        Self { engine, name }
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current value, null when unset.
    pub fn value(&self) -> FieldValue {
        self.engine.value(&self.name).unwrap_or_default()
    }

    /// Returns the current error.
    pub fn error(&self) -> Option<String> {
        self.engine.get_error(&self.name)
    }

    /// Forwards a canonical value to the engine.
    pub fn on_change(&self, value: impl Into<FieldValue>) {
        self.engine.handle_change(&self.name, value);
    }

    /// Forwards a blur to the engine.
    pub fn on_blur(&self) {
        self.engine.handle_blur(&self.name);
    }

    /// Builds the descriptor for the current render pass.
    pub fn descriptor(&self, meta: &FieldMeta) -> FieldDescriptor {
        let rule_required = self
            .engine
            .rules(&self.name)
            .is_some_and(|rules| rules.is_required());
        let options = if meta.kind.needs_options() {
            meta.options.clone()
        } else {
            Vec::new()
        };

        FieldDescriptor {
            kind: meta.kind,
            name: self.name.clone(),
            value: self.value(),
            label: meta.label.clone(),
            placeholder: meta.placeholder.clone(),
            required: meta.required || rule_required,
            disabled: meta.disabled,
            error: self.error(),
            helper_text: meta.helper_text.clone(),
            icon: meta.icon.clone(),
            options,
            binding: self.clone(),
        }
    }
}

/// Render-time view of one field, rebuilt on every render pass.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Input type.
    pub kind: FieldKind,
    /// Field name.
    pub name: String,
    /// Current value.
    pub value: FieldValue,
    /// Field label.
    pub label: String,
    /// Placeholder text.
    pub placeholder: Option<String>,
    /// Whether the field is required.
    pub required: bool,
    /// Whether the field is disabled.
    pub disabled: bool,
    /// Current error message.
    pub error: Option<String>,
    /// Help text.
    pub helper_text: Option<String>,
    /// Icon name.
    pub icon: Option<String>,
    /// Choices; empty for kinds that take none.
    pub options: Vec<FieldOption>,
    binding: FieldBinding,
}

impl FieldDescriptor {
    /// Forwards a canonical value to the owning engine.
    pub fn on_change(&self, value: impl Into<FieldValue>) {
        self.binding.on_change(value);
    }

    /// Forwards a blur to the owning engine.
    pub fn on_blur(&self) {
        self.binding.on_blur();
    }

    /// Looks up the option with the given value.
    pub fn option(&self, value: &str) -> Option<&FieldOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FormConfig, FormEngine};
    use crate::validation::FieldRules;

    #[test]
    fn test_kind_serde_names() {
        for kind in FieldKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        let kind: FieldKind = serde_json::from_str("\"datetime-local\"").unwrap();
        assert_eq!(kind, FieldKind::DatetimeLocal);
    }

    #[test]
    fn test_descriptor_reflects_state() {
        let config = FormConfig::new()
            .initial("name", "")
            .rules("name", FieldRules::new().required());
        let (engine, _load) = FormEngine::mount(config);
        let meta = FieldMeta::new("name", FieldKind::Text, "Name")
            .placeholder("Full name")
            .option("ignored", "Ignored");

        engine.handle_blur("name");
        let field = engine.descriptor(&meta);
        assert!(field.required);
        assert_eq!(field.error.as_deref(), Some("This field is required."));
        assert!(field.options.is_empty());
        assert_eq!(field.placeholder.as_deref(), Some("Full name"));

        field.on_change("Ada");
        let field = engine.descriptor(&meta);
        assert_eq!(field.value, FieldValue::from("Ada"));
        assert_eq!(field.error, None);
    }

    #[test]
    fn test_binding_forwards_blur() {
        let config = FormConfig::new().rules("qty", FieldRules::new().min(1.0));
        let (engine, _load) = FormEngine::mount(config);
        let qty = engine.field("qty");
        qty.on_change("0.5");
        qty.on_blur();
        assert!(qty.error().is_some());
        assert_eq!(qty.name(), "qty");
    }

    #[test]
    fn test_options_kept_for_choice_kinds() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = FieldMeta::new("status", FieldKind::Select, "Status")
            .option("paid", "Paid")
            .option("due", "Due");
        let field = engine.descriptor(&meta);
        assert_eq!(field.options.len(), 2);
        assert_eq!(field.option("due").map(|o| o.label.as_str()), Some("Due"));
        assert_eq!(field.value, FieldValue::Null);
    }
}
