//! HTML helpers shared by the field strategies.

use std::collections::BTreeMap;

use ironhtml::html;
use ironhtml::typed::Element;
use ironhtml_elements::Div;
use stockdesk_forms::FieldDescriptor;

/// Attributes that can be applied to an input.
#[derive(Debug, Clone, Default)]
pub struct WidgetAttrs {
    attrs: BTreeMap<String, String>,
}

impl WidgetAttrs {
    /// Creates new empty widget attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard attributes of a field's main input: id, name, class,
    /// placeholder, and the required/disabled flags.
    ///
    /// `is-invalid` is appended to `class` while the field has an error.
    pub fn for_field(field: &FieldDescriptor, class: &str) -> Self {
        let mut attrs = Self::new()
            .with("id", field_id(&field.name))
            .with("name", &field.name);

        let class = if field.error.is_some() {
            format!("{class} is-invalid")
        } else {
            class.to_string()
        };
        attrs.set("class", class.trim());

        if let Some(placeholder) = &field.placeholder {
            attrs.set("placeholder", placeholder);
        }
        if field.required {
            attrs.flag("required");
        }
        if field.disabled {
            attrs.flag("disabled");
        }
        attrs
    }

    /// Sets an attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }

    /// Sets a boolean attribute.
    pub fn flag(&mut self, key: &str) {
        self.set(key, key);
    }

    /// Removes an attribute.
    pub fn remove(&mut self, key: &str) {
        self.attrs.remove(key);
    }

    /// Gets an attribute.
    pub fn get(&self, key: &str) -> Option<&String> {
        self.attrs.get(key)
    }

    /// Renders attributes as an HTML attribute string with a leading space.
    pub fn to_html(&self) -> String {
        self.attrs
            .iter()
            .map(|(k, v)| format!(r#" {k}="{}""#, html_escape(v)))
            .collect()
    }

    /// Builder method to set an attribute.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

/// DOM id of a field's main input.
pub fn field_id(name: &str) -> String {
    format!("id_{name}")
}

/// Escapes HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Wraps a control with its label, optional icon, error and help text.
///
/// Controls that carry their own label (checkboxes, switches) pass
/// `inline_label` so the outer label is left out.
pub fn render_field(field: &FieldDescriptor, control: &str, inline_label: bool) -> String {
    let id = field_id(&field.name);
    let required_marker = if field.required { " *" } else { "" };
    let label_text = format!("{}{}", field.label, required_marker);
    let label_html = html! {
        label.for_(#id).class("form-label") { #label_text }
    }
    .render();

    let control = match &field.icon {
        Some(icon) => format!(
            r#"<div class="input-group has-validation"><span class="input-group-text"><i class="bi bi-{}"></i></span>{control}</div>"#,
            html_escape(icon)
        ),
        None => control.to_string(),
    };

    let help_text = field.helper_text.clone();

    html! { div.class("mb-3") }
        .when(!inline_label, |d| d.raw(&label_html))
        .raw(&control)
        .children(field.error.iter(), |error, div: Element<Div>| {
            div.class("invalid-feedback d-block").text(error)
        })
        .when(help_text.is_some(), |d| {
            d.child::<Div, _>(|h| {
                h.class("form-text")
                    .text(help_text.as_deref().unwrap_or(""))
            })
        })
        .render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_widget_attrs_sorted_and_escaped() {
        let attrs = WidgetAttrs::new()
            .with("name", "q")
            .with("class", "form-control")
            .with("value", "\"x\"");
        assert_eq!(
            attrs.to_html(),
            r#" class="form-control" name="q" value="&quot;x&quot;""#
        );
    }

    #[test]
    fn test_flag_attribute() {
        let mut attrs = WidgetAttrs::new();
        attrs.flag("disabled");
        assert_eq!(attrs.get("disabled").map(String::as_str), Some("disabled"));
        attrs.remove("disabled");
        assert!(attrs.to_html().is_empty());
    }
}
