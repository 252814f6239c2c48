//! Free-text controls: plain inputs, textarea, password, color and
//! date/time pickers.

use stockdesk_forms::{FieldDescriptor, FieldKind, FieldValue};

use super::Widget;
use crate::event::{Handled, UiEvent};
use crate::html::{html_escape, WidgetAttrs};

fn input_html(input_type: &str, field: &FieldDescriptor, class: &str, value: &str) -> String {
    let attrs = WidgetAttrs::for_field(field, class)
        .with("type", input_type)
        .with("value", value);
    format!("<input{}>", attrs.to_html())
}

fn forward_text(field: &FieldDescriptor, event: UiEvent) -> Handled {
    match event {
        UiEvent::Input(text) => {
            field.on_change(FieldValue::Text(text));
            Handled::Changed
        }
        _ => Handled::Ignored,
    }
}

/// Single-line input for text, email, url and tel fields.
#[derive(Debug, Clone)]
pub struct TextInput {
    /// The HTML input type.
    pub input_type: &'static str,
}

impl TextInput {
    /// Creates an input of the given kind's type.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            input_type: kind.as_str(),
        }
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new(FieldKind::Text)
    }
}

impl Widget for TextInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        input_html(self.input_type, field, "form-control", &field.value.to_text())
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        forward_text(field, event)
    }
}

/// Multi-line text.
#[derive(Debug, Clone)]
pub struct Textarea {
    /// Number of rows.
    pub rows: usize,
}

impl Default for Textarea {
    fn default() -> Self {
        Self { rows: 4 }
    }
}

impl Widget for Textarea {
    fn render(&self, field: &FieldDescriptor) -> String {
        let attrs = WidgetAttrs::for_field(field, "form-control").with("rows", self.rows.to_string());
        format!(
            "<textarea{}>{}</textarea>",
            attrs.to_html(),
            html_escape(&field.value.to_text())
        )
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        forward_text(field, event)
    }
}

/// Password input with a show/hide toggle.
#[derive(Debug, Clone, Default)]
pub struct PasswordInput {
    revealed: bool,
}

impl PasswordInput {
    /// Returns whether the password is shown in clear.
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

impl Widget for PasswordInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let (input_type, toggle_label) = if self.revealed {
            ("text", "Hide")
        } else {
            ("password", "Show")
        };
        let input = input_html(input_type, field, "form-control", &field.value.to_text());
        let disabled = if field.disabled { " disabled" } else { "" };
        format!(
            r#"<div class="input-group">{input}<button type="button" class="btn btn-outline-secondary" data-action="reveal" aria-pressed="{}"{disabled}>{toggle_label}</button></div>"#,
            self.revealed
        )
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        match event {
            UiEvent::ToggleReveal => {
                self.revealed = !self.revealed;
                Handled::Local
            }
            other => forward_text(field, other),
        }
    }
}

/// Native color picker. The value is the `#rrggbb` string.
#[derive(Debug, Clone, Default)]
pub struct ColorInput;

impl Widget for ColorInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let value = match field.value.to_text() {
            v if v.is_empty() => "#000000".to_string(),
            v => v,
        };
        input_html("color", field, "form-control form-control-color", &value)
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        forward_text(field, event)
    }
}

/// Native date, datetime-local or time input. The value is the input's
/// string as is.
#[derive(Debug, Clone)]
pub struct TemporalInput {
    /// The HTML input type.
    pub input_type: &'static str,
}

impl TemporalInput {
    /// Creates a picker of the given kind's type.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            input_type: kind.as_str(),
        }
    }
}

impl Widget for TemporalInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        input_html(self.input_type, field, "form-control", &field.value.to_text())
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        forward_text(field, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdesk_forms::{FieldMeta, FieldRules, FormConfig, FormEngine};

    fn engine() -> FormEngine {
        let config = FormConfig::new()
            .initial("email", "")
            .rules("email", FieldRules::new().required().email());
        FormEngine::mount(config).0
    }

    #[test]
    fn test_text_input_renders_state() {
        let engine = engine();
        let meta = FieldMeta::new("email", FieldKind::Email, "Email").placeholder("you@shop");
        engine.handle_change("email", "a<b");
        engine.handle_blur("email");

        let html = TextInput::new(FieldKind::Email).render(&engine.descriptor(&meta));
        assert!(html.contains(r#"type="email""#));
        assert!(html.contains(r#"class="form-control is-invalid""#));
        assert!(html.contains(r#"value="a&lt;b""#));
        assert!(html.contains(r#"placeholder="you@shop""#));
        assert!(html.contains(r#"required="required""#));
    }

    #[test]
    fn test_input_forwards_text() {
        let engine = engine();
        let meta = FieldMeta::new("email", FieldKind::Email, "Email");
        let mut widget = TextInput::new(FieldKind::Email);

        let handled = widget.handle(&engine.descriptor(&meta), UiEvent::Input("a@b.co".into()));
        assert_eq!(handled, Handled::Changed);
        assert_eq!(engine.value("email"), Some(FieldValue::from("a@b.co")));

        let handled = widget.handle(&engine.descriptor(&meta), UiEvent::Toggle(true));
        assert_eq!(handled, Handled::Ignored);
    }

    #[test]
    fn test_password_reveal_is_local() {
        let engine = engine();
        let meta = FieldMeta::new("email", FieldKind::Password, "Password");
        let mut widget = PasswordInput::default();
        let field = engine.descriptor(&meta);

        assert!(widget.render(&field).contains(r#"type="password""#));
        assert_eq!(widget.handle(&field, UiEvent::ToggleReveal), Handled::Local);
        assert!(widget.is_revealed());
        assert!(widget.render(&field).contains(r#"type="text""#));
        assert_eq!(engine.value("email"), Some(FieldValue::from("")));
    }

    #[test]
    fn test_textarea_escapes_content() {
        let engine = engine();
        engine.handle_change("email", "<b>hi</b>");
        let meta = FieldMeta::new("email", FieldKind::Textarea, "Notes");
        let html = Textarea::default().render(&engine.descriptor(&meta));
        assert!(html.contains(r#"rows="4""#));
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;</textarea>"));
    }

    #[test]
    fn test_color_defaults_to_black() {
        let engine = engine();
        let meta = FieldMeta::new("email", FieldKind::Color, "Color");
        let html = ColorInput.render(&engine.descriptor(&meta));
        assert!(html.contains(r##"value="#000000""##));
    }
}
