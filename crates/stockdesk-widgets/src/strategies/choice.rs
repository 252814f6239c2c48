//! Controls that pick from the field's options.

use stockdesk_forms::{FieldDescriptor, FieldValue};
use tracing::debug;

use super::Widget;
use crate::event::{Handled, UiEvent};
use crate::html::{field_id, html_escape, WidgetAttrs};

/// Commits `value` when it is one of the options, or the empty choice.
fn pick_one(field: &FieldDescriptor, value: String) -> Handled {
    if value.is_empty() || field.option(&value).is_some() {
        field.on_change(FieldValue::Text(value));
        Handled::Changed
    } else {
        debug!(field = %field.name, value = %value, "Ignoring value outside the options");
        Handled::Ignored
    }
}

/// Drop-down with a blank first entry.
#[derive(Debug, Clone)]
pub struct SelectInput {
    /// Label of the blank entry.
    pub blank_label: String,
}

impl Default for SelectInput {
    fn default() -> Self {
        Self {
            blank_label: "---------".to_string(),
        }
    }
}

impl Widget for SelectInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let mut attrs = WidgetAttrs::for_field(field, "form-select");
        attrs.remove("placeholder");

        let blank = field.placeholder.as_deref().unwrap_or(&self.blank_label);
        let current = field.value.to_text();
        let mut options = format!(r#"<option value="">{}</option>"#, html_escape(blank));
        for option in &field.options {
            let selected_attr = if option.value == current { " selected" } else { "" };
            options.push_str(&format!(
                r#"<option value="{}"{selected_attr}>{}</option>"#,
                html_escape(&option.value),
                html_escape(&option.label)
            ));
        }

        format!("<select{}>{options}</select>", attrs.to_html())
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        match event {
            UiEvent::Input(value) => pick_one(field, value),
            _ => Handled::Ignored,
        }
    }
}

/// List box allowing several options. The value is the list of selected
/// option values.
#[derive(Debug, Clone, Default)]
pub struct MultiSelectInput;

impl Widget for MultiSelectInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let mut attrs = WidgetAttrs::for_field(field, "form-select");
        attrs.remove("placeholder");
        attrs.flag("multiple");
        // The browser posts repeated keys for multi-selects.
        attrs.set("name", format!("{}[]", field.name));

        let selected = field.value.as_list().unwrap_or_default();
        let options: String = field
            .options
            .iter()
            .map(|option| {
                let selected_attr = if selected.contains(&option.value) {
                    " selected"
                } else {
                    ""
                };
                format!(
                    r#"<option value="{}"{selected_attr}>{}</option>"#,
                    html_escape(&option.value),
                    html_escape(&option.label)
                )
            })
            .collect();

        format!("<select{}>{options}</select>", attrs.to_html())
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        match event {
            UiEvent::SelectMany(values) => {
                let mut picked: Vec<String> = Vec::with_capacity(values.len());
                for value in values {
                    if field.option(&value).is_some() && !picked.contains(&value) {
                        picked.push(value);
                    }
                }
                field.on_change(picked);
                Handled::Changed
            }
            _ => Handled::Ignored,
        }
    }
}

/// One radio button per option.
#[derive(Debug, Clone, Default)]
pub struct RadioGroup {
    /// Whether to display the radios inline.
    pub inline: bool,
}

impl Widget for RadioGroup {
    fn render(&self, field: &FieldDescriptor) -> String {
        let wrapper_class = if self.inline {
            "form-check form-check-inline"
        } else {
            "form-check"
        };
        let input_class = if field.error.is_some() {
            "form-check-input is-invalid"
        } else {
            "form-check-input"
        };
        let disabled_attr = if field.disabled { " disabled" } else { "" };
        let current = field.value.to_text();
        let base_id = field_id(&field.name);

        let mut html = String::new();
        for (i, option) in field.options.iter().enumerate() {
            let id = format!("{base_id}_{i}");
            let checked_attr = if option.value == current { " checked" } else { "" };
            html.push_str(&format!(
                r#"<div class="{}">
  <input class="{}" type="radio" id="{}" name="{}" value="{}"{checked_attr}{disabled_attr}>
  <label class="form-check-label" for="{}">{}</label>
</div>
"#,
                wrapper_class,
                input_class,
                html_escape(&id),
                html_escape(&field.name),
                html_escape(&option.value),
                html_escape(&id),
                html_escape(&option.label)
            ));
        }

        html
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        match event {
            UiEvent::Input(value) => pick_one(field, value),
            _ => Handled::Ignored,
        }
    }
}
