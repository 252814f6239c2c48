//! Boolean controls.

use stockdesk_forms::FieldDescriptor;

use super::Widget;
use crate::event::{Handled, UiEvent};
use crate::html::{field_id, html_escape};

fn render_check(field: &FieldDescriptor, wrapper_class: &str, role: &str) -> String {
    let id = html_escape(&field_id(&field.name));
    let input_class = if field.error.is_some() {
        "form-check-input is-invalid"
    } else {
        "form-check-input"
    };
    let checked_attr = if field.value.as_bool().unwrap_or(false) {
        " checked"
    } else {
        ""
    };
    let disabled_attr = if field.disabled { " disabled" } else { "" };
    let required_marker = if field.required { " *" } else { "" };

    format!(
        r#"<div class="{}">
  <input class="{}" type="checkbox"{role} id="{}" name="{}" value="true"{checked_attr}{disabled_attr}>
  <label class="form-check-label" for="{}">{}{required_marker}</label>
</div>"#,
        wrapper_class,
        input_class,
        id,
        html_escape(&field.name),
        id,
        html_escape(&field.label)
    )
}

fn toggle(field: &FieldDescriptor, event: UiEvent) -> Handled {
    match event {
        UiEvent::Toggle(checked) => {
            field.on_change(checked);
            Handled::Changed
        }
        _ => Handled::Ignored,
    }
}

/// Checkbox with its label beside it.
#[derive(Debug, Clone, Default)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        render_check(field, "form-check", "")
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        toggle(field, event)
    }

    fn inline_label(&self) -> bool {
        true
    }
}

/// Switch-styled checkbox.
#[derive(Debug, Clone, Default)]
pub struct SwitchInput;

impl Widget for SwitchInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        render_check(field, "form-check form-switch", r#" role="switch""#)
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        toggle(field, event)
    }

    fn inline_label(&self) -> bool {
        true
    }
}
