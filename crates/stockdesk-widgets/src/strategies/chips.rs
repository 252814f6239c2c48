//! Tag entry: free-text tokens collected into a list.

use stockdesk_forms::FieldDescriptor;
use tracing::trace;

use super::Widget;
use crate::event::{Handled, Key, UiEvent};
use crate::html::{html_escape, WidgetAttrs};

/// Tag entry. Enter or comma turns the pending text into a chip; Backspace
/// on empty text removes the last chip.
///
/// The chips are kept locally and every change is mirrored to the form.
/// A value changed from outside (a load, a reset) replaces the local list
/// on the next event.
#[derive(Debug, Clone, Default)]
pub struct ChipsInput {
    chips: Vec<String>,
    pending: String,
}

impl ChipsInput {
    /// Returns the committed chips.
    pub fn chips(&self) -> &[String] {
        &self.chips
    }

    /// Returns the text not yet committed.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    fn sync(&mut self, field: &FieldDescriptor) {
        let current = field.value.as_list().unwrap_or_default();
        if current != self.chips.as_slice() {
            trace!(field = %field.name, "Chips replaced from form value");
            self.chips = current.to_vec();
        }
    }

    fn publish(&self, field: &FieldDescriptor) -> Handled {
        field.on_change(self.chips.clone());
        Handled::Changed
    }

    fn commit(&mut self, field: &FieldDescriptor) -> Handled {
        let token = self.pending.trim();
        if token.is_empty() {
            return Handled::Ignored;
        }
        self.chips.push(token.to_string());
        self.pending.clear();
        self.publish(field)
    }
}

impl Widget for ChipsInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let wrapper_class = if field.error.is_some() {
            "form-control d-flex flex-wrap gap-1 is-invalid"
        } else {
            "form-control d-flex flex-wrap gap-1"
        };
        let disabled = field.disabled;

        let chips: String = field
            .value
            .as_list()
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, chip)| {
                let chip = html_escape(chip);
                let remove = if disabled {
                    String::new()
                } else {
                    format!(
                        r#"<button type="button" class="btn-close btn-close-white ms-1" data-index="{i}" aria-label="Remove {chip}"></button>"#
                    )
                };
                format!(r#"<span class="badge text-bg-secondary">{chip}{remove}</span>"#)
            })
            .collect();

        let mut attrs = WidgetAttrs::for_field(field, "border-0 flex-grow-1")
            .with("type", "text")
            .with("value", self.pending.as_str());
        attrs.remove("name");
        attrs.remove("required");

        format!(
            r#"<div class="{wrapper_class}">{chips}<input{}></div>"#,
            attrs.to_html()
        )
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        self.sync(field);
        match event {
            UiEvent::Input(text) => {
                self.pending = text;
                Handled::Local
            }
            UiEvent::KeyDown(Key::Enter | Key::Comma) => self.commit(field),
            UiEvent::KeyDown(Key::Backspace) if self.pending.is_empty() => {
                match self.chips.pop() {
                    Some(_) => self.publish(field),
                    None => Handled::Ignored,
                }
            }
            UiEvent::Remove(index) if index < self.chips.len() => {
                self.chips.remove(index);
                self.publish(field)
            }
            _ => Handled::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdesk_forms::{FieldKind, FieldMeta, FieldValue, FormConfig, FormEngine};

    #[test]
    fn test_blank_token_not_committed() {
        let (engine, _load) = FormEngine::mount(FormConfig::new().initial("tags", Vec::<String>::new()));
        let meta = FieldMeta::new("tags", FieldKind::Chips, "Tags");
        let mut widget = ChipsInput::default();

        widget.handle(&engine.descriptor(&meta), UiEvent::Input("   ".into()));
        let handled = widget.handle(&engine.descriptor(&meta), UiEvent::KeyDown(Key::Enter));
        assert_eq!(handled, Handled::Ignored);
        assert!(widget.chips().is_empty());
        assert_eq!(engine.value("tags"), Some(FieldValue::List(Vec::new())));
    }

    #[test]
    fn test_backspace_with_pending_text_keeps_chips() {
        let (engine, _load) = FormEngine::mount(FormConfig::new().initial("tags", vec!["a"]));
        let meta = FieldMeta::new("tags", FieldKind::Chips, "Tags");
        let mut widget = ChipsInput::default();

        widget.handle(&engine.descriptor(&meta), UiEvent::Input("b".into()));
        let handled = widget.handle(&engine.descriptor(&meta), UiEvent::KeyDown(Key::Backspace));
        assert_eq!(handled, Handled::Ignored);
        assert_eq!(widget.chips(), ["a"]);
    }

    #[test]
    fn test_render_escapes_chips() {
        let (engine, _load) = FormEngine::mount(FormConfig::new().initial("tags", vec!["<x>"]));
        let meta = FieldMeta::new("tags", FieldKind::Chips, "Tags");
        let html = ChipsInput::default().render(&engine.descriptor(&meta));
        assert!(html.contains(r#"<span class="badge text-bg-secondary">&lt;x&gt;"#));
        assert!(html.contains(r#"data-index="0""#));
        assert!(!html.contains(r#"name="tags""#));
    }
}
