//! Text input with a suggestion list filtered from the field's options.

use stockdesk_forms::{FieldDescriptor, FieldOption, FieldValue};
use tracing::trace;

use super::Widget;
use crate::event::{Handled, Key, UiEvent};
use crate::html::{field_id, html_escape, WidgetAttrs};

/// Typing filters the options by label, case-insensitively; picking a
/// suggestion commits its value and closes the list.
///
/// While typing, the typed text is the field's value. When the value is
/// replaced from outside (a reset, a load, a direct change) the query and
/// the list are dropped.
#[derive(Debug, Clone, Default)]
pub struct AutocompleteInput {
    query: String,
    open: bool,
    suggestions: Vec<FieldOption>,
    committed: Option<String>,
}

impl AutocompleteInput {
    /// Returns the text in the input.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns whether the suggestion list is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Returns the current suggestions.
    pub fn suggestions(&self) -> &[FieldOption] {
        &self.suggestions
    }

    fn close(&mut self) {
        self.open = false;
        self.suggestions.clear();
    }

    /// Whether the field still holds what this input last committed.
    fn is_current(&self, field: &FieldDescriptor) -> bool {
        self.committed.as_deref() == Some(field.value.to_text().as_str())
    }

    fn sync(&mut self, field: &FieldDescriptor) {
        if self.committed.is_some() && !self.is_current(field) {
            trace!(field = %field.name, "Autocomplete query dropped for new form value");
            self.query.clear();
            self.close();
            self.committed = None;
        }
    }

    /// Text shown in the input: the query while typing, otherwise the
    /// label of the committed option.
    fn display_text(&self, field: &FieldDescriptor) -> String {
        if !self.query.is_empty() && self.is_current(field) {
            return self.query.clone();
        }
        let value = field.value.to_text();
        field
            .option(&value)
            .map_or(value, |option| option.label.clone())
    }
}

impl Widget for AutocompleteInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let open = self.open && self.is_current(field);
        let list_id = format!("{}_suggestions", field_id(&field.name));
        let attrs = WidgetAttrs::for_field(field, "form-control")
            .with("type", "text")
            .with("autocomplete", "off")
            .with("role", "combobox")
            .with("aria-controls", list_id.as_str())
            .with("aria-expanded", open.to_string())
            .with("value", self.display_text(field));

        let list = if open {
            let items: String = self
                .suggestions
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    format!(
                        r#"<li><button type="button" class="list-group-item list-group-item-action" data-index="{i}" data-value="{}">{}</button></li>"#,
                        html_escape(&option.value),
                        html_escape(&option.label)
                    )
                })
                .collect();
            format!(
                r#"<ul class="list-group position-absolute w-100 shadow-sm" id="{}" role="listbox">{items}</ul>"#,
                html_escape(&list_id)
            )
        } else {
            String::new()
        };

        format!(
            r#"<div class="position-relative"><input{}>{list}</div>"#,
            attrs.to_html()
        )
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        self.sync(field);
        match event {
            UiEvent::Input(text) => {
                let needle = text.to_lowercase();
                self.suggestions = field
                    .options
                    .iter()
                    .filter(|option| option.label.to_lowercase().contains(&needle))
                    .cloned()
                    .collect();
                self.open = !text.is_empty() && !self.suggestions.is_empty();
                self.query = text.clone();
                self.committed = Some(text.clone());
                field.on_change(FieldValue::Text(text));
                Handled::Changed
            }
            UiEvent::Pick(index) if self.open => match self.suggestions.get(index).cloned() {
                Some(option) => {
                    self.query = option.label;
                    self.close();
                    self.committed = Some(option.value.clone());
                    field.on_change(FieldValue::Text(option.value));
                    Handled::Changed
                }
                None => Handled::Ignored,
            },
            UiEvent::KeyDown(Key::Escape) if self.open => {
                self.close();
                Handled::Local
            }
            _ => Handled::Ignored,
        }
    }

    fn blur(&mut self, field: &FieldDescriptor) -> Handled {
        self.sync(field);
        self.close();
        field.on_blur();
        Handled::Blurred
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdesk_forms::{FieldKind, FieldMeta, FormConfig, FormEngine};

    fn supplier_meta() -> FieldMeta {
        FieldMeta::new("supplier", FieldKind::Autocomplete, "Supplier")
            .option("s1", "Acme Foods")
            .option("s2", "Baker & Sons")
    }

    #[test]
    fn test_escape_closes_list() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = supplier_meta();
        let mut widget = AutocompleteInput::default();

        widget.handle(&engine.descriptor(&meta), UiEvent::Input("a".into()));
        assert!(widget.is_open());
        assert_eq!(
            widget.handle(&engine.descriptor(&meta), UiEvent::KeyDown(Key::Escape)),
            Handled::Local
        );
        assert!(!widget.is_open());
        assert_eq!(
            widget.handle(&engine.descriptor(&meta), UiEvent::Pick(0)),
            Handled::Ignored
        );
    }

    #[test]
    fn test_no_match_keeps_list_closed() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = supplier_meta();
        let mut widget = AutocompleteInput::default();

        widget.handle(&engine.descriptor(&meta), UiEvent::Input("zzz".into()));
        assert!(!widget.is_open());
        assert_eq!(engine.value("supplier"), Some(FieldValue::from("zzz")));
    }

    #[test]
    fn test_render_shows_label_of_committed_value() {
        let (engine, _load) = FormEngine::mount(FormConfig::new().initial("supplier", "s2"));
        let html = AutocompleteInput::default().render(&engine.descriptor(&supplier_meta()));
        assert!(html.contains(r#"value="Baker &amp; Sons""#));
        assert!(html.contains(r#"aria-expanded="false""#));
        assert!(!html.contains("list-group"));
    }

    #[test]
    fn test_query_dropped_when_value_replaced() {
        let (engine, _load) = FormEngine::mount(FormConfig::new().initial("supplier", ""));
        let meta = supplier_meta();
        let mut widget = AutocompleteInput::default();

        widget.handle(&engine.descriptor(&meta), UiEvent::Input("ac".into()));
        engine.handle_change("supplier", "s2");
        let html = widget.render(&engine.descriptor(&meta));
        assert!(html.contains(r#"value="Baker &amp; Sons""#));
        assert!(!html.contains("list-group"));

        assert_eq!(
            widget.handle(&engine.descriptor(&meta), UiEvent::Pick(0)),
            Handled::Ignored
        );
        assert!(widget.query().is_empty());
        assert_eq!(engine.value("supplier"), Some(FieldValue::from("s2")));
    }

    #[test]
    fn test_blur_closes_and_validates() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = supplier_meta();
        let mut widget = AutocompleteInput::default();

        widget.handle(&engine.descriptor(&meta), UiEvent::Input("ba".into()));
        assert!(widget.render(&engine.descriptor(&meta)).contains(r#"data-value="s2""#));
        assert_eq!(widget.blur(&engine.descriptor(&meta)), Handled::Blurred);
        assert!(!widget.is_open());
    }
}
