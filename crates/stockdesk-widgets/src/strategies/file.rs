//! File picker. The value is the raw list of picked file handles.

use stockdesk_forms::{FieldDescriptor, FieldValue};

use super::Widget;
use crate::event::{Handled, UiEvent};
use crate::html::{html_escape, WidgetAttrs};

#[derive(Debug, Clone, Default)]
pub struct FileInput {
    /// Whether several files may be picked.
    pub multiple: bool,
    /// Accepted types, as in the `accept` attribute.
    pub accept: Option<String>,
}

impl Widget for FileInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let mut attrs = WidgetAttrs::for_field(field, "form-control").with("type", "file");
        attrs.remove("placeholder");
        if self.multiple {
            attrs.flag("multiple");
        }
        if let Some(accept) = &self.accept {
            attrs.set("accept", accept);
        }

        let picked: String = field
            .value
            .as_files()
            .unwrap_or_default()
            .iter()
            .map(|file| format!("<li>{}</li>", html_escape(&file.name)))
            .collect();
        if picked.is_empty() {
            format!("<input{}>", attrs.to_html())
        } else {
            format!(
                r#"<input{}><ul class="list-unstyled small mt-1 mb-0">{picked}</ul>"#,
                attrs.to_html()
            )
        }
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        match event {
            UiEvent::Files(files) => {
                field.on_change(FieldValue::Files(files));
                Handled::Changed
            }
            _ => Handled::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdesk_forms::{FieldKind, FieldMeta, FileHandle, FormConfig, FormEngine};

    #[test]
    fn test_files_forwarded_raw() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = FieldMeta::new("invoice", FieldKind::File, "Invoice");
        let mut widget = FileInput {
            accept: Some("application/pdf".into()),
            ..FileInput::default()
        };
        let pdf = FileHandle::new("march.pdf", 2048).mime("application/pdf");

        let handled = widget.handle(&engine.descriptor(&meta), UiEvent::Files(vec![pdf.clone()]));
        assert_eq!(handled, Handled::Changed);
        assert_eq!(engine.value("invoice"), Some(FieldValue::Files(vec![pdf])));

        let html = widget.render(&engine.descriptor(&meta));
        assert!(html.contains(r#"type="file""#));
        assert!(html.contains(r#"accept="application/pdf""#));
        assert!(html.contains("<li>march.pdf</li>"));
    }
}
