//! A whole form screen: the engine plus one renderer per field.

use std::collections::HashMap;

use ironhtml::html;
use ironhtml_elements::Div;
use stockdesk_forms::{FieldDescriptor, FieldMeta, FormEngine};
use tracing::warn;

use crate::event::{Handled, UiEvent};
use crate::renderer::FieldRenderer;

/// Binds field metadata to a form engine and renders the complete form.
#[derive(Debug)]
pub struct FormView {
    engine: FormEngine,
    fields: Vec<FieldMeta>,
    renderers: HashMap<String, FieldRenderer>,
    action: String,
    method: String,
}

impl FormView {
    /// Creates a view over `engine` drawing `fields` in order.
    pub fn new(engine: FormEngine, fields: Vec<FieldMeta>) -> Self {
        let renderers = fields
            .iter()
            .map(|meta| (meta.name.clone(), FieldRenderer::for_kind(meta.kind)))
            .collect();
        Self {
            engine,
            fields,
            renderers,
            action: String::new(),
            method: "post".to_string(),
        }
    }

    /// Sets the form's `action` attribute.
    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Sets the form's `method` attribute.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Returns the engine.
    pub fn engine(&self) -> &FormEngine {
        &self.engine
    }

    /// Returns the field metadata in display order.
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    /// Returns the renderer of a field.
    pub fn renderer(&self, name: &str) -> Option<&FieldRenderer> {
        self.renderers.get(name)
    }

    /// Builds the current descriptor of a field.
    pub fn descriptor(&self, name: &str) -> Option<FieldDescriptor> {
        self.meta(name).map(|meta| self.engine.descriptor(meta))
    }

    fn meta(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|meta| meta.name == name)
    }

    /// Routes a raw event to the renderer of field `name`.
    pub fn dispatch(&mut self, name: &str, event: UiEvent) -> Handled {
        let Some(meta) = self.fields.iter().find(|meta| meta.name == name) else {
            warn!(field = %name, "Event for unknown field");
            return Handled::Ignored;
        };
        let field = self.engine.descriptor(meta);
        let renderer = self
            .renderers
            .entry(meta.name.clone())
            .or_insert_with(|| FieldRenderer::for_kind(meta.kind));
        if !renderer.draws(meta.kind) {
            *renderer = FieldRenderer::for_kind(meta.kind);
        }
        renderer.handle(&field, event)
    }

    /// Renders the whole form.
    ///
    /// While the initial load runs only a spinner is shown. The submit
    /// button is disabled while a submission is in flight.
    pub fn render(&self) -> String {
        if self.engine.is_loading() {
            return html! { div.class("d-flex justify-content-center py-5") }
                .child::<Div, _>(|d| {
                    d.class("spinner-border")
                        .attr("role", "status")
                        .child::<Div, _>(|s| s.class("visually-hidden").text("Loading..."))
                })
                .render();
        }

        let action = self.action.as_str();
        let method = self.method.as_str();
        let mut form = html! {
            form.action(#action).method(#method)
        };
        form = form.attr("novalidate", "novalidate");

        for meta in &self.fields {
            let field = self.engine.descriptor(meta);
            let field_html = match self.renderers.get(&meta.name) {
                Some(renderer) if renderer.draws(meta.kind) => renderer.render(&field),
                _ => FieldRenderer::for_kind(meta.kind).render(&field),
            };
            form = form.child::<Div, _>(|d| d.raw(&field_html));
        }

        let label = match (self.engine.is_submitting(), self.engine.is_editing()) {
            (true, _) => "Saving...",
            (false, true) => "Save",
            (false, false) => "Create",
        };
        let submitting = self.engine.is_submitting();
        form = form.child::<Div, _>(|d| {
            let btn = html! {
                button.type_("submit").class("btn btn-primary") {
                    #label
                }
            };
            let btn = if submitting {
                btn.attr("disabled", "disabled")
            } else {
                btn
            };
            d.raw(btn.render())
        });

        form.render()
    }
}
