//! Numeric controls. Values reach the form as numbers, never as text.

use stockdesk_forms::{FieldDescriptor, FieldValue};

use super::{parse_number, Widget};
use crate::event::{Handled, UiEvent};
use crate::html::{html_escape, WidgetAttrs};

fn number_text(value: &FieldValue) -> String {
    match value {
        FieldValue::Null => String::new(),
        other => other.to_text(),
    }
}

/// Numeric input. Unparseable text becomes `0`.
#[derive(Debug, Clone, Default)]
pub struct NumberInput {
    /// Step between valid values.
    pub step: Option<f64>,
}

impl Widget for NumberInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let mut attrs = WidgetAttrs::for_field(field, "form-control")
            .with("type", "number")
            .with("value", number_text(&field.value));
        if let Some(step) = self.step {
            attrs.set("step", step.to_string());
        }
        format!("<input{}>", attrs.to_html())
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        match event {
            UiEvent::Input(raw) => {
                field.on_change(parse_number(&raw));
                Handled::Changed
            }
            _ => Handled::Ignored,
        }
    }
}

/// Slider between `min` and `max`.
#[derive(Debug, Clone)]
pub struct RangeInput {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for RangeInput {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            step: 1.0,
        }
    }
}

impl Widget for RangeInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let attrs = WidgetAttrs::for_field(field, "form-range")
            .with("type", "range")
            .with("min", self.min.to_string())
            .with("max", self.max.to_string())
            .with("step", self.step.to_string())
            .with("value", number_text(&field.value));
        format!("<input{}>", attrs.to_html())
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        match event {
            UiEvent::Input(raw) => {
                field.on_change(parse_number(&raw));
                Handled::Changed
            }
            _ => Handled::Ignored,
        }
    }
}

/// Star rating. A click sets the value directly.
#[derive(Debug, Clone)]
pub struct RatingInput {
    /// Number of stars.
    pub max: u8,
}

impl Default for RatingInput {
    fn default() -> Self {
        Self { max: 5 }
    }
}

impl RatingInput {
    fn current(&self, field: &FieldDescriptor) -> u8 {
        let n = field.value.as_number().unwrap_or(0.0);
        if n.is_nan() {
            0
        } else {
            n.round().clamp(0.0, f64::from(self.max)) as u8
        }
    }
}

impl Widget for RatingInput {
    fn render(&self, field: &FieldDescriptor) -> String {
        let current = self.current(field);
        let disabled = if field.disabled { " disabled" } else { "" };
        let stars: String = (1..=self.max)
            .map(|i| {
                let (state, icon) = if i <= current {
                    (" active", "bi bi-star-fill")
                } else {
                    ("", "bi bi-star")
                };
                format!(
                    r#"<button type="button" class="btn btn-link p-0 rating-star{state}" data-value="{i}" aria-label="{i} of {}"{disabled}><i class="{icon}"></i></button>"#,
                    self.max
                )
            })
            .collect();
        format!(
            r#"<div class="rating" id="id_{}" role="radiogroup">{stars}</div>"#,
            html_escape(&field.name)
        )
    }

    fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        match event {
            UiEvent::Rate(n) => {
                field.on_change(f64::from(n.clamp(1, self.max.max(1))));
                Handled::Changed
            }
            _ => Handled::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdesk_forms::{FieldKind, FieldMeta, FormConfig, FormEngine};

    #[test]
    fn test_number_input_stores_numbers() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = FieldMeta::new("qty", FieldKind::Number, "Quantity");
        let mut widget = NumberInput::default();

        widget.handle(&engine.descriptor(&meta), UiEvent::Input("12".into()));
        assert_eq!(engine.value("qty"), Some(FieldValue::Number(12.0)));

        widget.handle(&engine.descriptor(&meta), UiEvent::Input("abc".into()));
        assert_eq!(engine.value("qty"), Some(FieldValue::Number(0.0)));
    }

    #[test]
    fn test_number_renders_empty_for_null() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = FieldMeta::new("qty", FieldKind::Number, "Quantity");
        let html = NumberInput::default().render(&engine.descriptor(&meta));
        assert!(html.contains(r#"value="""#));
        assert!(html.contains(r#"type="number""#));
    }

    #[test]
    fn test_range_bounds_rendered() {
        let (engine, _load) = FormEngine::mount(FormConfig::new().initial("level", 30));
        let meta = FieldMeta::new("level", FieldKind::Range, "Level");
        let html = RangeInput::default().render(&engine.descriptor(&meta));
        assert!(html.contains(r#"class="form-range""#));
        assert!(html.contains(r#"max="100""#));
        assert!(html.contains(r#"value="30""#));
    }

    #[test]
    fn test_rating_sets_value_on_click() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = FieldMeta::new("score", FieldKind::Rating, "Score");
        let mut widget = RatingInput::default();

        assert_eq!(
            widget.handle(&engine.descriptor(&meta), UiEvent::Rate(4)),
            Handled::Changed
        );
        assert_eq!(engine.value("score"), Some(FieldValue::Number(4.0)));

        widget.handle(&engine.descriptor(&meta), UiEvent::Rate(9));
        assert_eq!(engine.value("score"), Some(FieldValue::Number(5.0)));

        let html = widget.render(&engine.descriptor(&meta));
        assert_eq!(html.matches("bi-star-fill").count(), 5);
    }

    #[test]
    fn test_rating_without_stars_still_accepts_one() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = FieldMeta::new("score", FieldKind::Rating, "Score");
        let mut widget = RatingInput { max: 0 };

        assert_eq!(
            widget.handle(&engine.descriptor(&meta), UiEvent::Rate(3)),
            Handled::Changed
        );
        assert_eq!(engine.value("score"), Some(FieldValue::Number(1.0)));
        assert!(!widget.render(&engine.descriptor(&meta)).contains("rating-star"));
    }

    #[test]
    fn test_rating_ignores_text() {
        let (engine, _load) = FormEngine::mount(FormConfig::new());
        let meta = FieldMeta::new("score", FieldKind::Rating, "Score");
        let mut widget = RatingInput::default();
        let handled = widget.handle(&engine.descriptor(&meta), UiEvent::Input("3".into()));
        assert_eq!(handled, Handled::Ignored);
        assert_eq!(engine.value("score"), None);
    }
}
