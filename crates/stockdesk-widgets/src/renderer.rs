//! The polymorphic field renderer.

use stockdesk_forms::{FieldDescriptor, FieldKind};
use tracing::{debug, trace};

use crate::event::{Handled, UiEvent};
use crate::html::render_field;
use crate::strategies::{
    AutocompleteInput, CheckboxInput, ChipsInput, ColorInput, FileInput, MultiSelectInput,
    NumberInput, PasswordInput, RadioGroup, RangeInput, RatingInput, SelectInput, SwitchInput,
    TemporalInput, TextInput, Textarea, Widget,
};

/// Renders one field and normalizes its events, choosing the control from
/// the field's kind.
///
/// Each variant owns the state its control needs between events, so a
/// renderer lives as long as the field it draws.
#[derive(Debug, Clone)]
pub enum FieldRenderer {
    Text(TextInput),
    Textarea(Textarea),
    Password(PasswordInput),
    Number(NumberInput),
    Range(RangeInput),
    Temporal(TemporalInput),
    Select(SelectInput),
    MultiSelect(MultiSelectInput),
    Checkbox(CheckboxInput),
    Switch(SwitchInput),
    Radio(RadioGroup),
    File(FileInput),
    Color(ColorInput),
    Rating(RatingInput),
    Chips(ChipsInput),
    Autocomplete(AutocompleteInput),
}

impl FieldRenderer {
    /// Creates the renderer for a field kind.
    pub fn for_kind(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text | FieldKind::Email | FieldKind::Url | FieldKind::Tel => {
                Self::Text(TextInput::new(kind))
            }
            FieldKind::Textarea => Self::Textarea(Textarea::default()),
            FieldKind::Password => Self::Password(PasswordInput::default()),
            FieldKind::Number => Self::Number(NumberInput::default()),
            FieldKind::Range => Self::Range(RangeInput::default()),
            FieldKind::Date | FieldKind::DatetimeLocal | FieldKind::Time => {
                Self::Temporal(TemporalInput::new(kind))
            }
            FieldKind::Select => Self::Select(SelectInput::default()),
            FieldKind::Multiselect => Self::MultiSelect(MultiSelectInput),
            FieldKind::Checkbox => Self::Checkbox(CheckboxInput),
            FieldKind::Switch => Self::Switch(SwitchInput),
            FieldKind::Radio => Self::Radio(RadioGroup::default()),
            FieldKind::File => Self::File(FileInput::default()),
            FieldKind::Color => Self::Color(ColorInput),
            FieldKind::Rating => Self::Rating(RatingInput::default()),
            FieldKind::Chips => Self::Chips(ChipsInput::default()),
            FieldKind::Autocomplete => Self::Autocomplete(AutocompleteInput::default()),
        }
    }

    fn widget(&self) -> &dyn Widget {
        match self {
            Self::Text(w) => w,
            Self::Textarea(w) => w,
            Self::Password(w) => w,
            Self::Number(w) => w,
            Self::Range(w) => w,
            Self::Temporal(w) => w,
            Self::Select(w) => w,
            Self::MultiSelect(w) => w,
            Self::Checkbox(w) => w,
            Self::Switch(w) => w,
            Self::Radio(w) => w,
            Self::File(w) => w,
            Self::Color(w) => w,
            Self::Rating(w) => w,
            Self::Chips(w) => w,
            Self::Autocomplete(w) => w,
        }
    }

    fn widget_mut(&mut self) -> &mut dyn Widget {
        match self {
            Self::Text(w) => w,
            Self::Textarea(w) => w,
            Self::Password(w) => w,
            Self::Number(w) => w,
            Self::Range(w) => w,
            Self::Temporal(w) => w,
            Self::Select(w) => w,
            Self::MultiSelect(w) => w,
            Self::Checkbox(w) => w,
            Self::Switch(w) => w,
            Self::Radio(w) => w,
            Self::File(w) => w,
            Self::Color(w) => w,
            Self::Rating(w) => w,
            Self::Chips(w) => w,
            Self::Autocomplete(w) => w,
        }
    }

    /// Returns whether this renderer draws fields of `kind`.
    pub fn draws(&self, kind: FieldKind) -> bool {
        match self {
            Self::Text(w) => w.input_type == kind.as_str(),
            Self::Temporal(w) => w.input_type == kind.as_str(),
            other => std::mem::discriminant(other) == std::mem::discriminant(&Self::for_kind(kind)),
        }
    }

    /// Renders the field: label, control, error and help text.
    pub fn render(&self, field: &FieldDescriptor) -> String {
        let widget = self.widget();
        render_field(field, &widget.render(field), widget.inline_label())
    }

    /// Renders the control alone.
    pub fn render_control(&self, field: &FieldDescriptor) -> String {
        self.widget().render(field)
    }

    /// Handles one raw event from the field's control.
    ///
    /// Disabled fields ignore every event.
    pub fn handle(&mut self, field: &FieldDescriptor, event: UiEvent) -> Handled {
        if field.disabled {
            trace!(field = %field.name, "Event on disabled field ignored");
            return Handled::Ignored;
        }
        let widget = self.widget_mut();
        let handled = match event {
            UiEvent::Blur => widget.blur(field),
            event => widget.handle(field, event),
        };
        if handled == Handled::Ignored {
            debug!(field = %field.name, kind = %field.kind, "Event not applicable to control");
        }
        handled
    }
}
