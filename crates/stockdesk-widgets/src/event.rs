//! Raw UI events fed to field renderers.

use stockdesk_forms::FileHandle;

/// Keys that carry meaning for some inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Comma,
    Backspace,
    Escape,
    /// Any other key; renderers leave it to the input itself.
    Other,
}

/// A raw event coming from the rendered input.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// The input's text content changed.
    Input(String),
    /// A checkbox or switch changed state.
    Toggle(bool),
    /// The selection of a multi-select changed.
    SelectMany(Vec<String>),
    /// Files were picked.
    Files(Vec<FileHandle>),
    /// A key was pressed inside the input.
    KeyDown(Key),
    /// A suggestion was clicked, by position in the current list.
    Pick(usize),
    /// A chip's remove button was clicked, by position.
    Remove(usize),
    /// A rating star was clicked.
    Rate(u8),
    /// The password reveal button was clicked.
    ToggleReveal,
    /// The input lost focus.
    Blur,
}

/// What a renderer did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// A canonical value was forwarded to the form.
    Changed,
    /// A blur was forwarded to the form.
    Blurred,
    /// Only the renderer's own state changed.
    Local,
    /// The event does not apply to this input.
    Ignored,
}
