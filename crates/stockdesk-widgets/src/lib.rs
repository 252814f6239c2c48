//! # stockdesk-widgets
//!
//! Bootstrap 5 field renderers for stockdesk forms.
//!
//! A [`FieldRenderer`] draws one field from its
//! [`FieldDescriptor`](stockdesk_forms::FieldDescriptor) and turns raw
//! [`UiEvent`]s into canonical values for the form engine. The control is
//! chosen from the field's kind; each kind maps to exactly one strategy.
//!
//! ## Example
//!
//! ```rust
//! use stockdesk_forms::{FieldKind, FieldMeta, FieldValue, FormConfig, FormEngine};
//! use stockdesk_widgets::{FieldRenderer, Handled, Key, UiEvent};
//!
//! let (form, _load) = FormEngine::mount(FormConfig::new().initial("tags", Vec::<String>::new()));
//! let meta = FieldMeta::new("tags", FieldKind::Chips, "Tags");
//! let mut tags = FieldRenderer::for_kind(FieldKind::Chips);
//!
//! tags.handle(&form.descriptor(&meta), UiEvent::Input("organic".into()));
//! let handled = tags.handle(&form.descriptor(&meta), UiEvent::KeyDown(Key::Enter));
//! assert_eq!(handled, Handled::Changed);
//! assert_eq!(form.value("tags"), Some(FieldValue::from(vec!["organic"])));
//!
//! let html = tags.render(&form.descriptor(&meta));
//! assert!(html.contains("organic"));
//! ```

mod event;
pub mod html;
mod renderer;
pub mod strategies;
mod view;

pub use event::{Handled, Key, UiEvent};
pub use renderer::FieldRenderer;
pub use view::FormView;
