//! # stockdesk-forms
//!
//! Form state and validation engine for the stockdesk admin screens.
//!
//! This crate provides:
//! - Per-field validation rules evaluated in a fixed order
//! - A form engine owning values, errors and the loading/submitting flags
//! - Async edit-mode loading and submission with server-side field errors
//! - Field bindings and render-time descriptors for any rendering technology
//! - Declarative JSON form schemas
//!
//! ## Quick Start
//!
//! ```rust
//! use stockdesk_forms::{FieldRules, FormConfig, FormEngine, SubmitEvent};
//!
//! let config = FormConfig::new()
//!     .initial("name", "")
//!     .initial("email", "")
//!     .rules("name", FieldRules::new().required())
//!     .rules("email", FieldRules::new().email());
//! let (form, _load) = FormEngine::mount(config);
//!
//! form.handle_change("email", "not-an-email");
//! form.handle_blur("email");
//! assert!(form.has_error("email"));
//!
//! // Submitting runs every rule; nothing is sent while errors remain.
//! let _task = form.handle_submit(&mut SubmitEvent::new());
//! assert_eq!(form.get_error("name").as_deref(), Some("This field is required."));
//! ```
//!
//! ## Edit Mode
//!
//! ```rust
//! use stockdesk_forms::{FormConfig, FormEngine, LoadOutcome, LoadResponse, Values};
//!
//! # futures::executor::block_on(async {
//! let config = FormConfig::new()
//!     .initial("name", "")
//!     .initial("unit", "pcs")
//!     .entity_id("17")
//!     .loader(|_id| async {
//!         let mut data = Values::new();
//!         data.insert("name".into(), "Flour".into());
//!         Ok(LoadResponse::ok(data))
//!     });
//! let (form, load) = FormEngine::mount(config);
//! assert!(form.is_loading());
//!
//! assert!(matches!(load.await, LoadOutcome::Loaded));
//! assert_eq!(form.value("name"), Some("Flour".into()));
//! assert_eq!(form.value("unit"), Some("pcs".into()));
//! # });
//! ```
//!
//! ## Schemas
//!
//! ```rust
//! use stockdesk_forms::{FormEngine, FormSchema};
//!
//! let schema = FormSchema::from_json(r#"{
//!     "fields": [
//!         { "name": "qty", "type": "number", "label": "Quantity",
//!           "rules": { "required": true, "min": { "value": 1, "message": "At least one" } } }
//!     ]
//! }"#).unwrap();
//! let (form, _load) = FormEngine::mount(schema.config().unwrap());
//! form.handle_change("qty", 0.5);
//! form.handle_blur("qty");
//! assert_eq!(form.get_error("qty").as_deref(), Some("At least one"));
//! ```

mod binding;
mod engine;
mod error;
pub mod schema;
pub mod validation;
mod value;

pub use binding::{FieldBinding, FieldDescriptor, FieldKind, FieldMeta, FieldOption};
pub use engine::{
    EntityId, FormConfig, FormEngine, LoadOutcome, LoadResponse, LoadTask, LoaderFn,
    SubmitEvent, SubmitFn, SubmitOutcome, SubmitResponse, SubmitTask,
};
pub use error::{FormError, RemoteError, Result, ValidationErrors, UNPROCESSABLE_ENTITY};
pub use schema::FormSchema;
pub use validation::{validate_field, validate_form, FieldRules, RuleSet, Validator};
pub use value::{FieldValue, FileHandle, Values};
