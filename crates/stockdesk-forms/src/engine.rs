//! Form state machine.
//!
//! A [`FormEngine`] is a cheap, clonable handle over one form's state. Every
//! mutation goes through its operations; readers get copies. The async parts
//! (edit-mode load, submit) are handed back to the caller as `'static` futures,
//! so the engine never needs a runtime of its own.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::binding::{FieldBinding, FieldDescriptor, FieldMeta};
use crate::error::{RemoteError, ValidationErrors};
use crate::validation::{validate_form, FieldRules, RuleSet};
use crate::value::{FieldValue, Values};

/// Async loader fetching an entity for edit mode.
pub type LoaderFn =
    Arc<dyn Fn(EntityId) -> BoxFuture<'static, Result<LoadResponse, RemoteError>> + Send + Sync>;

/// Async submit callback: `(values, is_editing, entity_id)`.
pub type SubmitFn = Arc<
    dyn Fn(Values, bool, Option<EntityId>) -> BoxFuture<'static, Result<Option<SubmitResponse>, RemoteError>>
        + Send
        + Sync,
>;

/// Pending edit-mode load. Dropping it unpolled releases the loading flag.
pub type LoadTask = BoxFuture<'static, LoadOutcome>;

/// Pending submission. Dropping it unpolled releases the submitting flag.
pub type SubmitTask = BoxFuture<'static, SubmitOutcome>;

/// Opaque identifier of the entity being edited.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

/// Loader answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadResponse {
    /// Whether the remote side found the entity.
    pub success: bool,
    /// Field values to merge over the initial configuration.
    #[serde(default)]
    pub data: Values,
}

impl LoadResponse {
    /// A successful answer carrying `data`.
    pub fn ok(data: Values) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Submit callback answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Whether the remote side accepted the submission.
    pub success: bool,
    /// Human-readable message for the host to display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Free-form payload, e.g. the created record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl SubmitResponse {
    /// A successful answer with no message.
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// How an edit-mode load settled.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    /// Nothing to load: not editing, or no loader configured.
    Skipped,
    /// Remote data was merged into the values.
    Loaded,
    /// The loader answered without `success`; values untouched.
    Unsuccessful,
    /// The loader failed; values untouched.
    Failed(RemoteError),
    /// A newer load was started before this one settled; result discarded.
    Stale,
    /// The engine was dropped before the load settled.
    Detached,
}

/// How a submission settled.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Client-side validation failed; the callback was not invoked.
    Invalid(ValidationErrors),
    /// The callback answered with `success`.
    Succeeded(SubmitResponse),
    /// The callback answered without `success`, or with nothing.
    Unconfirmed(Option<SubmitResponse>),
    /// The remote side returned field errors (422); they replaced the error map.
    ServerRejected(ValidationErrors),
    /// Any other failure; no field errors were set.
    Failed(RemoteError),
    /// Validation passed but no submit callback is configured.
    NoHandler,
    /// The engine was dropped before the submission settled.
    Detached,
}

impl SubmitOutcome {
    /// Returns whether the submission was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

/// Form submit event whose default action the engine suppresses.
#[derive(Debug, Clone, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    /// Creates a fresh event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppresses the event's default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Returns whether the default action was suppressed.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Declarative form configuration.
#[derive(Clone, Default)]
pub struct FormConfig {
    initial: Values,
    rules: RuleSet,
    entity_id: Option<EntityId>,
    loader: Option<LoaderFn>,
    submit: Option<SubmitFn>,
}

impl fmt::Debug for FormConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfig")
            .field("initial", &self.initial)
            .field("rules", &self.rules)
            .field("entity_id", &self.entity_id)
            .field("has_loader", &self.loader.is_some())
            .field("has_submit", &self.submit.is_some())
            .finish()
    }
}

impl FormConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial value of a field.
    #[must_use]
    pub fn initial(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.initial.insert(name.into(), value.into());
        self
    }

    /// Adds initial values for several fields.
    #[must_use]
    pub fn initial_values(mut self, values: Values) -> Self {
        self.initial.extend(values);
        self
    }

    /// Declares the rules for a field.
    #[must_use]
    pub fn rules(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        self.rules.insert(name.into(), rules);
        self
    }

    /// Puts the form in edit mode for the given entity.
    #[must_use]
    pub fn entity_id(mut self, id: impl Into<EntityId>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Sets the edit-mode loader.
    #[must_use]
    pub fn loader<F, Fut>(mut self, loader: F) -> Self
    where
        F: Fn(EntityId) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<LoadResponse, RemoteError>> + Send + 'static,
    {
        self.loader = Some(Arc::new(move |id| loader(id).boxed()));
        self
    }

    /// Sets the submit callback.
    #[must_use]
    pub fn on_submit<F, Fut>(mut self, submit: F) -> Self
    where
        F: Fn(Values, bool, Option<EntityId>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<SubmitResponse>, RemoteError>> + Send + 'static,
    {
        self.submit = Some(Arc::new(move |values, editing, id| {
            submit(values, editing, id).boxed()
        }));
        self
    }
}

#[derive(Debug, Default)]
struct FormState {
    values: Values,
    errors: ValidationErrors,
    loading: bool,
    submits_in_flight: usize,
    is_editing: bool,
    entity_id: Option<EntityId>,
    load_token: u64,
}

struct Shared {
    initial: Values,
    rules: RuleSet,
    loader: Option<LoaderFn>,
    submit: Option<SubmitFn>,
}

fn lock_state(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle over one form's state.
#[derive(Clone)]
pub struct FormEngine {
    state: Arc<Mutex<FormState>>,
    shared: Arc<Shared>,
}

impl fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("FormEngine");
        match self.state.try_lock() {
            Ok(state) => d.field("state", &*state),
            Err(_) => d.field("state", &"<locked>"),
        };
        d.finish_non_exhaustive()
    }
}

impl FormEngine {
    /// Builds the engine and starts the edit-mode load if one applies.
    ///
    /// The returned task settles as [`LoadOutcome::Skipped`] right away when
    /// the form is not editing or has no loader.
    pub fn mount(config: FormConfig) -> (Self, LoadTask) {
        let FormConfig {
            initial,
            rules,
            entity_id,
            loader,
            submit,
        } = config;

        let state = FormState {
            values: initial.clone(),
            is_editing: entity_id.is_some(),
            entity_id: entity_id.clone(),
            ..FormState::default()
        };
        let engine = Self {
            state: Arc::new(Mutex::new(state)),
            shared: Arc::new(Shared {
                initial,
                rules,
                loader,
                submit,
            }),
        };
        debug!(
            fields = engine.shared.initial.len(),
            editing = entity_id.is_some(),
            "Form mounted"
        );

        let task = match entity_id {
            Some(id) => engine.start_load(id),
            None => future::ready(LoadOutcome::Skipped).boxed(),
        };
        (engine, task)
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        lock_state(&self.state)
    }

    fn start_load(&self, id: EntityId) -> LoadTask {
        let Some(loader) = self.shared.loader.clone() else {
            return future::ready(LoadOutcome::Skipped).boxed();
        };

        let token = {
            let mut state = self.lock();
            state.load_token += 1;
            state.loading = true;
            state.load_token
        };
        info!(entity = %id, token, "Loading entity");

        let release = LoadRelease {
            state: Arc::downgrade(&self.state),
            token,
        };
        let shared = Arc::clone(&self.shared);
        let request = loader(id);
        async move {
            let result = request.await;
            release.settle(&shared.initial, result)
        }
        .boxed()
    }

    /// Loads another entity into an editing form.
    ///
    /// Any load still in flight becomes stale and its result is discarded.
    /// Forms mounted without an entity are not editing and skip the load.
    pub fn reload(&self, id: impl Into<EntityId>) -> LoadTask {
        let id = id.into();
        {
            let mut state = self.lock();
            if !state.is_editing {
                debug!(entity = %id, "Reload ignored: form is not editing");
                return future::ready(LoadOutcome::Skipped).boxed();
            }
            state.entity_id = Some(id.clone());
        }
        self.start_load(id)
    }

    /// Sets a field value and clears its error without re-validating.
    pub fn handle_change(&self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        trace!(field = name, value = %value, "Field changed");
        let mut state = self.lock();
        state.values.insert(name.to_string(), value);
        state.errors.remove(name);
    }

    /// Validates one field and stores the result as its error.
    pub fn handle_blur(&self, name: &str) {
        let mut state = self.lock();
        let value = state.values.get(name).cloned().unwrap_or_default();
        match self.shared.rules.get(name).and_then(|r| r.validate(&value)) {
            Some(message) => {
                trace!(field = name, %message, "Field invalid on blur");
                state.errors.set(name, message);
            }
            None => {
                state.errors.remove(name);
            }
        }
    }

    /// Validates the whole form and, if it is clean, starts the submission.
    ///
    /// Validation and the `submitting` flag happen before this returns; the
    /// returned task runs the callback and reconciles its answer.
    pub fn handle_submit(&self, event: &mut SubmitEvent) -> SubmitTask {
        event.prevent_default();

        let (submit, values, is_editing, entity_id) = {
            let mut state = self.lock();
            let errors = validate_form(&self.shared.rules, &state.values);
            if !errors.is_empty() {
                debug!(invalid_fields = errors.len(), "Submission blocked by validation");
                state.errors = errors.clone();
                return future::ready(SubmitOutcome::Invalid(errors)).boxed();
            }
            let Some(submit) = self.shared.submit.clone() else {
                warn!("Submission requested without a submit callback");
                return future::ready(SubmitOutcome::NoHandler).boxed();
            };
            state.submits_in_flight += 1;
            state.errors.clear();
            (
                submit,
                state.values.clone(),
                state.is_editing,
                state.entity_id.clone(),
            )
        };

        let release = SubmitRelease {
            state: Arc::downgrade(&self.state),
        };
        info!(editing = is_editing, "Submitting form");
        let request = submit(values, is_editing, entity_id);
        async move {
            let result = request.await;
            release.settle(result)
        }
        .boxed()
    }

    /// Restores the initial values and clears every error.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.values = self.shared.initial.clone();
        state.errors.clear();
        debug!("Form reset");
    }

    /// Returns the current value of a field.
    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.lock().values.get(name).cloned()
    }

    /// Returns a copy of all values.
    pub fn values(&self) -> Values {
        self.lock().values.clone()
    }

    /// Returns a copy of the error map.
    pub fn errors(&self) -> ValidationErrors {
        self.lock().errors.clone()
    }

    /// Returns the error of a field.
    pub fn get_error(&self, name: &str) -> Option<String> {
        self.lock().errors.get(name).map(str::to_string)
    }

    /// Returns whether a field has an error.
    pub fn has_error(&self, name: &str) -> bool {
        self.lock().errors.contains(name)
    }

    /// Returns whether the error map is empty.
    pub fn is_valid(&self) -> bool {
        self.lock().errors.is_empty()
    }

    /// Returns whether the form is valid and not submitting.
    pub fn can_submit(&self) -> bool {
        let state = self.lock();
        state.errors.is_empty() && state.submits_in_flight == 0
    }

    /// Returns whether the edit-mode load is in flight.
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Returns whether a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.lock().submits_in_flight > 0
    }

    /// Returns whether the form edits an existing entity.
    pub fn is_editing(&self) -> bool {
        self.lock().is_editing
    }

    /// Returns the entity being edited.
    pub fn entity_id(&self) -> Option<EntityId> {
        self.lock().entity_id.clone()
    }

    /// Returns whether the values differ from the initial configuration.
    pub fn is_dirty(&self) -> bool {
        self.lock().values != self.shared.initial
    }

    /// Returns the rules declared for a field.
    pub fn rules(&self, name: &str) -> Option<&FieldRules> {
        self.shared.rules.get(name)
    }

    /// Binds one field for rendering.
    pub fn field(&self, name: impl Into<String>) -> FieldBinding {
        FieldBinding::new(self.clone(), name.into())
    }

    /// Builds the render-time descriptor of a field.
    pub fn descriptor(&self, meta: &FieldMeta) -> FieldDescriptor {
        self.field(meta.name.clone()).descriptor(meta)
    }
}

/// Clears `loading` when a load settles or is dropped, unless a newer load
/// has taken over.
struct LoadRelease {
    state: Weak<Mutex<FormState>>,
    token: u64,
}

impl LoadRelease {
    fn settle(
        &self,
        initial: &Values,
        result: Result<LoadResponse, RemoteError>,
    ) -> LoadOutcome {
        let Some(state) = self.state.upgrade() else {
            debug!(token = self.token, "Load settled after unmount");
            return LoadOutcome::Detached;
        };
        let mut state = lock_state(&state);
        if state.load_token != self.token {
            debug!(
                token = self.token,
                current = state.load_token,
                "Discarding stale load"
            );
            return LoadOutcome::Stale;
        }
        state.loading = false;

        match result {
            Ok(LoadResponse {
                success: true,
                data,
            }) => {
                let mut values = initial.clone();
                values.extend(data);
                state.values = values;
                info!(token = self.token, "Entity loaded");
                LoadOutcome::Loaded
            }
            Ok(_) => {
                warn!(token = self.token, "Loader answered without success");
                LoadOutcome::Unsuccessful
            }
            Err(err) => {
                warn!(token = self.token, error = %err, "Load failed");
                LoadOutcome::Failed(err)
            }
        }
    }
}

impl Drop for LoadRelease {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let mut state = lock_state(&state);
            if state.load_token == self.token {
                state.loading = false;
            }
        }
    }
}

/// Releases one in-flight submission when it settles or is dropped.
struct SubmitRelease {
    state: Weak<Mutex<FormState>>,
}

impl SubmitRelease {
    fn settle(&self, result: Result<Option<SubmitResponse>, RemoteError>) -> SubmitOutcome {
        let Some(state) = self.state.upgrade() else {
            debug!("Submission settled after unmount");
            return SubmitOutcome::Detached;
        };
        let mut state = lock_state(&state);

        match result {
            Ok(Some(response)) if response.success => {
                info!("Submission accepted");
                SubmitOutcome::Succeeded(response)
            }
            Ok(response) => {
                debug!("Submission settled without success");
                SubmitOutcome::Unconfirmed(response)
            }
            Err(err) => match err.field_errors() {
                Some(fields) => {
                    let errors: ValidationErrors = fields
                        .iter()
                        .map(|(field, message)| (field.as_str(), message.as_str()))
                        .collect();
                    warn!(fields = errors.len(), "Submission rejected with field errors");
                    state.errors = errors.clone();
                    SubmitOutcome::ServerRejected(errors)
                }
                None => {
                    warn!(error = %err, "Submission failed");
                    SubmitOutcome::Failed(err)
                }
            },
        }
    }
}

impl Drop for SubmitRelease {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let mut state = lock_state(&state);
            state.submits_in_flight = state.submits_in_flight.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldRules;

    fn contact_form() -> FormConfig {
        FormConfig::new()
            .initial("name", "")
            .initial("email", "")
            .rules("name", FieldRules::new().required())
            .rules("email", FieldRules::new().email())
    }

    #[test]
    fn test_mount_create_mode() {
        let (engine, _load) = FormEngine::mount(contact_form());
        assert!(!engine.is_editing());
        assert!(!engine.is_loading());
        assert_eq!(engine.entity_id(), None);
        assert_eq!(engine.value("name"), Some(FieldValue::from("")));
        assert!(engine.is_valid());
        assert!(engine.can_submit());
    }

    #[test]
    fn test_change_clears_error_without_validating() {
        let (engine, _load) = FormEngine::mount(contact_form());
        engine.handle_blur("name");
        assert!(engine.has_error("name"));

        engine.handle_change("name", "   ");
        assert!(!engine.has_error("name"));
        assert_eq!(engine.value("name"), Some(FieldValue::from("   ")));
    }

    #[test]
    fn test_blur_validates_only_that_field() {
        let (engine, _load) = FormEngine::mount(contact_form());
        engine.handle_change("email", "nope");
        engine.handle_blur("email");
        assert_eq!(
            engine.get_error("email").as_deref(),
            Some("Enter a valid email address.")
        );
        assert!(!engine.has_error("name"));
        assert!(!engine.is_valid());
        assert!(!engine.can_submit());

        engine.handle_change("email", "a@b.co");
        engine.handle_blur("email");
        assert!(engine.is_valid());
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let (engine, _load) = FormEngine::mount(contact_form());
        engine.handle_change("name", "Ada");
        engine.handle_change("extra", 3);
        engine.handle_blur("email");
        assert!(engine.is_dirty());

        engine.reset();
        assert!(!engine.is_dirty());
        assert_eq!(engine.values(), contact_form().initial);
        assert!(engine.errors().is_empty());
    }

    #[test]
    fn test_submit_event_default_prevented() {
        let (engine, _load) = FormEngine::mount(contact_form());
        let mut event = SubmitEvent::new();
        drop(engine.handle_submit(&mut event));
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_dropped_submit_task_releases_flag() {
        let config = FormConfig::new().on_submit(|_, _, _| async { Ok(None) });
        let (engine, _load) = FormEngine::mount(config);

        let task = engine.handle_submit(&mut SubmitEvent::new());
        assert!(engine.is_submitting());
        drop(task);
        assert!(!engine.is_submitting());
    }

    #[test]
    fn test_dropped_load_task_releases_flag() {
        let config = FormConfig::new()
            .entity_id("7")
            .loader(|_| async { Ok(LoadResponse::ok(Values::new())) });
        let (engine, load) = FormEngine::mount(config);
        assert!(engine.is_loading());
        drop(load);
        assert!(!engine.is_loading());
    }

    #[test]
    fn test_reload_ignored_when_not_editing() {
        let config = FormConfig::new().loader(|_| async { Ok(LoadResponse::ok(Values::new())) });
        let (engine, _load) = FormEngine::mount(config);
        drop(engine.reload("3"));
        assert!(!engine.is_loading());
        assert_eq!(engine.entity_id(), None);
    }

    #[test]
    fn test_entity_id_conversions() {
        assert_eq!(EntityId::from(42_i64).as_str(), "42");
        assert_eq!(EntityId::from("abc").to_string(), "abc");
    }

    /// Collects the message of every event emitted while installed.
    struct Messages(Arc<Mutex<Vec<String>>>);

    struct MessageVisitor<'a>(&'a mut Vec<String>);

    impl tracing::field::Visit for MessageVisitor<'_> {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0.push(format!("{value:?}"));
            }
        }
    }

    impl tracing::Subscriber for Messages {
        fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }

        fn record(&self, _: &tracing::span::Id, _: &tracing::span::Record<'_>) {}

        fn record_follows_from(&self, _: &tracing::span::Id, _: &tracing::span::Id) {}

        fn event(&self, event: &tracing::Event<'_>) {
            event.record(&mut MessageVisitor(&mut self.0.lock().unwrap()));
        }

        fn enter(&self, _: &tracing::span::Id) {}

        fn exit(&self, _: &tracing::span::Id) {}
    }

    #[test]
    fn test_log_messages_are_capitalized() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        tracing::subscriber::with_default(Messages(Arc::clone(&messages)), || {
            let (engine, _load) = FormEngine::mount(contact_form());
            engine.handle_blur("name");
            let blocked = futures::executor::block_on(engine.handle_submit(&mut SubmitEvent::new()));
            assert!(matches!(blocked, SubmitOutcome::Invalid(_)));
            engine.handle_change("name", "Ada");
            let unhandled = futures::executor::block_on(engine.handle_submit(&mut SubmitEvent::new()));
            assert!(matches!(unhandled, SubmitOutcome::NoHandler));
            engine.reset();
        });

        let messages = messages.lock().unwrap();
        assert!(messages.iter().any(|m| m == "Form mounted"));
        assert!(messages.iter().any(|m| m == "Form reset"));
        for message in messages.iter() {
            assert!(
                message.starts_with(|c: char| c.is_ascii_uppercase()),
                "{message}"
            );
        }
    }
}
