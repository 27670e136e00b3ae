pub mod cascade;
pub mod change;
pub mod compare;
pub mod config;
pub mod error;
pub mod error_bag;
pub mod persist;
pub mod sandbox;
pub mod store;
pub mod validation;

pub use cascade::{CascadeTable, ClearReason, SlotId};
pub use change::ChangedRecordType;
pub use config::{Jurisdiction, Settings};
pub use error::EngineError;
pub use error_bag::{ErrorAggregator, ErrorBag, FieldError};
pub use sandbox::{ResetScope, Sandbox, StagedValue};
pub use store::{ActiveTabs, Restored, SandboxStore};
pub use validation::{Dispatcher, Lookups, ValidationContext, Validator, ValidatorRegistry};

use gazetteer_core::{Aggregate, RecordType};
use gazetteer_storage::KeyValueStore;

/// Composition root for one editing session: the staging store, the
/// validator dispatch and the settings they share.
pub struct Engine<S> {
    settings: Settings,
    store: SandboxStore<S>,
    dispatcher: Dispatcher,
}

impl<S: KeyValueStore> Engine<S> {
    pub fn new(store: S, settings: Settings, validators: ValidatorRegistry) -> Self {
        Self {
            store: SandboxStore::new(store, &settings.key_prefix),
            settings,
            dispatcher: Dispatcher::new(validators),
        }
    }

    /// Create an engine and restore whatever the store holds from a previous run.
    pub fn open(store: S, settings: Settings, validators: ValidatorRegistry) -> (Self, Restored) {
        let mut engine = Self::new(store, settings, validators);
        let restored = engine.store.reload();
        (engine, restored)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &SandboxStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SandboxStore<S> {
        &mut self.store
    }

    pub fn sandbox(&self) -> &Sandbox {
        self.store.sandbox()
    }

    pub fn errors(&self) -> &ErrorAggregator {
        self.store.errors()
    }

    pub fn into_inner(self) -> S {
        self.store.into_inner()
    }

    fn with_context<T>(
        &mut self,
        lookups: &Lookups,
        run: impl FnOnce(&Dispatcher, &Sandbox, &mut ErrorAggregator, &ValidationContext<'_>) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let ctx = ValidationContext {
            lookups,
            jurisdiction: self.settings.jurisdiction,
        };
        let mut next = self.store.errors().clone();
        let result = run(&self.dispatcher, self.store.sandbox(), &mut next, &ctx)?;
        if &next != self.store.errors() {
            self.store.commit_errors(next)?;
        }
        Ok(result)
    }

    /// Validate the staged record of one type and persist the resulting errors.
    pub fn validate(&mut self, record_type: RecordType, lookups: &Lookups) -> Result<bool, EngineError> {
        self.with_context(lookups, |dispatcher, sandbox, errors, ctx| {
            dispatcher.validate(record_type, sandbox, errors, ctx)
        })
    }

    pub fn validate_code(
        &mut self,
        aggregate: Aggregate,
        code: u16,
        lookups: &Lookups,
    ) -> Result<bool, EngineError> {
        self.with_context(lookups, |dispatcher, sandbox, errors, ctx| {
            dispatcher.validate_code(aggregate, code, sandbox, errors, ctx)
        })
    }

    pub fn has_street_changed(&self) -> bool {
        change::street_changed(self.sandbox(), self.settings.include_restricted)
    }

    pub fn has_property_changed(&self) -> bool {
        change::property_changed(self.sandbox())
    }

    /// Sub-record kinds a save would also write, for the confirmation prompt.
    pub fn changed_associated_record_types(&self) -> Vec<ChangedRecordType> {
        change::changed_associated_record_types(self.sandbox(), self.settings.include_restricted)
    }
}
