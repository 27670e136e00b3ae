use serde::{Deserialize, Serialize};

use gazetteer_core::{Aggregate, Property, RecordType, Street, json};
use gazetteer_storage::KeyValueStore;

use crate::cascade::{CascadeTable, ClearReason, SlotId};
use crate::error::EngineError;
use crate::error_bag::{ErrorAggregator, ErrorBag, FieldError};
use crate::persist::{self, Keys};
use crate::sandbox::{ResetScope, Sandbox, StagedValue};

/// Index of the sub-tab the user last had open, per aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTabs {
    pub street: usize,
    pub property: usize,
}

impl ActiveTabs {
    pub fn get(&self, aggregate: Aggregate) -> usize {
        match aggregate {
            Aggregate::Street => self.street,
            Aggregate::Property => self.property,
        }
    }

    fn set(&mut self, aggregate: Aggregate, index: usize) {
        match aggregate {
            Aggregate::Street => self.street = index,
            Aggregate::Property => self.property = index,
        }
    }
}

/// Which persisted entries `reload` brought back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Restored {
    pub sandbox: bool,
    pub street_errors: bool,
    pub property_errors: bool,
    pub street_tab: bool,
    pub property_tab: bool,
}

impl Restored {
    pub fn any(&self) -> bool {
        self.sandbox || self.street_errors || self.property_errors || self.street_tab || self.property_tab
    }
}

/// Parts of the store state a single mutation replaces.
#[derive(Default)]
struct Next {
    sandbox: Option<Sandbox>,
    errors: Option<ErrorAggregator>,
    tabs: Option<ActiveTabs>,
}

/// Owns the sandbox, the error lists and the active tabs, and writes each
/// of them to the persisted store before committing a change in memory.
pub struct SandboxStore<S> {
    store: S,
    keys: Keys,
    cascade: CascadeTable,
    sandbox: Sandbox,
    errors: ErrorAggregator,
    tabs: ActiveTabs,
}

fn parse_staged(slot: SlotId, text: &str) -> Option<StagedValue> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(target: "gazetteer.sandbox", ?slot, error = %err, "unparseable value");
            return None;
        }
    };
    if value.is_null() {
        return None;
    }
    let parsed = match slot {
        SlotId::CurrentStreet => json::street_from_json(&value).map(StagedValue::Street),
        SlotId::CurrentProperty => json::property_from_json(&value).map(StagedValue::Property),
        SlotId::Street(_) | SlotId::Property(_) => json::record_from_json(&value).map(StagedValue::Record),
    };
    parsed
        .map_err(|err| tracing::warn!(target: "gazetteer.sandbox", ?slot, error = %err, "malformed value"))
        .ok()
}

fn stage(sandbox: &mut Sandbox, slot: SlotId, value: Option<StagedValue>) {
    let offered = value.is_some();
    let stored = sandbox.put(slot, value);
    if offered && !stored {
        tracing::warn!(target: "gazetteer.sandbox", ?slot, "value does not fit slot, slot emptied");
    } else {
        tracing::debug!(target: "gazetteer.sandbox", ?slot, stored, "staged");
    }
}

impl<S: KeyValueStore> SandboxStore<S> {
    pub fn new(store: S, key_prefix: &str) -> Self {
        Self {
            store,
            keys: Keys::new(key_prefix),
            cascade: CascadeTable::standard(),
            sandbox: Sandbox::new(),
            errors: ErrorAggregator::new(),
            tabs: ActiveTabs::default(),
        }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    pub fn errors(&self) -> &ErrorAggregator {
        &self.errors
    }

    pub fn active_tabs(&self) -> ActiveTabs {
        self.tabs
    }

    pub fn cascade(&self) -> &CascadeTable {
        &self.cascade
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn backing_store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Persist the changed parts of `next`, then take them into memory. A
    /// failed write leaves memory as it was.
    fn commit(&mut self, next: Next) -> Result<(), EngineError> {
        let mut writes = Vec::new();
        if let Some(sandbox) = &next.sandbox {
            persist::queue(&mut writes, &self.keys.sandbox, &self.sandbox, sandbox)?;
        }
        for aggregate in [Aggregate::Street, Aggregate::Property] {
            if let Some(errors) = &next.errors {
                persist::queue(
                    &mut writes,
                    self.keys.errors(aggregate),
                    &self.errors.bag(aggregate),
                    &errors.bag(aggregate),
                )?;
            }
            if let Some(tabs) = &next.tabs {
                persist::queue(
                    &mut writes,
                    self.keys.tab(aggregate),
                    &self.tabs.get(aggregate),
                    &tabs.get(aggregate),
                )?;
            }
        }
        persist::write_all(&mut self.store, &writes)?;

        if let Some(sandbox) = next.sandbox {
            self.sandbox = sandbox;
        }
        if let Some(errors) = next.errors {
            self.errors = errors;
        }
        if let Some(tabs) = next.tabs {
            self.tabs = tabs;
        }
        Ok(())
    }

    fn commit_sandbox(&mut self, sandbox: Sandbox) -> Result<(), EngineError> {
        self.commit(Next {
            sandbox: Some(sandbox),
            ..Next::default()
        })
    }

    /// Make `street` the last-saved version being edited.
    pub fn load_street(&mut self, street: Street) -> Result<(), EngineError> {
        let mut next = self.sandbox.clone();
        next.load_street(street);
        self.commit_sandbox(next)
    }

    pub fn load_property(&mut self, property: Property) -> Result<(), EngineError> {
        let mut next = self.sandbox.clone();
        next.load_property(property);
        self.commit_sandbox(next)
    }

    /// Replace one slot. `None`, or a value of the wrong shape, empties it.
    pub fn set(&mut self, slot: SlotId, value: Option<StagedValue>) -> Result<(), EngineError> {
        let mut next = self.sandbox.clone();
        stage(&mut next, slot, value);
        self.commit_sandbox(next)
    }

    /// Replace one slot from form-control JSON. Unparseable input empties it.
    pub fn set_json(&mut self, slot: SlotId, text: &str) -> Result<(), EngineError> {
        self.set(slot, parse_staged(slot, text))
    }

    /// Empty every slot `reason` cascades to, then replace `slot`.
    pub fn set_and_clear(
        &mut self,
        slot: SlotId,
        value: Option<StagedValue>,
        reason: ClearReason,
    ) -> Result<(), EngineError> {
        let mut next = self.sandbox.clone();
        for cleared in self.cascade.slots_cleared_by(reason) {
            next.clear(cleared);
        }
        tracing::debug!(target: "gazetteer.sandbox", ?reason, "cascade clear");
        stage(&mut next, slot, value);
        self.commit_sandbox(next)
    }

    /// Clear the sandbox for `scope` together with every error list, and the
    /// tabs when leaving the editor. Nothing changes unless all of it persists.
    pub fn reset(&mut self, scope: ResetScope) -> Result<(), EngineError> {
        let mut sandbox = self.sandbox.clone();
        sandbox.reset(scope);
        let tabs = match scope {
            ResetScope::NavigateAway => ActiveTabs::default(),
            ResetScope::Street | ResetScope::Property => self.tabs,
        };
        self.commit(Next {
            sandbox: Some(sandbox),
            errors: Some(ErrorAggregator::new()),
            tabs: Some(tabs),
        })?;
        tracing::debug!(target: "gazetteer.sandbox", ?scope, "reset");
        Ok(())
    }

    pub fn set_active_tab(&mut self, aggregate: Aggregate, index: usize) -> Result<(), EngineError> {
        let mut tabs = self.tabs;
        tabs.set(aggregate, index);
        self.commit(Next {
            tabs: Some(tabs),
            ..Next::default()
        })
    }

    pub fn commit_errors(&mut self, next: ErrorAggregator) -> Result<(), EngineError> {
        self.commit(Next {
            errors: Some(next),
            ..Next::default()
        })
    }

    pub fn set_errors<I>(&mut self, aggregate: Aggregate, lists: I) -> Result<(), EngineError>
    where
        I: IntoIterator<Item = (RecordType, Vec<FieldError>)>,
    {
        let mut next = self.errors.clone();
        next.set_errors(aggregate, lists);
        self.commit_errors(next)
    }

    pub fn reset_errors(&mut self) -> Result<(), EngineError> {
        self.commit_errors(ErrorAggregator::new())
    }

    /// Restore persisted state at startup. Does nothing when anything is
    /// already staged; each entry is restored independently and unreadable
    /// entries are left at their defaults.
    pub fn reload(&mut self) -> Restored {
        let mut restored = Restored::default();
        if !self.sandbox.is_empty() {
            tracing::debug!(target: "gazetteer.persist", "sandbox in use, reload skipped");
            return restored;
        }

        if let Some(sandbox) = persist::read::<_, Sandbox>(&self.store, &self.keys.sandbox) {
            self.sandbox = sandbox;
            restored.sandbox = true;
        }
        for aggregate in [Aggregate::Street, Aggregate::Property] {
            let bag = persist::read::<_, ErrorBag>(&self.store, self.keys.errors(aggregate));
            let tab = persist::read::<_, usize>(&self.store, self.keys.tab(aggregate));
            let errors_restored = bag.is_some();
            let tab_restored = tab.is_some();
            if let Some(bag) = bag {
                self.errors.restore(aggregate, bag);
            }
            if let Some(tab) = tab {
                self.tabs.set(aggregate, tab);
            }
            match aggregate {
                Aggregate::Street => {
                    restored.street_errors = errors_restored;
                    restored.street_tab = tab_restored;
                }
                Aggregate::Property => {
                    restored.property_errors = errors_restored;
                    restored.property_tab = tab_restored;
                }
            }
        }
        tracing::info!(target: "gazetteer.persist", ?restored, "reload");
        restored
    }
}
