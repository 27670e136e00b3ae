use serde::Serialize;
use serde::de::DeserializeOwned;

use gazetteer_core::Aggregate;
use gazetteer_storage::KeyValueStore;

use crate::error::EngineError;

/// Persisted-store keys, one per concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keys {
    pub sandbox: String,
    pub street_errors: String,
    pub property_errors: String,
    pub street_tab: String,
    pub property_tab: String,
}

impl Keys {
    pub fn new(prefix: &str) -> Self {
        Self {
            sandbox: format!("{prefix}.sandbox"),
            street_errors: format!("{prefix}.streetErrors"),
            property_errors: format!("{prefix}.propertyErrors"),
            street_tab: format!("{prefix}.streetTab"),
            property_tab: format!("{prefix}.propertyTab"),
        }
    }

    pub fn errors(&self, aggregate: Aggregate) -> &str {
        match aggregate {
            Aggregate::Street => &self.street_errors,
            Aggregate::Property => &self.property_errors,
        }
    }

    pub fn tab(&self, aggregate: Aggregate) -> &str {
        match aggregate {
            Aggregate::Street => &self.street_tab,
            Aggregate::Property => &self.property_tab,
        }
    }
}

/// One pending key update, with the text it replaces for rollback.
pub(crate) struct Write {
    key: String,
    text: String,
    previous: String,
}

/// Queue `key` for writing when `next` serializes differently from `previous`.
pub(crate) fn queue<T: Serialize>(
    writes: &mut Vec<Write>,
    key: &str,
    previous: &T,
    next: &T,
) -> Result<(), EngineError> {
    let text = serde_json::to_string(next)?;
    let previous = serde_json::to_string(previous)?;
    if text != previous {
        writes.push(Write {
            key: key.to_string(),
            text,
            previous,
        });
    }
    Ok(())
}

/// Apply every queued write. On failure the keys already written are put
/// back to their previous text before the error is returned.
pub(crate) fn write_all<S: KeyValueStore>(store: &mut S, writes: &[Write]) -> Result<(), EngineError> {
    for (done, write) in writes.iter().enumerate() {
        if let Err(err) = store.set(&write.key, &write.text) {
            for undo in writes[..done].iter().rev() {
                if let Err(undo_err) = store.set(&undo.key, &undo.previous) {
                    tracing::warn!(
                        target: "gazetteer.persist",
                        key = %undo.key,
                        error = %undo_err,
                        "rollback failed, store differs from memory"
                    );
                }
            }
            return Err(err.into());
        }
    }
    Ok(())
}

/// Read one key. Missing, unreadable and malformed entries all come back as
/// `None`; the last two are logged.
pub(crate) fn read<S, T>(store: &S, key: &str) -> Option<T>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            tracing::warn!(target: "gazetteer.persist", key, error = %err, "unreadable entry skipped");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(target: "gazetteer.persist", key, error = %err, "malformed entry skipped");
            None
        }
    }
}
