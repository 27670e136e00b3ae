use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field_value::FieldValue;

pub const PK_ID: &str = "pkId";
pub const ID: &str = "id";

/// A flat set of named fields. Absent fields are distinct from fields holding `Null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn set(&mut self, field: &str, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(field.to_string(), value.into())
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn integer(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_integer)
    }

    /// Look up an identifying field. Records created locally carry `pkId`
    /// while fetched ones may only carry `id`, so `pkId` falls back to `id`.
    pub fn identifier(&self, field: &str) -> Option<&FieldValue> {
        match self.get(field) {
            Some(value) => Some(value),
            None if field == PK_ID => self.get(ID),
            None => None,
        }
    }

    pub fn pk_id(&self) -> Option<i64> {
        self.identifier(PK_ID).and_then(FieldValue::as_integer)
    }

    /// Negative identifiers are assigned to records that have not been saved yet.
    pub fn is_new(&self) -> bool {
        self.pk_id().is_some_and(|id| id < 0)
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
