use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gazetteer_core::aggregate::ESU_ID;
use gazetteer_core::{Esu, Property, PropertySubRecord, Record, Street, StreetSubRecord};

use crate::cascade::SlotId;

/// A value offered to a staging slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedValue {
    Street(Street),
    Property(Property),
    Record(Record),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    /// Leaving a street: keeps the property source snapshot.
    Street,
    /// Leaving a property: keeps the street source snapshot.
    Property,
    /// Leaving the editor entirely.
    NavigateAway,
}

/// Last-saved and in-progress versions of the street and property being
/// edited, plus one staged record per sub-record kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sandbox {
    source_street: Option<Street>,
    current_street: Option<Street>,
    source_property: Option<Property>,
    current_property: Option<Property>,
    current_street_records: BTreeMap<StreetSubRecord, Record>,
    current_property_records: BTreeMap<PropertySubRecord, Record>,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_street(&self) -> Option<&Street> {
        self.source_street.as_ref()
    }

    pub fn current_street(&self) -> Option<&Street> {
        self.current_street.as_ref()
    }

    pub fn source_property(&self) -> Option<&Property> {
        self.source_property.as_ref()
    }

    pub fn current_property(&self) -> Option<&Property> {
        self.current_property.as_ref()
    }

    pub fn street_record(&self, kind: StreetSubRecord) -> Option<&Record> {
        self.current_street_records.get(&kind)
    }

    pub fn property_record(&self, kind: PropertySubRecord) -> Option<&Record> {
        self.current_property_records.get(&kind)
    }

    pub fn is_staged(&self, slot: SlotId) -> bool {
        match slot {
            SlotId::CurrentStreet => self.current_street.is_some(),
            SlotId::CurrentProperty => self.current_property.is_some(),
            SlotId::Street(kind) => self.current_street_records.contains_key(&kind),
            SlotId::Property(kind) => self.current_property_records.contains_key(&kind),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source_street.is_none()
            && self.source_property.is_none()
            && SlotId::all().all(|slot| !self.is_staged(slot))
    }

    pub(crate) fn load_street(&mut self, street: Street) {
        self.source_street = Some(street);
    }

    pub(crate) fn load_property(&mut self, property: Property) {
        self.source_property = Some(property);
    }

    /// Store `value` in `slot`. A missing value or one whose shape does not
    /// fit the slot empties it. Returns whether something was stored.
    pub(crate) fn put(&mut self, slot: SlotId, value: Option<StagedValue>) -> bool {
        match (slot, value) {
            (SlotId::CurrentStreet, Some(StagedValue::Street(street))) => {
                self.current_street = Some(street);
                true
            }
            (SlotId::CurrentProperty, Some(StagedValue::Property(property))) => {
                self.current_property = Some(property);
                true
            }
            (SlotId::Street(kind), Some(StagedValue::Record(record))) => {
                self.current_street_records.insert(kind, record);
                true
            }
            (SlotId::Property(kind), Some(StagedValue::Record(record))) => {
                self.current_property_records.insert(kind, record);
                true
            }
            (slot, _) => {
                self.clear(slot);
                false
            }
        }
    }

    pub(crate) fn clear(&mut self, slot: SlotId) {
        match slot {
            SlotId::CurrentStreet => self.current_street = None,
            SlotId::CurrentProperty => self.current_property = None,
            SlotId::Street(kind) => {
                self.current_street_records.remove(&kind);
            }
            SlotId::Property(kind) => {
                self.current_property_records.remove(&kind);
            }
        }
    }

    pub(crate) fn reset(&mut self, scope: ResetScope) {
        self.current_street = None;
        self.current_property = None;
        self.current_street_records.clear();
        self.current_property_records.clear();
        match scope {
            ResetScope::Street => self.source_street = None,
            ResetScope::Property => self.source_property = None,
            ResetScope::NavigateAway => {
                self.source_street = None;
                self.source_property = None;
            }
        }
    }

    /// The street as the user currently sees it: the staged street (or the
    /// source when nothing is staged at street level) with every staged
    /// sub-record applied on top.
    pub fn effective_street(&self) -> Option<Street> {
        let mut street = self
            .current_street
            .as_ref()
            .or(self.source_street.as_ref())?
            .clone();
        for (kind, record) in &self.current_street_records {
            apply_street_record(&mut street, *kind, record);
        }
        Some(street)
    }

    pub fn effective_property(&self) -> Option<Property> {
        let mut property = self
            .current_property
            .as_ref()
            .or(self.source_property.as_ref())?
            .clone();
        for (kind, record) in &self.current_property_records {
            upsert(property.collection_mut(*kind), record);
        }
        Some(property)
    }
}

fn same_record(a: &Record, b: &Record) -> bool {
    matches!((a.pk_id(), b.pk_id()), (Some(x), Some(y)) if x == y)
}

fn upsert(collection: &mut Vec<Record>, record: &Record) {
    match collection.iter_mut().find(|existing| same_record(existing, record)) {
        Some(existing) => *existing = record.clone(),
        None => collection.push(record.clone()),
    }
}

fn apply_street_record(street: &mut Street, kind: StreetSubRecord, record: &Record) {
    match kind {
        StreetSubRecord::Esu => {
            match record.integer(ESU_ID).and_then(|id| street.esu_mut(id)) {
                Some(esu) => esu.record = record.clone(),
                None => street.esus.push(Esu::new(record.clone())),
            }
        }
        StreetSubRecord::HighwayDedication | StreetSubRecord::OneWayExemption => {
            let parent = record.integer(ESU_ID).and_then(|id| street.esu_mut(id));
            match parent.and_then(|esu| esu.children_mut(kind)) {
                Some(children) => upsert(children, record),
                None => tracing::debug!(
                    target: "gazetteer.sandbox",
                    kind = kind.as_str(),
                    "staged record has no parent esu"
                ),
            }
        }
        _ => {
            if let Some(collection) = street.collection_mut(kind) {
                upsert(collection, record);
            }
        }
    }
}

/// Position of a staged record inside the collection it belongs to. New
/// records that are not part of the collection take the next position.
pub fn street_record_index(street: &Street, kind: StreetSubRecord, record: &Record) -> usize {
    match kind {
        StreetSubRecord::Esu => {
            let esu_id = record.integer(ESU_ID);
            street
                .esus
                .iter()
                .position(|esu| esu_id.is_some() && esu.esu_id() == esu_id)
                .unwrap_or(street.esus.len())
        }
        StreetSubRecord::HighwayDedication | StreetSubRecord::OneWayExemption => {
            match record.integer(ESU_ID).and_then(|id| street.esu(id)) {
                Some(esu) => esu.children(kind).map_or(0, |children| index_in(children, record)),
                // No parent ESU: place it after every child of this kind.
                None => street.esus.iter().filter_map(|esu| esu.children(kind)).map(Vec::len).sum(),
            }
        }
        _ => street
            .collection(kind)
            .map_or(0, |collection| index_in(collection, record)),
    }
}

pub fn property_record_index(property: &Property, kind: PropertySubRecord, record: &Record) -> usize {
    index_in(property.collection(kind), record)
}

fn index_in(collection: &[Record], record: &Record) -> usize {
    collection
        .iter()
        .position(|existing| same_record(existing, record))
        .unwrap_or(collection.len())
}
