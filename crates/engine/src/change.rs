//! Decides whether a staged street or property differs from the version it
//! was loaded from, and which of its sub-record kinds changed.

use gazetteer_core::record::PK_ID;
use gazetteer_core::{
    Esu, Property, PropertySubRecord, Record, RecordType, Street, StreetSubRecord,
};

use crate::compare::{ignored_fields, records_equal};
use crate::sandbox::Sandbox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangedRecordType {
    pub record_type: RecordType,
    pub count: usize,
}

fn street_ignore(kind: StreetSubRecord) -> &'static [&'static str] {
    ignored_fields(RecordType::StreetRecord(kind))
}

fn property_ignore(kind: PropertySubRecord) -> &'static [&'static str] {
    ignored_fields(RecordType::PropertyRecord(kind))
}

fn same_key(a: &Record, b: &Record, key: &str) -> bool {
    matches!((a.identifier(key), b.identifier(key)), (Some(x), Some(y)) if x == y)
}

fn collection_changed(source: &[Record], current: &[Record], key: &str, ignored: &[&str]) -> bool {
    if source.len() != current.len() || current.iter().any(Record::is_new) {
        return true;
    }
    source.iter().any(|before| {
        let mut matches = current.iter().filter(|after| same_key(before, after, key));
        match (matches.next(), matches.next()) {
            (Some(after), None) => !records_equal(before, after, ignored),
            _ => true,
        }
    })
}

/// Added, modified and removed instances between two versions of a collection.
fn count_changed(source: &[Record], current: &[Record], key: &str, ignored: &[&str]) -> usize {
    let touched = current
        .iter()
        .filter(|after| {
            after.is_new()
                || match source.iter().find(|before| same_key(before, after, key)) {
                    Some(before) => !records_equal(before, after, ignored),
                    None => true,
                }
        })
        .count();
    let removed = source
        .iter()
        .filter(|before| !current.iter().any(|after| same_key(before, after, key)))
        .count();
    touched + removed
}

fn esu_is_new(esu: &Esu) -> bool {
    esu.esu_id().is_some_and(|id| id < 0) || esu.record.is_new()
}

fn same_esu(a: &Esu, b: &Esu) -> bool {
    matches!((a.esu_id(), b.esu_id()), (Some(x), Some(y)) if x == y)
}

fn esu_children_changed(before: &Esu, after: &Esu) -> bool {
    [StreetSubRecord::HighwayDedication, StreetSubRecord::OneWayExemption]
        .into_iter()
        .any(|kind| {
            collection_changed(
                before.children(kind).map_or(&[][..], Vec::as_slice),
                after.children(kind).map_or(&[][..], Vec::as_slice),
                PK_ID,
                street_ignore(kind),
            )
        })
}

fn esus_changed(source: &[Esu], current: &[Esu]) -> bool {
    if source.len() != current.len() || current.iter().any(esu_is_new) {
        return true;
    }
    let ignored = street_ignore(StreetSubRecord::Esu);
    source.iter().any(|before| {
        let mut matches = current.iter().filter(|after| same_esu(before, after));
        match (matches.next(), matches.next()) {
            (Some(after), None) => {
                !records_equal(&before.record, &after.record, ignored)
                    || esu_children_changed(before, after)
            }
            _ => true,
        }
    })
}

fn flat_street_kinds(include_restricted: bool) -> impl Iterator<Item = StreetSubRecord> {
    StreetSubRecord::ALL
        .into_iter()
        .filter(|kind| *kind != StreetSubRecord::Esu && !kind.is_esu_child())
        .filter(move |kind| include_restricted || !kind.is_restricted())
}

/// Whether `current` differs from `source`. ASD collections are only
/// compared when `include_restricted` is set.
pub fn has_street_changed(source: &Street, current: &Street, include_restricted: bool) -> bool {
    if current.is_new() {
        return true;
    }
    if !records_equal(&source.record, &current.record, ignored_fields(RecordType::Street)) {
        return true;
    }
    let flat_changed = flat_street_kinds(include_restricted).any(|kind| {
        match (source.collection(kind), current.collection(kind)) {
            (Some(before), Some(after)) => collection_changed(before, after, PK_ID, street_ignore(kind)),
            _ => false,
        }
    });
    flat_changed || esus_changed(&source.esus, &current.esus)
}

/// Properties carry no restricted collections.
pub fn has_property_changed(source: &Property, current: &Property) -> bool {
    if current.is_new() {
        return true;
    }
    if !records_equal(&source.record, &current.record, ignored_fields(RecordType::Property)) {
        return true;
    }
    PropertySubRecord::ALL.into_iter().any(|kind| {
        collection_changed(
            source.collection(kind),
            current.collection(kind),
            PK_ID,
            property_ignore(kind),
        )
    })
}

/// Whether the street in the sandbox, including staged sub-records, differs
/// from its source. A staged street without a source is always a change.
pub fn street_changed(sandbox: &Sandbox, include_restricted: bool) -> bool {
    let Some(current) = sandbox.effective_street() else {
        return false;
    };
    match sandbox.source_street() {
        Some(source) => has_street_changed(source, &current, include_restricted),
        None => true,
    }
}

pub fn property_changed(sandbox: &Sandbox) -> bool {
    let Some(current) = sandbox.effective_property() else {
        return false;
    };
    match sandbox.source_property() {
        Some(source) => has_property_changed(source, &current),
        None => true,
    }
}

fn esu_counts(source: &[Esu], current: &[Esu]) -> [(StreetSubRecord, usize); 3] {
    let ignored = street_ignore(StreetSubRecord::Esu);
    let mut esus = 0;
    let mut dedications = 0;
    let mut exemptions = 0;

    for after in current {
        match source.iter().find(|before| !esu_is_new(after) && same_esu(before, after)) {
            Some(before) => {
                if !records_equal(&before.record, &after.record, ignored) {
                    esus += 1;
                }
                dedications += count_changed(
                    &before.highway_dedications,
                    &after.highway_dedications,
                    PK_ID,
                    street_ignore(StreetSubRecord::HighwayDedication),
                );
                exemptions += count_changed(
                    &before.one_way_exemptions,
                    &after.one_way_exemptions,
                    PK_ID,
                    street_ignore(StreetSubRecord::OneWayExemption),
                );
            }
            None => {
                esus += 1;
                dedications += after.highway_dedications.len();
                exemptions += after.one_way_exemptions.len();
            }
        }
    }
    for before in source {
        if !current.iter().any(|after| same_esu(before, after)) {
            esus += 1;
            dedications += before.highway_dedications.len();
            exemptions += before.one_way_exemptions.len();
        }
    }

    [
        (StreetSubRecord::Esu, esus),
        (StreetSubRecord::HighwayDedication, dedications),
        (StreetSubRecord::OneWayExemption, exemptions),
    ]
}

pub fn changed_street_record_types(
    source: &Street,
    current: &Street,
    include_restricted: bool,
) -> Vec<ChangedRecordType> {
    let mut counts: Vec<(StreetSubRecord, usize)> = esu_counts(&source.esus, &current.esus).to_vec();
    for kind in flat_street_kinds(include_restricted) {
        if let (Some(before), Some(after)) = (source.collection(kind), current.collection(kind)) {
            counts.push((kind, count_changed(before, after, PK_ID, street_ignore(kind))));
        }
    }
    counts.sort_by_key(|(kind, _)| *kind);
    counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(kind, count)| ChangedRecordType {
            record_type: RecordType::StreetRecord(kind),
            count,
        })
        .collect()
}

pub fn changed_property_record_types(source: &Property, current: &Property) -> Vec<ChangedRecordType> {
    PropertySubRecord::ALL
        .into_iter()
        .map(|kind| {
            let count = count_changed(
                source.collection(kind),
                current.collection(kind),
                PK_ID,
                property_ignore(kind),
            );
            (kind, count)
        })
        .filter(|(_, count)| *count > 0)
        .map(|(kind, count)| ChangedRecordType {
            record_type: RecordType::PropertyRecord(kind),
            count,
        })
        .collect()
}

/// Sub-record kinds that a save would also write, with instance counts,
/// street kinds first.
pub fn changed_associated_record_types(
    sandbox: &Sandbox,
    include_restricted: bool,
) -> Vec<ChangedRecordType> {
    let mut changed = Vec::new();
    if let Some(current) = sandbox.effective_street() {
        let empty = Street::default();
        let source = sandbox.source_street().unwrap_or(&empty);
        changed.extend(changed_street_record_types(source, &current, include_restricted));
    }
    if let Some(current) = sandbox.effective_property() {
        let empty = Property::default();
        let source = sandbox.source_property().unwrap_or(&empty);
        changed.extend(changed_property_record_types(source, &current));
    }
    changed
}
