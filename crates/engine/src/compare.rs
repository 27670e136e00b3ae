//! Shallow field-by-field comparison of records.

use gazetteer_core::{PropertySubRecord, Record, RecordType, StreetSubRecord};

/// Compare two records field by field, skipping `ignored`.
///
/// Absent records never compare equal. The comparison is one level deep and
/// not symmetric: a `pkId` on `a` is matched against `id` on `b` when `b`
/// has no `pkId`, but an `id` on `a` is never matched against `pkId` on `b`.
pub fn is_equal(a: Option<&Record>, b: Option<&Record>, ignored: &[&str]) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => records_equal(a, b, ignored),
        _ => false,
    }
}

pub fn records_equal(a: &Record, b: &Record, ignored: &[&str]) -> bool {
    let compared = |record: &Record| {
        record
            .field_names()
            .filter(|name| !ignored.contains(name))
            .count()
    };
    if compared(a) != compared(b) {
        return false;
    }

    a.field_names()
        .filter(|name| !ignored.contains(name))
        .all(|name| a.get(name) == b.identifier(name))
}

macro_rules! ignore_list {
    ($($extra:literal),* $(,)?) => {
        &[
            "insertedTimestamp",
            "insertedUser",
            "lastUpdateDate",
            "lastUpdated",
            "lastUser",
            $($extra),*
        ]
    };
}

const AUDIT_ONLY: &[&str] = ignore_list!();
const STREET: &[&str] = ignore_list!(
    "streetStartX",
    "streetStartY",
    "streetEndX",
    "streetEndY",
);
const DESCRIPTOR: &[&str] = ignore_list!("locality", "town", "administrativeArea");
const ESU: &[&str] = ignore_list!("esuStartX", "esuStartY", "esuEndX", "esuEndY");
const PROW: &[&str] = ignore_list!("prowLength");
const PROPERTY: &[&str] = ignore_list!("latitude", "longitude", "formattedAddress");
const LPI: &[&str] = ignore_list!("address", "postTown", "postcode");
const CLASSIFICATION: &[&str] = ignore_list!("classificationDescription");

/// Fields excluded from change detection for `record_type`: server-computed
/// audit fields, geometry-derived coordinates and denormalised display text.
pub fn ignored_fields(record_type: RecordType) -> &'static [&'static str] {
    match record_type {
        RecordType::Street => STREET,
        RecordType::StreetRecord(kind) => match kind {
            StreetSubRecord::Descriptor => DESCRIPTOR,
            StreetSubRecord::Esu => ESU,
            StreetSubRecord::Prow => PROW,
            StreetSubRecord::OneWayExemption
            | StreetSubRecord::HighwayDedication
            | StreetSubRecord::SuccessorCrossRef
            | StreetSubRecord::MaintenanceResponsibility
            | StreetSubRecord::ReinstatementCategory
            | StreetSubRecord::OsSpecialDesignation
            | StreetSubRecord::Interest
            | StreetSubRecord::Construction
            | StreetSubRecord::SpecialDesignation
            | StreetSubRecord::Hww
            | StreetSubRecord::Note => AUDIT_ONLY,
        },
        RecordType::Property => PROPERTY,
        RecordType::PropertyRecord(kind) => match kind {
            PropertySubRecord::Lpi => LPI,
            PropertySubRecord::Classification => CLASSIFICATION,
            PropertySubRecord::Provenance
            | PropertySubRecord::AppCrossRef
            | PropertySubRecord::SuccessorCrossRef
            | PropertySubRecord::Organisation
            | PropertySubRecord::Note => AUDIT_ONLY,
        },
    }
}
