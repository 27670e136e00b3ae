use gazetteer_core::aggregate::ESU_ID;
use gazetteer_core::{PropertySubRecord, Record, RecordType, StreetSubRecord};
use gazetteer_engine::{ChangedRecordType, Settings, SlotId, StagedValue};
use gazetteer_harness::{TestSession, fixtures};

fn record(value: Record) -> Option<StagedValue> {
    Some(StagedValue::Record(value))
}

fn with_restricted() -> Settings {
    Settings {
        include_restricted: true,
        ..Settings::default()
    }
}

// ============================================================================
// Street
// ============================================================================

#[test]
fn loaded_street_alone_is_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    assert!(!session.engine.has_street_changed());

    session.engine.store_mut().load_street(fixtures::street(1001))?;
    assert!(!session.engine.has_street_changed());
    assert!(session.engine.changed_associated_record_types().is_empty());
    Ok(())
}

#[test]
fn new_descriptor_is_a_change() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;
    store.set(
        SlotId::Street(StreetSubRecord::Descriptor),
        record(fixtures::descriptor(-1, "MILL LANE")),
    )?;

    assert!(session.engine.has_street_changed());
    assert_eq!(
        session.engine.changed_associated_record_types(),
        vec![ChangedRecordType {
            record_type: RecordType::StreetRecord(StreetSubRecord::Descriptor),
            count: 1,
        }]
    );
    Ok(())
}

#[test]
fn fetched_esu_keyed_by_id_is_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;

    // The fetch path returns `id` where the create path wrote `pkId`.
    let fetched = Record::new()
        .with(ESU_ID, 100)
        .with("id", 5)
        .with("geometry", "LINESTRING (0 0, 50 0)");
    store.set(SlotId::Street(StreetSubRecord::Esu), record(fetched))?;

    assert!(!session.engine.has_street_changed());
    Ok(())
}

#[test]
fn server_computed_fields_do_not_count() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;

    let mut current = fixtures::street(1001);
    current.record.set("lastUpdated", "2024-06-11T14:30:00");
    current.record.set("streetStartX", 452_010);
    current.descriptors[0].set("locality", "MILLBROOK VILLAGE");
    store.set(SlotId::CurrentStreet, Some(StagedValue::Street(current.clone())))?;
    assert!(!session.engine.has_street_changed());

    current.record.set("state", 4);
    session
        .engine
        .store_mut()
        .set(SlotId::CurrentStreet, Some(StagedValue::Street(current)))?;
    assert!(session.engine.has_street_changed());
    Ok(())
}

#[test]
fn removed_esu_child_is_a_change() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;

    let mut current = fixtures::street(1001);
    current.esus[0].one_way_exemptions.clear();
    store.set(SlotId::CurrentStreet, Some(StagedValue::Street(current)))?;

    assert!(session.engine.has_street_changed());
    assert_eq!(
        session.engine.changed_associated_record_types(),
        vec![ChangedRecordType {
            record_type: RecordType::StreetRecord(StreetSubRecord::OneWayExemption),
            count: 1,
        }]
    );
    Ok(())
}

#[test]
fn restricted_edits_follow_visibility() -> Result<(), Box<dyn std::error::Error>> {
    let interest = Record::new()
        .with("pkId", 3)
        .with("swaOrgRefAuthority", 1460)
        .with("streetStatus", 4);

    let mut hidden = TestSession::new();
    hidden.engine.store_mut().load_street(fixtures::street(1001))?;
    hidden
        .engine
        .store_mut()
        .set(SlotId::Street(StreetSubRecord::Interest), record(interest.clone()))?;
    assert!(!hidden.engine.has_street_changed());
    assert!(hidden.engine.changed_associated_record_types().is_empty());

    let mut visible = TestSession::with_settings(with_restricted());
    visible.engine.store_mut().load_street(fixtures::street(1001))?;
    visible
        .engine
        .store_mut()
        .set(SlotId::Street(StreetSubRecord::Interest), record(interest))?;
    assert!(visible.engine.has_street_changed());
    assert_eq!(
        visible.engine.changed_associated_record_types(),
        vec![ChangedRecordType {
            record_type: RecordType::StreetRecord(StreetSubRecord::Interest),
            count: 1,
        }]
    );
    Ok(())
}

#[test]
fn new_street_is_always_changed() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    session
        .engine
        .store_mut()
        .set(SlotId::CurrentStreet, Some(StagedValue::Street(fixtures::street(-1))))?;

    assert!(session.engine.has_street_changed());
    let counts = session.engine.changed_associated_record_types();
    let esus = counts
        .iter()
        .find(|changed| changed.record_type == RecordType::StreetRecord(StreetSubRecord::Esu))
        .ok_or("esus not listed")?;
    assert_eq!(esus.count, 2);
    Ok(())
}

// ============================================================================
// Property
// ============================================================================

#[test]
fn property_edits_are_counted_per_kind() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_property(fixtures::property(5001))?;
    assert!(!session.engine.has_property_changed());

    let store = session.engine.store_mut();
    store.set(
        SlotId::Property(PropertySubRecord::Lpi),
        record(fixtures::lpi(-1, "MILL COTTAGE")),
    )?;
    store.set(
        SlotId::Property(PropertySubRecord::Classification),
        record(Record::new().with("pkId", 12).with("blpuClass", "RD02")),
    )?;

    assert!(session.engine.has_property_changed());
    assert!(!session.engine.has_street_changed());
    assert_eq!(
        session.engine.changed_associated_record_types(),
        vec![
            ChangedRecordType {
                record_type: RecordType::PropertyRecord(PropertySubRecord::Lpi),
                count: 1,
            },
            ChangedRecordType {
                record_type: RecordType::PropertyRecord(PropertySubRecord::Classification),
                count: 1,
            },
        ]
    );
    Ok(())
}
