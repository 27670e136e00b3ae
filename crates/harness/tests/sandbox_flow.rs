use gazetteer_core::aggregate::ESU_ID;
use gazetteer_core::{Aggregate, FieldValue, PropertySubRecord, Record, RecordType, StreetSubRecord};
use gazetteer_engine::{ClearReason, FieldError, ResetScope, SlotId, StagedValue};
use gazetteer_harness::{TestSession, fixtures};

const ESU: SlotId = SlotId::Street(StreetSubRecord::Esu);
const DEDICATION: SlotId = SlotId::Street(StreetSubRecord::HighwayDedication);
const EXEMPTION: SlotId = SlotId::Street(StreetSubRecord::OneWayExemption);
const DESCRIPTOR: SlotId = SlotId::Street(StreetSubRecord::Descriptor);

fn record(value: Record) -> Option<StagedValue> {
    Some(StagedValue::Record(value))
}

// ============================================================================
// Staging
// ============================================================================

#[test]
fn set_stages_one_slot() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;

    let edited = fixtures::descriptor(1, "MILL ROAD");
    store.set(DESCRIPTOR, record(edited.clone()))?;

    let sandbox = session.engine.sandbox();
    assert_eq!(sandbox.street_record(StreetSubRecord::Descriptor), Some(&edited));
    assert!(sandbox.current_street().is_none());
    assert!(sandbox.source_street().is_some());
    Ok(())
}

#[test]
fn value_of_wrong_shape_empties_slot() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.set(DESCRIPTOR, record(fixtures::descriptor(1, "MILL ROAD")))?;

    // A sub-record offered for the street slot and a street offered for a
    // sub-record slot are both dropped.
    store.set(SlotId::CurrentStreet, record(fixtures::descriptor(2, "MILL ROAD")))?;
    store.set(DESCRIPTOR, Some(StagedValue::Street(fixtures::street(1001))))?;

    let sandbox = session.engine.sandbox();
    assert!(sandbox.current_street().is_none());
    assert!(!sandbox.is_staged(DESCRIPTOR));
    Ok(())
}

#[test]
fn form_json_is_staged_per_slot() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();

    store.set_json(SlotId::CurrentStreet, &fixtures::street_json(1001).to_string())?;
    store.set_json(DESCRIPTOR, r#"{"pkId": -1, "streetDescriptor": "NEW ROAD"}"#)?;
    store.set_json(SlotId::Street(StreetSubRecord::Note), "{not json")?;

    let sandbox = session.engine.sandbox();
    assert_eq!(sandbox.current_street(), Some(&fixtures::street(1001)));
    let descriptor = sandbox
        .street_record(StreetSubRecord::Descriptor)
        .ok_or("descriptor not staged")?;
    assert_eq!(descriptor.pk_id(), Some(-1));
    assert!(descriptor.is_new());
    assert!(!sandbox.is_staged(SlotId::Street(StreetSubRecord::Note)));
    Ok(())
}

// ============================================================================
// Cascade clearing
// ============================================================================

#[test]
fn replacing_esu_clears_its_children() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;
    store.set(DEDICATION, record(fixtures::highway_dedication(7, 100, 4)))?;
    store.set(EXEMPTION, record(fixtures::one_way_exemption(8, 100, 3)))?;
    store.set(DESCRIPTOR, record(fixtures::descriptor(1, "MILL ROAD")))?;

    let other = fixtures::esu(200, 6, "LINESTRING (50 0, 95 10)").record;
    store.set_and_clear(ESU, record(other.clone()), ClearReason::Street(StreetSubRecord::Esu))?;

    let sandbox = session.engine.sandbox();
    assert!(!sandbox.is_staged(DEDICATION));
    assert!(!sandbox.is_staged(EXEMPTION));
    // The update survives its own reason, unrelated slots are untouched.
    assert_eq!(sandbox.street_record(StreetSubRecord::Esu), Some(&other));
    assert!(sandbox.is_staged(DESCRIPTOR));
    Ok(())
}

#[test]
fn associated_street_reason_keeps_the_street() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.set(SlotId::CurrentStreet, Some(StagedValue::Street(fixtures::street(1001))))?;
    store.set(DESCRIPTOR, record(fixtures::descriptor(1, "MILL ROAD")))?;
    store.set(ESU, record(fixtures::esu(100, 5, "LINESTRING (0 0, 60 0)").record))?;
    store.set(
        SlotId::Property(PropertySubRecord::Lpi),
        record(fixtures::lpi(11, "MILL COTTAGE")),
    )?;

    let note = Record::new().with("pkId", -1).with("note", "Resurfaced");
    store.set_and_clear(
        SlotId::Street(StreetSubRecord::Note),
        record(note.clone()),
        ClearReason::AssociatedStreet,
    )?;

    let sandbox = session.engine.sandbox();
    assert!(sandbox.current_street().is_some());
    assert!(!sandbox.is_staged(DESCRIPTOR));
    assert!(!sandbox.is_staged(ESU));
    assert_eq!(sandbox.street_record(StreetSubRecord::Note), Some(&note));
    assert!(sandbox.is_staged(SlotId::Property(PropertySubRecord::Lpi)));
    Ok(())
}

#[test]
fn all_street_reason_clears_the_street_too() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;
    store.set(SlotId::CurrentStreet, Some(StagedValue::Street(fixtures::street(1001))))?;
    store.set(DESCRIPTOR, record(fixtures::descriptor(1, "MILL ROAD")))?;

    store.set_and_clear(SlotId::CurrentProperty, None, ClearReason::AllStreet)?;

    let sandbox = session.engine.sandbox();
    assert!(sandbox.current_street().is_none());
    assert!(!sandbox.is_staged(DESCRIPTOR));
    // Sources are only ever cleared by reset.
    assert!(sandbox.source_street().is_some());
    Ok(())
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn street_reset_keeps_source_property() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;
    store.load_property(fixtures::property(5001))?;
    store.set(SlotId::CurrentStreet, Some(StagedValue::Street(fixtures::street(1001))))?;
    store.set(SlotId::CurrentProperty, Some(StagedValue::Property(fixtures::property(5001))))?;
    store.set(DESCRIPTOR, record(fixtures::descriptor(1, "MILL ROAD")))?;
    store.set(
        SlotId::Property(PropertySubRecord::Lpi),
        record(fixtures::lpi(11, "MILL COTTAGE")),
    )?;
    store.set_errors(
        Aggregate::Street,
        [(RecordType::Street, vec![FieldError::new("state", "required")])],
    )?;

    store.reset(ResetScope::Street)?;

    let sandbox = session.engine.sandbox();
    assert!(sandbox.source_street().is_none());
    assert_eq!(sandbox.source_property(), Some(&fixtures::property(5001)));
    assert!(sandbox.current_street().is_none());
    assert!(sandbox.current_property().is_none());
    assert!(SlotId::all().all(|slot| !sandbox.is_staged(slot)));
    assert!(!session.engine.errors().has_errors(Aggregate::Street));
    assert_eq!(session.engine.errors().errors(RecordType::Street), None);
    Ok(())
}

#[test]
fn property_reset_keeps_source_street() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;
    store.load_property(fixtures::property(5001))?;

    store.reset(ResetScope::Property)?;

    let sandbox = session.engine.sandbox();
    assert!(sandbox.source_street().is_some());
    assert!(sandbox.source_property().is_none());
    Ok(())
}

#[test]
fn navigating_away_clears_everything() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;
    store.load_property(fixtures::property(5001))?;
    store.set(DESCRIPTOR, record(fixtures::descriptor(1, "MILL ROAD")))?;
    store.set_active_tab(Aggregate::Street, 3)?;
    store.set_active_tab(Aggregate::Property, 1)?;

    // Switching streets keeps the current tab; leaving the page does not.
    store.reset(ResetScope::Street)?;
    assert_eq!(store.active_tabs().get(Aggregate::Street), 3);

    store.reset(ResetScope::NavigateAway)?;
    assert!(store.sandbox().is_empty());
    assert_eq!(store.active_tabs().get(Aggregate::Street), 0);
    assert_eq!(store.active_tabs().get(Aggregate::Property), 0);
    Ok(())
}

#[test]
fn staged_esu_children_follow_their_parent() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = TestSession::new();
    let store = session.engine.store_mut();
    store.load_street(fixtures::street(1001))?;
    store.set(DEDICATION, record(fixtures::highway_dedication(-1, 200, 1)))?;

    let street = session.engine.sandbox().effective_street().ok_or("no street")?;
    let esu = street.esu(200).ok_or("esu 200 missing")?;
    assert_eq!(esu.highway_dedications.len(), 1);
    assert_eq!(
        esu.highway_dedications[0].get(ESU_ID),
        Some(&FieldValue::Integer(200))
    );
    // The first ESU keeps its own dedication.
    assert_eq!(street.esu(100).ok_or("esu 100 missing")?.highway_dedications.len(), 1);
    Ok(())
}
