use gazetteer_core::aggregate::{ESU_ID, UPRN, USRN};
use gazetteer_core::{Esu, Property, Record, Street};

pub fn descriptor(pk_id: i64, text: &str) -> Record {
    Record::new()
        .with("pkId", pk_id)
        .with("streetDescriptor", text)
        .with("language", "ENG")
        .with("locality", "MILLBROOK")
}

pub fn esu(esu_id: i64, pk_id: i64, geometry: &str) -> Esu {
    Esu::new(
        Record::new()
            .with(ESU_ID, esu_id)
            .with("pkId", pk_id)
            .with("geometry", geometry),
    )
}

pub fn highway_dedication(pk_id: i64, esu_id: i64, code: i64) -> Record {
    Record::new()
        .with("pkId", pk_id)
        .with(ESU_ID, esu_id)
        .with("highwayDedicationCode", code)
}

pub fn one_way_exemption(pk_id: i64, esu_id: i64, exemption_type: i64) -> Record {
    Record::new()
        .with("pkId", pk_id)
        .with(ESU_ID, esu_id)
        .with("oneWayExemptionTypeCode", exemption_type)
}

/// A saved street with one descriptor, two ESUs (the first with a highway
/// dedication and a one-way exemption) and one interest.
pub fn street(usrn: i64) -> Street {
    let mut street = Street::new(
        Record::new()
            .with(USRN, usrn)
            .with("recordType", 1)
            .with("state", 2)
            .with("lastUpdated", "2024-03-01T09:00:00"),
    );
    street.descriptors.push(descriptor(1, "MILL LANE"));

    let mut first = esu(100, 5, "LINESTRING (0 0, 50 0)");
    first.highway_dedications.push(highway_dedication(7, 100, 2));
    first.one_way_exemptions.push(one_way_exemption(8, 100, 1));
    street.esus.push(first);
    street.esus.push(esu(200, 6, "LINESTRING (50 0, 90 10)"));

    street.interests.push(
        Record::new()
            .with("pkId", 3)
            .with("swaOrgRefAuthority", 1460)
            .with("streetStatus", 1),
    );
    street.notes.push(Record::new().with("pkId", 4).with("note", "Adopted 1998"));
    street
}

pub fn street_json(usrn: i64) -> serde_json::Value {
    serde_json::json!({
        "usrn": usrn,
        "recordType": 1,
        "state": 2,
        "lastUpdated": "2024-03-01T09:00:00",
        "streetDescriptors": [
            {"pkId": 1, "streetDescriptor": "MILL LANE", "language": "ENG", "locality": "MILLBROOK"}
        ],
        "esus": [
            {
                "esuId": 100,
                "pkId": 5,
                "geometry": "LINESTRING (0 0, 50 0)",
                "highwayDedications": [{"pkId": 7, "esuId": 100, "highwayDedicationCode": 2}],
                "oneWayExemptions": [{"pkId": 8, "esuId": 100, "oneWayExemptionTypeCode": 1}]
            },
            {"esuId": 200, "pkId": 6, "geometry": "LINESTRING (50 0, 90 10)"}
        ],
        "interests": [{"pkId": 3, "swaOrgRefAuthority": 1460, "streetStatus": 1}],
        "streetNotes": [{"pkId": 4, "note": "Adopted 1998"}]
    })
}

pub fn lpi(pk_id: i64, pao_text: &str) -> Record {
    Record::new()
        .with("pkId", pk_id)
        .with("paoText", pao_text)
        .with("usrn", 1001)
        .with("address", format!("{pao_text}, MILL LANE"))
}

pub fn property(uprn: i64) -> Property {
    let mut property = Property::new(
        Record::new()
            .with(UPRN, uprn)
            .with("logicalStatus", 1)
            .with("xcoordinate", 452_000)
            .with("ycoordinate", 230_100),
    );
    property.lpis.push(lpi(11, "MILL HOUSE"));
    property
        .classifications
        .push(Record::new().with("pkId", 12).with("blpuClass", "RD04"));
    property
}
