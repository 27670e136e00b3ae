//! Conversion from the plain JSON shapes produced by the fetch path and by
//! form controls into records and aggregates.

use serde_json::{Map, Value};

use crate::aggregate::{Esu, Property, Street};
use crate::error::CoreError;
use crate::field_value::FieldValue;
use crate::record::Record;
use crate::record_type::{PropertySubRecord, StreetSubRecord};

const ESUS: &str = "esus";
const HIGHWAY_DEDICATIONS: &str = "highwayDedications";
const ONE_WAY_EXEMPTIONS: &str = "oneWayExemptions";

fn street_key(kind: StreetSubRecord) -> Option<&'static str> {
    Some(match kind {
        StreetSubRecord::Descriptor => "streetDescriptors",
        StreetSubRecord::SuccessorCrossRef => "successorCrossRefs",
        StreetSubRecord::Note => "streetNotes",
        StreetSubRecord::MaintenanceResponsibility => "maintenanceResponsibilities",
        StreetSubRecord::ReinstatementCategory => "reinstatementCategories",
        StreetSubRecord::OsSpecialDesignation => "osSpecialDesignations",
        StreetSubRecord::Interest => "interests",
        StreetSubRecord::Construction => "constructions",
        StreetSubRecord::SpecialDesignation => "specialDesignations",
        StreetSubRecord::Hww => "heightWidthWeights",
        StreetSubRecord::Prow => "publicRightOfWays",
        StreetSubRecord::Esu
        | StreetSubRecord::HighwayDedication
        | StreetSubRecord::OneWayExemption => return None,
    })
}

fn property_key(kind: PropertySubRecord) -> &'static str {
    match kind {
        PropertySubRecord::Lpi => "lpis",
        PropertySubRecord::AppCrossRef => "blpuAppCrossRefs",
        PropertySubRecord::Provenance => "blpuProvenances",
        PropertySubRecord::Classification => "classifications",
        PropertySubRecord::Organisation => "organisations",
        PropertySubRecord::SuccessorCrossRef => "successorCrossRefs",
        PropertySubRecord::Note => "blpuNotes",
    }
}

pub fn field_value_from_json(value: &Value) -> Result<FieldValue, CoreError> {
    Ok(match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Float(
                n.as_f64()
                    .ok_or_else(|| CoreError::InvalidData(format!("unrepresentable number {n}")))?,
            ),
        },
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Array(items) => FieldValue::List(
            items
                .iter()
                .map(field_value_from_json)
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(_) => {
            return Err(CoreError::InvalidData("nested object in record field".into()));
        }
    })
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>, CoreError> {
    value
        .as_object()
        .ok_or_else(|| CoreError::InvalidData(format!("{what} must be a JSON object")))
}

/// Build a record from an object, leaving out `skip` keys (lifted collections).
fn record_from_object(object: &Map<String, Value>, skip: &[&str]) -> Result<Record, CoreError> {
    object
        .iter()
        .filter(|(key, _)| !skip.contains(&key.as_str()))
        .map(|(key, value)| Ok((key.clone(), field_value_from_json(value)?)))
        .collect()
}

pub fn record_from_json(value: &Value) -> Result<Record, CoreError> {
    record_from_object(as_object(value, "record")?, &[])
}

fn records_at(object: &Map<String, Value>, key: &str) -> Result<Vec<Record>, CoreError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(record_from_json).collect(),
        Some(_) => Err(CoreError::InvalidData(format!("{key} must be an array"))),
    }
}

pub fn esu_from_json(value: &Value) -> Result<Esu, CoreError> {
    let object = as_object(value, "esu")?;
    Ok(Esu {
        record: record_from_object(object, &[HIGHWAY_DEDICATIONS, ONE_WAY_EXEMPTIONS])?,
        highway_dedications: records_at(object, HIGHWAY_DEDICATIONS)?,
        one_way_exemptions: records_at(object, ONE_WAY_EXEMPTIONS)?,
    })
}

pub fn street_from_json(value: &Value) -> Result<Street, CoreError> {
    let object = as_object(value, "street")?;
    let mut skip: Vec<&str> = StreetSubRecord::ALL.into_iter().filter_map(street_key).collect();
    skip.push(ESUS);

    let mut street = Street::new(record_from_object(object, &skip)?);
    for kind in StreetSubRecord::ALL {
        if let (Some(key), Some(collection)) = (street_key(kind), street.collection_mut(kind)) {
            *collection = records_at(object, key)?;
        }
    }
    street.esus = match object.get(ESUS) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(esu_from_json).collect::<Result<_, _>>()?,
        Some(_) => return Err(CoreError::InvalidData("esus must be an array".into())),
    };
    Ok(street)
}

pub fn property_from_json(value: &Value) -> Result<Property, CoreError> {
    let object = as_object(value, "property")?;
    let skip: Vec<&str> = PropertySubRecord::ALL.into_iter().map(property_key).collect();

    let mut property = Property::new(record_from_object(object, &skip)?);
    for kind in PropertySubRecord::ALL {
        *property.collection_mut(kind) = records_at(object, property_key(kind))?;
    }
    Ok(property)
}
