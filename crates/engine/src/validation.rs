use std::collections::BTreeMap;

use gazetteer_core::{Aggregate, CoreError, Record, RecordType};

use crate::change;
use crate::config::Jurisdiction;
use crate::error::EngineError;
use crate::error_bag::{ErrorAggregator, FieldError};
use crate::sandbox::{self, Sandbox};

/// Read-only reference tables handed through to validators.
#[derive(Debug, Clone, Default)]
pub struct Lookups {
    tables: BTreeMap<String, Vec<Record>>,
}

impl Lookups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, rows: Vec<Record>) -> Self {
        self.tables.insert(name.to_string(), rows);
        self
    }

    pub fn table(&self, name: &str) -> &[Record] {
        self.tables.get(name).map_or(&[][..], Vec::as_slice)
    }
}

pub struct ValidationContext<'a> {
    pub lookups: &'a Lookups,
    pub jurisdiction: Jurisdiction,
}

/// Checks one record. `index` is the record's position in its parent
/// collection, used to qualify messages per instance.
pub trait Validator {
    fn validate(&self, record: &Record, index: usize, ctx: &ValidationContext<'_>) -> Vec<FieldError>;
}

impl<F> Validator for F
where
    F: Fn(&Record, usize, &ValidationContext<'_>) -> Vec<FieldError>,
{
    fn validate(&self, record: &Record, index: usize, ctx: &ValidationContext<'_>) -> Vec<FieldError> {
        self(record, index, ctx)
    }
}

#[derive(Default)]
pub struct ValidatorRegistry {
    validators: BTreeMap<RecordType, Box<dyn Validator>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, record_type: RecordType, validator: impl Validator + 'static) -> &mut Self {
        self.validators.insert(record_type, Box::new(validator));
        self
    }

    pub fn get(&self, record_type: RecordType) -> Option<&dyn Validator> {
        self.validators.get(&record_type).map(|validator| &**validator)
    }

    pub fn contains(&self, record_type: RecordType) -> bool {
        self.validators.contains_key(&record_type)
    }

    /// Record types of `aggregate` without a validator.
    pub fn missing(&self, aggregate: Aggregate) -> Vec<RecordType> {
        RecordType::all_for(aggregate)
            .into_iter()
            .filter(|record_type| !self.contains(*record_type))
            .collect()
    }
}

/// The record a validation call targets and its position in its collection.
fn staged_target(record_type: RecordType, sandbox: &Sandbox) -> Option<(Record, usize)> {
    match record_type {
        RecordType::Street => Some((sandbox.effective_street()?.record, 0)),
        RecordType::StreetRecord(kind) => {
            let record = sandbox.street_record(kind)?;
            let street = sandbox.effective_street()?;
            Some((record.clone(), sandbox::street_record_index(&street, kind, record)))
        }
        RecordType::Property => Some((sandbox.effective_property()?.record, 0)),
        RecordType::PropertyRecord(kind) => {
            let record = sandbox.property_record(kind)?;
            let property = sandbox.effective_property()?;
            Some((record.clone(), sandbox::property_record_index(&property, kind, record)))
        }
    }
}

fn aggregate_modified(aggregate: Aggregate, sandbox: &Sandbox) -> bool {
    match aggregate {
        Aggregate::Street => change::street_changed(sandbox, true),
        Aggregate::Property => change::property_changed(sandbox),
    }
}

/// Routes a save attempt to the validator for one record type.
pub struct Dispatcher {
    registry: ValidatorRegistry,
}

impl Dispatcher {
    pub fn new(registry: ValidatorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Validate the staged record of `record_type` and store the result in
    /// that type's slot of `errors`. Returns `Ok(true)` without running
    /// anything when the aggregate is unmodified or nothing of that type is
    /// staged.
    pub fn validate(
        &self,
        record_type: RecordType,
        sandbox: &Sandbox,
        errors: &mut ErrorAggregator,
        ctx: &ValidationContext<'_>,
    ) -> Result<bool, EngineError> {
        let aggregate = record_type.aggregate();
        if !aggregate_modified(aggregate, sandbox) {
            tracing::debug!(target: "gazetteer.validation", %record_type, "aggregate unmodified");
            return Ok(true);
        }
        let Some((record, index)) = staged_target(record_type, sandbox) else {
            tracing::debug!(target: "gazetteer.validation", %record_type, "nothing staged");
            return Ok(true);
        };
        let validator = self
            .registry
            .get(record_type)
            .ok_or(EngineError::MissingValidator(record_type))?;

        let found = validator.validate(&record, index, ctx);
        let valid = found.is_empty();
        tracing::debug!(
            target: "gazetteer.validation",
            %record_type,
            index,
            errors = found.len(),
            "validated"
        );
        errors.set_errors(aggregate, [(record_type, found)]);
        Ok(valid)
    }

    /// As [`Dispatcher::validate`], for a raw record-type code.
    pub fn validate_code(
        &self,
        aggregate: Aggregate,
        code: u16,
        sandbox: &Sandbox,
        errors: &mut ErrorAggregator,
        ctx: &ValidationContext<'_>,
    ) -> Result<bool, EngineError> {
        let record_type = RecordType::from_code(aggregate, code).map_err(|err| match err {
            CoreError::UnknownRecordType { code, .. } => EngineError::UnknownRecordType { aggregate, code },
            other => EngineError::Core(other),
        })?;
        self.validate(record_type, sandbox, errors, ctx)
    }
}
