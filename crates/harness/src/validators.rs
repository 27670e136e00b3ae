use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use gazetteer_core::{Aggregate, Record, RecordType};
use gazetteer_engine::{FieldError, ValidationContext, Validator, ValidatorRegistry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorCall {
    pub record_type: RecordType,
    pub record: Record,
    pub index: usize,
    pub scottish: bool,
    pub welsh: bool,
}

#[derive(Default)]
struct Script {
    results: BTreeMap<RecordType, Vec<FieldError>>,
    calls: Vec<ValidatorCall>,
}

/// Validators whose results are set by the test, recording every call.
#[derive(Clone, Default)]
pub struct ScriptedValidators {
    script: Rc<RefCell<Script>>,
}

struct Scripted {
    record_type: RecordType,
    script: Rc<RefCell<Script>>,
}

impl Validator for Scripted {
    fn validate(&self, record: &Record, index: usize, ctx: &ValidationContext<'_>) -> Vec<FieldError> {
        let mut script = self.script.borrow_mut();
        script.calls.push(ValidatorCall {
            record_type: self.record_type,
            record: record.clone(),
            index,
            scottish: ctx.jurisdiction.scottish,
            welsh: ctx.jurisdiction.welsh,
        });
        script.results.get(&self.record_type).cloned().unwrap_or_default()
    }
}

impl ScriptedValidators {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with one scripted validator for every record type.
    pub fn registry(&self) -> ValidatorRegistry {
        let mut registry = ValidatorRegistry::new();
        for aggregate in [Aggregate::Street, Aggregate::Property] {
            for record_type in RecordType::all_for(aggregate) {
                registry.register(
                    record_type,
                    Scripted {
                        record_type,
                        script: Rc::clone(&self.script),
                    },
                );
            }
        }
        registry
    }

    pub fn fail_with(&self, record_type: RecordType, errors: Vec<FieldError>) {
        self.script.borrow_mut().results.insert(record_type, errors);
    }

    pub fn pass(&self, record_type: RecordType) {
        self.script.borrow_mut().results.remove(&record_type);
    }

    pub fn calls(&self) -> Vec<ValidatorCall> {
        self.script.borrow().calls.clone()
    }
}
