use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use gazetteer_core::{Aggregate, RecordType};

/// Messages raised against one field of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub errors: Vec<String>,
}

impl FieldError {
    pub fn new(field: &str, error: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            errors: vec![error.into()],
        }
    }
}

/// Persisted form of one aggregate's errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBag {
    pub has_errors: bool,
    pub lists: Vec<(RecordType, Vec<FieldError>)>,
}

/// Field errors per record type. A type with no entry has never been
/// validated (or was reset); an empty entry was validated clean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorAggregator {
    lists: BTreeMap<RecordType, Vec<FieldError>>,
    street_has_errors: bool,
    property_has_errors: bool,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self, record_type: RecordType) -> Option<&[FieldError]> {
        self.lists.get(&record_type).map(Vec::as_slice)
    }

    pub fn has_errors(&self, aggregate: Aggregate) -> bool {
        match aggregate {
            Aggregate::Street => self.street_has_errors,
            Aggregate::Property => self.property_has_errors,
        }
    }

    /// Replace the supplied lists and recompute the aggregate's flag. Lists
    /// for record types of the other aggregate are ignored.
    pub fn set_errors<I>(&mut self, aggregate: Aggregate, lists: I)
    where
        I: IntoIterator<Item = (RecordType, Vec<FieldError>)>,
    {
        for (record_type, errors) in lists {
            if record_type.aggregate() != aggregate {
                tracing::warn!(
                    target: "gazetteer.errors",
                    %aggregate,
                    record_type = record_type.as_str(),
                    "error list for another aggregate ignored"
                );
                continue;
            }
            self.lists.insert(record_type, errors);
        }
        self.recompute(aggregate);
    }

    pub fn reset_errors(&mut self) {
        self.lists.clear();
        self.street_has_errors = false;
        self.property_has_errors = false;
    }

    fn recompute(&mut self, aggregate: Aggregate) {
        let any = self
            .lists
            .iter()
            .any(|(record_type, errors)| record_type.aggregate() == aggregate && !errors.is_empty());
        match aggregate {
            Aggregate::Street => self.street_has_errors = any,
            Aggregate::Property => self.property_has_errors = any,
        }
    }

    pub fn bag(&self, aggregate: Aggregate) -> ErrorBag {
        ErrorBag {
            has_errors: self.has_errors(aggregate),
            lists: self
                .lists
                .iter()
                .filter(|(record_type, _)| record_type.aggregate() == aggregate)
                .map(|(record_type, errors)| (*record_type, errors.clone()))
                .collect(),
        }
    }

    /// Replace one aggregate's errors with a persisted bag. The flag is
    /// recomputed rather than trusted.
    pub fn restore(&mut self, aggregate: Aggregate, bag: ErrorBag) {
        self.lists.retain(|record_type, _| record_type.aggregate() != aggregate);
        self.set_errors(aggregate, bag.lists);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazetteer_core::{PropertySubRecord, StreetSubRecord};

    const ESU: RecordType = RecordType::StreetRecord(StreetSubRecord::Esu);

    #[test]
    fn flag_is_or_over_lists() {
        let mut errors = ErrorAggregator::new();
        errors.set_errors(
            Aggregate::Street,
            [(RecordType::Street, vec![FieldError::new("usrn", "required")])],
        );
        assert!(errors.has_errors(Aggregate::Street));

        errors.set_errors(Aggregate::Street, [(ESU, vec![])]);
        assert!(errors.has_errors(Aggregate::Street));
        assert_eq!(errors.errors(ESU), Some(&[][..]));

        errors.set_errors(Aggregate::Street, [(RecordType::Street, vec![])]);
        assert!(!errors.has_errors(Aggregate::Street));
        assert!(!errors.has_errors(Aggregate::Property));
    }

    #[test]
    fn other_aggregate_lists_are_ignored() {
        let mut errors = ErrorAggregator::new();
        let lpi = RecordType::PropertyRecord(PropertySubRecord::Lpi);
        errors.set_errors(Aggregate::Street, [(lpi, vec![FieldError::new("paoText", "required")])]);
        assert!(errors.errors(lpi).is_none());
        assert!(!errors.has_errors(Aggregate::Property));
    }

    #[test]
    fn reset_nulls_everything() {
        let mut errors = ErrorAggregator::new();
        errors.set_errors(Aggregate::Street, [(ESU, vec![FieldError::new("geometry", "required")])]);
        errors.reset_errors();
        assert!(errors.errors(ESU).is_none());
        assert!(!errors.has_errors(Aggregate::Street));
    }

    #[test]
    fn bag_restores_one_aggregate() {
        let mut errors = ErrorAggregator::new();
        let lpi = RecordType::PropertyRecord(PropertySubRecord::Lpi);
        errors.set_errors(Aggregate::Street, [(ESU, vec![FieldError::new("geometry", "required")])]);
        errors.set_errors(Aggregate::Property, [(lpi, vec![])]);

        let street = errors.bag(Aggregate::Street);
        let mut restored = ErrorAggregator::new();
        restored.restore(Aggregate::Street, street);
        assert_eq!(restored.errors(ESU), errors.errors(ESU));
        assert!(restored.has_errors(Aggregate::Street));
        assert!(restored.errors(lpi).is_none());
    }
}
