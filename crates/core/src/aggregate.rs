use serde::{Deserialize, Serialize};

use crate::record::Record;
use crate::record_type::{PropertySubRecord, StreetSubRecord};

pub const USRN: &str = "usrn";
pub const UPRN: &str = "uprn";
pub const ESU_ID: &str = "esuId";

/// An elementary street unit with the records it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Esu {
    pub record: Record,
    pub highway_dedications: Vec<Record>,
    pub one_way_exemptions: Vec<Record>,
}

impl Esu {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn esu_id(&self) -> Option<i64> {
        self.record.integer(ESU_ID)
    }

    pub fn children(&self, kind: StreetSubRecord) -> Option<&Vec<Record>> {
        match kind {
            StreetSubRecord::HighwayDedication => Some(&self.highway_dedications),
            StreetSubRecord::OneWayExemption => Some(&self.one_way_exemptions),
            _ => None,
        }
    }

    pub fn children_mut(&mut self, kind: StreetSubRecord) -> Option<&mut Vec<Record>> {
        match kind {
            StreetSubRecord::HighwayDedication => Some(&mut self.highway_dedications),
            StreetSubRecord::OneWayExemption => Some(&mut self.one_way_exemptions),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Street {
    pub record: Record,
    pub descriptors: Vec<Record>,
    pub esus: Vec<Esu>,
    pub successor_cross_refs: Vec<Record>,
    pub notes: Vec<Record>,
    pub maintenance_responsibilities: Vec<Record>,
    pub reinstatement_categories: Vec<Record>,
    pub os_special_designations: Vec<Record>,
    pub interests: Vec<Record>,
    pub constructions: Vec<Record>,
    pub special_designations: Vec<Record>,
    pub hww: Vec<Record>,
    pub prow: Vec<Record>,
}

impl Street {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn usrn(&self) -> Option<i64> {
        self.record.integer(USRN)
    }

    pub fn is_new(&self) -> bool {
        self.usrn().is_some_and(|usrn| usrn < 0)
    }

    /// The flat collection holding records of `kind`. ESUs and their
    /// children are not flat and return `None`.
    pub fn collection(&self, kind: StreetSubRecord) -> Option<&Vec<Record>> {
        Some(match kind {
            StreetSubRecord::Descriptor => &self.descriptors,
            StreetSubRecord::SuccessorCrossRef => &self.successor_cross_refs,
            StreetSubRecord::Note => &self.notes,
            StreetSubRecord::MaintenanceResponsibility => &self.maintenance_responsibilities,
            StreetSubRecord::ReinstatementCategory => &self.reinstatement_categories,
            StreetSubRecord::OsSpecialDesignation => &self.os_special_designations,
            StreetSubRecord::Interest => &self.interests,
            StreetSubRecord::Construction => &self.constructions,
            StreetSubRecord::SpecialDesignation => &self.special_designations,
            StreetSubRecord::Hww => &self.hww,
            StreetSubRecord::Prow => &self.prow,
            StreetSubRecord::Esu
            | StreetSubRecord::HighwayDedication
            | StreetSubRecord::OneWayExemption => return None,
        })
    }

    pub fn collection_mut(&mut self, kind: StreetSubRecord) -> Option<&mut Vec<Record>> {
        Some(match kind {
            StreetSubRecord::Descriptor => &mut self.descriptors,
            StreetSubRecord::SuccessorCrossRef => &mut self.successor_cross_refs,
            StreetSubRecord::Note => &mut self.notes,
            StreetSubRecord::MaintenanceResponsibility => &mut self.maintenance_responsibilities,
            StreetSubRecord::ReinstatementCategory => &mut self.reinstatement_categories,
            StreetSubRecord::OsSpecialDesignation => &mut self.os_special_designations,
            StreetSubRecord::Interest => &mut self.interests,
            StreetSubRecord::Construction => &mut self.constructions,
            StreetSubRecord::SpecialDesignation => &mut self.special_designations,
            StreetSubRecord::Hww => &mut self.hww,
            StreetSubRecord::Prow => &mut self.prow,
            StreetSubRecord::Esu
            | StreetSubRecord::HighwayDedication
            | StreetSubRecord::OneWayExemption => return None,
        })
    }

    pub fn esu(&self, esu_id: i64) -> Option<&Esu> {
        self.esus.iter().find(|esu| esu.esu_id() == Some(esu_id))
    }

    pub fn esu_mut(&mut self, esu_id: i64) -> Option<&mut Esu> {
        self.esus.iter_mut().find(|esu| esu.esu_id() == Some(esu_id))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub record: Record,
    pub lpis: Vec<Record>,
    pub app_cross_refs: Vec<Record>,
    pub provenances: Vec<Record>,
    pub classifications: Vec<Record>,
    pub organisations: Vec<Record>,
    pub successor_cross_refs: Vec<Record>,
    pub notes: Vec<Record>,
}

impl Property {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn uprn(&self) -> Option<i64> {
        self.record.integer(UPRN)
    }

    pub fn is_new(&self) -> bool {
        self.uprn().is_some_and(|uprn| uprn < 0)
    }

    pub fn collection(&self, kind: PropertySubRecord) -> &Vec<Record> {
        match kind {
            PropertySubRecord::Lpi => &self.lpis,
            PropertySubRecord::AppCrossRef => &self.app_cross_refs,
            PropertySubRecord::Provenance => &self.provenances,
            PropertySubRecord::Classification => &self.classifications,
            PropertySubRecord::Organisation => &self.organisations,
            PropertySubRecord::SuccessorCrossRef => &self.successor_cross_refs,
            PropertySubRecord::Note => &self.notes,
        }
    }

    pub fn collection_mut(&mut self, kind: PropertySubRecord) -> &mut Vec<Record> {
        match kind {
            PropertySubRecord::Lpi => &mut self.lpis,
            PropertySubRecord::AppCrossRef => &mut self.app_cross_refs,
            PropertySubRecord::Provenance => &mut self.provenances,
            PropertySubRecord::Classification => &mut self.classifications,
            PropertySubRecord::Organisation => &mut self.organisations,
            PropertySubRecord::SuccessorCrossRef => &mut self.successor_cross_refs,
            PropertySubRecord::Note => &mut self.notes,
        }
    }
}
