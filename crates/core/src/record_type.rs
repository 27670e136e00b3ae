use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Aggregate {
    Street,
    Property,
}

impl Aggregate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Street => "street",
            Self::Property => "property",
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-record kinds owned by a street. Each has one staging slot in the sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StreetSubRecord {
    Esu,
    Descriptor,
    OneWayExemption,
    HighwayDedication,
    SuccessorCrossRef,
    MaintenanceResponsibility,
    ReinstatementCategory,
    OsSpecialDesignation,
    Interest,
    Construction,
    SpecialDesignation,
    Hww,
    Prow,
    Note,
}

impl StreetSubRecord {
    pub const ALL: [StreetSubRecord; 14] = [
        Self::Esu,
        Self::Descriptor,
        Self::OneWayExemption,
        Self::HighwayDedication,
        Self::SuccessorCrossRef,
        Self::MaintenanceResponsibility,
        Self::ReinstatementCategory,
        Self::OsSpecialDesignation,
        Self::Interest,
        Self::Construction,
        Self::SpecialDesignation,
        Self::Hww,
        Self::Prow,
        Self::Note,
    ];

    pub fn code(&self) -> u16 {
        match self {
            Self::Esu => 13,
            Self::Descriptor => 15,
            Self::OneWayExemption => 16,
            Self::HighwayDedication => 17,
            Self::SuccessorCrossRef => 30,
            Self::MaintenanceResponsibility => 41,
            Self::ReinstatementCategory => 42,
            Self::OsSpecialDesignation => 43,
            Self::Interest => 51,
            Self::Construction => 52,
            Self::SpecialDesignation => 53,
            Self::Hww => 64,
            Self::Prow => 66,
            Self::Note => 72,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Esu => "esu",
            Self::Descriptor => "streetDescriptor",
            Self::OneWayExemption => "oneWayExemption",
            Self::HighwayDedication => "highwayDedication",
            Self::SuccessorCrossRef => "successorCrossRef",
            Self::MaintenanceResponsibility => "maintenanceResponsibility",
            Self::ReinstatementCategory => "reinstatementCategory",
            Self::OsSpecialDesignation => "osSpecialDesignation",
            Self::Interest => "interest",
            Self::Construction => "construction",
            Self::SpecialDesignation => "specialDesignation",
            Self::Hww => "hww",
            Self::Prow => "prow",
            Self::Note => "note",
        }
    }

    /// ASD collections, only visible to users with the matching permission.
    pub fn is_restricted(&self) -> bool {
        matches!(
            self,
            Self::MaintenanceResponsibility
                | Self::ReinstatementCategory
                | Self::OsSpecialDesignation
                | Self::Interest
                | Self::Construction
                | Self::SpecialDesignation
                | Self::Hww
                | Self::Prow
        )
    }

    /// Highway dedications and one-way exemptions live inside an ESU.
    pub fn is_esu_child(&self) -> bool {
        matches!(self, Self::HighwayDedication | Self::OneWayExemption)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertySubRecord {
    Provenance,
    AppCrossRef,
    Lpi,
    SuccessorCrossRef,
    Organisation,
    Classification,
    Note,
}

impl PropertySubRecord {
    pub const ALL: [PropertySubRecord; 7] = [
        Self::Provenance,
        Self::AppCrossRef,
        Self::Lpi,
        Self::SuccessorCrossRef,
        Self::Organisation,
        Self::Classification,
        Self::Note,
    ];

    pub fn code(&self) -> u16 {
        match self {
            Self::Provenance => 22,
            Self::AppCrossRef => 23,
            Self::Lpi => 24,
            Self::SuccessorCrossRef => 30,
            Self::Organisation => 31,
            Self::Classification => 32,
            Self::Note => 71,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provenance => "provenance",
            Self::AppCrossRef => "appCrossRef",
            Self::Lpi => "lpi",
            Self::SuccessorCrossRef => "successorCrossRef",
            Self::Organisation => "organisation",
            Self::Classification => "classification",
            Self::Note => "note",
        }
    }
}

/// Which kind of record a tab or validator call concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RecordType {
    Street,
    StreetRecord(StreetSubRecord),
    Property,
    PropertyRecord(PropertySubRecord),
}

pub const STREET_CODE: u16 = 11;
pub const PROPERTY_CODE: u16 = 21;

impl RecordType {
    pub fn aggregate(&self) -> Aggregate {
        match self {
            Self::Street | Self::StreetRecord(_) => Aggregate::Street,
            Self::Property | Self::PropertyRecord(_) => Aggregate::Property,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Street => STREET_CODE,
            Self::StreetRecord(kind) => kind.code(),
            Self::Property => PROPERTY_CODE,
            Self::PropertyRecord(kind) => kind.code(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Street => "street",
            Self::StreetRecord(kind) => kind.as_str(),
            Self::Property => "property",
            Self::PropertyRecord(kind) => kind.as_str(),
        }
    }

    /// Parse a record-type code. Codes are only unique within one aggregate
    /// (30 is a successor cross reference for both).
    pub fn from_code(aggregate: Aggregate, code: u16) -> Result<Self, CoreError> {
        let found = match aggregate {
            Aggregate::Street if code == STREET_CODE => Some(Self::Street),
            Aggregate::Street => StreetSubRecord::ALL
                .into_iter()
                .find(|kind| kind.code() == code)
                .map(Self::StreetRecord),
            Aggregate::Property if code == PROPERTY_CODE => Some(Self::Property),
            Aggregate::Property => PropertySubRecord::ALL
                .into_iter()
                .find(|kind| kind.code() == code)
                .map(Self::PropertyRecord),
        };
        found.ok_or(CoreError::UnknownRecordType {
            aggregate: aggregate.as_str(),
            code,
        })
    }

    /// Every record type of one aggregate, top-level first.
    pub fn all_for(aggregate: Aggregate) -> Vec<RecordType> {
        match aggregate {
            Aggregate::Street => std::iter::once(Self::Street)
                .chain(StreetSubRecord::ALL.into_iter().map(Self::StreetRecord))
                .collect(),
            Aggregate::Property => std::iter::once(Self::Property)
                .chain(PropertySubRecord::ALL.into_iter().map(Self::PropertyRecord))
                .collect(),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.code())
    }
}
