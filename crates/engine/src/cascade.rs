use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use gazetteer_core::{Aggregate, PropertySubRecord, StreetSubRecord};

/// A mutable staging slot in the sandbox. Source snapshots are not slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotId {
    CurrentStreet,
    CurrentProperty,
    Street(StreetSubRecord),
    Property(PropertySubRecord),
}

impl SlotId {
    pub fn aggregate(&self) -> Aggregate {
        match self {
            Self::CurrentStreet | Self::Street(_) => Aggregate::Street,
            Self::CurrentProperty | Self::Property(_) => Aggregate::Property,
        }
    }

    pub fn all() -> impl Iterator<Item = SlotId> {
        [Self::CurrentStreet, Self::CurrentProperty]
            .into_iter()
            .chain(StreetSubRecord::ALL.into_iter().map(Self::Street))
            .chain(PropertySubRecord::ALL.into_iter().map(Self::Property))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClearReason {
    AllStreet,
    AssociatedStreet,
    AllProperty,
    AssociatedProperty,
    Street(StreetSubRecord),
    Property(PropertySubRecord),
}

/// Which slots each clear reason nulls.
#[derive(Debug, Clone, Default)]
pub struct CascadeTable {
    rules: BTreeMap<ClearReason, BTreeSet<SlotId>>,
}

impl CascadeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut table = Self::new();

        table.add(ClearReason::AllStreet, SlotId::CurrentStreet);
        for kind in StreetSubRecord::ALL {
            let slot = SlotId::Street(kind);
            table.add(ClearReason::Street(kind), slot);
            table.add(ClearReason::AssociatedStreet, slot);
            table.add(ClearReason::AllStreet, slot);
        }
        // Dedications and exemptions are edited as part of their ESU.
        table.add(
            ClearReason::Street(StreetSubRecord::Esu),
            SlotId::Street(StreetSubRecord::HighwayDedication),
        );
        table.add(
            ClearReason::Street(StreetSubRecord::Esu),
            SlotId::Street(StreetSubRecord::OneWayExemption),
        );

        table.add(ClearReason::AllProperty, SlotId::CurrentProperty);
        for kind in PropertySubRecord::ALL {
            let slot = SlotId::Property(kind);
            table.add(ClearReason::Property(kind), slot);
            table.add(ClearReason::AssociatedProperty, slot);
            table.add(ClearReason::AllProperty, slot);
        }

        table
    }

    pub fn add(&mut self, reason: ClearReason, slot: SlotId) -> &mut Self {
        self.rules.entry(reason).or_default().insert(slot);
        self
    }

    pub fn slots_cleared_by(&self, reason: ClearReason) -> impl Iterator<Item = SlotId> + '_ {
        self.rules.get(&reason).into_iter().flatten().copied()
    }

    pub fn clears(&self, reason: ClearReason, slot: SlotId) -> bool {
        self.rules.get(&reason).is_some_and(|slots| slots.contains(&slot))
    }

    /// Every reason that clears `slot`.
    pub fn reasons_clearing(&self, slot: SlotId) -> Vec<ClearReason> {
        self.rules
            .iter()
            .filter(|(_, slots)| slots.contains(&slot))
            .map(|(reason, _)| *reason)
            .collect()
    }
}
