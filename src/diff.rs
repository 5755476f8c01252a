//! Desired vs. current comparison.
//!
//! The remote update is a full replace, so a plan keeps two views apart: the
//! set that goes over the wire (`wire_state`, always the whole desired set)
//! and the delta that is only used to tell a human what will change
//! (`report`). Never send `report` to a gateway.

use crate::catalog::{CapabilityCatalog, CapabilitySet};

/// Complete enabled/disabled split of the catalog after the update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    pub enable: CapabilitySet,
    pub disable: CapabilitySet,
}

/// What actually changes relative to the observed state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportDelta {
    pub to_enable: CapabilitySet,
    pub to_disable: CapabilitySet,
}

impl ReportDelta {
    pub fn describe_enable(&self) -> String {
        describe("enable", &self.to_enable)
    }

    pub fn describe_disable(&self) -> String {
        describe("disable", &self.to_disable)
    }
}

fn describe(verb: &str, tokens: &CapabilitySet) -> String {
    if tokens.is_empty() {
        format!("no types to {verb}")
    } else {
        format!("{verb} types: {}", tokens.joined())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub wire_state: CapabilitySet,
    pub partition: Partition,
    pub report: ReportDelta,
    pub update_required: bool,
}

/// Compare `desired` to `current` within `catalog`.
pub fn plan(
    catalog: &CapabilityCatalog,
    desired: &CapabilitySet,
    current: &CapabilitySet,
) -> ReconciliationPlan {
    ReconciliationPlan {
        wire_state: desired.clone(),
        partition: Partition {
            enable: desired.clone(),
            disable: catalog.full_set().difference(desired),
        },
        report: ReportDelta {
            to_enable: desired.difference(current),
            to_disable: current.difference(desired),
        },
        update_required: desired != current,
    }
}

/// Snapshot of a resource's current split, for read-only describe output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingStatus {
    pub enabled: CapabilitySet,
    pub disabled: CapabilitySet,
}

impl LoggingStatus {
    pub fn from_current(catalog: &CapabilityCatalog, current: &CapabilitySet) -> Self {
        Self {
            enabled: current.clone(),
            disabled: catalog.full_set().difference(current),
        }
    }
}
