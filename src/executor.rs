//! Probe, diff, then no-op, plan report or apply.
//!
//! One pass per call and no state kept between calls. Whether anything may be
//! mutated is decided only by the `Mode` handed to [`Reconciler::run`].

use crate::catalog::{CapabilityCatalog, CapabilitySet};
use crate::diff::{self, ReconciliationPlan};
use crate::error::ReconcileError;
use anyhow::anyhow;
use std::fmt;
use tracing::{debug, info, warn};

/// Reads the resource's currently enabled set.
pub trait StateProbe {
    fn current(&self) -> anyhow::Result<CapabilitySet>;
}

/// Replaces the resource's enabled set with `desired` in full.
pub trait ApplyGateway {
    fn apply(&self, desired: &CapabilitySet) -> anyhow::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Report intended changes only.
    Plan,
    /// Call the gateway when an update is required.
    Apply,
}

impl Mode {
    /// `--approve` turns planning into applying.
    pub fn from_approve(approve: bool) -> Self {
        if approve { Mode::Apply } else { Mode::Plan }
    }

    pub fn is_plan(self) -> bool {
        matches!(self, Mode::Plan)
    }
}

/// Name and region of the resource being reconciled; used for log lines and
/// by collaborators that need to address the resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterRef {
    pub name: String,
    pub region: String,
}

impl ClusterRef {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for ClusterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster {:?} in {:?}", self.name, self.region)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    UpToDate,
    PlannedOnly(ReconciliationPlan),
    Applied(ReconciliationPlan),
}

impl Outcome {
    pub fn plan(&self) -> Option<&ReconciliationPlan> {
        match self {
            Outcome::UpToDate => None,
            Outcome::PlannedOnly(plan) | Outcome::Applied(plan) => Some(plan),
        }
    }

    pub fn applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

pub const PLAN_MODE_ADVISORY: &str =
    "no changes were applied, run again with '--approve' to apply the changes";

pub struct Reconciler<'a> {
    catalog: &'a CapabilityCatalog,
    cluster: &'a ClusterRef,
}

impl<'a> Reconciler<'a> {
    pub fn new(catalog: &'a CapabilityCatalog, cluster: &'a ClusterRef) -> Self {
        Self { catalog, cluster }
    }

    /// Read the current set through `probe`, rejecting tokens the catalog
    /// does not know.
    pub fn probe_current<P>(&self, probe: &P) -> Result<CapabilitySet, ReconcileError>
    where
        P: StateProbe + ?Sized,
    {
        let current = probe.current().map_err(ReconcileError::ProbeFailed)?;
        if let Some(stray) = self.catalog.first_unknown(&current) {
            return Err(ReconcileError::ProbeFailed(anyhow!(
                "{} reports {} {stray} which is not in catalog {}",
                self.cluster,
                self.catalog.noun(),
                self.catalog.key().0
            )));
        }
        Ok(current)
    }

    /// Reconcile once. `desired` must come from the same catalog; a token
    /// outside it fails before the probe is consulted.
    pub fn run<P, G>(
        &self,
        desired: &CapabilitySet,
        probe: &P,
        gateway: &G,
        mode: Mode,
    ) -> Result<Outcome, ReconcileError>
    where
        P: StateProbe + ?Sized,
        G: ApplyGateway + ?Sized,
    {
        if let Some(unknown) = self.catalog.first_unknown(desired) {
            return Err(self.catalog.unknown(unknown.as_str()));
        }
        let current = self.probe_current(probe)?;
        debug!(
            desired = %desired.joined(),
            current = %current.joined(),
            "probed current logging state"
        );

        let plan = diff::plan(self.catalog, desired, &current);
        if !plan.update_required {
            info!("CloudWatch logging for {} is already up-to-date", self.cluster);
            return Ok(Outcome::UpToDate);
        }

        let action = format!(
            "update CloudWatch logging for {} ({} & {})",
            self.cluster,
            plan.report.describe_enable(),
            plan.report.describe_disable()
        );

        match mode {
            Mode::Plan => {
                info!("(plan) {action}");
                warn!("{PLAN_MODE_ADVISORY}");
                Ok(Outcome::PlannedOnly(plan))
            }
            Mode::Apply => {
                info!("{action}");
                gateway
                    .apply(&plan.wire_state)
                    .map_err(ReconcileError::ApplyFailed)?;
                info!("updated CloudWatch logging for {}", self.cluster);
                Ok(Outcome::Applied(plan))
            }
        }
    }
}
