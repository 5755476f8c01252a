// End-to-end reconciliation against the file-backed control plane.
mod support;

use anyhow::Result;
use cluster_logging::{
    CapabilityCatalog, Mode, Outcome, ReconcileError, Reconciler, StateProbe, resolve_desired,
};
use tempfile::TempDir;

use support::{cluster, seed_cluster, set};

#[test]
fn wildcard_enables_remaining_types() -> Result<()> {
    let temp = TempDir::new()?;
    let plane = seed_cluster(temp.path(), &["api"])?;
    let catalog = CapabilityCatalog::new(
        "cluster_logging_v1",
        "log types",
        ["api", "audit", "authenticator", "controllerManager", "scheduler"],
    )?;
    let desired = resolve_desired(&catalog, &["all"])?;
    assert_eq!(desired, catalog.full_set());

    let target = cluster();
    let handle = plane.cluster(&target);
    let outcome = Reconciler::new(&catalog, &target).run(&desired, &handle, &handle, Mode::Plan)?;

    let plan = outcome.plan().expect("divergent state yields a plan");
    assert!(plan.update_required);
    assert_eq!(
        plan.report.to_enable,
        set(&["audit", "authenticator", "controllerManager", "scheduler"])
    );
    assert!(plan.report.to_disable.is_empty());
    assert_eq!(handle.current()?, set(&["api"]), "plan mode must not write");
    Ok(())
}

#[test]
fn matching_state_is_left_alone() -> Result<()> {
    let temp = TempDir::new()?;
    let plane = seed_cluster(temp.path(), &["api", "audit"])?;
    let catalog = CapabilityCatalog::cluster_logging();
    let desired = resolve_desired(&catalog, &["audit", "api"])?;

    let target = cluster();
    let handle = plane.cluster(&target);
    let state_file = temp.path().join("us-west-2/dev.json");
    let before = std::fs::metadata(&state_file)?.modified()?;

    let outcome =
        Reconciler::new(&catalog, &target).run(&desired, &handle, &handle, Mode::Apply)?;
    assert_eq!(outcome, Outcome::UpToDate);
    assert_eq!(std::fs::metadata(&state_file)?.modified()?, before);
    Ok(())
}

#[test]
fn unknown_type_lists_the_catalog() {
    let catalog = CapabilityCatalog::cluster_logging();
    let err = resolve_desired(&catalog, &["bogus"]).unwrap_err();
    match err {
        ReconcileError::UnknownCapability {
            token, supported, ..
        } => {
            assert_eq!(token, "bogus");
            assert_eq!(
                supported,
                vec!["api", "audit", "authenticator", "controllerManager", "scheduler"]
            );
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn plan_mode_reports_disable_without_writing() -> Result<()> {
    let temp = TempDir::new()?;
    let plane = seed_cluster(temp.path(), &["api"])?;
    let catalog = CapabilityCatalog::cluster_logging();
    let desired = resolve_desired::<&str>(&catalog, &[])?;

    let target = cluster();
    let handle = plane.cluster(&target);
    let outcome = Reconciler::new(&catalog, &target).run(&desired, &handle, &handle, Mode::Plan)?;

    let Outcome::PlannedOnly(plan) = &outcome else {
        panic!("expected plan-only outcome, got {outcome:?}");
    };
    assert_eq!(plan.report.describe_enable(), "no types to enable");
    assert_eq!(plan.report.describe_disable(), "disable types: api");
    assert_eq!(handle.current()?, set(&["api"]));
    Ok(())
}

#[test]
fn approve_writes_full_desired_set() -> Result<()> {
    let temp = TempDir::new()?;
    let plane = seed_cluster(temp.path(), &["api", "scheduler"])?;
    let catalog = CapabilityCatalog::cluster_logging();
    let desired = resolve_desired(&catalog, &["api", "audit"])?;

    let target = cluster();
    let handle = plane.cluster(&target);
    let outcome =
        Reconciler::new(&catalog, &target).run(&desired, &handle, &handle, Mode::Apply)?;

    assert!(outcome.applied());
    assert_eq!(handle.current()?, set(&["api", "audit"]));

    let again = Reconciler::new(&catalog, &target).run(&desired, &handle, &handle, Mode::Apply)?;
    assert_eq!(again, Outcome::UpToDate);
    Ok(())
}

#[test]
fn missing_cluster_fails_before_any_write() -> Result<()> {
    let temp = TempDir::new()?;
    let catalog = CapabilityCatalog::cluster_logging();
    let plane = cluster_logging::FileControlPlane::new(temp.path());
    let target = cluster();
    let handle = plane.cluster(&target);

    let err = Reconciler::new(&catalog, &target)
        .run(&catalog.full_set(), &handle, &handle, Mode::Apply)
        .unwrap_err();
    assert!(matches!(err, ReconcileError::ProbeFailed(_)));
    assert!(!temp.path().join("us-west-2").exists());
    Ok(())
}
