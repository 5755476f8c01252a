pub mod catalog;
pub mod config;
pub mod diff;
pub mod error;
pub mod executor;
pub mod logging;
pub mod resolve;
pub mod store;

mod schema_loader;

pub use catalog::{
    ALL_TOKEN, CapabilityCatalog, CapabilitySet, CapabilityToken, CatalogKey,
    DEFAULT_CATALOG_PATH, default_catalog_path, resolve_catalog,
};
pub use config::{ClusterConfig, TargetArgs, resolve_target};
pub use diff::{LoggingStatus, Partition, ReconciliationPlan, ReportDelta};
pub use error::ReconcileError;
pub use executor::{
    ApplyGateway, ClusterRef, Mode, Outcome, PLAN_MODE_ADVISORY, Reconciler, StateProbe,
};
pub use logging::init_tracing;
pub use resolve::resolve_desired;
pub use store::{ClusterHandle, DEFAULT_STATE_DIR, ENV_STATE_DIR, FileControlPlane};

/// Split flag values on commas and whitespace, dropping empty entries.
///
/// `--enable-types api,audit --enable-types scheduler` arrives as two values;
/// this flattens them into three tokens.
pub fn split_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| {
            value
                .as_ref()
                .replace(',', " ")
                .split_whitespace()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
