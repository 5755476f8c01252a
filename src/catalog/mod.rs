//! Capability catalog wiring.
//!
//! A catalog is the fixed list of tokens a resource type supports (for the
//! cluster logging command, the control plane log types). Catalogs are plain
//! values handed to the resolver, diff and executor; nothing here is global.
//! `CapabilityCatalog::cluster_logging()` is the built-in catalog and
//! `CapabilityCatalog::load` reads one from disk (for example
//! `catalogs/cluster_logging_v1.json`).

pub mod index;
pub mod set;

pub use index::{
    CapabilityCatalog, CatalogEntry, CatalogFile, CatalogHeader, CatalogKey, default_catalog_path,
    resolve_catalog,
};
pub use set::{CapabilitySet, CapabilityToken};

/// Relative path to the bundled catalog file.
pub const DEFAULT_CATALOG_PATH: &str = "catalogs/cluster_logging_v1.json";

/// Environment variable consulted when no `--catalog` flag is given.
pub const ENV_CATALOG_PATH: &str = "CLUSTER_LOGGING_CATALOG";

/// Input token meaning "every token in the catalog".
pub const ALL_TOKEN: &str = "all";
