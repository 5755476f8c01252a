//! Catalog values and the on-disk catalog format.
//!
//! Loading is strict about schema versions, duplicate tokens and token syntax
//! so a malformed catalog cannot widen or narrow what the resolver accepts
//! without anyone noticing.

use crate::catalog::{CapabilitySet, CapabilityToken, DEFAULT_CATALOG_PATH, ENV_CATALOG_PATH};
use crate::error::ReconcileError;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const CATALOG_SCHEMA_VERSION: &str = "capability_catalog_v1";
const DEFAULT_NOUN: &str = "capability";

const CLUSTER_LOG_TYPES: &[&str] = &[
    "api",
    "audit",
    "authenticator",
    "controllerManager",
    "scheduler",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(pub String);

/// Immutable list of the tokens a resource type supports.
///
/// Declared order is kept for diagnostics (`supported_list`); membership and
/// set operations go through `full_set`. `noun` names one token in messages
/// ("log type" for the built-in catalog).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilityCatalog {
    key: CatalogKey,
    title: String,
    noun: String,
    tokens: Vec<CapabilityToken>,
}

impl CapabilityCatalog {
    /// Build a catalog from a key, title and token list.
    pub fn new<I, T>(key: &str, title: &str, tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<CapabilityToken>,
    {
        let catalog = Self {
            key: CatalogKey(key.to_string()),
            title: title.to_string(),
            noun: DEFAULT_NOUN.to_string(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        };
        validate_key(&catalog.key)?;
        if catalog.title.trim().is_empty() {
            bail!("catalog.title must not be empty");
        }
        validate_tokens(&catalog.tokens)?;
        Ok(catalog)
    }

    /// Built-in catalog of control plane log types.
    pub fn cluster_logging() -> Self {
        Self {
            key: CatalogKey("cluster_logging_v1".to_string()),
            title: "Cluster control plane log types".to_string(),
            noun: "log type".to_string(),
            tokens: CLUSTER_LOG_TYPES.iter().map(|t| CapabilityToken::from(*t)).collect(),
        }
    }

    /// Load and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let file: CatalogFile =
            serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        if file.schema_version != CATALOG_SCHEMA_VERSION {
            bail!(
                "unsupported catalog schema_version '{}' in {}, expected {}",
                file.schema_version,
                path.display(),
                CATALOG_SCHEMA_VERSION
            );
        }
        let catalog = Self::new(
            &file.catalog.key,
            &file.catalog.title,
            file.capabilities.into_iter().map(|entry| entry.id),
        )
        .with_context(|| format!("validating {}", path.display()))?;
        match file.catalog.noun {
            Some(noun) if noun.trim().is_empty() => {
                bail!("catalog.noun must not be empty in {}", path.display())
            }
            Some(noun) => Ok(catalog.with_noun(&noun)),
            None => Ok(catalog),
        }
    }

    /// Replace the word used for one token in diagnostics.
    pub fn with_noun(mut self, noun: &str) -> Self {
        self.noun = noun.trim().to_string();
        self
    }

    pub fn key(&self) -> &CatalogKey {
        &self.key
    }

    pub fn noun(&self) -> &str {
        &self.noun
    }

    /// Tokens in declared order.
    pub fn tokens(&self) -> &[CapabilityToken] {
        &self.tokens
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.as_str() == token)
    }

    /// First token of `set` (in sorted order) that this catalog lacks.
    pub fn first_unknown<'s>(&self, set: &'s CapabilitySet) -> Option<&'s CapabilityToken> {
        set.iter().find(|t| !self.contains(t.as_str()))
    }

    /// `UnknownCapability` for `token`, listing this catalog.
    pub fn unknown(&self, token: &str) -> ReconcileError {
        ReconcileError::unknown_capability(
            token,
            &self.noun,
            self.tokens.iter().map(|t| t.0.clone()).collect(),
        )
    }

    pub fn full_set(&self) -> CapabilitySet {
        self.tokens.iter().cloned().collect()
    }

    /// Declared tokens joined with `", "`, as shown in error messages and
    /// flag help.
    pub fn supported_list(&self) -> String {
        self.tokens
            .iter()
            .map(CapabilityToken::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Clone, Debug, Deserialize)]
/// On-disk catalog document.
pub struct CatalogFile {
    pub schema_version: String,
    pub catalog: CatalogHeader,
    pub capabilities: Vec<CatalogEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CatalogHeader {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub noun: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Pick the catalog for this invocation: an explicit path, then
/// `CLUSTER_LOGGING_CATALOG`, then the built-in catalog.
pub fn resolve_catalog(override_path: Option<&Path>) -> Result<CapabilityCatalog> {
    let path = override_path.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(ENV_CATALOG_PATH)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    });
    match path {
        Some(path) => CapabilityCatalog::load(&path),
        None => Ok(CapabilityCatalog::cluster_logging()),
    }
}

/// Path of the bundled catalog relative to `root`.
pub fn default_catalog_path(root: &Path) -> PathBuf {
    root.join(DEFAULT_CATALOG_PATH)
}

fn validate_key(key: &CatalogKey) -> Result<()> {
    if key.0.is_empty() {
        bail!("catalog.key must not be empty");
    }
    if !is_token_syntax(&key.0) {
        bail!("catalog.key must match ^[A-Za-z0-9_.-]+$, got {}", key.0);
    }
    Ok(())
}

fn validate_tokens(tokens: &[CapabilityToken]) -> Result<()> {
    if tokens.is_empty() {
        bail!("catalog contains no capabilities");
    }
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for token in tokens {
        if token.0.trim().is_empty() {
            bail!("encountered capability with no id");
        }
        if !is_token_syntax(&token.0) {
            bail!("capability id must match ^[A-Za-z0-9_.-]+$, got {}", token.0);
        }
        if token.0 == crate::catalog::ALL_TOKEN {
            bail!("capability id '{}' is reserved", token.0);
        }
        if !seen.insert(token.as_str()) {
            bail!("duplicate capability id {}", token.0);
        }
    }
    Ok(())
}

fn is_token_syntax(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::NamedTempFile;

    #[test]
    fn built_in_catalog_lists_log_types_in_order() {
        let catalog = CapabilityCatalog::cluster_logging();
        assert_eq!(
            catalog.supported_list(),
            "api, audit, authenticator, controllerManager, scheduler"
        );
        assert_eq!(catalog.full_set().len(), 5);
        assert!(catalog.contains("controllerManager"));
        assert!(!catalog.contains("controllermanager"));
    }

    #[test]
    fn new_rejects_duplicates_and_reserved_tokens() {
        assert!(CapabilityCatalog::new("k", "t", ["a", "a"]).is_err());
        assert!(CapabilityCatalog::new("k", "t", ["a", "all"]).is_err());
        assert!(CapabilityCatalog::new("k", "t", Vec::<String>::new()).is_err());
        assert!(CapabilityCatalog::new("k", "t", ["has space"]).is_err());
        assert!(CapabilityCatalog::new("k", "", ["a"]).is_err());
    }

    #[test]
    fn load_enforces_schema_version() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        serde_json::to_writer(
            &mut file,
            &json!({
                "schema_version": "unexpected",
                "catalog": {"key": "x", "title": "x"},
                "capabilities": [{"id": "api"}]
            }),
        )?;
        let err = CapabilityCatalog::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported catalog schema_version"));
        Ok(())
    }

    #[test]
    fn load_accepts_custom_catalog() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        serde_json::to_writer(
            &mut file,
            &json!({
                "schema_version": CATALOG_SCHEMA_VERSION,
                "catalog": {"key": "node_features", "title": "Node features"},
                "capabilities": [{"id": "gpu"}, {"id": "spot", "description": "spot capacity"}]
            }),
        )?;
        let catalog = CapabilityCatalog::load(file.path())?;
        assert_eq!(catalog.key().0, "node_features");
        assert_eq!(catalog.supported_list(), "gpu, spot");
        assert_eq!(catalog.noun(), "capability");
        assert_eq!(
            catalog.unknown("tpu").to_string(),
            "unknown capability tpu. Supported capabilities: gpu, spot"
        );
        Ok(())
    }

    #[test]
    fn load_reads_noun_from_header() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        serde_json::to_writer(
            &mut file,
            &json!({
                "schema_version": CATALOG_SCHEMA_VERSION,
                "catalog": {"key": "addons", "title": "Add-ons", "noun": "add-on"},
                "capabilities": [{"id": "vpc-cni"}]
            }),
        )?;
        let catalog = CapabilityCatalog::load(file.path())?;
        assert_eq!(
            catalog.unknown("dns").to_string(),
            "unknown add-on dns. Supported add-ons: vpc-cni"
        );
        Ok(())
    }

    #[test]
    fn first_unknown_finds_tokens_outside_catalog() {
        let catalog = CapabilityCatalog::cluster_logging();
        let set: CapabilitySet = ["api", "kubelet"].into_iter().collect();
        assert_eq!(catalog.first_unknown(&set).map(|t| t.as_str()), Some("kubelet"));
        assert!(catalog.first_unknown(&catalog.full_set()).is_none());
    }

    #[test]
    fn explicit_path_wins_over_built_in() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        serde_json::to_writer(
            &mut file,
            &json!({
                "schema_version": CATALOG_SCHEMA_VERSION,
                "catalog": {"key": "one", "title": "One"},
                "capabilities": [{"id": "only"}]
            }),
        )?;
        let catalog = resolve_catalog(Some(file.path()))?;
        assert_eq!(catalog.supported_list(), "only");
        Ok(())
    }
}
