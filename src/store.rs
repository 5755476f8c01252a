//! File-backed control plane.
//!
//! Each cluster lives in `<root>/<region>/<name>.json`. Reads are the probe,
//! writes are the full-replace apply. Writes go through a temp file in the
//! same directory and are renamed into place, so a reader never sees a
//! half-written document.

use crate::catalog::CapabilitySet;
use crate::executor::{ApplyGateway, ClusterRef, StateProbe};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub const ENV_STATE_DIR: &str = "CLUSTER_LOGGING_STATE_DIR";
pub const DEFAULT_STATE_DIR: &str = ".cluster-state";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDocument {
    pub name: String,
    pub region: String,
    pub logging: LoggingDocument,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingDocument {
    #[serde(default)]
    pub enabled_types: CapabilitySet,
}

#[derive(Clone, Debug)]
pub struct FileControlPlane {
    root: PathBuf,
}

impl FileControlPlane {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Handle addressing one cluster; implements both probe and gateway.
    pub fn cluster<'a>(&'a self, cluster: &'a ClusterRef) -> ClusterHandle<'a> {
        ClusterHandle {
            plane: self,
            cluster,
        }
    }

    /// Register a cluster with an initial enabled set. Fails if it exists.
    pub fn create_cluster(&self, cluster: &ClusterRef, enabled: &CapabilitySet) -> Result<()> {
        let path = self.document_path(cluster)?;
        if path.exists() {
            bail!("{cluster} already exists at {}", path.display());
        }
        self.write_document(
            &path,
            &ClusterDocument {
                name: cluster.name.clone(),
                region: cluster.region.clone(),
                logging: LoggingDocument {
                    enabled_types: enabled.clone(),
                },
            },
        )
    }

    fn document_path(&self, cluster: &ClusterRef) -> Result<PathBuf> {
        for (label, value) in [("name", &cluster.name), ("region", &cluster.region)] {
            if value.is_empty()
                || !value
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
            {
                bail!("cluster {label} must match ^[A-Za-z0-9_-]+$, got {value:?}");
            }
        }
        Ok(self
            .root
            .join(&cluster.region)
            .join(format!("{}.json", cluster.name)))
    }

    fn read_document(&self, cluster: &ClusterRef) -> Result<ClusterDocument> {
        let path = self.document_path(cluster)?;
        if !path.is_file() {
            bail!(
                "cluster {:?} not found in {:?} (looked in {})",
                cluster.name,
                cluster.region,
                self.root.display()
            );
        }
        let raw =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    fn write_document(&self, path: &Path, document: &ClusterDocument) -> Result<()> {
        let dir = path
            .parent()
            .with_context(|| format!("{} has no parent directory", path.display()))?;
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("creating temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut temp, document)
            .with_context(|| format!("serializing {}", path.display()))?;
        temp.write_all(b"\n")?;
        temp.persist(path)
            .with_context(|| format!("replacing {}", path.display()))?;
        debug!(path = %path.display(), "wrote cluster document");
        Ok(())
    }
}

pub struct ClusterHandle<'a> {
    plane: &'a FileControlPlane,
    cluster: &'a ClusterRef,
}

impl StateProbe for ClusterHandle<'_> {
    fn current(&self) -> Result<CapabilitySet> {
        Ok(self
            .plane
            .read_document(self.cluster)?
            .logging
            .enabled_types)
    }
}

impl ApplyGateway for ClusterHandle<'_> {
    fn apply(&self, desired: &CapabilitySet) -> Result<()> {
        let path = self.plane.document_path(self.cluster)?;
        let mut document = self.plane.read_document(self.cluster)?;
        document.logging.enabled_types = desired.clone();
        self.plane.write_document(&path, &document)
    }
}
