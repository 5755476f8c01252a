//! Cluster config documents and target resolution.
//!
//! A config file names the cluster and may declare `enableTypes`; flags can
//! name the cluster instead. The two are mutually exclusive so there is only
//! ever one source for the cluster identity.

use crate::catalog::{CapabilityCatalog, CapabilitySet};
use crate::error::ReconcileError;
use crate::executor::ClusterRef;
use crate::resolve::resolve_desired;
use crate::schema_loader::CompiledSchema;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

const CLUSTER_CONFIG_SCHEMA: &str = include_str!("../schemas/cluster_config.schema.json");

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    pub metadata: ClusterMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_watch: Option<CloudWatch>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMeta {
    pub name: String,
    pub region: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudWatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_logging: Option<ClusterLogging>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterLogging {
    #[serde(default)]
    pub enable_types: Vec<String>,
}

impl ClusterConfig {
    pub fn new(name: &str, region: &str) -> Self {
        Self {
            metadata: ClusterMeta {
                name: name.to_string(),
                region: region.to_string(),
            },
            cloud_watch: None,
        }
    }

    /// Read a config file, validating it against the bundled schema first.
    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let value: Value =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        CompiledSchema::from_json_str(CLUSTER_CONFIG_SCHEMA, "cluster_config.schema.json")?
            .validate(&value, &path.display().to_string())?;
        serde_json::from_value(value).with_context(|| format!("decoding {}", path.display()))
    }

    /// Log types declared in the file, verbatim.
    pub fn enable_types(&self) -> &[String] {
        self.cloud_watch
            .as_ref()
            .and_then(|cw| cw.cluster_logging.as_ref())
            .map(|logging| logging.enable_types.as_slice())
            .unwrap_or_default()
    }

    pub fn cluster_ref(&self) -> ClusterRef {
        ClusterRef::new(&self.metadata.name, &self.metadata.region)
    }

    /// Desired set for this invocation: the file's `enableTypes` and the
    /// flag values, each resolved on its own so either may use the wildcard.
    pub fn desired(
        &self,
        catalog: &CapabilityCatalog,
        flag_types: &[String],
    ) -> Result<CapabilitySet, ReconcileError> {
        let from_file = resolve_desired(catalog, self.enable_types())?;
        let from_flags = resolve_desired(catalog, flag_types)?;
        Ok(from_file.union(&from_flags))
    }
}

/// Where the cluster identity comes from on the command line.
#[derive(Clone, Debug, Default)]
pub struct TargetArgs<'a> {
    pub name: Option<&'a str>,
    pub region: Option<&'a str>,
    pub config_file: Option<&'a Path>,
}

/// Build the config for this invocation from either a file or flags.
pub fn resolve_target(args: &TargetArgs<'_>) -> Result<ClusterConfig> {
    if let Some(path) = args.config_file {
        if args.name.is_some() {
            bail!("cannot use --name when --config-file/-f is set");
        }
        if args.region.is_some() {
            bail!("cannot use --region when --config-file/-f is set");
        }
        return ClusterConfig::load(path);
    }

    let name = args
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("--name must be set"))?;
    let region = args
        .region
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("--region must be set"))?;
    Ok(ClusterConfig::new(name, region))
}
