#![allow(dead_code)]

use anyhow::{Context, Result};
use cluster_logging::{CapabilitySet, ClusterRef, FileControlPlane};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

pub const CLUSTER: &str = "dev";
pub const REGION: &str = "us-west-2";

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn cluster() -> ClusterRef {
    ClusterRef::new(CLUSTER, REGION)
}

pub fn set(tokens: &[&str]) -> CapabilitySet {
    tokens.iter().copied().collect()
}

/// Register the test cluster under `state_dir` with `enabled` turned on.
pub fn seed_cluster(state_dir: &Path, enabled: &[&str]) -> Result<FileControlPlane> {
    let plane = FileControlPlane::new(state_dir);
    plane.create_cluster(&cluster(), &set(enabled))?;
    Ok(plane)
}

/// Command for one of the crate's binaries with a clean logging environment.
pub fn binary(name: &str, state_dir: &Path) -> Command {
    let path = match name {
        "update-cluster-logging" => env!("CARGO_BIN_EXE_update-cluster-logging"),
        "describe-cluster-logging" => env!("CARGO_BIN_EXE_describe-cluster-logging"),
        other => panic!("unknown binary {other}"),
    };
    let mut cmd = Command::new(path);
    cmd.env_remove("RUST_LOG")
        .env_remove("CLUSTER_LOGGING_CATALOG")
        .env("CLUSTER_LOGGING_STATE_DIR", state_dir);
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    cmd.output()
        .with_context(|| format!("failed to execute {:?}", cmd.get_program()))
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
