//! Print a cluster's current control plane logging split as JSON.

use anyhow::Result;
use clap::Parser;
use cluster_logging::catalog::ENV_CATALOG_PATH;
use cluster_logging::store::{DEFAULT_STATE_DIR, ENV_STATE_DIR};
use cluster_logging::{
    FileControlPlane, LoggingStatus, Reconciler, TargetArgs, init_tracing, resolve_catalog,
    resolve_target,
};
use serde_json::json;
use std::path::PathBuf;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "describe-cluster-logging",
    about = "Show enabled and disabled control plane log types"
)]
struct Cli {
    #[arg(short = 'n', long)]
    name: Option<String>,

    #[arg(short = 'r', long)]
    region: Option<String>,

    #[arg(short = 'f', long = "config-file", value_name = "PATH")]
    config_file: Option<PathBuf>,

    #[arg(long, env = ENV_CATALOG_PATH, value_name = "PATH")]
    catalog: Option<PathBuf>,

    #[arg(
        long = "state-dir",
        env = ENV_STATE_DIR,
        default_value = DEFAULT_STATE_DIR,
        value_name = "DIR"
    )]
    state_dir: PathBuf,

    #[arg(short, long)]
    verbose: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = resolve_catalog(cli.catalog.as_deref())?;
    let config = resolve_target(&TargetArgs {
        name: cli.name.as_deref(),
        region: cli.region.as_deref(),
        config_file: cli.config_file.as_deref(),
    })?;
    let cluster = config.cluster_ref();
    let plane = FileControlPlane::new(&cli.state_dir);
    let current = Reconciler::new(&catalog, &cluster).probe_current(&plane.cluster(&cluster))?;
    let status = LoggingStatus::from_current(&catalog, &current);

    let out = json!({
        "cluster": cluster.name,
        "region": cluster.region,
        "enabled": status.enabled,
        "disabled": status.disabled,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
