//! Update a cluster's control plane logging to match the requested log types.
//!
//! Without `--approve` the command only reports what it would change. With it,
//! the complete desired set is written to the control plane in one call.
//! Cluster state is read from and written to the file-backed control plane
//! under `--state-dir` (or `CLUSTER_LOGGING_STATE_DIR`).

use anyhow::{Context, Result};
use clap::{Arg, CommandFactory, FromArgMatches, Parser};
use cluster_logging::catalog::ENV_CATALOG_PATH;
use cluster_logging::store::{DEFAULT_STATE_DIR, ENV_STATE_DIR};
use cluster_logging::{
    CapabilityCatalog, FileControlPlane, Mode, Reconciler, TargetArgs, init_tracing,
    resolve_catalog, resolve_target, split_list,
};
use std::path::PathBuf;
use tracing::{debug, info};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "update-cluster-logging",
    about = "Update cluster logging configuration"
)]
struct Cli {
    /// Cluster name (alternative to --name)
    #[arg(value_name = "NAME", conflicts_with = "config_file")]
    positional_name: Option<String>,

    /// Cluster name
    #[arg(short = 'n', long, conflicts_with = "positional_name")]
    name: Option<String>,

    /// Region the cluster runs in
    #[arg(short = 'r', long)]
    region: Option<String>,

    /// Cluster config file; replaces --name and --region
    #[arg(short = 'f', long = "config-file", value_name = "PATH")]
    config_file: Option<PathBuf>,

    /// Apply the changes instead of only planning them
    #[arg(long)]
    approve: bool,

    #[arg(long = "enable-types", value_name = "TYPES")]
    enable_types: Vec<String>,

    /// Capability catalog file
    #[arg(long, env = ENV_CATALOG_PATH, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Root of the file-backed control plane
    #[arg(
        long = "state-dir",
        env = ENV_STATE_DIR,
        default_value = DEFAULT_STATE_DIR,
        value_name = "DIR"
    )]
    state_dir: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Parse argv; the `--enable-types` help lists the built-in log types.
    /// A `--catalog` override is only read after parsing, so the help says
    /// which catalog it lists.
    fn parse_with_catalog_help() -> Self {
        let supported = CapabilityCatalog::cluster_logging().supported_list();
        let command = Cli::command().mut_arg("enable_types", |arg: Arg| {
            arg.help(format!(
                "Log types to be enabled, the rest will be disabled. Supported log types in the built-in catalog: (all, {supported})"
            ))
        });
        let matches = command.get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_with_catalog_help();
    init_tracing(cli.verbose);

    let catalog = resolve_catalog(cli.catalog.as_deref())?;
    let name = cli.name.as_deref().or(cli.positional_name.as_deref());
    let config = resolve_target(&TargetArgs {
        name,
        region: cli.region.as_deref(),
        config_file: cli.config_file.as_deref(),
    })?;
    let desired = config.desired(&catalog, &split_list(&cli.enable_types))?;

    info!("using region {}", config.metadata.region);
    let cfg_json = serde_json::to_string_pretty(&config).context("serializing cluster config")?;
    debug!("cfg.json = \\\n{cfg_json}");

    let cluster = config.cluster_ref();
    let plane = FileControlPlane::new(&cli.state_dir);
    let handle = plane.cluster(&cluster);
    Reconciler::new(&catalog, &cluster).run(
        &desired,
        &handle,
        &handle,
        Mode::from_approve(cli.approve),
    )?;
    Ok(())
}
