//! Snapshot commands
//!
//! Each command loads the test config, connects to Rancher and picks the
//! snapshot provider for the target cluster's flavor.

use crate::cli::{ClusterArgs, CreateArgs, FlavorArgs, ListArgs, RestoreArgs};
use crate::output;
use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use cattlesnap_client::{RancherClient, RestoreRkeConfig};
use cattlesnap_core::TestConfig;
use cattlesnap_snapshots::{
    create_snapshot_provider, detect_cluster_flavor, ClusterFlavor, RestoreRequest,
    SnapshotInfo, SnapshotProvider,
};
use owo_colors::OwoColorize;
use tabled::{settings::Style, Table, Tabled};
use tracing::debug;

/// Connect and resolve the provider for `target`
async fn connect(
    target: &ClusterArgs,
    config_path: Option<&Utf8Path>,
) -> Result<Box<dyn SnapshotProvider>> {
    let config = TestConfig::load(config_path).context("Failed to load test config")?;
    let client = RancherClient::new(&config.rancher)?;

    let flavor = match target.flavor.as_deref() {
        Some(flavor) => flavor.parse::<ClusterFlavor>().map_err(|e| anyhow!(e))?,
        None => detect_cluster_flavor(&client, &target.cluster).await?,
    };
    debug!("Using {} snapshots for cluster '{}'", flavor, target.cluster);

    Ok(create_snapshot_provider(flavor, client, config.waits))
}

/// List a cluster's snapshots
pub async fn list(args: ListArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let provider = connect(&args.target, config_path).await?;
    let snapshots = provider.list(&args.target.cluster).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshots)?);
        return Ok(());
    }

    if snapshots.is_empty() {
        eprintln!("No snapshots found for cluster '{}'", args.target.cluster);
        return Ok(());
    }

    print_snapshot_table(&snapshots);
    Ok(())
}

/// Take a snapshot
pub async fn create(args: CreateArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let provider = connect(&args.target, config_path).await?;

    let pb = output::spinner(&format!(
        "Creating {} snapshot of '{}'...",
        provider.name(),
        args.target.cluster
    ));
    let result = provider.create(&args.target.cluster).await;
    pb.finish_and_clear();
    result?;

    output::success(&format!(
        "Snapshot of '{}' is active",
        args.target.cluster.cyan()
    ));
    Ok(())
}

/// Restore a snapshot
pub async fn restore(args: RestoreArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let restore_config: RestoreRkeConfig = args
        .restore_config
        .parse()
        .map_err(|e: String| anyhow!(e))?;
    let provider = connect(&args.target, config_path).await?;

    output::info(&format!(
        "Restoring '{}' from {}",
        args.target.cluster.cyan(),
        args.snapshot
    ));
    output::kv("Restore config", &restore_config.to_string());

    let request = RestoreRequest::new(&args.snapshot).with_restore_rke_config(restore_config);

    let pb = output::spinner("Waiting for the cluster to restore...");
    let result = provider.restore(&args.target.cluster, &request).await;
    pb.finish_and_clear();
    result?;

    output::success(&format!(
        "Cluster '{}' restored and active",
        args.target.cluster.cyan()
    ));
    Ok(())
}

/// Print the detected flavor of a cluster
pub async fn flavor(args: FlavorArgs, config_path: Option<&Utf8Path>) -> Result<()> {
    let config = TestConfig::load(config_path).context("Failed to load test config")?;
    let client = RancherClient::new(&config.rancher)?;

    let flavor = detect_cluster_flavor(&client, &args.cluster).await?;
    println!("{}", flavor);
    Ok(())
}

/// Table row for snapshot list
#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "CREATED")]
    created: String,
    #[tabled(rename = "ID")]
    id: String,
}

fn print_snapshot_table(snapshots: &[SnapshotInfo]) {
    let rows: Vec<SnapshotRow> = snapshots
        .iter()
        .map(|s| SnapshotRow {
            name: s.name.clone(),
            state: output::state(&s.state),
            created: s
                .created
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string()),
            id: s.id.clone(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
}
