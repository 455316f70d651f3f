//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// cattlesnap - etcd snapshots of Rancher-managed clusters
#[derive(Parser, Debug)]
#[command(name = "cattlesnap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the test config file (defaults to $CATTLE_TEST_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a cluster's etcd snapshots
    List(ListArgs),

    /// Take an etcd snapshot and wait until it is active
    Create(CreateArgs),

    /// Restore an etcd snapshot and wait until the cluster is active again
    Restore(RestoreArgs),

    /// Show which snapshot flavor a cluster uses
    Flavor(FlavorArgs),
}

/// Target cluster, shared by every command
#[derive(Args, Debug, Clone)]
pub struct ClusterArgs {
    /// Cluster name as shown in Rancher
    #[arg(long)]
    pub cluster: String,

    /// Cluster flavor: rke1, rke2 or k3s (detected when omitted)
    #[arg(long)]
    pub flavor: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: ClusterArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[command(flatten)]
    pub target: ClusterArgs,
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    #[command(flatten)]
    pub target: ClusterArgs,

    /// Backup ID (RKE1) or snapshot name (RKE2/K3s)
    #[arg(short, long)]
    pub snapshot: String,

    /// Configuration to roll back with etcd: none, kubernetesVersion or all
    #[arg(long, default_value = "none")]
    pub restore_config: String,
}

#[derive(Args, Debug)]
pub struct FlavorArgs {
    /// Cluster name as shown in Rancher
    #[arg(long)]
    pub cluster: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_restore() {
        let cli = Cli::try_parse_from([
            "cattlesnap",
            "-v",
            "restore",
            "--cluster",
            "downstream",
            "--flavor",
            "k3s",
            "--snapshot",
            "downstream-etcd-snapshot-1",
            "--restore-config",
            "all",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Restore(args) => {
                assert_eq!(args.target.cluster, "downstream");
                assert_eq!(args.target.flavor.as_deref(), Some("k3s"));
                assert_eq!(args.snapshot, "downstream-etcd-snapshot-1");
                assert_eq!(args.restore_config, "all");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_restore_requires_snapshot() {
        assert!(Cli::try_parse_from(["cattlesnap", "restore", "--cluster", "downstream"]).is_err());
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cattlesnap",
            "list",
            "--cluster",
            "downstream",
            "-c",
            "cattle.yaml",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref().map(|p| p.as_str()), Some("cattle.yaml"));
        assert!(matches!(cli.command, Commands::List(ref args) if args.json));
    }
}
