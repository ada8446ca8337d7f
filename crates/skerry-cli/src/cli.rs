//! CLI argument definitions for the skerry client.
//!
//! The argument surface stays thin: flags override loaded configuration, and
//! each subcommand maps mechanically onto either a node command envelope or a
//! coordinator operation.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use skerry_config::{Endpoint, LogFormat, TransportKind};

/// Command-line interface for the skerry storage management client.
#[derive(Parser, Debug)]
#[command(name = "skerry", version, about = "Management client for skerry storage nodes")]
pub(crate) struct Cli {
    /// Path to a YAML configuration file.
    #[arg(long, value_name = "PATH", global = true)]
    pub(crate) config: Option<PathBuf>,
    /// Transport for node commands (socket or rpc).
    #[arg(long, value_parser = TransportKind::from_str, global = true)]
    pub(crate) transport: Option<TransportKind>,
    /// Node command socket endpoint (host:port).
    #[arg(long, value_parser = Endpoint::from_str, global = true)]
    pub(crate) socket: Option<Endpoint>,
    /// Node RPC endpoint (host:port).
    #[arg(long, value_parser = Endpoint::from_str, global = true)]
    pub(crate) rpc: Option<Endpoint>,
    /// Target node by registered name; its RPC address is resolved through
    /// the cluster store.
    #[arg(long, value_name = "NAME", global = true)]
    pub(crate) node: Option<String>,
    /// Tracing filter expression.
    #[arg(long, value_name = "FILTER", global = true)]
    pub(crate) log_filter: Option<String>,
    /// Tracing output format (compact or json).
    #[arg(long, value_parser = LogFormat::from_str, global = true)]
    pub(crate) log_format: Option<LogFormat>,
    /// Command group to execute.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Top-level command groups.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum CliCommand {
    /// Engine-wide commands.
    System {
        #[command(subcommand)]
        action: SystemAction,
    },
    /// Device commands.
    Device {
        #[command(subcommand)]
        action: DeviceAction,
    },
    /// Array commands.
    Array {
        #[command(subcommand)]
        action: ArrayAction,
    },
    /// Volume commands.
    Volume {
        #[command(subcommand)]
        action: VolumeAction,
    },
    /// Cluster-management commands served by the shared store.
    Cluster {
        #[command(subcommand)]
        action: ClusterAction,
    },
}

/// Engine-wide actions.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum SystemAction {
    /// Query engine version and state.
    Info,
    /// Ask the engine to shut down.
    Stop,
}

/// Device actions.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum DeviceAction {
    /// Rescan attached devices.
    Scan,
    /// List attached devices.
    List,
    /// Fetch SMART data for one device.
    Smart {
        /// Device name.
        #[arg(long)]
        name: String,
    },
}

/// Array actions.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum ArrayAction {
    /// List arrays on the node.
    List,
    /// Describe one array.
    Info {
        /// Array name.
        #[arg(long)]
        name: String,
    },
}

/// Volume actions.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum VolumeAction {
    /// List volumes on an array.
    List {
        /// Array name; all arrays when omitted.
        #[arg(long)]
        array: Option<String>,
    },
    /// Create a volume.
    Create {
        /// Volume name.
        #[arg(long)]
        name: String,
        /// Owning array name.
        #[arg(long)]
        array: Option<String>,
        /// Capacity in bytes.
        #[arg(long)]
        size: u64,
        /// IOPS ceiling, zero for unlimited.
        #[arg(long)]
        maxiops: Option<u64>,
        /// Bandwidth ceiling in MiB/s, zero for unlimited.
        #[arg(long)]
        maxbw: Option<u64>,
        /// NVMe subsystem qualified name.
        #[arg(long)]
        subnqn: Option<String>,
    },
    /// Expose a volume to initiators.
    Mount {
        /// Volume name.
        #[arg(long)]
        name: String,
        /// Owning array name.
        #[arg(long)]
        array: Option<String>,
        /// NVMe subsystem qualified name.
        #[arg(long)]
        subnqn: Option<String>,
    },
    /// Withdraw a volume from initiators.
    Unmount {
        /// Volume name.
        #[arg(long)]
        name: String,
        /// Owning array name.
        #[arg(long)]
        array: Option<String>,
    },
}

/// Cluster-management actions.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum ClusterAction {
    /// List registered nodes.
    Nodes,
    /// List volumes known to the cluster store.
    Volumes,
    /// List in-flight replications.
    Replications,
    /// Resolve a node name to its RPC address.
    NodeAddr {
        /// Registered node name.
        #[arg(long)]
        name: String,
    },
    /// Dispatch a replication start to a primary/secondary volume pair.
    StartReplication {
        /// Primary node name.
        #[arg(long)]
        primary_node: String,
        /// Primary array name.
        #[arg(long)]
        primary_array: String,
        /// Primary data volume.
        #[arg(long)]
        primary_volume: String,
        /// Primary write-ahead-log volume.
        #[arg(long)]
        primary_wal: String,
        /// Secondary node name.
        #[arg(long)]
        secondary_node: String,
        /// Secondary array name.
        #[arg(long)]
        secondary_array: String,
        /// Secondary data volume.
        #[arg(long)]
        secondary_volume: String,
        /// Secondary write-ahead-log volume.
        #[arg(long)]
        secondary_wal: String,
    },
}
