//! Cluster topology records read from the shared store.
//!
//! These rows are produced and maintained by node agents; this layer only
//! reads them, except for [`CommandRow`] which the coordinator inserts and
//! the addressed node's agent consumes.

use serde::Serialize;

/// Status a freshly-inserted command row carries. All later transitions are
/// owned by the consuming node agent.
pub const COMMAND_STATUS_CREATED: &str = "Created";

/// Identity and liveness of a cluster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Registered node name.
    pub name: String,
    /// Registered IP address.
    pub ip: String,
    /// Last time the node's agent checked in.
    pub last_seen: String,
}

/// A volume as the cluster store sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volume {
    /// Store-assigned volume id.
    pub id: i32,
    /// Volume name.
    pub name: String,
    /// Node hosting the volume.
    pub node_name: String,
    /// Array hosting the volume.
    pub array_name: String,
    /// Capacity in bytes.
    pub size: i64,
    /// Last time the hosting agent reported the volume.
    pub last_seen: String,
}

/// A directed replication pairing between a primary volume and a secondary
/// volume, each with its write-ahead-log volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replication {
    /// Store-assigned replication id.
    pub id: i32,
    /// Volume being replicated.
    pub source_volume_id: i32,
    /// Write-ahead-log volume on the primary side.
    pub source_wal_volume_id: i32,
    /// Volume receiving the replica.
    pub destination_volume_id: i32,
    /// Write-ahead-log volume on the secondary side.
    pub destination_wal_volume_id: i32,
}

/// An instruction addressed to one node, relayed through the store's command
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRow {
    /// Node whose agent should execute the instruction.
    pub node_name: String,
    /// Human-readable instruction text.
    pub content: String,
    /// Row status; always [`COMMAND_STATUS_CREATED`] at insert time.
    pub status: String,
    /// Caller-supplied timestamp correlating paired instructions.
    pub timestamp: String,
}

impl CommandRow {
    /// Builds a freshly-created instruction row.
    #[must_use]
    pub fn created(
        node_name: impl Into<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            content: content.into(),
            status: COMMAND_STATUS_CREATED.to_owned(),
            timestamp: timestamp.into(),
        }
    }
}
