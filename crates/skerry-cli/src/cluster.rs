//! Cluster-management command execution through the HA coordinator.

use std::io::Write;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use skerry_config::ClientConfig;
use skerry_ha::{HaCoordinator, ReplicationRequest, VolumeTarget};

use crate::cli::ClusterAction;
use crate::errors::AppError;
use crate::output::render_json;

/// Executes one cluster-management action against the shared store.
pub(crate) fn execute<W: Write>(
    action: &ClusterAction,
    config: &ClientConfig,
    stdout: &mut W,
) -> Result<(), AppError> {
    let coordinator = HaCoordinator::from_settings(&config.store)?;
    match action {
        ClusterAction::Nodes => render_json(stdout, &coordinator.list_nodes()?),
        ClusterAction::Volumes => render_json(stdout, &coordinator.list_volumes()?),
        ClusterAction::Replications => render_json(stdout, &coordinator.list_replications()?),
        ClusterAction::NodeAddr { name } => {
            let address = coordinator.resolve_node_address(name)?;
            writeln!(stdout, "{address}")?;
            Ok(())
        }
        ClusterAction::StartReplication {
            primary_node,
            primary_array,
            primary_volume,
            primary_wal,
            secondary_node,
            secondary_array,
            secondary_volume,
            secondary_wal,
        } => {
            let request = ReplicationRequest {
                primary: VolumeTarget {
                    node: primary_node.clone(),
                    array: primary_array.clone(),
                    volume: primary_volume.clone(),
                    wal_volume: primary_wal.clone(),
                },
                secondary: VolumeTarget {
                    node: secondary_node.clone(),
                    array: secondary_array.clone(),
                    volume: secondary_volume.clone(),
                    wal_volume: secondary_wal.clone(),
                },
            };
            let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;
            let receipt = coordinator.start_replication(&request, &timestamp)?;
            render_json(stdout, &receipt)
        }
    }
}
