//! The replication-start saga.
//!
//! Starting replication means writing two instruction rows: one addressed to
//! the primary node, one to the secondary, stamped with the same timestamp so
//! the consuming agents can correlate them. The two inserts are deliberately
//! not wrapped in a transaction — each row is consumed independently by its
//! node's agent — so the saga reports a partial dispatch distinctly from a
//! clean failure and names the compensating action.

use serde::Serialize;

use crate::errors::HaError;
use crate::model::CommandRow;

/// One side of a replication pairing: a volume and its write-ahead-log
/// volume on a specific node and array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeTarget {
    /// Node hosting the volume.
    pub node: String,
    /// Array hosting the volume.
    pub array: String,
    /// Data volume name.
    pub volume: String,
    /// Write-ahead-log volume name.
    pub wal_volume: String,
}

/// A request to start replicating a primary volume to a secondary volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicationRequest {
    /// Source side.
    pub primary: VolumeTarget,
    /// Destination side.
    pub secondary: VolumeTarget,
}

/// Both instruction rows written by a successful replication start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicationReceipt {
    /// Row addressed to the primary node.
    pub primary: CommandRow,
    /// Row addressed to the secondary node.
    pub secondary: CommandRow,
}

/// Sink the saga writes instruction rows through.
///
/// The production implementation inserts into the store's command table; the
/// seam exists so partial-dispatch behaviour is testable without a store.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait CommandSink {
    /// Inserts one instruction row.
    fn insert_command(&mut self, row: &CommandRow) -> Result<(), HaError>;
}

impl ReplicationRequest {
    /// Instruction row addressed to the primary node.
    #[must_use]
    pub fn primary_row(&self, timestamp: &str) -> CommandRow {
        CommandRow::created(
            self.primary.node.clone(),
            instruction("primary", &self.primary, &self.secondary),
            timestamp,
        )
    }

    /// Instruction row addressed to the secondary node.
    #[must_use]
    pub fn secondary_row(&self, timestamp: &str) -> CommandRow {
        CommandRow::created(
            self.secondary.node.clone(),
            instruction("secondary", &self.secondary, &self.primary),
            timestamp,
        )
    }
}

/// Renders the instruction text for one side of the pairing.
///
/// Every value is a separate `key=value` token; consuming agents split on
/// whitespace.
fn instruction(role: &str, own: &VolumeTarget, peer: &VolumeTarget) -> String {
    format!(
        "START_REPLICATION role={role} array={array} volume={volume} wal={wal} \
         peer={peer_node} peer_array={peer_array} peer_volume={peer_volume} peer_wal={peer_wal}",
        array = own.array,
        volume = own.volume,
        wal = own.wal_volume,
        peer_node = peer.node,
        peer_array = peer.array,
        peer_volume = peer.volume,
        peer_wal = peer.wal_volume,
    )
}

/// Runs the two-insert saga against `sink`.
///
/// The primary-side insert runs first. A failure there is a clean failure:
/// nothing was dispatched. A failure on the secondary-side insert after the
/// primary succeeded is reported as [`HaError::PartialDispatch`] so operators
/// know a compensating delete may be required.
pub(crate) fn dispatch_replication(
    sink: &mut dyn CommandSink,
    request: &ReplicationRequest,
    timestamp: &str,
) -> Result<ReplicationReceipt, HaError> {
    let primary = request.primary_row(timestamp);
    sink.insert_command(&primary)?;

    let secondary = request.secondary_row(timestamp);
    if let Err(source) = sink.insert_command(&secondary) {
        return Err(HaError::PartialDispatch {
            dispatched: primary.node_name,
            failed: secondary.node_name,
            source: Box::new(source),
        });
    }

    Ok(ReplicationReceipt { primary, secondary })
}

#[cfg(test)]
mod tests {
    use mockall::predicate::always;

    use super::*;
    use crate::model::COMMAND_STATUS_CREATED;

    fn request() -> ReplicationRequest {
        ReplicationRequest {
            primary: VolumeTarget {
                node: "node-a".to_owned(),
                array: "array0".to_owned(),
                volume: "vol01".to_owned(),
                wal_volume: "vol01-wal".to_owned(),
            },
            secondary: VolumeTarget {
                node: "node-b".to_owned(),
                array: "array1".to_owned(),
                volume: "vol01r".to_owned(),
                wal_volume: "vol01r-wal".to_owned(),
            },
        }
    }

    fn query_error() -> HaError {
        HaError::NodeNotFound {
            name: "stand-in failure".to_owned(),
        }
    }

    #[test]
    fn instruction_tokens_are_separated() {
        let row = request().primary_row("2026-08-07T12:00:00Z");
        assert_eq!(row.node_name, "node-a");
        assert_eq!(row.status, COMMAND_STATUS_CREATED);
        // Adjacent values must never run together into one token.
        assert!(row.content.contains("volume=vol01 wal=vol01-wal"));
        assert!(row.content.contains("peer_volume=vol01r peer_wal=vol01r-wal"));
        for token in row.content.split_whitespace().skip(1) {
            assert!(token.contains('='), "token '{token}' lost its key");
        }
    }

    #[test]
    fn both_rows_share_the_timestamp() {
        let request = request();
        let primary = request.primary_row("ts-1");
        let secondary = request.secondary_row("ts-1");
        assert_eq!(primary.timestamp, secondary.timestamp);
        assert!(primary.content.contains("role=primary"));
        assert!(secondary.content.contains("role=secondary"));
    }

    #[test]
    fn successful_dispatch_returns_both_rows() {
        let mut sink = MockCommandSink::new();
        sink.expect_insert_command()
            .with(always())
            .times(2)
            .returning(|_| Ok(()));

        let receipt = dispatch_replication(&mut sink, &request(), "ts-1").expect("dispatch");
        assert_eq!(receipt.primary.node_name, "node-a");
        assert_eq!(receipt.secondary.node_name, "node-b");
    }

    #[test]
    fn primary_failure_is_a_clean_failure() {
        let mut sink = MockCommandSink::new();
        sink.expect_insert_command()
            .times(1)
            .returning(|_| Err(query_error()));

        let result = dispatch_replication(&mut sink, &request(), "ts-1");
        assert!(
            !matches!(result, Err(HaError::PartialDispatch { .. })),
            "nothing was dispatched, so this must not be a partial failure"
        );
        assert!(result.is_err());
    }

    /// Records accepted rows and fails every insert past a threshold, so
    /// tests can audit what a partial dispatch left behind.
    struct RecordingSink {
        rows: Vec<CommandRow>,
        accept: usize,
    }

    impl CommandSink for RecordingSink {
        fn insert_command(&mut self, row: &CommandRow) -> Result<(), HaError> {
            if self.rows.len() >= self.accept {
                return Err(query_error());
            }
            self.rows.push(row.clone());
            Ok(())
        }
    }

    #[test]
    fn secondary_failure_reports_partial_dispatch() {
        let mut sink = RecordingSink {
            rows: Vec::new(),
            accept: 1,
        };

        let result = dispatch_replication(&mut sink, &request(), "ts-1");
        let Err(HaError::PartialDispatch {
            dispatched, failed, ..
        }) = result
        else {
            panic!("expected a partial dispatch");
        };
        assert_eq!(dispatched, "node-a");
        assert_eq!(failed, "node-b");

        // The audit trail shows the primary-side instruction and nothing else.
        assert_eq!(sink.rows.len(), 1);
        let row = sink.rows.first().expect("primary row");
        assert_eq!(row.node_name, "node-a");
        assert_eq!(row.status, COMMAND_STATUS_CREATED);
    }
}
