//! The HA coordinator itself: store connections, reads, and dispatch.

use std::time::Duration;

use postgres::{Client, NoTls, Row};
use tracing::debug;

use skerry_config::{StoreConfig, StoreSettings};

use crate::errors::HaError;
use crate::model::{CommandRow, Node, Replication, Volume};
use crate::replication::{CommandSink, ReplicationReceipt, ReplicationRequest, dispatch_replication};

/// Tracing target for coordinator operations.
const HA_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::coordinator");

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Coordinator for cluster-management commands.
///
/// Holds only configuration; every operation opens and releases its own
/// connection to the shared store.
#[derive(Debug, Clone)]
pub struct HaCoordinator {
    config: StoreConfig,
}

impl HaCoordinator {
    /// Builds a coordinator from validated store configuration.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Builds a coordinator from raw settings, validating required fields.
    ///
    /// # Errors
    ///
    /// Returns [`HaError::Config`] naming the first missing parameter.
    pub fn from_settings(settings: &StoreSettings) -> Result<Self, HaError> {
        Ok(Self::new(settings.require()?))
    }

    /// Lists all registered nodes. An empty cluster yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`HaError::StoreUnreachable`] or [`HaError::QueryFailed`].
    pub fn list_nodes(&self) -> Result<Vec<Node>, HaError> {
        let mut client = self.connect()?;
        let rows = query(&mut client, "list nodes", "SELECT name, ip, lastseen FROM node")?;
        rows.iter().map(node_from_row).collect()
    }

    /// Lists all volumes known to the cluster store.
    ///
    /// # Errors
    ///
    /// Returns [`HaError::StoreUnreachable`] or [`HaError::QueryFailed`].
    pub fn list_volumes(&self) -> Result<Vec<Volume>, HaError> {
        let mut client = self.connect()?;
        let rows = query(
            &mut client,
            "list volumes",
            "SELECT id, name, node_name, array_name, size, lastseen FROM volume",
        )?;
        rows.iter().map(volume_from_row).collect()
    }

    /// Lists all in-flight replications.
    ///
    /// # Errors
    ///
    /// Returns [`HaError::StoreUnreachable`] or [`HaError::QueryFailed`].
    pub fn list_replications(&self) -> Result<Vec<Replication>, HaError> {
        let mut client = self.connect()?;
        let rows = query(
            &mut client,
            "list replications",
            "SELECT id, source_volume_id, source_wal_volume_id, \
             destination_volume_id, destination_wal_volume_id FROM replication",
        )?;
        rows.iter().map(replication_from_row).collect()
    }

    /// Resolves a node name to the `ip:port` address of its RPC service.
    ///
    /// Node names are expected to be unique in the registry; a duplicate is
    /// reported rather than silently resolved to an arbitrary row.
    ///
    /// # Errors
    ///
    /// Returns [`HaError::NodeNotFound`] when no row matches and
    /// [`HaError::AmbiguousNode`] when several do, besides the usual store
    /// failures.
    pub fn resolve_node_address(&self, node_name: &str) -> Result<String, HaError> {
        let mut client = self.connect()?;
        let rows = client
            .query("SELECT ip FROM node WHERE name = $1", &[&node_name])
            .map_err(|source| HaError::QueryFailed {
                operation: "resolve node address",
                source,
            })?;
        let ips = rows
            .iter()
            .map(|row| {
                row.try_get("ip").map_err(|source| HaError::QueryFailed {
                    operation: "resolve node address",
                    source,
                })
            })
            .collect::<Result<Vec<String>, _>>()?;
        let ip = select_unique_ip(node_name, ips)?;
        Ok(format_node_address(&ip, self.config.rpc_port))
    }

    /// Starts replication by dispatching paired instruction rows to the
    /// primary and secondary nodes.
    ///
    /// The two inserts run sequentially on one connection without a
    /// transaction; see [`HaError::PartialDispatch`] for the failure mode
    /// this leaves behind.
    ///
    /// # Errors
    ///
    /// Returns [`HaError::PartialDispatch`] when only the primary-side row
    /// was written, besides the usual store failures.
    pub fn start_replication(
        &self,
        request: &ReplicationRequest,
        timestamp: &str,
    ) -> Result<ReplicationReceipt, HaError> {
        debug!(
            target: HA_TARGET,
            primary = %request.primary.node,
            secondary = %request.secondary.node,
            timestamp,
            "dispatching replication start"
        );
        let client = self.connect()?;
        let mut sink = PgCommandSink { client };
        dispatch_replication(&mut sink, request, timestamp)
    }

    fn connect(&self) -> Result<Client, HaError> {
        let endpoint = format!("{}:{}", self.config.host, self.config.port);
        let mut pg = postgres::Config::new();
        pg.host(&self.config.host)
            .port(self.config.port)
            .user(&self.config.user)
            .password(&self.config.password)
            .dbname(&self.config.dbname)
            .connect_timeout(CONNECT_TIMEOUT);

        let mut client = pg
            .connect(NoTls)
            .map_err(|source| HaError::StoreUnreachable {
                endpoint: endpoint.clone(),
                source,
            })?;

        // Probe liveness before running the operation's queries.
        client
            .simple_query("SELECT 1")
            .map_err(|source| HaError::StoreUnreachable { endpoint, source })?;

        Ok(client)
    }
}

/// Production command sink writing into the store's command table.
struct PgCommandSink {
    client: Client,
}

impl CommandSink for PgCommandSink {
    fn insert_command(&mut self, row: &CommandRow) -> Result<(), HaError> {
        self.client
            .execute(
                "INSERT INTO command (node_name, content, status, timestamp) \
                 VALUES ($1, $2, $3, $4)",
                &[&row.node_name, &row.content, &row.status, &row.timestamp],
            )
            .map_err(|source| HaError::QueryFailed {
                operation: "insert command row",
                source,
            })?;
        Ok(())
    }
}

fn query(client: &mut Client, operation: &'static str, sql: &str) -> Result<Vec<Row>, HaError> {
    client
        .query(sql, &[])
        .map_err(|source| HaError::QueryFailed { operation, source })
}

fn node_from_row(row: &Row) -> Result<Node, HaError> {
    let map = |source| HaError::QueryFailed {
        operation: "list nodes",
        source,
    };
    Ok(Node {
        name: row.try_get("name").map_err(map)?,
        ip: row.try_get("ip").map_err(map)?,
        last_seen: row.try_get("lastseen").map_err(map)?,
    })
}

fn volume_from_row(row: &Row) -> Result<Volume, HaError> {
    let map = |source| HaError::QueryFailed {
        operation: "list volumes",
        source,
    };
    Ok(Volume {
        id: row.try_get("id").map_err(map)?,
        name: row.try_get("name").map_err(map)?,
        node_name: row.try_get("node_name").map_err(map)?,
        array_name: row.try_get("array_name").map_err(map)?,
        size: row.try_get("size").map_err(map)?,
        last_seen: row.try_get("lastseen").map_err(map)?,
    })
}

fn replication_from_row(row: &Row) -> Result<Replication, HaError> {
    let map = |source| HaError::QueryFailed {
        operation: "list replications",
        source,
    };
    Ok(Replication {
        id: row.try_get("id").map_err(map)?,
        source_volume_id: row.try_get("source_volume_id").map_err(map)?,
        source_wal_volume_id: row.try_get("source_wal_volume_id").map_err(map)?,
        destination_volume_id: row.try_get("destination_volume_id").map_err(map)?,
        destination_wal_volume_id: row.try_get("destination_wal_volume_id").map_err(map)?,
    })
}

/// Reduces the IPs matching one node name to the single expected address.
fn select_unique_ip(name: &str, mut ips: Vec<String>) -> Result<String, HaError> {
    match ips.len() {
        0 => Err(HaError::NodeNotFound {
            name: name.to_owned(),
        }),
        1 => ips.pop().ok_or(HaError::NodeNotFound {
            name: name.to_owned(),
        }),
        count => Err(HaError::AmbiguousNode {
            name: name.to_owned(),
            count,
        }),
    }
}

/// Combines a registered IP with the configured RPC port.
fn format_node_address(ip: &str, rpc_port: u16) -> String {
    format!("{ip}:{rpc_port}")
}
