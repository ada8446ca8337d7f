//! Error types for HA coordination failures.

use thiserror::Error;

use skerry_config::ConfigError;

/// Errors surfaced by coordinator operations.
#[derive(Debug, Error)]
pub enum HaError {
    /// Required store connection parameters are missing.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The store did not accept a connection or failed the liveness probe.
    #[error("cluster store at {endpoint} is unreachable: {source}")]
    StoreUnreachable {
        endpoint: String,
        #[source]
        source: postgres::Error,
    },
    /// A query was rejected by the store.
    #[error("cluster store query '{operation}' failed: {source}")]
    QueryFailed {
        operation: &'static str,
        #[source]
        source: postgres::Error,
    },
    /// No node row matches the requested name.
    #[error("node '{name}' is not registered in the cluster store")]
    NodeNotFound { name: String },
    /// More than one node row matches the requested name. Node names are
    /// expected to be unique; duplicates mean the registry needs repair.
    #[error("node '{name}' has {count} rows in the cluster store; names must be unique")]
    AmbiguousNode { name: String, count: usize },
    /// The primary-side instruction was written but the secondary-side insert
    /// failed. The primary node's agent may already have picked the
    /// instruction up; the dangling `Created` row addressed to
    /// `{dispatched}` must be removed before retrying.
    #[error(
        "replication start partially dispatched: instruction for '{dispatched}' was written, \
         instruction for '{failed}' was not ({source}); remove the dangling row before retrying"
    )]
    PartialDispatch {
        dispatched: String,
        failed: String,
        #[source]
        source: Box<HaError>,
    },
}
