//! HA coordination against the shared cluster store.
//!
//! Cluster-management commands do not talk to a node directly: they operate
//! on a shared relational store that holds cluster topology (nodes, volumes,
//! in-flight replications) and doubles as an asynchronous command queue
//! between nodes. The coordinator reads topology, resolves node addresses,
//! and writes replication-intent rows that each node's own agent polls and
//! executes; it never consumes or updates queue rows itself.
//!
//! Every operation acquires its own store connection, probes it, queries, and
//! releases it before returning. There is no pooling; a management client's
//! call rate does not justify one.

mod coordinator;
mod errors;
mod model;
mod replication;

pub use coordinator::HaCoordinator;
pub use errors::HaError;
pub use model::{COMMAND_STATUS_CREATED, CommandRow, Node, Replication, Volume};
pub use replication::{ReplicationReceipt, ReplicationRequest, VolumeTarget};
