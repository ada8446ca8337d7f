//! Error types for transport failures.
//!
//! One variant per failing stage so callers and operators can tell a node
//! that was never reached from one that answered garbage. The endpoint is
//! carried everywhere it is known.

use std::io;

use thiserror::Error;

use skerry_protocol::{CommandKind, EnvelopeError};

/// Errors surfaced while delivering an envelope.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint's host name did not resolve to an address.
    #[error("failed to resolve node address {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    /// The node could not be reached.
    #[error("failed to connect to node at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    /// The envelope could not be serialised; a programming error, not an
    /// operational one.
    #[error("failed to encode request: {0}")]
    Encode(#[source] EnvelopeError),
    /// Writing the request failed mid-flight.
    #[error("failed to send request to node at {endpoint}: {source}")]
    Send {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    /// Reading the response failed, or the connection closed before a full
    /// message arrived.
    #[error("failed to read response from node at {endpoint}: {source}")]
    Receive {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    /// The response line was not a well-formed response message.
    #[error("failed to decode response from node at {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// The response's correlation id differs from the request's.
    #[error("node at {endpoint} answered correlation id {received}, expected {expected}")]
    CorrelationMismatch {
        endpoint: String,
        expected: String,
        received: String,
    },
    /// The RPC endpoint text did not form a valid URI.
    #[error("invalid RPC endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    /// The RPC channel could not be established.
    #[error("failed to dial RPC service at {endpoint}: {source}")]
    Dial {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },
    /// The RPC call itself failed.
    #[error("RPC call to {endpoint} failed: {source}")]
    Rpc {
        endpoint: String,
        #[source]
        source: tonic::Status,
    },
    /// The RPC reply was missing its response header.
    #[error("RPC reply from {endpoint} is missing its response header")]
    MalformedReply { endpoint: String },
    /// A parameter the RPC schema requires was absent at encode time.
    #[error("command {command} requires parameter '{field}'")]
    MissingParam {
        command: CommandKind,
        field: &'static str,
    },
    /// The blocking runtime backing the RPC client could not be created.
    #[error("failed to create RPC runtime: {source}")]
    Runtime {
        #[source]
        source: io::Error,
    },
}
