//! Transport backends for delivering command envelopes to storage nodes.
//!
//! Two interchangeable backends implement the same [`Transport`] seam: a
//! line-delimited JSON socket protocol and a typed RPC protocol. Which one a
//! client uses is a static configuration choice; callers never see the wire
//! format, only an [`Envelope`] in and a [`Response`] out.
//!
//! A call moves through connect, send, await, and decode stages; each stage
//! failure is surfaced as its own [`TransportError`] variant and nothing is
//! retried here. Retry policy, if any, belongs to the caller.

mod errors;
mod rpc;
mod socket;

use skerry_protocol::{Envelope, Response};

pub use errors::TransportError;
pub use rpc::RpcTransport;
pub use socket::SocketTransport;

/// Delivers an envelope to a node and returns its parsed response.
///
/// Implementations verify the correlation-id echo before returning: a
/// response that does not answer the request is a protocol violation, not a
/// response.
pub trait Transport {
    /// Sends one envelope and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] identifying the failing stage. Calls are
    /// never retried by this layer.
    fn send(&self, envelope: &Envelope) -> Result<Response, TransportError>;
}
