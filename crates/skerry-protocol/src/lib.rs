//! Wire protocol model shared by the skerry client transports.
//!
//! The module owns the request envelope exchanged with storage nodes, the
//! typed parameter families carried inside it, and the response shape nodes
//! answer with. Both transports (line-delimited JSON sockets and typed RPC)
//! speak in terms of these types so the dispatch layer stays transport
//! agnostic.

mod command;
mod envelope;
mod param;
mod response;

pub use command::{CommandFamily, CommandKind, ParseCommandError};
pub use envelope::{Envelope, EnvelopeError};
pub use param::{ArrayParam, CommandParam, DeviceParam, VolumeParam};
pub use response::{CommandResult, Response, Status};
