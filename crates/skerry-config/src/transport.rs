//! Transport selection between the socket and RPC backends.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which wire protocol the client uses to reach nodes.
///
/// Selection is static per client instance: it is read once when the
/// dispatcher is built and never renegotiated per call.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransportKind {
    /// Newline-terminated JSON over a TCP socket.
    #[default]
    Socket,
    /// Typed RPC, one method per command.
    Rpc,
}
