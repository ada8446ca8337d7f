//! Client configuration for the skerry management CLI.
//!
//! Configuration is an explicit object handed to constructors — there is no
//! process-wide mutable state. The binary builds a [`ClientConfig`] from an
//! optional YAML file plus flag overrides and passes it down; transports and
//! the HA coordinator each borrow the piece they need, so clients with
//! different targets can coexist in one process (and in tests).

mod client;
mod endpoint;
mod logging;
mod store;
mod transport;

pub use client::{ClientConfig, ConfigError};
pub use endpoint::{Endpoint, EndpointParseError};
pub use logging::LogFormat;
pub use store::{StoreConfig, StoreSettings};
pub use transport::TransportKind;

/// Default port a node's line-delimited JSON command socket listens on.
pub const DEFAULT_SOCKET_PORT: u16 = 18716;

/// Default port a node's typed RPC service listens on.
pub const DEFAULT_RPC_PORT: u16 = 18717;

/// Default host for both node transports.
pub const DEFAULT_HOST: &str = "127.0.0.1";
