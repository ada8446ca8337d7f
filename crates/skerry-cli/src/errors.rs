//! Error types and exit-status mapping for the CLI runtime.

use std::io;

use thiserror::Error;

use skerry_config::{ConfigError, EndpointParseError};
use skerry_events::CatalogError;
use skerry_ha::HaError;
use skerry_protocol::EnvelopeError;
use skerry_transport::TransportError;

use crate::telemetry::TelemetryError;

/// Errors surfaced by the CLI runtime.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    /// Argument parsing failed; clap has already rendered the message.
    #[error("{0}")]
    CliUsage(clap::Error),
    /// Configuration could not be loaded.
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(#[from] ConfigError),
    /// Telemetry could not be initialised.
    #[error("failed to initialise telemetry: {0}")]
    Telemetry(#[from] TelemetryError),
    /// The request envelope could not be built.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
    /// The transport failed to deliver the request.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The event taxonomy could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// A coordinator operation failed.
    #[error(transparent)]
    Ha(#[from] HaError),
    /// A resolved node address did not parse as an endpoint.
    #[error("cluster store returned an unusable node address: {0}")]
    NodeAddress(#[from] EndpointParseError),
    /// The dispatch timestamp could not be formatted.
    #[error("failed to format dispatch timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    /// Writing to an output stream failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[from] io::Error),
    /// Rendering a payload as JSON failed.
    #[error("failed to render output: {0}")]
    RenderOutput(#[from] serde_json::Error),
}

impl AppError {
    /// Exit status for this error.
    ///
    /// Usage errors exit with 2 in line with common CLI conventions; every
    /// operational failure exits with 1.
    pub(crate) fn exit_status(&self) -> u8 {
        match self {
            Self::CliUsage(_) => 2,
            _ => 1,
        }
    }
}
