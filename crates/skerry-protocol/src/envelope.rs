//! Request envelope construction and wire encoding.
//!
//! An envelope pairs a command with a freshly generated correlation id, the
//! requestor identity, and an optional typed parameter block. The correlation
//! id links the request to its response: nodes echo it verbatim, and the
//! transports treat any mismatch as a protocol violation.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::command::{CommandFamily, CommandKind};
use crate::param::CommandParam;

/// A correlation-tracked request ready for either transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    /// Command to execute, serialised under its wire name.
    pub command: CommandKind,
    /// Correlation id echoed verbatim by the response.
    pub rid: String,
    /// Identity of the requesting client.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub requestor: String,
    /// Typed parameter block, when the command carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<CommandParam>,
}

/// Errors raised while building or translating envelopes.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The parameter block belongs to a different resource family than the
    /// command.
    #[error("command {command} ({expected} family) cannot carry a {found} parameter block")]
    ParamFamilyMismatch {
        command: CommandKind,
        expected: CommandFamily,
        found: CommandFamily,
    },
    /// A system-family command was given a parameter block.
    #[error("command {command} does not accept parameters")]
    UnexpectedParam { command: CommandKind },
    /// The envelope could not be serialised to the wire shape.
    #[error("failed to encode request envelope: {0}")]
    Encode(#[source] serde_json::Error),
    /// A wire line could not be parsed back into an envelope.
    #[error("failed to decode request envelope: {0}")]
    Decode(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct WireEnvelope {
    command: CommandKind,
    rid: String,
    #[serde(default)]
    requestor: String,
    #[serde(default)]
    param: Option<serde_json::Value>,
}

impl Envelope {
    /// Builds an envelope with a fresh correlation id.
    ///
    /// The id is a time-ordered UUID (version 7); uniqueness holds with
    /// overwhelming probability across concurrently-running clients, so ids
    /// never need coordination with the node.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::ParamFamilyMismatch`] (or
    /// [`EnvelopeError::UnexpectedParam`] for system commands) when the
    /// parameter block does not belong to the command's family.
    pub fn build(
        command: CommandKind,
        requestor: impl Into<String>,
        param: Option<CommandParam>,
    ) -> Result<Self, EnvelopeError> {
        if let Some(block) = &param {
            match command.family() {
                CommandFamily::System => {
                    return Err(EnvelopeError::UnexpectedParam { command });
                }
                expected if block.family() != expected => {
                    return Err(EnvelopeError::ParamFamilyMismatch {
                        command,
                        expected,
                        found: block.family(),
                    });
                }
                _ => {}
            }
        }

        Ok(Self {
            command,
            rid: fresh_rid(),
            requestor: requestor.into(),
            param,
        })
    }

    /// Encodes the envelope as one wire line (JSON, no trailing newline).
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Encode`] when serialisation fails; this
    /// indicates a programming error rather than an operational one.
    pub fn to_wire_json(&self) -> Result<String, EnvelopeError> {
        serde_json::to_string(self).map_err(EnvelopeError::Encode)
    }

    /// Decodes a wire line back into an envelope.
    ///
    /// The parameter object is decoded against the schema of the command's
    /// own family, so a structurally-ambiguous JSON object cannot land in the
    /// wrong family.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Decode`] for malformed JSON or a parameter
    /// object that does not match the command's schema, and
    /// [`EnvelopeError::UnexpectedParam`] when a system command carries one.
    pub fn from_wire_json(line: &str) -> Result<Self, EnvelopeError> {
        let wire: WireEnvelope =
            serde_json::from_str(line.trim_end()).map_err(EnvelopeError::Decode)?;
        let param = match wire.param {
            None => None,
            Some(value) => {
                if wire.command.family() == CommandFamily::System {
                    return Err(EnvelopeError::UnexpectedParam {
                        command: wire.command,
                    });
                }
                CommandParam::from_value(wire.command.family(), value)
                    .map_err(EnvelopeError::Decode)?
            }
        };
        Ok(Self {
            command: wire.command,
            rid: wire.rid,
            requestor: wire.requestor,
            param,
        })
    }
}

/// Generates a fresh correlation id.
fn fresh_rid() -> String {
    Uuid::now_v7().to_string()
}
