//! Command identification for node requests.
//!
//! Each command a node understands has a canonical wire name and belongs to
//! one resource family. The family determines which typed parameter block the
//! command may carry; the dispatch and RPC layers match on the kind itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands carried by this layer.
///
/// Per-resource semantics live with the node-side engine; the client only
/// needs the names, families, and the one-method-per-command RPC mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// Query engine version and uptime.
    #[serde(rename = "SYSINFO")]
    SystemInfo,
    /// Ask the engine to shut down.
    #[serde(rename = "STOPSYSTEM")]
    StopSystem,
    /// Rescan attached devices.
    #[serde(rename = "SCANDEVICE")]
    ScanDevice,
    /// List attached devices.
    #[serde(rename = "LISTDEVICE")]
    ListDevice,
    /// Fetch SMART data for one device.
    #[serde(rename = "SMARTLOG")]
    SmartLog,
    /// List arrays on the node.
    #[serde(rename = "LISTARRAY")]
    ListArray,
    /// Describe one array.
    #[serde(rename = "ARRAYINFO")]
    ArrayInfo,
    /// List volumes on an array.
    #[serde(rename = "LISTVOLUME")]
    ListVolume,
    /// Create a volume.
    #[serde(rename = "CREATEVOLUME")]
    CreateVolume,
    /// Expose a volume to initiators.
    #[serde(rename = "MOUNTVOLUME")]
    MountVolume,
    /// Withdraw a volume from initiators.
    #[serde(rename = "UNMOUNTVOLUME")]
    UnmountVolume,
}

/// Resource family a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFamily {
    /// Engine-wide commands; no parameter block.
    System,
    /// Device commands parameterised by [`crate::DeviceParam`].
    Device,
    /// Array commands parameterised by [`crate::ArrayParam`].
    Array,
    /// Volume commands parameterised by [`crate::VolumeParam`].
    Volume,
}

impl CommandKind {
    /// All commands, in wire-name order.
    pub const ALL: &'static [Self] = &[
        Self::SystemInfo,
        Self::StopSystem,
        Self::ScanDevice,
        Self::ListDevice,
        Self::SmartLog,
        Self::ListArray,
        Self::ArrayInfo,
        Self::ListVolume,
        Self::CreateVolume,
        Self::MountVolume,
        Self::UnmountVolume,
    ];

    /// Canonical wire name of the command.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SystemInfo => "SYSINFO",
            Self::StopSystem => "STOPSYSTEM",
            Self::ScanDevice => "SCANDEVICE",
            Self::ListDevice => "LISTDEVICE",
            Self::SmartLog => "SMARTLOG",
            Self::ListArray => "LISTARRAY",
            Self::ArrayInfo => "ARRAYINFO",
            Self::ListVolume => "LISTVOLUME",
            Self::CreateVolume => "CREATEVOLUME",
            Self::MountVolume => "MOUNTVOLUME",
            Self::UnmountVolume => "UNMOUNTVOLUME",
        }
    }

    /// Resource family the command belongs to.
    #[must_use]
    pub fn family(self) -> CommandFamily {
        match self {
            Self::SystemInfo | Self::StopSystem => CommandFamily::System,
            Self::ScanDevice | Self::ListDevice | Self::SmartLog => CommandFamily::Device,
            Self::ListArray | Self::ArrayInfo => CommandFamily::Array,
            Self::ListVolume | Self::CreateVolume | Self::MountVolume | Self::UnmountVolume => {
                CommandFamily::Volume
            }
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl fmt::Display for CommandFamily {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::Device => "device",
            Self::Array => "array",
            Self::Volume => "volume",
        };
        formatter.write_str(name)
    }
}

/// Error raised when a command name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command '{0}'")]
pub struct ParseCommandError(pub String);

impl FromStr for CommandKind {
    type Err = ParseCommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalised)
            .ok_or_else(|| ParseCommandError(input.to_owned()))
    }
}
