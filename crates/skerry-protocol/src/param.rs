//! Typed parameter blocks carried inside request envelopes.
//!
//! Parameters are a tagged union keyed by resource family rather than a bag
//! of dynamically-inspected values: a command only accepts the block matching
//! its family, and the envelope builder enforces the pairing before anything
//! reaches a wire.

use serde::{Deserialize, Serialize};

use crate::command::CommandFamily;

/// Parameter block for one command, tagged by resource family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandParam {
    /// Parameters for device commands.
    Device(DeviceParam),
    /// Parameters for array commands.
    Array(ArrayParam),
    /// Parameters for volume commands.
    Volume(VolumeParam),
}

impl CommandParam {
    /// Family this block belongs to.
    #[must_use]
    pub fn family(&self) -> CommandFamily {
        match self {
            Self::Device(_) => CommandFamily::Device,
            Self::Array(_) => CommandFamily::Array,
            Self::Volume(_) => CommandFamily::Volume,
        }
    }
}

/// Parameters accepted by device commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceParam {
    /// Device name, for commands addressing a single device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Parameters accepted by array commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayParam {
    /// Array name, for commands addressing a single array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Parameters accepted by volume commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeParam {
    /// Volume name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Owning array name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array: Option<String>,
    /// Volume capacity in bytes, for creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// IOPS ceiling, zero meaning unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxiops: Option<u64>,
    /// Bandwidth ceiling in MiB/s, zero meaning unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxbw: Option<u64>,
    /// NVMe subsystem qualified name to mount under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnqn: Option<String>,
}

impl CommandParam {
    /// Decodes a raw JSON parameter object into the block for `family`.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error when the value does not match the
    /// family's schema. A `System` family never carries parameters, so any
    /// value is rejected there by the envelope builder before this runs.
    pub(crate) fn from_value(
        family: CommandFamily,
        value: serde_json::Value,
    ) -> Result<Option<Self>, serde_json::Error> {
        let param = match family {
            CommandFamily::System => None,
            CommandFamily::Device => Some(Self::Device(serde_json::from_value(value)?)),
            CommandFamily::Array => Some(Self::Array(serde_json::from_value(value)?)),
            CommandFamily::Volume => Some(Self::Volume(serde_json::from_value(value)?)),
        };
        Ok(param)
    }
}
