//! Shared-store connection settings for HA coordination.
//!
//! HA commands talk to a shared relational store rather than a node. All
//! connection parameters must be supplied before any HA operation runs;
//! commands that never touch the store are unaffected by absent settings.

use serde::Deserialize;

use crate::DEFAULT_RPC_PORT;
use crate::client::ConfigError;

/// Raw shared-store settings as loaded from configuration.
///
/// Every field is optional at load time; [`StoreSettings::require`] converts
/// the settings into the validated [`StoreConfig`] HA operations take.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Store host name or address.
    pub host: Option<String>,
    /// Store port.
    pub port: Option<u16>,
    /// Store user name.
    pub user: Option<String>,
    /// Store password.
    pub password: Option<String>,
    /// Database holding the cluster tables.
    pub dbname: Option<String>,
    /// RPC port combined with a node's registered address when resolving it.
    pub rpc_port: Option<u16>,
}

/// Fully-validated shared-store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store host name or address.
    pub host: String,
    /// Store port.
    pub port: u16,
    /// Store user name.
    pub user: String,
    /// Store password.
    pub password: String,
    /// Database holding the cluster tables.
    pub dbname: String,
    /// RPC port used when resolving node addresses.
    pub rpc_port: u16,
}

impl StoreSettings {
    /// Validates the settings into a [`StoreConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] naming the first absent required
    /// parameter. The RPC port is not required and falls back to the
    /// transport default.
    pub fn require(&self) -> Result<StoreConfig, ConfigError> {
        Ok(StoreConfig {
            host: self
                .host
                .clone()
                .ok_or(ConfigError::MissingField("store.host"))?,
            port: self.port.ok_or(ConfigError::MissingField("store.port"))?,
            user: self
                .user
                .clone()
                .ok_or(ConfigError::MissingField("store.user"))?,
            password: self
                .password
                .clone()
                .ok_or(ConfigError::MissingField("store.password"))?,
            dbname: self
                .dbname
                .clone()
                .ok_or(ConfigError::MissingField("store.dbname"))?,
            rpc_port: self.rpc_port.unwrap_or(DEFAULT_RPC_PORT),
        })
    }
}
