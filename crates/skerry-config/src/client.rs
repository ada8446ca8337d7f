//! The top-level client configuration object.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::endpoint::Endpoint;
use crate::logging::LogFormat;
use crate::store::StoreSettings;
use crate::transport::TransportKind;
use crate::{DEFAULT_HOST, DEFAULT_RPC_PORT, DEFAULT_SOCKET_PORT};

/// Configuration for one skerry client instance.
///
/// Built once by the binary and passed to constructors; the dispatch path
/// treats it as read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Which transport node commands use.
    pub transport: TransportKind,
    /// Node JSON command socket endpoint.
    pub socket: Endpoint,
    /// Node typed RPC endpoint.
    pub rpc: Endpoint,
    /// Shared-store settings for HA commands.
    pub store: StoreSettings,
    /// Tracing filter expression.
    pub log_filter: String,
    /// Tracing output format.
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            socket: Endpoint::new(DEFAULT_HOST, DEFAULT_SOCKET_PORT),
            rpc: Endpoint::new(DEFAULT_HOST, DEFAULT_RPC_PORT),
            store: StoreSettings::default(),
            log_filter: "warn".to_owned(),
            log_format: LogFormat::default(),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required parameter was not supplied.
    #[error("required configuration parameter '{0}' is not set")]
    MissingField(&'static str),
    /// The configuration file could not be read.
    #[error("failed to read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl ClientConfig {
    /// Parses a configuration from YAML text.
    ///
    /// Absent keys keep their defaults, so a partial file is valid.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid YAML for
    /// this shape.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(source).map_err(|error| ConfigError::Parse(error.to_string()))
    }

    /// Loads a configuration file, or the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_protocol_ports() {
        let config = ClientConfig::default();
        assert_eq!(config.transport, TransportKind::Socket);
        assert_eq!(config.socket.to_string(), "127.0.0.1:18716");
        assert_eq!(config.rpc.to_string(), "127.0.0.1:18717");
        assert!(config.store.host.is_none());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ClientConfig::from_yaml("transport: rpc\n").expect("parse");
        assert_eq!(config.transport, TransportKind::Rpc);
        assert_eq!(config.socket.to_string(), "127.0.0.1:18716");
    }

    #[test]
    fn full_yaml_overrides_everything() {
        let source = r#"
transport: rpc
socket: "node-a:18716"
rpc: "node-a:18717"
store:
  host: store.cluster.local
  port: 5432
  user: skerry
  password: secret
  dbname: cluster
  rpc_port: 50055
log_filter: debug
log_format: json
"#;
        let config = ClientConfig::from_yaml(source).expect("parse");
        assert_eq!(config.rpc.to_string(), "node-a:18717");
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        let store = config.store.require().expect("store settings complete");
        assert_eq!(store.rpc_port, 50055);
    }

    #[test]
    fn load_without_path_returns_defaults() {
        let config = ClientConfig::load(None).expect("load");
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn load_reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "transport: rpc").expect("write");
        let config = ClientConfig::load(Some(file.path())).expect("load");
        assert_eq!(config.transport, TransportKind::Rpc);
    }

    #[test]
    fn load_reports_missing_file() {
        let result = ClientConfig::load(Some(Path::new("/nonexistent/skerry.yaml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result = ClientConfig::from_yaml("transport: [not, a, scalar]\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
