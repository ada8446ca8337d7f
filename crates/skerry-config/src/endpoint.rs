//! Network endpoint parsing shared by the socket and RPC transports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A `host:port` pair addressing one node service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Builds an endpoint from parts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.host, self.port)
    }
}

/// Errors encountered while parsing an [`Endpoint`] from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointParseError {
    /// No `:` separated the host from the port.
    #[error("missing port in endpoint '{0}'")]
    MissingPort(String),
    /// The host part was empty.
    #[error("missing host in endpoint '{0}'")]
    MissingHost(String),
    /// The port part was not a valid TCP port number.
    #[error("invalid port in endpoint '{0}'")]
    InvalidPort(String),
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let Some((host, port)) = trimmed.rsplit_once(':') else {
            return Err(EndpointParseError::MissingPort(trimmed.to_owned()));
        };
        if host.is_empty() {
            return Err(EndpointParseError::MissingHost(trimmed.to_owned()));
        }
        let port: u16 = port
            .parse()
            .map_err(|_| EndpointParseError::InvalidPort(trimmed.to_owned()))?;
        Ok(Self::new(host, port))
    }
}

impl TryFrom<String> for Endpoint {
    type Error = EndpointParseError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        input.parse()
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.to_string()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn parses_host_and_port() {
        let endpoint: Endpoint = "10.0.0.5:50055".parse().expect("parse");
        assert_eq!(endpoint, Endpoint::new("10.0.0.5", 50055));
        assert_eq!(endpoint.to_string(), "10.0.0.5:50055");
    }

    #[rstest]
    #[case::no_port("localhost")]
    #[case::empty("")]
    fn rejects_missing_port(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Endpoint>(),
            Err(EndpointParseError::MissingPort(_))
        ));
    }

    #[test]
    fn rejects_missing_host() {
        assert!(matches!(
            ":18716".parse::<Endpoint>(),
            Err(EndpointParseError::MissingHost(_))
        ));
    }

    #[rstest]
    #[case::text("node:abc")]
    #[case::overflow("node:99999")]
    fn rejects_invalid_port(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Endpoint>(),
            Err(EndpointParseError::InvalidPort(_))
        ));
    }

    #[test]
    fn serde_round_trips_through_text() {
        let endpoint = Endpoint::new("node-a", 18716);
        let json = serde_json::to_string(&endpoint).expect("serialise");
        assert_eq!(json, r#""node-a:18716""#);
        let parsed: Endpoint = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(parsed, endpoint);
    }
}
