//! Line-delimited JSON socket backend.
//!
//! Each call opens its own TCP connection to the node's command socket,
//! writes the JSON-encoded envelope terminated by a newline, and reads one
//! newline-terminated response. The connection is owned by the call frame, so
//! it is closed on every exit path, success or failure.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use skerry_config::Endpoint;
use skerry_protocol::{Envelope, Response};

use crate::Transport;
use crate::errors::TransportError;

/// Tracing target for socket transport operations.
const SOCKET_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::socket");

pub(crate) const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Socket transport addressing one node's command socket.
#[derive(Debug, Clone)]
pub struct SocketTransport {
    endpoint: Endpoint,
}

impl SocketTransport {
    /// Builds a transport for the given endpoint.
    #[must_use]
    pub fn new(endpoint: Endpoint) -> Self {
        Self { endpoint }
    }

    /// The endpoint this transport dials.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn connect(&self) -> Result<TcpStream, TransportError> {
        let address = resolve_address(&self.endpoint).map_err(|source| TransportError::Resolve {
            endpoint: self.endpoint.to_string(),
            source,
        })?;
        TcpStream::connect_timeout(&address, CONNECT_TIMEOUT).map_err(|source| {
            TransportError::Connect {
                endpoint: self.endpoint.to_string(),
                source,
            }
        })
    }
}

impl Transport for SocketTransport {
    fn send(&self, envelope: &Envelope) -> Result<Response, TransportError> {
        let line = envelope.to_wire_json().map_err(TransportError::Encode)?;

        debug!(
            target: SOCKET_TARGET,
            command = %envelope.command,
            rid = %envelope.rid,
            endpoint = %self.endpoint,
            "sending envelope"
        );

        let mut stream = self.connect()?;
        write_request(&mut stream, &line).map_err(|source| TransportError::Send {
            endpoint: self.endpoint.to_string(),
            source,
        })?;

        let reply = read_response_line(&stream).map_err(|source| TransportError::Receive {
            endpoint: self.endpoint.to_string(),
            source,
        })?;

        let response: Response =
            serde_json::from_str(reply.trim_end()).map_err(|source| TransportError::Decode {
                endpoint: self.endpoint.to_string(),
                source,
            })?;

        if !response.answers(envelope) {
            return Err(TransportError::CorrelationMismatch {
                endpoint: self.endpoint.to_string(),
                expected: envelope.rid.clone(),
                received: response.rid,
            });
        }

        Ok(response)
    }
}

fn resolve_address(endpoint: &Endpoint) -> io::Result<SocketAddr> {
    let mut addresses = (endpoint.host.as_str(), endpoint.port).to_socket_addrs()?;
    addresses
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}

fn write_request(stream: &mut TcpStream, line: &str) -> io::Result<()> {
    stream.write_all(line.as_bytes())?;
    stream.write_all(b"\n")?;
    stream.flush()
}

fn read_response_line(stream: &TcpStream) -> io::Result<String> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed before a response arrived",
        ));
    }
    Ok(line)
}
