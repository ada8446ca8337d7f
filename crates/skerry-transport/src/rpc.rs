//! Typed RPC backend.
//!
//! Every command maps to exactly one method of the `NodeCommand` service.
//! Envelopes are translated into typed request messages before anything is
//! dialed, so schema violations (a missing required parameter, an unmapped
//! command) surface at encode time. Typed replies are folded back into the
//! generic [`Response`] shape the rest of the client consumes.
//!
//! The backend owns a current-thread tokio runtime and blocks on each call;
//! the caller-facing API stays synchronous like the rest of the client.

use std::time::Duration;

use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tonic::transport::Channel;
use tracing::debug;

use skerry_config::Endpoint;
use skerry_proto::v1;
use skerry_proto::v1::node_command_client::NodeCommandClient;
use skerry_protocol::{
    ArrayParam, CommandKind, CommandParam, CommandResult, DeviceParam, Envelope, Response, Status,
    VolumeParam,
};

use crate::Transport;
use crate::errors::TransportError;

/// Tracing target for RPC transport operations.
const RPC_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::rpc");

const DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// RPC transport addressing one node's typed command service.
#[derive(Debug)]
pub struct RpcTransport {
    endpoint: Endpoint,
    runtime: Runtime,
}

impl RpcTransport {
    /// Builds a transport for the given endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Runtime`] when the blocking runtime cannot
    /// be created.
    pub fn new(endpoint: Endpoint) -> Result<Self, TransportError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| TransportError::Runtime { source })?;
        Ok(Self { endpoint, runtime })
    }

    /// The endpoint this transport dials.
    #[must_use]
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn dial_target(&self) -> Result<tonic::transport::Endpoint, TransportError> {
        Channel::from_shared(format!("http://{}", self.endpoint))
            .map_err(|error| TransportError::InvalidEndpoint {
                endpoint: self.endpoint.to_string(),
                message: error.to_string(),
            })
            .map(|target| target.connect_timeout(DIAL_TIMEOUT))
    }
}

impl Transport for RpcTransport {
    fn send(&self, envelope: &Envelope) -> Result<Response, TransportError> {
        // Encode-time schema validation happens before anything is dialed.
        let call = RpcCall::from_envelope(envelope)?;
        let target = self.dial_target()?;
        let endpoint_text = self.endpoint.to_string();

        debug!(
            target: RPC_TARGET,
            command = %envelope.command,
            rid = %envelope.rid,
            endpoint = %endpoint_text,
            "dispatching RPC call"
        );

        let (header, data) = self.runtime.block_on(async {
            let channel = target
                .connect()
                .await
                .map_err(|source| TransportError::Dial {
                    endpoint: endpoint_text.clone(),
                    source,
                })?;
            let mut client = NodeCommandClient::new(channel);
            call.execute(&mut client)
                .await
                .map_err(|source| TransportError::Rpc {
                    endpoint: endpoint_text.clone(),
                    source,
                })
        })?;

        let response = fold_reply(&self.endpoint.to_string(), header, data)?;
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

/// A fully-typed request message, one variant per service method.
#[derive(Debug)]
enum RpcCall {
    SystemInfo(v1::SystemInfoRequest),
    StopSystem(v1::StopSystemRequest),
    ScanDevice(v1::ScanDeviceRequest),
    ListDevice(v1::ListDeviceRequest),
    SmartLog(v1::SmartLogRequest),
    ListArray(v1::ListArrayRequest),
    ArrayInfo(v1::ArrayInfoRequest),
    ListVolume(v1::ListVolumeRequest),
    CreateVolume(v1::CreateVolumeRequest),
    MountVolume(v1::MountVolumeRequest),
    UnmountVolume(v1::UnmountVolumeRequest),
}

impl RpcCall {
    /// Translates an envelope into its typed request message.
    fn from_envelope(envelope: &Envelope) -> Result<Self, TransportError> {
        let header = Some(v1::RequestHeader {
            rid: envelope.rid.clone(),
            requestor: envelope.requestor.clone(),
        });

        let call = match envelope.command {
            CommandKind::SystemInfo => Self::SystemInfo(v1::SystemInfoRequest { header }),
            CommandKind::StopSystem => Self::StopSystem(v1::StopSystemRequest { header }),
            CommandKind::ScanDevice => Self::ScanDevice(v1::ScanDeviceRequest { header }),
            CommandKind::ListDevice => Self::ListDevice(v1::ListDeviceRequest { header }),
            CommandKind::SmartLog => {
                let param = device_param(envelope);
                let name = require(envelope.command, "name", param.name)?;
                Self::SmartLog(v1::SmartLogRequest { header, name })
            }
            CommandKind::ListArray => Self::ListArray(v1::ListArrayRequest { header }),
            CommandKind::ArrayInfo => {
                let param = array_param(envelope);
                let name = require(envelope.command, "name", param.name)?;
                Self::ArrayInfo(v1::ArrayInfoRequest { header, name })
            }
            CommandKind::ListVolume => {
                let param = volume_param(envelope);
                Self::ListVolume(v1::ListVolumeRequest {
                    header,
                    array: param.array.unwrap_or_default(),
                })
            }
            CommandKind::CreateVolume => {
                let param = volume_param(envelope);
                let name = require(envelope.command, "name", param.name)?;
                Self::CreateVolume(v1::CreateVolumeRequest {
                    header,
                    name,
                    array: param.array.unwrap_or_default(),
                    size: param.size.unwrap_or_default(),
                    maxiops: param.maxiops.unwrap_or_default(),
                    maxbw: param.maxbw.unwrap_or_default(),
                    subnqn: param.subnqn.unwrap_or_default(),
                })
            }
            CommandKind::MountVolume => {
                let param = volume_param(envelope);
                let name = require(envelope.command, "name", param.name)?;
                Self::MountVolume(v1::MountVolumeRequest {
                    header,
                    name,
                    array: param.array.unwrap_or_default(),
                    subnqn: param.subnqn.unwrap_or_default(),
                })
            }
            CommandKind::UnmountVolume => {
                let param = volume_param(envelope);
                let name = require(envelope.command, "name", param.name)?;
                Self::UnmountVolume(v1::UnmountVolumeRequest {
                    header,
                    name,
                    array: param.array.unwrap_or_default(),
                })
            }
        };
        Ok(call)
    }

    /// Invokes the method this call maps to and returns the reply header plus
    /// the folded data payload.
    async fn execute(
        self,
        client: &mut NodeCommandClient<Channel>,
    ) -> Result<(Option<v1::ResponseHeader>, Option<Value>), tonic::Status> {
        match self {
            Self::SystemInfo(request) => {
                let reply = client.system_info(request).await?.into_inner();
                Ok((reply.header, Some(json!({"version": reply.version}))))
            }
            Self::StopSystem(request) => {
                let reply = client.stop_system(request).await?.into_inner();
                Ok((reply.header, None))
            }
            Self::ScanDevice(request) => {
                let reply = client.scan_device(request).await?.into_inner();
                Ok((reply.header, None))
            }
            Self::ListDevice(request) => {
                let reply = client.list_device(request).await?.into_inner();
                let devices: Vec<Value> = reply.devices.iter().map(device_value).collect();
                Ok((reply.header, Some(json!({"devices": devices}))))
            }
            Self::SmartLog(request) => {
                let reply = client.smart_log(request).await?.into_inner();
                let data = json!({
                    "percentage_used": reply.percentage_used,
                    "temperature": reply.temperature,
                });
                Ok((reply.header, Some(data)))
            }
            Self::ListArray(request) => {
                let reply = client.list_array(request).await?.into_inner();
                let arrays: Vec<Value> = reply.arrays.iter().map(array_value).collect();
                Ok((reply.header, Some(json!({"arrays": arrays}))))
            }
            Self::ArrayInfo(request) => {
                let reply = client.array_info(request).await?.into_inner();
                let data = reply.array.as_ref().map(array_value);
                Ok((reply.header, data))
            }
            Self::ListVolume(request) => {
                let reply = client.list_volume(request).await?.into_inner();
                let volumes: Vec<Value> = reply.volumes.iter().map(volume_value).collect();
                Ok((
                    reply.header,
                    Some(json!({"array": reply.array, "volumes": volumes})),
                ))
            }
            Self::CreateVolume(request) => {
                let reply = client.create_volume(request).await?.into_inner();
                Ok((reply.header, None))
            }
            Self::MountVolume(request) => {
                let reply = client.mount_volume(request).await?.into_inner();
                Ok((reply.header, None))
            }
            Self::UnmountVolume(request) => {
                let reply = client.unmount_volume(request).await?.into_inner();
                Ok((reply.header, None))
            }
        }
    }
}

/// Folds a typed reply header and data payload into the generic response.
fn fold_reply(
    endpoint: &str,
    header: Option<v1::ResponseHeader>,
    data: Option<Value>,
) -> Result<Response, TransportError> {
    let header = header.ok_or_else(|| TransportError::MalformedReply {
        endpoint: endpoint.to_owned(),
    })?;
    let status = header.status.unwrap_or_default();
    Ok(Response {
        rid: header.rid,
        last_success_time: header.last_success_time,
        result: CommandResult {
            status: Status {
                module: status.module,
                code: status.code,
                level: none_if_empty(status.level),
                description: status.description,
                problem: none_if_empty(status.problem),
                solution: none_if_empty(status.solution),
            },
            data,
        },
        info: None,
    })
}

fn none_if_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

fn require(
    command: CommandKind,
    field: &'static str,
    value: Option<String>,
) -> Result<String, TransportError> {
    value.ok_or(TransportError::MissingParam { command, field })
}

fn device_param(envelope: &Envelope) -> DeviceParam {
    match &envelope.param {
        Some(CommandParam::Device(param)) => param.clone(),
        _ => DeviceParam::default(),
    }
}

fn array_param(envelope: &Envelope) -> ArrayParam {
    match &envelope.param {
        Some(CommandParam::Array(param)) => param.clone(),
        _ => ArrayParam::default(),
    }
}

fn volume_param(envelope: &Envelope) -> VolumeParam {
    match &envelope.param {
        Some(CommandParam::Volume(param)) => param.clone(),
        _ => VolumeParam::default(),
    }
}
