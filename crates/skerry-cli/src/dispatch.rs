//! Command dispatch: transport selection, envelope construction, and
//! outcome resolution.
//!
//! The dispatcher owns the chosen transport backend for the lifetime of one
//! invocation. Node commands flow through it; cluster-management commands
//! bypass it entirely and talk to the HA coordinator instead.

use tracing::debug;

use skerry_config::{ClientConfig, Endpoint, TransportKind};
use skerry_events::{Diagnostic, EventCatalog, ResolveError};
use skerry_ha::HaCoordinator;
use skerry_protocol::{
    ArrayParam, CommandKind, CommandParam, DeviceParam, Envelope, Response, VolumeParam,
};
use skerry_transport::{RpcTransport, SocketTransport, Transport};

use crate::cli::{ArrayAction, DeviceAction, SystemAction, VolumeAction};
use crate::errors::AppError;

/// Tracing target for dispatch operations.
const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Requestor identity stamped into every envelope this client builds.
pub(crate) const DEFAULT_REQUESTOR: &str = "cli";

/// Dispatches node commands over the selected transport.
pub(crate) struct Dispatcher {
    transport: Box<dyn Transport>,
    requestor: String,
}

impl Dispatcher {
    /// Builds a dispatcher for the configured transport.
    ///
    /// When `node` names a cluster member, its RPC address is resolved
    /// through the shared store and the RPC backend is used regardless of the
    /// configured transport kind.
    pub(crate) fn from_config(config: &ClientConfig, node: Option<&str>) -> Result<Self, AppError> {
        let transport = build_transport(config, node)?;
        Ok(Self::with_transport(transport))
    }

    /// Builds a dispatcher over an explicit transport.
    pub(crate) fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            requestor: DEFAULT_REQUESTOR.to_owned(),
        }
    }

    /// Executes one node command and resolves its outcome.
    pub(crate) fn execute(
        &self,
        command: CommandKind,
        param: Option<CommandParam>,
    ) -> Result<CommandOutcome, AppError> {
        let envelope = Envelope::build(command, self.requestor.clone(), param)?;
        debug!(target: DISPATCH_TARGET, command = %command, rid = %envelope.rid, "dispatching");
        let response = self.transport.send(&envelope)?;
        CommandOutcome::from_response(response)
    }
}

fn build_transport(
    config: &ClientConfig,
    node: Option<&str>,
) -> Result<Box<dyn Transport>, AppError> {
    if let Some(name) = node {
        let coordinator = HaCoordinator::from_settings(&config.store)?;
        let address = coordinator.resolve_node_address(name)?;
        let endpoint: Endpoint = address.parse()?;
        debug!(target: DISPATCH_TARGET, node = name, endpoint = %endpoint, "resolved node address");
        return Ok(Box::new(RpcTransport::new(endpoint)?));
    }

    Ok(match config.transport {
        TransportKind::Socket => Box::new(SocketTransport::new(config.socket.clone())),
        TransportKind::Rpc => Box::new(RpcTransport::new(config.rpc.clone())?),
    })
}

/// A delivered response together with its resolved diagnostic.
pub(crate) struct CommandOutcome {
    /// The response as the node sent it.
    pub(crate) response: Response,
    /// Taxonomy diagnostic for a non-zero status code.
    pub(crate) diagnostic: Option<Diagnostic>,
    /// Set when the non-zero code has no taxonomy entry; the raw code stays
    /// visible through `response`.
    pub(crate) unresolved: Option<ResolveError>,
}

impl CommandOutcome {
    fn from_response(response: Response) -> Result<Self, AppError> {
        if response.is_success() {
            return Ok(Self {
                response,
                diagnostic: None,
                unresolved: None,
            });
        }
        let catalog = EventCatalog::builtin()?;
        match catalog.resolve(response.status_code()) {
            Ok(diagnostic) => Ok(Self {
                response,
                diagnostic: Some(diagnostic),
                unresolved: None,
            }),
            Err(error) => Ok(Self {
                response,
                diagnostic: None,
                unresolved: Some(error),
            }),
        }
    }

    /// Exit status for this outcome.
    pub(crate) fn exit_status(&self) -> u8 {
        u8::from(!self.response.is_success())
    }
}

/// Maps a system action onto its command envelope parts.
pub(crate) fn system_command(action: &SystemAction) -> (CommandKind, Option<CommandParam>) {
    match action {
        SystemAction::Info => (CommandKind::SystemInfo, None),
        SystemAction::Stop => (CommandKind::StopSystem, None),
    }
}

/// Maps a device action onto its command envelope parts.
pub(crate) fn device_command(action: &DeviceAction) -> (CommandKind, Option<CommandParam>) {
    match action {
        DeviceAction::Scan => (CommandKind::ScanDevice, None),
        DeviceAction::List => (CommandKind::ListDevice, None),
        DeviceAction::Smart { name } => (
            CommandKind::SmartLog,
            Some(CommandParam::Device(DeviceParam {
                name: Some(name.clone()),
            })),
        ),
    }
}

/// Maps an array action onto its command envelope parts.
pub(crate) fn array_command(action: &ArrayAction) -> (CommandKind, Option<CommandParam>) {
    match action {
        ArrayAction::List => (CommandKind::ListArray, None),
        ArrayAction::Info { name } => (
            CommandKind::ArrayInfo,
            Some(CommandParam::Array(ArrayParam {
                name: Some(name.clone()),
            })),
        ),
    }
}

/// Maps a volume action onto its command envelope parts.
pub(crate) fn volume_command(action: &VolumeAction) -> (CommandKind, Option<CommandParam>) {
    match action {
        VolumeAction::List { array } => (
            CommandKind::ListVolume,
            Some(CommandParam::Volume(VolumeParam {
                array: array.clone(),
                ..VolumeParam::default()
            })),
        ),
        VolumeAction::Create {
            name,
            array,
            size,
            maxiops,
            maxbw,
            subnqn,
        } => (
            CommandKind::CreateVolume,
            Some(CommandParam::Volume(VolumeParam {
                name: Some(name.clone()),
                array: array.clone(),
                size: Some(*size),
                maxiops: *maxiops,
                maxbw: *maxbw,
                subnqn: subnqn.clone(),
            })),
        ),
        VolumeAction::Mount {
            name,
            array,
            subnqn,
        } => (
            CommandKind::MountVolume,
            Some(CommandParam::Volume(VolumeParam {
                name: Some(name.clone()),
                array: array.clone(),
                subnqn: subnqn.clone(),
                ..VolumeParam::default()
            })),
        ),
        VolumeAction::Unmount { name, array } => (
            CommandKind::UnmountVolume,
            Some(CommandParam::Volume(VolumeParam {
                name: Some(name.clone()),
                array: array.clone(),
                ..VolumeParam::default()
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use skerry_protocol::{CommandResult, Status};
    use skerry_transport::TransportError;

    use super::*;

    mockall::mock! {
        NodeTransport {}

        impl Transport for NodeTransport {
            fn send(&self, envelope: &Envelope) -> Result<Response, TransportError>;
        }
    }

    fn response_with(rid: String, code: i32) -> Response {
        Response {
            rid,
            last_success_time: 0,
            result: CommandResult {
                status: Status {
                    code,
                    ..Status::default()
                },
                data: None,
            },
            info: None,
        }
    }

    fn dispatcher_answering(code: i32) -> Dispatcher {
        let mut transport = MockNodeTransport::new();
        transport
            .expect_send()
            .returning(move |envelope| Ok(response_with(envelope.rid.clone(), code)));
        Dispatcher::with_transport(Box::new(transport))
    }

    #[test]
    fn success_needs_no_diagnostic() {
        let outcome = dispatcher_answering(0)
            .execute(CommandKind::SystemInfo, None)
            .expect("execute");
        assert_eq!(outcome.exit_status(), 0);
        assert!(outcome.diagnostic.is_none());
        assert!(outcome.unresolved.is_none());
    }

    #[test]
    fn known_failure_code_resolves_to_a_diagnostic() {
        let outcome = dispatcher_answering(2010)
            .execute(CommandKind::ListVolume, None)
            .expect("execute");
        assert_eq!(outcome.exit_status(), 1);
        let diagnostic = outcome.diagnostic.expect("diagnostic");
        assert_eq!(diagnostic.module, "VOLUME");
        assert_eq!(diagnostic.description, "volume name not found");
    }

    #[test]
    fn unknown_failure_code_keeps_the_raw_code_visible() {
        let outcome = dispatcher_answering(999)
            .execute(CommandKind::SystemInfo, None)
            .expect("execute");
        assert_eq!(outcome.exit_status(), 1);
        assert!(outcome.diagnostic.is_none());
        assert_eq!(
            outcome.unresolved,
            Some(ResolveError::UnknownStatusCode { code: 999 })
        );
        assert_eq!(outcome.response.status_code(), 999);
    }

    #[test]
    fn transport_failures_propagate() {
        let mut transport = MockNodeTransport::new();
        transport.expect_send().returning(|envelope| {
            Err(TransportError::MissingParam {
                command: envelope.command,
                field: "name",
            })
        });
        let dispatcher = Dispatcher::with_transport(Box::new(transport));
        let result = dispatcher.execute(CommandKind::SmartLog, None);
        assert!(matches!(result, Err(AppError::Transport(_))));
    }

    #[test]
    fn volume_create_maps_to_a_typed_param() {
        let action = VolumeAction::Create {
            name: "vol01".to_owned(),
            array: Some("array0".to_owned()),
            size: 4_194_304,
            maxiops: None,
            maxbw: None,
            subnqn: None,
        };
        let (kind, param) = volume_command(&action);
        assert_eq!(kind, CommandKind::CreateVolume);
        let Some(CommandParam::Volume(param)) = param else {
            panic!("expected a volume block");
        };
        assert_eq!(param.name.as_deref(), Some("vol01"));
        assert_eq!(param.size, Some(4_194_304));
    }

    #[test]
    fn smart_requires_its_device_name() {
        let action = DeviceAction::Smart {
            name: "nvme0".to_owned(),
        };
        let (kind, param) = device_command(&action);
        assert_eq!(kind, CommandKind::SmartLog);
        assert!(matches!(param, Some(CommandParam::Device(_))));
    }
}
