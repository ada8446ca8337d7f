//! Command-line runtime for the skerry storage management client.
//!
//! The runtime parses arguments, loads configuration with flag overrides,
//! and dispatches the command: node commands go through the configured
//! transport backend, cluster-management commands through the HA coordinator.
//! IO streams are injected so the whole path is exercisable from tests.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use skerry_config::ClientConfig;

mod cli;
mod cluster;
mod dispatch;
mod errors;
mod output;
mod telemetry;

use cli::{Cli, CliCommand};
use dispatch::Dispatcher;
use errors::AppError;
use output::render_outcome;

/// Runs the CLI and reports its exit code.
pub fn run<I, T, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
    E: Write,
{
    match try_run(args, stdout, stderr) {
        Ok(status) => ExitCode::from(status),
        Err(error) => {
            let status = error.exit_status();
            let _ = writeln!(stderr, "{error}");
            ExitCode::from(status)
        }
    }
}

fn try_run<I, T, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> Result<u8, AppError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error)
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            write!(stdout, "{error}")?;
            return Ok(0);
        }
        Err(error) => return Err(AppError::CliUsage(error)),
    };

    let config = effective_config(&cli)?;
    telemetry::initialise(&config)?;

    match &cli.command {
        CliCommand::Cluster { action } => {
            cluster::execute(action, &config, stdout)?;
            Ok(0)
        }
        CliCommand::System { action } => {
            let (kind, param) = dispatch::system_command(action);
            run_node_command(&cli, &config, kind, param, stdout, stderr)
        }
        CliCommand::Device { action } => {
            let (kind, param) = dispatch::device_command(action);
            run_node_command(&cli, &config, kind, param, stdout, stderr)
        }
        CliCommand::Array { action } => {
            let (kind, param) = dispatch::array_command(action);
            run_node_command(&cli, &config, kind, param, stdout, stderr)
        }
        CliCommand::Volume { action } => {
            let (kind, param) = dispatch::volume_command(action);
            run_node_command(&cli, &config, kind, param, stdout, stderr)
        }
    }
}

fn run_node_command<W, E>(
    cli: &Cli,
    config: &ClientConfig,
    kind: skerry_protocol::CommandKind,
    param: Option<skerry_protocol::CommandParam>,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<u8, AppError>
where
    W: Write,
    E: Write,
{
    let dispatcher = Dispatcher::from_config(config, cli.node.as_deref())?;
    let outcome = dispatcher.execute(kind, param)?;
    render_outcome(&outcome, stdout, stderr)?;
    Ok(outcome.exit_status())
}

/// Applies CLI flag overrides on top of the loaded configuration.
fn effective_config(cli: &Cli) -> Result<ClientConfig, AppError> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(transport) = cli.transport {
        config.transport = transport;
    }
    if let Some(socket) = &cli.socket {
        config.socket = socket.clone();
    }
    if let Some(rpc) = &cli.rpc {
        config.rpc = rpc.clone();
    }
    if let Some(filter) = &cli.log_filter {
        config.log_filter.clone_from(filter);
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}
