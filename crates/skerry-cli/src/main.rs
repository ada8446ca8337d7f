//! CLI entrypoint for the skerry storage management client.
//!
//! The binary delegates to [`skerry_cli::run`], which parses arguments, loads
//! configuration, and dispatches the command over the configured transport or
//! through the HA coordinator.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    skerry_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
