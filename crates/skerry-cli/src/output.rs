//! Output rendering for command responses and diagnostics.
//!
//! Responses are emitted as pretty JSON on stdout; resolved diagnostics for
//! failed commands go to stderr so scripted callers can still consume the
//! payload.

use std::io::Write;

use serde::Serialize;

use crate::dispatch::CommandOutcome;
use crate::errors::AppError;

/// Writes a value as pretty JSON followed by a newline.
pub(crate) fn render_json<W: Write, T: Serialize>(
    stdout: &mut W,
    value: &T,
) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(stdout, "{text}")?;
    Ok(())
}

/// Writes a command outcome: the response payload, then any diagnostic.
pub(crate) fn render_outcome<W: Write, E: Write>(
    outcome: &CommandOutcome,
    stdout: &mut W,
    stderr: &mut E,
) -> Result<(), AppError> {
    render_json(stdout, &outcome.response)?;

    if let Some(diagnostic) = &outcome.diagnostic {
        let level = diagnostic.level.as_deref().unwrap_or("ERROR");
        writeln!(
            stderr,
            "command failed: [{module}/{level}] {description} (code {code})",
            module = diagnostic.module,
            description = diagnostic.description,
            code = diagnostic.code,
        )?;
        if let Some(problem) = &diagnostic.problem {
            writeln!(stderr, "  problem: {problem}")?;
        }
        if let Some(solution) = &diagnostic.solution {
            writeln!(stderr, "  solution: {solution}")?;
        }
    } else if let Some(unresolved) = &outcome.unresolved {
        writeln!(
            stderr,
            "command failed with status {code}: {unresolved}",
            code = outcome.response.status_code(),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use skerry_events::EventCatalog;
    use skerry_protocol::{CommandResult, Response, Status};

    use super::*;

    fn failed_response(code: i32) -> Response {
        Response {
            rid: "r-1".to_owned(),
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

    #[test]
    fn renders_diagnostic_with_guidance() {
        let catalog = EventCatalog::builtin().expect("builtin");
        let outcome = CommandOutcome {
            response: failed_response(11020),
            diagnostic: Some(catalog.resolve(11020).expect("resolve")),
            unresolved: None,
        };
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        render_outcome(&outcome, &mut stdout, &mut stderr).expect("render");

        let out = String::from_utf8(stdout).expect("utf8");
        assert!(out.contains(r#""rid": "r-1""#));
        let err = String::from_utf8(stderr).expect("utf8");
        assert!(err.contains("[HA/ERROR] connection error (code 11020)"));
        assert!(err.contains("solution: check the store endpoint"));
    }

    #[test]
    fn renders_raw_code_when_unresolvable() {
        let outcome = CommandOutcome {
            response: failed_response(99999),
            diagnostic: None,
            unresolved: Some(skerry_events::ResolveError::UnknownStatusCode { code: 99999 }),
        };
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        render_outcome(&outcome, &mut stdout, &mut stderr).expect("render");

        let err = String::from_utf8(stderr).expect("utf8");
        assert!(err.contains("status 99999"));
        assert!(err.contains("not defined by the event taxonomy"));
    }
}
