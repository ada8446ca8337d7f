//! Response shape answered by storage nodes.
//!
//! Responses are transport-independent: the socket backend parses them from a
//! JSON line, the RPC backend folds typed reply messages into the same shape.

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;

/// Response to one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Correlation id echoed from the request.
    pub rid: String,
    /// Node-side timestamp (seconds) of the last successful command.
    #[serde(rename = "lastSuccessTime", default)]
    pub last_success_time: i64,
    /// Outcome of the command.
    pub result: CommandResult,
    /// Free-form node information (version and the like).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
}

/// Status and optional payload for one command outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Numeric outcome and its node-rendered description.
    pub status: Status,
    /// Command-specific payload, absent on failures and bare acks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Status block embedded in a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Name of the module that produced the code, when the node supplies it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub module: String,
    /// Numeric outcome code; zero means success.
    pub code: i32,
    /// Severity label, when the node supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Node-rendered description of the outcome.
    #[serde(default)]
    pub description: String,
    /// Elaboration on the failure, when the node supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    /// Suggested remedy, when the node supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

impl Response {
    /// Numeric outcome code of the response.
    #[must_use]
    pub fn status_code(&self) -> i32 {
        self.result.status.code
    }

    /// Whether the node reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code() == 0
    }

    /// Whether this response answers `envelope`.
    ///
    /// A response whose correlation id differs from the request's is a
    /// protocol violation; transports check this before handing the response
    /// to callers.
    #[must_use]
    pub fn answers(&self, envelope: &Envelope) -> bool {
        self.rid == envelope.rid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE_LINE: &str = r#"{
        "rid": "0190a0b2-55aa-7bbb-8000-0123456789ab",
        "lastSuccessTime": 1723000000,
        "result": {
            "status": {"module": "VOLUME", "code": 2010, "level": "ERROR",
                       "description": "volume name not found"}
        },
        "info": {"version": "v0.1.0"}
    }"#;

    #[test]
    fn deserialises_node_response() {
        let response: Response = serde_json::from_str(RESPONSE_LINE).expect("parse");
        assert_eq!(response.status_code(), 2010);
        assert!(!response.is_success());
        assert_eq!(response.last_success_time, 1_723_000_000);
        assert_eq!(response.result.status.description, "volume name not found");
        assert!(response.result.data.is_none());
    }

    #[test]
    fn missing_last_success_time_defaults_to_zero() {
        let line = r#"{"rid": "r-1", "result": {"status": {"code": 0}}}"#;
        let response: Response = serde_json::from_str(line).expect("parse");
        assert!(response.is_success());
        assert_eq!(response.last_success_time, 0);
    }

    #[test]
    fn answers_matches_on_correlation_id() {
        use crate::command::CommandKind;

        let envelope = Envelope::build(CommandKind::SystemInfo, "cli", None).expect("build");
        let mut response: Response =
            serde_json::from_str(r#"{"rid": "x", "result": {"status": {"code": 0}}}"#)
                .expect("parse");
        assert!(!response.answers(&envelope));
        response.rid.clone_from(&envelope.rid);
        assert!(response.answers(&envelope));
    }
}
