//! Resolution of numeric status codes into diagnostic records.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::EventCatalog;

/// Diagnostic record resolved from a status code.
///
/// Mirrors the status block a node embeds in its responses, enriched with the
/// owning module name and any operator guidance the taxonomy carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Name of the module owning the code's range.
    pub module: String,
    /// The resolved status code.
    pub code: i32,
    /// Severity label, when the taxonomy declares one.
    pub level: Option<String>,
    /// Human-readable description of the outcome.
    pub description: String,
    /// What went wrong, when the taxonomy elaborates.
    pub problem: Option<String>,
    /// Suggested operator action, when the taxonomy offers one.
    pub solution: Option<String>,
}

/// Errors raised while resolving a status code.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No module range contains the code, or the owning module declares no
    /// entry for it. Both cases are taxonomy gaps and are reported identically.
    #[error("status code {code} is not defined by the event taxonomy")]
    UnknownStatusCode { code: i32 },
}

impl EventCatalog {
    /// Resolves `code` to its diagnostic record.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownStatusCode`] when no module range
    /// contains the code or the owning module has no entry matching it.
    pub fn resolve(&self, code: i32) -> Result<Diagnostic, ResolveError> {
        let module = self
            .module_for(code)
            .ok_or(ResolveError::UnknownStatusCode { code })?;
        let entry = module
            .entry_for(code)
            .ok_or(ResolveError::UnknownStatusCode { code })?;

        Ok(Diagnostic {
            module: module.name().to_owned(),
            code: entry.code(),
            level: entry.level().map(str::to_owned),
            description: entry.message().to_owned(),
            problem: entry.problem().map(str::to_owned),
            solution: entry.solution().map(str::to_owned),
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const TAXONOMY: &str = r#"
modules:
  - name: "CORE"
    idStart: 0
    idEnd: 999
    info:
      - code: 0
        level: INFO
        message: Success
  - name: "HA"
    idStart: 11000
    idEnd: 11099
    info:
      - code: 11020
        level: ERROR
        message: connection error
        problem: the shared cluster store did not accept a connection
        solution: check the store endpoint, credentials, and database name
"#;

    fn catalog() -> EventCatalog {
        EventCatalog::from_yaml(TAXONOMY).expect("test taxonomy must parse")
    }

    #[test]
    fn resolves_code_inside_module_range() {
        let diagnostic = catalog().resolve(11020).expect("resolve");
        assert_eq!(diagnostic.module, "HA");
        assert_eq!(diagnostic.description, "connection error");
        assert_eq!(diagnostic.level.as_deref(), Some("ERROR"));
        assert!(diagnostic.problem.is_some());
        assert!(diagnostic.solution.is_some());
    }

    #[test]
    fn resolves_success_code() {
        let diagnostic = catalog().resolve(0).expect("resolve");
        assert_eq!(diagnostic.module, "CORE");
        assert_eq!(diagnostic.description, "Success");
    }

    #[rstest]
    #[case::no_owning_range(99999)]
    #[case::gap_inside_range(11021)]
    #[case::negative(-1)]
    fn unresolvable_codes_fail_identically(#[case] code: i32) {
        let result = catalog().resolve(code);
        assert_eq!(result, Err(ResolveError::UnknownStatusCode { code }));
    }

    #[test]
    fn builtin_taxonomy_covers_ha_scenarios() {
        let catalog = EventCatalog::builtin().expect("builtin");
        let diagnostic = catalog.resolve(11020).expect("resolve 11020");
        assert_eq!(diagnostic.module, "HA");
        assert_eq!(diagnostic.description, "connection error");
        assert!(catalog.resolve(99999).is_err());
    }
}
