//! Loading and validation of the status taxonomy table.
//!
//! The taxonomy source is a YAML document listing modules, their code ranges,
//! and the entries inside each range. The source format cannot express the
//! disjointness the resolver relies on, so the loader validates it here and
//! refuses malformed tables instead of resolving against them.

use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

/// Taxonomy shipped with the client, shared with the node-side engine.
const BUILTIN_EVENTS: &str = include_str!("../resources/events.yaml");

static BUILTIN_CATALOG: OnceCell<EventCatalog> = OnceCell::new();

/// Immutable, validated status taxonomy table.
///
/// Built once from a YAML source and queried for the lifetime of the process;
/// no mutation after load.
#[derive(Debug)]
pub struct EventCatalog {
    modules: Vec<EventModule>,
}

/// One module of the taxonomy, owning the contiguous code range
/// `[id_start, id_end]`.
#[derive(Debug)]
pub struct EventModule {
    name: String,
    id_start: i32,
    id_end: i32,
    entries: Vec<EventEntry>,
}

/// A single code entry within a module.
#[derive(Debug)]
pub struct EventEntry {
    code: i32,
    level: Option<String>,
    message: String,
    problem: Option<String>,
    solution: Option<String>,
}

/// Errors raised while loading or validating a taxonomy source.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The YAML source could not be parsed into the expected shape.
    #[error("failed to parse event taxonomy: {0}")]
    Parse(String),
    /// A module declared an inverted range.
    #[error("module '{module}' has inverted range [{id_start}, {id_end}]")]
    InvertedRange {
        module: String,
        id_start: i32,
        id_end: i32,
    },
    /// Two modules claim overlapping code ranges.
    #[error("modules '{first}' and '{second}' have overlapping code ranges")]
    OverlappingRanges { first: String, second: String },
    /// An entry's code falls outside its module's declared range.
    #[error("code {code} lies outside module '{module}' range [{id_start}, {id_end}]")]
    CodeOutsideRange {
        module: String,
        code: i32,
        id_start: i32,
        id_end: i32,
    },
    /// The same code appears twice within one module.
    #[error("code {code} is declared twice in module '{module}'")]
    DuplicateCode { module: String, code: i32 },
}

#[derive(Debug, Deserialize)]
struct RawCatalog {
    modules: Vec<RawModule>,
}

#[derive(Debug, Deserialize)]
struct RawModule {
    name: String,
    #[serde(rename = "idStart")]
    id_start: i32,
    #[serde(rename = "idEnd")]
    id_end: i32,
    #[serde(default)]
    info: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    code: i32,
    #[serde(default)]
    level: Option<String>,
    message: String,
    #[serde(default)]
    problem: Option<String>,
    #[serde(default)]
    solution: Option<String>,
}

impl EventCatalog {
    /// Parses and validates a taxonomy from YAML text.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the source fails to parse, a module
    /// range is inverted or overlaps another module, or an entry's code falls
    /// outside (or is duplicated within) its module's range.
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog =
            serde_saphyr::from_str(source).map_err(|error| CatalogError::Parse(error.to_string()))?;

        let mut modules: Vec<EventModule> = raw
            .modules
            .into_iter()
            .map(EventModule::try_from)
            .collect::<Result<_, _>>()?;
        modules.sort_by_key(|module| module.id_start);

        for window in modules.windows(2) {
            if let [first, second] = window
                && second.id_start <= first.id_end
            {
                return Err(CatalogError::OverlappingRanges {
                    first: first.name.clone(),
                    second: second.name.clone(),
                });
            }
        }

        Ok(Self { modules })
    }

    /// Returns the taxonomy embedded in the binary, parsing it on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the embedded resource is malformed.
    /// Later calls after a successful load are infallible.
    pub fn builtin() -> Result<&'static Self, CatalogError> {
        BUILTIN_CATALOG.get_or_try_init(|| Self::from_yaml(BUILTIN_EVENTS))
    }

    /// Finds the module owning `code`, if any.
    pub(crate) fn module_for(&self, code: i32) -> Option<&EventModule> {
        self.modules.iter().find(|module| module.contains(code))
    }

    /// Number of modules in the table.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl EventModule {
    /// Module name as declared by the taxonomy source.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `code` falls inside this module's range.
    #[must_use]
    pub fn contains(&self, code: i32) -> bool {
        (self.id_start..=self.id_end).contains(&code)
    }

    /// Finds the entry declaring exactly `code`, if any.
    pub(crate) fn entry_for(&self, code: i32) -> Option<&EventEntry> {
        self.entries.iter().find(|entry| entry.code == code)
    }
}

impl EventEntry {
    pub(crate) fn code(&self) -> i32 {
        self.code
    }

    pub(crate) fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }

    pub(crate) fn solution(&self) -> Option<&str> {
        self.solution.as_deref()
    }
}

impl TryFrom<RawModule> for EventModule {
    type Error = CatalogError;

    fn try_from(raw: RawModule) -> Result<Self, Self::Error> {
        if raw.id_start > raw.id_end {
            return Err(CatalogError::InvertedRange {
                module: raw.name,
                id_start: raw.id_start,
                id_end: raw.id_end,
            });
        }

        let range = raw.id_start..=raw.id_end;
        let mut entries: Vec<EventEntry> = Vec::with_capacity(raw.info.len());
        for entry in raw.info {
            if !range.contains(&entry.code) {
                return Err(CatalogError::CodeOutsideRange {
                    module: raw.name.clone(),
                    code: entry.code,
                    id_start: raw.id_start,
                    id_end: raw.id_end,
                });
            }
            if entries.iter().any(|existing| existing.code == entry.code) {
                return Err(CatalogError::DuplicateCode {
                    module: raw.name.clone(),
                    code: entry.code,
                });
            }
            entries.push(EventEntry {
                code: entry.code,
                level: entry.level.filter(|text| !text.is_empty()),
                message: entry.message,
                problem: entry.problem.filter(|text| !text.is_empty()),
                solution: entry.solution.filter(|text| !text.is_empty()),
            });
        }

        Ok(Self {
            name: raw.name,
            id_start: raw.id_start,
            id_end: raw.id_end,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = EventCatalog::builtin().expect("builtin taxonomy must be valid");
        assert!(catalog.module_count() > 0);
    }

    #[test]
    fn rejects_overlapping_ranges() {
        let source = r#"
modules:
  - name: "A"
    idStart: 0
    idEnd: 100
    info: []
  - name: "B"
    idStart: 100
    idEnd: 200
    info: []
"#;
        let result = EventCatalog::from_yaml(source);
        assert!(matches!(
            result,
            Err(CatalogError::OverlappingRanges { .. })
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        let source = r#"
modules:
  - name: "A"
    idStart: 100
    idEnd: 0
    info: []
"#;
        let result = EventCatalog::from_yaml(source);
        assert!(matches!(result, Err(CatalogError::InvertedRange { .. })));
    }

    #[test]
    fn rejects_code_outside_module_range() {
        let source = r#"
modules:
  - name: "A"
    idStart: 0
    idEnd: 10
    info:
      - code: 42
        message: out of range
"#;
        let result = EventCatalog::from_yaml(source);
        assert!(matches!(result, Err(CatalogError::CodeOutsideRange { .. })));
    }

    #[test]
    fn rejects_duplicate_code() {
        let source = r#"
modules:
  - name: "A"
    idStart: 0
    idEnd: 10
    info:
      - code: 1
        message: first
      - code: 1
        message: second
"#;
        let result = EventCatalog::from_yaml(source);
        assert!(matches!(result, Err(CatalogError::DuplicateCode { .. })));
    }

    #[test]
    fn normalises_empty_problem_and_solution() {
        let source = r#"
modules:
  - name: "A"
    idStart: 0
    idEnd: 10
    info:
      - code: 1
        level: ""
        message: something
        problem: ""
        solution: ""
"#;
        let catalog = EventCatalog::from_yaml(source).expect("parse");
        let module = catalog.module_for(1).expect("module");
        let entry = module.entry_for(1).expect("entry");
        assert!(entry.level().is_none());
        assert!(entry.problem().is_none());
        assert!(entry.solution().is_none());
    }
}
