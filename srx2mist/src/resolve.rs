//! Application resolution.
//!
//! Turns the symbolic application names used in policies into concrete
//! protocol/port specs. Names are looked up first in the predefined application
//! table (`JunosAppDefinitions.json`), then among the applications defined in
//! the dump itself. Anything left over is recorded in the problem ledger and
//! dropped from the result.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::{AppEntry, AppRecord, Applications};
use crate::ledger::{Problem, ProblemLedger};

/// One protocol/port pair of a Mist application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSpec {
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_range: Option<String>,
}

impl AppSpec {
    fn from_record(record: &AppRecord) -> Option<Self> {
        Some(Self {
            protocol: record.get("protocol")?.clone(),
            port_range: record.get("destination-port").cloned(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct Definition {
    protocol: String,
    #[serde(default, alias = "destination-port", alias = "port_range")]
    port: Option<String>,
}

/// Errors returned when loading the predefined application table.
#[derive(Debug, Error)]
pub enum DefinitionsError {
    #[error("failed to read application definitions {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse application definitions {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

/// Predefined applications keyed by name (`junos-ssh`, `junos-https`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppDefinitions {
    entries: IndexMap<String, AppSpec>,
}

impl AppDefinitions {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, DefinitionsError> {
        let raw = fs::read_to_string(path).map_err(|source| DefinitionsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw, path.display().to_string())
    }

    /// Load the table, falling back to an empty one with a warning. Every
    /// predefined name then falls through to local lookup.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(defs) => {
                tracing::info!(entries = defs.len(), "loaded application definitions from {}", path.display());
                defs
            }
            Err(err) => {
                tracing::warn!("{err}; predefined applications will be reported as unresolved");
                Self::empty()
            }
        }
    }

    fn from_json(raw: &str, path: String) -> Result<Self, DefinitionsError> {
        let parsed: IndexMap<String, Definition> =
            serde_json::from_str(raw).map_err(|source| DefinitionsError::Parse { path, source })?;
        let entries = parsed
            .into_iter()
            .map(|(name, def)| {
                let spec = AppSpec {
                    protocol: def.protocol,
                    port_range: def.port,
                };
                (name, spec)
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&AppSpec> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves application names against the predefined table and local definitions.
#[derive(Debug, Clone, Copy)]
pub struct AppResolver<'a> {
    definitions: &'a AppDefinitions,
}

impl<'a> AppResolver<'a> {
    pub fn new(definitions: &'a AppDefinitions) -> Self {
        Self { definitions }
    }

    /// Resolve `names` in order. Sets expand to one spec per member; unknown
    /// names are recorded and skipped. Single ports come back as `P-P`.
    pub fn resolve(
        &self,
        names: &[String],
        local: &Applications,
        ledger: &mut ProblemLedger,
    ) -> Vec<AppSpec> {
        let mut specs = Vec::new();
        for name in names {
            if let Some(spec) = self.definitions.get(name) {
                specs.push(spec.clone());
                continue;
            }
            match local.get(name) {
                Some(AppEntry::Single(record)) => match AppSpec::from_record(record) {
                    Some(spec) => specs.push(spec),
                    None => unresolved(name, ledger),
                },
                Some(AppEntry::Set(records)) => {
                    for record in records {
                        match AppSpec::from_record(record) {
                            Some(spec) => specs.push(spec),
                            None => unresolved(name, ledger),
                        }
                    }
                }
                None => unresolved(name, ledger),
            }
        }

        for spec in &mut specs {
            if let Some(port) = &spec.port_range {
                spec.port_range = Some(normalize_port_range(port));
            }
        }
        specs
    }
}

fn unresolved(name: &str, ledger: &mut ProblemLedger) {
    tracing::warn!("could not find application for {name}");
    ledger.record(Problem::Application {
        name: name.to_string(),
    });
}

/// Mist expects a single port as a degenerate range (`22` becomes `22-22`).
pub fn normalize_port_range(port: &str) -> String {
    if port.contains('-') {
        port.to_string()
    } else {
        format!("{port}-{port}")
    }
}
