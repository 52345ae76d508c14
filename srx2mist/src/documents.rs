//! Stage documents.
//!
//! Each extraction and compilation stage is persisted as its own pretty-printed
//! JSON document so a run can be inspected, and so `push` can work from a
//! previous `ingest` without re-reading the device dump.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const RAW_APPLICATIONS: &str = "junos_apps.json";
pub const RAW_ADDRESSES: &str = "junos_adds.json";
pub const RAW_POLICIES: &str = "junos_policies.json";
pub const RAW_ZONES: &str = "junos_zones.json";
pub const RAW_INTERFACES: &str = "junos_interfaces.json";
pub const MIST_APPLICATIONS: &str = "mist_apps.json";
pub const MIST_NETWORKS: &str = "organized_nets.json";
pub const MIST_POLICIES: &str = "mist_policies.json";
pub const PROBLEMS: &str = "problem_cases_output.json";

/// Every document an ingest run writes, in write order.
pub const ALL_DOCUMENTS: &[&str] = &[
    RAW_APPLICATIONS,
    RAW_ADDRESSES,
    RAW_POLICIES,
    RAW_ZONES,
    RAW_INTERFACES,
    MIST_APPLICATIONS,
    MIST_NETWORKS,
    MIST_POLICIES,
    PROBLEMS,
];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to access document {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to encode or decode document {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Serialize `value` to `<dir>/<file>`, returning the written path.
pub fn write_document<T: Serialize + ?Sized>(
    dir: &Path,
    file: &str,
    value: &T,
) -> Result<PathBuf, DocumentError> {
    let path = dir.join(file);
    let mut json = serde_json::to_string_pretty(value).map_err(|source| DocumentError::Json {
        path: path.display().to_string(),
        source,
    })?;
    json.push('\n');
    fs::write(&path, json).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}

/// Load `<dir>/<file>`. A missing document is `Ok(None)`.
pub fn read_document<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
) -> Result<Option<T>, DocumentError> {
    let path = dir.join(file);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(DocumentError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| DocumentError::Json {
            path: path.display().to_string(),
            source,
        })
}
