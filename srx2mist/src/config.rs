//! Tool configuration.
//!
//! An optional TOML file supplies defaults for the lookup table path, the
//! document directory and the Mist connection. Command-line flags override it.
//!
//! ```toml
//! [lookup]
//! app_definitions = "JunosAppDefinitions.json"
//!
//! [output]
//! dir = "out"
//!
//! [mist]
//! host = "https://api.mist.com"
//! org_id = "203d3d02-0000-0000-0000-76896a3330f4"
//! token_env = "MIST_API_TOKEN"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_APP_DEFINITIONS: &str = "JunosAppDefinitions.json";
pub const DEFAULT_MIST_HOST: &str = "https://api.mist.com";
pub const DEFAULT_TOKEN_ENV: &str = "MIST_API_TOKEN";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub mist: MistConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    #[serde(default = "default_app_definitions")]
    pub app_definitions: PathBuf,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            app_definitions: default_app_definitions(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MistConfig {
    #[serde(default = "default_mist_host")]
    pub host: String,
    #[serde(default)]
    pub org_id: Option<String>,
    /// Environment variable that holds the API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for MistConfig {
    fn default() -> Self {
        Self {
            host: default_mist_host(),
            org_id: None,
            token_env: default_token_env(),
        }
    }
}

fn default_app_definitions() -> PathBuf {
    PathBuf::from(DEFAULT_APP_DEFINITIONS)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_mist_host() -> String {
    DEFAULT_MIST_HOST.to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

/// Errors returned when loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw, path.display().to_string())
    }

    /// Load `path` when given, otherwise use built-in defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn from_toml(raw: &str, path: String) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse { path, source })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::{Config, ConfigError, DEFAULT_MIST_HOST};

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = Config::from_toml("", "inline".to_string()).expect("parse");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.mist.host, DEFAULT_MIST_HOST);
        assert_eq!(cfg.mist.token_env, "MIST_API_TOKEN");
    }

    #[test]
    fn loads_partial_sections() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("srx2mist.toml");
        fs::write(
            &path,
            r#"
[output]
dir = "build"

[mist]
org_id = "org-1"
host = "https://api.eu.mist.com"
"#,
        )
        .expect("write config");

        let cfg = Config::load(&path).expect("config");
        assert_eq!(cfg.output.dir, PathBuf::from("build"));
        assert_eq!(cfg.mist.org_id.as_deref(), Some("org-1"));
        assert_eq!(cfg.mist.host, "https://api.eu.mist.com");
        assert_eq!(
            cfg.lookup.app_definitions,
            PathBuf::from("JunosAppDefinitions.json")
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = Config::from_toml("[mist]\napi_token = \"x\"\n", "inline".to_string())
            .expect_err("unknown key");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Config::load_optional(Some(&dir.path().join("nope.toml"))).expect_err("missing");
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(Config::load_optional(None).is_ok());
    }
}
