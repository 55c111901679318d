// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! CLI configuration (JSON file, every field optional).

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sns_core::codec::MAX_STRING_LEN;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name looked up under the platform config directory.
const CONFIG_FILE: &str = "sns.json";

/// Settings read from `--config` or `<config dir>/sns.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Longest string accepted when reading binary records.
    pub max_string_len: usize,
    /// Treat binary records as prefixed with a node-type tag byte.
    pub tagged: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: "warn".into(),
            max_string_len: MAX_STRING_LEN,
            tagged: false,
        }
    }
}

impl CliConfig {
    /// Load from `explicit` if given (it must exist), otherwise from the
    /// platform config dir if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) => match fs::read(&path) {
                Ok(bytes) => Self::from_slice(&bytes, &path),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
                Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
            },
            None => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_slice(&bytes, path)
    }

    fn from_slice(bytes: &[u8], path: &Path) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes).with_context(|| format!("parsing {}", path.display()))
    }
}

fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "flyingrobots", "sns").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: CliConfig = serde_json::from_str(r#"{ "tagged": true }"#).unwrap();
        assert!(cfg.tagged);
        assert_eq!(cfg.max_string_len, MAX_STRING_LEN);
        assert_eq!(cfg.log_filter, "warn");
    }

    #[test]
    fn explicit_file_is_required() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CliConfig::load(Some(&dir.path().join("absent.json"))).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sns.json");
        fs::write(&path, r#"{ "max_string_len": 8 }"#).unwrap();
        let cfg = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.max_string_len, 8);
        assert!(!cfg.tagged);
    }
}
