// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editor configuration, read from `schemadraft.toml` in the data directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::WriteDurability;

pub const CONFIG_FILENAME: &str = "schemadraft.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Quiet period before a burst of edits is written.
    /// Default: 300
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// fsync written files and their directory.
    /// Default: false
    #[serde(default)]
    pub durable_writes: bool,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            durable_writes: false,
        }
    }
}

impl PersistenceConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn durability(&self) -> WriteDurability {
        WriteDurability::from_flag(self.durable_writes)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed config {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl EditorConfig {
    /// Loads `<dir>/schemadraft.toml`. A missing file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILENAME);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        Self::parse(&contents).map_err(|source| ConfigError::Toml { path, source })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ConfigError, EditorConfig, CONFIG_FILENAME};
    use crate::store::WriteDurability;

    #[test]
    fn defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.persistence.debounce(), Duration::from_millis(300));
        assert_eq!(config.persistence.durability(), WriteDurability::BestEffort);
    }

    #[test]
    fn parses_partial_files() {
        let config = EditorConfig::parse("[persistence]\ndurable_writes = true\n").unwrap();
        assert!(config.persistence.durable_writes);
        assert_eq!(config.persistence.debounce_ms, 300);

        assert_eq!(EditorConfig::parse("").unwrap(), EditorConfig::default());
    }

    #[test]
    fn missing_file_is_default_and_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(EditorConfig::load(dir.path()).unwrap(), EditorConfig::default());

        std::fs::write(dir.path().join(CONFIG_FILENAME), "[persistence]\ndebounce_ms = \"soon\"\n")
            .unwrap();
        assert!(matches!(
            EditorConfig::load(dir.path()),
            Err(ConfigError::Toml { .. })
        ));
    }
}
