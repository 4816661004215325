// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::gateway::{DiagramMeta, DiagramSummary, PersistenceGateway, StoreError, StoredDiagram};
use crate::format::json::{model_from_json, model_to_json, ModelJson};
use crate::model::{DiagramId, Model};

const DIAGRAM_FILE_SUFFIX: &str = ".diagram.json";
const TEMP_FILE_PREFIX: &str = ".schemadraft.tmp.";

/// A directory of diagram files, one `<diagram-id>.diagram.json` per diagram.
///
/// Every write goes through a temp file and an atomic rename, so readers never see a torn file.
#[derive(Debug)]
pub struct DiagramFolder {
    root: PathBuf,
    durability: WriteDurability,
    // Serializes read-modify-write cycles (save/rename) against each other.
    write_lock: Mutex<()>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable storage where
    /// possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

impl WriteDurability {
    pub fn from_flag(durable: bool) -> Self {
        if durable {
            Self::Durable
        } else {
            Self::BestEffort
        }
    }
}

impl DiagramFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn diagram_path(&self, diagram_id: &DiagramId) -> PathBuf {
        self.root.join(format!(
            "{}{DIAGRAM_FILE_SUFFIX}",
            encode_persisted_id_segment(diagram_id.as_str())
        ))
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_file(&self, diagram_id: &DiagramId) -> Result<StoredDiagram, StoreError> {
        let path = self.diagram_path(diagram_id);
        let contents = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    diagram_id: diagram_id.clone(),
                }
            } else {
                StoreError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        let stored = read_diagram_file(&path, &contents)?;
        if stored.meta.diagram_id != *diagram_id {
            return Err(StoreError::IdMismatch {
                path,
                expected: diagram_id.clone(),
                found: stored.meta.diagram_id,
            });
        }
        Ok(stored)
    }

    fn write_file(&self, stored: &StoredDiagram) -> Result<(), StoreError> {
        let path = self.diagram_path(&stored.meta.diagram_id);
        let file_json = diagram_file_to_json(stored);
        let text =
            serde_json::to_string_pretty(&file_json).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;

        write_atomic(&self.root, &path, format!("{text}\n").as_bytes(), self.durability)
    }
}

impl PersistenceGateway for DiagramFolder {
    fn load(&self, diagram_id: &DiagramId) -> Result<StoredDiagram, StoreError> {
        self.read_file(diagram_id)
    }

    fn save(&self, diagram_id: &DiagramId, model: &Model) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        let mut stored = self.read_file(diagram_id)?;
        stored.model = model.clone();
        stored.meta.touch();
        self.write_file(&stored)?;
        debug!(diagram_id = %diagram_id, collections = model.collections().len(), "saved diagram");
        Ok(())
    }

    fn create(&self, meta: &DiagramMeta, model: &Model) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        let path = self.diagram_path(&meta.diagram_id);
        match fs::symlink_metadata(&path) {
            Ok(_) => {
                return Err(StoreError::AlreadyExists {
                    diagram_id: meta.diagram_id.clone(),
                })
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(StoreError::Io { path, source }),
        }
        self.write_file(&StoredDiagram {
            meta: meta.clone(),
            model: model.clone(),
        })
    }

    fn rename(&self, diagram_id: &DiagramId, name: &str) -> Result<DiagramMeta, StoreError> {
        let _guard = self.lock_writes();
        let mut stored = self.read_file(diagram_id)?;
        name.clone_into(&mut stored.meta.name);
        stored.meta.touch();
        self.write_file(&stored)?;
        Ok(stored.meta)
    }

    fn delete(&self, diagram_id: &DiagramId) -> Result<(), StoreError> {
        let _guard = self.lock_writes();
        let path = self.diagram_path(diagram_id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound {
                diagram_id: diagram_id.clone(),
            }),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn list(&self) -> Result<Vec<DiagramSummary>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut summaries = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.root.clone(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if !file_name.ends_with(DIAGRAM_FILE_SUFFIX) || file_name.starts_with(TEMP_FILE_PREFIX)
            {
                continue;
            }

            let path = entry.path();
            let loaded = fs::read_to_string(&path)
                .map_err(|source| StoreError::Io {
                    path: path.clone(),
                    source,
                })
                .and_then(|contents| read_diagram_file(&path, &contents));
            match loaded {
                Ok(stored) if self.diagram_path(&stored.meta.diagram_id) != path => warn!(
                    path = %path.display(),
                    diagram_id = %stored.meta.diagram_id,
                    "skipping diagram file stored under another id"
                ),
                Ok(stored) => summaries.push(stored.meta.summary()),
                Err(err) => warn!(path = %path.display(), error = %err, "skipping unreadable diagram file"),
            }
        }

        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.diagram_id.cmp(&b.diagram_id)));
        Ok(summaries)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DiagramFileJson {
    diagram_id: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database: Option<String>,
    #[serde(default)]
    created_at_ms: u64,
    #[serde(default)]
    updated_at_ms: u64,
    #[serde(default)]
    model: ModelJson,
}

// Extracted file-format and atomic-write helpers for `DiagramFolder`.
include!("diagram_folder/helpers.rs");
