// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::io;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::format::ParseError;
use crate::model::{DiagramId, IdError, Model};

/// Durable home of named diagrams.
///
/// Implementations are shared between the editor thread and the persistence worker, so every
/// method takes `&self`. A `save` for an id that no longer exists must fail with
/// [`StoreError::NotFound`] rather than recreate the diagram.
pub trait PersistenceGateway: Send + Sync {
    fn load(&self, diagram_id: &DiagramId) -> Result<StoredDiagram, StoreError>;

    fn save(&self, diagram_id: &DiagramId, model: &Model) -> Result<(), StoreError>;

    fn create(&self, meta: &DiagramMeta, model: &Model) -> Result<(), StoreError>;

    fn rename(&self, diagram_id: &DiagramId, name: &str) -> Result<DiagramMeta, StoreError>;

    fn delete(&self, diagram_id: &DiagramId) -> Result<(), StoreError>;

    /// Summaries sorted by name, then id.
    fn list(&self) -> Result<Vec<DiagramSummary>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramMeta {
    pub diagram_id: DiagramId,
    pub name: String,
    /// Database the diagram was seeded from, if any.
    pub database: Option<String>,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl DiagramMeta {
    pub fn new(diagram_id: DiagramId, name: impl Into<String>, database: Option<String>) -> Self {
        let now = now_ms();
        Self {
            diagram_id,
            name: name.into(),
            database,
            created_at_ms: now,
            updated_at_ms: now,
        }
    }

    pub fn summary(&self) -> DiagramSummary {
        DiagramSummary {
            diagram_id: self.diagram_id.clone(),
            name: self.name.clone(),
        }
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at_ms = now_ms().max(self.updated_at_ms);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiagramSummary {
    pub diagram_id: DiagramId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDiagram {
    pub meta: DiagramMeta,
    pub model: Model,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error at {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("json error at {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("diagram {diagram_id} not found")]
    NotFound { diagram_id: DiagramId },
    #[error("diagram {diagram_id} already exists")]
    AlreadyExists { diagram_id: DiagramId },
    #[error("invalid id for {field}: {value:?}: {source}")]
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    #[error("invalid diagram document at {path:?}: {source}")]
    InvalidDocument { path: PathBuf, source: ParseError },
    #[error("diagram file {path:?} belongs to {found}, expected {expected}")]
    IdMismatch {
        path: PathBuf,
        expected: DiagramId,
        found: DiagramId,
    },
    #[error("refusing to write through symlink at {path:?}")]
    SymlinkRefused { path: PathBuf },
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
    #[error("cannot start persistence worker: {source}")]
    Worker { source: io::Error },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}
