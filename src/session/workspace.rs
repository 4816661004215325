// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use tracing::info;

use super::{DiagramSession, SessionError};
use crate::config::EditorConfig;
use crate::discovery::SchemaDiscovery;
use crate::model::{DiagramId, Model};
use crate::store::{DiagramMeta, DiagramSummary, PersistScheduler, PersistenceGateway};

/// Entry point for the editor: owns the injected collaborators and the persistence worker
/// shared by every session it opens.
pub struct Workspace {
    gateway: Arc<dyn PersistenceGateway>,
    discovery: Arc<dyn SchemaDiscovery>,
    persister: PersistScheduler,
    config: EditorConfig,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("persister", &self.persister)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        discovery: Arc<dyn SchemaDiscovery>,
        config: EditorConfig,
    ) -> Result<Self, SessionError> {
        let persister = PersistScheduler::new(gateway.clone(), config.persistence.debounce())?;
        Ok(Self {
            gateway,
            discovery,
            persister,
            config,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn list_diagrams(&self) -> Result<Vec<DiagramSummary>, SessionError> {
        Ok(self.gateway.list()?)
    }

    /// Seeds a new diagram from the collections of `database` (or empty without one), stores it
    /// right away so it is listed, and opens it.
    pub fn create_diagram(
        &self,
        name: &str,
        database: Option<&str>,
    ) -> Result<DiagramSession, SessionError> {
        let namespaces = match database {
            Some(database) => self.discovery.collections(database)?,
            None => Vec::new(),
        };
        let model = Model::with_collections(namespaces);
        let meta = DiagramMeta::new(DiagramId::generate(), name, database.map(ToOwned::to_owned));

        self.gateway.create(&meta, &model)?;
        info!(
            diagram_id = %meta.diagram_id,
            name,
            collections = model.collections().len(),
            "created diagram"
        );

        Ok(DiagramSession::open(meta, model, self.persister.clone()))
    }

    pub fn open_diagram(&self, diagram_id: &DiagramId) -> Result<DiagramSession, SessionError> {
        let stored = self.gateway.load(diagram_id)?;
        Ok(DiagramSession::open(
            stored.meta,
            stored.model,
            self.persister.clone(),
        ))
    }

    /// Deletes a diagram. Pending saves for it are cancelled first so a late write cannot bring
    /// it back.
    pub fn delete_diagram(&self, diagram_id: &DiagramId) -> Result<(), SessionError> {
        let cancelled = self.persister.cancel_diagram(diagram_id);
        self.gateway.delete(diagram_id)?;
        info!(diagram_id = %diagram_id, cancelled, "deleted diagram");
        Ok(())
    }

    pub fn rename_diagram(
        &self,
        diagram_id: &DiagramId,
        name: &str,
    ) -> Result<DiagramMeta, SessionError> {
        let meta = self.gateway.rename(diagram_id, name)?;
        info!(diagram_id = %diagram_id, name, "renamed diagram");
        Ok(meta)
    }
}
