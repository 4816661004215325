// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::gateway::{DiagramMeta, DiagramSummary, PersistenceGateway, StoreError, StoredDiagram};
use crate::model::{DiagramId, Model};

/// Process-local gateway. Nothing survives the process; useful for tests and throwaway editors.
///
/// [`MemoryStore::set_unavailable`] makes every call fail with [`StoreError::Unavailable`] until
/// it is switched back, which is how persistence failures are exercised.
#[derive(Debug, Default)]
pub struct MemoryStore {
    diagrams: Mutex<BTreeMap<DiagramId, StoredDiagram>>,
    unavailable: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of successful `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn contains(&self, diagram_id: &DiagramId) -> bool {
        self.diagrams().contains_key(diagram_id)
    }

    fn diagrams(&self) -> MutexGuard<'_, BTreeMap<DiagramId, StoredDiagram>> {
        self.diagrams.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: "memory store switched off".to_owned(),
            });
        }
        Ok(())
    }
}

fn not_found(diagram_id: &DiagramId) -> StoreError {
    StoreError::NotFound {
        diagram_id: diagram_id.clone(),
    }
}

impl PersistenceGateway for MemoryStore {
    fn load(&self, diagram_id: &DiagramId) -> Result<StoredDiagram, StoreError> {
        self.check_available()?;
        self.diagrams()
            .get(diagram_id)
            .cloned()
            .ok_or_else(|| not_found(diagram_id))
    }

    fn save(&self, diagram_id: &DiagramId, model: &Model) -> Result<(), StoreError> {
        self.check_available()?;
        let mut diagrams = self.diagrams();
        let stored = diagrams.get_mut(diagram_id).ok_or_else(|| not_found(diagram_id))?;
        stored.model = model.clone();
        stored.meta.touch();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn create(&self, meta: &DiagramMeta, model: &Model) -> Result<(), StoreError> {
        self.check_available()?;
        let mut diagrams = self.diagrams();
        if diagrams.contains_key(&meta.diagram_id) {
            return Err(StoreError::AlreadyExists {
                diagram_id: meta.diagram_id.clone(),
            });
        }
        diagrams.insert(
            meta.diagram_id.clone(),
            StoredDiagram {
                meta: meta.clone(),
                model: model.clone(),
            },
        );
        Ok(())
    }

    fn rename(&self, diagram_id: &DiagramId, name: &str) -> Result<DiagramMeta, StoreError> {
        self.check_available()?;
        let mut diagrams = self.diagrams();
        let stored = diagrams.get_mut(diagram_id).ok_or_else(|| not_found(diagram_id))?;
        name.clone_into(&mut stored.meta.name);
        stored.meta.touch();
        Ok(stored.meta.clone())
    }

    fn delete(&self, diagram_id: &DiagramId) -> Result<(), StoreError> {
        self.check_available()?;
        self.diagrams()
            .remove(diagram_id)
            .map(|_| ())
            .ok_or_else(|| not_found(diagram_id))
    }

    fn list(&self) -> Result<Vec<DiagramSummary>, StoreError> {
        self.check_available()?;
        let mut summaries = self
            .diagrams()
            .values()
            .map(|stored| stored.meta.summary())
            .collect::<Vec<_>>();
        summaries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.diagram_id.cmp(&b.diagram_id)));
        Ok(summaries)
    }
}
