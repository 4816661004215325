// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Editing sessions.
//!
//! A [`DiagramSession`] owns the undo/redo history of one open diagram. Every successful
//! apply/undo/redo schedules a debounced save of the new current model and then notifies
//! subscribers synchronously. Persistence failures never roll back what the user sees; they show
//! up in [`DiagramSession::persist_status`].

pub mod workspace;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::discovery::DiscoveryError;
use crate::format::{parse_edit, ParseError};
use crate::history::{Boundary, History};
use crate::model::{DiagramId, Model};
use crate::ops::{Edit, EditError};
use crate::store::{DiagramMeta, PersistScheduler, PersistStatus, SlotId, StoreError};

pub use workspace::Workspace;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Edit(#[from] EditError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCause {
    Edit,
    Undo,
    Redo,
}

/// What subscribers receive after every successful apply/undo/redo.
#[derive(Debug, Clone)]
pub struct ModelChange {
    pub model: Arc<Model>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub cause: ChangeCause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&ModelChange) + Send>;

pub struct DiagramSession {
    meta: DiagramMeta,
    history: History,
    persister: PersistScheduler,
    slot: SlotId,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for DiagramSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagramSession")
            .field("meta", &self.meta)
            .field("history_len", &self.history.len())
            .field("cursor", &self.history.cursor())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl DiagramSession {
    pub(crate) fn open(meta: DiagramMeta, model: Model, persister: PersistScheduler) -> Self {
        let slot = persister.register_slot(meta.diagram_id.clone());
        info!(
            diagram_id = %meta.diagram_id,
            name = %meta.name,
            collections = model.collections().len(),
            "opened diagram session"
        );
        Self {
            meta,
            history: History::new(model),
            persister,
            slot,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn diagram_id(&self) -> &DiagramId {
        &self.meta.diagram_id
    }

    pub fn meta(&self) -> &DiagramMeta {
        &self.meta
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_model(&self) -> Arc<Model> {
        Arc::clone(self.history.current())
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Validates and applies `edit`. On error nothing changes and nothing is published.
    pub fn apply_edit(&mut self, edit: &Edit) -> Result<Arc<Model>, EditError> {
        let model = match self.history.apply(edit) {
            Ok(model) => Arc::clone(model),
            Err(err) => {
                debug!(diagram_id = %self.meta.diagram_id, kind = %edit.kind(), error = %err, "edit rejected");
                return Err(err);
            }
        };
        let delta = self.history.current_entry().delta();
        debug!(
            diagram_id = %self.meta.diagram_id,
            kind = %edit.kind(),
            added = delta.added.len(),
            removed = delta.removed.len(),
            updated = delta.updated.len(),
            cursor = self.history.cursor(),
            "applied edit"
        );
        self.commit(ChangeCause::Edit);
        Ok(model)
    }

    /// Parses one JSON edit document and applies it. Malformed input never reaches the history.
    ///
    /// A well-formed `SetModel` whose model breaks an invariant fails with
    /// [`SessionError::Edit`], like any other rejected edit.
    pub fn apply_document(&mut self, text: &str) -> Result<Arc<Model>, SessionError> {
        let edit = match parse_edit(text) {
            Ok(edit) => edit,
            Err(ParseError::InvalidModel(err)) => {
                debug!(diagram_id = %self.meta.diagram_id, error = %err, "edit rejected");
                return Err(SessionError::Edit(err));
            }
            Err(err) => return Err(err.into()),
        };
        Ok(self.apply_edit(&edit)?)
    }

    pub fn undo(&mut self) -> Result<Arc<Model>, Boundary> {
        let model = Arc::clone(self.history.undo()?);
        debug!(diagram_id = %self.meta.diagram_id, cursor = self.history.cursor(), "undo");
        self.commit(ChangeCause::Undo);
        Ok(model)
    }

    pub fn redo(&mut self) -> Result<Arc<Model>, Boundary> {
        let model = Arc::clone(self.history.redo()?);
        debug!(diagram_id = %self.meta.diagram_id, cursor = self.history.cursor(), "redo");
        self.commit(ChangeCause::Redo);
        Ok(model)
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&ModelChange) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(candidate, _)| *candidate != id);
        self.observers.len() != before
    }

    pub fn persist_status(&self) -> PersistStatus {
        self.persister.status(self.slot)
    }

    /// Reschedules a save of the current model, e.g. after [`PersistStatus::Failed`].
    pub fn retry_persist(&self) {
        info!(diagram_id = %self.meta.diagram_id, "retrying persistence");
        self.persister.schedule(self.slot, self.current_model());
    }

    /// Writes any pending save now and waits for it.
    pub fn flush(&self) -> PersistStatus {
        let status = self.persister.flush(self.slot);
        if let PersistStatus::Failed { message, attempts } = &status {
            warn!(diagram_id = %self.meta.diagram_id, attempts, error = %message, "flush failed");
        }
        status
    }

    /// Ends the session. A save that has not started yet is dropped; one already running
    /// completes. Call [`DiagramSession::flush`] first to keep the latest state.
    pub fn close(self) {
        info!(diagram_id = %self.meta.diagram_id, "closing diagram session");
    }

    fn commit(&mut self, cause: ChangeCause) {
        let model = self.current_model();
        self.persister.schedule(self.slot, Arc::clone(&model));

        let change = ModelChange {
            model,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            cause,
        };
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
    }
}

impl Drop for DiagramSession {
    fn drop(&mut self) {
        self.persister.release(self.slot);
    }
}

#[cfg(test)]
mod tests;
