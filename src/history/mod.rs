// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Linear undo/redo over full model snapshots.
//!
//! Every applied edit appends the resulting [`Model`] and moves the cursor onto it. Undo and
//! redo only move the cursor, so `undo` followed by `redo` restores exactly the same snapshot,
//! including after a wholesale `SetModel`.

use std::sync::Arc;

use crate::model::Model;
use crate::ops::{apply_edit, Delta, Edit, EditError, EditKind};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    model: Arc<Model>,
    edit_kind: Option<EditKind>,
    delta: Delta,
}

impl HistoryEntry {
    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// `None` for the initial snapshot.
    pub fn edit_kind(&self) -> Option<EditKind> {
        self.edit_kind
    }

    pub fn delta(&self) -> &Delta {
        &self.delta
    }
}

/// Undo/redo was requested with nothing to move to. Not a failure: callers disable the
/// corresponding control instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Boundary {
    #[error("nothing to undo")]
    AtBeginning,
    #[error("nothing to redo")]
    AtEnd,
}

/// Ordered snapshots plus the index of the active one.
///
/// Invariants: `entries` is never empty and `cursor < entries.len()`.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn new(initial: Model) -> Self {
        Self {
            entries: vec![HistoryEntry {
                model: Arc::new(initial),
                edit_kind: None,
                delta: Delta::default(),
            }],
            cursor: 0,
        }
    }

    /// Validates and applies `edit` on top of the current snapshot.
    ///
    /// Redo entries past the cursor are discarded. On error nothing changes.
    pub fn apply(&mut self, edit: &Edit) -> Result<&Arc<Model>, EditError> {
        let applied = apply_edit(self.current(), edit)?;

        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            model: Arc::new(applied.model),
            edit_kind: Some(edit.kind()),
            delta: applied.delta,
        });
        self.cursor += 1;

        Ok(self.current())
    }

    pub fn undo(&mut self) -> Result<&Arc<Model>, Boundary> {
        if self.cursor == 0 {
            return Err(Boundary::AtBeginning);
        }
        self.cursor -= 1;
        Ok(self.current())
    }

    pub fn redo(&mut self) -> Result<&Arc<Model>, Boundary> {
        if self.cursor + 1 >= self.entries.len() {
            return Err(Boundary::AtEnd);
        }
        self.cursor += 1;
        Ok(self.current())
    }

    pub fn current(&self) -> &Arc<Model> {
        &self.entries[self.cursor].model
    }

    pub fn current_entry(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true: a history always holds its initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
