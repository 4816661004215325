// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Edits: the closed set of model transformations.
//!
//! [`apply_edit`] is pure. It validates the edit against the given model and returns the next
//! model plus a coarse [`Delta`] for display/logging. A rejected edit returns an [`EditError`]
//! and produces nothing, so callers never observe a partially applied edit.

use std::collections::BTreeSet;
use std::fmt;

use crate::model::{
    Collection, FieldDescriptor, Model, Namespace, Position, Relationship, RelationshipId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Replaces the whole model, layout included. No merge.
    SetModel { model: Model },
    AddCollection { namespace: Namespace, position: Position },
    /// Also removes every relationship touching `namespace`.
    RemoveCollection { namespace: Namespace },
    MoveCollection { namespace: Namespace, position: Position },
    RenameCollection { from: Namespace, to: Namespace },
    SetCollectionFields { namespace: Namespace, fields: Vec<FieldDescriptor> },
    AddRelationship { relationship: Relationship },
    UpdateRelationship { relationship: Relationship },
    RemoveRelationship { relationship_id: RelationshipId },
}

impl Edit {
    pub fn kind(&self) -> EditKind {
        match self {
            Self::SetModel { .. } => EditKind::SetModel,
            Self::AddCollection { .. } => EditKind::AddCollection,
            Self::RemoveCollection { .. } => EditKind::RemoveCollection,
            Self::MoveCollection { .. } => EditKind::MoveCollection,
            Self::RenameCollection { .. } => EditKind::RenameCollection,
            Self::SetCollectionFields { .. } => EditKind::SetCollectionFields,
            Self::AddRelationship { .. } => EditKind::AddRelationship,
            Self::UpdateRelationship { .. } => EditKind::UpdateRelationship,
            Self::RemoveRelationship { .. } => EditKind::RemoveRelationship,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    SetModel,
    AddCollection,
    RemoveCollection,
    MoveCollection,
    RenameCollection,
    SetCollectionFields,
    AddRelationship,
    UpdateRelationship,
    RemoveRelationship,
}

impl EditKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetModel => "SetModel",
            Self::AddCollection => "AddCollection",
            Self::RemoveCollection => "RemoveCollection",
            Self::MoveCollection => "MoveCollection",
            Self::RenameCollection => "RenameCollection",
            Self::SetCollectionFields => "SetCollectionFields",
            Self::AddRelationship => "AddRelationship",
            Self::UpdateRelationship => "UpdateRelationship",
            Self::RemoveRelationship => "RemoveRelationship",
        }
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to one object inside a model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRef {
    Collection(Namespace),
    Relationship(RelationshipId),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection(namespace) => write!(f, "collection:{namespace}"),
            Self::Relationship(relationship_id) => write!(f, "relationship:{relationship_id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub model: Model,
    pub delta: Delta,
}

/// Coarse description of what an edit changed, sorted for stable output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<EntityRef>,
    pub removed: Vec<EntityRef>,
    pub updated: Vec<EntityRef>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: BTreeSet<EntityRef>,
    removed: BTreeSet<EntityRef>,
    updated: BTreeSet<EntityRef>,
}

impl DeltaBuilder {
    fn record_added(&mut self, entity: EntityRef) {
        self.updated.remove(&entity);
        // Remove-then-add of the same key within one edit reads as an update.
        if self.removed.remove(&entity) {
            self.updated.insert(entity);
            return;
        }
        self.added.insert(entity);
    }

    fn record_removed(&mut self, entity: EntityRef) {
        self.updated.remove(&entity);
        if self.added.remove(&entity) {
            return;
        }
        self.removed.insert(entity);
    }

    fn record_updated(&mut self, entity: EntityRef) {
        if self.added.contains(&entity) || self.removed.contains(&entity) {
            return;
        }
        self.updated.insert(entity);
    }

    fn finish(self) -> Delta {
        Delta {
            added: self.added.into_iter().collect(),
            removed: self.removed.into_iter().collect(),
            updated: self.updated.into_iter().collect(),
        }
    }
}

/// Applies one edit to `model`, returning the next model. `model` itself is never touched.
pub fn apply_edit(model: &Model, edit: &Edit) -> Result<Applied, EditError> {
    let mut delta = DeltaBuilder::default();

    let mut next = model.clone();
    apply_in_place(&mut next, edit, &mut delta)?;

    Ok(Applied {
        model: next,
        delta: delta.finish(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Collection,
    Relationship,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collection => f.write_str("collection"),
            Self::Relationship => f.write_str("relationship"),
        }
    }
}

/// An edit that would break a model invariant. The model is left unchanged.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("collection {namespace} already exists")]
    DuplicateNamespace { namespace: Namespace },
    #[error("relationship {relationship_id} already exists")]
    DuplicateRelationship { relationship_id: RelationshipId },
    #[error("{kind} not found (id={id})")]
    NotFound { kind: ObjectKind, id: String },
    #[error("relationship {relationship_id} references unknown collection {namespace}")]
    UnknownEndpoint {
        relationship_id: RelationshipId,
        namespace: Namespace,
    },
    #[error("position of {namespace} must be finite (x={x}, y={y})")]
    InvalidPosition { namespace: Namespace, x: f64, y: f64 },
}

// Extracted per-edit implementation.
include!("ops_impl.rs");
