// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A [`Model`] is an immutable snapshot of collections (nodes keyed by [`Namespace`]) and the
//! relationships (edges keyed by [`RelationshipId`]) between them.

pub mod collection;
pub mod data_model;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod namespace;
pub mod relationship;

pub use collection::{Collection, FieldDescriptor, Position};
pub use data_model::Model;
pub use ids::{DiagramId, Id, IdError, RelationshipId};
pub use namespace::{Namespace, NamespaceError};
pub use relationship::{
    Cardinality, FieldPath, FieldPathError, Relationship, RelationshipEndpoint,
};
