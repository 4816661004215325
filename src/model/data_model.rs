// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::collection::{Collection, Position};
use super::ids::RelationshipId;
use super::namespace::Namespace;
use super::relationship::Relationship;
use crate::ops::{EditError, ObjectKind};

const SEED_GRID_COLUMNS: usize = 4;
const SEED_GRID_SPACING_X: f64 = 320.0;
const SEED_GRID_SPACING_Y: f64 = 240.0;

/// Immutable snapshot of a diagram: collections keyed by namespace, relationships keyed by id.
///
/// Equality is structural. Only `crate::ops` mutates a (cloned) model; everything else sees
/// shared read-only values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    collections: BTreeMap<Namespace, Collection>,
    relationships: BTreeMap<RelationshipId, Relationship>,
}

impl Model {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Seeds a model from discovered namespaces, laying collections out on a grid in sorted
    /// order. Duplicate namespaces collapse into one collection.
    pub fn with_collections(namespaces: impl IntoIterator<Item = Namespace>) -> Self {
        let mut sorted = namespaces.into_iter().collect::<Vec<_>>();
        sorted.sort();
        sorted.dedup();

        let collections = sorted
            .into_iter()
            .enumerate()
            .map(|(index, namespace)| {
                let column = (index % SEED_GRID_COLUMNS) as f64;
                let row = (index / SEED_GRID_COLUMNS) as f64;
                let position =
                    Position::new(column * SEED_GRID_SPACING_X, row * SEED_GRID_SPACING_Y);
                (namespace.clone(), Collection::new(namespace, position))
            })
            .collect();

        Self {
            collections,
            relationships: BTreeMap::new(),
        }
    }

    /// Builds a model from loose parts, enforcing namespace/id uniqueness and endpoint
    /// existence.
    pub fn from_parts(
        collections: impl IntoIterator<Item = Collection>,
        relationships: impl IntoIterator<Item = Relationship>,
    ) -> Result<Self, EditError> {
        let mut model = Self::empty();

        for collection in collections {
            let namespace = collection.namespace().clone();
            if !collection.position().is_finite() {
                let Position { x, y } = collection.position();
                return Err(EditError::InvalidPosition { namespace, x, y });
            }
            if model.collections.contains_key(&namespace) {
                return Err(EditError::DuplicateNamespace { namespace });
            }
            model.collections.insert(namespace, collection);
        }

        for relationship in relationships {
            let relationship_id = relationship.relationship_id().clone();
            if model.relationships.contains_key(&relationship_id) {
                return Err(EditError::DuplicateRelationship { relationship_id });
            }
            model.check_endpoints(&relationship)?;
            model.relationships.insert(relationship_id, relationship);
        }

        Ok(model)
    }

    /// Re-checks the invariants `from_parts` enforces.
    pub fn validate(&self) -> Result<(), EditError> {
        for (namespace, collection) in &self.collections {
            if !collection.position().is_finite() {
                let Position { x, y } = collection.position();
                return Err(EditError::InvalidPosition {
                    namespace: namespace.clone(),
                    x,
                    y,
                });
            }
        }
        for relationship in self.relationships.values() {
            self.check_endpoints(relationship)?;
        }
        Ok(())
    }

    pub(crate) fn check_endpoints(&self, relationship: &Relationship) -> Result<(), EditError> {
        for endpoint in relationship.endpoints() {
            if !self.collections.contains_key(endpoint.namespace()) {
                return Err(EditError::UnknownEndpoint {
                    relationship_id: relationship.relationship_id().clone(),
                    namespace: endpoint.namespace().clone(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn require_collection(&self, namespace: &Namespace) -> Result<(), EditError> {
        if self.collections.contains_key(namespace) {
            Ok(())
        } else {
            Err(EditError::NotFound {
                kind: ObjectKind::Collection,
                id: namespace.to_string(),
            })
        }
    }

    pub fn collections(&self) -> &BTreeMap<Namespace, Collection> {
        &self.collections
    }

    pub fn relationships(&self) -> &BTreeMap<RelationshipId, Relationship> {
        &self.relationships
    }

    pub fn collection(&self, namespace: &Namespace) -> Option<&Collection> {
        self.collections.get(namespace)
    }

    pub fn relationship(&self, relationship_id: &RelationshipId) -> Option<&Relationship> {
        self.relationships.get(relationship_id)
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> + '_ {
        self.collections.keys()
    }

    pub fn relationships_touching<'a>(
        &'a self,
        namespace: &'a Namespace,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships.values().filter(move |r| r.touches(namespace))
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty() && self.relationships.is_empty()
    }

    pub(crate) fn collections_mut(&mut self) -> &mut BTreeMap<Namespace, Collection> {
        &mut self.collections
    }

    pub(crate) fn relationships_mut(&mut self) -> &mut BTreeMap<RelationshipId, Relationship> {
        &mut self.relationships
    }
}
