// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::ids::RelationshipId;
use super::namespace::Namespace;

/// Dotted path to a (possibly nested) document field, e.g. `address.city`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(segments: Vec<String>) -> Result<Self, FieldPathError> {
        if segments.is_empty() {
            return Err(FieldPathError::Empty);
        }
        if let Some(index) = segments.iter().position(String::is_empty) {
            return Err(FieldPathError::EmptySegment { index });
        }
        Ok(Self { segments })
    }

    pub fn parse(dotted: &str) -> Result<Self, FieldPathError> {
        if dotted.is_empty() {
            return Err(FieldPathError::Empty);
        }
        Self::new(dotted.split('.').map(ToOwned::to_owned).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldPathError {
    #[error("field path must not be empty")]
    Empty,
    #[error("field path segment {index} is empty")]
    EmptySegment { index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    #[default]
    One,
    Many,
}

/// One side of a relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipEndpoint {
    namespace: Namespace,
    field: Option<FieldPath>,
    cardinality: Cardinality,
}

impl RelationshipEndpoint {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            field: None,
            cardinality: Cardinality::One,
        }
    }

    pub fn with_field(mut self, field: FieldPath) -> Self {
        self.field = Some(field);
        self
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn field(&self) -> Option<&FieldPath> {
        self.field.as_ref()
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

/// A foreign-key-like edge between two collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    relationship_id: RelationshipId,
    endpoints: [RelationshipEndpoint; 2],
    is_inferred: bool,
}

impl Relationship {
    pub fn new(
        relationship_id: RelationshipId,
        from: RelationshipEndpoint,
        to: RelationshipEndpoint,
    ) -> Self {
        Self {
            relationship_id,
            endpoints: [from, to],
            is_inferred: false,
        }
    }

    pub fn inferred(mut self, is_inferred: bool) -> Self {
        self.is_inferred = is_inferred;
        self
    }

    pub fn relationship_id(&self) -> &RelationshipId {
        &self.relationship_id
    }

    pub fn endpoints(&self) -> &[RelationshipEndpoint; 2] {
        &self.endpoints
    }

    pub fn from(&self) -> &RelationshipEndpoint {
        &self.endpoints[0]
    }

    pub fn to(&self) -> &RelationshipEndpoint {
        &self.endpoints[1]
    }

    pub fn is_inferred(&self) -> bool {
        self.is_inferred
    }

    pub fn touches(&self, namespace: &Namespace) -> bool {
        self.endpoints.iter().any(|e| e.namespace() == namespace)
    }

    pub(crate) fn rename_namespace(&mut self, from: &Namespace, to: &Namespace) {
        for endpoint in &mut self.endpoints {
            if &endpoint.namespace == from {
                endpoint.namespace = to.clone();
            }
        }
    }
}
