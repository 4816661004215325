// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! JSON shapes for models and edit documents.
//!
//! The same [`ModelJson`] is embedded in bulk-edit documents (`{"type": "SetModel", ...}`) and in
//! the diagram files written by [`crate::store::DiagramFolder`], so a model survives both paths
//! unchanged.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{
    Cardinality, Collection, FieldDescriptor, FieldPath, FieldPathError, IdError, Model,
    Namespace, NamespaceError, Position, Relationship, RelationshipEndpoint, RelationshipId,
};
use crate::ops::{Edit, EditError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelJson {
    #[serde(default)]
    pub collections: Vec<CollectionJson>,
    #[serde(default)]
    pub relationships: Vec<RelationshipJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CollectionJson {
    /// `database.collection`
    pub ns: String,
    #[serde(default)]
    pub position: PositionJson,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldJson>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PositionJson {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldJson {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelationshipJson {
    /// Generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub relationship: [EndpointJson; 2],
    #[serde(rename = "isInferred", default)]
    pub is_inferred: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointJson {
    pub ns: String,
    /// Path segments of the joined field, outermost first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(default)]
    pub cardinality: CardinalityJson,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CardinalityJson {
    #[default]
    One,
    Many,
}

impl From<Cardinality> for CardinalityJson {
    fn from(cardinality: Cardinality) -> Self {
        match cardinality {
            Cardinality::One => Self::One,
            Cardinality::Many => Self::Many,
        }
    }
}

impl From<CardinalityJson> for Cardinality {
    fn from(cardinality: CardinalityJson) -> Self {
        match cardinality {
            CardinalityJson::One => Self::One,
            CardinalityJson::Many => Self::Many,
        }
    }
}

/// One bulk edit, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum EditDocument {
    SetModel {
        model: ModelJson,
    },
    AddCollection {
        ns: String,
        #[serde(default)]
        position: PositionJson,
    },
    RemoveCollection {
        ns: String,
    },
    MoveCollection {
        ns: String,
        position: PositionJson,
    },
    RenameCollection {
        ns: String,
        #[serde(rename = "newNs")]
        new_ns: String,
    },
    SetCollectionFields {
        ns: String,
        fields: Vec<FieldJson>,
    },
    AddRelationship {
        relationship: RelationshipJson,
    },
    /// `relationship.id` is required.
    UpdateRelationship {
        relationship: RelationshipJson,
    },
    RemoveRelationship {
        id: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed edit document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid namespace {value:?}: {source}")]
    InvalidNamespace {
        value: String,
        source: NamespaceError,
    },
    #[error("invalid id for {field}: {value:?}: {source}")]
    InvalidId {
        field: &'static str,
        value: String,
        source: IdError,
    },
    #[error("invalid field path {value:?}: {source}")]
    InvalidFieldPath {
        value: String,
        source: FieldPathError,
    },
    #[error("missing field {field}")]
    MissingField { field: &'static str },
    #[error("invalid model: {0}")]
    InvalidModel(#[from] EditError),
}

/// Parses one edit document (`{"type": ..., ...}`) into an [`Edit`].
pub fn parse_edit(text: &str) -> Result<Edit, ParseError> {
    let document: EditDocument = serde_json::from_str(text)?;
    edit_from_document(document)
}

/// JSON schema of [`EditDocument`], for editors that validate input before submitting it.
pub fn edit_document_schema() -> schemars::Schema {
    schemars::schema_for!(EditDocument)
}

pub fn model_to_json(model: &Model) -> ModelJson {
    ModelJson {
        collections: model.collections().values().map(collection_to_json).collect(),
        relationships: model
            .relationships()
            .values()
            .map(relationship_to_json)
            .collect(),
    }
}

pub fn model_from_json(json: ModelJson) -> Result<Model, ParseError> {
    let collections = json
        .collections
        .into_iter()
        .map(collection_from_json)
        .collect::<Result<Vec<_>, _>>()?;
    let relationships = json
        .relationships
        .into_iter()
        .map(relationship_from_json)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Model::from_parts(collections, relationships)?)
}

pub fn edit_to_document(edit: &Edit) -> EditDocument {
    match edit {
        Edit::SetModel { model } => EditDocument::SetModel {
            model: model_to_json(model),
        },
        Edit::AddCollection {
            namespace,
            position,
        } => EditDocument::AddCollection {
            ns: namespace.to_string(),
            position: (*position).into(),
        },
        Edit::RemoveCollection { namespace } => EditDocument::RemoveCollection {
            ns: namespace.to_string(),
        },
        Edit::MoveCollection {
            namespace,
            position,
        } => EditDocument::MoveCollection {
            ns: namespace.to_string(),
            position: (*position).into(),
        },
        Edit::RenameCollection { from, to } => EditDocument::RenameCollection {
            ns: from.to_string(),
            new_ns: to.to_string(),
        },
        Edit::SetCollectionFields { namespace, fields } => EditDocument::SetCollectionFields {
            ns: namespace.to_string(),
            fields: fields.iter().map(field_to_json).collect(),
        },
        Edit::AddRelationship { relationship } => EditDocument::AddRelationship {
            relationship: relationship_to_json(relationship),
        },
        Edit::UpdateRelationship { relationship } => EditDocument::UpdateRelationship {
            relationship: relationship_to_json(relationship),
        },
        Edit::RemoveRelationship { relationship_id } => EditDocument::RemoveRelationship {
            id: relationship_id.to_string(),
        },
    }
}

pub fn edit_from_document(document: EditDocument) -> Result<Edit, ParseError> {
    let edit = match document {
        EditDocument::SetModel { model } => Edit::SetModel {
            model: model_from_json(model)?,
        },
        EditDocument::AddCollection { ns, position } => Edit::AddCollection {
            namespace: parse_namespace(ns)?,
            position: position.into(),
        },
        EditDocument::RemoveCollection { ns } => Edit::RemoveCollection {
            namespace: parse_namespace(ns)?,
        },
        EditDocument::MoveCollection { ns, position } => Edit::MoveCollection {
            namespace: parse_namespace(ns)?,
            position: position.into(),
        },
        EditDocument::RenameCollection { ns, new_ns } => Edit::RenameCollection {
            from: parse_namespace(ns)?,
            to: parse_namespace(new_ns)?,
        },
        EditDocument::SetCollectionFields { ns, fields } => Edit::SetCollectionFields {
            namespace: parse_namespace(ns)?,
            fields: fields.into_iter().map(field_from_json).collect(),
        },
        EditDocument::AddRelationship { relationship } => Edit::AddRelationship {
            relationship: relationship_from_json(relationship)?,
        },
        EditDocument::UpdateRelationship { relationship } => {
            if relationship.id.is_none() {
                return Err(ParseError::MissingField {
                    field: "relationship.id",
                });
            }
            Edit::UpdateRelationship {
                relationship: relationship_from_json(relationship)?,
            }
        }
        EditDocument::RemoveRelationship { id } => Edit::RemoveRelationship {
            relationship_id: parse_relationship_id(id)?,
        },
    };
    Ok(edit)
}

impl From<Position> for PositionJson {
    fn from(position: Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

impl From<PositionJson> for Position {
    fn from(position: PositionJson) -> Self {
        Position::new(position.x, position.y)
    }
}

fn collection_to_json(collection: &Collection) -> CollectionJson {
    CollectionJson {
        ns: collection.namespace().to_string(),
        position: collection.position().into(),
        fields: collection.fields().iter().map(field_to_json).collect(),
    }
}

fn collection_from_json(json: CollectionJson) -> Result<Collection, ParseError> {
    let namespace = parse_namespace(json.ns)?;
    Ok(Collection::new(namespace, json.position.into())
        .with_fields(json.fields.into_iter().map(field_from_json).collect()))
}

fn field_to_json(field: &FieldDescriptor) -> FieldJson {
    FieldJson {
        name: field.name().to_owned(),
        type_hint: field.type_hint().map(ToOwned::to_owned),
    }
}

fn field_from_json(json: FieldJson) -> FieldDescriptor {
    let field = FieldDescriptor::new(json.name);
    match json.type_hint {
        Some(type_hint) => field.with_type_hint(type_hint),
        None => field,
    }
}

fn relationship_to_json(relationship: &Relationship) -> RelationshipJson {
    let [from, to] = relationship.endpoints();
    RelationshipJson {
        id: Some(relationship.relationship_id().to_string()),
        relationship: [endpoint_to_json(from), endpoint_to_json(to)],
        is_inferred: relationship.is_inferred(),
    }
}

fn relationship_from_json(json: RelationshipJson) -> Result<Relationship, ParseError> {
    let relationship_id = match json.id {
        Some(id) => parse_relationship_id(id)?,
        None => RelationshipId::generate(),
    };
    let [from, to] = json.relationship;
    Ok(Relationship::new(
        relationship_id,
        endpoint_from_json(from)?,
        endpoint_from_json(to)?,
    )
    .inferred(json.is_inferred))
}

fn endpoint_to_json(endpoint: &RelationshipEndpoint) -> EndpointJson {
    EndpointJson {
        ns: endpoint.namespace().to_string(),
        fields: endpoint.field().map(|path| path.segments().to_vec()),
        cardinality: endpoint.cardinality().into(),
    }
}

fn endpoint_from_json(json: EndpointJson) -> Result<RelationshipEndpoint, ParseError> {
    let endpoint = RelationshipEndpoint::new(parse_namespace(json.ns)?)
        .with_cardinality(json.cardinality.into());
    let Some(segments) = json.fields else {
        return Ok(endpoint);
    };
    let value = segments.join(".");
    let path = FieldPath::new(segments)
        .map_err(|source| ParseError::InvalidFieldPath { value, source })?;
    Ok(endpoint.with_field(path))
}

fn parse_namespace(value: String) -> Result<Namespace, ParseError> {
    Namespace::new(value.clone()).map_err(|source| ParseError::InvalidNamespace { value, source })
}

fn parse_relationship_id(value: String) -> Result<RelationshipId, ParseError> {
    RelationshipId::new(value.clone()).map_err(|source| ParseError::InvalidId {
        field: "relationship.id",
        value,
        source,
    })
}

#[cfg(test)]
mod tests;
