// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Per-edit mutation helpers used by `apply_edit`.
/// They run against a private clone; an `Err` means the clone is discarded.
fn apply_in_place(
    model: &mut Model,
    edit: &Edit,
    delta: &mut DeltaBuilder,
) -> Result<(), EditError> {
    match edit {
        Edit::SetModel { model: replacement } => {
            replacement.validate()?;
            record_replacement(model, replacement, delta);
            *model = replacement.clone();
            Ok(())
        }
        Edit::AddCollection { namespace, position } => {
            check_position(namespace, *position)?;
            if model.collections().contains_key(namespace) {
                return Err(EditError::DuplicateNamespace {
                    namespace: namespace.clone(),
                });
            }
            model
                .collections_mut()
                .insert(namespace.clone(), Collection::new(namespace.clone(), *position));
            delta.record_added(EntityRef::Collection(namespace.clone()));
            Ok(())
        }
        Edit::RemoveCollection { namespace } => {
            if model.collections_mut().remove(namespace).is_none() {
                return Err(not_found_collection(namespace));
            }
            let removed_relationship_ids = model
                .relationships_touching(namespace)
                .map(|r| r.relationship_id().clone())
                .collect::<Vec<_>>();
            model.relationships_mut().retain(|_, r| !r.touches(namespace));
            for relationship_id in removed_relationship_ids {
                delta.record_removed(EntityRef::Relationship(relationship_id));
            }
            delta.record_removed(EntityRef::Collection(namespace.clone()));
            Ok(())
        }
        Edit::MoveCollection { namespace, position } => {
            check_position(namespace, *position)?;
            let Some(existing) = model.collections_mut().get_mut(namespace) else {
                return Err(not_found_collection(namespace));
            };
            existing.set_position(*position);
            delta.record_updated(EntityRef::Collection(namespace.clone()));
            Ok(())
        }
        Edit::RenameCollection { from, to } => {
            model.require_collection(from)?;
            // `from == to` lands here as well.
            if model.collections().contains_key(to) {
                return Err(EditError::DuplicateNamespace {
                    namespace: to.clone(),
                });
            }
            let Some(mut collection) = model.collections_mut().remove(from) else {
                return Err(not_found_collection(from));
            };
            collection.set_namespace(to.clone());
            model.collections_mut().insert(to.clone(), collection);

            for relationship in model.relationships_mut().values_mut() {
                if relationship.touches(from) {
                    relationship.rename_namespace(from, to);
                    delta.record_updated(EntityRef::Relationship(
                        relationship.relationship_id().clone(),
                    ));
                }
            }
            delta.record_removed(EntityRef::Collection(from.clone()));
            delta.record_added(EntityRef::Collection(to.clone()));
            Ok(())
        }
        Edit::SetCollectionFields { namespace, fields } => {
            let Some(existing) = model.collections_mut().get_mut(namespace) else {
                return Err(not_found_collection(namespace));
            };
            existing.set_fields(fields.clone());
            delta.record_updated(EntityRef::Collection(namespace.clone()));
            Ok(())
        }
        Edit::AddRelationship { relationship } => {
            let relationship_id = relationship.relationship_id();
            if model.relationships().contains_key(relationship_id) {
                return Err(EditError::DuplicateRelationship {
                    relationship_id: relationship_id.clone(),
                });
            }
            model.check_endpoints(relationship)?;
            model
                .relationships_mut()
                .insert(relationship_id.clone(), relationship.clone());
            delta.record_added(EntityRef::Relationship(relationship_id.clone()));
            Ok(())
        }
        Edit::UpdateRelationship { relationship } => {
            let relationship_id = relationship.relationship_id();
            if !model.relationships().contains_key(relationship_id) {
                return Err(not_found_relationship(relationship_id));
            }
            model.check_endpoints(relationship)?;
            model
                .relationships_mut()
                .insert(relationship_id.clone(), relationship.clone());
            delta.record_updated(EntityRef::Relationship(relationship_id.clone()));
            Ok(())
        }
        Edit::RemoveRelationship { relationship_id } => {
            if model.relationships_mut().remove(relationship_id).is_none() {
                return Err(not_found_relationship(relationship_id));
            }
            delta.record_removed(EntityRef::Relationship(relationship_id.clone()));
            Ok(())
        }
    }
}

fn record_replacement(before: &Model, after: &Model, delta: &mut DeltaBuilder) {
    for (namespace, collection) in before.collections() {
        match after.collection(namespace) {
            None => delta.record_removed(EntityRef::Collection(namespace.clone())),
            Some(next) if next != collection => {
                delta.record_updated(EntityRef::Collection(namespace.clone()))
            }
            Some(_) => {}
        }
    }
    for namespace in after.namespaces() {
        if before.collection(namespace).is_none() {
            delta.record_added(EntityRef::Collection(namespace.clone()));
        }
    }

    for (relationship_id, relationship) in before.relationships() {
        match after.relationship(relationship_id) {
            None => delta.record_removed(EntityRef::Relationship(relationship_id.clone())),
            Some(next) if next != relationship => {
                delta.record_updated(EntityRef::Relationship(relationship_id.clone()))
            }
            Some(_) => {}
        }
    }
    for relationship_id in after.relationships().keys() {
        if before.relationship(relationship_id).is_none() {
            delta.record_added(EntityRef::Relationship(relationship_id.clone()));
        }
    }
}

fn check_position(namespace: &Namespace, position: Position) -> Result<(), EditError> {
    if position.is_finite() {
        return Ok(());
    }
    Err(EditError::InvalidPosition {
        namespace: namespace.clone(),
        x: position.x,
        y: position.y,
    })
}

fn not_found_collection(namespace: &Namespace) -> EditError {
    EditError::NotFound {
        kind: ObjectKind::Collection,
        id: namespace.to_string(),
    }
}

fn not_found_relationship(relationship_id: &RelationshipId) -> EditError {
    EditError::NotFound {
        kind: ObjectKind::Relationship,
        id: relationship_id.to_string(),
    }
}
