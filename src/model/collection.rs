// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::namespace::Namespace;

/// Canvas coordinates of a collection node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    type_hint: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
        }
    }

    pub fn with_type_hint(mut self, type_hint: impl Into<String>) -> Self {
        self.type_hint = Some(type_hint.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_hint(&self) -> Option<&str> {
        self.type_hint.as_deref()
    }
}

/// A node of the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    namespace: Namespace,
    position: Position,
    fields: Vec<FieldDescriptor>,
}

impl Collection {
    pub fn new(namespace: Namespace, position: Position) -> Self {
        Self {
            namespace,
            position,
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldDescriptor>) -> Self {
        self.fields = fields;
        self
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub(crate) fn set_namespace(&mut self, namespace: Namespace) {
        self.namespace = namespace;
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_fields(&mut self, fields: Vec<FieldDescriptor>) {
        self.fields = fields;
    }
}
