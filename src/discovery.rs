// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Schema discovery: which collections a database has, used to seed new diagrams.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::Namespace;

pub trait SchemaDiscovery: Send + Sync {
    /// Namespaces of every collection in `database`, in any order.
    fn collections(&self, database: &str) -> Result<Vec<Namespace>, DiscoveryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    #[error("database {database:?} is unknown")]
    UnknownDatabase { database: String },
    #[error("schema discovery unavailable: {message}")]
    Unavailable { message: String },
}

/// Fixed, in-memory schema.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    databases: BTreeMap<String, BTreeSet<Namespace>>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_namespaces(namespaces: impl IntoIterator<Item = Namespace>) -> Self {
        let mut schema = Self::new();
        for namespace in namespaces {
            schema
                .databases
                .entry(namespace.database().to_owned())
                .or_default()
                .insert(namespace);
        }
        schema
    }

    /// Registers `database` even when it has no collections.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.databases.entry(database.into()).or_default();
        self
    }

    pub fn databases(&self) -> impl Iterator<Item = &str> + '_ {
        self.databases.keys().map(String::as_str)
    }
}

impl SchemaDiscovery for StaticSchema {
    fn collections(&self, database: &str) -> Result<Vec<Namespace>, DiscoveryError> {
        self.databases
            .get(database)
            .map(|namespaces| namespaces.iter().cloned().collect())
            .ok_or_else(|| DiscoveryError::UnknownDatabase {
                database: database.to_owned(),
            })
    }
}
