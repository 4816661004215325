// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A `database.collection` name.
///
/// The database part ends at the first `.`; the collection part may itself contain dots
/// (`app.system.views` is collection `system.views` in database `app`).
#[derive(Debug, Clone)]
pub struct Namespace {
    value: String,
    dot: usize,
}

impl Namespace {
    pub fn new(value: impl Into<String>) -> Result<Self, NamespaceError> {
        let value = value.into();
        if value.is_empty() {
            return Err(NamespaceError::Empty);
        }
        let Some(dot) = value.find('.') else {
            return Err(NamespaceError::MissingDot { value });
        };
        if dot == 0 {
            return Err(NamespaceError::EmptyDatabase { value });
        }
        if dot + 1 == value.len() {
            return Err(NamespaceError::EmptyCollection { value });
        }
        Ok(Self { value, dot })
    }

    pub fn from_parts(database: &str, collection: &str) -> Result<Self, NamespaceError> {
        if database.contains('.') {
            return Err(NamespaceError::DotInDatabase {
                database: database.to_owned(),
            });
        }
        Self::new(format!("{database}.{collection}"))
    }

    pub fn database(&self) -> &str {
        &self.value[..self.dot]
    }

    pub fn collection(&self) -> &str {
        &self.value[self.dot + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

// Identity is the full string; `dot` is derived from it.
impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Namespace {}

impl Hash for Namespace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Namespace {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Namespace {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Namespace {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
    #[error("namespace must not be empty")]
    Empty,
    #[error("namespace {value:?} is not of the form database.collection")]
    MissingDot { value: String },
    #[error("namespace {value:?} has an empty database name")]
    EmptyDatabase { value: String },
    #[error("namespace {value:?} has an empty collection name")]
    EmptyCollection { value: String },
    #[error("database name {database:?} must not contain '.'")]
    DotInDatabase { database: String },
}
