// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Schemadraft: edit history and persistence for data-model diagrams.
//!
//! A diagram is a [`model::Model`] of collections and relationships. Edits ([`ops::Edit`]) are
//! validated and applied purely, [`history::History`] keeps every snapshot for linear undo/redo,
//! and [`session::DiagramSession`] ties a history to a [`store::PersistenceGateway`] through a
//! debounced background writer.

pub mod config;
pub mod discovery;
pub mod format;
pub mod history;
pub mod model;
pub mod ops;
pub mod session;
pub mod store;
