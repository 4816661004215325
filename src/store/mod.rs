// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for diagrams.
//!
//! [`PersistenceGateway`] is the seam the editor talks to. [`DiagramFolder`] keeps one JSON file
//! per diagram on disk, [`MemoryStore`] keeps everything in process, and [`PersistScheduler`]
//! debounces saves onto a background worker.

pub mod diagram_folder;
pub mod gateway;
pub mod memory;
pub mod persist;

pub use diagram_folder::{DiagramFolder, WriteDurability};
pub use gateway::{DiagramMeta, DiagramSummary, PersistenceGateway, StoreError, StoredDiagram};
pub use memory::MemoryStore;
pub use persist::{PersistScheduler, PersistStatus, SlotId};
