// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram document formats.
//!
//! Currently this module only speaks JSON: bulk edit documents and the stored model shape.

pub mod json;

pub use json::{
    edit_document_schema, edit_from_document, edit_to_document, model_from_json, model_to_json,
    parse_edit, EditDocument, ModelJson, ParseError,
};
