// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Nereid UML: a modification engine for class, object, state-machine and agent diagram
//! documents.
//!
//! Structured requests from an assistant are turned into new elements (`convert`) or edits of
//! existing ones (`ops`), merged into the current document by the `service`, and persisted by
//! the `store`.

pub mod config;
pub mod convert;
pub mod label;
pub mod model;
pub mod ops;
pub mod service;
pub mod store;
