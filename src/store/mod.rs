// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for the current model on disk.
//!
//! A document folder keeps a single `model.json` record (`{model, lastUpdate}`) that is
//! replaced atomically on every update and read back at startup.

pub mod document_folder;

pub use document_folder::{DocumentFolder, PersistedModel, StoreError, WriteDurability};
