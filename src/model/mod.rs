// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model for UML diagram documents.
//!
//! A document holds flat, insertion-ordered maps of elements and relationships. Composite
//! elements (classes, states, intents, objects) reference their children by id, and children
//! point back through `owner`.

pub mod diagram;
pub mod element;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod ids;
pub mod lookup;
pub mod relationship;

pub use diagram::{DanglingReference, DiagramType, Document, ParseDiagramTypeError, DOCUMENT_VERSION};
pub use element::{Bounds, ChildList, Element, ElementKind, Point, Size};
pub use ids::{ElementId, Id, IdError, RelationshipId};
pub use relationship::{Direction, Endpoint, Relationship, RelationshipKind};

#[cfg(test)]
mod tests;
