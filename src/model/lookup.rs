// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared traversal helpers used by converters and modifiers.

use super::diagram::Document;
use super::element::{Element, ElementKind};
use super::ids::{ElementId, Id};

/// First element (in insertion order) whose `name` and `type` both match exactly.
pub fn find_element_by_name<'a>(
    doc: &'a Document,
    name: &str,
    kind: &ElementKind,
) -> Option<&'a ElementId> {
    doc.elements()
        .iter()
        .find(|(_, element)| &element.kind == kind && element.name == name)
        .map(|(id, _)| id)
}

/// All elements of the given type, in insertion order.
pub fn find_elements_by_type<'a>(
    doc: &'a Document,
    kind: &ElementKind,
) -> Vec<(&'a ElementId, &'a Element)> {
    doc.elements()
        .iter()
        .filter(|(_, element)| &element.kind == kind)
        .collect()
}

/// Like [`find_element_by_name`], but tries each kind in order and returns the first hit.
pub fn find_element_by_name_in<'a>(
    doc: &'a Document,
    name: &str,
    kinds: &[ElementKind],
) -> Option<&'a ElementId> {
    kinds
        .iter()
        .find_map(|kind| find_element_by_name(doc, name, kind))
}

pub fn generate_unique_id<T>(prefix: &str) -> Id<T> {
    Id::generate(prefix)
}

pub fn clone_document(doc: &Document) -> Document {
    doc.clone()
}

/// Returns a copy of `doc` with `id`, its children and incident relationships removed.
/// The copy equals `doc` when `id` is absent.
pub fn remove_element_with_children(doc: &Document, id: &str) -> Document {
    let mut next = doc.clone();
    next.remove_element_with_children(id);
    next
}
