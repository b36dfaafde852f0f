// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::element::{ChildList, Element, Size};
use super::ids::{ElementId, RelationshipId};
use super::relationship::Relationship;

pub const DOCUMENT_VERSION: &str = "3.0.0";

/// The notation a document is drawn in. Drives every converter/modifier dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiagramType {
    #[default]
    ClassDiagram,
    ObjectDiagram,
    StateMachineDiagram,
    AgentDiagram,
}

impl DiagramType {
    pub const ALL: [Self; 4] = [
        Self::ClassDiagram,
        Self::ObjectDiagram,
        Self::StateMachineDiagram,
        Self::AgentDiagram,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClassDiagram => "ClassDiagram",
            Self::ObjectDiagram => "ObjectDiagram",
            Self::StateMachineDiagram => "StateMachineDiagram",
            Self::AgentDiagram => "AgentDiagram",
        }
    }

    /// Canvas size hint used for freshly generated systems.
    pub fn default_size(self) -> Size {
        match self {
            Self::ClassDiagram | Self::ObjectDiagram => Size::new(1400.0, 740.0),
            Self::StateMachineDiagram | Self::AgentDiagram => Size::new(1080.0, 400.0),
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagramTypeError {
    value: String,
}

impl fmt::Display for ParseDiagramTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown diagram type `{}` (expected ClassDiagram, ObjectDiagram, StateMachineDiagram or AgentDiagram)",
            self.value
        )
    }
}

impl std::error::Error for ParseDiagramTypeError {}

impl FromStr for DiagramType {
    type Err = ParseDiagramTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDiagramTypeError {
                value: s.to_owned(),
            })
    }
}

/// A reference inside a document that points at an element which does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingReference {
    Owner {
        element: ElementId,
        owner: ElementId,
    },
    Child {
        element: ElementId,
        list: ChildList,
        child: ElementId,
    },
    Endpoint {
        relationship: RelationshipId,
        element: ElementId,
    },
}

/// The full diagram state: flat element and relationship maps keyed by id.
///
/// Both maps preserve insertion order, so name lookups resolve ties to the element that was
/// inserted first. Top-level keys the engine does not interpret (`interactive`,
/// `assessments`, ...) are kept in `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default = "default_version")]
    version: String,
    #[serde(rename = "type", alias = "diagramType")]
    diagram_type: DiagramType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<Size>,
    #[serde(default)]
    elements: IndexMap<ElementId, Element>,
    #[serde(default)]
    relationships: IndexMap<RelationshipId, Relationship>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_owned()
}

impl Document {
    pub fn new(diagram_type: DiagramType) -> Self {
        Self {
            version: default_version(),
            diagram_type,
            size: None,
            elements: IndexMap::new(),
            relationships: IndexMap::new(),
            extra: Map::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn diagram_type(&self) -> DiagramType {
        self.diagram_type
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }

    pub fn set_size(&mut self, size: Option<Size>) {
        self.size = size;
    }

    pub fn elements(&self) -> &IndexMap<ElementId, Element> {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut IndexMap<ElementId, Element> {
        &mut self.elements
    }

    pub fn relationships(&self) -> &IndexMap<RelationshipId, Relationship> {
        &self.relationships
    }

    pub fn relationships_mut(&mut self) -> &mut IndexMap<RelationshipId, Relationship> {
        &mut self.relationships
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn insert_element(&mut self, element: Element) {
        self.elements.insert(element.id.clone(), element);
    }

    pub fn insert_relationship(&mut self, relationship: Relationship) {
        self.relationships
            .insert(relationship.id.clone(), relationship);
    }

    pub fn remove_relationship(&mut self, id: &str) -> Option<Relationship> {
        self.relationships.shift_remove(id)
    }

    /// Removes an element, every child listed in its child lists, and every relationship
    /// incident to any removed id. Returns the removed element ids (empty if `id` is absent).
    ///
    /// Runs in two phases: collect the ids to remove, then drop them from `elements` and
    /// filter `relationships` against the collected set. Children are removed one level deep.
    pub fn remove_element_with_children(&mut self, id: &str) -> Vec<ElementId> {
        let Some(element) = self.elements.get(id) else {
            return Vec::new();
        };

        let mut removed = vec![element.id.clone()];
        removed.extend(element.all_children().cloned());
        let owner = element.owner.clone();

        for removed_id in &removed {
            self.elements.shift_remove(removed_id.as_str());
        }

        if let Some(parent) = owner.and_then(|owner| self.elements.get_mut(owner.as_str())) {
            parent.detach_child(&removed[0]);
        }

        let removed_set = removed.iter().collect::<HashSet<_>>();
        self.relationships.retain(|_, relationship| {
            !removed_set.contains(&relationship.source.element)
                && !removed_set.contains(&relationship.target.element)
        });

        removed
    }

    /// Reports every owner, child-list entry, and relationship endpoint that points at an
    /// element missing from the document. An empty result means the document is consistent.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();

        for (element_id, element) in &self.elements {
            if let Some(owner) = &element.owner {
                if !self.elements.contains_key(owner.as_str()) {
                    dangling.push(DanglingReference::Owner {
                        element: element_id.clone(),
                        owner: owner.clone(),
                    });
                }
            }
            for list in ChildList::ALL {
                for child in element.children(list) {
                    if !self.elements.contains_key(child.as_str()) {
                        dangling.push(DanglingReference::Child {
                            element: element_id.clone(),
                            list,
                            child: child.clone(),
                        });
                    }
                }
            }
        }

        for (relationship_id, relationship) in &self.relationships {
            for endpoint in [&relationship.source, &relationship.target] {
                if !self.elements.contains_key(endpoint.element.as_str()) {
                    dangling.push(DanglingReference::Endpoint {
                        relationship: relationship_id.clone(),
                        element: endpoint.element.clone(),
                    });
                }
            }
        }

        dangling
    }

    /// Fills `type`/`version` of a partial document JSON value from this document, then
    /// decodes it. Used when an inbound replacement omits the header fields.
    pub fn from_partial(value: Value, fallback: &Document) -> Result<Self, serde_json::Error> {
        let mut value = value;
        if let Value::Object(map) = &mut value {
            if !map.contains_key("type") && !map.contains_key("diagramType") {
                map.insert(
                    "type".to_owned(),
                    Value::String(fallback.diagram_type.as_str().to_owned()),
                );
            }
            if !map.contains_key("version") {
                map.insert("version".to_owned(), Value::String(fallback.version.clone()));
            }
        }
        serde_json::from_value(value)
    }
}
