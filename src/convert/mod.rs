// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Conversion of high-level element/system specifications into document fragments.
//!
//! Each diagram type has one converter. Converters never touch a live document: they return
//! fresh elements and relationships with generated ids and computed bounds, which the modeling
//! service merges afterwards.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::LayoutConfig;
use crate::model::{
    DiagramType, Document, Element, ElementId, Point, Relationship, RelationshipId, Size,
    DOCUMENT_VERSION,
};

pub mod agent;
pub mod class;
pub mod object;
pub mod state_machine;

pub use agent::AgentDiagramConverter;
pub use class::ClassDiagramConverter;
pub use object::ObjectDiagramConverter;
pub use state_machine::StateMachineConverter;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid {diagram_type} specification: {reason}")]
    InvalidSpecification {
        diagram_type: DiagramType,
        reason: String,
    },

    #[error("invalid {diagram_type} specification: {relation} #{index} is missing `{field}`")]
    MissingEndpoint {
        diagram_type: DiagramType,
        relation: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("invalid {diagram_type} specification: `{name}` is not defined in this specification")]
    UnknownEndpoint {
        diagram_type: DiagramType,
        name: String,
    },
}

impl ConvertError {
    pub fn diagram_type(&self) -> DiagramType {
        match self {
            Self::InvalidSpecification { diagram_type, .. }
            | Self::MissingEndpoint { diagram_type, .. }
            | Self::UnknownEndpoint { diagram_type, .. } => *diagram_type,
        }
    }
}

/// The single top-level element of a fragment, keyed the way the editor expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MainElement {
    Class(Element),
    Object(Element),
    State(Element),
    Intent(Element),
    InitialNode(Element),
}

impl MainElement {
    pub fn element(&self) -> &Element {
        match self {
            Self::Class(element)
            | Self::Object(element)
            | Self::State(element)
            | Self::Intent(element)
            | Self::InitialNode(element) => element,
        }
    }

    pub fn into_element(self) -> Element {
        match self {
            Self::Class(element)
            | Self::Object(element)
            | Self::State(element)
            | Self::Intent(element)
            | Self::InitialNode(element) => element,
        }
    }
}

/// A main element plus its owned children (and, rarely, relationships), not yet merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    #[serde(flatten)]
    pub main: MainElement,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<ElementId, Element>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub methods: IndexMap<ElementId, Element>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub bodies: IndexMap<ElementId, Element>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub relationships: IndexMap<RelationshipId, Relationship>,
}

impl Fragment {
    pub fn new(main: MainElement) -> Self {
        Self {
            main,
            attributes: IndexMap::new(),
            methods: IndexMap::new(),
            bodies: IndexMap::new(),
            relationships: IndexMap::new(),
        }
    }

    pub fn main_element(&self) -> &Element {
        self.main.element()
    }

    /// The main element followed by every child, in insertion order.
    pub fn into_elements(self) -> (Vec<Element>, IndexMap<RelationshipId, Relationship>) {
        let mut elements = vec![self.main.into_element()];
        elements.extend(self.attributes.into_values());
        elements.extend(self.methods.into_values());
        elements.extend(self.bodies.into_values());
        (elements, self.relationships)
    }
}

/// Everything produced for a whole-system specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemFragment {
    pub version: String,
    #[serde(rename = "type")]
    pub diagram_type: DiagramType,
    pub size: Size,
    pub elements: IndexMap<ElementId, Element>,
    pub relationships: IndexMap<RelationshipId, Relationship>,
}

impl SystemFragment {
    pub fn new(diagram_type: DiagramType) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_owned(),
            diagram_type,
            size: diagram_type.default_size(),
            elements: IndexMap::new(),
            relationships: IndexMap::new(),
        }
    }

    pub fn insert_fragment(&mut self, fragment: Fragment) {
        let (elements, relationships) = fragment.into_elements();
        for element in elements {
            self.elements.insert(element.id.clone(), element);
        }
        self.relationships.extend(relationships);
    }

    pub fn insert_relationship(&mut self, relationship: Relationship) {
        self.relationships
            .insert(relationship.id.clone(), relationship);
    }
}

pub trait Converter: Send + Sync {
    fn diagram_type(&self) -> DiagramType;

    /// Builds one element (with its children) at `position`.
    fn convert_single_element(&self, spec: &Value, position: Point)
        -> Result<Fragment, ConvertError>;

    /// Builds a whole system, laying elements out on the grid described by `layout`.
    fn convert_complete_system(
        &self,
        spec: &Value,
        layout: &LayoutConfig,
    ) -> Result<SystemFragment, ConvertError>;
}

static CLASS: ClassDiagramConverter = ClassDiagramConverter;
static OBJECT: ObjectDiagramConverter = ObjectDiagramConverter;
static STATE_MACHINE: StateMachineConverter = StateMachineConverter;
static AGENT: AgentDiagramConverter = AgentDiagramConverter;

pub fn converter_for(diagram_type: DiagramType) -> &'static dyn Converter {
    match diagram_type {
        DiagramType::ClassDiagram => &CLASS,
        DiagramType::ObjectDiagram => &OBJECT,
        DiagramType::StateMachineDiagram => &STATE_MACHINE,
        DiagramType::AgentDiagram => &AGENT,
    }
}

/// Hands out grid cells in row-major order, skipping cells that are already taken.
///
/// Two positions handed out by the same generator are never equal.
#[derive(Debug, Clone)]
pub struct PositionGenerator {
    layout: LayoutConfig,
    used: HashSet<(i64, i64)>,
    next_index: usize,
}

impl PositionGenerator {
    pub fn new(layout: LayoutConfig) -> Self {
        Self {
            layout,
            used: HashSet::new(),
            next_index: 0,
        }
    }

    /// A generator that avoids the positions of the document's top-level elements.
    pub fn for_document(layout: LayoutConfig, doc: &Document) -> Self {
        let mut generator = Self::new(layout);
        for element in doc.elements().values() {
            if element.owner.is_none() {
                generator.mark_used(element.bounds.origin());
            }
        }
        generator
    }

    pub fn mark_used(&mut self, position: Point) {
        self.used.insert(cell_key(position));
    }

    pub fn next_position(&mut self) -> Point {
        loop {
            let candidate = self.layout.cell(self.next_index);
            self.next_index += 1;
            if self.used.insert(cell_key(candidate)) {
                return candidate;
            }
        }
    }

    pub fn reset(&mut self) {
        self.used.clear();
        self.next_index = 0;
    }
}

fn cell_key(position: Point) -> (i64, i64) {
    (position.x.round() as i64, position.y.round() as i64)
}

pub(crate) fn parse_spec<T: DeserializeOwned>(
    diagram_type: DiagramType,
    spec: &Value,
) -> Result<T, ConvertError> {
    T::deserialize(spec).map_err(|err| ConvertError::InvalidSpecification {
        diagram_type,
        reason: err.to_string(),
    })
}

/// Resolves a relationship endpoint name against the names registered while converting.
pub(crate) fn resolve_endpoint<'a>(
    diagram_type: DiagramType,
    registry: &'a IndexMap<String, ElementId>,
    relation: &'static str,
    index: usize,
    field: &'static str,
    name: Option<&str>,
) -> Result<&'a ElementId, ConvertError> {
    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(ConvertError::MissingEndpoint {
            diagram_type,
            relation,
            index,
            field,
        })?;
    registry
        .get(name)
        .ok_or_else(|| ConvertError::UnknownEndpoint {
            diagram_type,
            name: name.to_owned(),
        })
}

/// Accepts `"text"` or `{ "text": "...", ... }` for body-like entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextSpec {
    Plain(String),
    Detailed {
        text: String,
        #[serde(default, rename = "replyType")]
        reply_type: Option<String>,
    },
}

impl TextSpec {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Detailed { text, .. } => text,
        }
    }

    pub fn reply_type(&self) -> Option<&str> {
        match self {
            Self::Plain(_) => None,
            Self::Detailed { reply_type, .. } => reply_type.as_deref(),
        }
    }
}
