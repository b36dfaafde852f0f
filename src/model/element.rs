// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{deserialize_owner, ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin.x, origin.y, width, height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// The `type` discriminant of an element.
///
/// Unknown discriminants (other notations, newer editor versions) are carried verbatim in
/// [`ElementKind::Other`] so a document always round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Class,
    AbstractClass,
    Interface,
    Enumeration,
    ClassAttribute,
    ClassMethod,
    ObjectName,
    ObjectAttribute,
    ObjectMethod,
    State,
    StateBody,
    StateFallbackBody,
    StateInitialNode,
    StateFinalNode,
    AgentState,
    AgentStateBody,
    AgentStateFallbackBody,
    AgentIntent,
    AgentIntentBody,
    Other(String),
}

impl ElementKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Class => "Class",
            Self::AbstractClass => "AbstractClass",
            Self::Interface => "Interface",
            Self::Enumeration => "Enumeration",
            Self::ClassAttribute => "ClassAttribute",
            Self::ClassMethod => "ClassMethod",
            Self::ObjectName => "ObjectName",
            Self::ObjectAttribute => "ObjectAttribute",
            Self::ObjectMethod => "ObjectMethod",
            Self::State => "State",
            Self::StateBody => "StateBody",
            Self::StateFallbackBody => "StateFallbackBody",
            Self::StateInitialNode => "StateInitialNode",
            Self::StateFinalNode => "StateFinalNode",
            Self::AgentState => "AgentState",
            Self::AgentStateBody => "AgentStateBody",
            Self::AgentStateFallbackBody => "AgentStateFallbackBody",
            Self::AgentIntent => "AgentIntent",
            Self::AgentIntentBody => "AgentIntentBody",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for ElementKind {
    fn from(value: &str) -> Self {
        match value {
            "Class" => Self::Class,
            "AbstractClass" => Self::AbstractClass,
            "Interface" => Self::Interface,
            "Enumeration" => Self::Enumeration,
            "ClassAttribute" => Self::ClassAttribute,
            "ClassMethod" => Self::ClassMethod,
            "ObjectName" => Self::ObjectName,
            "ObjectAttribute" => Self::ObjectAttribute,
            "ObjectMethod" => Self::ObjectMethod,
            "State" => Self::State,
            "StateBody" => Self::StateBody,
            "StateFallbackBody" => Self::StateFallbackBody,
            "StateInitialNode" => Self::StateInitialNode,
            "StateFinalNode" => Self::StateFinalNode,
            "AgentState" => Self::AgentState,
            "AgentStateBody" => Self::AgentStateBody,
            "AgentStateFallbackBody" => Self::AgentStateFallbackBody,
            "AgentIntent" => Self::AgentIntent,
            "AgentIntentBody" => Self::AgentIntentBody,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for ElementKind {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Other(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of child-list fields an element may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildList {
    Attributes,
    Methods,
    Bodies,
    FallbackBodies,
}

impl ChildList {
    pub const ALL: [Self; 4] = [
        Self::Attributes,
        Self::Methods,
        Self::Bodies,
        Self::FallbackBodies,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::Methods => "methods",
            Self::Bodies => "bodies",
            Self::FallbackBodies => "fallbackBodies",
        }
    }
}

/// A node of the diagram document.
///
/// `name` is frequently an encoded label (see [`crate::label`]) rather than a bare name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    #[serde(default, deserialize_with = "deserialize_owner")]
    pub owner: Option<ElementId>,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<ElementId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<ElementId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodies: Option<Vec<ElementId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_bodies: Option<Vec<ElementId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Element {
    pub fn new(id: ElementId, kind: ElementKind, name: impl Into<String>, bounds: Bounds) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            owner: None,
            bounds,
            attributes: None,
            methods: None,
            bodies: None,
            fallback_bodies: None,
            reply_type: None,
            extra: Map::new(),
        }
    }

    pub fn with_owner(mut self, owner: ElementId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_children(mut self, list: ChildList, children: Vec<ElementId>) -> Self {
        *self.child_slot(list) = Some(children);
        self
    }

    pub fn children(&self, list: ChildList) -> &[ElementId] {
        let slot = match list {
            ChildList::Attributes => &self.attributes,
            ChildList::Methods => &self.methods,
            ChildList::Bodies => &self.bodies,
            ChildList::FallbackBodies => &self.fallback_bodies,
        };
        slot.as_deref().unwrap_or(&[])
    }

    /// Returns the child list, creating it when the element had none.
    pub fn children_mut(&mut self, list: ChildList) -> &mut Vec<ElementId> {
        self.child_slot(list).get_or_insert_with(Vec::new)
    }

    fn child_slot(&mut self, list: ChildList) -> &mut Option<Vec<ElementId>> {
        match list {
            ChildList::Attributes => &mut self.attributes,
            ChildList::Methods => &mut self.methods,
            ChildList::Bodies => &mut self.bodies,
            ChildList::FallbackBodies => &mut self.fallback_bodies,
        }
    }

    /// Every child id across all child lists, in field order.
    pub fn all_children(&self) -> impl Iterator<Item = &ElementId> + '_ {
        ChildList::ALL
            .into_iter()
            .flat_map(move |list| self.children(list).iter())
    }

    /// Removes `child` from whichever child list holds it. Returns whether anything changed.
    pub fn detach_child(&mut self, child: &ElementId) -> bool {
        let mut changed = false;
        for list in ChildList::ALL {
            if let Some(children) = self.child_slot(list).as_mut() {
                let before = children.len();
                children.retain(|id| id != child);
                changed |= children.len() != before;
            }
        }
        changed
    }
}
