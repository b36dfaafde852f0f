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

use super::element::{Bounds, Point};
use super::ids::{deserialize_owner, ElementId, RelationshipId};

/// The `type` discriminant of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelationshipKind {
    ClassBidirectional,
    ClassUnidirectional,
    ClassInheritance,
    ClassRealization,
    ClassComposition,
    ClassAggregation,
    ClassDependency,
    ObjectLink,
    StateTransition,
    StateTransitionInit,
    AgentStateTransition,
    AgentStateTransitionInit,
    Other(String),
}

impl RelationshipKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClassBidirectional => "ClassBidirectional",
            Self::ClassUnidirectional => "ClassUnidirectional",
            Self::ClassInheritance => "ClassInheritance",
            Self::ClassRealization => "ClassRealization",
            Self::ClassComposition => "ClassComposition",
            Self::ClassAggregation => "ClassAggregation",
            Self::ClassDependency => "ClassDependency",
            Self::ObjectLink => "ObjectLink",
            Self::StateTransition => "StateTransition",
            Self::StateTransitionInit => "StateTransitionInit",
            Self::AgentStateTransition => "AgentStateTransition",
            Self::AgentStateTransitionInit => "AgentStateTransitionInit",
            Self::Other(value) => value,
        }
    }

    /// Maps a logical class-relationship name (`"inheritance"`, `"Composition"`, ...) to the
    /// concrete discriminant. Anything unrecognised becomes a plain association.
    pub fn from_class_logical(logical: &str) -> Self {
        match logical.trim().to_ascii_lowercase().as_str() {
            "inheritance" | "generalization" => Self::ClassInheritance,
            "realization" | "implementation" => Self::ClassRealization,
            "composition" => Self::ClassComposition,
            "aggregation" => Self::ClassAggregation,
            "dependency" => Self::ClassDependency,
            "unidirectional" => Self::ClassUnidirectional,
            _ => Self::ClassBidirectional,
        }
    }
}

impl From<&str> for RelationshipKind {
    fn from(value: &str) -> Self {
        match value {
            "ClassBidirectional" => Self::ClassBidirectional,
            "ClassUnidirectional" => Self::ClassUnidirectional,
            "ClassInheritance" => Self::ClassInheritance,
            "ClassRealization" => Self::ClassRealization,
            "ClassComposition" => Self::ClassComposition,
            "ClassAggregation" => Self::ClassAggregation,
            "ClassDependency" => Self::ClassDependency,
            "ObjectLink" => Self::ObjectLink,
            "StateTransition" => Self::StateTransition,
            "StateTransitionInit" => Self::StateTransitionInit,
            "AgentStateTransition" => Self::AgentStateTransition,
            "AgentStateTransitionInit" => Self::AgentStateTransitionInit,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for RelationshipKind {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<RelationshipKind> for String {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Other(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attachment side of a relationship endpoint.
///
/// Port names the editor adds later decode into [`Direction::Other`] and are written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Up,
    #[default]
    Right,
    Down,
    Left,
    Upright,
    Upleft,
    Downright,
    Downleft,
    Topright,
    Topleft,
    Bottomright,
    Bottomleft,
    Center,
    Other(String),
}

impl Direction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Up => "Up",
            Self::Right => "Right",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Upright => "Upright",
            Self::Upleft => "Upleft",
            Self::Downright => "Downright",
            Self::Downleft => "Downleft",
            Self::Topright => "Topright",
            Self::Topleft => "Topleft",
            Self::Bottomright => "Bottomright",
            Self::Bottomleft => "Bottomleft",
            Self::Center => "Center",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Direction {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Up" => Self::Up,
            "Right" => Self::Right,
            "Down" => Self::Down,
            "Left" => Self::Left,
            "Upright" => Self::Upright,
            "Upleft" => Self::Upleft,
            "Downright" => Self::Downright,
            "Downleft" => Self::Downleft,
            "Topright" => Self::Topright,
            "Topleft" => Self::Topleft,
            "Bottomright" => Self::Bottomright,
            "Bottomleft" => Self::Bottomleft,
            "Center" => Self::Center,
            _ => Self::Other(value),
        }
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Other(value) => value,
            known => known.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub element: ElementId,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Endpoint {
    pub fn new(element: ElementId, direction: Direction) -> Self {
        Self {
            element,
            direction,
            multiplicity: None,
            role: None,
            bounds: None,
            extra: Map::new(),
        }
    }

    pub fn with_multiplicity(mut self, multiplicity: impl Into<String>) -> Self {
        self.multiplicity = Some(multiplicity.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// An edge of the diagram document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: RelationshipId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    #[serde(default, deserialize_with = "deserialize_owner")]
    pub owner: Option<ElementId>,
    pub source: Endpoint,
    pub target: Endpoint,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub path: Vec<Point>,
    #[serde(default)]
    pub is_manually_layouted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Relationship {
    /// A relationship with zero bounds and the default left-to-right association path.
    pub fn new(
        id: RelationshipId,
        kind: RelationshipKind,
        name: impl Into<String>,
        source: Endpoint,
        target: Endpoint,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            owner: None,
            source,
            target,
            bounds: Bounds::ZERO,
            path: vec![Point::new(100.0, 10.0), Point::new(0.0, 10.0)],
            is_manually_layouted: false,
            condition: None,
            condition_value: None,
            extra: Map::new(),
        }
    }

    /// A transition: unit-high bounds and a straight rightward path.
    pub fn transition(
        id: RelationshipId,
        kind: RelationshipKind,
        name: impl Into<String>,
        source: ElementId,
        target: ElementId,
    ) -> Self {
        let mut relationship = Self::new(
            id,
            kind,
            name,
            Endpoint::new(source, Direction::Right),
            Endpoint::new(target, Direction::Left),
        );
        relationship.bounds = Bounds::new(0.0, 0.0, 100.0, 1.0);
        relationship.path = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        relationship
    }

    pub fn touches(&self, element: &ElementId) -> bool {
        &self.source.element == element || &self.target.element == element
    }
}
