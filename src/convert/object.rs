// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::{
    parse_spec, resolve_endpoint, ConvertError, Converter, Fragment, MainElement,
    PositionGenerator, SystemFragment,
};
use crate::config::LayoutConfig;
use crate::model::{
    Bounds, ChildList, DiagramType, Direction, Element, ElementId, ElementKind, Endpoint, Point,
    Relationship, RelationshipId, RelationshipKind,
};

pub const OBJECT_WIDTH: f64 = 240.0;
pub const OBJECT_BASE_HEIGHT: f64 = 80.0;
pub const SLOT_HEIGHT: f64 = 30.0;
const SLOT_OFFSET_Y: f64 = 60.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSpec {
    #[serde(alias = "name")]
    pub object_name: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub attributes: Vec<SlotSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotSpec {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSystemSpec {
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSpec {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub relationship_type: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `"<object>: <Class>"`, or just the object name when the class is unknown.
pub fn object_label(object_name: &str, class_name: &str) -> String {
    if class_name.trim().is_empty() {
        object_name.trim().to_owned()
    } else {
        format!("{}: {}", object_name.trim(), class_name.trim())
    }
}

pub fn object_link(source: ElementId, target: ElementId, name: &str) -> Relationship {
    Relationship::new(
        RelationshipId::generate("link"),
        RelationshipKind::ObjectLink,
        name,
        Endpoint::new(source, Direction::Left).with_bounds(Bounds::ZERO),
        Endpoint::new(target, Direction::Right).with_bounds(Bounds::ZERO),
    )
}

fn slot_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectDiagramConverter;

impl ObjectDiagramConverter {
    pub fn build_object(&self, spec: &ObjectSpec, position: Point) -> Fragment {
        let object_id = ElementId::generate("object");

        let mut attributes = IndexMap::new();
        let mut y = position.y + SLOT_OFFSET_Y;
        for slot in &spec.attributes {
            let id = ElementId::generate("attr");
            let element = Element::new(
                id.clone(),
                ElementKind::ObjectAttribute,
                format!("{} = {}", slot.name.trim(), slot_value(&slot.value)),
                Bounds::new(position.x + 1.0, y, OBJECT_WIDTH - 2.0, SLOT_HEIGHT),
            )
            .with_owner(object_id.clone());
            attributes.insert(id, element);
            y += SLOT_HEIGHT;
        }

        let height = OBJECT_BASE_HEIGHT + SLOT_HEIGHT * spec.attributes.len() as f64;
        let object = Element::new(
            object_id,
            ElementKind::ObjectName,
            object_label(&spec.object_name, &spec.class_name),
            Bounds::at(position, OBJECT_WIDTH, height),
        )
        .with_children(ChildList::Attributes, attributes.keys().cloned().collect());

        let mut fragment = Fragment::new(MainElement::Object(object));
        fragment.attributes = attributes;
        fragment
    }
}

impl Converter for ObjectDiagramConverter {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::ObjectDiagram
    }

    fn convert_single_element(
        &self,
        spec: &Value,
        position: Point,
    ) -> Result<Fragment, ConvertError> {
        let spec: ObjectSpec = parse_spec(self.diagram_type(), spec)?;
        Ok(self.build_object(&spec, position))
    }

    fn convert_complete_system(
        &self,
        spec: &Value,
        layout: &LayoutConfig,
    ) -> Result<SystemFragment, ConvertError> {
        let spec: ObjectSystemSpec = parse_spec(self.diagram_type(), spec)?;
        let mut positions = PositionGenerator::new(*layout);
        let mut system = SystemFragment::new(self.diagram_type());
        let mut names = IndexMap::new();

        for object_spec in &spec.objects {
            let fragment = self.build_object(object_spec, positions.next_position());
            names
                .entry(object_spec.object_name.trim().to_owned())
                .or_insert_with(|| fragment.main_element().id.clone());
            system.insert_fragment(fragment);
        }

        for (index, link) in spec.links.iter().enumerate() {
            let source = resolve_endpoint(
                self.diagram_type(),
                &names,
                "link",
                index,
                "source",
                link.source.as_deref(),
            )?;
            let target = resolve_endpoint(
                self.diagram_type(),
                &names,
                "link",
                index,
                "target",
                link.target.as_deref(),
            )?;
            let name = link
                .name
                .as_deref()
                .or(link.relationship_type.as_deref())
                .unwrap_or_default();
            system.insert_relationship(object_link(source.clone(), target.clone(), name));
        }

        Ok(system)
    }
}
