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
use crate::label::{
    encode_attribute, encode_method, Parameter, Visibility, DEFAULT_ATTRIBUTE_TYPE,
    DEFAULT_RETURN_TYPE,
};
use crate::model::{
    Bounds, ChildList, DiagramType, Direction, Element, ElementId, ElementKind, Endpoint, Point,
    Relationship, RelationshipId, RelationshipKind,
};

pub const CLASS_WIDTH: f64 = 220.0;
pub const CLASS_HEADER_HEIGHT: f64 = 60.0;
pub const MEMBER_HEIGHT: f64 = 25.0;
pub const SECTION_PADDING: f64 = 10.0;
const MEMBER_OFFSET_Y: f64 = 50.0;

pub const DEFAULT_SOURCE_MULTIPLICITY: &str = "1";
pub const DEFAULT_TARGET_MULTIPLICITY: &str = "*";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSpec {
    #[serde(alias = "name")]
    pub class_name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeSpec>,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSpec {
    pub name: String,
    #[serde(default)]
    pub return_type: String,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSystemSpec {
    #[serde(default)]
    pub system_name: Option<String>,
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
    #[serde(default)]
    pub relationships: Vec<ClassRelationshipSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRelationshipSpec {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, alias = "source")]
    pub source_class: Option<String>,
    #[serde(default, alias = "target")]
    pub target_class: Option<String>,
    #[serde(default)]
    pub source_multiplicity: Option<String>,
    #[serde(default)]
    pub target_multiplicity: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Total height of a class box with the given member counts.
pub fn class_height(attributes: usize, methods: usize) -> f64 {
    let section = |count: usize| {
        if count == 0 {
            0.0
        } else {
            count as f64 * MEMBER_HEIGHT + SECTION_PADDING
        }
    };
    CLASS_HEADER_HEIGHT + section(attributes) + section(methods)
}

/// A class-to-class relationship with the default straight path and zero-size endpoints.
///
/// The relationship name doubles as the target role.
pub fn class_relationship(
    kind: RelationshipKind,
    source: ElementId,
    target: ElementId,
    source_multiplicity: &str,
    target_multiplicity: &str,
    name: &str,
) -> Relationship {
    Relationship::new(
        RelationshipId::generate("rel"),
        kind,
        name,
        Endpoint::new(source, Direction::Left)
            .with_multiplicity(source_multiplicity)
            .with_role("")
            .with_bounds(Bounds::ZERO),
        Endpoint::new(target, Direction::Right)
            .with_multiplicity(target_multiplicity)
            .with_role(name)
            .with_bounds(Bounds::ZERO),
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassDiagramConverter;

impl ClassDiagramConverter {
    pub fn build_class(&self, spec: &ClassSpec, position: Point) -> Fragment {
        let class_id = ElementId::generate("class");
        let row_x = position.x + 1.0;
        let row_width = CLASS_WIDTH - 2.0;

        let mut y = position.y + MEMBER_OFFSET_Y;
        let mut attributes = IndexMap::new();
        for attribute in &spec.attributes {
            let type_name = if attribute.type_name.trim().is_empty() {
                DEFAULT_ATTRIBUTE_TYPE
            } else {
                attribute.type_name.trim()
            };
            let id = ElementId::generate("attr");
            let element = Element::new(
                id.clone(),
                ElementKind::ClassAttribute,
                encode_attribute(
                    attribute.visibility.unwrap_or_default(),
                    attribute.name.trim(),
                    type_name,
                ),
                Bounds::new(row_x, y, row_width, MEMBER_HEIGHT),
            )
            .with_owner(class_id.clone());
            attributes.insert(id, element);
            y += MEMBER_HEIGHT;
        }

        if !spec.attributes.is_empty() {
            y += SECTION_PADDING;
        }

        let mut methods = IndexMap::new();
        for method in &spec.methods {
            let return_type = if method.return_type.trim().is_empty() {
                DEFAULT_RETURN_TYPE
            } else {
                method.return_type.trim()
            };
            let id = ElementId::generate("method");
            let element = Element::new(
                id.clone(),
                ElementKind::ClassMethod,
                encode_method(
                    method.visibility.unwrap_or_default(),
                    method.name.trim(),
                    &method.parameters,
                    return_type,
                ),
                Bounds::new(row_x, y, row_width, MEMBER_HEIGHT),
            )
            .with_owner(class_id.clone());
            methods.insert(id, element);
            y += MEMBER_HEIGHT;
        }

        let class = Element::new(
            class_id,
            ElementKind::Class,
            spec.class_name.trim(),
            Bounds::at(
                position,
                CLASS_WIDTH,
                class_height(spec.attributes.len(), spec.methods.len()),
            ),
        )
        .with_children(ChildList::Attributes, attributes.keys().cloned().collect())
        .with_children(ChildList::Methods, methods.keys().cloned().collect());

        let mut fragment = Fragment::new(MainElement::Class(class));
        fragment.attributes = attributes;
        fragment.methods = methods;
        fragment
    }
}

impl Converter for ClassDiagramConverter {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::ClassDiagram
    }

    fn convert_single_element(
        &self,
        spec: &Value,
        position: Point,
    ) -> Result<Fragment, ConvertError> {
        let spec: ClassSpec = parse_spec(self.diagram_type(), spec)?;
        Ok(self.build_class(&spec, position))
    }

    fn convert_complete_system(
        &self,
        spec: &Value,
        layout: &LayoutConfig,
    ) -> Result<SystemFragment, ConvertError> {
        let spec: ClassSystemSpec = parse_spec(self.diagram_type(), spec)?;
        let mut positions = PositionGenerator::new(*layout);
        let mut system = SystemFragment::new(self.diagram_type());
        let mut names = IndexMap::new();

        for class_spec in &spec.classes {
            let fragment = self.build_class(class_spec, positions.next_position());
            names
                .entry(class_spec.class_name.trim().to_owned())
                .or_insert_with(|| fragment.main_element().id.clone());
            system.insert_fragment(fragment);
        }

        for (index, relationship) in spec.relationships.iter().enumerate() {
            let source = resolve_endpoint(
                self.diagram_type(),
                &names,
                "relationship",
                index,
                "sourceClass",
                relationship.source_class.as_deref(),
            )?;
            let target = resolve_endpoint(
                self.diagram_type(),
                &names,
                "relationship",
                index,
                "targetClass",
                relationship.target_class.as_deref(),
            )?;

            system.insert_relationship(class_relationship(
                RelationshipKind::from_class_logical(&relationship.kind),
                source.clone(),
                target.clone(),
                relationship
                    .source_multiplicity
                    .as_deref()
                    .unwrap_or(DEFAULT_SOURCE_MULTIPLICITY),
                relationship
                    .target_multiplicity
                    .as_deref()
                    .unwrap_or(DEFAULT_TARGET_MULTIPLICITY),
                relationship.name.as_deref().unwrap_or_default(),
            ));
        }

        Ok(system)
    }
}
