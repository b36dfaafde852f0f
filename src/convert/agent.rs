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
    PositionGenerator, SystemFragment, TextSpec,
};
use crate::config::LayoutConfig;
use crate::model::{
    Bounds, ChildList, DiagramType, Direction, Element, ElementId, ElementKind, Point,
    Relationship, RelationshipId, RelationshipKind,
};

pub const NODE_SIZE: f64 = 45.0;
pub const STATE_WIDTH: f64 = 210.0;
pub const STATE_MIN_HEIGHT: f64 = 70.0;
pub const INTENT_WIDTH: f64 = 230.0;
pub const INTENT_MIN_HEIGHT: f64 = 130.0;
pub const BODY_HEIGHT: f64 = 30.0;
pub const BODY_OFFSET_Y: f64 = 41.0;
pub const DEFAULT_REPLY_TYPE: &str = "text";

const INITIAL_NODE_POSITION: Point = Point::new(-470.0, -30.0);
const INTENT_ROW_Y: f64 = -350.0;
const INTENT_ROW_START_X: f64 = -640.0;
const INTENT_ROW_STEP: f64 = 260.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStateSpec {
    #[serde(alias = "name")]
    pub state_name: String,
    #[serde(default, alias = "replies")]
    pub bodies: Vec<TextSpec>,
    #[serde(default)]
    pub fallback_bodies: Vec<TextSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentSpec {
    #[serde(alias = "name")]
    pub intent_name: String,
    #[serde(default, alias = "intentBodies", alias = "bodies")]
    pub training_phrases: Vec<TextSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSystemSpec {
    #[serde(default)]
    pub has_initial_node: Option<bool>,
    #[serde(default)]
    pub intents: Vec<IntentSpec>,
    #[serde(default)]
    pub states: Vec<AgentStateSpec>,
    #[serde(default)]
    pub transitions: Vec<AgentTransitionSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentTransitionSpec {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub condition_value: Option<String>,
    #[serde(default)]
    pub source_direction: Option<Direction>,
    #[serde(default)]
    pub target_direction: Option<Direction>,
}

/// What a single-element agent specification describes.
enum AgentElementSpec {
    Initial,
    Intent(IntentSpec),
    State(AgentStateSpec),
}

impl AgentElementSpec {
    fn parse(spec: &Value) -> Result<Self, ConvertError> {
        let declared = spec
            .get("type")
            .and_then(Value::as_str)
            .map(|raw| raw.trim().to_ascii_lowercase());
        match declared.as_deref() {
            Some("initial") => Ok(Self::Initial),
            Some("intent") => parse_spec(DiagramType::AgentDiagram, spec).map(Self::Intent),
            _ if spec.get("intentBodies").is_some() || spec.get("trainingPhrases").is_some() => {
                parse_spec(DiagramType::AgentDiagram, spec).map(Self::Intent)
            }
            _ => parse_spec(DiagramType::AgentDiagram, spec).map(Self::State),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AgentDiagramConverter;

impl AgentDiagramConverter {
    pub fn build_initial_node(&self, position: Point) -> Fragment {
        let node = Element::new(
            ElementId::generate("initial"),
            ElementKind::StateInitialNode,
            "",
            Bounds::at(position, NODE_SIZE, NODE_SIZE),
        );
        Fragment::new(MainElement::InitialNode(node))
    }

    pub fn build_state(&self, spec: &AgentStateSpec, position: Point) -> Fragment {
        let state_id = ElementId::generate("state");
        let body_x = position.x + 0.5;
        let body_width = STATE_WIDTH - 1.0;
        let mut y = position.y + BODY_OFFSET_Y;
        let mut bodies = IndexMap::new();

        let mut body_ids = Vec::new();
        for reply in &spec.bodies {
            let id = ElementId::generate("body");
            let mut body = Element::new(
                id.clone(),
                ElementKind::AgentStateBody,
                reply.text(),
                Bounds::new(body_x, y, body_width, BODY_HEIGHT),
            )
            .with_owner(state_id.clone());
            body.reply_type = Some(reply.reply_type().unwrap_or(DEFAULT_REPLY_TYPE).to_owned());
            bodies.insert(id.clone(), body);
            body_ids.push(id);
            y += BODY_HEIGHT;
        }

        let mut fallback_ids = Vec::new();
        for fallback in &spec.fallback_bodies {
            let id = ElementId::generate("fallback");
            bodies.insert(
                id.clone(),
                Element::new(
                    id.clone(),
                    ElementKind::AgentStateFallbackBody,
                    fallback.text(),
                    Bounds::new(body_x, y, body_width, BODY_HEIGHT),
                )
                .with_owner(state_id.clone()),
            );
            fallback_ids.push(id);
            y += BODY_HEIGHT;
        }

        let height = (y - position.y).max(STATE_MIN_HEIGHT);
        let state = Element::new(
            state_id,
            ElementKind::AgentState,
            spec.state_name.trim(),
            Bounds::at(position, STATE_WIDTH, height),
        )
        .with_children(ChildList::Bodies, body_ids)
        .with_children(ChildList::FallbackBodies, fallback_ids);

        let mut fragment = Fragment::new(MainElement::State(state));
        fragment.bodies = bodies;
        fragment
    }

    pub fn build_intent(&self, spec: &IntentSpec, position: Point) -> Fragment {
        let intent_id = ElementId::generate("intent");
        let mut y = position.y + BODY_OFFSET_Y;
        let mut bodies = IndexMap::new();

        for phrase in &spec.training_phrases {
            let id = ElementId::generate("intentBody");
            bodies.insert(
                id.clone(),
                Element::new(
                    id.clone(),
                    ElementKind::AgentIntentBody,
                    phrase.text(),
                    Bounds::new(position.x + 0.5, y, INTENT_WIDTH - 1.0, BODY_HEIGHT),
                )
                .with_owner(intent_id.clone()),
            );
            y += BODY_HEIGHT;
        }

        let height = (y - position.y + 10.0).max(INTENT_MIN_HEIGHT);
        let intent = Element::new(
            intent_id,
            ElementKind::AgentIntent,
            spec.intent_name.trim(),
            Bounds::at(position, INTENT_WIDTH, height),
        )
        .with_children(ChildList::Bodies, bodies.keys().cloned().collect());

        let mut fragment = Fragment::new(MainElement::Intent(intent));
        fragment.bodies = bodies;
        fragment
    }
}

impl Converter for AgentDiagramConverter {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::AgentDiagram
    }

    fn convert_single_element(
        &self,
        spec: &Value,
        position: Point,
    ) -> Result<Fragment, ConvertError> {
        Ok(match AgentElementSpec::parse(spec)? {
            AgentElementSpec::Initial => self.build_initial_node(position),
            AgentElementSpec::Intent(intent) => self.build_intent(&intent, position),
            AgentElementSpec::State(state) => self.build_state(&state, position),
        })
    }

    fn convert_complete_system(
        &self,
        spec: &Value,
        layout: &LayoutConfig,
    ) -> Result<SystemFragment, ConvertError> {
        let spec: AgentSystemSpec = parse_spec(self.diagram_type(), spec)?;
        let mut positions = PositionGenerator::new(*layout);
        let mut system = SystemFragment::new(self.diagram_type());
        let mut names = IndexMap::new();

        if spec.has_initial_node.unwrap_or(true) {
            let fragment = self.build_initial_node(INITIAL_NODE_POSITION);
            names.insert("initial".to_owned(), fragment.main_element().id.clone());
            system.insert_fragment(fragment);
        }

        for (index, intent_spec) in spec.intents.iter().enumerate() {
            let position = Point::new(
                INTENT_ROW_START_X + INTENT_ROW_STEP * index as f64,
                INTENT_ROW_Y,
            );
            let fragment = self.build_intent(intent_spec, position);
            names
                .entry(intent_spec.intent_name.trim().to_owned())
                .or_insert_with(|| fragment.main_element().id.clone());
            system.insert_fragment(fragment);
        }

        for state_spec in &spec.states {
            let fragment = self.build_state(state_spec, positions.next_position());
            names
                .entry(state_spec.state_name.trim().to_owned())
                .or_insert_with(|| fragment.main_element().id.clone());
            system.insert_fragment(fragment);
        }

        for (index, transition) in spec.transitions.iter().enumerate() {
            let source = resolve_endpoint(
                self.diagram_type(),
                &names,
                "transition",
                index,
                "source",
                transition.source.as_deref(),
            )?;
            let target = resolve_endpoint(
                self.diagram_type(),
                &names,
                "transition",
                index,
                "target",
                transition.target.as_deref(),
            )?;

            let from_initial = system
                .elements
                .get(source)
                .is_some_and(|element| element.kind == ElementKind::StateInitialNode);
            let kind = if from_initial {
                RelationshipKind::AgentStateTransitionInit
            } else {
                RelationshipKind::AgentStateTransition
            };

            let mut relationship = Relationship::transition(
                RelationshipId::generate("transition"),
                kind,
                transition.label.as_deref().unwrap_or_default(),
                source.clone(),
                target.clone(),
            );
            if let Some(direction) = &transition.source_direction {
                relationship.source.direction = direction.clone();
            }
            if let Some(direction) = &transition.target_direction {
                relationship.target.direction = direction.clone();
            }
            if let Some(condition) = transition.condition.as_deref() {
                relationship.condition = Some(condition.to_owned());
                relationship.condition_value =
                    Some(transition.condition_value.clone().unwrap_or_default());
            }
            system.insert_relationship(relationship);
        }

        Ok(system)
    }
}
