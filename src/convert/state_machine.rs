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
    Bounds, ChildList, DiagramType, Element, ElementId, ElementKind, Point, Relationship,
    RelationshipId, RelationshipKind,
};

pub const NODE_SIZE: f64 = 45.0;
pub const STATE_WIDTH: f64 = 160.0;
pub const STATE_MIN_HEIGHT: f64 = 100.0;
pub const BODY_HEIGHT: f64 = 30.0;
pub const BODY_OFFSET_Y: f64 = 41.0;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSpec {
    #[serde(default, alias = "name")]
    pub state_name: Option<String>,
    #[serde(default)]
    pub state_type: Option<String>,
    #[serde(default)]
    pub entry_action: Option<String>,
    #[serde(default)]
    pub do_activity: Option<String>,
    #[serde(default)]
    pub exit_action: Option<String>,
    #[serde(default)]
    pub fallback_action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StateShape {
    Initial,
    Final,
    Regular,
}

impl StateSpec {
    fn shape(&self) -> StateShape {
        match self
            .state_type
            .as_deref()
            .map(|raw| raw.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("initial") => StateShape::Initial,
            Some("final") => StateShape::Final,
            _ => StateShape::Regular,
        }
    }

    /// The name transitions use to refer to this state.
    fn reference_name(&self) -> String {
        match self.state_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => match self.shape() {
                StateShape::Final => "final".to_owned(),
                _ => "initial".to_owned(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMachineSystemSpec {
    #[serde(default)]
    pub states: Vec<StateSpec>,
    #[serde(default)]
    pub transitions: Vec<TransitionSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionSpec {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
    #[serde(default)]
    pub guard: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub condition_value: Option<String>,
}

/// `trigger [guard] / effect`, with absent parts left out.
pub fn transition_label(
    trigger: Option<&str>,
    guard: Option<&str>,
    effect: Option<&str>,
) -> String {
    fn present(part: Option<&str>) -> Option<&str> {
        part.map(str::trim).filter(|part| !part.is_empty())
    }

    let mut label = String::new();
    if let Some(trigger) = present(trigger) {
        label.push_str(trigger);
    }
    if let Some(guard) = present(guard) {
        label.push_str(&format!(" [{guard}]"));
    }
    if let Some(effect) = present(effect) {
        label.push_str(&format!(" / {effect}"));
    }
    label.trim_start().to_owned()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StateMachineConverter;

impl StateMachineConverter {
    pub fn build_state(&self, spec: &StateSpec, position: Point) -> Fragment {
        let state_id = ElementId::generate("state");

        let node_kind = match spec.shape() {
            StateShape::Initial => Some(ElementKind::StateInitialNode),
            StateShape::Final => Some(ElementKind::StateFinalNode),
            StateShape::Regular => None,
        };
        if let Some(kind) = node_kind {
            let node = Element::new(
                state_id,
                kind,
                "",
                Bounds::at(position, NODE_SIZE, NODE_SIZE),
            );
            return Fragment::new(MainElement::State(node));
        }

        let body_x = position.x + 0.5;
        let body_width = STATE_WIDTH - 1.0;
        let mut y = position.y + BODY_OFFSET_Y;
        let mut bodies = IndexMap::new();
        let mut body_ids = Vec::new();
        let mut fallback_ids = Vec::new();

        let actions = [
            ("entry", spec.entry_action.as_deref()),
            ("do", spec.do_activity.as_deref()),
            ("exit", spec.exit_action.as_deref()),
        ];
        for (prefix, action) in actions {
            let Some(action) = action.map(str::trim).filter(|action| !action.is_empty()) else {
                continue;
            };
            let id = ElementId::generate("body");
            bodies.insert(
                id.clone(),
                Element::new(
                    id.clone(),
                    ElementKind::StateBody,
                    format!("{prefix} / {action}"),
                    Bounds::new(body_x, y, body_width, BODY_HEIGHT),
                )
                .with_owner(state_id.clone()),
            );
            body_ids.push(id);
            y += BODY_HEIGHT;
        }

        if let Some(fallback) = spec
            .fallback_action
            .as_deref()
            .map(str::trim)
            .filter(|fallback| !fallback.is_empty())
        {
            let id = ElementId::generate("fallback");
            bodies.insert(
                id.clone(),
                Element::new(
                    id.clone(),
                    ElementKind::StateFallbackBody,
                    fallback,
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
            ElementKind::State,
            spec.state_name.as_deref().unwrap_or_default().trim(),
            Bounds::at(position, STATE_WIDTH, height),
        )
        .with_children(ChildList::Bodies, body_ids)
        .with_children(ChildList::FallbackBodies, fallback_ids);

        let mut fragment = Fragment::new(MainElement::State(state));
        fragment.bodies = bodies;
        fragment
    }
}

impl Converter for StateMachineConverter {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::StateMachineDiagram
    }

    fn convert_single_element(
        &self,
        spec: &Value,
        position: Point,
    ) -> Result<Fragment, ConvertError> {
        let spec: StateSpec = parse_spec(self.diagram_type(), spec)?;
        Ok(self.build_state(&spec, position))
    }

    fn convert_complete_system(
        &self,
        spec: &Value,
        layout: &LayoutConfig,
    ) -> Result<SystemFragment, ConvertError> {
        let spec: StateMachineSystemSpec = parse_spec(self.diagram_type(), spec)?;
        let mut positions = PositionGenerator::new(*layout);
        let mut system = SystemFragment::new(self.diagram_type());
        let mut names = IndexMap::new();

        for state_spec in &spec.states {
            let fragment = self.build_state(state_spec, positions.next_position());
            names
                .entry(state_spec.reference_name())
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
                RelationshipKind::StateTransitionInit
            } else {
                RelationshipKind::StateTransition
            };

            let mut relationship = Relationship::transition(
                RelationshipId::generate("transition"),
                kind,
                transition_label(
                    transition.trigger.as_deref(),
                    transition.guard.as_deref(),
                    transition.effect.as_deref(),
                ),
                source.clone(),
                target.clone(),
            );
            relationship.source.bounds = Some(Bounds::ZERO);
            relationship.target.bounds = Some(Bounds::ZERO);
            if !from_initial {
                if let Some(condition) = transition.condition.as_deref() {
                    relationship.condition = Some(condition.to_owned());
                    relationship.condition_value =
                        Some(transition.condition_value.clone().unwrap_or_default());
                }
            }
            system.insert_relationship(relationship);
        }

        Ok(system)
    }
}
