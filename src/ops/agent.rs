// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use log::debug;

use super::{
    candidates, edit_clone, element_by_id, remove_relationship_between,
    remove_relationship_by_id, transition_end, Action, Instruction, Modifier, ModifyError,
    TargetKind,
};
use crate::convert::agent::{
    BODY_HEIGHT, BODY_OFFSET_Y, DEFAULT_REPLY_TYPE, INTENT_MIN_HEIGHT, INTENT_WIDTH,
    STATE_MIN_HEIGHT, STATE_WIDTH,
};
use crate::model::lookup::find_element_by_name;
use crate::model::{
    Bounds, ChildList, DiagramType, Document, Element, ElementId, ElementKind, Relationship,
    RelationshipId, RelationshipKind,
};

const DEFAULT_BODY_TEXT: &str = "New reply";
const DEFAULT_INTENT_CONDITION: &str = "intent_matched";

/// Space kept below the last body when growing the owner.
const BODY_BOTTOM_PADDING: f64 = 10.0;

const SOURCE_KINDS: [ElementKind; 2] = [ElementKind::AgentState, ElementKind::AgentIntent];
const TARGET_KINDS: [ElementKind; 1] = [ElementKind::AgentState];

static ACTIONS: [Action; 6] = [
    Action::ModifyState,
    Action::ModifyIntent,
    Action::AddTransition,
    Action::RemoveTransition,
    Action::AddStateBody,
    Action::RemoveElement,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct AgentDiagramModifier;

impl Modifier for AgentDiagramModifier {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::AgentDiagram
    }

    fn supported_actions(&self) -> &'static [Action] {
        &ACTIONS
    }

    fn apply(&self, doc: &Document, instruction: &Instruction) -> Result<Document, ModifyError> {
        edit_clone(self, doc, instruction, |doc| match &instruction.action {
            Action::ModifyState => modify_state(doc, instruction),
            Action::ModifyIntent => modify_intent(doc, instruction),
            Action::AddTransition => add_transition(doc, instruction),
            Action::RemoveTransition => remove_transition(doc, instruction),
            Action::AddStateBody => add_state_body(doc, instruction),
            Action::RemoveElement => remove_element(doc, instruction),
            other => Err(ModifyError::UnsupportedAction {
                diagram_type: DiagramType::AgentDiagram,
                action: other.clone(),
            }),
        })
    }
}

/// Id and name fields that identify one kind of top-level agent element.
struct Lookup<'a> {
    id: Option<&'a String>,
    name: Option<&'a String>,
    kind: ElementKind,
    target_kind: TargetKind,
}

impl<'a> Lookup<'a> {
    fn state(instruction: &'a Instruction) -> Self {
        Self {
            id: instruction.target.state_id.as_ref(),
            name: instruction.target.state_name.as_ref(),
            kind: ElementKind::AgentState,
            target_kind: TargetKind::State,
        }
    }

    fn intent(instruction: &'a Instruction) -> Self {
        Self {
            id: instruction.target.intent_id.as_ref(),
            name: instruction.target.intent_name.as_ref(),
            kind: ElementKind::AgentIntent,
            target_kind: TargetKind::Intent,
        }
    }

    fn is_named(&self) -> bool {
        candidates([self.id, self.name]).next().is_some()
    }

    fn resolve(&self, doc: &Document, instruction: &Instruction) -> Result<ElementId, ModifyError> {
        if let Some(id) = candidates([self.id]).next() {
            return element_by_id(doc, id, &[self.kind.clone()], self.target_kind);
        }
        let name = candidates([self.name, instruction.changes.previous_name.as_ref()])
            .next()
            .ok_or(ModifyError::MissingTarget {
                action: instruction.action.clone(),
                kind: self.target_kind,
            })?;
        find_element_by_name(doc, name, &self.kind)
            .cloned()
            .ok_or_else(|| ModifyError::unresolved(self.target_kind, name))
    }
}

fn rename(doc: &mut Document, id: &ElementId, instruction: &Instruction) {
    if let Some(name) = instruction.changes.name.as_deref() {
        if let Some(element) = doc.element_mut(id.as_str()) {
            element.name = name.to_owned();
        }
    }
}

fn modify_state(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let state_id = Lookup::state(instruction).resolve(doc, instruction)?;
    rename(doc, &state_id, instruction);
    Ok(())
}

/// Renames an intent and, when `changes.text` is given, appends it as a training phrase.
fn modify_intent(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let intent_id = Lookup::intent(instruction).resolve(doc, instruction)?;
    rename(doc, &intent_id, instruction);

    if let Some(text) = candidates([instruction.changes.text.as_ref()]).next() {
        let body_id = append_body(
            doc,
            &intent_id,
            TargetKind::Intent,
            NewBody {
                kind: ElementKind::AgentIntentBody,
                text,
                reply_type: None,
                owner_width: INTENT_WIDTH,
                owner_min_height: INTENT_MIN_HEIGHT,
            },
        )?;
        debug!(intent_id = intent_id.as_str(), body_id = body_id.as_str(); "Added training phrase");
    }
    Ok(())
}

fn add_state_body(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let state_id = Lookup::state(instruction).resolve(doc, instruction)?;
    let changes = &instruction.changes;

    let body_id = append_body(
        doc,
        &state_id,
        TargetKind::State,
        NewBody {
            kind: ElementKind::AgentStateBody,
            text: candidates([changes.text.as_ref()])
                .next()
                .unwrap_or(DEFAULT_BODY_TEXT),
            reply_type: Some(
                candidates([changes.reply_type.as_ref()])
                    .next()
                    .unwrap_or(DEFAULT_REPLY_TYPE),
            ),
            owner_width: STATE_WIDTH,
            owner_min_height: STATE_MIN_HEIGHT,
        },
    )?;
    debug!(state_id = state_id.as_str(), body_id = body_id.as_str(); "Added state body");
    Ok(())
}

struct NewBody<'a> {
    kind: ElementKind,
    text: &'a str,
    reply_type: Option<&'a str>,
    owner_width: f64,
    owner_min_height: f64,
}

/// Stacks a new body under the owner's last body (or at the fixed offset below its top) and
/// grows the owner to cover it. Returns the new body id.
fn append_body(
    doc: &mut Document,
    owner_id: &ElementId,
    owner_kind: TargetKind,
    body: NewBody<'_>,
) -> Result<ElementId, ModifyError> {
    let missing_owner = || ModifyError::unresolved(owner_kind, owner_id.as_str());
    let owner = doc.element(owner_id.as_str()).ok_or_else(missing_owner)?;
    let owner_bounds = owner.bounds;
    let y = owner
        .children(ChildList::Bodies)
        .last()
        .and_then(|last| doc.element(last.as_str()))
        .map_or(owner_bounds.y + BODY_OFFSET_Y, |last| last.bounds.bottom());

    let body_id = ElementId::generate("body");
    let mut element = Element::new(
        body_id.clone(),
        body.kind,
        body.text,
        Bounds::new(
            owner_bounds.x + 0.5,
            y,
            body.owner_width - 1.0,
            BODY_HEIGHT,
        ),
    )
    .with_owner(owner_id.clone());
    element.reply_type = body.reply_type.map(str::to_owned);
    doc.insert_element(element);

    let owner = doc.element_mut(owner_id.as_str()).ok_or_else(missing_owner)?;
    owner.children_mut(ChildList::Bodies).push(body_id.clone());
    let needed = y + BODY_HEIGHT + BODY_BOTTOM_PADDING - owner.bounds.y;
    owner.bounds.height = owner
        .bounds
        .height
        .max(needed)
        .max(body.owner_min_height);
    Ok(body_id)
}

fn add_transition(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let target = &instruction.target;
    let changes = &instruction.changes;
    let missing = |kind| ModifyError::MissingTarget {
        action: instruction.action.clone(),
        kind,
    };

    let source_ref = candidates([
        changes.source.as_ref(),
        target.state_name.as_ref(),
        target.intent_name.as_ref(),
    ])
    .next()
    .ok_or_else(|| missing(TargetKind::Source))?;
    let target_ref = candidates([changes.target.as_ref(), target.target_class.as_ref()])
        .next()
        .ok_or_else(|| missing(TargetKind::Target))?;

    let source = transition_end(doc, source_ref, &SOURCE_KINDS, TargetKind::Source, true)?;
    let target_end = transition_end(doc, target_ref, &TARGET_KINDS, TargetKind::Target, false)?;
    let source_intent = doc
        .element(source.id.as_str())
        .filter(|element| element.kind == ElementKind::AgentIntent)
        .map(|intent| intent.name.clone());

    let kind = if source.initial {
        RelationshipKind::AgentStateTransitionInit
    } else {
        RelationshipKind::AgentStateTransition
    };
    let label = candidates([changes.label.as_ref(), changes.name.as_ref()]).next();

    let mut transition = Relationship::transition(
        RelationshipId::generate("transition"),
        kind,
        label.unwrap_or_default(),
        source.id,
        target_end.id,
    );
    let condition = candidates([changes.condition.as_ref()]).next();
    if let Some(intent_name) = source_intent {
        transition.condition = Some(condition.unwrap_or(DEFAULT_INTENT_CONDITION).to_owned());
        transition.condition_value = Some(label.map_or(intent_name, str::to_owned));
    } else if let (Some(condition), false) = (condition, source.initial) {
        transition.condition = Some(condition.to_owned());
        transition.condition_value = Some(label.unwrap_or_default().to_owned());
    }
    doc.insert_relationship(transition);
    Ok(())
}

/// Same matching rules as the state-machine variant: by id, else by source and target names.
fn remove_transition(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let target = &instruction.target;
    let changes = &instruction.changes;

    if let Some(id) = candidates([target.transition_id.as_ref(), target.relationship_id.as_ref()]).next() {
        remove_relationship_by_id(doc, id);
        return Ok(());
    }

    let (Some(source_ref), Some(target_ref)) = (
        candidates([changes.source.as_ref()]).next(),
        candidates([changes.target.as_ref()]).next(),
    ) else {
        return Err(ModifyError::MissingTarget {
            action: instruction.action.clone(),
            kind: TargetKind::Transition,
        });
    };

    let ends = transition_end(doc, source_ref, &SOURCE_KINDS, TargetKind::Source, true).and_then(
        |source| {
            transition_end(doc, target_ref, &TARGET_KINDS, TargetKind::Target, false)
                .map(|target| (source.id, target.id))
        },
    );
    match ends {
        Ok((source, target)) => remove_relationship_between(doc, &source, &target),
        Err(err) => debug!(err:%; "Transition endpoints not found; nothing to remove"),
    }
    Ok(())
}

/// Removes a transition (by id), a state, or an intent, in that order of precedence.
fn remove_element(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    if let Some(id) = candidates([instruction.target.transition_id.as_ref()]).next() {
        remove_relationship_by_id(doc, id);
        return Ok(());
    }

    let intent = Lookup::intent(instruction);
    let element_id = if !Lookup::state(instruction).is_named() && intent.is_named() {
        intent.resolve(doc, instruction)?
    } else {
        Lookup::state(instruction).resolve(doc, instruction)?
    };
    let removed = doc.remove_element_with_children(element_id.as_str());
    debug!(element_id = element_id.as_str(), removed = removed.len(); "Removed agent element");
    Ok(())
}
