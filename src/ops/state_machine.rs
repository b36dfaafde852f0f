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
use crate::model::lookup::find_element_by_name;
use crate::model::{
    Bounds, DiagramType, Document, ElementId, ElementKind, Relationship, RelationshipId,
    RelationshipKind,
};

const ENDPOINT_KINDS: [ElementKind; 2] = [ElementKind::State, ElementKind::StateFinalNode];

static ACTIONS: [Action; 4] = [
    Action::ModifyState,
    Action::AddTransition,
    Action::RemoveTransition,
    Action::RemoveElement,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct StateMachineModifier;

impl Modifier for StateMachineModifier {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::StateMachineDiagram
    }

    fn supported_actions(&self) -> &'static [Action] {
        &ACTIONS
    }

    fn apply(&self, doc: &Document, instruction: &Instruction) -> Result<Document, ModifyError> {
        edit_clone(self, doc, instruction, |doc| match &instruction.action {
            Action::ModifyState => modify_state(doc, instruction),
            Action::AddTransition => add_transition(doc, instruction),
            Action::RemoveTransition => remove_transition(doc, instruction),
            Action::RemoveElement => remove_element(doc, instruction),
            other => Err(ModifyError::UnsupportedAction {
                diagram_type: DiagramType::StateMachineDiagram,
                action: other.clone(),
            }),
        })
    }
}

fn resolve_state(doc: &Document, instruction: &Instruction) -> Result<ElementId, ModifyError> {
    let target = &instruction.target;
    if let Some(id) = candidates([target.state_id.as_ref()]).next() {
        return element_by_id(doc, id, &[ElementKind::State], TargetKind::State);
    }
    let name = candidates([
        target.state_name.as_ref(),
        instruction.changes.previous_name.as_ref(),
    ])
    .next()
    .ok_or(ModifyError::MissingTarget {
        action: instruction.action.clone(),
        kind: TargetKind::State,
    })?;
    find_element_by_name(doc, name, &ElementKind::State)
        .cloned()
        .ok_or_else(|| ModifyError::unresolved(TargetKind::State, name))
}

fn modify_state(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let state_id = resolve_state(doc, instruction)?;
    if let Some(name) = instruction.changes.name.as_deref() {
        if let Some(state) = doc.element_mut(state_id.as_str()) {
            state.name = name.to_owned();
        }
    }
    Ok(())
}

fn add_transition(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let target = &instruction.target;
    let changes = &instruction.changes;
    let missing = |kind| ModifyError::MissingTarget {
        action: instruction.action.clone(),
        kind,
    };

    let source_ref = candidates([changes.source.as_ref(), target.state_name.as_ref()])
        .next()
        .ok_or_else(|| missing(TargetKind::Source))?;
    let target_ref = candidates([changes.target.as_ref(), target.target_class.as_ref()])
        .next()
        .ok_or_else(|| missing(TargetKind::Target))?;

    let source = transition_end(doc, source_ref, &ENDPOINT_KINDS, TargetKind::Source, true)?;
    let target_end = transition_end(doc, target_ref, &ENDPOINT_KINDS, TargetKind::Target, false)?;

    let kind = if source.initial {
        RelationshipKind::StateTransitionInit
    } else {
        RelationshipKind::StateTransition
    };
    let label = candidates([changes.label.as_ref(), changes.name.as_ref()])
        .next()
        .unwrap_or_default();

    let mut transition = Relationship::transition(
        RelationshipId::generate("transition"),
        kind,
        label,
        source.id,
        target_end.id,
    );
    transition.source.bounds = Some(Bounds::ZERO);
    transition.target.bounds = Some(Bounds::ZERO);
    if !source.initial {
        if let Some(condition) = candidates([changes.condition.as_ref()]).next() {
            transition.condition = Some(condition.to_owned());
            transition.condition_value = Some(label.to_owned());
        }
    }
    doc.insert_relationship(transition);
    Ok(())
}

/// Removes a transition by id, or the first one between the named source and target.
/// Nothing matching is not an error.
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

    let ends = transition_end(doc, source_ref, &ENDPOINT_KINDS, TargetKind::Source, true).and_then(
        |source| {
            transition_end(doc, target_ref, &ENDPOINT_KINDS, TargetKind::Target, false)
                .map(|target| (source.id, target.id))
        },
    );
    match ends {
        Ok((source, target)) => remove_relationship_between(doc, &source, &target),
        Err(err) => debug!(err:%; "Transition endpoints not found; nothing to remove"),
    }
    Ok(())
}

fn remove_element(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    if let Some(id) = candidates([instruction.target.transition_id.as_ref()]).next() {
        remove_relationship_by_id(doc, id);
        return Ok(());
    }
    let state_id = resolve_state(doc, instruction)?;
    doc.remove_element_with_children(state_id.as_str());
    Ok(())
}
