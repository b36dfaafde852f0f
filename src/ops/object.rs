// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{
    candidates, edit_clone, element_by_id, remove_relationship_between,
    remove_relationship_by_id, Action, Instruction, Modifier, ModifyError, TargetKind,
};
use crate::convert::object::object_link;
use crate::model::lookup::{find_element_by_name, find_elements_by_type};
use crate::model::{DiagramType, Document, ElementId, ElementKind};

static ACTIONS: [Action; 3] = [Action::ModifyObject, Action::AddLink, Action::RemoveElement];

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectDiagramModifier;

impl Modifier for ObjectDiagramModifier {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::ObjectDiagram
    }

    fn supported_actions(&self) -> &'static [Action] {
        &ACTIONS
    }

    fn apply(&self, doc: &Document, instruction: &Instruction) -> Result<Document, ModifyError> {
        edit_clone(self, doc, instruction, |doc| match &instruction.action {
            Action::ModifyObject => modify_object(doc, instruction),
            Action::AddLink => add_link(doc, instruction),
            Action::RemoveElement => remove_element(doc, instruction),
            other => Err(ModifyError::UnsupportedAction {
                diagram_type: DiagramType::ObjectDiagram,
                action: other.clone(),
            }),
        })
    }
}

/// Resolves an object by id, by its full `"name: Class"` label, or by the name part alone.
fn object_ref(doc: &Document, reference: &str, kind: TargetKind) -> Result<ElementId, ModifyError> {
    if let Some(element) = doc.element(reference) {
        if element.kind == ElementKind::ObjectName {
            return Ok(element.id.clone());
        }
    }
    if let Some(id) = find_element_by_name(doc, reference, &ElementKind::ObjectName) {
        return Ok(id.clone());
    }
    find_elements_by_type(doc, &ElementKind::ObjectName)
        .into_iter()
        .find(|(_, element)| {
            let object_part = element
                .name
                .split_once(':')
                .map_or(element.name.as_str(), |(object, _)| object);
            object_part.trim() == reference
        })
        .map(|(id, _)| id.clone())
        .ok_or_else(|| ModifyError::unresolved(kind, reference))
}

fn resolve_object(doc: &Document, instruction: &Instruction) -> Result<ElementId, ModifyError> {
    let target = &instruction.target;
    if let Some(id) = candidates([target.object_id.as_ref()]).next() {
        return element_by_id(doc, id, &[ElementKind::ObjectName], TargetKind::Object);
    }
    let reference = candidates([
        target.object_name.as_ref(),
        instruction.changes.previous_name.as_ref(),
    ])
    .next()
    .ok_or(ModifyError::MissingTarget {
        action: instruction.action.clone(),
        kind: TargetKind::Object,
    })?;
    object_ref(doc, reference, TargetKind::Object)
}

fn modify_object(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let object_id = resolve_object(doc, instruction)?;
    if let Some(name) = instruction.changes.name.as_deref() {
        if let Some(object) = doc.element_mut(object_id.as_str()) {
            object.name = name.to_owned();
        }
    }
    Ok(())
}

fn add_link(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let target = &instruction.target;
    let changes = &instruction.changes;
    let missing = |kind| ModifyError::MissingTarget {
        action: instruction.action.clone(),
        kind,
    };

    let source_ref = candidates([changes.source.as_ref(), target.object_name.as_ref()])
        .next()
        .ok_or_else(|| missing(TargetKind::Source))?;
    let target_ref = candidates([changes.target.as_ref(), target.target_class.as_ref()])
        .next()
        .ok_or_else(|| missing(TargetKind::Target))?;

    let source = object_ref(doc, source_ref, TargetKind::Source)?;
    let target_id = object_ref(doc, target_ref, TargetKind::Target)?;
    let name = candidates([
        changes.name.as_ref(),
        changes.label.as_ref(),
        changes.relationship_type.as_ref(),
    ])
    .next()
    .unwrap_or_default();

    doc.insert_relationship(object_link(source, target_id, name));
    Ok(())
}

fn remove_element(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let changes = &instruction.changes;

    if let Some(id) = candidates([instruction.target.relationship_id.as_ref()]).next() {
        remove_relationship_by_id(doc, id);
        return Ok(());
    }
    if let (Some(source), Some(target)) = (
        candidates([changes.source.as_ref()]).next(),
        candidates([changes.target.as_ref()]).next(),
    ) {
        let source = object_ref(doc, source, TargetKind::Source)?;
        let target = object_ref(doc, target, TargetKind::Target)?;
        remove_relationship_between(doc, &source, &target);
        return Ok(());
    }

    let object_id = resolve_object(doc, instruction)?;
    doc.remove_element_with_children(object_id.as_str());
    Ok(())
}
