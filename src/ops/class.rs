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
    remove_relationship_by_id, Action, Instruction, Modifier, ModifyError, TargetKind,
};
use crate::convert::class::{
    class_relationship, DEFAULT_SOURCE_MULTIPLICITY, DEFAULT_TARGET_MULTIPLICITY,
};
use crate::label::{
    attribute_member_name, decode_attribute, decode_method, encode_attribute, encode_method,
    method_member_name, DEFAULT_ATTRIBUTE_TYPE, DEFAULT_RETURN_TYPE,
};
use crate::model::lookup::find_element_by_name_in;
use crate::model::{
    ChildList, DiagramType, Document, ElementId, ElementKind, RelationshipKind,
};

const CLASS_KINDS: [ElementKind; 4] = [
    ElementKind::Class,
    ElementKind::AbstractClass,
    ElementKind::Interface,
    ElementKind::Enumeration,
];

const DEFAULT_RELATIONSHIP_TYPE: &str = "Association";

static ACTIONS: [Action; 5] = [
    Action::ModifyClass,
    Action::ModifyAttribute,
    Action::ModifyMethod,
    Action::AddRelationship,
    Action::RemoveElement,
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ClassDiagramModifier;

impl Modifier for ClassDiagramModifier {
    fn diagram_type(&self) -> DiagramType {
        DiagramType::ClassDiagram
    }

    fn supported_actions(&self) -> &'static [Action] {
        &ACTIONS
    }

    fn apply(&self, doc: &Document, instruction: &Instruction) -> Result<Document, ModifyError> {
        edit_clone(self, doc, instruction, |doc| match &instruction.action {
            Action::ModifyClass => modify_class(doc, instruction),
            Action::ModifyAttribute => modify_attribute(doc, instruction),
            Action::ModifyMethod => modify_method(doc, instruction),
            Action::AddRelationship => add_relationship(doc, instruction),
            Action::RemoveElement => remove_element(doc, instruction),
            other => Err(ModifyError::UnsupportedAction {
                diagram_type: DiagramType::ClassDiagram,
                action: other.clone(),
            }),
        })
    }
}

/// Resolves a class by id or by exact name.
fn class_ref(doc: &Document, reference: &str, kind: TargetKind) -> Result<ElementId, ModifyError> {
    if let Some(element) = doc.element(reference) {
        if CLASS_KINDS.contains(&element.kind) {
            return Ok(element.id.clone());
        }
    }
    find_element_by_name_in(doc, reference, &CLASS_KINDS)
        .cloned()
        .ok_or_else(|| ModifyError::unresolved(kind, reference))
}

/// The class named by `target.classId` / `target.className`, if the instruction names one.
fn named_class(doc: &Document, instruction: &Instruction) -> Result<Option<ElementId>, ModifyError> {
    let target = &instruction.target;
    if let Some(id) = candidates([target.class_id.as_ref()]).next() {
        return element_by_id(doc, id, &CLASS_KINDS, TargetKind::Class).map(Some);
    }
    match candidates([target.class_name.as_ref()]).next() {
        Some(name) => class_ref(doc, name, TargetKind::Class).map(Some),
        None => Ok(None),
    }
}

fn modify_class(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let resolved = match named_class(doc, instruction) {
        Ok(Some(id)) => Ok(id),
        Ok(None) => candidates([instruction.changes.previous_name.as_ref()])
            .next()
            .ok_or(ModifyError::MissingTarget {
                action: instruction.action.clone(),
                kind: TargetKind::Class,
            })
            .and_then(|previous| class_ref(doc, previous, TargetKind::Class)),
        Err(err) => Err(err),
    };

    // A class already carrying the new name means the rename was applied to an older snapshot.
    let class_id = match resolved {
        Ok(id) => id,
        Err(err) => candidates([instruction.changes.name.as_ref()])
            .next()
            .and_then(|name| class_ref(doc, name, TargetKind::Class).ok())
            .ok_or(err)?,
    };

    if let Some(name) = instruction.changes.name.as_deref() {
        if let Some(class) = doc.element_mut(class_id.as_str()) {
            class.name = name.to_owned();
        }
    }
    Ok(())
}

/// Which member list a lookup walks, and how to pull the bare member name out of a label.
#[derive(Debug, Clone)]
struct MemberScope {
    list: ChildList,
    kind: ElementKind,
    target_kind: TargetKind,
    member_name: fn(&str) -> String,
}

const ATTRIBUTES: MemberScope = MemberScope {
    list: ChildList::Attributes,
    kind: ElementKind::ClassAttribute,
    target_kind: TargetKind::Attribute,
    member_name: attribute_member_name,
};

const METHODS: MemberScope = MemberScope {
    list: ChildList::Methods,
    kind: ElementKind::ClassMethod,
    target_kind: TargetKind::Method,
    member_name: method_member_name,
};

/// Finds a member among `pool` by normalized name, falling back to a substring match.
fn match_member(
    doc: &Document,
    pool: &[ElementId],
    scope: &MemberScope,
    names: &[&str],
) -> Option<ElementId> {
    let members = pool
        .iter()
        .filter_map(|id| doc.element(id.as_str()))
        .filter(|element| element.kind == scope.kind)
        .collect::<Vec<_>>();

    let exact = names.iter().find_map(|name| {
        let wanted = (scope.member_name)(name).to_lowercase();
        members
            .iter()
            .find(|member| (scope.member_name)(&member.name).to_lowercase() == wanted)
    });
    let fuzzy = || {
        names.iter().find_map(|name| {
            let wanted = name.to_lowercase();
            members
                .iter()
                .find(|member| member.name.to_lowercase().contains(&wanted))
        })
    };

    exact.or_else(fuzzy).map(|member| member.id.clone())
}

/// Resolves an attribute or method: explicit id first, then the candidate names from the
/// member-name field, `changes.previousName` and `changes.name`, scoped to the named class
/// when there is one.
fn resolve_member(
    doc: &Document,
    instruction: &Instruction,
    scope: &MemberScope,
) -> Result<ElementId, ModifyError> {
    let target = &instruction.target;
    let (id_field, name_field) = match scope.list {
        ChildList::Methods => (target.method_id.as_ref(), target.method_name.as_ref()),
        _ => (target.attribute_id.as_ref(), target.attribute_name.as_ref()),
    };

    if let Some(id) = candidates([id_field]).next() {
        return element_by_id(doc, id, &[scope.kind.clone()], scope.target_kind);
    }

    let names = candidates([
        name_field,
        instruction.changes.previous_name.as_ref(),
        instruction.changes.name.as_ref(),
    ])
    .collect::<Vec<_>>();
    let Some(first) = names.first().copied() else {
        return Err(ModifyError::MissingTarget {
            action: instruction.action.clone(),
            kind: scope.target_kind,
        });
    };

    let pool = match named_class(doc, instruction)? {
        Some(class_id) => doc
            .element(class_id.as_str())
            .map(|class| class.children(scope.list).to_vec())
            .unwrap_or_default(),
        None => doc
            .elements()
            .values()
            .filter(|element| element.kind == scope.kind)
            .map(|element| element.id.clone())
            .collect(),
    };

    let found = match_member(doc, &pool, scope, &names)
        .ok_or_else(|| ModifyError::unresolved(scope.target_kind, first))?;
    debug!(member = found.as_str(), reference = first; "Resolved class member");
    Ok(found)
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|value| value.trim()).filter(|value| !value.is_empty())
}

fn modify_attribute(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let attribute_id = resolve_member(doc, instruction, &ATTRIBUTES)?;
    let changes = &instruction.changes;

    let Some(attribute) = doc.element_mut(attribute_id.as_str()) else {
        return Err(ModifyError::unresolved(
            TargetKind::Attribute,
            attribute_id.as_str(),
        ));
    };
    let current = decode_attribute(&attribute.name);

    let visibility = changes.visibility.or(current.visibility).unwrap_or_default();
    let name = non_empty(changes.name.as_ref()).unwrap_or(current.name.as_str());
    let type_name = non_empty(changes.type_name.as_ref())
        .or(Some(current.type_name.as_str()).filter(|type_name| !type_name.is_empty()))
        .unwrap_or(DEFAULT_ATTRIBUTE_TYPE);

    attribute.name = encode_attribute(visibility, name, type_name);
    Ok(())
}

fn modify_method(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let method_id = resolve_member(doc, instruction, &METHODS)?;
    let changes = &instruction.changes;

    let Some(method) = doc.element_mut(method_id.as_str()) else {
        return Err(ModifyError::unresolved(TargetKind::Method, method_id.as_str()));
    };
    let current = decode_method(&method.name);

    let visibility = changes.visibility.or(current.visibility).unwrap_or_default();
    let name = non_empty(changes.name.as_ref()).unwrap_or(current.name.as_str());
    let parameters = changes
        .parameters
        .as_deref()
        .unwrap_or(current.parameters.as_slice());
    let return_type = non_empty(changes.return_type.as_ref())
        .or(Some(current.return_type.as_str()).filter(|return_type| !return_type.is_empty()))
        .unwrap_or(DEFAULT_RETURN_TYPE);

    method.name = encode_method(visibility, name, parameters, return_type);
    Ok(())
}

fn add_relationship(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let target = &instruction.target;
    let changes = &instruction.changes;

    let missing = |kind| ModifyError::MissingTarget {
        action: instruction.action.clone(),
        kind,
    };
    let source_ref = candidates([
        changes.source_class.as_ref(),
        target.source_class.as_ref(),
        target.class_name.as_ref(),
    ])
    .next()
    .ok_or_else(|| missing(TargetKind::Source))?;
    let target_ref = candidates([changes.target_class.as_ref(), target.target_class.as_ref()])
        .next()
        .ok_or_else(|| missing(TargetKind::Target))?;

    let source = class_ref(doc, source_ref, TargetKind::Source)?;
    let target_id = class_ref(doc, target_ref, TargetKind::Target)?;

    let kind = RelationshipKind::from_class_logical(
        candidates([changes.relationship_type.as_ref(), changes.type_name.as_ref()])
            .next()
            .unwrap_or(DEFAULT_RELATIONSHIP_TYPE),
    );
    let name = candidates([
        changes.name.as_ref(),
        changes.role_name.as_ref(),
        target.relationship_name.as_ref(),
    ])
    .next()
    .unwrap_or_default();

    let relationship = class_relationship(
        kind,
        source,
        target_id,
        non_empty(changes.source_multiplicity.as_ref()).unwrap_or(DEFAULT_SOURCE_MULTIPLICITY),
        non_empty(changes.target_multiplicity.as_ref()).unwrap_or(DEFAULT_TARGET_MULTIPLICITY),
        name,
    );
    debug!(relationship_id = relationship.id.as_str(), kind = relationship.kind.as_str(); "Adding class relationship");
    doc.insert_relationship(relationship);
    Ok(())
}

/// Removes, in order of precedence: a relationship, an attribute, a method, or a whole class.
fn remove_element(doc: &mut Document, instruction: &Instruction) -> Result<(), ModifyError> {
    let target = &instruction.target;

    if let Some(id) = candidates([target.relationship_id.as_ref()]).next() {
        remove_relationship_by_id(doc, id);
        return Ok(());
    }
    if let Some(name) = candidates([target.relationship_name.as_ref()]).next() {
        let found = doc
            .relationships()
            .values()
            .find(|relationship| relationship.name == name)
            .map(|relationship| relationship.id.clone());
        if let Some(id) = found {
            remove_relationship_by_id(doc, id.as_str());
        }
        return Ok(());
    }
    if let (Some(source), Some(target_ref)) = (
        candidates([target.source_class.as_ref()]).next(),
        candidates([target.target_class.as_ref()]).next(),
    ) {
        let source = class_ref(doc, source, TargetKind::Source)?;
        let target_id = class_ref(doc, target_ref, TargetKind::Target)?;
        remove_relationship_between(doc, &source, &target_id);
        return Ok(());
    }

    let member_scope = if target.attribute_id.is_some() || target.attribute_name.is_some() {
        Some(ATTRIBUTES)
    } else if target.method_id.is_some() || target.method_name.is_some() {
        Some(METHODS)
    } else {
        None
    };
    if let Some(scope) = member_scope {
        let member = resolve_member(doc, instruction, &scope)?;
        doc.remove_element_with_children(member.as_str());
        return Ok(());
    }

    let class_id = named_class(doc, instruction)?.ok_or(ModifyError::MissingTarget {
        action: instruction.action.clone(),
        kind: TargetKind::Class,
    })?;
    let removed = doc.remove_element_with_children(class_id.as_str());
    debug!(class_id = class_id.as_str(), removed = removed.len(); "Removed class");
    Ok(())
}
