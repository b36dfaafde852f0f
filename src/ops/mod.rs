// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Modification instructions and the per-diagram-type modifiers that apply them.
//!
//! Modifiers never mutate the caller's document: every instruction is applied to a clone, and
//! the clone is only returned when the whole instruction succeeded. A failed instruction
//! therefore leaves the live document exactly as it was.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::{Parameter, Visibility};
use crate::model::lookup::{clone_document, find_element_by_name_in, find_elements_by_type};
use crate::model::{DiagramType, Document, ElementId, ElementKind};

pub mod agent;
pub mod class;
pub mod object;
pub mod state_machine;

pub use agent::AgentDiagramModifier;
pub use class::ClassDiagramModifier;
pub use object::ObjectDiagramModifier;
pub use state_machine::StateMachineModifier;

/// What an instruction asks a modifier to do.
///
/// Unknown action names are kept verbatim so that they can be reported as unsupported instead
/// of failing to decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    ModifyClass,
    ModifyAttribute,
    ModifyMethod,
    AddRelationship,
    RemoveElement,
    ModifyObject,
    AddLink,
    ModifyState,
    ModifyIntent,
    AddTransition,
    RemoveTransition,
    AddStateBody,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ModifyClass => "modify_class",
            Self::ModifyAttribute => "modify_attribute",
            Self::ModifyMethod => "modify_method",
            Self::AddRelationship => "add_relationship",
            Self::RemoveElement => "remove_element",
            Self::ModifyObject => "modify_object",
            Self::AddLink => "add_link",
            Self::ModifyState => "modify_state",
            Self::ModifyIntent => "modify_intent",
            Self::AddTransition => "add_transition",
            Self::RemoveTransition => "remove_transition",
            Self::AddStateBody => "add_state_body",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for Action {
    fn from(raw: &str) -> Self {
        match raw.trim() {
            "modify_class" => Self::ModifyClass,
            "modify_attribute" => Self::ModifyAttribute,
            "modify_method" => Self::ModifyMethod,
            "add_relationship" => Self::AddRelationship,
            "remove_element" => Self::RemoveElement,
            "modify_object" => Self::ModifyObject,
            "add_link" => Self::AddLink,
            "modify_state" => Self::ModifyState,
            "modify_intent" => Self::ModifyIntent,
            "add_transition" => Self::AddTransition,
            "remove_transition" => Self::RemoveTransition,
            "add_state_body" => Self::AddStateBody,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for Action {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.as_str().to_owned()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies the element(s) an instruction acts on. Ids win over names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Target {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_id: Option<String>,
}

/// New values carried by an instruction. Interpretation depends on the action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Changes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Attribute type for `modify_attribute`, relationship type for `add_relationship`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_multiplicity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_multiplicity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

/// A single requested edit: `{action, target, changes}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub action: Action,
    #[serde(default)]
    pub target: Target,
    #[serde(default)]
    pub changes: Changes,
    /// Free-form text from the assistant, echoed back in the outcome message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Instruction {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            target: Target::default(),
            changes: Changes::default(),
            message: None,
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_changes(mut self, changes: Changes) -> Self {
        self.changes = changes;
        self
    }
}

/// What kind of thing a reference was expected to resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Class,
    Attribute,
    Method,
    Relationship,
    Object,
    State,
    Intent,
    Transition,
    Source,
    Target,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Class => "class",
            Self::Attribute => "attribute",
            Self::Method => "method",
            Self::Relationship => "relationship",
            Self::Object => "object",
            Self::State => "state",
            Self::Intent => "intent",
            Self::Transition => "transition",
            Self::Source => "source element",
            Self::Target => "target element",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModifyError {
    #[error("could not find {kind} `{reference}`")]
    UnresolvedTarget { kind: TargetKind, reference: String },

    #[error("`{action}` needs a {kind} reference")]
    MissingTarget { action: Action, kind: TargetKind },

    #[error("element `{id}` is a {found}, expected {expected}")]
    WrongElementKind {
        id: ElementId,
        expected: ElementKind,
        found: ElementKind,
    },

    #[error("`{action}` is not supported for {diagram_type}")]
    UnsupportedAction {
        diagram_type: DiagramType,
        action: Action,
    },
}

impl ModifyError {
    pub(crate) fn unresolved(kind: TargetKind, reference: &str) -> Self {
        Self::UnresolvedTarget {
            kind,
            reference: reference.to_owned(),
        }
    }
}

pub trait Modifier: Send + Sync {
    fn diagram_type(&self) -> DiagramType;

    /// The closed set of actions this modifier applies.
    fn supported_actions(&self) -> &'static [Action];

    fn can_handle(&self, action: &Action) -> bool {
        self.supported_actions().contains(action)
    }

    /// Applies `instruction` to a clone of `doc` and returns the clone.
    fn apply(&self, doc: &Document, instruction: &Instruction) -> Result<Document, ModifyError>;
}

static CLASS: ClassDiagramModifier = ClassDiagramModifier;
static OBJECT: ObjectDiagramModifier = ObjectDiagramModifier;
static STATE_MACHINE: StateMachineModifier = StateMachineModifier;
static AGENT: AgentDiagramModifier = AgentDiagramModifier;

pub fn modifier_for(diagram_type: DiagramType) -> &'static dyn Modifier {
    match diagram_type {
        DiagramType::ClassDiagram => &CLASS,
        DiagramType::ObjectDiagram => &OBJECT,
        DiagramType::StateMachineDiagram => &STATE_MACHINE,
        DiagramType::AgentDiagram => &AGENT,
    }
}

/// Runs `edit` against a clone of `doc`; the clone is dropped if `edit` fails.
pub(crate) fn edit_clone(
    modifier: &dyn Modifier,
    doc: &Document,
    instruction: &Instruction,
    edit: impl FnOnce(&mut Document) -> Result<(), ModifyError>,
) -> Result<Document, ModifyError> {
    if !modifier.can_handle(&instruction.action) {
        return Err(ModifyError::UnsupportedAction {
            diagram_type: modifier.diagram_type(),
            action: instruction.action.clone(),
        });
    }

    debug!(
        diagram_type:% = modifier.diagram_type(),
        action = instruction.action.as_str();
        "Applying modification"
    );
    let mut next = clone_document(doc);
    edit(&mut next)?;
    Ok(next)
}

/// Trimmed, non-empty candidates in the order given.
pub(crate) fn candidates<'a>(
    values: impl IntoIterator<Item = Option<&'a String>>,
) -> impl Iterator<Item = &'a str> {
    values
        .into_iter()
        .flatten()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Resolves an explicit id of one of `kinds` in `doc`.
pub(crate) fn element_by_id(
    doc: &Document,
    id: &str,
    kinds: &[ElementKind],
    kind: TargetKind,
) -> Result<ElementId, ModifyError> {
    match doc.element(id.trim()) {
        Some(element) if kinds.contains(&element.kind) => Ok(element.id.clone()),
        Some(element) => Err(ModifyError::WrongElementKind {
            id: element.id.clone(),
            expected: kinds.first().cloned().unwrap_or(element.kind.clone()),
            found: element.kind.clone(),
        }),
        None => Err(ModifyError::unresolved(kind, id)),
    }
}

/// A resolved transition endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TransitionEnd {
    pub(crate) id: ElementId,
    pub(crate) initial: bool,
}

/// Resolves a transition endpoint by id or by name among `kinds`.
///
/// With `allow_initial`, the literal name `initial` (any case) resolves to the first initial
/// node of the document, and an initial node id is accepted. Transitions never end in one.
pub(crate) fn transition_end(
    doc: &Document,
    reference: &str,
    kinds: &[ElementKind],
    kind: TargetKind,
    allow_initial: bool,
) -> Result<TransitionEnd, ModifyError> {
    if let Some(element) = doc.element(reference) {
        let initial = element.kind == ElementKind::StateInitialNode;
        if (initial && allow_initial) || kinds.contains(&element.kind) {
            return Ok(TransitionEnd {
                id: element.id.clone(),
                initial,
            });
        }
    }
    if allow_initial && reference.eq_ignore_ascii_case("initial") {
        if let Some((id, _)) = find_elements_by_type(doc, &ElementKind::StateInitialNode)
            .into_iter()
            .next()
        {
            return Ok(TransitionEnd {
                id: id.clone(),
                initial: true,
            });
        }
    }
    find_element_by_name_in(doc, reference, kinds)
        .map(|id| TransitionEnd {
            id: id.clone(),
            initial: false,
        })
        .ok_or_else(|| ModifyError::unresolved(kind, reference))
}

/// Removes the relationship with `id`. Absence is tolerated.
pub(crate) fn remove_relationship_by_id(doc: &mut Document, id: &str) {
    if doc.remove_relationship(id.trim()).is_none() {
        debug!(relationship_id = id; "Relationship already absent");
    }
}

/// Removes the first relationship running from `source` to `target`. Absence is tolerated.
pub(crate) fn remove_relationship_between(doc: &mut Document, source: &ElementId, target: &ElementId) {
    let found = doc
        .relationships()
        .values()
        .find(|relationship| {
            &relationship.source.element == source && &relationship.target.element == target
        })
        .map(|relationship| relationship.id.clone());
    match found {
        Some(id) => {
            doc.remove_relationship(id.as_str());
        }
        None => debug!(source = source.as_str(), target = target.as_str(); "No relationship to remove"),
    }
}
