// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The modeling service: owns the current document and routes inbound messages to converters
//! and modifiers.
//!
//! Converters and modifiers are pure. The service is the only stateful piece: it merges their
//! output into the current document, persists the result, and only then hands it to the
//! renderer. A persistence failure aborts before the renderer is touched, and a failed
//! instruction never reaches either collaborator.

use async_trait::async_trait;
use log::{debug, info, trace, warn};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::config::Config;
use crate::convert::{converter_for, ConvertError, Fragment, PositionGenerator, SystemFragment};
use crate::model::lookup::clone_document;
use crate::model::{DiagramType, Document};
use crate::ops::{modifier_for, Action, Instruction, ModifyError};
use crate::store::StoreError;

/// The record handed to the persistence dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramUpdate {
    pub model: Document,
    /// RFC 3339 UTC timestamp.
    pub last_update: String,
}

impl DiagramUpdate {
    pub fn now(model: Document) -> Self {
        let last_update = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        Self { model, last_update }
    }
}

/// Persistence dispatcher. Resolves once the update is durably applied; a rejection is an
/// error, never a silent success.
#[async_trait]
pub trait ModelStore: Send + Sync {
    async fn update_diagram(&self, update: DiagramUpdate) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer rejected the model: {reason}")]
    Rejected { reason: String },
}

/// Handle on the external diagram renderer.
#[async_trait]
pub trait Renderer: Send {
    async fn set_model(&mut self, model: &Document) -> Result<(), RenderError>;

    /// Resolves once the model set last has been painted.
    async fn next_paint(&mut self) -> Result<(), RenderError>;
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("`{action}` failed on {diagram_type}: {source}")]
    Modify {
        diagram_type: DiagramType,
        action: Action,
        source: ModifyError,
    },

    #[error("{source}")]
    Convert {
        diagram_type: DiagramType,
        source: ConvertError,
    },

    #[error("`{action}` is not supported for {diagram_type}")]
    UnsupportedAction {
        diagram_type: DiagramType,
        action: Action,
    },

    #[error("failed to persist model: {0}")]
    Persist(#[from] StoreError),

    #[error("failed to render model: {0}")]
    Render(#[from] RenderError),

    #[error("invalid replacement model: {0}")]
    InvalidModel(#[source] serde_json::Error),

    #[error("invalid message: {reason}")]
    InvalidMessage { reason: String },
}

impl ServiceError {
    fn convert(source: ConvertError) -> Self {
        Self::Convert {
            diagram_type: source.diagram_type(),
            source,
        }
    }
}

/// The result of processing one instruction, not yet merged into the current document.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelUpdate {
    Element { fragment: Fragment, message: String },
    System { fragment: SystemFragment, message: String },
    Document { document: Document, message: String },
}

impl ModelUpdate {
    pub fn message(&self) -> &str {
        match self {
            Self::Element { message, .. }
            | Self::System { message, .. }
            | Self::Document { message, .. } => message,
        }
    }

    /// Merges this update into `doc`, returning the new document.
    pub fn apply_to(self, doc: &Document) -> Document {
        match self {
            Self::Element { fragment, .. } => merge_element_into_model(doc, fragment),
            Self::System { fragment, .. } => merge_system_into_model(doc, fragment),
            Self::Document { document, .. } => document,
        }
    }
}

/// Inserts a single-element fragment (main element, children, relationships) into a copy of
/// `doc`. Ids in the fragment overwrite existing ones.
pub fn merge_element_into_model(doc: &Document, fragment: Fragment) -> Document {
    let mut next = clone_document(doc);
    let (elements, relationships) = fragment.into_elements();
    for element in elements {
        next.insert_element(element);
    }
    for relationship in relationships.into_values() {
        next.insert_relationship(relationship);
    }
    next
}

/// Inserts every element and relationship of a system fragment into a copy of `doc`, adopting
/// the fragment's canvas size when `doc` has none.
pub fn merge_system_into_model(doc: &Document, fragment: SystemFragment) -> Document {
    let mut next = clone_document(doc);
    for element in fragment.elements.into_values() {
        next.insert_element(element);
    }
    for relationship in fragment.relationships.into_values() {
        next.insert_relationship(relationship);
    }
    if next.size().is_none() {
        next.set_size(Some(fragment.size));
    }
    next
}

/// One inbound message, in any of the shapes the assistant sends.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    InjectElement {
        element: Value,
        diagram_type: Option<DiagramType>,
    },
    InjectCompleteSystem {
        system_spec: Value,
        diagram_type: Option<DiagramType>,
    },
    ModifyModel {
        modification: Instruction,
    },
    /// Whole-document replacement. Missing `type`/`version` are taken from the current model.
    ReplaceModel {
        model: Value,
    },
}

#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ActionMessage {
    InjectElement {
        element: Value,
        #[serde(default, rename = "diagramType")]
        diagram_type: Option<DiagramType>,
    },
    InjectCompleteSystem {
        #[serde(rename = "systemSpec")]
        system_spec: Value,
        #[serde(default, rename = "diagramType")]
        diagram_type: Option<DiagramType>,
    },
    ModifyModel {
        modification: Instruction,
    },
}

impl TryFrom<Value> for InboundMessage {
    type Error = ServiceError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if value.get("action").is_some() {
            let message = ActionMessage::deserialize(&value).map_err(|err| {
                ServiceError::InvalidMessage {
                    reason: err.to_string(),
                }
            })?;
            return Ok(match message {
                ActionMessage::InjectElement {
                    element,
                    diagram_type,
                } => Self::InjectElement {
                    element,
                    diagram_type,
                },
                ActionMessage::InjectCompleteSystem {
                    system_spec,
                    diagram_type,
                } => Self::InjectCompleteSystem {
                    system_spec,
                    diagram_type,
                },
                ActionMessage::ModifyModel { modification } => Self::ModifyModel { modification },
            });
        }

        match value {
            Value::Object(mut map) if map.contains_key("model") => Ok(Self::ReplaceModel {
                model: map.remove("model").unwrap_or(Value::Null),
            }),
            _ => Err(ServiceError::InvalidMessage {
                reason: "expected an `action` or a `model` field".to_owned(),
            }),
        }
    }
}

impl InboundMessage {
    pub fn from_json(line: &str) -> Result<Self, ServiceError> {
        let value: Value =
            serde_json::from_str(line).map_err(|err| ServiceError::InvalidMessage {
                reason: err.to_string(),
            })?;
        Self::try_from(value)
    }
}

pub struct ModelingService<S, R> {
    current_model: Document,
    current_diagram_type: DiagramType,
    store: S,
    renderer: Option<R>,
    config: Config,
}

impl<S, R> ModelingService<S, R>
where
    S: ModelStore,
    R: Renderer,
{
    pub fn new(model: Document, store: S, config: Config) -> Self {
        Self {
            current_diagram_type: model.diagram_type(),
            current_model: model,
            store,
            renderer: None,
            config,
        }
    }

    pub fn current_model(&self) -> &Document {
        &self.current_model
    }

    pub fn current_diagram_type(&self) -> DiagramType {
        self.current_diagram_type
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// Replaces the held document without persisting or rendering it.
    pub fn update_current_model(&mut self, model: Document) {
        self.current_diagram_type = model.diagram_type();
        self.current_model = model;
    }

    pub fn update_editor_reference(&mut self, renderer: R) {
        self.renderer = Some(renderer);
    }

    /// Converts one element specification, placed at the next free grid cell of the current
    /// document.
    pub fn process_simple_class_spec(
        &self,
        spec: &Value,
        diagram_type: Option<DiagramType>,
    ) -> Result<ModelUpdate, ServiceError> {
        let diagram_type = diagram_type.unwrap_or(self.current_diagram_type);
        let position =
            PositionGenerator::for_document(self.config.layout, &self.current_model).next_position();
        let fragment = converter_for(diagram_type)
            .convert_single_element(spec, position)
            .map_err(ServiceError::convert)?;
        debug!(
            diagram_type:% = diagram_type,
            element_id = fragment.main_element().id.as_str();
            "Converted element"
        );
        Ok(ModelUpdate::Element {
            fragment,
            message: format!("Created element in {diagram_type}"),
        })
    }

    pub fn process_system_spec(
        &self,
        spec: &Value,
        diagram_type: Option<DiagramType>,
    ) -> Result<ModelUpdate, ServiceError> {
        let diagram_type = diagram_type.unwrap_or(self.current_diagram_type);
        let fragment = converter_for(diagram_type)
            .convert_complete_system(spec, &self.config.layout)
            .map_err(ServiceError::convert)?;
        debug!(
            diagram_type:% = diagram_type,
            elements = fragment.elements.len(),
            relationships = fragment.relationships.len();
            "Converted system"
        );
        Ok(ModelUpdate::System {
            fragment,
            message: format!("Created complete {diagram_type} system"),
        })
    }

    /// Applies `instruction` to the current document with the modifier of the current diagram
    /// type. The action is checked against the modifier before anything runs.
    pub fn process_model_modification(
        &self,
        instruction: &Instruction,
    ) -> Result<ModelUpdate, ServiceError> {
        let diagram_type = self.current_diagram_type;
        let modifier = modifier_for(diagram_type);
        if !modifier.can_handle(&instruction.action) {
            return Err(ServiceError::UnsupportedAction {
                diagram_type,
                action: instruction.action.clone(),
            });
        }

        let document = modifier
            .apply(&self.current_model, instruction)
            .map_err(|source| ServiceError::Modify {
                diagram_type,
                action: instruction.action.clone(),
                source,
            })?;
        let message = instruction
            .message
            .clone()
            .unwrap_or_else(|| format!("Applied {} to {diagram_type}", instruction.action));
        Ok(ModelUpdate::Document { document, message })
    }

    /// Merges `update` into the current document, persists it, then renders it.
    pub async fn inject_to_editor(&mut self, update: ModelUpdate) -> Result<String, ServiceError> {
        let message = update.message().to_owned();
        let merged = update.apply_to(&self.current_model);
        self.commit(merged).await?;
        Ok(message)
    }

    /// Persists and renders `model` as the new current document.
    pub async fn replace_model(&mut self, model: Document) -> Result<(), ServiceError> {
        self.commit(model).await
    }

    async fn commit(&mut self, model: Document) -> Result<(), ServiceError> {
        trace!(model:?; "Committing model");
        self.store
            .update_diagram(DiagramUpdate::now(model.clone()))
            .await?;
        self.update_current_model(model);

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_model(&self.current_model).await?;
            renderer.next_paint().await?;
        }
        Ok(())
    }

    /// Runs one inbound message through the whole pipeline and returns the outcome message.
    pub async fn handle(&mut self, message: InboundMessage) -> Result<String, ServiceError> {
        let outcome = match message {
            InboundMessage::InjectElement {
                element,
                diagram_type,
            } => {
                let update = self.process_simple_class_spec(&element, diagram_type);
                self.commit_update(update).await
            }
            InboundMessage::InjectCompleteSystem {
                system_spec,
                diagram_type,
            } => {
                let update = self.process_system_spec(&system_spec, diagram_type);
                self.commit_update(update).await
            }
            InboundMessage::ModifyModel { modification } => {
                let update = self.process_model_modification(&modification);
                self.commit_update(update).await
            }
            InboundMessage::ReplaceModel { model } => {
                match Document::from_partial(model, &self.current_model) {
                    Ok(document) => self
                        .replace_model(document)
                        .await
                        .map(|()| "Replaced model".to_owned()),
                    Err(err) => Err(ServiceError::InvalidModel(err)),
                }
            }
        };

        match &outcome {
            Ok(message) => info!(
                diagram_type:% = self.current_diagram_type,
                elements = self.current_model.elements().len(),
                relationships = self.current_model.relationships().len();
                "{message}"
            ),
            Err(err) => warn!(err:%; "Instruction rejected"),
        }
        outcome
    }

    async fn commit_update(
        &mut self,
        update: Result<ModelUpdate, ServiceError>,
    ) -> Result<String, ServiceError> {
        self.inject_to_editor(update?).await
    }
}

#[cfg(test)]
mod tests;
