// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use async_trait::async_trait;
use rstest::rstest;
use serde_json::json;
use tokio::sync::Mutex;

use super::{
    merge_system_into_model, DiagramUpdate, InboundMessage, ModelStore, ModelUpdate,
    ModelingService, RenderError, Renderer, ServiceError,
};
use crate::config::Config;
use crate::convert::{converter_for, ConvertError};
use crate::model::fixtures::{greeting_agent_diagram, library_class_diagram};
use crate::model::{DiagramType, Document, ElementKind};
use crate::ops::{Action, Changes, Instruction, Target};
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Persisted { elements: usize, last_update: String },
    SetModel { elements: usize },
    Painted,
}

type Journal = Arc<Mutex<Vec<Event>>>;

struct RecordingStore {
    journal: Journal,
    reject: bool,
}

#[async_trait]
impl ModelStore for RecordingStore {
    async fn update_diagram(&self, update: DiagramUpdate) -> Result<(), StoreError> {
        if self.reject {
            return Err(StoreError::Rejected {
                reason: "read-only".to_owned(),
            });
        }
        self.journal.lock().await.push(Event::Persisted {
            elements: update.model.elements().len(),
            last_update: update.last_update,
        });
        Ok(())
    }
}

struct RecordingRenderer {
    journal: Journal,
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn set_model(&mut self, model: &Document) -> Result<(), RenderError> {
        self.journal.lock().await.push(Event::SetModel {
            elements: model.elements().len(),
        });
        Ok(())
    }

    async fn next_paint(&mut self) -> Result<(), RenderError> {
        self.journal.lock().await.push(Event::Painted);
        Ok(())
    }
}

fn service_with(
    model: Document,
    reject: bool,
) -> (ModelingService<RecordingStore, RecordingRenderer>, Journal) {
    let journal = Journal::default();
    let store = RecordingStore {
        journal: Arc::clone(&journal),
        reject,
    };
    let mut service = ModelingService::new(model, store, Config::default());
    service.update_editor_reference(RecordingRenderer {
        journal: Arc::clone(&journal),
    });
    (service, journal)
}

fn rename_book(new_name: &str) -> Instruction {
    Instruction::new(Action::ModifyClass)
        .with_target(Target {
            class_name: Some("Book".to_owned()),
            ..Target::default()
        })
        .with_changes(Changes {
            name: Some(new_name.to_owned()),
            ..Changes::default()
        })
}

#[tokio::test]
async fn modification_persists_then_renders() {
    let (mut service, journal) = service_with(library_class_diagram(), false);

    let message = service
        .handle(InboundMessage::ModifyModel {
            modification: rename_book("Novel"),
        })
        .await
        .expect("modify");

    assert_eq!(message, "Applied modify_class to ClassDiagram");
    assert_eq!(
        service.current_model().element("class-book").expect("book").name,
        "Novel"
    );

    let events = journal.lock().await.clone();
    assert_eq!(events.len(), 3);
    let Event::Persisted { elements, last_update } = &events[0] else {
        panic!("expected persistence first, got {events:?}");
    };
    assert_eq!(*elements, 5);
    assert!(last_update.ends_with('Z'), "timestamp {last_update}");
    assert_eq!(events[1], Event::SetModel { elements: 5 });
    assert_eq!(events[2], Event::Painted);
}

#[tokio::test]
async fn rejected_persistence_leaves_model_and_renderer_untouched() {
    let (mut service, journal) = service_with(library_class_diagram(), true);

    let err = service
        .handle(InboundMessage::ModifyModel {
            modification: rename_book("Novel"),
        })
        .await
        .expect_err("store rejects");

    assert!(matches!(err, ServiceError::Persist(StoreError::Rejected { .. })));
    assert_eq!(*service.current_model(), library_class_diagram());
    assert!(journal.lock().await.is_empty());
}

#[tokio::test]
async fn unsupported_action_is_rejected_before_any_side_effect() {
    let (mut service, journal) = service_with(library_class_diagram(), false);

    let err = service
        .handle(InboundMessage::ModifyModel {
            modification: Instruction::new(Action::AddStateBody),
        })
        .await
        .expect_err("unsupported");

    assert!(matches!(
        err,
        ServiceError::UnsupportedAction {
            diagram_type: DiagramType::ClassDiagram,
            action: Action::AddStateBody,
        }
    ));
    assert_eq!(*service.current_model(), library_class_diagram());
    assert!(journal.lock().await.is_empty());
}

#[tokio::test]
async fn failed_modification_reports_the_modifier_error() {
    let (mut service, journal) = service_with(library_class_diagram(), false);

    let err = service
        .handle(InboundMessage::ModifyModel {
            modification: Instruction::new(Action::ModifyAttribute).with_target(Target {
                class_name: Some("Book".to_owned()),
                attribute_name: Some("nonexistent".to_owned()),
                ..Target::default()
            }),
        })
        .await
        .expect_err("unresolved");

    assert!(matches!(err, ServiceError::Modify { action: Action::ModifyAttribute, .. }));
    assert!(journal.lock().await.is_empty());
}

#[test]
fn instruction_message_overrides_the_default_outcome() {
    let (service, _journal) = service_with(library_class_diagram(), false);
    let mut instruction = rename_book("Novel");
    instruction.message = Some("Renamed Book".to_owned());

    let update = service
        .process_model_modification(&instruction)
        .expect("modify");
    assert_eq!(update.message(), "Renamed Book");
}

#[tokio::test]
async fn injected_element_lands_in_the_next_free_cell() {
    let (mut service, _journal) = service_with(library_class_diagram(), false);

    let message = service
        .handle(InboundMessage::InjectElement {
            element: json!({ "className": "Member", "attributes": [{ "name": "id", "type": "int" }] }),
            diagram_type: None,
        })
        .await
        .expect("inject");

    assert_eq!(message, "Created element in ClassDiagram");
    let member = service
        .current_model()
        .elements()
        .values()
        .find(|element| element.name == "Member")
        .expect("member");
    assert_eq!((member.bounds.x, member.bounds.y), (700.0, 100.0));
    assert_eq!(service.current_model().elements().len(), 7);
}

#[tokio::test]
async fn injected_system_adopts_canvas_size_and_keeps_existing_elements() {
    let (mut service, _journal) = service_with(Document::new(DiagramType::ClassDiagram), false);
    service
        .handle(InboundMessage::InjectElement {
            element: json!({ "className": "Existing" }),
            diagram_type: None,
        })
        .await
        .expect("inject element");

    let message = service
        .handle(InboundMessage::InjectCompleteSystem {
            system_spec: json!({
                "classes": [{ "className": "A" }, { "className": "B" }],
                "relationships": [{ "type": "Inheritance", "sourceClass": "B", "targetClass": "A" }]
            }),
            diagram_type: None,
        })
        .await
        .expect("inject system");

    assert_eq!(message, "Created complete ClassDiagram system");
    let model = service.current_model();
    assert_eq!(model.elements().len(), 3);
    assert_eq!(model.relationships().len(), 1);
    assert_eq!(model.size(), Some(DiagramType::ClassDiagram.default_size()));
}

#[test]
fn system_merge_keeps_an_existing_canvas_size() {
    let mut doc = Document::new(DiagramType::ClassDiagram);
    let size = crate::model::Size {
        width: 500.0,
        height: 300.0,
    };
    doc.set_size(Some(size));

    let system = converter_for(DiagramType::ClassDiagram)
        .convert_complete_system(&json!({ "classes": [{ "className": "A" }] }), &Default::default())
        .expect("system");
    let merged = merge_system_into_model(&doc, system);

    assert_eq!(merged.size(), Some(size));
    assert!(doc.elements().is_empty());
}

#[test]
fn explicit_diagram_type_overrides_the_current_one() {
    let (service, _journal) = service_with(library_class_diagram(), false);

    let update = service
        .process_simple_class_spec(
            &json!({ "stateName": "Idle", "bodies": [] }),
            Some(DiagramType::AgentDiagram),
        )
        .expect("agent state");
    let ModelUpdate::Element { fragment, message } = update else {
        panic!("expected an element update");
    };
    assert_eq!(fragment.main_element().kind, ElementKind::AgentState);
    assert_eq!(message, "Created element in AgentDiagram");
}

#[tokio::test]
async fn conversion_errors_surface_unchanged() {
    let (mut service, journal) = service_with(library_class_diagram(), false);

    let err = service
        .handle(InboundMessage::InjectElement {
            element: json!({ "attributes": [] }),
            diagram_type: None,
        })
        .await
        .expect_err("no class name");

    assert!(matches!(
        err,
        ServiceError::Convert {
            diagram_type: DiagramType::ClassDiagram,
            source: ConvertError::InvalidSpecification { .. },
        }
    ));
    assert!(journal.lock().await.is_empty());
}

#[tokio::test]
async fn partial_replacement_inherits_type_and_version() {
    let (mut service, journal) = service_with(greeting_agent_diagram(), false);

    service
        .handle(InboundMessage::ReplaceModel {
            model: json!({ "elements": {}, "relationships": {} }),
        })
        .await
        .expect("replace");

    let model = service.current_model();
    assert_eq!(model.diagram_type(), DiagramType::AgentDiagram);
    assert_eq!(model.version(), greeting_agent_diagram().version());
    assert!(model.elements().is_empty());
    assert_eq!(journal.lock().await.len(), 3);
}

#[tokio::test]
async fn replacement_switches_the_active_diagram_type() {
    let (mut service, _journal) = service_with(library_class_diagram(), false);

    service
        .replace_model(greeting_agent_diagram())
        .await
        .expect("replace");

    assert_eq!(service.current_diagram_type(), DiagramType::AgentDiagram);
    let err = service
        .process_model_modification(&rename_book("Novel"))
        .expect_err("class action on agent diagram");
    assert!(matches!(err, ServiceError::UnsupportedAction { .. }));
}

#[tokio::test]
async fn service_without_renderer_still_persists() {
    let journal = Journal::default();
    let store = RecordingStore {
        journal: Arc::clone(&journal),
        reject: false,
    };
    let mut service: ModelingService<_, RecordingRenderer> =
        ModelingService::new(library_class_diagram(), store, Config::default());

    service
        .handle(InboundMessage::ModifyModel {
            modification: rename_book("Novel"),
        })
        .await
        .expect("modify");

    let events = journal.lock().await.clone();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::Persisted { .. }));
}

#[rstest]
#[case(
    r#"{"action":"inject_element","element":{"className":"A"},"diagramType":"ClassDiagram"}"#,
    "inject_element"
)]
#[case(r#"{"action":"inject_complete_system","systemSpec":{"classes":[]}}"#, "inject_complete_system")]
#[case(
    r#"{"action":"modify_model","modification":{"action":"modify_class","target":{"className":"A"}}}"#,
    "modify_model"
)]
#[case(r#"{"model":{"type":"ObjectDiagram","elements":{}}}"#, "replace_model")]
fn inbound_messages_decode_by_shape(#[case] line: &str, #[case] expected: &str) {
    let message = InboundMessage::from_json(line).expect("decode");
    let kind = match message {
        InboundMessage::InjectElement { .. } => "inject_element",
        InboundMessage::InjectCompleteSystem { .. } => "inject_complete_system",
        InboundMessage::ModifyModel { .. } => "modify_model",
        InboundMessage::ReplaceModel { .. } => "replace_model",
    };
    assert_eq!(kind, expected);
}

#[rstest]
#[case(r#"{"action":"teleport"}"#)]
#[case(r#"{"elements":{}}"#)]
#[case("not json")]
fn malformed_inbound_messages_are_rejected(#[case] line: &str) {
    let err = InboundMessage::from_json(line).expect_err("malformed");
    assert!(matches!(err, ServiceError::InvalidMessage { .. }));
}
