// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;
use serde_json::json;

use super::fixtures::{eid, greeting_agent_diagram, library_class_diagram, rid};
use super::lookup::{
    find_element_by_name, find_elements_by_type, remove_element_with_children,
};
use super::{
    Bounds, ChildList, DanglingReference, DiagramType, Direction, Document, Element, ElementKind,
    RelationshipKind,
};

#[test]
fn document_round_trips_editor_json_including_unknown_fields() {
    let raw = json!({
        "version": "3.0.0",
        "type": "ClassDiagram",
        "size": { "width": 1400, "height": 740 },
        "interactive": { "elements": {}, "relationships": {} },
        "assessments": {},
        "elements": {
            "c1": {
                "id": "c1",
                "name": "Book",
                "type": "Class",
                "owner": null,
                "bounds": { "x": 0, "y": 0, "width": 220, "height": 95 },
                "attributes": ["a1"],
                "methods": [],
                "italic": false,
                "stereotype": null
            },
            "a1": {
                "id": "a1",
                "name": "+ title: String",
                "type": "ClassAttribute",
                "owner": "c1",
                "bounds": { "x": 1, "y": 50, "width": 218, "height": 25 },
                "fillColor": "#ffffff"
            }
        },
        "relationships": {
            "r1": {
                "id": "r1",
                "name": "",
                "type": "ClassOCLConstraintLink",
                "owner": null,
                "source": { "element": "c1", "direction": "Topright" },
                "target": { "element": "c1", "direction": "Bottomleft" },
                "bounds": { "x": 0, "y": 0, "width": 0, "height": 0 },
                "path": [{ "x": 0, "y": 0 }, { "x": 10, "y": 0 }],
                "isManuallyLayouted": true
            }
        }
    });

    let doc: Document = serde_json::from_value(raw.clone()).expect("decode");
    assert_eq!(doc.diagram_type(), DiagramType::ClassDiagram);
    assert_eq!(doc.extra().get("assessments"), Some(&json!({})));

    let class = doc.element("c1").expect("class");
    assert_eq!(class.kind, ElementKind::Class);
    assert_eq!(class.children(ChildList::Attributes), &[eid("a1")]);
    assert_eq!(class.extra.get("italic"), Some(&json!(false)));

    let rel = doc.relationships().get("r1").expect("relationship");
    assert_eq!(
        rel.kind,
        RelationshipKind::Other("ClassOCLConstraintLink".to_owned())
    );
    assert_eq!(rel.source.direction, Direction::Topright);
    assert!(rel.is_manually_layouted);

    let encoded = serde_json::to_value(&doc).expect("encode");
    assert_eq!(encoded["elements"]["a1"]["fillColor"], json!("#ffffff"));
    assert_eq!(encoded["elements"]["c1"]["owner"], json!(null));
    assert_eq!(
        encoded["relationships"]["r1"]["type"],
        json!("ClassOCLConstraintLink")
    );
    assert_eq!(encoded["interactive"], raw["interactive"]);
}

#[test]
fn document_accepts_diagram_type_alias_and_missing_version() {
    let doc: Document = serde_json::from_value(json!({
        "diagramType": "AgentDiagram",
        "elements": {},
        "relationships": {}
    }))
    .expect("decode");

    assert_eq!(doc.diagram_type(), DiagramType::AgentDiagram);
    assert_eq!(doc.version(), "3.0.0");
}

#[test]
fn document_tolerates_blank_owners_and_center_ports() {
    let raw = json!({
        "version": "3.0.0",
        "type": "StateMachineDiagram",
        "elements": {
            "s1": {
                "id": "s1",
                "name": "Idle",
                "type": "State",
                "owner": "",
                "bounds": { "x": 0, "y": 0, "width": 160, "height": 100 }
            }
        },
        "relationships": {
            "t1": {
                "id": "t1",
                "name": "tick",
                "type": "StateTransition",
                "owner": "  ",
                "source": { "element": "s1", "direction": "Center" },
                "target": { "element": "s1", "direction": "Middle" }
            }
        }
    });

    let doc: Document = serde_json::from_value(raw).expect("decode");
    assert_eq!(doc.element("s1").expect("state").owner, None);
    let transition = doc.relationships().get("t1").expect("transition");
    assert_eq!(transition.owner, None);
    assert_eq!(transition.source.direction, Direction::Center);
    assert_eq!(
        transition.target.direction,
        Direction::Other("Middle".to_owned())
    );

    let encoded = serde_json::to_value(&doc).expect("encode");
    assert_eq!(encoded["elements"]["s1"]["owner"], json!(null));
    assert_eq!(
        encoded["relationships"]["t1"]["source"]["direction"],
        json!("Center")
    );
    assert_eq!(
        encoded["relationships"]["t1"]["target"]["direction"],
        json!("Middle")
    );
    let decoded: Document = serde_json::from_value(encoded).expect("decode again");
    assert_eq!(decoded, doc);
}

#[rstest]
#[case("ClassDiagram", DiagramType::ClassDiagram)]
#[case("objectdiagram", DiagramType::ObjectDiagram)]
#[case(" StateMachineDiagram ", DiagramType::StateMachineDiagram)]
#[case("AGENTDIAGRAM", DiagramType::AgentDiagram)]
fn diagram_type_parses_case_insensitively(#[case] raw: &str, #[case] expected: DiagramType) {
    assert_eq!(raw.parse::<DiagramType>().expect("diagram type"), expected);
}

#[test]
fn diagram_type_rejects_unknown_names() {
    let err = "SequenceDiagram".parse::<DiagramType>().expect_err("unknown");
    assert!(err.to_string().contains("SequenceDiagram"));
}

#[test]
fn find_element_by_name_requires_exact_name_and_type() {
    let doc = library_class_diagram();

    assert_eq!(
        find_element_by_name(&doc, "Book", &ElementKind::Class),
        Some(&eid("class-book"))
    );
    assert_eq!(find_element_by_name(&doc, "book", &ElementKind::Class), None);
    assert_eq!(
        find_element_by_name(&doc, "Book", &ElementKind::AgentState),
        None
    );
}

#[test]
fn find_element_by_name_prefers_first_inserted() {
    let mut doc = library_class_diagram();
    doc.insert_element(Element::new(
        eid("class-book-2"),
        ElementKind::Class,
        "Book",
        Bounds::new(700.0, 100.0, 220.0, 60.0),
    ));

    assert_eq!(
        find_element_by_name(&doc, "Book", &ElementKind::Class),
        Some(&eid("class-book"))
    );
}

#[test]
fn find_elements_by_type_keeps_document_order() {
    let doc = library_class_diagram();

    let attributes = find_elements_by_type(&doc, &ElementKind::ClassAttribute)
        .into_iter()
        .map(|(id, _)| id.as_str().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(attributes, vec!["attr-book-title", "attr-book-isbn"]);
}

#[test]
fn cascade_delete_removes_children_and_incident_relationships() {
    let doc = library_class_diagram();

    let next = remove_element_with_children(&doc, "class-book");

    for gone in ["class-book", "attr-book-title", "attr-book-isbn", "method-book-find"] {
        assert!(next.element(gone).is_none(), "{gone} should be removed");
    }
    assert!(next.element("class-library").is_some());
    assert!(next.relationships().is_empty());
    assert!(next.dangling_references().is_empty());

    // Input untouched.
    assert_eq!(doc, library_class_diagram());
}

#[test]
fn cascade_delete_of_missing_id_is_a_no_op() {
    let doc = library_class_diagram();
    let next = remove_element_with_children(&doc, "does-not-exist");
    assert_eq!(next, doc);
}

#[test]
fn removing_an_owned_child_detaches_it_from_its_owner() {
    let mut doc = greeting_agent_diagram();

    let removed = doc.remove_element_with_children("body-farewell-bye");

    assert_eq!(removed, vec![eid("body-farewell-bye")]);
    let farewell = doc.element("state-farewell").expect("state");
    assert!(farewell.children(ChildList::Bodies).is_empty());
    assert!(doc.dangling_references().is_empty());
}

#[test]
fn dangling_references_reports_every_broken_link() {
    let mut doc = library_class_diagram();
    doc.elements_mut().shift_remove("attr-book-title");
    doc.elements_mut().shift_remove("class-library");
    doc.element_mut("method-book-find")
        .expect("method")
        .owner = Some(eid("class-gone"));

    let dangling = doc.dangling_references();

    assert!(dangling.contains(&DanglingReference::Child {
        element: eid("class-book"),
        list: ChildList::Attributes,
        child: eid("attr-book-title"),
    }));
    assert!(dangling.contains(&DanglingReference::Owner {
        element: eid("method-book-find"),
        owner: eid("class-gone"),
    }));
    assert!(dangling.contains(&DanglingReference::Endpoint {
        relationship: rid("rel-library-book"),
        element: eid("class-library"),
    }));
    assert_eq!(dangling.len(), 3);
}

#[test]
fn partial_document_inherits_type_and_version() {
    let current = greeting_agent_diagram();
    let partial = json!({ "elements": {}, "relationships": {} });

    let doc = Document::from_partial(partial, &current).expect("partial");

    assert_eq!(doc.diagram_type(), DiagramType::AgentDiagram);
    assert_eq!(doc.version(), current.version());
    assert!(doc.elements().is_empty());
}
