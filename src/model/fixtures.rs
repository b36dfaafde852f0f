// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Nereid and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::diagram::{DiagramType, Document};
use super::element::{Bounds, ChildList, Element, ElementKind};
use super::ids::{ElementId, RelationshipId};
use super::relationship::{Direction, Endpoint, Relationship, RelationshipKind};

pub(crate) fn eid(value: &str) -> ElementId {
    ElementId::new(value).expect("element id")
}

pub(crate) fn rid(value: &str) -> RelationshipId {
    RelationshipId::new(value).expect("relationship id")
}

fn child(id: &str, kind: ElementKind, name: &str, owner: &str, y: f64) -> Element {
    Element::new(eid(id), kind, name, Bounds::new(101.0, y, 218.0, 25.0)).with_owner(eid(owner))
}

/// `Library` owns `Book`; `Book` has two attributes and one method.
pub(crate) fn library_class_diagram() -> Document {
    let mut doc = Document::new(DiagramType::ClassDiagram);

    doc.insert_element(
        Element::new(
            eid("class-book"),
            ElementKind::Class,
            "Book",
            Bounds::new(100.0, 100.0, 220.0, 145.0),
        )
        .with_children(
            ChildList::Attributes,
            vec![eid("attr-book-title"), eid("attr-book-isbn")],
        )
        .with_children(ChildList::Methods, vec![eid("method-book-find")]),
    );
    doc.insert_element(child(
        "attr-book-title",
        ElementKind::ClassAttribute,
        "+ title: String",
        "class-book",
        150.0,
    ));
    doc.insert_element(child(
        "attr-book-isbn",
        ElementKind::ClassAttribute,
        "- isbn: str",
        "class-book",
        175.0,
    ));
    doc.insert_element(child(
        "method-book-find",
        ElementKind::ClassMethod,
        "- findBook(title: str): Book",
        "class-book",
        210.0,
    ));

    doc.insert_element(
        Element::new(
            eid("class-library"),
            ElementKind::Class,
            "Library",
            Bounds::new(400.0, 100.0, 220.0, 60.0),
        )
        .with_children(ChildList::Attributes, Vec::new())
        .with_children(ChildList::Methods, Vec::new()),
    );

    doc.insert_relationship(Relationship::new(
        rid("rel-library-book"),
        RelationshipKind::ClassComposition,
        "books",
        Endpoint::new(eid("class-library"), Direction::Left).with_multiplicity("1"),
        Endpoint::new(eid("class-book"), Direction::Right)
            .with_multiplicity("*")
            .with_role("books"),
    ));

    doc
}

/// One class `Book` without attributes or methods.
pub(crate) fn bare_book_class_diagram() -> Document {
    let mut doc = Document::new(DiagramType::ClassDiagram);
    doc.insert_element(
        Element::new(
            eid("class-book"),
            ElementKind::Class,
            "Book",
            Bounds::new(100.0, 100.0, 220.0, 60.0),
        )
        .with_children(ChildList::Attributes, Vec::new())
        .with_children(ChildList::Methods, Vec::new()),
    );
    doc
}

/// Initial node, `Greeting` (no bodies), `Farewell` (one body), and intent `Hello`.
pub(crate) fn greeting_agent_diagram() -> Document {
    let mut doc = Document::new(DiagramType::AgentDiagram);

    doc.insert_element(Element::new(
        eid("initial"),
        ElementKind::StateInitialNode,
        "",
        Bounds::new(-470.0, -30.0, 45.0, 45.0),
    ));
    doc.insert_element(
        Element::new(
            eid("state-greeting"),
            ElementKind::AgentState,
            "Greeting",
            Bounds::new(100.0, 100.0, 210.0, 70.0),
        )
        .with_children(ChildList::Bodies, Vec::new())
        .with_children(ChildList::FallbackBodies, Vec::new()),
    );
    doc.insert_element(
        Element::new(
            eid("state-farewell"),
            ElementKind::AgentState,
            "Farewell",
            Bounds::new(400.0, 100.0, 210.0, 71.0),
        )
        .with_children(ChildList::Bodies, vec![eid("body-farewell-bye")])
        .with_children(ChildList::FallbackBodies, Vec::new()),
    );
    let mut bye = Element::new(
        eid("body-farewell-bye"),
        ElementKind::AgentStateBody,
        "Goodbye!",
        Bounds::new(400.5, 141.0, 209.0, 30.0),
    )
    .with_owner(eid("state-farewell"));
    bye.reply_type = Some("text".to_owned());
    doc.insert_element(bye);

    doc.insert_element(
        Element::new(
            eid("intent-hello"),
            ElementKind::AgentIntent,
            "Hello",
            Bounds::new(-640.0, -350.0, 230.0, 130.0),
        )
        .with_children(ChildList::Bodies, vec![eid("intent-hello-hi")]),
    );
    doc.insert_element(
        Element::new(
            eid("intent-hello-hi"),
            ElementKind::AgentIntentBody,
            "hi there",
            Bounds::new(-639.5, -309.0, 229.0, 30.0),
        )
        .with_owner(eid("intent-hello")),
    );

    doc
}

/// `Idle` and `Running` states with an initial node and one transition.
pub(crate) fn traffic_state_machine() -> Document {
    let mut doc = Document::new(DiagramType::StateMachineDiagram);

    doc.insert_element(Element::new(
        eid("sm-initial"),
        ElementKind::StateInitialNode,
        "",
        Bounds::new(100.0, 100.0, 45.0, 45.0),
    ));
    doc.insert_element(
        Element::new(
            eid("state-idle"),
            ElementKind::State,
            "Idle",
            Bounds::new(400.0, 100.0, 160.0, 100.0),
        )
        .with_children(ChildList::Bodies, vec![eid("body-idle-entry")])
        .with_children(ChildList::FallbackBodies, Vec::new()),
    );
    doc.insert_element(
        Element::new(
            eid("body-idle-entry"),
            ElementKind::StateBody,
            "entry / reset",
            Bounds::new(400.5, 141.0, 159.0, 30.0),
        )
        .with_owner(eid("state-idle")),
    );
    doc.insert_element(
        Element::new(
            eid("state-running"),
            ElementKind::State,
            "Running",
            Bounds::new(700.0, 100.0, 160.0, 100.0),
        )
        .with_children(ChildList::Bodies, Vec::new())
        .with_children(ChildList::FallbackBodies, Vec::new()),
    );

    doc.insert_relationship(Relationship::transition(
        rid("tr-idle-running"),
        RelationshipKind::StateTransition,
        "start",
        eid("state-idle"),
        eid("state-running"),
    ));

    doc
}

/// Objects `alice: Person` (one attribute) and `acme: Company`.
pub(crate) fn people_object_diagram() -> Document {
    let mut doc = Document::new(DiagramType::ObjectDiagram);

    doc.insert_element(
        Element::new(
            eid("obj-alice"),
            ElementKind::ObjectName,
            "alice: Person",
            Bounds::new(100.0, 100.0, 240.0, 110.0),
        )
        .with_children(ChildList::Attributes, vec![eid("obj-alice-age")]),
    );
    doc.insert_element(
        Element::new(
            eid("obj-alice-age"),
            ElementKind::ObjectAttribute,
            "age = 31",
            Bounds::new(101.0, 160.0, 238.0, 30.0),
        )
        .with_owner(eid("obj-alice")),
    );
    doc.insert_element(
        Element::new(
            eid("obj-acme"),
            ElementKind::ObjectName,
            "acme: Company",
            Bounds::new(400.0, 100.0, 240.0, 80.0),
        )
        .with_children(ChildList::Attributes, Vec::new()),
    );

    doc
}
