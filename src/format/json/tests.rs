// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;
use serde_json::json;

use super::{
    edit_document_schema, edit_from_document, edit_to_document, model_from_json, model_to_json,
    parse_edit, EditDocument, ModelJson, ParseError,
};
use crate::model::fixtures::{ns, rid, shop_model, two_test_collections};
use crate::model::{
    Cardinality, FieldDescriptor, FieldPath, Model, Position, Relationship, RelationshipEndpoint,
};
use crate::ops::{Edit, EditError};

#[test]
fn parses_the_bulk_set_model_document() {
    let edit = parse_edit(r#"{"type":"SetModel","model":{"collections":[],"relationships":[]}}"#)
        .expect("parse");
    assert_eq!(
        edit,
        Edit::SetModel {
            model: Model::empty()
        }
    );
}

#[test]
fn set_model_accepts_missing_lists() {
    let edit = parse_edit(r#"{"type":"SetModel","model":{}}"#).expect("parse");
    assert_eq!(
        edit,
        Edit::SetModel {
            model: Model::empty()
        }
    );
}

#[test]
fn parses_a_full_model_with_relationship_details() {
    let text = json!({
        "type": "SetModel",
        "model": {
            "collections": [
                {"ns": "shop.orders", "position": {"x": 10.0, "y": 20.0},
                 "fields": [{"name": "_id", "type": "objectId"}, {"name": "customer"}]},
                {"ns": "shop.customers"}
            ],
            "relationships": [{
                "id": "r1",
                "relationship": [
                    {"ns": "shop.orders", "fields": ["customer", "id"], "cardinality": "many"},
                    {"ns": "shop.customers", "fields": ["_id"]}
                ],
                "isInferred": true
            }]
        }
    })
    .to_string();

    let Edit::SetModel { model } = parse_edit(&text).expect("parse") else {
        panic!("expected SetModel");
    };

    let orders = model.collection(&ns("shop.orders")).expect("orders");
    assert_eq!(orders.position(), Position::new(10.0, 20.0));
    assert_eq!(
        orders.fields(),
        &[
            FieldDescriptor::new("_id").with_type_hint("objectId"),
            FieldDescriptor::new("customer"),
        ]
    );
    assert_eq!(
        model.collection(&ns("shop.customers")).map(|c| c.position()),
        Some(Position::default())
    );

    let relationship = model.relationship(&rid("r1")).expect("relationship");
    assert!(relationship.is_inferred());
    assert_eq!(relationship.from().cardinality(), Cardinality::Many);
    assert_eq!(
        relationship.from().field().map(ToString::to_string).as_deref(),
        Some("customer.id")
    );
    assert_eq!(relationship.to().cardinality(), Cardinality::One);
}

#[test]
fn relationship_without_id_gets_a_generated_one() {
    let text = json!({
        "type": "AddRelationship",
        "relationship": {"relationship": [{"ns": "db.a"}, {"ns": "db.b"}]}
    })
    .to_string();

    let Edit::AddRelationship { relationship } = parse_edit(&text).expect("parse") else {
        panic!("expected AddRelationship");
    };
    assert!(!relationship.relationship_id().as_str().is_empty());
    assert!(!relationship.is_inferred());
}

#[test]
fn update_relationship_requires_an_id() {
    let text = json!({
        "type": "UpdateRelationship",
        "relationship": {"relationship": [{"ns": "db.a"}, {"ns": "db.b"}]}
    })
    .to_string();

    assert!(matches!(
        parse_edit(&text),
        Err(ParseError::MissingField {
            field: "relationship.id"
        })
    ));
}

#[rstest]
#[case::not_json("{not json")]
#[case::unknown_type(r#"{"type":"Explode"}"#)]
#[case::missing_type(r#"{"model":{}}"#)]
#[case::wrong_shape(r#"{"type":"RemoveCollection","ns":42}"#)]
#[case::three_endpoints(
    r#"{"type":"AddRelationship","relationship":{"relationship":[{"ns":"a.b"},{"ns":"a.c"},{"ns":"a.d"}]}}"#
)]
fn malformed_documents_are_json_errors(#[case] text: &str) {
    assert!(matches!(parse_edit(text), Err(ParseError::Json(_))));
}

#[rstest]
#[case(r#"{"type":"RemoveCollection","ns":"nodot"}"#)]
#[case(r#"{"type":"AddCollection","ns":".coll"}"#)]
#[case(r#"{"type":"RenameCollection","ns":"db.a","newNs":"db."}"#)]
fn invalid_namespaces_are_rejected(#[case] text: &str) {
    assert!(matches!(parse_edit(text), Err(ParseError::InvalidNamespace { .. })));
}

#[test]
fn invalid_ids_and_field_paths_are_rejected() {
    assert!(matches!(
        parse_edit(r#"{"type":"RemoveRelationship","id":"a/b"}"#),
        Err(ParseError::InvalidId { .. })
    ));

    let text = json!({
        "type": "AddRelationship",
        "relationship": {"id": "r", "relationship": [{"ns": "db.a", "fields": []}, {"ns": "db.b"}]}
    })
    .to_string();
    assert!(matches!(parse_edit(&text), Err(ParseError::InvalidFieldPath { .. })));
}

#[test]
fn set_model_with_dangling_relationship_is_an_invalid_model() {
    let text = json!({
        "type": "SetModel",
        "model": {
            "collections": [{"ns": "db.a"}],
            "relationships": [{"id": "r", "relationship": [{"ns": "db.a"}, {"ns": "db.gone"}]}]
        }
    })
    .to_string();

    assert!(matches!(
        parse_edit(&text),
        Err(ParseError::InvalidModel(EditError::UnknownEndpoint { .. }))
    ));
}

#[rstest]
#[case::empty(Model::empty())]
#[case::seeded(two_test_collections())]
#[case::shop(shop_model())]
fn model_survives_a_text_round_trip(#[case] model: Model) {
    let text = serde_json::to_string(&model_to_json(&model)).expect("serialize");
    let parsed: ModelJson = serde_json::from_str(&text).expect("deserialize");
    assert_eq!(model_from_json(parsed).expect("model"), model);
}

#[test]
fn model_json_lists_entries_in_key_order() {
    let json = model_to_json(&shop_model());
    let names = json.collections.iter().map(|c| c.ns.as_str()).collect::<Vec<_>>();
    assert_eq!(
        names,
        vec!["shop.customers", "shop.orders", "shop.products", "shop.reviews"]
    );
}

#[test]
fn rich_relationship_survives_document_conversion() {
    let relationship = Relationship::new(
        rid("r:rich"),
        RelationshipEndpoint::new(ns("shop.orders"))
            .with_field(FieldPath::parse("lines.product_id").unwrap())
            .with_cardinality(Cardinality::Many),
        RelationshipEndpoint::new(ns("shop.products")),
    )
    .inferred(true);
    let edit = Edit::UpdateRelationship { relationship };

    let document = edit_to_document(&edit);
    let text = serde_json::to_string(&document).unwrap();
    let reparsed: EditDocument = serde_json::from_str(&text).unwrap();

    assert_eq!(edit_from_document(reparsed).unwrap(), edit);
}

#[test]
fn rename_document_uses_new_ns_key() {
    let document = edit_to_document(&Edit::RenameCollection {
        from: ns("db.a"),
        to: ns("db.b"),
    });
    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(value, json!({"type": "RenameCollection", "ns": "db.a", "newNs": "db.b"}));
}

#[test]
fn schema_names_every_document_type() {
    let schema = serde_json::to_string(&edit_document_schema()).unwrap();
    for tag in [
        "SetModel",
        "AddCollection",
        "RemoveCollection",
        "MoveCollection",
        "RenameCollection",
        "SetCollectionFields",
        "AddRelationship",
        "UpdateRelationship",
        "RemoveRelationship",
    ] {
        assert!(schema.contains(tag), "schema is missing {tag}");
    }
}
