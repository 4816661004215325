// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::collection::{Collection, Position};
use super::data_model::Model;
use super::ids::RelationshipId;
use super::namespace::Namespace;
use super::relationship::{Relationship, RelationshipEndpoint};

pub(crate) fn ns(value: &str) -> Namespace {
    Namespace::new(value).expect("namespace")
}

pub(crate) fn rid(value: &str) -> RelationshipId {
    RelationshipId::new(value).expect("relationship id")
}

pub(crate) fn collection(namespace: &str) -> Collection {
    Collection::new(ns(namespace), Position::default())
}

pub(crate) fn relationship(id: &str, from: &str, to: &str) -> Relationship {
    Relationship::new(
        rid(id),
        RelationshipEndpoint::new(ns(from)),
        RelationshipEndpoint::new(ns(to)),
    )
}

/// The two-collection model a fresh diagram of the `test` database starts with.
pub(crate) fn two_test_collections() -> Model {
    Model::with_collections([ns("test.testCollection1"), ns("test.testCollection2")])
}

/// `orders -> customers`, `orders -> products`, `reviews -> products`.
pub(crate) fn shop_model() -> Model {
    Model::from_parts(
        [
            collection("shop.customers"),
            collection("shop.orders"),
            collection("shop.products"),
            collection("shop.reviews"),
        ],
        [
            relationship("r:order-customer", "shop.orders", "shop.customers"),
            relationship("r:order-product", "shop.orders", "shop.products"),
            relationship("r:review-product", "shop.reviews", "shop.products"),
        ],
    )
    .expect("shop model")
}
