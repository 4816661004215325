// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::{Arc, Mutex};

use rstest::{fixture, rstest};

use super::{ChangeCause, ModelChange, SessionError, Workspace};
use crate::config::{EditorConfig, PersistenceConfig};
use crate::discovery::{DiscoveryError, StaticSchema};
use crate::format::ParseError;
use crate::history::Boundary;
use crate::model::fixtures::{ns, shop_model};
use crate::model::{Model, Namespace, Position};
use crate::ops::{Edit, EditError};
use crate::store::{MemoryStore, PersistStatus, PersistenceGateway};

const CLEAR_MODEL: &str = r#"{"type":"SetModel","model":{"collections":[],"relationships":[]}}"#;

struct Ctx {
    store: Arc<MemoryStore>,
    workspace: Workspace,
}

fn workspace_with_debounce(debounce_ms: u64) -> Ctx {
    let store = Arc::new(MemoryStore::new());
    let schema = StaticSchema::from_namespaces([
        ns("test.testCollection1"),
        ns("test.testCollection2"),
        ns("shop.orders"),
    ]);
    let config = EditorConfig {
        persistence: PersistenceConfig {
            debounce_ms,
            durable_writes: false,
        },
    };
    let workspace = Workspace::new(store.clone(), Arc::new(schema), config).expect("workspace");
    Ctx { store, workspace }
}

#[fixture]
fn ctx() -> Ctx {
    workspace_with_debounce(0)
}

/// Debounce long enough that nothing is written unless flushed.
#[fixture]
fn slow_ctx() -> Ctx {
    workspace_with_debounce(600_000)
}

fn names(model: &Model) -> Vec<String> {
    model.namespaces().map(Namespace::to_string).collect()
}

#[rstest]
fn create_apply_undo_redo_reopen_delete(ctx: Ctx) {
    let mut session = ctx
        .workspace
        .create_diagram("Test Data Model", Some("test"))
        .expect("create");
    assert_eq!(
        names(&session.current_model()),
        vec!["test.testCollection1", "test.testCollection2"]
    );
    assert!(!session.can_undo());

    session.apply_document(CLEAR_MODEL).expect("apply");
    assert_eq!(session.current_model().collections().len(), 0);

    session.undo().expect("undo");
    assert_eq!(
        names(&session.current_model()),
        vec!["test.testCollection1", "test.testCollection2"]
    );
    assert!(session.can_redo());

    session.redo().expect("redo");
    assert_eq!(session.current_model().collections().len(), 0);
    assert!(!session.can_redo());

    assert_eq!(session.flush(), PersistStatus::Idle);
    let diagram_id = session.diagram_id().clone();
    session.close();

    let reopened = ctx.workspace.open_diagram(&diagram_id).expect("open");
    assert!(reopened.current_model().is_empty());
    assert!(!reopened.can_undo());
    assert!(!reopened.can_redo());
    assert_eq!(reopened.meta().name, "Test Data Model");
    drop(reopened);

    let listed = ctx.workspace.list_diagrams().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Test Data Model");

    ctx.workspace.delete_diagram(&diagram_id).expect("delete");
    assert!(ctx.workspace.list_diagrams().unwrap().is_empty());
}

#[rstest]
fn created_diagram_is_listed_before_any_edit(slow_ctx: Ctx) {
    let session = slow_ctx.workspace.create_diagram("Fresh", None).unwrap();
    assert!(session.current_model().is_empty());
    assert_eq!(
        slow_ctx.workspace.list_diagrams().unwrap()[0].diagram_id,
        *session.diagram_id()
    );
}

#[rstest]
fn subscribers_see_every_change_until_unsubscribed(ctx: Ctx) {
    let mut session = ctx.workspace.create_diagram("Observed", Some("test")).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let id = session.subscribe({
        let seen = seen.clone();
        move |change: &ModelChange| {
            seen.lock().unwrap().push((
                change.cause,
                change.model.collections().len(),
                change.can_undo,
                change.can_redo,
            ));
        }
    });

    session.apply_document(CLEAR_MODEL).unwrap();
    session.undo().unwrap();
    session.redo().unwrap();
    assert_eq!(session.redo().err(), Some(Boundary::AtEnd));
    assert!(session.unsubscribe(id));
    assert!(!session.unsubscribe(id));
    session.undo().unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (ChangeCause::Edit, 0, true, false),
            (ChangeCause::Undo, 2, false, true),
            (ChangeCause::Redo, 0, true, false),
        ]
    );
}

#[rstest]
fn rejected_edits_publish_and_persist_nothing(slow_ctx: Ctx) {
    let mut session = slow_ctx.workspace.create_diagram("Strict", Some("test")).unwrap();
    let notified = Arc::new(Mutex::new(0usize));
    session.subscribe({
        let notified = notified.clone();
        move |_: &ModelChange| *notified.lock().unwrap() += 1
    });

    let duplicate = Edit::AddCollection {
        namespace: ns("test.testCollection1"),
        position: Position::new(1.0, 1.0),
    };
    assert!(matches!(
        session.apply_edit(&duplicate),
        Err(EditError::DuplicateNamespace { .. })
    ));
    assert!(matches!(
        session.apply_document("{\"type\":"),
        Err(SessionError::Parse(ParseError::Json(_)))
    ));
    assert!(matches!(
        session.apply_document(r#"{"type":"RemoveCollection","ns":"test.nothing"}"#),
        Err(SessionError::Edit(EditError::NotFound { .. }))
    ));
    let dangling = r#"{"type":"SetModel","model":{
        "collections":[{"ns":"test.a"}],
        "relationships":[{"id":"r1","relationship":[{"ns":"test.a"},{"ns":"test.gone"}]}]
    }}"#;
    assert!(matches!(
        session.apply_document(dangling),
        Err(SessionError::Edit(EditError::UnknownEndpoint { .. }))
    ));
    let duplicate_ns = r#"{"type":"SetModel","model":{
        "collections":[{"ns":"test.a"},{"ns":"test.a"}]
    }}"#;
    assert!(matches!(
        session.apply_document(duplicate_ns),
        Err(SessionError::Edit(EditError::DuplicateNamespace { .. }))
    ));

    assert_eq!(session.history().len(), 1);
    assert_eq!(*notified.lock().unwrap(), 0);
    assert_eq!(session.persist_status(), PersistStatus::Idle);
}

#[rstest]
fn persistence_failure_keeps_the_session_usable(ctx: Ctx) {
    let mut session = ctx.workspace.create_diagram("Flaky", Some("test")).unwrap();
    ctx.store.set_unavailable(true);

    session.apply_document(CLEAR_MODEL).unwrap();
    let status = session.flush();
    assert!(matches!(status, PersistStatus::Failed { attempts: 1, .. }));
    assert!(session.current_model().is_empty());

    session.undo().unwrap();
    assert!(matches!(session.flush(), PersistStatus::Failed { attempts: 2, .. }));
    assert_eq!(session.current_model().collections().len(), 2);

    ctx.store.set_unavailable(false);
    session.retry_persist();
    assert_eq!(session.flush(), PersistStatus::Idle);
    let stored = ctx.store.load(session.diagram_id()).unwrap();
    assert_eq!(stored.model, *session.current_model());
}

#[rstest]
fn burst_of_edits_is_saved_once(slow_ctx: Ctx) {
    let mut session = slow_ctx.workspace.create_diagram("Burst", Some("shop")).unwrap();
    for x in 1..=10 {
        session
            .apply_edit(&Edit::MoveCollection {
                namespace: ns("shop.orders"),
                position: Position::new(f64::from(x), 0.0),
            })
            .unwrap();
    }
    assert_eq!(session.persist_status(), PersistStatus::Pending);

    assert_eq!(session.flush(), PersistStatus::Idle);
    assert_eq!(slow_ctx.store.save_count(), 1);
    let stored = slow_ctx.store.load(session.diagram_id()).unwrap();
    assert_eq!(
        stored.model.collection(&ns("shop.orders")).map(|c| c.position()),
        Some(Position::new(10.0, 0.0))
    );
}

#[rstest]
fn close_cancels_a_pending_save(slow_ctx: Ctx) {
    let mut session = slow_ctx.workspace.create_diagram("Closed", Some("test")).unwrap();
    let diagram_id = session.diagram_id().clone();
    session.apply_document(CLEAR_MODEL).unwrap();

    session.close();

    assert_eq!(slow_ctx.store.save_count(), 0);
    let stored = slow_ctx.store.load(&diagram_id).unwrap();
    assert_eq!(stored.model.collections().len(), 2);
}

#[rstest]
fn delete_is_not_undone_by_a_pending_save(slow_ctx: Ctx) {
    let mut session = slow_ctx.workspace.create_diagram("Doomed", Some("test")).unwrap();
    let diagram_id = session.diagram_id().clone();
    session
        .apply_edit(&Edit::SetModel {
            model: shop_model(),
        })
        .unwrap();

    slow_ctx.workspace.delete_diagram(&diagram_id).unwrap();

    assert_eq!(session.flush(), PersistStatus::Idle);
    assert!(!slow_ctx.store.contains(&diagram_id));

    session.undo().unwrap();
    assert!(matches!(session.flush(), PersistStatus::Failed { .. }));
    assert!(!slow_ctx.store.contains(&diagram_id));
}

#[rstest]
fn workspace_errors_are_typed(ctx: Ctx) {
    assert!(matches!(
        ctx.workspace.create_diagram("Nowhere", Some("missing")),
        Err(SessionError::Discovery(DiscoveryError::UnknownDatabase { .. }))
    ));
    let unknown = crate::model::DiagramId::new("unknown").unwrap();
    assert!(matches!(
        ctx.workspace.open_diagram(&unknown),
        Err(SessionError::Store(ref err)) if err.is_not_found()
    ));
    assert!(matches!(
        ctx.workspace.delete_diagram(&unknown),
        Err(SessionError::Store(_))
    ));
}

#[rstest]
fn rename_updates_the_listing(ctx: Ctx) {
    let session = ctx.workspace.create_diagram("Before", None).unwrap();

    let meta = ctx.workspace.rename_diagram(session.diagram_id(), "After").unwrap();

    assert_eq!(meta.name, "After");
    assert_eq!(ctx.workspace.list_diagrams().unwrap()[0].name, "After");
}

#[rstest]
fn two_sessions_on_one_diagram_keep_separate_histories(ctx: Ctx) {
    let mut first = ctx.workspace.create_diagram("Shared", Some("test")).unwrap();
    let mut second = ctx.workspace.open_diagram(first.diagram_id()).unwrap();

    first.apply_document(CLEAR_MODEL).unwrap();
    assert_eq!(first.flush(), PersistStatus::Idle);

    assert_eq!(second.current_model().collections().len(), 2);
    assert_eq!(second.undo().err(), Some(Boundary::AtBeginning));

    second
        .apply_edit(&Edit::RemoveCollection {
            namespace: ns("test.testCollection1"),
        })
        .unwrap();
    assert_eq!(second.flush(), PersistStatus::Idle);

    let stored = ctx.store.load(first.diagram_id()).unwrap();
    assert_eq!(names(&stored.model), vec!["test.testCollection2"]);
}
