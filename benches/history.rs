// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use schemadraft::history::History;
use schemadraft::model::{
    Model, Namespace, Position, Relationship, RelationshipEndpoint, RelationshipId,
};
use schemadraft::ops::{apply_edit, Edit};

// Benchmark identity (keep stable):
// - Group names: `history.apply`, `history.undo_redo`, `ops.apply_edit`.
// - Case IDs after the `/` must not change so results stay comparable.

fn namespace(database: &str, index: usize) -> Namespace {
    Namespace::from_parts(database, &format!("coll{index:04}")).expect("namespace")
}

/// `collections` collections in a chain, each linked to the next.
fn chain_model(collections: usize) -> Model {
    let mut history = History::new(Model::with_collections(
        (0..collections).map(|i| namespace("bench", i)),
    ));
    for i in 1..collections {
        let relationship = Relationship::new(
            RelationshipId::new(format!("r{i:04}")).expect("relationship id"),
            RelationshipEndpoint::new(namespace("bench", i - 1)),
            RelationshipEndpoint::new(namespace("bench", i)),
        );
        history
            .apply(&Edit::AddRelationship { relationship })
            .expect("add relationship");
    }
    (**history.current()).clone()
}

fn move_edits(collections: usize, count: usize) -> Vec<Edit> {
    (0..count)
        .map(|i| Edit::MoveCollection {
            namespace: namespace("bench", i % collections),
            position: Position::new(i as f64, (i * 7 % 113) as f64),
        })
        .collect()
}

fn benches_history(c: &mut Criterion) {
    let small = chain_model(16);
    let large = chain_model(400);
    let moves = move_edits(16, 200);

    let mut group = c.benchmark_group("history.apply");
    group.throughput(Throughput::Elements(moves.len() as u64));
    group.bench_function("small_moves_200", |b| {
        b.iter_batched(
            || History::new(small.clone()),
            |mut history| {
                for edit in &moves {
                    history.apply(black_box(edit)).expect("apply");
                }
                black_box(history.len())
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();

    let mut group = c.benchmark_group("history.undo_redo");
    let mut history = History::new(small.clone());
    for edit in &moves {
        history.apply(edit).expect("apply");
    }
    group.throughput(Throughput::Elements(2 * moves.len() as u64));
    group.bench_function("walk_200", |b| {
        b.iter(|| {
            while history.undo().is_ok() {}
            while history.redo().is_ok() {}
            black_box(history.cursor())
        })
    });
    group.finish();

    let mut group = c.benchmark_group("ops.apply_edit");
    let remove_hub = Edit::RemoveCollection {
        namespace: namespace("bench", 200),
    };
    group.bench_function("large_remove_cascade", |b| {
        b.iter(|| black_box(apply_edit(&large, black_box(&remove_hub)).expect("apply")))
    });
    let replace = Edit::SetModel {
        model: small.clone(),
    };
    group.bench_function("large_set_model", |b| {
        b.iter(|| black_box(apply_edit(&large, black_box(&replace)).expect("apply")))
    });
    group.finish();
}

criterion_group!(benches, benches_history);
criterion_main!(benches);
