//! Benchmarks for snapshot cloning and transforms.
//!
//! Rollback keeps whole snapshots around, so cloning must stay cheap as
//! the duel grows.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_duel::cards::{CardData, CardId, FrameType, MonsterStats};
use rust_duel::core::DuelConfig;
use rust_duel::state::{GameSnapshot, ZoneName};

fn snapshot_with_deck(size: usize) -> GameSnapshot {
    let data = Arc::new(CardData::monster(
        CardId::new(91152256),
        "Celtic Guardian",
        FrameType::Normal,
        MonsterStats::default(),
    ));
    let mut snapshot = GameSnapshot::empty(&DuelConfig::default());
    for _ in 0..size {
        snapshot = snapshot
            .place_new_card(Arc::clone(&data), ZoneName::MainDeck)
            .expect("deck has room");
    }
    snapshot
}

/// Clone cost across deck sizes.
fn benchmark_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("Snapshot clone");
    for size in [40, 60] {
        let snapshot = snapshot_with_deck(size);
        group.bench_with_input(BenchmarkId::new("deck", size), &snapshot, |b, snapshot| {
            b.iter(|| black_box(snapshot.clone()));
        });
    }
    group.finish();
}

/// Structural transforms that produce a new snapshot.
fn benchmark_transforms(c: &mut Criterion) {
    let snapshot = snapshot_with_deck(40);

    c.bench_function("draw 5", |b| {
        b.iter(|| black_box(snapshot.draw(black_box(5))));
    });

    let top = snapshot.cards_in(ZoneName::MainDeck)[0].instance_id;
    c.bench_function("move to graveyard", |b| {
        b.iter(|| black_box(snapshot.move_card(top, ZoneName::Graveyard)));
    });

    c.bench_function("encode", |b| {
        b.iter(|| black_box(snapshot.to_bytes()));
    });
}

criterion_group!(benches, benchmark_clone, benchmark_transforms);
criterion_main!(benches);
