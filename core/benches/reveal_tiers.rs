use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use sweeper_core::*;

/// Worst case for the flood: one mine tucked into a corner of the largest board.
fn open_board() -> Board {
    Board::new(MineLayout::from_mine_coords((255, 255), &[(254, 254)]).unwrap())
}

fn reveal_tiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("reveal");

    group.bench_function("flood_255x255", |b| {
        b.iter_batched(
            open_board,
            |mut board| black_box(reveal::reveal(&mut board, (0, 0)).unwrap()),
            BatchSize::LargeInput,
        )
    });

    for difficulty in [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Expert] {
        let config = difficulty.config();
        let center = (config.rows() / 2, config.cols() / 2);
        group.bench_with_input(
            BenchmarkId::new("first_click", difficulty.name()),
            &center,
            |b, &center| {
                b.iter_batched(
                    || GameSession::new(NewGame::new(difficulty, 42)).unwrap(),
                    |mut session| black_box(session.reveal(center).unwrap()),
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

criterion_group!(benches, reveal_tiers);
criterion_main!(benches);
