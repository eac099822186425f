//! Benchmarks for the flood-fill reveal on large open grids.

use std::hint::black_box;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use minegrid_core::{Dimensions, Grid, Position};

fn flood_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("flood_fill");

    // Mine-free grid, so one reveal opens every cell.
    group.bench_function("open_200x200", |b| {
        b.iter_batched(
            || {
                let mut grid = Grid::default();
                grid.reset_with_mines(200, 200, &[])
                    .expect("in-range dimensions");
                grid
            },
            |mut grid| {
                let outcome = grid
                    .column_mut(100)
                    .expect("in range")
                    .cell(100)
                    .expect("in range")
                    .reveal();
                black_box(outcome)
            },
            BatchSize::LargeInput,
        );
    });

    // Single mine in a corner: the flood stops at the numbered border.
    group.bench_function("bordered_200x200", |b| {
        b.iter_batched(
            || {
                let mut grid = Grid::default();
                grid.reset_with_mines(200, 200, &[Position::new(199, 199)])
                    .expect("in-range dimensions");
                grid
            },
            |mut grid| {
                let outcome = grid
                    .column_mut(0)
                    .expect("in range")
                    .cell(0)
                    .expect("in range")
                    .reveal();
                black_box(outcome)
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

fn rebuild(c: &mut Criterion) {
    c.bench_function("rebuild_200x200", |b| {
        let mut grid = Grid::with_seed(Dimensions::new(200, 200, 4000), 42);
        b.iter(|| {
            grid.reset();
            black_box(grid.status())
        });
    });
}

criterion_group!(benches, flood_fill, rebuild);
criterion_main!(benches);
