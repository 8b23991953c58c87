use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use minisnake_core::*;
use ndarray::Array2;
use std::hint::black_box;

const SEED: u64 = 0x5eed_cafe;
const MAX_TICKS: u32 = 2_000;

/// Heads for the food along the longer axis, good enough to keep a game going for a while.
fn chase(engine: &mut GameEngine) {
    let (hx, hy) = engine.head();
    let (fx, fy) = engine.food();
    let wanted = if hx.abs_diff(fx) >= hy.abs_diff(fy) {
        if fx > hx { Direction::Right } else { Direction::Left }
    } else if fy > hy {
        Direction::Down
    } else {
        Direction::Up
    };
    engine.set_direction_intent(wanted);
}

fn play_one_game(grid_size: Coord) -> u32 {
    let mut engine = GameEngine::seeded(GameConfig::with_grid_size(grid_size), SEED);
    engine.start();
    for _ in 0..MAX_TICKS {
        chase(&mut engine);
        if engine.tick().is_game_over() {
            break;
        }
    }
    engine.score()
}

fn bench_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("game");
    for grid_size in [10, 20, 40] {
        group.bench_with_input(
            BenchmarkId::from_parameter(grid_size),
            &grid_size,
            |b, &grid_size| b.iter(|| play_one_game(black_box(grid_size))),
        );
    }
    group.finish();
}

fn bench_food_placement(c: &mut Criterion) {
    let mut group = c.benchmark_group("food_placement");
    for free in [1usize, 8, 200] {
        let mut occupied: Array2<bool> = Array2::from_elem((20, 20), true);
        for (i, cell) in occupied.iter_mut().enumerate() {
            if i % (400 / free) == 0 {
                *cell = false;
            }
        }
        let mut placer = RandomFoodPlacer::new(SEED);
        group.bench_with_input(BenchmarkId::new("free", free), &occupied, |b, occupied| {
            b.iter(|| placer.place(black_box(occupied)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_game, bench_food_placement);
criterion_main!(benches);
