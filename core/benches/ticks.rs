//! Run with: cargo bench --package multigame-core --bench ticks

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use multigame_core::arcade::{Controls, Weather};
use multigame_core::football::{Match, MatchConfig, Mode};
use multigame_core::maze::{Maze, MazeConfig};
use multigame_core::racing::{CARS, Race, RaceConfig};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn maze_generation(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    let mut group = c.benchmark_group("maze");
    for size in [17, 51, 101] {
        group.bench_function(format!("generate_{size}"), |b| {
            b.iter(|| black_box(Maze::generate(MazeConfig { size }, &mut rng)))
        });
    }
    group.finish();
}

fn race_ticks(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let config = RaceConfig {
        // Keep the race alive: no traffic means no crash.
        spawn_chance: 0.0,
        ..RaceConfig::default()
    };

    c.bench_function("race_1000_ticks", |b| {
        b.iter(|| {
            let mut race = Race::new(CARS[5], config, Weather::Sunny);
            for frame in 0..1000 {
                let _ = race.tick(Controls::UP | Controls::RIGHT, f64::from(frame) * 16.0, &mut rng);
            }
            black_box(race.offset())
        })
    });
}

fn football_ticks(c: &mut Criterion) {
    c.bench_function("football_1000_ticks", |b| {
        b.iter(|| {
            let mut game = Match::new(Mode::OnePlayer, MatchConfig::default(), Weather::Sunny);
            for _ in 0..1000 {
                let _ = game.tick(Controls::RIGHT | Controls::SHOOT, Controls::empty());
            }
            black_box(game.score())
        })
    });
}

criterion_group!(benches, maze_generation, race_ticks, football_ticks);
criterion_main!(benches);
