//! Performance benchmarks for voxel-serpents

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use voxel_serpents::config::Config;
use voxel_serpents::food::FoodField;
use voxel_serpents::grid::{GridSize, Position};
use voxel_serpents::palette::FOOD_COLOR;
use voxel_serpents::World;

fn benchmark_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");

    for snakes in [50, 100, 200].iter() {
        let mut config = Config::default();
        config.world.base_grid_size = 60;
        config.world.aspect_ratio = 1.0;
        config.snakes.count = *snakes;
        config.food.count = 100;

        let mut world = World::new_with_seed(config, 42);

        // Warm up
        world.run(10);

        group.bench_with_input(BenchmarkId::new("snakes", snakes), snakes, |b, _| {
            b.iter(|| {
                world.step();
            });
        });
    }

    group.finish();
}

fn benchmark_cluster_scan(c: &mut Criterion) {
    // Worst case: a sparse field the scan walks end to end without a hit
    let grid = GridSize::new(60, 60, 60);
    let mut field = FoodField::new();
    for i in 0..500 {
        let p = Position::new((i * 7) % 60, (i * 13) % 60, (i * 29) % 60);
        field.spawn_at(grid, p, FOOD_COLOR, 0, false);
    }

    c.bench_function("cluster_scan_500", |b| {
        b.iter(|| field.find_cluster(black_box(grid), 9));
    });
}

criterion_group!(benches, benchmark_world_step, benchmark_cluster_scan);
criterion_main!(benches);
