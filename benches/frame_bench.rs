use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;

use outbreak_viz::chart::TextChart;
use outbreak_viz::core::presets;
use outbreak_viz::engine::{EngineFactory, EngineWorld, FieldView, ReferenceEngine};
use outbreak_viz::render::NullScene;
use outbreak_viz::visual::{EntityRegistry, ScalarFieldProjector, PARTICLE_RAMP};
use outbreak_viz::Stage;

fn bench_projection(c: &mut Criterion) {
    let (width, height) = (600, 400);
    let field: Vec<f32> = (0..width * height).map(|i| (i % 97) as f32 * 0.1).collect();
    let mut projector = ScalarFieldProjector::new(width, height, PARTICLE_RAMP);

    c.bench_function("project_600x400", |b| {
        b.iter(|| {
            projector
                .project(FieldView::new(width, height, black_box(&field)))
                .unwrap();
            black_box(projector.raster().data[0])
        })
    });
}

fn bench_registry_sync(c: &mut Criterion) {
    let config = presets::radius_brownian();
    let mut world = ReferenceEngine
        .create(&config.engine_config, None, Some(1))
        .unwrap();
    let mut state = world.state();
    let mut registry = EntityRegistry::new();
    registry.initialize(&state).unwrap();

    c.bench_function("registry_sync_200", |b| {
        b.iter(|| {
            world.step();
            world.fill_state(&mut state);
            registry.sync(black_box(&state)).unwrap();
        })
    });
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    group.sample_size(30);
    for name in ["radius_brownian", "particle_shopper"] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || {
                    let mut stage = Stage::new();
                    let id = stage
                        .spawn(
                            ReferenceEngine,
                            presets::by_name(name).unwrap(),
                            Box::new(NullScene),
                            Box::new(TextChart::new(100, 8)),
                        )
                        .unwrap();
                    stage.set_speed(id, 4).unwrap();
                    stage.play(id).unwrap();
                    stage
                },
                |mut stage| {
                    for _ in 0..8 {
                        black_box(stage.run_frame());
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_projection, bench_registry_sync, bench_frame);
criterion_main!(benches);
