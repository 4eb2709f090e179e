use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gridpair::compute::GridIndex;
use gridpair::{EngineBuilder, Point, brute_force_closest_pair};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn uniform_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            Point::new(
                format!("b{}", i),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            )
        })
        .collect()
}

fn benchmark_engine_vs_brute_force(c: &mut Criterion) {
    let mut group = c.benchmark_group("closest_pair");
    let engine = EngineBuilder::new().seed(42).build().unwrap();

    for n in [100usize, 1_000, 5_000] {
        let points = uniform_points(n, n as u64);

        group.bench_with_input(BenchmarkId::new("grid_engine", n), &points, |b, points| {
            b.iter(|| engine.closest_pair_distance(black_box(points)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("brute_force", n), &points, |b, points| {
            b.iter(|| brute_force_closest_pair(black_box(points)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_large_inputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("closest_pair_large");
    group.sample_size(10);
    let engine = EngineBuilder::new().seed(7).build().unwrap();

    for n in [50_000usize, 200_000] {
        let points = uniform_points(n, 99);
        group.bench_with_input(BenchmarkId::new("grid_engine", n), &points, |b, points| {
            b.iter(|| engine.closest_pair_distance(black_box(points)).unwrap())
        });
    }

    #[cfg(feature = "parallel")]
    {
        let parallel = EngineBuilder::new()
            .seed(7)
            .parallel_scan(true)
            .build()
            .unwrap();
        let points = uniform_points(200_000, 99);
        group.bench_function("grid_engine_parallel_200000", |b| {
            b.iter(|| parallel.closest_pair_distance(black_box(&points)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_grid_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");
    let points = uniform_points(10_000, 3);

    for theta in [0.1f64, 1.0, 10.0] {
        group.bench_with_input(BenchmarkId::from_parameter(theta), &theta, |b, &theta| {
            b.iter(|| GridIndex::build(black_box(&points), theta, 1e-5, 1 << 22).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_engine_vs_brute_force,
    benchmark_large_inputs,
    benchmark_grid_build
);
criterion_main!(benches);
