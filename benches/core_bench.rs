use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ecology_lab::{ModelParameters, State, TimeGrid, integrate, place_on_grid};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn bench_integrate(c: &mut Criterion) {
    let params = ModelParameters::default();
    let times = TimeGrid::default().times();
    c.bench_function("integrate_500_samples", |b| {
        b.iter(|| integrate(black_box(State::new(4.0, 2.0)), &times, &params))
    });
}

fn bench_placement(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    c.bench_function("place_on_grid_15x15", |b| {
        b.iter(|| place_on_grid(15, 15, black_box(40), black_box(20), &mut rng))
    });
}

criterion_group!(benches, bench_integrate, bench_placement);
criterion_main!(benches);
