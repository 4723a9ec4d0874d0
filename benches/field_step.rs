//! Benchmarks for field stepping, connection scans and figure
//! generation.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use emberfield::canvas::Canvas;
use emberfield::color::Color;
use emberfield::field::{FieldConfig, ParticleField, Viewport};
use emberfield::geometry::{Complexity, Figure, Pattern};
use emberfield::particle::FieldMode;

fn ready_field(config: FieldConfig) -> ParticleField {
    // Fixed population so the size list below is what actually runs
    let mut field = ParticleField::seeded(config.with_responsive(false), 7);
    field.resize(Viewport::new(1440.0, 900.0));
    field
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_step");

    for count in [100, 250, 500] {
        group.bench_with_input(
            BenchmarkId::new("constellation", count),
            &count,
            |b, &count| {
                let mut field = ready_field(FieldConfig::new().with_count(count));
                b.iter(|| field.step(black_box(1.0 / 60.0)))
            },
        );
    }

    group.bench_function("phoenix_250", |b| {
        let mut field = ready_field(
            FieldConfig::new()
                .with_mode(FieldMode::Phoenix)
                .with_count(250),
        );
        b.iter(|| field.step(black_box(1.0 / 60.0)))
    });

    group.bench_function("quantum_250", |b| {
        let mut field = ready_field(
            FieldConfig::new()
                .with_mode(FieldMode::Quantum)
                .with_count(250),
        );
        field.pointer_moved(emberfield::Vec2::new(720.0, 450.0));
        b.iter(|| field.step(black_box(1.0 / 60.0)))
    });

    group.finish();
}

fn bench_connections(c: &mut Criterion) {
    let mut group = c.benchmark_group("connection_scan");

    for count in [100, 250, 500] {
        group.bench_with_input(BenchmarkId::new("pairs", count), &count, |b, &count| {
            let field = ready_field(FieldConfig::new().with_count(count));
            b.iter(|| black_box(field.connections()))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    group.bench_function("constellation_250", |b| {
        let mut field = ready_field(FieldConfig::new().with_count(250));
        field.step(1.0 / 60.0);
        let mut canvas = Canvas::new(720, 450);
        b.iter(|| {
            canvas.clear(Color::TRANSPARENT);
            field.render(&mut canvas);
        })
    });

    group.bench_function("frame_instances_250", |b| {
        let field = ready_field(FieldConfig::new().with_count(250));
        b.iter(|| black_box(field.frame()))
    });

    group.finish();
}

fn bench_figures(c: &mut Criterion) {
    let mut group = c.benchmark_group("figure_generate");

    for pattern in [
        Pattern::FlowerOfLife,
        Pattern::MetatronsCube,
        Pattern::GoldenSpiral,
        Pattern::SriYantra,
    ] {
        group.bench_with_input(
            BenchmarkId::new("complex", pattern.name()),
            &pattern,
            |b, &pattern| b.iter(|| black_box(Figure::generate(pattern, Complexity::Complex, 120.0))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_step,
    bench_connections,
    bench_render,
    bench_figures,
);
criterion_main!(benches);
