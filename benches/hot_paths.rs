use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use quake_globe::config::{MarkerConfig, MeshConfig};
use quake_globe::data::synthetic_catalog;
use quake_globe::{DualMeshBuilder, EarthSurface, MorphMode, SurfaceConfig};

fn bench_mesh_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_build");
    for (rows, cols) in [(20, 40), (75, 150), (150, 150)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{rows}x{cols}")),
            &(rows, cols),
            |b, &(rows, cols)| b.iter(|| DualMeshBuilder::new(rows, cols).build().unwrap()),
        );
    }
    group.finish();
}

fn bench_blend_vertices(c: &mut Criterion) {
    let mesh = DualMeshBuilder::new(150, 150).build().unwrap();
    let mut out = Vec::with_capacity(mesh.vertex_count());
    c.bench_function("blend_vertices_150x150", |b| {
        b.iter(|| {
            mesh.blend_vertices_into(black_box(0.37), &mut out);
            black_box(out.len())
        })
    });
}

fn bench_surface_tick(c: &mut Criterion) {
    let config = SurfaceConfig {
        mesh: MeshConfig { rows: 20, cols: 40 },
        marker: MarkerConfig {
            lifespan: 1.0e9,
            ..MarkerConfig::default()
        },
        ..SurfaceConfig::default()
    };
    let records = synthetic_catalog(10_000, 0.0, 1_000.0, 7);

    let mut surface = EarthSurface::initialize(&config).unwrap();
    surface.spawn_all(&records);
    surface.toggle_mode(MorphMode::Globe);

    let mut now = 1_000.0;
    c.bench_function("surface_tick_10k", |b| {
        b.iter(|| {
            now += 1.0;
            // Keep the morph in flight so every marker re-blends
            if surface.blend() >= 1.0 {
                surface.toggle_mode(MorphMode::Map);
            } else if surface.blend() <= 0.0 {
                surface.toggle_mode(MorphMode::Globe);
            }
            black_box(surface.tick(now, 0.016))
        })
    });
}

criterion_group!(benches, bench_mesh_build, bench_blend_vertices, bench_surface_tick);
criterion_main!(benches);
