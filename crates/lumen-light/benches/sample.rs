use criterion::{Criterion, black_box, criterion_group, criterion_main};

use lumen_geom::Vec3;
use lumen_light::{
    DynamicLight, DynamicLights, LightGrid, LightGridSample, LightSampler, LightStyles,
    MAX_DLIGHTS, SamplerConfig,
};

fn build_grid(n: usize) -> LightGrid {
    let mut lattice = Vec::with_capacity(n * n * n);
    for i in 0..n * n * n {
        let v = (i * 37 % 256) as u8;
        lattice.push(LightGridSample::single([v, v / 2, 255 - v], [v / 3, v, v], [v, v / 4]));
    }
    LightGrid::from_lattice(Vec3::ZERO, Vec3::splat(64.0), [n, n, n], lattice).unwrap()
}

fn bench_sample_light(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_light");
    let grid = build_grid(16);
    let styles = LightStyles::new();
    let cfg = SamplerConfig::default();

    let empty = DynamicLights::new();
    let sampler = LightSampler::new(Some(&grid), &styles, &empty, &cfg);
    group.bench_function("grid_only", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t = (t + 7.3) % 1000.0;
            black_box(sampler.sample_light(black_box(Vec3::new(t, t * 0.5, 300.0)), true, true, None))
        })
    });

    let dlights: DynamicLights = (0..MAX_DLIGHTS)
        .map(|i| DynamicLight::new(Vec3::splat(i as f32 * 30.0), 200.0, Vec3::new(1.0, 0.8, 0.6)))
        .collect();
    let sampler = LightSampler::new(Some(&grid), &styles, &dlights, &cfg);
    group.bench_function("grid_and_32_dlights", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t = (t + 7.3) % 1000.0;
            black_box(sampler.sample_light(black_box(Vec3::new(t, t * 0.5, 300.0)), true, true, Some(64.0)))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_sample_light);
criterion_main!(benches);
