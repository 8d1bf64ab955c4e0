use criterion::{Criterion, black_box, criterion_group, criterion_main};
use strata_terrain::{
    NoiseFieldGenerator, NoiseParams, TerrainConfig, TerrainGenerator, VegetationConfig,
    VegetationPlacer, regenerate,
};

fn bench_noise_field_256(c: &mut Criterion) {
    let generator = NoiseFieldGenerator::new(0);
    let params = NoiseParams::default();
    c.bench_function("noise_field_256", |bencher| {
        bencher.iter(|| black_box(generator.generate(256, 256, &params)))
    });
}

fn bench_noise_field_256_parallel(c: &mut Criterion) {
    let generator = NoiseFieldGenerator::new(0).with_available_parallelism();
    let params = NoiseParams::default();
    c.bench_function("noise_field_256_parallel", |bencher| {
        bencher.iter(|| black_box(generator.generate(256, 256, &params)))
    });
}

fn bench_regenerate_default(c: &mut Criterion) {
    let config = TerrainConfig::default();
    c.bench_function("regenerate_default", |bencher| {
        bencher.iter(|| black_box(regenerate(&config)))
    });
}

fn bench_regenerate_parallel(c: &mut Criterion) {
    let config = TerrainConfig::default();
    let generator = TerrainGenerator::with_available_parallelism();
    c.bench_function("regenerate_parallel", |bencher| {
        bencher.iter(|| black_box(generator.regenerate(&config)))
    });
}

fn bench_vegetation_placement(c: &mut Criterion) {
    let Ok(terrain) = regenerate(&TerrainConfig::default()) else {
        return;
    };
    let placer = VegetationPlacer::new(VegetationConfig {
        allowed_layers: strata_terrain::LayerKind::ALL.to_vec(),
        ..Default::default()
    });
    c.bench_function("vegetation_placement", |bencher| {
        bencher.iter(|| black_box(placer.place(&terrain)))
    });
}

criterion_group!(
    benches,
    bench_noise_field_256,
    bench_noise_field_256_parallel,
    bench_regenerate_default,
    bench_regenerate_parallel,
    bench_vegetation_placement,
);
criterion_main!(benches);
