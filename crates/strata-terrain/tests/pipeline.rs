use strata_terrain::{
    BlendPolicy, Grid, LayerFields, LayerKind, LayerSpec, NoiseFieldGenerator, NoiseParams,
    TerrainConfig, TerrainDimensions, TerrainGenerator, VegetationConfig, VegetationPlacer, blend,
    regenerate, to_heightmap,
};

const EPSILON: f64 = 1e-9;

fn flat_layer(min_height: f64, max_height: f64) -> LayerSpec {
    LayerSpec {
        scale: 0.0,
        offset_x: 0.0,
        offset_y: 0.0,
        frequency: 1.0,
        weight: 1.0,
        min_height,
        max_height,
        texture: None,
    }
}

fn configs() -> Vec<TerrainConfig> {
    let mut out = Vec::new();
    for (seed, policy) in [
        (0, BlendPolicy::SmoothBlend),
        (7, BlendPolicy::HardClassify),
        (1234, BlendPolicy::SmoothBlend),
    ] {
        let mut config = TerrainConfig {
            dimensions: TerrainDimensions {
                width: 33,
                height: 17,
                depth: 250.0,
            },
            seed,
            policy,
            ..Default::default()
        };
        config.ground.offset_x = 5.3;
        config.mountain.offset_y = -2.7;
        config.mountain.frequency = 0.5;
        config.water.weight = 0.8;
        out.push(config);
    }
    out
}

#[test]
fn constant_noise_gives_uniform_deterministic_terrain() {
    for policy in [BlendPolicy::HardClassify, BlendPolicy::SmoothBlend] {
        let config = TerrainConfig {
            dimensions: TerrainDimensions {
                width: 4,
                height: 4,
                depth: 10.0,
            },
            seed: 0,
            water: flat_layer(0.0, 3.0),
            ground: flat_layer(3.0, 15.0),
            mountain: flat_layer(15.0, 250.0),
            policy,
        };

        let first = regenerate(&config).unwrap();
        let second = regenerate(&config).unwrap();
        assert_eq!(first, second);

        for field in [&first.fields.water, &first.fields.ground, &first.fields.mountain] {
            assert!(field.cells().iter().all(|&v| v == 0.5));
        }
        assert!(
            first
                .labels()
                .cells()
                .iter()
                .all(|&l| l == LayerKind::Mountain),
            "{policy:?}: tie must resolve to mountain"
        );
        let h = first.heightmap[(0, 0)];
        assert!(first.heightmap.cells().iter().all(|&v| v == h));
    }
}

#[test]
fn ground_at_full_strength_reaches_max_height() {
    let config = TerrainConfig {
        dimensions: TerrainDimensions {
            width: 8,
            height: 8,
            depth: 50.0,
        },
        water: LayerSpec {
            weight: 0.0,
            ..flat_layer(0.0, 3.0)
        },
        ground: flat_layer(3.0, 15.0),
        mountain: LayerSpec {
            weight: 0.0,
            ..flat_layer(15.0, 50.0)
        },
        ..Default::default()
    };
    for policy in [BlendPolicy::HardClassify, BlendPolicy::SmoothBlend] {
        let config = TerrainConfig {
            policy,
            ..config.clone()
        };
        let fields = LayerFields {
            water: Grid::filled(8, 8, 0.9),
            ground: Grid::filled(8, 8, 1.0),
            mountain: Grid::filled(8, 8, 0.9),
        };
        let out = blend(&fields, &config).unwrap();
        let world = to_heightmap(&out.elevation, config.dimensions.depth);
        for &h in world.cells() {
            assert!((h - 15.0).abs() < EPSILON, "{policy:?}: {h}");
        }
    }
}

#[test]
fn generated_grids_satisfy_invariants() {
    for config in configs() {
        let terrain = TerrainGenerator::with_threads(4)
            .regenerate(&config)
            .unwrap();
        let (w, h) = (config.dimensions.width, config.dimensions.height);

        for kind in LayerKind::ALL {
            let field = terrain.fields.get(kind);
            assert_eq!(field.dimensions(), (w, h));
            assert!(field.cells().iter().all(|v| (0.0..=1.0).contains(v)));
        }

        for &e in terrain.elevation().cells() {
            assert!(e.is_finite());
        }

        for label in terrain.labels().cells() {
            assert!(label.code() <= 2);
        }

        for weights in terrain.splat.cells() {
            let sum: f64 = weights.iter().sum();
            assert!((sum - 1.0).abs() < EPSILON, "splat sum {sum}");
        }

        let depth = config.dimensions.depth;
        for (x, y, &e) in terrain.elevation().iter() {
            assert!((terrain.heightmap[(x, y)] / depth - e).abs() < EPSILON);
        }
    }
}

#[test]
fn label_owns_the_height_band() {
    let config = TerrainConfig {
        policy: BlendPolicy::HardClassify,
        ..configs().remove(1)
    };
    let terrain = regenerate(&config).unwrap();
    for (x, y, &label) in terrain.labels().iter() {
        let spec = config.layer(label);
        let h = terrain.heightmap[(x, y)];
        assert!(
            h >= spec.min_height - EPSILON && h <= spec.max_height + EPSILON,
            "{label} cell at ({x}, {y}) has height {h} outside [{}, {}]",
            spec.min_height,
            spec.max_height
        );
    }
}

#[test]
fn noise_generation_is_repeatable_across_generators() {
    let params = NoiseParams {
        scale: 6.0,
        offset_x: 1.5,
        offset_y: 2.5,
        frequency: 2.0,
    };
    let a = NoiseFieldGenerator::new(9).generate(20, 20, &params).unwrap();
    let b = NoiseFieldGenerator::new(9)
        .with_available_parallelism()
        .generate(20, 20, &params)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn vegetation_lands_on_ground_when_ground_exists() {
    let config = TerrainConfig {
        policy: BlendPolicy::HardClassify,
        ..configs().remove(1)
    };
    let terrain = regenerate(&config).unwrap();
    if terrain.labels().count(LayerKind::Ground) == 0 {
        return;
    }
    let placed = VegetationPlacer::new(VegetationConfig::default())
        .place(&terrain)
        .unwrap();
    assert_eq!(placed.len(), 200);
    for p in placed {
        assert_eq!(terrain.labels()[p.cell], LayerKind::Ground);
    }
}
