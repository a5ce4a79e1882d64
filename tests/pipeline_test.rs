use growthrs::{GrowthPipeline, Observation, PipelineConfig, NA};

fn sample_observations() -> Vec<Observation> {
    vec![
        Observation::new("Testland", 2020, 100.0),
        Observation::new("Testland", 2021, 120.0),
        Observation::new("Testland", 2022, 144.0),
        Observation::new("Gapland", 2019, 100.0),
        Observation::new("Gapland", 2022, 130.0),
        Observation::new("Solo", 2000, 5.0),
        Observation::missing("Void", 2010),
        Observation::missing("Void", 2011),
    ]
}

fn assert_close(actual: NA<f64>, expected: f64) {
    match actual {
        NA::Value(v) => assert!((v - expected).abs() < 1e-9, "{} != {}", v, expected),
        NA::NA => panic!("Expected a value, got NA"),
    }
}

#[test]
fn test_pipeline_end_to_end() {
    let pipeline = GrowthPipeline::new(sample_observations());
    let table = pipeline.table();

    assert_eq!(
        table.entities().collect::<Vec<_>>(),
        vec!["Gapland", "Solo", "Testland", "Void"]
    );
    assert_eq!(table.len(), 4 + 1 + 3 + 2);

    let testland = table.entity_rows("Testland").unwrap();
    assert!(testland[0].growth.is_na());
    assert_close(testland[1].growth, 20.0);
    assert_close(testland[2].growth, 20.0);
    // two identical growth values have zero variance
    assert!(testland.iter().all(|row| row.z_score.is_na()));
}

#[test]
fn test_gap_filled_growth() {
    let pipeline = GrowthPipeline::new(sample_observations());
    let gapland = pipeline.table().entity_rows("Gapland").unwrap();

    let periods: Vec<i32> = gapland.iter().map(|row| row.period).collect();
    assert_eq!(periods, vec![2019, 2020, 2021, 2022]);
    assert_close(gapland[1].value, 100.0);
    assert_close(gapland[2].value, 100.0);
    assert_close(gapland[1].growth, 0.0);
    assert_close(gapland[3].growth, 30.0);

    // growth [NA, 0, 0, 30]: mean 10, population std sqrt(200)
    let std = 200.0f64.sqrt();
    assert_close(gapland[3].z_score, 20.0 / std);
    assert_close(gapland[1].z_score, -10.0 / std);
    assert!(gapland[0].z_score.is_na());
}

#[test]
fn test_degenerate_entities() {
    let pipeline = GrowthPipeline::new(sample_observations());
    let table = pipeline.table();

    let solo = table.entity_rows("Solo").unwrap();
    assert_eq!(solo.len(), 1);
    assert!(solo[0].growth.is_na());
    assert!(solo[0].z_score.is_na());

    let void = table.entity_rows("Void").unwrap();
    assert!(void.iter().all(|row| row.value.is_na() && row.growth.is_na() && row.z_score.is_na()));
}

#[test]
fn test_single_growth_value_gives_missing_zscores() {
    let pipeline = GrowthPipeline::new(vec![
        Observation::new("Pair", 2000, 10.0),
        Observation::new("Pair", 2001, 12.0),
    ]);
    let rows = pipeline.table().entity_rows("Pair").unwrap();
    assert_close(rows[1].growth, 20.0);
    assert!(rows.iter().all(|row| row.z_score.is_na()));
}

#[test]
fn test_rederiving_own_output_is_idempotent() {
    let mut observations = sample_observations();
    observations.extend([
        Observation::new("Wave", 1990, 10.0),
        Observation::new("Wave", 1991, 11.0),
        Observation::new("Wave", 1993, 9.0),
        Observation::missing("Wave", 1994),
        Observation::new("Wave", 1996, 15.0),
        Observation::new("Wave", 1997, 0.0),
        Observation::new("Wave", 1998, 4.0),
    ]);

    let first = GrowthPipeline::new(observations);
    let second = GrowthPipeline::new(first.table().to_observations());

    assert_eq!(first.table().rows(), second.table().rows());
}

#[test]
fn test_near_zero_tolerance_is_configurable() {
    let observations = vec![
        Observation::new("Tiny", 2000, 0.0005),
        Observation::new("Tiny", 2001, 100.0),
    ];

    let default = GrowthPipeline::new(observations.clone());
    assert!(default.table().rows()[1].growth.is_na());

    let config = PipelineConfig {
        near_zero_tolerance: 1e-6,
        ..PipelineConfig::default()
    };
    let relaxed = GrowthPipeline::with_config(observations, config).unwrap();
    assert!(relaxed.table().rows()[1].growth.is_value());
}

#[test]
fn test_invalid_config_rejected() {
    let config = PipelineConfig {
        outlier_threshold: -1.0,
        ..PipelineConfig::default()
    };
    assert!(GrowthPipeline::with_config(sample_observations(), config).is_err());
}

#[test]
fn test_ui_defaults() {
    let mut observations = sample_observations();
    observations.push(Observation::new("Ancient", 1950, 1.0));
    observations.push(Observation::new("Extra", 2001, 1.0));
    let pipeline = GrowthPipeline::new(observations);

    assert_eq!(pipeline.year_bounds(), Some((1950, 2022)));

    let range = pipeline.default_year_range().unwrap();
    assert_eq!((range.start(), range.end()), (1992, 2022));

    assert_eq!(
        pipeline.default_entities(),
        vec!["Ancient", "Extra", "Gapland", "Solo", "Testland"]
    );

    let query = pipeline.default_query().unwrap().unwrap();
    assert_eq!(query.smoothing().map(|w| w.width()), Some(3));
    assert_eq!(query.entities().len(), 5);
}

#[test]
fn test_empty_pipeline() {
    let pipeline = GrowthPipeline::new(Vec::new());
    assert!(pipeline.table().is_empty());
    assert_eq!(pipeline.year_bounds(), None);
    assert!(pipeline.default_query().unwrap().is_none());
    assert!(pipeline.available_entities().is_empty());
}

#[test]
fn test_pipeline_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GrowthPipeline>();
}
