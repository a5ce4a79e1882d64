use growthrs::{
    EmptyReason, Error, GrowthPipeline, Observation, ViewQuery, ViewResult, YearRange,
};

fn pipeline() -> GrowthPipeline {
    let mut observations = Vec::new();

    // Alpha: steady 2% growth with one spike in 2010
    let mut level = 100.0;
    for year in 2000..=2020 {
        let rate = if year == 2010 { 0.30 } else if year % 2 == 0 { 0.02 } else { 0.03 };
        if year > 2000 {
            level *= 1.0 + rate;
        }
        observations.push(Observation::new("Alpha", year, level));
    }

    // Beta: sparse with a gap
    observations.push(Observation::new("Beta", 2005, 50.0));
    observations.push(Observation::new("Beta", 2006, 55.0));
    observations.push(Observation::new("Beta", 2009, 66.0));

    GrowthPipeline::new(observations)
}

#[test]
fn test_query_filters_entities_and_years() {
    let pipeline = pipeline();
    let view = pipeline.query(["Beta", "Alpha"], (2005, 2007), None).unwrap();

    let frame = view.frame().expect("rows expected");
    let keys: Vec<(&str, i32)> = frame
        .rows()
        .iter()
        .map(|row| (row.entity.as_str(), row.period))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("Alpha", 2005),
            ("Alpha", 2006),
            ("Alpha", 2007),
            ("Beta", 2005),
            ("Beta", 2006),
            ("Beta", 2007)
        ]
    );
    assert_eq!(frame.entities(), vec!["Alpha", "Beta"]);
    assert!(frame.rows().iter().all(|row| row.smoothed_growth.is_none()));
    assert_eq!(frame.rows_for("Beta").count(), 3);
}

#[test]
fn test_query_smoothing_uses_selected_rows() {
    let pipeline = pipeline();
    let view = pipeline.query(["Beta"], (2005, 2009), Some(3)).unwrap();
    let rows = view.rows();

    // Beta growth over 2005..=2009: [NA, 10, 0, 0, 20]
    let smoothed: Vec<Option<f64>> = rows
        .iter()
        .map(|row| row.smoothed_growth.and_then(|s| s.get()))
        .collect();
    let expected = [10.0, 5.0, 10.0 / 3.0, 20.0 / 3.0, 10.0];
    for (actual, expected) in smoothed.iter().zip(expected) {
        let actual = actual.expect("smoothed value");
        assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
    }

    assert_eq!(rows[0].display_value().get(), smoothed[0]);
    assert!(rows[0].growth.is_na());

    // restricting the range truncates the window at the range edge
    let narrow = pipeline.query(["Beta"], (2008, 2009), Some(3)).unwrap();
    let first = narrow.rows()[0].smoothed_growth.and_then(|s| s.get()).unwrap();
    assert!((first - 10.0).abs() < 1e-9);
}

#[test]
fn test_query_flags_outliers() {
    let pipeline = pipeline();
    let view = pipeline.query(["Alpha"], (2000, 2020), None).unwrap();
    let frame = view.frame().unwrap();

    let outliers: Vec<i32> = frame.outliers().map(|row| row.period).collect();
    assert_eq!(outliers, vec![2010]);
    assert_eq!(frame.outlier_threshold(), 2.5);

    // a lower threshold on the view flags more rows, the table is unchanged
    let query = ViewQuery::new(["Alpha"], YearRange::new(2000, 2020).unwrap())
        .with_outlier_threshold(0.2)
        .unwrap();
    let loose = pipeline.execute(&query);
    assert!(loose.frame().unwrap().outliers().count() > 1);
    assert_eq!(view, pipeline.query(["Alpha"], (2000, 2020), None).unwrap());
}

#[test]
fn test_empty_results_are_not_errors() {
    let pipeline = pipeline();

    let none_selected = pipeline.query(Vec::<String>::new(), (2000, 2020), Some(3)).unwrap();
    assert_eq!(none_selected, ViewResult::Empty(EmptyReason::NoEntitiesSelected));
    assert!(none_selected.rows().is_empty());

    let out_of_range = pipeline.query(["Beta"], (1900, 1950), None).unwrap();
    assert_eq!(out_of_range.empty_reason(), Some(EmptyReason::NoMatchingRows));

    let unknown = pipeline.query(["Gamma"], (2000, 2020), None).unwrap();
    assert!(unknown.is_empty());
}

#[test]
fn test_invalid_parameters_are_errors() {
    let pipeline = pipeline();

    match pipeline.query(["Alpha"], (2010, 2000), None) {
        Err(Error::InvertedYearRange { start: 2010, end: 2000 }) => {}
        other => panic!("unexpected: {:?}", other),
    }

    match pipeline.query(["Alpha"], (2000, 2010), Some(0)) {
        Err(Error::InvalidWindow(0)) => {}
        other => panic!("unexpected: {:?}", other),
    }

    assert!(pipeline.query(["Alpha"], (2000, 2010), Some(-2)).is_err());

    let range = YearRange::new(2000, 2010).unwrap();
    assert!(ViewQuery::new(["Alpha"], range).with_outlier_threshold(f64::NAN).is_err());
    assert!(ViewQuery::new(["Alpha"], range).with_outlier_threshold(0.0).is_err());
}

#[test]
fn test_identical_queries_give_identical_results() {
    let pipeline = pipeline();
    let a = pipeline.query(["Alpha", "Beta"], (2003, 2015), Some(4)).unwrap();
    let b = pipeline.query(["Beta", "Alpha"], (2003, 2015), Some(4)).unwrap();
    assert_eq!(a, b);

    let before = pipeline.table().rows().to_vec();
    let _ = pipeline.query(["Alpha"], (2000, 2020), Some(5)).unwrap();
    assert_eq!(pipeline.table().rows(), before.as_slice());
}

#[test]
fn test_single_year_range() {
    let pipeline = pipeline();
    let view = pipeline.query(["Alpha"], (2010, 2010), Some(3)).unwrap();
    let rows = view.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].smoothed_growth, Some(rows[0].growth));
}

#[test]
fn test_view_to_json() {
    let pipeline = pipeline();
    let view = pipeline.query(["Beta"], (2005, 2006), None).unwrap();
    let json = view.frame().unwrap().to_json().unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["entity"], "Beta");
    assert_eq!(rows[0]["period"], 2005);
    assert!(rows[0]["growth"].is_null());
    assert!(rows[0].get("smoothed_growth").is_none());
    assert_eq!(rows[1]["is_outlier"], false);

    let value = rows[1]["growth"].as_f64().unwrap();
    assert!((value - 10.0).abs() < 1e-9);
}
