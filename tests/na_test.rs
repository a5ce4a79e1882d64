use growthrs::NA;

#[test]
fn test_na_creation() {
    let value: NA<f64> = NA::Value(42.0);
    let na: NA<f64> = NA::NA;

    assert!(!value.is_na());
    assert!(value.is_value());
    assert_eq!(value.value(), Some(&42.0));
    assert_eq!(value.get(), Some(42.0));

    assert!(na.is_na());
    assert_eq!(na.value(), None);
    assert_eq!(na.into_option(), None);
}

#[test]
fn test_non_finite_floats_become_na() {
    assert!(NA::from_f64(f64::NAN).is_na());
    assert!(NA::from_f64(f64::INFINITY).is_na());
    assert!(NA::from(f64::NEG_INFINITY).is_na());
    assert_eq!(NA::from(1.5), NA::Value(1.5));
    assert_eq!(NA::from(Some(2.0)), NA::Value(2.0));
    assert_eq!(NA::<f64>::from(None), NA::NA);
}

#[test]
fn test_na_arithmetic_propagates() {
    let a = NA::Value(10.0);
    let b = NA::Value(4.0);
    let na = NA::<f64>::NA;

    assert_eq!(a + b, NA::Value(14.0));
    assert_eq!(a - b, NA::Value(6.0));
    assert_eq!(a * b, NA::Value(40.0));
    assert_eq!(a / b, NA::Value(2.5));

    assert_eq!(a + na, NA::NA);
    assert_eq!(na * b, NA::NA);
    assert_eq!(a / NA::Value(0.0), NA::NA);
}

#[test]
fn test_na_display() {
    assert_eq!(format!("{}", NA::Value(3)), "3");
    assert_eq!(format!("{}", NA::<i32>::NA), "NA");
    assert_eq!(format!("{:?}", NA::<i32>::NA), "NA");
}

#[test]
fn test_na_serializes_as_null() {
    let values = vec![NA::Value(1.5), NA::NA];
    let json = serde_json::to_string(&values).unwrap();
    assert_eq!(json, "[1.5,null]");

    let back: Vec<NA<f64>> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, values);
}
