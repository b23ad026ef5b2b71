//! Tests for the accident dataset loading, cleaning and labeling.

use std::io::Write;

use routesafe::dataset::{
    load_raw_records, load_training_frame, median, quantile, stratified_split, FEATURE_COLUMNS,
};

fn write_temp_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const CLEANED_CSV: &str = "\
Name of City,Total Accidents - 2015,Killed - 2015,Injured - 2015,Severity - 2015
Agra,1200,300,900,25.0
Bengaluru,4700,740,4000,15.7
Chennai,7300,900,6500,12.3
Delhi,8085,1622,8000,20.1
Ghost Town,,,,
Hyderabad,2500,400,2200,16.0
";

#[test]
fn training_frame_drops_incomplete_rows() {
    let file = write_temp_csv(CLEANED_CSV);
    let frame = load_training_frame(file.path()).unwrap();

    // "Ghost Town" has no values in the selected columns
    assert_eq!(frame.len(), 5);
    assert_eq!(frame.features[0].len(), FEATURE_COLUMNS.len());
}

#[test]
fn training_labels_follow_the_severity_median() {
    let file = write_temp_csv(CLEANED_CSV);
    let frame = load_training_frame(file.path()).unwrap();

    // Severities: 25.0, 15.7, 12.3, 20.1, 16.0 -> median 16.0.
    // Strictly greater than the median counts as high risk.
    assert_eq!(frame.labels, vec![1, 0, 0, 1, 0]);

    let (low, high) = frame.label_counts();
    assert_eq!((low, high), (3, 2));
}

#[test]
fn training_frame_orders_features_like_the_model() {
    let file = write_temp_csv(CLEANED_CSV);
    let frame = load_training_frame(file.path()).unwrap();

    // First row is Agra; column order is FEATURE_COLUMNS, not file order
    assert_eq!(frame.features[0], vec![25.0, 1200.0, 300.0, 900.0]);
}

#[test]
fn training_frame_requires_all_feature_columns() {
    let file = write_temp_csv("Name of City,Severity - 2015\nAgra,25.0\n");
    let result = load_training_frame(file.path());
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Total Accidents - 2015"));
}

#[test]
fn raw_records_fill_missing_city_names() {
    // Headerless file: city name plus 29 value columns
    let mut row_missing_city = String::new();
    row_missing_city.push_str(&",1".repeat(29));
    let contents = format!("Agra{}\n{}\n", ",2".repeat(29), &row_missing_city);

    let file = write_temp_csv(&contents);
    let records = load_raw_records(file.path()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].city, "Agra");
    assert_eq!(records[1].city, "Unknown City");
    assert_eq!(records[0].column("Severity - 2015"), Some(2.0));
}

#[test]
fn raw_records_treat_non_numeric_cells_as_missing() {
    let mut values = vec!["Agra".to_string()];
    values.extend((0..29).map(|i| {
        if i == 28 {
            "n/a".to_string()
        } else {
            i.to_string()
        }
    }));
    let file = write_temp_csv(&format!("{}\n", values.join(",")));

    let records = load_raw_records(file.path()).unwrap();
    // Last column is "Severity - 2015"
    assert_eq!(records[0].column("Severity - 2015"), None);
    assert_eq!(records[0].column("Injured - 2015"), Some(27.0));
}

#[test]
fn median_and_quantile_edges() {
    assert_eq!(median(&[16.0]), 16.0);
    assert_eq!(median(&[12.3, 15.7, 16.0, 20.1, 25.0]), 16.0);
    assert_eq!(quantile(&[10.0, 20.0, 30.0, 40.0], 0.25), Some(17.5));
    assert_eq!(quantile(&[5.0], 0.25), Some(5.0));
}

#[test]
fn stratified_split_is_deterministic_for_a_seed() {
    let file = write_temp_csv(CLEANED_CSV);
    let frame = load_training_frame(file.path()).unwrap();

    let (x_a, y_a, _, _) = stratified_split(&frame, 0.4, 42);
    let (x_b, y_b, _, _) = stratified_split(&frame, 0.4, 42);
    assert_eq!(x_a, x_b);
    assert_eq!(y_a, y_b);
}
