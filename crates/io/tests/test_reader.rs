//! Integration test: CSV reader on files, config and file-not-found handling.

use std::io::Write;
use std::path::Path;

use nimbus_io::{IoError, ReaderConfig, read_csv};
use nimbus_markov::{Parameter, ParameterSet, RawValue};

/// A slice of a real station export: BOM on the header, extra columns, a
/// blank wind reading and a blank precipitation reading.
const STATION_CSV: &str = "\u{feff}date,tavg,tmin,tmax,prcp,snow,wdir,wspd,wpgt,pres,tsun
2021-08-30,27.1,21.0,33.2,0.0,,250,11.2,,1012.3,
2021-08-31,25.4,20.1,30.8,3.1,,240,,,1011.8,
2021-09-01,22.0,17.5,27.9,,,230,8.4,,1013.0,
2021-09-02,19.3,15.2,24.0,12.7,,220,14.9,,1009.9,
2021-12-01,4.0,-1.0,8.5,0.0,,10,20.3,,1020.1,
";

fn write_csv(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("station.csv");
    let mut f = std::fs::File::create(&path).expect("create csv");
    f.write_all(contents.as_bytes()).expect("write csv");
    path
}

fn all_params() -> ParameterSet {
    "tavg,tmax,tmin,prcp,wspd".parse().unwrap()
}

#[test]
fn read_csv_station_export() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_csv(dir.path(), STATION_CSV);

    let series = read_csv(&path, &ReaderConfig::default(), &all_params()).expect("read failed");
    assert_eq!(series.len(), 5);
    assert_eq!(series.dates()[0].to_string(), "2021-08-30");

    let aug31 = &series.records()[1];
    assert_eq!(aug31.get(Parameter::Precipitation), Some(&RawValue::Number(3.1)));
    assert_eq!(aug31.get(Parameter::WindSpeed), None);

    let sep1 = &series.records()[2];
    assert_eq!(sep1.get(Parameter::Precipitation), None);
    assert_eq!(sep1.len(), 4);

    let dec1 = &series.records()[4];
    assert_eq!(dec1.get(Parameter::MinTemp), Some(&RawValue::Number(-1.0)));
}

#[test]
fn read_csv_autumn_only() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_csv(dir.path(), STATION_CSV);
    let config = ReaderConfig::default().with_months([9, 10, 11]);

    let series = read_csv(&path, &config, &"tavg".parse().unwrap()).expect("read failed");
    assert_eq!(series.len(), 2);
    let (first, last) = series.span().unwrap();
    assert_eq!(first.to_string(), "2021-09-01");
    assert_eq!(last.to_string(), "2021-09-02");
}

#[test]
fn read_csv_renamed_columns() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_csv(
        dir.path(),
        "day,temperature\n2021-09-01,22.0\n2021-09-02,not-measured\n",
    );
    let config = ReaderConfig::default()
        .with_date_column("day")
        .with_column(Parameter::AvgTemp, "temperature");

    let series = read_csv(&path, &config, &"tavg".parse().unwrap()).expect("read failed");
    assert_eq!(
        series.records()[1].get(Parameter::AvgTemp),
        Some(&RawValue::Text("not-measured".into()))
    );
}

#[test]
fn read_csv_file_not_found() {
    let path = Path::new("/tmp/nimbus_test_nonexistent_file.csv");
    let config = ReaderConfig::default();

    let result = read_csv(path, &config, &all_params());
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(
        matches!(err, IoError::FileNotFound { .. }),
        "expected FileNotFound, got {err:?}",
    );
}

#[test]
fn read_csv_invalid_config_rejects_early() {
    let path = Path::new("/tmp/nimbus_test_nonexistent_file.csv");
    let config = ReaderConfig::default().with_months([13]);

    let result = read_csv(path, &config, &all_params());
    assert!(result.is_err());

    // Should fail on config validation before even trying to open the file.
    let err = result.unwrap_err();
    assert!(
        matches!(err, IoError::Validation { .. }),
        "expected Validation error, got {err:?}",
    );
}

#[test]
fn read_csv_ragged_row_is_csv_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = write_csv(dir.path(), "date,tavg\n2021-09-01,22.0,extra\n");

    let err = read_csv(&path, &ReaderConfig::default(), &"tavg".parse().unwrap()).unwrap_err();
    assert!(matches!(err, IoError::Csv { .. }), "expected Csv, got {err:?}");
}
