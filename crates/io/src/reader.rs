//! Daily observation CSV reader.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use nimbus_markov::{DailyRecord, Parameter, ParameterSet, RawValue};
use tracing::{debug, info};

use crate::error::IoError;
use crate::observed::ObservedSeries;
use crate::validate;

/// Date format of the date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const BOM: char = '\u{feff}';

// ---------------------------------------------------------------------------
// ReaderConfig
// ---------------------------------------------------------------------------

/// Configuration for reading daily observations from CSV.
///
/// By default the date is read from a `date` column and each parameter from
/// the column named after its key (`tavg`, `prcp`, ...). Use the `with_*`
/// builders to rename columns or restrict the series to certain months.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    date_column: String,
    columns: BTreeMap<Parameter, String>,
    months: Option<Vec<u32>>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            date_column: "date".into(),
            columns: BTreeMap::new(),
            months: None,
        }
    }
}

impl ReaderConfig {
    /// Set the date column name.
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    /// Read `param` from the column `name` instead of its key.
    pub fn with_column(mut self, param: Parameter, name: impl Into<String>) -> Self {
        self.columns.insert(param, name.into());
        self
    }

    /// Keep only days in the given months (1 = January).
    pub fn with_months(mut self, months: impl IntoIterator<Item = u32>) -> Self {
        self.months = Some(months.into_iter().collect());
        self
    }

    /// The date column name.
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// The column `param` is read from.
    pub fn column(&self, param: Parameter) -> &str {
        self.columns
            .get(&param)
            .map(String::as_str)
            .unwrap_or(param.key())
    }

    /// The month filter, if any.
    pub fn months(&self) -> Option<&[u32]> {
        self.months.as_deref()
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] for an empty column name, a month
    /// outside 1..=12 or an empty month filter.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut c = validate::ValidationCollector::new();
        if self.date_column.trim().is_empty() {
            c.push("date column name is empty");
        }
        for (param, name) in &self.columns {
            if name.trim().is_empty() {
                c.push(format!("column name for {param} is empty"));
            }
        }
        if let Some(months) = &self.months {
            if months.is_empty() {
                c.push("month filter is empty");
            }
            c.merge(validate::validate_months(months));
        }
        c.finish()
    }
}

// ---------------------------------------------------------------------------
// read_csv
// ---------------------------------------------------------------------------

/// Read daily observations for `params` from a CSV file.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist, and
/// otherwise any error of [`read_csv_from`].
pub fn read_csv(
    path: &Path,
    config: &ReaderConfig,
    params: &ParameterSet,
) -> Result<ObservedSeries, IoError> {
    config.validate()?;
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    let series = read_csv_from(file, config, params)?;
    info!(
        path = %path.display(),
        n_days = series.len(),
        "read observations"
    );
    Ok(series)
}

/// Read daily observations for `params` from any CSV source.
///
/// The first row is the header; a leading byte-order mark is ignored. Only
/// the date column and the selected parameters' columns are read. Empty
/// cells are missing values; cells that are not numbers are kept as text so
/// the classifier falls back to the parameter's default bin.
///
/// # Errors
///
/// - [`IoError::MissingColumn`] if the date or a parameter column is absent.
/// - [`IoError::InvalidDate`] if a date cell is not `YYYY-MM-DD`.
/// - [`IoError::Validation`] if dates are not strictly increasing.
/// - [`IoError::Csv`] on malformed CSV.
pub fn read_csv_from<R: Read>(
    reader: R,
    config: &ReaderConfig,
    params: &ParameterSet,
) -> Result<ObservedSeries, IoError> {
    config.validate()?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches(BOM).trim().to_string())
        .collect();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| IoError::MissingColumn {
                name: name.to_string(),
            })
    };

    let date_idx = find(config.date_column())?;
    let columns: Vec<(Parameter, usize)> = params
        .iter()
        .map(|p| find(config.column(p)).map(|idx| (p, idx)))
        .collect::<Result<_, _>>()?;

    let mut dates = Vec::new();
    let mut records = Vec::new();
    let mut n_missing = 0usize;
    let mut n_text = 0usize;

    for (i, row) in rdr.records().enumerate() {
        let row = row?;
        let cell = row.get(date_idx).unwrap_or_default();
        let date =
            NaiveDate::parse_from_str(cell, DATE_FORMAT).map_err(|_| IoError::InvalidDate {
                row: i + 1,
                value: cell.to_string(),
            })?;

        let mut record = DailyRecord::new();
        for &(param, idx) in &columns {
            let cell = row.get(idx).unwrap_or_default();
            if cell.is_empty() {
                n_missing += 1;
                continue;
            }
            let value = match cell.parse::<f64>() {
                Ok(v) if v.is_finite() => RawValue::Number(v),
                _ => {
                    n_text += 1;
                    RawValue::Text(cell.to_string())
                }
            };
            record.insert(param, value);
        }
        dates.push(date);
        records.push(record);
    }

    debug!(
        n_rows = records.len(),
        n_missing, n_text, "parsed observation rows"
    );

    let series = ObservedSeries::new(dates, records)?;
    Ok(match config.months() {
        Some(months) => {
            let n_before = series.len();
            let filtered = series.retain_months(months);
            debug!(
                n_before,
                n_after = filtered.len(),
                ?months,
                "applied month filter"
            );
            filtered
        }
        None => series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(s: &str) -> ParameterSet {
        s.parse().unwrap()
    }

    #[test]
    fn default_config_uses_keys() {
        let config = ReaderConfig::default();
        assert_eq!(config.date_column(), "date");
        assert_eq!(config.column(Parameter::Precipitation), "prcp");
        assert!(config.months().is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = ReaderConfig::default()
            .with_date_column("day")
            .with_column(Parameter::AvgTemp, "temperature")
            .with_months([9, 10, 11]);
        assert_eq!(config.date_column(), "day");
        assert_eq!(config.column(Parameter::AvgTemp), "temperature");
        assert_eq!(config.column(Parameter::MaxTemp), "tmax");
        assert_eq!(config.months(), Some(&[9, 10, 11][..]));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_months() {
        let err = ReaderConfig::default()
            .with_months([0, 13])
            .validate()
            .unwrap_err();
        assert!(matches!(err, IoError::Validation { count: 2, .. }));

        let err = ReaderConfig::default()
            .with_months(Vec::new())
            .validate()
            .unwrap_err();
        assert!(matches!(err, IoError::Validation { .. }));
    }

    #[test]
    fn validate_rejects_empty_names() {
        let err = ReaderConfig::default()
            .with_date_column(" ")
            .with_column(Parameter::WindSpeed, "")
            .validate()
            .unwrap_err();
        assert!(matches!(err, IoError::Validation { count: 2, .. }));
    }

    #[test]
    fn reads_numbers_text_and_missing() {
        let csv = "date,tavg,prcp\n2021-09-01,21.5,0\n2021-09-02,,T\n";
        let s = read_csv_from(csv.as_bytes(), &ReaderConfig::default(), &params("tavg,prcp"))
            .unwrap();
        assert_eq!(s.len(), 2);
        let first = &s.records()[0];
        assert_eq!(first.get(Parameter::AvgTemp), Some(&RawValue::Number(21.5)));
        assert_eq!(first.get(Parameter::Precipitation), Some(&RawValue::Number(0.0)));
        let second = &s.records()[1];
        assert_eq!(second.get(Parameter::AvgTemp), None);
        assert_eq!(
            second.get(Parameter::Precipitation),
            Some(&RawValue::Text("T".into()))
        );
    }

    #[test]
    fn strips_byte_order_mark() {
        let csv = "\u{feff}date,tavg\n2021-09-01,21.5\n";
        let s = read_csv_from(csv.as_bytes(), &ReaderConfig::default(), &params("tavg")).unwrap();
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn ignores_unselected_columns() {
        let csv = "date,tavg,snow,wdir\n2021-09-01,21.5,,270\n";
        let s = read_csv_from(csv.as_bytes(), &ReaderConfig::default(), &params("tavg")).unwrap();
        assert_eq!(s.records()[0].len(), 1);
    }

    #[test]
    fn missing_column() {
        let csv = "date,tavg\n2021-09-01,21.5\n";
        let err =
            read_csv_from(csv.as_bytes(), &ReaderConfig::default(), &params("tavg,wspd"))
                .unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref name } if name == "wspd"));
    }

    #[test]
    fn invalid_date() {
        let csv = "date,tavg\n2021-09-01,21.5\n01/09/2021,20.0\n";
        let err = read_csv_from(csv.as_bytes(), &ReaderConfig::default(), &params("tavg"))
            .unwrap_err();
        match err {
            IoError::InvalidDate { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "01/09/2021");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn out_of_order_dates() {
        let csv = "date,tavg\n2021-09-02,21.5\n2021-09-01,20.0\n";
        let err = read_csv_from(csv.as_bytes(), &ReaderConfig::default(), &params("tavg"))
            .unwrap_err();
        assert!(matches!(err, IoError::Validation { .. }));
    }

    #[test]
    fn month_filter() {
        let csv = "date,tavg\n2021-08-31,25\n2021-09-01,21\n2021-11-30,9\n2021-12-01,3\n";
        let config = ReaderConfig::default().with_months([9, 10, 11]);
        let s = read_csv_from(csv.as_bytes(), &config, &params("tavg")).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.dates()[0].to_string(), "2021-09-01");
    }
}
