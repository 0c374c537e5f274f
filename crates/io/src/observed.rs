//! Observed daily weather series.

use chrono::{Datelike, NaiveDate};
use nimbus_markov::DailyRecord;

use crate::error::IoError;
use crate::validate;

/// Dated daily records in calendar order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedSeries {
    dates: Vec<NaiveDate>,
    records: Vec<DailyRecord>,
}

impl ObservedSeries {
    /// Creates a series after validating inputs.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the lengths differ or the dates are
    /// not strictly increasing.
    pub fn new(dates: Vec<NaiveDate>, records: Vec<DailyRecord>) -> Result<Self, IoError> {
        validate::validate_lengths(dates.len(), records.len()).finish()?;
        validate::validate_date_order(&dates).finish()?;
        Ok(Self { dates, records })
    }

    /// Observation dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Daily records, aligned with [`dates`](Self::dates).
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// Number of observed days.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the series holds no days.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First and last observation dates.
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    /// Keeps only days whose month is in `months`.
    ///
    /// The result has calendar gaps between seasons; train on
    /// [`runs`](Self::runs) so no transition spans one.
    pub fn retain_months(self, months: &[u32]) -> Self {
        let (dates, records) = self
            .dates
            .into_iter()
            .zip(self.records)
            .filter(|(d, _)| months.contains(&d.month()))
            .unzip();
        Self { dates, records }
    }

    /// Splits the records into runs of consecutive calendar days.
    ///
    /// A new run starts wherever a day is missing, for example between the
    /// seasons kept by [`retain_months`](Self::retain_months).
    pub fn runs(&self) -> Vec<&[DailyRecord]> {
        let mut runs = Vec::new();
        let mut start = 0;
        for (i, pair) in self.dates.windows(2).enumerate() {
            if pair[0].succ_opt() != Some(pair[1]) {
                runs.push(&self.records[start..=i]);
                start = i + 1;
            }
        }
        if start < self.records.len() {
            runs.push(&self.records[start..]);
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_markov::Parameter;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(v: f64) -> DailyRecord {
        DailyRecord::new().with(Parameter::AvgTemp, v)
    }

    #[test]
    fn valid_series() {
        let s = ObservedSeries::new(
            vec![date(2021, 8, 31), date(2021, 9, 1)],
            vec![record(20.0), record(19.0)],
        )
        .unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.span(), Some((date(2021, 8, 31), date(2021, 9, 1))));
    }

    #[test]
    fn length_mismatch_rejected() {
        let err = ObservedSeries::new(vec![date(2021, 1, 1)], vec![]).unwrap_err();
        assert!(matches!(err, IoError::Validation { count: 1, .. }));
    }

    #[test]
    fn unordered_dates_rejected() {
        let err = ObservedSeries::new(
            vec![date(2021, 1, 2), date(2021, 1, 1)],
            vec![record(1.0), record(2.0)],
        )
        .unwrap_err();
        assert!(matches!(err, IoError::Validation { .. }));
    }

    #[test]
    fn retain_months_keeps_order() {
        let s = ObservedSeries::new(
            vec![
                date(2020, 8, 31),
                date(2020, 9, 1),
                date(2020, 11, 30),
                date(2020, 12, 1),
                date(2021, 9, 1),
            ],
            (0..5).map(|i| record(i as f64)).collect(),
        )
        .unwrap();
        let autumn = s.retain_months(&[9, 10, 11]);
        assert_eq!(
            autumn.dates(),
            &[date(2020, 9, 1), date(2020, 11, 30), date(2021, 9, 1)]
        );
        assert_eq!(autumn.records()[0], record(1.0));
        assert_eq!(autumn.records()[2], record(4.0));
    }

    #[test]
    fn runs_split_at_missing_days() {
        let s = ObservedSeries::new(
            vec![
                date(2020, 11, 29),
                date(2020, 11, 30),
                date(2021, 9, 1),
                date(2021, 9, 3),
                date(2021, 9, 4),
            ],
            (0..5).map(|i| record(i as f64)).collect(),
        )
        .unwrap();
        let runs = s.runs();
        assert_eq!(
            runs.iter().map(|r| r.len()).collect::<Vec<_>>(),
            vec![2, 1, 2]
        );
        assert_eq!(runs[1][0], record(2.0));
        assert_eq!(runs[2][1], record(4.0));
    }

    #[test]
    fn runs_cross_month_and_year_ends() {
        let s = ObservedSeries::new(
            vec![date(2020, 12, 31), date(2021, 1, 1), date(2021, 1, 2)],
            vec![record(1.0), record(2.0), record(3.0)],
        )
        .unwrap();
        assert_eq!(s.runs(), vec![s.records()]);
    }

    #[test]
    fn empty_series() {
        let s = ObservedSeries::default();
        assert!(s.is_empty());
        assert_eq!(s.span(), None);
        assert!(s.runs().is_empty());
    }
}
