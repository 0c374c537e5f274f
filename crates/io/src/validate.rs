//! Accumulated validation utilities.
//!
//! Provides [`ValidationCollector`] for gathering multiple validation errors
//! into a single [`IoError::Validation`], plus checks on observation series
//! and reader settings.

use chrono::NaiveDate;

use crate::error::IoError;

/// At most this many individual messages are kept in the details string.
const MAX_REPORTED: usize = 5;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation errors and converts them into a single
/// [`IoError::Validation`].
///
/// The reported count covers every error pushed; only the first few messages
/// are joined into the details.
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
    count: usize,
}

impl ValidationCollector {
    pub(crate) fn new() -> Self {
        Self {
            errors: Vec::new(),
            count: 0,
        }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.count += 1;
        if self.errors.len() < MAX_REPORTED {
            self.errors.push(msg.into());
        }
    }

    /// Absorb every error recorded by `other`.
    pub(crate) fn merge(&mut self, other: ValidationCollector) {
        let hidden = other.count - other.errors.len();
        for msg in other.errors {
            self.push(msg);
        }
        self.count += hidden;
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    /// Consume the collector and return `Ok(())` if no errors were recorded,
    /// or `Err(IoError::Validation { count, details })` otherwise.
    ///
    /// The `details` string joins the kept messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.count == 0 {
            return Ok(());
        }
        let mut details = self.errors.join("; ");
        if self.count > self.errors.len() {
            details.push_str(&format!("; ... and {} more", self.count - self.errors.len()));
        }
        Err(IoError::Validation {
            count: self.count,
            details,
        })
    }
}

// ---------------------------------------------------------------------------
// Standalone validation helpers
// ---------------------------------------------------------------------------

/// Check that the date and record sequences have the same length.
pub(crate) fn validate_lengths(dates_len: usize, records_len: usize) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    if dates_len != records_len {
        c.push(format!(
            "dates length ({dates_len}) != records length ({records_len})"
        ));
    }
    c
}

/// Check that dates are strictly increasing.
///
/// Training pairs consecutive records, so a series that is not in calendar
/// order is rejected rather than re-sorted.
pub(crate) fn validate_date_order(dates: &[NaiveDate]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for (i, pair) in dates.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            c.push(format!(
                "date {} at index {} does not follow {}",
                pair[1],
                i + 1,
                pair[0]
            ));
        }
    }
    c
}

/// Check that every month is in `1..=12`.
pub(crate) fn validate_months(months: &[u32]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for &m in months {
        if !(1..=12).contains(&m) {
            c.push(format!("month {m} outside 1..=12"));
        }
    }
    c
}
