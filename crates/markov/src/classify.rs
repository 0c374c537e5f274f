//! Raw daily records and their classification into states.

use std::collections::BTreeMap;

use crate::parameter::{Parameter, ParameterSet};
use crate::state::State;

/// A raw measurement as read from an observation source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// An already-numeric measurement.
    Number(f64),
    /// Unparsed text, e.g. a CSV cell.
    Text(String),
}

impl RawValue {
    /// Returns the finite numeric value, if there is one.
    ///
    /// Text is trimmed before parsing. Empty text, unparseable text and
    /// non-finite numbers all yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        let v = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One day of raw observations, keyed by parameter.
///
/// Parameters without an entry are treated as missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyRecord {
    values: BTreeMap<Parameter, RawValue>,
}

impl DailyRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of `param`, consuming and returning the record.
    pub fn with(mut self, param: Parameter, value: impl Into<RawValue>) -> Self {
        self.values.insert(param, value.into());
        self
    }

    /// Sets the value of `param`, replacing any previous value.
    pub fn insert(&mut self, param: Parameter, value: impl Into<RawValue>) {
        self.values.insert(param, value.into());
    }

    /// Returns the raw value of `param`, if present.
    pub fn get(&self, param: Parameter) -> Option<&RawValue> {
        self.values.get(&param)
    }

    /// Number of parameters with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no parameter has a value.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of classifying a day or a window of days.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// The classified state.
    pub state: State,
    /// Parameters whose value was missing or malformed and replaced by the
    /// parameter's default bin, one entry per substituted value.
    pub defaulted: Vec<Parameter>,
}

impl Classification {
    /// Returns `true` if any value was substituted.
    pub fn is_defaulted(&self) -> bool {
        !self.defaulted.is_empty()
    }
}

/// Maps raw daily records to states for a fixed parameter selection.
#[derive(Debug, Clone)]
pub struct StateClassifier {
    params: ParameterSet,
}

impl StateClassifier {
    /// Creates a classifier for the given parameter selection.
    pub fn new(params: ParameterSet) -> Self {
        Self { params }
    }

    /// The parameter selection, in label order.
    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Classifies one day.
    ///
    /// Missing or non-numeric values never fail: they fall back to
    /// [`Parameter::default_bin`] and are listed in
    /// [`Classification::defaulted`].
    pub fn classify(&self, record: &DailyRecord) -> Classification {
        let mut bins = Vec::with_capacity(self.params.len());
        let mut defaulted = Vec::new();
        for param in self.params.iter() {
            match record.get(param).and_then(RawValue::as_number) {
                Some(v) => bins.push(param.classify(v)),
                None => {
                    bins.push(param.default_bin());
                    defaulted.push(param);
                }
            }
        }
        Classification {
            state: State::from_bins(self.params.as_slice(), &bins),
            defaulted,
        }
    }

    /// Classifies consecutive days into one window state.
    ///
    /// A one-day window yields the same state as [`classify`](Self::classify).
    pub fn classify_window(&self, days: &[DailyRecord]) -> Classification {
        let mut states = Vec::with_capacity(days.len());
        let mut defaulted = Vec::new();
        for day in days {
            let c = self.classify(day);
            states.push(c.state);
            defaulted.extend(c.defaulted);
        }
        Classification {
            state: State::concat(&states),
            defaulted,
        }
    }
}
