//! Discrete weather states and their canonical string form.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parameter::Parameter;

/// Separator between the bin labels of one day.
pub const BIN_SEPARATOR: &str = "; ";

/// Separator between the days of an n-gram window.
pub const DAY_SEPARATOR: &str = " | ";

/// A discretized weather state.
///
/// Stores the canonical string: one bin label per selected parameter joined
/// by [`BIN_SEPARATOR`], and for multi-day windows one such group per day
/// joined by [`DAY_SEPARATOR`]. Two states are equal iff their canonical
/// strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(String);

impl State {
    /// Wraps a canonical state string without checking it.
    ///
    /// Membership in a parameter selection is checked where the state is
    /// used, see [`StateSpace::index_of`](crate::StateSpace::index_of).
    pub fn new(canonical: impl Into<String>) -> Self {
        Self(canonical.into())
    }

    /// Builds the single-day state for bin indices aligned with `params`.
    pub(crate) fn from_bins(params: &[Parameter], bins: &[usize]) -> Self {
        debug_assert_eq!(params.len(), bins.len());
        let labels: Vec<&str> = params
            .iter()
            .zip(bins)
            .map(|(p, &b)| p.bin_label(b))
            .collect();
        Self(labels.join(BIN_SEPARATOR))
    }

    /// Concatenates consecutive single-day states into one window state.
    pub fn concat<'a>(days: impl IntoIterator<Item = &'a State>) -> Self {
        let parts: Vec<&str> = days.into_iter().map(State::as_str).collect();
        Self(parts.join(DAY_SEPARATOR))
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Per-day groups of bin labels.
    pub fn days(&self) -> impl Iterator<Item = &str> {
        self.0.split(DAY_SEPARATOR)
    }

    /// All bin labels across every day, in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.days().flat_map(|day| day.split(BIN_SEPARATOR))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for State {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bins_follows_parameter_order() {
        let a = State::from_bins(&[Parameter::AvgTemp, Parameter::Precipitation], &[1, 0]);
        assert_eq!(a.as_str(), "18 < tavg <= 25; prcp == 0");

        let b = State::from_bins(&[Parameter::Precipitation, Parameter::AvgTemp], &[0, 1]);
        assert_eq!(b.as_str(), "prcp == 0; 18 < tavg <= 25");
        assert_ne!(a, b);
    }

    #[test]
    fn concat_and_split() {
        let d1 = State::new("tavg <= 18; prcp == 0");
        let d2 = State::new("25 < tavg; 10 < prcp");
        let w = State::concat([&d1, &d2]);
        assert_eq!(w.as_str(), "tavg <= 18; prcp == 0 | 25 < tavg; 10 < prcp");
        assert_eq!(w.days().collect::<Vec<_>>(), vec![d1.as_str(), d2.as_str()]);
        assert_eq!(
            w.labels().collect::<Vec<_>>(),
            vec!["tavg <= 18", "prcp == 0", "25 < tavg", "10 < prcp"]
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let s = State::new("wspd <= 5");
        assert_eq!(serde_json::to_string(&s).unwrap(), r#""wspd <= 5""#);
    }

    #[test]
    fn trait_assertions() {
        fn assert_eq<T: Eq>() {}
        fn assert_hash<T: std::hash::Hash>() {}
        fn assert_ord<T: Ord>() {}
        assert_eq::<State>();
        assert_hash::<State>();
        assert_ord::<State>();
    }
}
