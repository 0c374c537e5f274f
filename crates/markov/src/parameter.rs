//! Weather parameters and their fixed bin tables.
//!
//! Every parameter discretizes a raw daily measurement into one of a small
//! number of named bins. The bin labels are the canonical (persisted) form
//! and follow the threshold notation used in saved models, e.g.
//! `18 < tavg <= 25`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarkovError;

/// A measured daily weather parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Parameter {
    /// Average temperature of the day in °C.
    #[serde(rename = "tavg")]
    AvgTemp,
    /// Maximum temperature of the day in °C.
    #[serde(rename = "tmax")]
    MaxTemp,
    /// Minimum temperature of the day in °C.
    #[serde(rename = "tmin")]
    MinTemp,
    /// Precipitation of the day in mm.
    #[serde(rename = "prcp")]
    Precipitation,
    /// Average wind speed of the day in km/h.
    #[serde(rename = "wspd")]
    WindSpeed,
}

const TAVG_BINS: [&str; 3] = ["tavg <= 18", "18 < tavg <= 25", "25 < tavg"];
const TMAX_BINS: [&str; 3] = ["tmax <= 18", "18 < tmax <= 25", "25 < tmax"];
const TMIN_BINS: [&str; 2] = ["tmin <= 18", "18 < tmin"];
const PRCP_BINS: [&str; 4] = ["prcp == 0", "0 < prcp <= 5", "5 < prcp <= 10", "10 < prcp"];
const WSPD_BINS: [&str; 3] = ["wspd <= 5", "5 < wspd <= 10", "10 < wspd"];

impl Parameter {
    /// All parameters in canonical order.
    pub const ALL: [Parameter; 5] = [
        Self::AvgTemp,
        Self::MaxTemp,
        Self::MinTemp,
        Self::Precipitation,
        Self::WindSpeed,
    ];

    /// Short key used in observation files and saved models.
    pub fn key(self) -> &'static str {
        match self {
            Self::AvgTemp => "tavg",
            Self::MaxTemp => "tmax",
            Self::MinTemp => "tmin",
            Self::Precipitation => "prcp",
            Self::WindSpeed => "wspd",
        }
    }

    /// Ordered bin labels for this parameter.
    pub fn bins(self) -> &'static [&'static str] {
        match self {
            Self::AvgTemp => &TAVG_BINS,
            Self::MaxTemp => &TMAX_BINS,
            Self::MinTemp => &TMIN_BINS,
            Self::Precipitation => &PRCP_BINS,
            Self::WindSpeed => &WSPD_BINS,
        }
    }

    /// Number of bins for this parameter.
    pub fn n_bins(self) -> usize {
        self.bins().len()
    }

    /// Bin substituted when a measurement is missing or malformed.
    ///
    /// Temperatures default to the moderate bin (for `tmin`, which has no
    /// upper bound above 18, that is `18 < tmin`), precipitation to no rain
    /// and wind speed to low wind.
    pub fn default_bin(self) -> usize {
        match self {
            Self::AvgTemp | Self::MaxTemp | Self::MinTemp => 1,
            Self::Precipitation | Self::WindSpeed => 0,
        }
    }

    /// Returns the bin index for a finite measurement.
    ///
    /// Upper bounds are inclusive. Precipitation of exactly zero is its own
    /// bin; negative precipitation and wind speed land in the lowest bin.
    pub fn classify(self, value: f64) -> usize {
        match self {
            Self::AvgTemp | Self::MaxTemp => {
                if value <= 18.0 {
                    0
                } else if value <= 25.0 {
                    1
                } else {
                    2
                }
            }
            Self::MinTemp => usize::from(value > 18.0),
            Self::Precipitation => {
                if value <= 0.0 {
                    0
                } else if value <= 5.0 {
                    1
                } else if value <= 10.0 {
                    2
                } else {
                    3
                }
            }
            Self::WindSpeed => {
                if value <= 5.0 {
                    0
                } else if value <= 10.0 {
                    1
                } else {
                    2
                }
            }
        }
    }

    /// Returns the label of bin `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.n_bins()`.
    pub fn bin_label(self, index: usize) -> &'static str {
        self.bins()[index]
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Parameter {
    type Err = MarkovError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.key() == name)
            .ok_or_else(|| MarkovError::UnknownParameter {
                name: s.to_string(),
            })
    }
}

/// An ordered, non-empty selection of distinct parameters.
///
/// The order is significant: it fixes the order of bin labels inside a
/// state's canonical string and the enumeration order of the state space.
/// Training and forecasting must use the same ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Parameter>", into = "Vec<Parameter>")]
pub struct ParameterSet {
    params: Vec<Parameter>,
}

impl ParameterSet {
    /// Creates a parameter set.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::EmptyParameters`] if `params` is empty and
    /// [`MarkovError::DuplicateParameter`] if a parameter repeats.
    pub fn new(params: Vec<Parameter>) -> Result<Self, MarkovError> {
        if params.is_empty() {
            return Err(MarkovError::EmptyParameters);
        }
        for (i, p) in params.iter().enumerate() {
            if params[..i].contains(p) {
                return Err(MarkovError::DuplicateParameter { name: p.key() });
            }
        }
        Ok(Self { params })
    }

    /// All five parameters in canonical order.
    pub fn all() -> Self {
        Self {
            params: Parameter::ALL.to_vec(),
        }
    }

    /// Parameters in selection order.
    pub fn as_slice(&self) -> &[Parameter] {
        &self.params
    }

    /// Iterates over the parameters in selection order.
    pub fn iter(&self) -> impl Iterator<Item = Parameter> + '_ {
        self.params.iter().copied()
    }

    /// Number of selected parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Always `false`; a parameter set cannot be empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns `true` if `param` is selected.
    pub fn contains(&self, param: Parameter) -> bool {
        self.params.contains(&param)
    }

    /// Number of distinct single-day states (product of bin counts).
    pub fn n_day_states(&self) -> usize {
        self.params.iter().map(|p| p.n_bins()).product()
    }
}

impl TryFrom<Vec<Parameter>> for ParameterSet {
    type Error = MarkovError;

    fn try_from(params: Vec<Parameter>) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}

impl From<ParameterSet> for Vec<Parameter> {
    fn from(set: ParameterSet) -> Self {
        set.params
    }
}

impl FromStr for ParameterSet {
    type Err = MarkovError;

    /// Parses a comma-separated list of parameter keys, e.g. `"tavg,prcp"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let params = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Parameter>, _>>()?;
        Self::new(params)
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(p.key())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_counts() {
        assert_eq!(Parameter::AvgTemp.n_bins(), 3);
        assert_eq!(Parameter::MaxTemp.n_bins(), 3);
        assert_eq!(Parameter::MinTemp.n_bins(), 2);
        assert_eq!(Parameter::Precipitation.n_bins(), 4);
        assert_eq!(Parameter::WindSpeed.n_bins(), 3);
    }

    #[test]
    fn temperature_boundaries() {
        let p = Parameter::AvgTemp;
        assert_eq!(p.classify(-5.0), 0);
        assert_eq!(p.classify(18.0), 0);
        assert_eq!(p.classify(18.01), 1);
        assert_eq!(p.classify(25.0), 1);
        assert_eq!(p.classify(25.5), 2);
    }

    #[test]
    fn min_temperature_has_two_bins() {
        assert_eq!(Parameter::MinTemp.classify(18.0), 0);
        assert_eq!(Parameter::MinTemp.classify(30.0), 1);
    }

    #[test]
    fn precipitation_boundaries() {
        let p = Parameter::Precipitation;
        assert_eq!(p.classify(0.0), 0);
        assert_eq!(p.classify(0.1), 1);
        assert_eq!(p.classify(5.0), 1);
        assert_eq!(p.classify(10.0), 2);
        assert_eq!(p.classify(10.1), 3);
        assert_eq!(p.classify(-1.0), 0);
    }

    #[test]
    fn wind_boundaries() {
        let p = Parameter::WindSpeed;
        assert_eq!(p.classify(5.0), 0);
        assert_eq!(p.classify(7.5), 1);
        assert_eq!(p.classify(10.0), 1);
        assert_eq!(p.classify(10.5), 2);
    }

    #[test]
    fn default_bins() {
        assert_eq!(
            Parameter::AvgTemp.bin_label(Parameter::AvgTemp.default_bin()),
            "18 < tavg <= 25"
        );
        assert_eq!(Parameter::MinTemp.bin_label(Parameter::MinTemp.default_bin()), "18 < tmin");
        assert_eq!(
            Parameter::Precipitation.bin_label(Parameter::Precipitation.default_bin()),
            "prcp == 0"
        );
        assert_eq!(Parameter::WindSpeed.bin_label(Parameter::WindSpeed.default_bin()), "wspd <= 5");
    }

    #[test]
    fn parse_parameter() {
        assert_eq!("tavg".parse::<Parameter>().unwrap(), Parameter::AvgTemp);
        assert_eq!(" PRCP ".parse::<Parameter>().unwrap(), Parameter::Precipitation);
        assert!(matches!(
            "humidity".parse::<Parameter>(),
            Err(MarkovError::UnknownParameter { .. })
        ));
    }

    #[test]
    fn parameter_set_rejects_empty_and_duplicates() {
        assert_eq!(ParameterSet::new(vec![]), Err(MarkovError::EmptyParameters));
        assert_eq!(
            ParameterSet::new(vec![Parameter::AvgTemp, Parameter::AvgTemp]),
            Err(MarkovError::DuplicateParameter { name: "tavg" })
        );
    }

    #[test]
    fn parameter_set_parse_and_display() {
        let set: ParameterSet = "tavg, prcp,wspd".parse().unwrap();
        assert_eq!(
            set.as_slice(),
            &[Parameter::AvgTemp, Parameter::Precipitation, Parameter::WindSpeed]
        );
        assert_eq!(set.to_string(), "tavg,prcp,wspd");
        assert_eq!(set.n_day_states(), 36);
        assert!("".parse::<ParameterSet>().is_err());
    }

    #[test]
    fn parameter_set_all() {
        let set = ParameterSet::all();
        assert_eq!(set.len(), 5);
        assert_eq!(set.n_day_states(), 216);
    }

    #[test]
    fn parameter_set_serde() {
        let set: ParameterSet = "tmax,wspd".parse().unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["tmax","wspd"]"#);
        let back: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
        assert!(serde_json::from_str::<ParameterSet>(r#"["tmax","tmax"]"#).is_err());
    }
}
