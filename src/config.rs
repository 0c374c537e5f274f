use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Nimbus configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NimbusConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Model training settings.
    #[serde(default)]
    pub markov: MarkovToml,

    /// Forecast settings.
    #[serde(default)]
    pub forecast: ForecastToml,
}

impl NimbusConfig {
    /// Loads the configuration from `path`, or the defaults when `path` is
    /// `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str)
            .with_context(|| format!("failed to parse TOML config: {}", path.display()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    /// Observation CSV.
    pub input: Option<PathBuf>,
    /// Model JSON, written by `train` and read by `forecast`.
    pub model: Option<PathBuf>,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    /// Parameter key -> CSV column name, for columns not named after the key.
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
    /// Months (1..=12) to train on; all months when absent.
    #[serde(default)]
    pub months: Option<Vec<u32>>,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            input: None,
            model: None,
            date_column: default_date_column(),
            columns: BTreeMap::new(),
            months: None,
        }
    }
}

fn default_date_column() -> String {
    "date".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkovToml {
    #[serde(default = "default_parameters")]
    pub parameters: Vec<String>,
    #[serde(default = "default_n_gram")]
    pub n_gram: usize,
}

impl Default for MarkovToml {
    fn default() -> Self {
        Self {
            parameters: default_parameters(),
            n_gram: default_n_gram(),
        }
    }
}

fn default_parameters() -> Vec<String> {
    ["tavg", "tmax", "tmin", "prcp", "wspd"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_n_gram() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastToml {
    #[serde(default = "default_days")]
    pub days: usize,
    #[serde(default = "default_top")]
    pub top: usize,
}

impl Default for ForecastToml {
    fn default() -> Self {
        Self {
            days: default_days(),
            top: default_top(),
        }
    }
}

fn default_days() -> usize {
    7
}
fn default_top() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: NimbusConfig = toml::from_str("").unwrap();
        assert_eq!(config.io.date_column, "date");
        assert!(config.io.input.is_none());
        assert_eq!(config.markov.parameters.len(), 5);
        assert_eq!(config.markov.n_gram, 1);
        assert_eq!(config.forecast.days, 7);
        assert_eq!(config.forecast.top, 5);
    }

    #[test]
    fn full_file() {
        let config: NimbusConfig = toml::from_str(
            r#"
            [io]
            input = "data/san_jose_weather.csv"
            model = "models/autumn.json"
            months = [9, 10, 11]

            [io.columns]
            tavg = "temperature"

            [markov]
            parameters = ["tavg", "prcp", "wspd"]
            n_gram = 2

            [forecast]
            days = 3
            top = 10
            "#,
        )
        .unwrap();
        assert_eq!(
            config.io.input.as_deref(),
            Some(Path::new("data/san_jose_weather.csv"))
        );
        assert_eq!(config.io.months, Some(vec![9, 10, 11]));
        assert_eq!(config.io.columns["tavg"], "temperature");
        assert_eq!(config.markov.parameters, vec!["tavg", "prcp", "wspd"]);
        assert_eq!(config.markov.n_gram, 2);
        assert_eq!(config.forecast.days, 3);
        assert_eq!(config.forecast.top, 10);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(toml::from_str::<NimbusConfig>("[markov]\nalpha = 1.0\n").is_err());
        assert!(toml::from_str::<NimbusConfig>("[plot]\n").is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nimbus.toml");
        std::fs::write(&path, "[forecast]\ndays = 14\n").unwrap();
        let config = NimbusConfig::load(Some(&path)).unwrap();
        assert_eq!(config.forecast.days, 14);
        assert_eq!(config.forecast.top, 5);

        assert!(NimbusConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
        assert_eq!(NimbusConfig::load(None).unwrap().forecast.days, 7);
    }
}
