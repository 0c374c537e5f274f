//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result};

use nimbus_io::ReaderConfig;
use nimbus_markov::{MarkovConfig, Parameter, ParameterSet};

use crate::config::{IoToml, MarkovToml};

/// Parses a list of parameter keys, keeping their order.
pub fn parse_parameters(keys: &[String]) -> Result<ParameterSet> {
    let params = keys
        .iter()
        .map(|k| k.parse::<Parameter>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid [markov].parameters")?;
    ParameterSet::new(params).context("invalid [markov].parameters")
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> Result<ReaderConfig> {
    let mut cfg = ReaderConfig::default().with_date_column(&io.date_column);
    for (key, column) in &io.columns {
        let param: Parameter = key
            .parse()
            .with_context(|| format!("invalid key in [io.columns]: {key:?}"))?;
        cfg = cfg.with_column(param, column);
    }
    if let Some(months) = &io.months {
        cfg = cfg.with_months(months.iter().copied());
    }
    cfg.validate().context("invalid [io] settings")?;
    Ok(cfg)
}

/// Builds a [`MarkovConfig`] from the TOML Markov configuration.
///
/// `n_gram` overrides the file value when set.
pub fn build_markov_config(markov: &MarkovToml, n_gram: Option<usize>) -> Result<MarkovConfig> {
    let cfg = MarkovConfig::new().with_n_gram(n_gram.unwrap_or(markov.n_gram));
    cfg.validate().context("invalid [markov] settings")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn keys(ks: &[&str]) -> Vec<String> {
        ks.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn parameters_keep_order() {
        let params = parse_parameters(&keys(&["prcp", "tavg"])).unwrap();
        assert_eq!(
            params.as_slice(),
            &[Parameter::Precipitation, Parameter::AvgTemp]
        );
    }

    #[test]
    fn parameters_rejected() {
        assert!(parse_parameters(&keys(&["tavg", "humidity"])).is_err());
        assert!(parse_parameters(&keys(&["tavg", "tavg"])).is_err());
        assert!(parse_parameters(&[]).is_err());
    }

    #[test]
    fn reader_config_from_toml() {
        let io = IoToml {
            date_column: "day".into(),
            columns: BTreeMap::from([("wspd".to_string(), "wind".to_string())]),
            months: Some(vec![9, 10, 11]),
            ..IoToml::default()
        };
        let cfg = build_reader_config(&io).unwrap();
        assert_eq!(cfg.date_column(), "day");
        assert_eq!(cfg.column(Parameter::WindSpeed), "wind");
        assert_eq!(cfg.months(), Some(&[9, 10, 11][..]));
    }

    #[test]
    fn reader_config_rejects_unknown_column_key() {
        let io = IoToml {
            columns: BTreeMap::from([("snow".to_string(), "snow".to_string())]),
            ..IoToml::default()
        };
        assert!(build_reader_config(&io).is_err());
    }

    #[test]
    fn markov_config_override() {
        let markov = MarkovToml::default();
        assert_eq!(build_markov_config(&markov, None).unwrap().n_gram(), 1);
        assert_eq!(build_markov_config(&markov, Some(3)).unwrap().n_gram(), 3);
        assert!(build_markov_config(&markov, Some(0)).is_err());
    }
}
