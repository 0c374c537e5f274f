//! Forecast command: today's weather -> most likely states for coming days.

use std::io::Write;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, info_span, warn};

use nimbus_io::read_model;
use nimbus_markov::{Classification, DailyRecord, Forecast, ForecastEngine, Parameter};

use crate::cli::{ForecastArgs, TodayArgs};
use crate::config::NimbusConfig;
use crate::labels;

/// Run a forecast from a saved model.
pub fn run(args: ForecastArgs) -> Result<()> {
    let _cmd = info_span!("forecast").entered();

    // 1. Resolve settings
    let config = NimbusConfig::load(args.config.as_deref())?;
    let model_path = args
        .model
        .as_ref()
        .or(config.io.model.as_ref())
        .ok_or_else(|| anyhow::anyhow!("no model path: set [io].model in config or use --model"))?;
    let days = args.days.unwrap_or(config.forecast.days);
    let top = args.top.unwrap_or(config.forecast.top);
    if days == 0 {
        bail!("--days must be at least 1");
    }

    // 2. Load model
    let model = read_model(model_path)
        .with_context(|| format!("failed to read model: {}", model_path.display()))?;
    if model.n_gram() != 1 {
        bail!(
            "model uses {}-day states; forecasting from a single day needs a 1-day model",
            model.n_gram()
        );
    }

    // 3. Classify today
    let today = today_record(&args.today);
    let initial = model.classifier().classify(&today);
    if initial.is_defaulted() {
        let keys: Vec<&str> = initial.defaulted.iter().map(|p| p.key()).collect();
        warn!(params = ?keys, "no usable value given; using default bins");
    }
    info!(state = %initial.state, "classified today");

    // 4. Propagate
    let engine = ForecastEngine::for_model(&model).context("failed to build forecast matrix")?;
    info!(
        n_states = engine.space().len(),
        n_fallback = engine.matrix().n_fallback(),
        "forecast matrix ready"
    );
    let forecast = engine
        .forecast(&initial.state, days)
        .context("forecast failed")?;

    // 5. Report
    let report = Report::new(&initial, &forecast, top);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        report.write_table(&mut out)?;
    }
    Ok(())
}

/// Collects the measurements given on the command line.
fn today_record(today: &TodayArgs) -> DailyRecord {
    let given = [
        (Parameter::AvgTemp, &today.tavg),
        (Parameter::MaxTemp, &today.tmax),
        (Parameter::MinTemp, &today.tmin),
        (Parameter::Precipitation, &today.prcp),
        (Parameter::WindSpeed, &today.wspd),
    ];
    let mut record = DailyRecord::new();
    for (param, value) in given {
        if let Some(v) = value {
            record.insert(param, v.as_str());
        }
    }
    record
}

#[derive(Debug, Serialize)]
struct Report {
    initial: RankedEntry,
    defaulted: Vec<Parameter>,
    days: Vec<DayEntry>,
}

#[derive(Debug, Serialize)]
struct DayEntry {
    day: usize,
    states: Vec<RankedEntry>,
}

#[derive(Debug, Serialize)]
struct RankedEntry {
    state: String,
    description: String,
    probability: f64,
}

impl Report {
    fn new(initial: &Classification, forecast: &Forecast<'_>, top: usize) -> Self {
        let days = (1..=forecast.len())
            .map(|day| DayEntry {
                day,
                states: forecast
                    .top_k(day, top)
                    .into_iter()
                    .map(|r| RankedEntry {
                        state: r.state.to_string(),
                        description: labels::describe_state(r.state),
                        probability: r.probability,
                    })
                    .collect(),
            })
            .collect();
        Self {
            initial: RankedEntry {
                state: initial.state.to_string(),
                description: labels::describe_state(&initial.state),
                probability: 1.0,
            },
            defaulted: initial.defaulted.clone(),
            days,
        }
    }

    fn write_table(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(out, "Today: {}", self.initial.state)?;
        writeln!(out, "       {}", self.initial.description)?;
        if !self.defaulted.is_empty() {
            let keys: Vec<&str> = self.defaulted.iter().map(|p| p.key()).collect();
            writeln!(out, "       (default bins used for {})", keys.join(", "))?;
        }
        for day in &self.days {
            writeln!(out)?;
            writeln!(out, "Day {}", day.day)?;
            for entry in &day.states {
                writeln!(
                    out,
                    "  {:>6.2}%  {}",
                    entry.probability * 100.0,
                    entry.state
                )?;
                writeln!(out, "           {}", entry.description)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_markov::{MarkovConfig, RawValue, build_transition_model};

    fn today(tavg: Option<&str>, prcp: Option<&str>) -> TodayArgs {
        TodayArgs {
            tavg: tavg.map(String::from),
            tmax: None,
            tmin: None,
            prcp: prcp.map(String::from),
            wspd: None,
        }
    }

    #[test]
    fn today_record_keeps_given_values() {
        let record = today_record(&today(Some("21.5"), Some("n/a")));
        assert_eq!(record.len(), 2);
        assert_eq!(
            record.get(Parameter::Precipitation),
            Some(&RawValue::Text("n/a".into()))
        );
        assert_eq!(
            record.get(Parameter::AvgTemp).and_then(RawValue::as_number),
            Some(21.5)
        );
    }

    #[test]
    fn report_table() {
        let records: Vec<DailyRecord> = [10.0, 20.0, 20.0, 30.0, 30.0, 10.0]
            .iter()
            .map(|&v| DailyRecord::new().with(Parameter::AvgTemp, v))
            .collect();
        let model =
            build_transition_model(&records, &"tavg".parse().unwrap(), &MarkovConfig::new())
                .unwrap();
        let engine = ForecastEngine::for_model(&model).unwrap();
        let initial = model.classifier().classify(&today_record(&today(Some("12"), None)));
        let forecast = engine.forecast(&initial.state, 2).unwrap();

        let report = Report::new(&initial, &forecast, 1);
        assert_eq!(report.days.len(), 2);
        assert_eq!(report.days[0].states[0].state, "18 < tavg <= 25");

        let mut buf = Vec::new();
        report.write_table(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Today: tavg <= 18\n"));
        assert!(text.contains("Day 2\n  100.00%  25 < tavg\n"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["days"][1]["states"][0]["probability"], 1.0);
        assert_eq!(json["defaulted"], serde_json::json!([]));
    }
}
