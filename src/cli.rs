use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Nimbus Markov-chain weather forecaster.
#[derive(Parser)]
#[command(
    name = "nimbus",
    version,
    about = "Markov-chain weather state forecaster"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Train a transition model from daily observations.
    Train(TrainArgs),
    /// Forecast state probabilities from today's weather.
    Forecast(ForecastArgs),
    /// List the state space of a parameter selection.
    States(StatesArgs),
}

/// Arguments for the `train` subcommand.
#[derive(clap::Args)]
pub struct TrainArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override observation CSV path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override model JSON output path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override parameters from config, comma-separated (e.g. `tavg,prcp`).
    #[arg(short, long)]
    pub params: Option<String>,

    /// Override days per state from config.
    #[arg(short = 'n', long = "n-gram")]
    pub n_gram: Option<usize>,
}

/// Arguments for the `forecast` subcommand.
#[derive(clap::Args)]
pub struct ForecastArgs {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override model JSON path from config.
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Override number of days to forecast from config.
    #[arg(short, long)]
    pub days: Option<usize>,

    /// Override number of states shown per day from config.
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Print the forecast as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Today's measurements. Omitted values fall back to default bins.
    #[command(flatten)]
    pub today: TodayArgs,
}

/// Today's raw measurements for the `forecast` subcommand.
///
/// Values are kept as text; anything that is not a number is treated like a
/// missing measurement.
#[derive(clap::Args)]
pub struct TodayArgs {
    /// Average temperature of the day in °C.
    #[arg(long, allow_hyphen_values = true)]
    pub tavg: Option<String>,

    /// Maximum temperature of the day in °C.
    #[arg(long, allow_hyphen_values = true)]
    pub tmax: Option<String>,

    /// Minimum temperature of the day in °C.
    #[arg(long, allow_hyphen_values = true)]
    pub tmin: Option<String>,

    /// Precipitation of the day in mm.
    #[arg(long, allow_hyphen_values = true)]
    pub prcp: Option<String>,

    /// Average wind speed of the day in km/h.
    #[arg(long, allow_hyphen_values = true)]
    pub wspd: Option<String>,
}

/// Arguments for the `states` subcommand.
#[derive(clap::Args)]
pub struct StatesArgs {
    /// Parameters, comma-separated, in state order.
    #[arg(short, long, default_value = "tavg,tmax,tmin,prcp,wspd")]
    pub params: String,

    /// Days per state.
    #[arg(short = 'n', long = "n-gram", default_value_t = 1)]
    pub n_gram: usize,

    /// Also print a plain-language description of each state.
    #[arg(short, long)]
    pub describe: bool,
}
