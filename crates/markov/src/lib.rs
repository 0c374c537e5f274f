//! First-order Markov chain over discretized daily weather states.
//!
//! Each day's measurements are binned per parameter and combined into a
//! state; transitions between consecutive windows of days are counted into
//! an empirical model, and forecasts propagate a probability vector through
//! the dense transition matrix of the full state space.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │  classify     │────▶│  transition    │────▶│    forecast      │
//!  │  (bin days)   │     │  (count, norm) │     │  (propagate P·v) │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//!                                                       ▲
//!                              ┌──────────────┐         │
//!                              │    space      │─────────┘
//!                              │  (enumerate)  │
//!                              └──────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use nimbus_markov::{
//!     DailyRecord, ForecastEngine, MarkovConfig, Parameter, ParameterSet, State,
//!     build_transition_model,
//! };
//!
//! let params: ParameterSet = "tavg".parse().unwrap();
//! let records = vec![
//!     DailyRecord::new().with(Parameter::AvgTemp, 20.0),
//!     DailyRecord::new().with(Parameter::AvgTemp, 10.0),
//! ];
//! let model = build_transition_model(&records, &params, &MarkovConfig::new()).unwrap();
//!
//! let engine = ForecastEngine::for_model(&model).unwrap();
//! let forecast = engine.forecast(&State::new("18 < tavg <= 25"), 3).unwrap();
//! assert_eq!(forecast.len(), 3);
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod forecast;
pub mod matrix;
pub mod parameter;
pub mod space;
pub mod state;
pub mod transition;

pub use classify::{Classification, DailyRecord, RawValue, StateClassifier};
pub use config::MarkovConfig;
pub use error::MarkovError;
pub use forecast::{Forecast, ForecastEngine, RankedState};
pub use matrix::{ProbabilityVector, TransitionMatrix};
pub use parameter::{Parameter, ParameterSet};
pub use space::{MAX_STATES, StateId, StateSpace};
pub use state::{BIN_SEPARATOR, DAY_SEPARATOR, State};
pub use transition::{
    GenericDistribution, SUM_TOLERANCE, TrainedModel, TrainingSummary, TransitionCounts,
    TransitionModel, build_transition_model, build_transition_model_runs,
};
