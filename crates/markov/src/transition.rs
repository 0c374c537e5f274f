//! Empirical transition model estimation.
//!
//! Counts transitions between consecutive, non-overlapping windows of
//! classified days and normalizes them into a conditional model plus the
//! marginal ("generic") distribution used for unobserved source states.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{DailyRecord, StateClassifier};
use crate::config::MarkovConfig;
use crate::error::MarkovError;
use crate::parameter::ParameterSet;
use crate::space::check_state;
use crate::state::State;

/// Tolerance for probability tables summing to one.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Checks that `probs` are finite, lie in `[0, 1]` and sum to one.
fn check_distribution<'a>(
    name: &str,
    probs: impl IntoIterator<Item = (&'a State, &'a f64)>,
) -> Result<(), MarkovError> {
    let mut sum = 0.0;
    for (state, &p) in probs {
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(MarkovError::InvalidProbabilities {
                reason: format!("{name}: probability of {state:?} is {p}, outside [0, 1]"),
            });
        }
        sum += p;
    }
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(MarkovError::InvalidProbabilities {
            reason: format!("{name}: probabilities sum to {sum}, expected 1"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// TransitionModel
// ---------------------------------------------------------------------------

/// Conditional next-state probabilities for every observed source state.
///
/// Serializes as a nested map: source state → destination state →
/// probability. Only destinations actually observed from a source are
/// stored; all others have probability zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<State, BTreeMap<State, f64>>",
    into = "BTreeMap<State, BTreeMap<State, f64>>"
)]
pub struct TransitionModel {
    rows: BTreeMap<State, BTreeMap<State, f64>>,
}

impl TransitionModel {
    /// Builds a model from explicit rows, validating each one.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidProbabilities`] if any row has a value
    /// outside `[0, 1]` or does not sum to one.
    pub fn from_rows(rows: BTreeMap<State, BTreeMap<State, f64>>) -> Result<Self, MarkovError> {
        let model = Self { rows };
        model.validate()?;
        Ok(model)
    }

    /// Checks that every row is a probability distribution.
    pub fn validate(&self) -> Result<(), MarkovError> {
        for (source, row) in &self.rows {
            check_distribution(&format!("row {source:?}"), row)?;
        }
        Ok(())
    }

    /// Outgoing distribution of `source`, or `None` if it was never observed.
    pub fn row(&self, source: &State) -> Option<&BTreeMap<State, f64>> {
        self.rows.get(source)
    }

    /// Probability of moving from `from` to `to`; zero if unobserved.
    pub fn prob(&self, from: &State, to: &State) -> f64 {
        self.rows
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0.0)
    }

    /// Observed source states in canonical order.
    pub fn sources(&self) -> impl Iterator<Item = &State> {
        self.rows.keys()
    }

    /// Iterates over `(source, row)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&State, &BTreeMap<State, f64>)> {
        self.rows.iter()
    }

    /// Number of observed source states.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no source state was observed.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TryFrom<BTreeMap<State, BTreeMap<State, f64>>> for TransitionModel {
    type Error = MarkovError;

    fn try_from(rows: BTreeMap<State, BTreeMap<State, f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<TransitionModel> for BTreeMap<State, BTreeMap<State, f64>> {
    fn from(model: TransitionModel) -> Self {
        model.rows
    }
}

// ---------------------------------------------------------------------------
// GenericDistribution
// ---------------------------------------------------------------------------

/// Marginal distribution of destination states over all observed transitions.
///
/// Substituted for the outgoing distribution of any state never observed as
/// a transition source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<State, f64>", into = "BTreeMap<State, f64>")]
pub struct GenericDistribution {
    probs: BTreeMap<State, f64>,
}

impl GenericDistribution {
    /// Builds a distribution from explicit probabilities.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidProbabilities`] if a value is outside
    /// `[0, 1]` or the values do not sum to one.
    pub fn from_probs(probs: BTreeMap<State, f64>) -> Result<Self, MarkovError> {
        check_distribution("generic distribution", &probs)?;
        Ok(Self { probs })
    }

    /// Probability of `state`; zero if it was never a destination.
    pub fn prob(&self, state: &State) -> f64 {
        self.probs.get(state).copied().unwrap_or(0.0)
    }

    /// Iterates over `(state, probability)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&State, f64)> {
        self.probs.iter().map(|(s, &p)| (s, p))
    }

    /// Number of states with an entry.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }
}

impl TryFrom<BTreeMap<State, f64>> for GenericDistribution {
    type Error = MarkovError;

    fn try_from(probs: BTreeMap<State, f64>) -> Result<Self, Self::Error> {
        Self::from_probs(probs)
    }
}

impl From<GenericDistribution> for BTreeMap<State, f64> {
    fn from(dist: GenericDistribution) -> Self {
        dist.probs
    }
}

// ---------------------------------------------------------------------------
// TransitionCounts
// ---------------------------------------------------------------------------

/// Raw transition counts, owned by a single model build.
#[derive(Debug, Clone, Default)]
pub struct TransitionCounts {
    counts: BTreeMap<State, BTreeMap<State, u64>>,
    total: u64,
}

impl TransitionCounts {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observed transition.
    pub fn record(&mut self, current: State, next: State) {
        *self.counts.entry(current).or_default().entry(next).or_insert(0) += 1;
        self.total += 1;
    }

    /// Number of transitions recorded.
    pub fn n_transitions(&self) -> u64 {
        self.total
    }

    /// Number of distinct source states.
    pub fn n_sources(&self) -> usize {
        self.counts.len()
    }

    /// Count of transitions from `from` to `to`.
    pub fn count(&self, from: &State, to: &State) -> u64 {
        self.counts
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// Normalizes the counts into a conditional model and the marginal
    /// destination distribution.
    ///
    /// Each row is divided by its own total; the generic distribution is
    /// the per-destination count summed over all sources, divided by the
    /// grand total.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidProbabilities`] if nothing was recorded.
    pub fn into_model(self) -> Result<(TransitionModel, GenericDistribution), MarkovError> {
        if self.total == 0 {
            return Err(MarkovError::InvalidProbabilities {
                reason: "no transitions recorded".to_string(),
            });
        }

        let mut marginal: BTreeMap<State, u64> = BTreeMap::new();
        let mut rows: BTreeMap<State, BTreeMap<State, f64>> = BTreeMap::new();
        for (source, row) in self.counts {
            let row_total: u64 = row.values().sum();
            let probs = row
                .into_iter()
                .map(|(dest, c)| {
                    *marginal.entry(dest.clone()).or_insert(0) += c;
                    (dest, c as f64 / row_total as f64)
                })
                .collect();
            rows.insert(source, probs);
        }

        let grand_total = self.total as f64;
        let generic: BTreeMap<State, f64> = marginal
            .into_iter()
            .map(|(dest, c)| (dest, c as f64 / grand_total))
            .collect();

        Ok((
            TransitionModel::from_rows(rows)?,
            GenericDistribution::from_probs(generic)?,
        ))
    }
}

// ---------------------------------------------------------------------------
// TrainedModel
// ---------------------------------------------------------------------------

/// Statistics of one model build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainingSummary {
    /// Records supplied.
    pub n_records: usize,
    /// Complete current/next window pairs counted.
    pub n_pairs: usize,
    /// Trailing records of each run that could not fill a complete pair.
    pub n_discarded: usize,
    /// Measurements replaced by a default bin.
    pub n_defaulted: usize,
}

/// A transition model together with the selection it was trained on.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    params: ParameterSet,
    n_gram: usize,
    transitions: TransitionModel,
    generic: GenericDistribution,
    summary: TrainingSummary,
}

impl TrainedModel {
    /// Reassembles a model from persisted parts.
    ///
    /// Every state mentioned in `transitions` or `generic` must be a valid
    /// state for `params` and `n_gram`. The summary of a reassembled model
    /// is all zeros.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidNGram`] for a zero window and
    /// [`MarkovError::StateOutsideSpace`] for a foreign state.
    pub fn from_parts(
        params: ParameterSet,
        n_gram: usize,
        transitions: TransitionModel,
        generic: GenericDistribution,
    ) -> Result<Self, MarkovError> {
        if n_gram == 0 {
            return Err(MarkovError::InvalidNGram { n_gram });
        }
        for (source, row) in transitions.iter() {
            check_state(&params, n_gram, source)?;
            for dest in row.keys() {
                check_state(&params, n_gram, dest)?;
            }
        }
        for (state, _) in generic.iter() {
            check_state(&params, n_gram, state)?;
        }
        Ok(Self {
            params,
            n_gram,
            transitions,
            generic,
            summary: TrainingSummary::default(),
        })
    }

    /// Parameter selection the model was trained on.
    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Days per state.
    pub fn n_gram(&self) -> usize {
        self.n_gram
    }

    /// Conditional transition probabilities.
    pub fn transitions(&self) -> &TransitionModel {
        &self.transitions
    }

    /// Marginal fallback distribution.
    pub fn generic(&self) -> &GenericDistribution {
        &self.generic
    }

    /// Statistics of the build that produced this model.
    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    /// Classifier matching this model's parameter selection.
    pub fn classifier(&self) -> StateClassifier {
        StateClassifier::new(self.params.clone())
    }
}

/// Builds a transition model from time-ordered daily records.
///
/// The records are cut into consecutive, non-overlapping pairs of
/// `n_gram`-day windows `(current, next)`; records that cannot fill a
/// complete trailing pair are discarded. Records must already be in
/// calendar order.
///
/// # Errors
///
/// Returns [`MarkovError::InvalidNGram`] for an invalid configuration and
/// [`MarkovError::EmptyTrainingSet`] if not a single pair can be formed.
pub fn build_transition_model(
    records: &[DailyRecord],
    params: &ParameterSet,
    config: &MarkovConfig,
) -> Result<TrainedModel, MarkovError> {
    build_transition_model_runs([records], params, config)
}

/// Builds a transition model from several runs of consecutive days.
///
/// Each run is paired on its own as in [`build_transition_model`], so no
/// window pair crosses from the end of one run into the start of the next.
/// Every run's trailing remainder counts towards
/// [`TrainingSummary::n_discarded`].
///
/// # Errors
///
/// Returns [`MarkovError::InvalidNGram`] for an invalid configuration and
/// [`MarkovError::EmptyTrainingSet`] if no run yields a single pair.
#[tracing::instrument(skip(runs, params, config), fields(n_gram = config.n_gram(), params = %params))]
pub fn build_transition_model_runs<'a>(
    runs: impl IntoIterator<Item = &'a [DailyRecord]>,
    params: &ParameterSet,
    config: &MarkovConfig,
) -> Result<TrainedModel, MarkovError> {
    config.validate()?;
    let n_gram = config.n_gram();
    let pair_len = 2 * n_gram;

    let classifier = StateClassifier::new(params.clone());
    let mut counts = TransitionCounts::new();
    let mut n_records = 0;
    let mut n_runs = 0;
    let mut n_discarded = 0;
    let mut n_defaulted = 0;

    for run in runs {
        n_records += run.len();
        n_runs += 1;
        let pairs = run.chunks_exact(pair_len);
        n_discarded += pairs.remainder().len();
        for pair in pairs {
            let (current, next) = pair.split_at(n_gram);
            let current = classifier.classify_window(current);
            let next = classifier.classify_window(next);
            n_defaulted += current.defaulted.len() + next.defaulted.len();
            counts.record(current.state, next.state);
        }
    }

    let n_pairs = counts.n_transitions() as usize;
    if n_pairs == 0 {
        return Err(MarkovError::EmptyTrainingSet { n_records, n_gram });
    }
    debug!(
        n_records,
        n_runs,
        n_pairs,
        n_sources = counts.n_sources(),
        n_discarded,
        n_defaulted,
        "counted transitions"
    );

    let (transitions, generic) = counts.into_model()?;

    Ok(TrainedModel {
        params: params.clone(),
        n_gram,
        transitions,
        generic,
        summary: TrainingSummary {
            n_records,
            n_pairs,
            n_discarded,
            n_defaulted,
        },
    })
}
