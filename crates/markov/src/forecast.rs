//! Multi-day probability forecasts.
//!
//! A forecast starts from a one-hot vector on the initial state and applies
//! the transition matrix once per day. Each day's vector is the marginal
//! probability of every state that many days ahead, with mass diffusing
//! along all paths rather than following the single most likely one.

use tracing::debug;

use crate::error::MarkovError;
use crate::matrix::{ProbabilityVector, TransitionMatrix};
use crate::space::{StateId, StateSpace, describe};
use crate::state::State;
use crate::transition::{GenericDistribution, TrainedModel, TransitionModel};

/// Propagates probability vectors over a fixed state space.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    space: StateSpace,
    matrix: TransitionMatrix,
    generic: ProbabilityVector,
}

impl ForecastEngine {
    /// Builds an engine for a trained model over `space`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::ParameterMismatch`] if `space` was enumerated
    /// for a different parameter list or window size than the model was
    /// trained on.
    pub fn new(model: &TrainedModel, space: StateSpace) -> Result<Self, MarkovError> {
        if space.parameters() != model.parameters() || space.n_gram() != model.n_gram() {
            return Err(MarkovError::ParameterMismatch {
                model: describe(model.parameters(), model.n_gram()),
                space: space.describe(),
            });
        }
        Self::from_parts(model.transitions(), model.generic(), space)
    }

    /// Builds an engine for a trained model over its own state space.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::StateSpaceTooLarge`] if the model's space
    /// cannot be enumerated densely.
    pub fn for_model(model: &TrainedModel) -> Result<Self, MarkovError> {
        let space = StateSpace::with_window(model.parameters(), model.n_gram())?;
        Self::from_parts(model.transitions(), model.generic(), space)
    }

    /// Builds an engine from a transition model and generic distribution.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::StateOutsideSpace`] if either table mentions a
    /// state outside `space`.
    pub fn from_parts(
        transitions: &TransitionModel,
        generic: &GenericDistribution,
        space: StateSpace,
    ) -> Result<Self, MarkovError> {
        let matrix = TransitionMatrix::build(transitions, generic, &space)?;
        let generic = ProbabilityVector::from_generic(&space, generic)?;
        Ok(Self {
            space,
            matrix,
            generic,
        })
    }

    /// The state space, defining the index order of every vector.
    pub fn space(&self) -> &StateSpace {
        &self.space
    }

    /// The dense transition matrix.
    pub fn matrix(&self) -> &TransitionMatrix {
        &self.matrix
    }

    /// Forecasts `days` days ahead of `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::UnknownInitialState`] if `initial` is not in
    /// the space and [`MarkovError::InvalidHorizon`] if `days` is zero.
    #[tracing::instrument(skip(self, initial), fields(initial = %initial))]
    pub fn forecast(&self, initial: &State, days: usize) -> Result<Forecast<'_>, MarkovError> {
        let start = ProbabilityVector::one_hot(&self.space, initial)?;
        self.forecast_from(start, days)
    }

    /// Forecasts `days` days ahead of an arbitrary starting distribution.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidHorizon`] if `days` is zero and
    /// [`MarkovError::DimensionMismatch`] if `start` was built for a space of
    /// a different size.
    pub fn forecast_from(
        &self,
        start: ProbabilityVector,
        days: usize,
    ) -> Result<Forecast<'_>, MarkovError> {
        if days == 0 {
            return Err(MarkovError::InvalidHorizon { days });
        }
        if start.len() != self.space.len() {
            return Err(MarkovError::DimensionMismatch {
                expected: self.space.len(),
                actual: start.len(),
            });
        }
        let mut vectors = Vec::with_capacity(days);
        let mut current = start;
        for _ in 0..days {
            current = current.step(&self.matrix);
            vectors.push(current.clone());
        }
        debug!(days, n_states = self.space.len(), "forecast complete");
        Ok(Forecast {
            space: &self.space,
            days: vectors,
        })
    }

    /// Iterates from the generic distribution until successive vectors
    /// differ by less than `tolerance` in L1 norm.
    ///
    /// Returns the steady-state vector and the number of steps taken. This
    /// is the distribution long forecasts decay into.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::NoConvergence`] if `max_steps` is exhausted.
    pub fn stationary(
        &self,
        tolerance: f64,
        max_steps: usize,
    ) -> Result<(ProbabilityVector, usize), MarkovError> {
        let mut current = self.generic.clone();
        let mut delta = f64::INFINITY;
        for step in 1..=max_steps {
            let next = current.step(&self.matrix);
            delta = next.l1_distance(&current);
            current = next;
            if delta < tolerance {
                return Ok((current, step));
            }
        }
        Err(MarkovError::NoConvergence {
            steps: max_steps,
            delta,
        })
    }
}

/// Per-day probability vectors of one forecast.
///
/// Day `t` (1-based) is the distribution `t` days after the initial state.
#[derive(Debug, Clone)]
pub struct Forecast<'a> {
    space: &'a StateSpace,
    days: Vec<ProbabilityVector>,
}

impl<'a> Forecast<'a> {
    /// The state space the vectors are indexed by.
    pub fn space(&self) -> &'a StateSpace {
        self.space
    }

    /// Number of forecast days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Always `false`; a forecast covers at least one day.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Distribution on day `day` (1-based), or `None` past the horizon.
    pub fn day(&self, day: usize) -> Option<&ProbabilityVector> {
        day.checked_sub(1).and_then(|i| self.days.get(i))
    }

    /// All vectors, day 1 first.
    pub fn vectors(&self) -> &[ProbabilityVector] {
        &self.days
    }

    /// The `k` most probable states on day `day` (1-based), highest first.
    ///
    /// Returns an empty list past the horizon.
    pub fn top_k(&self, day: usize, k: usize) -> Vec<RankedState<'a>> {
        let space = self.space;
        self.day(day)
            .map(|v| {
                v.top_k(k)
                    .into_iter()
                    .map(|(id, probability)| RankedState {
                        id,
                        state: space.state(id),
                        probability,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A state and its forecast probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedState<'a> {
    /// Index in the state space.
    pub id: StateId,
    /// The state.
    pub state: &'a State,
    /// Forecast probability.
    pub probability: f64,
}
