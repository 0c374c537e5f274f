//! Dense transition matrix and probability vectors over a [`StateSpace`].

use ndarray::{Array1, Array2, ArrayView1};
use tracing::debug;

use crate::error::MarkovError;
use crate::space::{StateId, StateSpace};
use crate::state::State;
use crate::transition::{GenericDistribution, SUM_TOLERANCE, TransitionModel};

// ---------------------------------------------------------------------------
// ProbabilityVector
// ---------------------------------------------------------------------------

/// A probability distribution over a state space, indexed by [`StateId`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityVector {
    probs: Array1<f64>,
}

impl ProbabilityVector {
    /// A vector with all mass on `state`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::UnknownInitialState`] if `state` is not a
    /// member of `space`.
    pub fn one_hot(space: &StateSpace, state: &State) -> Result<Self, MarkovError> {
        let id = space
            .index_of(state)
            .ok_or_else(|| MarkovError::UnknownInitialState {
                state: state.as_str().to_string(),
            })?;
        let mut probs = Array1::zeros(space.len());
        probs[id.index()] = 1.0;
        Ok(Self { probs })
    }

    /// The generic distribution laid out in `space` order.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::StateOutsideSpace`] if the distribution
    /// mentions a state that is not in `space`.
    pub fn from_generic(
        space: &StateSpace,
        generic: &GenericDistribution,
    ) -> Result<Self, MarkovError> {
        let mut probs = Array1::zeros(space.len());
        for (state, p) in generic.iter() {
            probs[index_in(space, state)?.index()] = p;
        }
        Ok(Self { probs })
    }

    /// Number of entries (the size of the state space).
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Returns `true` for a vector over an empty space.
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Probability of the state with id `id`.
    pub fn get(&self, id: StateId) -> f64 {
        self.probs[id.index()]
    }

    /// Iterates over probabilities in state-space order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.probs.iter().copied()
    }

    /// Underlying dense array.
    pub fn as_array(&self) -> &Array1<f64> {
        &self.probs
    }

    /// Total probability mass.
    pub fn sum(&self) -> f64 {
        self.probs.sum()
    }

    /// L1 distance to `other`.
    pub fn l1_distance(&self, other: &ProbabilityVector) -> f64 {
        (&self.probs - &other.probs).mapv(f64::abs).sum()
    }

    /// The `k` most probable states, highest first.
    ///
    /// Ties are broken by state index. Returns fewer than `k` entries only
    /// if the space is smaller than `k`.
    pub fn top_k(&self, k: usize) -> Vec<(StateId, f64)> {
        let mut ranked: Vec<(StateId, f64)> = self
            .probs
            .iter()
            .enumerate()
            .map(|(i, &p)| (StateId::from_index(i), p))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }

    /// One propagation step: `matrix · self`.
    ///
    /// # Panics
    ///
    /// Panics if the vector and matrix were built for different spaces.
    pub fn step(&self, matrix: &TransitionMatrix) -> ProbabilityVector {
        ProbabilityVector {
            probs: matrix.probs.dot(&self.probs),
        }
    }
}

fn index_in(space: &StateSpace, state: &State) -> Result<StateId, MarkovError> {
    space
        .index_of(state)
        .ok_or_else(|| MarkovError::StateOutsideSpace {
            state: state.as_str().to_string(),
        })
}

// ---------------------------------------------------------------------------
// TransitionMatrix
// ---------------------------------------------------------------------------

/// Column-stochastic transition matrix over a [`StateSpace`].
///
/// Column `j` is the distribution of the next state given current state
/// `j`: the observed conditional distribution when `j` was seen as a source
/// during training, otherwise the generic distribution.
#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    probs: Array2<f64>,
    fallback: Vec<bool>,
}

impl TransitionMatrix {
    /// Builds the dense matrix for `space`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::StateOutsideSpace`] if the model or the
    /// generic distribution mentions a state that is not in `space`.
    pub fn build(
        model: &TransitionModel,
        generic: &GenericDistribution,
        space: &StateSpace,
    ) -> Result<Self, MarkovError> {
        for source in model.sources() {
            index_in(space, source)?;
        }
        let generic = ProbabilityVector::from_generic(space, generic)?;

        let n = space.len();
        let mut probs = Array2::zeros((n, n));
        let mut fallback = vec![false; n];
        for (id, state) in space.iter() {
            let j = id.index();
            match model.row(state) {
                Some(row) => {
                    for (dest, &p) in row {
                        probs[[index_in(space, dest)?.index(), j]] = p;
                    }
                }
                None => {
                    probs.column_mut(j).assign(&generic.probs);
                    fallback[j] = true;
                }
            }
        }

        debug!(
            n_states = n,
            n_fallback = fallback.iter().filter(|&&f| f).count(),
            "built transition matrix"
        );
        Ok(Self { probs, fallback })
    }

    /// Number of states (rows and columns).
    pub fn size(&self) -> usize {
        self.fallback.len()
    }

    /// Next-state distribution given current state `from`.
    pub fn column(&self, from: StateId) -> ArrayView1<'_, f64> {
        self.probs.column(from.index())
    }

    /// Probability of moving from `from` to `to`.
    pub fn prob(&self, from: StateId, to: StateId) -> f64 {
        self.probs[[to.index(), from.index()]]
    }

    /// Returns `true` if column `from` uses the generic distribution.
    pub fn is_fallback(&self, from: StateId) -> bool {
        self.fallback[from.index()]
    }

    /// Number of columns using the generic distribution.
    pub fn n_fallback(&self) -> usize {
        self.fallback.iter().filter(|&&f| f).count()
    }

    /// Underlying dense array; `[[to, from]]` indexing.
    pub fn as_array(&self) -> &Array2<f64> {
        &self.probs
    }

    /// Checks that every column sums to one.
    pub fn validate(&self) -> Result<(), MarkovError> {
        for (j, col) in self.probs.columns().into_iter().enumerate() {
            let sum = col.sum();
            if (sum - 1.0).abs() > SUM_TOLERANCE {
                return Err(MarkovError::InvalidProbabilities {
                    reason: format!("column {j} sums to {sum}, expected 1"),
                });
            }
        }
        Ok(())
    }
}
