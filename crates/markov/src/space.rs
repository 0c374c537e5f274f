//! Enumeration of the full theoretical state space.

use std::collections::HashMap;
use std::fmt;

use crate::error::MarkovError;
use crate::parameter::ParameterSet;
use crate::state::State;

/// Largest state space the dense forecast matrix is built for.
pub const MAX_STATES: usize = 4096;

/// Dense index of a state within a [`StateSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the zero-based index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every state obtainable for a parameter selection, in a fixed order.
///
/// Single-day states are the Cartesian product of each parameter's bins,
/// with the first parameter varying slowest and bins in their declared
/// order. An `n`-day window space is the `n`-fold product of the single-day
/// space, first day varying slowest. The order depends only on the
/// parameter list and window size, never on training data, and defines the
/// index of every state in the transition matrix.
#[derive(Debug, Clone)]
pub struct StateSpace {
    params: ParameterSet,
    n_gram: usize,
    states: Vec<State>,
    index: HashMap<State, StateId>,
}

impl StateSpace {
    /// Enumerates the single-day state space for `params`.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::StateSpaceTooLarge`] above [`MAX_STATES`].
    pub fn enumerate(params: &ParameterSet) -> Result<Self, MarkovError> {
        Self::with_window(params, 1)
    }

    /// Enumerates the state space for windows of `n_gram` consecutive days.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidNGram`] if `n_gram` is zero and
    /// [`MarkovError::StateSpaceTooLarge`] above [`MAX_STATES`].
    pub fn with_window(params: &ParameterSet, n_gram: usize) -> Result<Self, MarkovError> {
        if n_gram == 0 {
            return Err(MarkovError::InvalidNGram { n_gram });
        }
        let per_day = params.n_day_states();
        let size = (0..n_gram).try_fold(1usize, |acc, _| acc.checked_mul(per_day));
        match size {
            Some(size) if size <= MAX_STATES => {}
            _ => {
                return Err(MarkovError::StateSpaceTooLarge {
                    size: size.unwrap_or(usize::MAX),
                    max: MAX_STATES,
                });
            }
        }

        let days = day_states(params);
        let mut windows: Vec<Vec<usize>> = vec![Vec::new()];
        for _ in 0..n_gram {
            windows = windows
                .into_iter()
                .flat_map(|prefix| {
                    (0..days.len()).map(move |d| {
                        let mut w = prefix.clone();
                        w.push(d);
                        w
                    })
                })
                .collect();
        }

        let states: Vec<State> = windows
            .iter()
            .map(|w| State::concat(w.iter().map(|&d| &days[d])))
            .collect();
        let index = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), StateId(i)))
            .collect();

        Ok(Self {
            params: params.clone(),
            n_gram,
            states,
            index,
        })
    }

    /// The parameter selection this space was built from.
    pub fn parameters(&self) -> &ParameterSet {
        &self.params
    }

    /// Days per state.
    pub fn n_gram(&self) -> usize {
        self.n_gram
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false` for a successfully enumerated space.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All states in index order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns the state with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to a different, smaller space.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    /// Returns the id of `state`, or `None` if it is not a member.
    pub fn index_of(&self, state: &State) -> Option<StateId> {
        self.index.get(state).copied()
    }

    /// Returns the id of the state with canonical string `canonical`.
    pub fn lookup(&self, canonical: &str) -> Option<StateId> {
        self.index.get(canonical).copied()
    }

    /// Iterates over `(id, state)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i), s))
    }

    /// Human-readable description of the parameters and window size.
    pub fn describe(&self) -> String {
        describe(&self.params, self.n_gram)
    }
}

pub(crate) fn describe(params: &ParameterSet, n_gram: usize) -> String {
    format!("{params} ({n_gram}-day)")
}

/// Checks that `state` is a well-formed state for `params` and `n_gram`
/// without enumerating the space.
pub(crate) fn check_state(
    params: &ParameterSet,
    n_gram: usize,
    state: &State,
) -> Result<(), MarkovError> {
    let days: Vec<&str> = state.days().collect();
    let well_formed = days.len() == n_gram
        && days.iter().all(|day| {
            let labels: Vec<&str> = day.split(crate::state::BIN_SEPARATOR).collect();
            labels.len() == params.len()
                && params
                    .iter()
                    .zip(&labels)
                    .all(|(p, label)| p.bins().iter().any(|b| b == label))
        });
    if well_formed {
        Ok(())
    } else {
        Err(MarkovError::StateOutsideSpace {
            state: state.as_str().to_string(),
        })
    }
}

/// Single-day states in enumeration order.
fn day_states(params: &ParameterSet) -> Vec<State> {
    let mut combos: Vec<Vec<usize>> = vec![Vec::new()];
    for param in params.iter() {
        combos = combos
            .into_iter()
            .flat_map(|prefix| {
                (0..param.n_bins()).map(move |b| {
                    let mut c = prefix.clone();
                    c.push(b);
                    c
                })
            })
            .collect();
    }
    combos
        .iter()
        .map(|bins| State::from_bins(params.as_slice(), bins))
        .collect()
}
