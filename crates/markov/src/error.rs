//! Error types for the nimbus-markov crate.

/// Error type for all fallible operations in the nimbus-markov crate.
///
/// Missing or malformed measurements are not represented here: the
/// classifier substitutes a default bin and reports it through
/// [`Classification::defaulted`](crate::Classification::defaulted).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarkovError {
    /// Returned when a parameter name is not one of the known keys.
    #[error("unknown parameter: {name:?} (expected one of tavg, tmax, tmin, prcp, wspd)")]
    UnknownParameter {
        /// The name that failed to parse.
        name: String,
    },

    /// Returned when a parameter set is empty.
    #[error("parameter set is empty")]
    EmptyParameters,

    /// Returned when a parameter appears more than once in a parameter set.
    #[error("duplicate parameter: {name}")]
    DuplicateParameter {
        /// Key of the repeated parameter.
        name: &'static str,
    },

    /// Returned when the n-gram window size is zero or too large to pair.
    #[error("invalid n-gram window: {n_gram} (must be >= 1 and fit a window pair)")]
    InvalidNGram {
        /// The invalid window size.
        n_gram: usize,
    },

    /// Returned when the training data holds no complete current/next window pair.
    #[error(
        "insufficient training data: {n_records} record(s) yield no complete pair of {n_gram}-day windows"
    )]
    EmptyTrainingSet {
        /// Number of records supplied.
        n_records: usize,
        /// Window size in days.
        n_gram: usize,
    },

    /// Returned when an enumerated state space exceeds the dense-matrix limit.
    #[error("state space too large: {size} states (limit {max})")]
    StateSpaceTooLarge {
        /// Number of states the parameter selection would produce.
        size: usize,
        /// Maximum supported number of states.
        max: usize,
    },

    /// Returned when the forecast's initial state is not in the state space.
    #[error("initial state {state:?} is not in the state space")]
    UnknownInitialState {
        /// Canonical string of the rejected state.
        state: String,
    },

    /// Returned when a model refers to a state outside the state space.
    #[error("state {state:?} is not in the state space")]
    StateOutsideSpace {
        /// Canonical string of the offending state.
        state: String,
    },

    /// Returned when a model and a state space were built from different parameters.
    #[error("parameter mismatch: model uses {model}, state space uses {space}")]
    ParameterMismatch {
        /// Description of the model's parameter selection.
        model: String,
        /// Description of the state space's parameter selection.
        space: String,
    },

    /// Returned when a probability table is malformed.
    #[error("invalid probabilities: {reason}")]
    InvalidProbabilities {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a probability vector does not match the engine's state space.
    #[error("dimension mismatch: vector has {actual} entries, state space has {expected}")]
    DimensionMismatch {
        /// Number of states in the engine's space.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },

    /// Returned when a forecast horizon of zero days is requested.
    #[error("invalid forecast horizon: {days} day(s) (must be >= 1)")]
    InvalidHorizon {
        /// The requested number of days.
        days: usize,
    },

    /// Returned when steady-state iteration does not settle.
    #[error("no convergence after {steps} steps (last change {delta:e})")]
    NoConvergence {
        /// Number of propagation steps performed.
        steps: usize,
        /// L1 change of the last step.
        delta: f64,
    },
}
