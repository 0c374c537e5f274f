//! Configuration for transition model estimation.

use crate::error::MarkovError;

/// Configuration for building a transition model.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use nimbus_markov::MarkovConfig;
///
/// let config = MarkovConfig::new().with_n_gram(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct MarkovConfig {
    n_gram: usize,
}

impl MarkovConfig {
    /// Creates a new configuration with defaults.
    ///
    /// Defaults: `n_gram = 1` (one calendar day per Markov state).
    pub fn new() -> Self {
        Self { n_gram: 1 }
    }

    /// Sets the number of consecutive days forming one state.
    pub fn with_n_gram(mut self, n_gram: usize) -> Self {
        self.n_gram = n_gram;
        self
    }

    /// Returns the number of consecutive days forming one state.
    pub fn n_gram(&self) -> usize {
        self.n_gram
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidNGram`] if `n_gram` is zero or so large
    /// that a `(current, next)` pair of windows overflows `usize`.
    pub fn validate(&self) -> Result<(), MarkovError> {
        if self.n_gram == 0 || self.n_gram.checked_mul(2).is_none() {
            return Err(MarkovError::InvalidNGram {
                n_gram: self.n_gram,
            });
        }
        Ok(())
    }
}

impl Default for MarkovConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = MarkovConfig::new();
        assert_eq!(cfg.n_gram(), 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder_chaining() {
        let cfg = MarkovConfig::default().with_n_gram(3);
        assert_eq!(cfg.n_gram(), 3);
    }

    #[test]
    fn validate_zero_n_gram() {
        assert_eq!(
            MarkovConfig::new().with_n_gram(0).validate(),
            Err(MarkovError::InvalidNGram { n_gram: 0 })
        );
    }

    #[test]
    fn validate_overflowing_n_gram() {
        let n_gram = usize::MAX / 2 + 1;
        assert_eq!(
            MarkovConfig::new().with_n_gram(n_gram).validate(),
            Err(MarkovError::InvalidNGram { n_gram })
        );
        assert!(MarkovConfig::new().with_n_gram(usize::MAX / 2).validate().is_ok());
    }
}
