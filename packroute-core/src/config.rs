//! Search parameters shared by every optimizer run.

use thiserror::Error;

/// Smallest pack that can hold alpha, beta, delta and one follower.
pub const MIN_POPULATION_SIZE: u32 = 4;

/// Errors returned by [`OptimizationConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Fewer wolves than the three leaders plus one follower.
    #[error("population size must be at least {min}, got {actual}")]
    PopulationTooSmall {
        /// Minimum accepted size.
        min: u32,
        /// Requested size.
        actual: u32,
    },
    /// The iteration budget was zero.
    #[error("max iterations must be positive")]
    NoIterations,
    /// The reporting cadence was zero.
    #[error("report interval must be positive")]
    ZeroReportInterval,
}

/// Parameters for one optimization run.
///
/// The seed fully determines the pseudo-random stream, so two runs with the
/// same instance and configuration produce identical results.
///
/// # Examples
/// ```
/// use packroute_core::OptimizationConfig;
///
/// let config = OptimizationConfig::default()
///     .with_population_size(10)
///     .with_max_iterations(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.report_every, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OptimizationConfig {
    /// Number of wolves in the pack.
    pub population_size: u32,
    /// Number of position updates to perform.
    pub max_iterations: u32,
    /// Seed for the per-run pseudo-random stream.
    pub seed: u64,
    /// Record a convergence sample every `report_every` iterations.
    pub report_every: u32,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            max_iterations: 100,
            seed: 42,
            report_every: 1,
        }
    }
}

impl OptimizationConfig {
    /// Check the configuration before a run starts.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the population is smaller than
    /// [`MIN_POPULATION_SIZE`] or when either the iteration budget or the
    /// report interval is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < MIN_POPULATION_SIZE {
            return Err(ConfigError::PopulationTooSmall {
                min: MIN_POPULATION_SIZE,
                actual: self.population_size,
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if self.report_every == 0 {
            return Err(ConfigError::ZeroReportInterval);
        }
        Ok(())
    }

    /// Replace the population size.
    #[must_use]
    pub const fn with_population_size(mut self, population_size: u32) -> Self {
        self.population_size = population_size;
        self
    }

    /// Replace the iteration budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Replace the seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the reporting cadence.
    #[must_use]
    pub const fn with_report_every(mut self, report_every: u32) -> Self {
        self.report_every = report_every;
        self
    }

    /// Whether a sample is due after `iteration` completes.
    ///
    /// Iteration `0` (the initial pack) and the final iteration are always
    /// reported.
    #[must_use]
    pub const fn is_report_due(&self, iteration: u32) -> bool {
        iteration == 0
            || iteration == self.max_iterations
            || (self.report_every != 0 && iteration.is_multiple_of(self.report_every))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(3, 10, 1, Some(ConfigError::PopulationTooSmall { min: 4, actual: 3 }))]
    #[case(4, 0, 1, Some(ConfigError::NoIterations))]
    #[case(4, 1, 0, Some(ConfigError::ZeroReportInterval))]
    #[case(4, 1, 1, None)]
    fn validation_matches_expectation(
        #[case] population_size: u32,
        #[case] max_iterations: u32,
        #[case] report_every: u32,
        #[case] expected: Option<ConfigError>,
    ) {
        let config = OptimizationConfig {
            population_size,
            max_iterations,
            seed: 0,
            report_every,
        };
        assert_eq!(config.validate().err(), expected);
    }

    #[rstest]
    fn reports_initial_final_and_cadence_iterations() {
        let config = OptimizationConfig::default()
            .with_max_iterations(10)
            .with_report_every(4);
        let due: Vec<u32> = (0..=10).filter(|i| config.is_report_due(*i)).collect();
        assert_eq!(due, vec![0, 4, 8, 10]);
    }
}
