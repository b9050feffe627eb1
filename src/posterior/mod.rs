//! Posterior sampling for the success-rate difference.
//!
//! Each group's success rate gets a Beta posterior with shape parameters
//! (successes + 1, failures): Laplace smoothing of +1 on successes only,
//! matching the pre-registered analysis. The empirical posterior of the rate
//! difference is the sorted elementwise difference of two seeded Beta draws.
//!
//! Sampling is deterministic: the seed is an explicit parameter with a
//! documented default, so identical counts always reproduce an identical
//! sample sequence. This is a contract, not an accident — downstream tests
//! and reports rely on it.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Beta, Distribution};
use serde::{Deserialize, Serialize};

use crate::error::{CertezaError, Result};

/// Default number of posterior draws per group.
pub const DEFAULT_N_SAMPLES: usize = 100_000;

/// Default sampler seed.
pub const DEFAULT_SEED: u64 = 1234;

/// Success and failure counts for one group on one outcome.
///
/// Invariant: `successes + failures` equals the group size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCounts {
    /// Number of records with outcome 1.
    pub successes: u64,
    /// Number of records with outcome 0.
    pub failures: u64,
}

impl GroupCounts {
    /// Creates counts directly from known successes and failures.
    #[must_use]
    pub fn new(successes: u64, failures: u64) -> Self {
        Self {
            successes,
            failures,
        }
    }

    /// Derives counts from a binary outcome column.
    ///
    /// # Errors
    ///
    /// Returns [`CertezaError::InvalidInput`] on the first value that is not
    /// exactly 0 or 1, identifying the group, column and row.
    pub fn from_outcomes(group: &str, column: &str, values: &[f64]) -> Result<Self> {
        let mut successes = 0u64;
        for (row, &value) in values.iter().enumerate() {
            if value == 1.0 {
                successes += 1;
            } else if value != 0.0 {
                return Err(CertezaError::InvalidInput {
                    group: group.to_string(),
                    column: column.to_string(),
                    value,
                    row,
                });
            }
        }
        Ok(Self {
            successes,
            failures: values.len() as u64 - successes,
        })
    }

    /// Total group size.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.successes + self.failures
    }

    /// Observed success rate, or `None` for an empty group.
    #[must_use]
    pub fn rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.successes as f64 / total as f64)
    }

    /// Beta posterior shape parameters (successes + 1, failures).
    ///
    /// # Errors
    ///
    /// Returns [`CertezaError::DegenerateDistribution`] when `failures` is 0,
    /// which would make the second shape parameter zero. The caller supplies
    /// the group name for error context.
    pub fn posterior_shape(&self, group: &str) -> Result<(f64, f64)> {
        if self.failures == 0 {
            return Err(CertezaError::DegenerateDistribution {
                group: group.to_string(),
                successes: self.successes,
                failures: self.failures,
            });
        }
        Ok((self.successes as f64 + 1.0, self.failures as f64))
    }
}

/// Seeded sampler for the empirical posterior of the rate difference.
///
/// # Examples
///
/// ```
/// use certeza::posterior::{GroupCounts, PosteriorSampler};
///
/// let sampler = PosteriorSampler::new().with_n_samples(1000).with_seed(42);
/// let posterior = sampler
///     .sample(GroupCounts::new(3, 7), GroupCounts::new(7, 3))
///     .expect("non-degenerate counts");
///
/// assert_eq!(posterior.len(), 1000);
/// assert!(posterior.windows(2).all(|w| w[0] <= w[1]));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosteriorSampler {
    n_samples: usize,
    seed: u64,
}

impl Default for PosteriorSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl PosteriorSampler {
    /// Creates a sampler with the default draw count and seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_samples: DEFAULT_N_SAMPLES,
            seed: DEFAULT_SEED,
        }
    }

    /// Sets the number of draws per group.
    #[must_use]
    pub fn with_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    /// Sets the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the configured number of draws per group.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Returns the configured seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draws the sorted empirical posterior of (treatment rate - control rate).
    ///
    /// Control draws come first from the shared RNG stream, then treatment
    /// draws, so the full sequence is a pure function of counts and seed.
    ///
    /// # Errors
    ///
    /// Returns [`CertezaError::DegenerateDistribution`] when either group has
    /// zero failures, or [`CertezaError::InvalidHyperparameter`] when the
    /// sampler is configured with zero draws.
    pub fn sample(&self, control: GroupCounts, treatment: GroupCounts) -> Result<Vec<f64>> {
        if self.n_samples == 0 {
            return Err(CertezaError::InvalidHyperparameter {
                param: "n_samples".to_string(),
                value: "0".to_string(),
                constraint: ">= 1".to_string(),
            });
        }

        let control_beta = beta_posterior(control, "control")?;
        let treatment_beta = beta_posterior(treatment, "treatment")?;

        let mut rng = StdRng::seed_from_u64(self.seed);
        let control_draws: Vec<f64> = (0..self.n_samples)
            .map(|_| control_beta.sample(&mut rng))
            .collect();
        let treatment_draws: Vec<f64> = (0..self.n_samples)
            .map(|_| treatment_beta.sample(&mut rng))
            .collect();

        let mut posterior: Vec<f64> = treatment_draws
            .iter()
            .zip(&control_draws)
            .map(|(t, c)| t - c)
            .collect();
        posterior.sort_by(f64::total_cmp);
        Ok(posterior)
    }
}

/// Builds the Beta posterior distribution for a group's success rate.
pub(crate) fn beta_posterior(counts: GroupCounts, group: &str) -> Result<Beta<f64>> {
    let (alpha, beta) = counts.posterior_shape(group)?;
    Beta::new(alpha, beta).map_err(|e| {
        CertezaError::Other(format!(
            "Beta({alpha}, {beta}) for {group} group rejected: {e}"
        ))
    })
}
