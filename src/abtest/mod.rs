//! A/B test orchestration and reporting.
//!
//! [`AbTestRunner`] ties the pieces together: it derives per-group
//! success/failure counts from an outcome column, computes conversion rates
//! and relative change, delegates to a [`CertaintyEstimator`] for the degree
//! of certainty, and draws the empirical posterior of the rate difference.
//!
//! The run either completes with a full [`AbTestOutcome`] or fails with a
//! typed error naming the offending group and column; partial reports do not
//! exist.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::certainty::{CertaintyEstimator, ClosedFormCertainty};
use crate::data::Dataset;
use crate::error::{CertezaError, Result};
use crate::posterior::{GroupCounts, PosteriorSampler};

/// Confidence level of the reported credible interval.
const CREDIBLE_LEVEL: f64 = 0.95;

/// Scalar summary of an A/B test.
///
/// Implements [`Display`](fmt::Display) to produce the human-readable report:
/// group sizes, success counts, conversion rates, percent change, degree of
/// certainty, and the credible interval of the rate difference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbTestReport {
    /// Number of records in the control group.
    pub control_size: u64,
    /// Number of records in the treatment group.
    pub treatment_size: u64,
    /// Successes in the control group.
    pub control_successes: u64,
    /// Successes in the treatment group.
    pub treatment_successes: u64,
    /// Control conversion rate.
    pub control_rate: f64,
    /// Treatment conversion rate.
    pub treatment_rate: f64,
    /// Relative change, treatment over control (0.5 = +50%).
    ///
    /// Defined as exactly 0 when either rate is exactly 0, per the
    /// pre-registered analysis. The 0/0 and x/0 cases are therefore reported
    /// as "no change" rather than NaN or infinity.
    pub percent_change: f64,
    /// Posterior probability that the treatment rate exceeds the control rate.
    pub certainty: f64,
    /// 95% credible interval of (treatment rate - control rate), from the
    /// empirical posterior quantiles.
    pub credible_interval: (f64, f64),
}

impl fmt::Display for AbTestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number in control group: {}", self.control_size)?;
        writeln!(f, "Number in treatment group: {}", self.treatment_size)?;
        writeln!(f)?;
        writeln!(f, "Total successes, control: {}", self.control_successes)?;
        writeln!(f, "Total successes, treatment: {}", self.treatment_successes)?;
        writeln!(f)?;
        writeln!(f, "Conversion rate:")?;
        writeln!(f, "Control group rate: {:.3}%", self.control_rate * 100.0)?;
        writeln!(f, "Treatment group rate: {:.3}%", self.treatment_rate * 100.0)?;
        writeln!(f, "Percent change: {:.3}%", self.percent_change * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Degree of certainty: {:.3}", self.certainty)?;
        write!(
            f,
            "95% credible interval of rate difference: [{:.4}, {:.4}]",
            self.credible_interval.0, self.credible_interval.1
        )
    }
}

/// Full result of one A/B test run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbTestOutcome {
    /// Scalar summary, ready to display.
    pub report: AbTestReport,
    /// Sorted empirical posterior of (treatment rate - control rate).
    pub posterior: Vec<f64>,
}

impl AbTestOutcome {
    /// Control-group success count, the plotter's baseline.
    #[must_use]
    pub fn baseline_successes(&self) -> u64 {
        self.report.control_successes
    }
}

/// Orchestrates an A/B test over pre-split control and treatment datasets.
///
/// Generic over the certainty estimator so an external implementation of
/// [`CertaintyEstimator`] can replace the built-in closed form.
///
/// # Examples
///
/// ```
/// use certeza::abtest::AbTestRunner;
/// use certeza::data::Dataset;
/// use certeza::posterior::PosteriorSampler;
///
/// let control = Dataset::new(vec![(
///     "enrolled".to_string(),
///     vec![1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
/// )])
/// .expect("valid column");
/// let treatment = Dataset::new(vec![(
///     "enrolled".to_string(),
///     vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0],
/// )])
/// .expect("valid column");
///
/// let runner = AbTestRunner::new().with_sampler(PosteriorSampler::new().with_n_samples(10_000));
/// let outcome = runner.run(&control, &treatment, "enrolled").expect("valid experiment");
///
/// assert!((outcome.report.control_rate - 0.3).abs() < 1e-12);
/// assert!((outcome.report.treatment_rate - 0.7).abs() < 1e-12);
/// assert!(outcome.report.certainty > 0.9);
/// println!("{}", outcome.report);
/// ```
#[derive(Debug, Clone)]
pub struct AbTestRunner<E = ClosedFormCertainty> {
    sampler: PosteriorSampler,
    estimator: E,
}

impl Default for AbTestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl AbTestRunner {
    /// Creates a runner with the default sampler and the closed-form
    /// certainty estimator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sampler: PosteriorSampler::new(),
            estimator: ClosedFormCertainty::new(),
        }
    }
}

impl<E: CertaintyEstimator> AbTestRunner<E> {
    /// Replaces the posterior sampler.
    #[must_use]
    pub fn with_sampler(mut self, sampler: PosteriorSampler) -> Self {
        self.sampler = sampler;
        self
    }

    /// Replaces the certainty estimator.
    #[must_use]
    pub fn with_estimator<E2: CertaintyEstimator>(self, estimator: E2) -> AbTestRunner<E2> {
        AbTestRunner {
            sampler: self.sampler,
            estimator,
        }
    }

    /// Runs the A/B test on the given outcome column.
    ///
    /// # Errors
    ///
    /// - [`CertezaError::ColumnNotFound`] when either dataset lacks the
    ///   outcome column.
    /// - [`CertezaError::InvalidInput`] when the outcome column contains a
    ///   value other than 0 or 1.
    /// - [`CertezaError::EmptyGroup`] when either group has no records.
    /// - [`CertezaError::DegenerateDistribution`] when either group has zero
    ///   failures (see [`PosteriorSampler::sample`]).
    pub fn run(
        &self,
        control: &Dataset,
        treatment: &Dataset,
        outcome_column: &str,
    ) -> Result<AbTestOutcome> {
        let control_counts =
            GroupCounts::from_outcomes("control", outcome_column, control.column(outcome_column)?)?;
        let treatment_counts = GroupCounts::from_outcomes(
            "treatment",
            outcome_column,
            treatment.column(outcome_column)?,
        )?;

        let control_rate = control_counts.rate().ok_or_else(|| CertezaError::EmptyGroup {
            group: "control".to_string(),
        })?;
        let treatment_rate = treatment_counts
            .rate()
            .ok_or_else(|| CertezaError::EmptyGroup {
                group: "treatment".to_string(),
            })?;

        // Explicit special case from the pre-registered analysis: a zero rate
        // on either side reports zero change instead of dividing by zero.
        let percent_change = if control_rate == 0.0 || treatment_rate == 0.0 {
            0.0
        } else {
            treatment_rate / control_rate - 1.0
        };

        let certainty = self
            .estimator
            .degree_of_certainty(control_counts, treatment_counts)?;
        let posterior = self.sampler.sample(control_counts, treatment_counts)?;
        let credible_interval = credible_interval(&posterior, CREDIBLE_LEVEL);

        let report = AbTestReport {
            control_size: control_counts.total(),
            treatment_size: treatment_counts.total(),
            control_successes: control_counts.successes,
            treatment_successes: treatment_counts.successes,
            control_rate,
            treatment_rate,
            percent_change,
            certainty,
            credible_interval,
        };

        Ok(AbTestOutcome { report, posterior })
    }
}

/// Central credible interval from sorted posterior samples.
fn credible_interval(sorted: &[f64], level: f64) -> (f64, f64) {
    debug_assert!(!sorted.is_empty());
    let tail = (1.0 - level) / 2.0;
    let n = sorted.len();
    let lower_idx = ((n - 1) as f64 * tail).round() as usize;
    let upper_idx = ((n - 1) as f64 * (1.0 - tail)).round() as usize;
    (sorted[lower_idx], sorted[upper_idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::certainty::MonteCarloCertainty;

    fn dataset_with_successes(successes: usize, total: usize) -> Dataset {
        let mut outcomes = vec![1.0; successes];
        outcomes.resize(total, 0.0);
        Dataset::new(vec![("enrolled".to_string(), outcomes)]).expect("valid column")
    }

    fn small_runner() -> AbTestRunner {
        AbTestRunner::new().with_sampler(PosteriorSampler::new().with_n_samples(10_000))
    }

    #[test]
    fn test_run_strong_treatment_effect() {
        let control = dataset_with_successes(3, 10);
        let treatment = dataset_with_successes(7, 10);
        let outcome = small_runner()
            .run(&control, &treatment, "enrolled")
            .expect("valid experiment");

        let report = &outcome.report;
        assert_eq!(report.control_size, 10);
        assert_eq!(report.treatment_size, 10);
        assert_eq!(report.control_successes, 3);
        assert_eq!(report.treatment_successes, 7);
        assert!((report.control_rate - 0.3).abs() < 1e-12);
        assert!((report.treatment_rate - 0.7).abs() < 1e-12);
        assert!((report.percent_change - (0.7 / 0.3 - 1.0)).abs() < 1e-12);
        assert!(report.certainty > 0.9);
        assert_eq!(outcome.posterior.len(), 10_000);
        assert_eq!(outcome.baseline_successes(), 3);
    }

    #[test]
    fn test_run_no_successes_reports_zero_change() {
        let control = dataset_with_successes(0, 10);
        let treatment = dataset_with_successes(0, 10);
        let outcome = small_runner()
            .run(&control, &treatment, "enrolled")
            .expect("valid experiment");

        let report = &outcome.report;
        assert_eq!(report.control_rate, 0.0);
        assert_eq!(report.treatment_rate, 0.0);
        assert_eq!(report.percent_change, 0.0);
        assert!(report.percent_change.is_finite());
        assert!((report.certainty - 0.5).abs() < 1e-8);
    }

    #[test]
    fn test_run_zero_control_rate_only() {
        let control = dataset_with_successes(0, 10);
        let treatment = dataset_with_successes(7, 10);
        let outcome = small_runner()
            .run(&control, &treatment, "enrolled")
            .expect("valid experiment");
        // Zero on either side reports zero change, by the explicit rule.
        assert_eq!(outcome.report.percent_change, 0.0);
    }

    #[test]
    fn test_run_empty_control_group() {
        let control = dataset_with_successes(0, 0);
        let treatment = dataset_with_successes(7, 10);
        let err = small_runner()
            .run(&control, &treatment, "enrolled")
            .unwrap_err();
        assert!(matches!(err, CertezaError::EmptyGroup { ref group } if group == "control"));
    }

    #[test]
    fn test_run_empty_treatment_group() {
        let control = dataset_with_successes(3, 10);
        let treatment = dataset_with_successes(0, 0);
        let err = small_runner()
            .run(&control, &treatment, "enrolled")
            .unwrap_err();
        assert!(matches!(err, CertezaError::EmptyGroup { ref group } if group == "treatment"));
    }

    #[test]
    fn test_run_non_binary_outcome() {
        let control =
            Dataset::new(vec![("enrolled".to_string(), vec![1.0, 0.0, 3.0])]).expect("valid column");
        let treatment = dataset_with_successes(7, 10);
        let err = small_runner()
            .run(&control, &treatment, "enrolled")
            .unwrap_err();
        assert!(matches!(err, CertezaError::InvalidInput { ref group, .. } if group == "control"));
    }

    #[test]
    fn test_run_missing_outcome_column() {
        let control = dataset_with_successes(3, 10);
        let treatment = dataset_with_successes(7, 10);
        let err = small_runner()
            .run(&control, &treatment, "clicked")
            .unwrap_err();
        assert!(matches!(err, CertezaError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_run_all_successes_is_degenerate() {
        let control = dataset_with_successes(10, 10);
        let treatment = dataset_with_successes(7, 10);
        let err = small_runner()
            .run(&control, &treatment, "enrolled")
            .unwrap_err();
        assert!(matches!(err, CertezaError::DegenerateDistribution { .. }));
    }

    #[test]
    fn test_credible_interval_brackets_true_difference() {
        let control = dataset_with_successes(30, 100);
        let treatment = dataset_with_successes(70, 100);
        let outcome = small_runner()
            .run(&control, &treatment, "enrolled")
            .expect("valid experiment");
        let (lo, hi) = outcome.report.credible_interval;
        assert!(lo < 0.4 && 0.4 < hi);
        assert!(lo < hi);
    }

    #[test]
    fn test_report_display_format() {
        let control = dataset_with_successes(3, 10);
        let treatment = dataset_with_successes(7, 10);
        let outcome = small_runner()
            .run(&control, &treatment, "enrolled")
            .expect("valid experiment");
        let text = outcome.report.to_string();

        assert!(text.contains("Number in control group: 10"));
        assert!(text.contains("Total successes, treatment: 7"));
        assert!(text.contains("Control group rate: 30.000%"));
        assert!(text.contains("Treatment group rate: 70.000%"));
        assert!(text.contains("Percent change: 133.333%"));
        assert!(text.contains("Degree of certainty: 0."));
    }

    #[test]
    fn test_monte_carlo_estimator_plugs_in() {
        let control = dataset_with_successes(3, 10);
        let treatment = dataset_with_successes(7, 10);
        let runner = AbTestRunner::new()
            .with_sampler(PosteriorSampler::new().with_n_samples(5000))
            .with_estimator(MonteCarloCertainty::new().with_n_samples(20_000));
        let outcome = runner
            .run(&control, &treatment, "enrolled")
            .expect("valid experiment");
        assert!(outcome.report.certainty > 0.9);
    }

    #[test]
    fn test_report_serde_round_trip() {
        let control = dataset_with_successes(3, 10);
        let treatment = dataset_with_successes(7, 10);
        let outcome = small_runner()
            .run(&control, &treatment, "enrolled")
            .expect("valid experiment");

        let json = serde_json::to_string(&outcome.report).expect("serializable");
        let back: AbTestReport = serde_json::from_str(&json).expect("deserializable");
        assert_eq!(back.control_successes, outcome.report.control_successes);
        assert!((back.certainty - outcome.report.certainty).abs() < f64::EPSILON);
    }

    #[test]
    fn test_credible_interval_helper() {
        let sorted: Vec<f64> = (0..=100).map(f64::from).collect();
        let (lo, hi) = credible_interval(&sorted, 0.95);
        assert!((lo - 2.5).abs() <= 1.0);
        assert!((hi - 97.5).abs() <= 1.0);
        assert!(lo < hi);
    }
}
