//! Certeza: Bayesian A/B test analysis in pure Rust.
//!
//! Certeza estimates the posterior distribution of the difference in success
//! rates between a control and a treatment group, reports the degree of
//! certainty that the treatment is ahead, and renders the posterior as a
//! shaded density figure.
//!
//! # Quick Start
//!
//! ```
//! use certeza::prelude::*;
//!
//! // Experiment data: group 0 = control, groups 1 and 2 = treatment arms.
//! let ds = Dataset::new(vec![
//!     ("group".to_string(), vec![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 2.0, 2.0]),
//!     ("enrolled".to_string(), vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0]),
//! ])
//! .expect("valid columns");
//!
//! // Merge both treatment arms, as pre-registered.
//! let (control, treatment) = split_two(&ds, "group").expect("group column exists");
//!
//! let runner = AbTestRunner::new()
//!     .with_sampler(PosteriorSampler::new().with_n_samples(10_000).with_seed(1234));
//! let outcome = runner.run(&control, &treatment, "enrolled").expect("valid experiment");
//!
//! println!("{}", outcome.report);
//! assert!(outcome.report.certainty > 0.5);
//!
//! // Render the posterior density with the positive region shaded.
//! let plot = PosteriorPlot::from_posterior(
//!     &outcome.posterior,
//!     outcome.baseline_successes(),
//!     "newly enrolling",
//!     "control",
//!     "email",
//! )
//! .expect("non-empty posterior");
//! let svg = plot.to_svg();
//! assert!(svg.contains("</svg>"));
//! ```
//!
//! # Modules
//!
//! - [`data`]: `Dataset` named-column container
//! - [`split`]: control/treatment partitioning by group code
//! - [`posterior`]: Beta posterior sampling of the rate difference
//! - [`certainty`]: degree-of-certainty estimators
//! - [`abtest`]: test orchestration and reporting
//! - [`plot`]: posterior density figure
//!
//! # Scope
//!
//! Certeza compares exactly two groups per run (the two treatment arms may
//! be merged beforehand via [`split::split_two`]), holds all data in memory,
//! and applies no multiple-testing correction. Sampling is seeded and
//! deterministic; see [`posterior::PosteriorSampler`].

pub mod abtest;
pub mod certainty;
pub mod data;
pub mod error;
pub mod plot;
pub mod posterior;
pub mod prelude;
pub mod split;

pub use error::{CertezaError, Result};
