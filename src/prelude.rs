//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use certeza::prelude::*;
//! ```

pub use crate::abtest::{AbTestOutcome, AbTestReport, AbTestRunner};
pub use crate::certainty::{CertaintyEstimator, ClosedFormCertainty, MonteCarloCertainty};
pub use crate::data::Dataset;
pub use crate::error::{CertezaError, Result};
pub use crate::plot::PosteriorPlot;
pub use crate::posterior::{GroupCounts, PosteriorSampler};
pub use crate::split::{split_three, split_two};
