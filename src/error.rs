//! Error types for Certeza operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for Certeza operations.
///
/// Provides detailed context about failures including non-binary outcome
/// columns, empty experiment groups, and degenerate posterior parameters.
///
/// # Examples
///
/// ```
/// use certeza::error::CertezaError;
///
/// let err = CertezaError::EmptyGroup {
///     group: "control".to_string(),
/// };
/// assert!(err.to_string().contains("control"));
/// ```
#[derive(Debug)]
pub enum CertezaError {
    /// An outcome column contained a value outside {0, 1}.
    InvalidInput {
        /// Group the offending record belongs to ("control" or "treatment")
        group: String,
        /// Column the offending value was found in
        column: String,
        /// The offending value
        value: f64,
        /// Row index of the offending value within the group
        row: usize,
    },

    /// A group was empty when computing conversion rates.
    ///
    /// Rates divide by group size; an empty group fails fast here instead
    /// of propagating a NaN through the report.
    EmptyGroup {
        /// Group name ("control" or "treatment")
        group: String,
    },

    /// A Beta posterior shape parameter was zero.
    ///
    /// The posterior uses Beta(successes + 1, failures); zero failures make
    /// the second shape parameter zero, which has no defined density.
    DegenerateDistribution {
        /// Group name ("control" or "treatment")
        group: String,
        /// Successes observed in the group
        successes: u64,
        /// Failures observed in the group
        failures: u64,
    },

    /// A named column does not exist in the dataset.
    ColumnNotFound {
        /// Requested column name
        column: String,
    },

    /// Invalid configuration value provided.
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for CertezaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertezaError::InvalidInput {
                group,
                column,
                value,
                row,
            } => {
                write!(
                    f,
                    "Invalid outcome value in column '{column}' ({group} group) at row {row}: \
                     {value} (expected 0 or 1)"
                )
            }
            CertezaError::EmptyGroup { group } => {
                write!(f, "Cannot compute conversion rate: {group} group is empty")
            }
            CertezaError::DegenerateDistribution {
                group,
                successes,
                failures,
            } => {
                write!(
                    f,
                    "Degenerate Beta posterior for {group} group: \
                     Beta({}, {failures}) has a zero shape parameter",
                    successes + 1
                )
            }
            CertezaError::ColumnNotFound { column } => {
                write!(f, "Column not found: '{column}'")
            }
            CertezaError::InvalidHyperparameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid hyperparameter: {param} = {value}, expected {constraint}"
                )
            }
            CertezaError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CertezaError {}

impl From<&str> for CertezaError {
    fn from(msg: &str) -> Self {
        CertezaError::Other(msg.to_string())
    }
}

impl From<String> for CertezaError {
    fn from(msg: String) -> Self {
        CertezaError::Other(msg)
    }
}

impl CertezaError {
    /// Create a column-not-found error.
    #[must_use]
    pub fn column_not_found(column: &str) -> Self {
        Self::ColumnNotFound {
            column: column.to_string(),
        }
    }

    /// Create an empty-input error with descriptive context.
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::Other(format!("empty input: {context}"))
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, CertezaError>;
