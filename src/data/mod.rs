//! `Dataset` module for named column containers.
//!
//! Provides a minimal in-memory table for A/B experiment data. Heavy data
//! wrangling and file loading should be delegated to the caller.

use crate::error::{CertezaError, Result};

/// A minimal dataset with named `f64` columns.
///
/// This is a thin wrapper around `Vec<(String, Vec<f64>)>` with convenience
/// methods for experiment analysis. An experiment dataset carries a
/// group-assignment column (values 0, 1, 2 for control and the two treatment
/// arms) and one or more binary outcome columns (values 0 or 1).
///
/// # Examples
///
/// ```
/// use certeza::data::Dataset;
///
/// let ds = Dataset::new(vec![
///     ("group".to_string(), vec![0.0, 1.0, 2.0]),
///     ("enrolled".to_string(), vec![1.0, 0.0, 1.0]),
/// ])
/// .expect("columns have equal length");
/// assert_eq!(ds.shape(), (3, 2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<(String, Vec<f64>)>,
    n_rows: usize,
}

impl Dataset {
    /// Creates a new `Dataset` from named columns.
    ///
    /// # Errors
    ///
    /// Returns an error if columns have different lengths, names are empty
    /// or duplicated, or no columns are given.
    pub fn new(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        if columns.is_empty() {
            return Err("Dataset must have at least one column".into());
        }

        let n_rows = columns[0].1.len();

        for (name, col) in &columns {
            if col.len() != n_rows {
                return Err("All columns must have the same length".into());
            }
            if name.is_empty() {
                return Err("Column names cannot be empty".into());
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|(n, _)| n.as_str()).collect();
        names.sort_unstable();
        for i in 1..names.len() {
            if names[i] == names[i - 1] {
                return Err("Duplicate column names not allowed".into());
            }
        }

        Ok(Self { columns, n_rows })
    }

    /// Returns the shape as (`n_rows`, `n_cols`).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the dataset has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Returns the column names.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Returns a reference to a column by name.
    ///
    /// # Errors
    ///
    /// Returns [`CertezaError::ColumnNotFound`] if the column doesn't exist.
    pub fn column(&self, name: &str) -> Result<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
            .ok_or_else(|| CertezaError::column_not_found(name))
    }

    /// Returns a new dataset containing the rows whose index satisfies the
    /// mask, preserving row order and all columns.
    ///
    /// The input dataset is not modified; the selected rows are copied.
    #[must_use]
    pub fn take_rows(&self, mask: &[bool]) -> Self {
        debug_assert_eq!(mask.len(), self.n_rows);
        let columns: Vec<(String, Vec<f64>)> = self
            .columns
            .iter()
            .map(|(name, col)| {
                let filtered: Vec<f64> = col
                    .iter()
                    .zip(mask)
                    .filter_map(|(&v, &keep)| keep.then_some(v))
                    .collect();
                (name.clone(), filtered)
            })
            .collect();
        let n_rows = columns.first().map_or(0, |(_, c)| c.len());
        Self { columns, n_rows }
    }

    /// Returns an iterator over columns as (name, values) pairs.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
#[path = "data_tests.rs"]
mod tests;
