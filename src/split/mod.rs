//! Group splitting for A/B experiments.
//!
//! Partitions an experiment dataset into control and treatment subsets by a
//! group-assignment column. Group codes follow the pre-analysis plan:
//! 0 = control, 1 = first treatment arm, 2 = second treatment arm.
//!
//! Records whose group value falls outside {0, 1, 2} belong to no partition
//! and are silently dropped. This is intentional: stray codes in the
//! assignment column are excluded from analysis, not treated as errors.

use crate::data::Dataset;
use crate::error::Result;

/// Group code for the control group.
pub const GROUP_CONTROL: f64 = 0.0;
/// Group code for the first treatment arm.
pub const GROUP_ARM_A: f64 = 1.0;
/// Group code for the second treatment arm.
pub const GROUP_ARM_B: f64 = 2.0;

/// Splits the dataset into control and the two treatment arms.
///
/// Returns `(control, arm_a, arm_b)` partitions for group values 0, 1 and 2.
/// The partitions are owned row subsets; the input is not modified.
///
/// # Errors
///
/// Returns an error if `group_column` does not exist.
///
/// # Examples
///
/// ```
/// use certeza::data::Dataset;
/// use certeza::split::split_three;
///
/// let ds = Dataset::new(vec![
///     ("group".to_string(), vec![0.0, 1.0, 2.0, 1.0]),
///     ("enrolled".to_string(), vec![1.0, 0.0, 1.0, 1.0]),
/// ])
/// .expect("valid columns");
///
/// let (control, arm_a, arm_b) = split_three(&ds, "group").expect("column exists");
/// assert_eq!(control.n_rows(), 1);
/// assert_eq!(arm_a.n_rows(), 2);
/// assert_eq!(arm_b.n_rows(), 1);
/// ```
pub fn split_three(dataset: &Dataset, group_column: &str) -> Result<(Dataset, Dataset, Dataset)> {
    let control = filter_by_group(dataset, group_column, |g| g == GROUP_CONTROL)?;
    let arm_a = filter_by_group(dataset, group_column, |g| g == GROUP_ARM_A)?;
    let arm_b = filter_by_group(dataset, group_column, |g| g == GROUP_ARM_B)?;
    Ok((control, arm_a, arm_b))
}

/// Splits the dataset into control and a single aggregated treatment group.
///
/// Both treatment arms (group values 1 and 2) are merged into one treatment
/// partition, as pre-registered in the analysis plan.
///
/// # Errors
///
/// Returns an error if `group_column` does not exist.
pub fn split_two(dataset: &Dataset, group_column: &str) -> Result<(Dataset, Dataset)> {
    let control = filter_by_group(dataset, group_column, |g| g == GROUP_CONTROL)?;
    let treatment =
        filter_by_group(dataset, group_column, |g| g == GROUP_ARM_A || g == GROUP_ARM_B)?;
    Ok((control, treatment))
}

fn filter_by_group<F>(dataset: &Dataset, group_column: &str, predicate: F) -> Result<Dataset>
where
    F: Fn(f64) -> bool,
{
    let groups = dataset.column(group_column)?;
    let mask: Vec<bool> = groups.iter().map(|&g| predicate(g)).collect();
    Ok(dataset.take_rows(&mask))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experiment_dataset() -> Dataset {
        // 2 control, 3 arm A, 2 arm B, 1 stray code
        Dataset::new(vec![
            (
                "group".to_string(),
                vec![0.0, 1.0, 2.0, 1.0, 0.0, 1.0, 2.0, 7.0],
            ),
            (
                "enrolled".to_string(),
                vec![1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            ),
        ])
        .expect("valid columns")
    }

    #[test]
    fn test_split_three_partition_sizes() {
        let ds = experiment_dataset();
        let (control, arm_a, arm_b) = split_three(&ds, "group").expect("column exists");
        assert_eq!(control.n_rows(), 2);
        assert_eq!(arm_a.n_rows(), 3);
        assert_eq!(arm_b.n_rows(), 2);
    }

    #[test]
    fn test_split_three_drops_unknown_codes() {
        let ds = experiment_dataset();
        let (control, arm_a, arm_b) = split_three(&ds, "group").expect("column exists");
        let total = control.n_rows() + arm_a.n_rows() + arm_b.n_rows();
        // The row with group code 7 lands in no partition.
        assert_eq!(total, ds.n_rows() - 1);
    }

    #[test]
    fn test_split_three_partitions_are_pure() {
        let ds = experiment_dataset();
        let (control, arm_a, arm_b) = split_three(&ds, "group").expect("column exists");
        assert!(control
            .column("group")
            .expect("column")
            .iter()
            .all(|&g| g == GROUP_CONTROL));
        assert!(arm_a
            .column("group")
            .expect("column")
            .iter()
            .all(|&g| g == GROUP_ARM_A));
        assert!(arm_b
            .column("group")
            .expect("column")
            .iter()
            .all(|&g| g == GROUP_ARM_B));
    }

    #[test]
    fn test_split_two_merges_arms() {
        let ds = experiment_dataset();
        let (control, treatment) = split_two(&ds, "group").expect("column exists");
        assert_eq!(control.n_rows(), 2);
        assert_eq!(treatment.n_rows(), 5);
    }

    #[test]
    fn test_split_two_treatment_equals_arm_union() {
        let ds = experiment_dataset();
        let (_, treatment) = split_two(&ds, "group").expect("column exists");
        let (_, arm_a, arm_b) = split_three(&ds, "group").expect("column exists");

        let mut merged: Vec<f64> = arm_a
            .column("enrolled")
            .expect("column")
            .iter()
            .chain(arm_b.column("enrolled").expect("column"))
            .copied()
            .collect();
        let mut treated: Vec<f64> = treatment.column("enrolled").expect("column").to_vec();
        merged.sort_by(f64::total_cmp);
        treated.sort_by(f64::total_cmp);
        assert_eq!(merged, treated);
    }

    #[test]
    fn test_split_does_not_mutate_input() {
        let ds = experiment_dataset();
        let before = ds.clone();
        let _ = split_three(&ds, "group").expect("column exists");
        let _ = split_two(&ds, "group").expect("column exists");
        assert_eq!(ds, before);
    }

    #[test]
    fn test_split_missing_column() {
        let ds = experiment_dataset();
        assert!(split_three(&ds, "variant").is_err());
        assert!(split_two(&ds, "variant").is_err());
    }

    #[test]
    fn test_split_three_even_thirty() {
        let mut groups = Vec::new();
        let mut outcomes = Vec::new();
        for i in 0..30 {
            groups.push(f64::from(i % 3));
            outcomes.push(f64::from(i % 2));
        }
        let ds = Dataset::new(vec![
            ("group".to_string(), groups),
            ("clicked".to_string(), outcomes),
        ])
        .expect("valid columns");

        let (control, arm_a, arm_b) = split_three(&ds, "group").expect("column exists");
        assert_eq!(control.n_rows(), 10);
        assert_eq!(arm_a.n_rows(), 10);
        assert_eq!(arm_b.n_rows(), 10);
    }
}
