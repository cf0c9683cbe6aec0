//! Seeded holdout split.

use crate::error::TrainingError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Row indices of a train/test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    /// Training rows
    pub train: Vec<usize>,
    /// Held-out rows
    pub test: Vec<usize>,
}

/// Shuffle `0..rows` with a seeded RNG and hold out `ceil(rows * test_fraction)`.
///
/// # Errors
/// [`TrainingError::InvalidConfig`] when the fraction is outside (0, 1) and
/// [`TrainingError::InsufficientRows`] when either side would be empty.
pub fn train_test_split(rows: usize, test_fraction: f64, seed: u64) -> Result<Split, TrainingError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TrainingError::InvalidConfig(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let test_len = (rows as f64 * test_fraction).ceil() as usize;
    if rows < 2 || test_len >= rows {
        return Err(TrainingError::InsufficientRows {
            required: 2,
            actual: rows,
        });
    }

    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_len);
    Ok(Split {
        train,
        test: indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10, 0.2, 2)]
    #[case(11, 0.2, 3)]
    #[case(1460, 0.2, 292)]
    fn test_split_sizes(#[case] rows: usize, #[case] fraction: f64, #[case] test_len: usize) {
        let split = train_test_split(rows, fraction, 42).unwrap();
        assert_eq!(split.test.len(), test_len);
        assert_eq!(split.train.len(), rows - test_len);
    }

    #[test]
    fn test_split_is_a_partition() {
        let split = train_test_split(50, 0.2, 7).unwrap();
        let mut all: Vec<_> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_reproducible() {
        assert_eq!(
            train_test_split(100, 0.2, 42).unwrap(),
            train_test_split(100, 0.2, 42).unwrap()
        );
        assert_ne!(
            train_test_split(100, 0.2, 42).unwrap(),
            train_test_split(100, 0.2, 43).unwrap()
        );
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    #[case(f64::NAN)]
    fn test_invalid_fraction(#[case] fraction: f64) {
        assert!(matches!(
            train_test_split(10, fraction, 0),
            Err(TrainingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_too_few_rows() {
        assert!(matches!(
            train_test_split(1, 0.5, 0),
            Err(TrainingError::InsufficientRows { .. })
        ));
    }
}
