//! Seeded holdout split

use crate::deterministic::LcgRng;
use crate::errors::{Result, TrainerError};

/// Row indices of the two sides of a holdout split
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Number of test rows for `n` rows: `ceil(test_size * n)`
pub fn test_count(n: usize, test_size: f64) -> usize {
    (test_size * n as f64).ceil() as usize
}

/// Shuffle `0..n` with `seed` and hold out the first `ceil(test_size * n)`.
///
/// Both sides must end up non-empty.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<SplitIndices> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(TrainerError::Split(format!(
            "test_size must be between 0 and 1, got {test_size}"
        )));
    }

    let n_test = test_count(n, test_size);
    if n_test == 0 || n_test >= n {
        return Err(TrainerError::Split(format!(
            "with {n} rows and test_size={test_size} the train side would have {} rows and the test side {}",
            n.saturating_sub(n_test),
            n_test
        )));
    }

    let mut rng = LcgRng::new(seed);
    let mut permutation = rng.permutation(n);
    let train = permutation.split_off(n_test);

    Ok(SplitIndices {
        train,
        test: permutation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() -> Result<()> {
        let split = train_test_split(10, 0.2, 42)?;
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        // Fractional counts round the test side up.
        let split = train_test_split(11, 0.25, 42)?;
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 8);
        Ok(())
    }

    #[test]
    fn test_same_seed_same_partition() -> Result<()> {
        assert_eq!(train_test_split(100, 0.3, 7)?, train_test_split(100, 0.3, 7)?);
        assert_ne!(train_test_split(100, 0.3, 7)?, train_test_split(100, 0.3, 8)?);
        Ok(())
    }

    #[test]
    fn test_degenerate_splits_fail() {
        assert!(train_test_split(1, 0.5, 0).is_err());
        assert!(train_test_split(0, 0.5, 0).is_err());
        assert!(train_test_split(10, 0.0, 0).is_err());
        assert!(train_test_split(10, 1.0, 0).is_err());
        assert!(train_test_split(3, 0.9, 0).is_err());
    }
}
