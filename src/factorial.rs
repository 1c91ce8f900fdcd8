// Factorial utility, independent of the task store

use crate::error::{Result, TodoError};

/// Largest input whose factorial fits in a `u64`
pub const MAX_FACTORIAL_INPUT: u32 = 20;

/// Compute `n!`
///
/// Inputs above [`MAX_FACTORIAL_INPUT`] return `FactorialOverflow`.
pub fn factorial(n: u32) -> Result<u64> {
    if n > MAX_FACTORIAL_INPUT {
        return Err(TodoError::FactorialOverflow {
            n,
            max: MAX_FACTORIAL_INPUT,
        });
    }

    (2..=u64::from(n)).try_fold(1u64, |acc, k| {
        acc.checked_mul(k).ok_or(TodoError::FactorialOverflow {
            n,
            max: MAX_FACTORIAL_INPUT,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_values() {
        assert_eq!(factorial(0).unwrap(), 1);
        assert_eq!(factorial(1).unwrap(), 1);
        assert_eq!(factorial(5).unwrap(), 120);
        assert_eq!(factorial(10).unwrap(), 3_628_800);
    }

    #[test]
    fn test_ceiling() {
        assert_eq!(factorial(20).unwrap(), 2_432_902_008_176_640_000);
        assert!(matches!(
            factorial(21).unwrap_err(),
            TodoError::FactorialOverflow { n: 21, max: 20 }
        ));
        assert!(factorial(u32::MAX).is_err());
    }
}
