//! Demo workload for the command line driver

use std::thread;
use std::time::Duration;

use lrumemo::{KeyDerivationError, Memoized};
use thiserror::Error;
use tracing::warn;

/// Errors of the demo function
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DemoError {
    /// Argument could not be keyed
    #[error("Key derivation failed: {0}")]
    Key(#[from] KeyDerivationError),

    /// Argument listed in `--fail-on`
    #[error("Refusing to square {0}")]
    Rejected(i64),

    /// Square does not fit in an `i64`
    #[error("Square of {0} overflows")]
    Overflow(i64),
}

/// Result of one call, as seen from the outside
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Served from the cache
    Hit(i64),
    /// Computed and stored
    Miss(i64),
    /// Function failed; nothing stored
    Failed(DemoError),
}

/// Square `n`, pretending it takes `delay_ms`
pub fn slow_square(n: i64, fail_on: &[i64], delay_ms: u64) -> Result<i64, DemoError> {
    if delay_ms > 0 {
        thread::sleep(Duration::from_millis(delay_ms));
    }
    if fail_on.contains(&n) {
        return Err(DemoError::Rejected(n));
    }
    n.checked_mul(n).ok_or(DemoError::Overflow(n))
}

/// Call `memo` once per key and classify each call by the hit counter
pub fn run_calls<F>(memo: &Memoized<i64, i64, F>, keys: &[i64]) -> Vec<Outcome>
where
    F: Fn(i64) -> Result<i64, DemoError>,
{
    keys.iter()
        .map(|&n| {
            let hits = memo.stats().hits();
            match memo.call(n) {
                Ok(value) if memo.stats().hits() > hits => Outcome::Hit(value),
                Ok(value) => Outcome::Miss(value),
                Err(err) => {
                    warn!("call with {} failed: {}", n, err);
                    Outcome::Failed(err)
                }
            }
        })
        .collect()
}
