//! Bounded retry with a fixed delay between attempts.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Treated as at least 1.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

/// Outcome of the last attempt plus how many attempts were made.
#[derive(Debug)]
pub struct Attempted<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Run `op` until it succeeds or `policy.max_attempts` is exhausted.
///
/// `on_failure(attempt, &err, will_retry)` is called after every failed attempt, before
/// any sleep. There is no sleep after the final attempt.
pub fn retry<T, E, F, N>(policy: RetryPolicy, mut on_failure: N, mut op: F) -> Attempted<T, E>
where
    F: FnMut(u32) -> Result<T, E>,
    N: FnMut(u32, &E, bool),
{
    let max = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(v) => {
                return Attempted {
                    result: Ok(v),
                    attempts: attempt,
                };
            }
            Err(e) => {
                let will_retry = attempt < max;
                on_failure(attempt, &e, will_retry);
                if !will_retry {
                    return Attempted {
                        result: Err(e),
                        attempts: attempt,
                    };
                }
                if !policy.delay.is_zero() {
                    std::thread::sleep(policy.delay);
                }
                attempt += 1;
            }
        }
    }
}
