use rand::{Rng, RngCore};
use std::time::Duration;

use crate::RetryPolicy;

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// The ceiling doubles from `initial_backoff` per attempt and is capped at `max_backoff`.
    /// The returned delay is drawn from the upper half of that ceiling.
    pub(crate) fn retry_delay(&self, rng: &mut impl RngCore, attempt: usize) -> Duration {
        let doublings = attempt.saturating_sub(1).min(u32::MAX as usize) as u32;
        let ceiling = self
            .initial_backoff
            .checked_mul(2u32.checked_pow(doublings).unwrap_or(u32::MAX))
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff);

        let ceiling_ms = u64::try_from(ceiling.as_millis()).unwrap_or(u64::MAX);
        if ceiling_ms <= 1 {
            return ceiling;
        }
        let floor_ms = ceiling_ms / 2;
        Duration::from_millis(floor_ms + rng.gen_range(0..=ceiling_ms - floor_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn policy(initial_ms: u64, max_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(initial_ms),
            max_backoff: Duration::from_millis(max_ms),
            retry_non_idempotent: false,
        }
    }

    #[test]
    fn test_delay_doubles_until_capped() {
        let policy = policy(200, 1_000);
        let mut rng = StdRng::seed_from_u64(0);
        for (attempt, ceiling) in [(1, 200), (2, 400), (3, 800), (4, 1_000), (9, 1_000)] {
            for _ in 0..200 {
                let delay = policy.retry_delay(&mut rng, attempt);
                assert!(delay >= Duration::from_millis(ceiling / 2), "attempt {attempt}");
                assert!(delay <= Duration::from_millis(ceiling), "attempt {attempt}");
            }
        }
    }

    #[test]
    fn test_zero_policy_never_sleeps() {
        let policy = policy(0, 0);
        let mut rng = StdRng::seed_from_u64(0);
        for attempt in 1..10 {
            assert_eq!(policy.retry_delay(&mut rng, attempt), Duration::ZERO);
        }
    }

    #[test]
    fn test_large_attempt_saturates_at_max() {
        let policy = policy(1, 5_000);
        let mut rng = StdRng::seed_from_u64(3);
        let delay = policy.retry_delay(&mut rng, usize::MAX);
        assert!(delay >= Duration::from_millis(2_500));
        assert!(delay <= Duration::from_millis(5_000));
        assert_eq!(policy.retry_delay(&mut rng, 1), Duration::from_millis(1));
    }
}
