//! Global per-command rate limit: a token bucket holding one token, refilled once per period.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Cooldown {
    period: Duration,
    last_used: Mutex<Option<Instant>>,
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_used: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Takes the token, or returns how long until it is back.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.try_acquire_at(Instant::now())
    }

    pub fn try_acquire_at(&self, now: Instant) -> Result<(), Duration> {
        let mut last_used = match self.last_used.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(last) = *last_used {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.period {
                return Err(self.period - elapsed);
            }
        }
        *last_used = Some(now);
        Ok(())
    }
}

/// User-facing cooldown reply; seconds are rounded up so "0s" never shows.
pub fn cooldown_message(remaining: Duration) -> String {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    format!("This command is on cooldown. Try again in {}s.", secs.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_use_is_allowed_then_blocked_until_period_passes() {
        let cooldown = Cooldown::new(Duration::from_secs(60));
        let start = Instant::now();

        assert!(cooldown.try_acquire_at(start).is_ok());
        assert_eq!(
            cooldown.try_acquire_at(start + Duration::from_secs(15)),
            Err(Duration::from_secs(45))
        );
        assert!(cooldown.try_acquire_at(start + Duration::from_secs(60)).is_ok());
        assert!(cooldown.try_acquire_at(start + Duration::from_secs(61)).is_err());
    }

    #[test]
    fn test_rejected_attempts_do_not_extend_the_cooldown() {
        let cooldown = Cooldown::new(Duration::from_secs(10));
        let start = Instant::now();

        cooldown.try_acquire_at(start).unwrap();
        for s in 1..10 {
            assert!(cooldown.try_acquire_at(start + Duration::from_secs(s)).is_err());
        }
        assert!(cooldown.try_acquire_at(start + Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_zero_period_never_blocks() {
        let cooldown = Cooldown::new(Duration::ZERO);
        assert!(cooldown.try_acquire().is_ok());
        assert!(cooldown.try_acquire().is_ok());
    }

    #[test]
    fn test_cooldown_message_rounds_up() {
        assert_eq!(
            cooldown_message(Duration::from_millis(44_200)),
            "This command is on cooldown. Try again in 45s."
        );
        assert_eq!(
            cooldown_message(Duration::from_secs(3)),
            "This command is on cooldown. Try again in 3s."
        );
        assert_eq!(
            cooldown_message(Duration::ZERO),
            "This command is on cooldown. Try again in 1s."
        );
    }
}
