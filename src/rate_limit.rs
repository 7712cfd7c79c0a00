use std::net::IpAddr;
use std::time::{Duration, Instant};

use dashmap::DashMap;

const MAX_FAILURES: u32 = 5;
const WINDOW: Duration = Duration::from_secs(15 * 60);
/// Stale entries are swept once the map grows past this.
const SWEEP_THRESHOLD: usize = 1024;

/// Per-IP dashboard login brute force limiter.
pub struct LoginRateLimiter {
    /// ip -> (failed_count, window_start)
    entries: DashMap<IpAddr, (u32, Instant)>,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Check if a login attempt is allowed. 5 failures per 15 minutes.
    /// Does NOT increment the counter; call `record_failure()` on a wrong password.
    /// On refusal returns the seconds left in the window.
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        self.check_at(ip, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), u64> {
        let Some(entry) = self.entries.get(&ip) else {
            return Ok(());
        };
        let (count, start) = *entry.value();

        if now.duration_since(start) > WINDOW {
            return Ok(());
        }

        if count >= MAX_FAILURES {
            let elapsed = now.duration_since(start).as_secs();
            return Err(WINDOW.as_secs().saturating_sub(elapsed));
        }

        Ok(())
    }

    pub fn record_failure(&self, ip: IpAddr) {
        self.record_failure_at(ip, Instant::now());
    }

    fn record_failure_at(&self, ip: IpAddr, now: Instant) {
        if self.entries.len() > SWEEP_THRESHOLD {
            self.cleanup(now);
        }

        let mut entry = self.entries.entry(ip).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > WINDOW {
            *count = 1;
            *start = now;
        } else {
            *count += 1;
        }
    }

    /// A successful login forgets earlier failures from the address.
    pub fn reset(&self, ip: IpAddr) {
        self.entries.remove(&ip);
    }

    fn cleanup(&self, now: Instant) {
        self.entries
            .retain(|_, (_, start)| now.duration_since(*start) <= WINDOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([10, 0, 0, last])
    }

    #[test]
    fn blocks_after_five_failures() {
        let limiter = LoginRateLimiter::new();
        for _ in 0..MAX_FAILURES {
            assert!(limiter.check(ip(1)).is_ok());
            limiter.record_failure(ip(1));
        }
        let retry = limiter.check(ip(1)).unwrap_err();
        assert!(retry > 0 && retry <= WINDOW.as_secs());
        assert!(limiter.check(ip(2)).is_ok());
    }

    #[test]
    fn window_expiry_unblocks() {
        let limiter = LoginRateLimiter::new();
        let start = Instant::now();
        for _ in 0..MAX_FAILURES {
            limiter.record_failure_at(ip(1), start);
        }
        assert!(limiter.check_at(ip(1), start).is_err());
        let later = start + WINDOW + Duration::from_secs(1);
        assert!(limiter.check_at(ip(1), later).is_ok());

        limiter.record_failure_at(ip(1), later);
        assert_eq!(limiter.entries.get(&ip(1)).unwrap().0, 1);
    }

    #[test]
    fn reset_clears_failures() {
        let limiter = LoginRateLimiter::new();
        for _ in 0..MAX_FAILURES {
            limiter.record_failure(ip(3));
        }
        limiter.reset(ip(3));
        assert!(limiter.check(ip(3)).is_ok());
    }
}
