use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Source of the current time, so tests can drive simulated clocks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let step = chrono::Duration::from_std(by).unwrap_or_default();
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += step;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: crate::env::rate_limit::MAX_REQUESTS,
            window: Duration::from_secs(crate::env::rate_limit::WINDOW_SECONDS),
        }
    }
}

/// Counter state of one session's rate window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateWindow {
    pub window_start: DateTime<Utc>,
    pub count: u32,
}

impl Default for RateWindow {
    fn default() -> Self {
        Self {
            window_start: DateTime::<Utc>::UNIX_EPOCH,
            count: 0,
        }
    }
}

/// Outcome of a single `check`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateDecision {
    Allowed,
    Rejected { wait_seconds: f64 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed)
    }

    pub fn wait_seconds(&self) -> f64 {
        match self {
            RateDecision::Allowed => 0.0,
            RateDecision::Rejected { wait_seconds } => *wait_seconds,
        }
    }
}

/// Per-session request limiter.
///
/// Window semantics: the window resets once more than `window` has passed
/// since `window_start`, and every *allowed* request moves `window_start`
/// to now. A steady trickle of requests therefore keeps the window open,
/// which makes this a sliding approximation rather than a fixed window.
///
/// Each session owns its own limiter; never share one between sessions.
pub struct RateLimiter {
    config: RateLimitConfig,
    window: RateWindow,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .field("window", &self.window)
            .finish()
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            window: RateWindow::default(),
            clock,
        }
    }

    pub fn check(&mut self) -> RateDecision {
        let now = self.clock.now();
        // Unrepresentable windows never expire
        let window = chrono::Duration::from_std(self.config.window).unwrap_or(chrono::Duration::MAX);

        if now.signed_duration_since(self.window.window_start) > window {
            self.window.count = 0;
            self.window.window_start = now;
        }

        if self.window.count >= self.config.max_requests {
            let remaining = window
                .checked_sub(&now.signed_duration_since(self.window.window_start))
                .unwrap_or(window);
            let wait_seconds = (remaining.num_milliseconds() as f64 / 1000.0).max(0.0);
            return RateDecision::Rejected { wait_seconds };
        }

        self.window.count += 1;
        self.window.window_start = now;
        RateDecision::Allowed
    }

    /// Back to the initial state, as if no request had been made
    pub fn reset(&mut self) {
        self.window = RateWindow::default();
    }

    pub fn window(&self) -> RateWindow {
        self.window
    }

    pub fn config(&self) -> RateLimitConfig {
        self.config
    }

    pub fn get_status(&self) -> RateLimiterStatus {
        RateLimiterStatus {
            used_requests: self.window.count,
            available_requests: self.config.max_requests.saturating_sub(self.window.count),
            window_start: self.window.window_start,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimiterStatus {
    pub used_requests: u32,
    pub available_requests: u32,
    pub window_start: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn limiter() -> (RateLimiter, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap());
        let limiter = RateLimiter::with_clock(RateLimitConfig::default(), Arc::new(clock.clone()));
        (limiter, clock)
    }

    #[test]
    fn test_thirty_requests_then_rejection() {
        let (mut limiter, clock) = limiter();

        for i in 0..30 {
            assert!(limiter.check().is_allowed(), "request {} should pass", i + 1);
            clock.advance(Duration::from_secs(1));
        }

        let decision = limiter.check();
        assert!(!decision.is_allowed());
        assert!(decision.wait_seconds() > 0.0);
        assert_eq!(limiter.window().count, 30);
    }

    #[test]
    fn test_rejection_does_not_increment() {
        let (mut limiter, _clock) = limiter();
        for _ in 0..30 {
            limiter.check();
        }
        for _ in 0..5 {
            assert!(!limiter.check().is_allowed());
        }
        assert_eq!(limiter.window().count, 30);
    }

    #[test]
    fn test_wait_is_measured_from_last_success() {
        let (mut limiter, clock) = limiter();
        for _ in 0..30 {
            limiter.check();
        }
        clock.advance(Duration::from_secs(20));

        let decision = limiter.check();
        assert_eq!(decision, RateDecision::Rejected { wait_seconds: 40.0 });
    }

    #[test]
    fn test_window_resets_after_elapsed() {
        let (mut limiter, clock) = limiter();
        for _ in 0..30 {
            limiter.check();
        }
        assert!(!limiter.check().is_allowed());

        clock.advance(Duration::from_secs(61));
        assert!(limiter.check().is_allowed());
        assert_eq!(limiter.window().count, 1);
    }

    #[test]
    fn test_success_refreshes_window_start() {
        let (mut limiter, clock) = limiter();

        // Spread 30 requests over 58 seconds; each one slides the window.
        for _ in 0..30 {
            assert!(limiter.check().is_allowed());
            clock.advance(Duration::from_secs(2));
        }

        // 90s after the first request but only 32s after the last one: a
        // fixed window would have reset by now, this one has not.
        clock.advance(Duration::from_secs(30));
        assert!(!limiter.check().is_allowed());
    }

    #[test]
    fn test_exact_window_boundary_still_rejects() {
        let (mut limiter, clock) = limiter();
        for _ in 0..30 {
            limiter.check();
        }
        clock.advance(Duration::from_secs(60));

        let decision = limiter.check();
        assert!(!decision.is_allowed());
        assert_eq!(decision.wait_seconds(), 0.0);
    }

    #[test]
    fn test_reset() {
        let (mut limiter, _clock) = limiter();
        for _ in 0..30 {
            limiter.check();
        }
        limiter.reset();
        assert_eq!(limiter.window(), RateWindow::default());
        assert!(limiter.check().is_allowed());
    }

    #[test]
    fn test_status() {
        let (mut limiter, _clock) = limiter();
        limiter.check();
        limiter.check();
        let status = limiter.get_status();
        assert_eq!(status.used_requests, 2);
        assert_eq!(status.available_requests, 28);
    }

    #[test]
    fn test_unrepresentable_window_never_expires() {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap());
        let config = RateLimitConfig {
            max_requests: 1,
            window: Duration::MAX,
        };
        let mut limiter = RateLimiter::with_clock(config, Arc::new(clock.clone()));

        assert!(limiter.check().is_allowed());
        clock.advance(Duration::from_secs(86_400 * 365));

        let decision = limiter.check();
        assert!(!decision.is_allowed());
        assert!(decision.wait_seconds() > 0.0);
    }
}
