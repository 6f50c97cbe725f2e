//! Fixed-window rate limiter keyed by upstream service name.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Service name used by the catalog client.
pub const CATALOG_SERVICE: &str = "catalog";

/// Service name used by the enrichment client.
pub const ENRICHMENT_SERVICE: &str = "enrichment";

/// Rate limiter shared by every client of one process.
pub type SharedRateLimiter = Arc<Mutex<RateLimiter>>;

/// Request quota for one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct RateLimitConfig {
    /// Maximum number of requests admitted per window.
    pub requests: u32,
    /// Window length in milliseconds.
    pub window_ms: u64,
}

impl RateLimitConfig {
    /// Creates a quota of `requests` per `window`.
    #[must_use]
    #[allow(clippy::as_conversions, clippy::cast_possible_truncation)]
    pub const fn new(requests: u32, window: Duration) -> Self {
        Self {
            requests,
            window_ms: window.as_millis() as u64,
        }
    }

    /// Window length.
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Default quotas: catalog 40 per 10 s, enrichment 1000 per day.
#[must_use]
pub fn default_quotas() -> HashMap<String, RateLimitConfig> {
    HashMap::from([
        (
            String::from(CATALOG_SERVICE),
            RateLimitConfig::new(40, Duration::from_secs(10)),
        ),
        (
            String::from(ENRICHMENT_SERVICE),
            RateLimitConfig::new(1_000, Duration::from_secs(86_400)),
        ),
    ])
}

/// Requests left in the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingRequests {
    /// No quota is configured for the service.
    Unbounded,
    /// Requests still admitted before the window resets.
    Limited(u32),
}

/// Aggregate view returned by [`RateLimiter::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct RateLimitStatus {
    /// Outcome of the admission check performed while building the status.
    pub allowed: bool,
    /// Requests left after that check.
    pub remaining: RemainingRequests,
    /// Time until the current window ends.
    pub reset_in: Duration,
    /// Configured quota, `None` when unbounded.
    pub limit: Option<u32>,
    /// Configured window length, zero when unbounded.
    pub window: Duration,
}

/// Counter state of one service.
#[derive(Debug, Clone, Copy)]
struct RateLimitWindow {
    request_count: u32,
    window_start: Instant,
}

impl RateLimitWindow {
    const fn started(now: Instant) -> Self {
        Self {
            request_count: 1,
            window_start: now,
        }
    }

    fn has_rolled_over(&self, config: &RateLimitConfig, now: Instant) -> bool {
        now.saturating_duration_since(self.window_start) >= config.window()
    }
}

/// Fixed-window admission control, one independent window per service.
///
/// The counter resets at the start of every window, so a burst straddling
/// a boundary can admit up to twice the quota in a short span.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct RateLimiter {
    configs: HashMap<String, RateLimitConfig>,
    windows: HashMap<String, RateLimitWindow>,
}

impl RateLimiter {
    /// Creates a limiter with the given per-service quotas.
    #[must_use]
    pub fn new(configs: HashMap<String, RateLimitConfig>) -> Self {
        Self {
            configs,
            windows: HashMap::new(),
        }
    }

    /// Creates a limiter with [`default_quotas`].
    #[must_use]
    pub fn with_default_quotas() -> Self {
        Self::new(default_quotas())
    }

    /// Admits or rejects one request for `service`, counting it when admitted.
    pub fn is_allowed(&mut self, service: &str) -> bool {
        self.is_allowed_at(service, Instant::now())
    }

    /// [`Self::is_allowed`] evaluated at `now`.
    pub fn is_allowed_at(&mut self, service: &str, now: Instant) -> bool {
        let Some(config) = self.configs.get(service) else {
            return true;
        };

        match self.windows.get_mut(service) {
            None => {
                self.windows
                    .insert(String::from(service), RateLimitWindow::started(now));
                true
            }
            Some(window) if window.has_rolled_over(config, now) => {
                *window = RateLimitWindow::started(now);
                true
            }
            Some(window) if window.request_count >= config.requests => false,
            Some(window) => {
                window.request_count = window.request_count.saturating_add(1);
                true
            }
        }
    }

    /// Time until the current window of `service` ends; zero if untracked.
    #[must_use]
    pub fn time_until_reset(&self, service: &str) -> Duration {
        self.time_until_reset_at(service, Instant::now())
    }

    /// [`Self::time_until_reset`] evaluated at `now`.
    #[must_use]
    pub fn time_until_reset_at(&self, service: &str, now: Instant) -> Duration {
        match (self.configs.get(service), self.windows.get(service)) {
            (Some(config), Some(window)) => config
                .window()
                .saturating_sub(now.saturating_duration_since(window.window_start)),
            _ => Duration::ZERO,
        }
    }

    /// Requests still admitted in the current window of `service`.
    #[must_use]
    pub fn remaining_requests(&self, service: &str) -> RemainingRequests {
        self.remaining_requests_at(service, Instant::now())
    }

    /// [`Self::remaining_requests`] evaluated at `now`.
    #[must_use]
    pub fn remaining_requests_at(&self, service: &str, now: Instant) -> RemainingRequests {
        let Some(config) = self.configs.get(service) else {
            return RemainingRequests::Unbounded;
        };
        match self.windows.get(service) {
            Some(window) if !window.has_rolled_over(config, now) => {
                RemainingRequests::Limited(config.requests.saturating_sub(window.request_count))
            }
            _ => RemainingRequests::Limited(config.requests),
        }
    }

    /// Forgets the window of `service`.
    pub fn reset(&mut self, service: &str) {
        self.windows.remove(service);
    }

    /// Forgets every window.
    pub fn reset_all(&mut self) {
        self.windows.clear();
    }

    /// Replaces the quota of `service`.
    pub fn update_config(&mut self, service: &str, config: RateLimitConfig) {
        self.configs.insert(String::from(service), config);
    }

    /// Quota configured for `service`.
    #[must_use]
    pub fn config(&self, service: &str) -> Option<RateLimitConfig> {
        self.configs.get(service).copied()
    }

    /// Snapshot of `service`.
    ///
    /// Not read-only: it performs an admission check, which counts as a
    /// request when allowed.
    pub fn status(&mut self, service: &str) -> RateLimitStatus {
        self.status_at(service, Instant::now())
    }

    /// [`Self::status`] evaluated at `now`.
    pub fn status_at(&mut self, service: &str, now: Instant) -> RateLimitStatus {
        let Some(config) = self.config(service) else {
            return RateLimitStatus {
                allowed: true,
                remaining: RemainingRequests::Unbounded,
                reset_in: Duration::ZERO,
                limit: None,
                window: Duration::ZERO,
            };
        };

        let allowed = self.is_allowed_at(service, now);
        RateLimitStatus {
            allowed,
            remaining: self.remaining_requests_at(service, now),
            reset_in: self.time_until_reset_at(service, now),
            limit: Some(config.requests),
            window: config.window(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn limiter(requests: u32, window_ms: u64) -> RateLimiter {
        RateLimiter::new(HashMap::from([(
            String::from("svc"),
            RateLimitConfig::new(requests, Duration::from_millis(window_ms)),
        )]))
    }

    fn later(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    #[test]
    fn test_unconfigured_service_always_allowed() {
        // Arrange
        let mut limiter = RateLimiter::default();

        // Act & Assert
        for _ in 0..100 {
            assert!(limiter.is_allowed("anything"));
        }
        assert_eq!(
            limiter.remaining_requests("anything"),
            RemainingRequests::Unbounded
        );
        assert_eq!(limiter.time_until_reset("anything"), Duration::ZERO);
    }

    #[test]
    fn test_quota_exhausted_then_window_rolls_over() {
        // Arrange
        let mut limiter = limiter(3, 1_000);
        let start = Instant::now();

        // Act & Assert
        assert!(limiter.is_allowed_at("svc", start));
        assert!(limiter.is_allowed_at("svc", later(start, 10)));
        assert!(limiter.is_allowed_at("svc", later(start, 20)));
        assert!(!limiter.is_allowed_at("svc", later(start, 30)));

        assert!(limiter.is_allowed_at("svc", later(start, 1_000)));
        let window = limiter.windows.get("svc").unwrap();
        assert_eq!(window.request_count, 1);
        assert_eq!(window.window_start, later(start, 1_000));
    }

    #[test]
    fn test_denied_request_does_not_mutate_state() {
        // Arrange
        let mut limiter = limiter(1, 1_000);
        let start = Instant::now();
        assert!(limiter.is_allowed_at("svc", start));

        // Act
        assert!(!limiter.is_allowed_at("svc", later(start, 500)));

        // Assert
        let window = limiter.windows.get("svc").unwrap();
        assert_eq!(window.request_count, 1);
        assert_eq!(window.window_start, start);
    }

    #[test]
    fn test_remaining_requests_decrements_and_resets() {
        // Arrange
        let mut limiter = limiter(3, 1_000);
        let start = Instant::now();
        assert_eq!(
            limiter.remaining_requests_at("svc", start),
            RemainingRequests::Limited(3)
        );

        // Act & Assert
        limiter.is_allowed_at("svc", start);
        assert_eq!(
            limiter.remaining_requests_at("svc", start),
            RemainingRequests::Limited(2)
        );
        limiter.is_allowed_at("svc", start);
        assert_eq!(
            limiter.remaining_requests_at("svc", start),
            RemainingRequests::Limited(1)
        );
        limiter.is_allowed_at("svc", start);
        assert_eq!(
            limiter.remaining_requests_at("svc", start),
            RemainingRequests::Limited(0)
        );
        assert_eq!(
            limiter.remaining_requests_at("svc", later(start, 1_000)),
            RemainingRequests::Limited(3)
        );
    }

    #[test]
    fn test_time_until_reset() {
        // Arrange
        let mut limiter = limiter(3, 1_000);
        let start = Instant::now();
        limiter.is_allowed_at("svc", start);

        // Act & Assert
        assert_eq!(
            limiter.time_until_reset_at("svc", later(start, 400)),
            Duration::from_millis(600)
        );
        assert_eq!(
            limiter.time_until_reset_at("svc", later(start, 5_000)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_services_are_independent() {
        // Arrange
        let mut limiter = RateLimiter::new(HashMap::from([
            (String::from("a"), RateLimitConfig::new(1, Duration::from_secs(60))),
            (String::from("b"), RateLimitConfig::new(1, Duration::from_secs(60))),
        ]));

        // Act & Assert
        assert!(limiter.is_allowed("a"));
        assert!(!limiter.is_allowed("a"));
        assert!(limiter.is_allowed("b"));
    }

    #[test]
    fn test_reset_and_reset_all() {
        // Arrange
        let mut limiter = limiter(1, 60_000);
        assert!(limiter.is_allowed("svc"));
        assert!(!limiter.is_allowed("svc"));

        // Act & Assert
        limiter.reset("svc");
        assert!(limiter.is_allowed("svc"));
        limiter.reset_all();
        assert!(limiter.windows.is_empty());
    }

    #[test]
    fn test_update_config_applies_to_next_check() {
        // Arrange
        let mut limiter = limiter(1, 60_000);
        assert!(limiter.is_allowed("svc"));
        assert!(!limiter.is_allowed("svc"));

        // Act
        limiter.update_config("svc", RateLimitConfig::new(5, Duration::from_secs(60)));

        // Assert
        assert!(limiter.is_allowed("svc"));
    }

    #[test]
    fn test_status_consumes_a_request() {
        // Arrange
        let mut limiter = limiter(2, 1_000);
        let start = Instant::now();

        // Act
        let first = limiter.status_at("svc", start);
        let second = limiter.status_at("svc", start);
        let third = limiter.status_at("svc", start);

        // Assert
        assert!(first.allowed);
        assert_eq!(first.remaining, RemainingRequests::Limited(1));
        assert!(second.allowed);
        assert_eq!(second.remaining, RemainingRequests::Limited(0));
        assert!(!third.allowed);
        assert_eq!(third.limit, Some(2));
        assert_eq!(third.window, Duration::from_secs(1));
        assert_eq!(third.reset_in, Duration::from_secs(1));
    }

    #[test]
    fn test_status_unconfigured() {
        // Arrange
        let mut limiter = RateLimiter::default();

        // Act
        let status = limiter.status("none");

        // Assert
        assert!(status.allowed);
        assert_eq!(status.remaining, RemainingRequests::Unbounded);
        assert_eq!(status.limit, None);
    }

    #[test]
    fn test_default_quotas() {
        // Arrange & Act
        let limiter = RateLimiter::with_default_quotas();

        // Assert
        let catalog = limiter.config(CATALOG_SERVICE).unwrap();
        assert_eq!(catalog.requests, 40);
        assert_eq!(catalog.window(), Duration::from_secs(10));
        let enrichment = limiter.config(ENRICHMENT_SERVICE).unwrap();
        assert_eq!(enrichment.requests, 1_000);
        assert_eq!(enrichment.window_ms, 86_400_000);
    }
}
