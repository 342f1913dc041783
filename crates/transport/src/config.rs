use bedrock_config::ConfigModel;
use bedrock_errors::FoundationError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport settings registered under [`TRANSPORT_CONFIG_NAME`](crate::TRANSPORT_CONFIG_NAME).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub http: HttpClientConfig,
}

/// HTTP client tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    pub timeout: TimeoutConfig,
    pub retry: RetryConfig,
    pub pool: PoolConfig,
    pub follow_redirects: bool,
    pub verify_tls: bool,
    pub user_agent: String,
}

/// Timeouts in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub connect: f64,
    pub read: f64,
    pub write: f64,
    /// Time to wait for a free pooled connection.
    pub pool: f64,
}

/// Retry policy with capped exponential backoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_retries: u32,
    /// Seconds; the n-th retry waits `backoff_factor * 2^(n-1)`.
    pub backoff_factor: f64,
    /// Upper bound of a single backoff, in seconds.
    pub max_backoff: f64,
    /// Response statuses that are retried.
    pub status_forcelist: Vec<u16>,
}

/// Connection pool limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub max_keepalive_connections: u32,
    /// Seconds an idle connection is kept alive.
    pub keepalive_expiry: f64,
}

impl TimeoutConfig {
    #[must_use]
    pub fn connect_duration(&self) -> Duration {
        seconds(self.connect)
    }

    #[must_use]
    pub fn read_duration(&self) -> Duration {
        seconds(self.read)
    }

    #[must_use]
    pub fn write_duration(&self) -> Duration {
        seconds(self.write)
    }

    #[must_use]
    pub fn pool_duration(&self) -> Duration {
        seconds(self.pool)
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based). Attempt 0 is the initial request and
    /// never waits.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let delay = (self.backoff_factor * 2f64.powi(exponent)).min(self.max_backoff);
        seconds(delay)
    }

    /// Whether a response with `status` should be retried.
    #[must_use]
    pub fn should_retry(&self, status: u16) -> bool {
        self.status_forcelist.contains(&status)
    }

    /// Whether retry number `attempt` (1-based) is still within [`Self::max_retries`].
    #[must_use]
    pub const fn allows(&self, attempt: u32) -> bool {
        attempt <= self.max_retries
    }
}

impl PoolConfig {
    #[must_use]
    pub fn keepalive_duration(&self) -> Duration {
        seconds(self.keepalive_expiry)
    }
}

/// Seconds as a [`Duration`], saturating at [`Duration::MAX`] for values too large to represent.
fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value)
        .unwrap_or_else(|_| if value > 0.0 { Duration::MAX } else { Duration::ZERO })
}

fn positive(field: &'static str, value: f64) -> Result<(), FoundationError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    Err(FoundationError::validation(field, format!("must be a positive number of seconds, got {value}")))
}

fn non_negative(field: &'static str, value: f64) -> Result<(), FoundationError> {
    if value.is_finite() && value >= 0.0 {
        return Ok(());
    }
    Err(FoundationError::validation(field, format!("must not be negative, got {value}")))
}

impl ConfigModel for TransportConfig {
    fn validate(&self) -> Result<(), FoundationError> {
        let http = &self.http;

        positive("http.timeout.connect", http.timeout.connect)?;
        positive("http.timeout.read", http.timeout.read)?;
        positive("http.timeout.write", http.timeout.write)?;
        positive("http.timeout.pool", http.timeout.pool)?;

        non_negative("http.retry.backoff_factor", http.retry.backoff_factor)?;
        non_negative("http.retry.max_backoff", http.retry.max_backoff)?;
        if let Some(status) = http.retry.status_forcelist.iter().find(|s| !(100..=599).contains(*s))
        {
            return Err(FoundationError::validation(
                "http.retry.status_forcelist",
                format!("{status} is not an HTTP status code"),
            ));
        }

        if http.pool.max_connections == 0 {
            return Err(FoundationError::validation("http.pool.max_connections", "must be at least 1"));
        }
        if http.pool.max_keepalive_connections > http.pool.max_connections {
            return Err(FoundationError::validation(
                "http.pool.max_keepalive_connections",
                "must not exceed max_connections",
            ));
        }
        non_negative("http.pool.keepalive_expiry", http.pool.keepalive_expiry)?;

        if http.user_agent.trim().is_empty() {
            return Err(FoundationError::validation("http.user_agent", "must not be empty"));
        }
        Ok(())
    }
}

// --- Default ---

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: TimeoutConfig::default(),
            retry: RetryConfig::default(),
            pool: PoolConfig::default(),
            follow_redirects: true,
            verify_tls: true,
            user_agent: concat!("bedrock/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { connect: 5.0, read: 30.0, write: 30.0, pool: 10.0 }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 0.5,
            max_backoff: 30.0,
            status_forcelist: vec![429, 500, 502, 503, 504],
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { max_connections: 100, max_keepalive_connections: 20, keepalive_expiry: 5.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_and_caps() {
        let retry = RetryConfig { backoff_factor: 1.0, max_backoff: 5.0, ..RetryConfig::default() };

        assert_eq!(retry.backoff(0), Duration::ZERO);
        assert_eq!(retry.backoff(1), Duration::from_secs(1));
        assert_eq!(retry.backoff(2), Duration::from_secs(2));
        assert_eq!(retry.backoff(3), Duration::from_secs(4));
        assert_eq!(retry.backoff(4), Duration::from_secs(5));
        assert_eq!(retry.backoff(u32::MAX), Duration::from_secs(5));
    }

    #[test]
    fn retry_limits_and_statuses() {
        let retry = RetryConfig::default();

        assert!(retry.should_retry(503));
        assert!(!retry.should_retry(404));
        assert!(retry.allows(3));
        assert!(!retry.allows(4));
    }

    #[test]
    fn durations_follow_seconds() {
        let timeout = TimeoutConfig { connect: 1.5, ..TimeoutConfig::default() };
        assert_eq!(timeout.connect_duration(), Duration::from_millis(1500));
        assert_eq!(timeout.read_duration(), Duration::from_secs(30));
    }

    #[test]
    fn oversized_durations_saturate() {
        let timeout = TimeoutConfig { read: 1e30, ..TimeoutConfig::default() };
        assert_eq!(timeout.read_duration(), Duration::MAX);

        let retry =
            RetryConfig { backoff_factor: 1e300, max_backoff: f64::MAX, ..RetryConfig::default() };
        assert_eq!(retry.backoff(2), Duration::MAX);

        let http = HttpClientConfig { timeout, ..HttpClientConfig::default() };
        assert!(TransportConfig { http }.validate().is_ok());
    }
}
