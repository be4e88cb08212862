use std::{env, time::Duration};

use teamsync_core::cache::CachePolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL for high-churn collections in seconds (default: 30)
    pub cache_ttl_high_churn_seconds: u64,
    /// Cache TTL for other collections in seconds (default: 120)
    pub cache_ttl_standard_seconds: u64,
    /// Throttle cooldown for high-churn collections in seconds (default: 15)
    pub cooldown_high_churn_seconds: u64,
    /// Throttle cooldown for other collections in seconds (default: 20)
    pub cooldown_standard_seconds: u64,
    /// Base delay for read retry backoff in seconds (default: 5)
    pub retry_base_delay_seconds: u64,
    /// Maximum number of cached query results (default: 10,000)
    pub cache_max_entries: usize,
    /// Invitation lifetime in days (default: 7)
    pub invitation_lifetime_days: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_HIGH_CHURN_SECONDS` - High-churn cache TTL (default: 30)
    /// - `CACHE_TTL_STANDARD_SECONDS` - Standard cache TTL (default: 120)
    /// - `COOLDOWN_HIGH_CHURN_SECONDS` - High-churn throttle cooldown (default: 15)
    /// - `COOLDOWN_STANDARD_SECONDS` - Standard throttle cooldown (default: 20)
    /// - `RETRY_BASE_DELAY_SECONDS` - Read retry backoff base (default: 5)
    /// - `CACHE_MAX_ENTRIES` - Maximum cached query results (default: 10,000)
    /// - `INVITATION_LIFETIME_DAYS` - Invitation lifetime (default: 7)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_high_churn_seconds: parse_env("CACHE_TTL_HIGH_CHURN_SECONDS", 30),
            cache_ttl_standard_seconds: parse_env("CACHE_TTL_STANDARD_SECONDS", 120),
            cooldown_high_churn_seconds: parse_env("COOLDOWN_HIGH_CHURN_SECONDS", 15),
            cooldown_standard_seconds: parse_env("COOLDOWN_STANDARD_SECONDS", 20),
            retry_base_delay_seconds: parse_env("RETRY_BASE_DELAY_SECONDS", 5),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES", 10_000),
            invitation_lifetime_days: parse_env("INVITATION_LIFETIME_DAYS", 7),
        }
    }

    /// Builds the cache policy from the configured windows.
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            high_churn_ttl: Duration::from_secs(self.cache_ttl_high_churn_seconds),
            standard_ttl: Duration::from_secs(self.cache_ttl_standard_seconds),
            high_churn_cooldown: Duration::from_secs(self.cooldown_high_churn_seconds),
            standard_cooldown: Duration::from_secs(self.cooldown_standard_seconds),
            retry_base_delay: Duration::from_secs(self.retry_base_delay_seconds),
            ..CachePolicy::default()
        }
    }

    /// Get the invitation lifetime as a chrono Duration.
    pub fn invitation_lifetime(&self) -> chrono::Duration {
        chrono::Duration::days(self.invitation_lifetime_days)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
