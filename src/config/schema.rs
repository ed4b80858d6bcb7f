//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! federation client. All types derive Serde traits for deserialization
//! from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the federation client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FederationConfig {
    /// Remote backend definitions.
    pub backends: Vec<BackendConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Find-result cache settings.
    pub cache: CacheConfig,

    /// Circuit-breaker settings.
    pub breaker: BreakerConfig,

    /// Degrade failed lookups to empty result sets instead of failing the
    /// whole federated query.
    pub suppress_errors: bool,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            timeouts: TimeoutConfig::default(),
            cache: CacheConfig::default(),
            breaker: BreakerConfig::default(),
            suppress_errors: true,
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Remote backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Backend address: `host[:port][/prefix]`, e.g.
    /// `"a.example.com:8080/graphite"`.
    pub address: String,
}

/// Timeout configuration for the two remote operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connect/request timeout for find calls, in seconds.
    pub find_secs: u64,

    /// Connect/request timeout for series fetches, in seconds.
    pub fetch_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            find_secs: 5,
            fetch_secs: 10,
        }
    }
}

impl TimeoutConfig {
    pub fn find(&self) -> Duration {
        Duration::from_secs(self.find_secs)
    }

    pub fn fetch(&self) -> Duration {
        Duration::from_secs(self.fetch_secs)
    }
}

/// Find-result cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a resolved node list stays cached.
    pub find_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { find_ttl_secs: 300 }
    }
}

impl CacheConfig {
    pub fn find_ttl(&self) -> Duration {
        Duration::from_secs(self.find_ttl_secs)
    }
}

/// Circuit-breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Seconds a failed backend stays out of rotation before it is eligible
    /// again.
    pub retry_delay_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            retry_delay_secs: 60,
        }
    }
}

impl BreakerConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FederationConfig::default();
        assert!(config.backends.is_empty());
        assert!(config.suppress_errors);
        assert_eq!(config.timeouts.find(), Duration::from_secs(5));
        assert_eq!(config.timeouts.fetch(), Duration::from_secs(10));
        assert_eq!(config.cache.find_ttl(), Duration::from_secs(300));
        assert_eq!(config.breaker.retry_delay(), Duration::from_secs(60));
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: FederationConfig = toml::from_str(
            r#"
            [[backends]]
            address = "a.example.com/graphite"
            "#,
        )
        .unwrap();
        assert_eq!(config.backends.len(), 1);
        assert_eq!(config.backends[0].address, "a.example.com/graphite");
        assert_eq!(config.timeouts.find_secs, 5);
        assert!(config.suppress_errors);
    }

    #[test]
    fn test_full_toml_overrides() {
        let config: FederationConfig = toml::from_str(
            r#"
            suppress_errors = false

            [[backends]]
            address = "a.example.com"

            [[backends]]
            address = "b.example.com:8080/metrics"

            [timeouts]
            find_secs = 2
            fetch_secs = 4

            [cache]
            find_ttl_secs = 30

            [breaker]
            retry_delay_secs = 15

            [observability]
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert!(!config.suppress_errors);
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.timeouts.fetch_secs, 4);
        assert_eq!(config.cache.find_ttl_secs, 30);
        assert_eq!(config.breaker.retry_delay_secs, 15);
        assert_eq!(config.observability.log_level, "debug");
    }
}
