//! Remote backend identity and circuit-breaker state.
//!
//! # Responsibilities
//! - Identify one remote store (host plus URL path prefix)
//! - Track the most recent failure and gate availability on elapsed time
//! - Stay advisory: callers consult availability, nothing hard-gates on it

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::cache::FindCache;
use crate::config::FederationConfig;
use crate::remote::find::{FindOptions, FindRequest};

/// One remote storage backend.
///
/// Availability is a pure function of wall-clock time: any failure takes the
/// backend out of rotation for exactly `retry_delay`, after which it is
/// eligible again. No half-open probing, no success counting.
#[derive(Debug)]
pub struct RemoteBackend {
    host: String,
    prefix: String,
    retry_delay: Duration,
    find_timeout: Duration,
    fetch_timeout: Duration,
    /// Unix-millis of the most recent failure; zero means never failed.
    last_failure_ms: AtomicU64,
}

impl RemoteBackend {
    /// Build a backend from a `host[:port][/prefix]` address.
    pub fn new(
        address: &str,
        retry_delay: Duration,
        find_timeout: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        let (host, prefix) = split_address(address);
        Self {
            host: host.to_string(),
            prefix,
            retry_delay,
            find_timeout,
            fetch_timeout,
            last_failure_ms: AtomicU64::new(0),
        }
    }

    /// Build one backend per configured remote.
    pub fn from_config(config: &FederationConfig) -> Vec<Arc<Self>> {
        config
            .backends
            .iter()
            .map(|backend| {
                Arc::new(Self::new(
                    &backend.address,
                    config.breaker.retry_delay(),
                    config.timeouts.find(),
                    config.timeouts.fetch(),
                ))
            })
            .collect()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// URL path prefix, either empty or `/`-prefixed without a trailing `/`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn find_timeout(&self) -> Duration {
        self.find_timeout
    }

    pub(crate) fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// True once `retry_delay` has elapsed since the last recorded failure.
    pub fn is_available(&self) -> bool {
        let last = self.last_failure_ms.load(Ordering::Relaxed);
        now_millis().saturating_sub(last) > self.retry_delay.as_millis() as u64
    }

    /// Record a failure, tripping the breaker.
    ///
    /// Concurrent writers race benignly; the breaker only needs approximate
    /// recency, so last-writer-wins.
    pub fn mark_failed(&self) {
        self.last_failure_ms.store(now_millis(), Ordering::Relaxed);
    }

    /// Create a lookup against this backend and dispatch it immediately.
    pub fn find(
        self: &Arc<Self>,
        query: &str,
        cache: &FindCache,
        options: FindOptions,
    ) -> FindRequest {
        let mut request = FindRequest::new(Arc::clone(self), query, cache.clone(), options);
        request.dispatch();
        request
    }
}

/// Split `host[:port][/prefix]` into host and normalized prefix.
fn split_address(address: &str) -> (&str, String) {
    match address.split_once('/') {
        Some((host, rest)) => {
            let trimmed = rest.trim_matches('/');
            if trimmed.is_empty() {
                (host, String::new())
            } else {
                (host, format!("/{trimmed}"))
            }
        }
        None => (address, String::new()),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
