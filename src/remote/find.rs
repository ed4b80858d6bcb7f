//! Two-phase metric-path lookup against one backend.
//!
//! # Data Flow
//! ```text
//! dispatch()
//!     → cache hit: resolved immediately, no network
//!     → cache miss: spawn request task (connect → POST /metrics/find/)
//! collect()
//!     → join task, decode records into PathNodes
//!     → failure: breaker already tripped; suppress to [] or propagate
//!     → store final list in cache, memoize on the request
//! ```
//!
//! # Design Decisions
//! - Dispatch spawns a task so a caller can start lookups against every
//!   backend before blocking on any of them
//! - A cached empty list counts as a miss, so suppressed failures never pin
//!   a dead lookup for a full TTL

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::cache::{find_cache_key, FindCache};
use crate::config::FederationConfig;
use crate::remote::backend::RemoteBackend;
use crate::remote::codec::{self, FindRecord};
use crate::remote::http;
use crate::remote::node::PathNode;
use crate::remote::types::{FederationError, FederationResult};

/// Per-lookup options, lifted from static configuration.
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Ask the backend for leaf paths only.
    pub leaves_only: bool,
    /// Ask the backend to delete the paths it reports.
    pub delete_found: bool,
    /// Degrade failures to empty result sets instead of propagating them.
    pub suppress_errors: bool,
    /// How long resolved node lists stay cached.
    pub cache_ttl: Duration,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            leaves_only: false,
            delete_found: false,
            suppress_errors: true,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl FindOptions {
    pub fn from_config(config: &FederationConfig) -> Self {
        Self {
            suppress_errors: config.suppress_errors,
            cache_ttl: config.cache.find_ttl(),
            ..Self::default()
        }
    }

    pub fn leaves_only(mut self, value: bool) -> Self {
        self.leaves_only = value;
        self
    }

    pub fn delete_found(mut self, value: bool) -> Self {
        self.delete_found = value;
        self
    }
}

/// A metric-path lookup with decoupled dispatch and collection.
///
/// One request per query per backend. `dispatch` starts the exchange on its
/// own task; `collect` joins it and resolves the final node list, after
/// which the request is disposable.
pub struct FindRequest {
    backend: Arc<RemoteBackend>,
    query: String,
    options: FindOptions,
    cache: FindCache,
    cache_key: String,
    cached: Option<Vec<PathNode>>,
    pending: Option<JoinHandle<FederationResult<Vec<FindRecord>>>>,
}

impl FindRequest {
    pub fn new(
        backend: Arc<RemoteBackend>,
        query: &str,
        cache: FindCache,
        options: FindOptions,
    ) -> Self {
        let cache_key = find_cache_key(backend.host(), query);
        Self {
            backend,
            query: query.to_string(),
            options,
            cache,
            cache_key,
            cached: None,
            pending: None,
        }
    }

    pub fn backend(&self) -> &Arc<RemoteBackend> {
        &self.backend
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Start the lookup without waiting for its response.
    ///
    /// A live, non-empty cache entry resolves the request immediately with
    /// no network access. On a miss the request task owns the whole
    /// exchange; a failure anywhere in it trips the backend's breaker before
    /// the error reaches `collect`.
    pub fn dispatch(&mut self) {
        if self.cached.is_some() || self.pending.is_some() {
            return;
        }
        if let Some(hit) = self.cache.get(&self.cache_key) {
            if !hit.is_empty() {
                tracing::trace!(query = %self.query, host = self.backend.host(), "find cache hit");
                self.cached = Some(hit);
                return;
            }
        }

        let backend = Arc::clone(&self.backend);
        let body =
            codec::find_params(&self.query, self.options.leaves_only, self.options.delete_found);
        self.pending = Some(tokio::spawn(async move {
            let path = format!("{}/metrics/find/", backend.prefix());
            let result = http::post_form(backend.host(), &path, body, backend.find_timeout())
                .await
                .and_then(|bytes| codec::decode_find(&bytes));
            if let Err(err) = &result {
                backend.mark_failed();
                tracing::warn!(host = backend.host(), error = %err, "find request failed");
            }
            result
        }));
    }

    /// Resolve the lookup, dispatching first if nobody has.
    ///
    /// With `suppress_errors` a failure degrades to an empty result set so
    /// one dead backend does not fail the whole federated query; without it
    /// the error propagates. Either way the final list is cached and the
    /// request resolves to it.
    pub async fn collect(&mut self) -> FederationResult<Vec<PathNode>> {
        if let Some(nodes) = &self.cached {
            return Ok(nodes.clone());
        }
        if self.pending.is_none() {
            self.dispatch();
            if let Some(nodes) = &self.cached {
                return Ok(nodes.clone());
            }
        }

        let outcome = match self.pending.take() {
            Some(handle) => handle
                .await
                .unwrap_or_else(|err| Err(FederationError::Canceled(err.to_string()))),
            None => Ok(Vec::new()),
        };

        let records = match outcome {
            Ok(records) => records,
            Err(err) if self.options.suppress_errors => {
                tracing::debug!(query = %self.query, error = %err, "suppressing failed lookup");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        let nodes: Vec<PathNode> = records
            .into_iter()
            .map(|record| {
                PathNode::new(Arc::clone(&self.backend), record.metric_path, record.is_leaf)
            })
            .collect();
        self.cache
            .set(self.cache_key.clone(), nodes.clone(), self.options.cache_ttl);
        self.cached = Some(nodes.clone());
        Ok(nodes)
    }
}
