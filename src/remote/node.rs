//! Resolved metric paths and time-series retrieval.
//!
//! # Responsibilities
//! - Represent one resolved path (leaf or branch) on one backend
//! - Fetch series data for a single leaf, or for a batch of leaves sharing
//!   a backend, in one round trip
//!
//! # Design Decisions
//! - Single and batched fetches are distinct types with distinct return
//!   shapes, never a value whose type changes its behavior
//! - Series data is always fetched live, never cached

use std::sync::Arc;

use crate::remote::backend::RemoteBackend;
use crate::remote::codec::{self, SeriesRecord};
use crate::remote::http;
use crate::remote::types::{
    BatchOutcome, FederationError, FederationResult, FetchOutcome, FetchedSeries, Window,
};

/// Common surface of metric tree nodes. The wider system also serves nodes
/// from local storage behind this seam; everything in this crate is remote.
pub trait MetricNode {
    /// Display name: the last dot-separated component of the path.
    fn name(&self) -> &str;
    fn is_leaf(&self) -> bool;
    /// Whether the node is served from local storage.
    fn is_local(&self) -> bool;
}

/// A concrete metric path resolved on one backend.
#[derive(Debug, Clone)]
pub struct PathNode {
    backend: Arc<RemoteBackend>,
    metric_path: String,
    name: String,
    is_leaf: bool,
}

impl PathNode {
    pub fn new(backend: Arc<RemoteBackend>, metric_path: String, is_leaf: bool) -> Self {
        let name = display_name(&metric_path);
        Self {
            backend,
            metric_path,
            name,
            is_leaf,
        }
    }

    pub fn backend(&self) -> &Arc<RemoteBackend> {
        &self.backend
    }

    pub fn metric_path(&self) -> &str {
        &self.metric_path
    }

    /// Fetch this node's series over `[start, end)`.
    ///
    /// A branch short-circuits with `NotFetchable` before any network
    /// access; a leaf whose backend answers with an empty list yields the
    /// distinct `NoData`. Failures always surface: a caller that asked for
    /// concrete data needs to know it did not arrive.
    pub async fn fetch(
        &self,
        start: i64,
        end: i64,
        now: Option<i64>,
    ) -> FederationResult<FetchOutcome> {
        if !self.is_leaf {
            return Ok(FetchOutcome::NotFetchable);
        }

        let targets = std::slice::from_ref(&self.metric_path);
        let mut series = render(&self.backend, targets, start, end, now).await?;
        if series.is_empty() {
            return Ok(FetchOutcome::NoData);
        }
        if series.len() != 1 {
            return Err(FederationError::SeriesCountMismatch {
                requested: 1,
                returned: series.len(),
            });
        }
        let (_, fetched) = into_series(series.remove(0));
        Ok(FetchOutcome::Data(fetched))
    }
}

impl MetricNode for PathNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    fn is_local(&self) -> bool {
        false
    }
}

/// Several leaf paths on one backend, fetched together in one round trip.
#[derive(Debug, Clone)]
pub struct SeriesBatch {
    backend: Arc<RemoteBackend>,
    metric_paths: Vec<String>,
    name: String,
}

impl SeriesBatch {
    /// Batch explicit paths. Returns `None` for an empty list.
    pub fn new(backend: Arc<RemoteBackend>, metric_paths: Vec<String>) -> Option<Self> {
        let name = display_name(metric_paths.first()?);
        Some(Self {
            backend,
            metric_paths,
            name,
        })
    }

    /// Batch the leaf nodes among `nodes` that live on `backend`. Branches
    /// and nodes from other backends are skipped.
    pub fn from_nodes<'a>(
        backend: &Arc<RemoteBackend>,
        nodes: impl IntoIterator<Item = &'a PathNode>,
    ) -> Option<Self> {
        let paths: Vec<String> = nodes
            .into_iter()
            .filter(|node| node.is_leaf() && Arc::ptr_eq(node.backend(), backend))
            .map(|node| node.metric_path.clone())
            .collect();
        Self::new(Arc::clone(backend), paths)
    }

    /// Display name of the batch: derived from its first path.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metric_paths(&self) -> &[String] {
        &self.metric_paths
    }

    pub fn len(&self) -> usize {
        self.metric_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metric_paths.is_empty()
    }

    /// Fetch every path in one request.
    ///
    /// The backend must answer with exactly one series per requested target,
    /// in request order. Any other count means the request and response no
    /// longer line up, and silently returning misaligned series would
    /// corrupt downstream merges, so it fails no matter what the suppress
    /// flag says.
    pub async fn fetch(
        &self,
        start: i64,
        end: i64,
        now: Option<i64>,
    ) -> FederationResult<BatchOutcome> {
        let series = render(&self.backend, &self.metric_paths, start, end, now).await?;
        if series.is_empty() {
            return Ok(BatchOutcome::NoData);
        }
        if series.len() != self.metric_paths.len() {
            return Err(FederationError::SeriesCountMismatch {
                requested: self.metric_paths.len(),
                returned: series.len(),
            });
        }
        Ok(BatchOutcome::Data(
            series.into_iter().map(into_series).collect(),
        ))
    }
}

/// One blocking render round trip. Transport, status, and decode failures
/// trip the backend's breaker; a later count mismatch does not, since the
/// backend did answer.
async fn render(
    backend: &Arc<RemoteBackend>,
    targets: &[String],
    start: i64,
    end: i64,
    now: Option<i64>,
) -> FederationResult<Vec<SeriesRecord>> {
    let body = codec::render_params(targets, start, end, now);
    let path = format!("{}/render/", backend.prefix());
    let result = http::post_form(backend.host(), &path, body, backend.fetch_timeout())
        .await
        .and_then(|bytes| codec::decode_series(&bytes));
    if let Err(err) = &result {
        backend.mark_failed();
        tracing::warn!(host = backend.host(), error = %err, "render request failed");
    }
    result
}

fn into_series(record: SeriesRecord) -> (String, FetchedSeries) {
    (
        record.name,
        FetchedSeries {
            window: Window {
                start: record.start,
                end: record.end,
                step: record.step,
            },
            values: record.values,
        },
    )
}

fn display_name(metric_path: &str) -> String {
    metric_path
        .rsplit('.')
        .next()
        .unwrap_or(metric_path)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_backend() -> Arc<RemoteBackend> {
        Arc::new(RemoteBackend::new(
            "a.example.com/graphite",
            Duration::from_secs(60),
            Duration::from_secs(1),
            Duration::from_secs(1),
        ))
    }

    #[test]
    fn test_display_name_is_last_component() {
        let node = PathNode::new(test_backend(), "stats.web.cpu".into(), true);
        assert_eq!(node.name(), "cpu");

        let node = PathNode::new(test_backend(), "cpu".into(), true);
        assert_eq!(node.name(), "cpu");
    }

    #[test]
    fn test_nodes_are_never_local() {
        let node = PathNode::new(test_backend(), "stats.cpu".into(), false);
        assert!(!node.is_local());
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_batch_rejects_empty_and_names_from_first_path() {
        assert!(SeriesBatch::new(test_backend(), Vec::new()).is_none());

        let batch = SeriesBatch::new(
            test_backend(),
            vec!["stats.cpu".into(), "stats.mem".into()],
        )
        .unwrap();
        assert_eq!(batch.name(), "cpu");
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_batch_from_nodes_keeps_only_leaves_on_backend() {
        let backend = test_backend();
        let other = test_backend();
        let nodes = vec![
            PathNode::new(Arc::clone(&backend), "stats.cpu".into(), true),
            PathNode::new(Arc::clone(&backend), "stats".into(), false),
            PathNode::new(Arc::clone(&other), "stats.mem".into(), true),
        ];

        let batch = SeriesBatch::from_nodes(&backend, &nodes).unwrap();
        assert_eq!(batch.metric_paths(), ["stats.cpu".to_string()]);

        let branches = vec![PathNode::new(Arc::clone(&backend), "stats".into(), false)];
        assert!(SeriesBatch::from_nodes(&backend, &branches).is_none());
    }
}
