//! Shared types and error definitions for remote operations.

use std::time::Duration;

use hyper::StatusCode;
use thiserror::Error;

/// Errors that can occur while talking to a remote backend.
///
/// Transport, status, and decode failures are ordinary unavailability and
/// may be suppressed for lookups; a series-count mismatch is protocol
/// corruption and never is.
#[derive(Debug, Error)]
pub enum FederationError {
    /// Every resolved address for the backend failed to connect.
    #[error("connect to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// The request or response exchange failed mid-flight.
    #[error("transport error: {0}")]
    Transport(#[from] hyper::Error),

    /// The exchange did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] hyper::http::Error),

    /// The backend answered with a non-200 status.
    #[error("backend returned status {0}")]
    Status(StatusCode),

    /// The response body could not be decoded.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A render response did not contain one series per requested target.
    #[error("series count mismatch: requested {requested}, backend returned {returned}")]
    SeriesCountMismatch { requested: usize, returned: usize },

    /// A dispatched request task went away before producing a result.
    #[error("request task aborted: {0}")]
    Canceled(String),
}

/// Result type for remote operations.
pub type FederationResult<T> = Result<T, FederationError>;

/// The time window a fetched series covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

/// One fetched series: its window plus one value slot per step, `None`
/// marking an absent datapoint.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedSeries {
    pub window: Window,
    pub values: Vec<Option<f64>>,
}

/// Outcome of fetching a single path.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Branch node: there is nothing to fetch and no network call was made.
    NotFetchable,
    /// The backend answered, but with an empty series list.
    NoData,
    /// The series for the requested path.
    Data(FetchedSeries),
}

/// Outcome of fetching a batch of paths.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The backend answered, but with an empty series list.
    NoData,
    /// One `(name, series)` pair per requested path, in request order.
    Data(Vec<(String, FetchedSeries)>),
}
