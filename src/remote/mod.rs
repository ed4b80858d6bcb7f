//! Remote backend federation subsystem.
//!
//! # Data Flow
//! ```text
//! Caller, per query:
//!     backend.rs (one RemoteBackend per remote, availability advisory)
//!     → find.rs (dispatch every lookup, then collect each)
//!     → node.rs (PathNodes; fetch series per leaf or per batch)
//!     → codec.rs / http.rs (form-encoded POST, JSON response)
//! ```
//!
//! # Design Decisions
//! - Per-backend primitives only; merging results across backends is the
//!   caller's job
//! - A failed backend self-heals after a fixed delay, purely on elapsed
//!   wall-clock time

pub mod backend;
pub mod codec;
pub mod find;
pub mod node;
pub mod types;

mod http;

pub use backend::RemoteBackend;
pub use find::{FindOptions, FindRequest};
pub use node::{MetricNode, PathNode, SeriesBatch};
pub use types::{
    BatchOutcome, FederationError, FederationResult, FetchOutcome, FetchedSeries, Window,
};
