//! Query federation client for a distributed time-series store.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │              FEDERATION CLIENT                │
//!                    │                                               │
//!   find "stats.*"   │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!   ─────────────────┼─▶│ remote  │──▶│  cache   │   │    net    │  │
//!                    │  │ find    │   │ (TTL)    │   │ connector │  │
//!                    │  └────┬────┘   └──────────┘   └─────┬─────┘  │
//!                    │       │ dispatch × N backends       │        │
//!                    │       ▼                             ▼        │
//!                    │  ┌─────────┐                 ┌───────────┐   │     Remote
//!   PathNodes        │  │ remote  │────────────────▶│  remote   │◀──┼──── storage
//!   ◀────────────────┼──│ node    │   POST /render/ │  backend  │   │     backends
//!                    │  └─────────┘                 └───────────┘   │
//!                    │                                              │
//!                    │  ┌────────────────────────────────────────┐  │
//!                    │  │          Cross-Cutting Concerns         │  │
//!                    │  │   config (TOML)     circuit breaker     │  │
//!                    │  │   tracing logs      error taxonomy      │  │
//!                    │  └────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! The crate exposes per-backend primitives: one [`RemoteBackend`] per known
//! remote, a two-phase [`FindRequest`] per query per backend, and
//! [`PathNode`]/[`SeriesBatch`] for fetching series data. Callers fan out by
//! dispatching every lookup before collecting any; combining results across
//! backends into a global view is left to them.

pub mod cache;
pub mod config;
pub mod net;
pub mod remote;

pub use cache::{FindCache, TtlCache};
pub use config::FederationConfig;
pub use remote::{
    BatchOutcome, FederationError, FederationResult, FetchOutcome, FetchedSeries, FindOptions,
    FindRequest, MetricNode, PathNode, RemoteBackend, SeriesBatch, Window,
};
