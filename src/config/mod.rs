//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FederationConfig (validated, immutable)
//!     → static input to backends, lookups, and fetches
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the core treats it as a static input
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::BackendConfig;
pub use schema::FederationConfig;
