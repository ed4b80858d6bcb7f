//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts and TTLs nonzero)
//! - Detect duplicate backend addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: FederationConfig → Result<(), Vec<_>>

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::FederationConfig;

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &FederationConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.backends.is_empty() {
        errors.push(ValidationError::new("no backends configured"));
    }

    let mut seen = HashSet::new();
    for backend in &config.backends {
        let address = backend.address.trim();
        if address.is_empty() || address.starts_with('/') {
            errors.push(ValidationError::new(format!(
                "invalid backend address {:?}: missing host",
                backend.address
            )));
        }
        if !seen.insert(address) {
            errors.push(ValidationError::new(format!(
                "duplicate backend address {:?}",
                backend.address
            )));
        }
    }

    if config.timeouts.find_secs == 0 {
        errors.push(ValidationError::new("timeouts.find_secs must be nonzero"));
    }
    if config.timeouts.fetch_secs == 0 {
        errors.push(ValidationError::new("timeouts.fetch_secs must be nonzero"));
    }
    if config.cache.find_ttl_secs == 0 {
        errors.push(ValidationError::new("cache.find_ttl_secs must be nonzero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
