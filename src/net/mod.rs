//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound request to a backend
//!     → connector.rs (resolve all addresses, bounded connect attempts)
//!     → Hand off to the HTTP exchange layer
//! ```
//!
//! # Design Decisions
//! - Every connect attempt is individually bounded, so one black-holed
//!   address cannot stall the remaining candidates of a multi-address host

pub mod connector;
