//! User directory: registration, profile maintenance, and listing.
//!
//! Users own zero or more tracked tasks. Removal of a user cascades to its
//! tasks and is coordinated by [`crate::consistency`], not by this module.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
