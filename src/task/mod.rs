//! Time-tracked tasks: starting, stopping, and reporting.
//!
//! A task is created running and transitions exactly once to stopped, at
//! which point its tracked hours and minutes are fixed. Each user has at
//! most one running task at a time.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
