//! Tasktrack: a time-tracking backend.
//!
//! Users register with a passport and personal details, start and stop
//! named tasks, and ask how much time each task took. Every mutation is
//! also appended to a best-effort mirror log that can seed an empty store.
//!
//! # Architecture
//!
//! Feature modules follow hexagonal architecture principles:
//!
//! - **Domain**: value types and invariants with no infrastructure dependencies
//! - **Ports**: async trait interfaces for persistence and the mirror log
//! - **Adapters**: in-memory and `PostgreSQL` implementations of the ports
//! - **Services**: orchestration that validates, persists, and mirrors
//!
//! # Modules
//!
//! - [`user`]: user directory (create, update, list)
//! - [`task`]: task start, stop, and time reporting
//! - [`consistency`]: atomic removal of a user with its tasks
//! - [`mirror`]: structured mutation log and startup replay
//! - [`store`]: shared record store handles
//! - [`api`]: JSON HTTP surface

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod consistency;
pub mod mirror;
pub mod store;
pub mod task;
pub mod telemetry;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;
