//! Adapter implementations of the cascade port.

pub mod memory;
pub mod postgres;

pub use postgres::PostgresCascadeStore;
