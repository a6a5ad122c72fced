//! Record store handles shared by the user, task, and consistency adapters.
//!
//! Each backend is one explicit handle that owns both tables. Services get
//! the handle injected; nothing here is global.

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryStore, StoreFault};
pub use postgres::{PgPool, PostgresStore, StoreSetupError};
