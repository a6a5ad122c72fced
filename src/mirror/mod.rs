//! Non-authoritative mirror of store mutations.
//!
//! Every insert, update, and delete that reaches the record store is also
//! appended to a structured event log. The log is best-effort: a failed
//! append is logged and dropped, and never undoes the store mutation. On
//! startup an empty store can be seeded by replaying the log.

pub mod adapters;
mod event;
mod port;
mod publisher;
pub mod replay;

pub use event::{MirrorEntity, MirrorEvent, MirrorOperation};
pub use port::{MirrorError, MirrorLog, MirrorResult};
pub use publisher::MirrorPublisher;

#[cfg(test)]
pub use port::MockMirrorLog;
