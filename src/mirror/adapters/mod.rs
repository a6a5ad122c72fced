//! Adapter implementations of the mirror log port.

mod disabled;
mod jsonl;
mod memory;

pub use disabled::DisabledMirrorLog;
pub use jsonl::JsonlMirrorLog;
pub use memory::InMemoryMirrorLog;
