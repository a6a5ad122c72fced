//! Cascading user removal.
//!
//! Deleting a user removes the user's tasks and then the user row inside
//! one store transaction. Either both steps commit or neither does. Only
//! after the commit are the removals mirrored, and a mirror failure does not
//! bring the rows back.

pub mod adapters;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
