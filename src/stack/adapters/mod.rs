//! Adapter implementations for the stack workflow ports.
//!
//! Only an in-memory catalog ships with the crate; network-backed catalogs
//! implement [`crate::stack::ports::RemoteCatalog`] outside it.

pub mod memory;

pub use memory::{InMemoryRemoteCatalog, ToolInvocation};
