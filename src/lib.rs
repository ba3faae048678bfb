//! Toolrouter: stack and credential management for a hosted tool catalog.
//!
//! This crate assembles "stacks" of remote tool servers, tracks which
//! credential fields each attached server still needs, and gates tool
//! invocation on that readiness signal.
//!
//! # Architecture
//!
//! Toolrouter follows hexagonal architecture principles:
//!
//! - **Domain**: Validated records and pure readiness logic
//! - **Ports**: The [`stack::ports::RemoteCatalog`] contract the core calls out to
//! - **Adapters**: An in-memory catalog for tests and local flows
//!
//! Transport, authentication headers, and retries belong to whichever
//! `RemoteCatalog` implementation the caller supplies.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use toolrouter::config::StackManagerConfig;
//! use toolrouter::stack::{
//!     adapters::InMemoryRemoteCatalog,
//!     services::{CreateStackRequest, StackManager},
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = StackManager::new(
//!     Arc::new(InMemoryRemoteCatalog::new()),
//!     StackManagerConfig::default(),
//! );
//! let stack = manager.create_stack(CreateStackRequest::new("demo")).await?;
//! assert!(stack.servers().is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Manager configuration
//! - [`stack`]: Stacks, attachments, and credential readiness

pub mod config;
pub mod stack;
