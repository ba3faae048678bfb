//! Credential-gated stack assembly for a hosted tool catalog.
//!
//! A stack is a named collection of catalog servers. Each attachment of a
//! server to a stack carries a tool selection and credential values, and
//! tools only become callable once the server's required credentials are
//! present. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
