//! Registry of installed MCP servers and the cloud projects deployed from them.
//!
//! The registry keeps two insertion-ordered collections behind a single owned
//! state object: *entries* (installed servers with their configuration and
//! status) and *groups* (deployed projects referencing entries by name).
//! Removing an entry cascades into every group that references it.
//!
//! - Domain types and the owned registry state in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
