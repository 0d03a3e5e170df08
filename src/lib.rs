//! Hangar: a registry of installed MCP servers and deployed cloud projects.
//!
//! Servers are installed as named *entries* carrying a JSON configuration.
//! Entries are deployed together as *groups* (cloud projects) with a merged
//! configuration and a derived endpoint. Removing an entry cascades into
//! every group that references it.
//!
//! # Architecture
//!
//! The registry follows hexagonal architecture principles:
//!
//! - **Domain**: entries, groups and the owned registry state
//! - **Ports**: the health probe capability
//! - **Adapters**: command-resolving and scripted health probes
//! - **Services**: the locked, clock-stamped operations callers use
//!
//! # Modules
//!
//! - [`registry`]: Entry and group registry core
//! - [`tools`]: Tool catalog and argument dispatch
//! - [`server`]: JSON-RPC 2.0 stdio server
//! - [`config`]: Layered runtime configuration

pub mod config;
pub mod registry;
pub mod server;
pub mod tools;
