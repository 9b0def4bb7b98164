//! VFX MCP Common Library
//!
//! Configuration, error handling, tracing and transport plumbing shared by
//! the VFX MCP server crates.

pub mod config;
pub mod error;
pub mod server;
pub mod tracing;
pub mod transport;

#[cfg(test)]
mod transport_test;

pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
