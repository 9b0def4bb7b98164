//! Workspace-level integration tests for the VFX MCP servers.
//!
//! These tests verify:
//! - The editor server starts with the expected capabilities and tool table
//! - Every registered tool advertises a usable input schema
//! - Invalid parameters are rejected before the engine runs
//! - Successful tool results are well-formed MCP content

pub mod server_startup;
pub mod tool_schema;
pub mod input_validation;
pub mod output_format;

#[cfg(test)]
pub(crate) mod stub_engine;
