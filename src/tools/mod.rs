//! MCP tool implementations

pub mod dashboard;
pub mod instructions;
pub mod readings;
