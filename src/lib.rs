//! Telemed Vitals Library
//!
//! Vitals time-series aggregation for the patient health dashboard, plus the
//! local readings store, backend client and MCP surface around it.

pub mod analytics;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
