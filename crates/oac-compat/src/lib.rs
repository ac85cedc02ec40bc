//! Compatibility layer for agent definition files.
//!
//! Converts agent configurations between the native OAC markdown format
//! and the Claude Code, Cursor, and Windsurf dialects through a shared
//! canonical model. Conversions degrade gracefully: features a target
//! cannot express become warnings, never silent drops.

pub mod adapter;
pub mod analyzer;
pub mod commands;
pub mod config;
pub mod error;
pub mod mapping;
pub mod merge;
pub mod model;
pub mod parser;

pub use adapter::{FormatAdapter, Platform, adapter_for};
pub use analyzer::{CompatibilityReport, analyze, capabilities_for};
pub use error::{ConvertError, Result};
pub use model::AgentModel;
