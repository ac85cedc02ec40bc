//! Format adapters and the static dispatch table.
//!
//! Each adapter implements a two-way mapping between its platform dialect
//! and the canonical [`AgentModel`]. Conversion never fails on feature
//! loss; unsupported features surface as warning strings on the result.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::analyzer::PlatformCapabilities;
use crate::error::Result;
use crate::mapping::tools::tools_from_list;
use crate::model::{AgentMode, AgentModel, Frontmatter};
use crate::parser::frontmatter::RawFrontmatter;

pub mod claude;
pub mod cursor;
pub mod oac;
pub mod windsurf;

/// The four supported configuration dialects. OAC is the native format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Oac,
    Claude,
    Cursor,
    Windsurf,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Oac,
        Platform::Claude,
        Platform::Cursor,
        Platform::Windsurf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Oac => "oac",
            Platform::Claude => "claude",
            Platform::Cursor => "cursor",
            Platform::Windsurf => "windsurf",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oac" => Ok(Platform::Oac),
            "claude" => Ok(Platform::Claude),
            "cursor" => Ok(Platform::Cursor),
            "windsurf" => Ok(Platform::Windsurf),
            other => Err(format!(
                "unknown format '{other}' (expected oac, claude, cursor, or windsurf)"
            )),
        }
    }
}

/// One generated configuration file. Content is always UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub content: String,
}

/// Result of `from_canonical`: the output file set plus every degradation
/// warning collected along the way.
#[derive(Debug, Clone, Default)]
pub struct ConversionOutput {
    pub configs: Vec<OutputFile>,
    pub warnings: Vec<String>,
}

/// Two-way format mapping implemented per platform.
pub trait FormatAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    /// Parse platform-native source text into a fresh canonical model.
    fn to_canonical(&self, source: &str) -> Result<AgentModel>;

    /// Serialize a canonical model into platform-native output files.
    /// Never mutates the model; never fails solely due to feature loss.
    fn from_canonical(&self, model: &AgentModel) -> Result<ConversionOutput>;

    /// Pre-flight warnings (missing required fields), no I/O performed.
    fn validate_conversion(&self, model: &AgentModel) -> Vec<String>;

    fn capabilities(&self) -> &'static PlatformCapabilities;
}

static OAC_ADAPTER: oac::OacAdapter = oac::OacAdapter;
static CLAUDE_ADAPTER: claude::ClaudeAdapter = claude::ClaudeAdapter;
static CURSOR_ADAPTER: cursor::CursorAdapter = cursor::CursorAdapter;
static WINDSURF_ADAPTER: windsurf::WindsurfAdapter = windsurf::WindsurfAdapter;

/// Compile-time platform -> adapter table; no runtime registration.
pub fn adapter_for(platform: Platform) -> &'static dyn FormatAdapter {
    match platform {
        Platform::Oac => &OAC_ADAPTER,
        Platform::Claude => &CLAUDE_ADAPTER,
        Platform::Cursor => &CURSOR_ADAPTER,
        Platform::Windsurf => &WINDSURF_ADAPTER,
    }
}

// Warning-message builders shared by every adapter so phrasing stays
// uniform across platforms.

pub(crate) fn warn_unsupported(platform: Platform, feature: &str, detail: &str) -> String {
    if detail.is_empty() {
        format!("{platform} does not support {feature}; it will be dropped")
    } else {
        format!("{platform} does not support {feature}; {detail}")
    }
}

pub(crate) fn warn_degraded(platform: Platform, feature: &str, detail: &str) -> String {
    format!("{feature} degraded for {platform}: {detail}")
}

pub(crate) fn warn_missing_field(platform: Platform, field: &str, substituted: &str) -> String {
    if substituted.is_empty() {
        format!("missing required field '{field}' for {platform}")
    } else {
        format!("missing required field '{field}' for {platform}; using '{substituted}'")
    }
}

/// Strict-JSON helper: `Some(object)` only for a valid top-level JSON
/// object, `None` otherwise.
pub(crate) fn try_json_object(source: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(source) {
        Ok(Value::Object(map)) => Some(map),
        Ok(other) => {
            tracing::debug!("JSON source is not an object: {}", shape_of(&other));
            None
        }
        Err(e) => {
            tracing::debug!("JSON parse failed: {e}");
            None
        }
    }
}

pub(crate) fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract the frontmatter fields common to every markdown dialect.
pub(crate) fn base_frontmatter(raw: &RawFrontmatter) -> Result<Frontmatter> {
    let mode = match raw.text("mode") {
        None => AgentMode::Primary,
        Some(token) => match token.to_ascii_lowercase().as_str() {
            "primary" => AgentMode::Primary,
            "subagent" => AgentMode::Subagent,
            _ => {
                return Err(crate::error::ConvertError::FieldType {
                    key: "mode".to_string(),
                    expected: "'primary' or 'subagent'",
                });
            }
        },
    };
    let tools = raw
        .list("tools")
        .map(tools_from_list)
        .unwrap_or_default();
    Ok(Frontmatter {
        name: raw.text("name"),
        description: raw.text("description"),
        mode,
        model: raw.text("model"),
        temperature: raw.number("temperature")?,
        tools,
        permissions: Default::default(),
        skills: Vec::new(),
        hooks: Vec::new(),
        max_steps: raw.integer("max_steps")?,
    })
}
