use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Canonical in-memory representation of an agent definition.
///
/// Every adapter's `to_canonical` builds a fresh `AgentModel` from a single
/// source document; `from_canonical` reads it immutably and produces a new
/// output file set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentModel {
    pub frontmatter: Frontmatter,
    /// Display-only classification; carried through but never affects
    /// conversion semantics.
    pub metadata: Metadata,
    pub system_prompt: String,
    /// Attached reference material, order preserved, never deduplicated.
    pub contexts: Vec<ContextRef>,
}

/// Structured agent metadata. Each field is explicitly typed; absence means
/// "use the platform default".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    pub name: Option<String>,
    pub description: Option<String>,
    pub mode: AgentMode,
    /// Free-form model identifier in canonical (OAC) vocabulary.
    pub model: Option<String>,
    pub temperature: Option<f64>,
    /// Tool name -> enabled flag. No tri-state at this level.
    pub tools: BTreeMap<String, bool>,
    /// Tool or path-pattern -> permission rule.
    pub permissions: BTreeMap<String, PermissionRule>,
    pub skills: Vec<SkillRef>,
    pub hooks: Vec<HookDef>,
    pub max_steps: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    #[default]
    Primary,
    Subagent,
}

impl AgentMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentMode::Primary => "primary",
            AgentMode::Subagent => "subagent",
        }
    }
}

/// A single allow/deny/ask decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionScalar {
    Allow,
    Deny,
    Ask,
}

impl PermissionScalar {
    /// Parse a permission token. Booleans collapse to allow/deny.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "allow" | "true" => Some(PermissionScalar::Allow),
            "deny" | "false" => Some(PermissionScalar::Deny),
            "ask" => Some(PermissionScalar::Ask),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PermissionScalar::Allow => "allow",
            PermissionScalar::Deny => "deny",
            PermissionScalar::Ask => "ask",
        }
    }
}

/// Either a flat rule for an entire tool, or a nested per-path-pattern rule
/// set ("granular"). Callers dispatch by pattern matching instead of
/// shape-sniffing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionRule {
    Scalar(PermissionScalar),
    PerPath(BTreeMap<String, PermissionScalar>),
}

impl PermissionRule {
    pub fn is_granular(&self) -> bool {
        matches!(self, PermissionRule::PerPath(_))
    }
}

/// Reference to a skill by name. The name seeds directory names on output,
/// so consumers must slugify it first (see [`crate::model::skill_seed`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRef {
    pub name: String,
}

impl SkillRef {
    pub fn new(name: impl Into<String>) -> Self {
        SkillRef { name: name.into() }
    }
}

/// An event-triggered shell hook. Matchers and commands keep input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookDef {
    pub event: String,
    #[serde(default)]
    pub matchers: Vec<String>,
    #[serde(default)]
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextPriority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl ContextPriority {
    /// Lenient parse used by every adapter; unrecognized tokens normalize
    /// to `medium`.
    pub fn parse_or_medium(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "critical" => ContextPriority::Critical,
            "high" => ContextPriority::High,
            "low" => ContextPriority::Low,
            _ => ContextPriority::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContextPriority::Critical => "critical",
            ContextPriority::High => "high",
            ContextPriority::Medium => "medium",
            ContextPriority::Low => "low",
        }
    }
}

/// Attached reference material.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRef {
    pub path: String,
    pub priority: ContextPriority,
    pub description: Option<String>,
}

/// Display-only classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub category: Option<String>,
    pub agent_type: Option<String>,
}

impl AgentModel {
    pub fn has_granular_permissions(&self) -> bool {
        self.frontmatter
            .permissions
            .values()
            .any(PermissionRule::is_granular)
    }

    /// Best-effort display name with a per-platform fallback.
    pub fn name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.frontmatter.name.as_deref().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_scalar_accepts_booleans() {
        assert_eq!(PermissionScalar::parse("true"), Some(PermissionScalar::Allow));
        assert_eq!(PermissionScalar::parse("false"), Some(PermissionScalar::Deny));
        assert_eq!(PermissionScalar::parse("Ask"), Some(PermissionScalar::Ask));
        assert_eq!(PermissionScalar::parse("maybe"), None);
    }

    #[test]
    fn granular_detection() {
        let mut model = AgentModel::default();
        model.frontmatter.permissions.insert(
            "read".into(),
            PermissionRule::Scalar(PermissionScalar::Allow),
        );
        assert!(!model.has_granular_permissions());
        let mut per_path = BTreeMap::new();
        per_path.insert("src/**".to_string(), PermissionScalar::Deny);
        model
            .frontmatter
            .permissions
            .insert("write".into(), PermissionRule::PerPath(per_path));
        assert!(model.has_granular_permissions());
    }

    #[test]
    fn unknown_priority_normalizes_to_medium() {
        assert_eq!(
            ContextPriority::parse_or_medium("urgent"),
            ContextPriority::Medium
        );
        assert_eq!(
            ContextPriority::parse_or_medium("CRITICAL"),
            ContextPriority::Critical
        );
    }
}
