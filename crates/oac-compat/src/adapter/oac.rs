//! Native OAC format: markdown with flat frontmatter.
//!
//! Structured fields ride on flat lines: dotted `permission.<tool>` keys
//! (with a JSON object value for granular rules), repeated pipe-separated
//! `context:` lines, and repeated `hook:` lines carrying a JSON object.
//! Every canonical field survives a round trip through this dialect.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::analyzer::{PlatformCapabilities, capabilities_for};
use crate::error::{ConvertError, Result};
use crate::mapping::tools::enabled_names;
use crate::model::{
    AgentMode, AgentModel, ContextPriority, ContextRef, HookDef, Metadata, PermissionRule,
    PermissionScalar, skill_seed,
};
use crate::parser::frontmatter::{ScalarValue, split_document};

use super::{ConversionOutput, FormatAdapter, OutputFile, Platform, base_frontmatter};

pub struct OacAdapter;

impl FormatAdapter for OacAdapter {
    fn platform(&self) -> Platform {
        Platform::Oac
    }

    fn to_canonical(&self, source: &str) -> Result<AgentModel> {
        let (raw, body) = split_document(source);
        let mut frontmatter = base_frontmatter(&raw)?;

        frontmatter.skills = raw
            .list("skills")
            .unwrap_or_default()
            .into_iter()
            .map(crate::model::SkillRef::new)
            .collect();

        // Dotted keys carry explicit per-tool flags; the `tools:` list only
        // expresses enabled entries, so disabled ones arrive this way.
        for (tool, value) in raw.with_prefix("tool.") {
            let enabled = match value {
                ScalarValue::Bool(b) => *b,
                other => match other.to_text().to_ascii_lowercase().as_str() {
                    "true" => true,
                    "false" => false,
                    _ => {
                        return Err(ConvertError::FieldType {
                            key: format!("tool.{tool}"),
                            expected: "true|false",
                        });
                    }
                },
            };
            frontmatter.tools.insert(tool.to_string(), enabled);
        }

        for (tool, value) in raw.with_prefix("permission.") {
            let rule = parse_permission_value(tool, value)?;
            frontmatter.permissions.insert(tool.to_string(), rule);
        }

        for value in raw.get_all("hook") {
            let token = value.to_text();
            let hook: HookDef = serde_json::from_str(&token).map_err(|e| {
                tracing::debug!("bad hook line: {e}");
                ConvertError::FieldType {
                    key: "hook".to_string(),
                    expected: "JSON object with event/matchers/commands",
                }
            })?;
            frontmatter.hooks.push(hook);
        }

        let contexts = raw
            .get_all("context")
            .map(|v| parse_context_line(&v.to_text()))
            .collect();

        let agent_type = raw.text("type").unwrap_or_else(|| {
            match frontmatter.mode {
                AgentMode::Primary => "agent",
                AgentMode::Subagent => "subagent",
            }
            .to_string()
        });

        Ok(AgentModel {
            metadata: Metadata {
                category: raw.text("category"),
                agent_type: Some(agent_type),
            },
            frontmatter,
            system_prompt: body,
            contexts,
        })
    }

    fn from_canonical(&self, model: &AgentModel) -> Result<ConversionOutput> {
        let fm = &model.frontmatter;
        let mut out = String::from("---\n");
        if let Some(name) = &fm.name {
            let _ = writeln!(out, "name: {name}");
        }
        if let Some(description) = &fm.description {
            let _ = writeln!(out, "description: {description}");
        }
        let _ = writeln!(out, "mode: {}", fm.mode.as_str());
        if let Some(model_id) = &fm.model {
            let _ = writeln!(out, "model: {model_id}");
        }
        if let Some(t) = fm.temperature {
            let _ = writeln!(out, "temperature: {t}");
        }
        if let Some(steps) = fm.max_steps {
            let _ = writeln!(out, "max_steps: {steps}");
        }
        if let Some(category) = &model.metadata.category {
            let _ = writeln!(out, "category: {category}");
        }
        if let Some(agent_type) = &model.metadata.agent_type {
            let _ = writeln!(out, "type: {agent_type}");
        }
        let enabled = enabled_names(&fm.tools);
        if !enabled.is_empty() {
            let _ = writeln!(out, "tools: [{}]", enabled.join(", "));
        }
        for (tool, on) in &fm.tools {
            if !*on {
                let _ = writeln!(out, "tool.{tool}: false");
            }
        }
        if !fm.skills.is_empty() {
            let names: Vec<&str> = fm.skills.iter().map(|s| s.name.as_str()).collect();
            let _ = writeln!(out, "skills: [{}]", names.join(", "));
        }
        for (tool, rule) in &fm.permissions {
            match rule {
                PermissionRule::Scalar(s) => {
                    let _ = writeln!(out, "permission.{tool}: {}", s.as_str());
                }
                PermissionRule::PerPath(rules) => {
                    let islands: BTreeMap<&str, &str> = rules
                        .iter()
                        .map(|(pattern, s)| (pattern.as_str(), s.as_str()))
                        .collect();
                    // BTreeMap of &str serializes infallibly.
                    let json = serde_json::to_string(&islands).unwrap_or_default();
                    let _ = writeln!(out, "permission.{tool}: {json}");
                }
            }
        }
        for hook in &fm.hooks {
            let json = serde_json::to_string(hook).unwrap_or_default();
            let _ = writeln!(out, "hook: {json}");
        }
        for ctx in &model.contexts {
            match &ctx.description {
                Some(desc) => {
                    let _ = writeln!(
                        out,
                        "context: {} | {} | {}",
                        ctx.path,
                        ctx.priority.as_str(),
                        desc
                    );
                }
                None => {
                    let _ = writeln!(out, "context: {} | {}", ctx.path, ctx.priority.as_str());
                }
            }
        }
        out.push_str("---\n\n");
        out.push_str(&model.system_prompt);
        out.push('\n');

        let file_name = format!("{}.md", skill_seed(model.name_or("agent")));
        Ok(ConversionOutput {
            configs: vec![OutputFile {
                file_name,
                content: out,
            }],
            warnings: Vec::new(),
        })
    }

    fn validate_conversion(&self, _model: &AgentModel) -> Vec<String> {
        // Nothing is mandatory in the native format.
        Vec::new()
    }

    fn capabilities(&self) -> &'static PlatformCapabilities {
        capabilities_for(Platform::Oac)
    }
}

fn parse_permission_value(tool: &str, value: &ScalarValue) -> Result<PermissionRule> {
    let token = value.to_text();
    if token.trim_start().starts_with('{') {
        let rules: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(&token).map_err(|_| ConvertError::FieldType {
                key: format!("permission.{tool}"),
                expected: "JSON object of pattern -> allow|deny|ask",
            })?;
        let mut per_path = BTreeMap::new();
        for (pattern, v) in rules {
            let scalar = match &v {
                serde_json::Value::Bool(true) => Some(PermissionScalar::Allow),
                serde_json::Value::Bool(false) => Some(PermissionScalar::Deny),
                serde_json::Value::String(s) => PermissionScalar::parse(s),
                _ => None,
            };
            let Some(scalar) = scalar else {
                return Err(ConvertError::FieldType {
                    key: format!("permission.{tool}"),
                    expected: "allow|deny|ask per pattern",
                });
            };
            per_path.insert(pattern, scalar);
        }
        return Ok(PermissionRule::PerPath(per_path));
    }
    match PermissionScalar::parse(&token) {
        Some(scalar) => Ok(PermissionRule::Scalar(scalar)),
        None => Err(ConvertError::FieldType {
            key: format!("permission.{tool}"),
            expected: "allow|deny|ask",
        }),
    }
}

fn parse_context_line(line: &str) -> ContextRef {
    let mut parts = line.splitn(3, '|').map(str::trim);
    let path = parts.next().unwrap_or_default().to_string();
    let priority = parts
        .next()
        .map(ContextPriority::parse_or_medium)
        .unwrap_or_default();
    let description = parts
        .next()
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    ContextRef {
        path,
        priority,
        description,
    }
}
