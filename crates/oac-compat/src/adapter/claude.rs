//! Claude Code adapter.
//!
//! Primary agents are a single `.claude/config.json`; subagents are
//! markdown files under `.claude/agents/`. Invalid JSON input is not an
//! error: it falls back to markdown-subagent parsing. That fallback is
//! load-bearing and must stay silent.

use std::fmt::Write as _;

use serde_json::{Value, json};

use crate::analyzer::{PlatformCapabilities, capabilities_for};
use crate::error::Result;
use crate::mapping::models::{CLAUDE_MODEL_FALLBACK, CLAUDE_MODELS};
use crate::mapping::permission::{collapse_to_mode, rules_from_json};
use crate::mapping::tools::{claude_tool_list, tools_from_json};
use crate::model::{
    AgentMode, AgentModel, Frontmatter, HookDef, Metadata, SkillRef, context_slug, skill_seed,
};
use crate::parser::frontmatter::split_document;

use super::{
    ConversionOutput, FormatAdapter, OutputFile, Platform, base_frontmatter, try_json_object,
    warn_degraded, warn_missing_field, warn_unsupported,
};

const DEFAULT_NAME: &str = "claude-agent";

pub struct ClaudeAdapter;

impl FormatAdapter for ClaudeAdapter {
    fn platform(&self) -> Platform {
        Platform::Claude
    }

    fn to_canonical(&self, source: &str) -> Result<AgentModel> {
        match try_json_object(source) {
            Some(map) => Ok(parse_primary_config(&map)),
            // Invalid JSON is reinterpreted as a markdown subagent.
            None => parse_subagent_markdown(source),
        }
    }

    fn from_canonical(&self, model: &AgentModel) -> Result<ConversionOutput> {
        let fm = &model.frontmatter;
        let mut warnings = Vec::new();

        if fm.temperature.is_some() {
            warnings.push(warn_unsupported(Platform::Claude, "temperature", ""));
        }
        if fm.max_steps.is_some() {
            warnings.push(warn_unsupported(Platform::Claude, "maxSteps", ""));
        }
        if fm.name.is_none() {
            warnings.push(warn_missing_field(Platform::Claude, "name", DEFAULT_NAME));
        }
        if fm.description.is_none() {
            warnings.push(warn_missing_field(Platform::Claude, "description", ""));
        }

        let mut configs = Vec::new();
        match fm.mode {
            AgentMode::Primary => {
                let (mode, collapse_warnings) = collapse_to_mode(&fm.permissions);
                warnings.extend(collapse_warnings);

                let mut obj = serde_json::Map::new();
                obj.insert("name".into(), json!(model.name_or(DEFAULT_NAME)));
                obj.insert("systemPrompt".into(), json!(model.system_prompt));
                if let Some(description) = &fm.description {
                    obj.insert("description".into(), json!(description));
                }
                if let Some(model_id) = &fm.model {
                    obj.insert("model".into(), json!(platform_model(model_id)));
                }
                if !fm.tools.is_empty() {
                    obj.insert("tools".into(), json!(claude_tool_list(&fm.tools)));
                }
                if let Some(mode) = mode {
                    obj.insert("permissionMode".into(), json!(mode.as_str()));
                }
                if !fm.hooks.is_empty() {
                    obj.insert("hooks".into(), hooks_to_json(&fm.hooks));
                }
                configs.push(OutputFile {
                    file_name: ".claude/config.json".to_string(),
                    content: pretty(&Value::Object(obj)),
                });
            }
            AgentMode::Subagent => {
                if model.has_granular_permissions() {
                    warnings.push(warn_degraded(
                        Platform::Claude,
                        "granular permissions",
                        "subagent files carry no permission rules",
                    ));
                }
                let seed = skill_seed(model.name_or(DEFAULT_NAME));
                configs.push(OutputFile {
                    file_name: format!(".claude/agents/{seed}.md"),
                    content: subagent_markdown(model),
                });
            }
        }

        for skill in &fm.skills {
            let seed = skill_seed(&skill.name);
            configs.push(OutputFile {
                file_name: format!(".claude/skills/{seed}/SKILL.md"),
                content: format!(
                    "---\nname: {seed}\n---\n\nSkill '{}' referenced by agent '{}'.\n",
                    skill.name,
                    model.name_or(DEFAULT_NAME)
                ),
            });
        }
        for ctx in &model.contexts {
            let slug = context_slug(&ctx.path);
            let mut content = format!("---\nname: {slug}\n");
            if let Some(desc) = &ctx.description {
                let _ = writeln!(content, "description: {desc}");
            }
            let _ = write!(
                content,
                "---\n\nReference material from `{}` (priority: {}).\n",
                ctx.path,
                ctx.priority.as_str()
            );
            configs.push(OutputFile {
                file_name: format!(".claude/skills/{slug}/SKILL.md"),
                content,
            });
        }

        Ok(ConversionOutput { configs, warnings })
    }

    fn validate_conversion(&self, model: &AgentModel) -> Vec<String> {
        let mut warnings = Vec::new();
        if model.frontmatter.name.is_none() {
            warnings.push(warn_missing_field(Platform::Claude, "name", ""));
        }
        if model.frontmatter.description.is_none() {
            warnings.push(warn_missing_field(Platform::Claude, "description", ""));
        }
        warnings
    }

    fn capabilities(&self) -> &'static PlatformCapabilities {
        capabilities_for(Platform::Claude)
    }
}

/// Canonical model ID for an incoming Claude token; unknown tokens pass
/// through unchanged.
fn canonical_model(token: &str) -> String {
    CLAUDE_MODELS
        .canonicalize(token)
        .map(str::to_string)
        .unwrap_or_else(|| token.to_string())
}

/// Platform model ID for an outgoing canonical token; unknown models fall
/// back to the `sonnet` alias.
fn platform_model(canonical: &str) -> String {
    CLAUDE_MODELS
        .platform_id(canonical)
        .unwrap_or(CLAUDE_MODEL_FALLBACK)
        .to_string()
}

fn parse_primary_config(map: &serde_json::Map<String, Value>) -> AgentModel {
    let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

    let mode = match text("mode").as_deref() {
        Some("subagent") => AgentMode::Subagent,
        _ => AgentMode::Primary,
    };
    let skills = map
        .get("skills")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(skill_from_json).collect())
        .unwrap_or_default();
    let hooks = map.get("hooks").map(hooks_from_json).unwrap_or_default();
    let metadata = map
        .get("metadata")
        .and_then(Value::as_object)
        .map(|m| Metadata {
            category: m.get("category").and_then(Value::as_str).map(str::to_string),
            agent_type: m.get("type").and_then(Value::as_str).map(str::to_string),
        })
        .unwrap_or_default();

    AgentModel {
        frontmatter: Frontmatter {
            name: text("name"),
            description: text("description"),
            mode,
            model: text("model").map(|m| canonical_model(&m)),
            temperature: map.get("temperature").and_then(Value::as_f64),
            tools: map.get("tools").map(tools_from_json).unwrap_or_default(),
            permissions: map
                .get("permissions")
                .map(rules_from_json)
                .unwrap_or_default(),
            skills,
            hooks,
            max_steps: map
                .get("maxSteps")
                .and_then(Value::as_u64)
                .map(|n| n as u32),
        },
        metadata,
        system_prompt: text("systemPrompt").unwrap_or_default(),
        contexts: Vec::new(),
    }
}

fn parse_subagent_markdown(source: &str) -> Result<AgentModel> {
    let (raw, body) = split_document(source);
    let mut frontmatter = base_frontmatter(&raw)?;
    frontmatter.mode = AgentMode::Subagent;
    if let Some(model_id) = frontmatter.model.take() {
        frontmatter.model = Some(canonical_model(&model_id));
    }
    Ok(AgentModel {
        frontmatter,
        metadata: Metadata {
            category: None,
            agent_type: Some("subagent".to_string()),
        },
        system_prompt: body,
        contexts: Vec::new(),
    })
}

fn skill_from_json(value: &Value) -> Option<SkillRef> {
    match value {
        Value::String(name) => Some(SkillRef::new(name.clone())),
        Value::Object(obj) => obj
            .get("name")
            .and_then(Value::as_str)
            .map(SkillRef::new),
        _ => None,
    }
}

/// Claude hook shape: `{event: [{matcher, hooks: [{type, command}]}]}`.
/// Multiple matchers join with `|` on emit and split back on parse.
fn hooks_from_json(value: &Value) -> Vec<HookDef> {
    let mut out = Vec::new();
    let Value::Object(by_event) = value else {
        tracing::debug!("ignoring hooks value of unexpected shape");
        return out;
    };
    for (event, entries) in by_event {
        let Value::Array(entries) = entries else {
            continue;
        };
        for entry in entries {
            let matchers = entry
                .get("matcher")
                .and_then(Value::as_str)
                .map(|m| m.split('|').map(str::to_string).collect())
                .unwrap_or_default();
            let commands = entry
                .get("hooks")
                .and_then(Value::as_array)
                .map(|hooks| {
                    hooks
                        .iter()
                        .filter_map(|h| h.get("command").and_then(Value::as_str))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            out.push(HookDef {
                event: event.clone(),
                matchers,
                commands,
            });
        }
    }
    out
}

fn hooks_to_json(hooks: &[HookDef]) -> Value {
    let mut by_event = serde_json::Map::new();
    for hook in hooks {
        let mut entry = serde_json::Map::new();
        if !hook.matchers.is_empty() {
            entry.insert("matcher".into(), json!(hook.matchers.join("|")));
        }
        let commands: Vec<Value> = hook
            .commands
            .iter()
            .map(|c| json!({"type": "command", "command": c}))
            .collect();
        entry.insert("hooks".into(), Value::Array(commands));
        let slot = by_event
            .entry(hook.event.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(entries) = slot {
            entries.push(Value::Object(entry));
        }
    }
    Value::Object(by_event)
}

fn subagent_markdown(model: &AgentModel) -> String {
    let fm = &model.frontmatter;
    let mut out = String::from("---\n");
    let _ = writeln!(out, "name: {}", model.name_or(DEFAULT_NAME));
    if let Some(description) = &fm.description {
        let _ = writeln!(out, "description: {description}");
    }
    if let Some(model_id) = &fm.model {
        let _ = writeln!(out, "model: {}", platform_model(model_id));
    }
    if !fm.tools.is_empty() {
        let _ = writeln!(out, "tools: {}", claude_tool_list(&fm.tools).join(", "));
    }
    out.push_str("---\n\n");
    out.push_str(&model.system_prompt);
    out.push('\n');
    out
}

fn pretty(value: &Value) -> String {
    let mut content = serde_json::to_string_pretty(value).unwrap_or_default();
    content.push('\n');
    content
}
