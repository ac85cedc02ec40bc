//! Cursor IDE adapter.
//!
//! Cursor has a single rules file with at most a small frontmatter block,
//! so this is the most lossy target: everything it cannot carry degrades
//! to warnings, and the output is always exactly one `.cursorrules` file.
//! Identity fields (name, description, model, tools) are written as
//! frontmatter so they survive a reverse trip.

use std::fmt::Write as _;

use crate::analyzer::{PlatformCapabilities, capabilities_for};
use crate::error::Result;
use crate::mapping::models::{CURSOR_MODEL_FALLBACK, CURSOR_MODELS};
use crate::mapping::tools::enabled_names;
use crate::model::{AgentMode, AgentModel, Metadata};
use crate::parser::frontmatter::split_document;

use super::{
    ConversionOutput, FormatAdapter, OutputFile, Platform, base_frontmatter, warn_degraded,
    warn_missing_field, warn_unsupported,
};

pub const DEFAULT_NAME: &str = "cursor-agent";

pub struct CursorAdapter;

impl FormatAdapter for CursorAdapter {
    fn platform(&self) -> Platform {
        Platform::Cursor
    }

    fn to_canonical(&self, source: &str) -> Result<AgentModel> {
        let (raw, body) = split_document(source);
        let mut frontmatter = base_frontmatter(&raw)?;
        if frontmatter.name.is_none() {
            frontmatter.name = Some(DEFAULT_NAME.to_string());
        }
        if let Some(model_id) = frontmatter.model.take() {
            frontmatter.model = Some(
                CURSOR_MODELS
                    .canonicalize(&model_id)
                    .map(str::to_string)
                    .unwrap_or(model_id),
            );
        }
        Ok(AgentModel {
            frontmatter,
            metadata: Metadata::default(),
            system_prompt: body,
            contexts: Vec::new(),
        })
    }

    fn from_canonical(&self, model: &AgentModel) -> Result<ConversionOutput> {
        let fm = &model.frontmatter;
        let mut warnings = Vec::new();

        if fm.name.is_none() {
            warnings.push(warn_missing_field(Platform::Cursor, "name", DEFAULT_NAME));
        }
        if fm.mode == AgentMode::Subagent {
            warnings.push(warn_unsupported(
                Platform::Cursor,
                "subagent mode",
                "Cursor has no primary/subagent distinction",
            ));
        }
        if !fm.skills.is_empty() {
            warnings.push(warn_unsupported(
                Platform::Cursor,
                "skills",
                "inline the skill content into the rules body manually",
            ));
        }
        if !fm.hooks.is_empty() {
            warnings.push(warn_unsupported(Platform::Cursor, "hooks", ""));
        }
        if fm.max_steps.is_some() {
            warnings.push(warn_unsupported(Platform::Cursor, "maxSteps", ""));
        }
        if model.has_granular_permissions() {
            warnings.push(warn_degraded(
                Platform::Cursor,
                "granular permissions",
                "per-path rules cannot be expressed in .cursorrules",
            ));
        }
        if !model.contexts.is_empty() {
            warnings.push(format!(
                "cursor cannot attach reference material; inline the {} context file(s) manually",
                model.contexts.len()
            ));
        }

        // Always exactly one output file, whatever the input looks like.
        Ok(ConversionOutput {
            configs: vec![OutputFile {
                file_name: ".cursorrules".to_string(),
                content: render_rules(model),
            }],
            warnings,
        })
    }

    fn validate_conversion(&self, model: &AgentModel) -> Vec<String> {
        let mut warnings = Vec::new();
        if model.frontmatter.name.is_none() {
            warnings.push(warn_missing_field(Platform::Cursor, "name", DEFAULT_NAME));
        }
        warnings
    }

    fn capabilities(&self) -> &'static PlatformCapabilities {
        capabilities_for(Platform::Cursor)
    }
}

fn render_rules(model: &AgentModel) -> String {
    let fm = &model.frontmatter;
    let mut out = String::from("---\n");
    let _ = writeln!(out, "name: {}", model.name_or(DEFAULT_NAME));
    if let Some(description) = &fm.description {
        let _ = writeln!(out, "description: {description}");
    }
    if let Some(model_id) = &fm.model {
        let platform_id = CURSOR_MODELS
            .platform_id(model_id)
            .unwrap_or(CURSOR_MODEL_FALLBACK);
        let _ = writeln!(out, "model: {platform_id}");
    }
    let enabled = enabled_names(&fm.tools);
    if !enabled.is_empty() {
        let _ = writeln!(out, "tools: [{}]", enabled.join(", "));
    }
    out.push_str("---\n\n");
    out.push_str(&model.system_prompt);
    out.push('\n');
    if !model.contexts.is_empty() {
        out.push_str("\n# Reference material (inline manually):\n");
        for ctx in &model.contexts {
            match &ctx.description {
                Some(desc) => {
                    let _ = writeln!(
                        out,
                        "# - {} ({}): {desc}",
                        ctx.path,
                        ctx.priority.as_str()
                    );
                }
                None => {
                    let _ = writeln!(out, "# - {} ({})", ctx.path, ctx.priority.as_str());
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContextPriority, ContextRef, HookDef, SkillRef};

    #[test]
    fn bare_text_becomes_default_primary_agent() {
        let adapter = CursorAdapter;
        let model = adapter
            .to_canonical("You are a helpful assistant.")
            .unwrap();
        assert_eq!(model.frontmatter.name.as_deref(), Some("cursor-agent"));
        assert_eq!(model.frontmatter.mode, AgentMode::Primary);
        assert_eq!(model.system_prompt, "You are a helpful assistant.");
    }

    #[test]
    fn cursor_model_ids_canonicalize() {
        let adapter = CursorAdapter;
        let src = "---\nname: x\nmodel: claude-3-opus\n---\nbody\n";
        let model = adapter.to_canonical(src).unwrap();
        assert_eq!(model.frontmatter.model.as_deref(), Some("claude-opus-3"));
    }

    #[test]
    fn always_exactly_one_cursorrules_file() {
        let adapter = CursorAdapter;
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("busy".into());
        model.frontmatter.mode = AgentMode::Subagent;
        model.frontmatter.max_steps = Some(9);
        model.frontmatter.skills.push(SkillRef::new("a"));
        model.frontmatter.skills.push(SkillRef::new("b"));
        model.frontmatter.hooks.push(HookDef::default());
        for i in 0..5 {
            model.contexts.push(ContextRef {
                path: format!("doc{i}.md"),
                priority: ContextPriority::Medium,
                description: None,
            });
        }
        let out = adapter.from_canonical(&model).unwrap();
        assert_eq!(out.configs.len(), 1);
        assert_eq!(out.configs[0].file_name, ".cursorrules");
        // skills, hooks, maxSteps, subagent mode, contexts
        assert_eq!(out.warnings.len(), 5);
    }

    #[test]
    fn unknown_model_falls_back_to_gpt4_on_output() {
        let adapter = CursorAdapter;
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("x".into());
        model.frontmatter.model = Some("mystery-model".into());
        let out = adapter.from_canonical(&model).unwrap();
        assert!(out.configs[0].content.contains("model: gpt-4"));
    }

    #[test]
    fn round_trip_preserves_identity_fields() {
        let adapter = CursorAdapter;
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("reviewer".into());
        model.frontmatter.description = Some("Reviews code".into());
        model.frontmatter.model = Some("claude-sonnet-4".into());
        model.frontmatter.tools.insert("read".into(), true);
        model.system_prompt = "You review code.".into();

        let out = adapter.from_canonical(&model).unwrap();
        let back = adapter.to_canonical(&out.configs[0].content).unwrap();
        assert_eq!(back.frontmatter.name.as_deref(), Some("reviewer"));
        assert_eq!(back.frontmatter.description.as_deref(), Some("Reviews code"));
        assert_eq!(back.frontmatter.model.as_deref(), Some("claude-sonnet-4"));
        assert_eq!(back.frontmatter.tools, model.frontmatter.tools);
        assert_eq!(back.system_prompt, "You review code.");
    }
}
