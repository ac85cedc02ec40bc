//! Windsurf adapter.
//!
//! Windsurf configs are strict JSON: a malformed or non-object document is
//! a structural error, never a fallback. Temperature maps to the
//! three-level creativity scale and permissions collapse to booleans.

use serde_json::{Value, json};

use crate::analyzer::{PlatformCapabilities, capabilities_for};
use crate::error::{ConvertError, Result};
use crate::mapping::models::{WINDSURF_MODEL_FALLBACK, WINDSURF_MODELS};
use crate::mapping::permission::{collapse_to_binary, rules_from_json};
use crate::mapping::priority::downgrade;
use crate::mapping::temperature::{creativity_to_temperature, temperature_to_creativity};
use crate::mapping::tools::tools_from_json;
use crate::model::{
    AgentMode, AgentModel, ContextPriority, ContextRef, Frontmatter, Metadata, SkillRef,
    skill_seed,
};

use super::{
    ConversionOutput, FormatAdapter, OutputFile, Platform, try_json_object, warn_degraded,
    warn_missing_field, warn_unsupported,
};

const DEFAULT_NAME: &str = "windsurf-agent";

pub struct WindsurfAdapter;

impl FormatAdapter for WindsurfAdapter {
    fn platform(&self) -> Platform {
        Platform::Windsurf
    }

    fn to_canonical(&self, source: &str) -> Result<AgentModel> {
        let Some(map) = try_json_object(source) else {
            return Err(ConvertError::InvalidConfig(
                "invalid config format: expected a JSON object".to_string(),
            ));
        };
        let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

        let temperature = match map.get("creativity") {
            None => None,
            // Numeric creativity passes through unchanged.
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(level)) => Some(creativity_to_temperature(level)),
            Some(other) => {
                tracing::debug!("ignoring creativity of unexpected shape: {other}");
                None
            }
        };
        let skills = map
            .get("skills")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(SkillRef::new)
                    .collect()
            })
            .unwrap_or_default();
        let contexts = map
            .get("contexts")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(context_from_json).collect())
            .unwrap_or_default();
        let mode = match text("mode").as_deref() {
            Some("subagent") => AgentMode::Subagent,
            _ => AgentMode::Primary,
        };

        Ok(AgentModel {
            frontmatter: Frontmatter {
                name: text("name"),
                description: text("description"),
                mode,
                model: text("model").map(|m| {
                    WINDSURF_MODELS
                        .canonicalize(&m)
                        .map(str::to_string)
                        .unwrap_or(m)
                }),
                temperature,
                tools: map.get("tools").map(tools_from_json).unwrap_or_default(),
                permissions: map
                    .get("permissions")
                    .map(rules_from_json)
                    .unwrap_or_default(),
                skills,
                hooks: Vec::new(),
                max_steps: None,
            },
            metadata: Metadata::default(),
            system_prompt: text("systemPrompt").unwrap_or_default(),
            contexts,
        })
    }

    fn from_canonical(&self, model: &AgentModel) -> Result<ConversionOutput> {
        let fm = &model.frontmatter;
        let mut warnings = Vec::new();

        if fm.name.is_none() {
            warnings.push(warn_missing_field(Platform::Windsurf, "name", DEFAULT_NAME));
        }
        if !fm.hooks.is_empty() {
            warnings.push(warn_unsupported(
                Platform::Windsurf,
                "hooks",
                "behavioral rules will be lost",
            ));
        }
        if fm.max_steps.is_some() {
            warnings.push(warn_unsupported(Platform::Windsurf, "maxSteps", ""));
        }
        if model.has_granular_permissions() {
            warnings.push(warn_degraded(
                Platform::Windsurf,
                "granular permissions",
                "per-path rules collapse to a best-effort boolean",
            ));
        }
        if !fm.skills.is_empty() {
            warnings.push(warn_degraded(
                Platform::Windsurf,
                "skills",
                "skill system reduced to basic references",
            ));
        }
        let (permissions, ask_warnings) = collapse_to_binary(&fm.permissions);
        warnings.extend(ask_warnings);

        let mut obj = serde_json::Map::new();
        obj.insert("name".into(), json!(model.name_or(DEFAULT_NAME)));
        if let Some(description) = &fm.description {
            obj.insert("description".into(), json!(description));
        }
        if let Some(model_id) = &fm.model {
            let platform_id = WINDSURF_MODELS
                .platform_id(model_id)
                .unwrap_or(WINDSURF_MODEL_FALLBACK);
            obj.insert("model".into(), json!(platform_id));
        }
        if let Some(t) = fm.temperature {
            obj.insert("creativity".into(), json!(temperature_to_creativity(t)));
        }
        if !fm.tools.is_empty() {
            obj.insert("tools".into(), json!(fm.tools));
        }
        if !permissions.is_empty() {
            obj.insert("permissions".into(), json!(permissions));
        }
        if !fm.skills.is_empty() {
            let names: Vec<&str> = fm.skills.iter().map(|s| s.name.as_str()).collect();
            obj.insert("skills".into(), json!(names));
        }
        if !model.contexts.is_empty() {
            let contexts: Vec<Value> = model
                .contexts
                .iter()
                .map(|ctx| {
                    let mut c = serde_json::Map::new();
                    c.insert("path".into(), json!(ctx.path));
                    c.insert("priority".into(), json!(downgrade(ctx.priority).as_str()));
                    if let Some(desc) = &ctx.description {
                        c.insert("description".into(), json!(desc));
                    }
                    Value::Object(c)
                })
                .collect();
            obj.insert("contexts".into(), Value::Array(contexts));
        }
        obj.insert("systemPrompt".into(), json!(model.system_prompt));

        let file_name = match fm.mode {
            AgentMode::Primary => ".windsurf/config.json".to_string(),
            AgentMode::Subagent => {
                obj.insert("mode".into(), json!("subagent"));
                format!(".windsurf/agents/{}.json", skill_seed(model.name_or(DEFAULT_NAME)))
            }
        };
        let mut content =
            serde_json::to_string_pretty(&Value::Object(obj)).unwrap_or_default();
        content.push('\n');

        Ok(ConversionOutput {
            configs: vec![OutputFile { file_name, content }],
            warnings,
        })
    }

    fn validate_conversion(&self, model: &AgentModel) -> Vec<String> {
        let mut warnings = Vec::new();
        if model.frontmatter.name.is_none() {
            warnings.push(warn_missing_field(Platform::Windsurf, "name", ""));
        }
        warnings
    }

    fn capabilities(&self) -> &'static PlatformCapabilities {
        capabilities_for(Platform::Windsurf)
    }
}

fn context_from_json(value: &Value) -> Option<ContextRef> {
    let obj = value.as_object()?;
    let path = obj.get("path").and_then(Value::as_str)?.to_string();
    let priority = obj
        .get("priority")
        .and_then(Value::as_str)
        .map(ContextPriority::parse_or_medium)
        .unwrap_or_default();
    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(ContextRef {
        path,
        priority,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PermissionRule, PermissionScalar};

    #[test]
    fn bad_json_is_a_structural_error() {
        let adapter = WindsurfAdapter;
        assert!(matches!(
            adapter.to_canonical("not json"),
            Err(ConvertError::InvalidConfig(_))
        ));
        assert!(matches!(
            adapter.to_canonical("[1, 2]"),
            Err(ConvertError::InvalidConfig(_))
        ));
    }

    #[test]
    fn high_temperature_emits_high_creativity() {
        let adapter = WindsurfAdapter;
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("agent".into());
        model.frontmatter.temperature = Some(0.9);
        let out = adapter.from_canonical(&model).unwrap();
        assert_eq!(out.configs[0].file_name, ".windsurf/config.json");
        assert!(out.configs[0].content.contains("\"creativity\": \"high\""));
    }

    #[test]
    fn creativity_levels_parse_back() {
        let adapter = WindsurfAdapter;
        let model = adapter
            .to_canonical(r#"{"name": "a", "creativity": "balanced"}"#)
            .unwrap();
        assert_eq!(model.frontmatter.temperature, Some(0.5));
        let model = adapter
            .to_canonical(r#"{"name": "a", "creativity": 0.65}"#)
            .unwrap();
        assert_eq!(model.frontmatter.temperature, Some(0.65));
        let model = adapter
            .to_canonical(r#"{"name": "a", "creativity": "experimental"}"#)
            .unwrap();
        assert_eq!(model.frontmatter.temperature, Some(0.7));
    }

    #[test]
    fn ask_permissions_warn_and_deny() {
        let adapter = WindsurfAdapter;
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("a".into());
        model.frontmatter.permissions.insert(
            "bash".into(),
            PermissionRule::Scalar(PermissionScalar::Ask),
        );
        let out = adapter.from_canonical(&model).unwrap();
        assert!(out.configs[0].content.contains("\"bash\": false"));
        assert!(out.warnings.iter().any(|w| w.contains("treated as deny")));
    }

    #[test]
    fn hooks_warn_about_lost_behavioral_rules() {
        let adapter = WindsurfAdapter;
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("a".into());
        model.frontmatter.hooks.push(crate::model::HookDef {
            event: "PostToolUse".into(),
            matchers: vec![],
            commands: vec!["echo hi".into()],
        });
        let out = adapter.from_canonical(&model).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("behavioral rules will be lost")));
    }

    #[test]
    fn subagents_get_their_own_file() {
        let adapter = WindsurfAdapter;
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("Side Kick".into());
        model.frontmatter.mode = AgentMode::Subagent;
        let out = adapter.from_canonical(&model).unwrap();
        assert_eq!(out.configs[0].file_name, ".windsurf/agents/side-kick.json");
    }

    #[test]
    fn context_priorities_downgrade_on_output() {
        let adapter = WindsurfAdapter;
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("a".into());
        model.contexts.push(ContextRef {
            path: "x.md".into(),
            priority: ContextPriority::Critical,
            description: None,
        });
        model.contexts.push(ContextRef {
            path: "y.md".into(),
            priority: ContextPriority::Medium,
            description: None,
        });
        let out = adapter.from_canonical(&model).unwrap();
        let parsed: Value = serde_json::from_str(&out.configs[0].content).unwrap();
        let contexts = parsed["contexts"].as_array().unwrap();
        assert_eq!(contexts[0]["priority"], "high");
        assert_eq!(contexts[1]["priority"], "low");
    }

    #[test]
    fn round_trips_lossless_fields() {
        let adapter = WindsurfAdapter;
        let mut model = AgentModel::default();
        model.frontmatter.name = Some("surfer".into());
        model.frontmatter.description = Some("Rides waves".into());
        model.frontmatter.mode = AgentMode::Subagent;
        model.frontmatter.model = Some("claude-opus-4".into());
        model.frontmatter.temperature = Some(0.7);
        model.frontmatter.tools.insert("read".into(), true);
        model.frontmatter.tools.insert("bash".into(), false);
        model.frontmatter.skills.push(SkillRef::new("research"));
        model.frontmatter.permissions.insert(
            "read".into(),
            PermissionRule::Scalar(PermissionScalar::Allow),
        );
        model.system_prompt = "Surf.".into();

        let out = adapter.from_canonical(&model).unwrap();
        let back = adapter.to_canonical(&out.configs[0].content).unwrap();
        assert_eq!(back.frontmatter.name, model.frontmatter.name);
        assert_eq!(back.frontmatter.description, model.frontmatter.description);
        assert_eq!(back.frontmatter.mode, AgentMode::Subagent);
        assert_eq!(back.frontmatter.model, model.frontmatter.model);
        // 0.7 sits exactly on the medium level, so it survives the trip.
        assert_eq!(back.frontmatter.temperature, Some(0.7));
        assert_eq!(back.frontmatter.tools, model.frontmatter.tools);
        assert_eq!(back.frontmatter.skills, model.frontmatter.skills);
        assert_eq!(back.frontmatter.permissions, model.frontmatter.permissions);
        assert_eq!(back.system_prompt, model.system_prompt);
    }

    #[test]
    fn round_trip_models() {
        let adapter = WindsurfAdapter;
        let model = adapter
            .to_canonical(r#"{"name": "a", "model": "claude-4-opus"}"#)
            .unwrap();
        assert_eq!(model.frontmatter.model.as_deref(), Some("claude-opus-4"));
    }
}
