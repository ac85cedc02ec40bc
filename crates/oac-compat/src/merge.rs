//! N-to-1 agent merge for single-file targets.
//!
//! Cursor only takes one rules file, so converting a multi-agent project
//! means folding the agents into one canonical model first. The merge is
//! deterministic: input order decides section order and tie-breaks.

use std::fmt::Write as _;

use crate::error::{ConvertError, Result};
use crate::model::{AgentMode, AgentModel, Metadata};

/// Fold several agents into one. Prompts become titled sections, tools
/// union with allow winning, temperature takes the maximum, and the first
/// agent that sets a model wins.
pub fn merge_agents(agents: &[AgentModel]) -> Result<AgentModel> {
    let Some(first) = agents.first() else {
        return Err(ConvertError::EmptyMerge);
    };
    if agents.len() == 1 {
        return Ok(first.clone());
    }
    tracing::debug!(count = agents.len(), "merging agents");

    let mut merged = AgentModel::default();
    let fm = &mut merged.frontmatter;
    fm.mode = AgentMode::Primary;

    let names: Vec<&str> = agents.iter().map(|a| a.name_or("agent")).collect();
    fm.name = Some(names.join("-"));
    fm.description = agents
        .iter()
        .find_map(|a| a.frontmatter.description.clone());

    let mut prompt = String::new();
    for (i, agent) in agents.iter().enumerate() {
        if i > 0 {
            prompt.push_str("\n---\n\n");
        }
        let _ = writeln!(prompt, "# Agent {}: {}", i + 1, agent.name_or("agent"));
        if let Some(description) = &agent.frontmatter.description {
            let _ = writeln!(prompt, "{description}");
        }
        prompt.push('\n');
        prompt.push_str(agent.system_prompt.trim_end());
        prompt.push('\n');

        let afm = &agent.frontmatter;
        for (tool, enabled) in &afm.tools {
            // A tool enabled anywhere stays enabled.
            let slot = fm.tools.entry(tool.clone()).or_insert(false);
            *slot = *slot || *enabled;
        }
        fm.temperature = match (fm.temperature, afm.temperature) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        if fm.model.is_none() {
            fm.model = afm.model.clone();
        }
        if fm.max_steps.is_none() {
            fm.max_steps = afm.max_steps;
        }
        for (tool, rule) in &afm.permissions {
            fm.permissions
                .entry(tool.clone())
                .or_insert_with(|| rule.clone());
        }
        fm.skills.extend(afm.skills.iter().cloned());
        fm.hooks.extend(afm.hooks.iter().cloned());
        merged.contexts.extend(agent.contexts.iter().cloned());
    }

    merged.system_prompt = prompt;
    merged.metadata = Metadata::default();
    Ok(merged)
}
