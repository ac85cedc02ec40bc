//! Compatibility analysis: what survives a conversion, what degrades,
//! what is lost, and whether the target can take the agent at all.

mod capabilities;

pub use capabilities::{
    ConfigFormat, Feature, OutputStructure, PlatformCapabilities, capabilities_for,
};

use crate::adapter::Platform;
use crate::model::{AgentMode, AgentModel};

const DEGRADED_PENALTY: u32 = 10;
const LOST_PENALTY: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompatStatus {
    Compatible,
    Partial,
    Incompatible,
}

impl CompatStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CompatStatus::Compatible => "compatible",
            CompatStatus::Partial => "partial",
            CompatStatus::Incompatible => "incompatible",
        }
    }
}

#[derive(Debug)]
pub struct CompatibilityReport {
    pub platform: Platform,
    pub preserved: Vec<Feature>,
    pub degraded: Vec<Feature>,
    pub lost: Vec<Feature>,
    pub blockers: Vec<String>,
    /// 0..=100; fewer surviving features can only lower it.
    pub score: u8,
    pub status: CompatStatus,
}

/// Classify every feature the model actually uses against the target
/// platform. `strict` turns any loss into an incompatibility.
pub fn analyze(model: &AgentModel, platform: Platform, strict: bool) -> CompatibilityReport {
    let caps = capabilities_for(platform);

    let mut preserved = Vec::new();
    let mut degraded = Vec::new();
    let mut lost = Vec::new();
    for feature in present_features(model) {
        if caps.degraded.contains(&feature) {
            degraded.push(feature);
        } else if caps.supports(feature) {
            preserved.push(feature);
        } else {
            lost.push(feature);
        }
    }

    let mut blockers = Vec::new();
    if caps.requires_name && model.frontmatter.name.is_none() {
        blockers.push(format!(
            "{platform} requires an agent name and the source has none"
        ));
    }

    let penalty =
        degraded.len() as u32 * DEGRADED_PENALTY + lost.len() as u32 * LOST_PENALTY;
    let score = 100u32.saturating_sub(penalty) as u8;

    let status = if !blockers.is_empty() || (strict && !lost.is_empty()) {
        CompatStatus::Incompatible
    } else if !degraded.is_empty() || !lost.is_empty() {
        CompatStatus::Partial
    } else {
        CompatStatus::Compatible
    };

    CompatibilityReport {
        platform,
        preserved,
        degraded,
        lost,
        blockers,
        score,
        status,
    }
}

/// The features this model actually carries. Absent features never count
/// against a target.
fn present_features(model: &AgentModel) -> Vec<Feature> {
    let fm = &model.frontmatter;
    let mut features = Vec::new();
    if !fm.skills.is_empty() {
        features.push(Feature::Skills);
    }
    if !fm.hooks.is_empty() {
        features.push(Feature::Hooks);
    }
    if model.has_granular_permissions() {
        features.push(Feature::GranularPermissions);
    }
    if fm.temperature.is_some() {
        features.push(Feature::Temperature);
    }
    if fm.max_steps.is_some() {
        features.push(Feature::MaxSteps);
    }
    if !model.contexts.is_empty() {
        features.push(Feature::Contexts);
    }
    if fm.mode == AgentMode::Subagent {
        features.push(Feature::SubagentMode);
    }
    features
}

#[derive(Debug, Default)]
pub struct CapabilityComparison {
    pub identical: Vec<&'static str>,
    pub better_in_a: Vec<&'static str>,
    pub better_in_b: Vec<&'static str>,
}

/// Compare two platforms feature by feature.
pub fn compare(a: Platform, b: Platform) -> CapabilityComparison {
    let caps_a = capabilities_for(a);
    let caps_b = capabilities_for(b);
    let mut result = CapabilityComparison::default();
    for ((name, flag_a), (_, flag_b)) in caps_a.flags().into_iter().zip(caps_b.flags()) {
        match (flag_a, flag_b) {
            (true, false) => result.better_in_a.push(name),
            (false, true) => result.better_in_b.push(name),
            _ => result.identical.push(name),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContextPriority, ContextRef, HookDef, SkillRef};
    use proptest::prelude::*;

    fn named(name: &str) -> AgentModel {
        let mut model = AgentModel::default();
        model.frontmatter.name = Some(name.to_string());
        model
    }

    #[test]
    fn plain_agent_is_compatible_everywhere() {
        let model = named("plain");
        for platform in Platform::ALL {
            let report = analyze(&model, platform, false);
            assert_eq!(report.status, CompatStatus::Compatible, "{platform}");
            assert_eq!(report.score, 100);
        }
    }

    #[test]
    fn hooks_are_lost_on_cursor_and_windsurf() {
        let mut model = named("hooked");
        model.frontmatter.hooks.push(HookDef::default());
        for platform in [Platform::Cursor, Platform::Windsurf] {
            let report = analyze(&model, platform, false);
            assert_eq!(report.lost, vec![Feature::Hooks]);
            assert_eq!(report.score, 75);
            assert_eq!(report.status, CompatStatus::Partial);
        }
        let report = analyze(&model, Platform::Claude, false);
        assert_eq!(report.preserved, vec![Feature::Hooks]);
        assert_eq!(report.status, CompatStatus::Compatible);
    }

    #[test]
    fn skills_degrade_on_windsurf_and_vanish_on_cursor() {
        let mut model = named("skilled");
        model.frontmatter.skills.push(SkillRef::new("research"));
        let report = analyze(&model, Platform::Windsurf, false);
        assert_eq!(report.degraded, vec![Feature::Skills]);
        assert_eq!(report.score, 90);
        let report = analyze(&model, Platform::Cursor, false);
        assert_eq!(report.lost, vec![Feature::Skills]);
        assert_eq!(report.score, 75);
    }

    #[test]
    fn missing_name_blocks_platforms_that_require_one() {
        let model = AgentModel::default();
        for platform in [Platform::Claude, Platform::Windsurf] {
            let report = analyze(&model, platform, false);
            assert_eq!(report.status, CompatStatus::Incompatible);
            assert_eq!(report.blockers.len(), 1);
        }
        let report = analyze(&model, Platform::Cursor, false);
        assert!(report.blockers.is_empty());
    }

    #[test]
    fn strict_mode_turns_loss_into_incompatibility() {
        let mut model = named("strict");
        model.frontmatter.max_steps = Some(5);
        let relaxed = analyze(&model, Platform::Claude, false);
        assert_eq!(relaxed.status, CompatStatus::Partial);
        let strict = analyze(&model, Platform::Claude, true);
        assert_eq!(strict.status, CompatStatus::Incompatible);
    }

    #[test]
    fn score_floors_at_zero() {
        let mut model = AgentModel::default();
        let fm = &mut model.frontmatter;
        fm.skills.push(SkillRef::new("a"));
        fm.hooks.push(HookDef::default());
        fm.temperature = Some(0.5);
        fm.max_steps = Some(3);
        fm.mode = AgentMode::Subagent;
        fm.permissions.insert(
            "write".into(),
            crate::model::PermissionRule::PerPath(Default::default()),
        );
        model.contexts.push(ContextRef {
            path: "x.md".into(),
            priority: ContextPriority::High,
            description: None,
        });
        let report = analyze(&model, Platform::Cursor, false);
        // 5 lost (skills, hooks, temperature, max steps, subagent) and
        // 2 degraded (granular, contexts) overflow the budget.
        assert_eq!(report.score, 0);
    }

    #[test]
    fn native_format_never_degrades() {
        let mut model = named("rich");
        model.frontmatter.hooks.push(HookDef::default());
        model.frontmatter.temperature = Some(0.2);
        let report = analyze(&model, Platform::Oac, false);
        assert!(report.degraded.is_empty());
        assert!(report.lost.is_empty());
        assert_eq!(report.score, 100);
    }

    #[test]
    fn comparison_is_symmetric() {
        let ab = compare(Platform::Claude, Platform::Cursor);
        let ba = compare(Platform::Cursor, Platform::Claude);
        assert_eq!(ab.better_in_a, ba.better_in_b);
        assert_eq!(ab.better_in_b, ba.better_in_a);
        assert!(ab.better_in_a.contains(&"skills"));
    }

    proptest! {
        // Adding a feature to a model can never raise its score.
        #[test]
        fn scoring_is_monotonic(
            skills in 0usize..3,
            hooks in 0usize..3,
            temperature in proptest::option::of(0.0f64..1.0),
            max_steps in proptest::option::of(1u32..50),
            subagent in any::<bool>(),
        ) {
            let mut model = named("prop");
            for i in 0..skills {
                model.frontmatter.skills.push(SkillRef::new(format!("s{i}")));
            }
            for _ in 0..hooks {
                model.frontmatter.hooks.push(HookDef::default());
            }
            model.frontmatter.temperature = temperature;
            model.frontmatter.max_steps = max_steps;
            if subagent {
                model.frontmatter.mode = AgentMode::Subagent;
            }
            for platform in Platform::ALL {
                let base = analyze(&model, platform, false).score;
                let mut extended = model.clone();
                extended.contexts.push(ContextRef {
                    path: "extra.md".into(),
                    priority: ContextPriority::Low,
                    description: None,
                });
                let richer = analyze(&extended, platform, false).score;
                prop_assert!(richer <= base, "{platform}: {richer} > {base}");
            }
        }
    }
}
