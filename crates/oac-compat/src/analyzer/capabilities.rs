//! Static per-platform capability declarations.
//!
//! These drive both the compatibility analysis and the `info` reporting;
//! they are compile-time constants, shared read-only.

use crate::adapter::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    MarkdownFrontmatter,
    Json,
    PlainText,
}

impl ConfigFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigFormat::MarkdownFrontmatter => "markdown+frontmatter",
            ConfigFormat::Json => "json",
            ConfigFormat::PlainText => "plain-text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStructure {
    Directory,
    SingleFile,
}

impl OutputStructure {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputStructure::Directory => "directory",
            OutputStructure::SingleFile => "single-file",
        }
    }
}

/// Convertible features a model may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Skills,
    Hooks,
    GranularPermissions,
    Temperature,
    MaxSteps,
    Contexts,
    SubagentMode,
}

impl Feature {
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Skills => "skills",
            Feature::Hooks => "hooks",
            Feature::GranularPermissions => "granular permissions",
            Feature::Temperature => "temperature",
            Feature::MaxSteps => "max steps",
            Feature::Contexts => "contexts",
            Feature::SubagentMode => "subagent mode",
        }
    }
}

#[derive(Debug)]
pub struct PlatformCapabilities {
    pub platform: Platform,
    pub supports_multiple_agents: bool,
    pub supports_skills: bool,
    pub supports_hooks: bool,
    pub supports_granular_permissions: bool,
    pub supports_contexts: bool,
    pub supports_custom_models: bool,
    pub supports_temperature: bool,
    pub supports_max_steps: bool,
    pub config_format: ConfigFormat,
    pub output_structure: OutputStructure,
    /// Conversion refuses nothing, but analysis flags a blocker when the
    /// platform mandates a name and the model has none.
    pub requires_name: bool,
    /// Features that survive only approximately; these classify as
    /// degraded rather than lost, whatever the support flag says.
    pub degraded: &'static [Feature],
    pub notes: &'static [&'static str],
}

impl PlatformCapabilities {
    pub fn supports(&self, feature: Feature) -> bool {
        match feature {
            Feature::Skills => self.supports_skills,
            Feature::Hooks => self.supports_hooks,
            Feature::GranularPermissions => self.supports_granular_permissions,
            Feature::Temperature => self.supports_temperature,
            Feature::MaxSteps => self.supports_max_steps,
            Feature::Contexts => self.supports_contexts,
            Feature::SubagentMode => self.supports_multiple_agents,
        }
    }

    /// Named boolean flags, for reporting and cross-platform comparison.
    pub fn flags(&self) -> [(&'static str, bool); 8] {
        [
            ("multiple agents", self.supports_multiple_agents),
            ("skills", self.supports_skills),
            ("hooks", self.supports_hooks),
            ("granular permissions", self.supports_granular_permissions),
            ("contexts", self.supports_contexts),
            ("custom models", self.supports_custom_models),
            ("temperature", self.supports_temperature),
            ("max steps", self.supports_max_steps),
        ]
    }
}

static OAC: PlatformCapabilities = PlatformCapabilities {
    platform: Platform::Oac,
    supports_multiple_agents: true,
    supports_skills: true,
    supports_hooks: true,
    supports_granular_permissions: true,
    supports_contexts: true,
    supports_custom_models: true,
    supports_temperature: true,
    supports_max_steps: true,
    config_format: ConfigFormat::MarkdownFrontmatter,
    output_structure: OutputStructure::Directory,
    requires_name: false,
    degraded: &[],
    notes: &["native format; every canonical field round-trips"],
};

static CLAUDE: PlatformCapabilities = PlatformCapabilities {
    platform: Platform::Claude,
    supports_multiple_agents: true,
    supports_skills: true,
    supports_hooks: true,
    supports_granular_permissions: false,
    supports_contexts: false,
    supports_custom_models: true,
    supports_temperature: false,
    supports_max_steps: false,
    config_format: ConfigFormat::Json,
    output_structure: OutputStructure::Directory,
    requires_name: true,
    degraded: &[Feature::GranularPermissions, Feature::Contexts],
    notes: &[
        "granular permissions collapse to a single permissionMode",
        "contexts become generated skill directories",
    ],
};

static CURSOR: PlatformCapabilities = PlatformCapabilities {
    platform: Platform::Cursor,
    supports_multiple_agents: false,
    supports_skills: false,
    supports_hooks: false,
    supports_granular_permissions: false,
    supports_contexts: false,
    supports_custom_models: true,
    supports_temperature: false,
    supports_max_steps: false,
    config_format: ConfigFormat::PlainText,
    output_structure: OutputStructure::SingleFile,
    requires_name: false,
    degraded: &[Feature::GranularPermissions, Feature::Contexts],
    notes: &[
        "single .cursorrules file; multiple agents must be merged first",
        "contexts are listed as comments to inline manually",
    ],
};

static WINDSURF: PlatformCapabilities = PlatformCapabilities {
    platform: Platform::Windsurf,
    supports_multiple_agents: true,
    supports_skills: false,
    supports_hooks: false,
    supports_granular_permissions: false,
    supports_contexts: true,
    supports_custom_models: true,
    supports_temperature: false,
    supports_max_steps: false,
    config_format: ConfigFormat::Json,
    output_structure: OutputStructure::Directory,
    requires_name: true,
    degraded: &[
        Feature::Skills,
        Feature::GranularPermissions,
        Feature::Temperature,
        Feature::Contexts,
    ],
    notes: &[
        "temperature reduces to low/medium/high creativity",
        "permissions collapse to booleans; ask becomes deny",
        "context priorities downgrade to two levels",
    ],
};

pub fn capabilities_for(platform: Platform) -> &'static PlatformCapabilities {
    match platform {
        Platform::Oac => &OAC,
        Platform::Claude => &CLAUDE,
        Platform::Cursor => &CURSOR,
        Platform::Windsurf => &WINDSURF,
    }
}
