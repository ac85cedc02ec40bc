//! Canonical agent model shared by all format adapters.

mod naming;
mod types;

pub use naming::{context_slug, skill_seed};
pub use types::{
    AgentMode, AgentModel, ContextPriority, ContextRef, Frontmatter, HookDef, Metadata,
    PermissionRule, PermissionScalar, SkillRef,
};
