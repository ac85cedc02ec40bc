//! Context-priority downgrade (4-level canonical -> 2-level Windsurf).

use crate::model::ContextPriority;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindsurfPriority {
    High,
    Low,
}

impl WindsurfPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            WindsurfPriority::High => "high",
            WindsurfPriority::Low => "low",
        }
    }
}

pub fn downgrade(priority: ContextPriority) -> WindsurfPriority {
    match priority {
        ContextPriority::Critical | ContextPriority::High => WindsurfPriority::High,
        ContextPriority::Medium | ContextPriority::Low => WindsurfPriority::Low,
    }
}
