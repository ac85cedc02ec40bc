//! Per-platform bidirectional model-ID tables.
//!
//! Tables are built once at first use and shared read-only across all
//! conversion calls. Lookup keys are lowercased. Unknown-token policy
//! differs per direction and per adapter, so the fallbacks live here as
//! constants and the adapters decide when to apply them.

use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Debug, Default)]
pub struct ModelTable {
    to_platform: HashMap<String, String>,
    to_canonical: HashMap<String, String>,
}

impl ModelTable {
    /// Build from `(canonical, platform)` pairs plus extra inbound aliases
    /// `(token, canonical)`. Canonical IDs always map to themselves on the
    /// way in.
    fn build(pairs: &[(&str, &str)], aliases: &[(&str, &str)]) -> Self {
        let mut table = ModelTable::default();
        for (canonical, platform) in pairs {
            table
                .to_platform
                .insert((*canonical).to_string(), (*platform).to_string());
            table
                .to_canonical
                .insert(platform.to_ascii_lowercase(), (*canonical).to_string());
            table
                .to_canonical
                .insert(canonical.to_ascii_lowercase(), (*canonical).to_string());
        }
        for (token, canonical) in aliases {
            table
                .to_canonical
                .insert(token.to_ascii_lowercase(), (*canonical).to_string());
        }
        table
    }

    /// Platform token -> canonical ID, if known.
    pub fn canonicalize(&self, token: &str) -> Option<&str> {
        self.to_canonical
            .get(&token.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Canonical ID -> platform token, if known.
    pub fn platform_id(&self, canonical: &str) -> Option<&str> {
        self.to_platform.get(canonical).map(String::as_str)
    }
}

pub static CLAUDE_MODELS: Lazy<ModelTable> = Lazy::new(|| {
    ModelTable::build(
        &[
            ("claude-sonnet-4", "claude-sonnet-4-20250514"),
            ("claude-opus-4", "claude-opus-4-20250514"),
            ("claude-haiku-3.5", "claude-3-5-haiku-20241022"),
        ],
        &[
            ("sonnet", "claude-sonnet-4"),
            ("opus", "claude-opus-4"),
            ("haiku", "claude-haiku-3.5"),
        ],
    )
});

pub static CURSOR_MODELS: Lazy<ModelTable> = Lazy::new(|| {
    ModelTable::build(
        &[
            ("claude-opus-3", "claude-3-opus"),
            ("claude-sonnet-3.5", "claude-3.5-sonnet"),
            ("claude-sonnet-4", "claude-4-sonnet"),
            ("gpt-4", "gpt-4"),
        ],
        &[],
    )
});

pub static WINDSURF_MODELS: Lazy<ModelTable> = Lazy::new(|| {
    ModelTable::build(
        &[
            ("claude-opus-4", "claude-4-opus"),
            ("claude-sonnet-4", "claude-4-sonnet"),
            ("claude-haiku-3.5", "claude-3.5-haiku"),
        ],
        &[],
    )
});

/// Outbound defaults for models the target table does not know.
pub const CLAUDE_MODEL_FALLBACK: &str = "sonnet";
pub const CURSOR_MODEL_FALLBACK: &str = "gpt-4";
pub const WINDSURF_MODEL_FALLBACK: &str = "claude-4-sonnet";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claude_alias_maps_to_canonical() {
        assert_eq!(CLAUDE_MODELS.canonicalize("opus"), Some("claude-opus-4"));
        assert_eq!(
            CLAUDE_MODELS.canonicalize("claude-sonnet-4-20250514"),
            Some("claude-sonnet-4")
        );
        // Canonical IDs are stable on the way in.
        assert_eq!(
            CLAUDE_MODELS.canonicalize("claude-opus-4"),
            Some("claude-opus-4")
        );
    }

    #[test]
    fn unknown_tokens_are_not_invented() {
        assert_eq!(CLAUDE_MODELS.canonicalize("gpt-9"), None);
        assert_eq!(CURSOR_MODELS.platform_id("claude-opus-9"), None);
    }

    #[test]
    fn windsurf_platform_ids() {
        assert_eq!(
            WINDSURF_MODELS.platform_id("claude-opus-4"),
            Some("claude-4-opus")
        );
        assert_eq!(
            WINDSURF_MODELS.canonicalize("claude-4-sonnet"),
            Some("claude-sonnet-4")
        );
    }
}
