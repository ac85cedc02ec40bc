//! Naming helpers for path segments derived from user-provided names.

/// Convert a skill name into a directory-name seed: lowercased, whitespace
/// replaced with hyphens.
pub fn skill_seed(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Slug for a context path: basename with the extension stripped,
/// lowercased, every non-alphanumeric run collapsed to a single hyphen.
pub fn context_slug(path: &str) -> String {
    let base = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path);
    let stem = match base.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => base,
    };
    let mut out = String::with_capacity(stem.len());
    let mut last_hyphen = false;
    for ch in stem.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            out.push('-');
            last_hyphen = true;
        }
    }
    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_seed_lowercases_and_hyphenates() {
        assert_eq!(skill_seed("Deep Research"), "deep-research");
        assert_eq!(skill_seed("  code   review "), "code-review");
        assert_eq!(skill_seed("api"), "api");
    }

    #[test]
    fn context_slug_strips_extension_and_path() {
        assert_eq!(context_slug("docs/API Guide.md"), "api-guide");
        assert_eq!(context_slug("./style.rules.txt"), "style-rules");
        assert_eq!(context_slug("README"), "readme");
    }
}
