//! Tool-representation normalization.
//!
//! Sources declare tools either as an array of names (each implies
//! enabled) or as a name -> bool object. Canonical form is a lowercased
//! name -> bool map.

use std::collections::BTreeMap;

use serde_json::Value;

/// Normalize a JSON `tools` value. Unrecognized shapes are ignored with a
/// debug note rather than failing the conversion.
pub fn tools_from_json(value: &Value) -> BTreeMap<String, bool> {
    let mut out = BTreeMap::new();
    match value {
        Value::Array(items) => {
            for item in items {
                if let Value::String(name) = item {
                    out.insert(name.to_ascii_lowercase(), true);
                }
            }
        }
        Value::Object(map) => {
            for (name, enabled) in map {
                if let Value::Bool(b) = enabled {
                    out.insert(name.to_ascii_lowercase(), *b);
                } else {
                    tracing::debug!("ignoring non-boolean tool entry '{name}'");
                }
            }
        }
        other => {
            tracing::debug!("ignoring tools value of unexpected shape: {other}");
        }
    }
    out
}

/// Normalize a list of tool names (array entries imply enabled).
pub fn tools_from_list<I, S>(names: I) -> BTreeMap<String, bool>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| (n.as_ref().trim().to_ascii_lowercase(), true))
        .collect()
}

/// Enabled tool names, input (sorted-map) order.
pub fn enabled_names(tools: &BTreeMap<String, bool>) -> Vec<String> {
    tools
        .iter()
        .filter(|(_, enabled)| **enabled)
        .map(|(name, _)| name.clone())
        .collect()
}

/// Claude's native representation: enabled tools only, first letter
/// capitalized.
pub fn claude_tool_list(tools: &BTreeMap<String, bool>) -> Vec<String> {
    enabled_names(tools)
        .into_iter()
        .map(|name| capitalize(&name))
        .collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_entries_imply_enabled() {
        let tools = tools_from_json(&json!(["Read", "write"]));
        assert_eq!(tools.get("read"), Some(&true));
        assert_eq!(tools.get("write"), Some(&true));
    }

    #[test]
    fn object_entries_keep_flags() {
        let tools = tools_from_json(&json!({"Read": true, "bash": false}));
        assert_eq!(tools.get("read"), Some(&true));
        assert_eq!(tools.get("bash"), Some(&false));
    }

    #[test]
    fn claude_list_capitalizes_enabled_only() {
        let tools = tools_from_json(&json!({"read": true, "bash": false, "web_search": true}));
        assert_eq!(claude_tool_list(&tools), vec!["Read", "Web_search"]);
    }
}
