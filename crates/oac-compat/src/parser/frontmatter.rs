//! Simplified frontmatter parser shared by the markdown-based dialects.
//!
//! This is deliberately not YAML: each line is a flat `key: value` pair,
//! values are coerced opportunistically (numbers, booleans, bracket lists)
//! and anything else stays text. Repeated keys are preserved in order so
//! dialects can use line-per-entry fields (`context:`, `hook:`).

use crate::error::{ConvertError, Result};

/// A coerced frontmatter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
}

impl ScalarValue {
    /// Render the value back to a display string (lists join with ", ").
    pub fn to_text(&self) -> String {
        match self {
            ScalarValue::Text(s) => s.clone(),
            ScalarValue::Number(n) => format_number(*n),
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::List(items) => items.join(", "),
        }
    }

    /// Interpret as a list: bracket lists verbatim, text split on commas
    /// and whitespace.
    pub fn to_list(&self) -> Vec<String> {
        match self {
            ScalarValue::List(items) => items.clone(),
            ScalarValue::Text(s) => s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.trim().is_empty())
                .map(|t| t.trim().to_string())
                .collect(),
            other => vec![other.to_text()],
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Parsed frontmatter block: ordered `(key, value)` entries.
#[derive(Debug, Clone, Default)]
pub struct RawFrontmatter {
    entries: Vec<(String, ScalarValue)>,
}

impl RawFrontmatter {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&ScalarValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// All values for `key`, in input order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a ScalarValue> {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// All entries whose key starts with `prefix`, yielding the remainder
    /// of the key. Used for dotted keys like `permission.<tool>`.
    pub fn with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a ScalarValue)> {
        self.entries.iter().filter_map(move |(k, v)| {
            k.strip_prefix(prefix).map(|rest| (rest, v))
        })
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(ScalarValue::to_text)
    }

    /// Typed extraction: present-but-non-numeric is an error, not a silent
    /// string.
    pub fn number(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(ScalarValue::Number(n)) => Ok(Some(*n)),
            Some(_) => Err(ConvertError::FieldType {
                key: key.to_string(),
                expected: "number",
            }),
        }
    }

    pub fn integer(&self, key: &str) -> Result<Option<u32>> {
        match self.number(key)? {
            None => Ok(None),
            Some(n) if n.fract() == 0.0 && n >= 0.0 => Ok(Some(n as u32)),
            Some(_) => Err(ConvertError::FieldType {
                key: key.to_string(),
                expected: "non-negative integer",
            }),
        }
    }

    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(ScalarValue::to_list)
    }
}

/// Split a markdown document into `(frontmatter, body)`.
///
/// Frontmatter is the content between the first two lines consisting solely
/// of `---`. Without an opening delimiter (or a closing one) the entire
/// input is the body and the frontmatter is empty.
pub fn split_document(source: &str) -> (RawFrontmatter, String) {
    let mut lines = source.lines().enumerate();
    let opening = lines.by_ref().find(|(_, l)| !l.trim().is_empty());
    let Some((start_idx, first_line)) = opening else {
        return (RawFrontmatter::default(), String::new());
    };
    if first_line.trim() != "---" {
        return (RawFrontmatter::default(), source.trim().to_string());
    }

    let mut fm_end = None;
    let mut fm_buf = String::new();
    for (i, l) in source.lines().enumerate().skip(start_idx + 1) {
        if l.trim() == "---" {
            fm_end = Some(i);
            break;
        }
        fm_buf.push_str(l);
        fm_buf.push('\n');
    }
    let Some(fm_end_idx) = fm_end else {
        // Unterminated fence: treat the whole input as body.
        return (RawFrontmatter::default(), source.trim().to_string());
    };

    let body = source
        .lines()
        .skip(fm_end_idx + 1)
        .collect::<Vec<&str>>()
        .join("\n");
    (parse_block(&fm_buf), body.trim().to_string())
}

/// Parse a frontmatter block into ordered key/value entries.
pub fn parse_block(block: &str) -> RawFrontmatter {
    let mut entries = Vec::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            tracing::debug!("skipping frontmatter line without ':': {line}");
            continue;
        };
        entries.push((key.trim().to_string(), coerce(value.trim())));
    }
    RawFrontmatter { entries }
}

/// Coerce a raw token: strip one layer of quotes, then try bracket list,
/// boolean, and number before falling back to text.
pub fn coerce(raw: &str) -> ScalarValue {
    let token = strip_quotes(raw);
    if let Some(inner) = token
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        let items: Vec<String> = inner
            .split(',')
            .map(|t| strip_quotes(t.trim()).to_string())
            .filter(|t| !t.is_empty())
            .collect();
        return ScalarValue::List(items);
    }
    match token {
        "true" => return ScalarValue::Bool(true),
        "false" => return ScalarValue::Bool(false),
        _ => {}
    }
    if !token.is_empty()
        && token.chars().next().is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '.')
        && let Ok(n) = token.parse::<f64>()
    {
        return ScalarValue::Number(n);
    }
    ScalarValue::Text(token.to_string())
}

fn strip_quotes(token: &str) -> &str {
    let t = token.trim();
    for q in ['"', '\''] {
        if t.len() >= 2 && t.starts_with(q) && t.ends_with(q) {
            return &t[1..t.len() - 1];
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_fenced_frontmatter() {
        let src = "---\nname: Reviewer\ntemperature: 0.7\n---\nYou review code.\n";
        let (fm, body) = split_document(src);
        assert_eq!(fm.text("name").as_deref(), Some("Reviewer"));
        assert_eq!(fm.number("temperature").unwrap(), Some(0.7));
        assert_eq!(body, "You review code.");
    }

    #[test]
    fn missing_fence_means_everything_is_body() {
        let (fm, body) = split_document("You are a helpful assistant.");
        assert!(fm.is_empty());
        assert_eq!(body, "You are a helpful assistant.");
    }

    #[test]
    fn unterminated_fence_is_body() {
        let (fm, body) = split_document("---\nname: x\nno closing fence");
        assert!(fm.is_empty());
        assert!(body.contains("no closing fence"));
    }

    #[test]
    fn coercion_rules() {
        assert_eq!(coerce("0.8"), ScalarValue::Number(0.8));
        assert_eq!(coerce("true"), ScalarValue::Bool(true));
        assert_eq!(coerce("\"quoted\""), ScalarValue::Text("quoted".into()));
        assert_eq!(
            coerce("[read, write]"),
            ScalarValue::List(vec!["read".into(), "write".into()])
        );
        // Not numeric-looking: stays text.
        assert_eq!(coerce("4chan"), ScalarValue::Text("4chan".into()));
        assert_eq!(coerce("v2"), ScalarValue::Text("v2".into()));
    }

    #[test]
    fn typed_extraction_errors_on_wrong_shape() {
        let fm = parse_block("temperature: hot\n");
        assert!(matches!(
            fm.number("temperature"),
            Err(crate::error::ConvertError::FieldType { .. })
        ));
    }

    #[test]
    fn repeated_keys_keep_order() {
        let fm = parse_block("context: a.md | high\ncontext: b.md | low\n");
        let all: Vec<String> = fm.get_all("context").map(ScalarValue::to_text).collect();
        assert_eq!(all, vec!["a.md | high", "b.md | low"]);
    }
}
