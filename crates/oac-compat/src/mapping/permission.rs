//! Permission-degradation policies.
//!
//! Both collapses are one-way lossy: granular per-path rules are never
//! reconstructed on a reverse trip.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::model::{PermissionRule, PermissionScalar};

/// Claude's whole-agent permission mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionMode {
    BypassPermissions,
    DontAsk,
    Default,
}

impl PermissionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionMode::BypassPermissions => "bypassPermissions",
            PermissionMode::DontAsk => "dontAsk",
            PermissionMode::Default => "default",
        }
    }
}

/// Collapse the full permission set to a single Claude mode.
///
/// Nested rules force `default` with a degradation warning. All-allow and
/// all-deny map to the two blanket modes; any `ask` means `default`
/// without a warning; a mixed allow/deny set degrades to `default` with
/// one.
pub fn collapse_to_mode(
    permissions: &BTreeMap<String, PermissionRule>,
) -> (Option<PermissionMode>, Vec<String>) {
    if permissions.is_empty() {
        return (None, Vec::new());
    }
    if permissions.values().any(PermissionRule::is_granular) {
        return (
            Some(PermissionMode::Default),
            vec![
                "granular per-path permissions are not supported by Claude; \
                 collapsed to permissionMode 'default'"
                    .to_string(),
            ],
        );
    }
    let scalars: Vec<PermissionScalar> = permissions
        .values()
        .map(|rule| match rule {
            PermissionRule::Scalar(s) => *s,
            PermissionRule::PerPath(_) => unreachable!("granular handled above"),
        })
        .collect();
    if scalars.iter().all(|s| *s == PermissionScalar::Allow) {
        return (Some(PermissionMode::BypassPermissions), Vec::new());
    }
    if scalars.iter().all(|s| *s == PermissionScalar::Deny) {
        return (Some(PermissionMode::DontAsk), Vec::new());
    }
    if scalars.iter().any(|s| *s == PermissionScalar::Ask) {
        return (Some(PermissionMode::Default), Vec::new());
    }
    (
        Some(PermissionMode::Default),
        vec![
            "mixed allow/deny permissions collapsed to permissionMode 'default'".to_string(),
        ],
    )
}

/// Collapse each rule to Windsurf's binary form.
///
/// `ask` is treated as deny for safety, never as allow, and each such
/// entry gets its own warning. A nested rule becomes `true` only if any of
/// its per-path scalars is `allow` (best-effort heuristic; defaults to
/// `false`).
pub fn collapse_to_binary(
    permissions: &BTreeMap<String, PermissionRule>,
) -> (BTreeMap<String, bool>, Vec<String>) {
    let mut out = BTreeMap::new();
    let mut warnings = Vec::new();
    for (key, rule) in permissions {
        let flag = match rule {
            PermissionRule::Scalar(PermissionScalar::Allow) => true,
            PermissionRule::Scalar(PermissionScalar::Deny) => false,
            PermissionRule::Scalar(PermissionScalar::Ask) => {
                warnings.push(format!(
                    "permission '{key}': 'ask' is not representable in Windsurf; treated as deny"
                ));
                false
            }
            PermissionRule::PerPath(rules) => rules
                .values()
                .any(|scalar| *scalar == PermissionScalar::Allow),
        };
        out.insert(key.clone(), flag);
    }
    (out, warnings)
}

/// Parse a JSON `permissions`/`permission` value into canonical rules.
///
/// Scalar entries accept allow/deny/ask strings and booleans; object
/// entries become per-path rule sets. Unparseable entries are skipped with
/// a debug note (structure errors elsewhere in the document still fail the
/// conversion).
pub fn rules_from_json(value: &Value) -> BTreeMap<String, PermissionRule> {
    let mut out = BTreeMap::new();
    let Value::Object(map) = value else {
        tracing::debug!("ignoring permissions value of unexpected shape: {value}");
        return out;
    };
    for (key, entry) in map {
        match entry {
            Value::Object(rules) => {
                let mut per_path = BTreeMap::new();
                for (pattern, v) in rules {
                    if let Some(scalar) = scalar_from_json(v) {
                        per_path.insert(pattern.clone(), scalar);
                    } else {
                        tracing::debug!("skipping unparseable permission rule {key}/{pattern}");
                    }
                }
                out.insert(key.clone(), PermissionRule::PerPath(per_path));
            }
            other => {
                if let Some(scalar) = scalar_from_json(other) {
                    out.insert(key.clone(), PermissionRule::Scalar(scalar));
                } else {
                    tracing::debug!("skipping unparseable permission entry '{key}'");
                }
            }
        }
    }
    out
}

fn scalar_from_json(value: &Value) -> Option<PermissionScalar> {
    match value {
        Value::Bool(true) => Some(PermissionScalar::Allow),
        Value::Bool(false) => Some(PermissionScalar::Deny),
        Value::String(s) => PermissionScalar::parse(s),
        _ => None,
    }
}
