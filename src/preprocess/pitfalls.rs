//! Front-matter pitfall detection and repair
//!
//! Two YAML hazards are reported as advisories:
//! - duplicate top-level keys (later value silently wins in most loaders)
//! - bare words that YAML 1.1 reads as booleans or null (`no`, `on`, `~`)
//!
//! Neither removes anything from the source. Duplicates are repaired only in
//! the copy handed to the YAML parser, keeping the last occurrence.

use serde::Serialize;
use std::collections::HashMap;

/// Bare scalars whose type depends on the YAML dialect.
pub const AMBIGUOUS_SCALARS: &[&str] = &[
    "yes", "no", "on", "off", "y", "n", "null", "nil", "~",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    DuplicateKey,
    AmbiguousScalar,
    FrontMatterParseError,
}

/// A non-gating note about the front matter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    /// 1-indexed source line
    pub line: usize,
    pub key: Option<String>,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Top-level `key:` at column zero, or `None`.
fn top_level_key(line: &str) -> Option<&str> {
    if line.starts_with([' ', '\t', '#', '-']) {
        return None;
    }
    let colon = line.find(':')?;
    let key = line[..colon].trim().trim_matches(['"', '\'']);
    (!key.is_empty()).then_some(key)
}

/// `key: value` or `- value` on any line; returns (key, value).
fn scalar_entry(line: &str) -> Option<(Option<&str>, &str)> {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return None;
    }
    if let Some(item) = trimmed.strip_prefix("- ") {
        if !item.contains(": ") {
            return Some((None, item.trim()));
        }
        let colon = item.find(": ")?;
        return Some((Some(item[..colon].trim()), item[colon + 2..].trim()));
    }
    let colon = trimmed.find(':')?;
    let value = trimmed[colon + 1..].trim();
    Some((Some(trimmed[..colon].trim()), value))
}

/// Scan front-matter YAML. `first_line` is the source line of the first
/// YAML line (after the opening delimiter).
pub fn scan(yaml: &str, first_line: usize) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (i, line) in yaml.lines().enumerate() {
        let line_no = first_line + i;

        if let Some(key) = top_level_key(line) {
            if let Some(first) = seen.get(key) {
                advisories.push(Advisory {
                    kind: AdvisoryKind::DuplicateKey,
                    line: line_no,
                    key: Some(key.to_string()),
                    message: format!(
                        "Duplicate front-matter key '{}' (first defined on line {})",
                        key, first
                    ),
                    suggestion: Some(format!("Keep a single '{}' entry", key)),
                });
            } else {
                seen.insert(key, line_no);
            }
        }

        if let Some((key, value)) = scalar_entry(line) {
            let bare = value.split(" #").next().unwrap_or(value).trim();
            if AMBIGUOUS_SCALARS.contains(&bare.to_ascii_lowercase().as_str()) {
                advisories.push(Advisory {
                    kind: AdvisoryKind::AmbiguousScalar,
                    line: line_no,
                    key: key.map(str::to_string),
                    message: format!("Unquoted '{}' may be read as a boolean or null", bare),
                    suggestion: Some(format!("Quote the value: \"{}\"", bare)),
                });
            }
        }
    }

    advisories
}

/// Copy of `yaml` with earlier duplicate top-level entries removed. Returns
/// `None` when there is nothing to repair.
pub fn dedupe_top_level(yaml: &str) -> Option<String> {
    // Each top-level entry spans its key line plus indented continuation lines.
    let mut blocks: Vec<(Option<&str>, Vec<&str>)> = Vec::new();
    for line in yaml.lines() {
        match top_level_key(line) {
            Some(key) => blocks.push((Some(key), vec![line])),
            None => match blocks.last_mut() {
                Some((_, body)) => body.push(line),
                None => blocks.push((None, vec![line])),
            },
        }
    }

    let mut last_index: HashMap<&str, usize> = HashMap::new();
    for (i, (key, _)) in blocks.iter().enumerate() {
        if let Some(k) = key {
            last_index.insert(*k, i);
        }
    }
    let keyed = blocks.iter().filter(|(k, _)| k.is_some()).count();
    if last_index.len() == keyed {
        return None;
    }

    let mut out = String::new();
    for (i, (key, body)) in blocks.iter().enumerate() {
        if let Some(k) = key {
            if last_index.get(k) != Some(&i) {
                continue;
            }
        }
        for line in body {
            out.push_str(line);
            out.push('\n');
        }
    }
    Some(out)
}
