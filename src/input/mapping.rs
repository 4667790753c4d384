//! Pre-parsed mapping input
//!
//! A mapping must look like:
//!
//! ```text
//! { "title": str, "description"?: str,
//!   "sections": [ { "name": str,
//!                   "links": [ { "title": str, "url": str, "description"?: str } ] } ] }
//! ```
//!
//! Validation happens once here; downstream stages receive typed records.

use super::types::{json_type_name, InputError, InputResult};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct MappedLink {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedSection {
    pub name: String,
    pub links: Vec<MappedLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedDocument {
    pub title: String,
    pub description: Option<String>,
    pub sections: Vec<MappedSection>,
}

pub const REQUIRED_KEYS: [&str; 2] = ["title", "sections"];

fn malformed(key: impl Into<String>, reason: impl Into<String>) -> InputError {
    InputError::MalformedMapping {
        key: key.into(),
        reason: reason.into(),
    }
}

fn require_str(obj: &Map<String, Value>, key: &str, path: &str) -> InputResult<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(malformed(
            format!("{}{}", path, key),
            format!("expected string, found {}", json_type_name(other)),
        )),
        None => Err(malformed(format!("{}{}", path, key), "missing required key")),
    }
}

fn optional_str(obj: &Map<String, Value>, key: &str, path: &str) -> InputResult<Option<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(malformed(
            format!("{}{}", path, key),
            format!("expected string, found {}", json_type_name(other)),
        )),
    }
}

fn require_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> InputResult<&'a Vec<Value>> {
    match obj.get(key) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(malformed(
            format!("{}{}", path, key),
            format!("expected array, found {}", json_type_name(other)),
        )),
        None => Err(malformed(format!("{}{}", path, key), "missing required key")),
    }
}

fn as_object<'a>(value: &'a Value, path: &str) -> InputResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        malformed(
            path.to_string(),
            format!("expected object, found {}", json_type_name(value)),
        )
    })
}

impl MappedDocument {
    /// Validate a raw mapping against the required keys and value types.
    pub fn from_map(map: &Map<String, Value>) -> InputResult<Self> {
        for key in REQUIRED_KEYS {
            if !map.contains_key(key) {
                return Err(malformed(key, "missing required key"));
            }
        }

        let title = require_str(map, "title", "")?;
        let description = optional_str(map, "description", "")?;

        let mut sections = Vec::new();
        for (i, raw_section) in require_array(map, "sections", "")?.iter().enumerate() {
            let section_path = format!("sections[{}]", i);
            let section = as_object(raw_section, &section_path)?;
            let prefix = format!("{}.", section_path);
            let name = require_str(section, "name", &prefix)?;

            let mut links = Vec::new();
            let raw_links = match section.get("links") {
                None => &[][..],
                Some(_) => require_array(section, "links", &prefix)?.as_slice(),
            };
            for (j, raw_link) in raw_links.iter().enumerate() {
                let link_path = format!("{}links[{}]", prefix, j);
                let link = as_object(raw_link, &link_path)?;
                let link_prefix = format!("{}.", link_path);
                links.push(MappedLink {
                    title: require_str(link, "title", &link_prefix)?,
                    url: require_str(link, "url", &link_prefix)?,
                    description: optional_str(link, "description", &link_prefix)?,
                });
            }
            sections.push(MappedSection { name, links });
        }

        Ok(Self {
            title,
            description,
            sections,
        })
    }

    /// Render the mapping as llms.txt markdown.
    ///
    /// Returns the text and, for each section, the 1-indexed line of its
    /// heading followed by the line of each link.
    pub fn render(&self) -> RenderedMapping {
        let mut lines: Vec<String> = Vec::new();
        lines.push(format!("# {}", one_line(&self.title)));
        let title_line = 1;
        let mut description_line = None;
        if let Some(desc) = &self.description {
            lines.push(String::new());
            lines.push(format!("> {}", one_line(desc)));
            description_line = Some(lines.len());
        }

        let mut section_lines = Vec::new();
        for section in &self.sections {
            lines.push(String::new());
            lines.push(format!("## {}", one_line(&section.name)));
            let heading_line = lines.len();
            lines.push(String::new());
            let mut link_lines = Vec::new();
            for link in &section.links {
                let title = one_line(&link.title);
                let url = one_line(&link.url);
                let entry = match &link.description {
                    Some(d) => format!("- [{}]({}): {}", title, url, one_line(d)),
                    None => format!("- [{}]({})", title, url),
                };
                lines.push(entry);
                link_lines.push(lines.len());
            }
            section_lines.push((heading_line, link_lines));
        }

        let mut text = lines.join("\n");
        text.push('\n');
        RenderedMapping {
            text,
            title_line,
            description_line,
            section_lines,
        }
    }
}

/// Collapse internal whitespace, newlines included, so each element renders
/// on exactly one line.
fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Markdown rendering of a mapping with line positions of each element
#[derive(Debug, Clone)]
pub struct RenderedMapping {
    pub text: String,
    pub title_line: usize,
    pub description_line: Option<usize>,
    pub section_lines: Vec<(usize, Vec<usize>)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_mapping() {
        let doc = MappedDocument::from_map(&map(json!({
            "title": "Acme",
            "description": "Acme SDK docs",
            "sections": [
                {"name": "Getting Started", "links": [
                    {"title": "Install", "url": "https://acme.dev/install", "description": "How to install"},
                    {"title": "Auth", "url": "https://acme.dev/auth"}
                ]},
                {"name": "FAQ"}
            ]
        })))
        .unwrap();
        assert_eq!(doc.title, "Acme");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].links[1].description, None);
        assert!(doc.sections[1].links.is_empty());
    }

    #[test]
    fn test_missing_required_key() {
        let err = MappedDocument::from_map(&map(json!({"title": "X"}))).unwrap_err();
        match err {
            InputError::MalformedMapping { key, .. } => assert_eq!(key, "sections"),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn test_wrong_type_reports_path() {
        let err = MappedDocument::from_map(&map(json!({
            "title": "X",
            "sections": [{"name": "A", "links": [{"title": "t", "url": 5}]}]
        })))
        .unwrap_err();
        match err {
            InputError::MalformedMapping { key, reason } => {
                assert_eq!(key, "sections[0].links[0].url");
                assert!(reason.contains("number"));
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn test_render_positions() {
        let doc = MappedDocument {
            title: "Acme".into(),
            description: Some("Docs".into()),
            sections: vec![MappedSection {
                name: "Docs".into(),
                links: vec![MappedLink {
                    title: "A".into(),
                    url: "https://a.dev".into(),
                    description: Some("first".into()),
                }],
            }],
        };
        let rendered = doc.render();
        let lines: Vec<&str> = rendered.text.lines().collect();
        assert_eq!(lines[rendered.title_line - 1], "# Acme");
        assert_eq!(lines[rendered.description_line.unwrap() - 1], "> Docs");
        let (heading, links) = &rendered.section_lines[0];
        assert_eq!(lines[heading - 1], "## Docs");
        assert_eq!(lines[links[0] - 1], "- [A](https://a.dev): first");
    }

    #[test]
    fn test_multiline_strings_keep_line_positions() {
        let doc = MappedDocument::from_map(&map(json!({
            "title": "Acme\nCorp",
            "description": "Rockets\nand more",
            "sections": [ { "name": "Getting\nStarted", "links": [
                { "title": "Home\npage", "url": "https://acme.dev", "description": "Landing\n\npage" },
                { "title": "Docs", "url": "https://acme.dev/docs" }
            ] } ]
        })))
        .unwrap();
        let rendered = doc.render();
        let lines: Vec<&str> = rendered.text.lines().collect();

        assert_eq!(lines[rendered.title_line - 1], "# Acme Corp");
        assert_eq!(lines[rendered.description_line.unwrap() - 1], "> Rockets and more");
        let (heading, links) = &rendered.section_lines[0];
        assert_eq!(lines[heading - 1], "## Getting Started");
        assert_eq!(lines[links[0] - 1], "- [Home page](https://acme.dev): Landing page");
        assert_eq!(lines[links[1] - 1], "- [Docs](https://acme.dev/docs)");
    }
}
