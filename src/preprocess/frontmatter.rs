//! YAML front matter between `---` delimiters

use serde::Serialize;

/// A front-matter block split off the top of a document.
#[derive(Debug, Clone, Serialize)]
pub struct FrontMatter {
    /// YAML text between the delimiters
    pub raw: String,
    /// Parsed value; `None` when the YAML is invalid
    pub value: Option<serde_yaml::Value>,
    /// Parser message when `value` is `None`
    pub parse_error: Option<String>,
    /// Lines consumed, delimiters included
    pub line_count: usize,
}

impl FrontMatter {
    /// Top-level string value for `key`, if the block parsed to a mapping.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.value.as_ref()?.get(key)?.as_str()
    }

    pub fn get(&self, key: &str) -> Option<&serde_yaml::Value> {
        self.value.as_ref()?.get(key)
    }
}

/// Split `text` (LF line endings) into front matter and body.
///
/// The first line must be exactly `---` and a later line must close the
/// block. Without a closing delimiter the whole text is body.
pub fn split_front_matter(text: &str) -> (Option<(String, usize)>, &str) {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, text);
    };
    if first.trim_end() != "---" {
        return (None, text);
    }

    let mut offset = first.len();
    let mut yaml = String::new();
    let mut consumed = 1;
    for line in lines {
        offset += line.len();
        consumed += 1;
        if line.trim_end() == "---" {
            return (Some((yaml, consumed)), &text[offset..]);
        }
        yaml.push_str(line);
    }
    (None, text)
}

/// Parse front-matter YAML into a data-only value. Tags never construct
/// objects; they surface as `Value::Tagged`.
pub fn parse_yaml(yaml: &str) -> Result<serde_yaml::Value, String> {
    if yaml.trim().is_empty() {
        return Ok(serde_yaml::Value::Null);
    }
    serde_yaml::from_str::<serde_yaml::Value>(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        let text = "---\ntitle: Acme\nversion: 1.0\n---\n# Acme\n";
        let (fm, body) = split_front_matter(text);
        let (yaml, lines) = fm.unwrap();
        assert_eq!(yaml, "title: Acme\nversion: 1.0\n");
        assert_eq!(lines, 4);
        assert_eq!(body, "# Acme\n");
    }

    #[test]
    fn test_unclosed_is_body() {
        let text = "---\ntitle: Acme\n# Acme\n";
        let (fm, body) = split_front_matter(text);
        assert!(fm.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_no_front_matter() {
        let (fm, body) = split_front_matter("# Title\n---\n");
        assert!(fm.is_none());
        assert_eq!(body, "# Title\n---\n");
    }

    #[test]
    fn test_parse_is_data_only() {
        let value = parse_yaml("obj: !Exec [rm, -rf]\n").unwrap();
        assert!(matches!(value.get("obj"), Some(serde_yaml::Value::Tagged(_))));
    }

    #[test]
    fn test_parse_error_reported() {
        assert!(parse_yaml("key: [unclosed\n").is_err());
    }
}
