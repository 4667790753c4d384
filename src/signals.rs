//! Document signals shared by the validator, anti-pattern detector, and scorer
//!
//! Computed once per document so the three stages agree on what counts as
//! formulaic, versioned, empty, or jargon-heavy.

use crate::parser::{ParsedDocument, ParsedSection};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Acronyms common enough to never count as jargon.
const COMMON_ACRONYMS: &[&str] = &[
    "AI", "API", "APIS", "ASCII", "AWS", "CD", "CI", "CLI", "CPU", "CSS", "CSV", "DELETE", "DNS",
    "FAQ", "GET", "GPU", "HTML", "HTTP", "HTTPS", "ID", "IDE", "IDS", "IP", "JSON", "JWT", "LLM",
    "LLMS", "MD", "NPM", "OK", "OS", "PATCH", "PDF", "POST", "PUT", "RAM", "README", "REST", "SDK",
    "SQL", "SSH", "SSL", "TBD", "TCP", "TLS", "TODO", "TXT", "UDP", "UI", "URI", "URL", "URLS",
    "USB", "UTF", "UX", "XML", "YAML",
];

/// Body text that counts as "no content".
const PLACEHOLDERS: &[&str] = &[
    "todo",
    "tbd",
    "tba",
    "wip",
    "coming soon",
    "placeholder",
    "to be added",
    "to be written",
    "content goes here",
    "under construction",
    "...",
    "n/a",
];

/// Front-matter keys that carry version or freshness metadata.
const VERSION_KEYS: &[&str] = &[
    "version",
    "schema_version",
    "last_updated",
    "last-updated",
    "updated",
    "date",
    "last_modified",
];

/// A description template shared by too many links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormulaicPattern {
    pub template: String,
    pub matches: usize,
    pub total: usize,
}

/// Acronym usage outside code blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AcronymUsage {
    pub used: BTreeSet<String>,
    pub defined: BTreeSet<String>,
}

impl AcronymUsage {
    pub fn undefined(&self) -> Vec<&str> {
        self.used
            .difference(&self.defined)
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentSignals {
    pub non_whitespace_chars: usize,
    pub has_version_metadata: bool,
    pub formulaic: Option<FormulaicPattern>,
    /// Indices of sections with no meaningful body
    pub empty_sections: Vec<usize>,
    /// First canonical section that sorts before an earlier one
    pub out_of_order: Option<usize>,
    pub acronyms: AcronymUsage,
}

impl DocumentSignals {
    pub fn compute(doc: &ParsedDocument) -> Self {
        Self {
            non_whitespace_chars: doc.raw_content.chars().filter(|c| !c.is_whitespace()).count(),
            has_version_metadata: has_version_metadata(doc),
            formulaic: formulaic_pattern(doc),
            empty_sections: doc
                .sections
                .iter()
                .enumerate()
                .filter(|(_, s)| is_empty_section(s))
                .map(|(i, _)| i)
                .collect(),
            out_of_order: first_out_of_order(doc),
            acronyms: acronym_usage(&doc.raw_content),
        }
    }
}

/// Index of the first canonical section whose position precedes the highest
/// position seen so far. Non-canonical sections are skipped.
pub fn first_out_of_order(doc: &ParsedDocument) -> Option<usize> {
    let mut highest = 0u8;
    for (i, section) in doc.sections.iter().enumerate() {
        if let Some(canonical) = section.canonical {
            let key = canonical.sort_key();
            if key < highest {
                return Some(i);
            }
            highest = key;
        }
    }
    None
}

/// Lines outside fenced code blocks.
pub fn prose_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut in_fence = false;
    text.lines().filter(move |line| {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            return false;
        }
        !in_fence
    })
}

/// Section body with nothing but whitespace or placeholder text.
pub fn is_empty_section(section: &ParsedSection) -> bool {
    let text = section
        .body()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        return true;
    }
    let normalized = text
        .to_lowercase()
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '.' && c != '/')
        .trim()
        .to_string();
    PLACEHOLDERS.contains(&normalized.as_str()) || normalized.starts_with("lorem ipsum")
}

fn contains_iso_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.windows(10).enumerate().any(|(i, w)| {
        let digits = |r: std::ops::Range<usize>| w[r].iter().all(u8::is_ascii_digit);
        digits(0..4)
            && w[4] == b'-'
            && digits(5..7)
            && w[7] == b'-'
            && digits(8..10)
            && (i == 0 || !bytes[i - 1].is_ascii_digit())
            && bytes.get(i + 10).map_or(true, |b| !b.is_ascii_digit())
    })
}

/// Version or last-updated markers in front matter or prose.
pub fn has_version_metadata(doc: &ParsedDocument) -> bool {
    if let Some(fm) = &doc.front_matter {
        if VERSION_KEYS.iter().any(|k| fm.get(*k).is_some()) {
            return true;
        }
        if let Some(metadata) = fm.get("metadata") {
            if VERSION_KEYS.iter().any(|k| metadata.get(*k).is_some()) {
                return true;
            }
        }
    }
    let lower = doc.raw_content.to_lowercase();
    let marker = ["last updated", "last-updated", "updated:", "version:", "schema_version"]
        .iter()
        .any(|m| lower.contains(m));
    let version_number = lower.match_indices("version ").any(|(i, m)| {
        lower[i + m.len()..]
            .trim_start_matches('v')
            .starts_with(|c: char| c.is_ascii_digit())
    });
    marker || version_number || contains_iso_date(&doc.raw_content)
}

/// Template key: the first three words, lowercased, punctuation stripped.
fn description_template(description: &str) -> String {
    description
        .split_whitespace()
        .take(3)
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// With three or more descriptions, a template covering at least half.
pub fn formulaic_pattern(doc: &ParsedDocument) -> Option<FormulaicPattern> {
    let descriptions: Vec<&str> = doc.links().filter_map(|l| l.description.as_deref()).collect();
    if descriptions.len() < 3 {
        return None;
    }
    let mut counts: HashMap<String, usize> = HashMap::new();
    for d in &descriptions {
        *counts.entry(description_template(d)).or_default() += 1;
    }
    let (template, matches) = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))?;
    (matches > 1 && matches * 2 >= descriptions.len()).then(|| FormulaicPattern {
        template,
        matches,
        total: descriptions.len(),
    })
}

/// Uppercase words of 2–6 letters that are not common acronyms, and which of
/// them are defined inline (`Term (ABC)`, `ABC (term)`, `ABC stands for`,
/// `ABC means`, `ABC:`).
pub fn acronym_usage(text: &str) -> AcronymUsage {
    let prose: String = prose_lines(text).collect::<Vec<_>>().join("\n");
    let mut usage = AcronymUsage::default();

    for word in prose.split(|c: char| !c.is_ascii_alphanumeric()) {
        let len = word.len();
        if (2..=6).contains(&len)
            && word.chars().all(|c| c.is_ascii_uppercase())
            && !COMMON_ACRONYMS.contains(&word)
        {
            usage.used.insert(word.to_string());
        }
    }

    for acronym in &usage.used {
        let defined = [
            format!("({})", acronym),
            format!("{} (", acronym),
            format!("{} stands for", acronym),
            format!("{} means", acronym),
            format!("{}:", acronym),
        ]
        .iter()
        .any(|pattern| prose.contains(pattern.as_str()));
        if defined {
            usage.defined.insert(acronym.clone());
        }
    }
    usage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DocumentParser;
    use crate::preprocess::Preprocessor;

    fn doc(text: &str) -> ParsedDocument {
        let pre = Preprocessor::default().run_text(text).unwrap();
        DocumentParser::new().parse_preprocessed(&pre)
    }

    #[test]
    fn test_version_markers() {
        assert!(has_version_metadata(&doc("# T\n\nLast updated: 2026-02-06\n")));
        assert!(has_version_metadata(&doc("# T\n\nCovers version 3.2 of the SDK.\n")));
        assert!(has_version_metadata(&doc("---\nversion: 1.0.0\n---\n# T\n")));
        assert!(has_version_metadata(&doc("# T\n\nReleased 2025-11-30.\n")));
        assert!(!has_version_metadata(&doc("# T\n\nNo dates here, see page 12345678901.\n")));
    }

    #[test]
    fn test_formulaic_descriptions() {
        let text = "# T\n\n## Docs\n\n\
            - [A](https://a.dev): Learn more about A\n\
            - [B](https://b.dev): Learn more about B\n\
            - [C](https://c.dev): Configure the C client\n";
        let pattern = formulaic_pattern(&doc(text)).unwrap();
        assert_eq!(pattern.template, "learn more about");
        assert_eq!((pattern.matches, pattern.total), (2, 3));

        let varied = "# T\n\n## Docs\n\n\
            - [A](https://a.dev): Install the SDK\n\
            - [B](https://b.dev): Authenticate requests\n\
            - [C](https://c.dev): Handle rate limits\n";
        assert!(formulaic_pattern(&doc(varied)).is_none());
    }

    #[test]
    fn test_empty_sections() {
        let d = doc("# T\n\n## Docs\n\nTODO\n\n## FAQ\n\n## Guides\n\n- [A](https://a.dev)\n");
        let signals = DocumentSignals::compute(&d);
        assert_eq!(signals.empty_sections, vec![0, 1]);
    }

    #[test]
    fn test_out_of_order() {
        let d = doc("# T\n\n## Master Index\n\n## FAQ\n\n## Custom\n\n## Examples\n\n## Optional\n");
        assert_eq!(first_out_of_order(&d), Some(3));

        let d = doc("# T\n\n## Master Index\n\n## Examples\n\n## Optional\n");
        assert_eq!(first_out_of_order(&d), None);
    }

    #[test]
    fn test_acronyms() {
        let usage = acronym_usage(
            "Uses the API and the CRDT engine. Role-based access control (RBAC) applies.\n\
             ```\nIGNORED CODE\n```\n",
        );
        assert_eq!(usage.used.iter().map(String::as_str).collect::<Vec<_>>(), vec!["CRDT", "RBAC"]);
        assert_eq!(usage.undefined(), vec!["CRDT"]);
    }

    #[test]
    fn test_iso_date() {
        assert!(contains_iso_date("on 2024-01-31"));
        assert!(!contains_iso_date("2024-1-31"));
        assert!(!contains_iso_date("12024-01-311"));
    }
}
