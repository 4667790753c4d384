//! Canonical section names and the alias table used to resolve them

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The 11 standard section names.
///
/// Ten carry a fixed position in the recommended ordering; `Optional` has no
/// position and always belongs last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalSectionName {
    MasterIndex,
    LlmInstructions,
    GettingStarted,
    CoreConcepts,
    ApiReference,
    Examples,
    Configuration,
    AdvancedTopics,
    Troubleshooting,
    Faq,
    Optional,
}

impl CanonicalSectionName {
    pub const ALL: [CanonicalSectionName; 11] = [
        CanonicalSectionName::MasterIndex,
        CanonicalSectionName::LlmInstructions,
        CanonicalSectionName::GettingStarted,
        CanonicalSectionName::CoreConcepts,
        CanonicalSectionName::ApiReference,
        CanonicalSectionName::Examples,
        CanonicalSectionName::Configuration,
        CanonicalSectionName::AdvancedTopics,
        CanonicalSectionName::Troubleshooting,
        CanonicalSectionName::Faq,
        CanonicalSectionName::Optional,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CanonicalSectionName::MasterIndex => "Master Index",
            CanonicalSectionName::LlmInstructions => "LLM Instructions",
            CanonicalSectionName::GettingStarted => "Getting Started",
            CanonicalSectionName::CoreConcepts => "Core Concepts",
            CanonicalSectionName::ApiReference => "API Reference",
            CanonicalSectionName::Examples => "Examples",
            CanonicalSectionName::Configuration => "Configuration",
            CanonicalSectionName::AdvancedTopics => "Advanced Topics",
            CanonicalSectionName::Troubleshooting => "Troubleshooting",
            CanonicalSectionName::Faq => "FAQ",
            CanonicalSectionName::Optional => "Optional",
        }
    }

    /// Position in the canonical sequence (1–10); `None` for `Optional`.
    pub fn order(&self) -> Option<u8> {
        match self {
            CanonicalSectionName::Optional => None,
            other => Some(*other as u8 + 1),
        }
    }

    /// Sort key where `Optional` sorts after every ordered section.
    pub fn sort_key(&self) -> u8 {
        self.order().unwrap_or(u8::MAX)
    }
}

impl fmt::Display for CanonicalSectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Common synonyms mapped to their canonical name. Keys are lowercase.
pub const SECTION_NAME_ALIASES: &[(&str, CanonicalSectionName)] = &[
    ("table of contents", CanonicalSectionName::MasterIndex),
    ("toc", CanonicalSectionName::MasterIndex),
    ("index", CanonicalSectionName::MasterIndex),
    ("docs", CanonicalSectionName::MasterIndex),
    ("documentation", CanonicalSectionName::MasterIndex),
    ("instructions", CanonicalSectionName::LlmInstructions),
    ("agent instructions", CanonicalSectionName::LlmInstructions),
    ("quickstart", CanonicalSectionName::GettingStarted),
    ("quick start", CanonicalSectionName::GettingStarted),
    ("installation", CanonicalSectionName::GettingStarted),
    ("setup", CanonicalSectionName::GettingStarted),
    ("concepts", CanonicalSectionName::CoreConcepts),
    ("key concepts", CanonicalSectionName::CoreConcepts),
    ("fundamentals", CanonicalSectionName::CoreConcepts),
    ("api", CanonicalSectionName::ApiReference),
    ("reference", CanonicalSectionName::ApiReference),
    ("endpoints", CanonicalSectionName::ApiReference),
    ("usage", CanonicalSectionName::Examples),
    ("use cases", CanonicalSectionName::Examples),
    ("tutorials", CanonicalSectionName::Examples),
    ("recipes", CanonicalSectionName::Examples),
    ("config", CanonicalSectionName::Configuration),
    ("settings", CanonicalSectionName::Configuration),
    ("options", CanonicalSectionName::Configuration),
    ("advanced", CanonicalSectionName::AdvancedTopics),
    ("internals", CanonicalSectionName::AdvancedTopics),
    ("debugging", CanonicalSectionName::Troubleshooting),
    ("common issues", CanonicalSectionName::Troubleshooting),
    ("known issues", CanonicalSectionName::Troubleshooting),
    ("frequently asked questions", CanonicalSectionName::Faq),
    ("supplementary", CanonicalSectionName::Optional),
    ("appendix", CanonicalSectionName::Optional),
    ("extras", CanonicalSectionName::Optional),
];

/// Normalize a heading for lookup: lowercase, collapsed whitespace, trailing
/// punctuation and token-estimate annotations removed.
///
/// `"Optional (~800 tokens)"` and `"  API   Reference: "` both normalize to
/// their bare names.
pub fn normalize_section_name(name: &str) -> String {
    let without_annotation = match name.find('(') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    };
    without_annotation
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([':', '.', '-'])
        .trim()
        .to_lowercase()
}

/// Alias table with optional caller-supplied extensions.
#[derive(Debug, Clone, Default)]
pub struct SectionAliases {
    extra: HashMap<String, CanonicalSectionName>,
}

impl SectionAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the built-in table. Extra aliases win over built-ins.
    pub fn with_extra(mut self, extra: &HashMap<String, CanonicalSectionName>) -> Self {
        for (alias, canonical) in extra {
            self.extra
                .insert(normalize_section_name(alias), *canonical);
        }
        self
    }

    /// Resolve a heading to its canonical section, if any.
    pub fn resolve(&self, name: &str) -> Option<CanonicalSectionName> {
        let key = normalize_section_name(name);
        if key.is_empty() {
            return None;
        }
        if let Some(canonical) = self.extra.get(&key) {
            return Some(*canonical);
        }
        if let Some(canonical) = CanonicalSectionName::ALL
            .iter()
            .find(|c| c.display_name().to_lowercase() == key)
        {
            return Some(*canonical);
        }
        SECTION_NAME_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, canonical)| *canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleven_canonical_names() {
        assert_eq!(CanonicalSectionName::ALL.len(), 11);
    }

    #[test]
    fn test_order_covers_one_to_ten() {
        let mut positions: Vec<u8> = CanonicalSectionName::ALL
            .iter()
            .filter_map(|c| c.order())
            .collect();
        positions.sort();
        assert_eq!(positions, (1..=10).collect::<Vec<_>>());
        assert_eq!(CanonicalSectionName::Optional.order(), None);
    }

    #[test]
    fn test_alias_keys_lowercase_and_plentiful() {
        assert!(SECTION_NAME_ALIASES.len() >= 30);
        for (alias, _) in SECTION_NAME_ALIASES {
            assert_eq!(alias.to_lowercase(), *alias);
        }
    }

    #[test]
    fn test_resolve() {
        let aliases = SectionAliases::new();
        assert_eq!(
            aliases.resolve("Quick Start"),
            Some(CanonicalSectionName::GettingStarted)
        );
        assert_eq!(
            aliases.resolve("  api   REFERENCE: "),
            Some(CanonicalSectionName::ApiReference)
        );
        assert_eq!(
            aliases.resolve("Optional (~800 tokens)"),
            Some(CanonicalSectionName::Optional)
        );
        assert_eq!(aliases.resolve("FAQ"), Some(CanonicalSectionName::Faq));
        assert_eq!(aliases.resolve("Miscellany"), None);
        assert_eq!(aliases.resolve(""), None);
    }

    #[test]
    fn test_extra_aliases() {
        let mut extra = HashMap::new();
        extra.insert("Cookbook".to_string(), CanonicalSectionName::Examples);
        let aliases = SectionAliases::new().with_extra(&extra);
        assert_eq!(
            aliases.resolve("cookbook"),
            Some(CanonicalSectionName::Examples)
        );
    }
}
