//! Anti-pattern registry
//!
//! 22 named patterns in four categories. Each entry maps to one automated
//! `CHECK-NNN` detection rule.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AntiPatternCategory {
    /// Prevents consumption entirely; caps the composite score
    Critical,
    /// Breaks navigation
    Structural,
    /// Degrades quality
    Content,
    /// Undermines long-term value
    Strategic,
}

impl AntiPatternCategory {
    pub const ALL: [AntiPatternCategory; 4] = [
        AntiPatternCategory::Critical,
        AntiPatternCategory::Structural,
        AntiPatternCategory::Content,
        AntiPatternCategory::Strategic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AntiPatternCategory::Critical => "critical",
            AntiPatternCategory::Structural => "structural",
            AntiPatternCategory::Content => "content",
            AntiPatternCategory::Strategic => "strategic",
        }
    }
}

impl fmt::Display for AntiPatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AntiPatternId {
    #[serde(rename = "AP-CRIT-001")]
    GhostFile,
    #[serde(rename = "AP-CRIT-002")]
    StructureChaos,
    #[serde(rename = "AP-CRIT-003")]
    EncodingDisaster,
    #[serde(rename = "AP-CRIT-004")]
    LinkVoid,
    #[serde(rename = "AP-STRUCT-001")]
    SitemapDump,
    #[serde(rename = "AP-STRUCT-002")]
    OrphanedSections,
    #[serde(rename = "AP-STRUCT-003")]
    DuplicateIdentity,
    #[serde(rename = "AP-STRUCT-004")]
    SectionShuffle,
    #[serde(rename = "AP-STRUCT-005")]
    NamingNebula,
    #[serde(rename = "AP-CONT-001")]
    CopyPastePlague,
    #[serde(rename = "AP-CONT-002")]
    BlankCanvas,
    #[serde(rename = "AP-CONT-003")]
    JargonJungle,
    #[serde(rename = "AP-CONT-004")]
    LinkDesert,
    #[serde(rename = "AP-CONT-005")]
    OutdatedOracle,
    #[serde(rename = "AP-CONT-006")]
    ExampleVoid,
    #[serde(rename = "AP-CONT-007")]
    FormulaicDescription,
    #[serde(rename = "AP-CONT-008")]
    SilentAgent,
    #[serde(rename = "AP-CONT-009")]
    VersionlessDrift,
    #[serde(rename = "AP-STRAT-001")]
    AutomationObsession,
    #[serde(rename = "AP-STRAT-002")]
    MonolithMonster,
    #[serde(rename = "AP-STRAT-003")]
    MetaDocumentationSpiral,
    #[serde(rename = "AP-STRAT-004")]
    PreferenceTrap,
}

impl AntiPatternId {
    pub fn entry(&self) -> &'static AntiPatternEntry {
        ANTI_PATTERN_REGISTRY
            .iter()
            .find(|e| e.id == *self)
            .unwrap_or(&ANTI_PATTERN_REGISTRY[0])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AntiPatternId::GhostFile => "AP-CRIT-001",
            AntiPatternId::StructureChaos => "AP-CRIT-002",
            AntiPatternId::EncodingDisaster => "AP-CRIT-003",
            AntiPatternId::LinkVoid => "AP-CRIT-004",
            AntiPatternId::SitemapDump => "AP-STRUCT-001",
            AntiPatternId::OrphanedSections => "AP-STRUCT-002",
            AntiPatternId::DuplicateIdentity => "AP-STRUCT-003",
            AntiPatternId::SectionShuffle => "AP-STRUCT-004",
            AntiPatternId::NamingNebula => "AP-STRUCT-005",
            AntiPatternId::CopyPastePlague => "AP-CONT-001",
            AntiPatternId::BlankCanvas => "AP-CONT-002",
            AntiPatternId::JargonJungle => "AP-CONT-003",
            AntiPatternId::LinkDesert => "AP-CONT-004",
            AntiPatternId::OutdatedOracle => "AP-CONT-005",
            AntiPatternId::ExampleVoid => "AP-CONT-006",
            AntiPatternId::FormulaicDescription => "AP-CONT-007",
            AntiPatternId::SilentAgent => "AP-CONT-008",
            AntiPatternId::VersionlessDrift => "AP-CONT-009",
            AntiPatternId::AutomationObsession => "AP-STRAT-001",
            AntiPatternId::MonolithMonster => "AP-STRAT-002",
            AntiPatternId::MetaDocumentationSpiral => "AP-STRAT-003",
            AntiPatternId::PreferenceTrap => "AP-STRAT-004",
        }
    }
}

impl fmt::Display for AntiPatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry entry for one anti-pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AntiPatternEntry {
    pub id: AntiPatternId,
    pub name: &'static str,
    pub category: AntiPatternCategory,
    pub check_id: &'static str,
    pub description: &'static str,
}

/// Registry format version. Bump when entries are added; ids never change.
pub const REGISTRY_VERSION: &str = "1.0.0";

const fn entry(
    id: AntiPatternId,
    name: &'static str,
    category: AntiPatternCategory,
    check_id: &'static str,
    description: &'static str,
) -> AntiPatternEntry {
    AntiPatternEntry {
        id,
        name,
        category,
        check_id,
        description,
    }
}

pub const ANTI_PATTERN_REGISTRY: [AntiPatternEntry; 22] = {
    use AntiPatternCategory::*;
    use AntiPatternId::*;
    [
        entry(GhostFile, "Ghost File", Critical, "CHECK-001",
            "Empty or near-empty file that exists but provides no value"),
        entry(StructureChaos, "Structure Chaos", Critical, "CHECK-002",
            "File lacks recognizable Markdown structure (no headers, no sections)"),
        entry(EncodingDisaster, "Encoding Disaster", Critical, "CHECK-003",
            "Non-UTF-8 encoding or mixed line endings that break parsers"),
        entry(LinkVoid, "Link Void", Critical, "CHECK-004",
            "All or most links are broken, empty, or malformed"),
        entry(SitemapDump, "Sitemap Dump", Structural, "CHECK-005",
            "Entire sitemap dumped as flat link list with no organization"),
        entry(OrphanedSections, "Orphaned Sections", Structural, "CHECK-006",
            "Sections with headers but no links"),
        entry(DuplicateIdentity, "Duplicate Identity", Structural, "CHECK-007",
            "Multiple sections with identical or near-identical names"),
        entry(SectionShuffle, "Section Shuffle", Structural, "CHECK-008",
            "Sections in illogical order (e.g., Advanced before Getting Started)"),
        entry(NamingNebula, "Naming Nebula", Structural, "CHECK-009",
            "Section names that are vague, generic single words"),
        entry(CopyPastePlague, "Copy-Paste Plague", Content, "CHECK-010",
            "Large blocks of content duplicated without curation"),
        entry(BlankCanvas, "Blank Canvas", Content, "CHECK-011",
            "Sections with placeholder text or no meaningful content"),
        entry(JargonJungle, "Jargon Jungle", Content, "CHECK-012",
            "Heavy use of domain jargon without definitions"),
        entry(LinkDesert, "Link Desert", Content, "CHECK-013",
            "Links without descriptions (bare URL lists)"),
        entry(OutdatedOracle, "Outdated Oracle", Content, "CHECK-014",
            "Content references deprecated or outdated information"),
        entry(ExampleVoid, "Example Void", Content, "CHECK-015",
            "No code examples despite being a technical project"),
        entry(FormulaicDescription, "Formulaic Description", Content, "CHECK-019",
            "Auto-generated descriptions with identical patterns"),
        entry(SilentAgent, "Silent Agent", Content, "CHECK-020",
            "No LLM-facing guidance despite being an AI documentation file"),
        entry(VersionlessDrift, "Versionless Drift", Content, "CHECK-021",
            "No version or date metadata, impossible to assess freshness"),
        entry(AutomationObsession, "Automation Obsession", Strategic, "CHECK-016",
            "Fully auto-generated with no human curation or review"),
        entry(MonolithMonster, "Monolith Monster", Strategic, "CHECK-017",
            "Single file exceeding 100K tokens with no decomposition"),
        entry(MetaDocumentationSpiral, "Meta-Documentation Spiral", Strategic, "CHECK-018",
            "File documents itself or the llms.txt standard rather than the project"),
        entry(PreferenceTrap, "Preference Trap", Strategic, "CHECK-022",
            "Content crafted to manipulate LLM behavior (trust laundering)"),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_size_and_categories() {
        assert_eq!(ANTI_PATTERN_REGISTRY.len(), 22);
        let count = |c: AntiPatternCategory| {
            ANTI_PATTERN_REGISTRY
                .iter()
                .filter(|e| e.category == c)
                .count()
        };
        assert_eq!(count(AntiPatternCategory::Critical), 4);
        assert_eq!(count(AntiPatternCategory::Structural), 5);
        assert_eq!(count(AntiPatternCategory::Content), 9);
        assert_eq!(count(AntiPatternCategory::Strategic), 4);
    }

    #[test]
    fn test_check_ids_cover_001_to_022() {
        let ids: HashSet<_> = ANTI_PATTERN_REGISTRY.iter().map(|e| e.check_id).collect();
        assert_eq!(ids.len(), 22);
        for n in 1..=22 {
            assert!(ids.contains(format!("CHECK-{:03}", n).as_str()), "missing {}", n);
        }
    }

    #[test]
    fn test_ids_unique_and_entry_lookup() {
        let ids: HashSet<_> = ANTI_PATTERN_REGISTRY.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 22);
        for e in ANTI_PATTERN_REGISTRY.iter() {
            assert_eq!(e.id.entry().check_id, e.check_id);
            assert!(!e.description.is_empty());
            let json = serde_json::to_string(&e.id).unwrap();
            assert_eq!(json, format!("\"{}\"", e.id.as_str()));
        }
    }
}
