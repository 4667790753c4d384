//! Diagnostic code catalog
//!
//! The 26 codes are a public contract. Numbering is immutable: new codes are
//! appended within their severity band and existing numbers never move.
//!
//! - `E001`–`E008`: errors, structural failures
//! - `W001`–`W011`: warnings, deviations from best practice
//! - `I001`–`I007`: informational observations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity, derived from the code prefix.
///
/// Variant order is the sort order: errors before warnings before info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    fn from_prefix(prefix: char) -> Self {
        match prefix {
            'E' => Severity::Error,
            'W' => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five cumulative conformance levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValidationLevel {
    /// Decodable and parseable
    #[serde(rename = "L0")]
    Parseable,
    /// Title, lead description, recognizable sections
    #[serde(rename = "L1")]
    Structural,
    /// Link descriptions, code examples, non-empty sections
    #[serde(rename = "L2")]
    Content,
    /// Ordering, freshness metadata, token budget
    #[serde(rename = "L3")]
    BestPractices,
    /// Agent directives and enrichment records
    #[serde(rename = "L4")]
    Extended,
}

impl ValidationLevel {
    pub const ALL: [ValidationLevel; 5] = [
        ValidationLevel::Parseable,
        ValidationLevel::Structural,
        ValidationLevel::Content,
        ValidationLevel::BestPractices,
        ValidationLevel::Extended,
    ];

    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValidationLevel::Parseable => "Parseable",
            ValidationLevel::Structural => "Structural",
            ValidationLevel::Content => "Content",
            ValidationLevel::BestPractices => "Best Practices",
            ValidationLevel::Extended => "Extended",
        }
    }

    pub fn next(&self) -> Option<ValidationLevel> {
        Self::ALL.get(self.index() as usize + 1).copied()
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.index())
    }
}

/// Every diagnostic the validator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    #[serde(rename = "E001")]
    NoH1Title,
    #[serde(rename = "E002")]
    MultipleH1,
    #[serde(rename = "E003")]
    InvalidEncoding,
    #[serde(rename = "E004")]
    InvalidLineEndings,
    #[serde(rename = "E005")]
    InvalidMarkdown,
    #[serde(rename = "E006")]
    BrokenLinks,
    #[serde(rename = "E007")]
    EmptyFile,
    #[serde(rename = "E008")]
    ExceedsSizeLimit,

    #[serde(rename = "W001")]
    MissingBlockquote,
    #[serde(rename = "W002")]
    NonCanonicalSectionName,
    #[serde(rename = "W003")]
    LinkMissingDescription,
    #[serde(rename = "W004")]
    NoCodeExamples,
    #[serde(rename = "W005")]
    CodeNoLanguage,
    #[serde(rename = "W006")]
    FormulaicDescriptions,
    #[serde(rename = "W007")]
    MissingVersionMetadata,
    #[serde(rename = "W008")]
    SectionOrderNonCanonical,
    #[serde(rename = "W009")]
    NoMasterIndex,
    #[serde(rename = "W010")]
    TokenBudgetExceeded,
    #[serde(rename = "W011")]
    EmptySections,

    #[serde(rename = "I001")]
    NoLlmInstructions,
    #[serde(rename = "I002")]
    NoConceptDefinitions,
    #[serde(rename = "I003")]
    NoFewShotExamples,
    #[serde(rename = "I004")]
    RelativeUrlsDetected,
    #[serde(rename = "I005")]
    FullDumpDetected,
    #[serde(rename = "I006")]
    OptionalSectionsUnmarked,
    #[serde(rename = "I007")]
    JargonWithoutDefinition,
}

struct CodeSpec {
    id: &'static str,
    level: ValidationLevel,
    message: &'static str,
    remediation: &'static str,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 26] = [
        DiagnosticCode::NoH1Title,
        DiagnosticCode::MultipleH1,
        DiagnosticCode::InvalidEncoding,
        DiagnosticCode::InvalidLineEndings,
        DiagnosticCode::InvalidMarkdown,
        DiagnosticCode::BrokenLinks,
        DiagnosticCode::EmptyFile,
        DiagnosticCode::ExceedsSizeLimit,
        DiagnosticCode::MissingBlockquote,
        DiagnosticCode::NonCanonicalSectionName,
        DiagnosticCode::LinkMissingDescription,
        DiagnosticCode::NoCodeExamples,
        DiagnosticCode::CodeNoLanguage,
        DiagnosticCode::FormulaicDescriptions,
        DiagnosticCode::MissingVersionMetadata,
        DiagnosticCode::SectionOrderNonCanonical,
        DiagnosticCode::NoMasterIndex,
        DiagnosticCode::TokenBudgetExceeded,
        DiagnosticCode::EmptySections,
        DiagnosticCode::NoLlmInstructions,
        DiagnosticCode::NoConceptDefinitions,
        DiagnosticCode::NoFewShotExamples,
        DiagnosticCode::RelativeUrlsDetected,
        DiagnosticCode::FullDumpDetected,
        DiagnosticCode::OptionalSectionsUnmarked,
        DiagnosticCode::JargonWithoutDefinition,
    ];

    fn spec(&self) -> CodeSpec {
        use ValidationLevel::*;
        let (id, level, message, remediation) = match self {
            DiagnosticCode::NoH1Title => (
                "E001",
                Structural,
                "No H1 title found. Every llms.txt file must begin with exactly one H1 title.",
                "Add a single '# Title' as the first line of the file.",
            ),
            DiagnosticCode::MultipleH1 => (
                "E002",
                Structural,
                "Multiple H1 titles found. Exactly one H1 is allowed.",
                "Remove all but the first H1 title. Use H2 for section headers.",
            ),
            DiagnosticCode::InvalidEncoding => (
                "E003",
                Parseable,
                "File is not valid UTF-8 encoding.",
                "Convert the file to UTF-8 encoding. Remove any BOM markers.",
            ),
            DiagnosticCode::InvalidLineEndings => (
                "E004",
                Parseable,
                "File uses non-LF line endings (CR or CRLF detected).",
                "Convert line endings to LF (Unix-style). Most editors have this option.",
            ),
            DiagnosticCode::InvalidMarkdown => (
                "E005",
                Parseable,
                "File contains invalid Markdown syntax that prevents parsing.",
                "Fix Markdown syntax errors. Use a Markdown linter to identify issues.",
            ),
            DiagnosticCode::BrokenLinks => (
                "E006",
                Structural,
                "Section contains links with empty or malformed URLs.",
                "Fix or remove links with empty href values. Ensure all URLs are well-formed.",
            ),
            DiagnosticCode::EmptyFile => (
                "E007",
                Parseable,
                "File is empty or contains only whitespace.",
                "Add content to the file. At minimum: H1 title, blockquote, one H2 section.",
            ),
            DiagnosticCode::ExceedsSizeLimit => (
                "E008",
                Structural,
                "File exceeds the maximum recommended size (>100K tokens).",
                "Decompose into a tiered file strategy (index + full + per-section files).",
            ),
            DiagnosticCode::MissingBlockquote => (
                "W001",
                Structural,
                "No blockquote description found after the H1 title.",
                "Add a '> description' blockquote immediately after the H1 title.",
            ),
            DiagnosticCode::NonCanonicalSectionName => (
                "W002",
                Structural,
                "Section name does not match any of the 11 canonical names.",
                "Use canonical names where possible (Master Index, Getting Started, API Reference, ...).",
            ),
            DiagnosticCode::LinkMissingDescription => (
                "W003",
                Content,
                "Link entry has no description text (bare URL only).",
                "Add a description after the link: '- [Title](url): Description of the page'.",
            ),
            DiagnosticCode::NoCodeExamples => (
                "W004",
                Content,
                "File contains no code examples (no fenced code blocks found).",
                "Add code examples with language specifiers (```python, ```bash, etc.).",
            ),
            DiagnosticCode::CodeNoLanguage => (
                "W005",
                Content,
                "Code block found without a language specifier.",
                "Add a language identifier after the opening triple backticks.",
            ),
            DiagnosticCode::FormulaicDescriptions => (
                "W006",
                Content,
                "Multiple entries use identical or near-identical description patterns.",
                "Write unique, specific descriptions for each link.",
            ),
            DiagnosticCode::MissingVersionMetadata => (
                "W007",
                BestPractices,
                "No version or last-updated metadata found in the file.",
                "Add version metadata (e.g., 'Last updated: 2026-02-06').",
            ),
            DiagnosticCode::SectionOrderNonCanonical => (
                "W008",
                BestPractices,
                "Sections do not follow the canonical 10-step ordering.",
                "Reorder sections to match the canonical sequence (Master Index first, FAQ last).",
            ),
            DiagnosticCode::NoMasterIndex => (
                "W009",
                Structural,
                "No Master Index found as the first H2 section.",
                "Add a Master Index as the first H2 section with navigation links.",
            ),
            DiagnosticCode::TokenBudgetExceeded => (
                "W010",
                BestPractices,
                "File exceeds the recommended token budget for its tier.",
                "Trim content to stay within the tier's token budget.",
            ),
            DiagnosticCode::EmptySections => (
                "W011",
                Content,
                "Section contains no meaningful content (placeholder text only).",
                "Add content or remove empty sections. Placeholder sections waste tokens.",
            ),
            DiagnosticCode::NoLlmInstructions => (
                "I001",
                Extended,
                "No LLM Instructions section found.",
                "Add an LLM Instructions section with positive/negative directives.",
            ),
            DiagnosticCode::NoConceptDefinitions => (
                "I002",
                Extended,
                "No structured concept definitions found.",
                "Add concept definitions with IDs, relationships, and aliases.",
            ),
            DiagnosticCode::NoFewShotExamples => (
                "I003",
                Extended,
                "No few-shot Q&A examples found.",
                "Add intent-tagged Q&A pairs linked to concepts.",
            ),
            DiagnosticCode::RelativeUrlsDetected => (
                "I004",
                Content,
                "Relative URLs found in link entries (may need resolution).",
                "Convert relative URLs to absolute or document the base URL.",
            ),
            DiagnosticCode::FullDumpDetected => (
                "I005",
                Parseable,
                "File classified as a full documentation dump (>256,000 bytes).",
                "Consider creating an index companion file.",
            ),
            DiagnosticCode::OptionalSectionsUnmarked => (
                "I006",
                Extended,
                "Optional sections not explicitly marked with token estimates.",
                "Mark optional sections (e.g., '(~800 tokens)') so consumers can skip them.",
            ),
            DiagnosticCode::JargonWithoutDefinition => (
                "I007",
                Extended,
                "Domain-specific jargon used without inline definition.",
                "Define jargon inline or link to a concept definition.",
            ),
        };
        CodeSpec {
            id,
            level,
            message,
            remediation,
        }
    }

    /// Stable identifier such as `E001`
    pub fn as_str(&self) -> &'static str {
        self.spec().id
    }

    pub fn severity(&self) -> Severity {
        let prefix = self.as_str().chars().next().unwrap_or('I');
        Severity::from_prefix(prefix)
    }

    /// Numeric suffix, e.g. `W011` -> 11
    pub fn code_number(&self) -> u16 {
        self.as_str()[1..].parse().unwrap_or(0)
    }

    /// The level whose checks emit this code.
    pub fn level(&self) -> ValidationLevel {
        self.spec().level
    }

    pub fn message(&self) -> &'static str {
        self.spec().message
    }

    pub fn remediation(&self) -> &'static str {
        self.spec().remediation
    }

    /// Look up a code by its identifier (`"E001"`).
    pub fn parse(id: &str) -> Option<DiagnosticCode> {
        Self::ALL.iter().copied().find(|c| c.as_str() == id)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_code_counts_by_severity() {
        let count = |s: Severity| {
            DiagnosticCode::ALL
                .iter()
                .filter(|c| c.severity() == s)
                .count()
        };
        assert_eq!(DiagnosticCode::ALL.len(), 26);
        assert_eq!(count(Severity::Error), 8);
        assert_eq!(count(Severity::Warning), 11);
        assert_eq!(count(Severity::Info), 7);
    }

    #[test]
    fn test_identifiers_unique_and_well_formed() {
        let ids: HashSet<_> = DiagnosticCode::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(ids.len(), 26);
        for id in ids {
            assert_eq!(id.len(), 4);
            assert!(matches!(id.chars().next(), Some('E' | 'W' | 'I')));
            assert!(id[1..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_code_number() {
        assert_eq!(DiagnosticCode::NoH1Title.code_number(), 1);
        assert_eq!(DiagnosticCode::ExceedsSizeLimit.code_number(), 8);
        assert_eq!(DiagnosticCode::EmptySections.code_number(), 11);
        assert_eq!(DiagnosticCode::JargonWithoutDefinition.code_number(), 7);
    }

    #[test]
    fn test_messages_and_remediation_present() {
        for code in DiagnosticCode::ALL {
            assert!(!code.message().is_empty(), "{} has no message", code);
            assert!(!code.message().contains('\n'));
            assert!(!code.remediation().is_empty(), "{} has no remediation", code);
        }
    }

    #[test]
    fn test_serialized_form_matches_identifier() {
        for code in DiagnosticCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            assert_eq!(DiagnosticCode::parse(code.as_str()), Some(code));
        }
    }

    #[test]
    fn test_levels() {
        assert_eq!(DiagnosticCode::EmptyFile.level(), ValidationLevel::Parseable);
        assert_eq!(DiagnosticCode::MultipleH1.level(), ValidationLevel::Structural);
        assert_eq!(ValidationLevel::Content.next(), Some(ValidationLevel::BestPractices));
        assert_eq!(ValidationLevel::Extended.next(), None);
        assert_eq!(ValidationLevel::BestPractices.to_string(), "L3");
    }
}
