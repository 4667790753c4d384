//! Parsed document model

use crate::schema::CanonicalSectionName;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Has a URL scheme
    Absolute,
    /// Path without a scheme
    Relative,
    /// In-document `#fragment`
    Anchor,
    /// A bare URL list item with no markdown link syntax
    Bare,
}

/// One link entry in a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedLink {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    /// 1-indexed source line
    pub line: usize,
    pub kind: LinkKind,
    pub is_well_formed: bool,
}

impl ParsedLink {
    pub fn has_description(&self) -> bool {
        self.description.is_some()
    }
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlock {
    pub language: Option<String>,
    pub line: usize,
    #[serde(skip)]
    pub content: String,
    /// `false` when the fence runs to end of input
    pub closed: bool,
}

/// An H2 section and everything up to the next H2.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedSection {
    pub name: String,
    pub canonical: Option<CanonicalSectionName>,
    pub links: Vec<ParsedLink>,
    #[serde(skip)]
    pub raw_content: String,
    pub line: usize,
    pub code_blocks: Vec<CodeBlock>,
    pub estimated_tokens: usize,
}

impl ParsedSection {
    /// Section text without the heading line.
    pub fn body(&self) -> &str {
        match self.raw_content.split_once('\n') {
            Some((_, body)) => body,
            None => "",
        }
    }
}

/// Structured view of an llms.txt document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedDocument {
    pub title: Option<String>,
    pub title_line: Option<usize>,
    /// Line of every level-1 heading, in order
    pub h1_lines: Vec<usize>,
    pub description: Option<String>,
    pub description_line: Option<usize>,
    pub sections: Vec<ParsedSection>,
    #[serde(skip)]
    pub raw_content: String,
    pub estimated_tokens: usize,
    pub front_matter: Option<serde_yaml::Value>,
    /// Fenced blocks before the first section
    pub preamble_code_blocks: Vec<CodeBlock>,
}

impl ParsedDocument {
    /// Section names in source order
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn total_links(&self) -> usize {
        self.sections.iter().map(|s| s.links.len()).sum()
    }

    pub fn links(&self) -> impl Iterator<Item = &ParsedLink> {
        self.sections.iter().flat_map(|s| s.links.iter())
    }

    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.preamble_code_blocks
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.code_blocks.iter()))
    }

    pub fn section(&self, canonical: CanonicalSectionName) -> Option<&ParsedSection> {
        self.sections.iter().find(|s| s.canonical == Some(canonical))
    }

    pub fn has_section(&self, canonical: CanonicalSectionName) -> bool {
        self.section(canonical).is_some()
    }
}
