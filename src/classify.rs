//! Document type and size tier

use crate::parser::ParsedDocument;
use crate::schema::SizeTier;
use serde::Serialize;

/// Above this many bytes a document is a full documentation dump.
pub const FULL_DUMP_THRESHOLD_BYTES: usize = 256_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Curated link index
    Index,
    /// Full documentation dump
    Full,
    Unknown,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Index => "index",
            DocumentType::Full => "full-dump",
            DocumentType::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentClassification {
    pub document_type: DocumentType,
    pub byte_size: usize,
    pub estimated_tokens: usize,
    pub size_tier: SizeTier,
}

impl DocumentClassification {
    pub fn is_full_dump(&self) -> bool {
        self.document_type == DocumentType::Full
    }
}

/// Classify by size first, then by structure.
pub fn classify(doc: &ParsedDocument, byte_size: usize) -> DocumentClassification {
    let document_type = if byte_size > FULL_DUMP_THRESHOLD_BYTES {
        DocumentType::Full
    } else if doc.sections.iter().any(|s| !s.links.is_empty()) {
        DocumentType::Index
    } else {
        DocumentType::Unknown
    };
    DocumentClassification {
        document_type,
        byte_size,
        estimated_tokens: doc.estimated_tokens,
        size_tier: SizeTier::for_tokens(doc.estimated_tokens),
    }
}
