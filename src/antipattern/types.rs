//! Anti-pattern check interface and findings

use crate::parser::ParsedDocument;
use crate::preprocess::PreprocessedDocument;
use crate::schema::{AntiPatternCategory, AntiPatternEntry, AntiPatternId};
use crate::signals::DocumentSignals;
use serde::Serialize;

/// Inputs every detection rule may read.
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    pub document: &'a ParsedDocument,
    pub preprocessed: Option<&'a PreprocessedDocument>,
    pub signals: &'a DocumentSignals,
}

/// A detected anti-pattern with the evidence that triggered it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AntiPatternFinding {
    pub id: AntiPatternId,
    pub name: &'static str,
    pub category: AntiPatternCategory,
    pub check_id: &'static str,
    pub description: &'static str,
    pub evidence: String,
}

impl AntiPatternFinding {
    pub fn new(entry: &AntiPatternEntry, evidence: impl Into<String>) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            category: entry.category,
            check_id: entry.check_id,
            description: entry.description,
            evidence: evidence.into(),
        }
    }
}

/// One detection rule.
///
/// Rules are pure and infallible: they either return evidence or nothing.
///
/// # Example
///
/// ```ignore
/// struct NoTitle;
///
/// impl AntiPatternCheck for NoTitle {
///     fn pattern(&self) -> AntiPatternId { AntiPatternId::StructureChaos }
///     fn detect(&self, ctx: &DetectionContext<'_>) -> Option<String> {
///         ctx.document.title.is_none().then(|| "no H1".to_string())
///     }
/// }
/// ```
pub trait AntiPatternCheck: Send + Sync {
    /// Which registry entry this rule reports
    fn pattern(&self) -> AntiPatternId;

    /// Evidence when the pattern is present
    fn detect(&self, ctx: &DetectionContext<'_>) -> Option<String>;
}

/// A rule backed by a plain function.
pub struct FnCheck {
    pattern: AntiPatternId,
    detect: fn(&DetectionContext<'_>) -> Option<String>,
}

impl FnCheck {
    pub const fn new(
        pattern: AntiPatternId,
        detect: fn(&DetectionContext<'_>) -> Option<String>,
    ) -> Self {
        Self { pattern, detect }
    }
}

impl AntiPatternCheck for FnCheck {
    fn pattern(&self) -> AntiPatternId {
        self.pattern
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> Option<String> {
        (self.detect)(ctx)
    }
}
