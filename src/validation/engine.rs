//! Cumulative level pipeline

use super::checks::run_level;
use super::types::{Diagnostic, ValidationResult};
use crate::classify::DocumentClassification;
use crate::enrichment::Enrichment;
use crate::parser::ParsedDocument;
use crate::preprocess::PreprocessedDocument;
use crate::schema::{DiagnosticCode, ValidationLevel};
use crate::signals::DocumentSignals;
use std::collections::BTreeMap;
use tracing::debug;

/// Everything the checks may look at, borrowed from earlier stages.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub document: &'a ParsedDocument,
    /// Absent for mapping input, which has no bytes to inspect
    pub preprocessed: Option<&'a PreprocessedDocument>,
    pub classification: &'a DocumentClassification,
    pub enrichment: &'a Enrichment,
    pub signals: &'a DocumentSignals,
}

/// Runs L0 through L4, stopping after the first failing level.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, ctx: &ValidationContext<'_>) -> ValidationResult {
        let mut diagnostics = Vec::new();
        let mut levels_passed: BTreeMap<ValidationLevel, bool> =
            ValidationLevel::ALL.iter().map(|l| (*l, false)).collect();
        let mut level_achieved = None;

        for level in ValidationLevel::ALL {
            let found = run_level(level, ctx);
            let passed = level_passes(level, &found);
            diagnostics.extend(found);
            levels_passed.insert(level, passed);
            if !passed {
                debug!(%level, "validation level failed");
                break;
            }
            level_achieved = Some(level);
        }

        diagnostics.sort_by(Diagnostic::sort_cmp);
        let advisories = ctx
            .preprocessed
            .map(|p| p.advisories.clone())
            .unwrap_or_default();

        ValidationResult {
            level_achieved,
            is_valid: levels_passed
                .get(&ValidationLevel::Parseable)
                .copied()
                .unwrap_or(false),
            diagnostics,
            levels_passed,
            advisories,
        }
    }
}

/// L0–L3 pass with no errors or warnings; L4 passes unless agent
/// instructions are missing.
fn level_passes(level: ValidationLevel, diagnostics: &[Diagnostic]) -> bool {
    match level {
        ValidationLevel::Extended => !diagnostics
            .iter()
            .any(|d| d.code == DiagnosticCode::NoLlmInstructions),
        _ => !diagnostics.iter().any(Diagnostic::is_gating),
    }
}
