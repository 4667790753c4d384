//! Diagnostics and validation results

use crate::preprocess::Advisory;
use crate::schema::{DiagnosticCode, Severity, ValidationLevel};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Context snippets longer than this are truncated.
pub const MAX_CONTEXT_CHARS: usize = 500;

/// One conformance finding.
///
/// Severity and level come from the code and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    severity: Severity,
    pub level: ValidationLevel,
    /// 1-indexed source line; `None` for file-level findings
    pub line: Option<usize>,
    pub message: String,
    pub remediation: String,
    pub context: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode) -> Self {
        Self {
            code,
            severity: code.severity(),
            level: code.level(),
            line: None,
            message: code.message().to_string(),
            remediation: code.remediation().to_string(),
            context: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        let context = context.into();
        self.context = Some(if context.chars().count() > MAX_CONTEXT_CHARS {
            context.chars().take(MAX_CONTEXT_CHARS).collect()
        } else {
            context
        });
        self
    }

    /// Append detail to the message, e.g. `"No H1 title found (line 3)"`.
    pub fn with_detail(mut self, detail: impl AsRef<str>) -> Self {
        self.message = format!("{}: {}", self.message, detail.as_ref());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Errors and warnings gate their level; info never does.
    pub fn is_gating(&self) -> bool {
        self.severity != Severity::Info
    }

    /// Sort order: file-level first, then line, severity, code.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        (self.line.is_some(), self.line, self.severity, self.code).cmp(&(
            other.line.is_some(),
            other.line,
            other.severity,
            other.code,
        ))
    }
}

/// Outcome of running the level pipeline over one document.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Highest level passed with every lower level also passed
    pub level_achieved: Option<ValidationLevel>,
    pub diagnostics: Vec<Diagnostic>,
    /// Every level; levels that never ran are `false`
    pub levels_passed: BTreeMap<ValidationLevel, bool>,
    pub is_valid: bool,
    /// Front-matter pitfalls, never gating
    pub advisories: Vec<Advisory>,
}

impl ValidationResult {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &Diagnostic> {
        self.with_severity(Severity::Info)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity() == severity)
    }

    pub fn has_code(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    pub fn count_code(&self, code: DiagnosticCode) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    pub fn passed(&self, level: ValidationLevel) -> bool {
        self.levels_passed.get(&level).copied().unwrap_or(false)
    }
}
