//! llms-audit: llms.txt validator and quality scorer
//!
//! Validates documents in the markdown-based llms.txt format against a
//! five-level conformance pipeline, detects a catalog of 22 anti-patterns,
//! and computes a 0–100 quality score with a grade.
//!
//! # Core Concepts
//!
//! - **Levels**: cumulative conformance tiers L0 (parseable) through L4 (extended)
//! - **Diagnostics**: stable `E`/`W`/`I` codes emitted per level
//! - **Anti-patterns**: named structural and content smells, scored by category
//! - **Enrichment**: concepts, few-shot examples, and agent instructions
//!   layered on top of the base document
//!
//! # Example
//!
//! ```
//! use llms_audit::Pipeline;
//!
//! let report = Pipeline::default()
//!     .audit_text("# Acme\n\n> Acme builds rockets.\n")
//!     .unwrap();
//! assert!(report.is_valid());
//! ```

pub mod antipattern;
pub mod classify;
pub mod config;
pub mod enrichment;
pub mod input;
mod pipeline;
pub mod parser;
pub mod preprocess;
pub mod schema;
pub mod scoring;
pub mod signals;
pub mod validation;

pub use antipattern::{AntiPatternDetector, AntiPatternFinding};
pub use classify::{classify, DocumentClassification, DocumentType};
pub use config::{AuditConfig, ConfigError};
pub use input::{CancellationToken, DocumentInput, InputError, InputResult, InputSource};
pub use parser::{DocumentParser, ParsedDocument, ParsedLink, ParsedSection};
pub use pipeline::{AuditReport, AuditResult, Pipeline, SourceSummary};
pub use schema::{DiagnosticCode, Severity, ValidationLevel};
pub use scoring::{Grade, QualityScore};
pub use validation::{Diagnostic, ValidationResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
