//! Five-level conformance validation
//!
//! Levels are cumulative: L(N+1) runs only when L(N) passed, but every
//! diagnostic of the failing level is still reported. Results are sorted
//! with file-level diagnostics first, then by line, severity, and code.

mod checks;
mod engine;
mod types;

pub use engine::{ValidationContext, ValidationEngine};
pub use types::{Diagnostic, ValidationResult, MAX_CONTEXT_CHARS};
