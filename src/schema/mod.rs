//! Fixed registries shared by every pipeline stage
//!
//! - **codes**: the 26-code diagnostic catalog, severities, validation levels
//! - **sections**: canonical section names and the alias table
//! - **budget**: token budget tiers, size tiers, token zones
//! - **registry**: the 22-entry anti-pattern registry

mod budget;
mod codes;
mod registry;
mod sections;

pub use budget::{
    estimate_tokens, BudgetTierName, SizeTier, TokenBudgetTier, MAX_BUDGET_TOKENS,
    TOKEN_BUDGET_TIERS, TOKEN_ZONE_ANTI_PATTERN, TOKEN_ZONE_DEGRADATION, TOKEN_ZONE_GOOD,
    TOKEN_ZONE_OPTIMAL,
};
pub use codes::{DiagnosticCode, Severity, ValidationLevel};
pub use registry::{
    AntiPatternCategory, AntiPatternEntry, AntiPatternId, ANTI_PATTERN_REGISTRY,
    REGISTRY_VERSION,
};
pub use sections::{
    normalize_section_name, CanonicalSectionName, SectionAliases, SECTION_NAME_ALIASES,
};
