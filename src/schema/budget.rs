//! Token budget tiers, size tiers, and token zones

use serde::{Deserialize, Serialize};
use std::fmt;

/// A recommended token budget for a class of project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenBudgetTier {
    pub name: &'static str,
    /// Inclusive lower bound
    pub min_tokens: usize,
    /// Inclusive upper bound
    pub max_tokens: usize,
    pub use_case: &'static str,
    pub file_strategy: &'static str,
}

pub const TOKEN_BUDGET_TIERS: [TokenBudgetTier; 3] = [
    TokenBudgetTier {
        name: "standard",
        min_tokens: 1_500,
        max_tokens: 4_500,
        use_case: "Small projects, <100 pages, <5 features",
        file_strategy: "single",
    },
    TokenBudgetTier {
        name: "comprehensive",
        min_tokens: 4_500,
        max_tokens: 12_000,
        use_case: "Medium projects, 100-500 pages, 5-20 features",
        file_strategy: "dual (index + full)",
    },
    TokenBudgetTier {
        name: "full",
        min_tokens: 12_000,
        max_tokens: 50_000,
        use_case: "Large projects, 500+ pages, 20+ features",
        file_strategy: "multi (master + per-service)",
    },
];

/// Largest budget any tier allows.
pub const MAX_BUDGET_TOKENS: usize = 50_000;

pub const TOKEN_ZONE_OPTIMAL: usize = 20_000;
pub const TOKEN_ZONE_GOOD: usize = 50_000;
pub const TOKEN_ZONE_DEGRADATION: usize = 100_000;
pub const TOKEN_ZONE_ANTI_PATTERN: usize = 500_000;

/// Estimate tokens from content length (4 bytes per token).
pub fn estimate_tokens(content: &str) -> usize {
    content.len() / 4
}

/// Budget tier names accepted in document metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTierName {
    Standard,
    Comprehensive,
    Full,
}

impl BudgetTierName {
    pub fn tier(&self) -> &'static TokenBudgetTier {
        match self {
            BudgetTierName::Standard => &TOKEN_BUDGET_TIERS[0],
            BudgetTierName::Comprehensive => &TOKEN_BUDGET_TIERS[1],
            BudgetTierName::Full => &TOKEN_BUDGET_TIERS[2],
        }
    }
}

/// Size bucket on the estimated-token axis.
///
/// The five ranges are contiguous: each upper bound (exclusive) is the next
/// tier's lower bound (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    Minimal,
    Standard,
    Comprehensive,
    Full,
    Oversized,
}

impl SizeTier {
    pub const ALL: [SizeTier; 5] = [
        SizeTier::Minimal,
        SizeTier::Standard,
        SizeTier::Comprehensive,
        SizeTier::Full,
        SizeTier::Oversized,
    ];

    /// Half-open token range `[lower, upper)`; `None` upper means unbounded.
    pub fn bounds(&self) -> (usize, Option<usize>) {
        match self {
            SizeTier::Minimal => (0, Some(1_500)),
            SizeTier::Standard => (1_500, Some(4_500)),
            SizeTier::Comprehensive => (4_500, Some(12_000)),
            SizeTier::Full => (12_000, Some(50_000)),
            SizeTier::Oversized => (50_000, None),
        }
    }

    pub fn for_tokens(tokens: usize) -> SizeTier {
        Self::ALL
            .iter()
            .copied()
            .find(|tier| {
                let (lower, upper) = tier.bounds();
                tokens >= lower && upper.map_or(true, |u| tokens < u)
            })
            .unwrap_or(SizeTier::Oversized)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeTier::Minimal => "minimal",
            SizeTier::Standard => "standard",
            SizeTier::Comprehensive => "comprehensive",
            SizeTier::Full => "full",
            SizeTier::Oversized => "oversized",
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
