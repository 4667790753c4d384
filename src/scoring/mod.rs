//! Quality scoring: three dimensions, a 0–100 composite, and a grade

mod scorer;
mod types;

pub use scorer::{deduction, QualityScorer, ScoringContext, CRITICAL_SCORE_CAP};
pub use types::{DimensionScore, Grade, QualityScore, ScoreCheck, ScoreDimension};
