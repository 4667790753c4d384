//! Score types

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreDimension {
    Structural,
    Content,
    AntiPattern,
}

impl ScoreDimension {
    pub const ALL: [ScoreDimension; 3] = [
        ScoreDimension::Structural,
        ScoreDimension::Content,
        ScoreDimension::AntiPattern,
    ];

    pub fn max_points(&self) -> f64 {
        match self {
            ScoreDimension::Structural => 30.0,
            ScoreDimension::Content => 50.0,
            ScoreDimension::AntiPattern => 20.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreDimension::Structural => "structural",
            ScoreDimension::Content => "content",
            ScoreDimension::AntiPattern => "anti_pattern",
        }
    }
}

/// One scored check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCheck {
    pub name: String,
    pub passed: bool,
    /// Points earned; anti-pattern checks carry their deduction as a negative
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionScore {
    pub dimension: ScoreDimension,
    pub points: f64,
    pub max_points: f64,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
    pub checks: Vec<ScoreCheck>,
}

impl DimensionScore {
    pub fn new(dimension: ScoreDimension, points: f64, checks: Vec<ScoreCheck>) -> Self {
        let passed = checks.iter().filter(|c| c.passed).count();
        Self {
            dimension,
            points,
            max_points: dimension.max_points(),
            passed,
            failed: checks.len() - passed,
            total: checks.len(),
            checks,
        }
    }

    /// `points / max_points × 100`, or 0 for a zero-point dimension.
    pub fn percentage(&self) -> f64 {
        if self.max_points <= 0.0 {
            0.0
        } else {
            self.points / self.max_points * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grade {
    Critical,
    NeedsWork,
    Adequate,
    Strong,
    Exemplary,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::Exemplary
        } else if score >= 70.0 {
            Grade::Strong
        } else if score >= 50.0 {
            Grade::Adequate
        } else if score >= 30.0 {
            Grade::NeedsWork
        } else {
            Grade::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Exemplary => "exemplary",
            Grade::Strong => "strong",
            Grade::Adequate => "adequate",
            Grade::NeedsWork => "needs-work",
            Grade::Critical => "critical",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScore {
    /// 0–100, one decimal
    pub total: f64,
    pub grade: Grade,
    pub dimensions: Vec<DimensionScore>,
    /// A critical anti-pattern held the total at or below the cap
    pub critical_cap_applied: bool,
}

impl QualityScore {
    pub fn dimension(&self, dimension: ScoreDimension) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.dimension == dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Grade::from_score(92.0), Grade::Exemplary);
        assert_eq!(Grade::from_score(90.0), Grade::Exemplary);
        assert_eq!(Grade::from_score(89.9), Grade::Strong);
        assert_eq!(Grade::from_score(70.0), Grade::Strong);
        assert_eq!(Grade::from_score(69.0), Grade::Adequate);
        assert_eq!(Grade::from_score(50.0), Grade::Adequate);
        assert_eq!(Grade::from_score(49.0), Grade::NeedsWork);
        assert_eq!(Grade::from_score(30.0), Grade::NeedsWork);
        assert_eq!(Grade::from_score(29.0), Grade::Critical);
        assert_eq!(Grade::from_score(0.0), Grade::Critical);
    }

    #[test]
    fn test_percentage() {
        let d = DimensionScore::new(ScoreDimension::Content, 25.0, vec![]);
        assert_eq!(d.percentage(), 50.0);
        let mut zero = d.clone();
        zero.max_points = 0.0;
        assert_eq!(zero.percentage(), 0.0);
    }

    #[test]
    fn test_grade_serializes_kebab() {
        assert_eq!(serde_json::to_string(&Grade::NeedsWork).unwrap(), "\"needs-work\"");
    }
}
