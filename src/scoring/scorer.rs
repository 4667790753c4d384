//! Composite quality scoring
//!
//! Structural (30) is ten equal-weight checks. Content (50) is six weighted
//! checks, three of them proportional. Anti-pattern (20) starts full and
//! loses a fixed amount per finding by category. Any critical finding caps
//! the composite at 29.

use super::types::{DimensionScore, Grade, QualityScore, ScoreCheck, ScoreDimension};
use crate::antipattern::AntiPatternFinding;
use crate::enrichment::Enrichment;
use crate::parser::ParsedDocument;
use crate::schema::{AntiPatternCategory, CanonicalSectionName, ANTI_PATTERN_REGISTRY};
use crate::signals::DocumentSignals;
use tracing::debug;

/// Highest total a document with a critical anti-pattern can reach.
pub const CRITICAL_SCORE_CAP: f64 = 29.0;

const DESCRIPTION_WEIGHT: f64 = 15.0;
const CODE_PRESENT_WEIGHT: f64 = 10.0;
const CODE_LANGUAGE_WEIGHT: f64 = 5.0;
const WELL_FORMED_WEIGHT: f64 = 10.0;
const VERSION_WEIGHT: f64 = 5.0;
const NON_FORMULAIC_WEIGHT: f64 = 5.0;

/// Points lost per finding of each category.
pub fn deduction(category: AntiPatternCategory) -> f64 {
    match category {
        AntiPatternCategory::Critical => 20.0,
        AntiPatternCategory::Structural => 4.0,
        AntiPatternCategory::Content => 2.0,
        AntiPatternCategory::Strategic => 3.0,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub document: &'a ParsedDocument,
    pub signals: &'a DocumentSignals,
    pub enrichment: &'a Enrichment,
    pub findings: &'a [AntiPatternFinding],
}

#[derive(Debug, Clone, Default)]
pub struct QualityScorer;

impl QualityScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, ctx: &ScoringContext<'_>) -> QualityScore {
        let dimensions = vec![structural(ctx), content(ctx), anti_pattern(ctx)];
        let sum: f64 = dimensions.iter().map(|d| d.points).sum();
        let mut total = round1(sum).clamp(0.0, 100.0);

        let critical = ctx
            .findings
            .iter()
            .any(|f| f.category == AntiPatternCategory::Critical);
        if critical {
            total = total.min(CRITICAL_SCORE_CAP);
        }

        let grade = Grade::from_score(total);
        debug!(total, %grade, critical, "scored document");
        QualityScore {
            total,
            grade,
            dimensions,
            critical_cap_applied: critical,
        }
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn binary(name: &str, passed: bool, weight: f64) -> ScoreCheck {
    ScoreCheck {
        name: name.to_string(),
        passed,
        points: if passed { weight } else { 0.0 },
    }
}

fn proportional(name: &str, ratio: f64, weight: f64) -> ScoreCheck {
    ScoreCheck {
        name: name.to_string(),
        passed: ratio >= 1.0,
        points: weight * ratio,
    }
}

fn structural(ctx: &ScoringContext<'_>) -> DimensionScore {
    let doc = ctx.document;
    let sections = &doc.sections;
    let per_check = ScoreDimension::Structural.max_points() / 10.0;

    let checks = vec![
        binary("title_present", doc.title.is_some(), per_check),
        binary("single_title", doc.h1_lines.len() == 1, per_check),
        binary("lead_blockquote", doc.description.is_some(), per_check),
        binary("has_sections", !sections.is_empty(), per_check),
        binary(
            "canonical_names",
            !sections.is_empty() && sections.iter().all(|s| s.canonical.is_some()),
            per_check,
        ),
        binary("canonical_order", ctx.signals.out_of_order.is_none(), per_check),
        binary(
            "master_index_first",
            sections.first().and_then(|s| s.canonical) == Some(CanonicalSectionName::MasterIndex),
            per_check,
        ),
        binary("no_empty_sections", ctx.signals.empty_sections.is_empty(), per_check),
        binary("links_well_formed", doc.links().all(|l| l.is_well_formed), per_check),
        binary(
            "within_token_budget",
            doc.estimated_tokens <= ctx.enrichment.token_budget(),
            per_check,
        ),
    ];
    let points = checks.iter().map(|c| c.points).sum();
    DimensionScore::new(ScoreDimension::Structural, points, checks)
}

fn content(ctx: &ScoringContext<'_>) -> DimensionScore {
    let doc = ctx.document;
    let total_links = doc.total_links();
    let described = doc.links().filter(|l| l.has_description()).count();
    let well_formed = doc.links().filter(|l| l.is_well_formed).count();
    let blocks: Vec<_> = doc.code_blocks().collect();
    let tagged = blocks.iter().filter(|b| b.language.is_some()).count();

    let checks = vec![
        proportional("link_descriptions", ratio(described, total_links), DESCRIPTION_WEIGHT),
        binary("code_examples", !blocks.is_empty(), CODE_PRESENT_WEIGHT),
        proportional("code_languages", ratio(tagged, blocks.len()), CODE_LANGUAGE_WEIGHT),
        proportional("links_well_formed", ratio(well_formed, total_links), WELL_FORMED_WEIGHT),
        binary("version_metadata", ctx.signals.has_version_metadata, VERSION_WEIGHT),
        binary(
            "non_formulaic_descriptions",
            described > 0 && ctx.signals.formulaic.is_none(),
            NON_FORMULAIC_WEIGHT,
        ),
    ];
    let points = checks.iter().map(|c| c.points).sum();
    DimensionScore::new(ScoreDimension::Content, points, checks)
}

/// One check per registry entry; a finding turns its check into a deduction.
fn anti_pattern(ctx: &ScoringContext<'_>) -> DimensionScore {
    let checks: Vec<ScoreCheck> = ANTI_PATTERN_REGISTRY
        .iter()
        .map(|entry| {
            let found = ctx.findings.iter().any(|f| f.id == entry.id);
            ScoreCheck {
                name: entry.name.to_string(),
                passed: !found,
                points: if found { -deduction(entry.category) } else { 0.0 },
            }
        })
        .collect();
    let max = ScoreDimension::AntiPattern.max_points();
    let lost: f64 = ctx.findings.iter().map(|f| deduction(f.category)).sum();
    DimensionScore::new(ScoreDimension::AntiPattern, (max - lost).max(0.0), checks)
}
