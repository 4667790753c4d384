//! End-to-end audits of representative documents
//!
//! Each test drives the public `Pipeline` API from raw input to graded
//! report.

mod common;

use common::{oversized_document, DocumentBuilder, HangingTransport};
use llms_audit::classify::{DocumentType, FULL_DUMP_THRESHOLD_BYTES};
use llms_audit::schema::{AntiPatternId, DiagnosticCode, ValidationLevel};
use llms_audit::scoring::ScoreDimension;
use llms_audit::{Grade, InputError, Pipeline};
use std::sync::Arc;
use std::time::Duration;

const EXEMPLARY: &str = include_str!("fixtures/exemplary/orbit.txt");
const BARE_LINKS: &str = include_str!("fixtures/needs-work/bare-links.txt");

#[test]
fn test_complete_document_reaches_extended_level() {
    let report = Pipeline::default().audit_text(EXEMPLARY).unwrap();
    let validation = &report.validation;

    assert!(report.is_valid());
    assert_eq!(validation.level_achieved, Some(ValidationLevel::Extended));
    assert!(validation.levels_passed.values().all(|&passed| passed));
    assert_eq!(validation.errors().count(), 0, "{:?}", validation.diagnostics);
    assert_eq!(validation.warnings().count(), 0, "{:?}", validation.diagnostics);

    assert_eq!(report.document.sections.len(), 11);
    assert_eq!(report.enrichment.instructions.len(), 3);

    // The instruction section carries no links
    let ids: Vec<_> = report.anti_patterns.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![AntiPatternId::OrphanedSections]);

    let score = &report.score;
    assert_eq!(score.dimension(ScoreDimension::Structural).unwrap().points, 30.0);
    assert_eq!(score.dimension(ScoreDimension::Content).unwrap().points, 50.0);
    assert_eq!(score.dimension(ScoreDimension::AntiPattern).unwrap().points, 16.0);
    assert_eq!(score.total, 96.0);
    assert_eq!(score.grade, Grade::Exemplary);
}

#[test]
fn test_bare_links_without_lead_stop_at_parseable() {
    let report = Pipeline::default().audit_text(BARE_LINKS).unwrap();
    let validation = &report.validation;

    assert!(report.is_valid());
    assert_eq!(validation.level_achieved, Some(ValidationLevel::Parseable));
    assert!(!validation.passed(ValidationLevel::Structural));
    assert!(validation.has_code(DiagnosticCode::MissingBlockquote));
    assert!(validation.has_code(DiagnosticCode::NonCanonicalSectionName));
    assert!(validation.has_code(DiagnosticCode::NoMasterIndex));
    // Link descriptions belong to L2, which never ran
    assert!(!validation.has_code(DiagnosticCode::LinkMissingDescription));

    // Only link well-formedness earns content points
    let content = report.score.dimension(ScoreDimension::Content).unwrap();
    let earned: Vec<_> = content
        .checks
        .iter()
        .filter(|c| c.points > 0.0)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(earned, vec!["links_well_formed"]);
    assert_eq!(content.points, 10.0);

    assert_eq!(report.score.total, 39.0);
    assert_eq!(report.score.grade, Grade::NeedsWork);
    assert!(report
        .anti_patterns
        .iter()
        .any(|f| f.id == AntiPatternId::LinkDesert));
    assert!(report
        .anti_patterns
        .iter()
        .any(|f| f.id == AntiPatternId::NamingNebula));
}

#[test]
fn test_second_title_fails_structural_level() {
    let builder = DocumentBuilder::new()
        .title("Relay")
        .lead("Relay forwards webhooks to internal services.")
        .section("Master Index")
        .link("Routing", "https://relay.dev/routing", "Match rules and fan-out targets");
    let second_title_line = builder.next_line();
    let text = builder.title("Relay Again").build();

    let report = Pipeline::default().audit_text(&text).unwrap();
    let validation = &report.validation;

    assert!(validation.is_valid, "L0 still passed");
    assert_eq!(validation.level_achieved, Some(ValidationLevel::Parseable));
    let e002: Vec<_> = validation
        .diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::MultipleH1)
        .collect();
    assert_eq!(e002.len(), 1);
    assert_eq!(e002[0].line, Some(second_title_line));
    assert_eq!(e002[0].level, ValidationLevel::Structural);
}

#[test]
fn test_oversized_document_is_full_dump() {
    let text = oversized_document(FULL_DUMP_THRESHOLD_BYTES);
    assert!(text.len() > FULL_DUMP_THRESHOLD_BYTES);

    let report = Pipeline::default().audit_text(&text).unwrap();

    // Links and sections would otherwise make this an index
    assert!(report.document.total_links() > 0);
    assert_eq!(report.classification.document_type, DocumentType::Full);
    assert_eq!(report.classification.document_type.as_str(), "full-dump");
    assert!(report.validation.has_code(DiagnosticCode::FullDumpDetected));
}

#[tokio::test(start_paused = true)]
async fn test_repeated_timeouts_fail_after_backoff() {
    let transport = Arc::new(HangingTransport::new());
    let pipeline = Pipeline::default().with_transport(transport.clone());
    let start = tokio::time::Instant::now();

    let err = pipeline.audit("https://example.com/llms.txt").await.unwrap_err();

    assert!(matches!(err, InputError::Timeout { attempts: 4, .. }), "{err}");
    assert_eq!(transport.calls(), 4);
    // Four 10s timeouts plus 1s + 2s + 4s of backoff
    assert!(start.elapsed() >= Duration::from_secs(47));
}
