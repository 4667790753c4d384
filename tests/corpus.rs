//! Audits every fixture under `tests/fixtures` and checks its grade
//!
//! Fixtures are resolved from disk so path resolution, decoding and
//! batching are exercised along with scoring.

mod common;

use common::FixtureCorpus;
use llms_audit::input::SourceLocator;
use llms_audit::{DocumentInput, Pipeline};

#[test]
fn test_fixture_corpus_loads() {
    let corpus = FixtureCorpus::load().unwrap();
    assert!(corpus.len() >= 4);
    for grade in ["exemplary", "strong", "needs-work", "critical"] {
        assert!(corpus.with_grade(grade).next().is_some(), "no {grade} fixture");
    }
}

#[tokio::test]
async fn test_fixture_grades() {
    let corpus = FixtureCorpus::load().unwrap();
    let pipeline = Pipeline::default();

    for fixture in &corpus.documents {
        let report = pipeline.audit(fixture.path.as_path()).await.unwrap();
        assert_eq!(
            report.score.grade.as_str(),
            fixture.expected_grade,
            "{} scored {:.1}",
            fixture.relative_path.display(),
            report.score.total
        );
        assert_eq!(report.source.byte_size, fixture.bytes.len() as u64);
        assert!(matches!(report.source.locator, Some(SourceLocator::Path(_))));
    }
}

#[tokio::test]
async fn test_fixture_batch_matches_single_audits() {
    let corpus = FixtureCorpus::load().unwrap();
    let pipeline = Pipeline::default();
    let inputs: Vec<DocumentInput> = corpus
        .documents
        .iter()
        .map(|f| DocumentInput::from(f.path.clone()))
        .collect();

    let batch = pipeline.audit_batch(inputs).await;

    assert_eq!(batch.len(), corpus.len());
    for (fixture, result) in corpus.documents.iter().zip(&batch) {
        let report = result.as_ref().unwrap();
        let single = pipeline.audit_bytes(&fixture.bytes).unwrap();
        assert_eq!(report.score.total, single.score.total);
        assert_eq!(
            report.validation.level_achieved,
            single.validation.level_achieved
        );
    }
}

#[test]
fn test_strong_fixture_breakdown() {
    let corpus = FixtureCorpus::load().unwrap();
    let fixture = corpus.with_grade("strong").next().unwrap();
    let report = Pipeline::default().audit_bytes(&fixture.bytes).unwrap();

    // No code, no version, no agent section
    assert_eq!(report.score.total, 74.0);
    let names: Vec<_> = report.anti_patterns.iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Example Void", "Silent Agent", "Versionless Drift"]);
}
