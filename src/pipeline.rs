//! Audit pipeline: resolve → preprocess → parse → classify → validate →
//! detect → score
//!
//! Resolution is the only fallible stage. Every later stage is a pure
//! function over the output of the one before, so a [`Pipeline`] holds no
//! per-document state and can be cloned into batch tasks freely.

use crate::antipattern::{AntiPatternDetector, AntiPatternFinding, DetectionContext};
use crate::classify::{classify, DocumentClassification};
use crate::config::AuditConfig;
use crate::enrichment::{Enrichment, EnrichmentExtractor};
use crate::input::{
    resolve, resolve_with, CancellationToken, DocumentInput, HttpTransport, InputError,
    InputPayload, InputSource, SourceLocator, UrlFetcher,
};
use crate::parser::{DocumentParser, ParsedDocument};
use crate::preprocess::{DetectedEncoding, LineEndingStyle, PreprocessedDocument, Preprocessor};
use crate::schema::SectionAliases;
use crate::scoring::{QualityScore, QualityScorer, ScoringContext};
use crate::signals::DocumentSignals;
use crate::validation::{ValidationContext, ValidationEngine, ValidationResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Result type for audits. Only resolution can fail.
pub type AuditResult<T> = Result<T, InputError>;

/// Provenance of an audited document.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSummary {
    /// `None` for text handed in directly
    pub locator: Option<SourceLocator>,
    pub description: String,
    pub byte_size: u64,
    pub retrieved_at: DateTime<Utc>,
    pub encoding: Option<DetectedEncoding>,
    pub line_endings: Option<LineEndingStyle>,
    pub had_bom: bool,
}

impl SourceSummary {
    fn inline(byte_size: usize) -> Self {
        Self {
            locator: None,
            description: "inline text".to_string(),
            byte_size: byte_size as u64,
            retrieved_at: Utc::now(),
            encoding: None,
            line_endings: None,
            had_bom: false,
        }
    }

    fn from_source(source: &InputSource) -> Self {
        Self {
            locator: Some(source.locator.clone()),
            description: source.description.clone(),
            byte_size: source.byte_size,
            retrieved_at: source.retrieved_at,
            encoding: None,
            line_endings: None,
            had_bom: false,
        }
    }

    fn with_preprocessing(mut self, pre: &PreprocessedDocument) -> Self {
        self.encoding = Some(pre.encoding);
        self.line_endings = Some(pre.line_endings);
        self.had_bom = pre.had_bom;
        self
    }
}

/// Everything learned about one document.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub source: SourceSummary,
    pub document: ParsedDocument,
    pub classification: DocumentClassification,
    pub validation: ValidationResult,
    pub anti_patterns: Vec<AntiPatternFinding>,
    pub score: QualityScore,
    pub enrichment: Enrichment,
}

impl AuditReport {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }
}

/// Configured audit pipeline.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<AuditConfig>,
    parser: Arc<DocumentParser>,
    detector: Arc<AntiPatternDetector>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(AuditConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: AuditConfig) -> Self {
        let aliases = SectionAliases::new().with_extra(&config.sections.aliases);
        Self {
            parser: Arc::new(DocumentParser::new().with_aliases(aliases)),
            detector: Arc::new(AntiPatternDetector::new()),
            config: Arc::new(config),
            transport: None,
        }
    }

    /// Fetch URLs through `transport` instead of a fresh `reqwest` client.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_detector(mut self, detector: AntiPatternDetector) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Resolve and audit one input.
    pub async fn audit(&self, input: impl Into<DocumentInput>) -> AuditResult<AuditReport> {
        self.audit_with_cancel(input, &CancellationToken::new()).await
    }

    /// Like [`audit`](Self::audit); a cancelled token abandons a URL fetch.
    pub async fn audit_with_cancel(
        &self,
        input: impl Into<DocumentInput>,
        cancel: &CancellationToken,
    ) -> AuditResult<AuditReport> {
        let input = input.into();
        let source = match &self.transport {
            Some(transport) => {
                let fetcher = UrlFetcher::with_transport(transport.clone(), self.config.fetch.clone());
                resolve_with(input, &self.config, &fetcher, cancel).await?
            }
            None => resolve(input, &self.config, cancel).await?,
        };
        self.audit_source(source)
    }

    /// Audit an already-resolved source.
    pub fn audit_source(&self, source: InputSource) -> AuditResult<AuditReport> {
        let summary = SourceSummary::from_source(&source);
        match &source.payload {
            InputPayload::Bytes(bytes) => {
                let pre = self.preprocessor().run(bytes, source.declared_charset.as_deref())?;
                let summary = summary.with_preprocessing(&pre);
                Ok(self.analyze(summary, Some(&pre)))
            }
            InputPayload::Mapping(mapping) => {
                let document = self.parser.parse_mapping(mapping);
                Ok(self.analyze_document(summary, document, None))
            }
        }
    }

    /// Audit markdown text.
    pub fn audit_text(&self, text: &str) -> AuditResult<AuditReport> {
        let pre = self.preprocessor().run_text(text)?;
        let summary = SourceSummary::inline(text.len()).with_preprocessing(&pre);
        Ok(self.analyze(summary, Some(&pre)))
    }

    /// Audit raw bytes in any supported encoding.
    pub fn audit_bytes(&self, bytes: &[u8]) -> AuditResult<AuditReport> {
        let pre = self.preprocessor().run(bytes, None)?;
        let summary = SourceSummary::inline(bytes.len()).with_preprocessing(&pre);
        Ok(self.analyze(summary, Some(&pre)))
    }

    /// Audit many inputs concurrently, bounded by `batch.concurrency`.
    ///
    /// Results come back in input order.
    pub async fn audit_batch(&self, inputs: Vec<DocumentInput>) -> Vec<AuditResult<AuditReport>> {
        let semaphore = Arc::new(Semaphore::new(self.config.batch.concurrency.max(1)));
        let total = inputs.len();
        info!(documents = total, concurrency = self.config.batch.concurrency, "starting batch");

        let handles: Vec<_> = inputs
            .into_iter()
            .map(|input| {
                let pipeline = self.clone();
                let semaphore = semaphore.clone();
                let label = describe_input(&input);
                let handle = tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await;
                    pipeline.audit(input).await
                });
                (label, handle)
            })
            .collect();

        let mut results = Vec::with_capacity(total);
        for (i, (label, handle)) in handles.into_iter().enumerate() {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => Err(InputError::Cancelled { url: label }),
            };
            if let Err(e) = &result {
                warn!(index = i, error = %e, "batch item failed");
            }
            results.push(result);
        }
        debug!(documents = total, "batch complete");
        results
    }

    fn preprocessor(&self) -> Preprocessor {
        Preprocessor::new(self.config.limits.max_input_bytes)
    }

    fn analyze(&self, summary: SourceSummary, pre: Option<&PreprocessedDocument>) -> AuditReport {
        let document = match pre {
            Some(pre) => self.parser.parse_preprocessed(pre),
            None => ParsedDocument::default(),
        };
        self.analyze_document(summary, document, pre)
    }

    fn analyze_document(
        &self,
        source: SourceSummary,
        document: ParsedDocument,
        pre: Option<&PreprocessedDocument>,
    ) -> AuditReport {
        let classification = classify(&document, source.byte_size as usize);
        let enrichment = EnrichmentExtractor::new()
            .with_cycle_policy(self.config.enrichment.cycle_policy)
            .extract(&document);
        let signals = DocumentSignals::compute(&document);

        let validation = ValidationEngine::new().validate(&ValidationContext {
            document: &document,
            preprocessed: pre,
            classification: &classification,
            enrichment: &enrichment,
            signals: &signals,
        });
        let anti_patterns = self.detector.detect(&DetectionContext {
            document: &document,
            preprocessed: pre,
            signals: &signals,
        });
        let score = QualityScorer::new().score(&ScoringContext {
            document: &document,
            signals: &signals,
            enrichment: &enrichment,
            findings: &anti_patterns,
        });

        info!(
            source = %source.description,
            level = ?validation.level_achieved,
            valid = validation.is_valid,
            score = score.total,
            grade = %score.grade,
            "audit complete"
        );

        AuditReport {
            source,
            document,
            classification,
            validation,
            anti_patterns,
            score,
            enrichment,
        }
    }
}

fn describe_input(input: &DocumentInput) -> String {
    match input {
        DocumentInput::Path(p) => p.display().to_string(),
        DocumentInput::Url(u) => u.clone(),
        DocumentInput::Mapping(_) => "mapping".to_string(),
    }
}
