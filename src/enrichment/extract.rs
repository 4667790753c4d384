//! Enrichment extraction
//!
//! Records come from three places:
//! - front matter keys `concepts`, `few_shot_examples`, `instructions`, `metadata`
//! - the same keys in fenced ```yaml blocks
//! - directive bullets in the LLM Instructions section
//!
//! Records that fail validation become notes; extraction itself never fails.

use super::graph::{ConceptGraph, CyclePolicy};
use super::types::{
    Concept, ConceptRelationship, DirectiveType, EnrichmentError, FewShotExample, LLMInstruction,
    Metadata, DEFAULT_PRIORITY,
};
use crate::parser::ParsedDocument;
use crate::preprocess::parse_yaml;
use crate::schema::{BudgetTierName, CanonicalSectionName, MAX_BUDGET_TOKENS};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashSet;
use tracing::debug;

const ENRICHMENT_KEYS: [&str; 4] = ["concepts", "few_shot_examples", "instructions", "metadata"];

#[derive(Deserialize)]
struct RawRelationship {
    target: String,
    #[serde(rename = "type", alias = "relationship")]
    kind: String,
}

#[derive(Deserialize)]
struct RawConcept {
    id: String,
    #[serde(default)]
    name: Option<String>,
    definition: String,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    relationships: Vec<RawRelationship>,
    #[serde(default)]
    domain: Option<String>,
}

#[derive(Deserialize)]
struct RawExample {
    #[serde(default)]
    id: Option<String>,
    question: String,
    answer: String,
    #[serde(default, alias = "concepts")]
    concept_ids: Vec<String>,
    #[serde(default)]
    intent: Option<String>,
}

#[derive(Deserialize)]
struct RawInstruction {
    #[serde(rename = "type", alias = "directive_type")]
    directive_type: DirectiveType,
    text: String,
    #[serde(default)]
    priority: Option<i64>,
    #[serde(default)]
    applies_to: Vec<String>,
}

#[derive(Deserialize)]
struct RawMetadata {
    schema_version: String,
    #[serde(default)]
    site_name: Option<String>,
    #[serde(default)]
    site_url: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    token_budget_tier: Option<BudgetTierName>,
}

fn concept_from_raw(raw: RawConcept) -> Result<Concept, EnrichmentError> {
    let name = raw.name.unwrap_or_else(|| raw.id.clone());
    let mut concept = Concept::new(raw.id, name, raw.definition)?.with_aliases(raw.aliases);
    for rel in raw.relationships {
        let kind = rel.kind.parse()?;
        concept = concept.with_relationship(ConceptRelationship::new(rel.target, kind)?);
    }
    if let Some(domain) = raw.domain {
        concept = concept.with_domain(domain);
    }
    Ok(concept)
}

fn example_from_raw(raw: RawExample, index: usize) -> Result<FewShotExample, EnrichmentError> {
    let id = raw.id.unwrap_or_else(|| format!("example-{}", index + 1));
    let mut example = FewShotExample::new(id, raw.question, raw.answer)?.with_concepts(raw.concept_ids)?;
    if let Some(intent) = raw.intent {
        example = example.with_intent(intent);
    }
    Ok(example)
}

fn instruction_from_raw(raw: RawInstruction) -> Result<LLMInstruction, EnrichmentError> {
    let priority = raw.priority.unwrap_or(DEFAULT_PRIORITY as i64);
    Ok(LLMInstruction::new(raw.directive_type, raw.text, priority)?.with_applies_to(raw.applies_to))
}

fn metadata_from_raw(raw: RawMetadata) -> Result<Metadata, EnrichmentError> {
    Ok(Metadata::new(raw.schema_version)?
        .with_site(raw.site_name, raw.site_url)
        .with_last_updated(raw.last_updated)
        .with_token_budget_tier(raw.token_budget_tier))
}

/// Everything extracted from one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Enrichment {
    pub concepts: Vec<Concept>,
    pub few_shot_examples: Vec<FewShotExample>,
    pub instructions: Vec<LLMInstruction>,
    pub metadata: Option<Metadata>,
    pub graph: Option<ConceptGraph>,
    /// Records skipped during extraction, with the reason
    pub notes: Vec<String>,
}

impl Enrichment {
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
            && self.few_shot_examples.is_empty()
            && self.instructions.is_empty()
            && self.metadata.is_none()
    }

    /// Token budget from the declared tier, or the largest tier's budget.
    pub fn token_budget(&self) -> usize {
        self.metadata
            .as_ref()
            .and_then(|m| m.token_budget_tier)
            .map(|tier| tier.tier().max_tokens)
            .unwrap_or(MAX_BUDGET_TOKENS)
    }
}

/// Pulls enrichment records out of a parsed document.
pub struct EnrichmentExtractor {
    cycle_policy: CyclePolicy,
}

impl Default for EnrichmentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrichmentExtractor {
    pub fn new() -> Self {
        Self {
            cycle_policy: CyclePolicy::default(),
        }
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    pub fn extract(&self, doc: &ParsedDocument) -> Enrichment {
        let mut out = Enrichment::default();

        if let Some(front_matter) = &doc.front_matter {
            self.collect_block(front_matter, "front matter", &mut out);
        }

        for block in doc.code_blocks() {
            let is_yaml = matches!(
                block.language.as_deref().map(str::to_ascii_lowercase).as_deref(),
                Some("yaml") | Some("yml")
            );
            if !is_yaml {
                continue;
            }
            match parse_yaml(&block.content) {
                Ok(value) => {
                    let source = format!("yaml block at line {}", block.line);
                    self.collect_block(&value, &source, &mut out);
                }
                Err(e) => out.notes.push(format!("yaml block at line {}: {}", block.line, e)),
            }
        }

        if let Some(section) = doc.section(CanonicalSectionName::LlmInstructions) {
            for text in bullet_lines(section.body()) {
                if let Some(directive) = LLMInstruction::classify_bullet(text) {
                    match LLMInstruction::new(directive, text, DEFAULT_PRIORITY as i64) {
                        Ok(instruction) => out.instructions.push(instruction),
                        Err(e) => out.notes.push(format!("instruction bullet: {}", e)),
                    }
                }
            }
        }

        if !out.concepts.is_empty() {
            match ConceptGraph::build(&out.concepts, self.cycle_policy) {
                Ok(graph) => out.graph = Some(graph),
                Err(e) => out.notes.push(e.to_string()),
            }
        }

        debug!(
            concepts = out.concepts.len(),
            examples = out.few_shot_examples.len(),
            instructions = out.instructions.len(),
            notes = out.notes.len(),
            "extracted enrichment"
        );
        out
    }

    fn collect_block(&self, value: &Value, source: &str, out: &mut Enrichment) {
        if !ENRICHMENT_KEYS.iter().any(|k| value.get(*k).is_some()) {
            return;
        }

        let mut seen: HashSet<String> = out.concepts.iter().map(|c| c.id.clone()).collect();
        for (i, item) in sequence(value.get("concepts")).iter().enumerate() {
            let built = serde_yaml::from_value::<RawConcept>((*item).clone())
                .map_err(|e| malformed("concept", e))
                .and_then(concept_from_raw);
            match built {
                Ok(concept) if seen.insert(concept.id.clone()) => out.concepts.push(concept),
                Ok(concept) => out
                    .notes
                    .push(format!("{}: duplicate concept id '{}'", source, concept.id)),
                Err(e) => out.notes.push(format!("{}: concepts[{}]: {}", source, i, e)),
            }
        }

        let offset = out.few_shot_examples.len();
        for (i, item) in sequence(value.get("few_shot_examples")).iter().enumerate() {
            let built = serde_yaml::from_value::<RawExample>((*item).clone())
                .map_err(|e| malformed("few-shot example", e))
                .and_then(|raw| example_from_raw(raw, offset + i));
            match built {
                Ok(example) => out.few_shot_examples.push(example),
                Err(e) => out
                    .notes
                    .push(format!("{}: few_shot_examples[{}]: {}", source, i, e)),
            }
        }

        for (i, item) in sequence(value.get("instructions")).iter().enumerate() {
            let built = serde_yaml::from_value::<RawInstruction>((*item).clone())
                .map_err(|e| malformed("instruction", e))
                .and_then(instruction_from_raw);
            match built {
                Ok(instruction) => out.instructions.push(instruction),
                Err(e) => out.notes.push(format!("{}: instructions[{}]: {}", source, i, e)),
            }
        }

        if let Some(raw) = value.get("metadata") {
            let built = serde_yaml::from_value::<RawMetadata>(raw.clone())
                .map_err(|e| malformed("metadata", e))
                .and_then(metadata_from_raw);
            match built {
                Ok(metadata) if out.metadata.is_none() => out.metadata = Some(metadata),
                Ok(_) => out.notes.push(format!("{}: metadata already defined", source)),
                Err(e) => out.notes.push(format!("{}: metadata: {}", source, e)),
            }
        }
    }
}

fn malformed(record: &'static str, e: serde_yaml::Error) -> EnrichmentError {
    EnrichmentError::Malformed {
        record,
        reason: e.to_string(),
    }
}

fn sequence(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Sequence(items)) => items.iter().collect(),
        _ => Vec::new(),
    }
}

/// Text of top-level `-`, `*`, or `+` bullets.
fn bullet_lines(body: &str) -> impl Iterator<Item = &str> {
    body.lines().filter_map(|line| {
        let trimmed = line.trim_start();
        ["- ", "* ", "+ "]
            .iter()
            .find_map(|marker| trimmed.strip_prefix(marker))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}
