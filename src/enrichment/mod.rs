//! Enrichment model: concepts, few-shot examples, agent instructions, metadata
//!
//! - **types**: validated record constructors and [`EnrichmentError`]
//! - **extract**: pulls records from front matter, yaml blocks, and directive bullets
//! - **graph**: concept relationship graph with dangling-edge and cycle reporting

mod extract;
mod graph;
mod types;

pub use extract::{Enrichment, EnrichmentExtractor};
pub use graph::{ConceptEdge, ConceptGraph, CyclePolicy};
pub use types::{
    is_semver, is_valid_concept_id, Concept, ConceptRelationship, DirectiveType, EnrichmentError,
    FewShotExample, LLMInstruction, Metadata, RelationshipType, DEFAULT_PRIORITY, MAX_PRIORITY,
    MIN_ANSWER_CHARS, MIN_DEFINITION_CHARS, MIN_QUESTION_CHARS,
};
