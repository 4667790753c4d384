//! Enrichment records with construction-time validation
//!
//! Every record is built through a fallible constructor, so an invalid
//! concept id or a too-short answer can never exist as a value.

use crate::schema::BudgetTierName;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const MIN_DEFINITION_CHARS: usize = 10;
pub const MIN_QUESTION_CHARS: usize = 10;
pub const MIN_ANSWER_CHARS: usize = 50;
pub const MAX_PRIORITY: i64 = 100;
pub const DEFAULT_PRIORITY: u8 = 50;

/// Errors building enrichment records
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EnrichmentError {
    #[error("Invalid concept id '{0}': must match [a-z0-9-]+")]
    InvalidConceptId(String),

    #[error("Definition of '{id}' too short: {len} chars (min: 10)")]
    DefinitionTooShort { id: String, len: usize },

    #[error("Question of '{id}' too short: {len} chars (min: 10)")]
    QuestionTooShort { id: String, len: usize },

    #[error("Answer of '{id}' too short: {len} chars (min: 50)")]
    AnswerTooShort { id: String, len: usize },

    #[error("Priority {0} out of range (0-100)")]
    PriorityOutOfRange(i64),

    #[error("Invalid schema version '{0}': expected MAJOR.MINOR.PATCH")]
    InvalidSchemaVersion(String),

    #[error("Unknown relationship type '{0}'")]
    UnknownRelationshipType(String),

    #[error("Instruction text is empty")]
    EmptyInstruction,

    #[error("Concept graph contains a cycle: {}", .0.join(" -> "))]
    CycleDetected(Vec<String>),

    #[error("Malformed {record}: {reason}")]
    Malformed { record: &'static str, reason: String },
}

/// Concept ids are lowercase ASCII letters, digits, and hyphens.
pub fn is_valid_concept_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn check_concept_id(id: &str) -> Result<(), EnrichmentError> {
    if is_valid_concept_id(id) {
        Ok(())
    } else {
        Err(EnrichmentError::InvalidConceptId(id.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    DependsOn,
    RelatesTo,
    ConflictsWith,
    Specializes,
    Supersedes,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::DependsOn => "depends_on",
            RelationshipType::RelatesTo => "relates_to",
            RelationshipType::ConflictsWith => "conflicts_with",
            RelationshipType::Specializes => "specializes",
            RelationshipType::Supersedes => "supersedes",
        }
    }

    /// Relationships that impose an ordering; cycles among these are suspect.
    pub fn is_directed(&self) -> bool {
        matches!(
            self,
            RelationshipType::DependsOn | RelationshipType::Specializes | RelationshipType::Supersedes
        )
    }
}

impl std::str::FromStr for RelationshipType {
    type Err = EnrichmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "depends_on" => Ok(RelationshipType::DependsOn),
            "relates_to" => Ok(RelationshipType::RelatesTo),
            "conflicts_with" => Ok(RelationshipType::ConflictsWith),
            "specializes" => Ok(RelationshipType::Specializes),
            "supersedes" => Ok(RelationshipType::Supersedes),
            _ => Err(EnrichmentError::UnknownRelationshipType(s.to_string())),
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptRelationship {
    pub target: String,
    pub relationship: RelationshipType,
}

impl ConceptRelationship {
    pub fn new(target: impl Into<String>, relationship: RelationshipType) -> Result<Self, EnrichmentError> {
        let target = target.into();
        check_concept_id(&target)?;
        Ok(Self {
            target,
            relationship,
        })
    }
}

/// A named domain concept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    pub definition: String,
    pub aliases: Vec<String>,
    pub relationships: Vec<ConceptRelationship>,
    pub domain: Option<String>,
}

impl Concept {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        definition: impl Into<String>,
    ) -> Result<Self, EnrichmentError> {
        let id = id.into();
        let definition = definition.into();
        check_concept_id(&id)?;
        let len = definition.trim().chars().count();
        if len < MIN_DEFINITION_CHARS {
            return Err(EnrichmentError::DefinitionTooShort { id, len });
        }
        Ok(Self {
            id,
            name: name.into(),
            definition,
            aliases: Vec::new(),
            relationships: Vec::new(),
            domain: None,
        })
    }

    pub fn with_aliases(mut self, aliases: Vec<String>) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_relationship(mut self, relationship: ConceptRelationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// An intent-tagged question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FewShotExample {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub concept_ids: Vec<String>,
    pub intent: Option<String>,
}

impl FewShotExample {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Self, EnrichmentError> {
        let id = id.into();
        let question = question.into();
        let answer = answer.into();
        let q_len = question.trim().chars().count();
        if q_len < MIN_QUESTION_CHARS {
            return Err(EnrichmentError::QuestionTooShort { id, len: q_len });
        }
        let a_len = answer.trim().chars().count();
        if a_len < MIN_ANSWER_CHARS {
            return Err(EnrichmentError::AnswerTooShort { id, len: a_len });
        }
        Ok(Self {
            id,
            question,
            answer,
            concept_ids: Vec::new(),
            intent: None,
        })
    }

    /// Link to concepts; each id must be a valid concept id.
    pub fn with_concepts(mut self, concept_ids: Vec<String>) -> Result<Self, EnrichmentError> {
        for id in &concept_ids {
            check_concept_id(id)?;
        }
        self.concept_ids = concept_ids;
        Ok(self)
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveType {
    Positive,
    Negative,
    Conditional,
}

/// An agent-facing directive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LLMInstruction {
    pub directive_type: DirectiveType,
    pub text: String,
    pub priority: u8,
    pub applies_to: Vec<String>,
}

impl LLMInstruction {
    pub fn new(
        directive_type: DirectiveType,
        text: impl Into<String>,
        priority: i64,
    ) -> Result<Self, EnrichmentError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EnrichmentError::EmptyInstruction);
        }
        if !(0..=MAX_PRIORITY).contains(&priority) {
            return Err(EnrichmentError::PriorityOutOfRange(priority));
        }
        Ok(Self {
            directive_type,
            text,
            priority: priority as u8,
            applies_to: Vec::new(),
        })
    }

    pub fn with_applies_to(mut self, applies_to: Vec<String>) -> Self {
        self.applies_to = applies_to;
        self
    }

    /// Classify a bullet by its leading word.
    ///
    /// Always/Do → positive, Never/Don't/Do not/Avoid → negative,
    /// If/When → conditional.
    pub fn classify_bullet(text: &str) -> Option<DirectiveType> {
        let lower = text.trim().to_lowercase();
        let lower = lower.trim_start_matches(['*', '_']);
        let starts = |prefix: &str| {
            lower.starts_with(prefix)
                && lower[prefix.len()..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_alphanumeric())
        };
        if starts("never") || starts("don't") || starts("don\u{2019}t") || starts("do not") || starts("avoid") {
            Some(DirectiveType::Negative)
        } else if starts("always") || starts("do") {
            Some(DirectiveType::Positive)
        } else if starts("if") || starts("when") {
            Some(DirectiveType::Conditional)
        } else {
            None
        }
    }
}

/// `MAJOR.MINOR.PATCH` with optional `-pre` / `+build` suffixes.
pub fn is_semver(version: &str) -> bool {
    let core = version
        .split(['-', '+'])
        .next()
        .unwrap_or_default();
    let parts: Vec<&str> = core.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub schema_version: String,
    pub site_name: Option<String>,
    pub site_url: Option<String>,
    pub last_updated: Option<String>,
    pub token_budget_tier: Option<BudgetTierName>,
}

impl Metadata {
    pub fn new(schema_version: impl Into<String>) -> Result<Self, EnrichmentError> {
        let schema_version = schema_version.into();
        if !is_semver(schema_version.trim()) {
            return Err(EnrichmentError::InvalidSchemaVersion(schema_version));
        }
        Ok(Self {
            schema_version,
            site_name: None,
            site_url: None,
            last_updated: None,
            token_budget_tier: None,
        })
    }

    pub fn with_site(mut self, name: Option<String>, url: Option<String>) -> Self {
        self.site_name = name;
        self.site_url = url;
        self
    }

    pub fn with_last_updated(mut self, last_updated: Option<String>) -> Self {
        self.last_updated = last_updated;
        self
    }

    pub fn with_token_budget_tier(mut self, tier: Option<BudgetTierName>) -> Self {
        self.token_budget_tier = tier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concept_id_pattern() {
        assert!(Concept::new("api-key-auth", "API Key Auth", "Authenticate with a key").is_ok());
        assert_eq!(
            Concept::new("API Key", "API Key", "Authenticate with a key").unwrap_err(),
            EnrichmentError::InvalidConceptId("API Key".into())
        );
        assert!(Concept::new("", "x", "long enough definition").is_err());
    }

    #[test]
    fn test_concept_definition_length() {
        let err = Concept::new("auth", "Auth", "short").unwrap_err();
        assert!(matches!(err, EnrichmentError::DefinitionTooShort { len: 5, .. }));
    }

    #[test]
    fn test_relationship_target_checked() {
        assert!(ConceptRelationship::new("Bad Target", RelationshipType::DependsOn).is_err());
        assert!(ConceptRelationship::new("tokens", RelationshipType::DependsOn).is_ok());
        assert_eq!(
            "depends-on".parse::<RelationshipType>().unwrap(),
            RelationshipType::DependsOn
        );
        assert!("likes".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn test_few_shot_lengths() {
        let answer = "Call client.auth() with your key, then retry the request once.";
        assert!(FewShotExample::new("q1", "How do I authenticate?", answer).is_ok());
        assert!(matches!(
            FewShotExample::new("q1", "Auth?", answer),
            Err(EnrichmentError::QuestionTooShort { .. })
        ));
        assert!(matches!(
            FewShotExample::new("q1", "How do I authenticate?", "Use a key."),
            Err(EnrichmentError::AnswerTooShort { .. })
        ));
    }

    #[test]
    fn test_instruction_priority_range() {
        assert!(LLMInstruction::new(DirectiveType::Positive, "Cite sources", 0).is_ok());
        assert!(LLMInstruction::new(DirectiveType::Positive, "Cite sources", 100).is_ok());
        assert_eq!(
            LLMInstruction::new(DirectiveType::Positive, "Cite sources", 101).unwrap_err(),
            EnrichmentError::PriorityOutOfRange(101)
        );
        assert!(LLMInstruction::new(DirectiveType::Negative, "  ", 10).is_err());
    }

    #[test]
    fn test_classify_bullet() {
        use DirectiveType::*;
        assert_eq!(LLMInstruction::classify_bullet("Always cite the docs"), Some(Positive));
        assert_eq!(LLMInstruction::classify_bullet("Do use v2 endpoints"), Some(Positive));
        assert_eq!(LLMInstruction::classify_bullet("Don't invent flags"), Some(Negative));
        assert_eq!(LLMInstruction::classify_bullet("Do not guess"), Some(Negative));
        assert_eq!(LLMInstruction::classify_bullet("**Never** expose keys"), Some(Negative));
        assert_eq!(LLMInstruction::classify_bullet("Avoid v1"), Some(Negative));
        assert_eq!(LLMInstruction::classify_bullet("When unsure, ask"), Some(Conditional));
        assert_eq!(LLMInstruction::classify_bullet("Documentation lives here"), None);
        assert_eq!(LLMInstruction::classify_bullet("Iffy wording"), None);
    }

    #[test]
    fn test_metadata_semver() {
        assert!(Metadata::new("1.0.0").is_ok());
        assert!(Metadata::new("2.1.3-beta.1").is_ok());
        assert!(Metadata::new("1.0").is_err());
        assert!(Metadata::new("v1.0.0").is_err());
    }
}
