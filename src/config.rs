//! Pipeline configuration
//!
//! Every stage reads its tunables from an explicit [`AuditConfig`] passed in
//! by the caller. There is no global state. The binary loads it from YAML.

use crate::enrichment::CyclePolicy;
use crate::schema::CanonicalSectionName;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// 10 MB cap on fetched response bodies
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 10 * 1024 * 1024;
/// 100 MB ceiling on any input processed in memory
pub const DEFAULT_MAX_INPUT_BYTES: usize = 100 * 1024 * 1024;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    pub fetch: FetchConfig,
    pub limits: LimitsConfig,
    pub sections: SectionsConfig,
    pub enrichment: EnrichmentConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Per-attempt timeout
    pub timeout_secs: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// First backoff delay; doubles on each retry
    pub backoff_base_ms: u64,
    pub max_response_bytes: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_retries: 3,
            backoff_base_ms: 1_000,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            user_agent: format!(
                "llms-audit/{} (llms.txt conformance validator)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay before retry `attempt` (1-based): base, 2×base, 4×base, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(factor))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_input_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionsConfig {
    /// Extra heading aliases, e.g. `cookbook: examples`
    pub aliases: HashMap<String, CanonicalSectionName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichmentConfig {
    pub cycle_policy: CyclePolicy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 8 }
    }
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: AuditConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be > 0".into()));
        }
        if self.batch.concurrency == 0 {
            return Err(ConfigError::Invalid("batch.concurrency must be > 0".into()));
        }
        if self.fetch.max_response_bytes > self.limits.max_input_bytes {
            return Err(ConfigError::Invalid(
                "fetch.max_response_bytes exceeds limits.max_input_bytes".into(),
            ));
        }
        Ok(())
    }

    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.enrichment.cycle_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::new();
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.fetch.max_retries, 3);
        assert_eq!(config.fetch.max_response_bytes, 10 * 1024 * 1024);
        assert_eq!(config.limits.max_input_bytes, 100 * 1024 * 1024);
        assert!(config.fetch.user_agent.starts_with("llms-audit/"));
    }

    #[test]
    fn test_backoff_doubles() {
        let fetch = FetchConfig::default();
        assert_eq!(fetch.backoff(1), Duration::from_secs(1));
        assert_eq!(fetch.backoff(2), Duration::from_secs(2));
        assert_eq!(fetch.backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
fetch:
  timeout_secs: 5
  max_retries: 1
sections:
  aliases:
    cookbook: examples
enrichment:
  cycle_policy: reject
"#;
        let config = AuditConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.max_retries, 1);
        assert_eq!(config.fetch.backoff_base_ms, 1_000);
        assert_eq!(
            config.sections.aliases.get("cookbook"),
            Some(&CanonicalSectionName::Examples)
        );
        assert_eq!(config.enrichment.cycle_policy, CyclePolicy::Reject);
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            AuditConfig::from_yaml("fetch:\n  retries: 2\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AuditConfig::from_yaml("batch:\n  concurrency: 0\n"),
            Err(ConfigError::Invalid(_))
        ));
    }
}
