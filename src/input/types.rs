//! Core types for input resolution

use super::mapping::MappedDocument;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Resolution errors. These are the only fatal failures in the pipeline and
/// are raised before any parsing happens.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Unsupported input type: {type_name}")]
    UnsupportedInputType { type_name: String },

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("File not readable: {path}: {reason}")]
    NotReadable { path: PathBuf, reason: String },

    #[error("Path is a directory: {0}")]
    IsADirectory(PathBuf),

    #[error("Path is not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("Invalid URL scheme '{scheme}' (only http and https are supported)")]
    InvalidUrlScheme { scheme: String },

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request to {url} timed out after {attempts} attempts")]
    Timeout { url: String, attempts: u32 },

    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    #[error("Response from {url} too large: {size} bytes (max: {max})")]
    ResponseTooLarge { url: String, size: u64, max: u64 },

    #[error("Content too large: {size} bytes (max: {max})")]
    ContentTooLarge { size: u64, max: u64 },

    #[error("Malformed mapping at '{key}': {reason}")]
    MalformedMapping { key: String, reason: String },

    #[error("Fetch of {url} was cancelled")]
    Cancelled { url: String },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for input resolution
pub type InputResult<T> = Result<T, InputError>;

/// A document to audit, before resolution.
#[derive(Debug, Clone)]
pub enum DocumentInput {
    Path(PathBuf),
    Url(String),
    Mapping(serde_json::Map<String, Value>),
}

fn looks_like_url(s: &str) -> bool {
    let lower = s.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl DocumentInput {
    /// Classify an untyped value: objects are mappings, strings are URLs or
    /// paths, anything else is rejected with its JSON type name.
    pub fn from_value(value: Value) -> InputResult<Self> {
        match value {
            Value::Object(map) => Ok(DocumentInput::Mapping(map)),
            Value::String(s) => Ok(DocumentInput::from(s)),
            other => Err(InputError::UnsupportedInputType {
                type_name: json_type_name(&other).to_string(),
            }),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            DocumentInput::Path(_) => SourceKind::Path,
            DocumentInput::Url(_) => SourceKind::Url,
            DocumentInput::Mapping(_) => SourceKind::Mapping,
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<&str> for DocumentInput {
    fn from(s: &str) -> Self {
        if looks_like_url(s) {
            DocumentInput::Url(s.trim().to_string())
        } else {
            DocumentInput::Path(PathBuf::from(s))
        }
    }
}

impl From<String> for DocumentInput {
    fn from(s: String) -> Self {
        DocumentInput::from(s.as_str())
    }
}

impl From<PathBuf> for DocumentInput {
    fn from(path: PathBuf) -> Self {
        match path.to_str() {
            Some(s) if looks_like_url(s) => DocumentInput::Url(s.trim().to_string()),
            _ => DocumentInput::Path(path),
        }
    }
}

impl From<&Path> for DocumentInput {
    fn from(path: &Path) -> Self {
        DocumentInput::from(path.to_path_buf())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Path,
    Url,
    Mapping,
}

/// Where a resolved document came from. Exactly one kind by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum SourceLocator {
    Path(PathBuf),
    Url(String),
    Mapping,
}

impl SourceLocator {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceLocator::Path(_) => SourceKind::Path,
            SourceLocator::Url(_) => SourceKind::Url,
            SourceLocator::Mapping => SourceKind::Mapping,
        }
    }
}

/// Raw resolved content
#[derive(Debug, Clone)]
pub enum InputPayload {
    Bytes(Vec<u8>),
    Mapping(MappedDocument),
}

/// Resolved raw input plus provenance.
#[derive(Debug, Clone, Serialize)]
pub struct InputSource {
    pub locator: SourceLocator,
    #[serde(skip)]
    pub payload: InputPayload,
    pub byte_size: u64,
    /// Charset declared by the transport (HTTP `Content-Type`), if any
    pub declared_charset: Option<String>,
    pub retrieved_at: DateTime<Utc>,
    /// Human-readable provenance for error messages
    pub description: String,
}

impl InputSource {
    pub fn from_bytes(locator: SourceLocator, bytes: Vec<u8>) -> Self {
        let description = match &locator {
            SourceLocator::Path(p) => format!("file {}", p.display()),
            SourceLocator::Url(u) => format!("url {}", u),
            SourceLocator::Mapping => "in-memory mapping".to_string(),
        };
        Self {
            locator,
            byte_size: bytes.len() as u64,
            payload: InputPayload::Bytes(bytes),
            declared_charset: None,
            retrieved_at: Utc::now(),
            description,
        }
    }

    pub fn from_mapping(mapping: MappedDocument, byte_size: u64) -> Self {
        Self {
            locator: SourceLocator::Mapping,
            payload: InputPayload::Mapping(mapping),
            byte_size,
            declared_charset: None,
            retrieved_at: Utc::now(),
            description: "in-memory mapping".to_string(),
        }
    }

    pub fn with_declared_charset(mut self, charset: Option<String>) -> Self {
        self.declared_charset = charset;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn kind(&self) -> SourceKind {
        self.locator.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_detection() {
        assert!(matches!(
            DocumentInput::from("https://example.com/llms.txt"),
            DocumentInput::Url(_)
        ));
        assert!(matches!(
            DocumentInput::from("HTTP://example.com"),
            DocumentInput::Url(_)
        ));
        assert!(matches!(
            DocumentInput::from("docs/llms.txt"),
            DocumentInput::Path(_)
        ));
        assert!(matches!(
            DocumentInput::from(PathBuf::from("https://example.com/x")),
            DocumentInput::Url(_)
        ));
    }

    #[test]
    fn test_from_value_detection_order() {
        let mapping = DocumentInput::from_value(json!({"title": "X", "sections": []})).unwrap();
        assert_eq!(mapping.kind(), SourceKind::Mapping);

        let url = DocumentInput::from_value(json!("https://example.com")).unwrap();
        assert_eq!(url.kind(), SourceKind::Url);

        let path = DocumentInput::from_value(json!("./llms.txt")).unwrap();
        assert_eq!(path.kind(), SourceKind::Path);
    }

    #[test]
    fn test_unsupported_type_named() {
        let err = DocumentInput::from_value(json!([1, 2])).unwrap_err();
        match err {
            InputError::UnsupportedInputType { type_name } => assert_eq!(type_name, "array"),
            other => panic!("unexpected error: {other}"),
        }
        let err = DocumentInput::from_value(json!(42)).unwrap_err();
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_source_description() {
        let source = InputSource::from_bytes(SourceLocator::Url("https://x.dev".into()), vec![1, 2]);
        assert_eq!(source.byte_size, 2);
        assert_eq!(source.description, "url https://x.dev");
        assert_eq!(source.kind(), SourceKind::Url);
    }
}
