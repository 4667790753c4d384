//! Preprocessing: bytes → normalized text
//!
//! Steps run in order and each is idempotent:
//! 1. decode (BOM sniff, UTF-8, Latin-1, Windows-1252)
//! 2. strip a leading U+FEFF
//! 3. normalize CRLF / CR to LF, remembering the original style
//! 4. split off YAML front matter
//! 5. expand tabs, record front-matter pitfalls
//!
//! Nothing here fails except the input size ceiling.

mod encoding;
mod frontmatter;
mod pitfalls;

pub use encoding::{decode, DetectedEncoding};
pub use frontmatter::{parse_yaml, split_front_matter, FrontMatter};
pub use pitfalls::{dedupe_top_level, Advisory, AdvisoryKind, AMBIGUOUS_SCALARS};

use crate::input::{InputError, InputResult};
use serde::Serialize;
use tracing::{debug, warn};

/// Line-ending style of the source before normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEndingStyle {
    /// No line breaks at all
    None,
    Lf,
    Crlf,
    Cr,
    Mixed,
}

impl LineEndingStyle {
    pub fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        let (mut lf, mut crlf, mut cr) = (0usize, 0usize, 0usize);
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    crlf += 1;
                    i += 1;
                }
                b'\r' => cr += 1,
                b'\n' => lf += 1,
                _ => {}
            }
            i += 1;
        }
        match (lf > 0, crlf > 0, cr > 0) {
            (false, false, false) => LineEndingStyle::None,
            (true, false, false) => LineEndingStyle::Lf,
            (false, true, false) => LineEndingStyle::Crlf,
            (false, false, true) => LineEndingStyle::Cr,
            _ => LineEndingStyle::Mixed,
        }
    }

    /// Any carriage return present.
    pub fn has_cr(&self) -> bool {
        matches!(
            self,
            LineEndingStyle::Crlf | LineEndingStyle::Cr | LineEndingStyle::Mixed
        )
    }
}

pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Maps body lines back to source lines.
///
/// Normalization is one line in, one line out, so the only shift is the
/// front-matter block removed from the top.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineMap {
    offset: usize,
}

impl LineMap {
    pub fn new(offset: usize) -> Self {
        Self { offset }
    }

    /// 1-indexed body line → 1-indexed source line
    pub fn to_source(&self, body_line: usize) -> usize {
        body_line + self.offset
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Normalized text handed to the parser plus everything learned on the way.
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessedDocument {
    /// Body after front matter, LF-only, tabs expanded
    #[serde(skip)]
    pub body: String,
    pub encoding: DetectedEncoding,
    pub had_bom: bool,
    pub line_endings: LineEndingStyle,
    pub front_matter: Option<FrontMatter>,
    pub advisories: Vec<Advisory>,
    pub line_map: LineMap,
    /// Size of the raw input in bytes
    pub byte_size: usize,
    pub tabs_expanded: usize,
    /// U+FFFD characters in the decoded text
    pub replacement_chars: usize,
}

impl PreprocessedDocument {
    /// Whitespace-only input with no front matter.
    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty() && self.front_matter.is_none()
    }
}

/// Byte-level preprocessor with an input size ceiling.
pub struct Preprocessor {
    max_input_bytes: usize,
}

impl Preprocessor {
    pub fn new(max_input_bytes: usize) -> Self {
        Self { max_input_bytes }
    }

    /// Preprocess raw bytes.
    pub fn run(&self, bytes: &[u8], declared_charset: Option<&str>) -> InputResult<PreprocessedDocument> {
        if bytes.len() > self.max_input_bytes {
            return Err(InputError::ContentTooLarge {
                size: bytes.len() as u64,
                max: self.max_input_bytes as u64,
            });
        }

        let (decoded, encoding) = decode(bytes, declared_charset);
        if !encoding.is_utf8() {
            warn!(encoding = %encoding, "input is not UTF-8; decoded with fallback");
        }
        Ok(self.normalize(decoded, encoding, bytes.len()))
    }

    /// Preprocess already-decoded text.
    pub fn run_text(&self, text: &str) -> InputResult<PreprocessedDocument> {
        if text.len() > self.max_input_bytes {
            return Err(InputError::ContentTooLarge {
                size: text.len() as u64,
                max: self.max_input_bytes as u64,
            });
        }
        Ok(self.normalize(text.to_string(), DetectedEncoding::Utf8, text.len()))
    }

    fn normalize(&self, decoded: String, encoding: DetectedEncoding, byte_size: usize) -> PreprocessedDocument {
        let (decoded, stripped_bom) = match decoded.strip_prefix('\u{FEFF}') {
            Some(rest) => (rest.to_string(), true),
            None => (decoded, false),
        };
        let had_bom = stripped_bom
            || matches!(
                encoding,
                DetectedEncoding::Utf8Bom | DetectedEncoding::Utf16Le | DetectedEncoding::Utf16Be
            );

        let line_endings = LineEndingStyle::detect(&decoded);
        let text = if line_endings.has_cr() {
            normalize_line_endings(&decoded)
        } else {
            decoded
        };
        let replacement_chars = text.chars().filter(|&c| c == '\u{FFFD}').count();

        // Front matter included: YAML rejects tab indentation
        let tabs_expanded = text.matches('\t').count();
        let text = if tabs_expanded > 0 {
            text.replace('\t', "    ")
        } else {
            text
        };

        let (split, body) = split_front_matter(&text);
        let mut advisories = Vec::new();
        let (front_matter, offset) = match split {
            Some((yaml, line_count)) => {
                advisories.extend(pitfalls::scan(&yaml, 2));
                let repaired = dedupe_top_level(&yaml);
                let parsed = parse_yaml(repaired.as_deref().unwrap_or(&yaml));
                let (value, parse_error) = match parsed {
                    Ok(v) => (Some(v), None),
                    Err(e) => {
                        advisories.push(Advisory {
                            kind: AdvisoryKind::FrontMatterParseError,
                            line: 1,
                            key: None,
                            message: e.clone(),
                            suggestion: Some("Fix the YAML between the '---' delimiters".into()),
                        });
                        (None, Some(e))
                    }
                };
                (
                    Some(FrontMatter {
                        raw: yaml,
                        value,
                        parse_error,
                        line_count,
                    }),
                    line_count,
                )
            }
            None => (None, 0),
        };

        let body = body.to_string();

        debug!(
            %encoding,
            ?line_endings,
            front_matter = front_matter.is_some(),
            advisories = advisories.len(),
            "preprocessed input"
        );

        PreprocessedDocument {
            body,
            encoding,
            had_bom,
            line_endings,
            front_matter,
            advisories,
            line_map: LineMap::new(offset),
            byte_size,
            tabs_expanded,
            replacement_chars,
        }
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_INPUT_BYTES)
    }
}
