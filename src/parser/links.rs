//! Link classification and description parsing

use super::types::LinkKind;
use url::Url;

/// Classify a link destination.
pub fn classify_link(url: &str) -> LinkKind {
    let url = url.trim();
    if url.starts_with('#') {
        LinkKind::Anchor
    } else if has_scheme(url) {
        LinkKind::Absolute
    } else {
        LinkKind::Relative
    }
}

/// `scheme:` prefix per RFC 3986 (letter, then letters/digits/`+-.`).
fn has_scheme(url: &str) -> bool {
    match url.find(':') {
        Some(pos) if pos > 0 => {
            let scheme = &url[..pos];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// A destination is well formed when it is non-empty, has no whitespace,
/// and parses as a URL if it carries a scheme.
pub fn is_well_formed(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() || url.chars().any(char::is_whitespace) {
        return false;
    }
    if url == "#" {
        return false;
    }
    if has_scheme(url) {
        return match Url::parse(url) {
            Ok(parsed) => match parsed.scheme() {
                "http" | "https" => parsed.host_str().map_or(false, |h| !h.is_empty()),
                _ => true,
            },
            Err(_) => false,
        };
    }
    true
}

/// A list item whose whole text is a bare `http(s)://` URL.
pub fn bare_url(text: &str) -> Option<&str> {
    let text = text.trim();
    let lower = text.to_ascii_lowercase();
    let is_http = lower.starts_with("http://") || lower.starts_with("https://");
    (is_http && !text.chars().any(char::is_whitespace)).then_some(text)
}

/// Description text following a link: leading `:` / `-` / `–` / `—`
/// separators stripped, `None` when nothing remains.
pub fn clean_description(trailing: &str) -> Option<String> {
    let cleaned = trailing
        .trim()
        .trim_start_matches([':', '-', '\u{2013}', '\u{2014}'])
        .trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Recover `[title](dest)` from text the markdown parser did not accept as a
/// link, e.g. a destination containing spaces.
pub fn recover_link_syntax(text: &str) -> Option<(String, String, String)> {
    let text = text.trim();
    let rest = text.strip_prefix('[')?;
    let close = rest.find("](")?;
    let title = &rest[..close];
    let after = &rest[close + 2..];
    let end = after.find(')')?;
    Some((
        title.to_string(),
        after[..end].to_string(),
        after[end + 1..].to_string(),
    ))
}
