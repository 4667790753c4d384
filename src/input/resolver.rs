//! Input resolution: path / URL / mapping → `InputSource`

use super::cancel::CancellationToken;
use super::fetch::{HttpTransport, UrlFetcher};
use super::mapping::MappedDocument;
use super::types::{DocumentInput, InputError, InputResult, InputSource, SourceLocator};
use crate::config::AuditConfig;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Expand `~`, anchor relative paths at the working directory, and fold
/// `.`/`..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(_) => expanded,
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Read a local file, checking existence, kind, and size before reading.
pub fn read_path(path: &Path, max_bytes: usize) -> InputResult<InputSource> {
    let resolved = normalize_path(path);

    let metadata = match std::fs::metadata(&resolved) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(InputError::NotFound(resolved))
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(InputError::NotReadable {
                path: resolved,
                reason: e.to_string(),
            })
        }
        Err(source) => {
            return Err(InputError::Io {
                path: resolved,
                source,
            })
        }
    };

    if metadata.is_dir() {
        return Err(InputError::IsADirectory(resolved));
    }
    if !metadata.is_file() {
        return Err(InputError::NotAFile(resolved));
    }
    if metadata.len() > max_bytes as u64 {
        return Err(InputError::ContentTooLarge {
            size: metadata.len(),
            max: max_bytes as u64,
        });
    }

    let bytes = std::fs::read(&resolved).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => InputError::NotReadable {
            path: resolved.clone(),
            reason: e.to_string(),
        },
        _ => InputError::Io {
            path: resolved.clone(),
            source: e,
        },
    })?;

    debug!(path = %resolved.display(), bytes = bytes.len(), "read local file");
    Ok(InputSource::from_bytes(SourceLocator::Path(resolved), bytes))
}

/// Validate a mapping into a typed document.
pub fn read_mapping(map: &serde_json::Map<String, serde_json::Value>) -> InputResult<InputSource> {
    let document = MappedDocument::from_map(map)?;
    let byte_size = serde_json::to_vec(map).map(|v| v.len() as u64).unwrap_or(0);
    Ok(InputSource::from_mapping(document, byte_size))
}

/// Resolve any input. URL inputs go through a `reqwest` fetcher built from
/// `config.fetch`; the token lets a caller abandon a slow fetch.
pub async fn resolve(
    input: DocumentInput,
    config: &AuditConfig,
    cancel: &CancellationToken,
) -> InputResult<InputSource> {
    match input {
        DocumentInput::Url(_) => {
            let fetcher = UrlFetcher::new(config.fetch.clone())?;
            resolve_with(input, config, &fetcher, cancel).await
        }
        other => resolve_local(other, config),
    }
}

/// Like [`resolve`], with a caller-supplied fetcher for URL inputs.
pub async fn resolve_with<T: HttpTransport>(
    input: DocumentInput,
    config: &AuditConfig,
    fetcher: &UrlFetcher<T>,
    cancel: &CancellationToken,
) -> InputResult<InputSource> {
    match input {
        DocumentInput::Url(url) => {
            let source = fetcher.fetch(&url, cancel).await?;
            info!(source = %source.description, bytes = source.byte_size, "resolved input");
            Ok(source)
        }
        other => resolve_local(other, config),
    }
}

fn resolve_local(input: DocumentInput, config: &AuditConfig) -> InputResult<InputSource> {
    let source = match input {
        DocumentInput::Mapping(map) => read_mapping(&map)?,
        DocumentInput::Path(path) => read_path(&path, config.limits.max_input_bytes)?,
        DocumentInput::Url(url) => {
            return Err(InputError::InvalidUrl {
                url,
                reason: "URL inputs need a fetcher".into(),
            })
        }
    };
    info!(source = %source.description, bytes = source.byte_size, "resolved input");
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_normalize_folds_dots() {
        let normalized = normalize_path(Path::new("/a/b/./c/../d.txt"));
        assert_eq!(normalized, PathBuf::from("/a/b/d.txt"));
    }

    #[test]
    fn test_normalize_relative_is_absolute() {
        assert!(normalize_path(Path::new("llms.txt")).is_absolute());
    }

    #[test]
    fn test_normalize_expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(normalize_path(Path::new("~/llms.txt")), home.join("llms.txt"));
        }
    }

    #[test]
    fn test_read_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"# Title\n").unwrap();
        let source = read_path(file.path(), 1024).unwrap();
        assert_eq!(source.byte_size, 8);
        assert!(matches!(source.locator, SourceLocator::Path(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_path(&dir.path().join("nope.txt"), 1024).unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
    }

    #[test]
    fn test_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_path(dir.path(), 1024).unwrap_err();
        assert!(matches!(err, InputError::IsADirectory(_)));
    }

    #[test]
    fn test_size_ceiling_checked_before_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'x'; 64]).unwrap();
        let err = read_path(file.path(), 32).unwrap_err();
        assert!(matches!(err, InputError::ContentTooLarge { size: 64, max: 32 }));
    }

    #[tokio::test]
    async fn test_resolve_mapping() {
        let input = DocumentInput::from_value(json!({
            "title": "Acme",
            "sections": [{"name": "Docs", "links": []}]
        }))
        .unwrap();
        let source = resolve(input, &AuditConfig::new(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(matches!(source.locator, SourceLocator::Mapping));
        assert!(source.byte_size > 0);
    }

    #[tokio::test]
    async fn test_resolve_bad_scheme() {
        let input = DocumentInput::Url("ftp://example.com/llms.txt".into());
        let err = resolve(input, &AuditConfig::new(), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::InvalidUrlScheme { .. }));
    }
}
