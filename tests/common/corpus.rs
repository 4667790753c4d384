//! Fixture corpus loading
//!
//! Each fixture sits in a directory named after the grade it should earn,
//! e.g. `tests/fixtures/strong/lumen.txt`.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// One fixture file and the grade its directory promises.
#[derive(Debug)]
pub struct FixtureDocument {
    /// Path relative to the fixtures root
    pub relative_path: PathBuf,
    pub path: PathBuf,
    pub expected_grade: String,
    pub bytes: Vec<u8>,
}

/// Every fixture under the root, sorted by path.
#[derive(Debug)]
pub struct FixtureCorpus {
    pub root_path: PathBuf,
    pub documents: Vec<FixtureDocument>,
}

impl FixtureCorpus {
    pub fn load() -> Result<Self, CorpusError> {
        Self::load_from(&fixtures_root())
    }

    pub fn load_from(root: &Path) -> Result<Self, CorpusError> {
        if !root.exists() {
            return Err(CorpusError::NotFound(root.to_path_buf()));
        }
        let documents = load_fixture_files(root)?;
        if documents.is_empty() {
            return Err(CorpusError::Empty(root.to_path_buf()));
        }
        Ok(Self {
            root_path: root.to_path_buf(),
            documents,
        })
    }

    pub fn with_grade<'a>(&'a self, grade: &'a str) -> impl Iterator<Item = &'a FixtureDocument> {
        self.documents.iter().filter(move |d| d.expected_grade == grade)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

/// `tests/fixtures` under the crate root
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn load_fixture_files(root: &Path) -> Result<Vec<FixtureDocument>, CorpusError> {
    let mut documents = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "txt") {
            continue;
        }

        let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let expected_grade = relative_path
            .components()
            .next()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .ok_or_else(|| CorpusError::Layout(path.to_path_buf()))?;
        let bytes = std::fs::read(path).map_err(|e| CorpusError::Io(path.to_path_buf(), e))?;

        documents.push(FixtureDocument {
            relative_path,
            path: path.to_path_buf(),
            expected_grade,
            bytes,
        });
    }

    Ok(documents)
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("fixture root not found: {0}")]
    NotFound(PathBuf),

    #[error("no fixtures under {0}")]
    Empty(PathBuf),

    #[error("fixture not inside a grade directory: {0}")]
    Layout(PathBuf),

    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, std::io::Error),
}
