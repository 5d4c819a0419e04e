//! OIEKG Loader - Plain-text document loading
//!
//! Walks an input directory, reads every regular file and strips
//! angle-bracket markup with a regular expression. This is a crude
//! stripper, not an HTML parser: entities are not decoded and a tag runs
//! from `<` to the first following `>`.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use oiekg_core::{Document, OiekgError, Result};

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag pattern is a valid regex"));

/// Remove every `<...>` span from `text`
pub fn strip_tags(text: &str) -> String {
    TAG_PATTERN.replace_all(text, "").into_owned()
}

/// Build a document from an inline string
pub fn load_text(id: impl Into<String>, text: &str) -> Document {
    Document::new(id, strip_tags(text))
}

// ============================================================================
// Directory loading
// ============================================================================

/// A file that could not be loaded
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of loading a directory tree
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Successfully loaded documents
    pub documents: Vec<Document>,

    /// Files that were found but could not be read
    pub skipped: Vec<SkippedFile>,
}

impl LoadReport {
    pub fn loaded(&self) -> usize {
        self.documents.len()
    }
}

/// Load every regular file below `root` as a document
///
/// Unreadable files are logged and skipped.
pub fn load_documents(root: impl AsRef<Path>) -> Result<Vec<Document>> {
    Ok(load_documents_with_report(root)?.documents)
}

/// Like [`load_documents`], also reporting skipped files
pub fn load_documents_with_report(root: impl AsRef<Path>) -> Result<LoadReport> {
    let root = root.as_ref();
    let metadata = std::fs::metadata(root).map_err(|e| OiekgError::Io {
        path: root.display().to_string(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(OiekgError::InvalidInput(format!(
            "input path is not a directory: {}",
            root.display()
        )));
    }

    let mut report = LoadReport::default();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries.filter_map(|e| e.ok()).collect::<Vec<_>>(),
            Err(e) => {
                tracing::warn!(path = %dir.display(), error = %e, "skipping unreadable directory");
                report.skipped.push(SkippedFile {
                    path: dir,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        entries.sort_by_key(|e| e.file_name());

        let mut subdirs = Vec::new();
        for entry in entries {
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot stat entry");
                    continue;
                }
            };

            // Directory symlinks are not descended; file symlinks are read
            if file_type.is_dir() {
                subdirs.push(path);
            } else if is_regular_file(&path) {
                match read_document(&path) {
                    Ok(document) => {
                        tracing::debug!(path = %path.display(), chars = document.text.len(), "loaded document");
                        report.documents.push(document);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file");
                        report.skipped.push(SkippedFile {
                            path,
                            reason: e.to_string(),
                        });
                    }
                }
            } else {
                tracing::debug!(path = %path.display(), "skipping non-regular entry");
            }
        }

        // Visit subdirectories in name order
        pending.extend(subdirs.into_iter().rev());
    }

    tracing::info!(
        root = %root.display(),
        loaded = report.loaded(),
        skipped = report.skipped.len(),
        "finished loading documents"
    );

    Ok(report)
}

/// Regular file after following symlinks
fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file())
        .unwrap_or(false)
}

fn read_document(path: &Path) -> Result<Document> {
    let raw = std::fs::read_to_string(path).map_err(|e| OiekgError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(load_text(path.display().to_string(), &raw))
}

// ============================================================================
// Tests
// ============================================================================
