//! Document loader: reads PDF and TXT files from a source directory.
//!
//! Failures are per-file: a file that cannot be read or parsed is logged and
//! skipped, and the directory scan continues.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::document::DocumentRecord;
use crate::error::Result;

/// Loads documents from a data directory into [`DocumentRecord`]s.
///
/// The record origin is the file name. Entries are processed in sorted order
/// so repeated runs produce records in the same order.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    data_dir: PathBuf,
}

impl DocumentLoader {
    /// Create a loader for the given directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into() }
    }

    /// The directory this loader scans.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load all supported documents (`.pdf`, `.txt`) from the data directory.
    ///
    /// A missing directory yields an empty result with a warning, not an
    /// error; whether "no documents" is fatal is the caller's decision.
    pub fn load_all(&self) -> Result<Vec<DocumentRecord>> {
        if !self.data_dir.is_dir() {
            warn!(dir = %self.data_dir.display(), "data directory does not exist");
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.data_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let mut records = Vec::new();
        for path in paths {
            let extension =
                path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
            let extracted = match extension.as_deref() {
                Some("txt") => read_text(&path),
                Some("pdf") => read_pdf(&path),
                _ => continue,
            };

            let origin = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };

            match extracted {
                Ok(text) => {
                    info!(file = %origin, chars = text.chars().count(), "loaded document");
                    records.push(DocumentRecord::new(text, origin));
                }
                Err(message) => {
                    // One broken file must not abort the whole scan.
                    warn!(file = %origin, error = %message, "skipping unreadable file");
                }
            }
        }

        info!(count = records.len(), dir = %self.data_dir.display(), "documents loaded");
        Ok(records)
    }
}

fn read_text(path: &Path) -> std::result::Result<String, String> {
    fs::read_to_string(path).map_err(|e| e.to_string())
}

fn read_pdf(path: &Path) -> std::result::Result<String, String> {
    pdf_extract::extract_text(path).map_err(|e| e.to_string())
}
