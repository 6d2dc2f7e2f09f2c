use std::path::{Path, PathBuf};

use crate::error::WorkerError;

/// Loads the text of a document from its identifier.
pub trait DocumentReader {
    fn read(&self, document: &str) -> Result<String, WorkerError>;
}

/// Reads documents from the local filesystem. Line terminators are dropped
/// and the lines concatenated, so a keyword may match across a line break.
/// Bytes that are not valid UTF-8 become U+FFFD; the rest of the text is
/// still matched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReader;

impl DocumentReader for FileReader {
    fn read(&self, document: &str) -> Result<String, WorkerError> {
        let bytes = std::fs::read(document).map_err(|e| WorkerError::ReadDocument {
            path: PathBuf::from(document),
            source: e,
        })?;
        Ok(String::from_utf8_lossy(&bytes).lines().collect())
    }
}

/// The name a document is reported under: the final component of its path.
pub fn document_name(document: &str) -> String {
    Path::new(document)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| document.to_string())
}
