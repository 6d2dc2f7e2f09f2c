use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::WorkerError;

pub const DEFAULT_EXTENSIONS: &[&str] = &[".html", ".txt", ".tex"];

/// Lists the documents of one directory whose extension is on an allowlist.
pub struct DirectoryScanner {
    input_directory: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryScanner {
    pub fn new<P: AsRef<Path>>(input_directory: P) -> Self {
        Self::with_extensions(
            input_directory,
            DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        )
    }

    /// Extensions are matched case-sensitively and include the leading dot.
    pub fn with_extensions<P: AsRef<Path>>(input_directory: P, extensions: Vec<String>) -> Self {
        Self {
            input_directory: input_directory.as_ref().to_path_buf(),
            extensions,
        }
    }

    /// Returns document identifiers sorted by path so every run enumerates
    /// documents in the same order.
    pub fn scan(&self) -> Result<Vec<String>, WorkerError> {
        let mut documents = Vec::new();

        for entry in WalkDir::new(&self.input_directory)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| WorkerError::ScanFailed {
                path: self.input_directory.clone(),
                source: e,
            })?;
            let path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }
            if !self.is_allowed(path) {
                continue;
            }

            match path.to_str() {
                Some(id) => {
                    debug!("Found document: {}", path.display());
                    documents.push(id.to_string());
                }
                None => warn!("Skipping document with non UTF-8 path: {}", path.display()),
            }
        }

        info!(
            "Scanned {} documents in {}",
            documents.len(),
            self.input_directory.display()
        );
        Ok(documents)
    }

    fn is_allowed(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self
                .extensions
                .iter()
                .any(|allowed| allowed.strip_prefix('.') == Some(ext)),
            None => false,
        }
    }
}
