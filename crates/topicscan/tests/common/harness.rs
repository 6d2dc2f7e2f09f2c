//! Test harness for isolated test execution.
//!
//! The `TestHarness` struct owns a temporary directory with an input
//! directory for documents, a catalog file and an output file, and builds
//! `RunConfig` values pointing at them.

#![allow(dead_code)]

use std::path::PathBuf;

use tempfile::TempDir;

use topicscan::sink::parse_line;
use topicscan::{ClassificationResult, RunConfig, TransportKind};

pub const ANIMALS_AND_COLORS: &str = "Animals@%cat,dog\nColors@%red,blue\n";

pub struct TestHarness {
    temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub catalog_path: PathBuf,
    pub output_path: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let input_dir = temp_dir.path().join("documents");
        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");

        Self {
            catalog_path: temp_dir.path().join("catalog.txt"),
            output_path: temp_dir.path().join("results.txt"),
            input_dir,
            temp_dir,
        }
    }

    /// Harness with the two-topic catalog used throughout the tests.
    pub fn with_sample_catalog() -> Self {
        let harness = Self::new();
        harness.write_catalog(ANIMALS_AND_COLORS);
        harness
    }

    pub fn write_catalog(&self, content: &str) {
        std::fs::write(&self.catalog_path, content).expect("Failed to write catalog");
    }

    pub fn write_document(&self, name: &str, content: &str) -> PathBuf {
        let path = self.input_dir.join(name);
        std::fs::write(&path, content).expect("Failed to write document");
        path
    }

    /// Writes `count` documents named `doc-000.txt` and up; every third one
    /// mentions a cat.
    pub fn write_numbered_documents(&self, count: usize) {
        for i in 0..count {
            let text = if i % 3 == 0 {
                format!("document {i} has a cat and a red hat")
            } else {
                format!("document {i} is blue")
            };
            self.write_document(&format!("doc-{i:03}.txt"), &text);
        }
    }

    pub fn config(&self, worker_count: usize) -> RunConfig {
        RunConfig {
            catalog_path: self.catalog_path.clone(),
            input_directory: self.input_dir.clone(),
            output_path: self.output_path.clone(),
            worker_count,
            transport: TransportKind::Threads,
            ..RunConfig::default()
        }
    }

    pub fn read_output_lines(&self) -> Vec<String> {
        std::fs::read_to_string(&self.output_path)
            .expect("Failed to read output")
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn read_output_results(&self) -> Vec<ClassificationResult> {
        self.read_output_lines()
            .iter()
            .map(|line| parse_line(line).expect("Malformed result line"))
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
