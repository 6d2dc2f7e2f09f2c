use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tracing::info_span;

use crate::catalog::load_catalog;
use crate::categorizer::{AggregateSummary, Categorizer, ClassificationResult};
use crate::config::RunConfig;
use crate::error::{Phase, RunError};
use crate::orchestrator::SkippedDocument;
use crate::sink::ResultSink;
use crate::worker::{document_name, DirectoryScanner, DocumentReader, FileReader};

#[derive(Debug, Clone)]
pub struct SequentialReport {
    /// Results in enumeration order.
    pub results: Vec<ClassificationResult>,
    pub summary: AggregateSummary,
    pub skipped: Vec<SkippedDocument>,
    pub elapsed: Duration,
}

/// Single-process variant: classifies every document in turn, writes the
/// result lines, then derives the dominant topic of each document.
pub struct SequentialRunner<R = FileReader> {
    config: RunConfig,
    reader: R,
}

impl SequentialRunner {
    pub fn new(config: RunConfig) -> Self {
        Self::with_reader(config, FileReader)
    }
}

impl<R: DocumentReader> SequentialRunner<R> {
    pub fn with_reader(config: RunConfig, reader: R) -> Self {
        Self { config, reader }
    }

    pub fn run<S: ResultSink>(&self, sink: &mut S) -> Result<SequentialReport, RunError> {
        let started = Instant::now();
        let _span = info_span!("sequential_run").entered();

        let catalog = load_catalog(&self.config.catalog_path)
            .map_err(|e| RunError::new(Phase::CatalogLoad, e))?;
        let categorizer = Categorizer::new(Arc::new(catalog));

        let documents = DirectoryScanner::with_extensions(
            &self.config.input_directory,
            self.config.extensions.clone(),
        )
        .scan()
        .map_err(|e| RunError::new(Phase::Dispatch, e))?;

        let mut results = Vec::with_capacity(documents.len());
        let mut skipped = Vec::new();

        for document in documents {
            let text = match self.reader.read(&document) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Skipping '{}': {}", document, e);
                    skipped.push(SkippedDocument {
                        document,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let result = categorizer.classify(&document_name(&document), &text);
            debug!("Classified '{}'", result.document);
            sink.append(&result)
                .map_err(|e| RunError::new(Phase::Classification, e))?;
            results.push(result);
        }

        let summary = AggregateSummary::from_results(&results);
        let elapsed = started.elapsed();
        info!(
            "Classified {} documents in {:.3}s ({} skipped)",
            results.len(),
            elapsed.as_secs_f64(),
            skipped.len()
        );

        Ok(SequentialReport {
            results,
            summary,
            skipped,
            elapsed,
        })
    }
}
