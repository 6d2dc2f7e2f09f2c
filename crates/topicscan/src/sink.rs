//! Result lines and the destinations they are written to.
//!
//! A result is one line:
//! `documentName:\ttopicA;countA,\ttopicB;countB,\t\n`.
//!
//! Only the manager writes to the output destination. Workers hand their
//! results to a [`FunnelSink`], which forwards them over the transport; the
//! manager appends them to a [`LineSink`] one complete line per write. Lines
//! from different workers arrive in any order but are never split.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::categorizer::{ClassificationResult, TopicCount};
use crate::error::SinkError;
use crate::protocol::{Outbox, WorkerId, WorkerMessage};

const NAME_SEPARATOR: &str = ":\t";
const ENTRY_TERMINATOR: &str = ",\t";
const COUNT_SEPARATOR: char = ';';

pub trait ResultSink {
    fn append(&mut self, result: &ClassificationResult) -> Result<(), SinkError>;
}

/// Collects results in memory.
impl ResultSink for Vec<ClassificationResult> {
    fn append(&mut self, result: &ClassificationResult) -> Result<(), SinkError> {
        self.push(result.clone());
        Ok(())
    }
}

pub fn format_line(result: &ClassificationResult) -> String {
    let mut line = String::with_capacity(result.document.len() + result.counts.len() * 16);
    line.push_str(&result.document);
    line.push_str(NAME_SEPARATOR);
    for entry in &result.counts {
        line.push_str(&entry.topic);
        line.push(COUNT_SEPARATOR);
        line.push_str(&entry.count.to_string());
        line.push_str(ENTRY_TERMINATOR);
    }
    line.push('\n');
    line
}

pub fn parse_line(line: &str) -> Result<ClassificationResult, SinkError> {
    let malformed = || SinkError::MalformedLine(line.to_string());

    let body = line.strip_suffix('\n').unwrap_or(line);
    let (document, entries) = body.split_once(NAME_SEPARATOR).ok_or_else(malformed)?;

    let mut counts = Vec::new();
    if !entries.is_empty() {
        let entries = entries.strip_suffix(ENTRY_TERMINATOR).ok_or_else(malformed)?;
        for entry in entries.split(ENTRY_TERMINATOR) {
            let (topic, count) = entry.rsplit_once(COUNT_SEPARATOR).ok_or_else(malformed)?;
            let count = count.parse::<usize>().map_err(|_| malformed())?;
            counts.push(TopicCount {
                topic: topic.to_string(),
                count,
            });
        }
    }

    Ok(ClassificationResult {
        document: document.to_string(),
        counts,
    })
}

/// Writes each result as one line with a single `write_all`.
pub struct LineSink<W: Write> {
    writer: W,
    lines_written: usize,
}

impl<W: Write> LineSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flushes buffered lines and returns the writer.
    pub fn finish(mut self) -> Result<W, SinkError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> ResultSink for LineSink<W> {
    fn append(&mut self, result: &ClassificationResult) -> Result<(), SinkError> {
        self.writer.write_all(format_line(result).as_bytes())?;
        self.lines_written += 1;
        Ok(())
    }
}

/// Opens the output file for appending, creating it if needed. With
/// `truncate` set, existing content is discarded first.
pub fn open_output<P: AsRef<Path>>(
    path: P,
    truncate: bool,
) -> Result<LineSink<BufWriter<File>>, SinkError> {
    let path = path.as_ref();
    let mut options = OpenOptions::new();
    options.create(true);
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }

    let file = options.open(path).map_err(|e| SinkError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(LineSink::new(BufWriter::new(file)))
}

/// Worker-side sink that forwards results to the manager.
pub struct FunnelSink<'a, O> {
    worker: WorkerId,
    outbox: &'a O,
}

impl<'a, O: Outbox> FunnelSink<'a, O> {
    pub fn new(worker: WorkerId, outbox: &'a O) -> Self {
        Self { worker, outbox }
    }
}

impl<O: Outbox> ResultSink for FunnelSink<'_, O> {
    fn append(&mut self, result: &ClassificationResult) -> Result<(), SinkError> {
        self.outbox.send(WorkerMessage::Result {
            worker: self.worker,
            result: result.clone(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_result() -> ClassificationResult {
        ClassificationResult {
            document: "pets.txt".to_string(),
            counts: vec![
                TopicCount {
                    topic: "Animals".to_string(),
                    count: 2,
                },
                TopicCount {
                    topic: "Colors".to_string(),
                    count: 0,
                },
            ],
        }
    }

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line(&sample_result()),
            "pets.txt:\tAnimals;2,\tColors;0,\t\n"
        );
    }

    #[test]
    fn test_format_line_without_topics() {
        let result = ClassificationResult {
            document: "a.txt".to_string(),
            counts: vec![],
        };
        assert_eq!(format_line(&result), "a.txt:\t\n");
        assert_eq!(parse_line("a.txt:\t\n").unwrap(), result);
    }

    #[test]
    fn test_parse_line() {
        let parsed = parse_line("pets.txt:\tAnimals;2,\tColors;0,\t\n").unwrap();
        assert_eq!(parsed, sample_result());
    }

    #[test]
    fn test_parse_line_rejects_garbage() {
        for line in [
            "no separator here\n",
            "a.txt:\tAnimals;2\n",
            "a.txt:\tAnimals,\t\n",
            "a.txt:\tAnimals;two,\t\n",
        ] {
            assert!(
                matches!(parse_line(line), Err(SinkError::MalformedLine(_))),
                "expected malformed: {line:?}"
            );
        }
    }

    #[test]
    fn test_line_sink_writes_whole_lines() {
        let mut sink = LineSink::new(Vec::new());
        sink.append(&sample_result()).unwrap();
        sink.append(&sample_result()).unwrap();
        assert_eq!(sink.lines_written(), 2);

        let bytes = sink.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 2);
        for line in text.lines() {
            assert_eq!(parse_line(line).unwrap(), sample_result());
        }
    }

    #[test]
    fn test_open_output_appends_or_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("results.txt");
        std::fs::write(&path, "old line\n").unwrap();

        let mut sink = open_output(&path, false).unwrap();
        sink.append(&sample_result()).unwrap();
        sink.finish().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("old line\n"));
        assert_eq!(content.lines().count(), 2);

        let mut sink = open_output(&path, true).unwrap();
        sink.append(&sample_result()).unwrap();
        sink.finish().unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format_line(&sample_result()));
    }

    #[test]
    fn test_open_output_in_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("results.txt");
        assert!(matches!(
            open_output(&path, false),
            Err(SinkError::Open { .. })
        ));
    }
}
