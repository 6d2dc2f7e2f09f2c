//! Reader for catalog source files.
//!
//! One topic per line, written as `TopicName@%keyword1,keyword2,keyword3`.
//! Blank lines are skipped, a trailing carriage return is ignored and so is
//! a leading byte order mark.

use std::path::Path;

use log::{debug, info};

use crate::catalog::Catalog;
use crate::error::CatalogError;

const TOPIC_DELIMITER: &str = "@%";
const KEYWORD_DELIMITER: char = ',';
const BYTE_ORDER_MARK: char = '\u{feff}';

pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let catalog = parse_catalog(&content)?;
    info!(
        "Loaded catalog with {} topics from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

pub fn parse_catalog(content: &str) -> Result<Catalog, CatalogError> {
    let mut topics = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);

    for (index, raw_line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        if line.trim().is_empty() {
            continue;
        }

        let (topic, keywords) =
            line.split_once(TOPIC_DELIMITER)
                .ok_or_else(|| CatalogError::Parse {
                    line: line_number,
                    reason: format!("missing '{}' between topic and keywords", TOPIC_DELIMITER),
                })?;

        if topic.is_empty() {
            return Err(CatalogError::Parse {
                line: line_number,
                reason: "topic name is empty".to_string(),
            });
        }
        if !seen.insert(topic) {
            return Err(CatalogError::Parse {
                line: line_number,
                reason: format!("topic '{}' is defined more than once", topic),
            });
        }

        let keywords: Vec<&str> = if keywords.is_empty() {
            Vec::new()
        } else {
            keywords.split(KEYWORD_DELIMITER).collect()
        };

        debug!("Catalog topic '{}' with {} keywords", topic, keywords.len());
        topics.push((topic, keywords));
    }

    Catalog::from_topics(topics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_two_topics() {
        let catalog = parse_catalog("Animals@%cat,dog\nColors@%red,blue\n").unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.keywords("Animals").unwrap(),
            &["cat".to_string(), "dog".to_string()]
        );
        assert_eq!(
            catalog.keywords("Colors").unwrap(),
            &["red".to_string(), "blue".to_string()]
        );
    }

    #[test]
    fn test_parse_skips_blank_lines_and_carriage_returns() {
        let catalog = parse_catalog("Animals@%cat,dog\r\n\r\n\nColors@%red\r\n").unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.keywords("Colors").unwrap(), &["red".to_string()]);
    }

    #[test]
    fn test_parse_ignores_byte_order_mark() {
        let catalog = parse_catalog("\u{feff}Animals@%cat\n").unwrap();
        assert_eq!(catalog.keywords("Animals").unwrap(), &["cat".to_string()]);
        assert_eq!(catalog.topic_names().collect::<Vec<_>>(), vec!["Animals"]);
    }

    #[test]
    fn test_topic_without_keywords() {
        let catalog = parse_catalog("Nothing@%").unwrap();
        assert!(catalog.keywords("Nothing").unwrap().is_empty());
    }

    #[test]
    fn test_missing_delimiter_reports_line() {
        let err = parse_catalog("Animals@%cat\nColors red,blue\n").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_duplicate_topic_reports_line() {
        let err = parse_catalog("A@%x\nB@%y\nA@%z\n").unwrap_err();
        assert!(matches!(err, CatalogError::Parse { line: 3, .. }));
    }

    #[test]
    fn test_reserved_separator_in_keyword_is_rejected() {
        let err = parse_catalog("Time@%12:30").unwrap_err();
        assert!(matches!(
            err,
            CatalogError::ReservedSeparator { separator: ':', .. }
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_catalog(temp_dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, CatalogError::ReadFile { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.txt");
        std::fs::write(&path, "Animals@%cat,dog\n").unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.topic_names().collect::<Vec<_>>(), vec!["Animals"]);
    }
}
