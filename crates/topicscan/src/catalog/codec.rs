//! Flat byte encoding used to replicate a catalog to workers.
//!
//! Every topic is written as `topic:kw1,kw2,;` in catalog order, so a
//! catalog `{Animals: [cat, dog], Empty: []}` encodes to
//! `Animals:cat,dog,;Empty:;`. Topic names and keywords cannot contain
//! `:`, `,` or `;`; [`Catalog`] refuses such tokens at construction, which
//! keeps `decode(encode(c)) == c` for every catalog that can exist.

use crate::catalog::Catalog;
use crate::error::CodecError;

const TOPIC_TERMINATOR: char = ';';
const NAME_SEPARATOR: char = ':';
const KEYWORD_TERMINATOR: char = ',';

pub fn encode(catalog: &Catalog) -> Vec<u8> {
    let mut out = String::new();
    for (topic, keywords) in catalog.topics() {
        out.push_str(topic);
        out.push(NAME_SEPARATOR);
        for keyword in keywords {
            out.push_str(keyword);
            out.push(KEYWORD_TERMINATOR);
        }
        out.push(TOPIC_TERMINATOR);
    }
    out.into_bytes()
}

pub fn decode(bytes: &[u8]) -> Result<Catalog, CodecError> {
    let text = std::str::from_utf8(bytes)?;
    if text.is_empty() {
        return Ok(Catalog::default());
    }

    let body = text
        .strip_suffix(TOPIC_TERMINATOR)
        .ok_or(CodecError::Unterminated)?;

    let mut topics = Vec::new();
    for entry in body.split(TOPIC_TERMINATOR) {
        let (topic, list) = entry
            .split_once(NAME_SEPARATOR)
            .ok_or_else(|| CodecError::MissingTopicSeparator(entry.to_string()))?;

        let keywords: Vec<&str> = if list.is_empty() {
            Vec::new()
        } else {
            list.strip_suffix(KEYWORD_TERMINATOR)
                .ok_or_else(|| CodecError::UnterminatedKeywords(topic.to_string()))?
                .split(KEYWORD_TERMINATOR)
                .collect()
        };
        topics.push((topic, keywords));
    }

    Ok(Catalog::from_topics(topics)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    fn sample_catalog() -> Catalog {
        Catalog::from_topics([
            ("Colors", vec!["red", "blue"]),
            ("Animals", vec!["cat", "dog"]),
            ("Empty", vec![]),
        ])
        .unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let encoded = encode(&sample_catalog());
        assert_eq!(
            String::from_utf8(encoded).unwrap(),
            "Animals:cat,dog,;Colors:red,blue,;Empty:;"
        );
    }

    #[test]
    fn test_decode_restores_catalog() {
        let catalog = sample_catalog();
        assert_eq!(decode(&encode(&catalog)).unwrap(), catalog);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::default();
        assert!(encode(&catalog).is_empty());
        assert_eq!(decode(b"").unwrap(), catalog);
    }

    #[test]
    fn test_keywords_with_spaces_and_unicode_survive() {
        let catalog = Catalog::from_topics([
            ("Städte", vec!["New York", "São Paulo"]),
            ("Math", vec!["x^2 + y", "@%"]),
        ])
        .unwrap();
        assert_eq!(decode(&encode(&catalog)).unwrap(), catalog);
    }

    #[test]
    fn test_decode_rejects_malformed_input() {
        assert!(matches!(
            decode(b"Animals:cat,"),
            Err(CodecError::Unterminated)
        ));
        assert!(matches!(
            decode(b"Animals;"),
            Err(CodecError::MissingTopicSeparator(_))
        ));
        assert!(matches!(
            decode(b"Animals:cat;"),
            Err(CodecError::UnterminatedKeywords(topic)) if topic == "Animals"
        ));
        assert!(matches!(
            decode(&[0xff, 0xfe, b';']),
            Err(CodecError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_decode_rejects_invalid_catalogs() {
        assert!(matches!(
            decode(b"A:x,;A:y,;"),
            Err(CodecError::InvalidCatalog(CatalogError::DuplicateTopic(_)))
        ));
        assert!(matches!(
            decode(b":x,;"),
            Err(CodecError::InvalidCatalog(CatalogError::EmptyTopicName))
        ));
        assert!(matches!(
            decode(b"A:x,,;"),
            Err(CodecError::InvalidCatalog(CatalogError::EmptyKeyword { .. }))
        ));
        // A second ':' lands inside the keyword and is refused there.
        assert!(matches!(
            decode(b"A:b:c,;"),
            Err(CodecError::InvalidCatalog(
                CatalogError::ReservedSeparator { separator: ':', .. }
            ))
        ));
    }
}
