use std::collections::BTreeMap;

use crate::error::CatalogError;

/// Characters that delimit the catalog wire encoding and may not appear in
/// topic names or keywords.
pub const RESERVED_SEPARATORS: [char; 3] = [':', ',', ';'];

/// Immutable mapping from topic name to its ordered keyword list.
///
/// Topics iterate in lexicographic order of their names; keywords keep the
/// order they were given in. Once built, a catalog is never mutated: it is
/// shared behind an `Arc` or replicated through [`crate::catalog::codec`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    topics: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Builds a catalog from `(topic, keywords)` pairs.
    ///
    /// Fails on an empty or duplicate topic name, an empty keyword, or any
    /// token containing one of [`RESERVED_SEPARATORS`].
    pub fn from_topics<I, T, K>(topics: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (T, K)>,
        T: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        let mut map = BTreeMap::new();

        for (name, keywords) in topics {
            let name = name.into();
            if name.is_empty() {
                return Err(CatalogError::EmptyTopicName);
            }
            check_reserved(&name)?;

            let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
            for keyword in &keywords {
                if keyword.is_empty() {
                    return Err(CatalogError::EmptyKeyword { topic: name });
                }
                check_reserved(keyword)?;
            }

            if map.contains_key(&name) {
                return Err(CatalogError::DuplicateTopic(name));
            }
            map.insert(name, keywords);
        }

        Ok(Self { topics: map })
    }

    /// Iterates topics in catalog order.
    pub fn topics(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.topics
            .iter()
            .map(|(name, keywords)| (name.as_str(), keywords.as_slice()))
    }

    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn keywords(&self, topic: &str) -> Option<&[String]> {
        self.topics.get(topic).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

fn check_reserved(token: &str) -> Result<(), CatalogError> {
    match token.chars().find(|c| RESERVED_SEPARATORS.contains(c)) {
        Some(separator) => Err(CatalogError::ReservedSeparator {
            token: token.to_string(),
            separator,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_iterate_in_name_order() {
        let catalog = Catalog::from_topics([
            ("Sports", vec!["goal"]),
            ("Animals", vec!["cat", "dog"]),
            ("Colors", vec!["red"]),
        ])
        .unwrap();

        let names: Vec<&str> = catalog.topic_names().collect();
        assert_eq!(names, vec!["Animals", "Colors", "Sports"]);
    }

    #[test]
    fn test_keyword_order_is_preserved() {
        let catalog = Catalog::from_topics([("Animals", vec!["dog", "cat", "ant"])]).unwrap();
        assert_eq!(
            catalog.keywords("Animals").unwrap(),
            &["dog".to_string(), "cat".to_string(), "ant".to_string()]
        );
    }

    #[test]
    fn test_empty_keyword_list_is_allowed() {
        let catalog = Catalog::from_topics([("Empty", Vec::<String>::new())]).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.keywords("Empty").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_topic_is_rejected() {
        let err = Catalog::from_topics([("A", vec!["x"]), ("A", vec!["y"])]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTopic(name) if name == "A"));
    }

    #[test]
    fn test_empty_names_and_keywords_are_rejected() {
        assert!(matches!(
            Catalog::from_topics([("", vec!["x"])]),
            Err(CatalogError::EmptyTopicName)
        ));
        assert!(matches!(
            Catalog::from_topics([("A", vec!["x", ""])]),
            Err(CatalogError::EmptyKeyword { .. })
        ));
    }

    #[test]
    fn test_reserved_separators_are_rejected() {
        for (topic, keyword, separator) in [
            ("Bad:Topic", "ok", ':'),
            ("Topic", "comma,word", ','),
            ("Topic", "semi;colon", ';'),
        ] {
            let err = Catalog::from_topics([(topic, vec![keyword])]).unwrap_err();
            match err {
                CatalogError::ReservedSeparator { separator: found, .. } => {
                    assert_eq!(found, separator)
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }
}
