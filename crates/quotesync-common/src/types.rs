//! Dataset and record types.
//!
//! [`QuoteDataset`] and [`AuthorInput`] mirror the JSON document published by
//! the content source. [`AuthorRecord`] is the persisted unit of state per
//! author and owns the quote merge rules.

use serde::{Deserialize, Serialize};

use crate::ids::{AuthorId, ImageId};

/// Top-level document fetched from the content source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteDataset {
    /// Authors in publication order.
    pub authors: Vec<AuthorInput>,
}

/// A single author entry of the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorInput {
    /// Stable unique identifier.
    pub author_id: AuthorId,
    /// Display name, also used to look up a portrait.
    pub author: String,
    /// Quotes in publication order. Not deduplicated against itself.
    #[serde(default)]
    pub quotes: Vec<String>,
}

impl AuthorInput {
    /// Image identifier derived from this author's display name.
    pub fn image_id(&self) -> ImageId {
        ImageId::for_display_name(&self.author)
    }
}

/// Persisted author state, stored as JSON under `author_<author_id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub author_id: AuthorId,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub quotes: Vec<String>,
    /// Public delivery URL of the portrait, `null` until one is resolved.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Fields written by other producers, carried through on rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AuthorRecord {
    /// Build the first record for an author. Quotes are taken as given.
    pub fn new(input: &AuthorInput, image_url: Option<String>) -> Self {
        Self {
            author_id: input.author_id.clone(),
            author: input.author.clone(),
            quotes: input.quotes.clone(),
            image_url,
            extra: serde_json::Map::new(),
        }
    }

    /// Append every quote not already present, in order, and return how many
    /// were appended.
    ///
    /// Membership is checked against the list as it grows, so a string
    /// repeated within `quotes` is appended at most once.
    pub fn merge_quotes(&mut self, quotes: &[String]) -> usize {
        let mut added = 0;
        for quote in quotes {
            if !self.quotes.contains(quote) {
                self.quotes.push(quote.clone());
                added += 1;
            }
        }
        added
    }

    /// Whether image resolution should be attempted for this record.
    ///
    /// An empty URL counts as missing.
    pub fn needs_image(&self) -> bool {
        self.image_url.as_deref().map_or(true, str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quotes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn ada() -> AuthorInput {
        AuthorInput {
            author_id: AuthorId::from(7),
            author: "Ada Lovelace".to_string(),
            quotes: quotes(&["Q1", "Q2"]),
        }
    }

    #[test]
    fn test_dataset_parsing() {
        let dataset: QuoteDataset = serde_json::from_value(json!({
            "authors": [
                { "author_id": 7, "author": "Ada Lovelace", "quotes": ["Q1", "Q2"] },
                { "author_id": "mt", "author": "Mark Twain", "quotes": [] }
            ]
        }))
        .unwrap();

        assert_eq!(dataset.authors.len(), 2);
        assert_eq!(dataset.authors[0], ada());
        assert_eq!(dataset.authors[1].author_id, AuthorId::from("mt"));
    }

    #[test]
    fn test_dataset_requires_authors() {
        assert!(serde_json::from_value::<QuoteDataset>(json!({})).is_err());
        assert!(serde_json::from_value::<QuoteDataset>(json!({
            "authors": [{ "author": "No Id" }]
        }))
        .is_err());
    }

    #[test]
    fn test_new_record_keeps_input_duplicates() {
        let mut input = ada();
        input.quotes = quotes(&["Q1", "Q1"]);

        let record = AuthorRecord::new(&input, None);
        assert_eq!(record.quotes, quotes(&["Q1", "Q1"]));
        assert_eq!(record.image_url, None);
    }

    #[test]
    fn test_new_record_serializes_null_image() {
        let record = AuthorRecord::new(&ada(), None);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "author_id": 7,
                "author": "Ada Lovelace",
                "quotes": ["Q1", "Q2"],
                "image_url": null
            })
        );
    }

    #[test]
    fn test_merge_skips_existing_and_repeated() {
        let mut record = AuthorRecord::new(&ada(), None);
        let added = record.merge_quotes(&quotes(&["Q2", "Q3", "Q3", "Q1", "Q4"]));

        assert_eq!(added, 2);
        assert_eq!(record.quotes, quotes(&["Q1", "Q2", "Q3", "Q4"]));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut record = AuthorRecord::new(&ada(), None);
        let incoming = quotes(&["Q2", "Q5"]);

        record.merge_quotes(&incoming);
        let after_first = record.quotes.clone();
        assert_eq!(record.merge_quotes(&incoming), 0);
        assert_eq!(record.quotes, after_first);
    }

    #[test]
    fn test_merge_is_exact_match() {
        let mut record = AuthorRecord::new(&ada(), None);
        record.merge_quotes(&quotes(&["q1", "Q1 "]));
        assert_eq!(record.quotes, quotes(&["Q1", "Q2", "q1", "Q1 "]));
    }

    #[test]
    fn test_needs_image() {
        let mut record = AuthorRecord::new(&ada(), None);
        assert!(record.needs_image());

        record.image_url = Some(String::new());
        assert!(record.needs_image());

        record.image_url = Some("http://img/x".to_string());
        assert!(!record.needs_image());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let stored = json!({
            "author_id": 7,
            "author": "Ada Lovelace",
            "quotes": ["Q1"],
            "image_url": "http://img/x",
            "featured": true
        });

        let mut record: AuthorRecord = serde_json::from_value(stored).unwrap();
        record.merge_quotes(&quotes(&["Q2"]));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["featured"], json!(true));
        assert_eq!(value["quotes"], json!(["Q1", "Q2"]));
    }

    #[test]
    fn test_sparse_stored_record() {
        let record: AuthorRecord = serde_json::from_value(json!({ "author_id": "x" })).unwrap();
        assert!(record.quotes.is_empty());
        assert!(record.needs_image());
        assert!(record.author.is_empty());
    }

    #[test]
    fn test_input_image_id() {
        assert_eq!(ada().image_id().as_str(), "avatar-ada-lovelace");
    }
}
