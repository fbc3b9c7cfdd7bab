//! Identifier types for authors and their portrait images.
//!
//! Author identifiers arrive from the dataset as either JSON numbers or
//! strings and are persisted in the same representation. Image identifiers
//! are derived from display names and double as the upload dedup key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every derived image identifier.
pub const IMAGE_ID_PREFIX: &str = "avatar-";

/// Prefix of every author record key in the key-value store.
pub const AUTHOR_KEY_PREFIX: &str = "author_";

/// Stable identifier of an author, as published by the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorId {
    /// Numeric identifier (`"author_id": 7`).
    Number(serde_json::Number),
    /// Textual identifier (`"author_id": "ada"`).
    Text(String),
}

impl AuthorId {
    /// Key under which this author's record is stored.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{AUTHOR_KEY_PREFIX}{self}")
    }
}

impl From<i64> for AuthorId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<&str> for AuthorId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for AuthorId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

/// Whole-valued floats print without a fractional part, so `7`, `7.0` and
/// `7e0` all name the same author.
fn write_number(f: &mut fmt::Formatter<'_>, n: &serde_json::Number) -> fmt::Result {
    if n.is_i64() || n.is_u64() {
        return write!(f, "{n}");
    }
    match n.as_f64() {
        Some(v) if v == 0.0 => f.write_str("0"),
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e21 => write!(f, "{v:.0}"),
        _ => write!(f, "{n}"),
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write_number(f, n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Deterministic identifier of an author portrait in the image host.
///
/// Lowercased display name with every whitespace run collapsed to a single
/// hyphen, prefixed with [`IMAGE_ID_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    /// Derive the image identifier for an author display name.
    #[must_use]
    pub fn for_display_name(display_name: &str) -> Self {
        let mut id = String::with_capacity(IMAGE_ID_PREFIX.len() + display_name.len());
        id.push_str(IMAGE_ID_PREFIX);

        // Whole-string lowercasing applies context rules such as final sigma.
        let mut in_whitespace = false;
        for c in display_name.to_lowercase().chars() {
            if c.is_whitespace() {
                if !in_whitespace {
                    id.push('-');
                    in_whitespace = true;
                }
            } else {
                in_whitespace = false;
                id.push(c);
            }
        }

        Self(id)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_id_case_and_whitespace_insensitive() {
        let a = ImageId::for_display_name("Maya Angelou");
        let b = ImageId::for_display_name("maya   angelou");
        let c = ImageId::for_display_name("MAYA ANGELOU");
        let d = ImageId::for_display_name("Maya\t\nAngelou");

        assert_eq!(a.as_str(), "avatar-maya-angelou");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_eq!(a, d);
    }

    #[test]
    fn test_image_id_keeps_edge_whitespace_as_hyphen() {
        let id = ImageId::for_display_name("  Ada Lovelace ");
        assert_eq!(id.as_str(), "avatar--ada-lovelace-");
    }

    #[test]
    fn test_image_id_non_ascii() {
        let id = ImageId::for_display_name("Émile Zola");
        assert_eq!(id.as_str(), "avatar-émile-zola");
    }

    #[test]
    fn test_image_id_applies_final_sigma() {
        let id = ImageId::for_display_name("ΟΔΥΣΣΕΥΣ");
        assert_eq!(id.as_str(), "avatar-οδυσσευς");
    }

    #[test]
    fn test_image_id_always_prefixed() {
        assert_eq!(ImageId::for_display_name("").as_str(), "avatar-");
        assert!(ImageId::for_display_name("Plato")
            .as_str()
            .starts_with(IMAGE_ID_PREFIX));
    }

    #[test]
    fn test_author_id_storage_key() {
        assert_eq!(AuthorId::from(7).storage_key(), "author_7");
        assert_eq!(AuthorId::from("7").storage_key(), "author_7");
        assert_eq!(AuthorId::from("ada").storage_key(), "author_ada");
    }

    #[test]
    fn test_whole_float_author_id_uses_integer_key() {
        let float: AuthorId = serde_json::from_str("7.0").unwrap();
        assert_eq!(float.storage_key(), "author_7");

        let exponent: AuthorId = serde_json::from_str("1e3").unwrap();
        assert_eq!(exponent.storage_key(), "author_1000");

        let fraction: AuthorId = serde_json::from_str("7.5").unwrap();
        assert_eq!(fraction.storage_key(), "author_7.5");
    }

    #[test]
    fn test_author_id_keeps_json_representation() {
        let number: AuthorId = serde_json::from_str("7").unwrap();
        assert_eq!(number, AuthorId::from(7));
        assert_eq!(serde_json::to_string(&number).unwrap(), "7");

        let text: AuthorId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(text, AuthorId::from("7"));
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"7\"");
    }

    #[test]
    fn test_author_id_rejects_other_json() {
        assert!(serde_json::from_str::<AuthorId>("null").is_err());
        assert!(serde_json::from_str::<AuthorId>("[1]").is_err());
    }
}
