//! Core book types for lendlog.
//!
//! This module defines the book record kept on the shelf and its lending
//! status, including the JSON layout they are persisted with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a book, derived from its creation time in milliseconds.
pub type BookId = i64;

/// Lending status of a book.
///
/// The persisted names follow the locale the data was first written in;
/// the English names are accepted when reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookStatus {
    /// On the shelf and free to lend.
    #[default]
    #[serde(rename = "disponível", alias = "available")]
    Available,
    /// Lent out.
    #[serde(rename = "alugado", alias = "rented")]
    Rented,
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Rented => write!(f, "rented"),
        }
    }
}

/// A book on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Unique identifier, fixed at creation.
    pub id: BookId,
    /// Title as entered.
    pub title: String,
    /// Author as entered.
    pub author: String,
    /// Publication year as entered; never validated.
    #[serde(deserialize_with = "year_from_text_or_number")]
    pub year: String,
    /// Current lending status.
    pub status: BookStatus,
}

impl Book {
    /// Create a new available book.
    #[must_use]
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year: year.into(),
            status: BookStatus::Available,
        }
    }

    /// Check whether this book has the given title and author, ignoring case.
    #[must_use]
    pub fn matches(&self, title: &str, author: &str) -> bool {
        self.title.to_lowercase() == title.to_lowercase()
            && self.author.to_lowercase() == author.to_lowercase()
    }
}

/// Derive a book id from a creation time.
#[must_use]
pub fn id_from_timestamp(created: DateTime<Utc>) -> BookId {
    created.timestamp_millis()
}

/// Accepts `"1965"` as well as `1965` for the year field.
fn year_from_text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Year::deserialize(deserializer)? {
        Year::Text(text) => text,
        Year::Number(number) => number.to_string(),
    })
}
