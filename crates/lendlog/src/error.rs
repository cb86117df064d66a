//! Error types for lendlog.
//!
//! This module defines all error types used throughout the lendlog crate,
//! from shelf rule violations to storage and configuration failures.

use std::path::PathBuf;
use thiserror::Error;

use crate::book::{BookId, BookStatus};

/// The main error type for lendlog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Shelf Errors ===
    /// A book with the same title and author is already on the shelf.
    #[error("\"{title}\" by {author} is already on the shelf")]
    Duplicate {
        /// Title of the rejected book.
        title: String,
        /// Author of the rejected book.
        author: String,
    },

    /// No book with the given id exists.
    #[error("no book with id {id}")]
    NotFound {
        /// The id that was looked up.
        id: BookId,
    },

    /// The requested status change does not apply to the book's current status.
    #[error("book {id} is {current}, cannot mark it {requested}")]
    InvalidTransition {
        /// The book that was targeted.
        id: BookId,
        /// Status the book currently has.
        current: BookStatus,
        /// Status that was requested.
        requested: BookStatus,
    },

    /// A required form field was left blank.
    #[error("the {field} field must not be empty")]
    EmptyField {
        /// Name of the blank field.
        field: &'static str,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system or terminal operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for lendlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a duplicate-book error.
    #[must_use]
    pub fn duplicate(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self::Duplicate {
            title: title.into(),
            author: author.into(),
        }
    }

    /// Check if this error is a duplicate-book rejection.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Check if this error refers to a missing id or a stale status.
    #[must_use]
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::InvalidTransition { .. })
    }
}
