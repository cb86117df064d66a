//! Storage layer for lendlog.
//!
//! The shelf is persisted as one JSON array in a single named slot of a
//! key-value store. Every save overwrites the whole slot; every load reads it
//! back wholesale.

pub mod schema;
mod sqlite;

use std::collections::HashMap;

use tracing::{debug, info};

use crate::book::Book;
use crate::error::Result;

pub use sqlite::SqliteSlots;

/// Slot key used when none is configured.
pub const DEFAULT_SLOT_KEY: &str = "libraryBooks";

/// Port through which the shelf is saved and restored.
pub trait BookStorage {
    /// Persist the full ordered sequence, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    fn save(&mut self, books: &[Book]) -> Result<()>;

    /// Restore the stored sequence, or an empty one if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value cannot be read or parsed.
    fn load(&self) -> Result<Vec<Book>>;
}

/// A durable string-valued key-value store.
pub trait KeyValueSlots {
    /// Read the value held in a slot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Non-durable slots kept in a map.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    values: HashMap<String, String>,
}

impl MemorySlots {
    /// Create empty slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueSlots for MemorySlots {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// [`BookStorage`] that keeps the shelf as JSON in one slot.
#[derive(Debug)]
pub struct SlotArchive<K> {
    slots: K,
    key: String,
}

impl<K: KeyValueSlots> SlotArchive<K> {
    /// Archive the shelf under the default slot key.
    pub fn new(slots: K) -> Self {
        Self::with_key(slots, DEFAULT_SLOT_KEY)
    }

    /// Archive the shelf under a custom slot key.
    pub fn with_key(slots: K, key: impl Into<String>) -> Self {
        Self {
            slots,
            key: key.into(),
        }
    }

    /// The slot key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Borrow the underlying slots.
    #[must_use]
    pub fn slots(&self) -> &K {
        &self.slots
    }
}

impl<K: KeyValueSlots> BookStorage for SlotArchive<K> {
    fn save(&mut self, books: &[Book]) -> Result<()> {
        let json = serde_json::to_string(books)?;
        self.slots.write(&self.key, &json)?;
        debug!("Saved {} books to slot {}", books.len(), self.key);
        Ok(())
    }

    fn load(&self) -> Result<Vec<Book>> {
        let Some(stored) = self.slots.read(&self.key)? else {
            debug!("Slot {} is empty, starting with no books", self.key);
            return Ok(Vec::new());
        };
        if stored.trim().is_empty() {
            return Ok(Vec::new());
        }

        let books: Vec<Book> = serde_json::from_str(&stored)?;
        info!("Loaded {} books from slot {}", books.len(), self.key);
        Ok(books)
    }
}
