//! In-memory record store.
//!
//! The [`Shelf`] owns the ordered collection of books for a session. Lookups
//! are linear scans; books keep the order they were added in.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::book::{id_from_timestamp, Book, BookId, BookStatus};
use crate::error::{Error, Result};

/// Ordered collection of books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shelf {
    books: Vec<Book>,
}

/// Tally of books by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShelfCounts {
    /// Books free to lend.
    pub available: usize,
    /// Books currently lent out.
    pub rented: usize,
}

impl Shelf {
    /// Create an empty shelf.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a shelf from a previously persisted sequence.
    #[must_use]
    pub fn from_books(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Add a book stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyField`] if title or author is blank and
    /// [`Error::Duplicate`] if a book with the same title and author exists.
    pub fn add(&mut self, title: &str, author: &str, year: &str) -> Result<Book> {
        self.add_at(title, author, year, Utc::now())
    }

    /// Add a book created at the given time.
    ///
    /// The id is the creation time in milliseconds, bumped past the largest
    /// id on the shelf when two books land in the same millisecond.
    ///
    /// # Errors
    ///
    /// Same as [`Shelf::add`].
    pub fn add_at(
        &mut self,
        title: &str,
        author: &str,
        year: &str,
        created: DateTime<Utc>,
    ) -> Result<Book> {
        if title.trim().is_empty() {
            return Err(Error::EmptyField { field: "title" });
        }
        if author.trim().is_empty() {
            return Err(Error::EmptyField { field: "author" });
        }
        if self.books.iter().any(|book| book.matches(title, author)) {
            debug!("Rejecting duplicate book \"{}\" by {}", title, author);
            return Err(Error::duplicate(title, author));
        }

        let id = self.next_id(created);
        let book = Book::new(id, title, author, year);
        self.books.push(book.clone());
        debug!("Added book {} \"{}\"", id, title);
        Ok(book)
    }

    fn next_id(&self, created: DateTime<Utc>) -> BookId {
        let stamped = id_from_timestamp(created);
        match self.books.iter().map(|book| book.id).max() {
            Some(largest) if largest >= stamped => largest.saturating_add(1),
            _ => stamped,
        }
    }

    /// Look up a book by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no book has this id.
    pub fn find(&self, id: BookId) -> Result<&Book> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or(Error::NotFound { id })
    }

    /// Move a book from one status to another.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no book has this id, and
    /// [`Error::InvalidTransition`] if the book is not currently `from` or
    /// `from` and `to` are the same status.
    pub fn set_status(&mut self, id: BookId, from: BookStatus, to: BookStatus) -> Result<&Book> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(Error::NotFound { id })?;

        if book.status != from || from == to {
            return Err(Error::InvalidTransition {
                id,
                current: book.status,
                requested: to,
            });
        }

        book.status = to;
        debug!("Book {} is now {}", id, to);
        Ok(book)
    }

    /// Remove a book if present, returning it.
    pub fn remove(&mut self, id: BookId) -> Option<Book> {
        let index = self.books.iter().position(|book| book.id == id)?;
        Some(self.books.remove(index))
    }

    /// All books in insertion order.
    #[must_use]
    pub fn all(&self) -> &[Book] {
        &self.books
    }

    /// Number of books on the shelf.
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Check if the shelf has no books.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Count books by status.
    #[must_use]
    pub fn counts(&self) -> ShelfCounts {
        self.books
            .iter()
            .fold(ShelfCounts::default(), |mut counts, book| {
                match book.status {
                    BookStatus::Available => counts.available += 1,
                    BookStatus::Rented => counts.rented += 1,
                }
                counts
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    fn sample_shelf() -> Shelf {
        let mut shelf = Shelf::new();
        shelf.add_at("Dune", "Herbert", "1965", at(1_000)).unwrap();
        shelf.add_at("Emma", "Austen", "1815", at(2_000)).unwrap();
        shelf.add_at("Ubik", "Dick", "1969", at(3_000)).unwrap();
        shelf
    }

    #[test]
    fn test_add_returns_available_book() {
        let mut shelf = Shelf::new();
        let book = shelf.add("Dune", "Herbert", "1965").unwrap();

        assert_eq!(book.status, BookStatus::Available);
        assert_eq!(shelf.len(), 1);
        assert_eq!(shelf.find(book.id).unwrap(), &book);
    }

    #[test]
    fn test_add_rejects_duplicate_ignoring_case() {
        let mut shelf = sample_shelf();
        let before = shelf.clone();

        let err = shelf.add("DUNE", "herbert", "2021").unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(shelf, before);
    }

    #[test]
    fn test_same_title_different_author_is_allowed() {
        let mut shelf = Shelf::new();
        shelf.add("Dune", "Herbert", "1965").unwrap();
        shelf.add("Dune", "Anderson", "1999").unwrap();

        assert_eq!(shelf.len(), 2);
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let mut shelf = Shelf::new();

        let err = shelf.add("  ", "Herbert", "1965").unwrap_err();
        assert!(matches!(err, Error::EmptyField { field: "title" }));

        let err = shelf.add("Dune", "", "1965").unwrap_err();
        assert!(matches!(err, Error::EmptyField { field: "author" }));

        assert!(shelf.is_empty());
    }

    #[test]
    fn test_year_is_not_validated() {
        let mut shelf = Shelf::new();
        let book = shelf.add("Dune", "Herbert", "sometime").unwrap();
        assert_eq!(book.year, "sometime");

        let book = shelf.add("Emma", "Austen", "").unwrap();
        assert_eq!(book.year, "");
    }

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let mut shelf = Shelf::new();
        let a = shelf.add_at("A", "X", "1", at(5_000)).unwrap();
        let b = shelf.add_at("B", "X", "1", at(5_000)).unwrap();
        let c = shelf.add_at("C", "X", "1", at(4_000)).unwrap();

        assert_eq!(a.id, 5_000);
        assert_eq!(b.id, 5_001);
        assert_eq!(c.id, 5_002);
    }

    #[test]
    fn test_id_follows_timestamp() {
        let mut shelf = Shelf::new();
        let book = shelf.add_at("Dune", "Herbert", "1965", at(1_234)).unwrap();
        assert_eq!(book.id, 1_234);
    }

    #[test]
    fn test_find_missing() {
        let shelf = sample_shelf();
        assert!(matches!(
            shelf.find(99),
            Err(Error::NotFound { id: 99 })
        ));
    }

    #[test]
    fn test_rent_then_return_restores_book() {
        let mut shelf = sample_shelf();
        let original = shelf.find(2_000).unwrap().clone();

        let rented = shelf
            .set_status(2_000, BookStatus::Available, BookStatus::Rented)
            .unwrap();
        assert_eq!(rented.status, BookStatus::Rented);

        shelf
            .set_status(2_000, BookStatus::Rented, BookStatus::Available)
            .unwrap();
        assert_eq!(shelf.find(2_000).unwrap(), &original);
    }

    #[test]
    fn test_set_status_rejects_wrong_current_status() {
        let mut shelf = sample_shelf();

        let err = shelf
            .set_status(1_000, BookStatus::Rented, BookStatus::Available)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                id: 1_000,
                current: BookStatus::Available,
                requested: BookStatus::Available,
            }
        ));
    }

    #[test]
    fn test_set_status_rejects_self_transition() {
        let mut shelf = sample_shelf();
        let err = shelf
            .set_status(1_000, BookStatus::Available, BookStatus::Available)
            .unwrap_err();
        assert!(err.is_ignorable());
    }

    #[test]
    fn test_set_status_missing_id() {
        let mut shelf = sample_shelf();
        let err = shelf
            .set_status(99, BookStatus::Available, BookStatus::Rented)
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 99 }));
    }

    #[test]
    fn test_remove_keeps_order_of_survivors() {
        let mut shelf = sample_shelf();

        let removed = shelf.remove(2_000).unwrap();
        assert_eq!(removed.title, "Emma");

        let titles: Vec<_> = shelf.all().iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Dune", "Ubik"]);
    }

    #[test]
    fn test_remove_missing_is_silent() {
        let mut shelf = sample_shelf();
        let before = shelf.clone();

        assert!(shelf.remove(99).is_none());
        assert_eq!(shelf, before);
    }

    #[test]
    fn test_no_duplicates_across_many_adds() {
        let mut shelf = Shelf::new();
        let entries = [
            ("Dune", "Herbert"),
            ("dune", "HERBERT"),
            ("Dune", "Anderson"),
            ("Emma", "Austen"),
            ("EMMA", "austen"),
        ];
        for (i, (title, author)) in entries.iter().enumerate() {
            let _ = shelf.add_at(title, author, "", at(i64::try_from(i).unwrap()));
        }

        assert_eq!(shelf.len(), 3);
        let books = shelf.all();
        for (i, a) in books.iter().enumerate() {
            for b in books.iter().skip(i + 1) {
                assert!(!a.matches(&b.title, &b.author));
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_counts() {
        let mut shelf = sample_shelf();
        shelf
            .set_status(3_000, BookStatus::Available, BookStatus::Rented)
            .unwrap();

        assert_eq!(
            shelf.counts(),
            ShelfCounts {
                available: 2,
                rented: 1
            }
        );
    }

    #[test]
    fn test_from_books_keeps_order() {
        let books = vec![
            Book::new(9, "Z", "Z", "1"),
            Book::new(1, "A", "A", "1"),
        ];
        let shelf = Shelf::from_books(books.clone());
        assert_eq!(shelf.all(), books.as_slice());
    }
}
