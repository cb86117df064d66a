//! The library controller.
//!
//! [`Library`] owns the shelf for a session and turns user intents into shelf
//! changes. After every change it saves the whole shelf, redraws it and shows
//! a status message. Storage, drawing and removal confirmation are injected so
//! the same controller drives the terminal and the tests.

use tracing::{debug, info};

use crate::book::{BookId, BookStatus};
use crate::error::{Error, Result};
use crate::notify::{Notice, NoticeKind, Notifier};
use crate::shelf::Shelf;
use crate::storage::BookStorage;
use crate::view::{build_view, Renderer};

/// Shown after a book is added.
pub const BOOK_ADDED: &str = "Book added successfully!";
/// Shown when a submitted title and author are already on the shelf.
pub const DUPLICATE_BOOK: &str = "This book is already in the library!";
/// Shown after a book is removed.
pub const BOOK_REMOVED: &str = "Book removed successfully!";
/// Question asked before removing a book.
pub const REMOVE_PROMPT: &str = "Are you sure you want to remove this book?";

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Add the book described by the form.
    Submit,
    /// Lend out a book.
    Rent(BookId),
    /// Take a lent book back.
    Return(BookId),
    /// Remove a book, after confirmation.
    Remove(BookId),
}

/// What became of an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The shelf changed and was saved.
    Changed,
    /// The input was refused and the user was told why.
    Rejected,
    /// The target no longer applied; nothing happened.
    Ignored,
    /// The user declined the confirmation.
    Declined,
}

/// The add-book form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    /// Title field.
    pub title: String,
    /// Author field.
    pub author: String,
    /// Year field.
    pub year: String,
}

impl BookForm {
    /// A form filled with the given values.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year: year.into(),
        }
    }

    /// Empty every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Port that asks the user to confirm a destructive action.
pub trait Confirm {
    /// Ask `prompt`; `true` only on an explicit yes.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<C: Confirm + ?Sized> Confirm for Box<C> {
    fn confirm(&mut self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}

/// Confirms everything without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, prompt: &str) -> bool {
        debug!("Assuming yes to: {}", prompt);
        true
    }
}

/// Asks on the terminal and reads the answer from standard input.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        use std::io::Write;

        print!("{prompt} [y/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match std::io::stdin().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}

/// Whether a typed answer means yes.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// A book-lending session.
#[derive(Debug)]
pub struct Library<S, R, C> {
    shelf: Shelf,
    storage: S,
    renderer: R,
    confirm: C,
    notifier: Notifier,
    form: BookForm,
}

impl<S, R, C> Library<S, R, C>
where
    S: BookStorage,
    R: Renderer,
    C: Confirm,
{
    /// Start a session with the books held in `storage`.
    ///
    /// Nothing is drawn until [`Library::refresh`] or the first change.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored shelf cannot be read.
    pub fn open(storage: S, renderer: R, confirm: C, notifier: Notifier) -> Result<Self> {
        let shelf = Shelf::from_books(storage.load()?);
        info!("Opened library with {} books", shelf.len());
        Ok(Self {
            shelf,
            storage,
            renderer,
            confirm,
            notifier,
            form: BookForm::default(),
        })
    }

    /// Draw the shelf as it is now.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    pub fn refresh(&mut self) -> Result<()> {
        self.renderer.render(&build_view(self.shelf.all()))
    }

    /// Draw the shelf and the status message, if it is still showing.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing fails.
    pub fn redraw(&mut self) -> Result<()> {
        self.refresh()?;
        if let Some(notice) = self.notifier.current() {
            self.renderer.show_notice(&notice)?;
        }
        Ok(())
    }

    /// Carry out an intent.
    ///
    /// # Errors
    ///
    /// Returns an error only if saving or drawing fails; refused and stale
    /// intents are reported through the [`Outcome`].
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome> {
        match intent {
            Intent::Submit => self.submit(),
            Intent::Rent(id) => self.rent_book(id),
            Intent::Return(id) => self.return_book(id),
            Intent::Remove(id) => self.remove_book(id),
        }
    }

    /// Add the book described by the form.
    ///
    /// The form is cleared only when the book is added.
    ///
    /// # Errors
    ///
    /// Returns an error if saving or drawing fails.
    pub fn submit(&mut self) -> Result<Outcome> {
        let added = self
            .shelf
            .add(&self.form.title, &self.form.author, &self.form.year);

        match added {
            Ok(book) => {
                info!("Added \"{}\" by {} ({})", book.title, book.author, book.id);
                self.commit()?;
                self.form.clear();
                self.notify(BOOK_ADDED, NoticeKind::Success)?;
                Ok(Outcome::Changed)
            }
            Err(err) if err.is_duplicate() => {
                self.notify(DUPLICATE_BOOK, NoticeKind::Error)?;
                Ok(Outcome::Rejected)
            }
            Err(Error::EmptyField { field }) => {
                self.notify(format!("Please fill in the {field}."), NoticeKind::Error)?;
                Ok(Outcome::Rejected)
            }
            Err(err) => Err(err),
        }
    }

    /// Lend out an available book.
    ///
    /// # Errors
    ///
    /// Returns an error if saving or drawing fails.
    pub fn rent_book(&mut self, id: BookId) -> Result<Outcome> {
        self.change_status(id, BookStatus::Available, BookStatus::Rented)
    }

    /// Take back a rented book.
    ///
    /// # Errors
    ///
    /// Returns an error if saving or drawing fails.
    pub fn return_book(&mut self, id: BookId) -> Result<Outcome> {
        self.change_status(id, BookStatus::Rented, BookStatus::Available)
    }

    /// Remove a book once the user confirms.
    ///
    /// # Errors
    ///
    /// Returns an error if saving or drawing fails.
    pub fn remove_book(&mut self, id: BookId) -> Result<Outcome> {
        if !self.confirm.confirm(REMOVE_PROMPT) {
            debug!("Removal of {} declined", id);
            return Ok(Outcome::Declined);
        }

        let Some(book) = self.shelf.remove(id) else {
            debug!("Ignoring removal of unknown book {}", id);
            return Ok(Outcome::Ignored);
        };

        info!("Removed \"{}\" ({})", book.title, book.id);
        self.commit()?;
        self.notify(BOOK_REMOVED, NoticeKind::Success)?;
        Ok(Outcome::Changed)
    }

    fn change_status(&mut self, id: BookId, from: BookStatus, to: BookStatus) -> Result<Outcome> {
        let title = match self.shelf.set_status(id, from, to) {
            Ok(book) => book.title.clone(),
            Err(err) if err.is_ignorable() => {
                debug!("Ignoring status change: {}", err);
                return Ok(Outcome::Ignored);
            }
            Err(err) => return Err(err),
        };

        info!("Book {} is now {}", id, to);
        self.commit()?;
        let verb = match to {
            BookStatus::Rented => "rented",
            BookStatus::Available => "returned",
        };
        self.notify(format!("Book \"{title}\" {verb} successfully!"), NoticeKind::Success)?;
        Ok(Outcome::Changed)
    }

    fn commit(&mut self) -> Result<()> {
        self.storage.save(self.shelf.all())?;
        self.refresh()
    }

    fn notify(&mut self, text: impl Into<String>, kind: NoticeKind) -> Result<()> {
        let notice = self.notifier.notify(text, kind);
        self.renderer.show_notice(&notice)
    }

    /// The shelf.
    #[must_use]
    pub fn shelf(&self) -> &Shelf {
        &self.shelf
    }

    /// The add-book form.
    #[must_use]
    pub fn form(&self) -> &BookForm {
        &self.form
    }

    /// Edit the add-book form.
    pub fn form_mut(&mut self) -> &mut BookForm {
        &mut self.form
    }

    /// The status message, if it is still showing.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        self.notifier.current()
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
