//! Shelf rendering.
//!
//! [`build_view`] turns a shelf snapshot into a [`ShelfView`] without touching
//! any output. A [`Renderer`] then draws that view: [`TextRenderer`] for
//! terminals, [`JsonRenderer`] for scripts.

use std::io::Write;

use serde::Serialize;

use crate::app::Intent;
use crate::book::{Book, BookId, BookStatus};
use crate::error::Result;
use crate::notify::Notice;

/// Message shown when the shelf has no books.
pub const EMPTY_MESSAGE: &str = "No books registered yet.";

/// What the shelf looks like to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ShelfView {
    /// No books at all.
    Empty {
        /// Placeholder text.
        message: String,
    },
    /// One row per book, in shelf order.
    Rows {
        /// The rows.
        rows: Vec<RowView>,
    },
}

impl ShelfView {
    /// Rows of the view; empty for [`ShelfView::Empty`].
    #[must_use]
    pub fn rows(&self) -> &[RowView] {
        match self {
            Self::Empty { .. } => &[],
            Self::Rows { rows } => rows,
        }
    }
}

/// One book as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    /// Book id.
    pub id: BookId,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Publication year.
    pub year: String,
    /// Lending status.
    pub status: BookStatus,
    /// Lending status as shown to the user.
    pub status_label: String,
    /// The status-dependent action offered for this book.
    pub action: RowAction,
}

/// The status-dependent action on a row. Every row also offers removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAction {
    /// Offered while the book is available.
    Rent,
    /// Offered while the book is rented.
    Return,
}

impl RowAction {
    /// The action offered for a book with the given status.
    #[must_use]
    pub fn for_status(status: BookStatus) -> Self {
        match status {
            BookStatus::Available => Self::Rent,
            BookStatus::Rented => Self::Return,
        }
    }

    /// Button label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rent => "rent",
            Self::Return => "return",
        }
    }

    /// The intent this action fires for a book.
    #[must_use]
    pub fn intent(self, id: BookId) -> Intent {
        match self {
            Self::Rent => Intent::Rent(id),
            Self::Return => Intent::Return(id),
        }
    }
}

impl From<&Book> for RowView {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.clone(),
            status: book.status,
            status_label: book.status.to_string(),
            action: RowAction::for_status(book.status),
        }
    }
}

/// Build the view for a shelf snapshot.
#[must_use]
pub fn build_view(books: &[Book]) -> ShelfView {
    if books.is_empty() {
        return ShelfView::Empty {
            message: EMPTY_MESSAGE.to_string(),
        };
    }
    ShelfView::Rows {
        rows: books.iter().map(RowView::from).collect(),
    }
}

/// Port that displays the shelf and status messages.
pub trait Renderer {
    /// Draw the shelf.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn render(&mut self, view: &ShelfView) -> Result<()>;

    /// Draw a status message.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn show_notice(&mut self, notice: &Notice) -> Result<()>;
}

/// Plain-text renderer.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    /// Render into the given writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Borrow the writer.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, view: &ShelfView) -> Result<()> {
        match view {
            ShelfView::Empty { message } => writeln!(self.out, "{message}")?,
            ShelfView::Rows { rows } => {
                for row in rows {
                    writeln!(self.out, "{}", row.title)?;
                    writeln!(self.out, "    {} ({})", row.author, row.year)?;
                    writeln!(self.out, "    Status: {}", row.status_label)?;
                    writeln!(
                        self.out,
                        "    [{} {id}] [remove {id}]",
                        row.action.label(),
                        id = row.id
                    )?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn show_notice(&mut self, notice: &Notice) -> Result<()> {
        if notice.visible {
            writeln!(self.out, "[{}] {}", notice.kind, notice.text)?;
            self.out.flush()?;
        }
        Ok(())
    }
}

/// JSON renderer, one document per line.
#[derive(Debug)]
pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    /// Render into the given writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, view: &ShelfView) -> Result<()> {
        serde_json::to_writer(&mut self.out, view)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn show_notice(&mut self, notice: &Notice) -> Result<()> {
        serde_json::to_writer(&mut self.out, notice)?;
        writeln!(self.out)?;
        Ok(())
    }
}
