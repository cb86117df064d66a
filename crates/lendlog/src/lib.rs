//! `lendlog` - A personal book-lending tracker
//!
//! This library keeps a shelf of books, tracks which ones are lent out, and
//! saves the whole shelf to a local store after every change.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod book;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod shelf;
pub mod storage;
pub mod view;

pub use app::{BookForm, Intent, Library, Outcome};
pub use book::{Book, BookId, BookStatus};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use notify::{Notice, NoticeKind, Notifier};
pub use shelf::{Shelf, ShelfCounts};
pub use storage::{BookStorage, MemorySlots, SlotArchive, SqliteSlots};
pub use view::{build_view, JsonRenderer, Renderer, ShelfView, TextRenderer};
