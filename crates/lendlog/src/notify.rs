//! Transient status messages.
//!
//! A [`Notifier`] holds the message shown after each shelf change and hides
//! it again after a fixed delay. The hide runs as a tokio task; when no
//! runtime is active the message simply stays visible.
//!
//! By default a later message does not cancel the hide scheduled for an
//! earlier one, so a quick second message can disappear before its full
//! delay has elapsed. Set `replace_pending` to cancel the earlier hide.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Default time a message stays visible.
pub const DEFAULT_HIDE_AFTER: Duration = Duration::from_secs(3);

/// Style of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// The action went through.
    Success,
    /// The action was refused.
    Error,
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A status message and whether it is currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Message text.
    pub text: String,
    /// Style tag.
    pub kind: NoticeKind,
    /// Whether the message is showing.
    pub visible: bool,
}

type Board = Arc<Mutex<Option<Notice>>>;

/// Shows status messages and hides them after a delay.
#[derive(Debug)]
pub struct Notifier {
    board: Board,
    hide_after: Duration,
    replace_pending: bool,
    pending: Option<JoinHandle<()>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_HIDE_AFTER)
    }
}

impl Notifier {
    /// Create a notifier that hides messages after `hide_after`.
    #[must_use]
    pub fn new(hide_after: Duration) -> Self {
        Self {
            board: Arc::new(Mutex::new(None)),
            hide_after,
            replace_pending: false,
            pending: None,
        }
    }

    /// Cancel the previous hide whenever a new message is shown.
    #[must_use]
    pub fn replacing_pending(mut self, replace: bool) -> Self {
        self.replace_pending = replace;
        self
    }

    /// How long messages stay visible.
    #[must_use]
    pub fn hide_after(&self) -> Duration {
        self.hide_after
    }

    /// Show a message and schedule it to be hidden.
    pub fn notify(&mut self, text: impl Into<String>, kind: NoticeKind) -> Notice {
        let notice = Notice {
            text: text.into(),
            kind,
            visible: true,
        };
        *lock(&self.board) = Some(notice.clone());
        trace!("Showing {} notice: {}", kind, notice.text);

        self.schedule_hide();
        notice
    }

    /// The current message, if it is still visible.
    #[must_use]
    pub fn current(&self) -> Option<Notice> {
        lock(&self.board).clone().filter(|notice| notice.visible)
    }

    fn schedule_hide(&mut self) {
        if self.replace_pending {
            if let Some(pending) = self.pending.take() {
                pending.abort();
            }
        }

        let Ok(runtime) = Handle::try_current() else {
            debug!("No async runtime, notice will stay visible");
            return;
        };

        let board = Arc::clone(&self.board);
        let delay = self.hide_after;
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(notice) = lock(&board).as_mut() {
                notice.visible = false;
            }
        }));
    }
}

fn lock(board: &Board) -> MutexGuard<'_, Option<Notice>> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}
