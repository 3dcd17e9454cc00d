//! Cooperative cancellation of print operations.
//!
//! Printing a large value can issue many blocking target reads. A [`CancellationToken`] is
//! shared between the printer and whoever may want to interrupt it (typically a Ctrl+C handler).
//! The printer checks it at the top of every recursive value print and on every iteration of
//! the sequence and string-fetch loops, and unwinds with [`Error::Cancelled`] once it is set.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{Error, Result};

/// Shared flag requesting that the current print operation stop.
///
/// Cloning is cheap and every clone observes the same flag.
///
/// # Example
///
/// ```rust
/// use valscope::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handler_side = token.clone();
///
/// assert!(token.checkpoint().is_ok());
/// handler_side.cancel();
/// assert!(token.checkpoint().is_err());
///
/// token.reset();
/// assert!(!token.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        CancellationToken {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clears a previous request so the token can be reused for the next operation.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Returns `true` if cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Cancellation checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if cancellation was requested.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }
}
