//! Single-threaded cancellation flag.

use std::cell::Cell;
use std::rc::Rc;

/// Shared flag set when the user closes or cancels the editor.
///
/// Clones observe the same flag. Capture checks it after acquisition
/// resolves and encoding checks it before every attempt.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}
