//! In-memory undo/redo history.
//!
//! History entries are never persisted; they live as long as the session
//! that owns them.

pub mod stack;
pub mod debounce;

pub use stack::{HistoryStack, DEFAULT_HISTORY_CAPACITY};
pub use debounce::DebouncedHistory;
