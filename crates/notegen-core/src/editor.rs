//! Editor surface the pipeline applies results to
//!
//! Mutations go through this trait so the orchestrator can target the
//! position captured at dispatch time and let the host decide whether that
//! position still exists.

use crate::document::{DocumentSnapshot, Position};
use crate::error::EditorError;

/// The active editor pane: snapshot capture plus the three mutations the
/// pipeline performs.
pub trait EditorSurface: Send + Sync {
    /// Capture the current document state. Called synchronously before any
    /// suspension point.
    fn snapshot(&self) -> DocumentSnapshot;

    /// Insert text at a position captured earlier. Implementations must
    /// reject a position that no longer exists rather than clamping it.
    fn insert_at(&self, pos: Position, text: &str) -> Result<(), EditorError>;

    /// Replace the current selection with text.
    fn replace_selection(&self, text: &str) -> Result<(), EditorError>;

    /// Move the cursor, used after an insertion to place the cursor at the
    /// end of the generated text.
    fn set_cursor(&self, pos: Position);
}
