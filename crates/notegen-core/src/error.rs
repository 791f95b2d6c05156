//! Error types for the host boundary

use thiserror::Error;

/// Errors raised by a vault implementation
#[derive(Debug, Error)]
pub enum VaultError {
    /// Document not found at the given path
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Document already exists (create refuses to overwrite)
    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    /// Underlying IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path escapes the vault root or is otherwise malformed
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Errors raised by an editor surface
#[derive(Debug, Error)]
pub enum EditorError {
    /// Target position no longer exists in the document
    #[error("Position {}:{} is no longer valid", .0.line, .0.ch)]
    InvalidPosition(crate::document::Position),

    /// Replace requested with no active selection
    #[error("No active selection")]
    NoSelection,
}
