//! Error types for context gathering

use thiserror::Error;

/// Hard failures while gathering context. Unreadable *linked* documents are
/// logged and skipped, never raised; only problems with the active document
/// abort the gather.
#[derive(Debug, Error)]
pub enum ContextError {
    /// Frontmatter was requested but the active document's frontmatter is
    /// not valid YAML
    #[error("Malformed frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml::Error),
}
