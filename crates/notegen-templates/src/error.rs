//! Error types for templating

use notegen_core::VaultError;
use thiserror::Error;

/// Errors raised while loading, compiling, or rendering templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Source is not parsable as a template
    #[error("Template syntax error: {0}")]
    Syntax(String),

    /// Strict mode: the template references a field the context does not
    /// provide
    #[error("Template references missing context field: {0}")]
    MissingField(String),

    /// Rendering failed for a reason other than a missing field
    #[error("Render error: {0}")]
    Render(String),

    /// No template at the given path beneath the templates root
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Template file frontmatter is not valid YAML
    #[error("Template metadata error: {0}")]
    Metadata(#[from] serde_yaml::Error),

    /// Vault access failed
    #[error(transparent)]
    Vault(#[from] VaultError),
}
