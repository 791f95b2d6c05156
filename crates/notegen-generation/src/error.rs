//! Error types for generation orchestration

use notegen_core::{EditorError, VaultError};
use notegen_providers::ProviderError;
use thiserror::Error;

/// Failures a generation request can end in. `Busy` is a lightweight
/// notice, not an error condition; everything else is reported to the user
/// and nothing here is allowed to take the host down.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A generation is already in flight; the new request is rejected, not
    /// queued
    #[error("A generation is already running")]
    Busy,

    /// Template loading, compilation, or rendering failed
    #[error(transparent)]
    Template(#[from] notegen_templates::TemplateError),

    /// Context gathering failed on the active document
    #[error(transparent)]
    Context(#[from] notegen_context::ContextError),

    /// The completion service failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Vault access failed
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// The position captured at dispatch time no longer exists, so the
    /// result was dropped rather than applied elsewhere
    #[error("Document changed while generating; result dropped")]
    StalePosition,
}

impl From<EditorError> for GenerationError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::InvalidPosition(_) => GenerationError::StalePosition,
            EditorError::NoSelection => GenerationError::StalePosition,
        }
    }
}

impl GenerationError {
    /// Short classification used in status text and the failure callout.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Busy => "busy",
            GenerationError::Template(_) => "template",
            GenerationError::Context(_) => "context",
            GenerationError::Provider(ProviderError::Auth) => "auth",
            GenerationError::Provider(ProviderError::RateLimited(_)) => "rate-limit",
            GenerationError::Provider(ProviderError::Timeout) => "timeout",
            GenerationError::Provider(_) => "provider",
            GenerationError::Vault(_) => "vault",
            GenerationError::StalePosition => "stale-position",
        }
    }
}
