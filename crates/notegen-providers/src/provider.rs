//! The completion provider trait

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{CompletionRequest, CompletionResponse};

/// A remote text-completion capability.
///
/// Implementations classify failures into the [`ProviderError`] taxonomy
/// and perform no retries; retry policy belongs to the caller, and the
/// orchestrator deliberately has none.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Stable identifier for logging and status text.
    fn id(&self) -> &str;

    /// Send a prompt plus parameters and return the generated text.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError>;
}
