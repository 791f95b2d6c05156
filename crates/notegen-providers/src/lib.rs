//! Completion service clients
//!
//! The pipeline talks to a remote text-completion service through the
//! [`CompletionProvider`] trait. The shipped implementation speaks the
//! OpenAI-compatible completions protocol. Clients never retry; failures
//! are classified and surfaced so one command press costs at most one
//! billed request.

pub mod error;
pub mod models;
pub mod provider;
pub mod providers;

pub use error::ProviderError;
pub use models::{CompletionRequest, CompletionResponse, GenerationParams};
pub use provider::CompletionProvider;
pub use providers::openai::OpenAiCompatClient;
