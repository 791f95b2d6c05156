//! Request and response models for completion dispatch

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Parameters for one generation. Validated before dispatch; an
/// out-of-range value is rejected, never clamped. Bounds follow the
/// documented service contract; anything subtler is left to the service's
/// own validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub frequency_penalty: f32,
    /// Truncation boundaries; the service stops generating at the first one
    pub stop: Option<Vec<String>>,
}

impl GenerationParams {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_tokens: 160,
            temperature: 0.7,
            frequency_penalty: 0.5,
            stop: None,
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::InvalidParams(
                "model identifier is empty".to_string(),
            ));
        }
        if self.max_tokens == 0 {
            return Err(ProviderError::InvalidParams(
                "max_tokens must be positive".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ProviderError::InvalidParams(format!(
                "temperature {} outside 0..=2",
                self.temperature
            )));
        }
        if !(-2.0..=2.0).contains(&self.frequency_penalty) {
            return Err(ProviderError::InvalidParams(format!(
                "frequency_penalty {} outside -2..=2",
                self.frequency_penalty
            )));
        }
        Ok(())
    }
}

/// One completion dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub params: GenerationParams,
    /// Number of alternative completions to request; the auto-suggest path
    /// asks for several short ones
    pub n: Option<u8>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            params,
            n: None,
        }
    }

    pub fn with_choices(mut self, n: u8) -> Self {
        self.n = Some(n);
        self
    }
}

/// What the service generated.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// At least one choice; in document order as returned by the service
    pub choices: Vec<String>,
}

impl CompletionResponse {
    /// The primary generated text.
    pub fn text(&self) -> &str {
        self.choices.first().map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert!(GenerationParams::new("gpt-3.5-turbo-instruct").validate().is_ok());
    }

    #[test]
    fn test_empty_model_rejected() {
        let params = GenerationParams::new("  ");
        assert!(matches!(
            params.validate(),
            Err(ProviderError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let mut params = GenerationParams::new("m");
        params.max_tokens = 0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_temperature_bounds() {
        let mut params = GenerationParams::new("m");
        params.temperature = 2.0;
        assert!(params.validate().is_ok());
        params.temperature = 2.1;
        assert!(params.validate().is_err());
        params.temperature = -0.1;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_frequency_penalty_bounds() {
        let mut params = GenerationParams::new("m");
        params.frequency_penalty = -2.0;
        assert!(params.validate().is_ok());
        params.frequency_penalty = -2.5;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_response_text_takes_first_choice() {
        let response = CompletionResponse {
            choices: vec!["one".into(), "two".into()],
        };
        assert_eq!(response.text(), "one");
    }
}
