//! Auto-suggest engine
//!
//! The low-latency sibling of the orchestrator: fires when the characters
//! just typed equal the configured trigger phrase, asks the service for a
//! handful of short continuations, and offers them as suggestions. It is
//! debounced (one outstanding request per trigger, never queued) and
//! cancellable: every dispatch carries a generation ticket, any document
//! change bumps the ticket, and a resolution whose ticket is stale is
//! discarded so stale text can never reach the document.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use notegen_core::{DocumentSnapshot, Settings};
use notegen_providers::{
    CompletionProvider, CompletionRequest, GenerationParams,
};
use tracing::debug;

use crate::error::GenerationError;

/// One selectable continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Text to insert when picked, stop boundary reattached
    pub text: String,
}

pub struct AutoSuggestEngine {
    provider: Arc<dyn CompletionProvider>,
    /// Latest issued generation ticket; bumped on every document change
    ticket: AtomicU64,
    /// Whether a request for the current trigger is outstanding
    outstanding: AtomicBool,
}

/// Clears the outstanding flag on drop, so the debounce releases on every
/// exit path, including a `suggest` future dropped mid-await.
struct OutstandingReset<'a>(&'a AtomicBool);

impl Drop for OutstandingReset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AutoSuggestEngine {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            ticket: AtomicU64::new(0),
            outstanding: AtomicBool::new(false),
        }
    }

    /// Record a document change. Any outstanding request's result becomes
    /// stale and will be discarded on resolution.
    pub fn note_document_change(&self) {
        self.ticket.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether typing at this snapshot should fire a suggestion request.
    pub fn should_trigger(&self, settings: &Settings, snapshot: &DocumentSnapshot) -> bool {
        let opts = &settings.auto_suggest;
        opts.enabled
            && !opts.trigger_phrase.is_empty()
            && !self.outstanding.load(Ordering::SeqCst)
            && snapshot
                .text_before_cursor()
                .ends_with(&opts.trigger_phrase)
    }

    /// Request continuations for the text before the cursor.
    ///
    /// Returns `Ok(None)` when the trigger does not apply, when a request
    /// is already outstanding, or when the result arrived stale.
    pub async fn suggest(
        &self,
        settings: &Settings,
        snapshot: &DocumentSnapshot,
    ) -> Result<Option<Vec<Suggestion>>, GenerationError> {
        if !self.should_trigger(settings, snapshot) {
            return Ok(None);
        }
        if self.outstanding.swap(true, Ordering::SeqCst) {
            // Debounced: never a second request for the same trigger.
            return Ok(None);
        }
        let _reset = OutstandingReset(&self.outstanding);

        let ticket = self.ticket.load(Ordering::SeqCst);
        let opts = &settings.auto_suggest;
        let prefix = snapshot.text_before_cursor();
        let prompt = prefix
            .strip_suffix(&opts.trigger_phrase)
            .unwrap_or(&prefix)
            .to_string();

        let params = GenerationParams {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            frequency_penalty: settings.frequency_penalty,
            stop: Some(vec![opts.stop.clone()]),
        };
        let request = CompletionRequest::new(prompt, params)
            .with_choices(opts.number_of_suggestions.max(1));

        let response = self.provider.complete(request).await?;

        if self.ticket.load(Ordering::SeqCst) != ticket {
            debug!("suggestion resolved after a document change, discarding");
            return Ok(None);
        }

        let suggestions = response
            .choices
            .into_iter()
            .map(|choice| Suggestion {
                text: format!("{}{}", choice.trim(), opts.stop),
            })
            .filter(|s| s.text != opts.stop)
            .collect();
        Ok(Some(suggestions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use notegen_core::Position;
    use notegen_providers::{CompletionResponse, ProviderError};
    use std::time::Duration;

    struct SlowProvider {
        delay: Duration,
        choices: Vec<String>,
    }

    #[async_trait]
    impl CompletionProvider for SlowProvider {
        fn id(&self) -> &str {
            "slow"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, ProviderError> {
            tokio::time::sleep(self.delay).await;
            Ok(CompletionResponse {
                choices: self.choices.clone(),
            })
        }
    }

    fn provider(choices: &[&str]) -> Arc<SlowProvider> {
        Arc::new(SlowProvider {
            delay: Duration::from_millis(0),
            choices: choices.iter().map(|s| s.to_string()).collect(),
        })
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.auto_suggest.enabled = true;
        settings
    }

    fn snapshot_with(text: &str) -> DocumentSnapshot {
        let line = text.lines().count().saturating_sub(1);
        let ch = text.lines().last().unwrap_or("").chars().count();
        DocumentSnapshot::new("a.md", text, Position::new(line, ch))
    }

    #[tokio::test]
    async fn test_trigger_requires_phrase_before_cursor() {
        let engine = AutoSuggestEngine::new(provider(&[]));
        let s = settings();
        assert!(engine.should_trigger(&s, &snapshot_with("some text  ")));
        assert!(!engine.should_trigger(&s, &snapshot_with("some text")));
    }

    #[tokio::test]
    async fn test_disabled_engine_never_triggers() {
        let engine = AutoSuggestEngine::new(provider(&[]));
        let mut s = settings();
        s.auto_suggest.enabled = false;
        assert!(!engine.should_trigger(&s, &snapshot_with("text  ")));
    }

    #[tokio::test]
    async fn test_suggestions_reattach_stop_boundary() {
        let engine = AutoSuggestEngine::new(provider(&[" first", " second"]));
        let result = engine
            .suggest(&settings(), &snapshot_with("The start  "))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            result,
            vec![
                Suggestion {
                    text: "first.".to_string()
                },
                Suggestion {
                    text: "second.".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_stale_result_is_discarded() {
        let slow = Arc::new(SlowProvider {
            delay: Duration::from_millis(50),
            choices: vec!["stale".to_string()],
        });
        let engine = Arc::new(AutoSuggestEngine::new(
            slow as Arc<dyn CompletionProvider>,
        ));
        let s = settings();
        let snapshot = snapshot_with("typing  ");

        let pending = {
            let engine = Arc::clone(&engine);
            let s = s.clone();
            tokio::spawn(async move { engine.suggest(&s, &snapshot).await })
        };
        // An edit lands while the request is in flight.
        tokio::time::sleep(Duration::from_millis(10)).await;
        engine.note_document_change();

        let result = pending.await.unwrap().unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_second_trigger_is_debounced_while_outstanding() {
        let slow = Arc::new(SlowProvider {
            delay: Duration::from_millis(50),
            choices: vec!["one".to_string()],
        });
        let engine = Arc::new(AutoSuggestEngine::new(
            slow as Arc<dyn CompletionProvider>,
        ));
        let s = settings();

        let first = {
            let engine = Arc::clone(&engine);
            let s = s.clone();
            tokio::spawn(async move {
                engine.suggest(&s, &snapshot_with("first  ")).await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Same trigger occurrence still outstanding: rejected immediately.
        let second = engine.suggest(&s, &snapshot_with("first  ")).await.unwrap();
        assert_eq!(second, None);

        let first = first.await.unwrap().unwrap();
        assert!(first.is_some());
    }

    #[tokio::test]
    async fn test_dropped_request_releases_the_debounce() {
        let slow = Arc::new(SlowProvider {
            delay: Duration::from_secs(5),
            choices: vec!["never delivered".to_string()],
        });
        let engine = AutoSuggestEngine::new(slow as Arc<dyn CompletionProvider>);
        let s = settings();
        let snapshot = snapshot_with("typing  ");

        // The host abandons the suggestion; the timeout drops the future
        // while the request is still awaiting the service.
        let cancelled =
            tokio::time::timeout(Duration::from_millis(10), engine.suggest(&s, &snapshot)).await;
        assert!(cancelled.is_err());

        // A later trigger must still fire.
        assert!(engine.should_trigger(&s, &snapshot));
    }

    #[tokio::test]
    async fn test_prompt_excludes_trigger_phrase() {
        struct Capture {
            prompt: parking_lot::Mutex<Option<String>>,
        }

        #[async_trait]
        impl CompletionProvider for Capture {
            fn id(&self) -> &str {
                "capture"
            }
            async fn complete(
                &self,
                request: CompletionRequest,
            ) -> Result<CompletionResponse, ProviderError> {
                *self.prompt.lock() = Some(request.prompt);
                Ok(CompletionResponse {
                    choices: vec!["x".to_string()],
                })
            }
        }

        let capture = Arc::new(Capture {
            prompt: parking_lot::Mutex::new(None),
        });
        let engine = AutoSuggestEngine::new(Arc::clone(&capture) as Arc<dyn CompletionProvider>);
        engine
            .suggest(&settings(), &snapshot_with("keep this  "))
            .await
            .unwrap();
        assert_eq!(capture.prompt.lock().as_deref(), Some("keep this"));
    }
}
