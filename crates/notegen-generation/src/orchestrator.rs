//! Generation orchestrator
//!
//! Per request the flow is Idle → Acquiring → Rendering → AwaitingCompletion
//! → Applying → Idle. Acquiring fails fast with [`GenerationError::Busy`]
//! when the guard is held. The document snapshot is captured synchronously
//! before the first await, so context is immune to concurrent edits; the
//! result is applied at the captured position and dropped if that position
//! no longer exists.

use std::sync::Arc;

use notegen_context::{markdown, ContextManager};
use notegen_core::{
    DocumentSnapshot, EditorSurface, Position, Settings, StatusSink, Vault,
};
use notegen_providers::{
    CompletionProvider, CompletionRequest, GenerationParams,
};
use notegen_templates::{Template, TemplateEngine, TemplateStore};
use tracing::{debug, warn};

use crate::error::GenerationError;
use crate::guard::ConcurrencyGuard;

/// How the prompt was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    Raw,
    Templated,
}

/// Where the generated text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputTarget {
    InsertAtCursor,
    ReplaceSelection,
    NewFile,
    ReturnOnly,
}

/// A fully assembled generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub params: GenerationParams,
    pub mode: PromptMode,
    pub target: OutputTarget,
}

/// Composes context gathering, template rendering, guarded dispatch, and
/// result application.
pub struct GenerationOrchestrator {
    provider: Arc<dyn CompletionProvider>,
    engine: TemplateEngine,
    contexts: ContextManager,
    guard: Arc<ConcurrencyGuard>,
    status: Arc<dyn StatusSink>,
}

impl GenerationOrchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>, status: Arc<dyn StatusSink>) -> Self {
        Self {
            provider,
            engine: TemplateEngine::new(),
            contexts: ContextManager::new(),
            guard: ConcurrencyGuard::new(),
            status,
        }
    }

    /// The single-flight guard, shared with the host's busy indicator.
    pub fn guard(&self) -> &Arc<ConcurrencyGuard> {
        &self.guard
    }

    /// The template engine (and its compile cache), shared with the `tg`
    /// block surface.
    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    fn params(settings: &Settings) -> GenerationParams {
        GenerationParams {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            frequency_penalty: settings.frequency_penalty,
            stop: None,
        }
    }

    /// Guarded dispatch: acquire, call the service, release on every path.
    async fn dispatch(
        &self,
        request: GenerationRequest,
        cursor_mark: Option<Position>,
    ) -> Result<String, GenerationError> {
        // Reject malformed parameters before taking the guard, so a bad
        // request never flashes the busy state.
        request.params.validate()?;

        let slot = self
            .guard
            .try_acquire(cursor_mark)
            .ok_or(GenerationError::Busy)?;
        self.status.set_status("processing...");

        let result = self
            .provider
            .complete(
                CompletionRequest::new(request.prompt, request.params),
            )
            .await;

        self.status.set_status("");
        slot.release();

        let response = result?;
        debug!(mode = ?request.mode, target = ?request.target, "completion received");
        Ok(response.text().to_string())
    }

    /// Raw-prompt generation returning the text without touching any
    /// document. With `use_metadata`, frontmatter-derived instructions are
    /// prepended to the prompt.
    pub async fn generate(
        &self,
        settings: &Settings,
        snapshot: &DocumentSnapshot,
        use_metadata: bool,
    ) -> Result<String, GenerationError> {
        let mut prompt = String::new();
        if use_metadata {
            prompt.push_str(&metadata_block(snapshot));
        }
        prompt.push_str(snapshot.selection_or_content());

        self.dispatch(
            GenerationRequest {
                prompt,
                params: Self::params(settings),
                mode: PromptMode::Raw,
                target: OutputTarget::ReturnOnly,
            },
            None,
        )
        .await
    }

    /// Raw-prompt generation applied at the cursor captured before
    /// dispatch.
    pub async fn generate_in_editor(
        &self,
        settings: &Settings,
        editor: &dyn EditorSurface,
        use_metadata: bool,
    ) -> Result<(), GenerationError> {
        let snapshot = editor.snapshot();
        let text = self.generate(settings, &snapshot, use_metadata).await?;
        self.insert_at_captured(editor, snapshot.cursor, &text)
    }

    /// Dispatch an already-rendered prompt (the `tg` block generate action)
    /// and insert the result at the cursor.
    pub async fn generate_prompt_in_editor(
        &self,
        settings: &Settings,
        editor: &dyn EditorSurface,
        prompt: &str,
    ) -> Result<(), GenerationError> {
        let snapshot = editor.snapshot();
        let text = self
            .dispatch(
                GenerationRequest {
                    prompt: prompt.to_string(),
                    params: Self::params(settings),
                    mode: PromptMode::Raw,
                    target: OutputTarget::InsertAtCursor,
                },
                Some(snapshot.cursor),
            )
            .await?;
        self.insert_at_captured(editor, snapshot.cursor, &text)
    }

    /// Templated generation: load, gather, render, dispatch, apply.
    /// Returns the generated text.
    pub async fn generate_from_template(
        &self,
        settings: &Settings,
        vault: &dyn Vault,
        editor: &dyn EditorSurface,
        template_path: &str,
        target: OutputTarget,
    ) -> Result<String, GenerationError> {
        let snapshot = editor.snapshot();
        let store = TemplateStore::new(&settings.templates_path);
        let template = store.load(vault, template_path)?;

        let context = self
            .contexts
            .gather(vault, &snapshot, &settings.context)?;
        let compiled = self.engine.compile(&template.source)?;
        let prompt = self.engine.render(&compiled, &context.to_value())?;

        let cursor_mark =
            (target == OutputTarget::InsertAtCursor).then_some(snapshot.cursor);
        let text = self
            .dispatch(
                GenerationRequest {
                    prompt,
                    params: Self::params(settings),
                    mode: PromptMode::Templated,
                    target,
                },
                cursor_mark,
            )
            .await?;

        self.apply(target, &text, &snapshot, editor, vault, Some(&template))?;
        Ok(text)
    }

    /// Template-only expansion: render and apply without any completion
    /// call. Used for templates that are pure text scaffolding.
    pub fn create_to_file(
        &self,
        settings: &Settings,
        vault: &dyn Vault,
        editor: &dyn EditorSurface,
        template_path: &str,
        target: OutputTarget,
    ) -> Result<String, GenerationError> {
        let snapshot = editor.snapshot();
        let store = TemplateStore::new(&settings.templates_path);
        let template = store.load(vault, template_path)?;

        let context = self
            .contexts
            .gather(vault, &snapshot, &settings.context)?;
        let rendered = self
            .engine
            .render_source(&template.source, &context.to_value())?;

        self.apply(target, &rendered, &snapshot, editor, vault, Some(&template))?;
        Ok(rendered)
    }

    /// Generate a title for the document and rename it in the vault.
    /// Returns the new title.
    pub async fn generate_title(
        &self,
        settings: &Settings,
        vault: &dyn Vault,
        editor: &dyn EditorSurface,
    ) -> Result<String, GenerationError> {
        const HEAD_LEN: usize = 255;

        let snapshot = editor.snapshot();
        let head: String = snapshot.content.chars().take(HEAD_LEN).collect();
        let prompt = format!(
            "Generate a title for the following document. Do not use the \
             characters * \" \\ / < > : | ? .\n\n{head}\n"
        );

        let raw = self
            .dispatch(
                GenerationRequest {
                    prompt,
                    params: Self::params(settings),
                    mode: PromptMode::Raw,
                    target: OutputTarget::ReturnOnly,
                },
                None,
            )
            .await?;

        let title = sanitize_title(&raw);
        if title.is_empty() {
            return Err(notegen_providers::ProviderError::InvalidResponse(
                "generated title was empty after sanitization".to_string(),
            )
            .into());
        }

        let new_path = match snapshot.path.rsplit_once('/') {
            Some((dir, _)) => format!("{dir}/{title}.md"),
            None => format!("{title}.md"),
        };
        vault.rename(&snapshot.path, &new_path)?;
        Ok(title)
    }

    fn insert_at_captured(
        &self,
        editor: &dyn EditorSurface,
        cursor: Position,
        text: &str,
    ) -> Result<(), GenerationError> {
        editor.insert_at(cursor, text).map_err(|e| {
            warn!(error = %e, "captured position vanished, dropping generated text");
            GenerationError::from(e)
        })?;
        editor.set_cursor(end_of_insertion(cursor, text));
        Ok(())
    }

    fn apply(
        &self,
        target: OutputTarget,
        text: &str,
        snapshot: &DocumentSnapshot,
        editor: &dyn EditorSurface,
        vault: &dyn Vault,
        template: Option<&Template>,
    ) -> Result<(), GenerationError> {
        match target {
            OutputTarget::ReturnOnly => Ok(()),
            OutputTarget::InsertAtCursor => {
                self.insert_at_captured(editor, snapshot.cursor, text)
            }
            OutputTarget::ReplaceSelection => {
                editor.replace_selection(text).map_err(GenerationError::from)
            }
            OutputTarget::NewFile => {
                let path = new_file_path(vault, template);
                vault.create(&path, text)?;
                debug!(%path, "generated document created");
                Ok(())
            }
        }
    }
}

/// Frontmatter-derived instructions prepended in metadata mode.
fn metadata_block(snapshot: &DocumentSnapshot) -> String {
    let mut block = format!("title: {}\n", snapshot.title());
    if let (Some(frontmatter), _) = markdown::split_frontmatter(&snapshot.content) {
        block.push_str(frontmatter.trim_end());
        block.push('\n');
    }
    block.push('\n');
    block
}

/// Where the cursor lands after inserting `text` at `start`.
fn end_of_insertion(start: Position, text: &str) -> Position {
    let newlines = text.matches('\n').count();
    if newlines == 0 {
        Position::new(start.line, start.ch + text.chars().count())
    } else {
        let last_len = text.rsplit('\n').next().unwrap_or("").chars().count();
        Position::new(start.line + newlines, last_len)
    }
}

/// Strip filesystem-hostile characters and surrounding whitespace from a
/// generated title.
fn sanitize_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '*' | '"' | '\\' | '/' | '<' | '>' | ':' | '|' | '?' | '.'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Path for a newly created document: the template's declared output path
/// when free, otherwise a numbered variant of the template name.
fn new_file_path(vault: &dyn Vault, template: Option<&Template>) -> String {
    let base = template
        .and_then(|t| t.metadata.output.clone())
        .unwrap_or_else(|| {
            let stem = template.map(|t| t.stem.as_str()).unwrap_or("generated");
            format!("generated/{stem}.md")
        });
    if !vault.exists(&base) {
        return base;
    }
    let stem = base.strip_suffix(".md").unwrap_or(&base);
    let mut n = 1;
    loop {
        let candidate = format!("{stem} {n}.md");
        if !vault.exists(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
