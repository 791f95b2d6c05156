//! Command surface
//!
//! The named actions a host binds to shortcuts. Each command maps to
//! exactly one orchestrator or auto-suggest entry point; the mapping layer
//! holds no logic of its own beyond per-command enable flags.

use notegen_core::{EditorSurface, Settings, Vault};
use notegen_templates::{TemplateEngine, TemplateStore};

use crate::error::GenerationError;
use crate::orchestrator::{GenerationOrchestrator, OutputTarget};

/// Named actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate,
    GenerateWithMetadata,
    /// Generate from a template and insert at the cursor
    InsertFromTemplate(String),
    /// Generate from a template into a new file
    CreateFromTemplate(String),
    /// Insert the rendered template without generating
    InsertTemplate(String),
    /// Write the rendered template to a new file without generating
    CreateFileFromTemplate(String),
    /// List the context fields a template consumes
    ShowModelFromTemplate(String),
    /// Persist the current selection (or document) as a template
    CreateTemplate(String),
    GenerateTitle,
    ToggleAutoSuggest,
}

impl Command {
    /// Whether this command is enabled in settings.
    pub fn is_enabled(&self, settings: &Settings) -> bool {
        let toggles = &settings.commands;
        match self {
            Command::Generate => toggles.generate,
            Command::GenerateWithMetadata => toggles.generate_with_metadata,
            Command::InsertFromTemplate(_) => toggles.insert_from_template,
            Command::CreateFromTemplate(_) => toggles.create_from_template,
            Command::InsertTemplate(_) => toggles.insert_template,
            Command::CreateFileFromTemplate(_) => toggles.create_file_from_template,
            Command::ShowModelFromTemplate(_) => toggles.show_model_from_template,
            Command::CreateTemplate(_) => toggles.create_template,
            Command::GenerateTitle => toggles.generate_title,
            Command::ToggleAutoSuggest => toggles.toggle_auto_suggest,
        }
    }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Document was mutated (or a file created); nothing to show
    Applied,
    /// Text to show the user
    Text(String),
    /// Context fields a template consumes
    Fields(Vec<String>),
    /// New auto-suggest state after a toggle
    AutoSuggest(bool),
}

/// Route a command to its entry point.
pub async fn dispatch(
    command: Command,
    orchestrator: &GenerationOrchestrator,
    settings: &mut Settings,
    vault: &dyn Vault,
    editor: &dyn EditorSurface,
) -> Result<CommandOutcome, GenerationError> {
    match command {
        Command::Generate => {
            orchestrator
                .generate_in_editor(settings, editor, false)
                .await?;
            Ok(CommandOutcome::Applied)
        }
        Command::GenerateWithMetadata => {
            orchestrator
                .generate_in_editor(settings, editor, true)
                .await?;
            Ok(CommandOutcome::Applied)
        }
        Command::InsertFromTemplate(path) => {
            orchestrator
                .generate_from_template(
                    settings,
                    vault,
                    editor,
                    &path,
                    OutputTarget::InsertAtCursor,
                )
                .await?;
            Ok(CommandOutcome::Applied)
        }
        Command::CreateFromTemplate(path) => {
            orchestrator
                .generate_from_template(settings, vault, editor, &path, OutputTarget::NewFile)
                .await?;
            Ok(CommandOutcome::Applied)
        }
        Command::InsertTemplate(path) => {
            orchestrator.create_to_file(
                settings,
                vault,
                editor,
                &path,
                OutputTarget::InsertAtCursor,
            )?;
            Ok(CommandOutcome::Applied)
        }
        Command::CreateFileFromTemplate(path) => {
            orchestrator.create_to_file(settings, vault, editor, &path, OutputTarget::NewFile)?;
            Ok(CommandOutcome::Applied)
        }
        Command::ShowModelFromTemplate(path) => {
            let store = TemplateStore::new(&settings.templates_path);
            let template = store.load(vault, &path)?;
            Ok(CommandOutcome::Fields(TemplateEngine::referenced_fields(
                &template.source,
            )))
        }
        Command::CreateTemplate(name) => {
            let snapshot = editor.snapshot();
            let store = TemplateStore::new(&settings.templates_path);
            let path = store.create(vault, &name, snapshot.selection_or_content())?;
            Ok(CommandOutcome::Text(path))
        }
        Command::GenerateTitle => {
            let title = orchestrator
                .generate_title(settings, vault, editor)
                .await?;
            Ok(CommandOutcome::Text(title))
        }
        Command::ToggleAutoSuggest => {
            settings.auto_suggest.enabled = !settings.auto_suggest.enabled;
            Ok(CommandOutcome::AutoSuggest(settings.auto_suggest.enabled))
        }
    }
}
