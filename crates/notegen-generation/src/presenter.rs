//! Error presenter
//!
//! Normalizes any generation failure into a transient status message and,
//! when enabled, a collapsible failure callout appended to the document.
//! The presenter itself never fails: a formatting or insertion problem is
//! logged and swallowed.

use notegen_core::{EditorSurface, Position, Settings, StatusSink};
use tracing::warn;

use crate::error::GenerationError;

pub struct ErrorPresenter;

impl ErrorPresenter {
    /// Report a failure to the user. `Busy` is presented as a lightweight
    /// notice; everything else gets an error status and, when
    /// `display_errors_in_editor` is set, an in-document callout.
    pub fn present(
        settings: &Settings,
        status: &dyn StatusSink,
        editor: Option<&dyn EditorSurface>,
        err: &GenerationError,
    ) {
        if matches!(err, GenerationError::Busy) {
            status.notify("A generation is already running");
            return;
        }

        status.set_status("error");
        status.notify(&format!("Text generation failed: {err}"));

        if settings.display_errors_in_editor {
            if let Some(editor) = editor {
                Self::append_callout(editor, err);
            }
        }
    }

    /// The collapsible failure block appended to the document.
    pub fn format_callout(err: &GenerationError) -> String {
        let mut block = String::from("\n> [!failure]- Failure\n");
        block.push_str(&format!("> kind: {}\n", err.kind()));
        for line in err.to_string().lines() {
            block.push_str("> ");
            block.push_str(line);
            block.push('\n');
        }
        block
    }

    fn append_callout(editor: &dyn EditorSurface, err: &GenerationError) {
        let snapshot = editor.snapshot();
        // A trailing newline puts the end of the document on the empty line
        // past the last text line; the callout goes after it, not before.
        let end = if snapshot.content.ends_with('\n') {
            Position::new(snapshot.content.lines().count(), 0)
        } else {
            let last_line = snapshot.content.lines().count().saturating_sub(1);
            let last_ch = snapshot
                .content
                .lines()
                .last()
                .map(|l| l.chars().count())
                .unwrap_or(0);
            Position::new(last_line, last_ch)
        };
        if let Err(e) = editor.insert_at(end, &Self::format_callout(err)) {
            warn!(error = %e, "failed to render failure callout, dropping it");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notegen_core::{DocumentSnapshot, MemoryEditor, MemoryStatus};
    use notegen_providers::ProviderError;

    #[test]
    fn test_busy_is_a_notice_not_an_error() {
        let status = MemoryStatus::new();
        ErrorPresenter::present(
            &Settings::default(),
            &status,
            None,
            &GenerationError::Busy,
        );
        assert_eq!(status.last_status(), None);
        assert_eq!(status.notices(), vec!["A generation is already running"]);
    }

    #[test]
    fn test_failure_sets_error_status() {
        let status = MemoryStatus::new();
        ErrorPresenter::present(
            &Settings::default(),
            &status,
            None,
            &GenerationError::Provider(ProviderError::Auth),
        );
        assert_eq!(status.last_status().as_deref(), Some("error"));
        assert!(status.notices()[0].contains("Authentication failed"));
    }

    #[test]
    fn test_callout_appended_when_enabled() {
        let mut settings = Settings::default();
        settings.display_errors_in_editor = true;
        let status = MemoryStatus::new();
        let editor = MemoryEditor::new(DocumentSnapshot::new(
            "a.md",
            "doc body",
            Position::new(0, 0),
        ));

        ErrorPresenter::present(
            &settings,
            &status,
            Some(&editor),
            &GenerationError::Provider(ProviderError::Timeout),
        );
        let content = editor.content();
        assert!(content.starts_with("doc body"));
        assert!(content.contains("> [!failure]- Failure"));
        assert!(content.contains("> kind: timeout"));
    }

    #[test]
    fn test_callout_lands_after_trailing_newline() {
        let mut settings = Settings::default();
        settings.display_errors_in_editor = true;
        let status = MemoryStatus::new();
        let editor = MemoryEditor::new(DocumentSnapshot::new(
            "a.md",
            "doc body\n",
            Position::new(0, 0),
        ));

        ErrorPresenter::present(
            &settings,
            &status,
            Some(&editor),
            &GenerationError::Provider(ProviderError::Timeout),
        );
        let content = editor.content();
        assert!(content.starts_with("doc body\n\n> [!failure]- Failure"));
    }

    #[test]
    fn test_callout_not_appended_when_disabled() {
        let status = MemoryStatus::new();
        let editor = MemoryEditor::new(DocumentSnapshot::new(
            "a.md",
            "doc body",
            Position::new(0, 0),
        ));

        ErrorPresenter::present(
            &Settings::default(),
            &status,
            Some(&editor),
            &GenerationError::StalePosition,
        );
        assert_eq!(editor.content(), "doc body");
    }
}
