//! Persisted configuration
//!
//! A flat settings object with a serde load/save boundary. The settings UI
//! is host glue; the pipeline only reads these fields.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VaultError;

/// Which context fragments `ContextManager::gather` populates. Disabled
/// means "not requested", which is distinct from requested-but-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextFlags {
    pub include_title: bool,
    pub include_stared_blocks: bool,
    pub include_frontmatter: bool,
    pub include_headings: bool,
    pub include_children: bool,
    pub include_mentions: bool,
    pub include_highlights: bool,
}

impl Default for ContextFlags {
    fn default() -> Self {
        Self {
            include_title: false,
            include_stared_blocks: true,
            include_frontmatter: true,
            include_headings: true,
            include_children: false,
            include_mentions: false,
            include_highlights: true,
        }
    }
}

impl ContextFlags {
    /// A flag set with everything disabled, the base tests build on.
    pub fn none() -> Self {
        Self {
            include_title: false,
            include_stared_blocks: false,
            include_frontmatter: false,
            include_headings: false,
            include_children: false,
            include_mentions: false,
            include_highlights: false,
        }
    }
}

/// Auto-suggest behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSuggestOptions {
    pub enabled: bool,
    pub number_of_suggestions: u8,
    pub trigger_phrase: String,
    pub stop: String,
}

impl Default for AutoSuggestOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            number_of_suggestions: 5,
            trigger_phrase: "  ".to_string(),
            stop: ".".to_string(),
        }
    }
}

/// Per-command enable switches for the command surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandToggles {
    pub generate: bool,
    pub generate_with_metadata: bool,
    pub insert_from_template: bool,
    pub create_from_template: bool,
    pub insert_template: bool,
    pub create_file_from_template: bool,
    pub show_model_from_template: bool,
    pub create_template: bool,
    pub generate_title: bool,
    pub toggle_auto_suggest: bool,
}

impl Default for CommandToggles {
    fn default() -> Self {
        Self {
            generate: true,
            generate_with_metadata: true,
            insert_from_template: true,
            create_from_template: false,
            insert_template: false,
            create_file_from_template: false,
            show_model_from_template: true,
            create_template: false,
            generate_title: true,
            toggle_auto_suggest: false,
        }
    }
}

/// The persisted configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub frequency_penalty: f32,
    pub show_status_bar: bool,
    /// Vault-relative root the template store reads from and writes to
    pub templates_path: String,
    pub context: ContextFlags,
    pub commands: CommandToggles,
    pub auto_suggest: AutoSuggestOptions,
    pub display_errors_in_editor: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo-instruct".to_string(),
            max_tokens: 160,
            temperature: 0.7,
            frequency_penalty: 0.5,
            show_status_bar: true,
            templates_path: "notegen/templates".to_string(),
            context: ContextFlags::default(),
            commands: CommandToggles::default(),
            auto_suggest: AutoSuggestOptions::default(),
            display_errors_in_editor: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults for any
    /// missing fields. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, VaultError> {
        if !path.exists() {
            debug!("no settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| {
            VaultError::InvalidPath(format!("settings file {}: {e}", path.display()))
        })
    }

    /// Persist settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), VaultError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::InvalidPath(e.to_string()))?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Default settings file location under the user config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notegen")
            .join("settings.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.max_tokens, 160);
        assert_eq!(s.temperature, 0.7);
        assert_eq!(s.auto_suggest.number_of_suggestions, 5);
        assert_eq!(s.auto_suggest.trigger_phrase, "  ");
        assert!(s.context.include_frontmatter);
        assert!(!s.context.include_children);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let mut s = Settings::default();
        s.model = "custom-model".to_string();
        s.context.include_children = true;
        s.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Settings::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"model": "other"}"#).unwrap();
        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.model, "other");
        assert_eq!(loaded.max_tokens, 160);
    }
}
