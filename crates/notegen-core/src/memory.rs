//! In-memory host implementations
//!
//! Back the vault, editor, and status traits with plain maps and strings.
//! These are the fixtures every downstream test drives the pipeline with,
//! and double as a headless host for embedding.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::document::{DocumentSnapshot, Position};
use crate::editor::EditorSurface;
use crate::error::{EditorError, VaultError};
use crate::status::StatusSink;
use crate::vault::Vault;

/// A vault backed by a map of path to content.
#[derive(Default)]
pub struct MemoryVault {
    docs: Mutex<BTreeMap<String, String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, overwriting any existing one.
    pub fn insert(&self, path: impl Into<String>, content: impl Into<String>) {
        self.docs.lock().insert(path.into(), content.into());
    }
}

impl Vault for MemoryVault {
    fn read(&self, path: &str) -> Result<String, VaultError> {
        self.docs
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(path.to_string()))
    }

    fn write(&self, path: &str, content: &str) -> Result<(), VaultError> {
        self.docs.lock().insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn create(&self, path: &str, content: &str) -> Result<(), VaultError> {
        let mut docs = self.docs.lock();
        if docs.contains_key(path) {
            return Err(VaultError::AlreadyExists(path.to_string()));
        }
        docs.insert(path.to_string(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.docs.lock().contains_key(path)
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), VaultError> {
        let mut docs = self.docs.lock();
        let content = docs
            .remove(from)
            .ok_or_else(|| VaultError::NotFound(from.to_string()))?;
        docs.insert(to.to_string(), content);
        Ok(())
    }

    fn list(&self) -> Vec<String> {
        self.docs.lock().keys().cloned().collect()
    }
}

/// An editor over a single in-memory document.
pub struct MemoryEditor {
    state: Mutex<DocumentSnapshot>,
}

impl MemoryEditor {
    pub fn new(snapshot: DocumentSnapshot) -> Self {
        Self {
            state: Mutex::new(snapshot),
        }
    }

    /// Current document text.
    pub fn content(&self) -> String {
        self.state.lock().content.clone()
    }

    /// Replace the document wholesale, simulating an edit made while a
    /// request was outstanding.
    pub fn set_content(&self, content: impl Into<String>, cursor: Position) {
        let mut state = self.state.lock();
        state.content = content.into();
        state.cursor = cursor;
        state.selection = None;
    }
}

impl EditorSurface for MemoryEditor {
    fn snapshot(&self) -> DocumentSnapshot {
        self.state.lock().clone()
    }

    fn insert_at(&self, pos: Position, text: &str) -> Result<(), EditorError> {
        let mut state = self.state.lock();
        if !state.is_valid_position(pos) {
            return Err(EditorError::InvalidPosition(pos));
        }
        let mut lines: Vec<String> = state.content.lines().map(str::to_string).collect();
        if pos.line == lines.len() {
            lines.push(String::new());
        }
        let line = &mut lines[pos.line];
        let byte = line
            .char_indices()
            .nth(pos.ch)
            .map(|(i, _)| i)
            .unwrap_or(line.len());
        line.insert_str(byte, text);
        state.content = lines.join("\n");
        Ok(())
    }

    fn replace_selection(&self, text: &str) -> Result<(), EditorError> {
        let mut state = self.state.lock();
        let selection = state.selection.clone().ok_or(EditorError::NoSelection)?;
        if let Some(start) = state.content.find(&selection) {
            state
                .content
                .replace_range(start..start + selection.len(), text);
        }
        state.selection = None;
        Ok(())
    }

    fn set_cursor(&self, pos: Position) {
        self.state.lock().cursor = pos;
    }
}

/// A status sink that records everything it is told.
#[derive(Default)]
pub struct MemoryStatus {
    statuses: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl MemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_status(&self) -> Option<String> {
        self.statuses.lock().last().cloned()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().clone()
    }
}

impl StatusSink for MemoryStatus {
    fn set_status(&self, text: &str) {
        self.statuses.lock().push(text.to_string());
    }

    fn notify(&self, message: &str) {
        self.notices.lock().push(message.to_string());
    }
}
