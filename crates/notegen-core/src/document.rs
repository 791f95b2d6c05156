//! Document model: positions, selections, and point-in-time snapshots
//!
//! A generation request never works against a live document. It takes a
//! `DocumentSnapshot` synchronously, before the first suspension point, and
//! everything downstream (context gathering, rendering, dispatch) reads from
//! that capture. Concurrent edits cannot corrupt an in-flight request; they
//! can only invalidate the position the result would be applied at.

use serde::{Deserialize, Serialize};

/// A cursor position, zero-based line and character offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// An owned capture of the active document at dispatch time.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    /// Vault-relative path of the document
    pub path: String,
    /// Full document text
    pub content: String,
    /// Selected text, if a selection was active
    pub selection: Option<String>,
    /// Cursor position at capture time
    pub cursor: Position,
}

impl DocumentSnapshot {
    pub fn new(path: impl Into<String>, content: impl Into<String>, cursor: Position) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            selection: None,
            cursor,
        }
    }

    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }

    /// Document title derived from the path: file stem without extension.
    pub fn title(&self) -> &str {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        name.strip_suffix(".md").unwrap_or(name)
    }

    /// Whether `pos` still denotes a point inside this text. A position is
    /// valid when its line exists and the character offset does not pass the
    /// end of that line.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        match self.content.lines().nth(pos.line) {
            Some(line) => pos.ch <= line.chars().count(),
            // One-past-the-last-line with ch 0 is where an empty trailing
            // line puts the cursor.
            None => pos.line == self.content.lines().count() && pos.ch == 0,
        }
    }

    /// Text strictly before the cursor, used by auto-suggest triggering.
    pub fn text_before_cursor(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.content.lines().enumerate() {
            if i < self.cursor.line {
                out.push_str(line);
                out.push('\n');
            } else if i == self.cursor.line {
                out.extend(line.chars().take(self.cursor.ch));
                break;
            }
        }
        out
    }

    /// The selection if one is active, otherwise the whole content. This is
    /// what raw-prompt generation sends.
    pub fn selection_or_content(&self) -> &str {
        match &self.selection {
            Some(sel) if !sel.is_empty() => sel,
            _ => &self.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(content: &str, line: usize, ch: usize) -> DocumentSnapshot {
        DocumentSnapshot::new("notes/test.md", content, Position::new(line, ch))
    }

    #[test]
    fn test_title_strips_directory_and_extension() {
        let s = snap("hello", 0, 0);
        assert_eq!(s.title(), "test");
    }

    #[test]
    fn test_valid_position_within_line() {
        let s = snap("abc\ndef", 0, 0);
        assert!(s.is_valid_position(Position::new(1, 3)));
        assert!(!s.is_valid_position(Position::new(1, 4)));
        assert!(!s.is_valid_position(Position::new(3, 0)));
    }

    #[test]
    fn test_text_before_cursor_mid_line() {
        let s = snap("first\nsecond", 1, 3);
        assert_eq!(s.text_before_cursor(), "first\nsec");
    }

    #[test]
    fn test_selection_or_content_prefers_selection() {
        let s = snap("whole doc", 0, 0).with_selection("part");
        assert_eq!(s.selection_or_content(), "part");
    }

    #[test]
    fn test_empty_selection_falls_back_to_content() {
        let s = snap("whole doc", 0, 0).with_selection("");
        assert_eq!(s.selection_or_content(), "whole doc");
    }
}
