//! Vault abstraction over the note store
//!
//! The pipeline never touches the filesystem directly; it goes through this
//! trait so hosts can back it with a real directory, an editor workspace, or
//! the in-memory implementation used in tests.

use crate::error::VaultError;

/// Read/write access to a store of markdown documents keyed by
/// vault-relative path.
pub trait Vault: Send + Sync {
    /// Read the full text of a document.
    fn read(&self, path: &str) -> Result<String, VaultError>;

    /// Overwrite (or create) a document.
    fn write(&self, path: &str, content: &str) -> Result<(), VaultError>;

    /// Create a new document, failing if the path already exists.
    fn create(&self, path: &str, content: &str) -> Result<(), VaultError>;

    /// Whether a document exists at the path.
    fn exists(&self, path: &str) -> bool;

    /// Rename a document.
    fn rename(&self, from: &str, to: &str) -> Result<(), VaultError>;

    /// All document paths in the vault. Backlink scans iterate this.
    fn list(&self) -> Vec<String>;

    /// Resolve a wiki-link target to a vault path, if the target exists.
    ///
    /// `[[Note]]` resolves to the first document whose file stem matches
    /// `Note`, with an exact path match (with or without `.md`) taking
    /// precedence.
    fn resolve_link(&self, target: &str) -> Option<String> {
        let with_md = format!("{target}.md");
        if self.exists(target) {
            return Some(target.to_string());
        }
        if self.exists(&with_md) {
            return Some(with_md);
        }
        self.list().into_iter().find(|p| {
            let name = p.rsplit('/').next().unwrap_or(p);
            name == with_md || name.strip_suffix(".md") == Some(target)
        })
    }
}
