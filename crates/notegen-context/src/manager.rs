//! Context manager
//!
//! One gather walks the active snapshot (and the vault, for link-graph
//! fragments) and fills exactly the fields whose flags are enabled. The
//! gather is read-only and deterministic for a fixed snapshot and flag set.

use notegen_core::{ContextFlags, DocumentSnapshot, Vault};
use serde_json::Value;
use tracing::{debug, warn};

use crate::context::{flatten_yaml, ChildDoc, Mention, TemplateContext};
use crate::error::ContextError;
use crate::markdown;

/// Linked documents are truncated to this many characters before inclusion
/// so one fat note cannot blow up the prompt.
const MAX_CHILD_CONTENT_LEN: usize = 4000;

/// Assembles a `TemplateContext` from a document snapshot and its vault
/// neighborhood.
pub struct ContextManager {
    max_child_content_len: usize,
}

impl ContextManager {
    pub fn new() -> Self {
        Self {
            max_child_content_len: MAX_CHILD_CONTENT_LEN,
        }
    }

    /// Override the child-content bound, mainly for tests.
    pub fn with_child_content_limit(limit: usize) -> Self {
        Self {
            max_child_content_len: limit,
        }
    }

    /// Gather the context fragments enabled in `flags`.
    ///
    /// A linked document that cannot be read is logged and skipped; only a
    /// malformed active document aborts the gather.
    pub fn gather(
        &self,
        vault: &dyn Vault,
        snapshot: &DocumentSnapshot,
        flags: &ContextFlags,
    ) -> Result<TemplateContext, ContextError> {
        let (frontmatter_src, body) = markdown::split_frontmatter(&snapshot.content);

        let mut ctx = TemplateContext {
            content: snapshot.content.clone(),
            selection: snapshot.selection.clone(),
            ..Default::default()
        };

        if flags.include_title {
            ctx.title = Some(snapshot.title().to_string());
        }

        if flags.include_frontmatter {
            ctx.frontmatter = Some(match frontmatter_src {
                Some(src) => {
                    let yaml: serde_yaml::Value = serde_yaml::from_str(src)?;
                    match flatten_yaml(&yaml) {
                        Value::Object(map) => map,
                        _ => Default::default(),
                    }
                }
                None => Default::default(),
            });
        }

        if flags.include_stared_blocks {
            ctx.stared_blocks = Some(markdown::scan_starred_blocks(body));
        }

        if flags.include_headings {
            ctx.headings = Some(markdown::scan_headings(body));
        }

        if flags.include_highlights {
            ctx.highlights = Some(markdown::scan_highlights(body));
        }

        if flags.include_children {
            ctx.children = Some(self.gather_children(vault, body));
        }

        if flags.include_mentions {
            ctx.mentions = Some(self.gather_mentions(vault, snapshot));
        }

        debug!(path = %snapshot.path, "context gathered");
        Ok(ctx)
    }

    /// Documents referenced by outbound wiki links, content bounded.
    fn gather_children(&self, vault: &dyn Vault, body: &str) -> Vec<ChildDoc> {
        let mut children = Vec::new();
        for target in markdown::scan_wiki_links(body) {
            let Some(path) = vault.resolve_link(&target) else {
                warn!(%target, "linked document not found, skipping");
                continue;
            };
            match vault.read(&path) {
                Ok(content) => {
                    let content = if content.chars().count() > self.max_child_content_len {
                        content.chars().take(self.max_child_content_len).collect()
                    } else {
                        content
                    };
                    children.push(ChildDoc { path, content });
                }
                Err(e) => warn!(%path, error = %e, "failed to read linked document, skipping"),
            }
        }
        children
    }

    /// Paragraphs in other documents that link back to the active one. Only
    /// the linking paragraph is included, not the whole document.
    fn gather_mentions(&self, vault: &dyn Vault, snapshot: &DocumentSnapshot) -> Vec<Mention> {
        let title = snapshot.title();
        let needle = format!("[[{title}");
        let mut mentions = Vec::new();
        for path in vault.list() {
            if path == snapshot.path {
                continue;
            }
            let content = match vault.read(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(%path, error = %e, "failed to read document for mention scan");
                    continue;
                }
            };
            if let Some(paragraph) = markdown::paragraph_containing(&content, &needle) {
                mentions.push(Mention {
                    source_path: path,
                    paragraph,
                });
            }
        }
        mentions
    }
}

impl Default for ContextManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notegen_core::{MemoryVault, Position};
    use serde_json::json;

    fn snapshot(content: &str) -> DocumentSnapshot {
        DocumentSnapshot::new("notes/Active.md", content, Position::new(0, 0))
    }

    #[test]
    fn test_gather_with_no_flags_only_captures_content() {
        let vault = MemoryVault::new();
        let ctx = ContextManager::new()
            .gather(&vault, &snapshot("plain text"), &ContextFlags::none())
            .unwrap();
        assert_eq!(ctx.content, "plain text");
        assert!(ctx.frontmatter.is_none());
        assert!(ctx.headings.is_none());
        assert!(ctx.highlights.is_none());
        assert!(ctx.stared_blocks.is_none());
        assert!(ctx.children.is_none());
        assert!(ctx.mentions.is_none());
        assert!(ctx.title.is_none());
    }

    #[test]
    fn test_gather_frontmatter_flattens_sequences() {
        let vault = MemoryVault::new();
        let mut flags = ContextFlags::none();
        flags.include_frontmatter = true;
        let ctx = ContextManager::new()
            .gather(
                &vault,
                &snapshot("---\ntags: [a, b]\n---\nbody"),
                &flags,
            )
            .unwrap();
        let fm = ctx.frontmatter.unwrap();
        assert_eq!(fm["tags"], json!("a,b"));
    }

    #[test]
    fn test_gather_malformed_frontmatter_is_fatal() {
        let vault = MemoryVault::new();
        let mut flags = ContextFlags::none();
        flags.include_frontmatter = true;
        let result = ContextManager::new().gather(
            &vault,
            &snapshot("---\n: [unbalanced\n---\nbody"),
            &flags,
        );
        assert!(matches!(result, Err(ContextError::Frontmatter(_))));
    }

    #[test]
    fn test_gather_children_reads_and_truncates() {
        let vault = MemoryVault::new();
        vault.insert("Child.md", "0123456789");
        let mut flags = ContextFlags::none();
        flags.include_children = true;
        let ctx = ContextManager::with_child_content_limit(4)
            .gather(&vault, &snapshot("see [[Child]]"), &flags)
            .unwrap();
        let children = ctx.children.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].content, "0123");
    }

    #[test]
    fn test_gather_missing_child_is_skipped_not_fatal() {
        let vault = MemoryVault::new();
        vault.insert("Present.md", "here");
        let mut flags = ContextFlags::none();
        flags.include_children = true;
        let ctx = ContextManager::new()
            .gather(&vault, &snapshot("[[Missing]] and [[Present]]"), &flags)
            .unwrap();
        let children = ctx.children.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].path, "Present.md");
    }

    #[test]
    fn test_gather_mentions_extracts_linking_paragraph() {
        let vault = MemoryVault::new();
        vault.insert(
            "Other.md",
            "irrelevant intro\n\nthis one points to [[Active]] here\n\ntrailer",
        );
        vault.insert("Unrelated.md", "nothing to see");
        let mut flags = ContextFlags::none();
        flags.include_mentions = true;
        let ctx = ContextManager::new()
            .gather(&vault, &snapshot("body"), &flags)
            .unwrap();
        let mentions = ctx.mentions.unwrap();
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].source_path, "Other.md");
        assert_eq!(mentions[0].paragraph, "this one points to [[Active]] here");
    }

    #[test]
    fn test_gather_is_deterministic() {
        let vault = MemoryVault::new();
        vault.insert("Child.md", "linked");
        let snap = snapshot("---\na: 1\n---\n# H\n==hl== [[Child]]");
        let flags = ContextFlags::default();
        let mgr = ContextManager::new();
        let first = mgr.gather(&vault, &snap, &flags).unwrap();
        let second = mgr.gather(&vault, &snap, &flags).unwrap();
        assert_eq!(first, second);
    }
}
