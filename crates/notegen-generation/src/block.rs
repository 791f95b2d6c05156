//! The `tg` code-block surface
//!
//! A fenced code block tagged `tg` holds a template source inline in the
//! document. When the host renders the document it hands each block here:
//! the source is compiled and rendered against the current context, and the
//! rendered markdown comes back with two actions: dispatch it as a prompt,
//! or persist the raw source as a reusable template.

use notegen_context::ContextManager;
use notegen_core::{DocumentSnapshot, Settings, Vault};
use notegen_templates::{TemplateEngine, TemplateStore};

use crate::error::GenerationError;

/// A raw `tg` block lifted out of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TgBlock {
    pub source: String,
}

/// A block rendered against the current context, ready for its actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    /// Rendered markdown, also the prompt the generate action dispatches
    pub markdown: String,
    /// The raw template source the create-template action persists
    pub source: String,
}

impl RenderedBlock {
    /// Persist this block's source as a reusable template.
    pub fn create_template(
        &self,
        settings: &Settings,
        vault: &dyn Vault,
        name: &str,
    ) -> Result<String, GenerationError> {
        let store = TemplateStore::new(&settings.templates_path);
        Ok(store.create(vault, name, &self.source)?)
    }
}

/// Extract the `tg` fenced code blocks from a document, in order.
pub fn extract_tg_blocks(content: &str) -> Vec<TgBlock> {
    let mut blocks = Vec::new();
    let mut in_block = false;
    let mut current = Vec::new();
    for line in content.lines() {
        if in_block {
            if line.trim_end() == "```" {
                blocks.push(TgBlock {
                    source: current.join("\n"),
                });
                current.clear();
                in_block = false;
            } else {
                current.push(line);
            }
        } else if line.trim_end() == "```tg" {
            in_block = true;
        }
    }
    blocks
}

/// Compile and render a block against the current document context.
pub fn render_block(
    engine: &TemplateEngine,
    contexts: &ContextManager,
    settings: &Settings,
    vault: &dyn Vault,
    snapshot: &DocumentSnapshot,
    block: &TgBlock,
) -> Result<RenderedBlock, GenerationError> {
    let context = contexts.gather(vault, snapshot, &settings.context)?;
    let markdown = engine.render_source(&block.source, &context.to_value())?;
    Ok(RenderedBlock {
        markdown,
        source: block.source.clone(),
    })
}
