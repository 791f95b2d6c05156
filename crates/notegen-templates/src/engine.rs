//! Strict-mode template engine with a content-hash compile cache

use std::collections::HashMap;

use handlebars::{Handlebars, RenderErrorReason};
use parking_lot::RwLock;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::TemplateError;

/// Handle to a compiled template registered with the engine. Cheap to clone;
/// the name is the hex hash of the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    name: String,
}

impl CompiledTemplate {
    /// The engine-internal registration name (source content hash).
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Compiles and renders handlebars templates in strict mode.
///
/// Strict mode is the contract: every field a template evaluates must exist
/// in the context namespace or rendering fails with
/// [`TemplateError::MissingField`]. Compilation is memoized by the exact
/// source text, keyed by its SHA-256.
pub struct TemplateEngine {
    registry: RwLock<Handlebars<'static>>,
    compiled: RwLock<HashMap<String, CompiledTemplate>>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        Self {
            registry: RwLock::new(registry),
            compiled: RwLock::new(HashMap::new()),
        }
    }

    /// Compile a template source, reusing the cached compilation when the
    /// same source text has been seen before.
    pub fn compile(&self, source: &str) -> Result<CompiledTemplate, TemplateError> {
        let name = source_hash(source);
        if let Some(cached) = self.compiled.read().get(&name) {
            return Ok(cached.clone());
        }

        let template = handlebars::Template::compile(source)
            .map_err(|e| TemplateError::Syntax(e.to_string()))?;
        self.registry.write().register_template(&name, template);

        let compiled = CompiledTemplate { name: name.clone() };
        self.compiled.write().insert(name, compiled.clone());
        debug!(template = %compiled.name, "template compiled");
        Ok(compiled)
    }

    /// Render a compiled template against a context namespace. Pure: no
    /// I/O, identical inputs give identical output.
    pub fn render(
        &self,
        compiled: &CompiledTemplate,
        context: &Value,
    ) -> Result<String, TemplateError> {
        self.registry
            .read()
            .render(&compiled.name, context)
            .map_err(map_render_error)
    }

    /// Compile-and-render in one step, the path inline `tg` blocks take.
    pub fn render_source(&self, source: &str, context: &Value) -> Result<String, TemplateError> {
        let compiled = self.compile(source)?;
        self.render(&compiled, context)
    }

    /// Number of distinct sources compiled so far.
    pub fn cached_count(&self) -> usize {
        self.compiled.read().len()
    }

    /// The context fields a template source references, in order of first
    /// appearance. Used by the show-model command to display a template's
    /// inputs.
    pub fn referenced_fields(source: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut rest = source;
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else { break };
            let inner = after[..end].trim();
            if inner.starts_with('/') {
                // closing tag
                rest = &after[end + 2..];
                continue;
            }
            let inner = inner.trim_start_matches(['#', '^']);
            let name = inner
                .split_whitespace()
                .last()
                .unwrap_or("")
                .split('.')
                .next()
                .unwrap_or("")
                .to_string();
            if !name.is_empty()
                && name != "this"
                && name != "else"
                && !fields.contains(&name)
            {
                fields.push(name);
            }
            rest = &after[end + 2..];
        }
        fields
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn source_hash(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn map_render_error(err: handlebars::RenderError) -> TemplateError {
    match err.reason() {
        RenderErrorReason::MissingVariable(path) => {
            TemplateError::MissingField(path.clone().unwrap_or_default())
        }
        _ => TemplateError::Render(err.to_string()),
    }
}
