//! Template store
//!
//! Reusable templates are markdown files beneath a configured root inside
//! the vault. A template file may open with YAML frontmatter carrying
//! metadata (display name, output path for new-file generation); the rest
//! of the file is the handlebars source.

use notegen_core::{Vault, VaultError};
use serde::Deserialize;
use tracing::debug;

use crate::error::TemplateError;

/// Metadata a template file may declare in its frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateMetadata {
    /// Display name; file stem when absent
    pub name: Option<String>,
    /// Vault path pattern for new-file generation
    pub output: Option<String>,
    pub description: Option<String>,
}

/// A loaded, not-yet-compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Vault-relative path the template was loaded from
    pub path: String,
    /// File stem, used as the fallback display name
    pub stem: String,
    /// Handlebars source (frontmatter stripped)
    pub source: String,
    pub metadata: TemplateMetadata,
}

impl Template {
    pub fn display_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or(&self.stem)
    }
}

/// Loads and persists templates beneath the configured templates root.
pub struct TemplateStore {
    root: String,
}

impl TemplateStore {
    pub fn new(root: impl Into<String>) -> Self {
        let mut root = root.into();
        while root.ends_with('/') {
            root.pop();
        }
        Self { root }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Load a template by path relative to the templates root. The `.md`
    /// extension may be omitted.
    pub fn load(&self, vault: &dyn Vault, rel_path: &str) -> Result<Template, TemplateError> {
        let path = self.full_path(rel_path);
        let raw = match vault.read(&path) {
            Ok(raw) => raw,
            Err(VaultError::NotFound(_)) => return Err(TemplateError::NotFound(path)),
            Err(e) => return Err(e.into()),
        };

        let (metadata, source) = parse_template_file(&raw)?;
        let stem = template_stem(&path);
        debug!(%path, "template loaded");
        Ok(Template {
            path,
            stem,
            source: source.to_string(),
            metadata,
        })
    }

    /// Persist a new reusable template (the "create template" action).
    /// Fails if a template with that name already exists.
    pub fn create(
        &self,
        vault: &dyn Vault,
        name: &str,
        source: &str,
    ) -> Result<String, TemplateError> {
        let path = self.full_path(name);
        vault.create(&path, source)?;
        debug!(%path, "template created");
        Ok(path)
    }

    /// Paths of all templates beneath the root.
    pub fn list(&self, vault: &dyn Vault) -> Vec<String> {
        let prefix = format!("{}/", self.root);
        vault
            .list()
            .into_iter()
            .filter(|p| p.starts_with(&prefix) && p.ends_with(".md"))
            .collect()
    }

    fn full_path(&self, rel_path: &str) -> String {
        let rel = rel_path.trim_start_matches('/');
        if rel.ends_with(".md") {
            format!("{}/{}", self.root, rel)
        } else {
            format!("{}/{}.md", self.root, rel)
        }
    }
}

/// Split a template file into parsed metadata and handlebars source.
fn parse_template_file(raw: &str) -> Result<(TemplateMetadata, &str), TemplateError> {
    let Some(rest) = raw.strip_prefix("---\n") else {
        return Ok((TemplateMetadata::default(), raw));
    };
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches('\n') == "---" {
            let metadata = serde_yaml::from_str(&rest[..offset])?;
            return Ok((metadata, &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    // Unclosed fence is treated as plain source
    Ok((TemplateMetadata::default(), raw))
}

fn template_stem(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.strip_suffix(".md").unwrap_or(name).to_string()
}
