//! The structured context a template renders against
//!
//! `TemplateContext` is owned by the generation request that gathered it.
//! Each optional field tracks whether its fragment was requested: `None`
//! means the flag was off, `Some(vec![])` means requested but nothing was
//! found in the document.

use serde::Serialize;
use serde_json::{json, Map, Value};

/// A heading with the text running until the next heading of any level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub body: String,
}

/// A linked document pulled in as a child, content bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildDoc {
    pub path: String,
    pub content: String,
}

/// A paragraph in another document that links to the active one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mention {
    pub source_path: String,
    pub paragraph: String,
}

/// The context namespace for one generation request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    pub title: Option<String>,
    pub stared_blocks: Option<Vec<String>>,
    /// Frontmatter flattened for rendering: scalars as strings, sequences
    /// comma-joined
    pub frontmatter: Option<Map<String, Value>>,
    pub headings: Option<Vec<Heading>>,
    pub children: Option<Vec<ChildDoc>>,
    pub mentions: Option<Vec<Mention>>,
    pub highlights: Option<Vec<String>>,
    /// Full text of the active document
    pub content: String,
    /// Selected text, when a selection was active at capture time
    pub selection: Option<String>,
}

impl TemplateContext {
    /// Build the JSON namespace handed to the template engine. Fields whose
    /// flag was disabled are absent from the namespace, so a strict-mode
    /// template referencing them fails instead of rendering blank.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("content".into(), json!(self.content));
        map.insert(
            "context".into(),
            json!(self.selection.as_deref().unwrap_or(&self.content)),
        );
        if let Some(selection) = &self.selection {
            map.insert("selection".into(), json!(selection));
        }
        if let Some(title) = &self.title {
            map.insert("title".into(), json!(title));
        }
        if let Some(blocks) = &self.stared_blocks {
            map.insert("staredBlocks".into(), json!(blocks));
        }
        if let Some(frontmatter) = &self.frontmatter {
            map.insert("frontmatter".into(), Value::Object(frontmatter.clone()));
        }
        if let Some(headings) = &self.headings {
            map.insert("headings".into(), json!(headings));
        }
        if let Some(children) = &self.children {
            map.insert("children".into(), json!(children));
        }
        if let Some(mentions) = &self.mentions {
            map.insert("mentions".into(), json!(mentions));
        }
        if let Some(highlights) = &self.highlights {
            map.insert("highlights".into(), json!(highlights));
        }
        Value::Object(map)
    }
}

/// Flatten a parsed YAML value into the string-oriented form templates
/// expect: scalars become their string form, sequences join with commas,
/// mappings recurse.
pub fn flatten_yaml(value: &serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::String(String::new()),
        serde_yaml::Value::Bool(b) => Value::String(b.to_string()),
        serde_yaml::Value::Number(n) => Value::String(n.to_string()),
        serde_yaml::Value::String(s) => Value::String(s.clone()),
        serde_yaml::Value::Sequence(seq) => {
            let parts: Vec<String> = seq
                .iter()
                .map(|v| match flatten_yaml(v) {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect();
            Value::String(parts.join(","))
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (k, v) in mapping {
                if let serde_yaml::Value::String(key) = k {
                    map.insert(key.clone(), flatten_yaml(v));
                }
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => flatten_yaml(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_fields_absent_from_namespace() {
        let ctx = TemplateContext {
            content: "body".into(),
            ..Default::default()
        };
        let value = ctx.to_value();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("content"));
        assert!(!obj.contains_key("frontmatter"));
        assert!(!obj.contains_key("headings"));
    }

    #[test]
    fn test_requested_but_empty_is_present() {
        let ctx = TemplateContext {
            highlights: Some(vec![]),
            ..Default::default()
        };
        let value = ctx.to_value();
        assert_eq!(value["highlights"], json!([]));
    }

    #[test]
    fn test_flatten_yaml_sequence_joins_with_commas() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("tags: [a, b]").unwrap();
        let flat = flatten_yaml(&yaml);
        assert_eq!(flat["tags"], json!("a,b"));
    }

    #[test]
    fn test_flatten_yaml_scalars_become_strings() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("count: 3\ndone: true").unwrap();
        let flat = flatten_yaml(&yaml);
        assert_eq!(flat["count"], json!("3"));
        assert_eq!(flat["done"], json!("true"));
    }
}
