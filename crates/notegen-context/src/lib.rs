//! Context gathering for template rendering
//!
//! Walks a document snapshot (and, when asked, its linked neighbors in the
//! vault) and materializes the structured context a template renders
//! against. Which fragments are collected is driven entirely by the
//! configured context flags; a disabled fragment is absent from the
//! context, not empty.

pub mod context;
pub mod error;
pub mod manager;
pub mod markdown;

pub use context::{ChildDoc, Heading, Mention, TemplateContext};
pub use error::ContextError;
pub use manager::ContextManager;
