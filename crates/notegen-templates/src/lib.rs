//! Template compilation and storage
//!
//! Templates are handlebars sources rendered in strict mode: a template
//! that references a context field absent from the namespace fails loudly
//! instead of emitting blank text. Compiled templates are cached by a hash
//! of the source text, so re-rendering an unchanged inline block never
//! re-parses it.

pub mod engine;
pub mod error;
pub mod store;

pub use engine::{CompiledTemplate, TemplateEngine};
pub use error::TemplateError;
pub use store::{Template, TemplateMetadata, TemplateStore};
