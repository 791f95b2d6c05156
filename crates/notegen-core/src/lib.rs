//! Host-boundary types for the notegen text generation pipeline
//!
//! Everything the pipeline needs to know about its host lives here: the
//! document model (positions, snapshots), the vault abstraction over the
//! note store, the editor surface the results are applied to, persisted
//! settings, and the status/notification sink. The pipeline crates depend
//! on these traits only; hosts (and tests) supply the implementations.

pub mod document;
pub mod editor;
pub mod error;
pub mod memory;
pub mod settings;
pub mod status;
pub mod vault;

pub use document::{DocumentSnapshot, Position};
pub use editor::EditorSurface;
pub use error::{EditorError, VaultError};
pub use memory::{MemoryEditor, MemoryStatus, MemoryVault};
pub use settings::{AutoSuggestOptions, CommandToggles, ContextFlags, Settings};
pub use status::{NullStatus, StatusSink};
pub use vault::Vault;
