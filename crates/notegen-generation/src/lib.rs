//! Generation orchestration
//!
//! Composes context gathering, template rendering, and completion dispatch
//! into the pipeline behind every generate command: capture a snapshot,
//! build the prompt, take the single-flight guard, call the completion
//! service, route the result back into the document, and release the guard
//! on every path. Also home to the auto-suggest variant, the error
//! presenter, the `tg` code-block surface, and the command dispatch table.

pub mod auto_suggest;
pub mod block;
pub mod commands;
pub mod error;
pub mod guard;
pub mod orchestrator;
pub mod presenter;

pub use auto_suggest::{AutoSuggestEngine, Suggestion};
pub use block::{extract_tg_blocks, render_block, RenderedBlock, TgBlock};
pub use commands::{dispatch, Command, CommandOutcome};
pub use error::GenerationError;
pub use guard::{ConcurrencyGuard, GuardSlot};
pub use orchestrator::{GenerationOrchestrator, OutputTarget, PromptMode};
pub use presenter::ErrorPresenter;
