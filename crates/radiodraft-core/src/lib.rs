//! # radiodraft-core
//!
//! Orchestration core for radiodraft.
//!
//! Turns one radiograph into a triage verdict, a findings dictation and a
//! drafted report, choosing the findings model from the triage result and
//! accounting a fixed cost per stage.
//!
//! - **[`payload`]** -- two-step parser for the triage model's JSON answer
//! - **[`prompts`]** -- [`PromptSource`] and the [`BuiltinPrompts`] catalogue
//! - **[`pipeline`]** -- the stages, [`ModelSelector`], and
//!   [`PipelineOrchestrator`]

pub mod payload;
pub mod pipeline;
pub mod prompts;

pub use pipeline::{
    BuildError, FindingsError, ModelChoice, ModelInvoker, ModelSelector, PipelineError,
    PipelineOrchestrator, build_live_pipeline,
};
pub use prompts::{BuiltinPrompts, Prompt, PromptContext, PromptKind, PromptSource};
