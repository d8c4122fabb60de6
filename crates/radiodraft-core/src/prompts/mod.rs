//! Prompt catalogue.
//!
//! Stages never hold prompt text themselves; they ask a [`PromptSource`]
//! for a `{system, user}` pair for a [`PromptKind`] and a
//! [`PromptContext`]. [`BuiltinPrompts`] is the catalogue shipped with the
//! crate; tests substitute their own.

mod findings;
mod report;
mod triage;

use radiodraft_types::ImageType;

/// Which stage a prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// Rapid urgency/complexity screening.
    Triage,
    /// Objective findings dictation.
    Findings,
    /// Report drafting from findings text.
    Report,
}

/// Everything a prompt template may interpolate.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    /// Study type; selects the findings template.
    pub image_type: ImageType,
    /// Projection hint, e.g. `PA` or `AP Portable`.
    pub view: Option<&'a str>,
    /// Patient age in years.
    pub patient_age: Option<u32>,
    /// Free-text clinical indication.
    pub clinical_indications: Option<&'a str>,
    /// Preliminary findings from triage, to be verified, not copied.
    pub triage_alerts: &'a [String],
    /// Findings text to be reformatted (report prompts only).
    pub findings: Option<&'a str>,
}

impl<'a> PromptContext<'a> {
    /// A context with only the study type set.
    pub fn new(image_type: ImageType) -> Self {
        Self {
            image_type,
            view: None,
            patient_age: None,
            clinical_indications: None,
            triage_alerts: &[],
            findings: None,
        }
    }
}

/// A rendered system/user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// System instruction.
    pub system: String,
    /// User instruction text (images are attached separately).
    pub user: String,
}

/// Source of prompt text for each stage.
pub trait PromptSource: Send + Sync {
    /// Render the prompt for `kind` in `ctx`.
    fn get_prompt(&self, kind: PromptKind, ctx: &PromptContext<'_>) -> Prompt;
}

/// The prompt catalogue bundled with radiodraft.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPrompts;

impl PromptSource for BuiltinPrompts {
    fn get_prompt(&self, kind: PromptKind, ctx: &PromptContext<'_>) -> Prompt {
        match kind {
            PromptKind::Triage => triage::render(ctx),
            PromptKind::Findings => findings::render(ctx),
            PromptKind::Report => report::render(ctx),
        }
    }
}
