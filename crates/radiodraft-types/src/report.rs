//! Model tiers and the externally visible pipeline result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::triage::TriageVerdict;

/// A class of upstream model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTier {
    /// Fast/cheap tier. Used for triage and low-risk findings.
    Medium,
    /// Strong/expensive tier. Used for all other findings.
    Strong,
    /// Fixed formatting tier used for report drafting.
    Format,
}

impl ModelTier {
    /// Tier label used in results, cost accounting, and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelTier::Medium => "medium",
            ModelTier::Strong => "strong",
            ModelTier::Format => "format",
        }
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only artifact a pipeline run hands back to its caller.
///
/// Serialises as a flat record:
/// `triage`, `findings`, `report`, `model_used`, `total_cost`, `processing_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// The triage verdict (real or fallback).
    pub triage: TriageVerdict,

    /// Findings text from the routed model.
    pub findings: String,

    /// Drafted report text (or the canned safety report).
    pub report: String,

    /// Tier label used for the findings stage.
    pub model_used: ModelTier,

    /// Sum of the three stage costs in USD.
    pub total_cost: f64,

    /// Wall-clock seconds from pipeline start to completion.
    pub processing_time: f64,
}
