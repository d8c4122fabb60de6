//! Triage-driven model routing.
//!
//! The one routing decision in the pipeline: a study goes to the medium
//! tier only when triage is confident that it is a simple normal film.
//! Everything else, including every fallback verdict, goes to the strong
//! tier.

use tracing::debug;

use radiodraft_types::config::{CostSettings, RoutingSettings};
use radiodraft_types::{Complexity, ModelTier, TriageVerdict, Urgency};

/// The tier chosen for the findings stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelChoice {
    /// Tier that will generate findings.
    pub tier: ModelTier,
    /// Fixed cost estimate for a findings call on this tier.
    pub cost: f64,
}

impl ModelChoice {
    /// Label used in results and logs.
    pub fn label(&self) -> &'static str {
        self.tier.as_str()
    }
}

/// Maps a triage verdict to a findings tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSelector {
    confidence_threshold: f64,
    medium_cost: f64,
    strong_cost: f64,
}

impl ModelSelector {
    /// Build a selector with an explicit threshold and per-tier costs.
    pub fn new(confidence_threshold: f64, medium_cost: f64, strong_cost: f64) -> Self {
        Self {
            confidence_threshold,
            medium_cost,
            strong_cost,
        }
    }

    /// Build a selector from the routing and cost settings sections.
    pub fn from_settings(routing: &RoutingSettings, costs: &CostSettings) -> Self {
        Self::new(routing.confidence_threshold, costs.medium, costs.strong)
    }

    /// The configured confidence threshold.
    pub fn threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Choose the findings tier for `verdict`.
    ///
    /// Medium iff `confidence >= threshold` and the study is simple and
    /// normal; strong otherwise. Total and deterministic.
    pub fn select(&self, verdict: &TriageVerdict) -> ModelChoice {
        let eligible = verdict.confidence >= self.confidence_threshold
            && verdict.complexity == Complexity::Simple
            && verdict.urgency == Urgency::Normal;

        let choice = if eligible {
            ModelChoice {
                tier: ModelTier::Medium,
                cost: self.medium_cost,
            }
        } else {
            ModelChoice {
                tier: ModelTier::Strong,
                cost: self.strong_cost,
            }
        };

        debug!(
            tier = %choice.tier,
            urgency = %verdict.urgency,
            complexity = %verdict.complexity,
            confidence = verdict.confidence,
            threshold = self.confidence_threshold,
            "findings tier selected"
        );
        choice
    }
}
