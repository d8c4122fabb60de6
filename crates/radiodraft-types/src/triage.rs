//! Triage verdict types.
//!
//! A [`TriageVerdict`] is produced once per study by the triage stage and
//! is read-only afterwards: the model selector routes on it, the findings
//! prompt folds its preliminary findings in as alerts, and the final
//! result carries it back to the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How soon a radiologist needs to look at the study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Needs immediate attention.
    Urgent,
    /// Abnormal but not immediately life-threatening.
    Routine,
    /// No acute abnormality seen.
    Normal,
}

impl Urgency {
    /// All variants, in declaration order.
    pub const ALL: [Urgency; 3] = [Urgency::Urgent, Urgency::Routine, Urgency::Normal];

    /// Wire name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::Urgent => "urgent",
            Urgency::Routine => "routine",
            Urgency::Normal => "normal",
        }
    }
}

/// How hard the study is to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Single clear finding (or clearly normal) on a good image.
    Simple,
    /// Multiple or subtle findings, or a poor image.
    Complex,
}

impl Complexity {
    /// All variants, in declaration order.
    pub const ALL: [Complexity; 2] = [Complexity::Simple, Complexity::Complex];

    /// Wire name of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Complex => "complex",
        }
    }
}

/// Returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

// Models are not consistent about casing, so parsing is case-insensitive.
impl FromStr for Urgency {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Urgency::Urgent),
            "routine" => Ok(Urgency::Routine),
            "normal" => Ok(Urgency::Normal),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl FromStr for Complexity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "complex" => Ok(Complexity::Complex),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured result of the triage stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageVerdict {
    /// Urgency category.
    pub urgency: Urgency,

    /// Complexity category.
    pub complexity: Complexity,

    /// Model confidence in `[0.0, 1.0]`.
    pub confidence: f64,

    /// Short alerts, in the order the model listed them.
    pub preliminary_findings: Vec<String>,

    /// Free-text justification.
    pub reasoning: String,

    /// Image quality problems, if the model reported any.
    #[serde(default)]
    pub quality_issues: Option<String>,

    /// Suggested next step, if the model gave one.
    #[serde(default)]
    pub recommended_action: Option<String>,

    /// Estimated cost of the triage call in USD.
    pub cost: f64,
}

impl TriageVerdict {
    /// The conservative verdict used whenever triage cannot produce a real
    /// one: urgent, complex, flagged for immediate review.
    pub fn conservative(
        confidence: f64,
        finding: impl Into<String>,
        reasoning: impl Into<String>,
        cost: f64,
    ) -> Self {
        Self {
            urgency: Urgency::Urgent,
            complexity: Complexity::Complex,
            confidence,
            preliminary_findings: vec![finding.into()],
            reasoning: reasoning.into(),
            quality_issues: Some("Unknown".into()),
            recommended_action: Some("immediate radiologist review".into()),
            cost,
        }
    }
}
