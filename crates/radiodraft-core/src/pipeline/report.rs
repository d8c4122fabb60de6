//! Stage 3: report drafting.
//!
//! Always runs on the format tier, whatever triage decided. Failures never
//! leave this stage: the caller gets the canned safety report instead, with
//! the drafting cost still attached.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use radiodraft_llm::{ChatMessage, ProviderError};
use radiodraft_types::{ImageType, ModelTier, TriageVerdict};

use super::traits::ModelInvoker;
use crate::prompts::{PromptContext, PromptKind, PromptSource};

/// Report text substituted when drafting fails.
pub const FALLBACK_REPORT: &str = "EXAMINATION:\n\
Unable to generate report\n\
\n\
IMPRESSION:\n\
Automated report generation failed. Immediate radiologist review advised.";

/// Output of the drafting stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResult {
    /// Drafted report, or [`FALLBACK_REPORT`].
    pub report: String,
    /// The triage verdict, carried through.
    pub triage: TriageVerdict,
    /// Drafting cost; attributed on success and failure alike.
    pub cost: f64,
}

/// Why drafting fell back.
#[derive(Error, Debug)]
pub enum DraftFailure {
    /// The upstream call failed.
    #[error("report drafting failed: {0}")]
    Upstream(#[from] ProviderError),

    /// The model answered with nothing.
    #[error("report drafting returned an empty response")]
    EmptyResponse,
}

/// How the drafting stage ended.
#[derive(Debug)]
pub enum ReportOutcome {
    /// The model produced a report.
    Drafted(ReportResult),
    /// The canned safety report was substituted.
    Fallback {
        /// Result carrying [`FALLBACK_REPORT`].
        result: ReportResult,
        /// What went wrong.
        error: DraftFailure,
    },
}

impl ReportOutcome {
    /// The report result, drafted or canned.
    pub fn result(&self) -> &ReportResult {
        match self {
            ReportOutcome::Drafted(r) => r,
            ReportOutcome::Fallback { result, .. } => result,
        }
    }

    /// Consume the outcome and keep the result.
    pub fn into_result(self) -> ReportResult {
        match self {
            ReportOutcome::Drafted(r) => r,
            ReportOutcome::Fallback { result, .. } => result,
        }
    }

    /// Returns `true` if the canned report was used.
    pub fn is_fallback(&self) -> bool {
        matches!(self, ReportOutcome::Fallback { .. })
    }
}

/// Reformats findings into the standard report skeleton.
pub struct ReportDrafter {
    invoker: Arc<dyn ModelInvoker>,
    prompts: Arc<dyn PromptSource>,
    cost: f64,
}

impl ReportDrafter {
    /// `cost` is attributed to every drafting call, successful or not.
    pub fn new(invoker: Arc<dyn ModelInvoker>, prompts: Arc<dyn PromptSource>, cost: f64) -> Self {
        Self {
            invoker,
            prompts,
            cost,
        }
    }

    /// Draft a report from `findings`.
    pub async fn draft_report(
        &self,
        findings: &str,
        image_type: ImageType,
        verdict: &TriageVerdict,
    ) -> ReportOutcome {
        let mut ctx = PromptContext::new(image_type);
        ctx.findings = Some(findings);
        let prompt = self.prompts.get_prompt(PromptKind::Report, &ctx);
        let messages = vec![
            ChatMessage::system(prompt.system),
            ChatMessage::user(prompt.user),
        ];

        let drafted = match self.invoker.invoke(ModelTier::Format, messages).await {
            Ok(text) if text.trim().is_empty() => Err(DraftFailure::EmptyResponse),
            Ok(text) => Ok(text.trim().to_string()),
            Err(e) => Err(DraftFailure::Upstream(e)),
        };

        match drafted {
            Ok(report) => {
                info!(cost = self.cost, chars = report.len(), "report drafted");
                ReportOutcome::Drafted(ReportResult {
                    report,
                    triage: verdict.clone(),
                    cost: self.cost,
                })
            }
            Err(error) => {
                warn!(error = %error, "report drafting failed, using safety report");
                ReportOutcome::Fallback {
                    result: ReportResult {
                        report: FALLBACK_REPORT.to_string(),
                        triage: verdict.clone(),
                        cost: self.cost,
                    },
                    error,
                }
            }
        }
    }
}
