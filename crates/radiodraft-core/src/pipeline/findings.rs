//! Stage 2: findings dictation.
//!
//! This is the only stage without a safe fallback: a report cannot be
//! drafted from nothing, so every failure is returned to the orchestrator
//! as a [`FindingsError`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};

use radiodraft_llm::{ChatMessage, ProviderError};
use radiodraft_types::{ModelTier, StudyRequest, TriageVerdict};

use super::selector::ModelChoice;
use super::traits::ModelInvoker;
use crate::prompts::{PromptContext, PromptKind, PromptSource};

/// Output of the findings stage.
#[derive(Debug, Clone, PartialEq)]
pub struct FindingsResult {
    /// Findings text, passed verbatim to report drafting.
    pub findings: String,
    /// Tier that produced the findings.
    pub model_used: ModelTier,
    /// Fixed cost estimate for that tier.
    pub cost: f64,
    /// The verdict that drove routing and the prompt's alerts.
    pub triage: TriageVerdict,
}

/// Why findings could not be produced.
#[derive(Error, Debug)]
pub enum FindingsError {
    /// The upstream call failed.
    #[error("findings generation on {tier} tier failed: {source}")]
    Upstream {
        /// Tier that was called.
        tier: ModelTier,
        /// Transport error.
        #[source]
        source: ProviderError,
    },

    /// The model answered with nothing.
    #[error("findings generation on {tier} tier returned an empty response")]
    EmptyResponse {
        /// Tier that was called.
        tier: ModelTier,
    },
}

/// Produces findings text on the tier chosen by the selector.
pub struct FindingsGenerator {
    invoker: Arc<dyn ModelInvoker>,
    prompts: Arc<dyn PromptSource>,
}

impl FindingsGenerator {
    /// Create a generator.
    pub fn new(invoker: Arc<dyn ModelInvoker>, prompts: Arc<dyn PromptSource>) -> Self {
        Self { invoker, prompts }
    }

    /// Generate findings for `study` on `choice.tier`.
    ///
    /// The verdict's preliminary findings are folded into the prompt as
    /// alerts to verify.
    pub async fn generate_findings(
        &self,
        study: &StudyRequest,
        verdict: &TriageVerdict,
        choice: &ModelChoice,
    ) -> Result<FindingsResult, FindingsError> {
        let ctx = PromptContext {
            image_type: study.image_type,
            view: study.view.as_deref(),
            patient_age: study.patient_age,
            clinical_indications: study.clinical_indications.as_deref(),
            triage_alerts: &verdict.preliminary_findings,
            findings: None,
        };
        let prompt = self.prompts.get_prompt(PromptKind::Findings, &ctx);
        let messages = vec![
            ChatMessage::system(prompt.system),
            ChatMessage::user_with_images(&[study.image.to_data_url()], prompt.user),
        ];

        let tier = choice.tier;
        let text = self
            .invoker
            .invoke(tier, messages)
            .await
            .map_err(|source| {
                error!(tier = %tier, error = %source, "findings generation failed");
                FindingsError::Upstream { tier, source }
            })?;

        if text.trim().is_empty() {
            error!(tier = %tier, "findings generation returned empty text");
            return Err(FindingsError::EmptyResponse { tier });
        }

        info!(tier = %tier, cost = choice.cost, "findings generated");

        Ok(FindingsResult {
            findings: text,
            model_used: tier,
            cost: choice.cost,
            triage: verdict.clone(),
        })
    }
}
