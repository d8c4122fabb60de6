//! Stage 1: rapid triage.
//!
//! [`TriageClassifier::triage`] never fails. A reply that parses becomes
//! [`TriageOutcome::Parsed`]; anything else becomes one of two conservative
//! fallback verdicts (urgent, complex) that differ only in confidence so
//! callers can tell an unreachable model (0.0) from an odd answer (0.3).

use std::sync::Arc;

use tracing::{info, warn};

use radiodraft_llm::{ChatMessage, ProviderError};
use radiodraft_types::{ImageType, ModelTier, TriageVerdict, XrayImage};

use super::traits::ModelInvoker;
use crate::payload::{self, PayloadError};
use crate::prompts::{PromptContext, PromptKind, PromptSource};

/// Confidence of the verdict substituted when the model could not be reached.
pub const UNREACHABLE_CONFIDENCE: f64 = 0.0;
/// Confidence of the verdict substituted when the reply could not be parsed.
pub const UNPARSEABLE_CONFIDENCE: f64 = 0.3;

/// How the triage stage ended.
#[derive(Debug)]
pub enum TriageOutcome {
    /// The model answered with a valid verdict.
    Parsed(TriageVerdict),
    /// The model answered, but not with something usable.
    Unparseable {
        /// Conservative fallback verdict (confidence 0.3).
        verdict: TriageVerdict,
        /// What was wrong with the reply.
        error: PayloadError,
    },
    /// The upstream call failed.
    Unreachable {
        /// Conservative fallback verdict (confidence 0.0).
        verdict: TriageVerdict,
        /// The transport error.
        error: ProviderError,
    },
}

impl TriageOutcome {
    /// The verdict, real or fallback.
    pub fn verdict(&self) -> &TriageVerdict {
        match self {
            TriageOutcome::Parsed(v) => v,
            TriageOutcome::Unparseable { verdict, .. } => verdict,
            TriageOutcome::Unreachable { verdict, .. } => verdict,
        }
    }

    /// Consume the outcome and keep the verdict.
    pub fn into_verdict(self) -> TriageVerdict {
        match self {
            TriageOutcome::Parsed(v) => v,
            TriageOutcome::Unparseable { verdict, .. } => verdict,
            TriageOutcome::Unreachable { verdict, .. } => verdict,
        }
    }

    /// Returns `true` if the verdict is a fallback.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, TriageOutcome::Parsed(_))
    }
}

/// Runs the triage prompt on the medium tier and parses the reply.
pub struct TriageClassifier {
    invoker: Arc<dyn ModelInvoker>,
    prompts: Arc<dyn PromptSource>,
    cost: f64,
}

impl TriageClassifier {
    /// `cost` is attributed to every triage call, successful or not.
    pub fn new(invoker: Arc<dyn ModelInvoker>, prompts: Arc<dyn PromptSource>, cost: f64) -> Self {
        Self {
            invoker,
            prompts,
            cost,
        }
    }

    /// Triage one image.
    pub async fn triage(&self, image: &XrayImage, image_type: ImageType) -> TriageOutcome {
        let prompt = self
            .prompts
            .get_prompt(PromptKind::Triage, &PromptContext::new(image_type));
        let messages = vec![
            ChatMessage::system(prompt.system),
            ChatMessage::user_with_images(&[image.to_data_url()], prompt.user),
        ];

        let reply = match self.invoker.invoke(ModelTier::Medium, messages).await {
            Ok(text) => text,
            Err(error) => {
                warn!(error = %error, "triage call failed, using conservative verdict");
                let verdict = TriageVerdict::conservative(
                    UNREACHABLE_CONFIDENCE,
                    "Error during triage",
                    format!("Error: {error}"),
                    self.cost,
                );
                return TriageOutcome::Unreachable { verdict, error };
            }
        };

        match payload::parse_triage(&reply, self.cost) {
            Ok(verdict) => {
                info!(
                    urgency = %verdict.urgency,
                    complexity = %verdict.complexity,
                    confidence = verdict.confidence,
                    alerts = verdict.preliminary_findings.len(),
                    "triage completed"
                );
                TriageOutcome::Parsed(verdict)
            }
            Err(error) => {
                warn!(error = %error, "triage reply unparseable, using conservative verdict");
                let verdict = TriageVerdict::conservative(
                    UNPARSEABLE_CONFIDENCE,
                    "Could not parse triage",
                    "Defaulting to safe triage",
                    self.cost,
                );
                TriageOutcome::Unparseable { verdict, error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use radiodraft_types::{Complexity, Urgency};

    use super::*;
    use crate::prompts::BuiltinPrompts;

    /// Returns a fixed reply (or error) and records what it was sent.
    struct CannedInvoker {
        reply: Result<String, String>,
        calls: Mutex<Vec<(ModelTier, Vec<ChatMessage>)>>,
    }

    impl CannedInvoker {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(msg.into()),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelInvoker for CannedInvoker {
        async fn invoke(
            &self,
            tier: ModelTier,
            messages: Vec<ChatMessage>,
        ) -> radiodraft_llm::Result<String> {
            self.calls.lock().unwrap().push((tier, messages));
            self.reply
                .clone()
                .map_err(ProviderError::RequestFailed)
        }
    }

    fn image() -> XrayImage {
        XrayImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]).unwrap()
    }

    fn classifier(invoker: Arc<CannedInvoker>) -> TriageClassifier {
        TriageClassifier::new(invoker, Arc::new(BuiltinPrompts), 0.01)
    }

    const NORMAL_REPLY: &str = r#"{"urgency":"normal","complexity":"simple","confidence":0.93,
        "preliminary_findings":[],"reasoning":"Clear film.","quality_issues":null,
        "recommended_action":"auto-draft report"}"#;

    #[tokio::test]
    async fn parsed_reply_becomes_verdict() {
        let invoker = CannedInvoker::ok(NORMAL_REPLY);
        let outcome = classifier(invoker.clone()).triage(&image(), ImageType::ChestSingle).await;

        assert!(!outcome.is_fallback());
        let v = outcome.into_verdict();
        assert_eq!(v.urgency, Urgency::Normal);
        assert_eq!(v.complexity, Complexity::Simple);
        assert_eq!(v.confidence, 0.93);
        assert_eq!(v.cost, 0.01);
    }

    #[tokio::test]
    async fn sends_image_and_type_to_medium_tier() {
        let invoker = CannedInvoker::ok(NORMAL_REPLY);
        classifier(invoker.clone()).triage(&image(), ImageType::Limb).await;

        let calls = invoker.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (tier, messages) = &calls[0];
        assert_eq!(*tier, ModelTier::Medium);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].image_count(), 1);
        assert!(messages[1].text().starts_with("This is a limb X-ray."));
    }

    #[tokio::test]
    async fn transport_failure_yields_zero_confidence() {
        let outcome = classifier(CannedInvoker::failing("connection refused"))
            .triage(&image(), ImageType::ChestSingle)
            .await;

        assert!(matches!(outcome, TriageOutcome::Unreachable { .. }));
        let v = outcome.verdict();
        assert_eq!(v.confidence, 0.0);
        assert_eq!(v.urgency, Urgency::Urgent);
        assert_eq!(v.complexity, Complexity::Complex);
        assert_eq!(v.preliminary_findings, vec!["Error during triage"]);
        assert!(v.reasoning.starts_with("Error: "));
        assert!(v.reasoning.contains("connection refused"));
        assert_eq!(v.quality_issues.as_deref(), Some("Unknown"));
        assert_eq!(v.recommended_action.as_deref(), Some("immediate radiologist review"));
        assert_eq!(v.cost, 0.01);
    }

    #[tokio::test]
    async fn garbage_reply_yields_point_three_confidence() {
        let outcome = classifier(CannedInvoker::ok("I think it's fine?"))
            .triage(&image(), ImageType::ChestSingle)
            .await;

        assert!(matches!(outcome, TriageOutcome::Unparseable { .. }));
        let v = outcome.verdict();
        assert_eq!(v.confidence, 0.3);
        assert_eq!(v.urgency, Urgency::Urgent);
        assert_eq!(v.complexity, Complexity::Complex);
        assert_eq!(v.preliminary_findings, vec!["Could not parse triage"]);
        assert_eq!(v.reasoning, "Defaulting to safe triage");
        assert_eq!(v.cost, 0.01);
    }

    #[tokio::test]
    async fn empty_reply_is_unparseable() {
        let outcome = classifier(CannedInvoker::ok(""))
            .triage(&image(), ImageType::ChestSingle)
            .await;
        match outcome {
            TriageOutcome::Unparseable { error, .. } => {
                assert!(matches!(error, PayloadError::Empty))
            }
            other => panic!("expected Unparseable, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reply_missing_required_field_is_unparseable() {
        let outcome = classifier(CannedInvoker::ok(r#"{"urgency":"normal"}"#))
            .triage(&image(), ImageType::ChestSingle)
            .await;
        assert_eq!(outcome.verdict().confidence, 0.3);
    }
}
